pub mod fixtures;
pub mod inference_mock;
