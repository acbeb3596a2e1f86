#![allow(dead_code)]

pub mod cast_mock;
pub mod inference_mock;

pub use cast_mock::{houseguest, TestCast};
pub use inference_mock::MockInferenceClient;
