pub mod memory_service;
pub mod validation_service;

pub use memory_service::*;
pub use validation_service::*;
