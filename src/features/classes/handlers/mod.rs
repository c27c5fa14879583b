pub mod class_handler;

pub use class_handler::*;
