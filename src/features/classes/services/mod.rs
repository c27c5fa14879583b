pub mod class_service;

pub use class_service::ClassService;
