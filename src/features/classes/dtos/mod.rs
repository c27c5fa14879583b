pub mod class_dto;

pub use class_dto::{ClassAttendanceSummaryDto, ClassPayloadDto, ClassResponseDto};
