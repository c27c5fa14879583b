pub mod student_dto;

pub use student_dto::{StudentAttendanceDto, StudentPayloadDto, StudentResponseDto};
