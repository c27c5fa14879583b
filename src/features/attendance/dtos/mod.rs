pub mod attendance_dto;
pub mod statistics_dto;

pub use attendance_dto::{
    AttendanceClassDto, AttendanceFilter, AttendanceMark, AttendancePayloadDto,
    AttendanceQueryParams, AttendanceResponseDto, AttendanceStatsQueryParams,
    AttendanceStudentDto,
};
pub use statistics_dto::{AttendanceStatisticsDto, DailyTallyDto};
