pub mod attendance_service;

pub use attendance_service::{fetch_records, AttendanceService};
