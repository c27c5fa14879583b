pub mod attendance;

pub use attendance::{Attendance, AttendanceRecord, AttendanceStatus};
