//! Daily attendance marks and global attendance statistics.
//!
//! At most one mark exists per (student, class, date). The referenced
//! student and class must exist when a mark is written.
//!
//! ## Endpoints
//!
//! | Method | Endpoint | Description |
//! |--------|----------|-------------|
//! | GET | `/api/attendance` | List marks (filters: studentId, classId, status, from, to) |
//! | POST | `/api/attendance` | Mark attendance |
//! | GET | `/api/attendance/stats` | Status counts and percentage |
//! | GET | `/api/attendance/{id}` | Get a mark |
//! | PUT | `/api/attendance/{id}` | Replace a mark |
//! | DELETE | `/api/attendance/{id}` | Delete a mark |

pub mod dtos;
pub mod handlers;
pub mod models;
pub mod routes;
pub mod services;

pub use services::AttendanceService;
