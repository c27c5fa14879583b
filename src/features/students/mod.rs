//! Student records and per-student attendance statistics.
//!
//! Roll number and email are unique. A student cannot be deleted while
//! attendance records reference it.
//!
//! ## Endpoints
//!
//! | Method | Endpoint | Description |
//! |--------|----------|-------------|
//! | GET | `/api/students` | List students |
//! | POST | `/api/students` | Create student |
//! | GET | `/api/students/{id}` | Get student |
//! | PUT | `/api/students/{id}` | Replace student |
//! | DELETE | `/api/students/{id}` | Delete student |
//! | GET | `/api/students/{id}/attendance` | Attendance and statistics |

pub mod dtos;
pub mod handlers;
pub mod models;
pub mod routes;
pub mod services;

pub use services::StudentService;
