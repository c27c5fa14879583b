//! Classes and per-class attendance summaries.
//!
//! The (name, subject) pair is unique. A class cannot be deleted while
//! attendance records reference it.
//!
//! ## Endpoints
//!
//! | Method | Endpoint | Description |
//! |--------|----------|-------------|
//! | GET | `/api/classes` | List classes |
//! | POST | `/api/classes` | Create class |
//! | GET | `/api/classes/{id}` | Get class |
//! | PUT | `/api/classes/{id}` | Replace class |
//! | DELETE | `/api/classes/{id}` | Delete class |
//! | GET | `/api/classes/{id}/attendance-summary` | Attendance with daily tallies |

pub mod dtos;
pub mod handlers;
pub mod models;
pub mod routes;
pub mod services;

pub use services::ClassService;
