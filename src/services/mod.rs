// src/services/mod.rs
pub mod attendance_service;
pub mod auth_service;
pub mod classroom_service;
pub mod metrics_service;
pub mod profile_service;
pub mod user_service;
