// src/models/mod.rs
pub mod attendance;
pub mod coursework;
pub mod student;
pub mod user;
