// src/models/mod.rs

pub mod grading;
pub mod question;
pub mod quiz;
pub mod result;
pub mod submission;
