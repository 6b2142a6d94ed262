// src/models/mod.rs

pub mod exam_document;
pub mod feedback;
pub mod level;
pub mod progress;
pub mod question;
pub mod simulation;
pub mod stats;
pub mod user;
