// src/handlers/mod.rs

pub mod ai;
pub mod exams;
pub mod levels;
pub mod progress;
pub mod questions;
pub mod simulation;
pub mod stats;
