// Module exports for models

pub mod operation;
pub mod pattern;
pub mod schedule;
pub mod settings;
pub mod task;
