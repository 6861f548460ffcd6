// Service module exports

pub mod database;
pub mod interpretation;
pub mod pattern;
pub mod placement;
pub mod reconcile;
pub mod session;
pub mod settings;
pub mod snapshot;
pub mod store;
pub mod task;
