pub mod allocate;
pub mod analyze;
pub mod classify;
pub mod composition;
pub mod config;
pub mod profile;
pub mod retire;
pub mod tilt;
