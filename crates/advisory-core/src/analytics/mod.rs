pub mod composition;
pub mod metrics;
pub mod nav;
