pub mod benchmark;
pub mod blocks;
pub mod reconcile;
pub mod tilt;
