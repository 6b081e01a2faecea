pub mod fund;
pub mod region;
