pub mod life_expectancy;
pub mod projection;
