// Domain layer - Data types and pure transformation logic
pub mod chart;
pub mod dashboard;
pub mod sample;
pub mod series;
