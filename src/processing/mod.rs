pub mod aggregation;
pub mod decimal;
pub mod statistics;
