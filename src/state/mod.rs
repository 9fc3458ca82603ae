pub mod config;
pub mod data_series;
pub mod theme;
