pub mod aggregation;
pub mod config;
pub mod data_source;
pub mod dates;
pub mod format;
pub mod variance;
