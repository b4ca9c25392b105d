pub mod aggregates;
pub mod filters;
