pub mod analysis;
pub mod churn;
pub mod classification;
pub mod cohort;
pub mod frequency;
pub mod history;
pub mod service;
