pub mod service;
pub mod states;
