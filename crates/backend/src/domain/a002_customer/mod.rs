pub mod from_api;
