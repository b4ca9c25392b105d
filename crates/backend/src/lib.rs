pub mod api;
pub mod dashboards;
pub mod domain;
pub mod shared;
pub mod system;
