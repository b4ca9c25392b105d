pub mod engine;
pub mod filters;

pub use engine::*;
pub use filters::{
    in_month, scoped_by_team, scoped_customers, CategoryScope, TeamScope, NO_CATEGORY,
};
