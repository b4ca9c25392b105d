pub mod extractor;
pub mod scope;

pub use extractor::CurrentRole;
pub use scope::AccessScope;
