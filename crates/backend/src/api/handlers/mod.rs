pub mod d400_overview;
pub mod d401_customers;
pub mod d402_products;
pub mod d403_regional;
pub mod filters;
