pub mod product;
pub mod result;
pub mod search;
