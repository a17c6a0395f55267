pub mod audit;
pub mod select;
