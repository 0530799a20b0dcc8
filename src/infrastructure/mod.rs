pub mod generation;
pub mod observability;
pub mod packaging;
pub mod persistence;
