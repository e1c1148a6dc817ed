//! ### Terminal output

pub mod display;
pub mod models;
