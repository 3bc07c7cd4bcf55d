//! Business logic services.

pub mod cart;
pub mod catalog;
