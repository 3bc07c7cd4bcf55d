//! Domain models for the storefront.

pub mod catalog;
pub mod session;

pub use catalog::{Category, Page, Product};
