//! Driftwood Core - Shared types library.
//!
//! This crate provides common types used across all Driftwood Goods
//! components:
//! - `storefront` - Public-facing e-commerce site
//! - `integration-tests` - Workspace-level test suite
//!
//! # Architecture
//!
//! The core crate contains only types - no I/O, no database access, no HTTP
//! clients. This keeps it lightweight and allows it to be used anywhere.
//!
//! # Modules
//!
//! - [`types`] - Newtype wrappers for type-safe IDs, session keys, and prices
//! - [`cart`] - The session-scoped cart aggregate and its line items

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod cart;
pub mod types;

pub use cart::{Cart, CartLineItem};
pub use types::*;
