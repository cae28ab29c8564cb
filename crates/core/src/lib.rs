//! EC Shop Core - Shared domain types.
//!
//! Types used by every EC Shop component:
//! - `storefront` - REST back end for catalog, customers, carts, orders and payments
//! - `cli` - Command-line tools for migrations and customer bootstrap
//!
//! # Architecture
//!
//! The core crate contains only types and pure functions - no I/O, no database
//! access, no HTTP clients.
//!
//! # Modules
//!
//! - [`types`] - Type-safe IDs, emails, roles, payment statuses and money helpers

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod types;

pub use types::*;
