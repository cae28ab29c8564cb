//! EC Shop storefront library.
//!
//! JSON REST API for customers, catalog, orders, payments and carts, plus
//! the ECPay checkout pages. The binary in `main.rs` only wires this crate
//! to a listener.

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod config;
pub mod db;
pub mod error;
pub mod middleware;
pub mod models;
pub mod routes;
pub mod services;
pub mod state;
