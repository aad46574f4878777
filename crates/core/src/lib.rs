//! Farmachelo Core - Shared types library.
//!
//! This crate provides common types used across all Farmachelo components:
//! - `storefront` - Customer-facing cart, checkout, and invoice mechanisms
//! - `admin` - Administration client for products, orders, and invoices
//!
//! # Architecture
//!
//! The core crate contains only types and pure helpers - no I/O, no HTTP
//! clients, no on-device storage. This keeps it lightweight and allows it to
//! be used anywhere.
//!
//! # Modules
//!
//! - [`types`] - Newtype wrappers for type-safe IDs, prices, emails, and
//!   statuses, plus the cart, invoice, order, and product data model

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod types;

pub use types::*;
