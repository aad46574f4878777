//! Farmachelo Storefront library.
//!
//! The customer-facing mechanism layer of the pharmacy storefront. UI
//! components (product cards, the cart modal, the payment form, the receipt
//! page) call into this crate; it talks to the backend REST API and to
//! on-device key-value storage.
//!
//! # Architecture
//!
//! - [`api`] - REST client for the backend (`/api`, bearer-token auth)
//! - [`storage`] - On-device key-value stores (session and persistent tiers)
//! - [`cart`] - Cart reconciliation: local vs. remote routing by auth state
//! - [`checkout`] - Card validation/formatting and the payment flow
//! - [`invoice`] - Invoice generation, redundant persistence, and resolution

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod api;
pub mod cart;
pub mod checkout;
pub mod config;
pub mod error;
pub mod invoice;
pub mod session;
pub mod storage;
pub mod telemetry;

pub use config::StorefrontConfig;
pub use error::{AppError, Result};
