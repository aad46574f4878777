//! Core types for Farmachelo.
//!
//! This module provides type-safe wrappers for common domain concepts.

pub mod cart;
pub mod email;
pub mod id;
pub mod invoice;
pub mod order;
pub mod price;
pub mod product;
pub mod status;

pub use cart::{Cart, CartItem};
pub use email::{Email, EmailError};
pub use id::*;
pub use invoice::{CustomerInfo, Invoice, InvoiceLineItem};
pub use order::{Order, OrderStats};
pub use price::Price;
pub use product::{Product, ProductInput};
pub use status::*;
