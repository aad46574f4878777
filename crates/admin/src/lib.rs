//! Farmachelo Admin client library.
//!
//! The back-office face of the pharmacy: product catalog CRUD, order and
//! invoice management, aggregate stats, and CSV export. Authenticates with
//! an admin bearer token against the same backend the storefront uses.

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod api;
pub mod config;
pub mod error;
pub mod export;

pub use api::AdminApi;
pub use config::AdminConfig;
pub use error::{AdminError, Result};
