//! Lazarus engine REST API contract types and validation
//!
//! This crate defines the request and response shapes of the resurrection
//! engine (`/scan`, `/resurrect`, `/download/{project}` and the health
//! root). These types are shared between the REST client, the scripted
//! mock client and the session core.

pub mod error;
pub mod types;
pub mod validation;

pub use error::*;
pub use types::*;
pub use validation::*;
