//! Common test infrastructure for pamvault-secrets tests
//!
//! In your test file, add:
//! ```ignore
//! mod common;
//! use common::*;
//! ```
//!
//! - `constants`: team, project and folder identifiers and API paths
//! - `mock_server`: wiremock setup helpers for each endpoint
//! - `fake_vault`: responders that decrypt and re-encrypt like the real vault

// Not every test file uses every helper
#![allow(dead_code)]
#![allow(unused_imports)]

pub mod constants;
pub mod fake_vault;
pub mod mock_server;

pub use constants::*;
pub use fake_vault::*;
pub use mock_server::*;
