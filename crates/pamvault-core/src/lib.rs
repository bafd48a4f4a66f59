//! # pamvault-core
//!
//! Core library for pamvault providing:
//! - Environment-driven configuration for the PAM vault API
//! - The error taxonomy shared by every vault operation
//! - Wire payload types
//! - Secret hygiene helpers (zeroizing strings, audit logging)

pub mod config;
pub mod error;
pub mod security;
pub mod types;

pub use config::PamConfig;
pub use error::{Error, Result};
pub use security::{AuditLog, SecureString};
