//! Security utilities for secrets handling
//!
//! Provides:
//! - SecureString with zeroize
//! - Audit logging (never logs secret values)

use std::fmt;
use zeroize::{Zeroize, ZeroizeOnDrop};

/// A secure string that is automatically zeroed on drop
#[derive(Clone, Zeroize, ZeroizeOnDrop)]
pub struct SecureString {
    inner: String,
}

impl SecureString {
    /// Create a new secure string
    pub fn new(value: String) -> Self {
        Self { inner: value }
    }

    /// Get the string value (use with caution)
    pub fn as_str(&self) -> &str {
        &self.inner
    }

    /// Get length
    pub fn len(&self) -> usize {
        self.inner.len()
    }

    /// Check if empty
    pub fn is_empty(&self) -> bool {
        self.inner.is_empty()
    }
}

impl From<String> for SecureString {
    fn from(s: String) -> Self {
        Self::new(s)
    }
}

impl From<&str> for SecureString {
    fn from(s: &str) -> Self {
        Self::new(s.to_string())
    }
}

impl fmt::Debug for SecureString {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "SecureString([REDACTED {} bytes])", self.len())
    }
}

impl fmt::Display for SecureString {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[REDACTED]")
    }
}

/// Audit log entry for vault operations
#[derive(Debug, Clone)]
pub struct AuditLog {
    pub operation: &'static str,
    pub target: String,
    pub success: bool,
    pub error: Option<String>,
    pub timestamp: std::time::SystemTime,
}

impl AuditLog {
    pub fn new(operation: &'static str, target: impl Into<String>) -> Self {
        Self {
            operation,
            target: target.into(),
            success: true,
            error: None,
            timestamp: std::time::SystemTime::now(),
        }
    }

    pub fn with_error(mut self, error: impl fmt::Display) -> Self {
        self.success = false;
        self.error = Some(error.to_string());
        self
    }

    /// Log the audit entry (never logs secret values)
    pub fn log(&self) {
        if self.success {
            tracing::info!(
                operation = %self.operation,
                target = %self.target,
                timestamp = ?self.timestamp,
                "Vault operation successful"
            );
        } else {
            tracing::warn!(
                operation = %self.operation,
                target = %self.target,
                error = ?self.error,
                timestamp = ?self.timestamp,
                "Vault operation failed"
            );
        }
    }

    /// Log the outcome of `result` and hand it back unchanged
    pub fn record<T, E: fmt::Display>(
        operation: &'static str,
        target: impl Into<String>,
        result: Result<T, E>,
    ) -> Result<T, E> {
        let entry = Self::new(operation, target);
        match &result {
            Ok(_) => entry.log(),
            Err(e) => entry.with_error(e).log(),
        }
        result
    }
}
