//! Scoped ownership of the remote secret.
//!
//! The secret is a single piece of global remote state. A `SecretLease`
//! is the only handle through which an experiment writes it, and dropping
//! the lease writes the placeholder back on every exit path.

use tracing::{info, warn};

use super::platform::Platform;
use crate::error::{Result, SetupError};

/// Exclusive handle on one repository secret.
pub struct SecretLease<'p, P: Platform + ?Sized> {
    platform: &'p P,
    name: String,
    placeholder: String,
    history: Vec<String>,
}

impl<'p, P: Platform + ?Sized> SecretLease<'p, P> {
    /// Take the secret `name`. Nothing is written until [`set`](Self::set).
    pub fn new(platform: &'p P, name: impl Into<String>, placeholder: impl Into<String>) -> Self {
        Self {
            platform,
            name: name.into(),
            placeholder: placeholder.into(),
            history: Vec::new(),
        }
    }

    /// Values written through this lease, oldest first.
    pub fn history(&self) -> &[String] {
        &self.history
    }

    /// Write `value` to the secret.
    ///
    /// # Errors
    ///
    /// A failed write invalidates the experiment, so it is reported as
    /// `SetupError::SecretSet` and never retried.
    pub fn set(&mut self, value: &str) -> Result<()> {
        info!(secret = %self.name, version = self.history.len() + 1, "rotating secret");
        self.platform
            .set_secret(&self.name, value)
            .map_err(|e| SetupError::SecretSet {
                name: self.name.clone(),
                reason: e.to_string(),
            })?;
        self.history.push(value.to_string());
        Ok(())
    }
}

impl<P: Platform + ?Sized> Drop for SecretLease<'_, P> {
    fn drop(&mut self) {
        // Best effort: the reset is not verified.
        match self.platform.set_secret(&self.name, &self.placeholder) {
            Ok(()) => info!(secret = %self.name, "secret reset to placeholder"),
            Err(e) => warn!(secret = %self.name, error = %e, "failed to reset secret"),
        }
    }
}
