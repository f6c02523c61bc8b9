// handlers/mod.rs - Two-tier handler layout
//
// Public (no session required) -> Protected (validated session token)
//
// Both tiers live under /api, which the route gate always lets through;
// the protected tier is wrapped in session_auth_middleware by the router.
pub mod protected;
pub mod public;

use std::collections::HashMap;
use uuid::Uuid;

use crate::error::ApiError;

/// Parse a path id, answering 400 for anything that is not a UUID
pub(crate) fn parse_id(raw: &str) -> Result<Uuid, ApiError> {
    Uuid::parse_str(raw).map_err(|_| ApiError::bad_request(format!("Invalid id '{}'", raw)))
}

/// Collects per-field validation messages
#[derive(Debug, Default)]
pub(crate) struct FieldErrors(HashMap<String, String>);

impl FieldErrors {
    pub fn add(&mut self, field: &str, message: impl Into<String>) {
        self.0.insert(field.to_string(), message.into());
    }

    /// `Ok` when nothing was recorded, otherwise a 400 validation error
    pub fn finish(self, message: &str) -> Result<(), ApiError> {
        if self.0.is_empty() {
            Ok(())
        } else {
            Err(ApiError::validation_error(message, Some(self.0)))
        }
    }
}
