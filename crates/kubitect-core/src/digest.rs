//! Content digests of configuration values.
//!
//! A digest is the hex SHA-256 of the value's compact JSON form. Struct
//! fields serialize in declaration order and maps in key order, so equal
//! values always hash equally.

use sha2::{Digest, Sha256};

use crate::errors::Result;
use crate::value::Value;

/// Digest of `value`, 64 lowercase hex characters.
///
/// # Errors
///
/// Returns `KubitectError::Json` if the value cannot be serialized.
pub fn config_digest(value: &Value) -> Result<String> {
    let canonical = serde_json::to_string(value)?;
    Ok(hash_string(&canonical))
}

fn hash_string(input: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(input.as_bytes());
    hex::encode(hasher.finalize())
}
