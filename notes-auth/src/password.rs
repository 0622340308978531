// Password hashing.

use anyhow::Result;
use bcrypt::{hash, verify};
use notes_core::errors::NotesError;

/// Lowest work factor bcrypt accepts.
pub const MIN_COST: u32 = 4;
/// Highest work factor bcrypt accepts.
pub const MAX_COST: u32 = 31;

/// bcrypt with a configurable work factor.
#[derive(Clone, Copy, Debug)]
pub struct PasswordHasher {
    cost: u32,
}

impl Default for PasswordHasher {
    fn default() -> Self {
        Self {
            cost: bcrypt::DEFAULT_COST,
        }
    }
}

impl PasswordHasher {
    pub fn new(cost: u32) -> Self {
        Self {
            cost: cost.clamp(MIN_COST, MAX_COST),
        }
    }

    pub fn cost(&self) -> u32 {
        self.cost
    }

    pub fn hash(&self, password: &str) -> Result<String> {
        hash(password, self.cost)
            .map_err(|e| NotesError::general_error("Could not hash password").with_source(e.into()).into_anyhow())
    }

    /// `false` for a wrong password and for a hash bcrypt cannot read.
    pub fn verify(&self, password: &str, hashed: &str) -> bool {
        match verify(password, hashed) {
            Ok(ok) => ok,
            Err(err) => {
                tracing::warn!(error = %err, "stored password hash is unreadable");
                false
            }
        }
    }
}
