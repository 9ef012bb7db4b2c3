//! Password hashing utilities

use bcrypt::{hash, verify};

pub use bcrypt::DEFAULT_COST;

/// Lowest cost bcrypt accepts
pub const MIN_COST: u32 = 4;

/// bcrypt only reads this many bytes of the password
pub const MAX_PASSWORD_BYTES: usize = 72;

/// Hash a password using bcrypt with a fresh random salt
pub fn hash_password(password: &str, cost: u32) -> Result<String, bcrypt::BcryptError> {
    hash(password, cost)
}

/// Verify a password against a hash
pub fn verify_password(password: &str, hash: &str) -> Result<bool, bcrypt::BcryptError> {
    verify(password, hash)
}
