//! bcrypt password hashing.
//!
//! Both functions are CPU-bound; async callers run them on the blocking
//! pool.

use crate::AuthError;

/// Lowest cost bcrypt accepts. Only for tests.
pub const MIN_COST: u32 = 4;

/// Hash `password` with the given work factor.
pub fn hash(password: &str, cost: u32) -> Result<String, AuthError> {
    bcrypt::hash(password, cost).map_err(|e| AuthError::PasswordHash(e.to_string()))
}

/// Check `password` against a stored bcrypt hash.
pub fn verify(password: &str, hash: &str) -> Result<bool, AuthError> {
    bcrypt::verify(password, hash).map_err(|e| AuthError::PasswordHash(e.to_string()))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_hash_and_verify() {
        let hashed = hash("Analytical1", MIN_COST).unwrap();
        assert!(hashed.starts_with("$2"));
        assert!(verify("Analytical1", &hashed).unwrap());
        assert!(!verify("analytical1", &hashed).unwrap());
    }

    #[test]
    fn test_hashes_are_salted() {
        let a = hash("same-password", MIN_COST).unwrap();
        let b = hash("same-password", MIN_COST).unwrap();
        assert_ne!(a, b);
    }

    #[test]
    fn test_verify_rejects_garbage_hash() {
        let err = verify("whatever", "not-a-bcrypt-hash").unwrap_err();
        assert!(!err.is_client_error());
    }

    #[test]
    fn test_cost_out_of_range() {
        assert!(hash("pw", 3).is_err());
    }
}
