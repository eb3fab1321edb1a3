//! Password hashing with bcrypt

use crate::error::Result;

/// Hashes and verifies passwords off the async reactor
#[derive(Debug, Clone)]
pub struct PasswordHasher {
    cost: u32,
    /// Verified against when the email is unknown so both login paths cost the same
    dummy_hash: String,
}

impl PasswordHasher {
    pub fn new(cost: u32) -> Result<Self> {
        let dummy_hash = bcrypt::non_truncating_hash("marketplace-dummy-password", cost)?;
        Ok(Self { cost, dummy_hash })
    }

    pub fn cost(&self) -> u32 {
        self.cost
    }

    pub async fn hash(&self, password: &str) -> Result<String> {
        let password = password.to_string();
        let cost = self.cost;
        let hashed =
            tokio::task::spawn_blocking(move || bcrypt::non_truncating_hash(password, cost))
                .await??;
        Ok(hashed)
    }

    /// Returns `false` for a malformed stored hash or an over-long password
    /// rather than failing the request
    pub async fn verify(&self, password: &str, hash: &str) -> Result<bool> {
        let password = password.to_string();
        let hash = hash.to_string();
        let matched = tokio::task::spawn_blocking(move || {
            match bcrypt::non_truncating_verify(password, &hash) {
                Ok(matched) => matched,
                Err(bcrypt::BcryptError::Truncation(len)) => {
                    tracing::debug!(len, "Password longer than bcrypt accepts");
                    false
                }
                Err(e) => {
                    tracing::warn!("Stored password hash could not be verified: {}", e);
                    false
                }
            }
        })
        .await?;
        Ok(matched)
    }

    /// Burn one verification for an unknown account
    pub async fn verify_dummy(&self, password: &str) -> Result<()> {
        let dummy = self.dummy_hash.clone();
        self.verify(password, &dummy).await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::forms::MAX_PASSWORD_BYTES;

    #[tokio::test]
    async fn test_hash_and_verify() {
        let hasher = PasswordHasher::new(4).unwrap();
        let hash = hasher.hash("s3cret-pass").await.unwrap();
        assert_ne!(hash, "s3cret-pass");
        assert!(hasher.verify("s3cret-pass", &hash).await.unwrap());
        assert!(!hasher.verify("wrong-pass", &hash).await.unwrap());
    }

    #[tokio::test]
    async fn test_malformed_hash_does_not_match() {
        let hasher = PasswordHasher::new(4).unwrap();
        assert!(!hasher.verify("anything", "not-a-bcrypt-hash").await.unwrap());
    }

    #[tokio::test]
    async fn test_long_password_is_not_truncated() {
        let hasher = PasswordHasher::new(4).unwrap();
        let longest = "p".repeat(MAX_PASSWORD_BYTES);
        let stored = hasher.hash(&longest).await.unwrap();

        assert!(hasher.verify(&longest, &stored).await.unwrap());
        assert!(!hasher.verify(&"p".repeat(80), &stored).await.unwrap());
        assert!(hasher.hash(&"p".repeat(100)).await.is_err());
    }

    #[tokio::test]
    async fn test_dummy_verification_succeeds() {
        let hasher = PasswordHasher::new(4).unwrap();
        hasher.verify_dummy("whatever").await.unwrap();
    }
}
