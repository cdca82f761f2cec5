use {
    crate::GarmentCategory,
    sha2::{Digest, Sha256},
};

/// Cache key for a request: SHA-256 over the user id, category and both
/// complete payloads. Each field is length-prefixed so content cannot slide
/// across field boundaries.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Fingerprint(String);

impl Fingerprint {
    pub fn compute(
        user_id: &str,
        category: GarmentCategory,
        user_image: &str,
        garment_image: &str,
    ) -> Self {
        let mut hasher = Sha256::new();
        for field in [
            user_id.as_bytes(),
            category.as_str().as_bytes(),
            user_image.as_bytes(),
            garment_image.as_bytes(),
        ] {
            hasher.update((field.len() as u64).to_le_bytes());
            hasher.update(field);
        }
        Self(format!("{:x}", hasher.finalize()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Leading hex digits, enough to tell requests apart in logs.
    pub fn short(&self) -> &str {
        &self.0[..12]
    }
}
