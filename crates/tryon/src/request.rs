use {
    crate::{GarmentCategory, TryOnError},
    serde::Deserialize,
    std::fmt,
};

/// Incoming try-on request. Image fields hold transfer-encoded payloads
/// (base64, optionally with a `data:image/...;base64,` prefix).
///
/// Requests live only as long as the computation that consumes them; no
/// field is ever logged or persisted.
#[derive(Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TryOnRequest {
    pub user_image: String,
    pub garment_image: String,
    #[serde(default)]
    pub garment_type: Option<String>,
    #[serde(default)]
    pub user_id: String,
    /// Catalog product the garment belongs to, carried into session history.
    #[serde(default)]
    pub product_id: Option<String>,
    /// Accepted for compatibility. Payloads are never stored, so there is
    /// nothing to delete afterwards.
    #[serde(default)]
    pub auto_delete: bool,
}

// Payloads are large and private; only their sizes are shown.
impl fmt::Debug for TryOnRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TryOnRequest")
            .field("user_image_len", &self.user_image.len())
            .field("garment_image_len", &self.garment_image.len())
            .field("garment_type", &self.garment_type)
            .field("user_id", &self.user_id)
            .field("product_id", &self.product_id)
            .field("auto_delete", &self.auto_delete)
            .finish()
    }
}

impl TryOnRequest {
    pub fn new(
        user_image: impl Into<String>,
        garment_image: impl Into<String>,
        garment_type: impl Into<String>,
        user_id: impl Into<String>,
    ) -> Self {
        Self {
            user_image: user_image.into(),
            garment_image: garment_image.into(),
            garment_type: Some(garment_type.into()),
            user_id: user_id.into(),
            product_id: None,
            auto_delete: true,
        }
    }

    pub fn with_product_id(mut self, product_id: impl Into<String>) -> Self {
        self.product_id = Some(product_id.into());
        self
    }

    /// Check required fields and parse the category. Consumes the request so
    /// the payloads move into the computation.
    pub fn validate(self) -> Result<ValidatedRequest, TryOnError> {
        if self.user_image.trim().is_empty() {
            return Err(TryOnError::InvalidRequest("user image is missing".to_string()));
        }
        if self.garment_image.trim().is_empty() {
            return Err(TryOnError::InvalidRequest(
                "garment image is missing".to_string(),
            ));
        }
        if self.user_id.trim().is_empty() {
            return Err(TryOnError::InvalidRequest("user id is missing".to_string()));
        }
        let category = match self.garment_type.as_deref() {
            Some(kind) if !kind.trim().is_empty() => kind.parse::<GarmentCategory>()?,
            _ => {
                return Err(TryOnError::InvalidRequest(
                    "garment type is missing".to_string(),
                ));
            }
        };
        Ok(ValidatedRequest {
            user_image: self.user_image,
            garment_image: self.garment_image,
            category,
            user_id: self.user_id.trim().to_string(),
            product_id: self.product_id,
        })
    }
}

/// A request whose required fields are present and whose category parsed.
pub struct ValidatedRequest {
    pub user_image: String,
    pub garment_image: String,
    pub category: GarmentCategory,
    pub user_id: String,
    pub product_id: Option<String>,
}

impl fmt::Debug for ValidatedRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ValidatedRequest")
            .field("category", &self.category)
            .field("user_id", &self.user_id)
            .finish_non_exhaustive()
    }
}
