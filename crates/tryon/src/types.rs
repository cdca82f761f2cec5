use {
    crate::TryOnError,
    serde::{Deserialize, Serialize},
    std::{fmt, str::FromStr},
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GarmentCategory {
    Top,
    Bottom,
    Dress,
    Shoes,
    Accessories,
}

impl GarmentCategory {
    pub const ALL: [GarmentCategory; 5] = [
        GarmentCategory::Top,
        GarmentCategory::Bottom,
        GarmentCategory::Dress,
        GarmentCategory::Shoes,
        GarmentCategory::Accessories,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            GarmentCategory::Top => "top",
            GarmentCategory::Bottom => "bottom",
            GarmentCategory::Dress => "dress",
            GarmentCategory::Shoes => "shoes",
            GarmentCategory::Accessories => "accessories",
        }
    }
}

impl fmt::Display for GarmentCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for GarmentCategory {
    type Err = TryOnError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "top" => Ok(GarmentCategory::Top),
            "bottom" => Ok(GarmentCategory::Bottom),
            "dress" => Ok(GarmentCategory::Dress),
            "shoes" => Ok(GarmentCategory::Shoes),
            "accessories" => Ok(GarmentCategory::Accessories),
            other => Err(TryOnError::InvalidRequest(format!(
                "unknown garment category: {other:?}"
            ))),
        }
    }
}

/// Five-band garment size.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum SizeBucket {
    XS,
    S,
    M,
    L,
    XL,
}

impl SizeBucket {
    pub fn as_str(&self) -> &'static str {
        match self {
            SizeBucket::XS => "XS",
            SizeBucket::S => "S",
            SizeBucket::M => "M",
            SizeBucket::L => "L",
            SizeBucket::XL => "XL",
        }
    }
}

impl fmt::Display for SizeBucket {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Body dimensions in centimeters. Every field is strictly positive.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BodyMeasurements {
    pub shoulders: f32,
    pub chest: f32,
    pub waist: f32,
    pub hips: f32,
    pub height: f32,
    pub arm_length: f32,
}

impl BodyMeasurements {
    /// Neutral population-average fallback.
    pub const DEFAULT: BodyMeasurements = BodyMeasurements {
        shoulders: 38.0,
        chest: 88.0,
        waist: 72.0,
        hips: 92.0,
        height: 165.0,
        arm_length: 58.0,
    };
}

impl Default for BodyMeasurements {
    fn default() -> Self {
        Self::DEFAULT
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FabricPhysics {
    pub drape_coefficient: f32,
    pub stretch_factor: f32,
    pub wrinkle_intensity: f32,
    pub shine_factor: f32,
    pub breathability: f32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResultMetadata {
    pub body_detected: bool,
    pub garment_fit_score: f32,
    pub recommendations: Vec<String>,
    pub fabric_physics: FabricPhysics,
    pub texture_quality: f32,
}

/// Outcome of one computed try-on. Shared as `Arc<TryOnResult>` between the
/// cache and every caller; never mutated after creation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TryOnResult {
    /// PNG data URL of the composite.
    pub result_image: String,
    pub confidence: f32,
    /// Milliseconds spent computing.
    pub processing_time: u64,
    pub metadata: ResultMetadata,
}

impl TryOnResult {
    pub fn to_json(&self) -> Result<String, TryOnError> {
        serde_json::to_string(self).map_err(|e| TryOnError::Unknown(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_category_parse_is_case_insensitive() {
        assert_eq!("TOP".parse::<GarmentCategory>(), Ok(GarmentCategory::Top));
        assert_eq!(
            " Accessories ".parse::<GarmentCategory>(),
            Ok(GarmentCategory::Accessories)
        );
        assert!(matches!(
            "hat".parse::<GarmentCategory>(),
            Err(TryOnError::InvalidRequest(_))
        ));
    }

    #[test]
    fn test_result_serializes_field_exact() {
        let result = TryOnResult {
            result_image: "data:image/png;base64,AA==".to_string(),
            confidence: 0.5,
            processing_time: 12,
            metadata: ResultMetadata {
                body_detected: true,
                garment_fit_score: 0.5,
                recommendations: vec!["a".to_string()],
                fabric_physics: FabricPhysics {
                    drape_coefficient: 0.7,
                    stretch_factor: 0.3,
                    wrinkle_intensity: 0.4,
                    shine_factor: 0.2,
                    breathability: 0.8,
                },
                texture_quality: 0.5,
            },
        };
        let value: serde_json::Value = serde_json::from_str(&result.to_json().unwrap()).unwrap();
        assert!(value.get("resultImage").is_some());
        assert_eq!(value["processingTime"], 12);
        let meta = &value["metadata"];
        assert_eq!(meta["bodyDetected"], true);
        assert!(meta.get("garmentFitScore").is_some());
        assert!(meta.get("textureQuality").is_some());
        let physics = &meta["fabricPhysics"];
        for key in [
            "drapeCoefficient",
            "stretchFactor",
            "wrinkleIntensity",
            "shineFactor",
            "breathability",
        ] {
            assert!(physics.get(key).is_some(), "missing {key}");
        }
    }
}
