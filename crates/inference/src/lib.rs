pub mod error;
pub mod inference;
pub mod landmark;
pub mod net;
pub mod segment;
pub mod silhouette;

pub use error::InferError;
pub use inference::Inference;
pub use landmark::{
    COCO_KEYPOINT_COUNT, CONFIDENCE_THRESHOLD, KeypointIndex, Landmark, LandmarkEstimator,
};
pub use segment::RegionSegmenter;
pub use silhouette::{SilhouetteEstimator, SilhouetteSegmenter};
