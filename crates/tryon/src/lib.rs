//! Virtual garment try-on core.
//!
//! `Engine` takes a subject photo and a garment photo, estimates the body,
//! places and blends the garment, and reports fit, fabric behaviour and
//! styling notes. Results are cached by request fingerprint.

pub mod cache;
pub mod compositor;
pub mod config;
pub mod engine;
pub mod error;
pub mod fingerprint;
pub mod fitting;
pub mod garment;
pub mod measurements;
pub mod metrics;
pub mod request;
pub mod session;
pub mod sizing;
pub mod types;

pub use cache::{CacheStats, ResultCache};
pub use config::EngineConfig;
pub use engine::{Engine, EngineBuilder};
pub use error::TryOnError;
pub use fingerprint::Fingerprint;
pub use metrics::{MetricsRecorder, MetricsSummary, ProcessingMetrics};
pub use request::{TryOnRequest, ValidatedRequest};
pub use session::{InMemorySessionStore, SessionRecord, SessionStore, StoreError};
pub use sizing::{SizeRecommendation, SizeRecommender};
pub use types::{
    BodyMeasurements, FabricPhysics, GarmentCategory, ResultMetadata, SizeBucket, TryOnResult,
};
