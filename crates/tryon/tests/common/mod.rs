#![allow(dead_code)]

use {
    base::Tensor,
    image::Image,
    inference::{
        InferError, KeypointIndex, Landmark, LandmarkEstimator, RegionSegmenter,
        SilhouetteEstimator,
    },
    std::{
        sync::{
            Arc,
            atomic::{AtomicUsize, Ordering},
        },
        time::Duration,
    },
    tryon::{
        Engine, EngineConfig, InMemorySessionStore, SessionRecord, SessionStore, StoreError,
        TryOnRequest,
    },
};

pub const GRAY: [u8; 4] = [90, 90, 90, 255];

/// PNG data URL of a `width` x `height` image painted by `paint(x, y)`.
pub fn payload(width: usize, height: usize, paint: impl Fn(usize, usize) -> [u8; 4]) -> String {
    let mut data = Vec::with_capacity(width * height * 4);
    for y in 0..height {
        for x in 0..width {
            data.extend_from_slice(&paint(x, y));
        }
    }
    let image = Image::from_rgba8(width, height, data).unwrap();
    let png = image::encode_png(&image).unwrap();
    image::encode_payload(&png, "image/png")
}

/// White backdrop with a dark standing figure.
pub fn person() -> String {
    payload(128, 128, |x, y| {
        if (40..88).contains(&x) && (8..120).contains(&y) {
            [40, 30, 25, 255]
        } else {
            [250, 250, 250, 255]
        }
    })
}

pub fn empty_room() -> String {
    payload(96, 96, |_, _| GRAY)
}

pub fn shirt() -> String {
    payload(48, 64, |_, _| [200, 40, 40, 255])
}

pub fn decode_result(data_url: &str) -> Tensor<u8> {
    let bytes = image::decode_payload(data_url).unwrap();
    image::decode(&bytes).unwrap().to_rgba8().unwrap()
}

pub fn request(user_image: String, garment_image: String, kind: &str) -> TryOnRequest {
    TryOnRequest::new(user_image, garment_image, kind, "user-1")
}

/// Silhouette estimator that counts calls and can be slowed down.
#[derive(Default)]
pub struct CountingEstimator {
    pub calls: AtomicUsize,
    pub delay: Duration,
}

impl CountingEstimator {
    pub fn slow(delay: Duration) -> Self {
        Self {
            calls: AtomicUsize::new(0),
            delay,
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl LandmarkEstimator for CountingEstimator {
    fn estimate(&self, frame: &Tensor<f32>) -> Result<Vec<Landmark>, InferError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if !self.delay.is_zero() {
            std::thread::sleep(self.delay);
        }
        SilhouetteEstimator.estimate(frame)
    }

    fn name(&self) -> &'static str {
        "counting"
    }
}

/// Always reports a single nose landmark.
pub struct NoseOnly;

impl LandmarkEstimator for NoseOnly {
    fn estimate(&self, _: &Tensor<f32>) -> Result<Vec<Landmark>, InferError> {
        Ok(vec![Landmark {
            keypoint: KeypointIndex::Nose,
            x: 0.5,
            y: 0.1,
            confidence: 0.9,
        }])
    }

    fn name(&self) -> &'static str {
        "nose-only"
    }
}

/// Passes the blank warmup frame, fails on anything with content.
pub struct BrokenSegmenter;

impl RegionSegmenter for BrokenSegmenter {
    fn segment(&self, frame: &Tensor<f32>) -> Result<Option<Tensor<f32>>, InferError> {
        if frame.data.iter().all(|&v| v == 0.0) {
            Ok(None)
        } else {
            Err(InferError::Runtime("segmentation backend crashed".to_string()))
        }
    }

    fn name(&self) -> &'static str {
        "broken"
    }
}

/// Session store whose writes panic.
pub struct PanickingStore;

impl SessionStore for PanickingStore {
    fn append(&self, _: SessionRecord) -> Result<(), StoreError> {
        panic!("session store went away");
    }

    fn history(&self, _: &str) -> Result<Vec<SessionRecord>, StoreError> {
        Ok(Vec::new())
    }
}

pub async fn ready_engine(
    config: EngineConfig,
    estimator: Arc<dyn LandmarkEstimator>,
    sessions: Arc<InMemorySessionStore>,
) -> Engine {
    let engine = Engine::builder(config)
        .with_estimator(estimator)
        .with_session_store(sessions)
        .build()
        .unwrap();
    engine.initialize().await.unwrap();
    engine
}
