use std::{path::PathBuf, str::FromStr, time::Duration};

/// Engine tuning. Built with `Default` plus `with_*` calls, or from
/// `TRYON_*` environment variables.
#[derive(Debug, Clone, PartialEq)]
pub struct EngineConfig {
    cache_capacity: usize,
    cache_ttl: Duration,
    metrics_capacity: usize,
    request_timeout: Duration,
    latency_target: Duration,
    model_input: usize,
    landmark_model: Option<PathBuf>,
    segmentation_model: Option<PathBuf>,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            cache_capacity: 256,
            cache_ttl: Duration::from_secs(3600),
            metrics_capacity: 1000,
            request_timeout: Duration::from_secs(10),
            latency_target: Duration::from_millis(3000),
            model_input: 256,
            landmark_model: None,
            segmentation_model: None,
        }
    }
}

fn env_parse<T: FromStr>(var: &str) -> Option<T> {
    let raw = std::env::var(var).ok()?;
    match raw.trim().parse() {
        Ok(value) => Some(value),
        Err(_) => {
            log::warn!("ignoring {}: cannot parse {:?}", var, raw);
            None
        }
    }
}

impl EngineConfig {
    /// Defaults overridden by any `TRYON_*` variable that is set and parses.
    pub fn from_env() -> Self {
        let mut config = Self::default();
        if let Some(capacity) = env_parse("TRYON_CACHE_CAPACITY") {
            config.cache_capacity = capacity;
        }
        if let Some(secs) = env_parse("TRYON_CACHE_TTL_SECS") {
            config.cache_ttl = Duration::from_secs(secs);
        }
        if let Some(capacity) = env_parse("TRYON_METRICS_CAPACITY") {
            config.metrics_capacity = capacity;
        }
        if let Some(ms) = env_parse("TRYON_TIMEOUT_MS") {
            config.request_timeout = Duration::from_millis(ms);
        }
        if let Some(ms) = env_parse("TRYON_LATENCY_TARGET_MS") {
            config.latency_target = Duration::from_millis(ms);
        }
        if let Ok(path) = std::env::var("TRYON_LANDMARK_MODEL") {
            config.landmark_model = Some(path.into());
        }
        if let Ok(path) = std::env::var("TRYON_SEGMENTATION_MODEL") {
            config.segmentation_model = Some(path.into());
        }
        config
    }

    /// Maximum number of cached results.
    pub fn with_cache_capacity(mut self, capacity: usize) -> Self {
        self.cache_capacity = capacity;
        self
    }

    /// How long a cached result stays valid.
    pub fn with_cache_ttl(mut self, ttl: Duration) -> Self {
        self.cache_ttl = ttl;
        self
    }

    /// Number of processing records kept for health reporting.
    pub fn with_metrics_capacity(mut self, capacity: usize) -> Self {
        self.metrics_capacity = capacity;
        self
    }

    /// Wall-clock budget for one computation.
    pub fn with_request_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = timeout;
        self
    }

    /// Latency at which the performance score reaches zero.
    pub fn with_latency_target(mut self, target: Duration) -> Self {
        self.latency_target = target;
        self
    }

    /// Side length of the square tensor the estimators see.
    pub fn with_model_input(mut self, size: usize) -> Self {
        self.model_input = size;
        self
    }

    pub fn with_landmark_model(mut self, path: impl Into<PathBuf>) -> Self {
        self.landmark_model = Some(path.into());
        self
    }

    pub fn with_segmentation_model(mut self, path: impl Into<PathBuf>) -> Self {
        self.segmentation_model = Some(path.into());
        self
    }

    pub fn cache_capacity(&self) -> usize {
        self.cache_capacity
    }

    pub fn cache_ttl(&self) -> Duration {
        self.cache_ttl
    }

    pub fn metrics_capacity(&self) -> usize {
        self.metrics_capacity
    }

    pub fn request_timeout(&self) -> Duration {
        self.request_timeout
    }

    pub fn latency_target(&self) -> Duration {
        self.latency_target
    }

    pub fn model_input(&self) -> usize {
        self.model_input
    }

    pub fn landmark_model(&self) -> Option<&PathBuf> {
        self.landmark_model.as_ref()
    }

    pub fn segmentation_model(&self) -> Option<&PathBuf> {
        self.segmentation_model.as_ref()
    }
}
