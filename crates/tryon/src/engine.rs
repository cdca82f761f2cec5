//! Request orchestration.
//!
//! A try-on moves through validation, a cache lookup and, on a miss, body
//! analysis, garment processing, fitting and compositing before the outcome
//! is recorded. Identical requests in flight at the same time share one
//! computation, and every computation runs under the configured time budget.

use {
    crate::{
        BodyMeasurements, CacheStats, EngineConfig, FabricPhysics, Fingerprint, GarmentCategory,
        InMemorySessionStore, MetricsRecorder, ProcessingMetrics, ResultCache, ResultMetadata,
        SessionRecord, SessionStore, SizeBucket, SizeRecommendation, SizeRecommender, TryOnError,
        TryOnRequest, TryOnResult, ValidatedRequest, compositor, fitting, garment, measurements,
        metrics::epoch_ms,
    },
    base::{Tensor, Vec2},
    futures_util::{
        FutureExt,
        future::{BoxFuture, Shared},
    },
    inference::{
        Inference, Landmark, LandmarkEstimator, RegionSegmenter, SilhouetteEstimator,
        SilhouetteSegmenter,
    },
    std::{
        collections::HashMap,
        fmt,
        sync::{
            Arc, Mutex,
            atomic::{AtomicBool, Ordering},
        },
        time::{Instant, SystemTime},
    },
};

type Outcome = Result<Arc<TryOnResult>, TryOnError>;
type Flight = Shared<BoxFuture<'static, Outcome>>;

/// What one computation produced besides the result itself.
struct Computed {
    result: TryOnResult,
    session: SessionRecord,
}

struct Inner {
    config: EngineConfig,
    estimator: Arc<dyn LandmarkEstimator>,
    segmenter: Arc<dyn RegionSegmenter>,
    cache: ResultCache,
    metrics: MetricsRecorder,
    sessions: Arc<dyn SessionStore>,
    sizing: SizeRecommender,
    ready: AtomicBool,
    inflight: Mutex<HashMap<Fingerprint, Flight>>,
}

/// The try-on engine. Build once at startup and clone freely; clones share
/// the cache, metrics and in-flight registry.
#[derive(Clone)]
pub struct Engine {
    inner: Arc<Inner>,
}

impl fmt::Debug for Engine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Engine")
            .field("estimator", &self.inner.estimator.name())
            .field("segmenter", &self.inner.segmenter.name())
            .field("ready", &self.is_ready())
            .field("cached", &self.inner.cache.len())
            .field("metrics", &self.inner.metrics.len())
            .finish()
    }
}

pub struct EngineBuilder {
    config: EngineConfig,
    estimator: Option<Arc<dyn LandmarkEstimator>>,
    segmenter: Option<Arc<dyn RegionSegmenter>>,
    sessions: Option<Arc<dyn SessionStore>>,
    cache: Option<ResultCache>,
    metrics: Option<MetricsRecorder>,
}

impl EngineBuilder {
    pub fn with_estimator(mut self, estimator: Arc<dyn LandmarkEstimator>) -> Self {
        self.estimator = Some(estimator);
        self
    }

    pub fn with_segmenter(mut self, segmenter: Arc<dyn RegionSegmenter>) -> Self {
        self.segmenter = Some(segmenter);
        self
    }

    pub fn with_session_store(mut self, sessions: Arc<dyn SessionStore>) -> Self {
        self.sessions = Some(sessions);
        self
    }

    pub fn with_cache(mut self, cache: ResultCache) -> Self {
        self.cache = Some(cache);
        self
    }

    pub fn with_metrics(mut self, metrics: MetricsRecorder) -> Self {
        self.metrics = Some(metrics);
        self
    }

    /// Backends not given explicitly come from the configured model paths,
    /// or the weight-free silhouette heuristics when no path is set.
    pub fn build(self) -> Result<Engine, TryOnError> {
        let config = self.config;

        let needs_device = (self.estimator.is_none() && config.landmark_model().is_some())
            || (self.segmenter.is_none() && config.segmentation_model().is_some());
        let device = if needs_device {
            Some(Inference::cpu()?)
        } else {
            None
        };

        let estimator: Arc<dyn LandmarkEstimator> = match (self.estimator, &device) {
            (Some(estimator), _) => estimator,
            (None, Some(inference)) if config.landmark_model().is_some() => {
                let path = config.landmark_model().cloned().unwrap_or_default();
                Arc::new(inference.use_landmark_net(path)?)
            }
            (None, _) => Arc::new(SilhouetteEstimator),
        };
        let segmenter: Arc<dyn RegionSegmenter> = match (self.segmenter, &device) {
            (Some(segmenter), _) => segmenter,
            (None, Some(inference)) if config.segmentation_model().is_some() => {
                let path = config.segmentation_model().cloned().unwrap_or_default();
                Arc::new(inference.use_segmentation_net(path)?)
            }
            (None, _) => Arc::new(SilhouetteSegmenter),
        };

        let sessions = self
            .sessions
            .unwrap_or_else(|| Arc::new(InMemorySessionStore::new()));
        let cache = self
            .cache
            .unwrap_or_else(|| ResultCache::new(config.cache_capacity(), config.cache_ttl()));
        let metrics = self
            .metrics
            .unwrap_or_else(|| MetricsRecorder::new(config.metrics_capacity()));

        log::info!(
            "try-on engine built: landmarks={}, segmentation={}, timeout={}ms",
            estimator.name(),
            segmenter.name(),
            config.request_timeout().as_millis()
        );

        Ok(Engine {
            inner: Arc::new(Inner {
                sizing: SizeRecommender::new(Arc::clone(&sessions)),
                config,
                estimator,
                segmenter,
                cache,
                metrics,
                sessions,
                ready: AtomicBool::new(false),
                inflight: Mutex::new(HashMap::new()),
            }),
        })
    }
}

impl Engine {
    pub fn builder(config: EngineConfig) -> EngineBuilder {
        EngineBuilder {
            config,
            estimator: None,
            segmenter: None,
            sessions: None,
            cache: None,
            metrics: None,
        }
    }

    /// Run both backends once on a blank frame, then accept requests.
    pub async fn initialize(&self) -> Result<(), TryOnError> {
        let size = self.inner.config.model_input();
        let blank = Tensor::<f32>::zeros(vec![size, size, 3])
            .map_err(|e| TryOnError::ProcessingFailure(format!("warmup tensor: {e}")))?;
        let blank = Arc::new(blank);

        let estimator = Arc::clone(&self.inner.estimator);
        let frame = Arc::clone(&blank);
        let landmarks = tokio::task::spawn_blocking(move || estimator.estimate(&frame));
        let segmenter = Arc::clone(&self.inner.segmenter);
        let mask = tokio::task::spawn_blocking(move || segmenter.segment(&blank));
        let (landmarks, mask) = tokio::join!(landmarks, mask);
        landmarks??;
        mask??;

        self.inner.ready.store(true, Ordering::Release);
        log::info!("try-on engine ready");
        Ok(())
    }

    pub fn is_ready(&self) -> bool {
        self.inner.ready.load(Ordering::Acquire)
    }

    pub fn config(&self) -> &EngineConfig {
        &self.inner.config
    }

    pub fn metrics(&self) -> &MetricsRecorder {
        &self.inner.metrics
    }

    pub fn cache_stats(&self) -> CacheStats {
        self.inner.cache.stats()
    }

    /// Advisory size suggestion from the user's session history.
    pub fn recommend_size(&self, user_id: &str, product_id: Option<&str>) -> SizeRecommendation {
        self.inner.sizing.recommend(user_id, product_id)
    }

    /// Produce (or fetch) the try-on result for `request`.
    pub async fn try_on(&self, request: TryOnRequest) -> Result<Arc<TryOnResult>, TryOnError> {
        let started = SystemTime::now();

        // Validation precedes the readiness check.
        let validated = match request.validate() {
            Ok(validated) => validated,
            Err(err) => return Err(self.inner.fail(started, err)),
        };

        if !self.is_ready() {
            return Err(self.inner.fail(started, TryOnError::EngineNotReady));
        }

        let fingerprint = Fingerprint::compute(
            &validated.user_id,
            validated.category,
            &validated.user_image,
            &validated.garment_image,
        );
        log::debug!("[{}] cache check", fingerprint.short());

        // Read under the registry lock; leaders fill the cache before leaving it.
        let flight = {
            let mut inflight = self.inner.inflight.lock().unwrap_or_else(|e| e.into_inner());
            if let Some(hit) = self.inner.cache.get(&fingerprint) {
                log::debug!("[{}] cache hit", fingerprint.short());
                return Ok(hit);
            }
            match inflight.get(&fingerprint) {
                Some(flight) => {
                    log::debug!("[{}] joining in-flight computation", fingerprint.short());
                    flight.clone()
                }
                None => {
                    let flight =
                        Arc::clone(&self.inner).launch(fingerprint.clone(), validated, started);
                    inflight.insert(fingerprint, flight.clone());
                    flight
                }
            }
        };

        flight.await
    }
}

/// Leaves the in-flight registry when the leader task ends. A task that
/// panicked or was cancelled before settling is recorded as a failure.
struct FlightGuard {
    inner: Arc<Inner>,
    fingerprint: Fingerprint,
    started: SystemTime,
    settled: bool,
}

impl Drop for FlightGuard {
    fn drop(&mut self) {
        if !self.settled {
            self.inner.fail(
                self.started,
                TryOnError::Unknown("computation aborted".to_string()),
            );
        }
        self.inner
            .inflight
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .remove(&self.fingerprint);
    }
}

impl Inner {
    /// Record a failure and hand the error back.
    fn fail(&self, started: SystemTime, err: TryOnError) -> TryOnError {
        log::warn!("try-on failed: {}", err);
        self.metrics
            .record(ProcessingMetrics::failure(started, SystemTime::now(), err.kind()));
        err
    }

    /// Spawn the computation for `fingerprint` so it runs to completion even
    /// if every caller goes away, and return a shareable handle to it.
    fn launch(
        self: Arc<Self>,
        fingerprint: Fingerprint,
        request: ValidatedRequest,
        started: SystemTime,
    ) -> Flight {
        let task = tokio::spawn(async move {
            let mut guard = FlightGuard {
                inner: Arc::clone(&self),
                fingerprint: fingerprint.clone(),
                started,
                settled: false,
            };
            let budget = self.config.request_timeout();
            let computation = self.compute(request, &fingerprint);
            let outcome = match tokio::time::timeout(budget, computation).await {
                Ok(outcome) => outcome,
                Err(_) => Err(TryOnError::Timeout(budget)),
            };

            let outcome = match outcome {
                Ok(computed) => {
                    let result = Arc::new(computed.result);
                    self.cache.insert(fingerprint.clone(), Arc::clone(&result));
                    if let Err(err) = self.sessions.append(computed.session) {
                        log::warn!("[{}] session not recorded: {}", fingerprint.short(), err);
                    }
                    self.metrics.record(ProcessingMetrics::success(
                        started,
                        SystemTime::now(),
                        self.config.latency_target(),
                    ));
                    log::info!(
                        "[{}] try-on done in {} ms (confidence {:.2})",
                        fingerprint.short(),
                        result.processing_time,
                        result.confidence
                    );
                    Ok(result)
                }
                Err(err) => Err(self.fail(started, err)),
            };

            guard.settled = true;
            outcome
        });

        task.map(|joined| match joined {
            Ok(outcome) => outcome,
            Err(err) => Err(TryOnError::from(err)),
        })
        .boxed()
        .shared()
    }

    async fn compute(
        &self,
        request: ValidatedRequest,
        fingerprint: &Fingerprint,
    ) -> Result<Computed, TryOnError> {
        let clock = Instant::now();
        let ValidatedRequest {
            user_image,
            garment_image,
            category,
            user_id,
            product_id,
        } = request;
        let tag = fingerprint.short();

        log::debug!("[{}] body analysis", tag);
        let subject_bytes = image::decode_payload(&user_image)?;
        drop(user_image);
        let garment_bytes = image::decode_payload(&garment_image)?;
        drop(garment_image);

        let subject = Arc::new(image::decode_image(&subject_bytes).await?);
        drop(subject_bytes);
        let (width, height) = (subject.width(), subject.height());

        let size = self.config.model_input();
        let source = Arc::clone(&subject);
        let (frame, letterbox) =
            tokio::task::spawn_blocking(move || image::to_model_tensor(&source, size)).await??;
        let frame = Arc::new(frame);

        let estimator = Arc::clone(&self.estimator);
        let input = Arc::clone(&frame);
        let landmarks = tokio::task::spawn_blocking(move || estimator.estimate(&input));
        let segmenter = Arc::clone(&self.segmenter);
        let mask = tokio::task::spawn_blocking(move || segmenter.segment(&frame));
        let (landmarks, mask) = tokio::join!(landmarks, mask);
        let landmarks = landmarks??;
        let mask_present = mask??.is_some();

        if landmarks.is_empty() {
            return Err(TryOnError::NoBodyDetected);
        }

        // back into subject coordinates
        let landmarks: Vec<Landmark> = landmarks
            .into_iter()
            .map(|l| {
                let p = letterbox.to_source(Vec2::new(l.x, l.y));
                Landmark {
                    x: p.x.clamp(0.0, 1.0),
                    y: p.y.clamp(0.0, 1.0),
                    ..l
                }
            })
            .collect();

        let body = measurements::compute(&landmarks, width, height);
        let detection = measurements::detection_confidence(&landmarks, mask_present);
        log::debug!(
            "[{}] {} landmarks, detection {:.2}",
            tag,
            landmarks.len(),
            detection
        );

        log::debug!("[{}] garment processing", tag);
        let processed =
            tokio::task::spawn_blocking(move || garment::process(&garment_bytes, category)).await??;

        log::debug!("[{}] fitting", tag);
        let fit = Fit::assess(&landmarks, &body, category, &processed, detection, width, height);

        log::debug!("[{}] compositing", tag);
        let placement = fit.placement;
        let result_image = tokio::task::spawn_blocking(move || {
            let composite = compositor::composite(&subject, &processed.normalized, placement)?;
            image::to_data_url(&composite).map_err(TryOnError::from)
        })
        .await??;

        let result = TryOnResult {
            result_image,
            confidence: fit.confidence,
            processing_time: clock.elapsed().as_millis() as u64,
            metadata: ResultMetadata {
                body_detected: true,
                garment_fit_score: fit.score,
                recommendations: fit.recommendations,
                fabric_physics: fit.physics,
                texture_quality: fit.texture_quality,
            },
        };
        let session = SessionRecord {
            user_id,
            product_id,
            category,
            size: fit.size,
            fit_score: fit.score,
            recorded_at: epoch_ms(SystemTime::now()),
        };
        Ok(Computed { result, session })
    }
}

/// Everything the fitting stage decides for one request.
struct Fit {
    placement: fitting::Placement,
    size: SizeBucket,
    score: f32,
    physics: FabricPhysics,
    texture_quality: f32,
    confidence: f32,
    recommendations: Vec<String>,
}

impl Fit {
    fn assess(
        landmarks: &[Landmark],
        body: &BodyMeasurements,
        category: GarmentCategory,
        garment: &garment::ProcessedGarment,
        detection: f32,
        width: usize,
        height: usize,
    ) -> Self {
        let variance = fitting::texture_variance(&garment.features);
        let score = fitting::fit_score(body, category, garment.size);
        Self {
            placement: fitting::placement(landmarks, category, width, height),
            size: garment.size,
            score,
            physics: fitting::fabric_physics(category, variance),
            texture_quality: fitting::texture_quality(variance),
            confidence: fitting::confidence(score, detection),
            recommendations: fitting::recommendations(body, garment.size),
        }
    }
}
