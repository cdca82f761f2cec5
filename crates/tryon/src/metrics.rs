use {
    serde::Serialize,
    std::{
        collections::VecDeque,
        sync::Mutex,
        time::{Duration, SystemTime, UNIX_EPOCH},
    },
};

/// Milliseconds since the UNIX epoch.
pub fn epoch_ms(time: SystemTime) -> u64 {
    time.duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis() as u64)
        .unwrap_or(0)
}

/// Outcome of one processed request.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProcessingMetrics {
    pub start_time: u64,
    pub end_time: u64,
    pub success: bool,
    pub error_kind: Option<String>,
    pub performance_score: f32,
}

impl ProcessingMetrics {
    /// A successful run, scored linearly from 1 (instant) down to 0 at
    /// `latency_target`.
    pub fn success(start: SystemTime, end: SystemTime, latency_target: Duration) -> Self {
        let elapsed = end.duration_since(start).unwrap_or_default();
        let target = latency_target.as_secs_f32();
        let score = if target > 0.0 {
            (1.0 - elapsed.as_secs_f32() / target).clamp(0.0, 1.0)
        } else {
            0.0
        };
        Self {
            start_time: epoch_ms(start),
            end_time: epoch_ms(end),
            success: true,
            error_kind: None,
            performance_score: score,
        }
    }

    pub fn failure(start: SystemTime, end: SystemTime, kind: &str) -> Self {
        Self {
            start_time: epoch_ms(start),
            end_time: epoch_ms(end),
            success: false,
            error_kind: Some(kind.to_string()),
            performance_score: 0.0,
        }
    }

    pub fn duration_ms(&self) -> u64 {
        self.end_time.saturating_sub(self.start_time)
    }
}

/// Aggregate over the records currently held.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MetricsSummary {
    pub count: usize,
    pub success_rate: f32,
    pub mean_processing_ms: f32,
    pub mean_performance: f32,
}

/// Fixed-capacity ring of the most recent processing records. The oldest
/// record goes first when full.
#[derive(Debug)]
pub struct MetricsRecorder {
    capacity: usize,
    records: Mutex<VecDeque<ProcessingMetrics>>,
}

impl MetricsRecorder {
    pub fn new(capacity: usize) -> Self {
        Self {
            capacity,
            records: Mutex::new(VecDeque::with_capacity(capacity)),
        }
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, VecDeque<ProcessingMetrics>> {
        self.records.lock().unwrap_or_else(|e| e.into_inner())
    }

    pub fn record(&self, metrics: ProcessingMetrics) {
        if self.capacity == 0 {
            return;
        }
        let mut records = self.lock();
        while records.len() >= self.capacity {
            records.pop_front();
        }
        records.push_back(metrics);
    }

    /// Copy of the held records, oldest first.
    pub fn snapshot(&self) -> Vec<ProcessingMetrics> {
        self.lock().iter().cloned().collect()
    }

    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn summary(&self) -> MetricsSummary {
        let records = self.lock();
        let count = records.len();
        if count == 0 {
            return MetricsSummary {
                count: 0,
                success_rate: 0.0,
                mean_processing_ms: 0.0,
                mean_performance: 0.0,
            };
        }
        let n = count as f32;
        let successes = records.iter().filter(|r| r.success).count() as f32;
        let total_ms: f32 = records.iter().map(|r| r.duration_ms() as f32).sum();
        let total_perf: f32 = records.iter().map(|r| r.performance_score).sum();
        MetricsSummary {
            count,
            success_rate: successes / n,
            mean_processing_ms: total_ms / n,
            mean_performance: total_perf / n,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn at(ms: u64) -> SystemTime {
        UNIX_EPOCH + Duration::from_millis(ms)
    }

    #[test]
    fn test_ring_drops_oldest() {
        let recorder = MetricsRecorder::new(1000);
        for i in 0..1001u64 {
            recorder.record(ProcessingMetrics::failure(at(i), at(i + 1), "unknown"));
        }
        assert_eq!(recorder.len(), 1000);
        let records = recorder.snapshot();
        assert_eq!(records[0].start_time, 1);
        assert_eq!(records[999].start_time, 1000);
        assert!(records.iter().all(|r| r.start_time != 0));
    }

    #[test]
    fn test_performance_score() {
        let target = Duration::from_millis(3000);
        let fast = ProcessingMetrics::success(at(0), at(750), target);
        assert!((fast.performance_score - 0.75).abs() < 1e-6);
        let slow = ProcessingMetrics::success(at(0), at(9000), target);
        assert_eq!(slow.performance_score, 0.0);
        let failed = ProcessingMetrics::failure(at(0), at(10), "timeout");
        assert_eq!(failed.performance_score, 0.0);
        assert_eq!(failed.error_kind.as_deref(), Some("timeout"));
    }

    #[test]
    fn test_summary() {
        let recorder = MetricsRecorder::new(10);
        assert_eq!(recorder.summary().count, 0);
        let target = Duration::from_millis(1000);
        recorder.record(ProcessingMetrics::success(at(0), at(500), target));
        recorder.record(ProcessingMetrics::failure(at(0), at(100), "no_body_detected"));
        let summary = recorder.summary();
        assert_eq!(summary.count, 2);
        assert_eq!(summary.success_rate, 0.5);
        assert_eq!(summary.mean_processing_ms, 300.0);
        assert!((summary.mean_performance - 0.25).abs() < 1e-6);
    }
}
