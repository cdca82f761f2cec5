use {
    crate::{SessionStore, SizeBucket},
    serde::Serialize,
    std::sync::Arc,
};

/// Sessions above this fit score count as evidence for their size.
pub const GOOD_FIT: f32 = 0.7;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SizeRecommendation {
    #[serde(rename = "recommendedSize")]
    pub size: SizeBucket,
    pub confidence: f32,
    pub reasoning: Vec<String>,
}

impl SizeRecommendation {
    fn neutral() -> Self {
        Self {
            size: SizeBucket::M,
            confidence: 0.5,
            reasoning: vec![
                "Not enough try-on history yet; M is the most common fit.".to_string(),
            ],
        }
    }
}

/// Suggests a size from a user's past well-fitting try-ons. Advisory only:
/// it never fails and falls back to a neutral suggestion.
#[derive(Clone)]
pub struct SizeRecommender {
    store: Arc<dyn SessionStore>,
}

impl SizeRecommender {
    pub fn new(store: Arc<dyn SessionStore>) -> Self {
        Self { store }
    }

    pub fn recommend(&self, user_id: &str, product_id: Option<&str>) -> SizeRecommendation {
        let history = match self.store.history(user_id) {
            Ok(history) => history,
            Err(err) => {
                log::warn!("size history unavailable for {}: {}", user_id, err);
                return SizeRecommendation::neutral();
            }
        };

        // tally in first-seen order so ties go to the earliest size
        let mut tally: Vec<(SizeBucket, usize)> = Vec::new();
        for record in history.iter().filter(|r| r.fit_score > GOOD_FIT) {
            match tally.iter_mut().find(|(size, _)| *size == record.size) {
                Some((_, count)) => *count += 1,
                None => tally.push((record.size, 1)),
            }
        }

        let best = tally
            .iter()
            .fold(None, |best: Option<(SizeBucket, usize)>, &(size, count)| match best {
                Some((_, top)) if top >= count => best,
                _ => Some((size, count)),
            });

        let Some((size, count)) = best else {
            return SizeRecommendation::neutral();
        };

        let confidence = (count as f32 / history.len() as f32).min(1.0);
        let mut reasoning = vec![format!(
            "{} of your {} previous try-ons fit well in size {}.",
            count,
            history.len(),
            size
        )];
        if let Some(product) = product_id {
            reasoning.push(format!(
                "Based on your overall history; no fit data specific to {product} yet."
            ));
        }
        log::debug!(
            "size recommendation for {}: {} ({:.2})",
            user_id,
            size,
            confidence
        );
        SizeRecommendation {
            size,
            confidence,
            reasoning,
        }
    }
}
