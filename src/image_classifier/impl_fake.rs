use crate::device_camera::interface::Frame;
use crate::image_classifier::interface::{ImageClassifier, FLOWER_LABELS};
use crate::library::logger::interface::Logger;
use rand::distr::{Distribution, Uniform};
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

/// Stands in for a real model. Returns scripted scores when given, otherwise
/// a random probability vector.
pub struct ImageClassifierFake {
    logger: Arc<dyn Logger + Send + Sync>,
    scores: Option<Vec<f32>>,
    load_error: Option<String>,
    infer_delay: Duration,
    loaded: AtomicBool,
    infer_calls: AtomicUsize,
    in_flight: AtomicUsize,
    max_in_flight: AtomicUsize,
}

impl ImageClassifierFake {
    pub fn new(logger: Arc<dyn Logger + Send + Sync>) -> Self {
        Self {
            logger: logger.with_namespace("image_classifier").with_namespace("fake"),
            scores: None,
            load_error: None,
            infer_delay: Duration::ZERO,
            loaded: AtomicBool::new(false),
            infer_calls: AtomicUsize::new(0),
            in_flight: AtomicUsize::new(0),
            max_in_flight: AtomicUsize::new(0),
        }
    }

    #[allow(dead_code)]
    pub fn with_scores(mut self, scores: Vec<f32>) -> Self {
        self.scores = Some(scores);
        self
    }

    #[allow(dead_code)]
    pub fn with_load_error(mut self, message: &str) -> Self {
        self.load_error = Some(message.to_string());
        self
    }

    #[allow(dead_code)]
    pub fn with_infer_delay(mut self, delay: Duration) -> Self {
        self.infer_delay = delay;
        self
    }

    #[allow(dead_code)]
    pub fn infer_calls(&self) -> usize {
        self.infer_calls.load(Ordering::SeqCst)
    }

    #[allow(dead_code)]
    pub fn max_in_flight(&self) -> usize {
        self.max_in_flight.load(Ordering::SeqCst)
    }

    fn random_scores(&self) -> Result<Vec<f32>, Box<dyn std::error::Error + Send + Sync>> {
        let mut rng = rand::rng();
        let weight_dist = Uniform::new(0.0f32, 1.0)?;

        let weights: Vec<f32> = (0..FLOWER_LABELS.len())
            .map(|_| weight_dist.sample(&mut rng))
            .collect();
        let total: f32 = weights.iter().sum();

        if total <= f32::EPSILON {
            let even = 1.0 / FLOWER_LABELS.len() as f32;
            return Ok(vec![even; FLOWER_LABELS.len()]);
        }

        Ok(weights.iter().map(|w| w / total).collect())
    }
}

impl ImageClassifier for ImageClassifierFake {
    fn load(&self) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
        self.logger.info("Loading model...")?;
        if let Some(message) = &self.load_error {
            return Err(message.clone().into());
        }
        self.loaded.store(true, Ordering::SeqCst);
        self.logger.info("Model loaded")?;
        Ok(())
    }

    fn is_loaded(&self) -> bool {
        self.loaded.load(Ordering::SeqCst)
    }

    fn infer(&self, frame: &Frame) -> Result<Vec<f32>, Box<dyn std::error::Error + Send + Sync>> {
        self.logger.info(&format!(
            "Classifying {}x{} frame with fake classifier...",
            frame.width(),
            frame.height()
        ))?;

        self.infer_calls.fetch_add(1, Ordering::SeqCst);
        let in_flight = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        self.max_in_flight.fetch_max(in_flight, Ordering::SeqCst);

        if !self.infer_delay.is_zero() {
            std::thread::sleep(self.infer_delay);
        }

        let scores = match &self.scores {
            Some(scores) => Ok(scores.clone()),
            None => self.random_scores(),
        };

        self.in_flight.fetch_sub(1, Ordering::SeqCst);
        scores
    }
}
