use crate::config::Config;
use crate::device_camera::capture_surface::{CameraCommand, CaptureSurfaceWorker, LatestFrame};
use crate::device_camera::interface::DeviceCamera;
use crate::flower_recognizer::core::{Effect, Event};
use crate::image_classifier::interface::{ClassifyError, ImageClassifier};
use crate::image_classifier::pipeline::classify;
use crate::library::logger::interface::Logger;
use std::sync::mpsc::Sender;
use std::sync::Arc;

#[derive(Clone)]
pub struct RunEffect {
    logger: Arc<dyn Logger + Send + Sync>,
    image_classifier: Arc<dyn ImageClassifier + Send + Sync>,
    capture_surface: Arc<CaptureSurfaceWorker>,
    event_sender: Sender<Event>,
}

impl RunEffect {
    pub fn new(
        config: &Config,
        logger: Arc<dyn Logger + Send + Sync>,
        device_camera: Arc<dyn DeviceCamera + Send + Sync>,
        image_classifier: Arc<dyn ImageClassifier + Send + Sync>,
        latest_frame: LatestFrame,
        event_sender: Sender<Event>,
    ) -> Self {
        let acquire_sender = event_sender.clone();
        let capture_surface = CaptureSurfaceWorker::spawn(
            device_camera,
            config.model.capture_size,
            config.model.capture_size,
            config.preview_frame_interval,
            latest_frame,
            logger.clone(),
            move |request, facing_mode, result| {
                let _ = acquire_sender.send(Event::StreamAcquireDone {
                    request,
                    facing_mode,
                    result,
                });
            },
        );

        Self {
            logger,
            image_classifier,
            capture_surface: Arc::new(capture_surface),
            event_sender,
        }
    }

    pub fn run_effects(&self, effects: Vec<Effect>) {
        for effect in effects {
            self.run_effect(effect);
        }
    }

    pub fn run_effect(&self, effect: Effect) {
        let _ = self.logger.info(&format!("Running effect: {:?}", effect));

        match effect {
            Effect::LoadClassifier => {
                let run_effect = self.clone();
                std::thread::spawn(move || {
                    let loaded = run_effect.image_classifier.load();
                    if let Err(e) = &loaded {
                        let _ = run_effect
                            .logger
                            .error(&format!("Error loading model: {}", e));
                    }
                    let _ = run_effect
                        .event_sender
                        .send(Event::ClassifierLoadDone(loaded));
                });
            }
            Effect::AcquireStream {
                request,
                facing_mode,
            } => {
                if let Err(e) = self.capture_surface.send(CameraCommand::Acquire {
                    request,
                    facing_mode,
                }) {
                    let _ = self.event_sender.send(Event::StreamAcquireDone {
                        request,
                        facing_mode,
                        result: Err(e),
                    });
                }
            }
            Effect::Classify => {
                let run_effect = self.clone();
                std::thread::spawn(move || {
                    let outcome = match run_effect.capture_surface.snapshot() {
                        Some(frame) => classify(run_effect.image_classifier.as_ref(), &frame),
                        None => Err(ClassifyError::NoFrame.into()),
                    };
                    if let Err(e) = &outcome {
                        let _ = run_effect
                            .logger
                            .error(&format!("Error classifying frame: {}", e));
                    }
                    let _ = run_effect.event_sender.send(Event::ClassifyDone(outcome));
                });
            }
        }
    }
}
