use crate::config::Config;
use crate::device_camera::capture_surface::LatestFrame;
use crate::device_camera::interface::DeviceCamera;
use crate::flower_recognizer::core::{init, transition, Event, Model, ModelCamera};
use crate::flower_recognizer::run_effect::RunEffect;
use crate::image_classifier::interface::ImageClassifier;
use crate::library::logger::interface::Logger;
use std::sync::mpsc::{channel, Receiver};
use std::sync::Arc;

/// Owns the application model. UI events go through `dispatch`; results of
/// background effects are queued and applied by `process_pending`.
pub struct FlowerRecognizer {
    config: Config,
    logger: Arc<dyn Logger + Send + Sync>,
    model: Model,
    latest_frame: LatestFrame,
    run_effect: RunEffect,
    event_receiver: Receiver<Event>,
}

impl FlowerRecognizer {
    pub fn new(
        config: Config,
        logger: Arc<dyn Logger + Send + Sync>,
        device_camera: Arc<dyn DeviceCamera + Send + Sync>,
        image_classifier: Arc<dyn ImageClassifier + Send + Sync>,
    ) -> Self {
        let logger = logger.with_namespace("flower_recognizer");
        let (event_sender, event_receiver) = channel();
        let latest_frame = LatestFrame::new();

        let run_effect = RunEffect::new(
            &config,
            logger.clone(),
            device_camera,
            image_classifier,
            latest_frame.clone(),
            event_sender,
        );

        let (model, effects) = init(&config);
        let _ = logger.info(&format!(
            "\ninit model:\n\t{:?}\n\neffects:\n\t{:?}",
            model, effects
        ));
        run_effect.run_effects(effects);

        Self {
            config,
            logger,
            model,
            latest_frame,
            run_effect,
            event_receiver,
        }
    }

    pub fn model(&self) -> &Model {
        &self.model
    }

    /// Frames for the live preview. Empty unless the camera is live.
    pub fn latest_frame(&self) -> &LatestFrame {
        &self.latest_frame
    }

    pub fn dispatch(&mut self, event: Event) {
        let _ = self.logger.info(&format!(
            "\nold model:\n\t{:?}\n\nevent:\n\t{:?}",
            self.model, event,
        ));

        let (new_model, effects) = transition(&self.config, self.model.clone(), event);

        if let ModelCamera::Unavailable(reason) = &new_model.camera {
            if self.model.camera != new_model.camera {
                let _ = self
                    .logger
                    .error(&format!("Error accessing camera: {}", reason));
            }
        }

        let _ = self.logger.info(&format!(
            "\nnew model:\n\t{:?}\n\neffects:\n\t{:?}",
            new_model, effects
        ));

        self.model = new_model;
        self.run_effect.run_effects(effects);
    }

    /// Applies every queued background result. Returns how many were applied.
    pub fn process_pending(&mut self) -> usize {
        let mut processed = 0;
        while let Ok(event) = self.event_receiver.try_recv() {
            self.dispatch(event);
            processed += 1;
        }
        processed
    }

    #[cfg(test)]
    pub fn process_until(
        &mut self,
        timeout: std::time::Duration,
        done: impl Fn(&Model) -> bool,
    ) -> bool {
        let deadline = std::time::Instant::now() + timeout;
        loop {
            if done(&self.model) {
                return true;
            }
            let now = std::time::Instant::now();
            if now >= deadline {
                return false;
            }
            match self.event_receiver.recv_timeout(deadline - now) {
                Ok(event) => self.dispatch(event),
                Err(_) => return done(&self.model),
            }
        }
    }
}
