use crate::config::Config;
use crate::device_camera::impl_fake::DeviceCameraFake;
use crate::image_classifier::model_config::ModelConfig;
use crate::flower_recognizer::main::FlowerRecognizer;
use crate::image_classifier::impl_fake::ImageClassifierFake;
use crate::library::logger::impl_fake::LoggerFake;
use std::sync::Arc;
use std::time::Duration;

pub const TIMEOUT: Duration = Duration::from_secs(5);

#[allow(dead_code)]
pub struct Fixture {
    pub config: Config,
    pub logger: LoggerFake,
    pub device_camera: Arc<DeviceCameraFake>,
    pub image_classifier: Arc<ImageClassifierFake>,
    pub recognizer: FlowerRecognizer,
}

impl Fixture {
    pub fn new() -> Self {
        let logger = LoggerFake::new();
        let classifier = ImageClassifierFake::new(Arc::new(logger.clone()));
        Self::build(logger, classifier, |_| {}, |config| config)
    }

    pub fn with_classifier(
        configure: impl FnOnce(ImageClassifierFake) -> ImageClassifierFake,
    ) -> Self {
        let logger = LoggerFake::new();
        let classifier = configure(ImageClassifierFake::new(Arc::new(logger.clone())));
        Self::build(logger, classifier, |_| {}, |config| config)
    }

    pub fn with_denied_camera() -> Self {
        Self::with_camera(|camera| camera.set_denied(true))
    }

    pub fn with_camera(configure: impl FnOnce(&DeviceCameraFake)) -> Self {
        let logger = LoggerFake::new();
        let classifier = ImageClassifierFake::new(Arc::new(logger.clone()));
        Self::build(logger, classifier, configure, |config| config)
    }

    pub fn with_capture_size(capture_size: u32) -> Self {
        let logger = LoggerFake::new();
        let classifier = ImageClassifierFake::new(Arc::new(logger.clone()));
        Self::build(logger, classifier, |_| {}, |config| Config {
            model: ModelConfig {
                capture_size,
                ..config.model
            },
            ..config
        })
    }

    fn build(
        logger: LoggerFake,
        classifier: ImageClassifierFake,
        configure_camera: impl FnOnce(&DeviceCameraFake),
        configure_config: impl FnOnce(Config) -> Config,
    ) -> Self {
        let config = configure_config(Config {
            preview_frame_interval: Duration::from_millis(5),
            ..Config::default()
        });
        let device_camera = Arc::new(DeviceCameraFake::new(Arc::new(logger.clone())));
        configure_camera(&device_camera);
        let image_classifier = Arc::new(classifier);

        let recognizer = FlowerRecognizer::new(
            config.clone(),
            Arc::new(logger.clone()),
            device_camera.clone(),
            image_classifier.clone(),
        );

        Self {
            config,
            logger,
            device_camera,
            image_classifier,
            recognizer,
        }
    }

    /// Waits until startup has settled: model loaded or failed, stream live or unavailable.
    pub fn wait_for_startup(&mut self) -> bool {
        use crate::flower_recognizer::core::{ModelCamera, ModelClassifier};

        self.recognizer.process_until(TIMEOUT, |model| {
            model.classifier != ModelClassifier::Loading && model.camera != ModelCamera::Acquiring
        })
    }
}
