use crate::device_camera::interface::Frame;
use crate::image_classifier::interface::{ClassifyError, ImageClassifier};
use crate::image_classifier::model_config::ModelConfig;
use crate::image_classifier::preprocess::frame_to_tensor;
use crate::library::logger::interface::Logger;
use std::sync::{Arc, OnceLock};
use tract_onnx::prelude::*;

type TractPlan = SimplePlan<TypedFact, Box<dyn TypedOp>, TypedModel>;

pub struct ImageClassifierTractOnnx {
    config: ModelConfig,
    plan: OnceLock<TractPlan>,
    logger: Arc<dyn Logger + Send + Sync>,
}

impl ImageClassifierTractOnnx {
    pub fn new(config: ModelConfig, logger: Arc<dyn Logger + Send + Sync>) -> Self {
        Self {
            config,
            plan: OnceLock::new(),
            logger: logger.with_namespace("image_classifier").with_namespace("tract_onnx"),
        }
    }
}

impl ImageClassifier for ImageClassifierTractOnnx {
    fn load(&self) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
        if self.plan.get().is_some() {
            return Ok(());
        }

        self.logger.info(&format!(
            "Loading model from {}...",
            self.config.onnx_model_path
        ))?;

        let (height, width) = self.config.input_shape;
        let plan = tract_onnx::onnx()
            .model_for_path(&self.config.onnx_model_path)?
            .with_input_fact(0, f32::fact([1, height as usize, width as usize, 3]).into())?
            .into_optimized()?
            .into_runnable()?;

        // A concurrent load may have won; its plan is equivalent.
        let _ = self.plan.set(plan);

        self.logger.info("Model loaded")?;
        Ok(())
    }

    fn is_loaded(&self) -> bool {
        self.plan.get().is_some()
    }

    fn infer(&self, frame: &Frame) -> Result<Vec<f32>, Box<dyn std::error::Error + Send + Sync>> {
        let plan = self.plan.get().ok_or(ClassifyError::ModelNotLoaded)?;

        let input = frame_to_tensor(frame, self.config.capture_size, self.config.input_shape);
        let outputs = plan.run(tvec!(input.into_tvalue()))?;
        let output = outputs[0].to_array_view::<f32>()?;

        Ok(output.iter().copied().collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::library::logger::impl_fake::LoggerFake;
    use image::{Rgb, RgbImage};

    fn missing_model_classifier() -> ImageClassifierTractOnnx {
        ImageClassifierTractOnnx::new(
            ModelConfig {
                onnx_model_path: "./does/not/exist/model.onnx".to_string(),
                capture_size: 400,
                input_shape: (224, 224),
            },
            Arc::new(LoggerFake::new()),
        )
    }

    #[test]
    fn test_missing_model_fails_to_load() {
        let classifier = missing_model_classifier();

        assert!(classifier.load().is_err());
        assert!(!classifier.is_loaded());
    }

    #[test]
    fn test_infer_before_load_is_rejected() {
        let classifier = missing_model_classifier();
        let frame = Frame::new(RgbImage::from_pixel(400, 400, Rgb([0, 0, 0])));

        let error = classifier.infer(&frame).unwrap_err();

        assert_eq!(error.to_string(), ClassifyError::ModelNotLoaded.to_string());
    }
}
