use crate::device_camera::interface::FacingMode;
use crate::image_classifier::model_config::ModelConfig;
use chrono::Offset;
use std::time::Duration;

pub const CAPTURE_SIZE: u32 = 400;
pub const MODEL_INPUT_SIZE: u32 = 224;

#[derive(Debug, Clone)]
pub struct Config {
    pub model: ModelConfig,
    pub facing_mode: FacingMode,
    pub front_camera_index: u32,
    pub back_camera_index: u32,
    pub preview_frame_interval: Duration,
    pub logger_timezone: chrono::FixedOffset,
    pub window_size: [f32; 2],
}

impl Default for Config {
    fn default() -> Self {
        Self {
            model: ModelConfig {
                onnx_model_path: "models/model.onnx".to_string(),
                capture_size: CAPTURE_SIZE,
                input_shape: (MODEL_INPUT_SIZE, MODEL_INPUT_SIZE),
            },
            facing_mode: FacingMode::Environment,
            front_camera_index: 0,
            back_camera_index: 1,
            preview_frame_interval: Duration::from_millis(33),
            logger_timezone: local_timezone(),
            window_size: [480.0, 760.0],
        }
    }
}

fn local_timezone() -> chrono::FixedOffset {
    chrono::Local::now().offset().fix()
}
