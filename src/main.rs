use clap::Parser;
use config::Config;
use device_camera::impl_fake::DeviceCameraFake;
use device_camera::impl_nokhwa::{list_cameras, DeviceCameraNokhwa};
use device_camera::interface::{DeviceCamera, FacingMode};
use flower_recognizer::main::FlowerRecognizer;
use image_classifier::impl_fake::ImageClassifierFake;
use image_classifier::impl_tract_onnx::ImageClassifierTractOnnx;
use image_classifier::interface::ImageClassifier;
use library::logger::impl_console::LoggerConsole;
use library::logger::interface::Logger;
use std::sync::Arc;

mod config;
mod device_camera;
mod device_display;
mod flower_recognizer;
mod image_classifier;
mod library;

#[derive(Parser, Debug)]
#[command(name = "flower-recognizer", about = "Recognize flowers seen by a camera")]
struct Args {
    /// Path to the ONNX model
    #[arg(long)]
    model: Option<String>,

    /// Camera to start with
    #[arg(long, value_enum)]
    facing_mode: Option<FacingMode>,

    /// Device index of the user-facing camera
    #[arg(long)]
    front_camera: Option<u32>,

    /// Device index of the environment-facing camera
    #[arg(long)]
    back_camera: Option<u32>,

    /// Use a synthetic camera and a random classifier
    #[arg(long)]
    fake: bool,

    /// Print available cameras and exit
    #[arg(long)]
    list_cameras: bool,
}

impl Args {
    fn apply(&self, mut config: Config) -> Config {
        if let Some(model) = &self.model {
            config.model.onnx_model_path = model.clone();
        }
        if let Some(facing_mode) = self.facing_mode {
            config.facing_mode = facing_mode;
        }
        if let Some(index) = self.front_camera {
            config.front_camera_index = index;
        }
        if let Some(index) = self.back_camera {
            config.back_camera_index = index;
        }
        config
    }
}

fn main() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    let args = Args::parse();

    if args.list_cameras {
        for camera in list_cameras()? {
            println!("{}", camera);
        }
        return Ok(());
    }

    let config = args.apply(Config::default());

    let logger: Arc<dyn Logger + Send + Sync> = Arc::new(LoggerConsole::new(config.logger_timezone));

    let device_camera: Arc<dyn DeviceCamera + Send + Sync> = if args.fake {
        Arc::new(DeviceCameraFake::new(logger.clone()))
    } else {
        Arc::new(DeviceCameraNokhwa::new(
            config.front_camera_index,
            config.back_camera_index,
            logger.clone(),
        ))
    };

    let image_classifier: Arc<dyn ImageClassifier + Send + Sync> = if args.fake {
        Arc::new(ImageClassifierFake::new(logger.clone()))
    } else {
        Arc::new(ImageClassifierTractOnnx::new(
            config.model.clone(),
            logger.clone(),
        ))
    };

    let recognizer = FlowerRecognizer::new(
        config.clone(),
        logger.clone(),
        device_camera,
        image_classifier,
    );

    device_display::impl_gui::run(&config, recognizer)?;

    logger.info("Window closed")?;

    Ok(())
}
