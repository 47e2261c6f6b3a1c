use crate::library::logger::interface::Logger;
use image::RgbImage;
use std::sync::Arc;

/// Which physical camera to use: the one facing the user or the one facing away.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, clap::ValueEnum)]
pub enum FacingMode {
    User,
    #[default]
    Environment,
}

impl FacingMode {
    pub fn toggle(self) -> Self {
        match self {
            FacingMode::User => FacingMode::Environment,
            FacingMode::Environment => FacingMode::User,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            FacingMode::User => "user",
            FacingMode::Environment => "environment",
        }
    }
}

impl std::fmt::Display for FacingMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One RGB frame pulled from a live stream. Cloning is cheap.
#[derive(Debug, Clone, PartialEq)]
pub struct Frame {
    image: Arc<RgbImage>,
}

impl Frame {
    pub fn new(image: RgbImage) -> Self {
        Self {
            image: Arc::new(image),
        }
    }

    pub fn from_raw(
        width: u32,
        height: u32,
        pixels: Vec<u8>,
    ) -> Result<Self, Box<dyn std::error::Error + Send + Sync>> {
        let image = RgbImage::from_raw(width, height, pixels).ok_or_else(|| {
            format!(
                "frame buffer does not match {}x{} RGB dimensions",
                width, height
            )
        })?;
        Ok(Self::new(image))
    }

    pub fn image(&self) -> &RgbImage {
        &self.image
    }

    pub fn width(&self) -> u32 {
        self.image.width()
    }

    pub fn height(&self) -> u32 {
        self.image.height()
    }
}

/// An open device stream. Dropping it must release the device.
pub trait CameraStream {
    fn capture_frame(&mut self) -> Result<Frame, Box<dyn std::error::Error + Send + Sync>>;
    fn stop(&mut self) -> Result<(), Box<dyn std::error::Error + Send + Sync>>;
}

pub trait DeviceCamera {
    fn open(
        &self,
        facing_mode: FacingMode,
        width: u32,
        height: u32,
    ) -> Result<Box<dyn CameraStream>, Box<dyn std::error::Error + Send + Sync>>;
}

/// Stops `stream` from a `Drop` impl, logging a failure instead of returning it.
pub fn stop_and_report(stream: &mut dyn CameraStream, logger: &dyn Logger) {
    if let Err(e) = stream.stop() {
        let _ = logger.error(&format!("Failed to stop camera stream: {}", e));
    }
}
