use crate::device_camera::interface::{
    stop_and_report, CameraStream, DeviceCamera, FacingMode, Frame,
};
use crate::library::logger::interface::Logger;
use nokhwa::pixel_format::RgbFormat;
use nokhwa::utils::{
    ApiBackend, CameraFormat, CameraIndex, FrameFormat, RequestedFormat, RequestedFormatType,
    Resolution,
};
use nokhwa::Camera;
use std::sync::Arc;

const FRAME_RATE: u32 = 30;

/// Webcam backed by nokhwa. Facing modes map onto device indices because
/// desktop capture APIs do not report which way a camera points.
pub struct DeviceCameraNokhwa {
    front_index: u32,
    back_index: u32,
    logger: Arc<dyn Logger + Send + Sync>,
}

impl DeviceCameraNokhwa {
    pub fn new(front_index: u32, back_index: u32, logger: Arc<dyn Logger + Send + Sync>) -> Self {
        Self {
            front_index,
            back_index,
            logger: logger.with_namespace("camera").with_namespace("nokhwa"),
        }
    }

    fn index_for(&self, facing_mode: FacingMode) -> u32 {
        match facing_mode {
            FacingMode::User => self.front_index,
            FacingMode::Environment => self.back_index,
        }
    }
}

impl DeviceCamera for DeviceCameraNokhwa {
    fn open(
        &self,
        facing_mode: FacingMode,
        width: u32,
        height: u32,
    ) -> Result<Box<dyn CameraStream>, Box<dyn std::error::Error + Send + Sync>> {
        let index = self.index_for(facing_mode);
        let format = RequestedFormat::new::<RgbFormat>(RequestedFormatType::Closest(
            CameraFormat::new(Resolution::new(width, height), FrameFormat::MJPEG, FRAME_RATE),
        ));

        let mut camera = Camera::new(CameraIndex::Index(index), format)?;
        camera.open_stream()?;

        self.logger.info(&format!(
            "Opened {} camera (device {}) at {}",
            facing_mode,
            index,
            camera.resolution()
        ))?;

        Ok(Box::new(CameraStreamNokhwa {
            camera,
            stopped: false,
            logger: self.logger.clone(),
        }))
    }
}

struct CameraStreamNokhwa {
    camera: Camera,
    stopped: bool,
    logger: Arc<dyn Logger + Send + Sync>,
}

impl CameraStream for CameraStreamNokhwa {
    fn capture_frame(&mut self) -> Result<Frame, Box<dyn std::error::Error + Send + Sync>> {
        let buffer = self.camera.frame()?;
        let decoded = buffer.decode_image::<RgbFormat>()?;
        let (width, height) = (decoded.width(), decoded.height());
        Frame::from_raw(width, height, decoded.into_raw())
    }

    fn stop(&mut self) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
        if !self.stopped {
            self.camera.stop_stream()?;
            self.stopped = true;
        }
        Ok(())
    }
}

impl Drop for CameraStreamNokhwa {
    fn drop(&mut self) {
        let logger = self.logger.clone();
        stop_and_report(self, logger.as_ref());
    }
}

pub fn list_cameras() -> Result<Vec<String>, Box<dyn std::error::Error + Send + Sync>> {
    let cameras = nokhwa::query(ApiBackend::Auto)?;
    Ok(cameras
        .iter()
        .map(|camera| format!("{:<5} | {}", camera.index(), camera.human_name()))
        .collect())
}
