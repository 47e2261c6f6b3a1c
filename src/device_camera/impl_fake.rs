use crate::device_camera::interface::{CameraStream, DeviceCamera, FacingMode, Frame};
use crate::library::logger::interface::Logger;
use image::{Rgb, RgbImage};
use std::sync::atomic::{AtomicBool, AtomicU64, AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

#[derive(Debug, Default)]
pub struct CameraStats {
    opened: AtomicUsize,
    released: AtomicUsize,
    live: AtomicUsize,
    max_live: AtomicUsize,
}

#[allow(dead_code)]
impl CameraStats {
    pub fn opened(&self) -> usize {
        self.opened.load(Ordering::SeqCst)
    }

    pub fn released(&self) -> usize {
        self.released.load(Ordering::SeqCst)
    }

    pub fn live(&self) -> usize {
        self.live.load(Ordering::SeqCst)
    }

    pub fn max_live(&self) -> usize {
        self.max_live.load(Ordering::SeqCst)
    }

    fn record_open(&self) {
        self.opened.fetch_add(1, Ordering::SeqCst);
        let live = self.live.fetch_add(1, Ordering::SeqCst) + 1;
        self.max_live.fetch_max(live, Ordering::SeqCst);
    }

    fn record_release(&self) {
        self.released.fetch_add(1, Ordering::SeqCst);
        self.live.fetch_sub(1, Ordering::SeqCst);
    }
}

/// Synthetic camera. Each facing mode yields a solid frame of its own color.
pub struct DeviceCameraFake {
    logger: Arc<dyn Logger + Send + Sync>,
    stats: Arc<CameraStats>,
    denied: AtomicBool,
    open_delay_ms: AtomicU64,
}

impl DeviceCameraFake {
    pub fn new(logger: Arc<dyn Logger + Send + Sync>) -> Self {
        Self {
            logger: logger.with_namespace("camera").with_namespace("fake"),
            stats: Arc::new(CameraStats::default()),
            denied: AtomicBool::new(false),
            open_delay_ms: AtomicU64::new(0),
        }
    }

    #[allow(dead_code)]
    pub fn stats(&self) -> Arc<CameraStats> {
        self.stats.clone()
    }

    #[allow(dead_code)]
    /// Makes every following `open` fail as if permission was refused.
    pub fn set_denied(&self, denied: bool) {
        self.denied.store(denied, Ordering::SeqCst);
    }

    #[allow(dead_code)]
    /// Makes every following `open` block for `delay`, like a slow permission prompt.
    pub fn set_open_delay(&self, delay: Duration) {
        self.open_delay_ms
            .store(delay.as_millis() as u64, Ordering::SeqCst);
    }

    pub fn color_for(facing_mode: FacingMode) -> Rgb<u8> {
        match facing_mode {
            FacingMode::User => Rgb([200, 80, 120]),
            FacingMode::Environment => Rgb([60, 160, 60]),
        }
    }
}

impl DeviceCamera for DeviceCameraFake {
    fn open(
        &self,
        facing_mode: FacingMode,
        width: u32,
        height: u32,
    ) -> Result<Box<dyn CameraStream>, Box<dyn std::error::Error + Send + Sync>> {
        let delay_ms = self.open_delay_ms.load(Ordering::SeqCst);
        if delay_ms > 0 {
            std::thread::sleep(Duration::from_millis(delay_ms));
        }

        if self.denied.load(Ordering::SeqCst) {
            return Err("camera permission denied".into());
        }

        self.logger.info(&format!(
            "Opened {} stream at {}x{}",
            facing_mode, width, height
        ))?;
        self.stats.record_open();

        Ok(Box::new(CameraStreamFake {
            frame: Frame::new(RgbImage::from_pixel(
                width,
                height,
                Self::color_for(facing_mode),
            )),
            stats: self.stats.clone(),
            stopped: false,
        }))
    }
}

struct CameraStreamFake {
    frame: Frame,
    stats: Arc<CameraStats>,
    stopped: bool,
}

impl CameraStream for CameraStreamFake {
    fn capture_frame(&mut self) -> Result<Frame, Box<dyn std::error::Error + Send + Sync>> {
        if self.stopped {
            return Err("stream already stopped".into());
        }
        Ok(self.frame.clone())
    }

    fn stop(&mut self) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
        if !self.stopped {
            self.stopped = true;
            self.stats.record_release();
        }
        Ok(())
    }
}

impl Drop for CameraStreamFake {
    fn drop(&mut self) {
        let _ = self.stop();
    }
}
