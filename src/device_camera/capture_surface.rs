use crate::device_camera::interface::{CameraStream, DeviceCamera, FacingMode, Frame};
use crate::library::logger::interface::Logger;
use std::sync::mpsc::{channel, RecvTimeoutError, Sender};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::thread::JoinHandle;
use std::time::Duration;

#[derive(Debug, Default)]
struct Slot {
    generation: u64,
    frame: Option<Frame>,
}

/// Most recent frame of the live stream. Written by the capture surface,
/// read by the preview and by the classification snapshot.
#[derive(Debug, Clone, Default)]
pub struct LatestFrame {
    slot: Arc<Mutex<Slot>>,
}

impl LatestFrame {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, Slot> {
        self.slot.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn publish(&self, frame: Frame) {
        let mut slot = self.lock();
        slot.generation += 1;
        slot.frame = Some(frame);
    }

    pub fn clear(&self) {
        let mut slot = self.lock();
        slot.generation += 1;
        slot.frame = None;
    }

    pub fn get(&self) -> Option<Frame> {
        self.lock().frame.clone()
    }

    /// The generation changes on every publish or clear.
    pub fn get_with_generation(&self) -> (u64, Option<Frame>) {
        let slot = self.lock();
        (slot.generation, slot.frame.clone())
    }
}

pub struct CaptureSurface {
    camera: Arc<dyn DeviceCamera + Send + Sync>,
    width: u32,
    height: u32,
    stream: Option<Box<dyn CameraStream>>,
    latest_frame: LatestFrame,
    logger: Arc<dyn Logger + Send + Sync>,
}

impl CaptureSurface {
    pub fn new(
        camera: Arc<dyn DeviceCamera + Send + Sync>,
        width: u32,
        height: u32,
        latest_frame: LatestFrame,
        logger: Arc<dyn Logger + Send + Sync>,
    ) -> Self {
        Self {
            camera,
            width,
            height,
            stream: None,
            latest_frame,
            logger: logger.with_namespace("capture_surface"),
        }
    }

    pub fn is_live(&self) -> bool {
        self.stream.is_some()
    }

    /// Releases the current stream, then opens one for `facing_mode`.
    /// On failure no stream is set.
    pub fn acquire(
        &mut self,
        facing_mode: FacingMode,
    ) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
        self.release();

        let stream = self.camera.open(facing_mode, self.width, self.height)?;
        self.stream = Some(stream);

        if let Err(e) = self.pump() {
            let _ = self.logger.error(&format!("First frame failed: {}", e));
        }

        Ok(())
    }

    pub fn release(&mut self) {
        if let Some(mut stream) = self.stream.take() {
            if let Err(e) = stream.stop() {
                let _ = self.logger.error(&format!("Failed to stop stream: {}", e));
            }
            let _ = self.logger.info("Stream released");
        }
        self.latest_frame.clear();
    }

    pub fn pump(&mut self) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
        if let Some(stream) = self.stream.as_mut() {
            let frame = stream.capture_frame()?;
            self.latest_frame.publish(frame);
        }
        Ok(())
    }
}

impl Drop for CaptureSurface {
    fn drop(&mut self) {
        self.release();
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CameraCommand {
    /// `request` is echoed back so callers can tell superseded results apart.
    Acquire { request: u64, facing_mode: FacingMode },
}

pub type AcquireResult = Result<(), Box<dyn std::error::Error + Send + Sync>>;

/// Owns a `CaptureSurface` on a dedicated thread. Commands run in the order
/// they were sent, so a replacement stream is never opened before the old one
/// is released. Between commands the live stream is pumped into `LatestFrame`.
pub struct CaptureSurfaceWorker {
    commands: Option<Sender<CameraCommand>>,
    latest_frame: LatestFrame,
    handle: Option<JoinHandle<()>>,
}

impl CaptureSurfaceWorker {
    pub fn spawn<F>(
        camera: Arc<dyn DeviceCamera + Send + Sync>,
        width: u32,
        height: u32,
        frame_interval: Duration,
        latest_frame: LatestFrame,
        logger: Arc<dyn Logger + Send + Sync>,
        on_acquired: F,
    ) -> Self
    where
        F: Fn(u64, FacingMode, AcquireResult) + Send + 'static,
    {
        let (command_sender, command_receiver) = channel();
        let snapshot_frame = latest_frame.clone();

        let handle = std::thread::spawn(move || {
            let mut surface = CaptureSurface::new(camera, width, height, latest_frame, logger);
            let mut failing = false;

            loop {
                let command = if surface.is_live() {
                    match command_receiver.recv_timeout(frame_interval) {
                        Ok(command) => Some(command),
                        Err(RecvTimeoutError::Timeout) => None,
                        Err(RecvTimeoutError::Disconnected) => break,
                    }
                } else {
                    match command_receiver.recv() {
                        Ok(command) => Some(command),
                        Err(_) => break,
                    }
                };

                match command {
                    Some(CameraCommand::Acquire {
                        request,
                        facing_mode,
                    }) => {
                        failing = false;
                        let result = surface.acquire(facing_mode);
                        on_acquired(request, facing_mode, result);
                    }
                    None => match surface.pump() {
                        Ok(()) => failing = false,
                        Err(e) => {
                            if !failing {
                                let _ = surface
                                    .logger
                                    .error(&format!("Frame capture failed: {}", e));
                            }
                            failing = true;
                        }
                    },
                }
            }

            surface.release();
        });

        Self {
            commands: Some(command_sender),
            latest_frame: snapshot_frame,
            handle: Some(handle),
        }
    }

    /// Current frame of the live stream, or `None` while no stream is set.
    pub fn snapshot(&self) -> Option<Frame> {
        self.latest_frame.get()
    }

    pub fn send(&self, command: CameraCommand) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
        match &self.commands {
            Some(commands) => commands
                .send(command)
                .map_err(|_| "capture surface worker has stopped".into()),
            None => Err("capture surface worker has stopped".into()),
        }
    }
}

impl Drop for CaptureSurfaceWorker {
    fn drop(&mut self) {
        self.commands.take();
        if let Some(handle) = self.handle.take() {
            let _ = handle.join();
        }
    }
}
