//! Frame acquisition sources
//!
//! A [`FrameSource`] produces the RGB frames the pipeline feeds to the
//! detector. Opening is backend-specific and fails with
//! [`PilotError::Camera`] when the device cannot be opened, at which point
//! the runtime runs in degraded idle mode instead of busy-looping.
//!
//! Backends:
//! - [`StaticFrameSource`]: deterministic in-memory source for tests and
//!   simulation.
//! - `V4l2FrameSource` (feature `camera-v4l2`): real Linux camera capture.

use crate::error::Result;
use crate::vision::frame::Frame;

/// Source of camera frames
///
/// `Ok(None)` means no frame was ready this poll; `Err` is a transient read
/// failure the pipeline logs and skips. Dropping the source releases the
/// underlying device.
pub trait FrameSource: Send {
    /// Acquire the next frame, if one is available
    fn next_frame(&mut self) -> Result<Option<Frame>>;
}

/// In-memory frame source replaying a fixed sequence
///
/// Yields each queued frame once, then reports no frame ready. Used in tests
/// and simulation mode where no camera hardware is present.
#[derive(Debug, Default)]
pub struct StaticFrameSource {
    frames: std::collections::VecDeque<Frame>,
    repeat_last: bool,
}

impl StaticFrameSource {
    /// Create a source over a fixed frame sequence
    pub fn new(frames: Vec<Frame>) -> Self {
        Self {
            frames: frames.into(),
            repeat_last: false,
        }
    }

    /// Keep yielding the final frame forever instead of running dry
    pub fn looping(mut self) -> Self {
        self.repeat_last = true;
        self
    }
}

impl FrameSource for StaticFrameSource {
    fn next_frame(&mut self) -> Result<Option<Frame>> {
        if self.repeat_last && self.frames.len() == 1 {
            return Ok(self.frames.front().cloned());
        }
        Ok(self.frames.pop_front())
    }
}

#[cfg(feature = "camera-v4l2")]
pub use self::v4l2::V4l2FrameSource;

#[cfg(feature = "camera-v4l2")]
mod v4l2 {
    use super::FrameSource;
    use crate::error::{PilotError, Result};
    use crate::vision::frame::{Frame, PixelFormat};
    use tracing::{info, warn};
    use v4l::buffer::Type;
    use v4l::io::mmap::Stream as MmapStream;
    use v4l::io::traits::CaptureStream;
    use v4l::video::Capture;
    use v4l::{Device, FourCC};

    /// V4L2 camera capture source
    ///
    /// Requests RGB24 output from the device at open time. Capture runs one
    /// short mmap burst per frame so that dropping the source always
    /// releases the device node.
    pub struct V4l2FrameSource {
        device: Device,
        width: u32,
        height: u32,
    }

    impl V4l2FrameSource {
        /// Open a camera by device index
        pub fn open(index: u32, width: u32, height: u32) -> Result<Self> {
            let device = Device::new(index as usize)
                .map_err(|e| PilotError::camera(format!("open /dev/video{index}: {e}")))?;

            let fmt = v4l::Format::new(width, height, FourCC::new(b"RGB3"));
            let actual = device
                .set_format(&fmt)
                .map_err(|e| PilotError::camera(format!("set format: {e}")))?;
            if actual.fourcc != FourCC::new(b"RGB3") {
                return Err(PilotError::camera(format!(
                    "device does not provide RGB24 (got {})",
                    actual.fourcc
                )));
            }
            if actual.width != width || actual.height != height {
                warn!(
                    "camera negotiated {}x{} instead of {}x{}",
                    actual.width, actual.height, width, height
                );
            }

            info!(
                "opened camera {} at {}x{} RGB24",
                index, actual.width, actual.height
            );

            Ok(Self {
                device,
                width: actual.width,
                height: actual.height,
            })
        }
    }

    impl FrameSource for V4l2FrameSource {
        fn next_frame(&mut self) -> Result<Option<Frame>> {
            let mut stream = MmapStream::with_buffers(&self.device, Type::VideoCapture, 1)
                .map_err(|e| PilotError::camera(format!("start capture: {e}")))?;
            let (buf, _meta) = stream
                .next()
                .map_err(|e| PilotError::camera(format!("read frame: {e}")))?;

            let expected = PixelFormat::Rgb24.buffer_size(self.width, self.height);
            if buf.len() < expected {
                return Err(PilotError::camera(format!(
                    "short frame: {} bytes, expected {}",
                    buf.len(),
                    expected
                )));
            }

            let frame = Frame::new(
                self.width,
                self.height,
                PixelFormat::Rgb24,
                buf[..expected].to_vec(),
            )?;
            Ok(Some(frame))
        }
    }
}
