pub mod image_convert;
pub mod media_time;
pub mod memory;
pub mod pipeline;
pub mod writer;

pub use image_convert::{convert_camera_image, CameraImage, EncodeBuffer, PixelLayout, Rotation};
pub use media_time::{MediaTime, PresentationClock, PRESENTATION_TIMESCALE};
pub use pipeline::{CapturePipeline, FrameOutcome, SkipReason, VideoContribution};
pub use writer::{EncodeSettings, VideoCodec, VideoWriter, VideoWriterFactory, WriterStatus};
