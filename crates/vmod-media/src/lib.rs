//! FFmpeg CLI wrapper for the moderation pipeline.
//!
//! This crate provides:
//! - Type-safe FFmpeg command building
//! - FFprobe video information
//! - Stride-sampled grayscale frame extraction for the heatmap and scene
//!   pipelines
//! - Single-frame JPEG extraction for the frame endpoint
//! - Audio track extraction for the transcription collaborators
//!
//! All scratch files live in RAII [`tempfile`] directories, so a crashed
//! request cannot leak extracted frames or audio.

pub mod audio;
pub mod command;
pub mod error;
pub mod frames;
pub mod probe;

pub use audio::{extract_audio, ExtractedAudio};
pub use command::{FfmpegCommand, FfmpegRunner};
pub use error::{MediaError, MediaResult};
pub use frames::{
    encode_detector_jpeg, extract_frame_jpeg, sample_gray_frames, GrayFrame, SampleConfig,
};
pub use probe::{probe_video, VideoInfo};
