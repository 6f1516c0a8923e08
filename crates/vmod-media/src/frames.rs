//! Frame extraction: stride-sampled grayscale frames and single-frame JPEGs.

use std::path::Path;

use image::imageops::FilterType;
use tracing::debug;

use crate::command::{FfmpegCommand, FfmpegRunner};
use crate::error::{MediaError, MediaResult};
use crate::probe::probe_video;

/// Downscale width for analysis frames; height follows the aspect ratio.
/// Small grids keep the heatmap math cheap without losing attention structure.
const ANALYSIS_FRAME_WIDTH: u32 = 160;

/// Frame sampling configuration.
#[derive(Debug, Clone)]
pub struct SampleConfig {
    /// Keep one frame out of every `stride` source frames.
    pub stride: u32,
    /// Analysis grid width in pixels (height follows aspect).
    pub width: u32,
}

impl Default for SampleConfig {
    fn default() -> Self {
        Self {
            stride: 30,
            width: ANALYSIS_FRAME_WIDTH,
        }
    }
}

/// A decoded grayscale frame on the analysis grid.
#[derive(Debug, Clone)]
pub struct GrayFrame {
    /// Index among the sampled frames (0-based).
    pub index: usize,
    /// Source timestamp in seconds.
    pub time: f64,
    /// Grid width.
    pub width: u32,
    /// Grid height.
    pub height: u32,
    /// Row-major 8-bit luma values, `width * height` long.
    pub luma: Vec<u8>,
}

impl GrayFrame {
    /// Luma at `(x, y)`.
    pub fn get(&self, x: u32, y: u32) -> u8 {
        self.luma[(y * self.width + x) as usize]
    }
}

/// Sample grayscale frames from the video at the configured stride.
///
/// Frames are extracted in one FFmpeg pass (`select` + `scale` filters) into
/// a scratch directory, then decoded with [`image`] and reduced to luma.
/// A video shorter than one stride yields an empty vector, which the heatmap
/// accumulator treats as the declared-resolution zero grid.
pub async fn sample_gray_frames(
    video_path: impl AsRef<Path>,
    config: &SampleConfig,
) -> MediaResult<Vec<GrayFrame>> {
    let video_path = video_path.as_ref();
    let info = probe_video(video_path).await?;

    let scratch = tempfile::tempdir()?;
    let pattern = scratch.path().join("frame_%06d.png");

    let stride = config.stride.max(1);
    let filter = format!(
        "select='not(mod(n\\,{}))',scale={}:-2",
        stride, config.width
    );

    let cmd = FfmpegCommand::new(video_path, &pattern)
        .video_filter(&filter)
        .output_arg("-vsync")
        .output_arg("vfr")
        .log_level("error");
    FfmpegRunner::new().run(&cmd).await?;

    let mut frames = Vec::new();
    for index in 1.. {
        let path = scratch.path().join(format!("frame_{:06}.png", index));
        if !path.exists() {
            break;
        }

        let bytes = tokio::fs::read(&path).await?;
        let gray = image::load_from_memory(&bytes)?.to_luma8();
        let (width, height) = gray.dimensions();

        let sampled_index = index - 1;
        frames.push(GrayFrame {
            index: sampled_index,
            time: (sampled_index as u64 * stride as u64) as f64 / info.fps.max(1.0),
            width,
            height,
            luma: gray.into_raw(),
        });
    }

    debug!(
        frames = frames.len(),
        stride, "Sampled analysis frames from video"
    );
    Ok(frames)
}

/// Extract a single frame as JPEG bytes.
///
/// Returns [`MediaError::FrameNotFound`] when the frame number is past the
/// end of the stream.
pub async fn extract_frame_jpeg(
    video_path: impl AsRef<Path>,
    frame_number: u64,
) -> MediaResult<Vec<u8>> {
    let video_path = video_path.as_ref();
    if !video_path.exists() {
        return Err(MediaError::FileNotFound(video_path.to_path_buf()));
    }

    let scratch = tempfile::tempdir()?;
    let frame_path = scratch.path().join("frame.jpg");

    let filter = format!("select=eq(n\\,{})", frame_number);
    let cmd = FfmpegCommand::new(video_path, &frame_path)
        .video_filter(&filter)
        .single_frame()
        .log_level("error");
    FfmpegRunner::new().run(&cmd).await?;

    if !frame_path.exists() {
        return Err(MediaError::FrameNotFound(frame_number));
    }

    let bytes = tokio::fs::read(&frame_path).await?;
    if bytes.is_empty() {
        return Err(MediaError::FrameNotFound(frame_number));
    }
    Ok(bytes)
}

/// Re-encode a decoded frame as a small JPEG for the detector collaborators.
pub fn encode_detector_jpeg(gray: &GrayFrame, max_width: u32) -> MediaResult<Vec<u8>> {
    let img = image::GrayImage::from_raw(gray.width, gray.height, gray.luma.clone())
        .ok_or_else(|| MediaError::InvalidVideo("Frame buffer size mismatch".to_string()))?;

    let img = if gray.width > max_width {
        let scale = max_width as f64 / gray.width as f64;
        let height = ((gray.height as f64 * scale).round() as u32).max(1);
        image::imageops::resize(&img, max_width, height, FilterType::Triangle)
    } else {
        img
    };

    let mut bytes = Vec::new();
    let mut cursor = std::io::Cursor::new(&mut bytes);
    image::DynamicImage::ImageLuma8(img).write_to(&mut cursor, image::ImageOutputFormat::Jpeg(85))?;
    Ok(bytes)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn gradient_frame(width: u32, height: u32) -> GrayFrame {
        let luma = (0..width * height).map(|i| (i % 251) as u8).collect();
        GrayFrame {
            index: 0,
            time: 0.0,
            width,
            height,
            luma,
        }
    }

    #[test]
    fn test_gray_frame_indexing() {
        let frame = gradient_frame(8, 4);
        assert_eq!(frame.get(0, 0), 0);
        assert_eq!(frame.get(1, 2), 17);
    }

    #[test]
    fn test_encode_detector_jpeg_roundtrips() {
        let frame = gradient_frame(64, 36);
        let bytes = encode_detector_jpeg(&frame, 64).unwrap();
        let decoded = image::load_from_memory(&bytes).unwrap();
        assert_eq!(decoded.width(), 64);
        assert_eq!(decoded.height(), 36);
    }

    #[test]
    fn test_encode_detector_jpeg_downscales() {
        let frame = gradient_frame(160, 90);
        let bytes = encode_detector_jpeg(&frame, 80).unwrap();
        let decoded = image::load_from_memory(&bytes).unwrap();
        assert_eq!(decoded.width(), 80);
        assert_eq!(decoded.height(), 45);
    }

    #[tokio::test]
    async fn test_extract_frame_missing_file() {
        let err = extract_frame_jpeg("/nonexistent/clip.mp4", 0).await.unwrap_err();
        assert!(matches!(err, MediaError::FileNotFound(_)));
    }

    #[tokio::test]
    #[ignore = "requires ffmpeg and a fixture video"]
    async fn test_sample_gray_frames_from_fixture() {
        let frames = sample_gray_frames("fixtures/sample.mp4", &SampleConfig::default())
            .await
            .unwrap();
        assert!(!frames.is_empty());
    }
}
