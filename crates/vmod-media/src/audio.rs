//! Audio track extraction for the transcription and audio collaborators.

use std::path::{Path, PathBuf};

use tempfile::TempDir;
use tracing::debug;

use crate::command::{FfmpegCommand, FfmpegRunner};
use crate::error::{MediaError, MediaResult};

/// Sample rate expected by the ASR collaborators.
const ASR_SAMPLE_RATE: u32 = 16_000;

/// An extracted mono WAV, deleted when dropped.
///
/// The WAV lives inside a [`TempDir`], so cleanup happens on drop even if
/// the request that created it fails midway.
#[derive(Debug)]
pub struct ExtractedAudio {
    path: PathBuf,
    _scratch: TempDir,
}

impl ExtractedAudio {
    /// Path of the extracted WAV file.
    pub fn path(&self) -> &Path {
        &self.path
    }
}

/// Extract the audio track as 16 kHz mono PCM WAV.
pub async fn extract_audio(video_path: impl AsRef<Path>) -> MediaResult<ExtractedAudio> {
    let video_path = video_path.as_ref();
    if !video_path.exists() {
        return Err(MediaError::FileNotFound(video_path.to_path_buf()));
    }

    let scratch = tempfile::tempdir()?;
    let wav_path = scratch.path().join("audio.wav");

    let cmd = FfmpegCommand::new(video_path, &wav_path)
        .no_video()
        .audio_codec("pcm_s16le")
        .audio_rate(ASR_SAMPLE_RATE)
        .audio_channels(1)
        .log_level("error");
    FfmpegRunner::new().run(&cmd).await?;

    if !wav_path.exists() {
        return Err(MediaError::InvalidVideo(
            "No audio stream found".to_string(),
        ));
    }

    debug!(path = %wav_path.display(), "Extracted audio track");
    Ok(ExtractedAudio {
        path: wav_path,
        _scratch: scratch,
    })
}
