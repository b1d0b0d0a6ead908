use std::path::Path;

use crate::{
    foundation::error::{SlideError, SlideResult},
    model::AudioTrack,
};

#[derive(serde::Deserialize)]
struct ProbeStream {
    codec_type: Option<String>,
    duration: Option<String>,
}

#[derive(serde::Deserialize)]
struct ProbeFormat {
    duration: Option<String>,
}

#[derive(serde::Deserialize)]
struct ProbeOut {
    #[serde(default)]
    streams: Vec<ProbeStream>,
    format: Option<ProbeFormat>,
}

/// Return `true` when `ffprobe` can be invoked from `PATH`.
pub fn is_ffprobe_on_path() -> bool {
    std::process::Command::new("ffprobe")
        .arg("-version")
        .stdout(std::process::Stdio::null())
        .stderr(std::process::Stdio::null())
        .status()
        .map(|s| s.success())
        .unwrap_or(false)
}

/// Duration in seconds of the audio in `source_path`, via `ffprobe`.
#[tracing::instrument(skip_all, fields(path = %source_path.display()))]
pub fn probe_audio_duration(source_path: &Path) -> SlideResult<f64> {
    let out = std::process::Command::new("ffprobe")
        .args([
            "-v",
            "error",
            "-print_format",
            "json",
            "-show_format",
            "-show_streams",
        ])
        .arg(source_path)
        .output()
        .map_err(|e| SlideError::input_load(format!("failed to run ffprobe: {e}")))?;
    if !out.status.success() {
        return Err(SlideError::input_load(format!(
            "ffprobe failed for '{}': {}",
            source_path.display(),
            String::from_utf8_lossy(&out.stderr).trim()
        )));
    }

    let duration = parse_audio_duration(&out.stdout).map_err(|e| {
        SlideError::input_load(format!("audio '{}': {e}", source_path.display()))
    })?;
    tracing::info!(duration, "probed audio duration");
    Ok(duration)
}

/// Probe `path` and wrap it as the master [`AudioTrack`].
pub fn probe_audio_track(path: &Path) -> SlideResult<AudioTrack> {
    Ok(AudioTrack::new(path, probe_audio_duration(path)?))
}

/// Extract the audio duration from `ffprobe -print_format json` output.
///
/// Prefers the container duration and falls back to the longest audio stream.
pub(crate) fn parse_audio_duration(json: &[u8]) -> Result<f64, String> {
    let parsed: ProbeOut =
        serde_json::from_slice(json).map_err(|e| format!("ffprobe json parse failed: {e}"))?;

    let audio_streams: Vec<&ProbeStream> = parsed
        .streams
        .iter()
        .filter(|s| s.codec_type.as_deref() == Some("audio"))
        .collect();
    if audio_streams.is_empty() {
        return Err("no audio stream found".to_owned());
    }

    let parse = |s: Option<&String>| {
        s.and_then(|v| v.trim().parse::<f64>().ok())
            .filter(|d| d.is_finite() && *d > 0.0)
    };

    parse(parsed.format.as_ref().and_then(|f| f.duration.as_ref()))
        .or_else(|| {
            audio_streams
                .iter()
                .filter_map(|s| parse(s.duration.as_ref()))
                .reduce(f64::max)
        })
        .ok_or_else(|| "ffprobe reported no usable duration".to_owned())
}

#[cfg(test)]
#[path = "../../tests/unit/assets/media.rs"]
mod tests;
