use std::{
    ffi::{OsStr, OsString},
    fmt::Write as _,
    path::{Path, PathBuf},
    process::{Command, Stdio},
};

use crate::{
    foundation::{
        core::Canvas,
        error::{SlideError, SlideResult},
    },
    plan::{
        layer::{Layer, Position, SizePolicy},
        opacity::OpacityCurve,
    },
    render::{RenderBackend, RenderJob},
};

/// Back end that runs the system `ffmpeg` binary with a generated filter graph.
///
/// The background, every layer image and the audio track are ffmpeg inputs; the layers are
/// scaled, faded and overlaid in timeline order inside one `-filter_complex` graph.
#[derive(Clone, Debug)]
pub struct FfmpegBackend {
    program: PathBuf,
}

impl Default for FfmpegBackend {
    fn default() -> Self {
        Self {
            program: PathBuf::from("ffmpeg"),
        }
    }
}

impl FfmpegBackend {
    pub fn new() -> Self {
        Self::default()
    }

    /// Use a specific ffmpeg executable instead of the one on `PATH`.
    pub fn with_program(program: impl Into<PathBuf>) -> Self {
        Self {
            program: program.into(),
        }
    }
}

impl RenderBackend for FfmpegBackend {
    #[tracing::instrument(skip_all, fields(output = %job.output.display()))]
    fn render(&mut self, job: &RenderJob<'_>) -> SlideResult<()> {
        job.validate()?;
        if !job.overwrite && job.output.exists() {
            return Err(SlideError::render(format!(
                "output file '{}' already exists",
                job.output.display()
            )));
        }
        if !is_program_runnable(&self.program) {
            return Err(SlideError::render(format!(
                "'{}' is required for encoding, but could not be run",
                self.program.display()
            )));
        }
        ensure_parent_dir(job.output)?;

        let args = build_ffmpeg_args(job)?;
        tracing::debug!(command = %display_command(&self.program, &args), "spawning ffmpeg");
        tracing::info!(
            layers = job.timeline.layers.len(),
            duration = job.timeline.duration,
            fps = job.timeline.fps.as_f64(),
            "rendering video"
        );

        // `output` waits for the child and closes every pipe on both paths.
        let out = Command::new(&self.program)
            .args(&args)
            .stdin(Stdio::null())
            .output()
            .map_err(|e| {
                SlideError::render(format!(
                    "failed to spawn '{}' (is it installed and on PATH?): {e}",
                    self.program.display()
                ))
            })?;

        if !out.status.success() {
            let stderr = String::from_utf8_lossy(&out.stderr);
            return Err(SlideError::render(format!(
                "ffmpeg exited with status {}: {}",
                out.status,
                stderr.trim()
            )));
        }

        tracing::info!(output = %job.output.display(), "video rendered");
        Ok(())
    }
}

/// Full ffmpeg argument vector for `job` (without the program name).
pub fn build_ffmpeg_args(job: &RenderJob<'_>) -> SlideResult<Vec<OsString>> {
    let tl = job.timeline;
    let rate = tl.fps.as_ffmpeg_rate();
    let mut args: Vec<OsString> = Vec::new();
    let mut push = |a: &dyn AsRef<OsStr>| args.push(a.as_ref().to_os_string());

    push(&"-hide_banner");
    push(&if job.overwrite { "-y" } else { "-n" });
    push(&"-loglevel");
    push(&"error");

    // Input 0: background.
    push(&"-f");
    push(&"lavfi");
    push(&"-i");
    push(&format!(
        "color=c={}:s={}x{}:r={rate}:d={}",
        tl.background.color.to_ffmpeg(),
        tl.canvas.width,
        tl.canvas.height,
        fmt_secs(tl.duration)
    ));

    // Inputs 1..=n: one still image per layer, looped for the layer duration.
    for layer in &tl.layers {
        let image = job.images.resolve(layer).ok_or_else(|| {
            SlideError::render(format!(
                "{} image '{}' was not prepared",
                layer.kind.label(),
                layer.image.display()
            ))
        })?;
        push(&"-loop");
        push(&"1");
        push(&"-framerate");
        push(&rate);
        push(&"-t");
        push(&fmt_secs(layer.duration()));
        push(&"-i");
        push(&image.path);
    }

    let audio_input = tl.layers.len() + 1;
    push(&"-i");
    push(&tl.audio.path);

    push(&"-filter_complex");
    push(&build_filter_graph(job));
    push(&"-map");
    push(&"[vout]");
    push(&"-map");
    push(&format!("{audio_input}:a"));
    push(&"-t");
    push(&fmt_secs(tl.duration));
    push(&"-r");
    push(&rate);

    let enc = job.encode;
    let crf = enc.crf.to_string();
    for (flag, value) in [
        ("-c:v", enc.video_codec.as_str()),
        ("-preset", enc.preset.as_str()),
        ("-crf", crf.as_str()),
        ("-b:v", enc.video_bitrate.as_str()),
        ("-profile:v", enc.profile.as_str()),
        ("-level:v", enc.level.as_str()),
        ("-pix_fmt", enc.pix_fmt.as_str()),
        ("-c:a", enc.audio_codec.as_str()),
        ("-b:a", enc.audio_bitrate.as_str()),
    ] {
        if value.is_empty() {
            continue;
        }
        push(&flag);
        push(&value);
    }
    if enc.faststart {
        push(&"-movflags");
        push(&"+faststart");
    }
    push(&job.output);

    Ok(args)
}

/// The `-filter_complex` graph compositing every layer over the background.
///
/// Layer `i` is input `i + 1`. The last overlay (or the bare background) is labeled `[vout]`.
pub fn build_filter_graph(job: &RenderJob<'_>) -> String {
    let tl = job.timeline;
    if tl.layers.is_empty() {
        return "[0:v]null[vout]".to_owned();
    }

    let mut chains: Vec<String> = Vec::with_capacity(tl.layers.len() * 2);
    for (i, layer) in tl.layers.iter().enumerate() {
        let mut chain = format!("[{}:v]{},format=rgba", i + 1, scale_filter(layer.size));
        if let Some(alpha) = alpha_filter(layer) {
            let _ = write!(chain, ",{alpha}");
        }
        let _ = write!(
            chain,
            ",setpts=PTS-STARTPTS+{}/TB[l{i}]",
            fmt_secs(layer.start())
        );
        chains.push(chain);
    }

    let mut base = "0:v".to_owned();
    for (i, layer) in tl.layers.iter().enumerate() {
        let out = if i + 1 == tl.layers.len() {
            "vout".to_owned()
        } else {
            format!("v{i}")
        };
        let (x, y) = position_exprs(layer.position, tl.canvas);
        chains.push(format!(
            "[{base}][l{i}]overlay=x={x}:y={y}:eof_action=pass:enable='between(t,{},{})'[{out}]",
            fmt_secs(layer.start()),
            fmt_secs(layer.end())
        ));
        base = out;
    }

    chains.join(";")
}

fn scale_filter(size: SizePolicy) -> String {
    match size {
        SizePolicy::FitHeight { px } => format!("scale=-2:{px}"),
        SizePolicy::FitWidth { px } => format!("scale={px}:-2"),
    }
}

fn position_exprs(position: Position, canvas: Canvas) -> (String, String) {
    match position.top_px(canvas) {
        None => ("(W-w)/2".to_owned(), "(H-h)/2".to_owned()),
        Some(top) => ("(W-w)/2".to_owned(), top.to_string()),
    }
}

/// Alpha filter realizing the layer's opacity curve in layer-local time, if it needs one.
///
/// Fades that fit inside the layer use `fade`. A fade longer than the layer is already partway
/// through its ramp at one end, which `fade` cannot express, so its alpha is computed per
/// frame with `geq`.
fn alpha_filter(layer: &Layer) -> Option<String> {
    let dur = layer.duration();
    if layer.opacity.is_opaque() {
        return None;
    }
    match layer.opacity {
        OpacityCurve::Constant { value } => Some(format!("colorchannelmixer=aa={value}")),
        OpacityCurve::Ramp => Some(format!("fade=t=in:st=0:d={}:alpha=1", fmt_secs(dur))),
        OpacityCurve::FadeIn { over } if over <= dur => Some(format!(
            "fade=t=in:st=0:d={}:alpha=1",
            fmt_secs(over)
        )),
        OpacityCurve::FadeIn { over } => Some(geq_alpha(&format!("T/{}", fmt_secs(over)))),
        OpacityCurve::FadeOut { over } if over <= dur => Some(format!(
            "fade=t=out:st={}:d={}:alpha=1",
            fmt_secs(dur - over),
            fmt_secs(over)
        )),
        OpacityCurve::FadeOut { over } => Some(geq_alpha(&format!(
            "({}-T)/{}",
            fmt_secs(dur),
            fmt_secs(over)
        ))),
    }
}

/// `geq` scaling the source alpha by `factor`, clamped to `[0, 1]`. `T` is layer-local time.
fn geq_alpha(factor: &str) -> String {
    format!("geq=r='r(X,Y)':g='g(X,Y)':b='b(X,Y)':a='alpha(X,Y)*clip({factor},0,1)'")
}

/// Seconds with microsecond precision and no trailing zeros (`4.6`, `10`).
pub(crate) fn fmt_secs(v: f64) -> String {
    let s = format!("{v:.6}");
    let s = s.trim_end_matches('0').trim_end_matches('.');
    if s.is_empty() || s == "-0" {
        "0".to_owned()
    } else {
        s.to_owned()
    }
}

/// Shell-style rendering of a command line for logs and dry runs.
pub fn display_command(program: &Path, args: &[OsString]) -> String {
    std::iter::once(program.as_os_str())
        .chain(args.iter().map(OsString::as_os_str))
        .map(|a| shell_quote(&a.to_string_lossy()))
        .collect::<Vec<_>>()
        .join(" ")
}

fn shell_quote(s: &str) -> String {
    let plain = !s.is_empty()
        && s.chars()
            .all(|c| c.is_ascii_alphanumeric() || "-_./:+=,@%".contains(c));
    if plain {
        s.to_owned()
    } else {
        format!("'{}'", s.replace('\'', r"'\''"))
    }
}

/// Ensure the parent directory of `path` exists.
pub fn ensure_parent_dir(path: &Path) -> SlideResult<()> {
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        use anyhow::Context as _;
        std::fs::create_dir_all(parent)
            .with_context(|| format!("failed to create output directory '{}'", parent.display()))?;
    }
    Ok(())
}

/// Return `true` when `ffmpeg` can be invoked from `PATH`.
pub fn is_ffmpeg_on_path() -> bool {
    is_program_runnable(Path::new("ffmpeg"))
}

fn is_program_runnable(program: &Path) -> bool {
    Command::new(program)
        .arg("-version")
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .status()
        .map(|s| s.success())
        .unwrap_or(false)
}

#[cfg(test)]
#[path = "../../tests/unit/render/ffmpeg.rs"]
mod tests;
