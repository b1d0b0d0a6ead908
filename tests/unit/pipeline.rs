use std::path::Path;

use super::*;
use crate::render::InMemoryBackend;

fn write_png(path: &Path) {
    image::RgbaImage::from_pixel(32, 18, image::Rgba([0, 90, 180, 255]))
        .save(path)
        .unwrap();
}

fn write_slides(dir: &Path, slides: &[(&str, f64, f64)]) -> std::path::PathBuf {
    let list: Vec<serde_json::Value> = slides
        .iter()
        .map(|(name, start, end)| {
            write_png(&dir.join(name));
            serde_json::json!({
                "path": dir.join(name),
                "startTime": start,
                "endTime": end,
            })
        })
        .collect();
    let path = dir.join("slides.json");
    std::fs::write(&path, serde_json::to_vec_pretty(&list).unwrap()).unwrap();
    path
}

fn request(dir: &Path, slides: std::path::PathBuf, audio_duration: f64) -> RenderRequest {
    RenderRequest {
        audio_duration: Some(audio_duration),
        ..RenderRequest::new(slides, dir.join("track.mp3"), dir.join("out.mp4"))
    }
}

#[test]
fn runs_plan_and_hands_job_to_backend() {
    let dir = tempfile::tempdir().unwrap();
    let slides = write_slides(dir.path(), &[("a.png", 0.0, 5.0), ("b.png", 5.0, 10.0)]);

    let mut backend = InMemoryBackend::new();
    let summary = Pipeline::default()
        .run(&request(dir.path(), slides, 10.0), &mut backend)
        .unwrap();

    assert_eq!(
        summary,
        RenderSummary {
            duration: 10.0,
            slide_layers: 2,
            transition_layers: 1,
            has_opening: false,
            has_logo: false,
        }
    );
    let jobs = backend.jobs();
    assert_eq!(jobs.len(), 1);
    assert_eq!(jobs[0].output, dir.path().join("out.mp4"));
    assert_eq!(jobs[0].timeline.duration, 10.0);
    assert!(!jobs[0].args.is_empty());
}

#[test]
fn discovers_overlays_next_to_first_slide() {
    let dir = tempfile::tempdir().unwrap();
    let slides = write_slides(dir.path(), &[("a.png", 2.0, 5.0), ("b.png", 5.0, 9.0)]);
    write_png(&dir.path().join("apu-slide.png"));

    let mut backend = InMemoryBackend::new();
    let summary = Pipeline::default()
        .run(&request(dir.path(), slides.clone(), 30.0), &mut backend)
        .unwrap();
    assert!(summary.has_opening);
    // No apu-logo.svg in the directory.
    assert!(!summary.has_logo);
    assert!((summary.duration - 9.4).abs() < 1e-9);

    let req = RenderRequest {
        discover_overlays: false,
        ..request(dir.path(), slides, 30.0)
    };
    let summary = Pipeline::default().run(&req, &mut backend).unwrap();
    assert!(!summary.has_opening);
    assert_eq!(backend.jobs().len(), 2);
}

#[test]
fn config_changes_transition_length() {
    let dir = tempfile::tempdir().unwrap();
    let slides = write_slides(dir.path(), &[("a.png", 0.0, 5.0), ("b.png", 5.0, 8.0)]);
    let pipeline = Pipeline::new(RenderConfig {
        transition_secs: 0.0,
        ..RenderConfig::default()
    })
    .unwrap();

    let mut backend = InMemoryBackend::new();
    let summary = pipeline
        .run(&request(dir.path(), slides, 60.0), &mut backend)
        .unwrap();
    assert_eq!(summary.transition_layers, 0);
    assert_eq!(summary.duration, 8.0);
}

#[test]
fn audio_shorter_than_slides_bounds_output() {
    let dir = tempfile::tempdir().unwrap();
    let slides = write_slides(dir.path(), &[("a.png", 0.0, 5.0), ("b.png", 5.0, 10.0)]);
    let mut backend = InMemoryBackend::new();
    let summary = Pipeline::default()
        .run(&request(dir.path(), slides, 7.5), &mut backend)
        .unwrap();
    assert_eq!(summary.duration, 7.5);
}

#[test]
fn missing_slide_list_is_an_input_error() {
    let dir = tempfile::tempdir().unwrap();
    let mut backend = InMemoryBackend::new();
    let err = Pipeline::default()
        .run(
            &request(dir.path(), dir.path().join("nope.json"), 10.0),
            &mut backend,
        )
        .unwrap_err();
    assert!(matches!(err, SlideError::InputLoad(_)));
    assert!(backend.jobs().is_empty());
}

#[test]
fn non_positive_audio_override_is_rejected() {
    let dir = tempfile::tempdir().unwrap();
    let slides = write_slides(dir.path(), &[("a.png", 0.0, 5.0)]);
    let mut backend = InMemoryBackend::new();
    let err = Pipeline::default()
        .run(&request(dir.path(), slides, 0.0), &mut backend)
        .unwrap_err();
    assert!(matches!(err, SlideError::InputLoad(_)));
}

#[test]
fn invalid_config_is_rejected_up_front() {
    let err = Pipeline::new(RenderConfig {
        transition_secs: -1.0,
        ..RenderConfig::default()
    })
    .unwrap_err();
    assert!(matches!(err, SlideError::Config(_)));
}
