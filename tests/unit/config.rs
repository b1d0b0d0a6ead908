use super::*;

#[test]
fn defaults_match_stock_profile() {
    let cfg = RenderConfig::default();
    assert_eq!(cfg.canvas, Canvas { width: 1920, height: 1080 });
    assert_eq!(cfg.fps, Fps { num: 30, den: 1 });
    assert_eq!(cfg.transition_secs, 0.8);
    assert_eq!(cfg.background, Rgb8::BLACK);
    assert_eq!(cfg.encode.crf, 18);
    assert_eq!(cfg.encode.audio_codec, "aac");
    assert!(cfg.encode.faststart);
    assert_eq!(cfg.logo_width_px(), 288);
    cfg.validate().unwrap();
}

#[test]
fn partial_json_overrides_only_named_keys() {
    let json = r##"{
        "transition_secs": 1.2,
        "background": "#202020",
        "encode": { "crf": 22 }
    }"##;
    let cfg = RenderConfig::from_reader(json.as_bytes()).unwrap();
    assert_eq!(cfg.transition_secs, 1.2);
    assert_eq!(cfg.background, Rgb8 { r: 32, g: 32, b: 32 });
    assert_eq!(cfg.encode.crf, 22);
    assert_eq!(cfg.encode.preset, "slow");
    assert_eq!(cfg.canvas.width, 1920);
}

#[test]
fn validation_rejects_inconsistent_values() {
    let bad = [
        RenderConfig {
            canvas: Canvas { width: 1921, height: 1080 },
            ..RenderConfig::default()
        },
        RenderConfig {
            fps: Fps { num: 0, den: 1 },
            ..RenderConfig::default()
        },
        RenderConfig {
            transition_secs: -1.0,
            ..RenderConfig::default()
        },
        RenderConfig {
            transition_secs: f64::NAN,
            ..RenderConfig::default()
        },
        RenderConfig {
            logo_width_frac: 1.5,
            ..RenderConfig::default()
        },
    ];
    for cfg in bad {
        assert!(matches!(cfg.validate(), Err(SlideError::Config(_))), "{cfg:?}");
    }
}

#[test]
fn invalid_json_is_a_config_error() {
    let err = RenderConfig::from_reader(r#"{"background": "red"}"#.as_bytes()).unwrap_err();
    assert!(matches!(err, SlideError::Config(_)));
}
