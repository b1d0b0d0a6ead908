use super::*;

fn close(a: f64, b: f64) -> bool {
    (a - b).abs() < 1e-9
}

#[test]
fn fade_out_holds_then_decays_to_zero_at_end() {
    let c = OpacityCurve::FadeOut { over: 0.8 };
    assert_eq!(c.sample(0.0, 2.0), 1.0);
    assert_eq!(c.sample(1.2, 2.0), 1.0);
    assert!(close(c.sample(1.6, 2.0), 0.5));
    assert!(close(c.sample(2.0, 2.0), 0.0));
}

#[test]
fn fade_out_shorter_than_fade_starts_partially_faded() {
    let c = OpacityCurve::FadeOut { over: 0.8 };
    assert!(close(c.sample(0.0, 0.4), 0.5));
}

#[test]
fn fade_in_rises_then_holds() {
    let c = OpacityCurve::FadeIn { over: 0.4 };
    assert_eq!(c.sample(0.0, 10.0), 0.0);
    assert!(close(c.sample(0.1, 10.0), 0.25));
    assert_eq!(c.sample(0.4, 10.0), 1.0);
    assert_eq!(c.sample(9.0, 10.0), 1.0);
}

#[test]
fn ramp_spans_whole_layer_and_clamps() {
    let c = OpacityCurve::Ramp;
    assert_eq!(c.sample(0.0, 0.8), 0.0);
    assert!(close(c.sample(0.4, 0.8), 0.5));
    assert_eq!(c.sample(0.8, 0.8), 1.0);
    assert_eq!(c.sample(5.0, 0.8), 1.0);
    assert_eq!(c.sample(-1.0, 0.8), 0.0);
}

#[test]
fn zero_length_fades_are_opaque() {
    assert!(OpacityCurve::FadeIn { over: 0.0 }.is_opaque());
    assert_eq!(OpacityCurve::FadeOut { over: 0.0 }.sample(1.0, 1.0), 1.0);
    assert!(OpacityCurve::OPAQUE.is_opaque());
    assert!(!OpacityCurve::Ramp.is_opaque());
}

#[test]
fn validate_rejects_out_of_range_values() {
    assert!(OpacityCurve::Constant { value: 1.5 }.validate().is_err());
    assert!(OpacityCurve::FadeIn { over: -1.0 }.validate().is_err());
    assert!(OpacityCurve::FadeOut { over: f64::NAN }.validate().is_err());
    assert!(OpacityCurve::Ramp.validate().is_ok());
}

#[test]
fn serializes_with_kind_tag() {
    let v = serde_json::to_value(OpacityCurve::FadeIn { over: 0.4 }).unwrap();
    assert_eq!(v, serde_json::json!({"kind": "fade_in", "over": 0.4}));
}
