use super::*;

#[test]
fn canvas_rejects_zero_dimensions() {
    assert!(Canvas::new(0, 10).is_err());
    assert!(Canvas::new(10, 0).is_err());
    assert_eq!(
        Canvas::new(64, 32).unwrap(),
        Canvas {
            width: 64,
            height: 32
        }
    );
}

#[test]
fn color_lerp_blends_bytes_channel_wise() {
    let a = Color::rgba(0, 100, 255, 0);
    let b = Color::rgba(255, 100, 0, 255);
    assert_eq!(a.lerp(b, 0.0), a);
    assert_eq!(a.lerp(b, 1.0), b);
    assert_eq!(a.lerp(b, 0.5), Color::rgba(128, 100, 128, 128));
}

#[test]
fn color_lerp_saturates_outside_unit_range() {
    let a = Color::rgb(10, 10, 10);
    let b = Color::rgb(250, 250, 250);
    assert_eq!(a.lerp(b, 2.0), Color::rgb(255, 255, 255));
    assert_eq!(a.lerp(b, -1.0), Color::rgb(0, 0, 0));
}

#[test]
fn premul_scales_by_alpha() {
    assert_eq!(Color::rgba(255, 128, 0, 0).to_premul_rgba8(), [0, 0, 0, 0]);
    assert_eq!(
        Color::rgba(255, 128, 0, 255).to_premul_rgba8(),
        [255, 128, 0, 255]
    );
    assert_eq!(Color::rgba(255, 0, 0, 128).to_premul_rgba8()[0], 128);
}

#[test]
fn color_alpha_defaults_to_opaque_in_json() {
    let c: Color = serde_json::from_str(r#"{"r":1,"g":2,"b":3}"#).unwrap();
    assert_eq!(c, Color::rgb(1, 2, 3));
}
