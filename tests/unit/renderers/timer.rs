use super::*;
use crate::{
    engine::Resources,
    foundation::core::{Canvas, Color},
    layout::stacker::Anchor,
    renderers::test_support::render_at,
    scene::model::Scene,
    telemetry::map::MapConfig,
};

#[test]
fn formats_seconds_minutes_and_hours() {
    assert_eq!(format_timer(45), "45s");
    assert_eq!(format_timer(0), "0s");
    assert_eq!(format_timer(60), "1m00s");
    assert_eq!(format_timer(125), "2m05s");
    assert_eq!(format_timer(3725), "1h02m05s");
    assert_eq!(format_timer(-5), "-5s");
    assert_eq!(format_timer(-125), "-2m05s");
}

#[test]
fn value_is_interpolated_then_truncated() {
    let obj = TimerObject {
        anchor: Anchor::default(),
        color: Color::WHITE,
        key_frames: vec![
            KeyFrame::new(0.0, ValueFrame { value: 0 }),
            KeyFrame::new(10.0, ValueFrame { value: 100 }),
        ],
    };
    let scene = Scene::new(Canvas::new(300, 150).unwrap());
    let mut resources = Resources::new(".", MapConfig::default());
    let (res, s) = render_at(&scene, &obj.into(), &mut resources, 6.19);
    assert!(res.unwrap());
    let text = s.filled_text();
    assert_eq!(text.len(), 1);
    assert_eq!(text[0].0, "1m01s");
}
