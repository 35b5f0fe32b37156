use super::*;
use crate::{
    engine::Resources,
    foundation::core::{Canvas, Color},
    layout::stacker::{Anchor, HAlign, VAlign},
    renderers::test_support::render_at,
    scene::model::Scene,
    telemetry::map::MapConfig,
};

fn text(anchor: Anchor) -> TextObject {
    TextObject {
        anchor,
        text: "Lyon".into(),
        color: Color::rgb(255, 255, 0),
        key_frames: vec![KeyFrame::new(0.0, TimeFrame {}), KeyFrame::new(5.0, TimeFrame {})],
    }
}

#[test]
fn anchored_text_sits_on_its_baseline() {
    // 300x150: gap 10, font 15 -> advance 9/char, ascent 13.5, descent 4.5.
    let scene = Scene::new(Canvas::new(300, 150).unwrap());
    let mut resources = Resources::new(".", MapConfig::default());

    let (res, s) = render_at(&scene, &text(Anchor::default()).into(), &mut resources, 1.0);
    assert!(res.unwrap());
    assert_eq!(s.filled_text(), vec![("Lyon".to_string(), Point::new(10.0, 23.5))]);

    let br = Anchor::new(HAlign::Right, VAlign::Bottom);
    let (_, s) = render_at(&scene, &text(br).into(), &mut resources, 1.0);
    // x = 300 - 10 - 36, top = 150 - 10 - 18.
    assert_eq!(s.filled_text(), vec![("Lyon".to_string(), Point::new(254.0, 135.5))]);
}

#[test]
fn text_is_outlined_then_filled() {
    let scene = Scene::new(Canvas::new(300, 150).unwrap());
    let mut resources = Resources::new(".", MapConfig::default());
    let (_, s) = render_at(&scene, &text(Anchor::default()).into(), &mut resources, 1.0);
    assert_eq!(s.ops().len(), 2);
}
