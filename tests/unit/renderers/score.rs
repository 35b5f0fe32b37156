use super::*;
use crate::{
    engine::Resources,
    foundation::core::Canvas,
    foundation::core::Color,
    layout::stacker::Anchor,
    render::recording::DrawOp,
    renderers::test_support::render_at,
    scene::model::Scene,
    telemetry::map::MapConfig,
};

// 300x150 canvas: gap 10, font 15, ascent 13.5, descent 4.5, line height 18, advance 9.
fn score(from: i64, to: i64, label: Option<&str>) -> ScoreObject {
    ScoreObject {
        anchor: Anchor::default(),
        label: label.map(str::to_owned),
        color: Color::WHITE,
        key_frames: vec![
            KeyFrame::new(0.0, ValueFrame { value: from }),
            KeyFrame::new(2.0, ValueFrame { value: to }),
        ],
    }
}

fn render(obj: ScoreObject, t: f64) -> crate::render::recording::RecordingSurface {
    let scene = Scene::new(Canvas::new(300, 150).unwrap());
    let mut resources = Resources::new(".", MapConfig::default());
    let (res, s) = render_at(&scene, &obj.into(), &mut resources, t);
    assert!(res.unwrap());
    s
}

#[test]
fn slide_positions_follow_the_remaining_time() {
    assert_eq!(slide_positions(5, 5, 0.1, 18.0), None);
    assert_eq!(slide_positions(5, 6, 0.6, 18.0), None);

    let up = slide_positions(5, 6, 0.25, 18.0).unwrap();
    assert_eq!((up.top, up.bottom), (5, 6));
    assert_eq!((up.top_dy, up.bottom_dy), (-9.0, 9.0));

    let start = slide_positions(5, 6, 0.5, 18.0).unwrap();
    assert_eq!((start.top_dy, start.bottom_dy), (0.0, 18.0));
    let done = slide_positions(5, 6, 0.0, 18.0).unwrap();
    assert_eq!((done.top_dy, done.bottom_dy), (-18.0, 0.0));

    let down = slide_positions(6, 5, 0.5, 18.0).unwrap();
    assert_eq!((down.top, down.bottom), (5, 6));
    assert_eq!((down.top_dy, down.bottom_dy), (-18.0, 0.0));
}

#[test]
fn static_value_before_the_slide_window() {
    let s = render(score(5, 6, None), 1.4);
    assert_eq!(s.filled_text(), vec![("5".to_string(), Point::new(10.0, 23.5))]);
    assert_eq!(s.clip_depth(), 0);
}

#[test]
fn both_values_drawn_inside_a_clip_while_sliding() {
    let s = render(score(5, 6, None), 1.75);
    assert_eq!(
        s.filled_text(),
        vec![
            ("6".to_string(), Point::new(10.0, 32.5)),
            ("5".to_string(), Point::new(10.0, 14.5)),
        ]
    );
    assert_eq!(s.ops().first(), Some(&DrawOp::PushClip(Rect::new(0.0, 10.0, 300.0, 28.0))));
    assert_eq!(s.ops().last(), Some(&DrawOp::PopClip));
    assert_eq!(s.clip_depth(), 0);
}

#[test]
fn label_prefix_shifts_the_value() {
    let s = render(score(3, 3, Some("Home")), 1.9);
    assert_eq!(
        s.filled_text(),
        vec![
            ("Home ".to_string(), Point::new(10.0, 23.5)),
            ("3".to_string(), Point::new(55.0, 23.5)),
        ]
    );
}

#[test]
fn box_width_covers_the_wider_value() {
    let scene = Scene::new(Canvas::new(300, 150).unwrap());
    let mut resources = Resources::new(".", MapConfig::default());
    let mut obj = score(9, 10, None);
    obj.anchor = Anchor::new(
        crate::layout::stacker::HAlign::Right,
        crate::layout::stacker::VAlign::Top,
    );
    let (_, s) = render_at(&scene, &obj.into(), &mut resources, 0.5);
    // Two-character box: x = 300 - 10 - 18.
    assert_eq!(s.filled_text()[0].1.x, 272.0);
}
