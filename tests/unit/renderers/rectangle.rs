use super::*;
use crate::{
    engine::Resources,
    foundation::core::{Canvas, Rect},
    renderers::test_support::render_at,
    scene::model::Scene,
    telemetry::map::MapConfig,
};

fn frame(ts: f64, c: [i32; 4], color: Option<Color>) -> KeyFrame<RectangleFrame> {
    KeyFrame::new(
        ts,
        RectangleFrame {
            x1: c[0],
            y1: c[1],
            x2: c[2],
            y2: c[3],
            color,
        },
    )
}

fn scene() -> Scene {
    Scene::new(Canvas::new(100, 50).unwrap())
}

fn resources() -> Resources {
    Resources::new(".", MapConfig::default())
}

#[test]
fn corners_interpolate_and_round() {
    let obj = RectangleObject {
        fill: RectangleFill::default(),
        key_frames: vec![frame(0.0, [0, 0, 10, 10], None), frame(1.0, [0, 0, 20, 20], None)],
    };
    let (res, s) = render_at(&scene(), &obj.clone().into(), &mut resources(), 0.5);
    assert!(res.unwrap());
    assert_eq!(
        s.filled_rects(),
        vec![(Rect::new(0.0, 0.0, 15.0, 15.0), Paint::Solid(Color::BLACK))]
    );
}

#[test]
fn corners_are_clamped_to_the_canvas() {
    let obj = RectangleObject {
        fill: RectangleFill::Constant(Color::WHITE),
        key_frames: vec![
            frame(0.0, [-50, 70, -90, 10], None),
            frame(1.0, [-50, 70, -90, 10], None),
        ],
    };
    let (res, s) = render_at(&scene(), &obj.into(), &mut resources(), 0.2);
    assert!(res.unwrap());
    let (rect, _) = s.filled_rects()[0].clone();
    assert_eq!(rect, Rect::new(0.0, 50.0, 0.0, 50.0));
}

#[test]
fn keyframed_colour_blends_channel_wise() {
    let obj = RectangleObject {
        fill: RectangleFill::Keyframed,
        key_frames: vec![
            frame(0.0, [0, 0, 1, 1], Some(Color::rgb(0, 100, 255))),
            frame(2.0, [0, 0, 1, 1], Some(Color::rgb(200, 0, 255))),
        ],
    };
    let (_, s) = render_at(&scene(), &obj.into(), &mut resources(), 0.5);
    assert_eq!(s.filled_rects()[0].1, Paint::Solid(Color::rgb(50, 75, 255)));
}

#[test]
fn held_past_the_end_stays_at_the_end_state() {
    let obj = RectangleObject {
        fill: RectangleFill::default(),
        key_frames: vec![frame(0.0, [0, 0, 10, 10], None), frame(1.0, [0, 0, 20, 20], None)],
    };
    let span = Span {
        start: &obj.key_frames[0],
        end: &obj.key_frames[1],
        start_index: 0,
        factor: 3.0,
    };
    let (rect, _) = obj.state(&span, Canvas::new(100, 50).unwrap());
    assert_eq!((rect.x2, rect.y2), (20, 20));
}

#[test]
fn single_keyframe_is_never_visible() {
    let obj = RectangleObject {
        fill: RectangleFill::default(),
        key_frames: vec![frame(1.0, [0, 0, 10, 10], None)],
    };
    for t in [0.0, 1.0, 2.0] {
        let (res, s) = render_at(&scene(), &obj.clone().into(), &mut resources(), t);
        assert!(!res.unwrap());
        assert!(s.ops().is_empty());
    }
}
