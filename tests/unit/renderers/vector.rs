use super::*;
use crate::{
    engine::Resources,
    foundation::core::Canvas,
    foundation::error::OverlayError,
    render::recording::DrawOp,
    renderers::test_support::render_at,
    scene::model::Scene,
    telemetry::map::MapConfig,
};
use std::path::PathBuf;

const ICON: &str = r#"<svg xmlns="http://www.w3.org/2000/svg" width="20" height="10">
<rect width="20" height="10" fill="blue"/></svg>"#;

fn assets(name: &str) -> PathBuf {
    let dir = PathBuf::from("target").join("unit_renderers").join(name);
    std::fs::create_dir_all(&dir).unwrap();
    std::fs::write(dir.join("icon.svg"), ICON).unwrap();
    dir
}

fn scene() -> Scene {
    Scene::new(Canvas::new(200, 100).unwrap())
}

fn vectors(ops: &[DrawOp]) -> Vec<(String, VectorPlacement)> {
    ops.iter()
        .filter_map(|op| match op {
            DrawOp::Vector { source, placement } => Some((source.clone(), *placement)),
            _ => None,
        })
        .collect()
}

#[test]
fn fixed_image_is_translated_to_the_rounded_offset() {
    let obj = VectorFixedObject {
        source: "icon.svg".into(),
        key_frames: vec![
            KeyFrame::new(0.0, OffsetFrame { x: 0, y: 0 }),
            KeyFrame::new(1.0, OffsetFrame { x: 11, y: 20 }),
        ],
    };
    let mut resources = Resources::new(assets("fixed"), MapConfig::default());
    let (res, s) = render_at(&scene(), &obj.into(), &mut resources, 0.5);
    assert!(res.unwrap());
    assert_eq!(
        vectors(s.ops()),
        vec![(
            "icon.svg".to_string(),
            VectorPlacement::Transform(Affine::translate((6.0, 10.0)))
        )]
    );
    assert_eq!(resources.vectors().len(), 1);
}

#[test]
fn viewport_normalises_swapped_corners() {
    let s = ViewportFrame {
        x1: 10.0,
        y1: 40.0,
        x2: 0.0,
        y2: 0.0,
    };
    assert_eq!(viewport_rect(0.0, &s, &s), Rect::new(0.0, 0.0, 10.0, 40.0));

    let e = ViewportFrame {
        x1: 30.0,
        y1: 40.0,
        x2: 50.0,
        y2: 120.0,
    };
    let r = viewport_rect(0.5, &s, &e);
    assert_eq!(r, Rect::new(20.0, 40.0, 25.0, 60.0));
}

#[test]
fn viewport_image_is_fitted_into_the_interpolated_rect() {
    let obj = VectorViewportObject {
        source: "icon.svg".into(),
        key_frames: vec![
            KeyFrame::new(
                0.0,
                ViewportFrame {
                    x1: 0.0,
                    y1: 0.0,
                    x2: 40.0,
                    y2: 20.0,
                },
            ),
            KeyFrame::new(
                2.0,
                ViewportFrame {
                    x1: 0.0,
                    y1: 0.0,
                    x2: 80.0,
                    y2: 40.0,
                },
            ),
        ],
    };
    let mut resources = Resources::new(assets("viewport"), MapConfig::default());
    let (res, s) = render_at(&scene(), &obj.into(), &mut resources, 1.0);
    assert!(res.unwrap());
    assert_eq!(
        vectors(s.ops()),
        vec![(
            "icon.svg".to_string(),
            VectorPlacement::Viewport(Rect::new(0.0, 0.0, 60.0, 30.0))
        )]
    );
}

#[test]
fn collapsed_viewport_draws_nothing() {
    let frame = ViewportFrame {
        x1: 30.0,
        y1: 0.0,
        x2: 30.0,
        y2: 50.0,
    };
    let obj = VectorViewportObject {
        source: "icon.svg".into(),
        key_frames: vec![KeyFrame::new(0.0, frame), KeyFrame::new(1.0, frame)],
    };
    let mut resources = Resources::new(assets("collapsed"), MapConfig::default());
    let (res, s) = render_at(&scene(), &obj.into(), &mut resources, 0.5);
    assert!(!res.unwrap());
    assert!(vectors(s.ops()).is_empty());
}

#[test]
fn missing_document_fails_the_object() {
    let obj = VectorFixedObject {
        source: "absent.svg".into(),
        key_frames: vec![
            KeyFrame::new(0.0, OffsetFrame { x: 0, y: 0 }),
            KeyFrame::new(1.0, OffsetFrame { x: 0, y: 0 }),
        ],
    };
    let mut resources = Resources::new(assets("missing"), MapConfig::default());
    let (res, s) = render_at(&scene(), &obj.into(), &mut resources, 0.5);
    let err = res.unwrap_err();
    assert!(matches!(err, OverlayError::Load(_)));
    assert!(err.to_string().contains("absent.svg"));
    assert!(s.ops().is_empty());
}
