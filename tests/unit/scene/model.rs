use super::*;
use crate::layout::stacker::{HAlign, VAlign};

fn canvas() -> Canvas {
    Canvas::new(640, 360).unwrap()
}

fn rect(ts: f64, x2: i32) -> KeyFrame<RectangleFrame> {
    KeyFrame::new(
        ts,
        RectangleFrame {
            x1: 0,
            y1: 0,
            x2,
            y2: x2,
            color: None,
        },
    )
}

#[test]
fn json_scene_parses_with_defaults() {
    let json = r#"{
        "canvas": {"width": 640, "height": 360},
        "objects": [
            {"kind": "rectangle", "key_frames": [
                {"timestamp": 0, "x1": 0, "y1": 0, "x2": 10, "y2": 10},
                {"timestamp": 1, "x1": 0, "y1": 0, "x2": 20, "y2": 20}
            ]},
            {"kind": "score", "label": "SCORE", "anchor": {"h": "right", "v": "bottom"},
             "key_frames": [{"timestamp": 0, "value": 5}, {"timestamp": 2, "value": 6}]},
            {"kind": "telemetry", "trace": "ride",
             "elements": [{"element": "speed"}, {"element": "map"}],
             "key_frames": [
                {"timestamp": 0, "trace_timestamp": 100},
                {"timestamp": 10, "trace_timestamp": 110}
             ]}
        ],
        "traces": {"ride": [{"time": 100, "lat": 45.0, "lon": 4.8}]}
    }"#;
    let scene = Scene::from_json(json).unwrap();
    assert_eq!(scene.canvas, canvas());
    assert_eq!(scene.map, MapConfig::default());
    assert_eq!(scene.objects.len(), 3);

    let SceneObject::Rectangle(r) = &scene.objects[0] else {
        panic!("expected rectangle");
    };
    assert_eq!(r.fill, RectangleFill::Constant(Color::BLACK));
    assert_eq!(r.key_frames[1].value.x2, 20);

    let SceneObject::Score(s) = &scene.objects[1] else {
        panic!("expected score");
    };
    assert_eq!(s.anchor, Anchor::new(HAlign::Right, VAlign::Bottom));
    assert_eq!(s.color, Color::WHITE);

    let SceneObject::Telemetry(g) = &scene.objects[2] else {
        panic!("expected telemetry");
    };
    assert!(matches!(
        g.elements[1],
        TelemetryElement::Map {
            zoom: DEFAULT_MAP_ZOOM,
            overlay: None,
            ..
        }
    ));
    scene.validate().unwrap();
}

#[test]
fn bad_json_is_a_validation_error() {
    let err = Scene::from_json("{\"canvas\": 3}").unwrap_err();
    assert!(matches!(err, OverlayError::Validation(_)));
}

#[test]
fn max_timestamp_is_latest_final_keyframe() {
    assert_eq!(Scene::new(canvas()).max_timestamp(), 0.0);
    let scene = Scene::new(canvas())
        .with_object(RectangleObject {
            fill: RectangleFill::default(),
            key_frames: vec![rect(0.0, 1), rect(3.5, 2)],
        })
        .with_object(TextObject {
            anchor: Anchor::default(),
            text: "hi".into(),
            color: Color::WHITE,
            key_frames: vec![KeyFrame::new(1.0, TimeFrame {}), KeyFrame::new(2.0, TimeFrame {})],
        });
    assert_eq!(scene.max_timestamp(), 3.5);
}

#[test]
fn validate_collects_every_problem() {
    let scene = Scene::new(canvas())
        .with_object(RectangleObject {
            fill: RectangleFill::Keyframed,
            key_frames: vec![rect(1.0, 1), rect(0.5, 2)],
        })
        .with_object(TelemetryGroup {
            trace: "missing".into(),
            elements: vec![
                TelemetryElement::Speed {
                    anchor: Anchor::default(),
                    dial: Some(SpeedDial {
                        face: "face.svg".into(),
                        needle: "needle.svg".into(),
                        full_speed: 0.0,
                    }),
                },
                TelemetryElement::Map {
                    anchor: Anchor::default(),
                    overlay: Some("route".into()),
                    trace_color: Color::WHITE,
                    zoom: 17,
                },
            ],
            key_frames: vec![],
        });

    let msg = scene.validate().unwrap_err().to_string();
    assert!(msg.contains("$.objects[0].key_frames[1]: timestamps must be ascending"));
    assert!(msg.contains("$.objects[0].key_frames[0]: keyframed rectangle needs a color"));
    assert!(msg.contains("$.objects[1].trace: unknown trace 'missing'"));
    assert!(msg.contains("$.objects[1].elements[0].dial.full_speed"));
    assert!(msg.contains("$.objects[1].elements[1].overlay: unknown overlay 'route'"));
}

#[test]
fn serialise_round_trips_through_json() {
    let scene = Scene::new(canvas()).with_object(CurveObject {
        color: Color::rgb(1, 2, 3),
        key_frames: vec![KeyFrame::new(
            0.0,
            CurveFrame {
                points: [Point::new(0.0, 0.0); 4],
                stroke_width: 2.0,
                t: 0.5,
            },
        )],
    });
    let json = serde_json::to_string(&scene).unwrap();
    assert!(json.contains("\"kind\":\"curve\""));
    assert_eq!(Scene::from_json(&json).unwrap(), scene);
}

#[test]
fn kind_names_match_serde_tags() {
    let obj: SceneObject = TimerObject {
        anchor: Anchor::default(),
        color: Color::WHITE,
        key_frames: vec![],
    }
    .into();
    assert_eq!(obj.kind(), "timer");
    let json = serde_json::to_value(&obj).unwrap();
    assert_eq!(json["kind"], "timer");
}
