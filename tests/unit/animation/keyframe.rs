use super::*;

fn frames(ts: &[f64]) -> Vec<KeyFrame<u32>> {
    ts.iter()
        .enumerate()
        .map(|(i, &t)| KeyFrame::new(t, i as u32))
        .collect()
}

#[test]
fn fewer_than_two_keyframes_is_never_visible() {
    let empty: Vec<KeyFrame<u32>> = vec![];
    let one = frames(&[1.0]);
    for t in [-10.0, 0.0, 0.5, 1.0, 2.0, 1e9] {
        assert!(locate(&empty, t).is_none());
        assert!(locate(&one, t).is_none());
    }
}

#[test]
fn before_first_and_after_last_are_not_visible() {
    let kf = frames(&[1.0, 2.0, 4.0]);
    assert!(locate(&kf, 0.5).is_none());
    assert!(locate(&kf, 4.0).is_none());
    assert!(locate(&kf, 10.0).is_none());
}

#[test]
fn factor_is_exact_between_brackets() {
    let kf = frames(&[1.0, 3.0]);
    let s = locate(&kf, 1.0).unwrap();
    assert_eq!(s.factor, 0.0);
    let s = locate(&kf, 1.5).unwrap();
    assert_eq!(s.factor, (1.5 - 1.0) / (3.0 - 1.0));
    let s = locate(&kf, 2.999).unwrap();
    assert!(s.factor < 1.0 && s.factor > 0.99);
}

#[test]
fn factor_is_monotonic_in_time() {
    let kf = frames(&[0.0, 10.0]);
    let mut prev = -1.0;
    for step in 0..100 {
        let f = locate(&kf, step as f64 * 0.1).unwrap().factor;
        assert!(f > prev);
        prev = f;
    }
}

#[test]
fn exact_keyframe_time_starts_the_next_span() {
    let kf = frames(&[0.0, 1.0, 2.0]);
    let s = locate(&kf, 1.0).unwrap();
    assert_eq!((s.start.value, s.end.value), (1, 2));
    assert_eq!(s.start_index, 1);
    assert_eq!(s.factor, 0.0);
}

#[test]
fn progress_holds_at_end_state() {
    let kf = frames(&[0.0, 1.0]);
    let mut s = locate(&kf, 0.5).unwrap();
    s.factor = 1.7;
    assert_eq!(s.progress(), 1.0);
}

#[test]
fn cursor_matches_full_scan_in_any_order() {
    let kf = frames(&[0.0, 1.0, 2.0, 3.0, 5.0, 8.0]);
    let mut cursor = KeyFrameCursor::default();
    let times = [0.1, 2.5, 7.9, 0.4, 8.0, 4.0, 3.0, -1.0, 6.0, 1.0];
    for t in times {
        let a = locate(&kf, t).map(|s| (s.start_index, s.factor));
        let b = cursor.locate(&kf, t).map(|s| (s.start_index, s.factor));
        assert_eq!(a, b, "t = {t}");
    }
}

#[test]
fn cursor_remembers_last_start() {
    let kf = frames(&[0.0, 1.0, 2.0, 3.0]);
    let mut cursor = KeyFrameCursor::default();
    cursor.locate(&kf, 2.5).unwrap();
    assert_eq!(cursor.position(), 2);
    assert!(cursor.locate(&kf, 3.5).is_none());
    assert_eq!(cursor.position(), 2);
}

#[test]
fn keyframe_payload_is_flattened_in_json() {
    #[derive(serde::Deserialize, Debug, PartialEq)]
    struct P {
        x: i32,
    }
    let k: KeyFrame<P> = serde_json::from_str(r#"{"timestamp":1.5,"x":3}"#).unwrap();
    assert_eq!(k.timestamp, 1.5);
    assert_eq!(k.value, P { x: 3 });
}
