use super::*;

fn point(time: f64, speed: f64) -> TracePoint {
    TracePoint {
        time,
        lat: time,
        lon: -time,
        speed,
        elevation: 100.0 + time,
        distance: time * 10.0,
    }
}

fn trace() -> Trace {
    Trace::new(vec![point(10.0, 2.0), point(0.0, 0.0), point(2.0, 4.0), point(30.0, 1.0)])
}

#[test]
fn new_sorts_and_drops_duplicate_times() {
    let t = Trace::new(vec![point(2.0, 1.0), point(1.0, 1.0), point(2.0, 9.0)]);
    let times: Vec<f64> = t.points().iter().map(|p| p.time).collect();
    assert_eq!(times, vec![1.0, 2.0]);
    assert_eq!(t.points()[1].speed, 1.0);
}

#[test]
fn interpolates_between_close_points() {
    let s = trace().find_sample(1.0).unwrap();
    assert!((s.speed - 2.0).abs() < 1e-12);
    assert!((s.lat - 1.0).abs() < 1e-12);
    assert!((s.distance - 10.0).abs() < 1e-12);
    assert!((s.elevation - 101.0).abs() < 1e-12);
}

#[test]
fn exact_hit_returns_that_point() {
    let s = trace().find_sample(2.0).unwrap();
    assert_eq!(s.speed, 4.0);
}

#[test]
fn far_neighbour_is_ignored() {
    // 2 -> 10 is an 8 s gap: at 3 s only the earlier point is in range.
    assert_eq!(trace().find_sample(3.0).unwrap().speed, 4.0);
    // At 9 s only the later one is.
    assert_eq!(trace().find_sample(9.0).unwrap().speed, 2.0);
}

#[test]
fn gap_in_both_directions_is_no_data() {
    assert!(trace().find_sample(20.0).is_none());
}

#[test]
fn edges_allow_the_time_gap() {
    let t = trace();
    assert_eq!(t.find_sample(-5.0).unwrap().speed, 0.0);
    assert!(t.find_sample(-5.1).is_none());
    assert_eq!(t.find_sample(35.0).unwrap().speed, 1.0);
    assert!(t.find_sample(35.1).is_none());
}

#[test]
fn empty_trace_has_no_data() {
    assert!(Trace::default().find_sample(0.0).is_none());
}

#[test]
fn from_fixes_accumulates_distance_and_derives_speed() {
    let fixes = [
        Fix {
            time: 0.0,
            lat: 0.0,
            lon: 0.0,
            elevation: 5.0,
            speed: None,
        },
        Fix {
            time: 10.0,
            lat: 0.0,
            lon: 0.001,
            elevation: 6.0,
            speed: None,
        },
        Fix {
            time: 20.0,
            lat: 0.0,
            lon: 0.002,
            elevation: 7.0,
            speed: Some(3.0),
        },
    ];
    let t = Trace::from_fixes(&fixes);
    let step = distance_between(0.0, 0.0, 0.0, 0.001);
    assert!((step - 111.319).abs() < 0.01);
    let p = t.points();
    assert_eq!(p[0].distance, 0.0);
    assert_eq!(p[0].speed, 0.0);
    assert!((p[1].speed - step / 10.0).abs() < 1e-9);
    assert!((p[2].distance - 2.0 * step).abs() < 1e-6);
    assert_eq!(p[2].speed, 3.0);
}

#[test]
fn json_is_a_plain_point_list() {
    let t: Trace = serde_json::from_str(
        r#"[{"time": 5, "lat": 1, "lon": 2}, {"time": 1, "lat": 3, "lon": 4, "speed": 2}]"#,
    )
    .unwrap();
    assert_eq!(t.len(), 2);
    assert_eq!(t.points()[0].time, 1.0);
    assert_eq!(t.points()[1].elevation, 0.0);
}
