use super::*;

fn canvas() -> Canvas {
    Canvas {
        width: 300,
        height: 150,
    }
}

const TOP_LEFT: Anchor = Anchor::new(HAlign::Left, VAlign::Top);
const BOTTOM_RIGHT: Anchor = Anchor::new(HAlign::Right, VAlign::Bottom);

#[test]
fn gap_is_a_fifteenth_of_the_height() {
    assert_eq!(LayoutContext::new(canvas()).gap(), 10.0);
}

#[test]
fn same_anchor_top_stacks_downwards() {
    let mut ctx = LayoutContext::new(canvas());
    let ys: Vec<f64> = (0..4).map(|_| ctx.place(TOP_LEFT, 20.0, 7.0).y).collect();
    assert_eq!(ys, vec![10.0, 17.0, 24.0, 31.0]);
}

#[test]
fn bottom_anchor_stacks_upwards() {
    let mut ctx = LayoutContext::new(canvas());
    let a = ctx.place(BOTTOM_RIGHT, 50.0, 20.0);
    let b = ctx.place(BOTTOM_RIGHT, 30.0, 5.0);
    assert_eq!(a, Point::new(240.0, 120.0));
    assert_eq!(b, Point::new(260.0, 115.0));
}

#[test]
fn horizontal_position_ignores_stacking() {
    let mut ctx = LayoutContext::new(canvas());
    let mid = Anchor::new(HAlign::Middle, VAlign::Top);
    assert_eq!(ctx.place(mid, 100.0, 10.0).x, 100.0);
    assert_eq!(ctx.place(mid, 40.0, 10.0).x, 130.0);
}

#[test]
fn anchors_have_independent_offsets() {
    let mut ctx = LayoutContext::new(canvas());
    ctx.place(TOP_LEFT, 10.0, 30.0);
    let other = Anchor::new(HAlign::Right, VAlign::Top);
    assert_eq!(ctx.place(other, 10.0, 5.0).y, 10.0);
    assert_eq!(ctx.offset(TOP_LEFT), 30.0);
    assert_eq!(ctx.offset(other), 5.0);
    assert_eq!(ctx.offset(BOTTOM_RIGHT), 0.0);
}

#[test]
fn reset_restarts_the_same_sequence() {
    let mut ctx = LayoutContext::new(canvas());
    let first: Vec<f64> = (0..3).map(|_| ctx.place(TOP_LEFT, 1.0, 12.0).y).collect();
    ctx.reset();
    let second: Vec<f64> = (0..3).map(|_| ctx.place(TOP_LEFT, 1.0, 12.0).y).collect();
    assert_eq!(first, second);
    assert_eq!(first, vec![10.0, 22.0, 34.0]);
}
