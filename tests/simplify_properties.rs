use holiday_lights::geometry::simplify::{perpendicular_distance, simplify};
use holiday_lights::stroke::Point;

// A wobbly freehand gesture across the container
fn gesture() -> Vec<Point> {
    (0..=80)
        .map(|i| {
            let x = 10.0 + i as f32;
            let y = 50.0 + (i as f32 * 0.35).sin() * 4.0 + if i % 7 == 0 { 0.6 } else { 0.0 };
            Point::new(x, y)
        })
        .collect()
}

fn distance_to_polyline(p: Point, line: &[Point]) -> f32 {
    line.windows(2)
        .map(|w| perpendicular_distance(p, w[0], w[1]))
        .fold(f32::INFINITY, f32::min)
}

#[test]
fn test_endpoints_are_kept_exactly() {
    let input = gesture();
    for epsilon in [0.1, 1.5, 10.0] {
        let output = simplify(&input, epsilon);
        assert!(output.len() >= 2);
        assert_eq!(output.first(), input.first());
        assert_eq!(output.last(), input.last());
    }
}

#[test]
fn test_output_is_a_subsequence_of_the_input() {
    let input = gesture();
    let output = simplify(&input, 1.5);

    let mut cursor = 0;
    for p in &output {
        let offset = input[cursor..]
            .iter()
            .position(|q| q == p)
            .unwrap_or_else(|| panic!("{:?} is not an input point in order", p));
        cursor += offset + 1;
    }
}

#[test]
fn test_dropped_points_stay_within_tolerance() {
    let input = gesture();
    let epsilon = 1.5;
    let output = simplify(&input, epsilon);
    assert!(output.len() < input.len());

    for p in &input {
        let d = distance_to_polyline(*p, &output);
        assert!(d <= epsilon + 1e-3, "{:?} is {} away from the simplified line", p, d);
    }
}

#[test]
fn test_simplifying_twice_changes_nothing() {
    let input = gesture();
    let once = simplify(&input, 1.5);
    assert_eq!(simplify(&once, 1.5), once);
}

#[test]
fn test_larger_tolerance_never_keeps_more_points() {
    let input = gesture();
    let fine = simplify(&input, 0.5);
    let coarse = simplify(&input, 3.0);
    assert!(coarse.len() <= fine.len());
}

#[test]
fn test_collinear_points_collapse_to_endpoints() {
    let input: Vec<Point> = (0..10).map(|i| Point::new(i as f32 * 10.0, 25.0)).collect();
    assert_eq!(
        simplify(&input, 1.5),
        vec![Point::new(0.0, 25.0), Point::new(90.0, 25.0)]
    );
}
