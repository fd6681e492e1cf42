use egui::{Color32, Vec2};
use holiday_lights::geometry::{PlacementParams, place_along, place_lights};
use holiday_lights::lights::{default_style, find_style};
use holiday_lights::stroke::{Point, Stroke};

const CONTAINER: Vec2 = Vec2::new(1000.0, 1000.0);

fn horizontal(length_px: f32) -> Stroke {
    Stroke::new(vec![Point::new(0.0, 50.0), Point::new(length_px / 10.0, 50.0)]).unwrap()
}

#[test]
fn test_count_is_floor_length_over_spacing_plus_one() {
    let params = PlacementParams::default();
    let style = default_style();
    let cases = [
        (19.0, 1),
        (19.99, 1),
        (20.0, 2),
        (95.0, 5),
        (100.0, 6),
        (399.9, 20),
        (800.0, 41),
    ];
    for (length, expected) in cases {
        let lights = place_along(&horizontal(length), style, CONTAINER, &params);
        assert_eq!(lights.len(), expected, "length {}", length);
    }
}

#[test]
fn test_bulbs_follow_corners() {
    // 400 px down, then 300 px across
    let stroke = Stroke::new(vec![
        Point::new(10.0, 10.0),
        Point::new(10.0, 50.0),
        Point::new(40.0, 50.0),
    ])
    .unwrap();
    let lights = place_along(&stroke, default_style(), CONTAINER, &PlacementParams::default());

    assert_eq!(lights.len(), 36);
    let corner = lights[20].position;
    assert!((corner.x - 10.0).abs() < 1e-3 && (corner.y - 50.0).abs() < 1e-3);
    let last = lights[35].position;
    assert!((last.x - 40.0).abs() < 1e-3 && (last.y - 50.0).abs() < 1e-3);
}

#[test]
fn test_end_to_end_warm_white_strand() {
    let container = Vec2::new(1000.0, 500.0);
    let stroke = Stroke::new_ref(vec![Point::new(10.0, 50.0), Point::new(90.0, 50.0)]).unwrap();
    let style = find_style("warm-white").unwrap();
    let lights = place_lights(&[stroke], style, container, &PlacementParams::default());

    assert_eq!(lights.len(), 41);
    for (i, light) in lights.iter().enumerate() {
        let x_px = light.position.x / 100.0 * container.x;
        assert!((x_px - (100.0 + 20.0 * i as f32)).abs() < 1e-2);
        assert_eq!(light.position.y, 50.0);
        assert_eq!(light.color, style.primary_color());
    }
    assert!((lights[40].position.x - 90.0).abs() < 1e-3);
}

#[test]
fn test_pattern_colors_restart_on_every_line() {
    let style = find_style("festive").unwrap();
    let a = Stroke::new_ref(vec![Point::new(0.0, 10.0), Point::new(10.0, 10.0)]).unwrap();
    let b = Stroke::new_ref(vec![Point::new(0.0, 20.0), Point::new(10.0, 20.0)]).unwrap();
    let lights = place_lights(&[a, b], style, CONTAINER, &PlacementParams::default());

    let per_line = lights.len() / 2;
    assert_eq!(per_line, 6);
    for i in 0..per_line {
        assert_eq!(lights[i].color, style.color_at(i));
        assert_eq!(lights[per_line + i].color, style.color_at(i));
    }
    assert_ne!(lights[0].color, lights[1].color);
}

#[test]
fn test_placement_is_stable() {
    let style = find_style("multicolor").unwrap();
    let stroke = horizontal(500.0);
    let params = PlacementParams::default();
    assert_eq!(
        place_along(&stroke, style, CONTAINER, &params),
        place_along(&stroke, style, CONTAINER, &params)
    );
}

#[test]
fn test_per_line_cap() {
    let params = PlacementParams {
        spacing_px: 1.0,
        max_per_stroke: 5,
    };
    let lights = place_along(&horizontal(900.0), default_style(), CONTAINER, &params);
    assert_eq!(lights.len(), 5);
}

#[test]
fn test_unmeasured_container_places_nothing() {
    let lights = place_along(
        &horizontal(500.0),
        default_style(),
        Vec2::ZERO,
        &PlacementParams::default(),
    );
    assert!(lights.is_empty());
    assert_ne!(default_style().primary_color(), Color32::TRANSPARENT);
}
