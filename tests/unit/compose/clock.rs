use super::*;

fn close(a: Point, b: Point) -> bool {
    (a.x - b.x).abs() < 1e-6 && (a.y - b.y).abs() < 1e-6
}

#[test]
fn three_oclock_points_hour_hand_right_and_minute_hand_up() {
    let g = ClockGeometry::new(ClockTime::new(15, 0, 0).unwrap(), 375).unwrap();
    let c = Point::new(187.5, 187.5);
    assert!(close(g.center, c));

    let hour_len = 375.0 / 4.5 - 20.0;
    assert!(close(g.hour_hand.to, Point::new(187.5 + hour_len, 187.5)));
    assert!(close(g.hour_hand.from, Point::new(187.5 - 20.0, 187.5)));

    let minute_len = 375.0 / 3.5 - 20.0;
    assert!(close(g.minute_hand.to, Point::new(187.5, 187.5 - minute_len)));
    assert_eq!(g.minute_hand.width, 5.0);
    assert_eq!(g.hour_hand.width, 7.0);
}

#[test]
fn second_hand_at_thirty_points_down() {
    let g = ClockGeometry::new(ClockTime::new(0, 0, 30).unwrap(), 300).unwrap();
    let len = 300.0 / 3.0 - 20.0;
    assert!(close(g.second_hand.to, Point::new(150.0, 150.0 + len)));
}

#[test]
fn hour_hand_advances_with_minutes() {
    let g = ClockGeometry::new(ClockTime::new(0, 30, 0).unwrap(), 375).unwrap();
    let v = g.hour_hand.to - g.center;
    // Half past midnight: 15 degrees clockwise from 12.
    let angle = v.x.atan2(-v.y).to_degrees();
    assert!((angle - 15.0).abs() < 1e-6, "angle {angle}");
}

#[test]
fn tick_and_numeral_counts() {
    let g = ClockGeometry::new(ClockTime::new(1, 2, 3).unwrap(), 375).unwrap();
    assert_eq!(g.minute_ticks.len(), 60);
    assert_eq!(g.hour_ticks.len(), 12);
    assert_eq!(g.numerals.len(), 12);
    let (twelve, at) = g.numerals[11];
    assert_eq!(twelve, 12);
    assert!(close(at, Point::new(187.5, 187.5 - (375.0 / 2.0 - 55.0))));
}

#[test]
fn invalid_inputs_are_rejected() {
    assert!(ClockTime::new(24, 0, 0).is_err());
    assert!(ClockTime::new(0, 60, 0).is_err());
    assert!(ClockGeometry::new(ClockTime::new(1, 0, 0).unwrap(), 100).is_err());
}

#[test]
fn parse_accepts_with_and_without_seconds() {
    assert_eq!(
        ClockTime::parse("10:08:30").unwrap(),
        ClockTime::new(10, 8, 30).unwrap()
    );
    assert_eq!(
        ClockTime::parse(" 23:59 ").unwrap(),
        ClockTime::new(23, 59, 0).unwrap()
    );
    assert!(ClockTime::parse("25:00").is_err());
    assert!(ClockTime::parse("noon").is_err());
}

#[test]
fn render_draws_rim_and_hands_on_background() {
    let style = ClockStyle {
        side: 200,
        numerals: false,
        ..ClockStyle::default()
    };
    let img = render_clock(
        ClockTime::new(3, 0, 0).unwrap(),
        &style,
        &FontLibrary::empty(),
    )
    .unwrap();
    assert_eq!(img.dimensions(), (200, 200));
    assert_eq!(img.get_pixel(1, 1).0, [255, 255, 255, 255]);

    // Rim at radius 70 on the left, hour hand along +x.
    assert!(img.get_pixel(30, 100).0[0] < 128);
    assert!(img.get_pixel(115, 100).0[0] < 64);
}
