use image::Rgba;

use super::*;

fn opts(text: &str) -> WatermarkOptions {
    WatermarkOptions {
        text: text.to_string(),
        ..WatermarkOptions::default()
    }
}

#[test]
fn reference_width_uses_base_metrics() {
    let short = WatermarkLayout::new(&opts("仅供参考"), 375, 600).unwrap();
    assert_eq!(short.font_px, 18.0);
    assert_eq!(short.col_step, 4.0 * 30.0);
    assert_eq!(short.row_step, 80.0);

    let long = WatermarkLayout::new(&opts("仅供办理业务使用"), 375, 600).unwrap();
    assert_eq!(long.col_step, 8.0 * 20.0);
}

#[test]
fn metrics_scale_with_photo_width() {
    let l = WatermarkLayout::new(&opts("abc"), 750, 100).unwrap();
    assert_eq!(l.font_px, 36.0);
    assert_eq!(l.col_step, 180.0);
    assert_eq!(l.row_step, 160.0);
}

#[test]
fn anchors_cover_every_corner_of_the_photo() {
    let (w, h) = (640u32, 480u32);
    let l = WatermarkLayout::new(&opts("水印"), w, h).unwrap();
    for corner in [(0.0, 0.0), (640.0, 0.0), (0.0, 480.0), (640.0, 480.0)] {
        let p = l.rotation.inverse() * Point::new(corner.0, corner.1);
        let near = l.anchors.iter().any(|a| {
            (a.x - p.x).abs() <= l.col_step && (a.y - p.y).abs() <= l.row_step
        });
        assert!(near, "no anchor near corner {corner:?}");
    }
}

#[test]
fn invalid_options_are_rejected() {
    assert!(WatermarkLayout::new(&opts("   "), 10, 10).is_err());
    let mut o = opts("x");
    o.alpha = 1.5;
    assert!(o.validate().is_err());
    o.alpha = f32::NAN;
    assert!(o.validate().is_err());
}

#[test]
fn output_keeps_photo_size_and_pixels_without_fonts() {
    let photo = RgbaImage::from_pixel(120, 80, Rgba([10, 200, 30, 255]));
    let out = apply_watermark(&photo, &opts("mark"), &FontLibrary::empty()).unwrap();
    assert_eq!(out.dimensions(), (120, 80));
    assert_eq!(out.get_pixel(60, 40).0, [10, 200, 30, 255]);
}

#[test]
fn options_flatten_into_job_spec() {
    let spec: WatermarkSpec = serde_json::from_str(
        r#"{ "image": "a.jpg", "text": "样张", "color": "red", "alpha": 0.3 }"#,
    )
    .unwrap();
    assert_eq!(spec.options.text, "样张");
    assert_eq!(spec.options.color, Rgba8::rgb(255, 0, 0));
    assert_eq!(spec.options.angle_deg, 30.0);
}

#[test]
fn tall_strip_keeps_copies_near_the_photo() {
    let l = WatermarkLayout::new(&opts("水"), 40, 16_384).unwrap();
    // The rotated bounding box alone would hold millions of copies.
    assert!(l.anchors.len() < 40_000, "{} copies", l.anchors.len());

    let inv = l.rotation.inverse();
    let outline = [(0.0, 0.0), (40.0, 0.0), (40.0, 16_384.0), (0.0, 16_384.0)]
        .map(|(x, y)| inv * Point::new(x, y));
    for a in &l.anchors {
        let (lo, hi) = span_in_band(&outline, a.y - l.font_px, a.y + l.font_px / 2.0)
            .expect("every row crosses the photo");
        assert!(a.x >= lo - 2.0 * l.col_step && a.x <= hi + l.col_step, "stray copy at {a:?}");
    }
}

#[test]
fn hairline_photo_exceeds_copy_limit() {
    let err = WatermarkLayout::new(&opts("水"), 8, 16_384).unwrap_err();
    assert!(err.to_string().starts_with("validation error:"));
}
