use super::*;

fn xs_and_sizes(glyphs: &[BannerGlyph]) -> Vec<(f64, f64)> {
    glyphs.iter().map(|g| (g.at.x, g.size_px)).collect()
}

#[test]
fn gradually_grows_each_character() {
    let glyphs = banner_layout("啊啊啊啊", &BannerOptions::default()).unwrap();
    assert_eq!(
        xs_and_sizes(&glyphs),
        [(0.0, 18.0), (20.0, 22.0), (44.0, 26.0), (72.0, 30.0)]
    );
    assert!(glyphs.iter().all(|g| g.at.y == 29.5));
}

#[test]
fn equal_mode_uses_a_fixed_step() {
    let opts = BannerOptions {
        mode: BannerMode::Equal,
        ..BannerOptions::default()
    };
    let glyphs = banner_layout("救命啊", &opts).unwrap();
    assert_eq!(
        xs_and_sizes(&glyphs),
        [(0.0, 37.0), (37.0, 37.0), (74.0, 37.0)]
    );
    assert!(glyphs.iter().all(|g| g.at.y == 45.0));
}

#[test]
fn metrics_scale_with_canvas_width() {
    let opts = BannerOptions {
        width: 1050,
        height: 580,
        ..BannerOptions::default()
    };
    let glyphs = banner_layout("啊啊", &opts).unwrap();
    assert_eq!(xs_and_sizes(&glyphs), [(0.0, 36.0), (40.0, 44.0)]);
    assert_eq!(glyphs[0].at.y, 59.0);
}

#[test]
fn characters_past_the_right_edge_are_dropped() {
    let opts = BannerOptions {
        mode: BannerMode::Equal,
        ..BannerOptions::default()
    };
    // 525 / 37 leaves room for 15 starting positions.
    let glyphs = banner_layout(&"啊".repeat(40), &opts).unwrap();
    assert_eq!(glyphs.len(), 15);
    assert_eq!(glyphs[14].at.x, 518.0);

    let glyphs = banner_layout("a\nb", &opts).unwrap();
    assert_eq!(glyphs.iter().map(|g| g.ch).collect::<String>(), "ab");
}

#[test]
fn render_fills_background() {
    let opts = BannerOptions {
        background: Rgba8::rgb(255, 255, 0),
        ..BannerOptions::default()
    };
    let img = render_banner("啊", &opts, &FontLibrary::empty()).unwrap();
    assert_eq!(img.dimensions(), (525, 290));
    assert_eq!(img.get_pixel(524, 289).0, [255, 255, 0, 255]);
}

#[test]
fn rejects_empty_text_and_empty_canvas() {
    let err = render_banner(" \n", &BannerOptions::default(), &FontLibrary::empty()).unwrap_err();
    assert!(err.to_string().starts_with("validation error:"));
    let flat = BannerOptions {
        height: 0,
        ..BannerOptions::default()
    };
    assert!(banner_layout("啊", &flat).is_err());
}

#[test]
fn spec_reads_palette_names() {
    let spec: BannerSpec = serde_json::from_str(
        r#"{ "text": "啊", "options": { "mode": "equal", "color": "red", "background": "black" } }"#,
    )
    .unwrap();
    assert_eq!(spec.options.mode, BannerMode::Equal);
    assert_eq!(spec.options.color, Rgba8::rgb(255, 0, 0));
    assert_eq!(spec.options.background, Rgba8::BLACK);
    assert_eq!(spec.options.width, 525);
}
