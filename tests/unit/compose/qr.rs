use image::Rgba;

use super::*;

#[test]
fn version_one_symbol_is_21_modules() {
    let m = QrMatrix::encode("hello", QrEcLevel::L).unwrap();
    assert_eq!(m.width, 21);
    assert_eq!(m.dark.len(), 21 * 21);
    // Finder pattern corners are always dark.
    assert!(m.is_dark(0, 0));
    assert!(m.is_dark(20, 0));
    assert!(m.is_dark(0, 20));
}

#[test]
fn utf8_text_encodes() {
    let m = QrMatrix::encode("数字转大写一键生成", QrEcLevel::M).unwrap();
    assert!(m.width >= 21);
}

#[test]
fn empty_text_is_rejected() {
    assert!(QrMatrix::encode("", QrEcLevel::M).is_err());
    assert!(render_qr("", &QrOptions::default(), None).is_err());
}

#[test]
fn image_size_and_quiet_zone() {
    let opts = QrOptions {
        module_px: 4,
        quiet_zone: 2,
        ec_level: QrEcLevel::L,
        ..QrOptions::default()
    };
    let img = render_qr("hello", &opts, None).unwrap();
    assert_eq!(img.dimensions(), (100, 100));
    // Quiet zone is background, top-left finder module is foreground.
    assert_eq!(img.get_pixel(3, 3).0, [255, 255, 255, 255]);
    assert_eq!(img.get_pixel(8, 8).0, [0, 0, 0, 255]);
}

#[test]
fn custom_colours_are_used() {
    let opts = QrOptions {
        module_px: 2,
        quiet_zone: 1,
        foreground: Rgba8::rgb(0, 0, 128),
        background: Rgba8::rgb(255, 255, 0),
        ..QrOptions::default()
    };
    let img = render_qr("x", &opts, None).unwrap();
    assert_eq!(img.get_pixel(0, 0).0, [255, 255, 0, 255]);
    assert_eq!(img.get_pixel(2, 2).0, [0, 0, 128, 255]);
}

#[test]
fn logo_lands_in_the_centre() {
    let logo = RgbaImage::from_pixel(500, 500, Rgba([255, 0, 0, 255]));
    let opts = QrOptions::default();
    let img = render_qr("https://example.com", &opts, Some(&logo)).unwrap();
    let (w, h) = img.dimensions();
    let c = img.get_pixel(w / 2, h / 2).0;
    assert!(c[0] > 250 && c[1] < 5, "centre pixel {c:?}");
    assert_eq!(img.get_pixel(0, 0).0, [255, 255, 255, 255]);
}

#[test]
fn zero_module_size_is_rejected() {
    let opts = QrOptions {
        module_px: 0,
        ..QrOptions::default()
    };
    assert!(render_qr("x", &opts, None).is_err());
}

#[test]
fn logo_raises_error_correction_to_q() {
    // 26 bytes: version 2 at level L, version 3 at level Q.
    let text = "https://example.com/gongju";
    let low = QrMatrix::encode(text, QrEcLevel::L).unwrap().width as u32;
    let q = QrMatrix::encode(text, QrEcLevel::Q).unwrap().width as u32;
    let h = QrMatrix::encode(text, QrEcLevel::H).unwrap().width as u32;
    assert_ne!(low, q);

    let opts = QrOptions {
        module_px: 1,
        quiet_zone: 0,
        ec_level: QrEcLevel::L,
        ..QrOptions::default()
    };
    let logo = RgbaImage::from_pixel(4, 4, Rgba([255, 0, 0, 255]));
    assert_eq!(render_qr(text, &opts, None).unwrap().width(), low);
    assert_eq!(render_qr(text, &opts, Some(&logo)).unwrap().width(), q);

    // A higher requested level is kept.
    let opts = QrOptions {
        ec_level: QrEcLevel::H,
        ..opts
    };
    assert_eq!(render_qr(text, &opts, Some(&logo)).unwrap().width(), h);
}

fn red_bounds(img: &RgbaImage) -> (u32, u32) {
    let red: Vec<_> = img
        .enumerate_pixels()
        .filter(|(_, _, p)| p.0[0] > 200 && p.0[1] < 60 && p.0[2] < 60)
        .map(|(x, y, _)| (x, y))
        .collect();
    assert!(!red.is_empty());
    let w = red.iter().map(|p| p.0).max().unwrap() - red.iter().map(|p| p.0).min().unwrap() + 1;
    let h = red.iter().map(|p| p.1).max().unwrap() - red.iter().map(|p| p.1).min().unwrap() + 1;
    (w, h)
}

#[test]
fn logo_covers_at_most_a_fifth_of_the_symbol() {
    let text = "https://example.com/gongju";
    let opts = QrOptions {
        module_px: 4,
        ..QrOptions::default()
    };
    let symbol_px = QrMatrix::encode(text, QrEcLevel::Q).unwrap().width as u32 * 4;

    let square = RgbaImage::from_pixel(500, 500, Rgba([255, 0, 0, 255]));
    let (w, h) = red_bounds(&render_qr(text, &opts, Some(&square)).unwrap());
    assert!(w <= symbol_px / 5 && h <= symbol_px / 5, "{w}x{h} on {symbol_px}");
    assert!(w >= symbol_px / 5 - 1);

    let wide = RgbaImage::from_pixel(300, 100, Rgba([255, 0, 0, 255]));
    let (w, h) = red_bounds(&render_qr(text, &opts, Some(&wide)).unwrap());
    assert!(w <= symbol_px / 5, "{w} on {symbol_px}");
    assert!(h < w);

    // Small logos are not upscaled.
    let tiny = RgbaImage::from_pixel(6, 6, Rgba([255, 0, 0, 255]));
    assert_eq!(red_bounds(&render_qr(text, &opts, Some(&tiny)).unwrap()), (6, 6));
}
