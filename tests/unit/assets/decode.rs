use super::*;

#[test]
fn png_bytes_decode_back_to_same_pixels() {
    let img = RgbaImage::from_pixel(3, 2, image::Rgba([10, 20, 30, 128]));
    let bytes = encode_png(&img).unwrap();
    let back = decode_image(&bytes).unwrap();
    assert_eq!(back.dimensions(), (3, 2));
    assert_eq!(back.get_pixel(2, 1).0, [10, 20, 30, 128]);
}

#[test]
fn garbage_bytes_fail_to_decode() {
    assert!(decode_image(b"definitely not an image").is_err());
}

#[test]
fn save_image_flattens_jpeg_and_creates_dirs() {
    let dir = std::path::PathBuf::from("target").join("unit_decode");
    let _ = std::fs::remove_dir_all(&dir);

    let img = RgbaImage::from_pixel(4, 4, image::Rgba([200, 0, 0, 255]));
    let jpg = dir.join("nested").join("out.jpg");
    save_image(&img, &jpg).unwrap();
    let back = load_image(&jpg).unwrap();
    assert_eq!(back.dimensions(), (4, 4));
    assert_eq!(back.get_pixel(0, 0).0[3], 255);

    assert!(save_image(&img, &dir.join("out.unknown-ext")).is_err());
}
