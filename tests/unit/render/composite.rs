use super::*;

#[test]
fn over_opacity_0_is_noop() {
    let dst = [1, 2, 3, 4];
    let src = [200, 200, 200, 200];
    assert_eq!(over(dst, src, 0.0), dst);
}

#[test]
fn over_src_alpha_0_is_noop() {
    let dst = [10, 20, 30, 40];
    let src = [255, 255, 255, 0];
    assert_eq!(over(dst, src, 1.0), dst);
}

#[test]
fn over_src_opaque_replaces_dst() {
    let dst = [0, 0, 0, 255];
    let src = [255, 0, 0, 255];
    assert_eq!(over(dst, src, 1.0), src);
}

#[test]
fn over_half_opacity_mixes() {
    let dst = [0, 0, 255, 255];
    let src = [255, 0, 0, 255];
    let out = over(dst, src, 0.5);
    assert_eq!(out[3], 255);
    assert!(out[0].abs_diff(128) <= 1);
    assert!(out[2].abs_diff(127) <= 1);
}

#[test]
fn over_in_place_rejects_mismatched_buffers() {
    let mut dst = vec![0u8; 8];
    assert!(over_in_place(&mut dst, &[0u8; 4], 1.0).is_err());
    assert!(over_in_place(&mut dst[..7], &[0u8; 7], 1.0).is_err());
}

#[test]
fn overlay_keeps_base_where_layer_is_transparent() {
    let mut base = RgbaImage::from_pixel(2, 1, image::Rgba([10, 20, 30, 255]));
    let layer = vec![0, 0, 0, 0, 255, 255, 255, 255];
    overlay_premul_layer(&mut base, &layer, 1.0).unwrap();
    assert_eq!(base.get_pixel(0, 0).0, [10, 20, 30, 255]);
    assert_eq!(base.get_pixel(1, 0).0, [255, 255, 255, 255]);
}

#[test]
fn image_from_premul_checks_size() {
    assert!(image_from_premul(2, 2, vec![0; 4]).is_err());
    let img = image_from_premul(1, 1, vec![64, 0, 0, 128]).unwrap();
    assert!(img.get_pixel(0, 0).0[0].abs_diff(128) <= 1);
}
