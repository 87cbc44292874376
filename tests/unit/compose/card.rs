use super::*;

#[test]
fn advance_counts_wide_cells_as_one_em() {
    assert_eq!(estimate_advance("ab", 10.0), 10.0);
    assert_eq!(estimate_advance("中文", 10.0), 20.0);
    assert_eq!(estimate_advance("", 10.0), 0.0);
}

#[test]
fn wraps_on_overflow_and_on_newlines() {
    // 4 wide characters fit in 40px at 10px.
    let lines = wrap_lines("一二三四五六\n七", 40.0, 10.0);
    assert_eq!(lines, vec!["一二三四", "五六", "七"]);
}

#[test]
fn blank_paragraphs_are_kept_as_empty_lines() {
    let lines = wrap_lines("a\n\nb\r\n", 100.0, 10.0);
    assert_eq!(lines, vec!["a", "", "b", ""]);
}

#[test]
fn overwide_single_char_still_takes_a_line() {
    let lines = wrap_lines("中中", 5.0, 10.0);
    assert_eq!(lines, vec!["中", "中"]);
}

#[test]
fn height_follows_padding_and_line_height() {
    let opts = CardOptions::default();
    assert_eq!(card_height(1, &opts), 30 + 30 + 30);
    assert_eq!(card_height(3, &opts), 30 + 3 * 30 + 30);
    assert_eq!(card_height(0, &opts), card_height(1, &opts));
}

#[test]
fn render_sizes_card_and_fills_background() {
    let opts = CardOptions {
        background: Rgba8::rgb(255, 255, 0),
        ..CardOptions::default()
    };
    // 260px of text width at 15px fits 34 narrow cells per line.
    let text = "x".repeat(40);
    let img = render_card(&text, &opts, &FontLibrary::empty()).unwrap();
    assert_eq!(img.dimensions(), (320, 30 + 2 * 30 + 30));
    assert_eq!(img.get_pixel(0, 0).0, [255, 255, 0, 255]);
}

#[test]
fn rejects_bad_input() {
    assert!(render_card("  \n ", &CardOptions::default(), &FontLibrary::empty()).is_err());
    let narrow = CardOptions {
        width: 50,
        ..CardOptions::default()
    };
    assert!(render_card("a", &narrow, &FontLibrary::empty()).is_err());
}
