use super::*;

#[test]
fn fresh_keypad_reads_zero_yuan() {
    let pad = AmountKeypad::default();
    assert_eq!(pad.buffer(), "0");
    assert_eq!(pad.text().unwrap(), "零元整");
}

#[test]
fn first_digit_replaces_leading_zero_but_point_keeps_it() {
    let mut pad = AmountKeypad::default();
    assert!(pad.press(KeypadKey::Digit(5)));
    assert_eq!(pad.buffer(), "5");

    pad.clear();
    assert!(pad.press(KeypadKey::Point));
    assert!(pad.press(KeypadKey::Digit(3)));
    assert_eq!(pad.buffer(), "0.3");
    assert_eq!(pad.text().unwrap(), "叁角");
}

#[test]
fn second_point_and_third_fraction_digit_are_ignored() {
    let mut pad = AmountKeypad::default();
    assert_eq!(pad.type_str("12.345"), 5);
    assert_eq!(pad.buffer(), "12.34");
    assert!(!pad.press(KeypadKey::Point));
    assert_eq!(pad.text().unwrap(), "壹拾贰元叁角肆分");
}

#[test]
fn buffer_is_capped_at_thirteen_chars() {
    let mut pad = AmountKeypad::default();
    pad.type_str("99999999999999999");
    assert_eq!(pad.buffer().len(), KEYPAD_MAX_LEN);
    assert!(!pad.press(KeypadKey::Digit(1)));
    assert!(pad.text().is_ok());
}

#[test]
fn back_pops_then_resets() {
    let mut pad = AmountKeypad::default();
    pad.type_str("42");
    pad.back();
    assert_eq!(pad.buffer(), "4");
    pad.back();
    assert_eq!(pad.buffer(), "0");
    pad.back();
    assert_eq!(pad.buffer(), "0");
}

#[test]
fn unknown_characters_are_skipped() {
    let mut pad = AmountKeypad::new(NumeralStyle::Plain);
    assert_eq!(pad.type_str("1x0,0"), 3);
    assert_eq!(pad.text().unwrap(), "一百元整");
}

#[test]
fn out_of_range_digit_is_ignored() {
    let mut pad = AmountKeypad::default();
    assert!(!pad.press(KeypadKey::Digit(10)));
    assert!(!pad.press(KeypadKey::Digit(255)));
    assert_eq!(pad.buffer(), "0");

    assert!(pad.press(KeypadKey::Digit(9)));
    assert!(!pad.press(KeypadKey::Digit(12)));
    assert_eq!(pad.buffer(), "9");
}
