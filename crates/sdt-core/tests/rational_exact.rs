use sdt_core::{Ratio, SdtError};

fn ratio(text: &str) -> Ratio {
    text.parse().expect("parse ratio")
}

#[test]
fn thirds_sum_to_exactly_one() {
    let third = ratio("1/3");
    let sum = Ratio::checked_sum([third, third, third]).unwrap();
    assert!(sum.is_one());
    assert_eq!(sum, Ratio::ONE);
}

#[test]
fn four_thirds_is_not_one() {
    let third = ratio("1/3");
    let sum = Ratio::checked_sum([third; 4]).unwrap();
    assert_eq!(sum, Ratio::new(4, 3).unwrap());
    assert!(!sum.is_one());
}

#[test]
fn decimal_tenths_are_exact() {
    let tenth = ratio("0.1");
    let sum = Ratio::checked_sum([tenth; 10]).unwrap();
    assert!(sum.is_one());
}

#[test]
fn accepted_text_forms() {
    assert_eq!(ratio("1"), Ratio::ONE);
    assert_eq!(ratio(" 0.25 "), Ratio::new(1, 4).unwrap());
    assert_eq!(ratio(".5"), Ratio::new(1, 2).unwrap());
    assert_eq!(ratio("1."), Ratio::ONE);
    assert_eq!(ratio("2.5e-1"), Ratio::new(1, 4).unwrap());
    assert_eq!(ratio("5E-1"), Ratio::new(1, 2).unwrap());
    assert_eq!(ratio("2 / 6"), Ratio::new(1, 3).unwrap());
    assert_eq!(ratio("+0.5"), Ratio::new(1, 2).unwrap());
    assert_eq!(ratio("-0"), Ratio::ZERO);
}

#[test]
fn rejected_text_forms() {
    for text in ["", "  ", "abc", "1/0", ".", "1e", "1/2/3", "0x10", "1,5"] {
        assert!(text.parse::<Ratio>().is_err(), "{text:?} should fail");
    }
    match "-0.5".parse::<Ratio>() {
        Err(SdtError::Validation(info)) => assert_eq!(info.code, "ratio-negative"),
        other => panic!("unexpected result {other:?}"),
    }
}

#[test]
fn ordering_compares_values() {
    assert!(ratio("1/3") < ratio("0.34"));
    assert!(ratio("2/4") == ratio("0.5"));
    assert!(ratio("1") > ratio("999/1000"));
}

#[test]
fn compact_display_switches_to_decimal_for_large_denominators() {
    assert_eq!(ratio("1/3").display_compact(), "1/3");
    assert_eq!(ratio("1").display_compact(), "1");
    assert_eq!(ratio("0.001").display_compact(), "0.001");
    assert_eq!(ratio("0.125").display_compact(), "1/8");
}

#[test]
fn overflow_is_reported_not_wrapped() {
    let tiny = Ratio::new(1, u64::MAX).unwrap();
    let other = Ratio::new(1, u64::MAX - 1).unwrap();
    assert!(tiny.checked_add(other).is_none());
}

#[test]
fn serde_rejects_unreduced_zero_denominator() {
    let err = serde_json::from_str::<Ratio>(r#"{"numerator":1,"denominator":0}"#);
    assert!(err.is_err());
    let value: Ratio = serde_json::from_str(r#"{"numerator":2,"denominator":4}"#).unwrap();
    assert_eq!(value, Ratio::new(1, 2).unwrap());
}
