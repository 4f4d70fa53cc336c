//! Property-based tests for quote file name parsing.
//!
//! These tests verify that parsing holds across generated inputs, using the
//! `proptest` crate for random test case generation.

use chrono::NaiveDate;
use proptest::prelude::*;
use quote_storage_core::quotes::{FileNameError, QuoteKey, QuoteProvider};

// =============================================================================
// Generators
// =============================================================================

fn arb_provider() -> impl Strategy<Value = QuoteProvider> {
    prop_oneof![
        Just(QuoteProvider::ShanghaiFuturesExchange),
        Just(QuoteProvider::WienerBoerse),
    ]
}

/// Dates between 1900-01-01 and 2199-12-31.
fn arb_date() -> impl Strategy<Value = NaiveDate> {
    (0i64..109_572).prop_map(|offset| {
        NaiveDate::from_ymd_opt(1900, 1, 1).unwrap() + chrono::Duration::days(offset)
    })
}

fn arb_key() -> impl Strategy<Value = QuoteKey> {
    (arb_provider(), arb_date()).prop_map(|(provider, date)| QuoteKey::new(provider, date))
}

// =============================================================================
// Property Tests
// =============================================================================

proptest! {
    #![proptest_config(ProptestConfig::with_cases(200))]

    /// The canonical file name of any key parses back to the same key.
    #[test]
    fn prop_canonical_name_parses_back(key in arb_key()) {
        let parsed = QuoteKey::from_file_name(&key.file_name()).unwrap();
        prop_assert_eq!(parsed, key);
    }

    /// The extension is matched case-insensitively and surrounding whitespace is ignored.
    #[test]
    fn prop_extension_case_and_padding_ignored(
        key in arb_key(),
        ext in "[cC][sS][vV]",
        pad in "[ \t]{0,3}",
    ) {
        let name = format!(
            "{pad}{}_{}.{ext}{pad}",
            key.provider,
            key.date.format("%Y%m%d")
        );
        prop_assert_eq!(QuoteKey::from_file_name(&name).unwrap(), key);
    }

    /// Any other extension is rejected as an unsupported extension.
    #[test]
    fn prop_other_extensions_rejected(key in arb_key(), ext in "[a-z]{1,4}") {
        prop_assume!(!ext.eq_ignore_ascii_case("csv"));
        let name = format!("{}_{}.{ext}", key.provider, key.date.format("%Y%m%d"));
        prop_assert!(matches!(
            QuoteKey::from_file_name(&name),
            Err(FileNameError::UnsupportedExtension(_))
        ));
    }

    /// Unknown provider names never parse, whatever the date.
    #[test]
    fn prop_unknown_provider_rejected(name in "[A-Za-z]{1,24}", date in arb_date()) {
        prop_assume!(name != "ShanghaiFuturesExchange" && name != "WienerBoerse");
        let file = format!("{name}_{}.csv", date.format("%Y%m%d"));
        prop_assert!(matches!(
            QuoteKey::from_file_name(&file),
            Err(FileNameError::UnsupportedProvider(_))
        ));
    }

    /// Date segments that are not exactly eight digits are rejected.
    #[test]
    fn prop_non_eight_digit_dates_rejected(
        provider in arb_provider(),
        digits in "[0-9]{1,7}|[0-9]{9,12}"
    ) {
        let file = format!("{provider}_{digits}.csv");
        prop_assert!(matches!(
            QuoteKey::from_file_name(&file),
            Err(FileNameError::InvalidDate(_))
        ));
    }
}
