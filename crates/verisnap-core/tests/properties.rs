//! Property tests for canonicalization, hashing, diffing, and verification.

use proptest::prelude::*;
use serde_json::{json, Value};
use verisnap_core::{canonicalize, diff, hash_value_hex, verify_value, VerifyStatus};

/// Arbitrary JSON values. Keys stay on a small lowercase alphabet; a few of
/// them intentionally collide with the address field set to exercise
/// normalization under recursion.
fn arb_value() -> impl Strategy<Value = Value> {
    let leaf = prop_oneof![
        Just(Value::Null),
        any::<bool>().prop_map(Value::Bool),
        any::<i64>().prop_map(|i| json!(i)),
        (-1.0e12..1.0e12f64).prop_map(|f| json!(f)),
        "[ a-z0-9]{0,12}".prop_map(Value::String),
    ];
    leaf.prop_recursive(3, 32, 4, |inner| {
        prop_oneof![
            prop::collection::vec(inner.clone(), 0..4).prop_map(Value::Array),
            prop::collection::btree_map("[a-z]{1,6}", inner, 0..4)
                .prop_map(|m| Value::Object(m.into_iter().collect())),
        ]
    })
}

proptest! {
    #[test]
    fn canonicalize_is_idempotent(value in arb_value()) {
        let once = canonicalize(&value).unwrap();
        let twice = canonicalize(&once).unwrap();
        prop_assert_eq!(once, twice);
    }

    #[test]
    fn diff_identity_is_empty(value in arb_value()) {
        prop_assert!(diff(&value, &value).unwrap().is_empty());
    }

    #[test]
    fn diff_emptiness_tracks_canonical_equality(a in arb_value(), b in arb_value()) {
        let changes = diff(&a, &b).unwrap();
        let same = canonicalize(&a).unwrap() == canonicalize(&b).unwrap();
        prop_assert_eq!(changes.is_empty(), same);
    }

    #[test]
    fn verify_round_trip(value in arb_value()) {
        let hash = hash_value_hex(&value).unwrap();
        let outcome = verify_value(&value, &hash);
        prop_assert_eq!(outcome.status, VerifyStatus::Valid);
    }

    #[test]
    fn hash_is_stable_across_canonicalization(value in arb_value()) {
        let canonical = canonicalize(&value).unwrap();
        prop_assert_eq!(
            hash_value_hex(&value).unwrap(),
            hash_value_hex(&canonical).unwrap()
        );
    }
}
