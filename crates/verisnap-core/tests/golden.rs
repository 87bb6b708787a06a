//! Golden vectors for canonical serialization.
//!
//! Every implementation of the snapshot format must produce these exact
//! canonical strings, and the same content hash for permuted inputs.

use serde_json::json;
use verisnap_core::{canonical_json, hash_value_hex, ContentHash};

struct Vector {
    name: &'static str,
    input: serde_json::Value,
    canonical: &'static str,
}

fn vectors() -> Vec<Vector> {
    vec![
        Vector {
            name: "empty_object",
            input: json!({}),
            canonical: "{}",
        },
        Vector {
            name: "key_sorting",
            input: json!({"b": 2, "a": 1, "c": 3}),
            canonical: r#"{"a":1,"b":2,"c":3}"#,
        },
        Vector {
            name: "nested_sorting",
            input: json!({"outer": {"z": true, "a": false}}),
            canonical: r#"{"outer":{"a":false,"z":true}}"#,
        },
        Vector {
            name: "null_dropping",
            input: json!({"keep": 1, "drop": null, "arr": [null, 2, null]}),
            canonical: r#"{"arr":[2],"keep":1}"#,
        },
        Vector {
            name: "string_trimming",
            input: json!({"name": "  Launch Token  "}),
            canonical: r#"{"name":"Launch Token"}"#,
        },
        Vector {
            name: "address_normalization",
            input: json!({"contractAddress": "0xAbCdEf0123", "admin": "FEEDFACE"}),
            canonical: r#"{"admin":"0xfeedface","contractAddress":"0xabcdef0123"}"#,
        },
        Vector {
            name: "timestamp_normalization",
            input: json!({"observedAt": "2024-06-01T12:30:45+02:00"}),
            canonical: r#"{"observedAt":"2024-06-01T10:30:45.000Z"}"#,
        },
        Vector {
            name: "negative_zero",
            input: json!({"supply": -0.0}),
            canonical: r#"{"supply":0}"#,
        },
        Vector {
            name: "realistic_snapshot",
            input: json!({
                "token": {
                    "totalSupply": {"value": "1000000", "status": "yes", "provenance": "chain"}
                },
                "proxy": {
                    "implementation": {"value": null, "status": "unknown", "provenance": "chain"}
                },
                "chainId": 8453,
                "contractAddress": "0xDEADbeef00000000000000000000000000000001"
            }),
            canonical: concat!(
                r#"{"chainId":8453,"#,
                r#""contractAddress":"0xdeadbeef00000000000000000000000000000001","#,
                r#""proxy":{"implementation":{"provenance":"chain","status":"unknown"}},"#,
                r#""token":{"totalSupply":{"provenance":"chain","status":"yes","value":"1000000"}}}"#
            ),
        },
    ]
}

#[test]
fn test_canonical_vectors() {
    for v in vectors() {
        let got = canonical_json(&v.input).unwrap();
        assert_eq!(got, v.canonical, "canonical mismatch for {}", v.name);
    }
}

#[test]
fn test_vectors_hash_deterministic() {
    for v in vectors() {
        let h1 = hash_value_hex(&v.input).unwrap();
        let h2 = hash_value_hex(&v.input).unwrap();
        assert_eq!(h1, h2, "hash not deterministic for {}", v.name);
        assert!(h1.starts_with("0x") && h1.len() == 66, "bad hash format for {}", v.name);
    }
}

#[test]
fn test_canonical_hash_matches_direct_keccak() {
    for v in vectors() {
        let expected = ContentHash::hash(v.canonical.as_bytes()).to_hex();
        let got = hash_value_hex(&v.input).unwrap();
        assert_eq!(got, expected, "hash/serialization drift for {}", v.name);
    }
}
