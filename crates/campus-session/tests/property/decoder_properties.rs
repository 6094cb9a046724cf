use campus_session::decode;
use proptest::prelude::*;
use serde_json::json;

proptest! {
    #[test]
    fn decode_never_panics(token in ".{0,200}") {
        let _ = decode(&token);
    }

    #[test]
    fn tokens_without_three_segments_are_empty(parts in prop::collection::vec("[A-Za-z0-9_-]{0,12}", 0..6)) {
        prop_assume!(parts.len() != 3);
        let token = parts.join(".");
        prop_assert!(decode(&token).is_empty());
    }

    #[test]
    fn unique_name_round_trips(name in "[a-z][a-z0-9._]{0,30}") {
        let token = test_fixtures::jwt(json!({ "unique_name": name.clone() }));
        prop_assert_eq!(decode(&token).display_name, name);
    }

    #[test]
    fn exp_claim_survives_decoding(exp in 0i64..4_102_444_800) {
        let token = test_fixtures::jwt(json!({ "sub": "u", "exp": exp }));
        prop_assert_eq!(decode(&token).expires_at.map(|t| t.timestamp()), Some(exp));
    }
}
