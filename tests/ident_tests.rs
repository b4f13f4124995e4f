use gridlink::ident;
use uuid::Uuid;

#[test]
fn canonical_string_round_trip() {
    let s = "123e4567-e89b-12d3-a456-426614174000";
    let id = ident::from_canonical_string(s).unwrap();
    assert_eq!(ident::to_canonical_string(&id), s);
}

#[test]
fn generated_ids_round_trip_through_canonical_form() {
    for _ in 0..16 {
        let id = ident::generate();
        let text = ident::to_canonical_string(&id);
        assert_eq!(text.len(), ident::CANONICAL_LEN);
        assert_eq!(ident::from_canonical_string(&text).unwrap(), id);
    }
}

#[test]
fn thirty_five_characters_fail_thirty_six_succeed() {
    assert!(ident::from_canonical_string("123e4567-e89b-12d3-a456-42661417400").is_err());
    assert!(ident::from_canonical_string("123e4567-e89b-12d3-a456-426614174000").is_ok());
}

#[test]
fn non_hex_in_a_hex_position_fails() {
    assert!(ident::from_canonical_string("123e4567-e89b-12d3-a456-42661417400x").is_err());
}

#[test]
fn other_uuid_spellings_are_rejected() {
    // uuid's own parser would take these; the canonical wire form does not.
    assert!(ident::from_canonical_string("123e4567e89b12d3a456426614174000").is_err());
    assert!(ident::from_canonical_string("{123e4567-e89b-12d3-a456-426614174000}").is_err());
    assert!(
        ident::from_canonical_string("urn:uuid:123e4567-e89b-12d3-a456-426614174000").is_err()
    );
}

#[test]
fn parse_list_keeps_valid_tokens_in_order() {
    let ids = ident::parse_list(
        "123e4567-e89b-12d3-a456-426614174000 not-a-uuid 223e4567-e89b-12d3-a456-426614174001",
    );
    assert_eq!(
        ids.iter().map(ident::to_canonical_string).collect::<Vec<_>>(),
        vec![
            "123e4567-e89b-12d3-a456-426614174000",
            "223e4567-e89b-12d3-a456-426614174001",
        ]
    );
}

#[test]
fn parse_list_with_no_valid_tokens_is_empty() {
    assert!(ident::parse_list("one two three").is_empty());
    assert!(ident::parse_list("   \n\t ").is_empty());
}

#[test]
fn nil_identifier_is_unset() {
    assert!(!ident::is_set(&Uuid::nil()));
    assert!(ident::is_set(&ident::generate()));
}
