//! Wire codec round-trip properties.

use proptest::prelude::*;
use std::collections::BTreeMap;

use gateway::fix::{tags, FixMessage};

/// Tags the serializer owns; user fields avoid them.
fn is_header_tag(tag: u32) -> bool {
    matches!(tag, tags::BEGIN_STRING | tags::BODY_LENGTH | tags::CHECKSUM)
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(256))]

    /// parse(serialize(m)) preserves every user-supplied field, and the
    /// checksum the serializer wrote re-verifies on the parsed bytes.
    #[test]
    fn round_trip_preserves_user_fields(
        fields in prop::collection::btree_map(
            1u32..300,
            "[A-Za-z0-9 ._-]{0,16}",
            0..12,
        ),
    ) {
        let fields: BTreeMap<u32, String> = fields
            .into_iter()
            .filter(|(tag, _)| !is_header_tag(*tag))
            .collect();

        let mut msg = FixMessage::new();
        for (tag, value) in &fields {
            msg.set(*tag, value.clone());
        }

        let bytes = msg.serialize();
        let reparsed = FixMessage::parse(&bytes);

        for (tag, value) in &fields {
            prop_assert_eq!(reparsed.get(*tag), Some(value.as_str()), "tag {}", tag);
        }

        // Header auto-fields were recomputed.
        prop_assert_eq!(reparsed.get(tags::BEGIN_STRING), Some("FIX.4.2"));
        let claimed: u8 = reparsed
            .get(tags::CHECKSUM)
            .expect("serializer always writes a checksum")
            .parse()
            .unwrap();

        // Checksum covers every byte before the trailer, trailing SOHs
        // included.
        let trailer_len = format!("10={claimed}\u{1}").len();
        let prefix = &bytes[..bytes.len() - trailer_len];
        prop_assert_eq!(claimed, FixMessage::checksum(prefix));

        // Serialization is deterministic.
        prop_assert_eq!(bytes, reparsed.serialize());
    }

    /// Body length counts exactly the bytes between it and the trailer.
    #[test]
    fn body_length_is_exact(
        fields in prop::collection::btree_map(11u32..200, "[A-Za-z0-9]{1,10}", 1..8),
    ) {
        let mut msg = FixMessage::new();
        for (tag, value) in &fields {
            msg.set(*tag, value.clone());
        }

        let bytes = msg.serialize();
        let reparsed = FixMessage::parse(&bytes);
        let body_len: usize = reparsed.get(tags::BODY_LENGTH).unwrap().parse().unwrap();

        let expected: usize = fields
            .iter()
            .map(|(tag, value)| format!("{tag}={value}").len() + 1)
            .sum();
        prop_assert_eq!(body_len, expected);
    }
}
