use heaan_polyeval::{EncodingDomain, MetaData, Scale};
use proptest::prelude::*;

fn domain_strategy() -> impl Strategy<Value = EncodingDomain> {
    any::<u8>().prop_map(EncodingDomain::from)
}

fn metadata_strategy() -> impl Strategy<Value = MetaData> {
    (
        1.0f64..1e30,
        domain_strategy(),
        any::<i8>(),
        any::<i8>(),
        any::<bool>(),
        any::<bool>(),
    )
        .prop_map(|(scale, domain, a, b, is_ntt, is_montgomery)| MetaData {
            scale: Scale::new(scale),
            encoding_domain: domain,
            log_slots: [a, b],
            is_ntt,
            is_montgomery,
        })
}

proptest! {
    #[test]
    fn encode_decode_preserves_every_field(meta in metadata_strategy()) {
        let mut buf = vec![0u8; MetaData::binary_size()];
        let written = meta.encode(&mut buf).unwrap();
        prop_assert_eq!(written, MetaData::binary_size());

        let mut decoded = MetaData::default();
        let read = decoded.decode(&buf).unwrap();
        prop_assert_eq!(read, written);
        prop_assert_eq!(decoded, meta);
        prop_assert!(decoded.equal(&meta));
    }

    #[test]
    fn trailing_bytes_are_ignored(
        meta in metadata_strategy(),
        tail in prop::collection::vec(any::<u8>(), 0..16),
    ) {
        let mut buf = meta.to_bytes().unwrap();
        buf.extend_from_slice(&tail);
        let mut decoded = MetaData::default();
        prop_assert_eq!(decoded.decode(&buf).unwrap(), 13);
        prop_assert_eq!(decoded, meta);
    }

    #[test]
    fn any_short_buffer_is_rejected(meta in metadata_strategy(), len in 0usize..13) {
        let mut buf = vec![0u8; len];
        prop_assert!(meta.encode(&mut buf).is_err());
        let mut decoded = MetaData::default();
        prop_assert!(decoded.decode(&buf).is_err());
    }

    #[test]
    fn stream_and_buffer_encodings_agree(meta in metadata_strategy()) {
        let mut sink = Vec::new();
        meta.write_to(&mut sink).unwrap();
        prop_assert_eq!(&sink, &meta.to_bytes().unwrap());
        let decoded = MetaData::read_from(&mut sink.as_slice()).unwrap();
        prop_assert_eq!(decoded, meta);
    }
}

proptest! {
    #[test]
    fn decode_accepts_any_full_length_buffer(
        bytes in prop::collection::vec(any::<u8>(), 13),
    ) {
        let meta = MetaData::from_bytes(&bytes).unwrap();
        prop_assert_eq!(meta.encoding_domain.tag(), bytes[8]);
        prop_assert_eq!(meta.log_slots, [bytes[9] as i8, bytes[10] as i8]);
        prop_assert_eq!(meta.is_ntt, bytes[11] != 0);
        prop_assert_eq!(meta.is_montgomery, bytes[12] != 0);
    }

    #[test]
    fn slots_defined_exactly_for_shiftable_log_slots(
        a in any::<i8>(),
        b in any::<i8>(),
    ) {
        let meta = MetaData { log_slots: [a, b], ..MetaData::default() };
        let shiftable = |l: i8| l >= 0 && (l as u32) < usize::BITS;
        prop_assert_eq!(meta.slots().is_some(), shiftable(a) && shiftable(b));
    }
}

#[test]
fn equal_compares_every_field() {
    let meta = MetaData {
        scale: Scale::from_log2(40),
        encoding_domain: EncodingDomain::Slots,
        log_slots: [0, 10],
        is_ntt: true,
        is_montgomery: true,
    };
    let mut other = meta;
    other.is_montgomery = false;
    assert!(!meta.equal(&other));
    other = meta;
    other.scale = Scale::from_log2(41);
    assert!(!meta.equal(&other));
    assert!(meta.equal(&meta));
}
