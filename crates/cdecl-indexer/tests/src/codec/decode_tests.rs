use super::*;
use crate::codec::Encoder;

#[test]
fn uint_round_trips_at_every_tier_boundary() {
    for value in [0u32, 1, 127, 128, 255, 256, 65535, 65536, u32::MAX] {
        let mut encoder = Encoder::new();
        encoder.encode_uint(value);
        let bytes = encoder.into_bytes();
        let mut decoder = Decoder::new(&bytes);
        assert_eq!(decoder.read_uint().unwrap(), value);
        assert_eq!(decoder.remaining(), 0);
    }
}

#[test]
fn str_round_trips_at_every_tier_boundary() {
    for len in [0usize, 1, 31, 32, 255, 256, 65535, 65536] {
        let text = "x".repeat(len);
        let mut encoder = Encoder::new();
        encoder.encode_str(&text);
        let bytes = encoder.into_bytes();
        let mut decoder = Decoder::new(&bytes);
        assert_eq!(decoder.read_str().unwrap(), text);
        assert_eq!(decoder.remaining(), 0);
    }
}

#[test]
fn container_headers_round_trip_at_every_tier_boundary() {
    for len in [0usize, 15, 16, 65535, 65536] {
        let mut encoder = Encoder::new();
        encoder.encode_array_len(len);
        encoder.encode_map_len(len);
        let bytes = encoder.into_bytes();
        let mut decoder = Decoder::new(&bytes);
        assert_eq!(decoder.read_array_len().unwrap(), len);
        assert_eq!(decoder.read_map_len().unwrap(), len);
    }
}

#[test]
fn nil_and_bool_round_trip() {
    let mut encoder = Encoder::new();
    encoder.encode_nil();
    encoder.encode_bool(true);
    encoder.encode_bool(false);
    let bytes = encoder.into_bytes();

    let mut decoder = Decoder::new(&bytes);
    decoder.read_nil().unwrap();
    assert!(decoder.read_bool().unwrap());
    assert!(!decoder.read_bool().unwrap());
}

#[test]
fn decoded_strings_borrow_the_input_buffer() {
    let mut encoder = Encoder::new();
    encoder.encode_str("borrowed");
    let bytes = encoder.into_bytes();

    let mut decoder = Decoder::new(&bytes);
    let text = decoder.read_str().unwrap();
    assert_eq!(text.as_ptr(), bytes[1..].as_ptr());
    assert_eq!(text, "borrowed");
}

#[test]
fn truncated_input_is_an_error() {
    // str8 header promising 5 bytes with only 2 present.
    let mut decoder = Decoder::new(&[0xd9, 5, b'a', b'b']);
    assert!(matches!(
        decoder.read_str(),
        Err(CodecError::Truncated { needed: 3 })
    ));

    let mut decoder = Decoder::new(&[]);
    assert!(matches!(
        decoder.read_uint(),
        Err(CodecError::Truncated { .. })
    ));
}

#[test]
fn type_mismatch_is_an_error() {
    let mut decoder = Decoder::new(&[0xc0]);
    assert!(matches!(
        decoder.read_uint(),
        Err(CodecError::UnexpectedFormat { found: 0xc0, .. })
    ));

    let mut decoder = Decoder::new(&[0x05]);
    assert!(matches!(
        decoder.read_str(),
        Err(CodecError::UnexpectedFormat { .. })
    ));
}

#[test]
fn invalid_utf8_is_an_error() {
    let mut decoder = Decoder::new(&[0xa1, 0xff]);
    assert!(matches!(decoder.read_str(), Err(CodecError::InvalidUtf8)));
}
