//! Advertising data parsing.
//!
//! Advertisement payloads are a sequence of AD structures: a length octet
//! covering the type octet and the data, a type octet, then the data bytes.

/// AD type for the Complete Local Name field.
const AD_TYPE_COMPLETE_LOCAL_NAME: u8 = 0x09;

/// Decode the Complete Local Name from an advertisement payload.
///
/// Walks the AD structures and returns the UTF-8 name of the first
/// Complete Local Name (0x09) field. Returns `None` if no such field
/// exists, the payload is truncated mid-field, or the name is not
/// valid UTF-8.
pub fn decode_local_name(payload: &[u8]) -> Option<String> {
    let mut i = 0;
    while i < payload.len() {
        if i + 1 >= payload.len() {
            break;
        }
        let length = payload[i] as usize;
        if length == 0 {
            break;
        }
        let field_type = payload[i + 1];
        if field_type == AD_TYPE_COMPLETE_LOCAL_NAME {
            let data = payload.get(i + 2..i + 1 + length)?;
            return std::str::from_utf8(data).ok().map(|name| name.to_owned());
        }
        i += length + 1;
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    /// Build a single AD structure with the given type and data.
    fn ad_field(field_type: u8, data: &[u8]) -> Vec<u8> {
        let mut out = vec![(data.len() + 1) as u8, field_type];
        out.extend_from_slice(data);
        out
    }

    #[test]
    fn test_decode_name_present() {
        let payload = ad_field(0x09, b"KICKR CORE 5D21");
        assert_eq!(
            decode_local_name(&payload).as_deref(),
            Some("KICKR CORE 5D21")
        );
    }

    #[test]
    fn test_decode_name_after_other_fields() {
        // Flags field, then 16-bit service UUIDs, then the name
        let mut payload = ad_field(0x01, &[0x06]);
        payload.extend(ad_field(0x03, &[0x18, 0x18]));
        payload.extend(ad_field(0x09, b"Trainer"));
        assert_eq!(decode_local_name(&payload).as_deref(), Some("Trainer"));
    }

    #[test]
    fn test_decode_name_absent() {
        let payload = ad_field(0x01, &[0x06]);
        assert_eq!(decode_local_name(&payload), None);
        assert_eq!(decode_local_name(&[]), None);
    }

    #[test]
    fn test_decode_name_truncated_mid_field() {
        // Declared length runs past the end of the payload
        let payload = vec![0x10, 0x09, b'K', b'I'];
        assert_eq!(decode_local_name(&payload), None);
    }

    #[test]
    fn test_decode_name_zero_length_terminator() {
        let mut payload = vec![0x00];
        payload.extend(ad_field(0x09, b"Unreachable"));
        assert_eq!(decode_local_name(&payload), None);
    }

    #[test]
    fn test_decode_name_invalid_utf8() {
        let payload = ad_field(0x09, &[0xFF, 0xFE]);
        assert_eq!(decode_local_name(&payload), None);
    }

    #[test]
    fn test_decode_name_first_of_two() {
        let mut payload = ad_field(0x09, b"first");
        payload.extend(ad_field(0x09, b"second"));
        assert_eq!(decode_local_name(&payload).as_deref(), Some("first"));
    }

    proptest! {
        #[test]
        fn decode_never_panics(payload in proptest::collection::vec(any::<u8>(), 0..64)) {
            let _ = decode_local_name(&payload);
        }

        #[test]
        fn decode_finds_embedded_name(
            prefix in proptest::collection::vec(any::<u8>(), 0..8),
            name in "[a-zA-Z0-9 ]{1,20}",
        ) {
            // A well-formed prefix field followed by a name field is always found
            let mut payload = vec![(prefix.len() + 1) as u8, 0xFF];
            payload.extend_from_slice(&prefix);
            payload.push((name.len() + 1) as u8);
            payload.push(0x09);
            payload.extend_from_slice(name.as_bytes());
            prop_assert_eq!(decode_local_name(&payload), Some(name));
        }
    }
}
