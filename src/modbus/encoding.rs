use crate::error::{Error, Result};

fn expect_len(b: &[u8], expected: usize) -> Result<()> {
    if b.len() < expected {
        return Err(Error::ShortResponse {
            expected,
            got: b.len(),
        });
    }
    Ok(())
}

/// Big-endian 16-bit value from a single register reply.
pub fn uint16(b: &[u8]) -> Result<u16> {
    expect_len(b, 2)?;
    Ok(u16::from_be_bytes([b[0], b[1]]))
}

/// 32-bit value spanning two registers, low word first.
pub fn uint32_swapped(b: &[u8]) -> Result<u32> {
    expect_len(b, 4)?;
    Ok(u32::from_be_bytes([b[2], b[3], b[0], b[1]]))
}

/// Registers as returned by the client, flattened to the wire byte layout.
pub fn words_to_bytes(words: &[u16]) -> Vec<u8> {
    words.iter().flat_map(|w| w.to_be_bytes()).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn uint32_swaps_words() {
        // 12345 = 0x0000_3039, low word on the wire first
        assert_eq!(uint32_swapped(&[0x30, 0x39, 0x00, 0x00]).unwrap(), 12345);
        assert_eq!(
            uint32_swapped(&[0x00, 0x02, 0x00, 0x01]).unwrap(),
            0x0001_0002
        );
    }

    #[test]
    fn short_reply() {
        assert!(matches!(
            uint16(&[0x01]),
            Err(Error::ShortResponse { expected: 2, got: 1 })
        ));
        assert!(matches!(
            uint32_swapped(&[0, 1]),
            Err(Error::ShortResponse { expected: 4, got: 2 })
        ));
    }

    #[test]
    fn words_keep_register_order() {
        assert_eq!(words_to_bytes(&[0x3039, 0x0001]), vec![0x30, 0x39, 0x00, 0x01]);
        assert_eq!(uint16(&words_to_bytes(&[160])).unwrap(), 160);
    }
}
