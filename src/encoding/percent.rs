use crate::buffer::Error;

const HEX: &[u8; 16] = b"0123456789ABCDEF";

/// Whether `byte` passes through unescaped (RFC 3986 unreserved set).
fn is_unreserved(byte: u8) -> bool {
    matches!(byte, b'A'..=b'Z' | b'a'..=b'z' | b'0'..=b'9' | b'-' | b'_' | b'.' | b'~')
}

/// Length `value` will have once percent-encoded.
pub fn encoded_len(value: &[u8]) -> usize {
    value
        .iter()
        .map(|&b| if is_unreserved(b) { 1 } else { 3 })
        .sum()
}

/// Percent-encode `value` into the start of `out`.
///
/// Every byte outside the unreserved set is written as `%XX` with uppercase
/// hex digits. Returns the encoded length.
///
/// # Errors
///
/// [`Error::BufferOverflow`] if the encoded form does not fit; `out` is not
/// written to in that case.
///
/// ```rust
/// use iotsuite::encoding::percent;
///
/// let mut out = [0u8; 16];
/// let n = percent::encode(b"a+b/c=", &mut out).unwrap();
/// assert_eq!(&out[..n], b"a%2Bb%2Fc%3D");
/// ```
pub fn encode(value: &[u8], out: &mut [u8]) -> Result<usize, Error> {
    if encoded_len(value) > out.len() {
        return Err(Error::BufferOverflow);
    }

    let mut n = 0;
    for &byte in value {
        if is_unreserved(byte) {
            out[n] = byte;
            n += 1;
        } else {
            out[n] = b'%';
            out[n + 1] = HEX[(byte >> 4) as usize];
            out[n + 2] = HEX[(byte & 0x0F) as usize];
            n += 3;
        }
    }
    Ok(n)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unreserved_pass_through() {
        let mut out = [0u8; 64];
        let input = b"AZaz09-_.~";
        let n = encode(input, &mut out).unwrap();
        assert_eq!(&out[..n], input);
    }

    #[test]
    fn test_reserved_escaped() {
        let mut out = [0u8; 64];
        let n = encode(b"a b&c=%", &mut out).unwrap();
        assert_eq!(&out[..n], b"a%20b%26c%3D%25");
        assert_eq!(encoded_len(b"a b&c=%"), n);
    }

    #[test]
    fn test_non_ascii_escaped_per_byte() {
        let mut out = [0u8; 16];
        let n = encode("é".as_bytes(), &mut out).unwrap();
        assert_eq!(&out[..n], b"%C3%A9");
    }

    #[test]
    fn test_overflow_does_not_write() {
        let mut out = [0u8; 4];
        assert_eq!(encode(b"ab/", &mut out), Err(Error::BufferOverflow));
        assert_eq!(out, [0u8; 4]);
        assert_eq!(encode(b"a/", &mut out), Ok(4));
    }

    #[test]
    fn test_empty_value() {
        let mut out = [0u8; 0];
        assert_eq!(encode(b"", &mut out), Ok(0));
    }
}
