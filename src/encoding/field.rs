use super::percent;
use crate::buffer::{Buffer, Error};
use core::fmt::Write;

/// Append `prefix` verbatim followed by the percent-encoded `value`.
///
/// `prefix` is normally `"key="` or `"&key="`. Returns the total number of
/// bytes appended. Either the whole field is committed or nothing is.
///
/// ```rust
/// use iotsuite::buffer::Buffer;
/// use iotsuite::encoding::encode_field;
///
/// let mut storage = [0u8; 32];
/// let mut buf = Buffer::new(&mut storage).unwrap();
/// encode_field(&mut buf, "clientId=", b"dev 01").unwrap();
/// encode_field(&mut buf, "&tag=", b"a/b").unwrap();
/// assert_eq!(buf.as_bytes(), b"clientId=dev%2001&tag=a%2Fb");
/// ```
pub fn encode_field(buf: &mut Buffer<'_>, prefix: &str, value: &[u8]) -> Result<usize, Error> {
    buf.transaction(|b| {
        b.append_str(prefix)?;
        b.write_with(|out| percent::encode(value, out))?;
        Ok(())
    })
}

/// Append `prefix` verbatim followed by `value` as signed decimal digits.
///
/// # Errors
///
/// [`Error::BufferOverflow`] if the field does not fit; nothing is committed.
pub fn encode_integer_field(buf: &mut Buffer<'_>, prefix: &str, value: i64) -> Result<usize, Error> {
    buf.transaction(|b| {
        b.append_str(prefix)?;
        write!(b, "{}", value).map_err(|_| Error::BufferOverflow)
    })
}
