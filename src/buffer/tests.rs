use super::*;
use core::fmt::Write;

#[test]
fn test_new_rejects_empty_storage() {
    let mut storage: [u8; 0] = [];
    assert_eq!(
        Buffer::new(&mut storage).unwrap_err(),
        Error::InvalidParameter
    );
}

#[test]
fn test_with_capacity_bounds() {
    let mut storage = [0u8; 8];
    assert_eq!(
        Buffer::with_capacity(&mut storage, 0).unwrap_err(),
        Error::InvalidParameter
    );
    assert_eq!(
        Buffer::with_capacity(&mut storage, 9).unwrap_err(),
        Error::InvalidParameter
    );

    let mut buf = Buffer::with_capacity(&mut storage, 4).unwrap();
    assert_eq!(buf.capacity(), 4);
    assert_eq!(buf.append(b"abcde"), Err(Error::BufferOverflow));
    assert_eq!(buf.append(b"abcd"), Ok(4));
}

#[test]
fn test_append_and_remaining() {
    let mut storage = [0u8; 16];
    let mut buf = Buffer::new(&mut storage).unwrap();
    assert!(buf.is_empty());
    assert_eq!(buf.remaining(), 16);

    assert_eq!(buf.append_str("hello"), Ok(5));
    assert_eq!(buf.len(), 5);
    assert_eq!(buf.remaining(), 11);
    assert_eq!(buf.as_bytes(), b"hello");
}

#[test]
fn test_append_exact_fit() {
    let mut storage = [0u8; 4];
    let mut buf = Buffer::new(&mut storage).unwrap();
    assert_eq!(buf.append(b"abcd"), Ok(4));
    assert_eq!(buf.remaining(), 0);
    assert_eq!(buf.append(b""), Ok(0));
    assert_eq!(buf.append(b"x"), Err(Error::BufferOverflow));
    assert_eq!(buf.len(), 4);
}

#[test]
fn test_overflow_leaves_storage_untouched() {
    let mut storage = [0xAAu8; 6];
    {
        let mut buf = Buffer::new(&mut storage).unwrap();
        buf.append(b"ab").unwrap();
        assert_eq!(buf.append(b"cdefg"), Err(Error::BufferOverflow));
        assert_eq!(buf.len(), 2);
    }
    assert_eq!(storage, [b'a', b'b', 0xAA, 0xAA, 0xAA, 0xAA]);
}

#[test]
fn test_advance() {
    let mut storage = [0u8; 4];
    let mut buf = Buffer::new(&mut storage).unwrap();
    buf.current()[..3].copy_from_slice(b"xyz");
    assert_eq!(buf.advance(3), Ok(()));
    assert_eq!(buf.as_bytes(), b"xyz");
    assert_eq!(buf.advance(2), Err(Error::BufferOverflow));
    assert_eq!(buf.len(), 3);
    assert_eq!(buf.advance(1), Ok(()));
    assert_eq!(buf.remaining(), 0);
}

#[test]
fn test_reset_keeps_contents() {
    let mut storage = [0u8; 4];
    {
        let mut buf = Buffer::new(&mut storage).unwrap();
        buf.append(b"ab").unwrap();
        buf.reset();
        assert!(buf.is_empty());
        assert_eq!(buf.remaining(), 4);
    }
    assert_eq!(&storage[..2], b"ab");
}

#[test]
fn test_write_with_commits_reported_length() {
    let mut storage = [0u8; 8];
    let mut buf = Buffer::new(&mut storage).unwrap();
    let n = buf
        .write_with(|out| {
            out[..2].copy_from_slice(b"ok");
            Ok(2)
        })
        .unwrap();
    assert_eq!(n, 2);
    assert_eq!(buf.as_bytes(), b"ok");

    assert_eq!(
        buf.write_with(|_| Err(Error::BufferOverflow)),
        Err(Error::BufferOverflow)
    );
    assert_eq!(buf.write_with(|_| Ok(7)), Err(Error::BufferOverflow));
    assert_eq!(buf.len(), 2);
}

#[test]
fn test_transaction_rolls_back() {
    let mut storage = [0u8; 8];
    let mut buf = Buffer::new(&mut storage).unwrap();
    buf.append(b"12").unwrap();

    let result = buf.transaction(|b| {
        b.append(b"345")?;
        b.append(b"6789")?;
        Ok(())
    });
    assert_eq!(result, Err(Error::BufferOverflow));
    assert_eq!(buf.as_bytes(), b"12");

    let result = buf.transaction(|b| {
        b.append(b"345")?;
        b.append(b"6")?;
        Ok(())
    });
    assert_eq!(result, Ok(4));
    assert_eq!(buf.as_bytes(), b"123456");
}

#[test]
fn test_fmt_write_is_bounded() {
    let mut storage = [0u8; 6];
    let mut buf = Buffer::new(&mut storage).unwrap();
    write!(buf, "{}", 1234).unwrap();
    assert_eq!(buf.as_bytes(), b"1234");

    let result = buf.transaction(|b| write!(b, "{}", -5678).map_err(|_| Error::BufferOverflow));
    assert_eq!(result, Err(Error::BufferOverflow));
    assert_eq!(buf.as_bytes(), b"1234");
}
