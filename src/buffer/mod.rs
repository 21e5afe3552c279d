//! # Bounded write buffer
//!
//! [`Buffer`] is a write cursor over storage owned by the caller. It never
//! allocates, never grows, and never writes past its capacity: every append is
//! checked before a single byte is copied, so an overflowing write leaves the
//! committed prefix exactly as it was.
//!
//! All request and form builders in this crate write through a `Buffer`.
//!
//! ```rust
//! use iotsuite::buffer::{Buffer, Error};
//!
//! let mut storage = [0u8; 8];
//! let mut buf = Buffer::new(&mut storage).unwrap();
//!
//! assert_eq!(buf.append(b"abc"), Ok(3));
//! assert_eq!(buf.append(b"too long"), Err(Error::BufferOverflow));
//! assert_eq!(buf.as_bytes(), b"abc");
//! assert_eq!(buf.remaining(), 5);
//! ```

#![deny(unsafe_code)]

/// Error taxonomy for buffer-backed builders
pub mod error;

pub use error::Error;

/// A fixed-capacity, append-only view over caller-owned bytes.
///
/// The invariant `len() <= capacity()` holds at all times. The buffer holds
/// no allocation of its own; dropping it releases nothing but the borrow.
#[derive(Debug)]
pub struct Buffer<'a> {
    storage: &'a mut [u8],
    offset: usize,
}

impl<'a> Buffer<'a> {
    /// Bind a buffer to the whole of `storage`.
    ///
    /// # Errors
    ///
    /// [`Error::InvalidParameter`] if `storage` is empty.
    pub fn new(storage: &'a mut [u8]) -> Result<Self, Error> {
        if storage.is_empty() {
            return Err(Error::InvalidParameter);
        }
        Ok(Self { storage, offset: 0 })
    }

    /// Bind a buffer to the first `capacity` bytes of `storage`.
    ///
    /// # Errors
    ///
    /// [`Error::InvalidParameter`] if `capacity` is zero or larger than `storage`.
    pub fn with_capacity(storage: &'a mut [u8], capacity: usize) -> Result<Self, Error> {
        if capacity == 0 || capacity > storage.len() {
            return Err(Error::InvalidParameter);
        }
        Ok(Self {
            storage: &mut storage[..capacity],
            offset: 0,
        })
    }

    /// Rewind the write offset to zero. Storage contents are left alone.
    pub fn reset(&mut self) {
        self.offset = 0;
    }

    /// The unwritten tail of the storage, starting at the write offset.
    ///
    /// Bytes written here are not part of the buffer until [`advance`](Self::advance)
    /// commits them.
    pub fn current(&mut self) -> &mut [u8] {
        &mut self.storage[self.offset..]
    }

    /// Number of bytes that can still be written.
    pub fn remaining(&self) -> usize {
        self.storage.len() - self.offset
    }

    /// Total capacity of the buffer.
    pub fn capacity(&self) -> usize {
        self.storage.len()
    }

    /// Number of committed bytes.
    pub fn len(&self) -> usize {
        self.offset
    }

    /// Whether nothing has been committed yet.
    pub fn is_empty(&self) -> bool {
        self.offset == 0
    }

    /// The committed bytes.
    pub fn as_bytes(&self) -> &[u8] {
        &self.storage[..self.offset]
    }

    /// Commit `n` bytes previously written into [`current`](Self::current).
    ///
    /// # Errors
    ///
    /// [`Error::BufferOverflow`] if `n` exceeds [`remaining`](Self::remaining);
    /// the offset is not moved.
    pub fn advance(&mut self, n: usize) -> Result<(), Error> {
        if n > self.remaining() {
            return Err(Error::BufferOverflow);
        }
        self.offset += n;
        Ok(())
    }

    /// Copy `bytes` in whole at the write offset and return how many were written.
    ///
    /// Nothing is copied unless all of `bytes` fits.
    pub fn append(&mut self, bytes: &[u8]) -> Result<usize, Error> {
        let end = self.offset + bytes.len();
        if end > self.storage.len() {
            return Err(Error::BufferOverflow);
        }
        self.storage[self.offset..end].copy_from_slice(bytes);
        self.offset = end;
        Ok(bytes.len())
    }

    /// Shorthand for appending UTF-8 text.
    pub fn append_str(&mut self, text: &str) -> Result<usize, Error> {
        self.append(text.as_bytes())
    }

    /// Let `write` fill the unwritten tail, then commit the length it reports.
    ///
    /// The closure must return the number of bytes it placed at the start of
    /// the slice it was given. On error nothing is committed.
    pub fn write_with<F>(&mut self, write: F) -> Result<usize, Error>
    where
        F: FnOnce(&mut [u8]) -> Result<usize, Error>,
    {
        let written = write(self.current())?;
        self.advance(written)?;
        Ok(written)
    }

    /// Run a sequence of writes as one unit.
    ///
    /// If `body` fails, the write offset is restored to where it was before
    /// the call and the error is returned. On success, returns the number of
    /// bytes committed by `body`.
    pub fn transaction<F>(&mut self, body: F) -> Result<usize, Error>
    where
        F: FnOnce(&mut Self) -> Result<(), Error>,
    {
        let start = self.offset;
        match body(self) {
            Ok(()) => Ok(self.offset - start),
            Err(e) => {
                self.offset = start;
                Err(e)
            }
        }
    }
}

/// Formatting writes through the same all-or-nothing bounds check as
/// [`Buffer::append`]. Wrap multi-piece `write!` calls in
/// [`Buffer::transaction`] to keep a failed format from committing a prefix.
impl core::fmt::Write for Buffer<'_> {
    fn write_str(&mut self, s: &str) -> core::fmt::Result {
        self.append_str(s).map(|_| ()).map_err(|_| core::fmt::Error)
    }
}

#[cfg(test)]
mod tests;
