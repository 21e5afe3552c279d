//! Error types shared by the buffer-backed builders

/// Errors reported by the bounded buffer and everything that writes through it.
///
/// Every variant is recoverable: the caller can resize its storage or fix its
/// inputs and try again. A failing call never moves the buffer's write offset.
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub enum Error {
    /// A required argument was absent (an empty method, path, identifier or key).
    NullArgument,
    /// An argument was present but unusable, e.g. a zero-capacity buffer.
    InvalidParameter,
    /// The write would have gone past the buffer's capacity.
    BufferOverflow,
}

impl core::fmt::Display for Error {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Error::NullArgument => f.write_str("required argument is missing"),
            Error::InvalidParameter => f.write_str("invalid parameter"),
            Error::BufferOverflow => f.write_str("buffer overflow"),
        }
    }
}

#[cfg(feature = "defmt")]
impl defmt::Format for Error {
    fn format(&self, f: defmt::Formatter) {
        match self {
            Error::NullArgument => defmt::write!(f, "NullArgument"),
            Error::InvalidParameter => defmt::write!(f, "InvalidParameter"),
            Error::BufferOverflow => defmt::write!(f, "BufferOverflow"),
        }
    }
}
