//! Text encodings used to build URL-encoded form bodies.
//!
//! - [`percent`]: RFC 3986 percent-encoding into a bounded slice
//! - [`field`]: `key=value` form fields appended to a [`Buffer`](crate::buffer::Buffer)
//!
//! The encoders are plain functions so that their bounds behaviour can be
//! tested on its own, separately from the builders that call them.

/// Percent-encoding of arbitrary bytes.
pub mod percent;

/// URL-encoded form fields.
pub mod field;

pub use field::{encode_field, encode_integer_field};
