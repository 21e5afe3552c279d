//! # Device authentication
//!
//! Devices authenticate to the cloud by sending a form of their identity
//! fields plus a signature the server can recompute from the same fields and
//! the shared device secret:
//!
//! ```text
//! canonical = clientId=..&deviceName=..&expire=..&nonce=..&productId=..&timestamp=..
//! signature = percent_encode(base64(HMAC-SHA256(secret, canonical)))
//! ```
//!
//! The canonical string is built in a fixed [`CANONICAL_CAPACITY`]-byte stack
//! buffer; inputs that do not fit are rejected instead of growing the buffer.
//!
//! - [`compute_signature`]: the signature alone
//! - [`create_auth_request_form`]: the complete URL-encoded form body
//! - [`create_auth_request`]: the form wrapped in a ready-to-send HTTP `POST`

/// Canonical string construction and signing.
pub mod signer;

/// Signed form and request assembly.
pub mod form;

pub use form::{create_auth_request, create_auth_request_form, create_auth_request_form_with};
pub use signer::{
    CANONICAL_CAPACITY, DIGEST_LEN, ENCODED_DIGEST_CAPACITY, HmacSha256, KeyedHash, Signature,
    SigningInput, compute_signature, compute_signature_with, sign_message, write_canonical_string,
};
