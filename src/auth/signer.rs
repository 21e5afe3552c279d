use crate::buffer::{Buffer, Error};
use crate::encoding::percent;
use base64ct::{Base64, Encoding as B64Encoding};
use core::fmt::Write;
use hmac::{Hmac, Mac};
use sha2::Sha256;

/// Hard ceiling on the canonical signing string, in bytes.
pub const CANONICAL_CAPACITY: usize = 4096;
/// Scratch space for the base64 form of the digest.
pub const ENCODED_DIGEST_CAPACITY: usize = 1024;
/// Length of a keyed-hash digest.
pub const DIGEST_LEN: usize = 32;

type HmacImpl = Hmac<Sha256>;

/// A 256-bit keyed hash.
///
/// The default is [`HmacSha256`]; devices with a crypto accelerator can plug
/// their own implementation into the `*_with` functions.
pub trait KeyedHash {
    /// Digest `message` under `key`.
    fn digest(&self, key: &[u8], message: &[u8]) -> Result<[u8; DIGEST_LEN], Error>;
}

/// HMAC-SHA256 in software.
#[derive(Debug, Default, Clone, Copy)]
pub struct HmacSha256;

impl KeyedHash for HmacSha256 {
    fn digest(&self, key: &[u8], message: &[u8]) -> Result<[u8; DIGEST_LEN], Error> {
        let mut mac = HmacImpl::new_from_slice(key).map_err(|_| Error::InvalidParameter)?;
        mac.update(message);
        let mut digest = [0u8; DIGEST_LEN];
        digest.copy_from_slice(&mac.finalize().into_bytes());
        Ok(digest)
    }
}

/// Everything a device signs to authenticate itself.
///
/// Field values are signed verbatim; only the transmitted form percent-encodes them.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SigningInput<'a> {
    /// Shared device secret used as the hash key.
    pub secret: &'a [u8],
    /// Client identifier.
    pub client_id: &'a str,
    /// Device name.
    pub device_name: &'a str,
    /// Product identifier.
    pub product_id: &'a str,
    /// Requested token lifetime, in seconds.
    pub expire: i64,
    /// Random nonce.
    pub nonce: i64,
    /// Unix timestamp of the request.
    pub timestamp: i64,
}

impl SigningInput<'_> {
    pub(crate) fn validate(&self) -> Result<(), Error> {
        if self.secret.is_empty()
            || self.client_id.is_empty()
            || self.device_name.is_empty()
            || self.product_id.is_empty()
        {
            return Err(Error::NullArgument);
        }
        Ok(())
    }
}

/// How a signature ended up in the caller's output.
///
/// Overflow is reported as [`Error::BufferOverflow`]; both variants here mean
/// the complete signature was written.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Signature {
    /// `len` bytes written and followed by a NUL byte.
    Terminated(usize),
    /// `len` bytes written, filling the output exactly; there was no room for
    /// a NUL byte. Callers treating the output as a C string must check this.
    Unterminated(usize),
}

impl Signature {
    /// Number of signature bytes written, excluding any terminator.
    pub fn len(&self) -> usize {
        match *self {
            Signature::Terminated(n) | Signature::Unterminated(n) => n,
        }
    }

    /// Always `false`: an encoded digest is never empty.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Whether a NUL byte follows the signature.
    pub fn is_terminated(&self) -> bool {
        matches!(self, Signature::Terminated(_))
    }
}

/// Write the canonical signing string for `input`.
///
/// Fields always appear in the order `clientId`, `deviceName`, `expire`,
/// `nonce`, `productId`, `timestamp`; the server rebuilds the same string to
/// verify the signature, so this order is part of the wire contract.
pub fn write_canonical_string(buf: &mut Buffer<'_>, input: &SigningInput<'_>) -> Result<usize, Error> {
    buf.transaction(|b| {
        write!(
            b,
            "clientId={}&deviceName={}&expire={}&nonce={}&productId={}&timestamp={}",
            input.client_id,
            input.device_name,
            input.expire,
            input.nonce,
            input.product_id,
            input.timestamp
        )
        .map_err(|_| Error::BufferOverflow)
    })
}

/// Compute the URL-safe signature for `input` into `out` with HMAC-SHA256.
///
/// The signature is `percent(base64(hmac_sha256(secret, canonical)))`.
///
/// ```rust
/// use iotsuite::auth::{compute_signature, SigningInput};
///
/// let input = SigningInput {
///     secret: b"s3cr3t",
///     client_id: "dev01",
///     device_name: "sensor-a",
///     product_id: "PRODX",
///     expire: 3600,
///     nonce: 42,
///     timestamp: 1_000_000_000,
/// };
/// let mut out = [0u8; 128];
/// let signature = compute_signature(&input, &mut out).unwrap();
/// assert!(signature.is_terminated());
/// assert_eq!(
///     &out[..signature.len()],
///     b"68YUCPzUrzdUuZ31UxdwJPhwnu%2FIxR6Nauk27%2FTdJ1A%3D"
/// );
/// ```
///
/// # Errors
///
/// * [`Error::NullArgument`] - empty secret or identifier
/// * [`Error::InvalidParameter`] - `out` is empty
/// * [`Error::BufferOverflow`] - the canonical string exceeds
///   [`CANONICAL_CAPACITY`], or the signature does not fit in `out`
pub fn compute_signature(input: &SigningInput<'_>, out: &mut [u8]) -> Result<Signature, Error> {
    compute_signature_with(&HmacSha256, input, out)
}

/// [`compute_signature`] with a caller-supplied keyed hash.
pub fn compute_signature_with<H: KeyedHash>(
    hasher: &H,
    input: &SigningInput<'_>,
    out: &mut [u8],
) -> Result<Signature, Error> {
    input.validate()?;
    if out.is_empty() {
        return Err(Error::InvalidParameter);
    }

    let mut scratch = [0u8; CANONICAL_CAPACITY];
    let mut canonical = Buffer::new(&mut scratch)?;
    if let Err(e) = write_canonical_string(&mut canonical, input) {
        #[cfg(feature = "defmt")]
        defmt::error!(
            "auth sign: canonical string exceeds {} bytes",
            CANONICAL_CAPACITY
        );
        return Err(e);
    }

    sign_message(hasher, input.secret, canonical.as_bytes(), out)
}

/// Sign an already-built `message`: keyed hash, base64, then percent-encode
/// into `out`, NUL-terminating when there is room.
pub fn sign_message<H: KeyedHash>(
    hasher: &H,
    secret: &[u8],
    message: &[u8],
    out: &mut [u8],
) -> Result<Signature, Error> {
    let digest = hasher.digest(secret, message)?;

    let mut b64_buf = [0u8; ENCODED_DIGEST_CAPACITY];
    let encoded = Base64::encode(&digest, &mut b64_buf).map_err(|_| Error::BufferOverflow)?;

    let n = percent::encode(encoded.as_bytes(), out)?;
    if n < out.len() {
        out[n] = 0;
        Ok(Signature::Terminated(n))
    } else {
        Ok(Signature::Unterminated(n))
    }
}
