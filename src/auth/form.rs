use super::signer::{HmacSha256, KeyedHash, SigningInput, compute_signature_with};
use crate::buffer::{Buffer, Error};
use crate::encoding::{encode_field, encode_integer_field};
use crate::network::application::http::HttpRequest;

/// Append the signed device-authentication form for `input` to `buf`.
///
/// The form is
/// `clientId=..&deviceName=..&expire=..&nonce=..&productId=..&timestamp=..&signature=..`
/// with text fields percent-encoded. The signature is computed over the raw
/// field values, not their encoded forms.
///
/// Returns the number of bytes appended. On any error nothing is committed.
///
/// ```rust
/// use iotsuite::auth::{create_auth_request_form, SigningInput};
/// use iotsuite::buffer::Buffer;
///
/// let input = SigningInput {
///     secret: b"s3cr3t",
///     client_id: "dev01",
///     device_name: "sensor a",
///     product_id: "PRODX",
///     expire: 3600,
///     nonce: 42,
///     timestamp: 1_000_000_000,
/// };
/// let mut storage = [0u8; 256];
/// let mut form = Buffer::new(&mut storage).unwrap();
/// create_auth_request_form(&mut form, &input).unwrap();
/// assert!(form.as_bytes().starts_with(b"clientId=dev01&deviceName=sensor%20a&expire=3600"));
/// ```
pub fn create_auth_request_form(buf: &mut Buffer<'_>, input: &SigningInput<'_>) -> Result<usize, Error> {
    create_auth_request_form_with(&HmacSha256, buf, input)
}

/// [`create_auth_request_form`] with a caller-supplied keyed hash.
pub fn create_auth_request_form_with<H: KeyedHash>(
    hasher: &H,
    buf: &mut Buffer<'_>,
    input: &SigningInput<'_>,
) -> Result<usize, Error> {
    input.validate()?;
    buf.transaction(|b| {
        encode_field(b, "clientId=", input.client_id.as_bytes())?;
        encode_field(b, "&deviceName=", input.device_name.as_bytes())?;
        encode_integer_field(b, "&expire=", input.expire)?;
        encode_integer_field(b, "&nonce=", input.nonce)?;
        encode_field(b, "&productId=", input.product_id.as_bytes())?;
        encode_integer_field(b, "&timestamp=", input.timestamp)?;
        encode_field(b, "&signature=", b"")?;
        b.write_with(|out| {
            if out.is_empty() {
                return Err(Error::BufferOverflow);
            }
            compute_signature_with(hasher, input, out).map(|signature| signature.len())
        })?;
        Ok(())
    })
}

/// Build the complete signed authentication request: the form is written into
/// `form_storage`, then wrapped in a form-urlencoded `POST` to `path` on `host`.
///
/// Returns the total request length.
pub fn create_auth_request(
    request: &mut HttpRequest<'_>,
    form_storage: &mut [u8],
    host: &[u8],
    path: &str,
    input: &SigningInput<'_>,
) -> Result<usize, Error> {
    let mut form = Buffer::new(form_storage)?;
    create_auth_request_form(&mut form, input)?;
    request.create_post_request(path, host, Some(form.as_bytes()))
}
