use core_types::QueryParams;
use hmac::{Hmac, Mac};
use sha2::Sha256;

// Create a type alias for the HMAC-SHA256 implementation.
type HmacSha256 = Hmac<Sha256>;

/// Creates an HMAC-SHA256 signature over the request parameters.
///
/// The pairs are joined as `key=value` with `&` in insertion order, the same
/// string the exchange rebuilds on its side. Returns lowercase hex.
pub fn sign_request(secret: &str, params: &QueryParams) -> String {
    sign_payload(secret, &params.to_query_string())
}

/// Signs an already-built payload string.
pub fn sign_payload(secret: &str, payload: &str) -> String {
    // Create a new HMAC-SHA256 instance with the secret key.
    let mut mac = HmacSha256::new_from_slice(secret.as_bytes())
        .expect("HMAC can take key of any size");

    mac.update(payload.as_bytes());

    // Convert the raw bytes into a hexadecimal string, which is what the API expects.
    hex::encode(mac.finalize().into_bytes())
}
