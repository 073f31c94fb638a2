use ed25519_dalek::{Signature, VerifyingKey};

pub const SIGNATURE_HEADER: &str = "x-signature-ed25519";
pub const TIMESTAMP_HEADER: &str = "x-signature-timestamp";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum VerifyError {
    BadHex(&'static str),
    BadKey,
    BadSignature,
}

impl std::fmt::Display for VerifyError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            VerifyError::BadHex(what) => write!(f, "bad hex in {what}"),
            VerifyError::BadKey => write!(f, "not an ed25519 public key"),
            VerifyError::BadSignature => write!(f, "signature does not match"),
        }
    }
}

impl std::error::Error for VerifyError {}

/// The application public key as shown in the developer portal (64 hex chars).
pub fn parse_public_key(hex: &str) -> Result<VerifyingKey, VerifyError> {
    let bytes = decode_hex::<32>(hex).ok_or(VerifyError::BadHex("public key"))?;
    VerifyingKey::from_bytes(&bytes).map_err(|_| VerifyError::BadKey)
}

/// Checks `signature_hex` over `timestamp || body`.
pub fn verify_request(
    key: &VerifyingKey,
    signature_hex: &str,
    timestamp: &str,
    body: &[u8],
) -> Result<(), VerifyError> {
    let sig = decode_hex::<64>(signature_hex).ok_or(VerifyError::BadHex("signature"))?;
    let sig = Signature::from_bytes(&sig);

    let mut msg = Vec::with_capacity(timestamp.len() + body.len());
    msg.extend_from_slice(timestamp.as_bytes());
    msg.extend_from_slice(body);

    key.verify_strict(&msg, &sig)
        .map_err(|_| VerifyError::BadSignature)
}

pub fn decode_hex<const N: usize>(s: &str) -> Option<[u8; N]> {
    let s = s.trim().as_bytes();
    if s.len() != N * 2 {
        return None;
    }
    let mut out = [0u8; N];
    for (i, pair) in s.chunks_exact(2).enumerate() {
        out[i] = (nibble(pair[0])? << 4) | nibble(pair[1])?;
    }
    Some(out)
}

pub fn encode_hex(b: &[u8]) -> String {
    let mut out = String::with_capacity(b.len() * 2);
    for x in b {
        out.push_str(&format!("{:02x}", x));
    }
    out
}

fn nibble(c: u8) -> Option<u8> {
    match c {
        b'0'..=b'9' => Some(c - b'0'),
        b'a'..=b'f' => Some(c - b'a' + 10),
        b'A'..=b'F' => Some(c - b'A' + 10),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use ed25519_dalek::{Signer, SigningKey};

    use super::*;

    fn signing_key() -> SigningKey {
        SigningKey::from_bytes(&[7u8; 32])
    }

    fn sign(key: &SigningKey, ts: &str, body: &[u8]) -> String {
        let mut msg = ts.as_bytes().to_vec();
        msg.extend_from_slice(body);
        encode_hex(&key.sign(&msg).to_bytes())
    }

    #[test]
    fn accepts_valid_signature() {
        let sk = signing_key();
        let pk = parse_public_key(&encode_hex(sk.verifying_key().as_bytes())).unwrap();
        let body = br#"{"type":1}"#;
        let sig = sign(&sk, "1700000000", body);
        assert_eq!(verify_request(&pk, &sig, "1700000000", body), Ok(()));
    }

    #[test]
    fn rejects_tampering() {
        let sk = signing_key();
        let pk = sk.verifying_key();
        let body = br#"{"type":1}"#;
        let sig = sign(&sk, "1700000000", body);

        assert_eq!(
            verify_request(&pk, &sig, "1700000001", body),
            Err(VerifyError::BadSignature)
        );
        assert_eq!(
            verify_request(&pk, &sig, "1700000000", br#"{"type":2}"#),
            Err(VerifyError::BadSignature)
        );
        assert_eq!(
            verify_request(&pk, "zz", "1700000000", body),
            Err(VerifyError::BadHex("signature"))
        );
    }

    #[test]
    fn hex_round_trip_and_rejects() {
        let b = [0x00u8, 0xab, 0xff, 0x10];
        assert_eq!(encode_hex(&b), "00abff10");
        assert_eq!(decode_hex::<4>("00ABff10"), Some(b));
        assert_eq!(decode_hex::<4>("00abff1"), None);
        assert_eq!(decode_hex::<4>("00abff1g"), None);
        assert!(parse_public_key("abcd").is_err());
    }
}
