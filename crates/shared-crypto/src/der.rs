//! # DER Key Envelopes
//!
//! Keys exported by ledger tooling are wrapped in fixed-shape ASN.1 DER
//! structures. Every supported shape is a constant prefix followed by the
//! raw key, so import and export reduce to prefix matching.

/// PKCS#8 `PrivateKeyInfo` for Ed25519 (OID 1.3.101.112), 32-byte seed follows.
pub const ED25519_PRIVATE_PREFIX: [u8; 16] = [
    0x30, 0x2e, 0x02, 0x01, 0x00, 0x30, 0x05, 0x06, 0x03, 0x2b, 0x65, 0x70, 0x04, 0x22, 0x04, 0x20,
];

/// `SubjectPublicKeyInfo` for Ed25519, 32-byte key follows.
pub const ED25519_PUBLIC_PREFIX: [u8; 12] = [
    0x30, 0x2a, 0x30, 0x05, 0x06, 0x03, 0x2b, 0x65, 0x70, 0x03, 0x21, 0x00,
];

/// PKCS#8 `PrivateKeyInfo` for secp256k1 (OID 1.3.132.0.10), 32-byte scalar follows.
pub const SECP256K1_PRIVATE_PREFIX: [u8; 18] = [
    0x30, 0x30, 0x02, 0x01, 0x00, 0x30, 0x07, 0x06, 0x05, 0x2b, 0x81, 0x04, 0x00, 0x0a, 0x04, 0x22,
    0x04, 0x20,
];

/// `SubjectPublicKeyInfo` for a compressed secp256k1 point, 33 bytes follow.
pub const SECP256K1_PUBLIC_PREFIX: [u8; 14] = [
    0x30, 0x2d, 0x30, 0x07, 0x06, 0x05, 0x2b, 0x81, 0x04, 0x00, 0x0a, 0x03, 0x22, 0x00,
];

/// Return the key material after `prefix` when the total length matches.
pub(crate) fn strip<'a>(der: &'a [u8], prefix: &[u8], key_len: usize) -> Option<&'a [u8]> {
    if der.len() != prefix.len() + key_len {
        return None;
    }
    der.strip_prefix(prefix)
}

/// Concatenate a prefix and raw key bytes.
pub(crate) fn wrap(prefix: &[u8], key: &[u8]) -> Vec<u8> {
    let mut out = Vec::with_capacity(prefix.len() + key.len());
    out.extend_from_slice(prefix);
    out.extend_from_slice(key);
    out
}
