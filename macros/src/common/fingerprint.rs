//! Stable bundle fingerprints.
//!
//! A fingerprint identifies one capability bundle (self type + concept) so the
//! runtime can recognise a bundle that is attached twice.

/// First 8 bytes of the BLAKE3 digest of `key`, little-endian.
pub fn fingerprint(key: &str) -> u64 {
    let digest = blake3::hash(key.as_bytes());
    let mut head = [0u8; 8];
    head.copy_from_slice(&digest.as_bytes()[..8]);
    u64::from_le_bytes(head)
}

/// Token text without the spaces `quote` inserts between tokens.
///
/// `Vector < T >` becomes `Vector<T>`.
pub fn compact(tokens: &proc_macro2::TokenStream) -> String {
    tokens.to_string().chars().filter(|c| !c.is_whitespace()).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fingerprint_is_stable_and_key_sensitive() {
        assert_eq!(fingerprint("Vector<T> as SequenceContainer"), fingerprint("Vector<T> as SequenceContainer"));
        assert_ne!(fingerprint("Vector<T> as SequenceContainer"), fingerprint("Deque<T> as SequenceContainer"));
    }

    #[test]
    fn compact_strips_token_spacing() {
        let tokens: proc_macro2::TokenStream = syn::parse_str("Array < Vec < T > >").unwrap();
        assert_eq!(compact(&tokens), "Array<Vec<T>>");
    }
}
