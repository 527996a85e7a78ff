//! Merkle roots over dataset chunk identifiers.
//!
//! Each dataset referenced by a chain is summarized as a single root so a
//! passport can name it without carrying every chunk. Odd layers duplicate
//! their last digest; the empty input is the hash of the empty byte string.

use sha2::{Digest, Sha256};

use crate::cid::Cid;

/// Compute the Merkle root over an ordered sequence of leaf byte strings.
pub fn merkle_root<I>(chunks: I) -> Cid
where
    I: IntoIterator,
    I::Item: AsRef<[u8]>,
{
    let mut layer: Vec<[u8; 32]> = chunks
        .into_iter()
        .map(|chunk| Sha256::digest(chunk.as_ref()).into())
        .collect();

    if layer.is_empty() {
        return Cid::address(&[]);
    }

    while layer.len() > 1 {
        layer = layer
            .chunks(2)
            .map(|pair| {
                let mut hasher = Sha256::new();
                hasher.update(pair[0]);
                hasher.update(pair.get(1).unwrap_or(&pair[0]));
                hasher.finalize().into()
            })
            .collect();
    }

    Cid::from_digest(layer[0])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_input_is_hash_of_empty() {
        assert_eq!(
            merkle_root(Vec::<&[u8]>::new()).as_str(),
            "sha256:e3b0c44298fc1c149afbf4c8996fb92427ae41e4649b934ca495991b7852b855"
        );
    }

    #[test]
    fn test_single_leaf_is_leaf_hash() {
        assert_eq!(merkle_root([b"abc"]), Cid::address(b"abc"));
    }

    #[test]
    fn test_deterministic() {
        let chunks = [b"a".as_slice(), b"b", b"c"];
        let r1 = merkle_root(chunks);
        let r2 = merkle_root(chunks);
        assert_eq!(r1, r2);
        assert_eq!(r1.as_str().len(), 71);
    }

    #[test]
    fn test_order_sensitive() {
        assert_ne!(
            merkle_root([b"a".as_slice(), b"b"]),
            merkle_root([b"b".as_slice(), b"a"])
        );
    }

    #[test]
    fn test_odd_layer_duplicates_last() {
        // With three leaves the last is paired with itself, so [a, b, c]
        // and [a, b, c, c] share a root.
        let three = merkle_root([b"a".as_slice(), b"b", b"c"]);
        let four = merkle_root([b"a".as_slice(), b"b", b"c", b"c"]);
        assert_eq!(three, four);
    }

    #[test]
    fn test_distinct_inputs_distinct_roots() {
        assert_ne!(
            merkle_root([b"a".as_slice(), b"b"]),
            merkle_root([b"a".as_slice(), b"x"])
        );
    }
}
