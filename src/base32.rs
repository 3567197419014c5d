use data_encoding::{Encoding, Specification, BASE32_NOPAD};
use once_cell::sync::Lazy;
use rand::rngs::OsRng;
use rand::RngCore;

use crate::error::{Error, Result};

const ALPHABET: &str = "ABCDEFGHIJKLMNOPQRSTUVWXYZ234567";
const SECRET_LEN: usize = 20;

// RFC 4648 alphabet, no padding, and leftover bits of a partial final
// quantum are dropped instead of rejected.
static LENIENT_BASE32: Lazy<Encoding> = Lazy::new(|| {
    let mut spec = Specification::new();
    spec.symbols.push_str(ALPHABET);
    spec.check_trailing_bits = false;
    spec.encoding().expect("base32 specification is valid")
});

/// Decodes a secret as typed or pasted by a user.
///
/// Case is ignored, and `=` padding and whitespace are stripped anywhere in
/// the input. The result is `floor(n * 5 / 8)` bytes for `n` remaining
/// characters; a trailing character that cannot complete a byte is ignored.
pub fn decode(secret: &str) -> Result<Vec<u8>> {
    let cleaned: String = secret
        .chars()
        .filter(|c| !c.is_whitespace() && *c != '=')
        .map(|c| c.to_ascii_uppercase())
        .collect();

    if !cleaned.chars().all(|c| ALPHABET.contains(c)) {
        return Err(Error::Decode);
    }

    // 1, 3 and 6 trailing characters are not a valid unpadded length; the
    // last one carries no complete byte.
    let usable = match cleaned.len() % 8 {
        1 | 3 | 6 => cleaned.len() - 1,
        _ => cleaned.len(),
    };
    if usable == 0 {
        return Err(Error::Decode);
    }

    LENIENT_BASE32
        .decode(cleaned[..usable].as_bytes())
        .map_err(|_| Error::Decode)
}

pub fn encode(bytes: &[u8]) -> String {
    BASE32_NOPAD.encode(bytes)
}

// Generate a 20 byte random base32 secret
pub fn generate_secret() -> String {
    let mut dest = [0u8; SECRET_LEN];
    OsRng.fill_bytes(&mut dest);
    encode(&dest)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tests::constants::*;

    #[test]
    fn decodes_a_known_secret() {
        assert_eq!(decode(ACME_SECRET).unwrap(), b"Hello!\xde\xad\xbe\xef".to_vec());
    }

    #[test]
    fn ignores_case_padding_and_whitespace() {
        let expected = decode(ACME_SECRET).unwrap();

        assert_eq!(decode("jbswy3dpehpk3pxp").unwrap(), expected);
        assert_eq!(decode("JBSW Y3DP EHPK 3PXP").unwrap(), expected);
        assert_eq!(decode(" JBSWY3DP\tEHPK3PXP\n").unwrap(), expected);
        assert_eq!(decode("MZXW6===").unwrap(), b"foo".to_vec());
        assert_eq!(decode("mzxw6").unwrap(), b"foo".to_vec());
    }

    #[test]
    fn output_length_follows_input_length() {
        for len in 2..=40 {
            let input = "A".repeat(len);
            assert_eq!(decode(&input).unwrap().len(), len * 5 / 8, "length {}", len);
        }
    }

    #[test]
    fn rejects_characters_outside_the_alphabet() {
        assert!(matches!(decode("JBSWY3DPEHPK3PX1"), Err(Error::Decode)));
        assert!(matches!(decode("invalid-key!"), Err(Error::Decode)));
        assert!(matches!(decode("JBSWY3DPÉHPK3PXP"), Err(Error::Decode)));
    }

    #[test]
    fn rejects_input_without_a_whole_byte() {
        assert!(matches!(decode(""), Err(Error::Decode)));
        assert!(matches!(decode("===="), Err(Error::Decode)));
        assert!(matches!(decode("A"), Err(Error::Decode)));
    }

    #[test]
    fn encoding_recovers_the_normalized_secret() {
        let bytes = decode("jbsw y3dp ehpk 3pxp").unwrap();
        assert_eq!(encode(&bytes), ACME_SECRET);
    }

    #[test]
    fn generates_a_20_byte_secret() {
        let secret = generate_secret();

        assert_eq!(secret.len(), 32);
        assert_eq!(decode(&secret).unwrap().len(), 20);
        assert_ne!(secret, generate_secret());
    }
}
