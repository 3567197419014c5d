use hmac::{Hmac, Mac};
use sha1::Sha1;

use crate::error::{Error, Result};

// HOTP https://datatracker.ietf.org/doc/html/rfc4226

type HmacSha1 = Hmac<Sha1>;

pub const DIGITS: u32 = 6;

/// Computes the HOTP value for `counter`, zero-padded to `digits` characters.
///
/// Only HMAC-SHA-1 with 6 to 8 digits is supported.
pub fn compute_code(key: &[u8], counter: u64, digits: u32) -> Result<String> {
    if key.is_empty() {
        return Err(Error::Key);
    }
    if !(6..=8).contains(&digits) {
        return Err(Error::InvalidDigits(digits));
    }

    let hmac = make_hmac(key, counter)?;
    let code = truncate(&hmac, digits);

    Ok(format!("{:0width$}", code, width = digits as usize))
}

// HMAC_SHA-1 -> 20 byte string
fn make_hmac(key: &[u8], counter: u64) -> Result<[u8; 20]> {
    let mut mac = HmacSha1::new_from_slice(key).map_err(|_| Error::Key)?;
    mac.update(&counter.to_be_bytes());

    let mut hmac = [0u8; 20];
    hmac.copy_from_slice(&mac.finalize().into_bytes());
    Ok(hmac)
}

// reduce to 4 byte string
// then s to num mod 10^Digit
fn truncate(hmac: &[u8; 20], digits: u32) -> u32 {
    let base_code = dynamic_truncation(hmac);

    base_code % u32::pow(10, digits)
}

// DT(String) // String = String[0]...String[19]
// Let OffsetBits be the low-order 4 bits of String[19]
// Offset = StToNum(OffsetBits) // 0 <= OffSet <= 15
// Let P = String[OffSet]...String[OffSet+3]
// Return the Last 31 bits of P
fn dynamic_truncation(hmac: &[u8; 20]) -> u32 {
    let offset = (hmac[19] & 0xf) as usize;
    let mut p = [0u8; 4];
    p.copy_from_slice(&hmac[offset..offset + 4]);

    u32::from_be_bytes(p) & 0x7fff_ffff
}
