//! Minimal ABI encoding for the three ERC-721 reads the service makes.

use crate::domain::{TokenId, WalletAddress};

/// `balanceOf(address)`.
pub(super) const BALANCE_OF: &str = "70a08231";
/// `tokenOfOwnerByIndex(address,uint256)`.
pub(super) const TOKEN_OF_OWNER_BY_INDEX: &str = "2f745c59";
/// `tokenURI(uint256)`.
pub(super) const TOKEN_URI: &str = "c87b56dd";

const WORD_HEX: usize = 64;
const WORD_BYTES: usize = 32;

pub(super) fn balance_of(owner: &WalletAddress) -> String {
    format!("0x{BALANCE_OF}{}", address_word(owner))
}

pub(super) fn token_of_owner_by_index(owner: &WalletAddress, index: u64) -> String {
    format!(
        "0x{TOKEN_OF_OWNER_BY_INDEX}{}{index:064x}",
        address_word(owner)
    )
}

/// Returns `None` when the decimal id does not fit 256 bits.
pub(super) fn token_uri(token_id: &TokenId) -> Option<String> {
    Some(format!("0x{TOKEN_URI}{}", decimal_to_word(token_id.as_str())?))
}

fn address_word(address: &WalletAddress) -> String {
    format!("{:0>64}", address.hex_digits())
}

/// Left-padded 64-digit hex word for a decimal string.
fn decimal_to_word(decimal: &str) -> Option<String> {
    // Big-endian base-256 digits.
    let mut bytes: Vec<u8> = vec![0];
    for ch in decimal.chars() {
        let mut carry = ch.to_digit(10)?;
        for byte in bytes.iter_mut().rev() {
            let value = u32::from(*byte) * 10 + carry;
            *byte = (value & 0xff) as u8;
            carry = value >> 8;
        }
        while carry > 0 {
            bytes.insert(0, (carry & 0xff) as u8);
            carry >>= 8;
        }
    }
    let digits = hex::encode(bytes);
    let digits = digits.trim_start_matches('0');
    if digits.len() > WORD_HEX {
        return None;
    }
    Some(format!("{digits:0>64}"))
}

/// Decode a `uint256` return value that must fit `u64`.
pub(super) fn decode_u64(result: &str) -> Result<u64, String> {
    let digits = strip_hex_prefix(result);
    let significant = digits.trim_start_matches('0');
    if significant.is_empty() {
        return Ok(0);
    }
    if significant.len() > 16 {
        return Err(format!("value 0x{significant} exceeds u64"));
    }
    u64::from_str_radix(significant, 16).map_err(|err| format!("invalid uint256 '{result}': {err}"))
}

/// Decode a `uint256` return value into a token id.
pub(super) fn decode_token_id(result: &str) -> Result<TokenId, String> {
    let digits = strip_hex_prefix(result);
    if digits.is_empty() {
        return Err("empty uint256 result".to_owned());
    }
    TokenId::parse(&format!("0x{digits}")).map_err(|err| err.to_string())
}

/// Decode a dynamic `string` return value.
pub(super) fn decode_string(result: &str) -> Result<String, String> {
    let bytes = hex::decode(strip_hex_prefix(result))
        .map_err(|err| format!("invalid hex in string result: {err}"))?;
    let offset = word_as_usize(&bytes, 0).ok_or("string offset missing")?;
    let length = word_as_usize(&bytes, offset).ok_or("string length missing")?;
    let start = offset
        .checked_add(WORD_BYTES)
        .ok_or("string offset overflows")?;
    let end = start.checked_add(length).ok_or("string length overflows")?;
    let data = bytes.get(start..end).ok_or("string data truncated")?;
    String::from_utf8(data.to_vec()).map_err(|err| format!("string is not UTF-8: {err}"))
}

fn word_as_usize(bytes: &[u8], at: usize) -> Option<usize> {
    let word = bytes.get(at..at.checked_add(WORD_BYTES)?)?;
    let (high, low) = word.split_at(WORD_BYTES - 8);
    if high.iter().any(|b| *b != 0) {
        return None;
    }
    let value = u64::from_be_bytes(low.try_into().ok()?);
    usize::try_from(value).ok()
}

fn strip_hex_prefix(value: &str) -> &str {
    let trimmed = value.trim();
    trimmed
        .strip_prefix("0x")
        .or_else(|| trimmed.strip_prefix("0X"))
        .unwrap_or(trimmed)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::EvmAddress;
    use rstest::rstest;

    fn owner() -> WalletAddress {
        EvmAddress::parse("0xabcabcabcabcabcabcabcabcabcabcabcabcabca").expect("valid")
    }

    #[test]
    fn encodes_balance_of() {
        let data = balance_of(&owner());
        assert_eq!(
            data,
            "0x70a08231000000000000000000000000abcabcabcabcabcabcabcabcabcabcabcabcabca"
        );
    }

    #[test]
    fn encodes_token_of_owner_by_index() {
        let data = token_of_owner_by_index(&owner(), 3);
        assert!(data.starts_with("0x2f745c59000000000000000000000000abcabc"));
        assert!(data.ends_with(&format!("{:064x}", 3)));
        assert_eq!(data.len(), 2 + 8 + 64 + 64);
    }

    #[rstest]
    #[case("0", "0")]
    #[case("255", "ff")]
    #[case("4096", "1000")]
    fn encodes_token_uri_argument(#[case] decimal: &str, #[case] hex_tail: &str) {
        let data = token_uri(&TokenId::parse(decimal).expect("valid")).expect("fits");
        assert!(data.starts_with("0xc87b56dd"));
        assert_eq!(data.len(), 2 + 8 + 64);
        assert!(data.ends_with(hex_tail));
    }

    #[test]
    fn rejects_token_ids_beyond_256_bits() {
        let huge = TokenId::parse(&"9".repeat(80)).expect("valid decimal");
        assert!(token_uri(&huge).is_none());
    }

    #[rstest]
    #[case("0x", 0)]
    #[case("0x0000000000000000000000000000000000000000000000000000000000000003", 3)]
    fn decodes_balances(#[case] raw: &str, #[case] expected: u64) {
        assert_eq!(decode_u64(raw), Ok(expected));
    }

    #[test]
    fn rejects_balances_beyond_u64() {
        assert!(decode_u64("0x010000000000000000").is_err());
    }

    #[test]
    fn decodes_abi_strings() {
        let text = "ipfs://QmHash/7";
        let encoded = format!(
            "0x{:064x}{:064x}{}{}",
            32,
            text.len(),
            hex::encode(text),
            "0".repeat(64 - text.len() * 2 % 64)
        );
        assert_eq!(decode_string(&encoded).as_deref(), Ok(text));
    }

    #[test]
    fn truncated_strings_fail() {
        let encoded = format!("0x{:064x}{:064x}", 32, 40);
        assert!(decode_string(&encoded).is_err());
    }
}
