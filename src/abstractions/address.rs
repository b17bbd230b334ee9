//! Chain address validation

use sha3::{Digest, Keccak256};

/// Validates candidate wallet addresses
pub trait AddressValidator: Send + Sync {
    /// Whether `candidate` is a well-formed address
    fn is_valid_address(&self, candidate: &str) -> bool;
}

/// EVM address check: `0x` followed by 40 hex digits.
///
/// Mixed-case addresses must carry a valid EIP-55 checksum; all-lowercase and
/// all-uppercase addresses are accepted on format alone.
#[derive(Debug, Clone, Copy, Default)]
pub struct EvmAddressValidator;

impl AddressValidator for EvmAddressValidator {
    fn is_valid_address(&self, candidate: &str) -> bool {
        let Some(hex) = candidate.strip_prefix("0x") else {
            return false;
        };
        if hex.len() != 40 || !hex.chars().all(|c| c.is_ascii_hexdigit()) {
            return false;
        }

        let has_lower = hex.chars().any(|c| c.is_ascii_lowercase());
        let has_upper = hex.chars().any(|c| c.is_ascii_uppercase());
        if has_lower && has_upper {
            has_valid_checksum(hex)
        } else {
            true
        }
    }
}

/// EIP-55: a letter is uppercase iff the matching nibble of
/// `keccak256(lowercase hex)` is 8 or more
fn has_valid_checksum(hex: &str) -> bool {
    let lower = hex.to_ascii_lowercase();
    let hash = Keccak256::digest(lower.as_bytes());

    hex.chars().enumerate().all(|(i, c)| {
        let byte = hash[i / 2];
        let nibble = if i % 2 == 0 { byte >> 4 } else { byte & 0x0f };
        match c {
            'a'..='f' => nibble < 8,
            'A'..='F' => nibble >= 8,
            _ => true,
        }
    })
}

impl<F> AddressValidator for F
where
    F: Fn(&str) -> bool + Send + Sync,
{
    fn is_valid_address(&self, candidate: &str) -> bool {
        self(candidate)
    }
}
