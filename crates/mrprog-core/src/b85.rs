//! Base85 text encoding (RFC 1924 alphabet, unpadded).
//!
//! Binary payloads such as room-code screenshots travel inside JSON
//! messages as base85 strings. A trailing group of `n` bytes encodes to
//! `n + 1` characters.

const ALPHABET: &[u8; 85] =
    b"0123456789ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz!#$%&()*+-;<=>?@^_`{|}~";

const INVALID: u8 = 0xff;

const DECODE: [u8; 256] = {
    let mut table = [INVALID; 256];
    let mut i = 0;
    while i < ALPHABET.len() {
        table[ALPHABET[i] as usize] = i as u8;
        i += 1;
    }
    table
};

/// Encode bytes as base85 text.
pub fn encode(data: &[u8]) -> String {
    let mut out = String::with_capacity(data.len().div_ceil(4) * 5);

    for chunk in data.chunks(4) {
        let mut word = [0u8; 4];
        word[..chunk.len()].copy_from_slice(chunk);
        let mut value = u32::from_be_bytes(word);

        let mut digits = [0u8; 5];
        for digit in digits.iter_mut().rev() {
            *digit = ALPHABET[(value % 85) as usize];
            value /= 85;
        }

        out.extend(digits[..chunk.len() + 1].iter().map(|&b| b as char));
    }

    out
}

/// Decode base85 text produced by [`encode`].
pub fn decode(text: &str) -> Result<Vec<u8>, DecodeError> {
    let bytes = text.as_bytes();
    let mut out = Vec::with_capacity(bytes.len() / 5 * 4 + 3);

    for (group, chunk) in bytes.chunks(5).enumerate() {
        if chunk.len() == 1 {
            return Err(DecodeError::TruncatedGroup);
        }

        let mut value: u64 = 0;
        for i in 0..5 {
            let c = chunk.get(i).copied().unwrap_or(b'~');
            let digit = DECODE[c as usize];
            if digit == INVALID {
                return Err(DecodeError::InvalidCharacter {
                    position: group * 5 + i,
                    character: c as char,
                });
            }
            value = value * 85 + u64::from(digit);
        }

        let value = u32::try_from(value).map_err(|_| DecodeError::Overflow { group })?;
        out.extend_from_slice(&value.to_be_bytes()[..chunk.len() - 1]);
    }

    Ok(out)
}

/// Error decoding base85 text.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DecodeError {
    #[error("invalid base85 character {character:?} at position {position}")]
    InvalidCharacter { position: usize, character: char },
    #[error("base85 group {group} overflows 32 bits")]
    Overflow { group: usize },
    #[error("base85 input ends with a single-character group")]
    TruncatedGroup,
}
