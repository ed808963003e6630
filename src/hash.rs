//! SHA-256 digests and target parsing

use crate::error::{InputError, InputResult};
use sha2::{Digest as _, Sha256};
use std::fmt;
use std::fs;
use std::path::Path;
use std::str::FromStr;

/// Digest width in bytes
pub const DIGEST_LEN: usize = 32;

/// Digest width as hexadecimal characters
pub const DIGEST_HEX_LEN: usize = DIGEST_LEN * 2;

/// A raw SHA-256 digest
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct Digest([u8; DIGEST_LEN]);

impl Digest {
    /// Wrap raw digest bytes
    pub fn from_bytes(bytes: [u8; DIGEST_LEN]) -> Self {
        Self(bytes)
    }

    /// Parse a 64-character hex string (either case)
    pub fn from_hex(value: &str) -> InputResult<Self> {
        if value.len() != DIGEST_HEX_LEN {
            return Err(InputError::InvalidDigest {
                value: value.to_string(),
                reason: format!("expected {} hex characters, got {}", DIGEST_HEX_LEN, value.len()),
            });
        }

        let mut bytes = [0u8; DIGEST_LEN];
        hex::decode_to_slice(value, &mut bytes).map_err(|e| InputError::InvalidDigest {
            value: value.to_string(),
            reason: e.to_string(),
        })?;

        Ok(Self(bytes))
    }

    /// Read the target digest from the first token of a file
    pub fn load<P: AsRef<Path>>(path: P) -> InputResult<Self> {
        let path = path.as_ref();
        let text = fs::read_to_string(path).map_err(|source| InputError::ReadFailed {
            path: path.to_path_buf(),
            source,
        })?;

        let token = text
            .split_whitespace()
            .next()
            .ok_or_else(|| InputError::MissingTarget {
                path: path.to_path_buf(),
            })?;

        Self::from_hex(token)
    }

    /// Raw digest bytes
    pub fn as_bytes(&self) -> &[u8; DIGEST_LEN] {
        &self.0
    }

    /// Lowercase hex encoding
    pub fn to_hex(&self) -> String {
        hex::encode(self.0)
    }
}

impl fmt::Debug for Digest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Digest({})", self.to_hex())
    }
}

impl fmt::Display for Digest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

impl FromStr for Digest {
    type Err = InputError;

    fn from_str(s: &str) -> InputResult<Self> {
        Self::from_hex(s.trim())
    }
}

/// Hash bytes with SHA-256
pub fn sha256(data: &[u8]) -> Digest {
    Digest(Sha256::digest(data).into())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    const HELLO_SHA256: &str = "2cf24dba5fb0a30e26e83b2ac5b9e29e1b161e5c1fa7425e73043362938b9824";

    #[test]
    fn test_sha256_known_vector() {
        assert_eq!(sha256(b"hello").to_hex(), HELLO_SHA256);
        assert_eq!(
            sha256(b"").to_hex(),
            "e3b0c44298fc1c149afbf4c8996fb92427ae41e4649b934ca495991b7852b855"
        );
    }

    #[test]
    fn test_from_hex_case_insensitive() {
        let lower = Digest::from_hex(HELLO_SHA256).unwrap();
        let upper = Digest::from_hex(&HELLO_SHA256.to_uppercase()).unwrap();
        assert_eq!(lower, upper);
        assert_eq!(lower, sha256(b"hello"));
    }

    #[test]
    fn test_from_hex_rejects_bad_input() {
        assert!(Digest::from_hex("abcd").is_err());
        assert!(Digest::from_hex(&"g".repeat(64)).is_err());
        assert!(Digest::from_hex(&"a".repeat(65)).is_err());
    }

    #[test]
    fn test_load_reads_first_token() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "  {}  trailing", HELLO_SHA256).unwrap();

        let digest = Digest::load(file.path()).unwrap();
        assert_eq!(digest, sha256(b"hello"));
    }

    #[test]
    fn test_load_empty_file() {
        let file = tempfile::NamedTempFile::new().unwrap();
        assert!(matches!(
            Digest::load(file.path()),
            Err(InputError::MissingTarget { .. })
        ));
    }
}
