//! Dictionary loading and the shared token reader
//!
//! The dictionary is read and validated in full before any worker starts, so
//! an oversized token is a startup error rather than a mid-run failure.
//! Producers then pull tokens through an atomic cursor; every token is handed
//! to exactly one producer.

use crate::error::{InputError, InputResult};
use std::borrow::Cow;
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};
use tracing::debug;

/// Size of a word slot, including the terminator byte of the on-disk format
pub const MAX_WORD_LENGTH: usize = 100;

/// Longest accepted word in bytes
pub const MAX_WORD_BYTES: usize = MAX_WORD_LENGTH - 1;

/// A validated dictionary token
///
/// Raw bytes, so wordlists in any 8-bit encoding load as-is. Non-empty, free
/// of ASCII whitespace and at most [`MAX_WORD_BYTES`] bytes long.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Word(Box<[u8]>);

impl Word {
    /// Validate and wrap a token
    pub fn new(token: impl Into<Vec<u8>>) -> InputResult<Self> {
        let token = token.into();

        if token.is_empty() || token.iter().any(u8::is_ascii_whitespace) {
            return Err(InputError::InvalidWord {
                word: String::from_utf8_lossy(&token).into_owned(),
            });
        }

        if token.len() > MAX_WORD_BYTES {
            let prefix = String::from_utf8_lossy(&token[..16]).into_owned();
            return Err(InputError::WordTooLong {
                prefix,
                len: token.len(),
                max: MAX_WORD_BYTES,
            });
        }

        Ok(Self(token.into_boxed_slice()))
    }

    /// Borrow the raw bytes
    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    /// Text form for display; invalid UTF-8 is replaced
    pub fn to_string_lossy(&self) -> Cow<'_, str> {
        String::from_utf8_lossy(&self.0)
    }

    /// Length in bytes
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Always false for a validated word
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl AsRef<[u8]> for Word {
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}

impl fmt::Display for Word {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_string_lossy())
    }
}

impl TryFrom<&str> for Word {
    type Error = InputError;

    fn try_from(value: &str) -> InputResult<Self> {
        Self::new(value)
    }
}

impl TryFrom<&[u8]> for Word {
    type Error = InputError;

    fn try_from(value: &[u8]) -> InputResult<Self> {
        Self::new(value)
    }
}

/// An in-memory dictionary shared by every producer
#[derive(Debug)]
pub struct Dictionary {
    /// Source file, if loaded from disk
    path: Option<PathBuf>,

    /// Validated tokens in file order
    words: Vec<Word>,

    /// Size of the source text in bytes
    source_bytes: u64,

    /// Index of the next token to hand out
    cursor: AtomicUsize,
}

impl Dictionary {
    /// Load a dictionary file of whitespace-delimited tokens
    pub fn load<P: AsRef<Path>>(path: P) -> InputResult<Self> {
        let path = path.as_ref();
        let text = fs::read(path).map_err(|source| InputError::ReadFailed {
            path: path.to_path_buf(),
            source,
        })?;

        let mut dictionary = Self::parse(&text)?;
        dictionary.path = Some(path.to_path_buf());

        debug!(
            path = %path.display(),
            words = dictionary.len(),
            "Dictionary loaded"
        );

        Ok(dictionary)
    }

    /// Parse tokens separated by ASCII whitespace
    pub fn parse(text: impl AsRef<[u8]>) -> InputResult<Self> {
        let text = text.as_ref();
        let words = text
            .split(u8::is_ascii_whitespace)
            .filter(|token| !token.is_empty())
            .enumerate()
            .map(|(index, token)| {
                Word::new(token).map_err(|e| InputError::InvalidToken {
                    index,
                    source: Box::new(e),
                })
            })
            .collect::<InputResult<Vec<_>>>()?;

        Ok(Self {
            path: None,
            words,
            source_bytes: text.len() as u64,
            cursor: AtomicUsize::new(0),
        })
    }

    /// Build a dictionary from already validated words
    pub fn from_words(words: Vec<Word>) -> Self {
        let source_bytes = words.iter().map(|w| w.len() as u64 + 1).sum();
        Self {
            path: None,
            words,
            source_bytes,
            cursor: AtomicUsize::new(0),
        }
    }

    /// Hand out the next unread token, or `None` at end of input
    pub fn next_token(&self) -> Option<Word> {
        let index = self.cursor.fetch_add(1, Ordering::Relaxed);
        self.words.get(index).cloned()
    }

    /// Number of tokens not yet handed out
    pub fn remaining(&self) -> usize {
        self.words
            .len()
            .saturating_sub(self.cursor.load(Ordering::Relaxed))
    }

    /// Total number of tokens
    pub fn len(&self) -> usize {
        self.words.len()
    }

    /// Check if the dictionary has no tokens
    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }

    /// Size of the source text in bytes
    pub fn source_bytes(&self) -> u64 {
        self.source_bytes
    }

    /// Source file path, if any
    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::thread;

    #[test]
    fn test_word_validation() {
        assert_eq!(Word::new("hello").unwrap().as_bytes(), b"hello");
        assert!(matches!(Word::new(""), Err(InputError::InvalidWord { .. })));
        assert!(matches!(Word::new("a b"), Err(InputError::InvalidWord { .. })));

        let max = "x".repeat(MAX_WORD_BYTES);
        assert!(Word::new(max).is_ok());

        let long = "x".repeat(MAX_WORD_LENGTH);
        assert!(matches!(
            Word::new(long),
            Err(InputError::WordTooLong { len: 100, max: 99, .. })
        ));
    }

    #[test]
    fn test_parse_splits_on_any_whitespace() {
        let dict = Dictionary::parse("hello  world\n\tfoo\r\nbar\n").unwrap();
        assert_eq!(dict.len(), 4);

        let tokens: Vec<_> = std::iter::from_fn(|| dict.next_token())
            .map(|w| w.to_string())
            .collect();
        assert_eq!(tokens, ["hello", "world", "foo", "bar"]);
        assert_eq!(dict.remaining(), 0);
        assert!(dict.next_token().is_none());
    }

    #[test]
    fn test_parse_rejects_long_token_with_index() {
        let text = format!("ok fine {}", "z".repeat(150));
        let err = Dictionary::parse(&text).unwrap_err();
        match err {
            InputError::InvalidToken { index, source } => {
                assert_eq!(index, 2);
                assert!(matches!(*source, InputError::WordTooLong { len: 150, .. }));
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_parse_keeps_non_utf8_bytes() {
        let dict = Dictionary::parse(b"caf\xE9 world\n").unwrap();
        assert_eq!(dict.len(), 2);

        let first = dict.next_token().unwrap();
        assert_eq!(first.as_bytes(), b"caf\xE9");
        assert_eq!(first.to_string(), "caf\u{FFFD}");
    }

    #[test]
    fn test_load_latin1_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        std::io::Write::write_all(&mut file, b"na\xEFve\r\nworld\n").unwrap();

        let dict = Dictionary::load(file.path()).unwrap();
        assert_eq!(dict.len(), 2);
        assert_eq!(dict.path(), Some(file.path()));
        assert_eq!(dict.next_token().unwrap().as_bytes(), b"na\xEFve");
    }

    #[test]
    fn test_load_missing_file() {
        let err = Dictionary::load("/definitely/not/here.txt").unwrap_err();
        assert!(matches!(err, InputError::ReadFailed { .. }));
    }

    #[test]
    fn test_tokens_handed_out_once() {
        let words: Vec<Word> = (0..1000)
            .map(|i| Word::new(format!("w{i}")).unwrap())
            .collect();
        let dict = Arc::new(Dictionary::from_words(words));

        let handles: Vec<_> = (0..4)
            .map(|_| {
                let dict = Arc::clone(&dict);
                thread::spawn(move || std::iter::from_fn(|| dict.next_token()).count())
            })
            .collect();

        let total: usize = handles.into_iter().map(|h| h.join().unwrap()).sum();
        assert_eq!(total, 1000);
    }
}
