//! Candidate expansion
//!
//! Every dictionary word expands to [`VARIANT_COUNT`] candidates: the eight
//! combinations of three leetspeak substitutions, each one unsuffixed and
//! then with every decimal digit appended.
//!
//! Layout of the output:
//!
//! ```text
//! index 0..8            permutation p (bit 0: i->!, bit 1: l->1, bit 2: o->0)
//! index 8 + p*10 + d    permutation p followed by digit d
//! ```

/// Number of substitution permutations
pub const PERMUTATION_COUNT: usize = 8;

/// Number of digit suffixes per permutation
pub const SUFFIX_COUNT: usize = 10;

/// Number of candidates produced per word
pub const VARIANT_COUNT: usize = PERMUTATION_COUNT * (1 + SUFFIX_COUNT);

/// Substitution rules, indexed by permutation bit
const RULES: [(u8, u8); 3] = [(b'i', b'!'), (b'l', b'1'), (b'o', b'0')];

/// Apply the substitutions selected by the bits of `mask` to `word`
fn permute(word: &[u8], mask: usize) -> Vec<u8> {
    word.iter()
        .map(|&b| {
            RULES
                .iter()
                .enumerate()
                .find(|(bit, (from, _))| mask & (1 << bit) != 0 && *from == b)
                .map_or(b, |(_, (_, to))| *to)
        })
        .collect()
}

/// Expand a word into its fixed, ordered candidate set
///
/// Works on raw bytes; bytes outside the three rules pass through unchanged.
pub fn expand(word: &[u8]) -> Vec<Vec<u8>> {
    let permutations: Vec<Vec<u8>> = (0..PERMUTATION_COUNT).map(|mask| permute(word, mask)).collect();

    let mut variants = Vec::with_capacity(VARIANT_COUNT);
    variants.extend(permutations.iter().cloned());

    for base in &permutations {
        for digit in 0..SUFFIX_COUNT as u8 {
            let mut variant = Vec::with_capacity(base.len() + 1);
            variant.extend_from_slice(base);
            variant.push(b'0' + digit);
            variants.push(variant);
        }
    }

    variants
}
