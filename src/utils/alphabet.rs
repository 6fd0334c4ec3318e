//! Letter/index conversion utilities.
//!
//! The machine works internally on symbol indices `0..=25`. External text
//! uses the letters `a`-`z` (uppercase is accepted and folded). Conversions
//! for runtime input report [`RotorCryptError::InvalidInput`], while
//! conversions of configuration strings report a [`ConfigError`].

use crate::error::{ConfigError, Result, RotorCryptError};

/// Number of symbols handled by every wheel.
pub const ALPHABET_LEN: usize = 26;

/// The identity permutation over the alphabet.
pub fn identity_map() -> [usize; ALPHABET_LEN] {
    let mut map = [0usize; ALPHABET_LEN];
    for (i, slot) in map.iter_mut().enumerate() {
        *slot = i;
    }
    map
}

/// Converts a single letter into its index (`a` = 0 ... `z` = 25).
///
/// # Errors
/// Returns [`RotorCryptError::InvalidInput`] if `letter` is not ASCII alphabetic.
pub fn letter_index(letter: char) -> Result<usize> {
    match letter.to_ascii_lowercase() {
        c @ 'a'..='z' => Ok(c as usize - 'a' as usize),
        _ => Err(RotorCryptError::InvalidInput(letter.to_string())),
    }
}

/// Converts an index back into its lowercase letter.
///
/// # Errors
/// Returns [`RotorCryptError::InvalidSymbol`] if `index > 25`.
pub fn index_letter(index: usize) -> Result<char> {
    check_symbol(index)?;
    Ok((b'a' + index as u8) as char)
}

/// Ensures `value` is a valid symbol index.
#[inline]
pub fn check_symbol(value: usize) -> Result<usize> {
    if value < ALPHABET_LEN {
        Ok(value)
    } else {
        Err(RotorCryptError::InvalidSymbol(value))
    }
}

/// Parses a configuration string into indices, one per character.
///
/// # Errors
/// Returns [`ConfigError::InvalidLetter`] on the first non-letter.
pub fn config_indices(letters: &str) -> std::result::Result<Vec<usize>, ConfigError> {
    letters
        .chars()
        .map(|c| letter_index(c).map_err(|_| ConfigError::InvalidLetter(c)))
        .collect()
}

/// Renders a slice of indices as letters. Out-of-range values render as `?`.
pub fn render(indices: &[usize]) -> String {
    indices
        .iter()
        .map(|&i| index_letter(i).unwrap_or('?'))
        .collect()
}
