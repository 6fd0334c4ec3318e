//! Plugboard: involutive partial substitution of up to 13 letter pairs.

use std::collections::BTreeSet;

use rand::seq::SliceRandom;
use rand::Rng;
use tracing::debug;

use crate::error::{ConfigError, Result};
use crate::utils::alphabet::{self, ALPHABET_LEN};

/// Maximum number of cables on the board.
pub const MAX_PLUGS: usize = 13;

/// Plugboard configuration, resolved once into the swap table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PlugSpec {
    /// Space-separated two-letter tokens, e.g. `"BQ CR DI"`.
    Pairs(String),
    /// Explicit index pairs.
    IndexPairs(Vec<(usize, usize)>),
    /// This many random pairs drawn without replacement.
    Random(usize),
}

impl From<&str> for PlugSpec {
    fn from(pairs: &str) -> Self {
        PlugSpec::Pairs(pairs.to_string())
    }
}

/// Letter-pair swapping stage applied before and after the rotor stack.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Plugboard {
    map: [usize; ALPHABET_LEN],
}

impl Default for Plugboard {
    fn default() -> Self {
        Self::new()
    }
}

impl Plugboard {
    /// Creates an empty board (identity mapping).
    pub fn new() -> Self {
        Plugboard {
            map: alphabet::identity_map(),
        }
    }

    /// Creates a board from a spec.
    ///
    /// # Errors
    /// See [`configure`](Self::configure).
    pub fn from_spec<R: Rng + ?Sized>(spec: &PlugSpec, rng: &mut R) -> Result<Self> {
        let mut board = Self::new();
        board.configure(spec, rng)?;
        Ok(board)
    }

    /// Rewires the board. `rng` is only consulted for [`PlugSpec::Random`].
    ///
    /// # Errors
    /// Returns `InvalidConfig` for malformed tokens, letters used twice,
    /// indices out of range, or more than 13 pairs. The previous wiring is
    /// kept on error.
    ///
    /// # Examples
    ///
    /// ```
    /// use rand::SeedableRng;
    /// use rand_chacha::ChaCha8Rng;
    /// use rotorcrypt::{PlugSpec, Plugboard};
    ///
    /// let mut rng = ChaCha8Rng::seed_from_u64(0);
    /// let mut board = Plugboard::new();
    /// board.configure(&PlugSpec::from("AB CD"), &mut rng).unwrap();
    /// assert_eq!(board.encode_letter('b').unwrap(), 'a');
    ///
    /// assert!(board.configure(&PlugSpec::from("AB BC"), &mut rng).is_err());
    /// ```
    pub fn configure<R: Rng + ?Sized>(&mut self, spec: &PlugSpec, rng: &mut R) -> Result<()> {
        let pairs = match spec {
            PlugSpec::Pairs(text) => parse_pairs(text)?,
            PlugSpec::IndexPairs(pairs) => pairs.clone(),
            PlugSpec::Random(count) => random_pairs(*count, rng)?,
        };
        self.map = build_map(&pairs)?;
        debug!(pairs = pairs.len(), "plugboard configured");
        Ok(())
    }

    /// Swaps a symbol through the board.
    ///
    /// # Errors
    /// Returns `InvalidSymbol` if `value > 25`.
    #[inline]
    pub fn encode(&self, value: usize) -> Result<usize> {
        Ok(self.map[alphabet::check_symbol(value)?])
    }

    /// Same lookup as [`encode`](Self::encode); the board is its own inverse.
    #[inline]
    pub fn decode(&self, value: usize) -> Result<usize> {
        self.encode(value)
    }

    /// # Errors
    /// Returns `InvalidInput` unless `letter` is a single letter a-z.
    pub fn encode_letter(&self, letter: char) -> Result<char> {
        alphabet::index_letter(self.encode(alphabet::letter_index(letter)?)?)
    }

    /// Same as [`encode_letter`](Self::encode_letter); the board is an involution.
    pub fn decode_letter(&self, letter: char) -> Result<char> {
        self.encode_letter(letter)
    }

    /// Configured swaps as lowercase letter pairs, lower letter first.
    pub fn pairs(&self) -> Vec<(char, char)> {
        self.map
            .iter()
            .enumerate()
            .filter(|&(i, &j)| i < j)
            .map(|(i, &j)| ((b'a' + i as u8) as char, (b'a' + j as u8) as char))
            .collect()
    }
}

fn parse_pairs(text: &str) -> Result<Vec<(usize, usize)>> {
    let tokens: Vec<&str> = text.split_whitespace().collect();
    if tokens.len() > MAX_PLUGS {
        return Err(ConfigError::TooManyPlugs(tokens.len()).into());
    }
    tokens
        .iter()
        .map(|token| -> Result<(usize, usize)> {
            let letters = alphabet::config_indices(token)
                .map_err(|_| ConfigError::MalformedPlug(token.to_string()))?;
            match letters.as_slice() {
                &[a, b] if a != b => Ok((a, b)),
                _ => Err(ConfigError::MalformedPlug(token.to_string()).into()),
            }
        })
        .collect()
}

fn random_pairs<R: Rng + ?Sized>(count: usize, rng: &mut R) -> Result<Vec<(usize, usize)>> {
    if count > MAX_PLUGS {
        return Err(ConfigError::TooManyPlugs(count).into());
    }
    let symbols: Vec<usize> = (0..ALPHABET_LEN).collect();
    let chosen: Vec<usize> = symbols
        .choose_multiple(rng, count * 2)
        .copied()
        .collect();
    Ok(chosen.chunks_exact(2).map(|p| (p[0], p[1])).collect())
}

fn build_map(pairs: &[(usize, usize)]) -> Result<[usize; ALPHABET_LEN]> {
    if pairs.len() > MAX_PLUGS {
        return Err(ConfigError::TooManyPlugs(pairs.len()).into());
    }
    let mut map = alphabet::identity_map();
    let mut used = BTreeSet::new();
    for &(a, b) in pairs {
        if a >= ALPHABET_LEN || b >= ALPHABET_LEN || a == b {
            return Err(ConfigError::InvalidPlugPair(a, b).into());
        }
        for symbol in [a, b] {
            if !used.insert(symbol) {
                return Err(ConfigError::DuplicatePlug((b'a' + symbol as u8) as char).into());
            }
        }
        map[a] = b;
        map[b] = a;
    }
    Ok(map)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::RotorCryptError;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    fn rng() -> ChaCha8Rng {
        ChaCha8Rng::seed_from_u64(2024)
    }

    fn assert_involution(board: &Plugboard) {
        for x in 0..ALPHABET_LEN {
            let y = board.encode(x).unwrap();
            assert_eq!(board.decode(y).unwrap(), x);
            assert_eq!(board.encode(y).unwrap(), x);
        }
    }

    #[test]
    fn test_empty_board_is_identity() {
        let board = Plugboard::new();
        for x in 0..ALPHABET_LEN {
            assert_eq!(board.encode(x).unwrap(), x);
        }
        assert!(board.pairs().is_empty());
    }

    #[test]
    fn test_pairs_string() {
        let board =
            Plugboard::from_spec(&PlugSpec::from("BQ CR DI EJ KW MT OS PX UZ GH"), &mut rng())
                .unwrap();
        assert_eq!(board.encode_letter('b').unwrap(), 'q');
        assert_eq!(board.encode_letter('Q').unwrap(), 'b');
        assert_eq!(board.encode_letter('a').unwrap(), 'a');
        assert_eq!(board.pairs().len(), 10);
        assert_involution(&board);
    }

    #[test]
    fn test_index_pairs() {
        let board =
            Plugboard::from_spec(&PlugSpec::IndexPairs(vec![(0, 25), (3, 4)]), &mut rng()).unwrap();
        assert_eq!(board.pairs(), vec![('a', 'z'), ('d', 'e')]);
        assert_involution(&board);
    }

    #[test]
    fn test_random_pairs_are_disjoint() {
        for count in [0, 1, 7, 13] {
            let board = Plugboard::from_spec(&PlugSpec::Random(count), &mut rng()).unwrap();
            assert_eq!(board.pairs().len(), count);
            assert_involution(&board);
        }
    }

    #[test]
    fn test_random_pairs_are_seeded() {
        let a = Plugboard::from_spec(&PlugSpec::Random(10), &mut rng()).unwrap();
        let b = Plugboard::from_spec(&PlugSpec::Random(10), &mut rng()).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_fourteen_pairs_rejected() {
        let spec = PlugSpec::from("AB CD EF GH IJ KL MN OP QR ST UV WX YZ AC");
        assert_eq!(
            Plugboard::from_spec(&spec, &mut rng()),
            Err(RotorCryptError::InvalidConfig(ConfigError::TooManyPlugs(14)))
        );
        assert_eq!(
            Plugboard::from_spec(&PlugSpec::Random(14), &mut rng()),
            Err(RotorCryptError::InvalidConfig(ConfigError::TooManyPlugs(14)))
        );
    }

    #[test]
    fn test_malformed_tokens() {
        for bad in ["ABC", "A", "AA", "A1"] {
            assert_eq!(
                Plugboard::from_spec(&PlugSpec::from(bad), &mut rng()),
                Err(RotorCryptError::InvalidConfig(ConfigError::MalformedPlug(
                    bad.to_string()
                )))
            );
        }
    }

    #[test]
    fn test_duplicate_letter() {
        assert_eq!(
            Plugboard::from_spec(&PlugSpec::from("AB BC"), &mut rng()),
            Err(RotorCryptError::InvalidConfig(ConfigError::DuplicatePlug('b')))
        );
        assert_eq!(
            Plugboard::from_spec(&PlugSpec::IndexPairs(vec![(1, 26)]), &mut rng()),
            Err(RotorCryptError::InvalidConfig(ConfigError::InvalidPlugPair(1, 26)))
        );
    }

    #[test]
    fn test_failed_configure_keeps_wiring() {
        let mut board = Plugboard::from_spec(&PlugSpec::from("AB"), &mut rng()).unwrap();
        assert!(board.configure(&PlugSpec::from("CD CE"), &mut rng()).is_err());
        assert_eq!(board.pairs(), vec![('a', 'b')]);
    }
}
