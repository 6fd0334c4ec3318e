//! Historical wheel and reflector wirings.
//!
//! Wirings are listed as the letter each contact A..Z is wired to. Notches
//! are the dial letters at which a wheel carries its left-hand neighbour
//! on the next keystroke.

use crate::error::ConfigError;
use crate::permutation::{NotchSpec, Wiring};

/// A named historical wiring.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HistoricalWiring {
    pub name: &'static str,
    /// Image of `A..Z`, as letters.
    pub wiring: &'static str,
    /// Turnover letters; `None` for wheels that never signal.
    pub notches: Option<&'static str>,
}

impl HistoricalWiring {
    /// Wiring letters as a [`Wiring`].
    pub fn wiring(&self) -> Wiring {
        Wiring::from(self.wiring)
    }

    /// Notch letters as a [`NotchSpec`].
    pub fn notches(&self) -> NotchSpec {
        NotchSpec::from(self.notches)
    }
}

const fn entry(
    name: &'static str,
    wiring: &'static str,
    notches: Option<&'static str>,
) -> HistoricalWiring {
    HistoricalWiring {
        name,
        wiring,
        notches,
    }
}

/// Rotor and reflector wirings by historical designation.
pub const HISTORICAL_WIRINGS: [HistoricalWiring; 14] = [
    entry("I", "EKMFLGDQVZNTOWYHXUSPAIBRCJ", Some("Q")),
    entry("II", "AJDKSIRUXBLHWTMCQGZNPYFVOE", Some("E")),
    entry("III", "BDFHJLCPRTXVZNYEIWGAKMUSQO", Some("V")),
    entry("IV", "ESOVPZJAYQUIRHXLNFTGKDCMWB", Some("J")),
    entry("V", "VZBRGITYUPSDNHLXAWMJQOFECK", Some("Z")),
    entry("VI", "JPGVOUMFYQBENHZRDKASXLICTW", Some("ZM")),
    entry("VII", "NZJHGRCXMYSWBOUFAIVLPEKQDT", Some("ZM")),
    entry("VIII", "FKQHTLXOCBJSPDZRAMEWNIUYGV", Some("ZM")),
    entry("BETA", "LEYJVCNIXWPBQMDRTAKZGFUHOS", None),
    entry("GAMMA", "FSOKANUERHMBTIYCWLQPZXVGJD", None),
    entry("A", "EJMZALYXVBWFCRQUONTSPIKHGD", None),
    entry("B", "YRUHQSLDPXNGOKMIEBFZCWVJAT", None),
    entry("C", "FVPJIAOYEDRZXWGCTKUQSBNMHL", None),
    entry("BT", "ENKQAUYWJICOPBLMDXZVFTHRGS", None),
];

/// Looks up a wiring by name (case-insensitive).
///
/// # Errors
/// Returns [`ConfigError::UnknownWheel`] for names not in the table.
pub fn historical(name: &str) -> Result<&'static HistoricalWiring, ConfigError> {
    HISTORICAL_WIRINGS
        .iter()
        .find(|w| w.name.eq_ignore_ascii_case(name.trim()))
        .ok_or_else(|| ConfigError::UnknownWheel(name.to_string()))
}
