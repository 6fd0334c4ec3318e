//! Error types for the rotorcrypt library.

use thiserror::Error;

/// Errors produced by the rotorcrypt library.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RotorCryptError {
    /// A numeric symbol outside `0..=25` reached a permutation operation.
    #[error("Symbol {0} is outside the range 0..=25")]
    InvalidSymbol(usize),
    /// External character input is not a single `a`-`z` letter.
    #[error("Input must be a single letter a-z, got {0:?}")]
    InvalidInput(String),
    /// A wiring, notch, key, ring or plugboard setting was rejected.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(#[from] ConfigError),
}

/// Reasons a configuration value is rejected.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    /// Wiring is not a bijection over `0..=25`.
    #[error("wiring is not a permutation of the 26 letters")]
    NotAPermutation,
    /// Reflector wiring does not map every symbol back onto itself.
    #[error("reflector wiring is not self-inverse")]
    NotInvolutive,
    /// Notch position is outside `0..=25`.
    #[error("notch position {0} is outside the range 0..=25")]
    NotchOutOfRange(usize),
    /// A character that is not `a`-`z` appeared in a setting.
    #[error("{0:?} is not a letter a-z")]
    InvalidLetter(char),
    /// Key string length does not match the rotor count.
    #[error("key must have {expected} letters, got {actual}")]
    KeyLength { expected: usize, actual: usize },
    /// Ring string length does not match the rotor count.
    #[error("ring setting must have {expected} letters, got {actual}")]
    RingLength { expected: usize, actual: usize },
    /// Reflector position is not exactly one letter.
    #[error("reflector position must be a single letter, got {0:?}")]
    ReflectorPosition(String),
    /// Plugboard token is not two distinct letters.
    #[error("malformed plugboard token {0:?}")]
    MalformedPlug(String),
    /// Plugboard index pair contains a value outside `0..=25` or a self-pair.
    #[error("plugboard pair ({0}, {1}) is invalid")]
    InvalidPlugPair(usize, usize),
    /// A letter is plugged more than once.
    #[error("letter {0:?} is plugged more than once")]
    DuplicatePlug(char),
    /// More than 13 plugboard pairs were requested.
    #[error("at most 13 plugboard pairs are allowed, got {0}")]
    TooManyPlugs(usize),
    /// A machine must hold at least one rotor.
    #[error("a machine needs at least one rotor")]
    NoRotors,
    /// Rotor position outside `1..=N`.
    #[error("rotor position {position} is outside 1..={count}")]
    RotorPosition { position: usize, count: usize },
    /// Wheel name not present in the historical table.
    #[error("unknown wheel {0:?}")]
    UnknownWheel(String),
}

/// Result alias used throughout the crate.
pub type Result<T> = std::result::Result<T, RotorCryptError>;
