//! PermutationUnit: validated bijection over the 26 symbols.
//!
//! Shared by rotors, the reflector and the entry wheel. A unit keeps its
//! base wiring untouched and derives the effective wiring from it whenever
//! the ring offset changes, so ring settings never compound. The inverse of
//! the effective wiring is maintained alongside it for constant-time decode.

use std::fmt;

use rand::seq::SliceRandom;
use rand::Rng;

use crate::error::{ConfigError, Result};
use crate::utils::alphabet::{self, ALPHABET_LEN};

/// Wiring of a wheel, as letters or as explicit indices.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Wiring {
    /// 26 letters, position `i` holding the image of symbol `i`.
    Letters(String),
    /// 26 indices, position `i` holding the image of symbol `i`.
    Indices(Vec<usize>),
}

impl Wiring {
    /// Resolves the wiring into a validated permutation array.
    ///
    /// # Errors
    /// Returns [`ConfigError::NotAPermutation`] unless the wiring is a
    /// bijection over `0..=25`, or [`ConfigError::InvalidLetter`] for a
    /// non-letter in the letter form.
    pub fn resolve(&self) -> std::result::Result<[usize; ALPHABET_LEN], ConfigError> {
        let indices = match self {
            Wiring::Letters(letters) => alphabet::config_indices(letters)?,
            Wiring::Indices(indices) => indices.clone(),
        };
        if indices.len() != ALPHABET_LEN {
            return Err(ConfigError::NotAPermutation);
        }
        let mut seen = [false; ALPHABET_LEN];
        let mut map = [0usize; ALPHABET_LEN];
        for (slot, &value) in indices.iter().enumerate() {
            if value >= ALPHABET_LEN || seen[value] {
                return Err(ConfigError::NotAPermutation);
            }
            seen[value] = true;
            map[slot] = value;
        }
        Ok(map)
    }
}

impl From<&str> for Wiring {
    fn from(letters: &str) -> Self {
        Wiring::Letters(letters.to_string())
    }
}

impl From<Vec<usize>> for Wiring {
    fn from(indices: Vec<usize>) -> Self {
        Wiring::Indices(indices)
    }
}

/// Notch positions, as letters or indices. `None` means the wheel never
/// signals its neighbour.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum NotchSpec {
    #[default]
    None,
    Letters(String),
    Indices(Vec<usize>),
}

impl NotchSpec {
    /// Resolves the spec into notch distances.
    pub fn resolve(&self) -> std::result::Result<Vec<usize>, ConfigError> {
        match self {
            NotchSpec::None => Ok(Vec::new()),
            NotchSpec::Letters(letters) => alphabet::config_indices(letters),
            NotchSpec::Indices(indices) => {
                if let Some(&bad) = indices.iter().find(|&&n| n >= ALPHABET_LEN) {
                    return Err(ConfigError::NotchOutOfRange(bad));
                }
                Ok(indices.clone())
            }
        }
    }
}

impl From<&str> for NotchSpec {
    fn from(letters: &str) -> Self {
        if letters.is_empty() {
            NotchSpec::None
        } else {
            NotchSpec::Letters(letters.to_string())
        }
    }
}

impl From<Option<&str>> for NotchSpec {
    fn from(letters: Option<&str>) -> Self {
        letters.map_or(NotchSpec::None, NotchSpec::from)
    }
}

/// A permutation wheel with dial, ring and notch bookkeeping.
///
/// `encode` maps a symbol entering from the right-hand contacts to the
/// left-hand contacts; `decode` is its exact inverse.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PermutationUnit {
    base: [usize; ALPHABET_LEN],
    forward: [usize; ALPHABET_LEN],
    inverse: [usize; ALPHABET_LEN],
    ring: usize,
    dial: usize,
    notches: Vec<usize>,
    step_enabled: bool,
}

impl PermutationUnit {
    /// Creates a unit from a validated wiring and notch spec, with dial
    /// and ring at `a`.
    ///
    /// # Errors
    /// Returns `InvalidConfig` if the wiring is not a permutation or a
    /// notch is out of range.
    pub fn new(wiring: &Wiring, notches: &NotchSpec, step_enabled: bool) -> Result<Self> {
        let base = wiring.resolve()?;
        let notches = notches.resolve()?;
        Ok(Self::from_map(base, notches, step_enabled))
    }

    /// Creates a unit with a uniformly random wiring drawn from `rng`.
    pub fn random<R: Rng + ?Sized>(rng: &mut R, notches: Vec<usize>, step_enabled: bool) -> Self {
        let mut base = alphabet::identity_map();
        base.shuffle(rng);
        Self::from_map(base, notches, step_enabled)
    }

    /// Creates the identity unit.
    pub fn identity() -> Self {
        Self::from_map(alphabet::identity_map(), Vec::new(), false)
    }

    /// Builds a unit from an already validated permutation.
    pub(crate) fn from_map(
        base: [usize; ALPHABET_LEN],
        notches: Vec<usize>,
        step_enabled: bool,
    ) -> Self {
        let mut unit = PermutationUnit {
            base,
            forward: base,
            inverse: [0; ALPHABET_LEN],
            ring: 0,
            dial: 0,
            notches,
            step_enabled,
        };
        unit.rebuild();
        unit
    }

    /// Recomputes the effective wiring and its inverse from the base wiring
    /// and the current ring offset.
    fn rebuild(&mut self) {
        for (i, slot) in self.forward.iter_mut().enumerate() {
            *slot = self.base[(i + ALPHABET_LEN - self.ring) % ALPHABET_LEN];
        }
        for (i, &value) in self.forward.iter().enumerate() {
            self.inverse[value] = i;
        }
    }

    /// Maps a symbol through the wiring at the current dial and ring.
    ///
    /// # Errors
    /// Returns `InvalidSymbol` if `value > 25`.
    #[inline]
    pub fn encode(&self, value: usize) -> Result<usize> {
        let value = alphabet::check_symbol(value)?;
        let contact = (value + self.dial) % ALPHABET_LEN;
        Ok((self.forward[contact] + ALPHABET_LEN - self.dial + self.ring) % ALPHABET_LEN)
    }

    /// Exact inverse of [`encode`](Self::encode).
    ///
    /// # Errors
    /// Returns `InvalidSymbol` if `value > 25`.
    #[inline]
    pub fn decode(&self, value: usize) -> Result<usize> {
        let value = alphabet::check_symbol(value)?;
        let contact = (value + self.dial + ALPHABET_LEN - self.ring) % ALPHABET_LEN;
        Ok((self.inverse[contact] + ALPHABET_LEN - self.dial) % ALPHABET_LEN)
    }

    /// Advances the dial one position if stepping is enabled or
    /// `force_override` is set. Every notch distance moves one closer.
    pub fn step(&mut self, force_override: bool) {
        if self.step_enabled || force_override {
            self.dial = (self.dial + 1) % ALPHABET_LEN;
            for notch in self.notches.iter_mut() {
                *notch = (*notch + ALPHABET_LEN - 1) % ALPHABET_LEN;
            }
        }
    }

    /// Replaces the base wiring. The current ring offset is re-applied.
    ///
    /// # Errors
    /// Returns `InvalidConfig` if `wiring` is not a permutation; the unit is
    /// left unchanged.
    pub fn assign_wiring(&mut self, wiring: &Wiring) -> Result<()> {
        self.base = wiring.resolve()?;
        self.rebuild();
        Ok(())
    }

    /// Replaces the notch distances.
    ///
    /// # Errors
    /// Returns `InvalidConfig` if any notch is out of range.
    pub fn assign_notches(&mut self, notches: &NotchSpec) -> Result<()> {
        self.notches = notches.resolve()?;
        Ok(())
    }

    /// Turns the wheel forward until the dial shows `target`.
    ///
    /// The wheel is moved by forced steps, so notch distances travel with
    /// it exactly as they would under keystrokes.
    ///
    /// # Errors
    /// Returns `InvalidSymbol` if `target > 25`.
    pub fn set_dial(&mut self, target: usize) -> Result<()> {
        let target = alphabet::check_symbol(target)?;
        while self.dial != target {
            self.step(true);
        }
        Ok(())
    }

    /// Sets the ring offset, recomputing the effective wiring from the base.
    ///
    /// # Errors
    /// Returns `InvalidSymbol` if `offset > 25`.
    pub fn set_ring(&mut self, offset: usize) -> Result<()> {
        self.ring = alphabet::check_symbol(offset)?;
        self.rebuild();
        Ok(())
    }

    /// Renders the dial letter followed by the notch distances as letters.
    pub fn describe(&self) -> String {
        let dial = alphabet::render(&[self.dial]);
        if self.notches.is_empty() {
            dial
        } else {
            format!("{}:{}", dial, alphabet::render(&self.notches))
        }
    }

    /// Current dial index.
    pub fn dial(&self) -> usize {
        self.dial
    }

    /// Current ring offset.
    pub fn ring(&self) -> usize {
        self.ring
    }

    /// Remaining distance to each notch; zero means at the notch.
    pub fn notches(&self) -> &[usize] {
        &self.notches
    }

    /// Returns `true` when any notch distance is zero.
    pub fn at_notch(&self) -> bool {
        self.notches.contains(&0)
    }

    /// Whether unforced steps move this unit.
    pub fn is_step_enabled(&self) -> bool {
        self.step_enabled
    }

    /// Enables or disables unforced stepping.
    pub fn set_step_enabled(&mut self, enabled: bool) {
        self.step_enabled = enabled;
    }

    /// Effective wiring (base wiring shifted by the ring offset).
    pub fn wiring(&self) -> &[usize; ALPHABET_LEN] {
        &self.forward
    }

    /// Wiring as assigned, before the ring offset.
    pub fn base_wiring(&self) -> &[usize; ALPHABET_LEN] {
        &self.base
    }
}

impl fmt::Display for PermutationUnit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.describe())
    }
}
