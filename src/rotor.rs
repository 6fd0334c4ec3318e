//! Wheel roles built on [`PermutationUnit`]: rotors, the reflector and the
//! entry wheel.
//!
//! The three roles share the same permutation mechanics and differ only in
//! their defaults and in the contract they expose to the machine.

use std::fmt;

use rand::seq::SliceRandom;
use rand::Rng;
use tracing::warn;

use crate::error::{ConfigError, Result};
use crate::permutation::{NotchSpec, PermutationUnit, Wiring};
use crate::utils::alphabet::{self, ALPHABET_LEN};
use crate::wiring;

/// Default notch for randomly wired rotors (`a`).
const DEFAULT_NOTCH: usize = 0;

/// A stepping wheel in the rotor stack.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Rotor {
    unit: PermutationUnit,
}

impl Rotor {
    /// Creates a stepping rotor from a wiring and notch spec.
    ///
    /// # Errors
    /// Returns `InvalidConfig` if the wiring is not a permutation or a notch
    /// is out of range.
    ///
    /// # Examples
    ///
    /// ```
    /// use rotorcrypt::Rotor;
    ///
    /// let rotor = Rotor::from_wiring("EKMFLGDQVZNTOWYHXUSPAIBRCJ".into(), "Q".into()).unwrap();
    /// assert_eq!(rotor.unit().encode(0).unwrap(), 4);
    /// ```
    pub fn from_wiring(wiring: Wiring, notches: NotchSpec) -> Result<Self> {
        Ok(Rotor {
            unit: PermutationUnit::new(&wiring, &notches, true)?,
        })
    }

    /// Creates a rotor with a uniformly random wiring and a notch at `a`.
    pub fn random<R: Rng + ?Sized>(rng: &mut R) -> Self {
        Rotor {
            unit: PermutationUnit::random(rng, vec![DEFAULT_NOTCH], true),
        }
    }

    /// Creates a rotor from the historical table.
    ///
    /// # Errors
    /// Returns `InvalidConfig` for unknown names.
    ///
    /// # Examples
    ///
    /// ```
    /// use rotorcrypt::Rotor;
    ///
    /// let rotor = Rotor::historical("VI").unwrap();
    /// assert_eq!(rotor.unit().notches(), &[25, 12]);
    /// ```
    pub fn historical(name: &str) -> Result<Self> {
        let entry = wiring::historical(name)?;
        Self::from_wiring(entry.wiring(), entry.notches())
    }

    /// Sets whether the rotor responds to keystrokes.
    pub fn with_stepping(mut self, enabled: bool) -> Self {
        self.unit.set_step_enabled(enabled);
        self
    }

    /// Steps the rotor if stepping is enabled.
    pub fn step(&mut self) {
        self.unit.step(false);
    }

    /// Returns `true` when the rotor will carry its left neighbour.
    pub fn at_notch(&self) -> bool {
        self.unit.at_notch()
    }

    /// Underlying permutation unit.
    pub fn unit(&self) -> &PermutationUnit {
        &self.unit
    }

    /// Mutable access to the underlying permutation unit.
    pub fn unit_mut(&mut self) -> &mut PermutationUnit {
        &mut self.unit
    }
}

impl fmt::Display for Rotor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.unit.describe())
    }
}

/// The self-inverse wheel that sends the signal back through the stack.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Reflector {
    unit: PermutationUnit,
}

impl Reflector {
    /// Creates a fixed reflector from an involutive wiring.
    ///
    /// # Errors
    /// Returns `InvalidConfig` if the wiring is not a permutation or is not
    /// its own inverse.
    pub fn from_wiring(wiring: Wiring) -> Result<Self> {
        let map = check_involution(&wiring)?;
        Ok(Reflector {
            unit: PermutationUnit::from_map(map, Vec::new(), false),
        })
    }

    /// Creates a reflector pairing all 26 symbols into 13 random swaps.
    pub fn random<R: Rng + ?Sized>(rng: &mut R) -> Self {
        let mut symbols: Vec<usize> = (0..ALPHABET_LEN).collect();
        symbols.shuffle(rng);
        let mut map = [0usize; ALPHABET_LEN];
        for pair in symbols.chunks_exact(2) {
            map[pair[0]] = pair[1];
            map[pair[1]] = pair[0];
        }
        Reflector {
            unit: PermutationUnit::from_map(map, Vec::new(), false),
        }
    }

    /// Creates a reflector from the historical table.
    ///
    /// # Errors
    /// Returns `InvalidConfig` for unknown names or non-reflector wirings.
    pub fn historical(name: &str) -> Result<Self> {
        Self::from_wiring(wiring::historical(name)?.wiring())
    }

    /// Replaces the wiring, keeping dial and stepping mode.
    ///
    /// # Errors
    /// Returns `InvalidConfig` if the wiring is not involutive.
    pub fn assign_wiring(&mut self, wiring: &Wiring) -> Result<()> {
        check_involution(wiring)?;
        self.unit.assign_wiring(wiring)
    }

    /// Enables or disables the rotating-reflector mode.
    pub fn set_stepping(&mut self, enabled: bool) {
        if enabled {
            warn!("rotating reflector enabled; reflector dial will follow the slowest rotor");
        }
        self.unit.set_step_enabled(enabled);
    }

    /// Steps the reflector if the rotating mode is enabled.
    pub fn step(&mut self) {
        self.unit.step(false);
    }

    /// Underlying permutation unit.
    pub fn unit(&self) -> &PermutationUnit {
        &self.unit
    }

    /// Mutable access to the underlying permutation unit.
    pub fn unit_mut(&mut self) -> &mut PermutationUnit {
        &mut self.unit
    }
}

impl fmt::Display for Reflector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.unit.describe())
    }
}

fn check_involution(wiring: &Wiring) -> Result<[usize; ALPHABET_LEN]> {
    let map = wiring.resolve()?;
    if (0..ALPHABET_LEN).any(|i| map[map[i]] != i) {
        return Err(ConfigError::NotInvolutive.into());
    }
    Ok(map)
}

/// Fixed interface between keyboard letters and the rotor stack.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EntryWheel {
    unit: PermutationUnit,
}

impl EntryWheel {
    /// Straight-through entry wheel.
    pub fn identity() -> Self {
        EntryWheel {
            unit: PermutationUnit::identity(),
        }
    }

    /// Randomly wired entry wheel.
    pub fn random<R: Rng + ?Sized>(rng: &mut R) -> Self {
        EntryWheel {
            unit: PermutationUnit::random(rng, Vec::new(), false),
        }
    }

    /// # Errors
    /// Returns `InvalidConfig` if the wiring is not a permutation.
    pub fn from_wiring(wiring: Wiring) -> Result<Self> {
        Ok(EntryWheel {
            unit: PermutationUnit::new(&wiring, &NotchSpec::None, false)?,
        })
    }

    /// Maps a keyboard letter into the rotor domain.
    ///
    /// # Errors
    /// Returns `InvalidInput` unless `letter` is a single letter a-z.
    pub fn encode_letter(&self, letter: char) -> Result<usize> {
        self.unit.encode(alphabet::letter_index(letter)?)
    }

    /// Maps a rotor-domain symbol back to a lowercase letter.
    ///
    /// # Errors
    /// Returns `InvalidSymbol` if `value > 25`.
    pub fn decode_letter(&self, value: usize) -> Result<char> {
        alphabet::index_letter(self.unit.decode(value)?)
    }

    /// Underlying permutation unit.
    pub fn unit(&self) -> &PermutationUnit {
        &self.unit
    }
}
