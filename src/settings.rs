//! Declarative machine settings.
//!
//! [`MachineSettings`] names historical wheels and carries the daily key
//! sheet values (ring, key, reflector position, plugboard). It is resolved
//! into a [`Machine`] with an identity entry wheel.

use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use tracing::debug;

use crate::error::{ConfigError, Result};
use crate::machine::Machine;
use crate::plugboard::{PlugSpec, Plugboard};
use crate::rotor::{EntryWheel, Reflector, Rotor};

/// Settings for a machine built from historical wheels.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MachineSettings {
    /// Wheel names, slowest (leftmost) first.
    pub rotors: Vec<String>,
    /// Reflector name.
    pub reflector: String,
    pub ring: Option<String>,
    pub key: Option<String>,
    pub reflector_position: Option<String>,
    /// Plug pairs, or a count of random pairs drawn from the seeded
    /// generator.
    pub plugboard: Option<PlugSpec>,
    /// 1-based rotor positions that never step on keystrokes.
    pub static_rotors: Vec<usize>,
    /// Seed for the machine's generator. Only [`PlugSpec::Random`] draws
    /// from it.
    pub seed: u64,
}

impl Default for MachineSettings {
    /// Three-rotor army machine: I, II, III with reflector B.
    fn default() -> Self {
        MachineSettings {
            rotors: vec!["I".into(), "II".into(), "III".into()],
            reflector: "B".into(),
            ring: None,
            key: None,
            reflector_position: None,
            plugboard: None,
            static_rotors: Vec::new(),
            seed: 0,
        }
    }
}

impl MachineSettings {
    /// Four-rotor naval machine as keyed for the Rasch message: BETA, VI,
    /// I, III on thin reflector B, ring ZZDG, key NAQL, with the leftmost
    /// wheel fixed.
    pub fn m4_rasch() -> Self {
        MachineSettings {
            rotors: vec!["BETA".into(), "VI".into(), "I".into(), "III".into()],
            reflector: "BT".into(),
            ring: Some("ZZDG".into()),
            key: Some("NAQL".into()),
            reflector_position: None,
            plugboard: Some(PlugSpec::from("BQ CR DI EJ KW MT OS PX UZ GH")),
            static_rotors: vec![1],
            seed: 0,
        }
    }
}

impl Machine {
    /// Builds a machine from historical wheel settings.
    ///
    /// # Errors
    /// Returns `InvalidConfig` for unknown wheel names, an out-of-range
    /// static position, or any rejected ring, key or plugboard value.
    ///
    /// # Examples
    ///
    /// ```
    /// use rotorcrypt::{Machine, MachineSettings};
    ///
    /// let mut machine = Machine::from_settings(&MachineSettings::default()).unwrap();
    /// assert_eq!(machine.encode_text("aaaaa", Some("aaa")).unwrap(), "bdzgo");
    /// ```
    pub fn from_settings(settings: &MachineSettings) -> Result<Self> {
        let count = settings.rotors.len();
        let mut rotors = settings
            .rotors
            .iter()
            .map(|name| Rotor::historical(name))
            .collect::<Result<Vec<Rotor>>>()?;
        for &position in &settings.static_rotors {
            if position == 0 || position > count {
                return Err(ConfigError::RotorPosition { position, count }.into());
            }
            rotors[position - 1].unit_mut().set_step_enabled(false);
        }
        let reflector = Reflector::historical(&settings.reflector)?;
        let mut rng = ChaCha8Rng::seed_from_u64(settings.seed);
        let plugboard = match &settings.plugboard {
            Some(spec) => Plugboard::from_spec(spec, &mut rng)?,
            None => Plugboard::new(),
        };

        let mut machine =
            Machine::from_parts(rotors, reflector, EntryWheel::identity(), plugboard, rng)?;
        machine.configure(
            settings.key.as_deref(),
            settings.ring.as_deref(),
            settings.reflector_position.as_deref(),
        )?;
        debug!(rotors = ?settings.rotors, reflector = %settings.reflector, "machine built from settings");
        Ok(machine)
    }
}
