//! Rotor cipher machine simulator.
//!
//! rotorcrypt models an Enigma-style machine: a reciprocal letter
//! substitution built from stepping permutation wheels, a reflector and a
//! plugboard. Rotor stepping follows the historical mechanism, including
//! the double-stepping of a middle rotor that rests on its own notch.
//!
//! # Architecture
//!
//! ```text
//! PermutationUnit  (validated 26-symbol bijection + dial, ring, notches)
//!     ↕ composed into
//! Rotor / Reflector / EntryWheel   (role defaults and external contract)
//!     ↕ owned by
//! Machine  (stepping vector + plugboard → entry → rotors → reflector → back)
//! ```
//!
//! Each machine owns its random generator, so randomly wired machines are
//! reproducible from a seed and independent of one another.
//!
//! # Examples
//!
//! Decrypt with the historical three-rotor setup:
//!
//! ```
//! use rotorcrypt::{Machine, MachineSettings};
//!
//! let mut machine = Machine::from_settings(&MachineSettings::default()).unwrap();
//! let cipher = machine.encode_text("Hello, World!", Some("mcp")).unwrap();
//! assert_eq!(machine.encode_text(&cipher, Some("mcp")).unwrap(), "helloworld");
//! ```
//!
//! Build a randomly wired machine with plugs:
//!
//! ```
//! use rotorcrypt::{Machine, PlugSpec};
//!
//! let mut machine = Machine::seeded(5, 7).unwrap();
//! machine.set_plugs(&PlugSpec::Random(10)).unwrap();
//! machine.configure(None, Some("abcde"), Some("q")).unwrap();
//!
//! let cipher = machine.encode_text("rotors", Some("zzzzz")).unwrap();
//! assert_eq!(machine.encode_text(&cipher, Some("zzzzz")).unwrap(), "rotors");
//! ```

#![deny(clippy::all)]

pub mod error;
pub mod machine;
pub mod permutation;
pub mod plugboard;
pub mod rotor;
pub mod settings;
pub mod utils;
pub mod wiring;

pub use error::{ConfigError, Result, RotorCryptError};
pub use machine::Machine;
pub use permutation::{NotchSpec, PermutationUnit, Wiring};
pub use plugboard::{PlugSpec, Plugboard};
pub use rotor::{EntryWheel, Reflector, Rotor};
pub use settings::MachineSettings;
