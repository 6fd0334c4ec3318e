//! Machine: rotor stack controller.
//!
//! Owns the rotors, reflector, entry wheel and plugboard, computes the
//! per-keystroke stepping vector (including the double-stepping anomaly)
//! and drives each letter through the wiring.
//!
//! Rotor position 0 is the slowest (leftmost) wheel and position N-1 the
//! fastest (rightmost). Configuration strings follow the same order.

use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use tracing::{debug, trace};

use crate::error::{ConfigError, Result};
use crate::permutation::{NotchSpec, Wiring};
use crate::plugboard::{PlugSpec, Plugboard};
use crate::rotor::{EntryWheel, Reflector, Rotor};
use crate::utils::alphabet;

/// Rotor cipher machine.
///
/// The machine records the last key, ring and reflector position it was
/// configured with. [`encode_text`](Self::encode_text) re-applies the key
/// before every message, so encoding the ciphertext again with the same
/// key restores the plaintext.
///
/// A machine is plain owned data and is not meant to be shared between
/// threads while encoding; use one instance per thread.
#[derive(Debug, Clone)]
pub struct Machine {
    rotors: Vec<Rotor>,
    reflector: Reflector,
    entry: EntryWheel,
    plugboard: Plugboard,
    key: String,
    ring: String,
    reflector_position: char,
    rng: ChaCha8Rng,
}

impl Machine {
    /// Creates a randomly wired machine from a seed.
    ///
    /// # Errors
    /// Returns `InvalidConfig` if `rotor_count` is zero.
    ///
    /// # Examples
    ///
    /// ```
    /// use rotorcrypt::Machine;
    ///
    /// let mut machine = Machine::seeded(3, 42).unwrap();
    /// let cipher = machine.encode_text("attack at dawn", Some("abc")).unwrap();
    /// assert_eq!(machine.encode_text(&cipher, Some("abc")).unwrap(), "attackatdawn");
    /// ```
    pub fn seeded(rotor_count: usize, seed: u64) -> Result<Self> {
        Self::with_rng(rotor_count, ChaCha8Rng::seed_from_u64(seed))
    }

    /// Creates a randomly wired machine drawing from `rng`.
    ///
    /// Rotors, entry wheel and reflector are drawn in that order; the
    /// plugboard starts empty.
    ///
    /// # Errors
    /// Returns `InvalidConfig` if `rotor_count` is zero.
    pub fn with_rng(rotor_count: usize, mut rng: ChaCha8Rng) -> Result<Self> {
        if rotor_count == 0 {
            return Err(ConfigError::NoRotors.into());
        }
        let rotors = (0..rotor_count).map(|_| Rotor::random(&mut rng)).collect();
        let entry = EntryWheel::random(&mut rng);
        let reflector = Reflector::random(&mut rng);
        Self::from_parts(rotors, reflector, entry, Plugboard::new(), rng)
    }

    /// Assembles a machine from prepared components. The recorded key is
    /// read from the rotors' current dials.
    ///
    /// # Errors
    /// Returns `InvalidConfig` if `rotors` is empty.
    pub fn from_parts(
        rotors: Vec<Rotor>,
        reflector: Reflector,
        entry: EntryWheel,
        plugboard: Plugboard,
        rng: ChaCha8Rng,
    ) -> Result<Self> {
        if rotors.is_empty() {
            return Err(ConfigError::NoRotors.into());
        }
        let key = rotors
            .iter()
            .map(|r| alphabet::index_letter(r.unit().dial()))
            .collect::<Result<String>>()?;
        let ring = rotors
            .iter()
            .map(|r| alphabet::index_letter(r.unit().ring()))
            .collect::<Result<String>>()?;
        let reflector_position = alphabet::index_letter(reflector.unit().dial())?;
        debug!(rotors = rotors.len(), "machine assembled");
        Ok(Machine {
            rotors,
            reflector,
            entry,
            plugboard,
            key,
            ring,
            reflector_position,
            rng,
        })
    }

    /// Number of rotors in the stack.
    pub fn rotor_count(&self) -> usize {
        self.rotors.len()
    }

    /// Computes which units step on the next keystroke.
    ///
    /// Slot 0 is the fastest rotor, slot N-1 the slowest and slot N the
    /// reflector. A rotor steps when its faster neighbour sits at a notch,
    /// and that neighbour steps along with it. The second rule is what
    /// makes a middle rotor resting on its own notch advance twice in a row.
    fn stepping_vector(&self) -> Vec<bool> {
        let n = self.rotors.len();
        let mut step = vec![false; n + 1];
        step[0] = true;
        for slot in 1..=n {
            if self.rotors[n - slot].at_notch() {
                step[slot] = true;
                step[slot - 1] = true;
            }
        }
        step
    }

    /// Advances the wheels for one keystroke.
    fn advance_rotors(&mut self) {
        let step = self.stepping_vector();
        let n = self.rotors.len();
        for (slot, &stepping) in step[..n].iter().enumerate() {
            if stepping {
                self.rotors[n - 1 - slot].step();
            }
        }
        // Inert unless the rotating-reflector mode was switched on.
        if step[n] {
            self.reflector.step();
        }
        trace!(?step, positions = %self.positions(), "rotors advanced");
    }

    /// Sends one symbol through entry, rotors, reflector and back.
    fn traverse(&self, letter: char) -> Result<char> {
        let mut value = self.entry.encode_letter(letter)?;
        for rotor in self.rotors.iter().rev() {
            value = rotor.unit().encode(value)?;
        }
        value = self.reflector.unit().encode(value)?;
        for rotor in self.rotors.iter() {
            value = rotor.unit().decode(value)?;
        }
        self.entry.decode_letter(value)
    }

    /// Steps the machine and encodes one letter, continuing from the
    /// current wheel positions.
    ///
    /// # Errors
    /// Returns `InvalidInput` unless `letter` is a letter a-z. Nothing moves
    /// on error.
    pub fn encode_letter(&mut self, letter: char) -> Result<char> {
        alphabet::letter_index(letter)?;
        self.advance_rotors();
        let plugged = self.plugboard.encode_letter(letter)?;
        let out = self.traverse(plugged)?;
        self.plugboard.decode_letter(out)
    }

    /// Encodes (or decodes) a message.
    ///
    /// The dials are first set to `key`, or to the recorded key when `key`
    /// is `None`. Ring and reflector position keep their configured
    /// values. The text is lowercased and every character outside a-z is
    /// dropped.
    ///
    /// # Errors
    /// Returns `InvalidConfig` if `key` does not have one letter per rotor;
    /// no letter is encoded in that case.
    pub fn encode_text(&mut self, text: &str, key: Option<&str>) -> Result<String> {
        let key = match key {
            Some(key) => key.to_string(),
            None => self.key.clone(),
        };
        self.configure(Some(key.as_str()), None, None)?;

        let mut out = String::with_capacity(text.len());
        for letter in text
            .chars()
            .map(|c| c.to_ascii_lowercase())
            .filter(|c| c.is_ascii_lowercase())
        {
            out.push(self.encode_letter(letter)?);
        }
        debug!(letters = out.len(), key = %key, "message encoded");
        Ok(out)
    }

    /// Applies any combination of key, ring and reflector position.
    ///
    /// Every supplied part is validated before any is applied.
    ///
    /// # Errors
    /// Returns `InvalidConfig` if the key or ring does not have exactly one
    /// letter per rotor, or the reflector position is not one letter.
    pub fn configure(
        &mut self,
        key: Option<&str>,
        ring: Option<&str>,
        reflector_position: Option<&str>,
    ) -> Result<()> {
        let n = self.rotors.len();
        let dials = key
            .map(|key| -> std::result::Result<Vec<usize>, ConfigError> {
                let dials = alphabet::config_indices(key)?;
                if dials.len() != n {
                    return Err(ConfigError::KeyLength {
                        expected: n,
                        actual: dials.len(),
                    });
                }
                Ok(dials)
            })
            .transpose()?;
        let rings = ring
            .map(|ring| -> std::result::Result<Vec<usize>, ConfigError> {
                let rings = alphabet::config_indices(ring)?;
                if rings.len() != n {
                    return Err(ConfigError::RingLength {
                        expected: n,
                        actual: rings.len(),
                    });
                }
                Ok(rings)
            })
            .transpose()?;
        let reflector_dial = reflector_position
            .map(|pos| match alphabet::config_indices(pos) {
                Ok(dial) if dial.len() == 1 => Ok(dial[0]),
                _ => Err(ConfigError::ReflectorPosition(pos.to_string())),
            })
            .transpose()?;

        if let Some(dials) = dials {
            for (rotor, &dial) in self.rotors.iter_mut().zip(dials.iter()) {
                rotor.unit_mut().set_dial(dial)?;
            }
            self.key = alphabet::render(&dials);
        }
        if let Some(rings) = rings {
            for (rotor, &offset) in self.rotors.iter_mut().zip(rings.iter()) {
                rotor.unit_mut().set_ring(offset)?;
            }
            self.ring = alphabet::render(&rings);
        }
        if let Some(dial) = reflector_dial {
            self.reflector.unit_mut().set_dial(dial)?;
            self.reflector_position = alphabet::index_letter(dial)?;
        }
        debug!(key = %self.key, ring = %self.ring, reflector = %self.reflector_position, "machine configured");
        Ok(())
    }

    /// Re-applies the recorded key and reflector position.
    pub fn reset_to_last_configuration(&mut self) -> Result<()> {
        let key = self.key.clone();
        let reflector_position = self.reflector_position.to_string();
        self.configure(Some(key.as_str()), None, Some(reflector_position.as_str()))
    }

    /// Replaces the wiring, notches and stepping flag of the rotor at
    /// `position` (1-based, slowest first). Dial and ring are kept.
    ///
    /// Notch letters are measured from the current dial, so the swapped
    /// rotor signals at the same letters as a fresh wheel of that wiring.
    ///
    /// # Errors
    /// Returns `InvalidConfig` for a position outside `1..=N` or a bad
    /// wiring or notch; the rotor is unchanged on error.
    pub fn hot_swap_rotor(
        &mut self,
        position: usize,
        wiring: &Wiring,
        notches: &NotchSpec,
        step_enabled: bool,
    ) -> Result<()> {
        let count = self.rotors.len();
        if position == 0 || position > count {
            return Err(ConfigError::RotorPosition { position, count }.into());
        }
        let wiring_map = wiring.resolve()?;
        let unit = self.rotors[position - 1].unit_mut();
        let dial = unit.dial();
        let notch_list: Vec<usize> = notches
            .resolve()?
            .into_iter()
            .map(|notch| (notch + alphabet::ALPHABET_LEN - dial) % alphabet::ALPHABET_LEN)
            .collect();
        unit.assign_wiring(&Wiring::Indices(wiring_map.to_vec()))?;
        unit.assign_notches(&NotchSpec::Indices(notch_list))?;
        unit.set_step_enabled(step_enabled);
        debug!(position, step_enabled, "rotor swapped");
        Ok(())
    }

    /// Rewires the plugboard. Random plugs are drawn from the machine's
    /// own generator.
    pub fn set_plugs(&mut self, spec: &PlugSpec) -> Result<()> {
        self.plugboard.configure(spec, &mut self.rng)
    }

    /// Installs a new reflector and records its dial as the reflector
    /// position.
    pub fn set_reflector(&mut self, reflector: Reflector) -> Result<()> {
        self.reflector_position = alphabet::index_letter(reflector.unit().dial())?;
        self.reflector = reflector;
        Ok(())
    }

    /// Installs a new entry wheel.
    pub fn set_entry(&mut self, entry: EntryWheel) {
        self.entry = entry;
    }

    /// Switches the rotating-reflector mode.
    pub fn set_reflector_stepping(&mut self, enabled: bool) {
        self.reflector.set_stepping(enabled);
    }

    /// Current dial letters, slowest rotor first.
    pub fn positions(&self) -> String {
        self.rotors
            .iter()
            .map(|r| alphabet::index_letter(r.unit().dial()).unwrap_or('?'))
            .collect()
    }

    /// Last configured key, slowest rotor first.
    pub fn key(&self) -> &str {
        &self.key
    }

    /// Last configured ring settings, slowest rotor first.
    pub fn ring(&self) -> &str {
        &self.ring
    }

    /// Last configured reflector dial letter.
    pub fn reflector_position(&self) -> char {
        self.reflector_position
    }

    /// Rotor at `position` (1-based, slowest first).
    pub fn rotor(&self, position: usize) -> Option<&Rotor> {
        position.checked_sub(1).and_then(|i| self.rotors.get(i))
    }

    /// The installed reflector.
    pub fn reflector(&self) -> &Reflector {
        &self.reflector
    }

    /// The installed plugboard.
    pub fn plugboard(&self) -> &Plugboard {
        &self.plugboard
    }

    /// Dial and notch state of every wheel, slowest first, then the
    /// reflector.
    pub fn describe(&self) -> String {
        let mut parts: Vec<String> = self.rotors.iter().map(|r| r.to_string()).collect();
        parts.push(format!("ref {}", self.reflector));
        parts.join(" ")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::RotorCryptError;

    fn enigma_i() -> Machine {
        let rotors = ["I", "II", "III"]
            .iter()
            .map(|name| Rotor::historical(name).unwrap())
            .collect();
        Machine::from_parts(
            rotors,
            Reflector::historical("B").unwrap(),
            EntryWheel::identity(),
            Plugboard::new(),
            ChaCha8Rng::seed_from_u64(0),
        )
        .unwrap()
    }

    #[test]
    fn test_zero_rotors_rejected() {
        assert_eq!(
            Machine::seeded(0, 1).err(),
            Some(RotorCryptError::InvalidConfig(ConfigError::NoRotors))
        );
    }

    #[test]
    fn test_initial_record() {
        let machine = Machine::seeded(4, 1).unwrap();
        assert_eq!(machine.rotor_count(), 4);
        assert_eq!(machine.key(), "aaaa");
        assert_eq!(machine.ring(), "aaaa");
        assert_eq!(machine.reflector_position(), 'a');
    }

    #[test]
    fn test_stepping_vector_fastest_only() {
        let machine = enigma_i();
        assert_eq!(machine.stepping_vector(), vec![true, false, false, false]);
    }

    #[test]
    fn test_stepping_vector_double_step() {
        let mut machine = enigma_i();
        // Middle rotor II on its notch E, fastest III clear of its notch.
        machine.configure(Some("aep"), None, None).unwrap();
        assert_eq!(machine.stepping_vector(), vec![true, true, true, false]);
    }

    #[test]
    fn test_stepping_vector_reflector_slot() {
        let mut machine = enigma_i();
        machine.configure(Some("qaa"), None, None).unwrap();
        assert_eq!(machine.stepping_vector(), vec![true, false, true, true]);
        machine.encode_letter('a').unwrap();
        assert_eq!(machine.reflector().unit().dial(), 0);
    }

    #[test]
    fn test_classic_double_step_sequence() {
        let mut machine = enigma_i();
        machine.configure(Some("adu"), None, None).unwrap();
        let mut seen = Vec::new();
        for _ in 0..3 {
            machine.encode_letter('a').unwrap();
            seen.push(machine.positions());
        }
        assert_eq!(seen, vec!["adv", "aew", "bfx"]);
    }

    #[test]
    fn test_enigma_i_reference_vector() {
        let mut machine = enigma_i();
        assert_eq!(machine.encode_text("AAAAA", Some("aaa")).unwrap(), "bdzgo");
    }

    #[test]
    fn test_encode_text_reapplies_recorded_key() {
        let mut machine = enigma_i();
        machine.configure(Some("mcp"), None, None).unwrap();
        let first = machine.encode_text("enigma", None).unwrap();
        let second = machine.encode_text("enigma", None).unwrap();
        assert_eq!(first, second);
        assert_eq!(machine.encode_text(&first, None).unwrap(), "enigma");
    }

    #[test]
    fn test_encode_text_records_explicit_key() {
        let mut machine = enigma_i();
        machine.encode_text("hello", Some("XYZ")).unwrap();
        assert_eq!(machine.key(), "xyz");
    }

    #[test]
    fn test_bad_key_rejected_before_encoding() {
        let mut machine = enigma_i();
        machine.configure(Some("abc"), None, None).unwrap();
        assert_eq!(
            machine.encode_text("hello", Some("ab")),
            Err(RotorCryptError::InvalidConfig(ConfigError::KeyLength {
                expected: 3,
                actual: 2
            }))
        );
        assert_eq!(machine.positions(), "abc");
        assert_eq!(machine.key(), "abc");
    }

    #[test]
    fn test_configure_is_all_or_nothing() {
        let mut machine = enigma_i();
        let result = machine.configure(Some("bcd"), Some("ab"), None);
        assert_eq!(
            result,
            Err(RotorCryptError::InvalidConfig(ConfigError::RingLength {
                expected: 3,
                actual: 2
            }))
        );
        assert_eq!(machine.positions(), "aaa");
        assert_eq!(
            machine.configure(None, None, Some("ab")),
            Err(RotorCryptError::InvalidConfig(ConfigError::ReflectorPosition(
                "ab".to_string()
            )))
        );
    }

    #[test]
    fn test_ring_is_recorded() {
        let mut machine = enigma_i();
        machine.configure(None, Some("bbb"), None).unwrap();
        assert_eq!(machine.ring(), "bbb");
        assert_eq!(machine.rotor(1).unwrap().unit().ring(), 1);
        // Ring BBB, key AAA: AAAAA -> EWTYX.
        assert_eq!(machine.encode_text("aaaaa", Some("aaa")).unwrap(), "ewtyx");
    }

    #[test]
    fn test_reset_to_last_configuration() {
        let mut machine = enigma_i();
        machine.configure(Some("qev"), None, Some("c")).unwrap();
        machine.encode_letter('a').unwrap();
        machine.encode_letter('b').unwrap();
        machine.reset_to_last_configuration().unwrap();
        assert_eq!(machine.positions(), "qev");
        assert_eq!(machine.reflector().unit().dial(), 2);
    }

    #[test]
    fn test_hot_swap_keeps_dial_and_ring() {
        let mut machine = enigma_i();
        machine.configure(Some("abc"), Some("xyz"), None).unwrap();
        let iv = crate::wiring::historical("IV").unwrap();
        machine
            .hot_swap_rotor(2, &iv.wiring(), &iv.notches(), false)
            .unwrap();
        let rotor = machine.rotor(2).unwrap();
        assert_eq!(rotor.unit().dial(), 1);
        assert_eq!(rotor.unit().ring(), 24);
        assert!(!rotor.unit().is_step_enabled());
        assert_eq!(rotor.unit().notches(), &[8]);
    }

    #[test]
    fn test_hot_swap_notch_matches_fresh_wheel() {
        let mut machine = enigma_i();
        machine.configure(Some("abc"), None, None).unwrap();
        let iv = crate::wiring::historical("IV").unwrap();
        machine
            .hot_swap_rotor(2, &iv.wiring(), &iv.notches(), true)
            .unwrap();
        machine.configure(Some("ajc"), None, None).unwrap();

        let mut fresh = Rotor::historical("IV").unwrap();
        fresh.unit_mut().set_dial(9).unwrap();

        let swapped = machine.rotor(2).unwrap();
        assert_eq!(swapped.unit().dial(), fresh.unit().dial());
        assert_eq!(swapped.unit().notches(), fresh.unit().notches());
        assert!(swapped.at_notch());
        assert_eq!(swapped.unit().wiring(), fresh.unit().wiring());
    }

    #[test]
    fn test_hot_swap_rejects_bad_position() {
        let mut machine = enigma_i();
        let wiring = Wiring::Indices((0..26).collect());
        for position in [0, 4] {
            assert_eq!(
                machine.hot_swap_rotor(position, &wiring, &NotchSpec::None, true),
                Err(RotorCryptError::InvalidConfig(ConfigError::RotorPosition {
                    position,
                    count: 3
                }))
            );
        }
    }

    #[test]
    fn test_encode_letter_rejects_non_letters() {
        let mut machine = enigma_i();
        assert_eq!(
            machine.encode_letter('5'),
            Err(RotorCryptError::InvalidInput("5".to_string()))
        );
        assert_eq!(machine.positions(), "aaa");
    }

    #[test]
    fn test_describe() {
        let machine = enigma_i();
        assert_eq!(machine.describe(), "a:q a:e a:v ref a");
    }
}
