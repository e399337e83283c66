//! Cryptographically secure one-time code and identifier generation.

use rand::{rngs::OsRng, Rng, RngCore};
use rc_shared::config::verification::{DEFAULT_CODE_LENGTH, MAX_CODE_LENGTH, MIN_CODE_LENGTH};

use crate::errors::{DomainError, DomainResult};

/// Symbols a generated code is drawn from
pub const CODE_ALPHABET: &[u8; 72] =
    b"ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz0123456789!@#$%^&*()";

/// Bytes at or above this value are redrawn; 216 is the largest multiple of 72 below 256
const ACCEPT_BELOW: u8 = (256 / CODE_ALPHABET.len() * CODE_ALPHABET.len()) as u8;

/// Inclusive bounds of a generated identifier
pub const IDENTIFIER_MIN: u32 = 100_000;
pub const IDENTIFIER_MAX: u32 = 999_999;

/// Generator for rotating codes and record identifiers
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CodeGenerator {
    length: usize,
}

impl CodeGenerator {
    /// Create a generator for codes of `length` symbols
    ///
    /// # Errors
    /// `DomainError::Validation` if `length` gives less than 64 bits of
    /// entropy or exceeds the supported maximum
    pub fn new(length: usize) -> DomainResult<Self> {
        if length < MIN_CODE_LENGTH {
            return Err(DomainError::validation(format!(
                "code length {} is below the minimum of {}",
                length, MIN_CODE_LENGTH
            )));
        }
        if length > MAX_CODE_LENGTH {
            return Err(DomainError::validation(format!(
                "code length {} exceeds the maximum of {}",
                length, MAX_CODE_LENGTH
            )));
        }
        Ok(Self { length })
    }

    pub fn length(&self) -> usize {
        self.length
    }

    /// Generate a fresh code from the OS CSPRNG
    pub fn generate(&self) -> String {
        self.generate_with(&mut OsRng)
    }

    /// Generate a code from `rng` with rejection sampling, so every symbol of
    /// [`CODE_ALPHABET`] is equally likely
    pub fn generate_with<R: RngCore + ?Sized>(&self, rng: &mut R) -> String {
        let mut code = String::with_capacity(self.length);
        let mut buf = [0u8; 32];

        while code.len() < self.length {
            rng.fill_bytes(&mut buf);
            for byte in buf.iter().copied().filter(|b| *b < ACCEPT_BELOW) {
                code.push(CODE_ALPHABET[byte as usize % CODE_ALPHABET.len()] as char);
                if code.len() == self.length {
                    break;
                }
            }
        }

        code
    }

    /// Draw a uniform six-digit identifier
    pub fn generate_identifier(&self) -> String {
        Self::generate_identifier_with(&mut OsRng)
    }

    pub fn generate_identifier_with<R: Rng + ?Sized>(rng: &mut R) -> String {
        rng.gen_range(IDENTIFIER_MIN..=IDENTIFIER_MAX).to_string()
    }
}

impl Default for CodeGenerator {
    fn default() -> Self {
        Self {
            length: DEFAULT_CODE_LENGTH,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rc_shared::validation::is_valid_identifier;
    use std::collections::{HashMap, HashSet};

    /// Replays a fixed byte pattern forever
    struct ReplayRng {
        bytes: Vec<u8>,
        pos: usize,
    }

    impl RngCore for ReplayRng {
        fn next_u32(&mut self) -> u32 {
            let mut buf = [0u8; 4];
            self.fill_bytes(&mut buf);
            u32::from_le_bytes(buf)
        }

        fn next_u64(&mut self) -> u64 {
            let mut buf = [0u8; 8];
            self.fill_bytes(&mut buf);
            u64::from_le_bytes(buf)
        }

        fn fill_bytes(&mut self, dest: &mut [u8]) {
            for slot in dest.iter_mut() {
                *slot = self.bytes[self.pos % self.bytes.len()];
                self.pos += 1;
            }
        }

        fn try_fill_bytes(&mut self, dest: &mut [u8]) -> Result<(), rand::Error> {
            self.fill_bytes(dest);
            Ok(())
        }
    }

    #[test]
    fn test_alphabet_has_72_distinct_symbols() {
        let distinct: HashSet<u8> = CODE_ALPHABET.iter().copied().collect();
        assert_eq!(distinct.len(), 72);
        assert_eq!(ACCEPT_BELOW, 216);
    }

    #[test]
    fn test_generated_code_has_configured_length_and_alphabet() {
        let generator = CodeGenerator::default();
        for _ in 0..100 {
            let code = generator.generate();
            assert_eq!(code.len(), DEFAULT_CODE_LENGTH);
            assert!(code.bytes().all(|b| CODE_ALPHABET.contains(&b)));
        }
    }

    #[test]
    fn test_bytes_above_bound_are_rejected() {
        let generator = CodeGenerator::new(12).unwrap();
        let mut rng = ReplayRng {
            bytes: vec![216, 255, 0, 71, 72, 215, 240],
            pos: 0,
        };

        // 0 and 72 map to 'A', 71 and 215 map to ')'
        assert_eq!(generator.generate_with(&mut rng), "A)A)A)A)A)A)");
    }

    #[test]
    fn test_short_lengths_are_rejected() {
        assert!(CodeGenerator::new(MIN_CODE_LENGTH).is_ok());
        assert!(matches!(
            CodeGenerator::new(MIN_CODE_LENGTH - 1),
            Err(DomainError::Validation { .. })
        ));
        assert!(CodeGenerator::new(MAX_CODE_LENGTH + 1).is_err());
    }

    #[test]
    fn test_symbol_distribution_is_flat() {
        let generator = CodeGenerator::default();
        let mut counts: HashMap<char, usize> = HashMap::new();
        let samples = 20_000;
        for _ in 0..samples {
            for c in generator.generate().chars() {
                *counts.entry(c).or_default() += 1;
            }
        }

        let expected = samples * DEFAULT_CODE_LENGTH / CODE_ALPHABET.len();
        assert_eq!(counts.len(), CODE_ALPHABET.len());
        for (symbol, count) in counts {
            let deviation = (count as f64 - expected as f64).abs() / expected as f64;
            assert!(deviation < 0.15, "symbol {symbol:?} drawn {count} times");
        }
    }

    #[test]
    fn test_identifiers_are_six_digits_in_range() {
        let generator = CodeGenerator::default();
        for _ in 0..1_000 {
            let identifier = generator.generate_identifier();
            assert!(is_valid_identifier(&identifier));
            let value: u32 = identifier.parse().unwrap();
            assert!((IDENTIFIER_MIN..=IDENTIFIER_MAX).contains(&value));
        }
    }
}
