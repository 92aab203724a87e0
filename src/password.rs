use std::collections::BTreeSet;

use log::debug;
use rand::Rng;

use crate::errors::{GeneratorError, Result};
use crate::generators::{CharacterClass, build_pool};

/// A validated generation request: a non-negative length and at least one
/// enabled character class.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PasswordRequest {
    length: usize,
    classes: BTreeSet<CharacterClass>,
}

impl PasswordRequest {
    pub fn new(length: i64, classes: BTreeSet<CharacterClass>) -> Result<Self> {
        if length < 0 {
            return Err(GeneratorError::InvalidRequest(format!(
                "password length cannot be negative: {}",
                length
            )));
        }

        if classes.is_empty() {
            return Err(GeneratorError::InvalidRequest(String::from(
                "no character class selected",
            )));
        }

        let length = usize::try_from(length)
            .map_err(|_| GeneratorError::InvalidRequest(format!("password length too large: {}", length)))?;

        Ok(Self { length, classes })
    }

    pub fn length(&self) -> usize {
        self.length
    }

    pub fn classes(&self) -> &BTreeSet<CharacterClass> {
        &self.classes
    }
}

/// Generate a password using the thread-local RNG.
pub fn generate(length: i64, classes: BTreeSet<CharacterClass>) -> Result<String> {
    let request = PasswordRequest::new(length, classes)?;
    generate_with_rng(&mut rand::rng(), &request)
}

/// Draw `request.length()` characters uniformly and independently from the
/// pool of the enabled classes.
pub fn generate_with_rng<R: Rng>(rng: &mut R, request: &PasswordRequest) -> Result<String> {
    let pool = build_pool(request.classes());

    if pool.is_empty() {
        return Err(GeneratorError::InvalidRequest(String::from(
            "character pool is empty",
        )));
    }

    let names: Vec<String> = request.classes().iter().map(ToString::to_string).collect();
    debug!(
        "generating {} characters from {} ({} in pool)",
        request.length(),
        names.join("+"),
        pool.len()
    );

    let password: String = (0..request.length())
        .map(|_| pool[rng.random_range(0..pool.len())])
        .collect();

    Ok(password)
}

#[cfg(test)]
mod tests {
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    use super::*;

    fn classes(list: &[CharacterClass]) -> BTreeSet<CharacterClass> {
        list.iter().copied().collect()
    }

    #[test]
    fn output_has_requested_length() {
        for length in [0, 1, 4, 8, 16, 100] {
            let password = generate(length, classes(&CharacterClass::ALL)).unwrap();
            assert_eq!(password.chars().count(), length as usize);
        }
    }

    #[test]
    fn lowercase_and_digits_only() {
        let password = generate(8, classes(&[CharacterClass::Lowercase, CharacterClass::Digit])).unwrap();

        assert_eq!(password.len(), 8);
        assert!(
            password
                .chars()
                .all(|c| "abcdefghijklmnopqrstuvwxyz0123456789".contains(c))
        );
    }

    #[test]
    fn every_char_comes_from_enabled_classes() {
        let mut rng = StdRng::seed_from_u64(7);

        for class in CharacterClass::ALL {
            let request = PasswordRequest::new(500, classes(&[class])).unwrap();
            let password = generate_with_rng(&mut rng, &request).unwrap();

            assert!(password.chars().all(|c| class.alphabet().contains(c)));
        }
    }

    #[test]
    fn request_keeps_length_and_classes() {
        let request = PasswordRequest::new(12, classes(&[CharacterClass::Symbol, CharacterClass::Uppercase])).unwrap();

        assert_eq!(request.length(), 12);
        assert_eq!(
            request.classes().iter().copied().collect::<Vec<_>>(),
            vec![CharacterClass::Uppercase, CharacterClass::Symbol]
        );
    }

    #[test]
    fn zero_length_is_empty() {
        assert_eq!(generate(0, classes(&[CharacterClass::Lowercase])).unwrap(), "");
    }

    #[test]
    fn no_classes_is_invalid() {
        for length in [0, 8, 16] {
            let result = generate(length, BTreeSet::new());
            assert!(matches!(result, Err(GeneratorError::InvalidRequest(_))));
        }
    }

    #[test]
    fn negative_length_is_invalid() {
        let result = generate(-1, classes(&[CharacterClass::Lowercase]));
        assert!(matches!(result, Err(GeneratorError::InvalidRequest(_))));
    }

    #[test]
    fn same_seed_same_password() {
        let request = PasswordRequest::new(16, classes(&CharacterClass::ALL)).unwrap();

        let first = generate_with_rng(&mut StdRng::seed_from_u64(42), &request).unwrap();
        let second = generate_with_rng(&mut StdRng::seed_from_u64(42), &request).unwrap();

        assert_eq!(first, second);
    }

    #[test]
    fn single_class_draws_are_uniform() {
        let alphabet: Vec<char> = CharacterClass::Lowercase.alphabet().chars().collect();
        let request = PasswordRequest::new(1000, classes(&[CharacterClass::Lowercase])).unwrap();
        let mut rng = StdRng::seed_from_u64(2024);
        let mut counts = [0u32; 26];
        let rounds = 40;

        for _ in 0..rounds {
            let password = generate_with_rng(&mut rng, &request).unwrap();
            for c in password.chars() {
                let index = alphabet.iter().position(|&a| a == c).unwrap();
                counts[index] += 1;
            }
        }

        let expected = (rounds * 1000) as f64 / 26.0;
        let chi_square: f64 = counts
            .iter()
            .map(|&observed| {
                let diff = observed as f64 - expected;
                diff * diff / expected
            })
            .sum();

        // 25 degrees of freedom; 70 lies past the p = 1e-6 critical value.
        assert!(chi_square < 70.0, "chi-square too large: {}", chi_square);
        assert!(counts.iter().all(|&n| n > 0));
    }
}
