use std::collections::BTreeSet;
use std::fmt;

use serde::{Deserialize, Serialize};

const LOWERCASE: &str = "abcdefghijklmnopqrstuvwxyz";
const UPPERCASE: &str = "ABCDEFGHIJKLMNOPQRSTUVWXYZ";
const DIGITS: &str = "0123456789";
const SYMBOLS: &str = "@!#$%&()_-=";

/// A category of characters a password may be drawn from.
///
/// Variants are declared in pool order, so iterating a `BTreeSet` of classes
/// visits them in the order their alphabets are concatenated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CharacterClass {
    Lowercase,
    Uppercase,
    Digit,
    Symbol,
}

impl CharacterClass {
    pub const ALL: [CharacterClass; 4] = [
        CharacterClass::Lowercase,
        CharacterClass::Uppercase,
        CharacterClass::Digit,
        CharacterClass::Symbol,
    ];

    pub fn alphabet(self) -> &'static str {
        match self {
            CharacterClass::Lowercase => LOWERCASE,
            CharacterClass::Uppercase => UPPERCASE,
            CharacterClass::Digit => DIGITS,
            CharacterClass::Symbol => SYMBOLS,
        }
    }
}

impl fmt::Display for CharacterClass {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let name = match self {
            CharacterClass::Lowercase => "lowercase",
            CharacterClass::Uppercase => "uppercase",
            CharacterClass::Digit => "digit",
            CharacterClass::Symbol => "symbol",
        };
        write!(f, "{}", name)
    }
}

/// Concatenate the alphabets of the enabled classes in pool order.
pub fn build_pool(classes: &BTreeSet<CharacterClass>) -> Vec<char> {
    let mut pool: Vec<char> = Vec::new();

    for class in CharacterClass::ALL {
        if classes.contains(&class) {
            pool.extend(class.alphabet().chars());
        }
    }

    pool
}
