//! Random password generation from selectable character classes.

pub mod config;
pub mod errors;
pub mod form;
pub mod generators;
pub mod password;

pub use errors::{GeneratorError, Result};
pub use generators::CharacterClass;
pub use password::{PasswordRequest, generate, generate_with_rng};
