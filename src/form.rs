use std::collections::BTreeSet;

use rand::Rng;

use crate::config::Config;
use crate::errors::{GeneratorError, Result};
use crate::generators::CharacterClass;
use crate::password::{PasswordRequest, generate_with_rng};

/// Length field, class toggles and last result of a password form.
#[derive(Debug, Clone)]
pub struct PasswordForm {
    length_input: String,
    classes: BTreeSet<CharacterClass>,
    initial_classes: BTreeSet<CharacterClass>,
    min_length: i64,
    max_length: i64,
    password: Option<String>,
}

impl PasswordForm {
    pub fn new(config: &Config) -> Self {
        Self {
            length_input: String::new(),
            classes: config.classes.clone(),
            initial_classes: config.classes.clone(),
            min_length: config.min_length,
            max_length: config.max_length,
            password: None,
        }
    }

    pub fn set_length(&mut self, input: &str) {
        self.length_input = input.to_string();
    }

    pub fn set_classes(&mut self, classes: BTreeSet<CharacterClass>) {
        self.classes = classes;
    }

    pub fn toggle(&mut self, class: CharacterClass) {
        if !self.classes.remove(&class) {
            self.classes.insert(class);
        }
    }

    pub fn is_enabled(&self, class: CharacterClass) -> bool {
        self.classes.contains(&class)
    }

    pub fn password(&self) -> Option<&str> {
        self.password.as_deref()
    }

    /// Parse the length field against the configured bounds. Only plain
    /// integers are accepted; decimal and exponent forms are rejected.
    pub fn validate_length(&self) -> Result<i64> {
        let input = self.length_input.trim();

        if input.is_empty() {
            return Err(GeneratorError::Validation(String::from(
                "This field is required.",
            )));
        }

        let length: i64 = input.parse().map_err(|_| {
            GeneratorError::Validation(String::from("Password length must be a number."))
        })?;

        if length < self.min_length {
            return Err(GeneratorError::Validation(format!(
                "At least {} characters are required.",
                self.min_length
            )));
        }

        if length > self.max_length {
            return Err(GeneratorError::Validation(format!(
                "At most {} characters are supported.",
                self.max_length
            )));
        }

        Ok(length)
    }

    pub fn is_valid(&self) -> bool {
        self.validate_length().is_ok()
    }

    pub fn submit<R: Rng>(&mut self, rng: &mut R) -> Result<&str> {
        let length = self.validate_length()?;
        let request = PasswordRequest::new(length, self.classes.clone())?;
        let password = generate_with_rng(rng, &request)?;

        Ok(self.password.insert(password).as_str())
    }

    /// Clear the length field and result, restoring the initial toggles.
    pub fn reset(&mut self) {
        self.length_input.clear();
        self.classes = self.initial_classes.clone();
        self.password = None;
    }
}
