//! Fake user / host generation.
//!
//! The generator owns its random source, so callers decide whether a session
//! gets a fresh identity or a reproducible one from a fixed seed.

use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use thiserror::Error;

use crate::config::IdentityConfig;

const MAX_LEN: usize = 64;

const FIRST_NAMES: &[&str] = &[
    "Ana", "Andrei", "Maria", "Elena", "Mihai", "Ioana", "Lucas", "Sofia", "Noah", "Emma",
    "Mateo", "Olivia", "Liam", "Chloe", "Hugo", "Clara", "Felix", "Nora", "Oscar", "Alma",
    "Leon", "Ines", "Jonas", "Freya", "Tomas", "Vera", "Pablo", "Lena", "Arjun", "Mei",
];

const LAST_NAMES: &[&str] = &[
    "Popescu", "Ionescu", "Novak", "Schmidt", "Garcia", "Rossi", "Kowalski", "Nielsen",
    "Dubois", "Silva", "Tanaka", "Kim", "Ivanova", "Horvat", "Jensen", "Moreau", "Costa",
    "Fischer", "Lindqvist", "Okafor", "Herrera", "Petrov", "Bauer", "Marino", "Walsh",
];

const CITIES: &[&str] = &[
    "Bucharest", "Cluj", "Lisbon", "Porto", "Oslo", "Bergen", "Krakow", "Prague", "Vienna",
    "Zagreb", "Lyon", "Turin", "Seville", "Ghent", "Tallinn", "Riga", "Osaka", "Busan",
    "New Orleans", "San Jose", "Salt Lake City", "Cape Town", "Buenos Aires", "Rio Grande",
];

#[derive(Debug, Error, PartialEq, Eq)]
pub enum IdentityError {
    #[error("fake {field} must not be empty")]
    Empty { field: &'static str },

    #[error("fake {field} '{value}' is longer than {MAX_LEN} bytes")]
    TooLong { field: &'static str, value: String },

    #[error("fake {field} '{value}' may only contain ASCII letters, digits, '_', '-' and '.', starting with a letter or digit")]
    InvalidChars { field: &'static str, value: String },
}

/// Cosmetic identity presented inside the session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FakeIdentity {
    user: String,
    host: String,
}

impl FakeIdentity {
    /// Both strings end up inside generated shell scripts, so they are held
    /// to a conservative character set.
    pub fn new(user: impl Into<String>, host: impl Into<String>) -> Result<Self, IdentityError> {
        let user = user.into();
        let host = host.into();
        validate_part("user", &user)?;
        validate_part("host", &host)?;
        Ok(Self { user, host })
    }

    pub fn user(&self) -> &str {
        &self.user
    }

    pub fn host(&self) -> &str {
        &self.host
    }
}

pub(crate) fn validate_part(field: &'static str, value: &str) -> Result<(), IdentityError> {
    if value.is_empty() {
        return Err(IdentityError::Empty { field });
    }
    if value.len() > MAX_LEN {
        return Err(IdentityError::TooLong {
            field,
            value: value.to_string(),
        });
    }
    let starts_ok = value
        .chars()
        .next()
        .is_some_and(|c| c.is_ascii_alphanumeric());
    let chars_ok = value
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || matches!(c, '_' | '-' | '.'));
    if !starts_ok || !chars_ok {
        return Err(IdentityError::InvalidChars {
            field,
            value: value.to_string(),
        });
    }
    Ok(())
}

pub struct IdentityGenerator<R> {
    rng: R,
}

impl IdentityGenerator<StdRng> {
    pub fn seeded(seed: u64) -> Self {
        Self::new(StdRng::seed_from_u64(seed))
    }

    pub fn from_entropy() -> Self {
        Self::new(StdRng::from_entropy())
    }
}

impl<R: Rng> IdentityGenerator<R> {
    pub fn new(rng: R) -> Self {
        Self { rng }
    }

    pub fn user(&mut self) -> String {
        let first = pick(&mut self.rng, FIRST_NAMES);
        let last = pick(&mut self.rng, LAST_NAMES);
        format!("{}_{}", first.to_lowercase(), last.to_lowercase())
    }

    pub fn host(&mut self) -> String {
        let city = pick(&mut self.rng, CITIES).to_lowercase().replace(' ', "-");
        let node: u32 = self.rng.gen_range(1000..=9999);
        format!("{city}-node-{node}")
    }

    pub fn generate(&mut self) -> FakeIdentity {
        FakeIdentity {
            user: self.user(),
            host: self.host(),
        }
    }
}

fn pick<'a, R: Rng>(rng: &mut R, items: &[&'a str]) -> &'a str {
    items.choose(rng).copied().unwrap_or("anon")
}

/// Fixed values from the config win per field; the rest is generated.
pub fn resolve_identity(config: &IdentityConfig) -> Result<FakeIdentity, IdentityError> {
    let mut generator = match config.seed {
        Some(seed) => IdentityGenerator::seeded(seed),
        None => IdentityGenerator::from_entropy(),
    };
    let user = match &config.user {
        Some(user) => user.clone(),
        None => generator.user(),
    };
    let host = match &config.host {
        Some(host) => host.clone(),
        None => generator.host(),
    };
    FakeIdentity::new(user, host)
}
