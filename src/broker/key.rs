use std::fmt;
use std::sync::LazyLock;

use regex::Regex;

use crate::utils::{GatewayError, Result};

static BOAT_KEY_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new("^[0-9a-f]{32}$").expect("boat key pattern is valid")
});

/// A boat key: 32 lowercase hex characters. Only constructed through
/// [`BoatKey::parse`], so holding one means the format was checked.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct BoatKey(String);

impl BoatKey {
    pub fn parse(raw: &str) -> Result<Self> {
        if BOAT_KEY_RE.is_match(raw) {
            Ok(Self(raw.to_string()))
        } else {
            Err(GatewayError::InvalidBoatKey(raw.to_string()))
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for BoatKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
