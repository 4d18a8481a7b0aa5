//! Presence — whether a tracked device is at home.

/// One of the two presence states a device tracker understands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Presence {
    Home,
    NotHome,
}

impl Presence {
    /// Interpret a raw state value.
    ///
    /// Only the exact strings `home` and `not_home` are recognised; anything
    /// else (zone names, `unknown`, `unavailable`) yields `None`.
    #[must_use]
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "home" => Some(Self::Home),
            "not_home" => Some(Self::NotHome),
            _ => None,
        }
    }

    /// Payload published for this presence.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Home => "home",
            Self::NotHome => "not_home",
        }
    }
}

impl std::fmt::Display for Presence {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
