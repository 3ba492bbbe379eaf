use serde::{Deserialize, Serialize};

/// Recipient the converted text is written for.
///
/// The serialized form is the identifier the conversion service keys its
/// prompts on, so it must not be translated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Target {
    #[default]
    #[serde(rename = "상사")]
    Boss,
    #[serde(rename = "동료")]
    Colleague,
    #[serde(rename = "고객")]
    Client,
}

impl Target {
    pub fn as_str(&self) -> &'static str {
        match self {
            Target::Boss => "상사",
            Target::Colleague => "동료",
            Target::Client => "고객",
        }
    }

    /// Accepts either the wire identifier or the English alias.
    pub fn from_str(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "상사" | "boss" => Some(Target::Boss),
            "동료" | "colleague" => Some(Target::Colleague),
            "고객" | "client" | "customer" => Some(Target::Client),
            _ => None,
        }
    }

    pub fn all() -> Vec<Target> {
        vec![Target::Boss, Target::Colleague, Target::Client]
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            Target::Boss => "Boss (상사)",
            Target::Colleague => "Colleague (동료)",
            Target::Client => "Client (고객)",
        }
    }

    pub fn next(&self) -> Self {
        match self {
            Target::Boss => Target::Colleague,
            Target::Colleague => Target::Client,
            Target::Client => Target::Boss,
        }
    }

    pub fn prev(&self) -> Self {
        match self {
            Target::Boss => Target::Client,
            Target::Colleague => Target::Boss,
            Target::Client => Target::Colleague,
        }
    }
}
