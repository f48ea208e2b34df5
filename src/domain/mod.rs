//! Domain primitives shared by the storage, analysis and HTTP layers.
//!
//! Identifiers are newtypes so that a workflow id can never be passed where a user id
//! is expected. Providers and languages are closed enums parsed from their wire names.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

macro_rules! id_newtype {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
        #[derive(Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(i32);

        impl $name {
            #[must_use]
            pub const fn new(id: i32) -> Self {
                Self(id)
            }

            #[must_use]
            pub const fn value(&self) -> i32 {
                self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl From<$name> for i32 {
            fn from(id: $name) -> Self {
                id.0
            }
        }

        impl From<i32> for $name {
            fn from(id: i32) -> Self {
                Self::new(id)
            }
        }
    };
}

id_newtype!(
    /// Owner of workflows and provider keys.
    UserId
);

id_newtype!(
    /// Identifier of a persisted workflow.
    ///
    /// The collection view-model hands out negative ids for placeholders that have not
    /// been persisted yet.
    WorkflowId
);

impl WorkflowId {
    #[must_use]
    pub const fn is_placeholder(&self) -> bool {
        self.0 < 0
    }
}

/// An external LLM service usable for enrichment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Provider {
    OpenAi,
    Anthropic,
    Gemini,
}

impl Provider {
    pub const ALL: [Self; 3] = [Self::OpenAi, Self::Anthropic, Self::Gemini];

    /// Name used in storage, URLs and config.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::OpenAi => "openai",
            Self::Anthropic => "anthropic",
            Self::Gemini => "gemini",
        }
    }

    /// Human readable name for messages.
    #[must_use]
    pub const fn display_name(&self) -> &'static str {
        match self {
            Self::OpenAi => "OpenAI",
            Self::Anthropic => "Anthropic",
            Self::Gemini => "Gemini",
        }
    }
}

impl fmt::Display for Provider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Unknown provider: {0}")]
pub struct UnknownProvider(pub String);

impl FromStr for Provider {
    type Err = UnknownProvider;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "openai" => Ok(Self::OpenAi),
            "anthropic" => Ok(Self::Anthropic),
            "gemini" => Ok(Self::Gemini),
            other => Err(UnknownProvider(other.to_string())),
        }
    }
}

/// Output language requested from the model.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    #[default]
    En,
    Tr,
}

impl Language {
    /// Parses a language code; anything unrecognised falls back to English.
    #[must_use]
    pub fn from_code(code: &str) -> Self {
        match code.trim().to_ascii_lowercase().as_str() {
            "tr" | "tr-tr" | "turkish" => Self::Tr,
            _ => Self::En,
        }
    }

    #[must_use]
    pub const fn code(&self) -> &'static str {
        match self {
            Self::En => "en",
            Self::Tr => "tr",
        }
    }

    /// Language name as written into prompts.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::En => "English",
            Self::Tr => "Turkish",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn id_conversions() {
        let id = WorkflowId::new(42);
        assert_eq!(id.value(), 42);
        assert_eq!(id.to_string(), "42");
        assert_eq!(i32::from(id), 42);
        assert_eq!(WorkflowId::from(42), id);
        assert!(!id.is_placeholder());
        assert!(WorkflowId::new(-1).is_placeholder());
    }

    #[test]
    fn id_serialization() {
        let id = UserId::new(7);
        let json = serde_json::to_string(&id).unwrap();
        assert_eq!(json, "7");
        let back: UserId = serde_json::from_str(&json).unwrap();
        assert_eq!(back, id);
    }

    #[test]
    fn provider_parsing() {
        assert_eq!("openai".parse::<Provider>(), Ok(Provider::OpenAi));
        assert_eq!(" Anthropic ".parse::<Provider>(), Ok(Provider::Anthropic));
        assert_eq!("GEMINI".parse::<Provider>(), Ok(Provider::Gemini));
        assert!("mistral".parse::<Provider>().is_err());

        for provider in Provider::ALL {
            assert_eq!(provider.as_str().parse::<Provider>(), Ok(provider));
        }
    }

    #[test]
    fn provider_serde_uses_wire_names() {
        assert_eq!(serde_json::to_string(&Provider::OpenAi).unwrap(), "\"openai\"");
        let p: Provider = serde_json::from_str("\"gemini\"").unwrap();
        assert_eq!(p, Provider::Gemini);
    }

    #[test]
    fn language_fallback() {
        assert_eq!(Language::from_code("tr"), Language::Tr);
        assert_eq!(Language::from_code("en"), Language::En);
        assert_eq!(Language::from_code("de"), Language::En);
        assert_eq!(Language::Tr.name(), "Turkish");
    }
}
