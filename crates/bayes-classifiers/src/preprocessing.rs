//! Field encoding applied to raw text cells before they enter a `Frame`.
//!
//! The default `BinaryLabeller` turns integer text into its value and maps
//! every other token to 0 or 1 by membership in a positive-token list.
use serde::{Deserialize, Serialize};

/// Turns one raw text field into an integer.
pub trait FieldEncoder: Send + Sync {
    fn encode(&self, field: &str) -> i64;

    /// Optional human readable name for the encoder
    fn name(&self) -> &str {
        "encoder"
    }
}

/// Which rule of a `BinaryLabeller` applied to a field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EncodingRule {
    /// The field parsed as an integer and is kept as-is.
    Integer(i64),
    /// The field matched a positive token and encodes to 1.
    PositiveToken,
    /// Anything else encodes to 0.
    Negative,
}

impl EncodingRule {
    pub fn value(&self) -> i64 {
        match self {
            EncodingRule::Integer(v) => *v,
            EncodingRule::PositiveToken => 1,
            EncodingRule::Negative => 0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BinaryLabeller {
    /// Tokens that encode to 1. Matching is exact after trimming whitespace.
    pub positive_tokens: Vec<String>,
}

impl BinaryLabeller {
    pub fn new<I, S>(positive_tokens: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            positive_tokens: positive_tokens.into_iter().map(Into::into).collect(),
        }
    }

    pub fn rule_for(&self, field: &str) -> EncodingRule {
        let field = field.trim();
        if let Ok(v) = field.parse::<i64>() {
            EncodingRule::Integer(v)
        } else if self.positive_tokens.iter().any(|t| t == field) {
            EncodingRule::PositiveToken
        } else {
            EncodingRule::Negative
        }
    }
}

impl Default for BinaryLabeller {
    fn default() -> Self {
        BinaryLabeller::new(["Positive", "Yes", "Male"])
    }
}

impl FieldEncoder for BinaryLabeller {
    fn encode(&self, field: &str) -> i64 {
        self.rule_for(field).value()
    }

    fn name(&self) -> &str {
        "binary-labeller"
    }
}
