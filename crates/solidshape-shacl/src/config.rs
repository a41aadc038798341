//! Compiler configuration
//!
//! Passed explicitly into [`crate::ShapeCompiler::new`]; the compiler reads no
//! environment variables and keeps no process-wide state.

use serde::{Deserialize, Serialize};

/// What to do when a single shape fails to compile
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorPolicy {
    /// The first shape error aborts the whole batch
    #[default]
    Abort,
    /// Reject the offending shape (and shapes that reference it) and keep going
    SkipShape,
}

/// Identifier case for derived field names
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NameCase {
    /// `firstName`
    #[default]
    Camel,
    /// `first_name`
    Snake,
}

/// Shape compiler configuration
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CompilerConfig {
    pub error_policy: ErrorPolicy,
    pub name_case: NameCase,
}

impl CompilerConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_error_policy(mut self, error_policy: ErrorPolicy) -> Self {
        self.error_policy = error_policy;
        self
    }

    pub fn with_name_case(mut self, name_case: NameCase) -> Self {
        self.name_case = name_case;
        self
    }

    /// Parse a JSON configuration document; missing keys take their defaults
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }
}
