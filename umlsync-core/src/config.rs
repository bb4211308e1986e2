//! Run configuration, built once by the entry point and passed down.

use std::fmt;

use crate::error::ConfigError;

/// Commit message used when none is configured.
pub const DEFAULT_COMMIT_MESSAGE: &str = "Render PlantUML diagrams";

/// Where rendered artifacts go, relative to the file that contained the block.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum OutputTemplate {
    /// `/dir`: every artifact lands in `dir`, whatever its source directory.
    Absolute(String),
    /// `.`: next to the source file.
    #[default]
    SourceDir,
    /// `dir`: in `dir` below the source file's directory.
    Relative(String),
}

impl OutputTemplate {
    /// Classify a configured template string. An empty string behaves like `.`.
    pub fn parse(template: &str) -> Self {
        if template.starts_with('/') {
            OutputTemplate::Absolute(template.to_string())
        } else if template == "." || template.is_empty() {
            OutputTemplate::SourceDir
        } else {
            OutputTemplate::Relative(template.to_string())
        }
    }
}

impl fmt::Display for OutputTemplate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OutputTemplate::Absolute(dir) | OutputTemplate::Relative(dir) => f.write_str(dir),
            OutputTemplate::SourceDir => f.write_str("."),
        }
    }
}

/// Settings the sync engine reads.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SyncConfig {
    pub output: OutputTemplate,
    /// Used verbatim as the generated commit's message.
    pub commit_message: String,
    /// Render and compare, but stop before creating tree, commit, or ref.
    pub dry_run: bool,
}

impl Default for SyncConfig {
    fn default() -> Self {
        Self {
            output: OutputTemplate::default(),
            commit_message: DEFAULT_COMMIT_MESSAGE.to_string(),
            dry_run: false,
        }
    }
}

/// Object store access token. `Debug` never prints the secret.
#[derive(Clone, PartialEq, Eq)]
pub struct Token(String);

impl Token {
    /// Validate presence of the credential. Absent or blank is fatal.
    pub fn require(raw: Option<String>) -> Result<Self, ConfigError> {
        match raw {
            Some(token) if !token.trim().is_empty() => Ok(Token(token.trim().to_string())),
            _ => Err(ConfigError::MissingToken),
        }
    }

    pub fn expose(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Token(***)")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("/out", OutputTemplate::Absolute("/out".to_string()))]
    #[case("/", OutputTemplate::Absolute("/".to_string()))]
    #[case(".", OutputTemplate::SourceDir)]
    #[case("", OutputTemplate::SourceDir)]
    #[case("diagrams", OutputTemplate::Relative("diagrams".to_string()))]
    #[case("./img", OutputTemplate::Relative("./img".to_string()))]
    fn template_classification(#[case] raw: &str, #[case] expected: OutputTemplate) {
        assert_eq!(OutputTemplate::parse(raw), expected);
    }

    #[test]
    fn token_required() {
        assert!(matches!(Token::require(None), Err(ConfigError::MissingToken)));
        assert!(matches!(
            Token::require(Some("  ".to_string())),
            Err(ConfigError::MissingToken)
        ));
        let token = Token::require(Some("ghs_secret".to_string())).expect("token");
        assert_eq!(token.expose(), "ghs_secret");
    }

    #[test]
    fn token_debug_is_redacted() {
        let token = Token::require(Some("ghs_secret".to_string())).expect("token");
        assert!(!format!("{token:?}").contains("ghs_secret"));
    }
}
