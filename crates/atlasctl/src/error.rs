//! Error types for atlasctl
//!
//! Wraps library errors with the command that failed and renders them as
//! cargo-style diagnostics.

use atlasctl_core::{ConfigError, CoreError};
use colored::Colorize;
use thiserror::Error;

/// Cargo-style diagnostic formatter for CLI errors.
///
/// Produces structured output like:
/// ```text
/// error: API keys not found. Please set ATLAS_PUBLIC_KEY and ATLAS_PRIVATE_KEY ...
///
///   tip: export the key pair or add it to .env in the current directory
/// ```
pub struct CliDiagnostic {
    message: String,
    detail: Option<String>,
    tips: Vec<String>,
}

impl CliDiagnostic {
    /// Start a new error diagnostic with the given message.
    pub fn error(message: &str) -> Self {
        Self {
            message: message.to_string(),
            detail: None,
            tips: Vec::new(),
        }
    }

    /// Add a detail line below the error message.
    pub fn detail(mut self, text: &str) -> Self {
        self.detail = Some(text.to_string());
        self
    }

    pub fn tip(mut self, description: &str) -> Self {
        self.tips.push(description.to_string());
        self
    }

    /// Print the diagnostic to stderr with colored formatting.
    pub fn print(&self) {
        eprint!("{}{}", "error".red().bold(), ": ".bold());
        eprintln!("{}", self.message);

        if let Some(detail) = &self.detail {
            eprintln!("  {}", detail);
        }

        for description in &self.tips {
            eprintln!();
            eprint!("  {}{}", "tip".yellow().bold(), ": ".bold());
            eprintln!("{}", description);
        }
    }
}

/// Main error type for the atlasctl binary
#[derive(Error, Debug)]
pub enum CliError {
    /// A provisioning operation failed; `action` names it ("create project")
    #[error("Failed to {action}: {source}")]
    Operation {
        action: &'static str,
        #[source]
        source: CoreError,
    },

    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Operation cancelled")]
    Cancelled,

    #[error("Output formatting error: {message}")]
    OutputError { message: String },
}

/// Result type for atlasctl operations
pub type Result<T> = std::result::Result<T, CliError>;

impl CliError {
    pub fn operation(action: &'static str, source: CoreError) -> Self {
        CliError::Operation { action, source }
    }

    /// The underlying library error, if any
    pub fn core(&self) -> Option<&CoreError> {
        match self {
            CliError::Operation { source, .. } => Some(source),
            _ => None,
        }
    }

    /// Reason text without the action prefix, for the `Failed to ...` line
    pub fn reason(&self) -> String {
        match self {
            CliError::Operation { source, .. } => source.to_string(),
            CliError::Config(err) => err.to_string(),
            other => other.to_string(),
        }
    }

    /// Get helpful suggestions for resolving this error
    pub fn suggestions(&self) -> Vec<String> {
        match self {
            CliError::Config(ConfigError::MissingApiKeys) => vec![
                "Export ATLAS_PUBLIC_KEY and ATLAS_PRIVATE_KEY, or add them to .env in the current directory".to_string(),
                "Create an API key under Organization Access Manager > API Keys".to_string(),
            ],
            CliError::Config(ConfigError::MissingDatabaseUser) => vec![
                "Export DB_USER and DB_PASSWORD, or add them to .env in the current directory"
                    .to_string(),
            ],
            CliError::Config(ConfigError::ParseError(_)) => vec![
                "Check the config file syntax, or point --config-file at another file".to_string(),
            ],
            CliError::Operation { source, .. } => core_suggestions(source),
            _ => vec![],
        }
    }

    /// Print a cargo-style diagnostic to stderr using colored formatting.
    pub fn print_diagnostic(&self) {
        let mut diag = CliDiagnostic::error(&self.to_string());

        if let Some(status) = self.core().and_then(CoreError::status) {
            diag = diag.detail(&format!("HTTP status {}", status));
        }
        for suggestion in self.suggestions() {
            diag = diag.tip(&suggestion);
        }

        diag.print();
    }
}

fn core_suggestions(err: &CoreError) -> Vec<String> {
    if err.is_unauthorized() {
        vec![
            "Verify ATLAS_PUBLIC_KEY and ATLAS_PRIVATE_KEY are correct".to_string(),
            "Check that the API key's access list includes this machine's IP".to_string(),
        ]
    } else if err.is_not_found() {
        vec!["Verify the project ID and cluster name are correct".to_string()]
    } else if err.is_timeout() {
        vec![
            "The cluster may still be provisioning; check its state in the Atlas UI".to_string(),
            "Raise the polling budget in the [polling] section of the config file".to_string(),
        ]
    } else if err.is_transport() {
        vec![
            "Check network connectivity".to_string(),
            "Verify ATLAS_BASE_URL if you have overridden it".to_string(),
        ]
    } else if matches!(err, CoreError::NoOrganizations) {
        vec!["Pass --org-id explicitly, or check the API key's organization".to_string()]
    } else {
        vec![]
    }
}

impl From<serde_json::Error> for CliError {
    fn from(err: serde_json::Error) -> Self {
        CliError::OutputError {
            message: format!("JSON error: {}", err),
        }
    }
}

impl From<serde_yaml::Error> for CliError {
    fn from(err: serde_yaml::Error) -> Self {
        CliError::OutputError {
            message: format!("YAML error: {}", err),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_operation_display_matches_failure_line() {
        let err = CliError::operation("create project", CoreError::NoOrganizations);
        assert_eq!(
            err.to_string(),
            "Failed to create project: No organizations found for this user"
        );
        assert!(!err.suggestions().is_empty());
    }

    #[test]
    fn test_missing_keys_suggestions() {
        let err = CliError::Config(ConfigError::MissingApiKeys);
        assert!(err.to_string().contains("API keys not found"));
        assert!(err.suggestions()[0].contains("ATLAS_PUBLIC_KEY"));
    }

    #[test]
    fn test_timeout_suggestions() {
        let err = CliError::operation(
            "create free cluster",
            CoreError::ClusterTimeout {
                cluster: "demo".to_string(),
                attempts: 30,
            },
        );
        assert!(err.suggestions().iter().any(|s| s.contains("polling")));
    }
}
