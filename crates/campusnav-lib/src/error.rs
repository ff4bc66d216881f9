use std::path::PathBuf;

use thiserror::Error;

/// Convenient result alias for the CampusNav library.
pub type Result<T> = std::result::Result<T, Error>;

/// Top-level library error type.
#[derive(Debug, Error)]
pub enum Error {
    /// The campus data directory could not be located at the resolved path.
    #[error("campus data directory not found at {path}")]
    DataDirNotFound { path: PathBuf },

    /// No suitable project directories could be resolved for this platform.
    #[error("failed to resolve project directories for campus data")]
    ProjectDirsUnavailable,

    /// Requested campus has no loaded graph.
    #[error("unknown campus: {campus}{}", format_suggestions(.suggestions))]
    CampusNotFound {
        campus: String,
        suggestions: Vec<String>,
    },

    /// A node id is absent from the target graph.
    #[error("unknown node '{node}' in campus {campus}{}", format_suggestions(.suggestions))]
    NodeNotFound {
        campus: String,
        node: String,
        suggestions: Vec<String>,
    },

    /// Both ids are valid but no connecting path exists.
    #[error("no path found between {start} and {goal}")]
    NoPathFound { start: String, goal: String },

    /// One or more legs of a multi-stop route failed.
    #[error(
        "{} of {total_legs} legs could not be routed: {}",
        .failed.len(),
        format_failed_legs(.failed)
    )]
    PartialMultiDestinationFailure {
        failed: Vec<LegFailure>,
        total_legs: usize,
        accumulated_distance: f64,
    },

    /// The outdoor-directions or weather provider returned an error or was unreachable.
    #[error("{provider} request failed: {message}")]
    CollaboratorFailure {
        provider: &'static str,
        message: String,
    },

    /// No exit/entrance candidate produced a complete integrated path.
    #[error("no valid integrated path found from {start} to {goal}")]
    NoValidIntegratedPath { start: String, goal: String },

    /// Raised when a graph data file is structurally invalid.
    #[error("invalid graph data in {path}: {message}")]
    InvalidGraphData { path: PathBuf, message: String },

    /// Raised when a configuration value cannot be parsed.
    #[error("invalid value '{value}' for {key}")]
    InvalidConfig { key: String, value: String },

    /// Wrapper for IO errors.
    #[error(transparent)]
    Io(#[from] std::io::Error),

    /// Wrapper for JSON decoding errors.
    #[error(transparent)]
    Json(#[from] serde_json::Error),

    /// Wrapper for HTTP client errors.
    #[error(transparent)]
    Http(#[from] reqwest::Error),
}

impl Error {
    /// `true` for the two conditions a shortest-path query reports as "no path":
    /// an unknown endpoint or a disconnected pair.
    pub fn is_no_path(&self) -> bool {
        matches!(self, Error::NodeNotFound { .. } | Error::NoPathFound { .. })
    }

    /// `true` when the error originated in an external collaborator.
    pub fn is_collaborator(&self) -> bool {
        matches!(self, Error::CollaboratorFailure { .. } | Error::Http(_))
    }

    pub(crate) fn collaborator(provider: &'static str, message: impl Into<String>) -> Self {
        Error::CollaboratorFailure {
            provider,
            message: message.into(),
        }
    }
}

/// A single failed leg inside a multi-stop route.
#[derive(Debug, Clone, PartialEq, serde::Serialize)]
pub struct LegFailure {
    pub destination: String,
    pub error: String,
}

fn format_suggestions(suggestions: &[String]) -> String {
    if suggestions.is_empty() {
        String::new()
    } else if suggestions.len() == 1 {
        format!(". Did you mean '{}'?", suggestions[0])
    } else {
        format!(
            ". Did you mean one of: {}?",
            suggestions
                .iter()
                .map(|s| format!("'{}'", s))
                .collect::<Vec<_>>()
                .join(", ")
        )
    }
}

fn format_failed_legs(failed: &[LegFailure]) -> String {
    failed
        .iter()
        .map(|leg| format!("{} ({})", leg.destination, leg.error))
        .collect::<Vec<_>>()
        .join("; ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn node_not_found_lists_suggestions() {
        let err = Error::NodeNotFound {
            campus: "hall".to_string(),
            node: "h2_2O9".to_string(),
            suggestions: vec!["h2_209".to_string()],
        };
        let message = err.to_string();
        assert!(message.contains("h2_2O9"));
        assert!(message.contains("Did you mean 'h2_209'?"));
        assert!(err.is_no_path());
    }

    #[test]
    fn partial_failure_reports_every_leg() {
        let err = Error::PartialMultiDestinationFailure {
            failed: vec![
                LegFailure {
                    destination: "a".to_string(),
                    error: "no path".to_string(),
                },
                LegFailure {
                    destination: "b".to_string(),
                    error: "unknown node".to_string(),
                },
            ],
            total_legs: 3,
            accumulated_distance: 12.0,
        };
        let message = err.to_string();
        assert!(message.starts_with("2 of 3 legs"));
        assert!(message.contains("a (no path)"));
        assert!(message.contains("b (unknown node)"));
        assert!(!err.is_no_path());
    }

    #[test]
    fn collaborator_errors_are_classified() {
        let err = Error::collaborator("weather", "timeout");
        assert!(err.is_collaborator());
        assert_eq!(err.to_string(), "weather request failed: timeout");
    }
}
