use std::path::PathBuf;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, TaggerError>;

/// Every failure the tagger can surface. All of them abort the whole
/// `annotate_terms` call; a term that simply does not match is an outcome,
/// not an error.
#[derive(Debug, Error)]
pub enum TaggerError {
    #[error("Set the BioPortal API key in environment variable '{env_var}' or in a .env file.")]
    CredentialMissing { env_var: String },

    #[error("BioPortal request to {url} failed: {reason}")]
    Upstream { url: String, reason: String },

    #[error("Ontology '{ontology}' has no submissions.")]
    NoSubmissions { ontology: String },

    #[error(
        "Version '{requested}' not found for ontology '{ontology}'. Available versions: {}",
        format_available(.available)
    )]
    VersionNotFound {
        ontology: String,
        requested: String,
        available: Vec<String>,
    },

    #[error("{0}")]
    Download(String),

    #[error(
        "Failed to parse OWL file at '{}'. The downloaded content may not be a valid ontology; \
         verify the version exists and the download link is correct. ({reason})",
        .path.display()
    )]
    Parse { path: PathBuf, reason: String },

    #[error("Provide either terms or a file of terms to annotate.")]
    NoInput,

    #[error("I/O error on {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid configuration: {0}")]
    Config(String),
}

impl TaggerError {
    pub fn upstream(url: impl Into<String>, reason: impl ToString) -> Self {
        Self::Upstream {
            url: url.into(),
            reason: reason.to_string(),
        }
    }

    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}

impl From<config::ConfigError> for TaggerError {
    fn from(err: config::ConfigError) -> Self {
        Self::Config(err.to_string())
    }
}

fn format_available(available: &[String]) -> String {
    if available.is_empty() {
        "none".to_string()
    } else {
        available.join(", ")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version_not_found_lists_available_versions() {
        let err = TaggerError::VersionNotFound {
            ontology: "CL".to_string(),
            requested: "9999-99-99".to_string(),
            available: vec!["2023-01-01".to_string(), "".to_string()],
        };
        assert_eq!(
            err.to_string(),
            "Version '9999-99-99' not found for ontology 'CL'. Available versions: 2023-01-01, "
        );
    }

    #[test]
    fn test_version_not_found_without_any_versions() {
        let err = TaggerError::VersionNotFound {
            ontology: "CL".to_string(),
            requested: "1.0".to_string(),
            available: Vec::new(),
        };
        assert!(err.to_string().ends_with("Available versions: none"));
    }

    #[test]
    fn test_parse_error_names_path_and_remediation() {
        let err = TaggerError::Parse {
            path: PathBuf::from("downloads/CL_1.owl"),
            reason: "unexpected end of file".to_string(),
        };
        let message = err.to_string();
        assert!(message.contains("downloads/CL_1.owl"));
        assert!(message.contains("verify the version exists"));
    }
}
