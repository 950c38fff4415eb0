use serde::{Deserialize, Serialize};

use crate::error::{Result, TaggerError};

/// Server-assigned submission identifier. BioPortal reports it as a number,
/// some mirrors as a string.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum SubmissionId {
    Number(u64),
    Text(String),
}

impl std::fmt::Display for SubmissionId {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        match self {
            SubmissionId::Number(n) => write!(f, "{}", n),
            SubmissionId::Text(s) => write!(f, "{}", s),
        }
    }
}

/// One release of an ontology as listed by `/ontologies/{acronym}/submissions`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OntologySubmission {
    #[serde(default)]
    pub submission_id: Option<SubmissionId>,
    #[serde(default)]
    pub version: Option<String>,
    /// Release timestamp as reported, e.g. `2024-02-02T00:00:00-08:00`.
    #[serde(default)]
    pub released: Option<String>,
}

impl OntologySubmission {
    pub fn new(submission_id: u64, version: impl Into<String>) -> Self {
        Self {
            submission_id: Some(SubmissionId::Number(submission_id)),
            version: Some(version.into()),
            released: None,
        }
    }

    /// Version string used for equality checks and diagnostics; `""` when the
    /// service reports none.
    pub fn version_label(&self) -> &str {
        self.version.as_deref().unwrap_or("")
    }

    /// Version string a result is attributed to; `"latest"` when the service
    /// reports none.
    pub fn resolved_version(&self) -> String {
        match self.version.as_deref() {
            Some(v) if !v.is_empty() => v.to_string(),
            _ => "latest".to_string(),
        }
    }
}

/// Pick the submission a caller asked for. `None` selects the most recent
/// (first listed) release; otherwise the version string must match exactly.
pub fn select_submission<'a>(
    ontology: &str,
    submissions: &'a [OntologySubmission],
    version: Option<&str>,
) -> Result<&'a OntologySubmission> {
    let Some(first) = submissions.first() else {
        return Err(TaggerError::NoSubmissions {
            ontology: ontology.to_string(),
        });
    };

    let Some(version) = version else {
        return Ok(first);
    };

    submissions
        .iter()
        .find(|sub| sub.version_label() == version)
        .ok_or_else(|| TaggerError::VersionNotFound {
            ontology: ontology.to_string(),
            requested: version.to_string(),
            available: available_versions(submissions),
        })
}

pub fn available_versions(submissions: &[OntologySubmission]) -> Vec<String> {
    submissions
        .iter()
        .map(|sub| sub.version_label().to_string())
        .collect()
}

/// Ontology entry from the service's ontology listing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OntologySummary {
    pub acronym: String,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(rename = "@id", default)]
    pub iri: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn listing() -> Vec<OntologySubmission> {
        vec![
            OntologySubmission::new(12, "2024-02-01"),
            OntologySubmission::new(11, "2023-01-01"),
        ]
    }

    #[test]
    fn test_submission_payload_deserialization() {
        let json = r#"[
            {"submissionId": 12, "version": "2024-02-01", "released": "2024-02-02T00:00:00-08:00",
             "@id": "https://data.bioontology.org/ontologies/CL/submissions/12"},
            {"submissionId": "11", "version": null},
            {"version": ""}
        ]"#;
        let subs: Vec<OntologySubmission> = serde_json::from_str(json).unwrap();

        assert_eq!(subs.len(), 3);
        assert_eq!(subs[0].submission_id, Some(SubmissionId::Number(12)));
        assert_eq!(subs[0].resolved_version(), "2024-02-01");
        assert_eq!(subs[0].released.as_deref(), Some("2024-02-02T00:00:00-08:00"));
        assert_eq!(subs[1].submission_id.as_ref().unwrap().to_string(), "11");
        assert_eq!(subs[1].version_label(), "");
        assert_eq!(subs[1].resolved_version(), "latest");
        assert_eq!(subs[2].submission_id, None);
        assert_eq!(subs[2].resolved_version(), "latest");
    }

    #[test]
    fn test_select_latest_when_no_version_requested() {
        let subs = listing();
        let selected = select_submission("CL", &subs, None).unwrap();
        assert_eq!(selected.version_label(), "2024-02-01");
    }

    #[test]
    fn test_select_exact_version() {
        let subs = listing();
        let selected = select_submission("CL", &subs, Some("2023-01-01")).unwrap();
        assert_eq!(selected.submission_id, Some(SubmissionId::Number(11)));
    }

    #[test]
    fn test_select_is_case_sensitive_and_reports_available() {
        let subs = vec![
            OntologySubmission::new(3, "v1.0"),
            OntologySubmission::new(2, "V1.0"),
        ];
        let selected = select_submission("X", &subs, Some("V1.0")).unwrap();
        assert_eq!(selected.submission_id, Some(SubmissionId::Number(2)));

        match select_submission("X", &subs, Some("v2.0")) {
            Err(TaggerError::VersionNotFound {
                ontology,
                requested,
                available,
            }) => {
                assert_eq!(ontology, "X");
                assert_eq!(requested, "v2.0");
                assert_eq!(available, vec!["v1.0".to_string(), "V1.0".to_string()]);
            }
            other => panic!("expected VersionNotFound, got {:?}", other),
        }
    }

    #[test]
    fn test_select_from_empty_listing() {
        assert!(matches!(
            select_submission("CL", &[], None),
            Err(TaggerError::NoSubmissions { .. })
        ));
        assert!(matches!(
            select_submission("CL", &[], Some("2023-01-01")),
            Err(TaggerError::NoSubmissions { .. })
        ));
    }
}
