use serde::{Deserialize, Serialize};

/// Which reconciliation branch produced an outcome.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MatchBranch {
    NotMatched,
    SpecifiedVersion,
    RequestedVersionMissing,
    LatestOnly,
    StrictUnmatched,
    Latest,
}

impl MatchBranch {
    pub fn comment(&self) -> &'static str {
        match self {
            MatchBranch::NotMatched => "not matched at all",
            MatchBranch::SpecifiedVersion => "matched in user specified version",
            MatchBranch::RequestedVersionMissing => "requested version missing; matched in latest",
            MatchBranch::LatestOnly => "matched in latest, no match in specified version",
            MatchBranch::StrictUnmatched => "strict mode: not matched in specified version",
            MatchBranch::Latest => "matched in latest",
        }
    }
}

/// The per-term result record. Absent values serialize as `null`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnnotationOutcome {
    pub input_text: String,
    pub standardized_term: Option<String>,
    pub ontology_id: Option<String>,
    pub ontology_version: Option<String>,
    pub comment: String,
}

impl AnnotationOutcome {
    pub fn new(
        input_text: impl Into<String>,
        standardized_term: Option<String>,
        ontology_id: Option<String>,
        ontology_version: Option<String>,
        branch: MatchBranch,
    ) -> Self {
        Self {
            input_text: input_text.into(),
            standardized_term,
            ontology_id,
            ontology_version,
            comment: branch.comment().to_string(),
        }
    }

    pub fn not_matched(input_text: impl Into<String>) -> Self {
        Self::new(input_text, None, None, None, MatchBranch::NotMatched)
    }
}

/// Render outcomes the way the command line prints them.
pub fn outcomes_to_json(outcomes: &[AnnotationOutcome]) -> serde_json::Result<String> {
    serde_json::to_string_pretty(outcomes)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_outcome_serializes_to_flat_mapping_with_nulls() {
        let outcome = AnnotationOutcome::not_matched("unicorn horn");
        let value = serde_json::to_value(&outcome).unwrap();
        assert_eq!(
            value,
            json!({
                "input_text": "unicorn horn",
                "standardized_term": null,
                "ontology_id": null,
                "ontology_version": null,
                "comment": "not matched at all"
            })
        );
    }

    #[test]
    fn test_outcomes_to_json_is_an_indented_array() {
        let outcomes = vec![AnnotationOutcome::new(
            "cell",
            Some("cell".to_string()),
            Some("CL_0000001".to_string()),
            Some("2023-01-01".to_string()),
            MatchBranch::SpecifiedVersion,
        )];
        let rendered = outcomes_to_json(&outcomes).unwrap();
        assert!(rendered.starts_with("[\n  {"));
        assert!(rendered.contains("\"comment\": \"matched in user specified version\""));

        assert_eq!(outcomes_to_json(&[]).unwrap(), "[]");
    }
}
