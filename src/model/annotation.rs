use serde::{Deserialize, Serialize};

use crate::model::extract_short_id;

/// One element of the `/annotator` response array. Only the annotated class
/// is used; match positions and hierarchy expansions are ignored.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnnotatorResult {
    #[serde(default)]
    pub annotated_class: AnnotatedClass,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnnotatedClass {
    #[serde(rename = "@id", default)]
    pub id: Option<String>,
    #[serde(default)]
    pub pref_label: Option<String>,
}

/// A live match for a term. The annotator only returns `prefLabel` when asked
/// for it, so both fields may be missing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnnotationCandidate {
    pub pref_label: Option<String>,
    pub class_iri: Option<String>,
}

impl AnnotationCandidate {
    pub fn new(pref_label: Option<&str>, class_iri: Option<&str>) -> Self {
        Self {
            pref_label: pref_label.map(str::to_string),
            class_iri: class_iri.map(str::to_string),
        }
    }

    pub fn short_id(&self) -> Option<&str> {
        self.class_iri.as_deref().map(extract_short_id)
    }
}

impl From<AnnotatorResult> for AnnotationCandidate {
    fn from(result: AnnotatorResult) -> Self {
        Self {
            pref_label: result.annotated_class.pref_label,
            class_iri: result.annotated_class.id,
        }
    }
}
