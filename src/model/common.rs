use serde::{Deserialize, Serialize};

/// Short identifier of a concept IRI: the text after the last `#`, or after
/// the last `/` when there is no `#`. The same rule is applied to lexicon
/// subjects and to live annotation results so the two sides compare.
pub fn extract_short_id(iri: &str) -> &str {
    if let Some((_, fragment)) = iri.rsplit_once('#') {
        return fragment;
    }
    match iri.rsplit_once('/') {
        Some((_, tail)) => tail,
        None => iri,
    }
}

/// What to do when the requested release is missing, or when a live match
/// cannot be found in it.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FallbackPolicy {
    /// Fail on a missing version; report terms absent from the release as
    /// unmatched there.
    #[default]
    Strict,
    /// Fall back to the latest release in both cases.
    Permissive,
}

impl std::fmt::Display for FallbackPolicy {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        match self {
            FallbackPolicy::Strict => write!(f, "strict"),
            FallbackPolicy::Permissive => write!(f, "permissive"),
        }
    }
}

impl std::str::FromStr for FallbackPolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "strict" | "error" => Ok(FallbackPolicy::Strict),
            "permissive" | "latest" => Ok(FallbackPolicy::Permissive),
            _ => Err(format!("Unknown fallback policy: {}", s)),
        }
    }
}
