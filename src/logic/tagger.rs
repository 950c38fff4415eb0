//! Version reconciliation: live annotation checked against a pinned release.

use log::{debug, info, warn};
use std::path::{Path, PathBuf};

use crate::catalog::RemoteCatalog;
use crate::error::{Result, TaggerError};
use crate::lexicon::ReleaseLexicon;
use crate::logic::normalize_terms;
use crate::model::{
    available_versions, AnnotationCandidate, AnnotationOutcome, FallbackPolicy, MatchBranch,
};

const LATEST: &str = "latest";

/// Version state resolved once per `annotate_terms` call and shared
/// read-only by every term.
#[derive(Debug, Default)]
pub struct VersionContext {
    pub requested: Option<String>,
    pub resolved: Option<String>,
    pub latest: String,
    /// The requested version does not exist and the policy allowed falling
    /// back to latest.
    pub fallback: bool,
    pub lexicon: Option<ReleaseLexicon>,
}

impl VersionContext {
    fn pinned_version(&self) -> Option<String> {
        self.resolved.clone().or_else(|| self.requested.clone())
    }
}

/// Annotates terms against an ontology and verifies matches in a pinned release.
pub struct OntologyTagger<C: RemoteCatalog> {
    catalog: C,
    downloads_dir: PathBuf,
}

impl<C: RemoteCatalog> OntologyTagger<C> {
    pub fn new(catalog: C, downloads_dir: impl Into<PathBuf>) -> Self {
        Self {
            catalog,
            downloads_dir: downloads_dir.into(),
        }
    }

    pub fn catalog(&self) -> &C {
        &self.catalog
    }

    /// One outcome per normalized term, in input order. Any remote or parse
    /// failure aborts the whole call.
    pub async fn annotate_terms(
        &self,
        ontology: &str,
        terms: Option<&[String]>,
        file: Option<&Path>,
        version: Option<&str>,
        policy: FallbackPolicy,
    ) -> Result<Vec<AnnotationOutcome>> {
        let prepared = normalize_terms(terms, file)?;
        if prepared.is_empty() {
            return Ok(Vec::new());
        }

        let requested = version.filter(|v| !v.is_empty());
        let context = self.resolve_version(ontology, requested, policy).await?;

        let mut outcomes = Vec::with_capacity(prepared.len());
        for term in &prepared {
            let candidates = self.catalog.annotate_text(term, ontology).await?;
            let outcome = reconcile_term(term, candidates.first(), &context, policy);
            debug!("{:?} -> {}", term, outcome.comment);
            outcomes.push(outcome);
        }
        Ok(outcomes)
    }

    async fn resolve_version(
        &self,
        ontology: &str,
        requested: Option<&str>,
        policy: FallbackPolicy,
    ) -> Result<VersionContext> {
        let submissions = self.catalog.list_submissions(ontology).await?;
        let latest = submissions
            .first()
            .map(|sub| sub.resolved_version())
            .unwrap_or_else(|| LATEST.to_string());

        let mut context = VersionContext {
            requested: requested.map(str::to_string),
            latest,
            ..Default::default()
        };

        let Some(requested) = requested else {
            info!(
                "No version requested for {}; reporting matches against {}",
                ontology, context.latest
            );
            return Ok(context);
        };

        match submissions.iter().find(|sub| sub.version_label() == requested) {
            Some(submission) => {
                let path = self
                    .catalog
                    .fetch_artifact(ontology, submission, &self.downloads_dir)
                    .await?;
                let lexicon = ReleaseLexicon::from_path(&path)?;
                info!(
                    "Verifying {} against release {} released {} ({} labels, {} identifiers)",
                    ontology,
                    requested,
                    submission.released.as_deref().unwrap_or("unknown"),
                    lexicon.label_count(),
                    lexicon.identifier_count()
                );
                context.resolved = Some(submission.resolved_version());
                context.lexicon = Some(lexicon);
            }
            None if policy == FallbackPolicy::Permissive => {
                warn!(
                    "Version '{}' not found for {}; falling back to {}",
                    requested, ontology, context.latest
                );
                context.fallback = true;
            }
            None => {
                return Err(TaggerError::VersionNotFound {
                    ontology: ontology.to_string(),
                    requested: requested.to_string(),
                    available: available_versions(&submissions),
                });
            }
        }

        Ok(context)
    }
}

/// Decide the outcome for one term from its top live candidate.
pub fn reconcile_term(
    term: &str,
    candidate: Option<&AnnotationCandidate>,
    context: &VersionContext,
    policy: FallbackPolicy,
) -> AnnotationOutcome {
    let Some(candidate) = candidate else {
        return AnnotationOutcome::not_matched(term);
    };

    let short_id = candidate.short_id();
    let live_label = candidate.pref_label.as_deref();

    let mut in_specified_version = false;
    let mut release_label = None;
    if let Some(lexicon) = &context.lexicon {
        if let Some(id) = short_id.filter(|id| !id.is_empty()) {
            in_specified_version = lexicon.has_identifier(id);
            if in_specified_version {
                release_label = lexicon.label_for(id);
            }
        }
        // A label hit is trusted without checking the identifier again.
        if !in_specified_version {
            if let Some(label) = live_label.filter(|l| !l.is_empty()) {
                in_specified_version = lexicon.has_label(label);
            }
        }
    }

    let standardized_term = release_label.or(live_label).map(str::to_string);
    let ontology_id = short_id.map(str::to_string);
    let latest = Some(context.latest.clone());

    let (version, branch) = match &context.requested {
        Some(_) if !context.fallback && in_specified_version => {
            (context.pinned_version(), MatchBranch::SpecifiedVersion)
        }
        Some(_) if context.fallback => (latest, MatchBranch::RequestedVersionMissing),
        Some(_) if policy == FallbackPolicy::Permissive => (latest, MatchBranch::LatestOnly),
        Some(_) => {
            return AnnotationOutcome::new(
                term,
                None,
                ontology_id,
                context.pinned_version(),
                MatchBranch::StrictUnmatched,
            );
        }
        None => (latest, MatchBranch::Latest),
    };

    AnnotationOutcome::new(term, standardized_term, ontology_id, version, branch)
}
