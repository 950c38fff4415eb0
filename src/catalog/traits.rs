use std::path::{Path, PathBuf};

use crate::error::Result;
use crate::model::{select_submission, AnnotationCandidate, OntologySubmission};

/// Operations the tagger needs from the terminology service.
#[async_trait::async_trait]
pub trait RemoteCatalog: Send + Sync {
    /// All submissions of an ontology, most recent first. Empty when the
    /// ontology has no releases.
    async fn list_submissions(&self, ontology: &str) -> Result<Vec<OntologySubmission>>;

    /// Live annotation matches for `text`, most relevant first.
    async fn annotate_text(&self, text: &str, ontology: &str) -> Result<Vec<AnnotationCandidate>>;

    /// Make the artifact of an already selected submission available under
    /// `cache_dir`, downloading it only when it is not cached yet.
    async fn fetch_artifact(
        &self,
        ontology: &str,
        submission: &OntologySubmission,
        cache_dir: &Path,
    ) -> Result<PathBuf>;

    /// Resolve `version` (latest when `None`) and fetch its artifact.
    /// Returns the local path and the version the artifact belongs to.
    async fn download_submission(
        &self,
        ontology: &str,
        version: Option<&str>,
        cache_dir: &Path,
    ) -> Result<(PathBuf, String)> {
        let submissions = self.list_submissions(ontology).await?;
        let submission = select_submission(ontology, &submissions, version)?;
        let path = self.fetch_artifact(ontology, submission, cache_dir).await?;
        Ok((path, submission.resolved_version()))
    }
}
