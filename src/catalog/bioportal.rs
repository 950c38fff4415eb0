//! BioPortal REST client.
//!
//! Every request carries `Authorization: apikey token={key}`. Artifact
//! downloads additionally carry the key as an `apikey` query parameter, which
//! the service's download links require.

use log::{debug, info};
use parking_lot::Mutex;
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, AUTHORIZATION, CONTENT_TYPE};
use reqwest::{Client, Url};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::catalog::{
    artifact_path, cached_artifact, ensure_cache_dir, store_artifact, RemoteCatalog,
};
use crate::config::{BioPortalConfig, ENV_API_KEY};
use crate::error::{Result, TaggerError};
use crate::model::{AnnotationCandidate, AnnotatorResult, OntologySubmission, OntologySummary};

const ARTIFACT_ACCEPT: &str = "application/rdf+xml, application/xml;q=0.9, */*;q=0.1";
const PAYLOAD_PREVIEW_BYTES: usize = 200;
const REDACTED: &str = "<redacted>";

#[derive(Debug, Deserialize)]
struct ResourceIndex {
    links: ResourceLinks,
}

#[derive(Debug, Deserialize)]
struct ResourceLinks {
    ontologies: String,
}

pub struct BioPortalClient {
    http: Client,
    api_key: String,
    base_url: String,
    annotator_params: Vec<(String, String)>,
    last_download_url: Mutex<Option<String>>,
}

impl BioPortalClient {
    /// Create a client for `base_url` authenticating with `api_key`.
    pub fn new(api_key: impl Into<String>, base_url: &str, timeout: Duration) -> Result<Self> {
        let api_key = api_key.into();
        if api_key.is_empty() {
            return Err(TaggerError::CredentialMissing {
                env_var: ENV_API_KEY.to_string(),
            });
        }

        let auth = HeaderValue::from_str(&format!("apikey token={}", api_key)).map_err(|e| {
            TaggerError::Config(format!("API key is not a valid header value: {}", e))
        })?;
        let mut headers = HeaderMap::new();
        headers.insert(AUTHORIZATION, auth);

        let http = Client::builder()
            .default_headers(headers)
            .timeout(timeout)
            .build()
            .map_err(|e| TaggerError::upstream(base_url, e))?;

        Ok(Self {
            http,
            api_key,
            base_url: base_url.trim_end_matches('/').to_string(),
            annotator_params: Vec::new(),
            last_download_url: Mutex::new(None),
        })
    }

    pub fn from_config(api_key: impl Into<String>, config: &BioPortalConfig) -> Result<Self> {
        let client = Self::new(
            api_key,
            &config.base_url,
            Duration::from_secs(config.timeout_secs),
        )?;
        Ok(client.with_annotator_params(
            config
                .annotator_params
                .iter()
                .map(|(k, v)| (k.clone(), v.clone())),
        ))
    }

    /// Extra query parameters for the annotator; they override `text` and
    /// `ontologies` when the keys collide.
    pub fn with_annotator_params(
        mut self,
        params: impl IntoIterator<Item = (String, String)>,
    ) -> Self {
        self.annotator_params.extend(params);
        self
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Most recent download URL with the key redacted, or `(cached) {path}`
    /// when the last artifact came from the cache.
    pub fn last_download_url(&self) -> Option<String> {
        self.last_download_url.lock().clone()
    }

    /// All ontologies known to the service, via the REST root's link.
    pub async fn list_ontologies(&self) -> Result<Vec<OntologySummary>> {
        let root: ResourceIndex = self.get_json(self.parse_url(&self.url("/"))?).await?;
        let ontologies_url = self.parse_url(&root.links.ontologies)?;
        self.get_json(ontologies_url).await
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }

    fn parse_url(&self, raw: &str) -> Result<Url> {
        Url::parse(raw).map_err(|e| TaggerError::upstream(raw, format!("invalid URL: {}", e)))
    }

    /// Display form of `url` with the `apikey` query value masked. Works on
    /// the encoded query so keys that need percent-encoding are masked too.
    fn redact(url: &Url) -> String {
        let Some(query) = url.query() else {
            return url.to_string();
        };
        let masked: Vec<String> = query
            .split('&')
            .map(|pair| match pair.split_once('=') {
                Some(("apikey", _)) => format!("apikey={}", REDACTED),
                _ => pair.to_string(),
            })
            .collect();

        let mut base = url.clone();
        base.set_query(None);
        format!("{}?{}", base, masked.join("&"))
    }

    async fn get_json<T: DeserializeOwned>(&self, url: Url) -> Result<T> {
        let shown = Self::redact(&url);
        debug!("GET {}", shown);

        let response = self
            .http
            .get(url)
            .header(ACCEPT, "application/json")
            .send()
            .await
            .map_err(|e| TaggerError::upstream(&shown, e.without_url()))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(TaggerError::upstream(
                shown,
                format!(
                    "HTTP {}: {}",
                    status,
                    body.chars().take(PAYLOAD_PREVIEW_BYTES).collect::<String>()
                ),
            ));
        }

        response
            .json::<T>()
            .await
            .map_err(|e| TaggerError::upstream(shown, format!("unexpected payload: {}", e)))
    }

    fn annotator_query(&self, text: &str, ontology: &str) -> Vec<(String, String)> {
        let mut params = vec![
            ("text".to_string(), text.to_string()),
            ("ontologies".to_string(), ontology.to_string()),
        ];
        for (key, value) in &self.annotator_params {
            match params.iter_mut().find(|(k, _)| k == key) {
                Some(existing) => existing.1 = value.clone(),
                None => params.push((key.clone(), value.clone())),
            }
        }
        params
    }
}

#[async_trait::async_trait]
impl RemoteCatalog for BioPortalClient {
    async fn list_submissions(&self, ontology: &str) -> Result<Vec<OntologySubmission>> {
        let url = self.parse_url(&self.url(&format!("/ontologies/{}/submissions", ontology)))?;
        self.get_json(url).await
    }

    async fn annotate_text(&self, text: &str, ontology: &str) -> Result<Vec<AnnotationCandidate>> {
        let endpoint = self.url("/annotator");
        let url = Url::parse_with_params(&endpoint, self.annotator_query(text, ontology))
            .map_err(|e| TaggerError::upstream(&endpoint, format!("invalid URL: {}", e)))?;
        let results: Vec<AnnotatorResult> = self.get_json(url).await?;
        Ok(results.into_iter().map(AnnotationCandidate::from).collect())
    }

    async fn fetch_artifact(
        &self,
        ontology: &str,
        submission: &OntologySubmission,
        cache_dir: &Path,
    ) -> Result<PathBuf> {
        let resolved_version = submission.resolved_version();
        let submission_id = submission.submission_id.as_ref().ok_or_else(|| {
            TaggerError::upstream(
                self.url(&format!("/ontologies/{}/submissions", ontology)),
                "No submissionId found in submission payload.",
            )
        })?;

        ensure_cache_dir(cache_dir).await?;
        if let Some(cached) = cached_artifact(cache_dir, ontology, &resolved_version) {
            info!(
                "Reusing cached {} release {} at {}",
                ontology,
                resolved_version,
                cached.display()
            );
            *self.last_download_url.lock() = Some(format!("(cached) {}", cached.display()));
            return Ok(cached);
        }
        let dest = artifact_path(cache_dir, ontology, &resolved_version);

        let download_url = self.url(&format!(
            "/ontologies/{}/submissions/{}/download",
            ontology, submission_id
        ));
        let key_param = [("apikey", self.api_key.as_str())];
        let final_url = Url::parse_with_params(&download_url, &key_param).map_err(|e| {
            TaggerError::Download(format!("Invalid download URL {}: {}", download_url, e))
        })?;
        let shown_url = Self::redact(&final_url);
        *self.last_download_url.lock() = Some(shown_url.clone());
        info!(
            "Downloading {} release {} from {}",
            ontology, resolved_version, shown_url
        );

        let response = self
            .http
            .get(final_url)
            .header(ACCEPT, ARTIFACT_ACCEPT)
            .send()
            .await
            .map_err(|e| {
                TaggerError::Download(format!(
                    "Download from {} failed: {}",
                    shown_url,
                    e.without_url()
                ))
            })?;

        let status = response.status();
        if !status.is_success() {
            return Err(TaggerError::Download(format!(
                "Download from {} failed with HTTP {}",
                shown_url, status
            )));
        }

        let content_type = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .unwrap_or("")
            .to_string();
        let payload = response
            .bytes()
            .await
            .map_err(|e| {
                TaggerError::Download(format!(
                    "Reading download from {} failed: {}",
                    shown_url,
                    e.without_url()
                ))
            })?;

        if looks_like_json(&content_type, &payload) {
            let preview_len = payload.len().min(PAYLOAD_PREVIEW_BYTES);
            return Err(TaggerError::Download(format!(
                "Downloaded JSON metadata instead of OWL file. URL: {}\n\
                 Content-Type: {}\n\
                 Submission ID used: {}\n\
                 Version: {}\n\
                 First 200 bytes: {}",
                shown_url,
                content_type,
                submission_id,
                resolved_version,
                String::from_utf8_lossy(&payload[..preview_len])
            )));
        }

        store_artifact(&dest, &payload).await?;
        debug!("Wrote {} bytes to {}", payload.len(), dest.display());
        Ok(dest)
    }
}

/// The service answers some broken download links with a JSON body and a
/// 200 status.
fn looks_like_json(content_type: &str, payload: &[u8]) -> bool {
    content_type.to_lowercase().contains("json") || payload.first() == Some(&b'{')
}
