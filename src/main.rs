use anyhow::{anyhow, bail, Context};
use clap::Parser;
use log::{info, LevelFilter};
use ontology_tagger::catalog::BioPortalClient;
use ontology_tagger::config::AppConfig;
use ontology_tagger::logic::OntologyTagger;
use ontology_tagger::model::{outcomes_to_json, FallbackPolicy};
use std::path::PathBuf;

/// Annotate free-text terms with ontology concepts and check them against a
/// pinned ontology release.
#[derive(Debug, Parser)]
#[command(name = "ontotag")]
struct Cli {
    /// Ontology acronym, e.g. CL
    #[arg(long)]
    ontology: String,

    /// Release version to verify matches against (defaults to latest)
    #[arg(long)]
    version: Option<String>,

    /// Terms to annotate
    #[arg(long, num_args = 1..)]
    terms: Option<Vec<String>>,

    /// File with one term per line
    #[arg(long)]
    file: Option<PathBuf>,

    /// Where downloaded releases are cached
    #[arg(long)]
    downloads_dir: Option<PathBuf>,

    /// Behavior when the requested version or a match in it is missing
    #[arg(
        long,
        default_value = "strict",
        value_parser = ["strict", "permissive", "error", "latest"]
    )]
    on_version_missing: String,
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    // Load environment variables from .env file if it exists
    dotenvy::dotenv().ok();

    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .filter_module("reqwest", LevelFilter::Warn)
        .filter_module("hyper", LevelFilter::Warn)
        .target(env_logger::Target::Stderr)
        .init();

    let cli = Cli::parse();
    if cli.terms.is_none() && cli.file.is_none() {
        bail!("provide --terms and/or --file");
    }
    let policy: FallbackPolicy = cli.on_version_missing.parse().map_err(|e: String| anyhow!(e))?;

    let config = AppConfig::load().context("loading configuration")?;
    let api_key = config.api_key()?;
    let client = BioPortalClient::from_config(api_key, &config.bioportal)?;

    let downloads_dir = cli
        .downloads_dir
        .unwrap_or_else(|| config.cache.downloads_dir.clone());
    info!(
        "Annotating against {} at {} (policy: {}, cache: {})",
        cli.ontology,
        client.base_url(),
        policy,
        downloads_dir.display()
    );

    let tagger = OntologyTagger::new(client, downloads_dir);
    let outcomes = tagger
        .annotate_terms(
            &cli.ontology,
            cli.terms.as_deref(),
            cli.file.as_deref(),
            cli.version.as_deref(),
            policy,
        )
        .await?;

    if let Some(url) = tagger.catalog().last_download_url() {
        info!("Release artifact: {}", url);
    }

    println!("{}", outcomes_to_json(&outcomes)?);
    Ok(())
}
