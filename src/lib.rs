pub mod catalog;
pub mod config;
pub mod error;
pub mod lexicon;
pub mod logic;
pub mod model;

pub use catalog::{BioPortalClient, RemoteCatalog};
pub use error::{Result, TaggerError};
pub use lexicon::ReleaseLexicon;
pub use logic::{normalize_terms, OntologyTagger};

// Export all model types
pub use model::*;
