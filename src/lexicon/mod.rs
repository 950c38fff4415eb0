//! Lookup indexes over one downloaded ontology release.
//!
//! A [`ReleaseLexicon`] answers three questions about a pinned release: does
//! it define this label, does it mention this concept as a subject, and what
//! label does it give that concept. The RDF library only appears in
//! [`rdf_xml`]; everything else works on [`Statement`]s.

pub mod rdf_xml;

use log::debug;
use oxrdf::vocab::rdfs;
use std::collections::{HashMap, HashSet};
use std::path::Path;

use crate::error::Result;
use crate::model::extract_short_id;

/// One parsed triple. `subject` is `None` for blank nodes; `object` holds a
/// literal's lexical value or an IRI, and is `None` for blank nodes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Statement {
    pub subject: Option<String>,
    pub predicate: String,
    pub object: Option<String>,
}

#[derive(Debug, Clone, Default)]
pub struct ReleaseLexicon {
    labels: HashSet<String>,
    identifiers: HashSet<String>,
    id_to_label: HashMap<String, String>,
}

impl ReleaseLexicon {
    /// Parse the artifact at `path` and index it.
    pub fn from_path(path: &Path) -> Result<Self> {
        let statements = rdf_xml::read_statements(path)?;
        let lexicon = Self::from_statements(&statements);
        debug!(
            "Indexed {}: {} statements, {} labels, {} identifiers",
            path.display(),
            statements.len(),
            lexicon.labels.len(),
            lexicon.identifiers.len()
        );
        Ok(lexicon)
    }

    pub fn from_statements(statements: &[Statement]) -> Self {
        let mut lexicon = Self::default();
        lexicon.index_labels(statements);
        lexicon.index_subjects(statements);
        lexicon
    }

    /// Label pass over `rdfs:label` statements.
    ///
    /// When a release gives one identifier several labels, the last one in
    /// document order ends up in the reverse map.
    fn index_labels(&mut self, statements: &[Statement]) {
        let label_predicate = rdfs::LABEL.as_str();
        for statement in statements.iter().filter(|s| s.predicate == label_predicate) {
            let Some(label) = statement.object.as_deref().map(str::trim) else {
                continue;
            };
            if label.is_empty() {
                continue;
            }

            self.labels.insert(label.to_lowercase());

            if let Some(subject) = &statement.subject {
                let short_id = extract_short_id(subject).to_lowercase();
                self.id_to_label.insert(short_id, label.to_string());
            }
        }
    }

    /// Subject pass: every named resource used as a statement subject,
    /// labelled or not.
    fn index_subjects(&mut self, statements: &[Statement]) {
        for subject in statements.iter().filter_map(|s| s.subject.as_deref()) {
            self.identifiers.insert(extract_short_id(subject).to_lowercase());
        }
    }

    pub fn has_label(&self, text: &str) -> bool {
        self.labels.contains(&text.trim().to_lowercase())
    }

    pub fn has_identifier(&self, short_id: &str) -> bool {
        self.identifiers.contains(&short_id.trim().to_lowercase())
    }

    /// The release's own label for `short_id`, if it defines one.
    pub fn label_for(&self, short_id: &str) -> Option<&str> {
        self.id_to_label
            .get(&short_id.trim().to_lowercase())
            .map(String::as_str)
    }

    pub fn label_count(&self) -> usize {
        self.labels.len()
    }

    pub fn identifier_count(&self) -> usize {
        self.identifiers.len()
    }
}

/// Minimal RDF/XML release with one `owl:Class` element per entry. Repeat an
/// IRI to give it several labels.
#[cfg(test)]
pub(crate) fn rdf_xml_release(classes: &[(&str, Option<&str>)]) -> String {
    let mut doc = String::from(RDF_XML_HEADER);
    doc.push_str("  <owl:Ontology rdf:about=\"http://purl.obolibrary.org/obo/test.owl\"/>\n");
    for (iri, label) in classes {
        match label {
            Some(label) => doc.push_str(&format!(
                "  <owl:Class rdf:about=\"{}\">\n    <rdfs:label>{}</rdfs:label>\n  </owl:Class>\n",
                iri, label
            )),
            None => doc.push_str(&format!("  <owl:Class rdf:about=\"{}\"/>\n", iri)),
        }
    }
    doc.push_str("</rdf:RDF>\n");
    doc
}

#[cfg(test)]
const RDF_XML_HEADER: &str = "<?xml version=\"1.0\"?>\n\
<rdf:RDF xmlns:rdf=\"http://www.w3.org/1999/02/22-rdf-syntax-ns#\"\n\
\x20        xmlns:rdfs=\"http://www.w3.org/2000/01/rdf-schema#\"\n\
\x20        xmlns:owl=\"http://www.w3.org/2002/07/owl#\">\n";

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::TaggerError;
    use std::fs;

    const CL: &str = "http://purl.obolibrary.org/obo/";

    fn write_release(dir: &Path, name: &str, body: &str) -> std::path::PathBuf {
        let path = dir.join(name);
        fs::write(&path, body).unwrap();
        path
    }

    fn label_statement(subject: Option<&str>, label: &str) -> Statement {
        Statement {
            subject: subject.map(str::to_string),
            predicate: rdfs::LABEL.as_str().to_string(),
            object: Some(label.to_string()),
        }
    }

    #[test]
    fn test_labels_and_identifiers_from_release_file() {
        let dir = tempfile::tempdir().unwrap();
        let body = rdf_xml_release(&[
            ("http://purl.obolibrary.org/obo/CL_0000001", Some("cell")),
            ("http://purl.obolibrary.org/obo/CL_0000236", Some("B cell")),
            ("http://purl.obolibrary.org/obo/CL_0000999", None),
            ("http://example.org/onto#Neuron", Some("  Neuron  ")),
        ]);
        let path = write_release(dir.path(), "CL_2023-01-01.owl", &body);
        let lexicon = ReleaseLexicon::from_path(&path).unwrap();

        assert!(lexicon.has_label("cell"));
        assert!(lexicon.has_label("  B CELL "));
        assert!(lexicon.has_label("neuron"));
        assert!(!lexicon.has_label("unicorn horn"));

        assert!(lexicon.has_identifier("CL_0000001"));
        assert!(lexicon.has_identifier("cl_0000236"));
        assert!(lexicon.has_identifier("Neuron"));
        // Unlabelled classes still count as present in the release.
        assert!(lexicon.has_identifier("CL_0000999"));
        assert!(lexicon.has_identifier("test.owl"));

        assert_eq!(lexicon.label_for("cl_0000001"), Some("cell"));
        assert_eq!(lexicon.label_for("NEURON"), Some("Neuron"));
        assert_eq!(lexicon.label_for("CL_0000999"), None);
    }

    #[test]
    fn test_objects_are_not_identifiers() {
        let dir = tempfile::tempdir().unwrap();
        let body = format!(
            "{header}  <owl:Class rdf:about=\"{cl}CL_0000236\">\n\
             \x20   <rdfs:subClassOf rdf:resource=\"{cl}CL_0000945\"/>\n\
             \x20 </owl:Class>\n\
             </rdf:RDF>\n",
            header = RDF_XML_HEADER,
            cl = CL
        );
        let path = write_release(dir.path(), "CL_sub.owl", &body);
        let lexicon = ReleaseLexicon::from_path(&path).unwrap();

        assert!(lexicon.has_identifier("CL_0000236"));
        assert!(!lexicon.has_identifier("CL_0000945"));
        assert_eq!(lexicon.identifier_count(), 1);
    }

    #[test]
    fn test_last_label_wins_in_reverse_map() {
        let statements = vec![
            label_statement(Some("http://purl.obolibrary.org/obo/CL_0000236"), "B cell"),
            label_statement(Some("http://purl.obolibrary.org/obo/CL_0000236"), "B lymphocyte"),
        ];
        let lexicon = ReleaseLexicon::from_statements(&statements);

        assert_eq!(lexicon.label_for("CL_0000236"), Some("B lymphocyte"));
        assert!(lexicon.has_label("b cell"));
        assert!(lexicon.has_label("b lymphocyte"));
        assert_eq!(lexicon.label_count(), 2);
    }

    #[test]
    fn test_blank_and_empty_labels() {
        let statements = vec![
            label_statement(None, "anonymous restriction"),
            label_statement(Some("http://x/A#Empty"), "   "),
        ];
        let lexicon = ReleaseLexicon::from_statements(&statements);

        assert!(lexicon.has_label("anonymous restriction"));
        assert!(!lexicon.has_label(""));
        assert_eq!(lexicon.label_for("Empty"), None);
        // Blank subjects never become identifiers; the named one does.
        assert!(lexicon.has_identifier("Empty"));
        assert_eq!(lexicon.identifier_count(), 1);
    }

    #[test]
    fn test_json_payload_is_a_parse_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_release(dir.path(), "CL_bad.owl", "{\"errors\": [\"not found\"]}");

        match ReleaseLexicon::from_path(&path) {
            Err(TaggerError::Parse { path: failed, .. }) => assert_eq!(failed, path),
            other => panic!("expected ParseError, got {:?}", other),
        }
    }

    #[test]
    fn test_malformed_xml_is_a_parse_error() {
        let dir = tempfile::tempdir().unwrap();
        let body = format!(
            "{}  <owl:Class rdf:about=\"{}CL_0000001\">\n\
             \x20   <rdfs:label>cell</rdfs:comment>\n\
             \x20 </owl:Class>\n\
             </rdf:RDF>\n",
            RDF_XML_HEADER, CL
        );
        let path = write_release(dir.path(), "CL_malformed.owl", &body);

        let err = ReleaseLexicon::from_path(&path).unwrap_err();
        assert!(matches!(err, TaggerError::Parse { .. }));
        assert!(err.to_string().contains("CL_malformed.owl"));
    }

    #[test]
    fn test_missing_file_is_an_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = ReleaseLexicon::from_path(&dir.path().join("absent.owl")).unwrap_err();
        assert!(matches!(err, TaggerError::Io { .. }));
    }
}
