//! RDF/XML reader producing library-neutral [`Statement`]s.

use oxrdf::{Subject, Term, Triple};
use oxrdfxml::RdfXmlParser;
use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use crate::error::{Result, TaggerError};
use crate::lexicon::Statement;

/// Parse an OWL release serialized as RDF/XML, in document order.
pub fn read_statements(path: &Path) -> Result<Vec<Statement>> {
    let file = File::open(path).map_err(|e| TaggerError::io(path, e))?;

    let statements = RdfXmlParser::new()
        .for_reader(BufReader::new(file))
        .map(|triple| {
            triple.map(Statement::from).map_err(|e| TaggerError::Parse {
                path: path.to_path_buf(),
                reason: e.to_string(),
            })
        })
        .collect::<Result<Vec<_>>>()?;

    // Non-XML payloads can come through the parser without an error.
    if statements.is_empty() {
        return Err(TaggerError::Parse {
            path: path.to_path_buf(),
            reason: "no RDF statements found".to_string(),
        });
    }
    Ok(statements)
}

impl From<Triple> for Statement {
    fn from(triple: Triple) -> Self {
        let subject = match triple.subject {
            Subject::NamedNode(node) => Some(node.into_string()),
            _ => None,
        };
        let object = match triple.object {
            Term::Literal(literal) => Some(literal.value().to_string()),
            Term::NamedNode(node) => Some(node.into_string()),
            _ => None,
        };
        Statement {
            subject,
            predicate: triple.predicate.into_string(),
            object,
        }
    }
}
