use std::path::Path;

use crate::error::{Result, TaggerError};

/// Collect the terms to annotate: inline terms first (each may span several
/// lines), then the lines of `file`. Lines are trimmed; empty ones dropped;
/// duplicates kept.
pub fn normalize_terms(terms: Option<&[String]>, file: Option<&Path>) -> Result<Vec<String>> {
    if terms.is_none() && file.is_none() {
        return Err(TaggerError::NoInput);
    }

    let mut collected = Vec::new();

    if let Some(terms) = terms {
        for term in terms {
            collected.extend(clean_lines(term));
        }
    }

    if let Some(path) = file {
        let contents = std::fs::read_to_string(path).map_err(|e| TaggerError::io(path, e))?;
        collected.extend(clean_lines(&contents));
    }

    Ok(collected)
}

fn clean_lines(text: &str) -> impl Iterator<Item = String> + '_ {
    text.lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(str::to_string)
}
