//! Document loading
//!
//! A [`DocumentLoader`] fetches the document at an absolute location,
//! parses it and adds every triple to a [`TripleSink`]. Parse failures
//! surface unmodified; triples added before the failure stay in the sink.

use crate::backend::BackendError;
use crate::context::TripleSink;
use crate::rdf::{ParseError, RdfFormat, RdfParser, Triple};
use oxiri::Iri;
use percent_encoding::percent_decode_str;
use std::fs::File;
use std::io::BufReader;
use std::path::PathBuf;
use thiserror::Error;
use tracing::debug;

/// Document loading errors
#[derive(Error, Debug)]
pub enum LoadError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error(transparent)]
    Parse(#[from] ParseError),

    #[error(transparent)]
    Backend(#[from] BackendError),

    #[error("Unsupported location scheme: {0}")]
    UnsupportedScheme(String),

    #[error("Invalid location: {0}")]
    InvalidLocation(String),
}

pub type LoadResult<T> = Result<T, LoadError>;

pub trait DocumentLoader {
    /// Parse the document at `location` and add its triples to `sink`
    fn load(&self, location: &str, format: RdfFormat, sink: &mut dyn TripleSink)
        -> LoadResult<()>;
}

/// Loader for `file:`, `http:` and `https:` locations
#[derive(Debug, Default, Clone, Copy)]
pub struct RioLoader;

impl RioLoader {
    pub fn new() -> Self {
        Self
    }
}

impl DocumentLoader for RioLoader {
    fn load(
        &self,
        location: &str,
        format: RdfFormat,
        sink: &mut dyn TripleSink,
    ) -> LoadResult<()> {
        let iri = Iri::parse(location)
            .map_err(|e| LoadError::InvalidLocation(format!("{location}: {e}")))?;
        let mut on_triple = |triple: Triple| sink.add(triple).map_err(LoadError::from);

        match iri.scheme() {
            "file" => {
                let path = file_path(&iri)?;
                debug!("Reading {} as {}", path.display(), format);
                let reader = BufReader::new(File::open(&path)?);
                RdfParser::parse_reader(reader, format, Some(location), &mut on_triple)
            }
            "http" | "https" => {
                debug!("Fetching {} as {}", location, format);
                let response = reqwest::blocking::get(location)?.error_for_status()?;
                RdfParser::parse_reader(
                    BufReader::new(response),
                    format,
                    Some(location),
                    &mut on_triple,
                )
            }
            other => Err(LoadError::UnsupportedScheme(other.to_string())),
        }
    }
}

fn file_path(iri: &Iri<&str>) -> LoadResult<PathBuf> {
    let path = percent_decode_str(iri.path())
        .decode_utf8()
        .map_err(|e| LoadError::InvalidLocation(format!("{}: {e}", iri.as_str())))?;
    Ok(PathBuf::from(path.as_ref()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::location::file_iri;
    use std::io::Write;
    use tempfile::TempDir;

    const DOC_NT: &str =
        "<http://example.org/a> <http://example.org/b> <http://example.org/c> .\n";

    #[test]
    fn test_load_file_location() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("my doc.nt");
        File::create(&path).unwrap().write_all(DOC_NT.as_bytes()).unwrap();

        let mut sink: Vec<Triple> = Vec::new();
        RioLoader::new()
            .load(&file_iri(&path), RdfFormat::NTriples, &mut sink)
            .unwrap();
        assert_eq!(sink.len(), 1);
    }

    #[test]
    fn test_missing_file() {
        let dir = TempDir::new().unwrap();
        let location = file_iri(&dir.path().join("absent.nt"));

        let mut sink: Vec<Triple> = Vec::new();
        let err = RioLoader::new()
            .load(&location, RdfFormat::NTriples, &mut sink)
            .unwrap_err();
        assert!(matches!(err, LoadError::Io(_)));
    }

    #[test]
    fn test_malformed_document_keeps_earlier_triples() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("broken.nt");
        let body = format!("{DOC_NT}<http://example.org/a> oops .\n");
        std::fs::write(&path, body).unwrap();

        let mut sink: Vec<Triple> = Vec::new();
        let err = RioLoader::new()
            .load(&file_iri(&path), RdfFormat::NTriples, &mut sink)
            .unwrap_err();
        assert!(matches!(err, LoadError::Parse(_)));
        assert_eq!(sink.len(), 1);
    }

    #[test]
    fn test_unsupported_scheme() {
        let mut sink: Vec<Triple> = Vec::new();
        let err = RioLoader::new()
            .load("urn:isbn:0451450523", RdfFormat::RdfXml, &mut sink)
            .unwrap_err();
        assert!(matches!(err, LoadError::UnsupportedScheme(s) if s == "urn"));
    }
}
