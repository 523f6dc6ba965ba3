//! Turning document locations into absolute IRIs

use oxiri::{Iri, IriParseError};
use percent_encoding::{utf8_percent_encode, AsciiSet, CONTROLS};
use std::path::Path;
use thiserror::Error;

/// Characters escaped when a filesystem path becomes a `file:` IRI
const PATH_SEGMENT: &AsciiSet = &CONTROLS
    .add(b' ')
    .add(b'"')
    .add(b'#')
    .add(b'%')
    .add(b'<')
    .add(b'>')
    .add(b'?')
    .add(b'[')
    .add(b'\\')
    .add(b']')
    .add(b'^')
    .add(b'`')
    .add(b'{')
    .add(b'|')
    .add(b'}');

/// Characters escaped in a relative reference before resolution.
///
/// Keeps `/`, `?`, `#` and `%` so path structure, queries, fragments and
/// existing escapes survive.
const RELATIVE_REFERENCE: &AsciiSet = &CONTROLS
    .add(b' ')
    .add(b'"')
    .add(b'<')
    .add(b'>')
    .add(b'\\')
    .add(b'^')
    .add(b'`')
    .add(b'{')
    .add(b'|')
    .add(b'}');

#[derive(Error, Debug)]
pub enum LocationError {
    #[error("Invalid location {location}: {reason}")]
    Invalid { location: String, reason: String },

    #[error("Cannot read working directory: {0}")]
    WorkingDirectory(#[from] std::io::Error),
}

impl LocationError {
    fn invalid(location: &str, err: IriParseError) -> Self {
        LocationError::Invalid {
            location: location.to_string(),
            reason: err.to_string(),
        }
    }
}

/// Canonicalize `location` into an absolute IRI.
///
/// Absolute IRIs come back unchanged. Relative references are resolved
/// against `base`, or against the working directory when no base is set.
pub fn absolutize(location: &str, base: Option<&str>) -> Result<String, LocationError> {
    if let Ok(iri) = Iri::parse(location) {
        return Ok(iri.into_inner().to_string());
    }

    let base = match base {
        Some(base) => base.to_string(),
        None => cwd_base()?,
    };
    let base = Iri::parse(base.as_str()).map_err(|e| LocationError::invalid(&base, e))?;
    let reference = utf8_percent_encode(location, RELATIVE_REFERENCE).to_string();
    let resolved = base
        .resolve(&reference)
        .map_err(|e| LocationError::invalid(location, e))?;
    Ok(resolved.into_inner())
}

/// `file:` IRI of the working directory, with a trailing slash
pub fn cwd_base() -> Result<String, LocationError> {
    Ok(directory_iri(&std::env::current_dir()?))
}

pub fn directory_iri(dir: &Path) -> String {
    let mut iri = file_iri(dir);
    if !iri.ends_with('/') {
        iri.push('/');
    }
    iri
}

/// `file:` IRI of an absolute filesystem path
pub fn file_iri(path: &Path) -> String {
    let path = path.to_string_lossy().replace('\\', "/");
    let encoded = utf8_percent_encode(&path, PATH_SEGMENT).to_string();
    if encoded.starts_with('/') {
        format!("file://{encoded}")
    } else {
        format!("file:///{encoded}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_absolute_location_is_unchanged() {
        let loc = "http://ex.org/doc.rdf";
        assert_eq!(absolutize(loc, None).unwrap(), loc);
        assert_eq!(absolutize(loc, Some("http://other.org/")).unwrap(), loc);
    }

    #[test]
    fn test_relative_against_base() {
        let abs = absolutize("data/doc.ttl", Some("http://ex.org/root/")).unwrap();
        assert_eq!(abs, "http://ex.org/root/data/doc.ttl");

        let up = absolutize("../doc.ttl", Some("http://ex.org/root/sub/")).unwrap();
        assert_eq!(up, "http://ex.org/root/doc.ttl");
    }

    #[test]
    fn test_relative_against_working_directory() {
        let abs = absolutize("doc.ttl", None).unwrap();
        assert!(abs.starts_with("file://"));
        assert!(abs.ends_with("/doc.ttl"));
        assert_eq!(abs, format!("{}doc.ttl", cwd_base().unwrap()));
    }

    #[test]
    fn test_file_iri_escapes_path() {
        let iri = file_iri(Path::new("/tmp/my docs/a#b.ttl"));
        assert_eq!(iri, "file:///tmp/my%20docs/a%23b.ttl");
        assert_eq!(directory_iri(Path::new("/tmp/x")), "file:///tmp/x/");
    }

    #[test]
    fn test_relative_with_spaces_is_escaped() {
        let abs = absolutize("my doc.nt", Some("file:///tmp/data/")).unwrap();
        assert_eq!(abs, "file:///tmp/data/my%20doc.nt");

        let nested = absolutize("sub dir/a{1}.ttl#top", Some("http://ex.org/")).unwrap();
        assert_eq!(nested, "http://ex.org/sub%20dir/a%7B1%7D.ttl#top");

        // Existing escapes are kept as they are
        let escaped = absolutize("my%20doc.nt", Some("http://ex.org/")).unwrap();
        assert_eq!(escaped, "http://ex.org/my%20doc.nt");
    }

    #[test]
    fn test_relative_with_spaces_against_working_directory() {
        let abs = absolutize("my doc.nt", None).unwrap();
        assert_eq!(abs, format!("{}my%20doc.nt", cwd_base().unwrap()));
    }

    #[test]
    fn test_invalid_base() {
        let err = absolutize("doc.ttl", Some("not a base")).unwrap_err();
        assert!(matches!(err, LocationError::Invalid { .. }));
    }
}
