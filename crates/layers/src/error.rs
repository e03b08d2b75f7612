// ---------------------------------------------------------------------------
// Error types for palettes, the layer registry and session manifests
// ---------------------------------------------------------------------------

use std::fmt;
use std::path::PathBuf;

/// A palette that cannot describe a gradient.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PaletteError {
    /// Fewer than two colors were supplied.
    TooFewColors { found: usize },
}

impl fmt::Display for PaletteError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PaletteError::TooFewColors { found } => {
                write!(f, "Palette needs at least 2 colors, found {found}")
            }
        }
    }
}

impl std::error::Error for PaletteError {}

/// Errors reported by `LayerRegistry` operations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LayerError {
    /// No layer is registered under this name.
    NotFound(String),
    /// A layer with this name was already registered this session.
    DuplicateName(String),
}

impl fmt::Display for LayerError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LayerError::NotFound(name) => write!(f, "No layer named '{name}'"),
            LayerError::DuplicateName(name) => {
                write!(f, "Layer '{name}' is already registered")
            }
        }
    }
}

impl std::error::Error for LayerError {}

/// Errors that stop a session manifest from loading.
///
/// Unreadable layer sources are not in here: they produce an empty layer.
#[derive(Debug)]
pub enum ManifestError {
    /// The manifest file itself could not be read.
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    /// The manifest is not valid JSON or does not match the schema.
    Parse(serde_json::Error),
    /// The configured palette is unusable.
    Palette(PaletteError),
    /// Two layers share a name.
    DuplicateLayer(String),
}

impl fmt::Display for ManifestError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ManifestError::Io { path, source } => {
                write!(f, "Cannot read manifest {}: {source}", path.display())
            }
            ManifestError::Parse(e) => write!(f, "Invalid manifest: {e}"),
            ManifestError::Palette(e) => write!(f, "Invalid palette: {e}"),
            ManifestError::DuplicateLayer(name) => {
                write!(f, "Duplicate layer name in manifest: '{name}'")
            }
        }
    }
}

impl std::error::Error for ManifestError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ManifestError::Io { source, .. } => Some(source),
            ManifestError::Parse(e) => Some(e),
            ManifestError::Palette(e) => Some(e),
            ManifestError::DuplicateLayer(_) => None,
        }
    }
}

impl From<serde_json::Error> for ManifestError {
    fn from(e: serde_json::Error) -> Self {
        ManifestError::Parse(e)
    }
}

impl From<PaletteError> for ManifestError {
    fn from(e: PaletteError) -> Self {
        ManifestError::Palette(e)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_layer_error_display_names_the_layer() {
        let msg = LayerError::NotFound("Schools".into()).to_string();
        assert!(msg.contains("Schools"), "got: {msg}");
    }

    #[test]
    fn test_palette_error_display_reports_count() {
        let msg = PaletteError::TooFewColors { found: 1 }.to_string();
        assert!(msg.contains("found 1"), "got: {msg}");
    }

    #[test]
    fn test_manifest_error_io_has_source() {
        let err = ManifestError::Io {
            path: PathBuf::from("missing.json"),
            source: std::io::Error::new(std::io::ErrorKind::NotFound, "gone"),
        };
        let msg = format!("{err}");
        assert!(msg.contains("missing.json"), "got: {msg}");
        assert!(std::error::Error::source(&err).is_some());
    }

    #[test]
    fn test_manifest_error_from_palette() {
        let err: ManifestError = PaletteError::TooFewColors { found: 0 }.into();
        assert!(matches!(err, ManifestError::Palette(_)));
    }

    #[test]
    fn test_manifest_error_from_json() {
        let json_err = serde_json::from_str::<serde_json::Value>("{").unwrap_err();
        let err: ManifestError = json_err.into();
        assert!(matches!(err, ManifestError::Parse(_)));
        assert!(err.to_string().starts_with("Invalid manifest"));
    }
}
