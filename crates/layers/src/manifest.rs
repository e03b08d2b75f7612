//! Session manifest: which layers to show, where their data lives and how
//! they are colored.
//!
//! ```json
//! { "palette": ["maroon", "gold", "darkgreen"], "legend": true,
//!   "layers": [{ "name": "Schools", "kind": "point", "source": "schools.geojson",
//!                "color": "#1f78b4" }] }
//! ```
//!
//! Layer sources are resolved against the manifest's directory. A source that
//! cannot be read becomes an empty layer; only problems with the manifest
//! itself are errors.

use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};

use bevy::prelude::*;
use geojson::{Feature, FeatureCollection, GeoJson};
use serde::Deserialize;

use crate::color::Color;
use crate::config::DEFAULT_SCORE_PROPERTY;
use crate::descriptor::{empty_collection, ColorSource, FeatureColor, GeometryKind, LayerDescriptor};
use crate::error::ManifestError;
use crate::palette::Palette;
use crate::{LayerBatch, SessionConfig};

#[derive(Debug, Deserialize)]
struct ManifestFile {
    #[serde(default)]
    palette: Option<Vec<String>>,
    #[serde(default = "default_legend")]
    legend: bool,
    layers: Vec<LayerEntry>,
}

fn default_legend() -> bool {
    true
}

fn default_score_property() -> String {
    DEFAULT_SCORE_PROPERTY.to_string()
}

#[derive(Debug, Deserialize)]
struct LayerEntry {
    name: String,
    kind: GeometryKind,
    source: PathBuf,
    #[serde(default)]
    color: Option<ColorEntry>,
    #[serde(default)]
    fill_color: Option<Color>,
    #[serde(default)]
    fill_opacity: Option<f32>,
    #[serde(default)]
    point_size: Option<f32>,
    #[serde(default)]
    visible: Option<bool>,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum ColorEntry {
    Static(Color),
    Scalar {
        #[serde(default = "default_score_property")]
        property: String,
        #[serde(default)]
        fallback: Option<Color>,
    },
}

/// A loaded session, ready to be inserted into the app.
#[derive(Debug)]
pub struct Session {
    pub config: SessionConfig,
    pub batch: LayerBatch,
}

impl Session {
    pub fn insert_into(self, app: &mut App) {
        app.insert_resource(self.config).insert_resource(self.batch);
    }
}

/// Read and resolve the manifest at `path`.
pub fn load_session(path: &Path) -> Result<Session, ManifestError> {
    let text = fs::read_to_string(path).map_err(|source| ManifestError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let base = path.parent().unwrap_or_else(|| Path::new("."));
    parse_session(&text, base)
}

/// Resolve manifest JSON whose sources are relative to `base`.
pub fn parse_session(json: &str, base: &Path) -> Result<Session, ManifestError> {
    let manifest: ManifestFile = serde_json::from_str(json)?;
    let palette = match &manifest.palette {
        Some(names) => Palette::from_names(names)?,
        None => Palette::accessibility(),
    };

    let mut seen = HashSet::new();
    if let Some(dup) = manifest.layers.iter().find(|l| !seen.insert(l.name.as_str())) {
        return Err(ManifestError::DuplicateLayer(dup.name.clone()));
    }

    let descriptors = manifest
        .layers
        .into_iter()
        .map(|entry| {
            let features = load_features(&base.join(&entry.source), &entry.name);
            descriptor_from_entry(entry, features, &palette)
        })
        .collect();

    Ok(Session {
        config: SessionConfig {
            palette,
            legend_enabled: manifest.legend,
        },
        batch: LayerBatch(descriptors),
    })
}

fn descriptor_from_entry(
    entry: LayerEntry,
    features: FeatureCollection,
    palette: &Palette,
) -> LayerDescriptor {
    let color = entry.color.map(|c| match c {
        ColorEntry::Static(color) => ColorSource::Static(color),
        ColorEntry::Scalar { property, fallback } => ColorSource::PerFeature {
            color: FeatureColor::scalar(property, palette.clone()),
            fallback,
        },
    });
    LayerDescriptor {
        name: entry.name,
        kind: entry.kind,
        features,
        color,
        fill_color: entry.fill_color,
        fill_opacity: entry.fill_opacity,
        point_size: entry.point_size,
        visible: entry.visible,
    }
}

/// Features of a layer source; empty, with a warning, when unusable.
fn load_features(path: &Path, layer: &str) -> FeatureCollection {
    let text = match fs::read_to_string(path) {
        Ok(text) => text,
        Err(e) => {
            warn!("Layer '{layer}': cannot read {}: {e}", path.display());
            return empty_collection();
        }
    };
    match text.parse::<GeoJson>() {
        Ok(GeoJson::FeatureCollection(fc)) => fc,
        Ok(GeoJson::Feature(feature)) => single(feature),
        Ok(GeoJson::Geometry(geometry)) => single(Feature::from(geometry)),
        Err(e) => {
            warn!("Layer '{layer}': invalid GeoJSON in {}: {e}", path.display());
            empty_collection()
        }
    }
}

fn single(feature: Feature) -> FeatureCollection {
    FeatureCollection {
        bbox: None,
        features: vec![feature],
        foreign_members: None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::color_scale::color_for;
    use std::io::Write;

    const SCHOOLS: &str = r#"{"type": "FeatureCollection", "features": [
        {"type": "Feature", "geometry": {"type": "Point", "coordinates": [23.32, 42.69]},
         "properties": {"name": "School 1", "accessibility_index": 75}}]}"#;

    fn write(dir: &Path, name: &str, contents: &str) -> PathBuf {
        let path = dir.join(name);
        let mut file = fs::File::create(&path).unwrap();
        file.write_all(contents.as_bytes()).unwrap();
        path
    }

    #[test]
    fn loads_layers_relative_to_manifest() {
        let dir = tempfile::tempdir().unwrap();
        write(dir.path(), "schools.geojson", SCHOOLS);
        let manifest = write(
            dir.path(),
            "session.json",
            r##"{"layers": [{"name": "Schools", "kind": "point",
                "source": "schools.geojson", "color": "#1f78b4", "point_size": 8}]}"##,
        );
        let session = load_session(&manifest).unwrap();
        assert!(session.config.legend_enabled);
        assert_eq!(session.config.palette, Palette::accessibility());
        let d = &session.batch.0[0];
        assert_eq!(d.name, "Schools");
        assert_eq!(d.kind, GeometryKind::Point);
        assert_eq!(d.features.features.len(), 1);
        assert_eq!(d.point_size, Some(8.0));
        assert!(d.initially_visible());
    }

    #[test]
    fn scalar_color_uses_session_palette() {
        let dir = tempfile::tempdir().unwrap();
        write(dir.path(), "schools.geojson", SCHOOLS);
        let session = parse_session(
            r#"{"palette": ["white", "black"], "legend": false,
                "layers": [{"name": "Schools", "kind": "point", "source": "schools.geojson",
                "color": {"property": "accessibility_index", "fallback": "gray"}}]}"#,
            dir.path(),
        )
        .unwrap();
        assert!(!session.config.legend_enabled);
        let d = &session.batch.0[0];
        assert!(d.is_scalar());
        let Some(ColorSource::PerFeature { color, fallback }) = &d.color else {
            panic!("expected a per-feature color");
        };
        assert_eq!(fallback, &Some(Color::parse("gray")));
        let palette = Palette::from_names(&["white", "black"]).unwrap();
        assert_eq!(
            color.eval(&d.features.features[0]),
            Some(color_for(75.0, &palette))
        );
    }

    #[test]
    fn missing_source_yields_empty_layer() {
        let dir = tempfile::tempdir().unwrap();
        let session = parse_session(
            r#"{"layers": [{"name": "Ghost", "kind": "line", "source": "nowhere.geojson"}]}"#,
            dir.path(),
        )
        .unwrap();
        assert!(session.batch.0[0].features.features.is_empty());
    }

    #[test]
    fn malformed_source_yields_empty_layer() {
        let dir = tempfile::tempdir().unwrap();
        write(dir.path(), "broken.geojson", "{ not json");
        let session = parse_session(
            r#"{"layers": [{"name": "Broken", "kind": "polygon", "source": "broken.geojson"}]}"#,
            dir.path(),
        )
        .unwrap();
        assert!(session.batch.0[0].features.features.is_empty());
    }

    #[test]
    fn bare_geometry_is_wrapped() {
        let dir = tempfile::tempdir().unwrap();
        write(
            dir.path(),
            "stop.geojson",
            r#"{"type": "Point", "coordinates": [23.3, 42.7]}"#,
        );
        let session = parse_session(
            r#"{"layers": [{"name": "Stop", "kind": "point", "source": "stop.geojson"}]}"#,
            dir.path(),
        )
        .unwrap();
        let features = &session.batch.0[0].features.features;
        assert_eq!(features.len(), 1);
        assert!(features[0].geometry.is_some());
    }

    #[test]
    fn duplicate_layer_names_are_rejected() {
        let err = parse_session(
            r#"{"layers": [
                {"name": "Schools", "kind": "point", "source": "a.geojson"},
                {"name": "Schools", "kind": "point", "source": "b.geojson"}]}"#,
            Path::new("."),
        )
        .unwrap_err();
        assert!(matches!(err, ManifestError::DuplicateLayer(name) if name == "Schools"));
    }

    #[test]
    fn short_palette_is_rejected() {
        let err = parse_session(r#"{"palette": ["red"], "layers": []}"#, Path::new(".")).unwrap_err();
        assert!(matches!(err, ManifestError::Palette(_)));
    }

    #[test]
    fn unknown_kind_is_a_parse_error() {
        let err = parse_session(
            r#"{"layers": [{"name": "X", "kind": "raster", "source": "x.tif"}]}"#,
            Path::new("."),
        )
        .unwrap_err();
        assert!(matches!(err, ManifestError::Parse(_)));
    }

    #[test]
    fn missing_manifest_is_an_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = load_session(&dir.path().join("absent.json")).unwrap_err();
        assert!(matches!(err, ManifestError::Io { .. }));
    }

    #[test]
    fn bundled_demo_session_loads() {
        let path = Path::new(env!("CARGO_MANIFEST_DIR")).join("../app/assets/demo/manifest.json");
        let session = load_session(&path).unwrap();
        let names: Vec<&str> = session.batch.0.iter().map(|d| d.name.as_str()).collect();
        assert_eq!(names, ["Urban Planning Units", "Pedestrian Network", "Schools"]);
        assert!(session.batch.0.iter().all(|d| !d.features.features.is_empty()));
        assert!(session.config.legend_enabled);
    }

    #[test]
    fn scalar_color_defaults_to_accessibility_index() {
        let session = parse_session(
            r#"{"layers": [{"name": "Units", "kind": "polygon", "source": "absent.geojson",
                "color": {"fallback": "gray"}}]}"#,
            Path::new("."),
        )
        .unwrap();
        let Some(ColorSource::PerFeature { color, fallback }) = &session.batch.0[0].color else {
            panic!("expected a per-feature color");
        };
        assert_eq!(color.scalar_property(), Some("accessibility_index"));
        assert_eq!(fallback, &Some(Color::parse("gray")));
    }
}
