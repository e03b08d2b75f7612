//! Fill meshes for registered layers.
//!
//! Each layer gets one root entity whose `Visibility` mirrors the registry.
//! Polygon fills are baked into a single vertex-colored mesh per layer; point
//! markers are unit circles scaled to a constant on-screen radius.

use std::collections::HashMap;

use bevy::prelude::*;
use bevy::render::mesh::{Indices, PrimitiveTopology};
use bevy::render::render_asset::RenderAssetUsages;
use bevy::sprite::AlphaMode2d;

use layers::geometry::Shape;
use layers::layer_factory::{Fill, RenderedLayer};
use layers::registry::LayerRegistry;
use layers::viewport::MapViewport;

use crate::triangulate::triangulate;

/// Depth between consecutive layers; later layers draw on top.
const LAYER_Z_STEP: f32 = 1.0;
const MARKER_Z: f32 = 0.5;

#[derive(Component, Debug)]
pub struct MapLayer {
    pub name: String,
}

/// A point marker; `radius` is in pixels.
#[derive(Component, Debug)]
pub struct Marker {
    pub radius: f32,
}

pub fn spawn_layers(
    mut commands: Commands,
    registry: Res<LayerRegistry>,
    viewport: Res<MapViewport>,
    mut meshes: ResMut<Assets<Mesh>>,
    mut materials: ResMut<Assets<ColorMaterial>>,
) {
    let fill_material = materials.add(ColorMaterial {
        color: Color::WHITE,
        alpha_mode: AlphaMode2d::Blend,
        ..default()
    });
    let unit_circle = meshes.add(Circle::new(1.0));
    let mut marker_materials: HashMap<[u8; 4], Handle<ColorMaterial>> = HashMap::new();

    for (index, (layer, visible)) in registry.iter().enumerate() {
        let root = commands
            .spawn((
                MapLayer {
                    name: layer.name.clone(),
                },
                Transform::from_xyz(0.0, 0.0, index as f32 * LAYER_Z_STEP),
                if visible {
                    Visibility::Inherited
                } else {
                    Visibility::Hidden
                },
            ))
            .id();

        if let Some(mesh) = fill_mesh(layer) {
            let fill = commands
                .spawn((
                    Mesh2d(meshes.add(mesh)),
                    MeshMaterial2d(fill_material.clone()),
                    Transform::default(),
                ))
                .id();
            commands.entity(root).add_child(fill);
        }

        for feature in &layer.features {
            let Some(fill) = &feature.style.fill else {
                continue;
            };
            let radius = feature.style.radius;
            for shape in &feature.shapes {
                let Shape::Point(p) = shape else {
                    continue;
                };
                let material = marker_materials
                    .entry(material_key(fill))
                    .or_insert_with(|| {
                        materials.add(ColorMaterial {
                            color: fill.color.rgb_or_fallback().to_bevy(fill.opacity),
                            alpha_mode: AlphaMode2d::Blend,
                            ..default()
                        })
                    })
                    .clone();
                let marker = commands
                    .spawn((
                        Marker { radius },
                        Mesh2d(unit_circle.clone()),
                        MeshMaterial2d(material),
                        Transform::from_translation(p.extend(MARKER_Z))
                            .with_scale(Vec3::splat(radius * viewport.scale)),
                    ))
                    .id();
                commands.entity(root).add_child(marker);
            }
        }
    }
    info!("Spawned {} map layer(s)", registry.len());
}

fn material_key(fill: &Fill) -> [u8; 4] {
    let rgb = fill.color.rgb_or_fallback();
    [rgb.r, rgb.g, rgb.b, (fill.opacity.clamp(0.0, 1.0) * 255.0).round() as u8]
}

/// All polygon fills of `layer` in one mesh, or `None` if it has none.
pub fn fill_mesh(layer: &RenderedLayer) -> Option<Mesh> {
    let mut positions: Vec<[f32; 3]> = Vec::new();
    let mut colors: Vec<[f32; 4]> = Vec::new();

    for feature in &layer.features {
        let Some(fill) = &feature.style.fill else {
            continue;
        };
        let linear = fill.color.rgb_or_fallback().to_bevy(fill.opacity).to_linear();
        let color = [linear.red, linear.green, linear.blue, linear.alpha];
        for shape in &feature.shapes {
            let Shape::Polygon(rings) = shape else {
                continue;
            };
            for p in triangulate(rings) {
                positions.push([p.x, p.y, 0.0]);
                colors.push(color);
            }
        }
    }

    if positions.is_empty() {
        return None;
    }
    let indices = (0..positions.len() as u32).collect();
    Some(
        Mesh::new(
            PrimitiveTopology::TriangleList,
            RenderAssetUsages::RENDER_WORLD | RenderAssetUsages::MAIN_WORLD,
        )
        .with_inserted_attribute(Mesh::ATTRIBUTE_POSITION, positions)
        .with_inserted_attribute(Mesh::ATTRIBUTE_COLOR, colors)
        .with_inserted_indices(Indices::U32(indices)),
    )
}

/// Show or hide layer roots after toggles.
pub fn sync_layer_visibility(
    registry: Res<LayerRegistry>,
    mut query: Query<(&MapLayer, &mut Visibility)>,
) {
    if !registry.is_changed() {
        return;
    }
    for (layer, mut visibility) in &mut query {
        let target = if registry.is_visible(&layer.name).unwrap_or(false) {
            Visibility::Inherited
        } else {
            Visibility::Hidden
        };
        visibility.set_if_neq(target);
    }
}

/// Keep markers at a constant on-screen radius.
pub fn scale_markers(viewport: Res<MapViewport>, mut query: Query<(&Marker, &mut Transform)>) {
    if !viewport.is_changed() {
        return;
    }
    for (marker, mut transform) in &mut query {
        transform.scale = Vec3::splat(marker.radius * viewport.scale);
    }
}
