use bevy::prelude::*;
use bevy::render::mesh::PrimitiveTopology;
use bevy::render::render_asset::RenderAssetUsages;

use crate::data::IndexedStar;
use crate::render::StarRenderer;
use crate::stars::projection::project;

#[derive(Clone, Debug)]
pub struct PointCloudSettings {
    /// Point size that maps to full brightness.
    pub reference_size: f32,
    pub min_brightness: f32,
}

impl Default for PointCloudSettings {
    fn default() -> Self {
        Self {
            reference_size: 4.0,
            min_brightness: 0.08,
        }
    }
}

/// Marker + data for the star cloud entity.
#[derive(Component)]
pub struct StarCloud {
    pub star_count: usize,
}

/// Additive, unlit point list with one vertex per star. Points are one pixel
/// wide; a star's projected size only sets its brightness.
#[derive(Default)]
pub struct PointCloudRenderer {
    pub settings: PointCloudSettings,
}

impl StarRenderer for PointCloudRenderer {
    fn spawn_cloud(
        &self,
        commands: &mut Commands,
        meshes: &mut Assets<Mesh>,
        materials: &mut Assets<StandardMaterial>,
        stars: &[IndexedStar<'_>],
    ) -> Option<Entity> {
        if stars.is_empty() {
            return None;
        }

        let material = materials.add(StandardMaterial {
            base_color: Color::WHITE,
            unlit: true,
            alpha_mode: AlphaMode::Add,
            ..default()
        });

        let entity = commands
            .spawn((
                Mesh3d(meshes.add(star_cloud_mesh(stars, &self.settings))),
                MeshMaterial3d(material),
                Transform::default(),
                Visibility::Visible,
                StarCloud {
                    star_count: stars.len(),
                },
            ))
            .id();

        info!("created star system with {} stars", stars.len());
        Some(entity)
    }
}

/// Project every star into a point-list mesh. Jitter is seeded from the
/// catalog index, so a star lands in the same place whatever subset is drawn.
pub fn star_cloud_mesh(stars: &[IndexedStar<'_>], settings: &PointCloudSettings) -> Mesh {
    let mut positions = Vec::with_capacity(stars.len());
    let mut colors = Vec::with_capacity(stars.len());

    for &(i, star) in stars {
        let projected = project(i, star.lon(), star.lat(), star.magnitude, star.color_index);
        let brightness = (projected.size / settings.reference_size)
            .clamp(settings.min_brightness, 1.0);
        let [r, g, b] = projected.color;
        positions.push(projected.position);
        colors.push([r * brightness, g * brightness, b * brightness, 1.0]);
    }

    Mesh::new(PrimitiveTopology::PointList, RenderAssetUsages::default())
        .with_inserted_attribute(Mesh::ATTRIBUTE_POSITION, positions)
        .with_inserted_attribute(Mesh::ATTRIBUTE_COLOR, colors)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::{StarId, StarRecord};

    fn indexed(records: &[StarRecord]) -> Vec<IndexedStar<'_>> {
        records.iter().enumerate().collect()
    }

    fn positions(mesh: &Mesh) -> Vec<[f32; 3]> {
        match mesh.attribute(Mesh::ATTRIBUTE_POSITION) {
            Some(bevy::render::mesh::VertexAttributeValues::Float32x3(p)) => p.clone(),
            _ => panic!("expected xyz positions"),
        }
    }

    fn record(id: u64, mag: f64) -> StarRecord {
        StarRecord {
            id: StarId::Number(id),
            coordinates: [id as f64 * 10.0, 5.0],
            magnitude: mag,
            color_index: 0.6,
        }
    }

    #[test]
    fn mesh_has_one_vertex_per_star() {
        let records: Vec<_> = (0..25).map(|i| record(i, 3.0)).collect();

        let mesh = star_cloud_mesh(&indexed(&records), &PointCloudSettings::default());

        assert_eq!(mesh.count_vertices(), 25);
        assert_eq!(mesh.primitive_topology(), PrimitiveTopology::PointList);
    }

    #[test]
    fn faint_stars_keep_a_minimum_brightness() {
        let settings = PointCloudSettings::default();
        let records = vec![record(1, -1.0), record(2, 9.0)];

        let mesh = star_cloud_mesh(&indexed(&records), &settings);
        let Some(bevy::render::mesh::VertexAttributeValues::Float32x4(colors)) =
            mesh.attribute(Mesh::ATTRIBUTE_COLOR)
        else {
            panic!("expected rgba vertex colors");
        };

        assert!(colors[0][0] > colors[1][0]);
        assert!(colors[1][0] > 0.0);
        assert!(colors.iter().all(|c| c[3] == 1.0));
    }

    #[test]
    fn subset_keeps_each_star_in_place() {
        let records: Vec<_> = (0..6).map(|i| record(i, if i % 2 == 0 { 8.0 } else { 3.0 })).collect();
        let settings = PointCloudSettings::default();

        let full = positions(&star_cloud_mesh(&indexed(&records), &settings));
        let bright = crate::data::filter_by_magnitude(&records, -2.0, 6.0);
        let subset = positions(&star_cloud_mesh(&bright, &settings));

        assert_eq!(subset.len(), 3);
        assert_eq!(subset, vec![full[1], full[3], full[5]]);
    }
}
