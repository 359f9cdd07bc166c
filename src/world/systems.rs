use bevy::asset::RenderAssetUsages;
use bevy::mesh::Indices;
use bevy::prelude::*;
use bevy::render::render_resource::PrimitiveTopology;

use super::heightfield::Heightfield;

/// Builds the terrain mesh from the heightfield and spawns it.
pub fn spawn_terrain(
    mut commands: Commands,
    mut meshes: ResMut<Assets<Mesh>>,
    mut materials: ResMut<Assets<StandardMaterial>>,
    field: Res<Heightfield>,
) {
    let material = materials.add(StandardMaterial {
        base_color: Color::srgb(0.3, 0.45, 0.22),
        perceptual_roughness: 0.95,
        ..default()
    });
    commands.spawn((
        Name::new("Terrain"),
        Mesh3d(meshes.add(build_terrain_mesh(&field))),
        MeshMaterial3d(material),
        Transform::default(),
    ));
}

/// Spawns a single shadow-casting sun.
pub fn spawn_sun(mut commands: Commands) {
    commands.spawn((
        Name::new("Sun"),
        DirectionalLight {
            illuminance: 12_000.0,
            shadows_enabled: true,
            ..default()
        },
        Transform::from_xyz(40.0, 80.0, 20.0).looking_at(Vec3::ZERO, Vec3::Y),
    ));
}

// ── mesh construction ───────────────────────────────────────────────

fn build_terrain_mesh(field: &Heightfield) -> Mesh {
    let cells = field.cells();
    let side = cells + 1;
    let cell = field.size() / cells as f32;

    let mut positions = Vec::with_capacity((side * side) as usize);
    let mut normals = Vec::with_capacity((side * side) as usize);
    let mut uvs = Vec::with_capacity((side * side) as usize);
    for iz in 0..side {
        for ix in 0..side {
            let (x, z) = Heightfield::vertex_pos(field.size(), cells, ix, iz);
            positions.push([x, field.vertex_height(ix, iz), z]);
            normals.push(vertex_normal(field, ix, iz, cell).to_array());
            uvs.push([ix as f32 / cells as f32, iz as f32 / cells as f32]);
        }
    }

    let mut indices = Vec::with_capacity((cells * cells * 6) as usize);
    for iz in 0..cells {
        for ix in 0..cells {
            let i00 = iz * side + ix;
            let i10 = i00 + 1;
            let i01 = i00 + side;
            let i11 = i01 + 1;
            indices.extend_from_slice(&[i00, i01, i11, i00, i11, i10]);
        }
    }

    Mesh::new(
        PrimitiveTopology::TriangleList,
        RenderAssetUsages::RENDER_WORLD,
    )
    .with_inserted_attribute(Mesh::ATTRIBUTE_POSITION, positions)
    .with_inserted_attribute(Mesh::ATTRIBUTE_NORMAL, normals)
    .with_inserted_attribute(Mesh::ATTRIBUTE_UV_0, uvs)
    .with_inserted_indices(Indices::U32(indices))
}

/// Central-difference vertex normal; border vertices clamp to the edge.
fn vertex_normal(field: &Heightfield, ix: u32, iz: u32, cell: f32) -> Vec3 {
    let left = field.vertex_height(ix.saturating_sub(1), iz);
    let right = field.vertex_height(ix + 1, iz);
    let near = field.vertex_height(ix, iz.saturating_sub(1));
    let far = field.vertex_height(ix, iz + 1);
    Vec3::new(left - right, 2.0 * cell, near - far).normalize()
}
