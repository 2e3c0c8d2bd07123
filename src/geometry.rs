//! Built-in CPU geometry.
//!
//! Loading geometry from files is the host's business. These are the two cubes
//! the demo draws, one per vertex layout, both unit-sized, centred on the
//! origin, and wound counter-clockwise.

use crate::flat::PositionVertex;
use crate::normals::PositionNormalVertex;

/// Vertices and `u32` triangle indices, ready for upload.
#[derive(Clone, Debug, PartialEq)]
pub struct Geometry<V> {
    pub vertices: Vec<V>,
    pub indices: Vec<u32>,
}

impl<V> Geometry<V> {
    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }

    /// Corners of each triangle, in index order.
    pub fn triangles(&self) -> impl Iterator<Item = [&V; 3]> {
        self.indices.chunks_exact(3).map(|t| {
            [
                &self.vertices[t[0] as usize],
                &self.vertices[t[1] as usize],
                &self.vertices[t[2] as usize],
            ]
        })
    }
}

/// A cube made of its 8 shared corners. Enough for the flat pipeline, which
/// has no use for normals.
pub fn cube_positions() -> Geometry<PositionVertex> {
    #[rustfmt::skip]
    let corners: [[f32; 3]; 8] = [
        [-0.5, -0.5, -0.5], // 0
        [ 0.5, -0.5, -0.5], // 1
        [-0.5,  0.5, -0.5], // 2
        [ 0.5,  0.5, -0.5], // 3
        [-0.5, -0.5,  0.5], // 4
        [ 0.5, -0.5,  0.5], // 5
        [-0.5,  0.5,  0.5], // 6
        [ 0.5,  0.5,  0.5], // 7
    ];

    #[rustfmt::skip]
    let indices = vec![
        0, 4, 6,  0, 6, 2, // left
        1, 3, 7,  1, 7, 5, // right
        0, 1, 5,  0, 5, 4, // bottom
        2, 6, 7,  2, 7, 3, // top
        0, 2, 3,  0, 3, 1, // back
        4, 5, 7,  4, 7, 6, // front
    ];

    Geometry {
        vertices: corners.into_iter().map(PositionVertex::new).collect(),
        indices,
    }
}

/// A cube with 4 vertices per face so every face carries its own normal.
pub fn cube_with_normals() -> Geometry<PositionNormalVertex> {
    #[rustfmt::skip]
    let vertices = vec![
        // Front face (Z+)
        PositionNormalVertex::new([-0.5, -0.5,  0.5], [ 0.0,  0.0,  1.0]),
        PositionNormalVertex::new([ 0.5, -0.5,  0.5], [ 0.0,  0.0,  1.0]),
        PositionNormalVertex::new([ 0.5,  0.5,  0.5], [ 0.0,  0.0,  1.0]),
        PositionNormalVertex::new([-0.5,  0.5,  0.5], [ 0.0,  0.0,  1.0]),
        // Back face (Z-)
        PositionNormalVertex::new([ 0.5, -0.5, -0.5], [ 0.0,  0.0, -1.0]),
        PositionNormalVertex::new([-0.5, -0.5, -0.5], [ 0.0,  0.0, -1.0]),
        PositionNormalVertex::new([-0.5,  0.5, -0.5], [ 0.0,  0.0, -1.0]),
        PositionNormalVertex::new([ 0.5,  0.5, -0.5], [ 0.0,  0.0, -1.0]),
        // Top face (Y+)
        PositionNormalVertex::new([-0.5,  0.5,  0.5], [ 0.0,  1.0,  0.0]),
        PositionNormalVertex::new([ 0.5,  0.5,  0.5], [ 0.0,  1.0,  0.0]),
        PositionNormalVertex::new([ 0.5,  0.5, -0.5], [ 0.0,  1.0,  0.0]),
        PositionNormalVertex::new([-0.5,  0.5, -0.5], [ 0.0,  1.0,  0.0]),
        // Bottom face (Y-)
        PositionNormalVertex::new([-0.5, -0.5, -0.5], [ 0.0, -1.0,  0.0]),
        PositionNormalVertex::new([ 0.5, -0.5, -0.5], [ 0.0, -1.0,  0.0]),
        PositionNormalVertex::new([ 0.5, -0.5,  0.5], [ 0.0, -1.0,  0.0]),
        PositionNormalVertex::new([-0.5, -0.5,  0.5], [ 0.0, -1.0,  0.0]),
        // Right face (X+)
        PositionNormalVertex::new([ 0.5, -0.5,  0.5], [ 1.0,  0.0,  0.0]),
        PositionNormalVertex::new([ 0.5, -0.5, -0.5], [ 1.0,  0.0,  0.0]),
        PositionNormalVertex::new([ 0.5,  0.5, -0.5], [ 1.0,  0.0,  0.0]),
        PositionNormalVertex::new([ 0.5,  0.5,  0.5], [ 1.0,  0.0,  0.0]),
        // Left face (X-)
        PositionNormalVertex::new([-0.5, -0.5, -0.5], [-1.0,  0.0,  0.0]),
        PositionNormalVertex::new([-0.5, -0.5,  0.5], [-1.0,  0.0,  0.0]),
        PositionNormalVertex::new([-0.5,  0.5,  0.5], [-1.0,  0.0,  0.0]),
        PositionNormalVertex::new([-0.5,  0.5, -0.5], [-1.0,  0.0,  0.0]),
    ];

    #[rustfmt::skip]
    let indices = vec![
        0,  1,  2,  2,  3,  0,  // front
        4,  5,  6,  6,  7,  4,  // back
        8,  9,  10, 10, 11, 8,  // top
        12, 13, 14, 14, 15, 12, // bottom
        16, 17, 18, 18, 19, 16, // right
        20, 21, 22, 22, 23, 20, // left
    ];

    Geometry { vertices, indices }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::Vec3;

    fn face_normal(a: [f32; 3], b: [f32; 3], c: [f32; 3]) -> Vec3 {
        let (a, b, c) = (Vec3::from(a), Vec3::from(b), Vec3::from(c));
        (b - a).cross(c - a).normalize()
    }

    #[test]
    fn both_cubes_have_twelve_triangles() {
        assert_eq!(cube_positions().triangle_count(), 12);
        assert_eq!(cube_with_normals().triangle_count(), 12);
        assert_eq!(cube_positions().vertices.len(), 8);
        assert_eq!(cube_with_normals().vertices.len(), 24);
    }

    #[test]
    fn indices_are_in_range() {
        let flat = cube_positions();
        assert!(flat.indices.iter().all(|&i| (i as usize) < flat.vertices.len()));
        let lit = cube_with_normals();
        assert!(lit.indices.iter().all(|&i| (i as usize) < lit.vertices.len()));
    }

    #[test]
    fn winding_agrees_with_stored_normals() {
        for [a, b, c] in cube_with_normals().triangles() {
            let n = face_normal(a.position, b.position, c.position);
            assert!(n.dot(Vec3::from(a.normal)) > 0.99);
        }
    }

    #[test]
    fn position_cube_faces_point_outward() {
        for [a, b, c] in cube_positions().triangles() {
            let n = face_normal(a.position, b.position, c.position);
            let centroid = (Vec3::from(a.position) + Vec3::from(b.position) + Vec3::from(c.position)) / 3.0;
            assert!(n.dot(centroid) > 0.0);
        }
    }
}
