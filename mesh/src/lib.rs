mod obj;

use math::float::barycentric_lerp;
use math::hcm::{Point3, Vec2, Vec3};
use std::fmt::{Display, Formatter};
use std::path::PathBuf;

pub use obj::load_mesh;

/// Errors raised while reading or validating a mesh.
#[derive(Debug, thiserror::Error)]
pub enum MeshError {
    /// The mesh file could not be opened or read.
    #[error("cannot read mesh file {}: {source}", .path.display())]
    Load {
        path: PathBuf,
        source: std::io::Error,
    },
    /// The mesh content is malformed: bad records, non-triangular faces, indices out of range.
    #[error("malformed mesh {origin}: {reason}")]
    Parse { origin: String, reason: String },
}

impl MeshError {
    pub(crate) fn parse(origin: &str, reason: impl Into<String>) -> Self {
        MeshError::Parse {
            origin: origin.to_string(),
            reason: reason.into(),
        }
    }
}

/// Triangle mesh with separate index triples for positions, normals and texture coordinates, the
/// way Wavefront OBJ stores faces. All indices are 0-based.
///
/// `pos_tris` and `norm_tris` always have the same length. `uv_tris` has that length too, or is
/// empty if the mesh was loaded without texture coordinates (as the high-poly mesh is: it only
/// contributes geometry and normals).
#[derive(Debug, Clone, Default)]
pub struct Mesh {
    pub vertices: Vec<Point3>,
    pub normals: Vec<Vec3>,
    pub uvs: Vec<Vec2>,
    pub pos_tris: Vec<[usize; 3]>,
    pub norm_tris: Vec<[usize; 3]>,
    pub uv_tris: Vec<[usize; 3]>,
}

/// Corner attributes of one textured triangle, gathered from the mesh's index triples.
#[derive(Debug, Clone, Copy)]
pub struct Triangle {
    pub positions: (Point3, Point3, Point3),
    pub normals: (Vec3, Vec3, Vec3),
    pub uvs: (Vec2, Vec2, Vec2),
}

impl Mesh {
    /// Builds a mesh from its arrays. Normals are normalized; indices are checked against the
    /// arrays they point into.
    pub fn from_parts(
        vertices: Vec<Point3>, normals: Vec<Vec3>, uvs: Vec<Vec2>, pos_tris: Vec<[usize; 3]>,
        norm_tris: Vec<[usize; 3]>, uv_tris: Vec<[usize; 3]>,
    ) -> Result<Self, MeshError> {
        let mut mesh = Self {
            vertices,
            normals,
            uvs,
            pos_tris,
            norm_tris,
            uv_tris,
        };
        mesh.normalize_normals("<memory>")?;
        mesh.validate("<memory>")?;
        Ok(mesh)
    }

    pub fn num_triangles(&self) -> usize {
        self.pos_tris.len()
    }

    pub fn has_uvs(&self) -> bool {
        !self.uv_tris.is_empty() && self.uv_tris.len() == self.pos_tris.len()
    }

    /// Returns the corner attributes of triangle `index`.
    /// Panics if the mesh has no texture coordinates (see `has_uvs()`).
    pub fn triangle(&self, index: usize) -> Triangle {
        let [p0, p1, p2] = self.pos_tris[index];
        let [n0, n1, n2] = self.norm_tris[index];
        let [t0, t1, t2] = self.uv_tris[index];
        Triangle {
            positions: (self.vertices[p0], self.vertices[p1], self.vertices[p2]),
            normals: (self.normals[n0], self.normals[n1], self.normals[n2]),
            uvs: (self.uvs[t0], self.uvs[t1], self.uvs[t2]),
        }
    }

    pub fn triangle_positions(&self, index: usize) -> (Point3, Point3, Point3) {
        let [i, j, k] = self.pos_tris[index];
        (self.vertices[i], self.vertices[j], self.vertices[k])
    }

    /// Interpolates the vertex normals of triangle `primitive` at a ray hit with barycentric
    /// coordinates `(u, v)`, where the hit point is `p0 + u * (p1 - p0) + v * (p2 - p0)`.
    /// Returns `None` for an out-of-range primitive or if the normals cancel out.
    pub fn interpolated_normal(&self, primitive: usize, u: f32, v: f32) -> Option<Vec3> {
        let [i, j, k] = *self.norm_tris.get(primitive)?;
        let normals = (self.normals[i], self.normals[j], self.normals[k]);
        barycentric_lerp(normals, (1.0 - u - v, u, v)).try_hat()
    }

    pub(crate) fn normalize_normals(&mut self, origin: &str) -> Result<(), MeshError> {
        for (index, normal) in self.normals.iter_mut().enumerate() {
            let unit = normal.try_hat().ok_or_else(|| {
                MeshError::parse(origin, format!("normal {} ({}) has no direction", index, normal))
            })?;
            *normal = unit;
        }
        Ok(())
    }

    pub(crate) fn validate(&self, origin: &str) -> Result<(), MeshError> {
        if self.norm_tris.len() != self.pos_tris.len() {
            return Err(MeshError::parse(
                origin,
                format!(
                    "{} triangles but {} normal index triples",
                    self.pos_tris.len(),
                    self.norm_tris.len()
                ),
            ));
        }
        if !self.uv_tris.is_empty() && self.uv_tris.len() != self.pos_tris.len() {
            return Err(MeshError::parse(
                origin,
                format!(
                    "{} triangles but {} uv index triples",
                    self.pos_tris.len(),
                    self.uv_tris.len()
                ),
            ));
        }
        check_indices(origin, "position", &self.pos_tris, self.vertices.len())?;
        check_indices(origin, "normal", &self.norm_tris, self.normals.len())?;
        check_indices(origin, "uv", &self.uv_tris, self.uvs.len())?;
        if let Some(i) = self.vertices.iter().position(|p| p.has_nan()) {
            return Err(MeshError::parse(origin, format!("vertex {} is NaN", i)));
        }
        if let Some(i) = self.uvs.iter().position(|uv| uv.has_nan()) {
            return Err(MeshError::parse(origin, format!("uv {} is NaN", i)));
        }
        Ok(())
    }
}

fn check_indices(
    origin: &str, what: &str, tris: &[[usize; 3]], len: usize,
) -> Result<(), MeshError> {
    for (t, tri) in tris.iter().enumerate() {
        if let Some(index) = tri.iter().find(|&&i| i >= len) {
            return Err(MeshError::parse(
                origin,
                format!(
                    "triangle {} refers to {} {} but there are only {}",
                    t, what, index, len
                ),
            ));
        }
    }
    Ok(())
}

impl Display for Mesh {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Mesh{{{} triangles, {} vertices, {} normals, {} uvs}}",
            self.num_triangles(),
            self.vertices.len(),
            self.normals.len(),
            self.uvs.len()
        )
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use math::hcm::{point3, vec2, vec3};

    fn single_triangle() -> Mesh {
        Mesh::from_parts(
            vec![point3(0.0, 0.0, 0.0), point3(1.0, 0.0, 0.0), point3(0.0, 1.0, 0.0)],
            vec![vec3(0.0, 0.0, 2.0), vec3(1.0, 0.0, 1.0)],
            vec![vec2(0.0, 0.0), vec2(1.0, 0.0), vec2(0.0, 1.0)],
            vec![[0, 1, 2]],
            vec![[0, 0, 1]],
            vec![[0, 1, 2]],
        )
        .unwrap()
    }

    #[test]
    fn normals_are_normalized() {
        let mesh = single_triangle();
        assert_eq!(mesh.normals[0], Vec3::Z);
        assert!((mesh.normals[1].norm() - 1.0).abs() < 1e-6);
    }

    #[test]
    fn interpolated_normal_follows_hit_convention() {
        let mesh = single_triangle();
        // (u, v) = (0, 0) is the first corner, v = 1 is the third.
        math::assert_close!(mesh.interpolated_normal(0, 0.0, 0.0).unwrap(), Vec3::Z);
        math::assert_close!(
            mesh.interpolated_normal(0, 0.0, 1.0).unwrap(),
            vec3(1.0, 0.0, 1.0).hat()
        );
        assert!(mesh.interpolated_normal(1, 0.0, 0.0).is_none());
    }

    #[test]
    fn rejects_out_of_range_index() {
        let result = Mesh::from_parts(
            vec![point3(0.0, 0.0, 0.0); 3],
            vec![Vec3::Z],
            vec![],
            vec![[0, 1, 3]],
            vec![[0, 0, 0]],
            vec![],
        );
        assert!(matches!(result, Err(MeshError::Parse { .. })));
    }

    #[test]
    fn rejects_zero_normal() {
        let result = Mesh::from_parts(
            vec![point3(0.0, 0.0, 0.0); 3],
            vec![Vec3::ZERO],
            vec![],
            vec![[0, 1, 2]],
            vec![[0, 0, 0]],
            vec![],
        );
        assert!(matches!(result, Err(MeshError::Parse { .. })));
    }
}
