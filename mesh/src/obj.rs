//! Wavefront OBJ loading on top of `tobj`.
//!
//! Faces are read in multi-index mode so that position, normal and texture-coordinate indices stay
//! independent, as they are in the file. Every face must be a triangle with a normal index on each
//! corner; the low-poly mesh also needs texture coordinates.

use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use math::hcm::{point3, vec2, vec3};

use crate::{Mesh, MeshError};

/// Loads the OBJ file at `path`. With `load_uv == false` texture coordinates are not read and the
/// mesh's `uv_tris` stays empty.
pub fn load_mesh<P: AsRef<Path>>(path: P, load_uv: bool) -> Result<Mesh, MeshError> {
    let path = path.as_ref();
    let file = File::open(path).map_err(|source| MeshError::Load {
        path: path.to_path_buf(),
        source,
    })?;
    let mut reader = BufReader::new(file);
    let mesh = Mesh::from_obj_reader(&mut reader, load_uv, &path.display().to_string())?;
    log::info!("Loaded {} from {}", mesh, path.display());
    Ok(mesh)
}

impl Mesh {
    /// Parses OBJ text from `reader`. `origin` names the source in error messages.
    pub fn from_obj_reader<R: BufRead>(
        reader: &mut R, load_uv: bool, origin: &str,
    ) -> Result<Self, MeshError> {
        let options = tobj::LoadOptions {
            single_index: false,
            triangulate: false,
            ignore_points: true,
            ignore_lines: true,
            ..Default::default()
        };
        // Materials are irrelevant to baking; `mtllib` statements are ignored.
        let (models, _) = tobj::load_obj_buf(reader, &options, |_| {
            Err(tobj::LoadError::OpenFileFailed)
        })
        .map_err(|e| match e {
            tobj::LoadError::ReadError => MeshError::Load {
                path: origin.into(),
                source: std::io::Error::new(std::io::ErrorKind::Other, e),
            },
            _ => MeshError::parse(origin, e.to_string()),
        })?;

        let mut mesh = Mesh::default();
        for model in models.iter() {
            append_model(&mut mesh, model, load_uv, origin)?;
        }
        if mesh.pos_tris.is_empty() {
            return Err(MeshError::parse(origin, "no triangles"));
        }
        mesh.normalize_normals(origin)?;
        mesh.validate(origin)?;
        Ok(mesh)
    }
}

/// Appends one OBJ object to `mesh`, shifting its indices past the data already there.
fn append_model(
    mesh: &mut Mesh, model: &tobj::Model, load_uv: bool, origin: &str,
) -> Result<(), MeshError> {
    let data = &model.mesh;
    if let Some(arity) = data.face_arities.iter().find(|&&arity| arity != 3) {
        return Err(MeshError::parse(
            origin,
            format!("object '{}' has a face with {} vertices", model.name, arity),
        ));
    }
    if data.indices.len() % 3 != 0 {
        return Err(MeshError::parse(
            origin,
            format!("object '{}' has a dangling face index", model.name),
        ));
    }
    if data.normal_indices.len() != data.indices.len() {
        return Err(MeshError::parse(
            origin,
            format!("object '{}' has faces without normal indices", model.name),
        ));
    }
    if load_uv && data.texcoord_indices.len() != data.indices.len() {
        return Err(MeshError::parse(
            origin,
            format!("object '{}' has faces without texture coordinates", model.name),
        ));
    }

    let (pos_base, norm_base, uv_base) = (mesh.vertices.len(), mesh.normals.len(), mesh.uvs.len());
    mesh.vertices.extend(
        data.positions
            .chunks_exact(3)
            .map(|p| point3(p[0] as f32, p[1] as f32, p[2] as f32)),
    );
    mesh.normals.extend(
        data.normals
            .chunks_exact(3)
            .map(|n| vec3(n[0] as f32, n[1] as f32, n[2] as f32)),
    );
    mesh.pos_tris.extend(triples(&data.indices, pos_base));
    mesh.norm_tris.extend(triples(&data.normal_indices, norm_base));
    if load_uv {
        mesh.uvs.extend(
            data.texcoords
                .chunks_exact(2)
                .map(|t| vec2(t[0] as f32, t[1] as f32)),
        );
        mesh.uv_tris.extend(triples(&data.texcoord_indices, uv_base));
    }
    log::debug!(
        "object '{}': {} triangles",
        model.name,
        data.indices.len() / 3
    );
    Ok(())
}

fn triples(indices: &[u32], base: usize) -> impl Iterator<Item = [usize; 3]> + '_ {
    indices.chunks_exact(3).map(move |ijk| {
        [
            ijk[0] as usize + base,
            ijk[1] as usize + base,
            ijk[2] as usize + base,
        ]
    })
}
