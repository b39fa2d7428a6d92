use std::io::{Cursor, Write};

use math::hcm::{vec2, Vec3};
use mesh::{load_mesh, Mesh, MeshError};

const QUAD: &str = "\
# unit quad in the xy-plane, facing +z
v 0 0 0
v 1 0 0
v 1 1 0
v 0 1 0
vn 0 0 1
vt 0 0
vt 1 0
vt 1 1
vt 0 1
f 1/1/1 2/2/1 3/3/1
f 1/1/1 3/3/1 4/4/1
";

fn parse(text: &str, load_uv: bool) -> Result<Mesh, MeshError> {
    Mesh::from_obj_reader(&mut Cursor::new(text.as_bytes()), load_uv, "test.obj")
}

#[test]
fn face_indices_become_zero_based() {
    let mesh = parse(QUAD, true).unwrap();
    assert_eq!(mesh.num_triangles(), 2);
    assert_eq!(mesh.vertices.len(), 4);
    assert_eq!(mesh.pos_tris, vec![[0, 1, 2], [0, 2, 3]]);
    assert_eq!(mesh.norm_tris, vec![[0, 0, 0], [0, 0, 0]]);
    assert_eq!(mesh.uv_tris, vec![[0, 1, 2], [0, 2, 3]]);
    assert!(mesh.has_uvs());

    let tri = mesh.triangle(1);
    assert_eq!(tri.uvs.2, vec2(0.0, 1.0));
    assert_eq!(tri.normals.0, Vec3::Z);
}

#[test]
fn skipping_uvs_leaves_uv_triangles_empty() {
    let mesh = parse(QUAD, false).unwrap();
    assert_eq!(mesh.num_triangles(), 2);
    assert!(mesh.uv_tris.is_empty());
    assert!(mesh.uvs.is_empty());
    assert!(!mesh.has_uvs());
}

#[test]
fn hi_poly_without_uvs_loads() {
    let text = "v 0 0 0\nv 1 0 0\nv 0 1 0\nvn 0 0 3\nf 1//1 2//1 3//1\n";
    let mesh = parse(text, false).unwrap();
    assert_eq!(mesh.normals, vec![Vec3::Z]);
}

#[test]
fn objects_are_concatenated() {
    let text = "\
o first
v 0 0 0
v 1 0 0
v 0 1 0
vn 0 0 1
vt 0 0
f 1/1/1 2/1/1 3/1/1
o second
v 0 0 1
v 1 0 1
v 0 1 1
vn 0 0 -1
f 4/1/2 5/1/2 6/1/2
";
    let mesh = parse(text, true).unwrap();
    assert_eq!(mesh.num_triangles(), 2);
    let (p0, _, _) = mesh.triangle_positions(1);
    assert_eq!(p0.z, 1.0);
    let tri = mesh.triangle(1);
    assert_eq!(tri.normals.0, -Vec3::Z);
}

#[test]
fn malformed_face_is_parse_error() {
    let text = "v 0 0 0\nv 1 0 0\nv 0 1 0\nvn 0 0 1\nf 1//1 2//1 x//1\n";
    assert!(matches!(parse(text, false), Err(MeshError::Parse { .. })));
}

#[test]
fn out_of_range_index_is_parse_error() {
    let text = "v 0 0 0\nv 1 0 0\nv 0 1 0\nvn 0 0 1\nf 1//1 2//1 7//1\n";
    assert!(matches!(parse(text, false), Err(MeshError::Parse { .. })));
}

#[test]
fn quad_face_is_rejected() {
    let text = "v 0 0 0\nv 1 0 0\nv 1 1 0\nv 0 1 0\nvn 0 0 1\nf 1//1 2//1 3//1 4//1\n";
    match parse(text, false) {
        Err(MeshError::Parse { reason, .. }) => assert!(reason.contains("4 vertices"), "{}", reason),
        other => panic!("expected a parse error, got {:?}", other),
    }
}

#[test]
fn missing_normals_are_rejected() {
    let text = "v 0 0 0\nv 1 0 0\nv 0 1 0\nf 1 2 3\n";
    assert!(matches!(parse(text, false), Err(MeshError::Parse { .. })));
}

#[test]
fn missing_uvs_are_rejected_for_lo_poly() {
    let text = "v 0 0 0\nv 1 0 0\nv 0 1 0\nvn 0 0 1\nf 1//1 2//1 3//1\n";
    assert!(matches!(parse(text, true), Err(MeshError::Parse { .. })));
}

#[test]
fn load_from_file() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    file.write_all(QUAD.as_bytes()).unwrap();
    file.flush().unwrap();
    let mesh = load_mesh(file.path(), true).unwrap();
    assert_eq!(mesh.num_triangles(), 2);
}

#[test]
fn missing_file_is_load_error() {
    let dir = tempfile::tempdir().unwrap();
    let result = load_mesh(dir.path().join("absent.obj"), true);
    assert!(matches!(result, Err(MeshError::Load { .. })));
}
