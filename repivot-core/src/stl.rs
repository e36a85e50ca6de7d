/// STL reader and writer for binary and ASCII formats
///
/// Facets are imported unwelded: each one appends three vertices in file
/// order, so vertex indices follow the file exactly.
use std::fmt::Write as _;

use nalgebra::Vector3;
use nom::{
    bytes::complete::{tag, take_till},
    character::complete::{multispace0, multispace1},
    multi::many0,
    number::complete::float,
    sequence::preceded,
    IResult,
};
use tracing::debug;

use crate::error::StlError;
use crate::geometry::{Mesh, Triangle};

const HEADER_LEN: usize = 80;
const FACET_LEN: usize = 50;

/// Parse a binary STL file
pub fn parse_binary_stl(data: &[u8]) -> Result<Mesh, StlError> {
    if data.len() < HEADER_LEN + 4 {
        return Err(StlError::TooSmall(data.len()));
    }

    // Skip 80-byte header
    let data = &data[HEADER_LEN..];

    // Read triangle count (4 bytes, little-endian)
    let triangle_count = u32::from_le_bytes([data[0], data[1], data[2], data[3]]) as usize;

    // don't trust the header count for allocation
    let reserve = triangle_count.min((data.len() - 4) / FACET_LEN);
    let mut mesh = Mesh::with_capacity(reserve * 3, reserve);
    let mut facets = data[4..].chunks_exact(FACET_LEN);

    for read in 0..triangle_count {
        let facet = facets.next().ok_or(StlError::Truncated {
            read,
            expected: triangle_count,
        })?;

        // normal, three vertices, then a 2-byte attribute count
        let [n, v0, v1, v2] = [0, 12, 24, 36].map(|at| read_vector(&facet[at..at + 12]));
        mesh.add_triangle(Triangle::new(v0.into(), v1.into(), v2.into()), n);
    }

    debug!(facets = triangle_count, "parsed binary STL");
    Ok(mesh)
}

fn read_vector(bytes: &[u8]) -> Vector3<f32> {
    let f = |i: usize| f32::from_le_bytes([bytes[i], bytes[i + 1], bytes[i + 2], bytes[i + 3]]);
    Vector3::new(f(0), f(4), f(8))
}

/// Parse an ASCII STL file
pub fn parse_ascii_stl(input: &str) -> Result<Mesh, StlError> {
    match parse_ascii_stl_impl(input) {
        Ok((_, mesh)) => {
            debug!(facets = mesh.faces.len(), "parsed ASCII STL");
            Ok(mesh)
        }
        Err(e) => Err(StlError::Ascii(format!("{e:?}"))),
    }
}

fn parse_ascii_stl_impl(input: &str) -> IResult<&str, Mesh> {
    let (input, _) = preceded(multispace0, tag("solid"))(input)?;
    let (input, _) = take_till(|c| c == '\n')(input)?; // Optional name
    let (input, facets) = many0(parse_facet)(input)?;
    let (input, _) = preceded(multispace0, tag("endsolid"))(input)?;

    let mut mesh = Mesh::with_capacity(facets.len() * 3, facets.len());
    for (triangle, normal) in facets {
        mesh.add_triangle(triangle, normal);
    }

    Ok((input, mesh))
}

fn parse_facet(input: &str) -> IResult<&str, (Triangle, Vector3<f32>)> {
    let (input, _) = preceded(multispace0, tag("facet"))(input)?;
    let (input, _) = preceded(multispace1, tag("normal"))(input)?;
    let (input, normal) = parse_vector3(input)?;
    let (input, _) = preceded(multispace0, tag("outer"))(input)?;
    let (input, _) = preceded(multispace1, tag("loop"))(input)?;
    let (input, v1) = parse_vertex(input)?;
    let (input, v2) = parse_vertex(input)?;
    let (input, v3) = parse_vertex(input)?;
    let (input, _) = preceded(multispace0, tag("endloop"))(input)?;
    let (input, _) = preceded(multispace0, tag("endfacet"))(input)?;

    Ok((
        input,
        (Triangle::new(v1.into(), v2.into(), v3.into()), normal),
    ))
}

fn parse_vertex(input: &str) -> IResult<&str, Vector3<f32>> {
    let (input, _) = preceded(multispace0, tag("vertex"))(input)?;
    parse_vector3(input)
}

fn parse_vector3(input: &str) -> IResult<&str, Vector3<f32>> {
    let (input, _) = multispace0(input)?;
    let (input, x) = float(input)?;
    let (input, _) = multispace1(input)?;
    let (input, y) = float(input)?;
    let (input, _) = multispace1(input)?;
    let (input, z) = float(input)?;
    Ok((input, Vector3::new(x, y, z)))
}

/// Detect and parse STL file (binary or ASCII)
pub fn parse_stl(data: &[u8]) -> Result<Mesh, StlError> {
    // Binary files may also start with "solid", so fall back on failure
    if data.len() > 5 && &data[0..5] == b"solid" {
        if let Ok(text) = std::str::from_utf8(data) {
            if let Ok(mesh) = parse_ascii_stl(text) {
                return Ok(mesh);
            }
        }
    }

    parse_binary_stl(data)
}

fn check_faces(mesh: &Mesh) -> Result<(), StlError> {
    let count = mesh.vertex_count();
    for (face, indices) in mesh.faces.iter().enumerate() {
        if let Some(&index) = indices.iter().find(|&&i| i as usize >= count) {
            return Err(StlError::BadIndex { face, index, count });
        }
    }
    Ok(())
}

/// Serialize to binary STL. Facet normals are recomputed from winding.
pub fn write_binary_stl(mesh: &Mesh) -> Result<Vec<u8>, StlError> {
    check_faces(mesh)?;

    let mut out = Vec::with_capacity(HEADER_LEN + 4 + mesh.faces.len() * FACET_LEN);
    let mut header = [0u8; HEADER_LEN];
    let name = b"repivot";
    header[..name.len()].copy_from_slice(name);
    out.extend_from_slice(&header);
    out.extend_from_slice(&(mesh.faces.len() as u32).to_le_bytes());

    for triangle in mesh.triangles() {
        let normal = triangle.calculate_normal();
        let [p0, p1, p2] = triangle.positions;
        for v in [normal, p0.coords, p1.coords, p2.coords] {
            for c in v.iter() {
                out.extend_from_slice(&c.to_le_bytes());
            }
        }
        out.extend_from_slice(&0u16.to_le_bytes());
    }

    Ok(out)
}

/// Serialize to ASCII STL under solid `name`.
pub fn write_ascii_stl(mesh: &Mesh, name: &str) -> Result<String, StlError> {
    check_faces(mesh)?;

    let mut out = String::new();
    writeln!(out, "solid {name}")?;
    for triangle in mesh.triangles() {
        let n = triangle.calculate_normal();
        writeln!(out, "  facet normal {:e} {:e} {:e}", n.x, n.y, n.z)?;
        writeln!(out, "    outer loop")?;
        for p in &triangle.positions {
            writeln!(out, "      vertex {:e} {:e} {:e}", p.x, p.y, p.z)?;
        }
        writeln!(out, "    endloop")?;
        writeln!(out, "  endfacet")?;
    }
    writeln!(out, "endsolid {name}")?;

    Ok(out)
}
