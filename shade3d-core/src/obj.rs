//! Loader for the minimal OBJ subset used by shade3d
//!
//! Only two record types are understood:
//!
//! ```text
//! v <x> <y> <z>      append a vertex
//! f <i1> <i2> <i3>   append a triangle of 1-based vertex indices
//! ```
//!
//! Every other line is skipped. A recognized record that cannot be parsed
//! rejects the whole file, as does a face referring to a vertex that has
//! not been declared yet.
use std::fs;
use std::path::Path;

use nom::{
    branch::alt,
    bytes::complete::take_till,
    character::complete::{char, digit1, one_of, space0, space1},
    combinator::{eof, map, opt, peek, recognize},
    number::complete::double,
    sequence::{pair, preceded, terminated, tuple},
    IResult,
};
use tracing::{debug, info, trace};

use crate::error::LoadError;
use crate::geometry::{Face, Mesh};
use crate::math::Vec3;

/// Load a mesh from an OBJ file on disk.
pub fn load_obj(path: &Path) -> Result<Mesh, LoadError> {
    if !path.exists() {
        return Err(LoadError::MissingModelFile(path.to_path_buf()));
    }

    let source = fs::read_to_string(path).map_err(|source| LoadError::Read {
        path: path.to_path_buf(),
        source,
    })?;

    let mesh = parse_obj(&source)?;
    info!(
        path = %path.display(),
        vertices = mesh.vertices().len(),
        triangles = mesh.triangle_count(),
        "loaded model"
    );
    Ok(mesh)
}

/// Parse OBJ text into a mesh.
pub fn parse_obj(source: &str) -> Result<Mesh, LoadError> {
    let mut vertices: Vec<Vec3> = Vec::new();
    let mut faces: Vec<Face> = Vec::new();

    for (number, raw) in source.lines().enumerate() {
        let line = number + 1;
        let content = raw.trim();

        let malformed = || LoadError::MalformedModelLine {
            line,
            content: content.to_string(),
        };

        let (rest, keyword) = keyword(content).map_err(|_| malformed())?;
        match keyword {
            "v" => {
                let (_, vertex) = vertex(rest).map_err(|_| malformed())?;
                trace!(line, ?vertex, "vertex");
                vertices.push(vertex);
            }
            "f" => {
                let (_, indices) = face(rest).map_err(|_| malformed())?;
                let face = resolve_face(indices, vertices.len(), line)?;
                trace!(line, ?face, "face");
                faces.push(face);
            }
            _ => {}
        }
    }

    debug!(
        vertices = vertices.len(),
        faces = faces.len(),
        "parsed model source"
    );
    Ok(Mesh::from_parts(vertices, faces))
}

/// Convert 1-based indices into arena indices, checking them against the
/// vertices declared so far.
fn resolve_face(indices: [i64; 3], available: usize, line: usize) -> Result<Face, LoadError> {
    let mut face = [0usize; 3];
    for (slot, &index) in face.iter_mut().zip(indices.iter()) {
        *slot = usize::try_from(index)
            .ok()
            .filter(|&i| (1..=available).contains(&i))
            .map(|i| i - 1)
            .ok_or(LoadError::OutOfRangeFaceIndex {
                line,
                index,
                available,
            })?;
    }
    Ok(face)
}

fn keyword(input: &str) -> IResult<&str, &str> {
    preceded(space0, take_till(|c: char| c.is_whitespace()))(input)
}

/// A token must be followed by whitespace or the end of the line.
fn token_end(input: &str) -> IResult<&str, &str> {
    peek(alt((space1, eof)))(input)
}

fn coordinate(input: &str) -> IResult<&str, f64> {
    terminated(preceded(space1, double), token_end)(input)
}

fn vertex(input: &str) -> IResult<&str, Vec3> {
    map(tuple((coordinate, coordinate, coordinate)), |(x, y, z)| {
        Vec3::new(x, y, z)
    })(input)
}

/// A signed integer index. Values past the `i64` range saturate, so they
/// are reported as out of range rather than as a malformed line.
fn index(input: &str) -> IResult<&str, i64> {
    map(recognize(pair(opt(one_of("+-")), digit1)), |digits: &str| {
        digits.parse().unwrap_or(if digits.starts_with('-') {
            i64::MIN
        } else {
            i64::MAX
        })
    })(input)
}

/// A face index, optionally followed by `/texture/normal` references which
/// are ignored.
fn face_index(input: &str) -> IResult<&str, i64> {
    terminated(
        preceded(space1, index),
        pair(
            opt(preceded(char('/'), take_till(|c: char| c.is_whitespace()))),
            token_end,
        ),
    )(input)
}

fn face(input: &str) -> IResult<&str, [i64; 3]> {
    map(tuple((face_index, face_index, face_index)), |(a, b, c)| {
        [a, b, c]
    })(input)
}
