/// Minimal Wavefront OBJ reader
use nom::{
    bytes::complete::is_not,
    character::complete::{digit1, space0},
    combinator::map_res,
    multi::many0,
    number::complete::double,
    sequence::preceded,
    IResult,
};

use crate::geometry::Vector;

/// Vertices and 0-based triangle indices read from OBJ text
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ObjData {
    pub vertices: Vec<Vector>,
    pub faces: Vec<[usize; 3]>,
}

/// Read `v` and `f` records; polygons are fan-triangulated around their first
/// vertex.
///
/// Malformed input never fails the parse: a vertex with unreadable
/// coordinates keeps its slot with NaN components, and a face that references
/// a missing vertex is dropped.
pub fn parse(text: &str) -> ObjData {
    let mut data = ObjData::default();
    for line in text.lines() {
        let fields = fields(line);
        if fields.len() < 2 {
            continue;
        }
        match fields[0] {
            "v" => data.vertices.push(Vector::new(
                coordinate(fields.get(1)),
                coordinate(fields.get(2)),
                coordinate(fields.get(3)),
            )),
            "f" => {
                let Some(indices) = face_indices(&fields[1..], data.vertices.len()) else {
                    log::debug!("skipping obj face with invalid index: {}", line.trim());
                    continue;
                };
                for i in 1..indices.len().saturating_sub(1) {
                    data.faces.push([indices[0], indices[i], indices[i + 1]]);
                }
            }
            _ => {}
        }
    }
    data
}

/// Whitespace separated tokens of one line
fn fields(line: &str) -> Vec<&str> {
    let tokens: IResult<&str, Vec<&str>> = many0(preceded(space0, is_not(" \t\r\n")))(line);
    tokens.map(|(_, tokens)| tokens).unwrap_or_default()
}

/// Leading float of a field, NaN when absent or unreadable
fn coordinate(field: Option<&&str>) -> f64 {
    field
        .and_then(|f| double::<&str, nom::error::Error<&str>>(*f).ok())
        .map_or(f64::NAN, |(_, value)| value)
}

/// 0-based vertex indices of a face record, `None` if any is unusable
fn face_indices(fields: &[&str], vertex_count: usize) -> Option<Vec<usize>> {
    fields
        .iter()
        .map(|field| {
            let parsed: IResult<&str, usize> = map_res(digit1, str::parse::<usize>)(*field);
            match parsed {
                Ok((_, index)) if index >= 1 && index <= vertex_count => Some(index - 1),
                _ => None,
            }
        })
        .collect()
}
