/// STL reader for binary and ASCII files
use nom::{
    bytes::complete::{tag, take_till},
    character::complete::{multispace0, multispace1},
    multi::many0,
    number::complete::double,
    sequence::preceded,
    IResult,
};

use crate::error::{Error, Result};
use crate::geometry::Vector;
use crate::shapes::TriangleShape;

const HEADER_SIZE: usize = 80;
const RECORD_SIZE: usize = 50;

/// Parse a binary STL file. Facet normals are ignored.
pub fn parse_binary_stl(data: &[u8]) -> Result<Vec<TriangleShape>> {
    if data.len() < HEADER_SIZE + 4 {
        return Err(Error::Stl("file too small to be a valid STL".to_string()));
    }

    let body = &data[HEADER_SIZE..];
    let count = u32::from_le_bytes([body[0], body[1], body[2], body[3]]) as usize;
    let records = &body[4..];
    if records.len() / RECORD_SIZE < count {
        return Err(Error::Stl(format!(
            "expected {count} triangles, found room for {}",
            records.len() / RECORD_SIZE
        )));
    }

    let triangles = records
        .chunks_exact(RECORD_SIZE)
        .take(count)
        .map(|record| {
            // 12 bytes of normal, then three vertices, then a 2 byte attribute count
            TriangleShape::new(
                read_vector(&record[12..24]),
                read_vector(&record[24..36]),
                read_vector(&record[36..48]),
            )
        })
        .collect();
    Ok(triangles)
}

fn read_vector(bytes: &[u8]) -> Vector {
    let component = |i: usize| {
        f32::from_le_bytes([bytes[i], bytes[i + 1], bytes[i + 2], bytes[i + 3]]) as f64
    };
    Vector::new(component(0), component(4), component(8))
}

/// Parse an ASCII STL file
pub fn parse_ascii_stl(input: &str) -> Result<Vec<TriangleShape>> {
    match ascii_solid(input) {
        Ok((_, triangles)) => Ok(triangles),
        Err(e) => Err(Error::Stl(format!("failed to parse ASCII STL: {e:?}"))),
    }
}

fn ascii_solid(input: &str) -> IResult<&str, Vec<TriangleShape>> {
    let (input, _) = preceded(multispace0, tag("solid"))(input)?;
    // optional solid name
    let (input, _) = take_till(|c: char| c == '\n')(input)?;
    let (input, triangles) = many0(facet)(input)?;
    let (input, _) = preceded(multispace0, tag("endsolid"))(input)?;
    Ok((input, triangles))
}

fn facet(input: &str) -> IResult<&str, TriangleShape> {
    let (input, _) = preceded(multispace0, tag("facet"))(input)?;
    let (input, _) = preceded(multispace1, tag("normal"))(input)?;
    let (input, _) = vector(input)?;
    let (input, _) = preceded(multispace0, tag("outer"))(input)?;
    let (input, _) = preceded(multispace1, tag("loop"))(input)?;
    let (input, v1) = vertex(input)?;
    let (input, v2) = vertex(input)?;
    let (input, v3) = vertex(input)?;
    let (input, _) = preceded(multispace0, tag("endloop"))(input)?;
    let (input, _) = preceded(multispace0, tag("endfacet"))(input)?;
    Ok((input, TriangleShape::new(v1, v2, v3)))
}

fn vertex(input: &str) -> IResult<&str, Vector> {
    preceded(preceded(multispace0, tag("vertex")), vector)(input)
}

fn vector(input: &str) -> IResult<&str, Vector> {
    let (input, _) = multispace0(input)?;
    let (input, x) = double(input)?;
    let (input, _) = multispace1(input)?;
    let (input, y) = double(input)?;
    let (input, _) = multispace1(input)?;
    let (input, z) = double(input)?;
    Ok((input, Vector::new(x, y, z)))
}

/// Detect the flavour of an STL file and parse it.
///
/// Binary files may also start with `solid`, so a failed ASCII parse falls
/// back to the binary reader.
pub fn parse_stl(data: &[u8]) -> Result<Vec<TriangleShape>> {
    if data.starts_with(b"solid") {
        if let Ok(text) = std::str::from_utf8(data) {
            if let Ok(triangles) = parse_ascii_stl(text) {
                return Ok(triangles);
            }
        }
    }
    parse_binary_stl(data)
}

#[cfg(test)]
mod tests {
    use super::*;

    const ASCII: &str = "solid tri
  facet normal 0 0 1
    outer loop
      vertex 0 0 0
      vertex 1 0 0
      vertex 0 1.5 -2e-1
    endloop
  endfacet
  facet normal 0 0 1
    outer loop
      vertex 0 0 1
      vertex 1 0 1
      vertex 0 1 1
    endloop
  endfacet
endsolid tri
";

    fn binary(triangles: &[[f32; 9]]) -> Vec<u8> {
        let mut data = vec![0u8; HEADER_SIZE];
        data.extend_from_slice(&(triangles.len() as u32).to_le_bytes());
        for t in triangles {
            data.extend_from_slice(&[0u8; 12]);
            for c in t {
                data.extend_from_slice(&c.to_le_bytes());
            }
            data.extend_from_slice(&[0u8; 2]);
        }
        data
    }

    #[test]
    fn test_parse_binary_header() {
        let triangles = parse_binary_stl(&binary(&[])).unwrap();
        assert!(triangles.is_empty());
    }

    #[test]
    fn test_parse_binary_triangles() {
        let data = binary(&[[0.0, 0.0, 0.0, 1.0, 0.0, 0.0, 0.0, 1.0, 0.5]]);
        let triangles = parse_stl(&data).unwrap();
        assert_eq!(triangles.len(), 1);
        assert_eq!(triangles[0].v3, Vector::new(0.0, 1.0, 0.5));
    }

    #[test]
    fn test_truncated_binary_is_an_error() {
        let mut data = binary(&[[0.0; 9]]);
        data.truncate(data.len() - 1);
        assert!(matches!(parse_binary_stl(&data), Err(Error::Stl(_))));
        assert!(matches!(parse_stl(&[0u8; 10]), Err(Error::Stl(_))));
    }

    #[test]
    fn test_parse_ascii() {
        let triangles = parse_stl(ASCII.as_bytes()).unwrap();
        assert_eq!(triangles.len(), 2);
        assert_eq!(triangles[0].v3, Vector::new(0.0, 1.5, -0.2));
        assert_eq!(triangles[1].v1, Vector::new(0.0, 0.0, 1.0));
    }

    #[test]
    fn test_binary_starting_with_solid() {
        let mut data = binary(&[[0.0, 0.0, 0.0, 1.0, 0.0, 0.0, 0.0, 1.0, 0.0]]);
        data[..5].copy_from_slice(b"solid");
        assert_eq!(parse_stl(&data).unwrap().len(), 1);
    }
}
