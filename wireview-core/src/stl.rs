//! STL loading (binary and ASCII) into wireframe objects.
//!
//! STL facets wind counter-clockwise seen from outside. Our polygons wind
//! clockwise seen from their visible side, so every facet is reversed on load.

use nom::{
    bytes::complete::{tag, take},
    character::complete::{multispace0, multispace1, not_line_ending},
    combinator::opt,
    multi::{count, many0},
    number::complete::{double, le_f32, le_u16, le_u32},
    sequence::{preceded, tuple},
    IResult,
};

use crate::algebra::Vec3;
use crate::error::StlError;
use crate::geometry::{Object, Polygon};

const HEADER_LEN: usize = 80;
const FACET_LEN: usize = 50;

fn facet_polygon(vertices: [Vec3; 3]) -> Polygon {
    let [v0, v1, v2] = vertices;
    Polygon::triangle(v0, v2, v1)
}

/// Parse a binary STL file
pub fn parse_binary_stl(data: &[u8]) -> Result<Object, StlError> {
    if data.len() < HEADER_LEN + 4 {
        return Err(StlError::TooSmall(data.len()));
    }
    let facets = u32::from_le_bytes([data[80], data[81], data[82], data[83]]) as usize;
    let available = data.len() - HEADER_LEN - 4;
    if facets.saturating_mul(FACET_LEN) > available {
        return Err(StlError::Truncated { facets, available });
    }

    let (_, triangles) = binary_stl(data).map_err(|_| StlError::Truncated { facets, available })?;
    Ok(Object::new(triangles.into_iter().map(facet_polygon).collect()))
}

fn binary_stl(input: &[u8]) -> IResult<&[u8], Vec<[Vec3; 3]>> {
    let (input, _header) = take(HEADER_LEN)(input)?;
    let (input, facets) = le_u32(input)?;
    count(binary_facet, facets as usize)(input)
}

fn binary_facet(input: &[u8]) -> IResult<&[u8], [Vec3; 3]> {
    // The stored normal is ignored: it is often zero or stale.
    let (input, _normal) = binary_vector(input)?;
    let (input, v0) = binary_vector(input)?;
    let (input, v1) = binary_vector(input)?;
    let (input, v2) = binary_vector(input)?;
    let (input, _attributes) = le_u16(input)?;
    Ok((input, [v0, v1, v2]))
}

fn binary_vector(input: &[u8]) -> IResult<&[u8], Vec3> {
    let (input, (x, y, z)) = tuple((le_f32, le_f32, le_f32))(input)?;
    Ok((input, Vec3::new(x as f64, y as f64, z as f64)))
}

/// Parse an ASCII STL file
pub fn parse_ascii_stl(input: &str) -> Result<Object, StlError> {
    match ascii_solid(input) {
        Ok((_, triangles)) => Ok(Object::new(triangles.into_iter().map(facet_polygon).collect())),
        Err(e) => Err(StlError::Ascii(format!("{:?}", e))),
    }
}

fn ascii_solid(input: &str) -> IResult<&str, Vec<[Vec3; 3]>> {
    let (input, _) = preceded(multispace0, tag("solid"))(input)?;
    let (input, _name) = not_line_ending(input)?;
    let (input, triangles) = many0(ascii_facet)(input)?;
    let (input, _) = preceded(multispace0, tag("endsolid"))(input)?;
    let (input, _) = opt(not_line_ending)(input)?;
    Ok((input, triangles))
}

fn ascii_facet(input: &str) -> IResult<&str, [Vec3; 3]> {
    let (input, _) = preceded(multispace0, tag("facet"))(input)?;
    let (input, _) = preceded(multispace1, tag("normal"))(input)?;
    let (input, _normal) = ascii_vector(input)?;
    let (input, _) = preceded(multispace0, tag("outer"))(input)?;
    let (input, _) = preceded(multispace1, tag("loop"))(input)?;
    let (input, v0) = ascii_vertex(input)?;
    let (input, v1) = ascii_vertex(input)?;
    let (input, v2) = ascii_vertex(input)?;
    let (input, _) = preceded(multispace0, tag("endloop"))(input)?;
    let (input, _) = preceded(multispace0, tag("endfacet"))(input)?;
    Ok((input, [v0, v1, v2]))
}

fn ascii_vertex(input: &str) -> IResult<&str, Vec3> {
    preceded(preceded(multispace0, tag("vertex")), ascii_vector)(input)
}

fn ascii_vector(input: &str) -> IResult<&str, Vec3> {
    let (input, x) = preceded(multispace1, double)(input)?;
    let (input, y) = preceded(multispace1, double)(input)?;
    let (input, z) = preceded(multispace1, double)(input)?;
    Ok((input, Vec3::new(x, y, z)))
}

/// Detect and parse STL file (binary or ASCII)
pub fn parse_stl(data: &[u8]) -> Result<Object, StlError> {
    // Binary files may also start with "solid", so fall back on failure.
    if data.starts_with(b"solid") {
        if let Ok(text) = std::str::from_utf8(data) {
            match parse_ascii_stl(text) {
                Ok(object) => {
                    log::info!("loaded ASCII STL with {} facets", object.polygons().len());
                    return Ok(object);
                }
                Err(err) => log::debug!("not ASCII STL, trying binary: {err}"),
            }
        }
    }

    let object = parse_binary_stl(data)?;
    log::info!("loaded binary STL with {} facets", object.polygons().len());
    Ok(object)
}
