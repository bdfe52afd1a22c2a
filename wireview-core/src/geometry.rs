//! Wireframe geometry: polygons, objects, culling and edge extraction.

use crate::algebra::{Mat3, Vec3, EPSILON};
use crate::error::GeometryError;

/// A flat polygon with at least three vertices.
///
/// Vertices run clockwise when looking at the visible side, so the face
/// normal is `-((v1 - v0) × (v2 - v0))`.
#[derive(Debug, Clone, PartialEq)]
pub struct Polygon {
    vertices: Vec<Vec3>,
}

impl Polygon {
    pub fn new(vertices: Vec<Vec3>) -> Result<Self, GeometryError> {
        if vertices.len() < 3 {
            return Err(GeometryError::TooFewVertices(vertices.len()));
        }
        Ok(Self { vertices })
    }

    pub fn triangle(v0: Vec3, v1: Vec3, v2: Vec3) -> Self {
        Self {
            vertices: vec![v0, v1, v2],
        }
    }

    pub fn quad(v0: Vec3, v1: Vec3, v2: Vec3, v3: Vec3) -> Self {
        Self {
            vertices: vec![v0, v1, v2, v3],
        }
    }

    pub fn vertices(&self) -> &[Vec3] {
        &self.vertices
    }

    /// Face normal pointing out of the visible side. Not normalized.
    pub fn normal(&self) -> Vec3 {
        let v0 = self.vertices[0];
        let edge1 = self.vertices[1] - v0;
        let edge2 = self.vertices[2] - v0;
        -edge1.cross(&edge2)
    }

    /// Boundary segments in winding order, closing back to the first vertex.
    pub fn boundary(&self) -> impl Iterator<Item = Edge> + '_ {
        let next = self.vertices.iter().cycle().skip(1);
        self.vertices.iter().zip(next).map(|(a, b)| Edge::new(*a, *b))
    }

    /// Split into a fan of triangles sharing the first vertex. Winding is kept.
    pub fn triangulate(&self) -> Vec<Polygon> {
        let v0 = self.vertices[0];
        self.vertices[1..]
            .windows(2)
            .map(|pair| Polygon::triangle(v0, pair[0], pair[1]))
            .collect()
    }
}

/// An undirected line segment.
///
/// Two edges are equal when they join the same endpoints in either order.
#[derive(Debug, Clone, Copy)]
pub struct Edge {
    pub a: Vec3,
    pub b: Vec3,
}

impl Edge {
    pub fn new(a: Vec3, b: Vec3) -> Self {
        Self { a, b }
    }
}

impl PartialEq for Edge {
    fn eq(&self, other: &Self) -> bool {
        (self.a == other.a && self.b == other.b) || (self.a == other.b && self.b == other.a)
    }
}

/// The object being viewed. Built once; never edited while displayed.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Object {
    polygons: Vec<Polygon>,
}

impl Object {
    pub fn new(polygons: Vec<Polygon>) -> Self {
        Self { polygons }
    }

    pub fn polygons(&self) -> &[Polygon] {
        &self.polygons
    }

    pub fn is_empty(&self) -> bool {
        self.polygons.is_empty()
    }

    /// Axis-aligned cube centered on the origin, one quad per face.
    pub fn cube(size: f64) -> Self {
        let half = size / 2.0;
        // (outward normal, u, v) with u × v = normal.
        let faces = [
            (Vec3::x(), Vec3::y(), Vec3::z()),
            (-Vec3::x(), Vec3::z(), Vec3::y()),
            (Vec3::y(), Vec3::z(), Vec3::x()),
            (-Vec3::y(), Vec3::x(), Vec3::z()),
            (Vec3::z(), Vec3::x(), Vec3::y()),
            (-Vec3::z(), Vec3::y(), Vec3::x()),
        ];
        let polygons = faces
            .iter()
            .map(|(normal, u, v)| {
                let center = normal * half;
                let (u, v) = (u * half, v * half);
                Polygon::quad(center - u - v, center - u + v, center + u + v, center + u - v)
            })
            .collect();
        Self { polygons }
    }

    /// [`Object::cube`] with every face split into two triangles.
    pub fn triangulated_cube(size: f64) -> Self {
        let polygons = Self::cube(size)
            .polygons
            .iter()
            .flat_map(Polygon::triangulate)
            .collect();
        Self { polygons }
    }

    /// Regular octahedron centered on the origin with vertices `size / 2`
    /// away along each axis.
    pub fn octahedron(size: f64) -> Self {
        let r = size / 2.0;
        let mut polygons = Vec::with_capacity(8);
        for sx in [1.0, -1.0] {
            for sy in [1.0, -1.0] {
                for sz in [1.0, -1.0] {
                    let (x, y, z) = (Vec3::x() * sx * r, Vec3::y() * sy * r, Vec3::z() * sz * r);
                    // Clockwise seen from outside: reverse the right-handed order.
                    let triangle = if sx * sy * sz > 0.0 {
                        Polygon::triangle(x, z, y)
                    } else {
                        Polygon::triangle(x, y, z)
                    };
                    polygons.push(triangle);
                }
            }
        }
        Self { polygons }
    }
}

/// Keep the polygons that face the camera.
///
/// A polygon survives when the angle between its normal and the camera's
/// forward axis (column 2 of `camera_basis`) is at least 90°, that is when
/// `normal · forward ≤ 0`. Polygons with no area have no normal and are
/// dropped.
pub fn cull<'a>(polygons: &'a [Polygon], camera_basis: &Mat3) -> Vec<&'a Polygon> {
    let forward = camera_basis.column(2).into_owned();
    polygons
        .iter()
        .filter(|polygon| {
            let normal = polygon.normal();
            normal.norm() > EPSILON && normal.dot(&forward) <= 0.0
        })
        .collect()
}

/// Reduce polygons to their boundary edges, each undirected edge once.
///
/// Membership is a linear scan of the edges found so far, which is fine for
/// objects of a few thousand edges.
pub fn to_edges<'a, I>(polygons: I) -> Vec<Edge>
where
    I: IntoIterator<Item = &'a Polygon>,
{
    let mut edges: Vec<Edge> = Vec::new();
    for polygon in polygons {
        for edge in polygon.boundary() {
            if !edges.contains(&edge) {
                edges.push(edge);
            }
        }
    }
    edges
}
