//! Procedural meshes.
//!
//! Every generator returns a [`Mesh`] made of interleaved [`Vertex`] values: a position, a normal
//! and a texture coordinate, 32 bytes per vertex. Meshes are drawn as triangles, except spheres
//! which are triangle strips.
//!
//! Surfaces of revolution (cones, cylinders, capsules and tori) are built by sweeping a profile
//! around the Y axis. Sharp edges are made of two profile rings at the same place with different
//! normals.

use crate::backend::vertex_array::VertexArray;
use crate::vao::{AttribPointer, BindVao, Mode, SimpleVao, VaoError, VertexData};
use bytemuck::{Pod, Zeroable};
use cgmath::{InnerSpace, Vector3};
use std::f32::consts::PI;

/// Interleaved vertex of a procedural mesh.
#[repr(C)]
#[derive(Clone, Copy, Debug, Default, PartialEq, Pod, Zeroable)]
pub struct Vertex {
  /// Position.
  pub position: [f32; 3],
  /// Normal.
  pub normal: [f32; 3],
  /// Texture coordinates.
  pub uv: [f32; 2],
}

impl Vertex {
  /// Size of a vertex, in bytes.
  pub const STRIDE: usize = 32;

  /// Attribute location of positions.
  pub const POSITION: u32 = 0;

  /// Attribute location of texture coordinates.
  pub const UV: u32 = 1;

  /// Attribute location of normals.
  pub const NORMAL: u32 = 2;

  /// Create a vertex.
  pub fn new(position: [f32; 3], normal: [f32; 3], uv: [f32; 2]) -> Self {
    Vertex {
      position,
      normal,
      uv,
    }
  }

  /// Attribute pointers describing the interleaved layout.
  pub fn attrib_pointers() -> [AttribPointer; 3] {
    [
      AttribPointer::floats(Self::POSITION, 3, Self::STRIDE, 0),
      AttribPointer::floats(Self::NORMAL, 3, Self::STRIDE, 12),
      AttribPointer::floats(Self::UV, 2, Self::STRIDE, 24),
    ]
  }
}

/// A procedural mesh.
#[derive(Clone, Debug, PartialEq)]
pub struct Mesh {
  /// Vertices.
  pub vertices: Vec<Vertex>,
  /// How the vertices are connected.
  pub mode: Mode,
}

impl Mesh {
  /// Create a mesh.
  pub fn new(vertices: Vec<Vertex>, mode: Mode) -> Self {
    Mesh { vertices, mode }
  }

  /// Number of vertices.
  pub fn len(&self) -> usize {
    self.vertices.len()
  }

  /// Whether the mesh has no vertex.
  pub fn is_empty(&self) -> bool {
    self.vertices.is_empty()
  }

  /// Vertex data to upload.
  pub fn vertex_data(&self) -> VertexData {
    VertexData::new(&self.vertices)
  }

  /// Upload the mesh into a new [`SimpleVao`] with the attribute layout of [`Vertex`].
  pub fn create_vao<B>(&self, backend: &mut B) -> Result<SimpleVao<B>, VaoError>
  where
    B: ?Sized + VertexArray,
  {
    let mut vao = SimpleVao::new(backend, self.mode)?;

    {
      let mut bound = vao.bind(backend);
      bound.set_data(self.vertex_data())?;

      for pointer in Vertex::attrib_pointers().iter() {
        bound.set_vertex_attribute_pointer(*pointer)?;
      }
    }

    Ok(vao)
  }
}

/// Normal of the triangle `p1`, `p2`, `p3`, whose points turn clockwise when seen from the side
/// the normal points to.
///
/// Degenerate triangles yield a zero vector.
pub fn calc_normal(p1: Vector3<f32>, p2: Vector3<f32>, p3: Vector3<f32>) -> Vector3<f32> {
  let n = (p3 - p1).cross(p2 - p1);
  let len = n.magnitude();

  if len > 0. {
    n / len
  } else {
    n
  }
}

/// UV sphere, drawn as a triangle strip.
///
/// A negative radius is made positive and the precision is at least 4.
pub fn sphere(radius: f32, precision: u32) -> Mesh {
  let radius = radius.abs();
  let precision = precision.max(4);
  let p = precision as f32;
  let mut vertices = Vec::with_capacity((precision / 2 * (precision + 1) * 2) as usize);

  for i in 0..precision / 2 {
    let i = i as f32;
    let theta1 = i * 2. * PI / p - PI / 2.;
    let theta2 = (i + 1.) * 2. * PI / p - PI / 2.;

    for j in 0..=precision {
      let j = j as f32;
      let theta3 = j * 2. * PI / p;
      let u = j / p;

      for &(theta, v) in &[(theta2, 2. * (i + 1.) / p), (theta1, 2. * i / p)] {
        let n = [
          theta.cos() * theta3.cos(),
          theta.sin(),
          theta.cos() * theta3.sin(),
        ];
        let position = [n[0] * radius, n[1] * radius, n[2] * radius];

        vertices.push(Vertex::new(position, n, [u, v]));
      }
    }
  }

  Mesh::new(vertices, Mode::TriangleStrip)
}

/// Grid of triangles in the XZ plane, centred on the origin, with the same normal everywhere.
pub fn triangle_plane(
  width: f32,
  depth: f32,
  w_steps: u32,
  d_steps: u32,
  normal: Vector3<f32>,
) -> Mesh {
  let (w_steps, d_steps) = (w_steps.max(1), d_steps.max(1));
  let (w_step, d_step) = (width / w_steps as f32, depth / d_steps as f32);
  let (du, dv) = (1. / w_steps as f32, 1. / d_steps as f32);
  let n = normal.into();
  let mut vertices = Vec::with_capacity((w_steps * d_steps * 6) as usize);

  for d in 0..d_steps {
    for w in 0..w_steps {
      let x0 = -width / 2. + w as f32 * w_step;
      let z0 = -depth / 2. + d as f32 * d_step;
      let (x1, z1) = (x0 + w_step, z0 + d_step);
      let (u0, v0) = (w as f32 * du, d as f32 * dv);
      let (u1, v1) = (u0 + du, v0 + dv);

      let a = Vertex::new([x0, 0., z1], n, [u0, v1]);
      let b = Vertex::new([x1, 0., z1], n, [u1, v1]);
      let c = Vertex::new([x1, 0., z0], n, [u1, v0]);
      let e = Vertex::new([x0, 0., z0], n, [u0, v0]);

      vertices.extend_from_slice(&[a, b, e, b, c, e]);
    }
  }

  Mesh::new(vertices, Mode::Triangle)
}

/// Disk in the XY plane facing +Z.
pub fn disk(radius: f32, slices: u32) -> Mesh {
  let slices = slices.max(3);
  let n = [0., 0., 1.];
  let center = Vertex::new([0., 0., 0.], n, [0.5, 0.5]);
  let mut vertices = Vec::with_capacity(slices as usize * 3);

  let rim = |i: u32| {
    let a = i as f32 * 2. * PI / slices as f32;
    Vertex::new(
      [radius * a.cos(), radius * a.sin(), 0.],
      n,
      [0.5 + 0.5 * a.cos(), 0.5 + 0.5 * a.sin()],
    )
  };

  for i in 0..slices {
    vertices.extend_from_slice(&[center, rim(i), rim(i + 1)]);
  }

  Mesh::new(vertices, Mode::Triangle)
}

/// Axis-aligned cube centred on the origin.
pub fn cube(size: f32) -> Mesh {
  let h = size / 2.;
  // normal, then two axes whose cross product is the normal
  let faces: [([f32; 3], [f32; 3], [f32; 3]); 6] = [
    ([1., 0., 0.], [0., 0., -1.], [0., 1., 0.]),
    ([-1., 0., 0.], [0., 0., 1.], [0., 1., 0.]),
    ([0., 1., 0.], [1., 0., 0.], [0., 0., -1.]),
    ([0., -1., 0.], [1., 0., 0.], [0., 0., 1.]),
    ([0., 0., 1.], [1., 0., 0.], [0., 1., 0.]),
    ([0., 0., -1.], [-1., 0., 0.], [0., 1., 0.]),
  ];
  let mut vertices = Vec::with_capacity(36);

  for &(n, u, v) in &faces {
    let (n, u, v) = (Vector3::from(n), Vector3::from(u), Vector3::from(v));
    let corner = |su: f32, sv: f32| {
      let p = (n + u * su + v * sv) * h;
      Vertex::new(p.into(), n.into(), [(su + 1.) / 2., (sv + 1.) / 2.])
    };

    let (a, b, c, d) = (
      corner(-1., -1.),
      corner(1., -1.),
      corner(1., 1.),
      corner(-1., 1.),
    );
    vertices.extend_from_slice(&[a, b, c, a, c, d]);
  }

  Mesh::new(vertices, Mode::Triangle)
}

// A ring of a surface of revolution around Y.
#[derive(Clone, Copy, Debug)]
struct Ring {
  radius: f32,
  height: f32,
  // radial and vertical parts of the normal
  normal: [f32; 2],
  v: f32,
}

impl Ring {
  fn new(radius: f32, height: f32, normal: [f32; 2], v: f32) -> Self {
    Ring {
      radius,
      height,
      normal,
      v,
    }
  }
}

// Sweep rings around the Y axis. Rings must go upwards on the outside of the surface.
fn revolve(rings: &[Ring], slices: u32) -> Vec<Vertex> {
  let slices = slices.max(3);
  let mut vertices = Vec::with_capacity(rings.len().saturating_sub(1) * slices as usize * 6);

  let at = |ring: &Ring, i: u32| {
    let a = i as f32 * 2. * PI / slices as f32;
    let (s, c) = a.sin_cos();
    Vertex::new(
      [ring.radius * s, ring.height, ring.radius * c],
      [ring.normal[0] * s, ring.normal[1], ring.normal[0] * c],
      [i as f32 / slices as f32, ring.v],
    )
  };

  for pair in rings.windows(2) {
    for i in 0..slices {
      let (a, b) = (at(&pair[0], i), at(&pair[0], i + 1));
      let (c, d) = (at(&pair[1], i + 1), at(&pair[1], i));
      vertices.extend_from_slice(&[a, b, c, a, c, d]);
    }
  }

  vertices
}

fn normalized2(x: f32, y: f32) -> [f32; 2] {
  let len = (x * x + y * y).sqrt();
  [x / len, y / len]
}

/// Cone along +Z, with its base disk at `z = 0` and its apex at `z = height`.
pub fn cone(base: f32, height: f32, slices: u32, stacks: u32) -> Mesh {
  let stacks = stacks.max(1);
  let side = normalized2(height, base);
  let mut rings = vec![
    Ring::new(0., 0., [0., -1.], 0.),
    Ring::new(base, 0., [0., -1.], 0.),
  ];

  for s in 0..=stacks {
    let t = s as f32 / stacks as f32;
    rings.push(Ring::new(base * (1. - t), height * t, side, t));
  }

  // built along Y, then turned so that Y goes to Z
  let vertices = revolve(&rings, slices)
    .into_iter()
    .map(|mut v| {
      let [x, y, z] = v.position;
      v.position = [x, -z, y];
      let [x, y, z] = v.normal;
      v.normal = [x, -z, y];
      v
    })
    .collect();

  Mesh::new(vertices, Mode::Triangle)
}

/// Capped cylinder along Y, centred on the origin.
pub fn cylinder(radius: f32, height: f32, slices: u32, stacks: u32) -> Mesh {
  let stacks = stacks.max(1);
  let h = height / 2.;
  let mut rings = vec![
    Ring::new(0., -h, [0., -1.], 0.),
    Ring::new(radius, -h, [0., -1.], 0.),
  ];

  for s in 0..=stacks {
    let t = s as f32 / stacks as f32;
    rings.push(Ring::new(radius, -h + height * t, [1., 0.], t));
  }

  rings.push(Ring::new(radius, h, [0., 1.], 1.));
  rings.push(Ring::new(0., h, [0., 1.], 1.));

  Mesh::new(revolve(&rings, slices), Mode::Triangle)
}

/// Capsule along Y: a cylinder of the given height closed by two hemispheres.
pub fn capsule(radius: f32, height: f32, precision: u32) -> Mesh {
  let precision = precision.max(4);
  let quarter = precision / 2;
  let h = height / 2.;
  let total = height + 2. * radius;
  let mut rings = Vec::with_capacity(quarter as usize * 2 + 2);

  // bottom hemisphere from the pole to the equator, then the top one
  for (center, from) in [(-h, -PI / 2.), (h, 0.)].iter().copied() {
    for k in 0..=quarter {
      let phi = from + k as f32 * (PI / 2.) / quarter as f32;
      let (s, c) = phi.sin_cos();
      let y = center + radius * s;
      rings.push(Ring::new(radius * c, y, [c, s], (y + total / 2.) / total));
    }
  }

  Mesh::new(revolve(&rings, precision), Mode::Triangle)
}

/// Torus around Y. `minor` is the radius of the tube, `major` the distance from the centre to the
/// middle of the tube.
pub fn torus(minor: f32, major: f32, sides: u32, rings: u32) -> Mesh {
  let sides = sides.max(3);
  let profile: Vec<_> = (0..=sides)
    .map(|k| {
      let theta = -PI + k as f32 * 2. * PI / sides as f32;
      let (s, c) = theta.sin_cos();
      Ring::new(major + minor * c, minor * s, [c, s], k as f32 / sides as f32)
    })
    .collect();

  Mesh::new(revolve(&profile, rings), Mode::Triangle)
}

const ICOSAHEDRON_VERTICES: [[f32; 3]; 12] = [
  [-0.262865, 0., 0.425325],
  [0.262865, 0., 0.425325],
  [-0.262865, 0., -0.425325],
  [0.262865, 0., -0.425325],
  [0., 0.425325, 0.262865],
  [0., 0.425325, -0.262865],
  [0., -0.425325, 0.262865],
  [0., -0.425325, -0.262865],
  [0.425325, 0.262865, 0.],
  [-0.425325, 0.262865, 0.],
  [0.425325, -0.262865, 0.],
  [-0.425325, -0.262865, 0.],
];

#[rustfmt::skip]
const ICOSAHEDRON_INDICES: [u16; 60] = [
  0, 6, 1, 0, 11, 6, 1, 4, 0, 1, 8, 4, 1, 10, 8, 2, 5, 3, 2, 9, 5, 2, 11, 9, 3, 7, 2, 3, 10, 7,
  4, 8, 5, 4, 9, 0, 5, 8, 3, 5, 9, 4, 6, 10, 1, 6, 11, 7, 7, 10, 6, 7, 11, 2, 8, 10, 3, 9, 11, 0,
];

/// The 12 vertices of an icosahedron of radius 0.5 and the 60 indices of its 20 faces.
pub fn icosahedron_indexed() -> (&'static [[f32; 3]], &'static [u16]) {
  (&ICOSAHEDRON_VERTICES, &ICOSAHEDRON_INDICES)
}

fn spherical_uv(p: Vector3<f32>) -> [f32; 2] {
  let r = p.magnitude().max(f32::EPSILON);
  [
    0.5 + p.z.atan2(p.x) / (2. * PI),
    0.5 + (p.y / r).max(-1.).min(1.).asin() / PI,
  ]
}

// Flat shaded triangles of a convex solid centred on the origin; faces are turned outwards.
fn flat_solid(positions: &[Vector3<f32>], faces: &[[usize; 3]]) -> Mesh {
  let mut vertices = Vec::with_capacity(faces.len() * 3);

  for &[a, b, c] in faces {
    let (p1, mut p2, mut p3) = (positions[a], positions[b], positions[c]);
    let mut n = calc_normal(p1, p3, p2);

    if n.dot(p1 + p2 + p3) < 0. {
      std::mem::swap(&mut p2, &mut p3);
      n = -n;
    }

    for p in [p1, p2, p3].iter() {
      vertices.push(Vertex::new((*p).into(), n.into(), spherical_uv(*p)));
    }
  }

  Mesh::new(vertices, Mode::Triangle)
}

fn scaled_to(radius: f32, points: &[[f32; 3]]) -> Vec<Vector3<f32>> {
  points
    .iter()
    .map(|&p| Vector3::from(p).normalize() * radius)
    .collect()
}

/// Tetrahedron of radius 0.5.
pub fn tetrahedron() -> Mesh {
  let positions = scaled_to(
    0.5,
    &[[1., 1., 1.], [1., -1., -1.], [-1., 1., -1.], [-1., -1., 1.]],
  );

  flat_solid(&positions, &[[0, 1, 2], [0, 3, 1], [0, 2, 3], [1, 3, 2]])
}

/// Octahedron of radius 0.5.
pub fn octahedron() -> Mesh {
  let positions = scaled_to(
    0.5,
    &[
      [1., 0., 0.],
      [-1., 0., 0.],
      [0., 1., 0.],
      [0., -1., 0.],
      [0., 0., 1.],
      [0., 0., -1.],
    ],
  );
  let mut faces = Vec::with_capacity(8);

  for &x in &[0, 1] {
    for &y in &[2, 3] {
      for &z in &[4, 5] {
        faces.push([x, y, z]);
      }
    }
  }

  flat_solid(&positions, &faces)
}

fn icosahedron_faces() -> Vec<[usize; 3]> {
  ICOSAHEDRON_INDICES
    .chunks(3)
    .map(|f| [f[0] as usize, f[1] as usize, f[2] as usize])
    .collect()
}

/// Icosahedron of radius 0.5.
pub fn icosahedron() -> Mesh {
  let positions = scaled_to(0.5, &ICOSAHEDRON_VERTICES);
  flat_solid(&positions, &icosahedron_faces())
}

/// Dodecahedron of radius 0.5.
///
/// Built as the dual of the icosahedron: each icosahedron face gives a vertex and each icosahedron
/// vertex gives a pentagonal face.
pub fn dodecahedron() -> Mesh {
  let ico: Vec<_> = ICOSAHEDRON_VERTICES.iter().map(|&p| Vector3::from(p)).collect();
  let ico_faces = icosahedron_faces();

  let positions: Vec<_> = ico_faces
    .iter()
    .map(|&[a, b, c]| ((ico[a] + ico[b] + ico[c]) / 3.).normalize() * 0.5)
    .collect();

  let mut faces = Vec::with_capacity(36);

  for (vi, axis) in ico.iter().enumerate() {
    let axis = axis.normalize();
    let mut around: Vec<usize> = ico_faces
      .iter()
      .enumerate()
      .filter(|(_, f)| f.contains(&vi))
      .map(|(fi, _)| fi)
      .collect();

    // order the pentagon around the axis
    let t = (positions[around[0]] - axis * positions[around[0]].dot(axis)).normalize();
    let b = axis.cross(t);
    let angle = |fi: usize| {
      let p = positions[fi];
      p.dot(b).atan2(p.dot(t))
    };
    around.sort_by(|&x, &y| {
      angle(x)
        .partial_cmp(&angle(y))
        .unwrap_or(std::cmp::Ordering::Equal)
    });

    for k in 1..around.len() - 1 {
      faces.push([around[0], around[k], around[k + 1]]);
    }
  }

  flat_solid(&positions, &faces)
}

#[cfg(test)]
mod tests {
  use super::*;

  fn length(v: [f32; 3]) -> f32 {
    Vector3::from(v).magnitude()
  }

  fn assert_outward(mesh: &Mesh) {
    for tri in mesh.vertices.chunks(3) {
      let center = tri
        .iter()
        .fold(Vector3::new(0., 0., 0.), |acc, v| acc + Vector3::from(v.position));
      let p: Vec<_> = tri.iter().map(|v| Vector3::from(v.position)).collect();
      let winding = (p[1] - p[0]).cross(p[2] - p[0]);

      assert!(winding.dot(center) > 0.);
      assert!(Vector3::from(tri[0].normal).dot(center) > 0.);
    }
  }

  #[test]
  fn vertex_layout() {
    assert_eq!(std::mem::size_of::<Vertex>(), Vertex::STRIDE);
  }

  #[test]
  fn normals_follow_clockwise_points() {
    let n = calc_normal(
      Vector3::new(0., 0., 0.),
      Vector3::new(0., 1., 0.),
      Vector3::new(1., 0., 0.),
    );

    assert_eq!(n, Vector3::new(0., 0., 1.));
  }

  #[test]
  fn sphere_layout() {
    let mesh = sphere(-2., 2);

    // precision is raised to 4: 2 bands of 5 pairs
    assert_eq!(mesh.mode, Mode::TriangleStrip);
    assert_eq!(mesh.len(), 20);

    for v in &mesh.vertices {
      assert!((length(v.position) - 2.).abs() < 1e-5);
      assert!((length(v.normal) - 1.).abs() < 1e-5);
    }

    // the first pair spans the first band, from its top to its bottom
    assert_eq!(mesh.vertices[0].uv, [0., 0.5]);
    assert_eq!(mesh.vertices[1].uv, [0., 0.]);
  }

  #[test]
  fn plane_layout() {
    let mesh = triangle_plane(10., 10., 20, 20, Vector3::unit_y());

    assert_eq!(mesh.len(), 20 * 20 * 6);

    for tri in mesh.vertices.chunks(3) {
      let p: Vec<_> = tri.iter().map(|v| Vector3::from(v.position)).collect();
      let n = (p[1] - p[0]).cross(p[2] - p[0]);
      assert!(n.y > 0.);
    }
  }

  #[test]
  fn cube_faces_point_outwards() {
    let mesh = cube(1.);

    assert_eq!(mesh.len(), 36);
    assert_outward(&mesh);
    assert!(mesh
      .vertices
      .iter()
      .all(|v| v.position.iter().all(|c| c.abs() == 0.5)));
  }

  #[test]
  fn platonic_solids() {
    for (mesh, faces) in [
      (tetrahedron(), 4),
      (octahedron(), 8),
      (icosahedron(), 20),
      (dodecahedron(), 36),
    ]
    .iter()
    {
      assert_eq!(mesh.len(), faces * 3);
      assert_outward(mesh);

      for v in &mesh.vertices {
        assert!((length(v.position) - 0.5).abs() < 1e-4);
      }
    }
  }

  #[test]
  fn indexed_icosahedron() {
    let (vertices, indices) = icosahedron_indexed();

    assert_eq!(vertices.len(), 12);
    assert_eq!(indices.len(), 60);
    assert!(indices.iter().all(|&i| (i as usize) < vertices.len()));
  }

  #[test]
  fn cone_points_along_z() {
    let mesh = cone(0.5, 1., 20, 20);
    let max_z = mesh
      .vertices
      .iter()
      .map(|v| v.position[2])
      .fold(f32::MIN, f32::max);

    assert!((max_z - 1.).abs() < 1e-5);
    assert!(mesh.vertices.iter().all(|v| v.position[2] >= -1e-6));
  }

  #[test]
  fn revolved_surfaces() {
    let capsule = capsule(0.2, 0.4, 20);
    let top = capsule
      .vertices
      .iter()
      .map(|v| v.position[1])
      .fold(f32::MIN, f32::max);
    assert!((top - 0.4).abs() < 1e-5);

    let torus = torus(0.1, 0.3, 20, 20);
    for v in &torus.vertices {
      let [x, y, z] = v.position;
      let ring = ((x * x + z * z).sqrt() - 0.3).hypot(y);
      assert!((ring - 0.1).abs() < 1e-4);
    }

    let cylinder = cylinder(0.2, 0.4, 20, 20);
    assert!(cylinder.vertices.iter().all(|v| v.position[1].abs() <= 0.2 + 1e-6));
  }

  #[test]
  fn disk_faces_z() {
    let mesh = disk(0.5, 20);

    assert_eq!(mesh.len(), 60);
    assert!(mesh.vertices.iter().all(|v| v.normal == [0., 0., 1.]));
  }

  #[test]
  fn mesh_vaos() {
    use crate::backend::mock::{Call, MockBackend};
    use crate::vao::AbstractVao;

    let mut backend = MockBackend::new();
    let vao = cube(1.).create_vao(&mut backend).unwrap();

    assert_eq!(vao.num_indices(), 36);
    assert!(backend
      .calls
      .contains(&Call::AttribPointer(AttribPointer::floats(2, 3, 32, 12))));
  }
}
