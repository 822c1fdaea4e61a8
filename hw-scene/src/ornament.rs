//! This module handles the geometry of the ornaments that hang on the tree.
//!
//! Star, heart, and crystal ornaments are flat outlines extruded into prisms. Sphere ornaments
//! are just balls, so the renderer can use its own sphere mesh for them.

use glam::{Vec2, Vec3};
use hw_wish::OrnamentType;
use std::f32::consts::{FRAC_PI_2, TAU};

/// The geometry of an ornament, in a unit-sized local space.
#[derive(Clone, Debug, PartialEq)]
pub enum OrnamentGeometry {
    /// A ball with the given radius.
    Ball { radius: f32 },

    /// An extruded outline.
    Prism(PrismMesh),
}

/// A flat-shaded triangle mesh.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct PrismMesh {
    pub positions: Vec<[f32; 3]>,
    pub normals: Vec<[f32; 3]>,
    pub indices: Vec<u32>,
}

/// Get the geometry for the given type of ornament.
pub fn ornament_geometry(ornament: OrnamentType) -> OrnamentGeometry {
    match ornament_outline(ornament) {
        Some(outline) => OrnamentGeometry::Prism(extrude(&outline, 0.35)),
        None => OrnamentGeometry::Ball { radius: 0.8 },
    }
}

/// The counter-clockwise outline of the given ornament in the XY plane, fitting inside the unit
/// circle, or `None` for a sphere.
///
/// Every outline is star-convex about the origin, so it can be triangulated as a fan from there.
pub fn ornament_outline(ornament: OrnamentType) -> Option<Vec<Vec2>> {
    match ornament {
        OrnamentType::Star => Some(star_outline(5, 1., 0.45)),
        OrnamentType::Heart => Some(heart_outline(48)),
        OrnamentType::Crystal => Some(vec![
            Vec2::new(0., -1.),
            Vec2::new(0.55, -0.2),
            Vec2::new(0.45, 0.45),
            Vec2::new(0., 0.75),
            Vec2::new(-0.45, 0.45),
            Vec2::new(-0.55, -0.2),
        ]),
        OrnamentType::Sphere => None,
    }
}

/// A star with the given number of points, with the first point straight up.
fn star_outline(points: usize, outer: f32, inner: f32) -> Vec<Vec2> {
    let vertices = points * 2;
    (0..vertices)
        .map(|i| {
            let radius = if i % 2 == 0 { outer } else { inner };
            let theta = FRAC_PI_2 + TAU * i as f32 / vertices as f32;
            Vec2::from_angle(theta) * radius
        })
        .collect()
}

/// A heart made from a polar curve, so the radius is positive everywhere and the outline is
/// star-convex. The point of the heart faces down.
fn heart_outline(samples: usize) -> Vec<Vec2> {
    let radius = |theta: f32| {
        let (sin, cos) = theta.sin_cos();
        0.3 + 2. - 2. * sin + sin * cos.abs().sqrt() / (sin + 1.4)
    };

    let outline: Vec<Vec2> = (0..samples)
        .map(|i| {
            let theta = -FRAC_PI_2 + TAU * i as f32 / samples as f32;
            Vec2::from_angle(theta) * radius(theta)
        })
        .collect();

    let max = outline
        .iter()
        .map(|v| v.length())
        .fold(f32::MIN_POSITIVE, f32::max);

    outline.into_iter().map(|v| v / max).collect()
}

/// Extrude a star-convex, counter-clockwise outline along z into a flat-shaded prism with the
/// given depth, centred on the origin.
pub fn extrude(outline: &[Vec2], depth: f32) -> PrismMesh {
    let mut mesh = PrismMesh::default();
    let half = depth / 2.;
    let n = outline.len();

    for (z, normal) in [(half, Vec3::Z), (-half, Vec3::NEG_Z)] {
        let centre = mesh.positions.len() as u32;
        mesh.positions.push([0., 0., z]);
        mesh.normals.push(normal.to_array());

        for v in outline {
            mesh.positions.push([v.x, v.y, z]);
            mesh.normals.push(normal.to_array());
        }

        for i in 0..n as u32 {
            let a = centre + 1 + i;
            let b = centre + 1 + (i + 1) % n as u32;

            // The back face is seen from the other side, so it needs the opposite winding
            if z > 0. {
                mesh.indices.extend([centre, a, b]);
            } else {
                mesh.indices.extend([centre, b, a]);
            }
        }
    }

    for i in 0..n {
        let a = outline[i];
        let b = outline[(i + 1) % n];
        let edge = b - a;
        let normal = Vec3::new(edge.y, -edge.x, 0.).normalize_or_zero().to_array();

        let base = mesh.positions.len() as u32;
        mesh.positions.extend([
            [a.x, a.y, -half],
            [b.x, b.y, -half],
            [b.x, b.y, half],
            [a.x, a.y, half],
        ]);
        mesh.normals.extend([normal; 4]);
        mesh.indices
            .extend([base, base + 1, base + 2, base, base + 2, base + 3]);
    }

    mesh
}

#[cfg(test)]
mod tests {
    use super::*;
    use float_cmp::approx_eq;
    use strum::IntoEnumIterator;

    #[test]
    fn outlines_are_star_convex_test() {
        for ornament in OrnamentType::iter() {
            let Some(outline) = ornament_outline(ornament) else {
                assert_eq!(ornament, OrnamentType::Sphere);
                continue;
            };

            assert!(outline.len() >= 3, "{ornament:?}");

            for (i, &v) in outline.iter().enumerate() {
                let next = outline[(i + 1) % outline.len()];
                assert!(
                    v.perp_dot(next) > 0.,
                    "{ornament:?} outline isn't counter-clockwise around the origin at {i}"
                );
                assert!(v.length() <= 1. + 1e-5, "{ornament:?} escapes the unit circle");
            }

            let total_angle: f32 = outline
                .iter()
                .enumerate()
                .map(|(i, &v)| v.angle_between(outline[(i + 1) % outline.len()]))
                .sum();
            assert!(
                approx_eq!(f32, total_angle, TAU, epsilon = 1e-3),
                "{ornament:?} winds {total_angle} radians"
            );
        }
    }

    #[test]
    fn star_outline_test() {
        let star = star_outline(5, 1., 0.45);
        assert_eq!(star.len(), 10);
        assert!(approx_eq!(f32, star[0].x, 0., epsilon = 1e-6));
        assert!(approx_eq!(f32, star[0].y, 1., epsilon = 1e-6));
        assert!(approx_eq!(f32, star[1].length(), 0.45, epsilon = 1e-6));
    }

    #[test]
    fn heart_points_down_test() {
        let heart = heart_outline(48);
        let lowest = heart
            .iter()
            .copied()
            .min_by(|a, b| a.y.total_cmp(&b.y))
            .unwrap();

        assert!(approx_eq!(f32, lowest.x, 0., epsilon = 1e-5));
        assert!(approx_eq!(f32, lowest.y, -1., epsilon = 1e-5));
    }

    #[test]
    fn extrude_test() {
        let square = [
            Vec2::new(-1., -1.),
            Vec2::new(1., -1.),
            Vec2::new(1., 1.),
            Vec2::new(-1., 1.),
        ];
        let mesh = extrude(&square, 2.);

        // Two caps of centre + 4, and four sides of 4
        assert_eq!(mesh.positions.len(), 2 * 5 + 4 * 4);
        assert_eq!(mesh.normals.len(), mesh.positions.len());
        // 4 triangles per cap and 2 per side
        assert_eq!(mesh.indices.len(), 3 * (4 + 4 + 8));
        assert!(mesh
            .indices
            .iter()
            .all(|&i| (i as usize) < mesh.positions.len()));

        // Every triangle should face the same way as its vertex normals
        for triangle in mesh.indices.chunks(3) {
            let [a, b, c] = [0, 1, 2].map(|k| Vec3::from(mesh.positions[triangle[k] as usize]));
            let face_normal = (b - a).cross(c - a).normalize();
            let vertex_normal = Vec3::from(mesh.normals[triangle[0] as usize]);
            assert!(
                face_normal.dot(vertex_normal) > 0.99,
                "{face_normal:?} vs {vertex_normal:?}"
            );
        }
    }

    #[test]
    fn ornament_geometry_test() {
        assert!(matches!(
            ornament_geometry(OrnamentType::Sphere),
            OrnamentGeometry::Ball { .. }
        ));

        for ornament in [
            OrnamentType::Star,
            OrnamentType::Heart,
            OrnamentType::Crystal,
        ] {
            let OrnamentGeometry::Prism(mesh) = ornament_geometry(ornament) else {
                panic!("{ornament:?} should be a prism");
            };
            assert!(!mesh.indices.is_empty());
            assert_eq!(mesh.indices.len() % 3, 0);
        }
    }
}
