//! Random triangle and barycentric sampling over a [`SurfaceSource`].
//!
//! Triangles are picked uniformly by index, not by area, and the barycentric
//! draw is the cheap `u, v * (1 - u)` scheme rather than an area-uniform one.
//! Both are kept as-is so emission matches existing content authored against
//! this distribution.

use bevy::prelude::*;

use crate::random::RandomSource;
use crate::surface::SurfaceSource;

/// Barycentric weights of a point inside a triangle.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Barycentric {
    pub u: f32,
    pub v: f32,
    pub w: f32,
}

impl Barycentric {
    /// Draw `u ~ U(0,1)`, `v ~ U(0, 1-u)`, `w = 1 - u - v`.
    pub fn draw<R: RandomSource + ?Sized>(rng: &mut R) -> Self {
        let u = rng.next_f32();
        let v = rng.next_f32() * (1.0 - u);
        Self { u, v, w: 1.0 - u - v }
    }

    /// Weighted combination `u*a + v*b + w*c`.
    pub fn interpolate(&self, a: Vec3, b: Vec3, c: Vec3) -> Vec3 {
        a * self.u + b * self.v + c * self.w
    }
}

/// Pick a triangle index uniformly in `[0, triangle_count)`.
///
/// Returns `None` for an empty mesh.
pub fn pick_triangle<R: RandomSource + ?Sized>(triangle_count: usize, rng: &mut R) -> Option<usize> {
    if triangle_count == 0 {
        return None;
    }
    // f32 draws are spaced 2^-24 apart near 1.0, too coarse for large meshes
    let t = (rng.next_f64() * triangle_count as f64) as usize;
    // A source returning exactly 1.0 would otherwise overrun
    Some(t.min(triangle_count - 1))
}

/// One sampled point on a mesh surface, in mesh-local space.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TriangleSample {
    pub triangle: usize,
    pub weights: Barycentric,
    pub position: Vec3,
    /// Interpolated vertex normal, un-normalized. Only filled when requested and
    /// the normal buffer covers the triangle.
    pub normal: Option<Vec3>,
}

/// Sample a random point on `source`.
///
/// Returns `None` when the source has no triangles or the chosen triangle
/// references vertices past the position buffer.
pub fn sample_surface<R: RandomSource + ?Sized>(
    source: &SurfaceSource,
    with_normal: bool,
    rng: &mut R,
) -> Option<TriangleSample> {
    let triangle = pick_triangle(source.triangle_count(), rng)?;
    let weights = Barycentric::draw(rng);
    let [a, b, c] = source.triangle(triangle)?;

    let position = weights.interpolate(
        source.position(a)?,
        source.position(b)?,
        source.position(c)?,
    );

    let normal = if with_normal && source.has_normals() {
        match (source.normal(a), source.normal(b), source.normal(c)) {
            (Some(na), Some(nb), Some(nc)) => Some(weights.interpolate(na, nb, nc)),
            _ => None,
        }
    } else {
        None
    };

    Some(TriangleSample {
        triangle,
        weights,
        position,
        normal,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::random::tests::Scripted;
    use crate::surface::tests::unit_square;
    use crate::surface::MeshBuffers;

    const EPS: f32 = 1e-5;

    /// Barycentric coordinates of `p` with respect to triangle `abc`.
    fn barycentric_of(p: Vec3, a: Vec3, b: Vec3, c: Vec3) -> (f32, f32, f32) {
        let v0 = b - a;
        let v1 = c - a;
        let v2 = p - a;
        let d00 = v0.dot(v0);
        let d01 = v0.dot(v1);
        let d11 = v1.dot(v1);
        let d20 = v2.dot(v0);
        let d21 = v2.dot(v1);
        let denom = d00 * d11 - d01 * d01;
        let v = (d11 * d20 - d01 * d21) / denom;
        let w = (d00 * d21 - d01 * d20) / denom;
        (1.0 - v - w, v, w)
    }

    #[test]
    fn weights_sum_to_one_and_are_non_negative() {
        let mut rng = fastrand::Rng::with_seed(11);
        for _ in 0..10_000 {
            let b = Barycentric::draw(&mut rng);
            assert!((b.u + b.v + b.w - 1.0).abs() < EPS);
            assert!(b.u >= 0.0 && b.v >= 0.0 && b.w >= -EPS);
        }
    }

    #[test]
    fn scripted_draw_matches_formula() {
        let mut rng = Scripted::new(&[0.5, 0.5]);
        let b = Barycentric::draw(&mut rng);
        assert_eq!(b, Barycentric { u: 0.5, v: 0.25, w: 0.25 });
    }

    #[test]
    fn empty_mesh_picks_nothing() {
        let mut rng = Scripted::new(&[0.3]);
        assert_eq!(pick_triangle(0, &mut rng), None);
    }

    #[test]
    fn pick_clamps_top_of_range() {
        let mut rng = Scripted::new(&[1.0]);
        assert_eq!(pick_triangle(4, &mut rng), Some(3));
    }

    #[test]
    fn large_meshes_reach_every_triangle() {
        // Near 1.0 an f32 draw steps by 2^-24, about 2.4 triangles at this size,
        // so a contiguous run of top indices is only reachable at f64 precision
        let n = 40_000_000usize;
        let spread = (0..n).step_by(999_983);
        let upper_tail = n - 2_000..n;
        for i in spread.chain(upper_tail) {
            let mut rng = Scripted::new(&[(i as f64 + 0.5) / n as f64]);
            assert_eq!(pick_triangle(n, &mut rng), Some(i));
        }
    }

    #[test]
    fn triangle_selection_is_roughly_uniform() {
        let mut rng = fastrand::Rng::with_seed(42);
        let n = 7;
        let trials = 70_000;
        let mut counts = vec![0usize; n];
        for _ in 0..trials {
            counts[pick_triangle(n, &mut rng).unwrap()] += 1;
        }
        let expected = trials / n;
        for count in counts {
            let deviation = (count as f32 - expected as f32).abs() / expected as f32;
            assert!(deviation < 0.05, "count {count} too far from {expected}");
        }
    }

    #[test]
    fn samples_lie_inside_their_triangle() {
        let source = SurfaceSource::extract(&unit_square());
        let mut rng = fastrand::Rng::with_seed(5);
        for _ in 0..2_000 {
            let sample = sample_surface(&source, false, &mut rng).unwrap();
            let [a, b, c] = source.triangle(sample.triangle).unwrap();
            let (pa, pb, pc) = (
                source.position(a).unwrap(),
                source.position(b).unwrap(),
                source.position(c).unwrap(),
            );
            let (l0, l1, l2) = barycentric_of(sample.position, pa, pb, pc);
            assert!(l0 >= -EPS && l1 >= -EPS && l2 >= -EPS);
            assert!(sample.position.z.abs() < EPS);
            assert!(sample.normal.is_none());
        }
    }

    #[test]
    fn interpolated_normal_uses_same_weights() {
        let buffers = MeshBuffers::new(
            vec![0, 1, 2],
            vec![0.0, 0.0, 0.0, 1.0, 0.0, 0.0, 0.0, 1.0, 0.0],
        )
        .with_normals(vec![1.0, 0.0, 0.0, 0.0, 1.0, 0.0, 0.0, 0.0, 1.0]);
        let source = SurfaceSource::extract(&buffers);

        // triangle draw, then u, then v
        let mut rng = Scripted::new(&[0.0, 0.5, 0.5]);
        let sample = sample_surface(&source, true, &mut rng).unwrap();
        assert_eq!(sample.weights, Barycentric { u: 0.5, v: 0.25, w: 0.25 });
        assert_eq!(sample.position, Vec3::new(0.25, 0.25, 0.0));
        assert_eq!(sample.normal, Some(Vec3::new(0.5, 0.25, 0.25)));
    }

    #[test]
    fn short_normal_buffer_drops_normal_only() {
        let mut buffers = unit_square();
        buffers.normals = Some(vec![0.0, 0.0, 1.0]);
        let source = SurfaceSource::extract(&buffers);
        let mut rng = fastrand::Rng::with_seed(9);
        let sample = sample_surface(&source, true, &mut rng).unwrap();
        assert!(sample.normal.is_none());
    }

    #[test]
    fn bad_index_skips_sample() {
        let buffers = MeshBuffers::new(vec![0, 1, 7], vec![0.0; 9]);
        let source = SurfaceSource::extract(&buffers);
        let mut rng = fastrand::Rng::with_seed(1);
        assert!(sample_surface(&source, true, &mut rng).is_none());
    }
}
