//! Spiral point distribution on a sphere.
//!
//! A parameter `s` is swept evenly over [-1, 1] and mapped to a pair of angles:
//! `u = s * k` winds around the polar axis while
//! `v = (π/2) * sign(s) * (1 - sqrt(1 - |s|))` climbs from pole to pole, with the
//! square root easing the bunching a linear latitude map would cause near the
//! poles. The angles are then projected onto a sphere of radius `scale`.
//!
//! The distribution is close to, but not exactly, uniform by area.
//!
//! # References
//!
//! - [Spherical spirals (Rose-Hulman Undergraduate Mathematics Journal)](https://scholar.rose-hulman.edu/cgi/viewcontent.cgi?article=1387&context=rhumj)

use crate::config::SphereConfig;
use crate::error::{Result, SphereError};
use std::f32::consts::FRAC_PI_2;

/// Longitude-like `u` and latitude-like `v` for one point of the spiral.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AngularPoint {
    pub u: f32,
    pub v: f32,
}

impl AngularPoint {
    pub fn from_parameter(s: f32, spread: f32) -> Self {
        // Keep sqrt(1 - |s|) real even if a caller hands in 1.0000001
        let s = s.clamp(-1.0, 1.0);
        let v = FRAC_PI_2 * s.signum() * (1.0 - (1.0 - s.abs()).sqrt());

        AngularPoint { u: s * spread, v }
    }

    pub fn to_cartesian(self, scale: f32) -> [f32; 3] {
        let (sin_u, cos_u) = self.u.sin_cos();
        let (sin_v, cos_v) = self.v.sin_cos();

        [
            scale * cos_u * cos_v,
            scale * sin_u * cos_v,
            scale * sin_v,
        ]
    }
}

/// `n` evenly spaced samples of `s`, from exactly -1.0 to exactly 1.0.
pub fn angular_parameters(n: usize) -> Result<Vec<f32>> {
    if n < 2 {
        // step = 2 / (n - 1) has no meaning below two points
        return Err(SphereError::InvalidArgument(format!(
            "at least 2 points are required, got {}",
            n
        )));
    }

    // Accumulate in f64 so the last sample lands on 1.0 after narrowing
    let step = 2.0 / (n - 1) as f64;
    Ok((0..n)
        .map(|i| (-1.0 + i as f64 * step).clamp(-1.0, 1.0) as f32)
        .collect())
}

/// Generate `n` points on a sphere of radius `scale`.
///
/// `spread` is the longitudinal factor `k`; see [`crate::config::default_spread`]
/// for the usual choice.
pub fn generate(n: usize, scale: f32, spread: f32) -> Result<Vec<[f32; 3]>> {
    if !scale.is_finite() || scale <= 0.0 {
        return Err(SphereError::NumericDegenerate(format!(
            "scale must be positive and finite, got {}",
            scale
        )));
    }
    if !spread.is_finite() {
        return Err(SphereError::InvalidArgument(format!(
            "spread must be finite, got {}",
            spread
        )));
    }

    let points: Vec<[f32; 3]> = angular_parameters(n)?
        .into_iter()
        .map(|s| AngularPoint::from_parameter(s, spread).to_cartesian(scale))
        .collect();

    tracing::debug!(
        "Generated {} sphere points (scale {}, spread {})",
        points.len(),
        scale,
        spread
    );

    Ok(points)
}

pub fn generate_sphere_points(config: &SphereConfig) -> Result<Vec<[f32; 3]>> {
    config.validate()?;
    generate(config.point_count, config.scale, config.spread())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{default_spread, SphereConfigBuilder};
    use rand::rngs::StdRng;
    use rand::{Rng, SeedableRng};

    fn norm(p: &[f32; 3]) -> f32 {
        (p[0] * p[0] + p[1] * p[1] + p[2] * p[2]).sqrt()
    }

    fn assert_on_sphere(points: &[[f32; 3]], scale: f32) {
        for (i, p) in points.iter().enumerate() {
            let r = norm(p);
            assert!(
                ((r - scale) / scale).abs() < 1e-4,
                "point {} = {:?} has norm {} (expected {})",
                i,
                p,
                r,
                scale
            );
        }
    }

    #[test]
    fn test_points_lie_on_unit_sphere() {
        for n in [2, 3, 10, 700, 2000] {
            let points = generate(n, 1.0, default_spread(n)).unwrap();
            assert_eq!(points.len(), n);
            assert_on_sphere(&points, 1.0);
        }
    }

    #[test]
    fn test_scaled_sphere() {
        let points = generate(100, 0.9, default_spread(100)).unwrap();
        assert_eq!(points.len(), 100);
        assert_on_sphere(&points, 0.9);
    }

    #[test]
    fn test_random_point_counts_stay_on_sphere() {
        let mut rng = StdRng::seed_from_u64(42);
        for _ in 0..20 {
            let n = rng.gen_range(2..5000);
            let scale = rng.gen_range(0.1..10.0);
            let spread = rng.gen_range(0.0..2.0 * n as f32);
            let points = generate(n, scale, spread).unwrap();
            assert_eq!(points.len(), n);
            assert_on_sphere(&points, scale);
        }
    }

    #[test]
    fn test_determinism() {
        let first = generate(700, 0.9, default_spread(700)).unwrap();
        let second = generate(700, 0.9, default_spread(700)).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_parameter_endpoints() {
        for n in [2, 3, 7, 700, 2000] {
            let s = angular_parameters(n).unwrap();
            assert_eq!(s[0], -1.0);
            assert_eq!(s[n - 1], 1.0);

            for &end in &[s[0], s[n - 1]] {
                let angles = AngularPoint::from_parameter(end, default_spread(n));
                assert!(angles.v.is_finite(), "v at s={} is {}", end, angles.v);
                assert!((angles.v.abs() - FRAC_PI_2).abs() < 1e-6);
            }
        }
    }

    #[test]
    fn test_parameters_strictly_increasing() {
        for n in [2, 3, 10, 700, 2000] {
            let s = angular_parameters(n).unwrap();
            for pair in s.windows(2) {
                assert!(pair[0] < pair[1], "{} !< {} for n={}", pair[0], pair[1], n);
            }
        }
    }

    #[test]
    fn test_latitude_is_odd_and_monotone() {
        let s = angular_parameters(101).unwrap();
        let v: Vec<f32> = s
            .iter()
            .map(|&s| AngularPoint::from_parameter(s, 1.0).v)
            .collect();

        assert!(v[50].abs() < 1e-6);
        for i in 0..101 {
            assert!((v[i] + v[100 - i]).abs() < 1e-5);
        }
        for pair in v.windows(2) {
            assert!(pair[0] < pair[1]);
        }
    }

    #[test]
    fn test_four_points_with_unit_spread() {
        let points = generate(4, 1.0, 1.0).unwrap();
        assert_eq!(points.len(), 4);
        assert_on_sphere(&points, 1.0);

        for i in 0..points.len() {
            for j in (i + 1)..points.len() {
                assert_ne!(points[i], points[j], "points {} and {} coincide", i, j);
            }
        }
    }

    #[test]
    fn test_default_spread_has_no_duplicates() {
        let points = generate(700, 1.0, default_spread(700)).unwrap();
        for i in 0..points.len() {
            for j in (i + 1)..points.len() {
                let d = (0..3)
                    .map(|k| (points[i][k] - points[j][k]).powi(2))
                    .sum::<f32>();
                assert!(d > 0.0, "points {} and {} coincide", i, j);
            }
        }
    }

    #[test]
    fn test_poles_at_the_ends() {
        let points = generate(500, 2.0, default_spread(500)).unwrap();
        assert!((points[0][2] + 2.0).abs() < 1e-5, "first z = {}", points[0][2]);
        assert!((points[499][2] - 2.0).abs() < 1e-5, "last z = {}", points[499][2]);
    }

    #[test]
    fn test_minimal_point_count() {
        let points = generate(2, 1.0, 1.0).unwrap();
        assert_eq!(points.len(), 2);
        assert_on_sphere(&points, 1.0);
    }

    #[test]
    fn test_rejects_too_few_points() {
        for n in [0, 1] {
            let err = generate(n, 1.0, 1.0).unwrap_err();
            assert!(matches!(err, SphereError::InvalidArgument(_)), "{:?}", err);
            assert!(angular_parameters(n).is_err());
        }
    }

    #[test]
    fn test_rejects_degenerate_scale() {
        for scale in [0.0, -1.0, f32::NAN] {
            let err = generate(10, scale, 1.0).unwrap_err();
            assert!(matches!(err, SphereError::NumericDegenerate(_)), "{:?}", err);
        }
        let err = generate(10, 1.0, f32::INFINITY).unwrap_err();
        assert!(matches!(err, SphereError::InvalidArgument(_)));
    }

    #[test]
    fn test_generate_from_config() {
        let config = SphereConfigBuilder::new()
            .point_count(100)
            .scale(0.9)
            .build()
            .unwrap();
        let points = generate_sphere_points(&config).unwrap();
        assert_eq!(points, generate(100, 0.9, default_spread(100)).unwrap());

        let mut bad = config;
        bad.point_count = 1;
        assert!(generate_sphere_points(&bad).is_err());
    }
}
