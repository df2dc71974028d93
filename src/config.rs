//! Configuration for the point sphere.
//!
//! `SphereConfig` holds everything needed to regenerate the point set (count,
//! scale, spread) plus a handful of render options. Build it with
//! [`SphereConfigBuilder`] or start from [`SphereConfig::from_env`].

use crate::error::{Result, SphereError};

pub const DEFAULT_POINT_COUNT: usize = 700;
pub const DEFAULT_SCALE: f32 = 0.9;
pub const DEFAULT_POINT_SIZE: f32 = 0.012; // Half-width of a point quad in clip units
pub const DEFAULT_DEPTH_FALLOFF: f32 = 0.6;
pub const DEFAULT_ROTATION_SPEED: f32 = 0.4; // Radians per second around Y

pub const ENV_POINT_COUNT: &str = "POINT_SPHERE_POINTS";
pub const ENV_SCALE: &str = "POINT_SPHERE_SCALE";
pub const ENV_SPREAD: &str = "POINT_SPHERE_SPREAD";

/// Longitudinal spread `k` used when none is configured.
///
/// `u = s * k`, so `k` controls how many times the spiral winds around the
/// polar axis. Scaling it with the point count keeps neighbouring points from
/// lining up into visible meridians. It has no effect on the radius of the
/// generated points.
pub fn default_spread(point_count: usize) -> f32 {
    0.12 + 1.1999 * point_count as f32
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SphereConfig {
    /// Number of points to generate (at least 2)
    pub point_count: usize,
    /// Sphere radius multiplier applied to every generated point
    pub scale: f32,
    /// Explicit longitudinal spread; `None` derives it from `point_count`
    pub spread_override: Option<f32>,
    pub point_size: f32,
    /// 0.0 keeps every point the same size, 1.0 shrinks far-side points to nothing
    pub depth_falloff: f32,
    pub rotation_speed: f32,
    /// Keep the drawing area square when the window is resized
    pub letterbox: bool,
}

impl Default for SphereConfig {
    fn default() -> Self {
        SphereConfig {
            point_count: DEFAULT_POINT_COUNT,
            scale: DEFAULT_SCALE,
            spread_override: None,
            point_size: DEFAULT_POINT_SIZE,
            depth_falloff: DEFAULT_DEPTH_FALLOFF,
            rotation_speed: DEFAULT_ROTATION_SPEED,
            letterbox: true,
        }
    }
}

impl SphereConfig {
    /// The spread actually used for generation.
    pub fn spread(&self) -> f32 {
        self.spread_override
            .unwrap_or_else(|| default_spread(self.point_count))
    }

    pub fn validate(&self) -> Result<()> {
        if self.point_count < 2 {
            return Err(SphereError::InvalidArgument(format!(
                "point count must be at least 2, got {}",
                self.point_count
            )));
        }
        if !self.scale.is_finite() || self.scale <= 0.0 {
            return Err(SphereError::NumericDegenerate(format!(
                "scale must be positive and finite, got {}",
                self.scale
            )));
        }
        if let Some(spread) = self.spread_override {
            if !spread.is_finite() {
                return Err(SphereError::InvalidArgument(format!(
                    "spread must be finite, got {}",
                    spread
                )));
            }
        }
        if !self.point_size.is_finite() || self.point_size <= 0.0 {
            return Err(SphereError::InvalidArgument(format!(
                "point size must be positive, got {}",
                self.point_size
            )));
        }
        if !(0.0..=1.0).contains(&self.depth_falloff) {
            return Err(SphereError::InvalidArgument(format!(
                "depth falloff must be within [0, 1], got {}",
                self.depth_falloff
            )));
        }
        if !self.rotation_speed.is_finite() {
            return Err(SphereError::InvalidArgument(format!(
                "rotation speed must be finite, got {}",
                self.rotation_speed
            )));
        }
        Ok(())
    }

    /// Defaults with `POINT_SPHERE_POINTS`, `POINT_SPHERE_SCALE` and
    /// `POINT_SPHERE_SPREAD` applied on top.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut builder = SphereConfigBuilder::new();

        if let Some(raw) = lookup(ENV_POINT_COUNT) {
            builder = builder.point_count(parse_value(ENV_POINT_COUNT, &raw)?);
        }
        if let Some(raw) = lookup(ENV_SCALE) {
            builder = builder.scale(parse_value(ENV_SCALE, &raw)?);
        }
        if let Some(raw) = lookup(ENV_SPREAD) {
            builder = builder.spread(parse_value(ENV_SPREAD, &raw)?);
        }

        builder.build()
    }
}

fn parse_value<T: std::str::FromStr>(key: &str, raw: &str) -> Result<T> {
    raw.trim().parse::<T>().map_err(|_| {
        SphereError::InvalidArgument(format!("could not parse {}={:?}", key, raw))
    })
}

/// Builder for [`SphereConfig`]; `build()` runs validation.
///
/// ```rust
/// use point_sphere::config::SphereConfigBuilder;
///
/// let config = SphereConfigBuilder::new()
///     .point_count(2000)
///     .scale(1.0)
///     .build()
///     .unwrap();
/// assert_eq!(config.point_count, 2000);
/// ```
#[derive(Debug, Clone, Default)]
pub struct SphereConfigBuilder {
    config: SphereConfig,
}

impl SphereConfigBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn point_count(mut self, point_count: usize) -> Self {
        self.config.point_count = point_count;
        self
    }

    pub fn scale(mut self, scale: f32) -> Self {
        self.config.scale = scale;
        self
    }

    pub fn spread(mut self, spread: f32) -> Self {
        self.config.spread_override = Some(spread);
        self
    }

    pub fn point_size(mut self, point_size: f32) -> Self {
        self.config.point_size = point_size;
        self
    }

    pub fn depth_falloff(mut self, depth_falloff: f32) -> Self {
        self.config.depth_falloff = depth_falloff;
        self
    }

    pub fn rotation_speed(mut self, rotation_speed: f32) -> Self {
        self.config.rotation_speed = rotation_speed;
        self
    }

    pub fn letterbox(mut self, letterbox: bool) -> Self {
        self.config.letterbox = letterbox;
        self
    }

    pub fn build(self) -> Result<SphereConfig> {
        self.config.validate()?;
        Ok(self.config)
    }
}
