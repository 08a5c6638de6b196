use std::f64::consts::TAU;

use kurbo::{Point, Rect};
use num_integer::Integer as _;

use crate::{
    error::{SpiroError, SpiroResult},
    model::{RotationCount, SpiroConfig},
};

pub const DEFAULT_POINTS_PER_ROTATION: u32 = 360;
pub const DEFAULT_MAX_POINTS: usize = 2_000_000;

/// Sampling resolution for point generation.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct GeneratorSettings {
    #[serde(default = "default_points_per_rotation")]
    pub points_per_rotation: u32,
    #[serde(default = "default_max_points")]
    pub max_points: usize, // hard cap on a single pattern
}

fn default_points_per_rotation() -> u32 {
    DEFAULT_POINTS_PER_ROTATION
}

fn default_max_points() -> usize {
    DEFAULT_MAX_POINTS
}

impl Default for GeneratorSettings {
    fn default() -> Self {
        Self {
            points_per_rotation: DEFAULT_POINTS_PER_ROTATION,
            max_points: DEFAULT_MAX_POINTS,
        }
    }
}

impl GeneratorSettings {
    pub fn validate(&self) -> SpiroResult<()> {
        if self.points_per_rotation == 0 {
            return Err(SpiroError::validation("points_per_rotation must be > 0"));
        }
        if self.max_points < 2 {
            return Err(SpiroError::validation("max_points must be >= 2"));
        }
        Ok(())
    }
}

/// Fixed-wheel revolutions after which both wheels are back in their starting relative
/// position: `R / gcd(R, r)`.
pub fn required_rotations(fixed_teeth: u64, moving_teeth: u64) -> SpiroResult<u64> {
    if fixed_teeth == 0 || moving_teeth == 0 {
        return Err(SpiroError::invalid_teeth(format!(
            "teeth counts must be positive, got fixed={fixed_teeth} moving={moving_teeth}"
        )));
    }
    Ok(fixed_teeth / fixed_teeth.gcd(&moving_teeth))
}

// GCD needs whole numbers; morph frames round to the nearest tooth.
fn whole_teeth(teeth: f64) -> SpiroResult<u64> {
    if !teeth.is_finite() || teeth <= 0.0 {
        return Err(SpiroError::invalid_teeth(format!(
            "teeth count must be positive, got {teeth}"
        )));
    }
    Ok(teeth.round().max(1.0) as u64)
}

/// Rotation count a config will be drawn with, resolving `Auto` through [`required_rotations`].
pub fn resolve_rotations(config: &SpiroConfig) -> SpiroResult<u32> {
    match config.rotation_count {
        RotationCount::Count(n) => Ok(n.get()),
        RotationCount::Auto => {
            let (fixed, moving) = config.wheel_pair()?;
            let rotations =
                required_rotations(whole_teeth(fixed.teeth)?, whole_teeth(moving.teeth)?)?;
            u32::try_from(rotations).map_err(|_| {
                SpiroError::validation(format!("auto rotation count {rotations} is out of range"))
            })
        }
    }
}

/// Radii of a hypotrochoid, in the units the points are emitted in.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Hypotrochoid {
    pub fixed_radius: f64,
    pub moving_radius: f64,
    pub pen_distance: f64,
}

impl Hypotrochoid {
    /// Fixed radius defaults to 1; the moving radius defaults to the teeth ratio of that.
    pub fn from_config(config: &SpiroConfig) -> SpiroResult<Self> {
        let (fixed, moving) = config.wheel_pair()?;
        let fixed_radius = fixed.radius.unwrap_or(1.0);
        let moving_radius = moving
            .radius
            .unwrap_or(fixed_radius * moving.teeth / fixed.teeth);
        if !moving_radius.is_finite() || moving_radius <= 0.0 {
            return Err(SpiroError::invalid_teeth(format!(
                "moving wheel radius must be positive, got {moving_radius}"
            )));
        }

        Ok(Self {
            fixed_radius,
            moving_radius,
            pen_distance: moving.pen_offset.unwrap_or(0.0) * moving_radius,
        })
    }

    pub fn point_at(&self, t: f64) -> Point {
        let diff = self.fixed_radius - self.moving_radius;
        let spin = diff * t / self.moving_radius;
        Point::new(
            diff * t.cos() + self.pen_distance * spin.cos(),
            diff * t.sin() - self.pen_distance * spin.sin(),
        )
    }

    /// Samples `t` over `[0, rotations * 2pi]`, both ends included.
    pub fn trace(
        &self,
        rotations: u32,
        settings: &GeneratorSettings,
    ) -> SpiroResult<Vec<Point>> {
        settings.validate()?;
        if rotations == 0 {
            return Err(SpiroError::validation("rotation count must be > 0"));
        }

        let steps = u64::from(rotations) * u64::from(settings.points_per_rotation);
        let total = usize::try_from(steps + 1)
            .ok()
            .filter(|n| *n <= settings.max_points)
            .ok_or_else(|| {
                SpiroError::validation(format!(
                    "pattern needs {} points, limit is {}",
                    steps + 1,
                    settings.max_points
                ))
            })?;

        let sweep = TAU * f64::from(rotations);
        let mut points = Vec::with_capacity(total);
        for i in 0..=steps {
            let t = (i as f64 / steps as f64) * sweep;
            points.push(self.point_at(t));
        }
        Ok(points)
    }
}

/// Ordered samples of one curve plus the rotation count they cover.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct GeneratedPattern {
    #[serde(with = "point_pairs")]
    pub points: Vec<Point>,
    pub rotation_count: u32,
}

impl GeneratedPattern {
    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn bounds(&self) -> Option<Rect> {
        let (first, rest) = self.points.split_first()?;
        Some(
            rest.iter()
                .fold(Rect::from_points(*first, *first), |r, p| r.union_pt(*p)),
        )
    }

    /// First and last samples coincide within `tolerance`.
    pub fn is_closed(&self, tolerance: f64) -> bool {
        match (self.points.first(), self.points.last()) {
            (Some(a), Some(b)) => a.distance(*b) <= tolerance,
            _ => false,
        }
    }
}

/// Draws one configuration. Never mutates `config`.
pub fn generate(config: &SpiroConfig, settings: &GeneratorSettings) -> SpiroResult<GeneratedPattern> {
    config.validate()?;
    let rotation_count = resolve_rotations(config)?;
    let curve = Hypotrochoid::from_config(config)?;
    let points = curve.trace(rotation_count, settings)?;
    Ok(GeneratedPattern {
        points,
        rotation_count,
    })
}

/// Closure facts about a pair of teeth counts.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct PatternInfo {
    pub fixed_teeth: f64,
    pub moving_teeth: f64,
    pub are_integers: bool,
    pub required_rotations: u64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub gcd: Option<u64>, // only for integral teeth
}

pub fn pattern_info(fixed_teeth: f64, moving_teeth: f64) -> SpiroResult<PatternInfo> {
    let fixed = whole_teeth(fixed_teeth)?;
    let moving = whole_teeth(moving_teeth)?;
    let are_integers = fixed_teeth.fract() == 0.0 && moving_teeth.fract() == 0.0;
    Ok(PatternInfo {
        fixed_teeth,
        moving_teeth,
        are_integers,
        required_rotations: required_rotations(fixed, moving)?,
        gcd: are_integers.then(|| fixed.gcd(&moving)),
    })
}

mod point_pairs {
    use kurbo::Point;
    use serde::{Deserialize as _, Deserializer, Serializer, ser::SerializeSeq as _};

    pub fn serialize<S: Serializer>(points: &[Point], s: S) -> Result<S::Ok, S::Error> {
        let mut seq = s.serialize_seq(Some(points.len()))?;
        for p in points {
            seq.serialize_element(&[p.x, p.y])?;
        }
        seq.end()
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<Vec<Point>, D::Error> {
        let pairs = Vec::<[f64; 2]>::deserialize(d)?;
        Ok(pairs.into_iter().map(|[x, y]| Point::new(x, y)).collect())
    }
}
