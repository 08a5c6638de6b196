use std::num::NonZeroU32;

use crate::{
    color::Rgb,
    error::{SpiroError, SpiroResult},
};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WheelRole {
    Fixed,
    Moving,
}

#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Wheel {
    #[serde(rename = "type")]
    pub role: WheelRole,
    pub teeth: f64, // non-integer during morphs
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub radius: Option<f64>, // derived from teeth when absent
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pen_offset: Option<f64>, // moving wheel only, 0..=1
}

impl Wheel {
    pub fn fixed(teeth: f64) -> Self {
        Self {
            role: WheelRole::Fixed,
            teeth,
            radius: None,
            pen_offset: None,
        }
    }

    pub fn moving(teeth: f64, pen_offset: f64) -> Self {
        Self {
            role: WheelRole::Moving,
            teeth,
            radius: None,
            pen_offset: Some(pen_offset),
        }
    }

    pub fn with_radius(mut self, radius: f64) -> Self {
        self.radius = Some(radius);
        self
    }

    fn validate(&self, index: usize) -> SpiroResult<()> {
        if !self.teeth.is_finite() || self.teeth <= 0.0 {
            return Err(SpiroError::invalid_teeth(format!(
                "wheel {index}: teeth count must be positive, got {}",
                self.teeth
            )));
        }
        if let Some(radius) = self.radius
            && (!radius.is_finite() || radius <= 0.0)
        {
            return Err(SpiroError::invalid_teeth(format!(
                "wheel {index}: radius must be positive, got {radius}"
            )));
        }

        match (self.role, self.pen_offset) {
            (WheelRole::Fixed, Some(_)) => Err(SpiroError::shape_mismatch(format!(
                "wheel {index}: the fixed wheel cannot carry a pen_offset"
            ))),
            (WheelRole::Fixed, None) => Ok(()),
            (WheelRole::Moving, None) => Err(SpiroError::shape_mismatch(format!(
                "wheel {index}: the moving wheel must have a pen_offset"
            ))),
            (WheelRole::Moving, Some(pen)) if !(0.0..=1.0).contains(&pen) => {
                Err(SpiroError::invalid_pen_offset(format!(
                    "wheel {index}: pen_offset must be within [0, 1], got {pen}"
                )))
            }
            (WheelRole::Moving, Some(_)) => Ok(()),
        }
    }
}

/// How many fixed-wheel revolutions to trace: computed for closure, or given explicitly.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(try_from = "RotationCountRepr", into = "RotationCountRepr")]
pub enum RotationCount {
    #[default]
    Auto,
    Count(NonZeroU32),
}

impl RotationCount {
    pub fn count(n: u32) -> SpiroResult<Self> {
        NonZeroU32::new(n)
            .map(Self::Count)
            .ok_or_else(|| SpiroError::validation("rotation count must be a positive integer"))
    }

    pub fn explicit(self) -> Option<u32> {
        match self {
            Self::Auto => None,
            Self::Count(n) => Some(n.get()),
        }
    }
}

#[derive(serde::Serialize, serde::Deserialize)]
#[serde(untagged)]
enum RotationCountRepr {
    Count(u64),
    Keyword(String),
}

impl TryFrom<RotationCountRepr> for RotationCount {
    type Error = SpiroError;

    fn try_from(value: RotationCountRepr) -> Result<Self, Self::Error> {
        match value {
            RotationCountRepr::Keyword(k) if k == "auto" => Ok(Self::Auto),
            RotationCountRepr::Keyword(k) => Err(SpiroError::validation(format!(
                "rotation_count must be a positive integer or \"auto\", got \"{k}\""
            ))),
            RotationCountRepr::Count(n) => {
                let n = u32::try_from(n).map_err(|_| {
                    SpiroError::validation(format!("rotation_count {n} is out of range"))
                })?;
                Self::count(n)
            }
        }
    }
}

impl From<RotationCount> for RotationCountRepr {
    fn from(value: RotationCount) -> Self {
        match value {
            RotationCount::Auto => Self::Keyword("auto".to_string()),
            RotationCount::Count(n) => Self::Count(u64::from(n.get())),
        }
    }
}

/// One declarative spirograph: a fixed wheel, a moving wheel and stroke styling.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct SpiroConfig {
    #[serde(default = "default_name")]
    pub name: String,
    pub wheels: Vec<Wheel>, // exactly one fixed + one moving
    #[serde(default)]
    pub rotation_count: RotationCount,
    #[serde(default)]
    pub color: Rgb,
    #[serde(default = "default_line_width")]
    pub line_width: f64,
}

fn default_name() -> String {
    "Spirograph".to_string()
}

fn default_line_width() -> f64 {
    2.0
}

impl SpiroConfig {
    pub fn new(name: impl Into<String>, fixed: Wheel, moving: Wheel) -> Self {
        Self {
            name: name.into(),
            wheels: vec![fixed, moving],
            rotation_count: RotationCount::Auto,
            color: Rgb::default(),
            line_width: default_line_width(),
        }
    }

    pub fn with_rotation_count(mut self, rotation_count: RotationCount) -> Self {
        self.rotation_count = rotation_count;
        self
    }

    pub fn with_color(mut self, color: Rgb) -> Self {
        self.color = color;
        self
    }

    pub fn with_line_width(mut self, line_width: f64) -> Self {
        self.line_width = line_width;
        self
    }

    /// The fixed and moving wheel, in that order, regardless of their position in `wheels`.
    pub fn wheel_pair(&self) -> SpiroResult<(&Wheel, &Wheel)> {
        let mut fixed = None;
        let mut moving = None;
        for wheel in &self.wheels {
            let slot = match wheel.role {
                WheelRole::Fixed => &mut fixed,
                WheelRole::Moving => &mut moving,
            };
            if slot.replace(wheel).is_some() {
                return Err(SpiroError::shape_mismatch(format!(
                    "config '{}' has more than one {:?} wheel",
                    self.name, wheel.role
                )));
            }
        }

        match (fixed, moving) {
            (Some(f), Some(m)) => Ok((f, m)),
            (None, _) => Err(SpiroError::shape_mismatch(format!(
                "config '{}' has no fixed wheel",
                self.name
            ))),
            (_, None) => Err(SpiroError::shape_mismatch(format!(
                "config '{}' has no moving wheel",
                self.name
            ))),
        }
    }

    pub fn fixed_wheel(&self) -> SpiroResult<&Wheel> {
        self.wheel_pair().map(|(f, _)| f)
    }

    pub fn moving_wheel(&self) -> SpiroResult<&Wheel> {
        self.wheel_pair().map(|(_, m)| m)
    }

    pub fn validate(&self) -> SpiroResult<()> {
        self.wheel_pair()?;
        for (index, wheel) in self.wheels.iter().enumerate() {
            wheel.validate(index)?;
        }
        if !self.line_width.is_finite() || self.line_width <= 0.0 {
            return Err(SpiroError::validation(format!(
                "line width must be positive, got {}",
                self.line_width
            )));
        }
        Ok(())
    }
}
