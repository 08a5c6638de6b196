use std::num::NonZeroU32;

use crate::{
    color::Rgb,
    curve::resolve_rotations,
    ease::Ease,
    error::{SpiroError, SpiroResult},
    model::{RotationCount, SpiroConfig, Wheel},
};

pub trait Lerp: Sized {
    fn lerp(a: &Self, b: &Self, t: f64) -> Self;
}

impl Lerp for f64 {
    fn lerp(a: &Self, b: &Self, t: f64) -> Self {
        a + (b - a) * t
    }
}

// Optional wheel fields blend only when both sides carry them.
impl Lerp for Option<f64> {
    fn lerp(a: &Self, b: &Self, t: f64) -> Self {
        match (a, b) {
            (Some(a), Some(b)) => Some(f64::lerp(a, b, t)),
            (Some(v), None) | (None, Some(v)) => Some(*v),
            (None, None) => None,
        }
    }
}

impl Lerp for Rgb {
    fn lerp(a: &Self, b: &Self, t: f64) -> Self {
        fn lerp_u8(a: u8, b: u8, t: f64) -> u8 {
            let a = f64::from(a);
            let b = f64::from(b);
            (a + (b - a) * t).round().clamp(0.0, 255.0) as u8
        }

        Self {
            r: lerp_u8(a.r, b.r, t),
            g: lerp_u8(a.g, b.g, t),
            b: lerp_u8(a.b, b.b, t),
        }
    }
}

impl Lerp for Wheel {
    fn lerp(a: &Self, b: &Self, t: f64) -> Self {
        Self {
            role: a.role,
            teeth: f64::lerp(&a.teeth, &b.teeth, t),
            radius: Option::<f64>::lerp(&a.radius, &b.radius, t),
            pen_offset: Option::<f64>::lerp(&a.pen_offset, &b.pen_offset, t),
        }
    }
}

/// Eases `t` then blends `a` toward `b`.
pub fn mix<T: Lerp>(a: &T, b: &T, t: f64, ease: Ease) -> T {
    T::lerp(a, b, ease.apply(t))
}

/// Rotation count given to the intermediate frames of a morph.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum RotationPolicy {
    /// Larger of the two endpoints' resolved rotation counts.
    #[default]
    MaxOfEndpoints,
    /// Each frame closes on its own blended teeth counts.
    PerFrame,
    Constant(NonZeroU32),
}

impl RotationPolicy {
    fn resolve(self, a: &SpiroConfig, b: &SpiroConfig) -> SpiroResult<RotationCount> {
        match self {
            Self::MaxOfEndpoints => {
                RotationCount::count(resolve_rotations(a)?.max(resolve_rotations(b)?))
            }
            Self::PerFrame => Ok(RotationCount::Auto),
            Self::Constant(n) => Ok(RotationCount::Count(n)),
        }
    }
}

/// Two endpoint configs plus pacing, as posted to the interpolate API.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct MorphRequest {
    pub config_a: SpiroConfig,
    pub config_b: SpiroConfig,
    #[serde(default = "default_steps")]
    pub steps: u32,
    #[serde(default)]
    pub easing: Ease,
    #[serde(default)]
    pub rotation_policy: RotationPolicy,
}

fn default_steps() -> u32 {
    10
}

impl MorphRequest {
    pub fn new(config_a: SpiroConfig, config_b: SpiroConfig, steps: u32, easing: Ease) -> Self {
        Self {
            config_a,
            config_b,
            steps,
            easing,
            rotation_policy: RotationPolicy::default(),
        }
    }

    pub fn plan(&self) -> SpiroResult<Vec<SpiroConfig>> {
        interpolate_with(
            &self.config_a,
            &self.config_b,
            self.steps,
            self.easing,
            self.rotation_policy,
        )
    }
}

/// `steps + 1` configs from `a` to `b`, paced by `ease`.
pub fn interpolate(
    a: &SpiroConfig,
    b: &SpiroConfig,
    steps: u32,
    ease: Ease,
) -> SpiroResult<Vec<SpiroConfig>> {
    interpolate_with(a, b, steps, ease, RotationPolicy::default())
}

pub fn interpolate_with(
    a: &SpiroConfig,
    b: &SpiroConfig,
    steps: u32,
    ease: Ease,
    policy: RotationPolicy,
) -> SpiroResult<Vec<SpiroConfig>> {
    if steps == 0 {
        return Err(SpiroError::invalid_steps("steps must be >= 1"));
    }
    a.validate()?;
    b.validate()?;
    let (fixed_a, moving_a) = a.wheel_pair()?;
    let (fixed_b, moving_b) = b.wheel_pair()?;
    let rotation_count = policy.resolve(a, b)?;

    let mut frames = Vec::with_capacity(steps as usize + 1);
    // Endpoints are cloned, not blended, so they round-trip bit-for-bit.
    frames.push(a.clone());
    for i in 1..steps {
        let e = ease.apply(f64::from(i) / f64::from(steps));
        frames.push(SpiroConfig {
            name: frame_name(a, b, i, steps),
            wheels: vec![
                Wheel::lerp(fixed_a, fixed_b, e),
                Wheel::lerp(moving_a, moving_b, e),
            ],
            rotation_count,
            color: Rgb::lerp(&a.color, &b.color, e),
            line_width: f64::lerp(&a.line_width, &b.line_width, e),
        });
    }
    frames.push(b.clone());
    Ok(frames)
}

fn frame_name(a: &SpiroConfig, b: &SpiroConfig, i: u32, steps: u32) -> String {
    if a.name == b.name {
        a.name.clone()
    } else {
        format!("{} → {} (step {i}/{steps})", a.name, b.name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::WheelRole;

    fn flower() -> SpiroConfig {
        SpiroConfig::new("Flower", Wheel::fixed(100.0), Wheel::moving(50.0, 0.5))
            .with_color(Rgb::new(0, 0, 0))
            .with_line_width(1.0)
    }

    fn star() -> SpiroConfig {
        SpiroConfig::new("Star", Wheel::fixed(84.0), Wheel::moving(21.0, 0.7))
            .with_color(Rgb::new(255, 255, 255))
            .with_line_width(3.0)
    }

    fn moving(cfg: &SpiroConfig) -> &Wheel {
        cfg.moving_wheel().unwrap()
    }

    #[test]
    fn endpoints_are_exact_for_every_ease_and_step_count() {
        let (a, b) = (flower(), star());
        for ease in Ease::ALL {
            for steps in 1..=7 {
                let frames = interpolate(&a, &b, steps, ease).unwrap();
                assert_eq!(frames.len(), steps as usize + 1);
                assert_eq!(frames[0], a);
                assert_eq!(frames[steps as usize], b);
            }
        }
    }

    #[test]
    fn single_step_is_just_the_endpoints() {
        let frames = interpolate(&flower(), &star(), 1, Ease::Linear).unwrap();
        assert_eq!(frames, vec![flower(), star()]);
    }

    #[test]
    fn intermediate_teeth_are_non_integer_and_bounded() {
        let frames = interpolate(&flower(), &star(), 4, Ease::Linear).unwrap();
        let mid = moving(&frames[2]).teeth;
        assert_eq!(mid, 35.5);
        assert!(21.0 < mid && mid < 50.0);
        assert_eq!(frames[2].fixed_wheel().unwrap().teeth, 92.0);
    }

    #[test]
    fn teeth_progress_monotonically() {
        for ease in Ease::ALL {
            let frames = interpolate(&flower(), &star(), 8, ease).unwrap();
            let teeth: Vec<f64> = frames.iter().map(|c| moving(c).teeth).collect();
            assert!(teeth.windows(2).all(|w| w[0] >= w[1]), "{ease}: {teeth:?}");
        }
    }

    #[test]
    fn easing_shapes_the_progress() {
        let frames = interpolate(&flower(), &star(), 2, Ease::EaseIn).unwrap();
        // ease-in at 0.5 is 0.25 of the way from 50 to 21.
        assert_eq!(moving(&frames[1]).teeth, 50.0 + 0.25 * (21.0 - 50.0));
        assert_eq!(frames[1].line_width, 1.5);
    }

    #[test]
    fn color_midpoint_rounds_to_nearest() {
        let frames = interpolate(&flower(), &star(), 2, Ease::Linear).unwrap();
        assert_eq!(frames[1].color, Rgb::new(0x80, 0x80, 0x80));
        assert_eq!(frames[1].color.to_hex(), "#808080");

        let red = Rgb::new(255, 0, 0);
        let blue = Rgb::new(0, 0, 255);
        assert_eq!(mix(&red, &blue, 0.0, Ease::Linear), red);
        assert_eq!(mix(&red, &blue, 1.0, Ease::Linear), blue);
    }

    #[test]
    fn intermediate_rotation_count_is_max_of_endpoints() {
        // 100/50 closes after 2 rotations, 84/21 after 4.
        let frames = interpolate(&flower(), &star(), 3, Ease::Linear).unwrap();
        for frame in &frames[1..3] {
            assert_eq!(frame.rotation_count.explicit(), Some(4));
        }
        assert_eq!(frames[0].rotation_count, RotationCount::Auto);
    }

    #[test]
    fn explicit_endpoint_counts_feed_the_max() {
        let a = flower().with_rotation_count(RotationCount::count(9).unwrap());
        let frames = interpolate(&a, &star(), 2, Ease::Linear).unwrap();
        assert_eq!(frames[1].rotation_count.explicit(), Some(9));
    }

    #[test]
    fn constant_policy_overrides_max() {
        let policy = RotationPolicy::Constant(NonZeroU32::new(50).unwrap());
        let frames = interpolate_with(&flower(), &star(), 2, Ease::Linear, policy).unwrap();
        assert_eq!(frames[1].rotation_count.explicit(), Some(50));
    }

    #[test]
    fn per_frame_policy_recomputes_closure() {
        let frames =
            interpolate_with(&flower(), &star(), 2, Ease::Linear, RotationPolicy::PerFrame)
                .unwrap();
        // Midpoint is 92 / 35.5 teeth, drawn as 92 / 36.
        assert_eq!(frames[1].rotation_count, RotationCount::Auto);
        assert_eq!(resolve_rotations(&frames[1]).unwrap(), 23);
    }

    #[test]
    fn radius_on_one_side_is_carried_through() {
        let mut a = flower();
        a.wheels[1].radius = Some(0.5);
        let frames = interpolate(&a, &star(), 2, Ease::Linear).unwrap();
        assert_eq!(moving(&frames[1]).radius, Some(0.5));

        let mut b = star();
        b.wheels[1].radius = Some(0.8);
        let frames = interpolate(&a, &b, 2, Ease::Linear).unwrap();
        let r = moving(&frames[1]).radius.unwrap();
        assert!((r - 0.65).abs() < 1e-12);
    }

    #[test]
    fn wheel_order_in_input_does_not_matter() {
        let mut b = star();
        b.wheels.reverse();
        let frames = interpolate(&flower(), &b, 2, Ease::Linear).unwrap();
        assert_eq!(frames[1].wheels[0].role, WheelRole::Fixed);
        assert_eq!(frames[1].wheels[1].role, WheelRole::Moving);
        assert_eq!(frames[2], b);
    }

    #[test]
    fn identical_configs_stay_put() {
        let frames = interpolate(&flower(), &flower(), 3, Ease::EaseInOut).unwrap();
        for frame in &frames {
            assert_eq!(moving(frame).teeth, 50.0);
            assert_eq!(frame.name, "Flower");
        }
    }

    #[test]
    fn differing_names_are_synthesized() {
        let frames = interpolate(&flower(), &star(), 4, Ease::Linear).unwrap();
        assert_eq!(frames[0].name, "Flower");
        assert_eq!(frames[2].name, "Flower → Star (step 2/4)");
        assert_eq!(frames[4].name, "Star");
    }

    #[test]
    fn zero_steps_is_rejected() {
        let err = interpolate(&flower(), &star(), 0, Ease::Linear).unwrap_err();
        assert!(matches!(err, SpiroError::InvalidStepCount(_)));
    }

    #[test]
    fn mismatched_roles_are_rejected() {
        let mut b = star();
        b.wheels[0] = Wheel::moving(84.0, 0.2);
        let err = interpolate(&flower(), &b, 3, Ease::Linear).unwrap_err();
        assert!(matches!(err, SpiroError::ConfigShapeMismatch(_)));
    }

    #[test]
    fn morph_request_parses_api_payload() {
        let s = r#"{
            "config_a": {"wheels": [{"type": "fixed", "teeth": 100},
                                    {"type": "moving", "teeth": 50, "pen_offset": 0.5}]},
            "config_b": {"wheels": [{"type": "fixed", "teeth": 84},
                                    {"type": "moving", "teeth": 21, "pen_offset": 0.7}]},
            "steps": 5,
            "easing": "ease-in-out"
        }"#;
        let req: MorphRequest = serde_json::from_str(s).unwrap();
        assert_eq!(req.easing, Ease::EaseInOut);
        assert_eq!(req.rotation_policy, RotationPolicy::MaxOfEndpoints);
        assert_eq!(req.plan().unwrap().len(), 6);
    }
}
