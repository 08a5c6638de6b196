use rayon::prelude::*;

use crate::{
    curve::{GeneratedPattern, GeneratorSettings, generate},
    ease::Ease,
    error::{SpiroError, SpiroResult},
    interpolate::{MorphRequest, interpolate},
    model::SpiroConfig,
};

/// Payload returned by the draw API: the pattern plus the wheel numbers it came from.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct DrawResponse {
    #[serde(flatten)]
    pub pattern: GeneratedPattern,
    pub fixed_teeth: f64,
    pub moving_teeth: f64,
    pub pen_offset: f64,
}

/// Validates requests and runs the curve generator and interpolator on them.
#[derive(Clone, Debug, Default)]
pub struct PatternService {
    settings: GeneratorSettings,
}

impl PatternService {
    pub fn new(settings: GeneratorSettings) -> SpiroResult<Self> {
        settings.validate()?;
        Ok(Self { settings })
    }

    pub fn settings(&self) -> &GeneratorSettings {
        &self.settings
    }

    #[tracing::instrument(skip(self, config), fields(name = %config.name))]
    pub fn draw(&self, config: &SpiroConfig) -> SpiroResult<GeneratedPattern> {
        let pattern = generate(config, &self.settings)?;
        tracing::debug!(
            rotation_count = pattern.rotation_count,
            points = pattern.len(),
            "drew pattern"
        );
        Ok(pattern)
    }

    pub fn draw_response(&self, config: &SpiroConfig) -> SpiroResult<DrawResponse> {
        let pattern = self.draw(config)?;
        let (fixed, moving) = config.wheel_pair()?;
        Ok(DrawResponse {
            pattern,
            fixed_teeth: fixed.teeth,
            moving_teeth: moving.teeth,
            pen_offset: moving.pen_offset.unwrap_or(0.0),
        })
    }

    /// Plans a morph from an easing name as received from the API layer.
    #[tracing::instrument(skip(self, a, b), fields(from = %a.name, to = %b.name))]
    pub fn plan_morph(
        &self,
        a: &SpiroConfig,
        b: &SpiroConfig,
        steps: u32,
        easing: &str,
    ) -> SpiroResult<Vec<SpiroConfig>> {
        let ease: Ease = easing.parse()?;
        let plan = interpolate(a, b, steps, ease)?;
        tracing::debug!(frames = plan.len(), "planned morph");
        Ok(plan)
    }

    pub fn plan_request(&self, request: &MorphRequest) -> SpiroResult<Vec<SpiroConfig>> {
        request.plan()
    }

    /// Lazily draws each planned config. Dropping the iterator cancels the remaining frames.
    pub fn frames<'a>(&'a self, plan: &'a [SpiroConfig]) -> MorphFrames<'a> {
        MorphFrames {
            service: self,
            plan,
            next: 0,
        }
    }

    /// Draws every planned config on a dedicated rayon pool, keeping plan order.
    #[tracing::instrument(skip(self, plan), fields(frames = plan.len()))]
    pub fn draw_all(
        &self,
        plan: &[SpiroConfig],
        threads: Option<usize>,
    ) -> SpiroResult<Vec<GeneratedPattern>> {
        let pool = build_thread_pool(threads)?;
        pool.install(|| {
            plan.par_iter()
                .map(|config| generate(config, &self.settings))
                .collect::<SpiroResult<Vec<_>>>()
        })
    }
}

fn build_thread_pool(threads: Option<usize>) -> SpiroResult<rayon::ThreadPool> {
    if let Some(n) = threads
        && n == 0
    {
        return Err(SpiroError::validation("'threads' must be >= 1 when set"));
    }

    let mut builder = rayon::ThreadPoolBuilder::new();
    if let Some(n) = threads {
        builder = builder.num_threads(n);
    }
    builder
        .build()
        .map_err(|e| SpiroError::Other(anyhow::anyhow!("failed to build rayon thread pool: {e}")))
}

/// One materialized morph frame with its position in the plan.
#[derive(Clone, Debug, PartialEq)]
pub struct MorphFrame {
    pub index: usize,
    pub total: usize,
    pub pattern: GeneratedPattern,
}

impl MorphFrame {
    /// Fraction of the plan drawn once this frame is done, in `(0, 1]`.
    pub fn progress(&self) -> f64 {
        (self.index + 1) as f64 / self.total as f64
    }
}

pub struct MorphFrames<'a> {
    service: &'a PatternService,
    plan: &'a [SpiroConfig],
    next: usize,
}

impl Iterator for MorphFrames<'_> {
    type Item = SpiroResult<MorphFrame>;

    fn next(&mut self) -> Option<Self::Item> {
        let config = self.plan.get(self.next)?;
        let index = self.next;
        self.next += 1;
        Some(self.service.draw(config).map(|pattern| MorphFrame {
            index,
            total: self.plan.len(),
            pattern,
        }))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = self.plan.len() - self.next;
        (remaining, Some(remaining))
    }
}

impl ExactSizeIterator for MorphFrames<'_> {}
