//! Static SVG export of a drawn pattern.
//!
//! The curve is scaled uniformly to fit a square canvas and flipped so that +y points up, the
//! same orientation the pattern coordinates use.

use kurbo::{Affine, BezPath, Rect};

use crate::{
    color::Rgb,
    curve::GeneratedPattern,
    error::{SpiroError, SpiroResult},
    model::SpiroConfig,
};

#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct SvgOptions {
    #[serde(default = "default_size")]
    pub size: f64,
    #[serde(default = "default_margin")]
    pub margin: f64,
    #[serde(default)]
    pub background: Option<Rgb>,
}

fn default_size() -> f64 {
    600.0
}

fn default_margin() -> f64 {
    20.0
}

impl Default for SvgOptions {
    fn default() -> Self {
        Self {
            size: default_size(),
            margin: default_margin(),
            background: None,
        }
    }
}

impl SvgOptions {
    pub fn validate(&self) -> SpiroResult<()> {
        if !self.size.is_finite() || self.size <= 0.0 {
            return Err(SpiroError::validation("svg size must be finite and > 0"));
        }
        if !self.margin.is_finite() || self.margin < 0.0 || 2.0 * self.margin >= self.size {
            return Err(SpiroError::validation(
                "svg margin must be >= 0 and leave room for the drawing",
            ));
        }
        Ok(())
    }
}

/// Maps `bounds` into a `size` x `size` canvas, centered, with `margin` on the longer side.
pub fn fit_to_canvas(bounds: Rect, size: f64, margin: f64) -> Affine {
    let extent = bounds.width().max(bounds.height());
    let scale = if extent > 0.0 {
        (size - 2.0 * margin) / extent
    } else {
        1.0
    };
    let center = bounds.center();
    Affine::translate((size / 2.0, size / 2.0))
        * Affine::scale_non_uniform(scale, -scale)
        * Affine::translate(-center.to_vec2())
}

/// Polyline through every sample, in pattern coordinates.
pub fn pattern_path(pattern: &GeneratedPattern) -> BezPath {
    let mut path = BezPath::new();
    let mut points = pattern.points.iter();
    if let Some(first) = points.next() {
        path.move_to(*first);
        for p in points {
            path.line_to(*p);
        }
    }
    path
}

/// Renders `pattern` with the stroke color and width of `style`.
pub fn render_svg(
    pattern: &GeneratedPattern,
    style: &SpiroConfig,
    options: &SvgOptions,
) -> SpiroResult<String> {
    options.validate()?;
    let Some(bounds) = pattern.bounds() else {
        return Err(SpiroError::validation("cannot export an empty pattern"));
    };

    let mut path = pattern_path(pattern);
    path.apply_affine(fit_to_canvas(bounds, options.size, options.margin));

    let size = options.size;
    let mut lines = vec![
        format!(
            r#"<svg xmlns="http://www.w3.org/2000/svg" width="{size}" height="{size}" viewBox="0 0 {size} {size}">"#
        ),
        format!("  <title>{}</title>", escape_xml(&style.name)),
    ];
    if let Some(bg) = options.background {
        lines.push(format!(
            r#"  <rect width="100%" height="100%" fill="{bg}"/>"#
        ));
    }
    lines.push(format!(
        r#"  <path d="{}" fill="none" stroke="{}" stroke-width="{}" stroke-linejoin="round" stroke-linecap="round"/>"#,
        path.to_svg(),
        style.color,
        style.line_width
    ));
    lines.push("</svg>\n".to_string());
    Ok(lines.join("\n"))
}

fn escape_xml(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            _ => out.push(c),
        }
    }
    out
}
