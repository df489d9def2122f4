use std::path::Path;

use plotters::coord::Shift;
use plotters::prelude::*;
use tracing::debug;

use crate::{PlotError, PlotResult, FONT};

const PANEL_WIDTH: u32 = 500;
const HEIGHT: u32 = 500;
const BAR_COLORS: [RGBColor; 3] = [RED, YELLOW, GREEN];

/// One bar-chart panel: a metric compared across models.
#[derive(Debug, Clone, PartialEq)]
pub struct BarGroup {
    pub title: String,
    pub metric_label: String,
    /// Height of the horizontal reference line, e.g. a random classifier's score.
    pub reference: f64,
    pub bars: Vec<(String, f64)>,
}

pub(crate) fn validate(groups: &[BarGroup]) -> PlotResult<()> {
    if groups.is_empty() {
        return Err(PlotError::NoData("no bar groups given".into()));
    }
    for g in groups {
        if g.bars.is_empty() {
            return Err(PlotError::NoData(format!("panel '{}' has no bars", g.title)));
        }
        if !g.reference.is_finite() || g.bars.iter().any(|(_, v)| !v.is_finite()) {
            return Err(PlotError::NonFinite(g.title.clone()));
        }
    }
    Ok(())
}

/// Value label drawn above a bar; kept inside the `[0, 1]` plot range.
pub(crate) fn annotation(value: f64) -> (String, f64) {
    (format!("{value:.3}"), (value + 0.06).min(0.98))
}

fn draw_panel(area: &DrawingArea<SVGBackend<'_>, Shift>, group: &BarGroup) -> PlotResult<()> {
    let n = group.bars.len() as u32;
    let mut chart = ChartBuilder::on(area)
        .caption(group.title.as_str(), (FONT, 20).into_font())
        .margin(15)
        .x_label_area_size(35)
        .y_label_area_size(45)
        .build_cartesian_2d((0u32..n).into_segmented(), 0f64..1f64)?;

    let names: Vec<&str> = group.bars.iter().map(|(name, _)| name.as_str()).collect();
    chart
        .configure_mesh()
        .disable_x_mesh()
        .y_desc(group.metric_label.as_str())
        .light_line_style(BLACK.mix(0.05))
        .x_label_formatter(&|v: &SegmentValue<u32>| match v {
            SegmentValue::CenterOf(i) => names.get(*i as usize).map(|s| s.to_string()).unwrap_or_default(),
            _ => String::new(),
        })
        .draw()?;

    chart.draw_series(group.bars.iter().enumerate().map(|(i, (_, value))| {
        let i = i as u32;
        let color = BAR_COLORS[i as usize % BAR_COLORS.len()];
        let mut bar = Rectangle::new(
            [(SegmentValue::Exact(i), 0.0), (SegmentValue::Exact(i + 1), *value)],
            color.mix(0.8).filled(),
        );
        bar.set_margin(0, 0, 12, 12);
        bar
    }))?;

    chart.draw_series(group.bars.iter().enumerate().map(|(i, (_, value))| {
        let (text, y) = annotation(*value);
        Text::new(text, (SegmentValue::CenterOf(i as u32), y), (FONT, 14).into_font())
    }))?;

    chart.draw_series(LineSeries::new(
        vec![
            (SegmentValue::Exact(0), group.reference),
            (SegmentValue::Exact(n), group.reference),
        ],
        BLACK.mix(0.6).stroke_width(1),
    ))?;

    Ok(())
}

/// Side-by-side bar panels, one per group, in a single SVG.
pub fn render_score_comparison<P: AsRef<Path>>(path: P, groups: &[BarGroup]) -> PlotResult<()> {
    validate(groups)?;
    let path = path.as_ref();

    let width = PANEL_WIDTH * groups.len() as u32;
    let root = SVGBackend::new(path, (width, HEIGHT)).into_drawing_area();
    root.fill(&WHITE)?;

    let panels = root.split_evenly((1, groups.len()));
    for (panel, group) in panels.iter().zip(groups) {
        draw_panel(panel, group)?;
    }

    root.present()?;
    debug!(path = %path.display(), panels = groups.len(), "rendered bar comparison");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn group(values: &[f64]) -> BarGroup {
        BarGroup {
            title: "ROC-AUC".into(),
            metric_label: "score".into(),
            reference: 0.5,
            bars: values
                .iter()
                .enumerate()
                .map(|(i, v)| (format!("Model {i}"), *v))
                .collect(),
        }
    }

    #[test]
    fn test_validate() {
        assert!(matches!(validate(&[]), Err(PlotError::NoData(_))));
        assert!(matches!(validate(&[group(&[])]), Err(PlotError::NoData(_))));
        assert!(matches!(validate(&[group(&[0.5, f64::INFINITY])]), Err(PlotError::NonFinite(_))));
        assert!(validate(&[group(&[0.2, 0.6, 0.9])]).is_ok());
    }

    #[test]
    fn test_annotation() {
        assert_eq!(annotation(0.5).0, "0.500");
        assert!((annotation(0.5).1 - 0.56).abs() < 1e-12);
        assert_eq!(annotation(0.99).1, 0.98);
    }
}
