use std::path::Path;

use plotters::prelude::*;
use tracing::debug;

use crate::{PlotError, PlotResult, FONT};

const SIZE: (u32, u32) = (800, 600);

/// One labelled polyline, e.g. a model's ROC curve.
#[derive(Debug, Clone, PartialEq)]
pub struct CurveSeries {
    pub label: String,
    pub points: Vec<(f64, f64)>,
}

impl CurveSeries {
    pub fn new(label: impl Into<String>, xs: &[f64], ys: &[f64]) -> Self {
        CurveSeries {
            label: label.into(),
            points: xs.iter().copied().zip(ys.iter().copied()).collect(),
        }
    }
}

pub(crate) fn validate(series: &[CurveSeries]) -> PlotResult<()> {
    if series.is_empty() {
        return Err(PlotError::NoData("no series given".into()));
    }
    for s in series {
        if s.points.is_empty() {
            return Err(PlotError::NoData(format!("series '{}' has no points", s.label)));
        }
        if s.points.iter().any(|(x, y)| !x.is_finite() || !y.is_finite()) {
            return Err(PlotError::NonFinite(s.label.clone()));
        }
    }
    Ok(())
}

/// Split the segment `from → to` into `dashes` visible pieces with equal gaps.
pub(crate) fn dashed_segments(from: (f64, f64), to: (f64, f64), dashes: usize) -> Vec<[(f64, f64); 2]> {
    let steps = (dashes * 2).max(1) as f64;
    let lerp = |t: f64| (from.0 + (to.0 - from.0) * t, from.1 + (to.1 - from.1) * t);
    (0..dashes)
        .map(|i| {
            let start = (2 * i) as f64 / steps;
            [lerp(start), lerp(start + 1.0 / steps)]
        })
        .collect()
}

struct UnitChart<'a> {
    caption: &'a str,
    x_desc: &'a str,
    y_desc: &'a str,
    legend: SeriesLabelPosition,
    reference: Option<(&'a str, (f64, f64), (f64, f64))>,
}

fn render_unit_chart(path: &Path, layout: UnitChart<'_>, series: &[CurveSeries]) -> PlotResult<()> {
    validate(series)?;

    let root = SVGBackend::new(path, SIZE).into_drawing_area();
    root.fill(&WHITE)?;

    let mut chart = ChartBuilder::on(&root)
        .caption(layout.caption, (FONT, 24).into_font())
        .margin(20)
        .x_label_area_size(40)
        .y_label_area_size(50)
        .build_cartesian_2d(0f64..1f64, 0f64..1.02f64)?;

    chart
        .configure_mesh()
        .x_desc(layout.x_desc)
        .y_desc(layout.y_desc)
        .bold_line_style(BLACK.mix(0.15))
        .light_line_style(BLACK.mix(0.05))
        .draw()?;

    for (idx, s) in series.iter().enumerate() {
        let color = Palette99::pick(idx).to_rgba();
        chart
            .draw_series(LineSeries::new(s.points.iter().copied(), color.stroke_width(2)))?
            .label(s.label.as_str())
            .legend(move |(x, y)| PathElement::new(vec![(x, y), (x + 20, y)], color.stroke_width(2)));
    }

    if let Some((label, from, to)) = layout.reference {
        chart
            .draw_series(
                dashed_segments(from, to, 30)
                    .into_iter()
                    .map(|seg| PathElement::new(seg.to_vec(), BLACK.stroke_width(1))),
            )?
            .label(label)
            .legend(|(x, y)| PathElement::new(vec![(x, y), (x + 8, y), (x + 12, y), (x + 20, y)], BLACK.stroke_width(1)));
    }

    chart
        .configure_series_labels()
        .position(layout.legend)
        .background_style(WHITE.mix(0.85))
        .border_style(BLACK)
        .draw()?;

    root.present()?;
    debug!(path = %path.display(), series = series.len(), "rendered chart");
    Ok(())
}

/// ROC curves for several models with the diagonal of a random classifier.
pub fn render_roc_curves<P: AsRef<Path>>(path: P, series: &[CurveSeries]) -> PlotResult<()> {
    render_unit_chart(
        path.as_ref(),
        UnitChart {
            caption: "ROC curves",
            x_desc: "False Positive Rate",
            y_desc: "True Positive Rate",
            legend: SeriesLabelPosition::LowerRight,
            reference: Some(("Random classifier", (0.0, 0.0), (1.0, 1.0))),
        },
        series,
    )
}

/// Precision-recall curves with the horizontal positive-rate baseline.
pub fn render_pr_curves<P: AsRef<Path>>(path: P, series: &[CurveSeries], baseline: f64) -> PlotResult<()> {
    let label = random_baseline_label(baseline);
    render_unit_chart(
        path.as_ref(),
        UnitChart {
            caption: "Precision-recall curves",
            x_desc: "Recall",
            y_desc: "Precision",
            legend: SeriesLabelPosition::UpperRight,
            reference: Some((label.as_str(), (0.0, baseline), (1.0, baseline))),
        },
        series,
    )
}

pub fn random_baseline_label(baseline: f64) -> String {
    format!("Random classifier (AP = {baseline:.3})")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_curve_series_zips_coordinates() {
        let s = CurveSeries::new("Model A", &[0.0, 0.5, 1.0], &[0.0, 0.7, 1.0]);
        assert_eq!(s.points, vec![(0.0, 0.0), (0.5, 0.7), (1.0, 1.0)]);
    }

    #[test]
    fn test_validate() {
        assert!(matches!(validate(&[]), Err(PlotError::NoData(_))));
        let empty = CurveSeries::new("empty", &[], &[]);
        assert!(matches!(validate(&[empty]), Err(PlotError::NoData(_))));
        let bad = CurveSeries::new("bad", &[0.0, f64::NAN], &[0.0, 1.0]);
        assert!(matches!(validate(&[bad]), Err(PlotError::NonFinite(l)) if l == "bad"));
    }

    #[test]
    fn test_dashed_segments() {
        let segs = dashed_segments((0.0, 0.0), (1.0, 1.0), 2);
        assert_eq!(segs.len(), 2);
        assert_eq!(segs[0], [(0.0, 0.0), (0.25, 0.25)]);
        assert_eq!(segs[1], [(0.5, 0.5), (0.75, 0.75)]);
    }

    #[test]
    fn test_baseline_label() {
        assert_eq!(random_baseline_label(0.02), "Random classifier (AP = 0.020)");
    }
}
