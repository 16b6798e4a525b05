//! Report rendering
//!
//! Turns an `AssessmentReport` into the fixed-layout text report or the
//! stable JSON shape that external consumers bind to. Both renderers are
//! pure formatting: identical input always yields identical output.

use crate::error::{AssessError, Result};
use crate::models::{AssessmentReport, MetricKind, MetricResult, OverallResult, ResolutionResult};
use serde::Serialize;
use std::fmt::Write as _;

const BANNER: &str = "============================================================";
const RULE: &str = "----------------------------------------";

/// Render the multi-section text report.
pub fn render_text(report: &AssessmentReport) -> String {
    let mut out = String::new();

    let _ = writeln!(out, "{}", BANNER);
    let _ = writeln!(out, "IMAGE QUALITY ASSESSMENT REPORT");
    let _ = writeln!(out, "{}", BANNER);
    let _ = writeln!(out, "Image: {}", report.image);
    let _ = writeln!(out);

    let _ = writeln!(
        out,
        "OVERALL QUALITY: {} ({:.1}%)",
        report.overall.tier, report.overall.score
    );
    let _ = writeln!(out, "{}", report.overall.summary);
    let _ = writeln!(out);

    let _ = writeln!(out, "DETAILED ANALYSIS:");
    let _ = writeln!(out, "{}", RULE);

    let _ = writeln!(out, "Resolution & Detail:");
    let _ = writeln!(out, "  • {}", report.resolution.description);
    let _ = writeln!(out);

    for metric in &report.metrics {
        let _ = writeln!(out, "{}:", metric.kind.title());
        let _ = writeln!(out, "  • Quality: {}", metric.tier);
        let _ = writeln!(out, "  • Score: {:.2} ({})", metric.score, metric.unit_label);
        let _ = writeln!(out, "  • {}", metric.description);
        let _ = writeln!(out);
    }

    let _ = writeln!(out, "RECOMMENDATIONS:");
    let _ = writeln!(out, "{}", RULE);
    for rec in &report.recommendations {
        let _ = writeln!(out, "• {}", rec);
    }

    out
}

/// JSON view with stable field names and canonical metric key order.
#[derive(Serialize)]
struct JsonReport<'a> {
    image: &'a str,
    overall: &'a OverallResult,
    metrics: JsonMetrics<'a>,
    resolution: &'a ResolutionResult,
    recommendations: &'a [String],
}

/// Field declaration order fixes the serialized key order.
#[derive(Serialize)]
struct JsonMetrics<'a> {
    sharpness: &'a MetricResult,
    brightness: &'a MetricResult,
    contrast: &'a MetricResult,
    noise: &'a MetricResult,
    color_balance: &'a MetricResult,
    saturation: &'a MetricResult,
}

fn metric_ref(report: &AssessmentReport, kind: MetricKind) -> Result<&MetricResult> {
    report.metric(kind).ok_or_else(|| {
        AssessError::invalid_input(format!("report has no {} result", kind.key()))
    })
}

/// Serialize the report into the stable JSON structure, pretty-printed.
pub fn render_json(report: &AssessmentReport) -> Result<String> {
    let view = JsonReport {
        image: &report.image,
        overall: &report.overall,
        metrics: JsonMetrics {
            sharpness: metric_ref(report, MetricKind::Sharpness)?,
            brightness: metric_ref(report, MetricKind::Brightness)?,
            contrast: metric_ref(report, MetricKind::Contrast)?,
            noise: metric_ref(report, MetricKind::Noise)?,
            color_balance: metric_ref(report, MetricKind::ColorBalance)?,
            saturation: metric_ref(report, MetricKind::Saturation)?,
        },
        resolution: &report.resolution,
        recommendations: &report.recommendations,
    };

    serde_json::to_string_pretty(&view)
        .map_err(|e| AssessError::invalid_input(format!("failed to serialize report: {}", e)))
}
