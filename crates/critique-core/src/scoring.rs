//! Score normalization and weighted aggregation
//!
//! Raw statistics live on wildly different scales (Laplacian variance in
//! the hundreds, channel deviation in tens), so each is first mapped onto
//! a common 0-100 scale anchored to its own tier boundaries: Poor spans
//! 0-49, Fair 50-64, Good 65-89, Excellent 90-100, linear within each
//! band. The overall score is then a weighted mean of the normalized
//! values; metrics that do not apply are dropped and the remaining
//! weights renormalized.

use crate::config::{BandBounds, GateBounds, ThresholdTable, WeightTable};
use crate::models::{MetricKind, MetricResult, OverallResult, Tier};

/// Normalized-percent span of each tier: (floor, ceiling).
const POOR_SPAN: (f64, f64) = (0.0, 49.0);
const FAIR_SPAN: (f64, f64) = (50.0, 64.0);
const GOOD_SPAN: (f64, f64) = (65.0, 89.0);
const EXCELLENT_SPAN: (f64, f64) = (90.0, 100.0);

/// Overall percentage floors for the four tiers.
const OVERALL_EXCELLENT: f64 = 80.0;
const OVERALL_GOOD: f64 = 65.0;
const OVERALL_FAIR: f64 = 50.0;

/// Linear interpolation of `x` from [x0, x1] onto [y0, y1], clamped.
fn lerp(x: f64, x0: f64, x1: f64, y0: f64, y1: f64) -> f64 {
    if (x1 - x0).abs() < f64::EPSILON {
        return y1;
    }
    let t = ((x - x0) / (x1 - x0)).clamp(0.0, 1.0);
    y0 + t * (y1 - y0)
}

/// Normalize a "greater is better" statistic. Saturates at twice the
/// Excellent boundary.
fn normalize_gate_above(score: f64, bounds: &GateBounds) -> f64 {
    let cap = bounds.excellent * 2.0;
    if score > bounds.excellent {
        lerp(score, bounds.excellent, cap, EXCELLENT_SPAN.0, EXCELLENT_SPAN.1)
    } else if score > bounds.good {
        lerp(score, bounds.good, bounds.excellent, GOOD_SPAN.0, GOOD_SPAN.1)
    } else if score > bounds.fair {
        lerp(score, bounds.fair, bounds.good, FAIR_SPAN.0, FAIR_SPAN.1)
    } else {
        lerp(score, 0.0, bounds.fair, POOR_SPAN.0, POOR_SPAN.1)
    }
}

/// Normalize a "lower is better" statistic. Bottoms out at twice the
/// Fair boundary.
fn normalize_gate_below(score: f64, bounds: &GateBounds) -> f64 {
    let cap = bounds.fair * 2.0;
    if score < bounds.excellent {
        lerp(score, 0.0, bounds.excellent, EXCELLENT_SPAN.1, EXCELLENT_SPAN.0)
    } else if score < bounds.good {
        lerp(score, bounds.excellent, bounds.good, GOOD_SPAN.1, GOOD_SPAN.0)
    } else if score < bounds.fair {
        lerp(score, bounds.good, bounds.fair, FAIR_SPAN.1, FAIR_SPAN.0)
    } else {
        lerp(score, bounds.fair, cap, POOR_SPAN.1, POOR_SPAN.0)
    }
}

/// Normalize a banded statistic. The center of the ideal band scores 100,
/// its edges 90; outside, each ring maps linearly onto its tier span down
/// to the 0/255 rails.
fn normalize_band(value: f64, bounds: &BandBounds) -> f64 {
    let [e_lo, e_hi] = bounds.excellent;
    let [g_lo, g_hi] = bounds.good;
    let [f_lo, f_hi] = bounds.fair;

    if value >= e_lo && value <= e_hi {
        let center = (e_lo + e_hi) / 2.0;
        let half = (e_hi - e_lo) / 2.0;
        return EXCELLENT_SPAN.1 - (EXCELLENT_SPAN.1 - EXCELLENT_SPAN.0) * ((value - center).abs() / half);
    }

    if value < e_lo {
        if value >= g_lo {
            lerp(value, g_lo, e_lo, GOOD_SPAN.0, GOOD_SPAN.1)
        } else if value >= f_lo {
            lerp(value, f_lo, g_lo, FAIR_SPAN.0, FAIR_SPAN.1)
        } else {
            lerp(value, 0.0, f_lo, POOR_SPAN.0, POOR_SPAN.1)
        }
    } else if value <= g_hi {
        lerp(value, e_hi, g_hi, GOOD_SPAN.1, GOOD_SPAN.0)
    } else if value <= f_hi {
        lerp(value, g_hi, f_hi, FAIR_SPAN.1, FAIR_SPAN.0)
    } else {
        lerp(value, f_hi, 255.0, POOR_SPAN.1, POOR_SPAN.0)
    }
}

/// Map a raw metric score onto the common 0-100 scale.
pub fn normalized_score(kind: MetricKind, raw: f64, thresholds: &ThresholdTable) -> f64 {
    match kind {
        MetricKind::Sharpness => normalize_gate_above(raw, &thresholds.sharpness),
        MetricKind::Contrast => normalize_gate_above(raw, &thresholds.contrast),
        MetricKind::Noise => normalize_gate_below(raw, &thresholds.noise),
        MetricKind::ColorBalance => normalize_gate_below(raw, &thresholds.color_balance),
        MetricKind::Brightness => normalize_band(raw, &thresholds.brightness),
        MetricKind::Saturation => normalize_band(raw, &thresholds.saturation),
    }
}

/// Blend per-metric results into the weighted overall verdict.
///
/// Weights are assumed validated (the config loader and `Assessor`
/// constructor both reject tables that do not sum to 1.0).
pub fn combine(
    results: &[MetricResult],
    weights: &WeightTable,
    thresholds: &ThresholdTable,
) -> OverallResult {
    let mut weighted = 0.0;
    let mut weight_sum = 0.0;
    for result in results {
        if result.tier == Tier::NotApplicable {
            continue;
        }
        let weight = weights.get(result.kind);
        weighted += weight * normalized_score(result.kind, result.score, thresholds);
        weight_sum += weight;
    }

    let score = if weight_sum > 0.0 {
        (weighted / weight_sum).clamp(0.0, 100.0)
    } else {
        0.0
    };
    let score = (score * 10.0).round() / 10.0;

    let tier = if score >= OVERALL_EXCELLENT {
        Tier::Excellent
    } else if score >= OVERALL_GOOD {
        Tier::Good
    } else if score >= OVERALL_FAIR {
        Tier::Fair
    } else {
        Tier::Poor
    };

    let summary = match tier {
        Tier::Excellent => "This is a high-quality image with excellent technical characteristics.",
        Tier::Good => "This is a good quality image with minor areas for improvement.",
        Tier::Fair => "This image has acceptable quality but would benefit from enhancement.",
        _ => "This image has significant quality issues that should be addressed.",
    };

    OverallResult {
        score,
        tier,
        summary: summary.to_string(),
    }
}
