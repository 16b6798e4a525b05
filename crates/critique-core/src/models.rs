//! Data models for critique
//!
//! Core records produced by the assessment engine: per-metric results,
//! the weighted overall result, and the per-image report.

use serde::{Deserialize, Serialize};

/// Quality tier assigned to a metric or to the whole image.
///
/// Ordered worst-to-best so the aggregator and the recommendation
/// generator can compare tiers directly. `NotApplicable` marks metrics
/// skipped for single-channel input; it never enters comparisons.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Tier {
    #[serde(rename = "Not Applicable")]
    NotApplicable,
    Poor,
    Fair,
    Good,
    Excellent,
}

impl Tier {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::NotApplicable => "Not Applicable",
            Self::Poor => "Poor",
            Self::Fair => "Fair",
            Self::Good => "Good",
            Self::Excellent => "Excellent",
        }
    }

    /// Whether this tier triggers an improvement recommendation.
    pub fn needs_improvement(&self) -> bool {
        matches!(self, Self::Poor | Self::Fair)
    }
}

impl std::fmt::Display for Tier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The six weighted metrics, in canonical evaluation order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MetricKind {
    Sharpness,
    Brightness,
    Contrast,
    Noise,
    ColorBalance,
    Saturation,
}

/// Canonical metric order: report sections, JSON keys, and recommendation
/// order all follow this.
pub const METRIC_ORDER: [MetricKind; 6] = [
    MetricKind::Sharpness,
    MetricKind::Brightness,
    MetricKind::Contrast,
    MetricKind::Noise,
    MetricKind::ColorBalance,
    MetricKind::Saturation,
];

impl MetricKind {
    /// Stable key used in the JSON report.
    pub fn key(&self) -> &'static str {
        match self {
            Self::Sharpness => "sharpness",
            Self::Brightness => "brightness",
            Self::Contrast => "contrast",
            Self::Noise => "noise",
            Self::ColorBalance => "color_balance",
            Self::Saturation => "saturation",
        }
    }

    /// Human-readable section heading.
    pub fn title(&self) -> &'static str {
        match self {
            Self::Sharpness => "Sharpness",
            Self::Brightness => "Brightness",
            Self::Contrast => "Contrast",
            Self::Noise => "Noise",
            Self::ColorBalance => "Color Balance",
            Self::Saturation => "Saturation",
        }
    }
}

/// Per-channel means recorded by the color balance metric.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ChannelMeans {
    pub red: f64,
    pub green: f64,
    pub blue: f64,
}

/// Result of a single metric evaluation. Created once, never mutated.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MetricResult {
    /// Which metric produced this result
    #[serde(skip)]
    pub kind: MetricKind,

    /// Raw statistic value (rounded for presentation)
    pub score: f64,

    /// Quality tier mapped from the raw score
    #[serde(rename = "quality")]
    pub tier: Tier,

    /// Human-readable explanation of the tier
    pub description: String,

    /// Name of the underlying statistic, e.g. "Laplacian Variance"
    #[serde(rename = "metric")]
    pub unit_label: String,

    /// Channel detail, present only for color balance on RGB input
    #[serde(skip_serializing_if = "Option::is_none")]
    pub channel_means: Option<ChannelMeans>,
}

impl Default for MetricKind {
    fn default() -> Self {
        Self::Sharpness
    }
}

/// Megapixel class of the input. Advisory: carries no quality tier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ResolutionClass {
    #[serde(rename = "High Resolution")]
    High,
    #[serde(rename = "Medium Resolution")]
    Medium,
    #[serde(rename = "Low Resolution")]
    Low,
}

impl ResolutionClass {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::High => "High Resolution",
            Self::Medium => "Medium Resolution",
            Self::Low => "Low Resolution",
        }
    }
}

/// Detail richness class derived from edge density.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DetailClass {
    #[serde(rename = "Rich Detail")]
    Rich,
    #[serde(rename = "Moderate Detail")]
    Moderate,
    #[serde(rename = "Low Detail")]
    Low,
}

impl DetailClass {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Rich => "Rich Detail",
            Self::Moderate => "Moderate Detail",
            Self::Low => "Low Detail",
        }
    }
}

/// Resolution and detail assessment. Advisory only: excluded from the
/// weighted overall score.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResolutionResult {
    /// Formatted as "WIDTHxHEIGHT"
    pub resolution: String,

    pub total_pixels: u64,

    /// Fraction of pixels on a detected edge
    pub edge_density: f64,

    #[serde(rename = "resolution_quality")]
    pub resolution_class: ResolutionClass,

    #[serde(rename = "detail_quality")]
    pub detail_class: DetailClass,

    pub description: String,
}

/// Weighted overall verdict for one image.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OverallResult {
    /// Percentage in [0, 100]
    pub score: f64,

    #[serde(rename = "quality")]
    pub tier: Tier,

    pub summary: String,
}

/// Complete assessment of a single image.
///
/// Constructed fresh per image; rendering and serialization never mutate
/// it, and no state survives between assessments.
#[derive(Debug, Clone)]
pub struct AssessmentReport {
    /// Caller-supplied identifier, typically the file name
    pub image: String,

    /// One entry per metric, in canonical order
    pub metrics: Vec<MetricResult>,

    pub resolution: ResolutionResult,

    pub overall: OverallResult,

    /// Actionable suggestions, canonical metric order
    pub recommendations: Vec<String>,
}

impl AssessmentReport {
    /// Look up a metric result by kind.
    pub fn metric(&self, kind: MetricKind) -> Option<&MetricResult> {
        self.metrics.iter().find(|m| m.kind == kind)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tier_ordering() {
        assert!(Tier::Excellent > Tier::Good);
        assert!(Tier::Good > Tier::Fair);
        assert!(Tier::Fair > Tier::Poor);
    }

    #[test]
    fn test_tier_needs_improvement() {
        assert!(Tier::Poor.needs_improvement());
        assert!(Tier::Fair.needs_improvement());
        assert!(!Tier::Good.needs_improvement());
        assert!(!Tier::Excellent.needs_improvement());
        assert!(!Tier::NotApplicable.needs_improvement());
    }

    #[test]
    fn test_tier_serializes_like_report_strings() {
        assert_eq!(serde_json::to_string(&Tier::Excellent).unwrap(), "\"Excellent\"");
        assert_eq!(
            serde_json::to_string(&Tier::NotApplicable).unwrap(),
            "\"Not Applicable\""
        );
    }

    #[test]
    fn test_metric_order_covers_all_kinds() {
        assert_eq!(METRIC_ORDER.len(), 6);
        let keys: Vec<&str> = METRIC_ORDER.iter().map(|k| k.key()).collect();
        assert_eq!(
            keys,
            ["sharpness", "brightness", "contrast", "noise", "color_balance", "saturation"]
        );
    }
}
