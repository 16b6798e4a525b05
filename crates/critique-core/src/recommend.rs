//! Improvement recommendations
//!
//! Fully deterministic: each metric at Fair or Poor contributes one fixed
//! suggestion, in canonical metric order. Brightness and saturation pick a
//! direction from the raw score relative to their ideal bands.

use crate::config::ThresholdTable;
use crate::models::{MetricKind, MetricResult};

const NO_IMPROVEMENTS: &str = "Image quality is good - no major improvements needed";

/// Generate the ordered recommendation list for a set of metric results.
pub fn recommend(results: &[MetricResult], thresholds: &ThresholdTable) -> Vec<String> {
    let mut recommendations = Vec::new();

    for result in results {
        if !result.tier.needs_improvement() {
            continue;
        }
        let suggestion = match result.kind {
            MetricKind::Sharpness => {
                "Consider using a tripod or faster shutter speed to improve sharpness".to_string()
            }
            MetricKind::Brightness => {
                if result.score < thresholds.brightness.excellent[0] {
                    "Increase exposure or adjust shadows to brighten the image".to_string()
                } else {
                    "Reduce exposure or adjust highlights to prevent overexposure".to_string()
                }
            }
            MetricKind::Contrast => {
                "Enhance contrast using curves or levels adjustment".to_string()
            }
            MetricKind::Noise => {
                "Apply noise reduction or use lower ISO settings when capturing".to_string()
            }
            MetricKind::ColorBalance => {
                "Adjust white balance or apply color correction".to_string()
            }
            MetricKind::Saturation => {
                if result.score < thresholds.saturation.good[0] {
                    "Increase color saturation for more vibrant appearance".to_string()
                } else {
                    "Reduce saturation for more natural color appearance".to_string()
                }
            }
        };
        recommendations.push(suggestion);
    }

    if recommendations.is_empty() {
        recommendations.push(NO_IMPROVEMENTS.to_string());
    }

    recommendations
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Tier;

    fn result(kind: MetricKind, score: f64, tier: Tier) -> MetricResult {
        MetricResult {
            kind,
            score,
            tier,
            description: String::new(),
            unit_label: String::new(),
            channel_means: None,
        }
    }

    fn all_good() -> Vec<MetricResult> {
        vec![
            result(MetricKind::Sharpness, 300.0, Tier::Good),
            result(MetricKind::Brightness, 130.0, Tier::Excellent),
            result(MetricKind::Contrast, 50.0, Tier::Good),
            result(MetricKind::Noise, 3.0, Tier::Excellent),
            result(MetricKind::ColorBalance, 5.0, Tier::Excellent),
            result(MetricKind::Saturation, 110.0, Tier::Excellent),
        ]
    }

    #[test]
    fn test_no_issues_yields_single_message() {
        let recs = recommend(&all_good(), &ThresholdTable::default());
        assert_eq!(recs.len(), 1);
        assert!(recs[0].contains("no major improvements"));
    }

    #[test]
    fn test_poor_sharpness_suggests_stabilization() {
        let mut results = all_good();
        results[0] = result(MetricKind::Sharpness, 40.0, Tier::Poor);
        let recs = recommend(&results, &ThresholdTable::default());
        assert_eq!(recs.len(), 1);
        assert!(recs[0].contains("tripod"));
    }

    #[test]
    fn test_brightness_direction_awareness() {
        let thresholds = ThresholdTable::default();

        let mut dark = all_good();
        dark[1] = result(MetricKind::Brightness, 30.0, Tier::Poor);
        let recs = recommend(&dark, &thresholds);
        assert!(recs[0].contains("Increase exposure"));

        let mut bright = all_good();
        bright[1] = result(MetricKind::Brightness, 230.0, Tier::Poor);
        let recs = recommend(&bright, &thresholds);
        assert!(recs[0].contains("Reduce exposure"));
    }

    #[test]
    fn test_saturation_direction_awareness() {
        let thresholds = ThresholdTable::default();

        let mut washed = all_good();
        washed[5] = result(MetricKind::Saturation, 20.0, Tier::Poor);
        assert!(recommend(&washed, &thresholds)[0].contains("Increase color saturation"));

        let mut vivid = all_good();
        vivid[5] = result(MetricKind::Saturation, 230.0, Tier::Poor);
        assert!(recommend(&vivid, &thresholds)[0].contains("Reduce saturation"));
    }

    #[test]
    fn test_recommendations_follow_canonical_order() {
        let thresholds = ThresholdTable::default();
        let mut results = all_good();
        // Flag saturation, contrast, and sharpness; expect canonical order back
        results[5] = result(MetricKind::Saturation, 20.0, Tier::Poor);
        results[2] = result(MetricKind::Contrast, 10.0, Tier::Poor);
        results[0] = result(MetricKind::Sharpness, 40.0, Tier::Fair);
        let recs = recommend(&results, &thresholds);
        assert_eq!(recs.len(), 3);
        assert!(recs[0].contains("sharpness"));
        assert!(recs[1].contains("contrast"));
        assert!(recs[2].contains("saturation"));
    }

    #[test]
    fn test_not_applicable_never_triggers_recommendation() {
        let mut results = all_good();
        results[4] = result(MetricKind::ColorBalance, 0.0, Tier::NotApplicable);
        results[5] = result(MetricKind::Saturation, 0.0, Tier::NotApplicable);
        let recs = recommend(&results, &ThresholdTable::default());
        assert_eq!(recs.len(), 1);
        assert!(recs[0].contains("no major improvements"));
    }
}
