//! Metric evaluators
//!
//! Seven independent, stateless evaluators over an immutable `Raster`.
//! Each maps one statistic to a quality tier through the configured
//! thresholds and attaches the matching explanation. Evaluators never
//! depend on each other's output and may run in any order.

use crate::config::{BandBounds, GateBounds, ThresholdTable};
use crate::filters;
use crate::models::{
    ChannelMeans, DetailClass, MetricKind, MetricResult, ResolutionClass, ResolutionResult, Tier,
    METRIC_ORDER,
};
use crate::raster::Raster;

const NOT_APPLICABLE_DESCRIPTION: &str =
    "Not applicable: the image has a single channel with no color information.";

/// Classify a "greater is better" statistic (strict comparisons).
fn classify_gate_above(score: f64, bounds: &GateBounds) -> Tier {
    if score > bounds.excellent {
        Tier::Excellent
    } else if score > bounds.good {
        Tier::Good
    } else if score > bounds.fair {
        Tier::Fair
    } else {
        Tier::Poor
    }
}

/// Classify a "lower is better" statistic (strict comparisons).
fn classify_gate_below(score: f64, bounds: &GateBounds) -> Tier {
    if score < bounds.excellent {
        Tier::Excellent
    } else if score < bounds.good {
        Tier::Good
    } else if score < bounds.fair {
        Tier::Fair
    } else {
        Tier::Poor
    }
}

/// Classify a banded statistic. Band edges are inclusive, so a value
/// exactly on a boundary takes the better tier.
fn classify_band(value: f64, bounds: &BandBounds) -> Tier {
    if value >= bounds.excellent[0] && value <= bounds.excellent[1] {
        Tier::Excellent
    } else if value >= bounds.good[0] && value <= bounds.good[1] {
        Tier::Good
    } else if value >= bounds.fair[0] && value <= bounds.fair[1] {
        Tier::Fair
    } else {
        Tier::Poor
    }
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// Sharpness via variance of the Laplacian response.
pub fn assess_sharpness(raster: &Raster, thresholds: &ThresholdTable) -> MetricResult {
    let luma = raster.luma();
    let variance = filters::laplacian_variance(&luma, raster.width(), raster.height());
    let tier = classify_gate_above(variance, &thresholds.sharpness);

    let description = match tier {
        Tier::Excellent => "The image is very sharp with crisp details and clear edges.",
        Tier::Good => "The image has good sharpness with most details clearly visible.",
        Tier::Fair => "The image has moderate sharpness but some details may appear soft.",
        _ => "The image appears blurry or out of focus with poor detail definition.",
    };

    MetricResult {
        kind: MetricKind::Sharpness,
        score: round2(variance),
        tier,
        description: description.to_string(),
        unit_label: "Laplacian Variance".to_string(),
        channel_means: None,
    }
}

/// Brightness via mean grayscale intensity against the ideal band.
pub fn assess_brightness(raster: &Raster, thresholds: &ThresholdTable) -> MetricResult {
    let luma = raster.luma();
    let mean = filters::mean(&luma);
    let tier = classify_band(mean, &thresholds.brightness);

    let description = match tier {
        Tier::Excellent => "The image has optimal brightness with good visibility of details.",
        Tier::Good => "The image brightness is acceptable with minor adjustments needed.",
        Tier::Fair => "The image is either slightly too dark or too bright.",
        _ => {
            if mean < thresholds.brightness.fair[0] {
                "The image is too dark, making details difficult to see."
            } else {
                "The image is overexposed with blown-out highlights."
            }
        }
    };

    MetricResult {
        kind: MetricKind::Brightness,
        score: round2(mean),
        tier,
        description: description.to_string(),
        unit_label: "Mean Brightness (0-255)".to_string(),
        channel_means: None,
    }
}

/// Contrast via population standard deviation of intensity.
///
/// A perfectly flat image has zero deviation and lands in Poor with a
/// raw score of 0; no special casing required.
pub fn assess_contrast(raster: &Raster, thresholds: &ThresholdTable) -> MetricResult {
    let luma = raster.luma();
    let std = filters::std_dev(&luma);
    let tier = classify_gate_above(std, &thresholds.contrast);

    let description = match tier {
        Tier::Excellent => "The image has excellent contrast with a good range of tones.",
        Tier::Good => "The image has good contrast with adequate tonal separation.",
        Tier::Fair => "The image has moderate contrast but could benefit from enhancement.",
        _ => "The image has poor contrast appearing flat or washed out.",
    };

    MetricResult {
        kind: MetricKind::Contrast,
        score: round2(std),
        tier,
        description: description.to_string(),
        unit_label: "Standard Deviation".to_string(),
        channel_means: None,
    }
}

/// Noise via mean absolute residual from the Gaussian-blurred image.
pub fn assess_noise(raster: &Raster, thresholds: &ThresholdTable) -> MetricResult {
    let luma = raster.luma();
    let blurred = filters::gaussian_blur_5x5(&luma, raster.width(), raster.height());
    let residual = filters::mean_abs_diff(&luma, &blurred);
    let tier = classify_gate_below(residual, &thresholds.noise);

    let description = match tier {
        Tier::Excellent => "The image has minimal noise with clean, smooth areas.",
        Tier::Good => "The image has low noise levels that don't significantly impact quality.",
        Tier::Fair => "The image has moderate noise that may be noticeable in smooth areas.",
        _ => "The image has high noise levels that significantly degrade quality.",
    };

    MetricResult {
        kind: MetricKind::Noise,
        score: round2(residual),
        tier,
        description: description.to_string(),
        unit_label: "Noise Estimate (lower is better)".to_string(),
        channel_means: None,
    }
}

/// Color balance via the largest channel-mean deviation from neutral.
///
/// The dominant channel is always recorded; for a Poor result it names
/// the cast in the description.
pub fn assess_color_balance(raster: &Raster, thresholds: &ThresholdTable) -> MetricResult {
    let Some([mean_r, mean_g, mean_b]) = raster.channel_means() else {
        return not_applicable(MetricKind::ColorBalance, "Max Channel Deviation");
    };

    let overall_mean = (mean_r + mean_g + mean_b) / 3.0;
    let max_deviation = (mean_r - overall_mean)
        .abs()
        .max((mean_g - overall_mean).abs())
        .max((mean_b - overall_mean).abs());
    let tier = classify_gate_below(max_deviation, &thresholds.color_balance);

    let cast = if mean_r > mean_g && mean_r > mean_b {
        "reddish"
    } else if mean_g > mean_r && mean_g > mean_b {
        "greenish"
    } else {
        "bluish"
    };

    let description = match tier {
        Tier::Excellent => "The image has excellent color balance with neutral tones.".to_string(),
        Tier::Good => "The image has good color balance with minor color casts.".to_string(),
        Tier::Fair => "The image has noticeable color cast that may need correction.".to_string(),
        _ => format!(
            "The image has a strong {} color cast affecting overall appearance.",
            cast
        ),
    };

    MetricResult {
        kind: MetricKind::ColorBalance,
        score: round2(max_deviation),
        tier,
        description,
        unit_label: "Max Channel Deviation".to_string(),
        channel_means: Some(ChannelMeans {
            red: round2(mean_r),
            green: round2(mean_g),
            blue: round2(mean_b),
        }),
    }
}

/// Saturation via mean of the HSV saturation plane against the ideal band.
pub fn assess_saturation(raster: &Raster, thresholds: &ThresholdTable) -> MetricResult {
    let Some(saturation) = raster.saturation_channel() else {
        return not_applicable(MetricKind::Saturation, "Mean Saturation (0-255)");
    };

    let mean = filters::mean(&saturation);
    let tier = classify_band(mean, &thresholds.saturation);

    let description = match tier {
        Tier::Excellent => {
            "The image has optimal color saturation with vibrant but natural colors."
        }
        Tier::Good => "The image has good color saturation with appealing colors.",
        Tier::Fair => "The image saturation could be improved for better color appeal.",
        _ => {
            if mean < thresholds.saturation.fair[0] {
                "The image appears washed out with very low color saturation."
            } else {
                "The image is oversaturated with unnatural, intense colors."
            }
        }
    };

    MetricResult {
        kind: MetricKind::Saturation,
        score: round2(mean),
        tier,
        description: description.to_string(),
        unit_label: "Mean Saturation (0-255)".to_string(),
        channel_means: None,
    }
}

/// Resolution class plus edge-density detail richness. Advisory only.
pub fn assess_resolution(raster: &Raster, thresholds: &ThresholdTable) -> ResolutionResult {
    let total_pixels = raster.total_pixels();
    let luma = raster.luma();
    let edge_density = filters::edge_density(&luma, raster.width(), raster.height());

    let resolution_class = if total_pixels >= thresholds.resolution_pixels[0] {
        ResolutionClass::High
    } else if total_pixels >= thresholds.resolution_pixels[1] {
        ResolutionClass::Medium
    } else {
        ResolutionClass::Low
    };

    let detail_class = if edge_density > thresholds.edge_density[0] {
        DetailClass::Rich
    } else if edge_density > thresholds.edge_density[1] {
        DetailClass::Moderate
    } else {
        DetailClass::Low
    };

    let detail_phrase = match detail_class {
        DetailClass::Rich => "rich detail and sharp edges",
        DetailClass::Moderate => "moderate detail levels",
        DetailClass::Low => "limited detail or smooth content",
    };
    let description = format!(
        "The image is {} ({}x{}) with {}.",
        resolution_class.as_str().to_lowercase(),
        raster.width(),
        raster.height(),
        detail_phrase
    );

    ResolutionResult {
        resolution: format!("{}x{}", raster.width(), raster.height()),
        total_pixels,
        edge_density: (edge_density * 10_000.0).round() / 10_000.0,
        resolution_class,
        detail_class,
        description,
    }
}

/// Evaluate all six weighted metrics in canonical order.
pub fn evaluate_all(raster: &Raster, thresholds: &ThresholdTable) -> Vec<MetricResult> {
    METRIC_ORDER
        .iter()
        .map(|kind| match kind {
            MetricKind::Sharpness => assess_sharpness(raster, thresholds),
            MetricKind::Brightness => assess_brightness(raster, thresholds),
            MetricKind::Contrast => assess_contrast(raster, thresholds),
            MetricKind::Noise => assess_noise(raster, thresholds),
            MetricKind::ColorBalance => assess_color_balance(raster, thresholds),
            MetricKind::Saturation => assess_saturation(raster, thresholds),
        })
        .collect()
}

fn not_applicable(kind: MetricKind, unit_label: &str) -> MetricResult {
    MetricResult {
        kind,
        score: 0.0,
        tier: Tier::NotApplicable,
        description: NOT_APPLICABLE_DESCRIPTION.to_string(),
        unit_label: unit_label.to_string(),
        channel_means: None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn flat_gray(width: u32, height: u32, level: u8) -> Raster {
        let data = vec![level; (width * height * 3) as usize];
        Raster::from_rgb8(width, height, data).unwrap()
    }

    /// Strong vertical stripes: sharp, high-contrast, neutral color.
    fn stripes(width: u32, height: u32) -> Raster {
        let mut data = Vec::with_capacity((width * height * 3) as usize);
        for _y in 0..height {
            for x in 0..width {
                let v = if (x / 4) % 2 == 0 { 30u8 } else { 225u8 };
                data.extend_from_slice(&[v, v, v]);
            }
        }
        Raster::from_rgb8(width, height, data).unwrap()
    }

    #[test]
    fn test_gate_above_classification_is_total() {
        let bounds = GateBounds {
            excellent: 500.0,
            good: 200.0,
            fair: 100.0,
        };
        assert_eq!(classify_gate_above(501.0, &bounds), Tier::Excellent);
        assert_eq!(classify_gate_above(500.0, &bounds), Tier::Good);
        assert_eq!(classify_gate_above(200.0, &bounds), Tier::Fair);
        assert_eq!(classify_gate_above(100.0, &bounds), Tier::Poor);
        assert_eq!(classify_gate_above(0.0, &bounds), Tier::Poor);
    }

    #[test]
    fn test_gate_below_classification_is_total() {
        let bounds = GateBounds {
            excellent: 5.0,
            good: 10.0,
            fair: 20.0,
        };
        assert_eq!(classify_gate_below(0.0, &bounds), Tier::Excellent);
        assert_eq!(classify_gate_below(5.0, &bounds), Tier::Good);
        assert_eq!(classify_gate_below(10.0, &bounds), Tier::Fair);
        assert_eq!(classify_gate_below(20.0, &bounds), Tier::Poor);
        assert_eq!(classify_gate_below(100.0, &bounds), Tier::Poor);
    }

    #[test]
    fn test_band_edges_resolve_to_higher_tier() {
        let bounds = BandBounds {
            excellent: [80.0, 180.0],
            good: [60.0, 200.0],
            fair: [40.0, 220.0],
        };
        assert_eq!(classify_band(80.0, &bounds), Tier::Excellent);
        assert_eq!(classify_band(180.0, &bounds), Tier::Excellent);
        assert_eq!(classify_band(60.0, &bounds), Tier::Good);
        assert_eq!(classify_band(200.0, &bounds), Tier::Good);
        assert_eq!(classify_band(40.0, &bounds), Tier::Fair);
        assert_eq!(classify_band(220.0, &bounds), Tier::Fair);
        assert_eq!(classify_band(39.9, &bounds), Tier::Poor);
        assert_eq!(classify_band(220.1, &bounds), Tier::Poor);
    }

    #[test]
    fn test_flat_gray_sharpness_poor() {
        let raster = flat_gray(64, 48, 130);
        let result = assess_sharpness(&raster, &ThresholdTable::default());
        assert_eq!(result.tier, Tier::Poor);
        assert_eq!(result.score, 0.0);
    }

    #[test]
    fn test_flat_gray_contrast_poor_with_zero_score() {
        let raster = flat_gray(64, 48, 130);
        let result = assess_contrast(&raster, &ThresholdTable::default());
        assert_eq!(result.tier, Tier::Poor);
        assert_eq!(result.score, 0.0);
    }

    #[test]
    fn test_flat_gray_noise_excellent() {
        let raster = flat_gray(64, 48, 130);
        let result = assess_noise(&raster, &ThresholdTable::default());
        assert_eq!(result.tier, Tier::Excellent);
    }

    #[test]
    fn test_flat_gray_brightness_excellent() {
        let raster = flat_gray(64, 48, 130);
        let result = assess_brightness(&raster, &ThresholdTable::default());
        assert_eq!(result.tier, Tier::Excellent);
        assert!((result.score - 130.0).abs() < 0.5);
    }

    #[test]
    fn test_dark_image_brightness_poor_mentions_darkness() {
        let raster = flat_gray(32, 32, 10);
        let result = assess_brightness(&raster, &ThresholdTable::default());
        assert_eq!(result.tier, Tier::Poor);
        assert!(result.description.contains("too dark"));
    }

    #[test]
    fn test_blown_out_image_brightness_poor_mentions_overexposure() {
        let raster = flat_gray(32, 32, 245);
        let result = assess_brightness(&raster, &ThresholdTable::default());
        assert_eq!(result.tier, Tier::Poor);
        assert!(result.description.contains("overexposed"));
    }

    #[test]
    fn test_stripes_are_sharp_and_contrasty() {
        let raster = stripes(128, 96);
        let thresholds = ThresholdTable::default();
        assert_eq!(assess_sharpness(&raster, &thresholds).tier, Tier::Excellent);
        assert_eq!(assess_contrast(&raster, &thresholds).tier, Tier::Excellent);
    }

    #[test]
    fn test_red_cast_color_balance_poor() {
        let mut data = Vec::new();
        for _ in 0..64 * 64 {
            data.extend_from_slice(&[220u8, 60, 60]);
        }
        let raster = Raster::from_rgb8(64, 64, data).unwrap();
        let result = assess_color_balance(&raster, &ThresholdTable::default());
        assert_eq!(result.tier, Tier::Poor);
        assert!(result.description.contains("reddish"));
        let means = result.channel_means.unwrap();
        assert!(means.red > means.green);
    }

    #[test]
    fn test_neutral_image_color_balance_excellent() {
        let raster = flat_gray(32, 32, 128);
        let result = assess_color_balance(&raster, &ThresholdTable::default());
        assert_eq!(result.tier, Tier::Excellent);
        assert_eq!(result.score, 0.0);
    }

    #[test]
    fn test_green_cast_named() {
        let mut data = Vec::new();
        for _ in 0..32 * 32 {
            data.extend_from_slice(&[50u8, 220, 50]);
        }
        let raster = Raster::from_rgb8(32, 32, data).unwrap();
        let result = assess_color_balance(&raster, &ThresholdTable::default());
        assert!(result.description.contains("greenish"));
    }

    #[test]
    fn test_flat_image_saturation_poor_without_panic() {
        // Zero-variance gray: saturation is exactly zero, below every band
        let raster = flat_gray(32, 32, 130);
        let result = assess_saturation(&raster, &ThresholdTable::default());
        assert_eq!(result.tier, Tier::Poor);
        assert_eq!(result.score, 0.0);
        assert!(result.description.contains("washed out"));
    }

    #[test]
    fn test_oversaturated_image_wording() {
        let mut data = Vec::new();
        for _ in 0..32 * 32 {
            data.extend_from_slice(&[255u8, 10, 10]);
        }
        let raster = Raster::from_rgb8(32, 32, data).unwrap();
        let result = assess_saturation(&raster, &ThresholdTable::default());
        assert_eq!(result.tier, Tier::Poor);
        assert!(result.description.contains("oversaturated"));
    }

    #[test]
    fn test_grayscale_input_degrades_color_metrics() {
        let raster = Raster::from_gray8(16, 16, vec![100u8; 256]).unwrap();
        let thresholds = ThresholdTable::default();
        let balance = assess_color_balance(&raster, &thresholds);
        let saturation = assess_saturation(&raster, &thresholds);
        assert_eq!(balance.tier, Tier::NotApplicable);
        assert_eq!(saturation.tier, Tier::NotApplicable);
        assert!(balance.description.contains("Not applicable"));
    }

    #[test]
    fn test_resolution_classes() {
        let thresholds = ThresholdTable::default();
        let small = flat_gray(100, 100, 128);
        assert_eq!(
            assess_resolution(&small, &thresholds).resolution_class,
            ResolutionClass::Low
        );
        // 2000x1200 = 2.4MP
        let medium = Raster::from_gray8(2000, 1200, vec![128u8; 2_400_000]).unwrap();
        let res = assess_resolution(&medium, &thresholds);
        assert_eq!(res.resolution_class, ResolutionClass::Medium);
        assert_eq!(res.resolution, "2000x1200");
        assert_eq!(res.total_pixels, 2_400_000);
    }

    #[test]
    fn test_resolution_detail_wording() {
        let thresholds = ThresholdTable::default();
        let flat = flat_gray(200, 200, 128);
        let res = assess_resolution(&flat, &thresholds);
        assert_eq!(res.detail_class, DetailClass::Low);
        assert!(res.description.contains("low resolution"));
        assert!(res.description.contains("limited detail"));
    }

    #[test]
    fn test_evaluate_all_canonical_order() {
        let raster = flat_gray(32, 32, 128);
        let results = evaluate_all(&raster, &ThresholdTable::default());
        let kinds: Vec<MetricKind> = results.iter().map(|r| r.kind).collect();
        assert_eq!(kinds.as_slice(), METRIC_ORDER.as_slice());
    }
}
