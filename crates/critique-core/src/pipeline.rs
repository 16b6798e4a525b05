//! Assessment pipeline
//!
//! Ties the stages together: metric evaluation, weighted aggregation,
//! recommendations, report assembly. Data flows one way; nothing here
//! keeps state between images, so assessments can run concurrently from
//! any number of threads over one shared `Assessor`.

use crate::config::AssessmentConfig;
use crate::error::Result;
use crate::metrics;
use crate::models::AssessmentReport;
use crate::raster::Raster;
use crate::recommend;
use crate::scoring;
use crate::verbose_println;
use std::path::Path;

/// The assessment engine: a validated, immutable configuration plus the
/// per-image entry points.
#[derive(Debug, Clone)]
pub struct Assessor {
    config: AssessmentConfig,
}

impl Assessor {
    /// Build an assessor from a configuration, validating it up front.
    /// Invalid thresholds or weights fail here, never during assessment.
    pub fn new(config: AssessmentConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self { config })
    }

    /// Assessor with the built-in thresholds and weights.
    pub fn with_defaults() -> Self {
        Self {
            config: AssessmentConfig::default(),
        }
    }

    pub fn config(&self) -> &AssessmentConfig {
        &self.config
    }

    /// Assess a decoded raster and produce the full report.
    pub fn assess(&self, raster: &Raster, image: impl Into<String>) -> AssessmentReport {
        let thresholds = &self.config.thresholds;

        let results = metrics::evaluate_all(raster, thresholds);
        for result in &results {
            verbose_println!(
                "[critique] {}: {:.2} -> {}",
                result.kind.key(),
                result.score,
                result.tier
            );
        }

        let resolution = metrics::assess_resolution(raster, thresholds);
        verbose_println!(
            "[critique] resolution: {} ({}, edge density {:.4})",
            resolution.resolution,
            resolution.resolution_class.as_str(),
            resolution.edge_density
        );

        let overall = scoring::combine(&results, &self.config.weights, thresholds);
        verbose_println!(
            "[critique] overall: {:.1}% -> {}",
            overall.score,
            overall.tier
        );

        let recommendations = recommend::recommend(&results, thresholds);

        AssessmentReport {
            image: image.into(),
            metrics: results,
            resolution,
            overall,
            recommendations,
        }
    }

    /// Decode a file and assess it. The report's image identifier is the
    /// file name without its directory.
    pub fn assess_path<P: AsRef<Path>>(&self, path: P) -> Result<AssessmentReport> {
        let path = path.as_ref();
        let raster = crate::decoders::decode_image(path)?;
        let image = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.display().to_string());
        Ok(self.assess(&raster, image))
    }
}

impl Default for Assessor {
    fn default() -> Self {
        Self::with_defaults()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::WeightTable;
    use crate::error::AssessError;
    use crate::models::{MetricKind, Tier};

    #[test]
    fn test_new_rejects_bad_weights_before_any_image() {
        let mut config = AssessmentConfig::default();
        config.weights = WeightTable {
            noise: 0.05, // sum 0.9
            ..WeightTable::default()
        };
        let err = Assessor::new(config).unwrap_err();
        assert!(matches!(err, AssessError::Configuration { .. }));
    }

    #[test]
    fn test_assess_flat_gray_report() {
        let raster = Raster::from_rgb8(80, 60, vec![130u8; 80 * 60 * 3]).unwrap();
        let report = Assessor::with_defaults().assess(&raster, "flat.png");

        assert_eq!(report.image, "flat.png");
        assert_eq!(report.metrics.len(), 6);
        assert_eq!(report.metric(MetricKind::Sharpness).unwrap().tier, Tier::Poor);
        assert_eq!(report.metric(MetricKind::Contrast).unwrap().tier, Tier::Poor);
        assert_eq!(report.metric(MetricKind::Noise).unwrap().tier, Tier::Excellent);
        assert_eq!(
            report.metric(MetricKind::Brightness).unwrap().tier,
            Tier::Excellent
        );
        // Several Poor metrics keep the overall at Fair or below
        assert!(report.overall.tier <= Tier::Fair);
        assert!(!report.recommendations.is_empty());
    }

    #[test]
    fn test_reports_are_independent_across_calls() {
        let assessor = Assessor::with_defaults();
        let flat = Raster::from_rgb8(32, 32, vec![130u8; 32 * 32 * 3]).unwrap();
        let dark = Raster::from_rgb8(32, 32, vec![10u8; 32 * 32 * 3]).unwrap();

        let first = assessor.assess(&flat, "a");
        let _second = assessor.assess(&dark, "b");
        let third = assessor.assess(&flat, "a");

        assert_eq!(first.overall.score, third.overall.score);
        assert_eq!(first.recommendations, third.recommendations);
    }
}
