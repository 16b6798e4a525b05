//! Threshold and weight configuration
//!
//! The tier boundaries and aggregation weights are the only tunable part
//! of the scorer. They load once from YAML (or fall back to built-in
//! defaults), are validated hard at that point, and are read-only for the
//! rest of the process; per-image assessment never touches configuration
//! state.

use crate::error::{AssessError, Result};
use crate::models::MetricKind;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};

// Global verbose flag for controlling debug output
static VERBOSE: AtomicBool = AtomicBool::new(false);

/// Set the global verbose flag. When true, debug messages will be printed.
pub fn set_verbose(verbose: bool) {
    VERBOSE.store(verbose, Ordering::SeqCst);
}

/// Check if verbose mode is enabled.
pub fn is_verbose() -> bool {
    VERBOSE.load(Ordering::SeqCst)
}

/// Print a message to stderr only if verbose mode is enabled.
#[macro_export]
macro_rules! verbose_println {
    ($($arg:tt)*) => {
        if $crate::config::is_verbose() {
            eprintln!($($arg)*);
        }
    };
}

/// Canonical list of candidate config file names we search for on disk.
const CONFIG_FILENAMES: &[&str] = &["critique.yml", "critique.yaml"];

/// Weight-sum tolerance: anything further from 1.0 than this is rejected.
const WEIGHT_SUM_TOLERANCE: f64 = 1e-3;

/// Boundaries for a "greater is better" threshold chain.
///
/// A score strictly above `excellent` earns Excellent, above `good` earns
/// Good, above `fair` earns Fair, anything else Poor.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct GateBounds {
    pub excellent: f64,
    pub good: f64,
    pub fair: f64,
}

impl GateBounds {
    fn validate_descending(&self, metric: &str) -> Result<()> {
        if !(self.excellent > self.good && self.good > self.fair && self.fair >= 0.0) {
            return Err(AssessError::configuration(format!(
                "{} thresholds must satisfy excellent > good > fair >= 0, got {:?}",
                metric, self
            )));
        }
        Ok(())
    }

    fn validate_ascending(&self, metric: &str) -> Result<()> {
        if !(self.excellent < self.good && self.good < self.fair && self.excellent >= 0.0) {
            return Err(AssessError::configuration(format!(
                "{} thresholds must satisfy excellent < good < fair (lower is better), got {:?}",
                metric, self
            )));
        }
        Ok(())
    }
}

/// Nested inclusive bands for "distance from ideal" metrics.
///
/// Each band is `[low, high]` on the 0-255 scale; the excellent band sits
/// inside good, which sits inside fair. Values on a band edge take the
/// better tier.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct BandBounds {
    pub excellent: [f64; 2],
    pub good: [f64; 2],
    pub fair: [f64; 2],
}

impl BandBounds {
    fn validate(&self, metric: &str) -> Result<()> {
        let ordered = self.fair[0] <= self.good[0]
            && self.good[0] <= self.excellent[0]
            && self.excellent[0] < self.excellent[1]
            && self.excellent[1] <= self.good[1]
            && self.good[1] <= self.fair[1];
        let in_range = self.fair[0] >= 0.0 && self.fair[1] <= 255.0;
        if !ordered || !in_range {
            return Err(AssessError::configuration(format!(
                "{} bands must be nested within [0, 255], got {:?}",
                metric, self
            )));
        }
        Ok(())
    }
}

/// Tier boundaries for every metric. Read-only after load.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ThresholdTable {
    /// Laplacian variance, greater is better
    pub sharpness: GateBounds,

    /// Intensity standard deviation, greater is better
    pub contrast: GateBounds,

    /// Residual from the blurred image, lower is better
    pub noise: GateBounds,

    /// Max channel-mean deviation, lower is better
    pub color_balance: GateBounds,

    /// Mean intensity ideal bands
    pub brightness: BandBounds,

    /// Mean HSV saturation ideal bands
    pub saturation: BandBounds,

    /// Megapixel floors for the High and Medium resolution classes
    pub resolution_pixels: [u64; 2],

    /// Edge-density floors for the Rich and Moderate detail classes
    pub edge_density: [f64; 2],
}

impl Default for ThresholdTable {
    fn default() -> Self {
        Self {
            sharpness: GateBounds {
                excellent: 500.0,
                good: 200.0,
                fair: 100.0,
            },
            contrast: GateBounds {
                excellent: 60.0,
                good: 40.0,
                fair: 25.0,
            },
            noise: GateBounds {
                excellent: 5.0,
                good: 10.0,
                fair: 20.0,
            },
            color_balance: GateBounds {
                excellent: 10.0,
                good: 20.0,
                fair: 35.0,
            },
            brightness: BandBounds {
                excellent: [80.0, 180.0],
                good: [60.0, 200.0],
                fair: [40.0, 220.0],
            },
            saturation: BandBounds {
                excellent: [80.0, 150.0],
                good: [60.0, 180.0],
                fair: [40.0, 200.0],
            },
            resolution_pixels: [8_000_000, 2_000_000],
            edge_density: [0.1, 0.05],
        }
    }
}

impl ThresholdTable {
    pub fn validate(&self) -> Result<()> {
        self.sharpness.validate_descending("sharpness")?;
        self.contrast.validate_descending("contrast")?;
        self.noise.validate_ascending("noise")?;
        self.color_balance.validate_ascending("color_balance")?;
        self.brightness.validate("brightness")?;
        self.saturation.validate("saturation")?;
        if self.resolution_pixels[0] <= self.resolution_pixels[1] {
            return Err(AssessError::configuration(format!(
                "resolution_pixels must be [high, medium] with high > medium, got {:?}",
                self.resolution_pixels
            )));
        }
        if self.edge_density[0] <= self.edge_density[1] || self.edge_density[1] <= 0.0 {
            return Err(AssessError::configuration(format!(
                "edge_density must be [rich, moderate] with rich > moderate > 0, got {:?}",
                self.edge_density
            )));
        }
        Ok(())
    }
}

/// Aggregation weights for the overall score. Must sum to 1.0.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
#[serde(default)]
pub struct WeightTable {
    pub sharpness: f64,
    pub brightness: f64,
    pub contrast: f64,
    pub noise: f64,
    pub color_balance: f64,
    pub saturation: f64,
}

impl Default for WeightTable {
    fn default() -> Self {
        Self {
            sharpness: 0.25,
            brightness: 0.15,
            contrast: 0.20,
            noise: 0.15,
            color_balance: 0.10,
            saturation: 0.15,
        }
    }
}

impl WeightTable {
    pub fn get(&self, kind: MetricKind) -> f64 {
        match kind {
            MetricKind::Sharpness => self.sharpness,
            MetricKind::Brightness => self.brightness,
            MetricKind::Contrast => self.contrast,
            MetricKind::Noise => self.noise,
            MetricKind::ColorBalance => self.color_balance,
            MetricKind::Saturation => self.saturation,
        }
    }

    pub fn sum(&self) -> f64 {
        self.sharpness
            + self.brightness
            + self.contrast
            + self.noise
            + self.color_balance
            + self.saturation
    }

    pub fn validate(&self) -> Result<()> {
        let all = [
            self.sharpness,
            self.brightness,
            self.contrast,
            self.noise,
            self.color_balance,
            self.saturation,
        ];
        if all.iter().any(|&w| w < 0.0 || !w.is_finite()) {
            return Err(AssessError::configuration(format!(
                "weights must be finite and non-negative, got {:?}",
                self
            )));
        }
        let sum = self.sum();
        if (sum - 1.0).abs() > WEIGHT_SUM_TOLERANCE {
            return Err(AssessError::configuration(format!(
                "weights must sum to 1.0, got {:.4}",
                sum
            )));
        }
        Ok(())
    }
}

/// Complete scorer configuration.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct AssessmentConfig {
    pub thresholds: ThresholdTable,
    pub weights: WeightTable,
}

impl AssessmentConfig {
    pub fn validate(&self) -> Result<()> {
        self.thresholds.validate()?;
        self.weights.validate()
    }
}

/// Loaded configuration together with its source path and any warnings.
pub struct AssessmentConfigHandle {
    pub config: AssessmentConfig,
    pub source: Option<PathBuf>,
    pub warnings: Vec<String>,
}

/// Load configuration from disk, optionally forcing a specific path.
///
/// The first candidate file that exists is parsed and validated; a file
/// that exists but does not parse or validate is a fatal configuration
/// error, never a silent fallback. With no file anywhere, built-in
/// defaults apply and a warning records that.
pub fn load_assessment_config(custom_path: Option<&Path>) -> Result<AssessmentConfigHandle> {
    let mut warnings = Vec::new();
    let candidates = get_config_candidates(custom_path);

    for candidate in candidates {
        if !candidate.exists() || !candidate.is_file() {
            continue;
        }

        let contents = fs::read_to_string(&candidate).map_err(|e| {
            AssessError::configuration(format!(
                "Failed to read config {}: {}",
                candidate.display(),
                e
            ))
        })?;

        let config: AssessmentConfig = serde_yaml::from_str(&contents).map_err(|e| {
            AssessError::configuration(format!(
                "Failed to parse config {}: {}",
                candidate.display(),
                e
            ))
        })?;

        config.validate()?;

        let source = fs::canonicalize(&candidate).unwrap_or(candidate);
        return Ok(AssessmentConfigHandle {
            config,
            source: Some(source),
            warnings,
        });
    }

    warnings.push("No config file found; using built-in thresholds and weights.".to_string());
    Ok(AssessmentConfigHandle {
        config: AssessmentConfig::default(),
        source: None,
        warnings,
    })
}

/// Get list of config file candidates to try
fn get_config_candidates(custom_path: Option<&Path>) -> Vec<PathBuf> {
    let mut candidates = Vec::new();

    if let Some(path) = custom_path {
        candidates.push(path.to_path_buf());
    }

    if let Ok(env_path) = std::env::var("CRITIQUE_CONFIG") {
        candidates.push(PathBuf::from(env_path));
    }

    if let Ok(cwd) = std::env::current_dir() {
        for name in CONFIG_FILENAMES {
            candidates.push(cwd.join("config").join(name));
            candidates.push(cwd.join(name));
        }
    }

    if let Some(home_dir) = dirs::home_dir() {
        for name in CONFIG_FILENAMES {
            candidates.push(home_dir.join("critique").join(name));
        }
    }

    candidates
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        AssessmentConfig::default().validate().unwrap();
    }

    #[test]
    fn test_default_weights_sum_to_one() {
        assert!((WeightTable::default().sum() - 1.0).abs() < 1e-9);
    }

    #[test]
    fn test_rejects_weights_summing_low() {
        let weights = WeightTable {
            noise: 0.05, // sum becomes 0.9
            ..WeightTable::default()
        };
        let err = weights.validate().unwrap_err();
        assert!(matches!(err, AssessError::Configuration { .. }));
    }

    #[test]
    fn test_rejects_weights_summing_high() {
        let weights = WeightTable {
            saturation: 0.25, // sum becomes 1.1
            ..WeightTable::default()
        };
        assert!(weights.validate().is_err());
    }

    #[test]
    fn test_rejects_negative_weight() {
        let weights = WeightTable {
            sharpness: -0.1,
            brightness: 0.5,
            ..WeightTable::default()
        };
        assert!(weights.validate().is_err());
    }

    #[test]
    fn test_rejects_inverted_gate_bounds() {
        let mut table = ThresholdTable::default();
        table.sharpness = GateBounds {
            excellent: 100.0,
            good: 200.0,
            fair: 500.0,
        };
        assert!(table.validate().is_err());
    }

    #[test]
    fn test_rejects_non_nested_bands() {
        let mut table = ThresholdTable::default();
        table.brightness = BandBounds {
            excellent: [80.0, 180.0],
            good: [90.0, 200.0], // good band starts inside excellent
            fair: [40.0, 220.0],
        };
        assert!(table.validate().is_err());
    }

    #[test]
    fn test_yaml_overrides_merge_with_defaults() {
        let yaml = "weights:\n  sharpness: 0.30\n  noise: 0.10\n";
        let config: AssessmentConfig = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(config.weights.sharpness, 0.30);
        assert_eq!(config.weights.noise, 0.10);
        // Untouched sections keep their defaults
        assert_eq!(config.thresholds.sharpness.excellent, 500.0);
        config.validate().unwrap();
    }

    #[test]
    fn test_missing_config_falls_back_to_defaults() {
        let handle = load_assessment_config(Some(Path::new("/definitely/not/here.yml"))).unwrap();
        assert!(handle.source.is_none());
        assert!(!handle.warnings.is_empty());
    }
}
