use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::path::Path;
use anyhow::{bail, Context, Result};

use crate::equipment::MachineLimits;
use crate::error::InvalidConfig;
use crate::pose::{BodySide, CoordinateBounds};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub classifier: ClassifierConfig,
    pub equipment: EquipmentConfig,
    /// Zone name to restricted-access flag.
    pub zones: BTreeMap<String, bool>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClassifierConfig {
    /// Fall indicator (degrees) above which a fall is confirmed.
    pub threshold: f32,
    /// Body side whose shoulder/hip/knee/ankle chain is measured.
    pub side: BodySide,
    /// Landmarks reported below this visibility are treated as absent.
    pub min_visibility: f32,
    /// Optional range every present coordinate must fall in.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub coordinate_bounds: Option<CoordinateBounds>,
}

impl ClassifierConfig {
    pub fn validate(&self) -> Result<(), InvalidConfig> {
        if !self.threshold.is_finite() {
            return Err(InvalidConfig::Threshold(self.threshold));
        }
        if !(0.0..=1.0).contains(&self.min_visibility) {
            return Err(InvalidConfig::MinVisibility(self.min_visibility));
        }
        if let Some(CoordinateBounds { min, max }) = self.coordinate_bounds {
            if !(min.is_finite() && max.is_finite()) || min > max {
                return Err(InvalidConfig::Bounds { min, max });
            }
        }
        Ok(())
    }
}

impl Default for ClassifierConfig {
    fn default() -> Self {
        Self {
            threshold: 50.0,
            side: BodySide::Left,
            min_visibility: 0.5,
            coordinate_bounds: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EquipmentConfig {
    /// AQI above which no machine is suitable.
    pub max_air_quality: u32,
    pub machines: BTreeMap<String, MachineLimits>,
}

impl Default for EquipmentConfig {
    fn default() -> Self {
        let machines = [
            ("Machine_A", MachineLimits { max_vibration: 3.0, max_temperature: 80.0 }),
            ("Machine_B", MachineLimits { max_vibration: 2.5, max_temperature: 75.0 }),
            ("Machine_C", MachineLimits { max_vibration: 4.0, max_temperature: 85.0 }),
        ]
        .into_iter()
        .map(|(name, limits)| (name.to_string(), limits))
        .collect();

        Self {
            max_air_quality: 150,
            machines,
        }
    }
}

impl Config {
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path)
            .with_context(|| format!("reading config {}", path.display()))?;
        let config: Self = toml::from_str(&content)
            .with_context(|| format!("parsing config {}", path.display()))?;
        config.validate()?;
        Ok(config)
    }

    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let content = toml::to_string_pretty(self)?;
        fs::write(path.as_ref(), content)
            .with_context(|| format!("writing config {}", path.as_ref().display()))?;
        Ok(())
    }

    pub fn validate(&self) -> Result<()> {
        self.classifier.validate().context("invalid [classifier] section")?;
        for (name, limits) in &self.equipment.machines {
            let positive = |limit: f32| limit.is_finite() && limit > 0.0;
            if !(positive(limits.max_vibration) && positive(limits.max_temperature)) {
                bail!("equipment.machines.{name}: limits must be finite and positive");
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_file_keeps_defaults() {
        let config: Config = toml::from_str(
            r#"
            [classifier]
            threshold = 65.0
            side = "right"

            [zones]
            Boiler_Room = true
            Loading_Dock = false
            "#,
        )
        .unwrap();

        assert_eq!(config.classifier.threshold, 65.0);
        assert_eq!(config.classifier.side, BodySide::Right);
        assert_eq!(config.classifier.min_visibility, 0.5);
        assert_eq!(config.equipment.machines.len(), 3);
        assert_eq!(config.zones.get("Boiler_Room"), Some(&true));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn defaults_survive_save_and_load() {
        let path = std::env::temp_dir().join(format!("fall-sentinel-{}.toml", std::process::id()));
        let mut config = Config::default();
        config.classifier.coordinate_bounds = Some(CoordinateBounds { min: -0.5, max: 1.5 });
        config.save(&path).unwrap();

        let loaded = Config::load(&path).unwrap();
        let _ = fs::remove_file(&path);
        assert_eq!(loaded, config);
    }

    #[test]
    fn rejects_bad_values() {
        let mut config = Config::default();
        config.classifier.threshold = f32::NAN;
        assert!(config.validate().is_err());

        let mut config = Config::default();
        config.classifier.min_visibility = 1.5;
        assert!(config.validate().is_err());

        let mut config = Config::default();
        config.classifier.coordinate_bounds = Some(CoordinateBounds { min: 1.0, max: 0.0 });
        assert!(config.validate().is_err());

        let mut config = Config::default();
        config.equipment.machines.insert(
            "Press".into(),
            MachineLimits { max_vibration: 0.0, max_temperature: 60.0 },
        );
        assert!(config.validate().is_err());
    }

    #[test]
    fn nan_machine_limits_are_rejected() {
        let config: Config = toml::from_str(
            r#"
            [equipment.machines.Press]
            max_vibration = nan
            max_temperature = nan
            "#,
        )
        .unwrap();
        assert!(config.equipment.machines["Press"].max_vibration.is_nan());
        assert!(config.validate().is_err());

        let mut config = Config::default();
        config.equipment.machines.insert(
            "Kiln".into(),
            MachineLimits { max_vibration: 2.0, max_temperature: f32::INFINITY },
        );
        assert!(config.validate().is_err());
    }
}
