//! Machinery suitability checks against per-machine ceilings.

use std::collections::BTreeMap;
use std::fmt;

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::config::EquipmentConfig;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MachineLimits {
    pub max_vibration: f32,
    /// Degrees Celsius.
    pub max_temperature: f32,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EquipmentReading {
    pub vibration: f32,
    pub temperature: f32,
    /// Air quality index.
    pub air_quality: u32,
}

impl EquipmentReading {
    /// Stand-in for sensor telemetry when no hardware is attached.
    pub fn simulated<R: Rng>(rng: &mut R) -> Self {
        Self {
            vibration: rng.gen_range(0.0..5.0),
            temperature: rng.gen_range(30.0..100.0),
            air_quality: rng.gen_range(50..=200),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Hazard {
    Vibration { measured: f32, limit: f32 },
    Temperature { measured: f32, limit: f32 },
    AirQuality { aqi: u32 },
}

impl fmt::Display for Hazard {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Hazard::Vibration { measured, limit } => {
                write!(f, "Vibration Level too high ({measured:.2} > {limit:?})")
            }
            Hazard::Temperature { measured, limit } => {
                write!(f, "Temperature too high ({measured:.1}°C > {limit:?}°C)")
            }
            Hazard::AirQuality { aqi } => write!(f, "Poor Air Quality (AQI: {aqi})"),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Suitability {
    Suitable,
    NotSuitable(Vec<Hazard>),
}

impl Suitability {
    pub fn is_suitable(&self) -> bool {
        matches!(self, Suitability::Suitable)
    }
}

impl fmt::Display for Suitability {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Suitability::Suitable => f.write_str("Suitable"),
            Suitability::NotSuitable(hazards) => {
                f.write_str("Not Suitable: ")?;
                for (i, hazard) in hazards.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{hazard}")?;
                }
                Ok(())
            }
        }
    }
}

pub fn evaluate(reading: &EquipmentReading, limits: &MachineLimits, max_air_quality: u32) -> Suitability {
    let mut hazards = Vec::new();

    if reading.vibration > limits.max_vibration {
        hazards.push(Hazard::Vibration { measured: reading.vibration, limit: limits.max_vibration });
    }
    if reading.temperature > limits.max_temperature {
        hazards.push(Hazard::Temperature { measured: reading.temperature, limit: limits.max_temperature });
    }
    if reading.air_quality > max_air_quality {
        hazards.push(Hazard::AirQuality { aqi: reading.air_quality });
    }

    if hazards.is_empty() {
        Suitability::Suitable
    } else {
        Suitability::NotSuitable(hazards)
    }
}

/// Evaluates one shared reading against every configured machine.
pub fn evaluate_all(reading: &EquipmentReading, config: &EquipmentConfig) -> BTreeMap<String, Suitability> {
    config
        .machines
        .iter()
        .map(|(name, limits)| (name.clone(), evaluate(reading, limits, config.max_air_quality)))
        .collect()
}

/// Minutes until a machine is safe to approach, cooling at 1°C per minute.
pub fn cool_down_minutes(current_temp: f32, max_temp: f32) -> u32 {
    if current_temp <= max_temp {
        return 0;
    }
    (current_temp - max_temp) as u32
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    const MACHINE_B: MachineLimits = MachineLimits { max_vibration: 2.5, max_temperature: 75.0 };

    #[test]
    fn within_limits_is_suitable() {
        let reading = EquipmentReading { vibration: 2.5, temperature: 75.0, air_quality: 150 };
        assert_eq!(evaluate(&reading, &MACHINE_B, 150), Suitability::Suitable);
    }

    #[test]
    fn hazards_listed_in_fixed_order() {
        let reading = EquipmentReading { vibration: 3.1, temperature: 91.34, air_quality: 180 };
        let result = evaluate(&reading, &MACHINE_B, 150);
        assert_eq!(
            result,
            Suitability::NotSuitable(vec![
                Hazard::Vibration { measured: 3.1, limit: 2.5 },
                Hazard::Temperature { measured: 91.34, limit: 75.0 },
                Hazard::AirQuality { aqi: 180 },
            ])
        );
        assert_eq!(
            result.to_string(),
            "Not Suitable: Vibration Level too high (3.10 > 2.5), \
             Temperature too high (91.3°C > 75.0°C), Poor Air Quality (AQI: 180)"
        );
    }

    #[test]
    fn whole_number_limits_keep_their_decimal() {
        let reading = EquipmentReading { vibration: 3.5, temperature: 82.0, air_quality: 60 };
        let limits = MachineLimits { max_vibration: 3.0, max_temperature: 80.0 };
        assert_eq!(
            evaluate(&reading, &limits, 150).to_string(),
            "Not Suitable: Vibration Level too high (3.50 > 3.0), Temperature too high (82.0°C > 80.0°C)"
        );
    }

    #[test]
    fn evaluates_every_configured_machine() {
        let reading = EquipmentReading { vibration: 2.8, temperature: 70.0, air_quality: 90 };
        let results = evaluate_all(&reading, &EquipmentConfig::default());
        assert!(results["Machine_A"].is_suitable());
        assert!(!results["Machine_B"].is_suitable());
        assert!(results["Machine_C"].is_suitable());
    }

    #[test]
    fn cool_down_truncates_to_whole_minutes() {
        assert_eq!(cool_down_minutes(70.0, 75.0), 0);
        assert_eq!(cool_down_minutes(75.0, 75.0), 0);
        assert_eq!(cool_down_minutes(87.9, 75.0), 12);
    }

    #[test]
    fn simulated_readings_stay_in_sensor_range() {
        let mut rng = StdRng::seed_from_u64(7);
        for _ in 0..200 {
            let r = EquipmentReading::simulated(&mut rng);
            assert!((0.0..5.0).contains(&r.vibration));
            assert!((30.0..100.0).contains(&r.temperature));
            assert!((50..=200).contains(&r.air_quality));
        }
    }
}
