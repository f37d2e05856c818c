//! Data-driven game balance
//!
//! Every knob defaults to the shipped game's value. Overrides come in as
//! JSON; missing fields keep their defaults.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::consts::*;

/// Errors from loading or validating a tuning override
#[derive(Debug, Error)]
pub enum TuningError {
    #[error("failed to read tuning file: {0}")]
    Io(#[from] std::io::Error),
    #[error("invalid tuning JSON: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("{field}: min ({min}) is greater than max ({max})")]
    InvertedRange {
        field: &'static str,
        min: f64,
        max: f64,
    },
    #[error("{field} must be positive, got {value}")]
    NotPositive { field: &'static str, value: f64 },
    #[error("spawn interval floor ({floor}ms) is above the base interval ({base}ms)")]
    FloorAboveBase { floor: f64, base: f64 },
    #[error("burst size must be at least 1")]
    EmptyBurst,
}

/// Game balance parameters
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Tuning {
    // === Spawner ===
    pub spawn_interval_base_ms: f64,
    pub spawn_interval_floor_ms: f64,
    pub spawn_interval_score_divisor: f64,
    pub speed_min: f32,
    pub speed_max: f32,
    pub speed_score_divisor: f32,
    pub radius_min: f32,
    pub radius_max: f32,
    pub spawn_side_margin: f32,
    pub spawn_y: f32,

    // === Scoring ===
    pub hit_award: u32,

    // === Particles ===
    pub burst_size: usize,
    pub burst_speed_min: f32,
    pub burst_speed_max: f32,
    pub particle_decay: f32,
}

impl Default for Tuning {
    fn default() -> Self {
        Self {
            spawn_interval_base_ms: SPAWN_INTERVAL_BASE_MS,
            spawn_interval_floor_ms: SPAWN_INTERVAL_FLOOR_MS,
            spawn_interval_score_divisor: SPAWN_INTERVAL_SCORE_DIVISOR,
            speed_min: TARGET_SPEED_MIN,
            speed_max: TARGET_SPEED_MAX,
            speed_score_divisor: SPEED_SCORE_DIVISOR,
            radius_min: TARGET_RADIUS_MIN,
            radius_max: TARGET_RADIUS_MAX,
            spawn_side_margin: SPAWN_SIDE_MARGIN,
            spawn_y: SPAWN_Y,
            hit_award: HIT_AWARD,
            burst_size: BURST_SIZE,
            burst_speed_min: BURST_SPEED_MIN,
            burst_speed_max: BURST_SPEED_MAX,
            particle_decay: PARTICLE_DECAY,
        }
    }
}

impl Tuning {
    /// LocalStorage key (used only in wasm32)
    #[allow(dead_code)]
    const STORAGE_KEY: &'static str = "distraction_defense_tuning";

    /// Parse and validate a JSON override
    pub fn from_json(json: &str) -> Result<Self, TuningError> {
        let tuning: Tuning = serde_json::from_str(json)?;
        tuning.validate()?;
        Ok(tuning)
    }

    /// Check that ranges are ordered and divisors usable.
    ///
    /// Fall speed and the spawn floor must be positive: targets only ever
    /// move down, and spawn rate stays bounded.
    pub fn validate(&self) -> Result<(), TuningError> {
        check_range("speed", self.speed_min as f64, self.speed_max as f64)?;
        check_range("radius", self.radius_min as f64, self.radius_max as f64)?;
        check_range(
            "burst_speed",
            self.burst_speed_min as f64,
            self.burst_speed_max as f64,
        )?;
        check_positive(
            "spawn_interval_score_divisor",
            self.spawn_interval_score_divisor,
        )?;
        check_positive("speed_score_divisor", self.speed_score_divisor as f64)?;
        check_positive("speed_min", self.speed_min as f64)?;
        check_positive("spawn_interval_floor_ms", self.spawn_interval_floor_ms)?;
        check_positive("burst_speed_min", self.burst_speed_min as f64)?;
        check_positive("radius_min", self.radius_min as f64)?;
        check_positive("particle_decay", self.particle_decay as f64)?;
        if self.spawn_interval_floor_ms > self.spawn_interval_base_ms {
            return Err(TuningError::FloorAboveBase {
                floor: self.spawn_interval_floor_ms,
                base: self.spawn_interval_base_ms,
            });
        }
        if self.burst_size == 0 {
            return Err(TuningError::EmptyBurst);
        }
        Ok(())
    }

    /// Load tuning override from LocalStorage (WASM only)
    #[cfg(target_arch = "wasm32")]
    pub fn load() -> Self {
        let storage = web_sys::window()
            .and_then(|w| w.local_storage().ok())
            .flatten();

        if let Some(storage) = storage {
            if let Ok(Some(json)) = storage.get_item(Self::STORAGE_KEY) {
                match Self::from_json(&json) {
                    Ok(tuning) => {
                        log::info!("Loaded tuning override from LocalStorage");
                        return tuning;
                    }
                    Err(e) => log::warn!("Ignoring tuning override: {}", e),
                }
            }
        }

        Self::default()
    }

    /// Native: read an override from a JSON file
    #[cfg(not(target_arch = "wasm32"))]
    pub fn load_file(path: &std::path::Path) -> Result<Self, TuningError> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json(&json)
    }
}

fn check_range(field: &'static str, min: f64, max: f64) -> Result<(), TuningError> {
    if min > max {
        Err(TuningError::InvertedRange { field, min, max })
    } else {
        Ok(())
    }
}

fn check_positive(field: &'static str, value: f64) -> Result<(), TuningError> {
    if value > 0.0 {
        Ok(())
    } else {
        Err(TuningError::NotPositive { field, value })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_valid() {
        let tuning = Tuning::default();
        assert!(tuning.validate().is_ok());
        assert_eq!(tuning.hit_award, 10);
        assert_eq!(tuning.burst_size, 12);
    }

    #[test]
    fn test_partial_override_keeps_defaults() {
        let tuning = Tuning::from_json(r#"{ "hit_award": 25, "speed_max": 3.0 }"#).unwrap();
        assert_eq!(tuning.hit_award, 25);
        assert_eq!(tuning.speed_max, 3.0);
        assert_eq!(tuning.speed_min, TARGET_SPEED_MIN);
        assert_eq!(tuning.spawn_interval_floor_ms, SPAWN_INTERVAL_FLOOR_MS);
    }

    #[test]
    fn test_rejects_inverted_range() {
        let err = Tuning::from_json(r#"{ "radius_min": 50.0, "radius_max": 10.0 }"#).unwrap_err();
        assert!(matches!(
            err,
            TuningError::InvertedRange {
                field: "radius",
                ..
            }
        ));
    }

    #[test]
    fn test_rejects_rising_targets() {
        let err = Tuning::from_json(r#"{ "speed_min": -3.0, "speed_max": -1.0 }"#).unwrap_err();
        assert!(matches!(
            err,
            TuningError::NotPositive {
                field: "speed_min",
                ..
            }
        ));
        assert!(Tuning::from_json(r#"{ "speed_min": 0.0 }"#).is_err());
    }

    #[test]
    fn test_rejects_unbounded_spawn_rate() {
        for floor in ["0.0", "-500.0"] {
            let json = format!(r#"{{ "spawn_interval_floor_ms": {} }}"#, floor);
            assert!(matches!(
                Tuning::from_json(&json),
                Err(TuningError::NotPositive {
                    field: "spawn_interval_floor_ms",
                    ..
                })
            ));
        }
    }

    #[test]
    fn test_rejects_bad_values() {
        assert!(matches!(
            Tuning::from_json(r#"{ "speed_score_divisor": 0.0 }"#),
            Err(TuningError::NotPositive { .. })
        ));
        assert!(matches!(
            Tuning::from_json(r#"{ "spawn_interval_floor_ms": 2000.0 }"#),
            Err(TuningError::FloorAboveBase { .. })
        ));
        assert!(matches!(
            Tuning::from_json(r#"{ "burst_size": 0 }"#),
            Err(TuningError::EmptyBurst)
        ));
        assert!(matches!(
            Tuning::from_json(r#"{ "burst_speed_min": 0.0 }"#),
            Err(TuningError::NotPositive {
                field: "burst_speed_min",
                ..
            })
        ));
        assert!(matches!(
            Tuning::from_json("not json"),
            Err(TuningError::Parse(_))
        ));
    }
}
