use serde::{Deserialize, Serialize};
use std::f64::consts::PI;
use std::fmt;
use std::time::Duration;

/// Every tunable of a round. Built once and never mutated afterwards.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub seed: u32,
    /// Side length of the square field.
    pub field_size: f64,
    /// Length of a spaceship hull from tail to nose.
    pub spaceship_size: f64,
    /// Physics steps per second.
    pub physics_hz: u32,
    /// Game ticks per second. Must divide `physics_hz`.
    pub ticks_per_second: u32,

    pub max_health: f64,
    pub max_energy: f64,
    /// Energy regained at the start of every tick.
    pub energy_regen: f64,
    /// Energy per unit of scanned area.
    pub scan_cost_factor: f64,
    /// Energy per unit of velocity change.
    pub move_cost_factor: f64,
    /// Largest velocity change per tick, in field units per tick.
    pub max_acceleration: f64,
    pub shoot_cost: f64,

    /// Rocket speed in field units per tick.
    pub rocket_speed: f64,
    pub rocket_radius: f64,
    pub rocket_damage: f64,

    /// First tick on which every ship takes `sudden_death_damage`.
    pub sudden_death_tick: u32,
    pub sudden_death_damage: f64,

    pub pilot_timeout_ms: u64,
    pub pilot_poll_interval_ms: u64,

    /// Effect lifetimes in seconds.
    pub scan_flash_duration: f64,
    pub explosion_duration: f64,
    pub impact_explosion_radius: f64,
    pub destruction_explosion_radius: f64,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            seed: 0,
            field_size: 100.0,
            spaceship_size: 5.0,
            physics_hz: 60,
            ticks_per_second: 5,
            max_health: 100.0,
            max_energy: 100.0,
            energy_regen: 10.0,
            scan_cost_factor: 1.0 / (10.0 * PI),
            move_cost_factor: 1.0,
            max_acceleration: 5.0,
            shoot_cost: 10.0,
            rocket_speed: 5.0,
            rocket_radius: 0.5,
            rocket_damage: 20.0,
            sudden_death_tick: 600,
            sudden_death_damage: 0.5,
            pilot_timeout_ms: 100,
            pilot_poll_interval_ms: 10,
            scan_flash_duration: 0.5,
            explosion_duration: 1.0,
            impact_explosion_radius: 2.0,
            destruction_explosion_radius: 10.0,
        }
    }
}

#[derive(Debug)]
pub enum ConfigError {
    Parse(serde_json::Error),
    Invalid(String),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::Parse(e) => write!(f, "failed to parse config: {e}"),
            ConfigError::Invalid(msg) => write!(f, "invalid config: {msg}"),
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ConfigError::Parse(e) => Some(e),
            ConfigError::Invalid(_) => None,
        }
    }
}

impl From<serde_json::Error> for ConfigError {
    fn from(e: serde_json::Error) -> Self {
        ConfigError::Parse(e)
    }
}

impl Config {
    pub fn from_json(s: &str) -> Result<Config, ConfigError> {
        let config: Config = serde_json::from_str(s)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let positive = [
            ("field_size", self.field_size),
            ("spaceship_size", self.spaceship_size),
            ("max_health", self.max_health),
            ("max_energy", self.max_energy),
            ("rocket_speed", self.rocket_speed),
            ("rocket_radius", self.rocket_radius),
        ];
        for (name, value) in positive {
            if !(value.is_finite() && value > 0.0) {
                return Err(ConfigError::Invalid(format!("{name} must be positive")));
            }
        }
        let non_negative = [
            ("energy_regen", self.energy_regen),
            ("scan_cost_factor", self.scan_cost_factor),
            ("move_cost_factor", self.move_cost_factor),
            ("max_acceleration", self.max_acceleration),
            ("shoot_cost", self.shoot_cost),
            ("rocket_damage", self.rocket_damage),
            ("sudden_death_damage", self.sudden_death_damage),
            ("scan_flash_duration", self.scan_flash_duration),
            ("explosion_duration", self.explosion_duration),
            ("impact_explosion_radius", self.impact_explosion_radius),
            ("destruction_explosion_radius", self.destruction_explosion_radius),
        ];
        for (name, value) in non_negative {
            if !(value.is_finite() && value >= 0.0) {
                return Err(ConfigError::Invalid(format!("{name} must not be negative")));
            }
        }
        if self.physics_hz == 0 || self.ticks_per_second == 0 {
            return Err(ConfigError::Invalid(
                "physics_hz and ticks_per_second must be positive".to_string(),
            ));
        }
        if self.physics_hz % self.ticks_per_second != 0 {
            return Err(ConfigError::Invalid(format!(
                "physics_hz {} is not a multiple of ticks_per_second {}",
                self.physics_hz, self.ticks_per_second
            )));
        }
        if self.pilot_timeout_ms == 0 || self.pilot_poll_interval_ms == 0 {
            return Err(ConfigError::Invalid(
                "pilot timeout and poll interval must be positive".to_string(),
            ));
        }
        if self.field_size <= 2.0 * self.spaceship_size {
            return Err(ConfigError::Invalid(
                "field_size must leave room for a spaceship".to_string(),
            ));
        }
        Ok(())
    }

    /// Physics steps per game tick.
    pub fn steps_per_tick(&self) -> u32 {
        self.physics_hz / self.ticks_per_second
    }

    /// Seconds per game tick.
    pub fn tick_length(&self) -> f64 {
        1.0 / self.ticks_per_second as f64
    }

    pub fn physics_tick_length(&self) -> f64 {
        1.0 / self.physics_hz as f64
    }

    pub fn pilot_timeout(&self) -> Duration {
        Duration::from_millis(self.pilot_timeout_ms)
    }

    pub fn pilot_poll_interval(&self) -> Duration {
        Duration::from_millis(self.pilot_poll_interval_ms)
    }
}
