//! Run configuration: step size, time span, constants, and initial state.

use std::{fs, path::Path};

use serde::{Deserialize, Serialize};

use crate::{Error, IncrementRule, Parameters, PendulumState};

/// Largest step count a config may imply.
const MAX_STEPS: f64 = 1e9;

/// Relative distance from an integer within which a span/step ratio counts
/// as that integer.
const STEP_SNAP: f64 = 1e-9;

/// A validated integration run.
///
/// Construct with [`Config::new`], or deserialize one from TOML with
/// [`Config::from_toml_str`] or [`Config::load`]. The file format uses flat
/// keys:
///
/// ```toml
/// h = 0.1
/// t_start = 0.0
/// t_end = 5.0
/// mass = 0.1
/// springConst = 0.2
/// length = 0.3
/// gravAccel = 0.1
/// y1_0 = 0.4   # stretch
/// y2_0 = 0.2   # stretch rate
/// z1_0 = 0.7   # swing
/// z2_0 = 0.2   # swing rate
/// increment = "classical"   # optional, or "legacy"
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "ConfigFile", into = "ConfigFile")]
pub struct Config {
    step: f64,
    t_start: f64,
    t_end: f64,
    parameters: Parameters,
    initial: PendulumState,
    increment: IncrementRule,
}

/// Errors that can occur when validating a [`Config`].
#[derive(Debug, thiserror::Error, Clone, Copy, PartialEq, Eq)]
pub enum ConfigError {
    #[error("step size must be finite and positive")]
    StepSize,

    #[error("time span must be finite with t_end after t_start")]
    TimeSpan,

    #[error("time span holds too many steps of this size")]
    StepCount,

    #[error("mass must be finite and nonzero")]
    Mass,

    #[error("{0} must be finite")]
    NonFinite(&'static str),

    #[error("length plus initial stretch must be nonzero")]
    Singular,
}

impl Default for Config {
    fn default() -> Self {
        let initial = PendulumState {
            stretch: 0.4,
            stretch_rate: 0.2,
            swing: 0.7,
            swing_rate: 0.2,
        };
        // Known-good values, unwrap is safe
        Self::new(0.1, 0.0, 5.0, Parameters::default(), initial).unwrap()
    }
}

impl Config {
    /// Creates a new config using the classical increment rule.
    ///
    /// # Errors
    ///
    /// Returns an error if the step size is not positive, the span is empty,
    /// the mass is zero, any value is non-finite, or the initial stretch
    /// cancels the rod length.
    pub fn new(
        step: f64,
        t_start: f64,
        t_end: f64,
        parameters: Parameters,
        initial: PendulumState,
    ) -> Result<Self, ConfigError> {
        if !step.is_finite() || step <= 0.0 {
            return Err(ConfigError::StepSize);
        }
        if !t_start.is_finite() || !t_end.is_finite() || t_end <= t_start {
            return Err(ConfigError::TimeSpan);
        }
        if (t_end - t_start) / step > MAX_STEPS {
            return Err(ConfigError::StepCount);
        }
        if !parameters.mass.is_finite() || parameters.mass == 0.0 {
            return Err(ConfigError::Mass);
        }

        let named = [
            ("spring constant", parameters.spring_constant),
            ("length", parameters.length),
            ("gravitational acceleration", parameters.gravity),
            ("initial stretch", initial.stretch),
            ("initial stretch rate", initial.stretch_rate),
            ("initial swing", initial.swing),
            ("initial swing rate", initial.swing_rate),
        ];
        if let Some((name, _)) = named.iter().find(|(_, value)| !value.is_finite()) {
            return Err(ConfigError::NonFinite(*name));
        }

        if parameters.length + initial.stretch == 0.0 {
            return Err(ConfigError::Singular);
        }

        Ok(Self {
            step,
            t_start,
            t_end,
            parameters,
            initial,
            increment: IncrementRule::default(),
        })
    }

    /// Parses and validates a config from TOML.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Parse`] if the text is not a valid config, including
    /// when it fails validation.
    pub fn from_toml_str(text: &str) -> Result<Self, Error> {
        Ok(toml::from_str(text)?)
    }

    /// Reads a config from a TOML file.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Read`] if the file cannot be read, or any error from
    /// [`Config::from_toml_str`].
    pub fn load(path: impl AsRef<Path>) -> Result<Self, Error> {
        let path = path.as_ref();
        let text = fs::read_to_string(path).map_err(|source| Error::Read {
            path: path.to_owned(),
            source,
        })?;
        Self::from_toml_str(&text)
    }

    /// Returns a copy with a different step size.
    ///
    /// # Errors
    ///
    /// Returns an error if the new step size fails validation.
    pub fn with_step(self, step: f64) -> Result<Self, ConfigError> {
        Self::new(step, self.t_start, self.t_end, self.parameters, self.initial)
            .map(|config| config.with_increment(self.increment))
    }

    /// Returns a copy with a different time span.
    ///
    /// # Errors
    ///
    /// Returns an error if the new span fails validation.
    pub fn with_span(self, t_start: f64, t_end: f64) -> Result<Self, ConfigError> {
        Self::new(self.step, t_start, t_end, self.parameters, self.initial)
            .map(|config| config.with_increment(self.increment))
    }

    /// Returns a copy using the given increment rule.
    #[must_use]
    pub fn with_increment(mut self, increment: IncrementRule) -> Self {
        self.increment = increment;
        self
    }

    /// Returns the fixed step size `h`.
    #[must_use]
    pub fn step(&self) -> f64 {
        self.step
    }

    #[must_use]
    pub fn t_start(&self) -> f64 {
        self.t_start
    }

    #[must_use]
    pub fn t_end(&self) -> f64 {
        self.t_end
    }

    #[must_use]
    pub fn parameters(&self) -> &Parameters {
        &self.parameters
    }

    /// Returns the state at `t_start`.
    #[must_use]
    pub fn initial(&self) -> &PendulumState {
        &self.initial
    }

    #[must_use]
    pub fn increment(&self) -> IncrementRule {
        self.increment
    }

    /// Returns the number of integration steps, `floor((t_end - t_start) / h)`.
    ///
    /// Ratios that land within rounding of an integer count as that integer,
    /// so a 0.3 span at `h = 0.1` takes 3 steps rather than 2.
    #[must_use]
    pub fn steps(&self) -> usize {
        let ratio = (self.t_end - self.t_start) / self.step;
        let nearest = ratio.round();
        let count = if (ratio - nearest).abs() <= STEP_SNAP * nearest.max(1.0) {
            nearest
        } else {
            ratio.floor()
        };

        // Validation keeps the ratio in [0, MAX_STEPS].
        #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
        let steps = count as usize;
        steps
    }
}

/// On-disk shape of a [`Config`].
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
struct ConfigFile {
    h: f64,
    t_start: f64,
    t_end: f64,
    mass: f64,
    #[serde(rename = "springConst", alias = "spring_constant")]
    spring_constant: f64,
    length: f64,
    #[serde(rename = "gravAccel", alias = "gravity")]
    gravity: f64,
    y1_0: f64,
    y2_0: f64,
    z1_0: f64,
    z2_0: f64,
    #[serde(default)]
    increment: IncrementRule,
}

impl TryFrom<ConfigFile> for Config {
    type Error = ConfigError;

    fn try_from(file: ConfigFile) -> Result<Self, Self::Error> {
        let parameters = Parameters {
            mass: file.mass,
            spring_constant: file.spring_constant,
            length: file.length,
            gravity: file.gravity,
        };
        let initial = PendulumState {
            stretch: file.y1_0,
            stretch_rate: file.y2_0,
            swing: file.z1_0,
            swing_rate: file.z2_0,
        };
        Config::new(file.h, file.t_start, file.t_end, parameters, initial)
            .map(|config| config.with_increment(file.increment))
    }
}

impl From<Config> for ConfigFile {
    fn from(config: Config) -> Self {
        Self {
            h: config.step,
            t_start: config.t_start,
            t_end: config.t_end,
            mass: config.parameters.mass,
            spring_constant: config.parameters.spring_constant,
            length: config.parameters.length,
            gravity: config.parameters.gravity,
            y1_0: config.initial.stretch,
            y2_0: config.initial.stretch_rate,
            z1_0: config.initial.swing,
            z2_0: config.initial.swing_rate,
            increment: config.increment,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn build(step: f64, t_start: f64, t_end: f64) -> Result<Config, ConfigError> {
        let defaults = Config::default();
        Config::new(
            step,
            t_start,
            t_end,
            *defaults.parameters(),
            *defaults.initial(),
        )
    }

    #[test]
    fn default_is_reference_scenario() {
        let config = Config::default();

        assert_eq!(config.step(), 0.1);
        assert_eq!(config.t_start(), 0.0);
        assert_eq!(config.t_end(), 5.0);
        assert_eq!(config.parameters(), &Parameters::default());
        assert_eq!(config.initial().swing, 0.7);
        assert_eq!(config.increment(), IncrementRule::Classical);
        assert_eq!(config.steps(), 50);
    }

    #[test]
    fn rejects_bad_step_size() {
        assert_eq!(build(0.0, 0.0, 1.0), Err(ConfigError::StepSize));
        assert_eq!(build(-0.1, 0.0, 1.0), Err(ConfigError::StepSize));
        assert_eq!(build(f64::NAN, 0.0, 1.0), Err(ConfigError::StepSize));
    }

    #[test]
    fn rejects_empty_or_reversed_span() {
        assert_eq!(build(0.1, 1.0, 1.0), Err(ConfigError::TimeSpan));
        assert_eq!(build(0.1, 1.0, 0.5), Err(ConfigError::TimeSpan));
        assert_eq!(build(0.1, 0.0, f64::INFINITY), Err(ConfigError::TimeSpan));
    }

    #[test]
    fn rejects_absurd_step_count() {
        assert_eq!(build(1e-12, 0.0, 1.0), Err(ConfigError::StepCount));
    }

    #[test]
    fn rejects_zero_mass() {
        let parameters = Parameters {
            mass: 0.0,
            ..Parameters::default()
        };
        let result = Config::new(0.1, 0.0, 1.0, parameters, PendulumState::default());

        assert_eq!(result, Err(ConfigError::Mass));
    }

    #[test]
    fn rejects_non_finite_values_by_name() {
        let parameters = Parameters {
            gravity: f64::NAN,
            ..Parameters::default()
        };
        let result = Config::new(0.1, 0.0, 1.0, parameters, PendulumState::default());

        assert_eq!(
            result,
            Err(ConfigError::NonFinite("gravitational acceleration"))
        );
    }

    #[test]
    fn rejects_collapsed_arm() {
        let initial = PendulumState {
            stretch: -0.3,
            ..PendulumState::default()
        };
        let result = Config::new(0.1, 0.0, 1.0, Parameters::default(), initial);

        assert_eq!(result, Err(ConfigError::Singular));
    }

    #[test]
    fn step_count_floors_partial_steps() {
        assert_eq!(build(0.1, 0.0, 0.5).unwrap().steps(), 5);
        assert_eq!(build(0.2, 0.0, 0.5).unwrap().steps(), 2);
        assert_eq!(build(1.0, 0.0, 0.5).unwrap().steps(), 0);
    }

    #[test]
    fn step_count_snaps_rounding_noise() {
        // 0.3 / 0.1 is 2.9999999999999996 in binary floating point.
        assert_eq!(build(0.1, 0.0, 0.3).unwrap().steps(), 3);
        assert_eq!(build(0.1, 0.7, 1.0).unwrap().steps(), 3);
    }

    #[test]
    fn overrides_keep_increment_rule() {
        let config = Config::default()
            .with_increment(IncrementRule::Legacy)
            .with_step(0.05)
            .unwrap()
            .with_span(1.0, 2.0)
            .unwrap();

        assert_eq!(config.increment(), IncrementRule::Legacy);
        assert_eq!(config.step(), 0.05);
        assert_eq!(config.steps(), 20);
    }

    #[test]
    fn overrides_revalidate() {
        assert_eq!(
            Config::default().with_step(-1.0),
            Err(ConfigError::StepSize)
        );
        assert_eq!(
            Config::default().with_span(2.0, 1.0),
            Err(ConfigError::TimeSpan)
        );
    }

    #[test]
    fn parses_recognized_field_names() {
        let config = Config::from_toml_str(
            r#"
            h = 0.1
            t_start = 0.0
            t_end = 0.5
            mass = 0.1
            springConst = 0.2
            length = 0.3
            gravAccel = 0.1
            y1_0 = 0.4
            y2_0 = 0.2
            z1_0 = 0.7
            z2_0 = 0.2
            "#,
        )
        .expect("should parse");

        assert_eq!(config, Config::default().with_span(0.0, 0.5).unwrap());
    }

    #[test]
    fn parses_snake_case_aliases_and_legacy_rule() {
        let config = Config::from_toml_str(
            r#"
            h = 0.01
            t_start = -1.0
            t_end = 1.0
            mass = 2.0
            spring_constant = 3.0
            length = 1.0
            gravity = 9.81
            y1_0 = 0.0
            y2_0 = 0.0
            z1_0 = 0.1
            z2_0 = 0.0
            increment = "legacy"
            "#,
        )
        .expect("should parse");

        assert_eq!(config.parameters().gravity, 9.81);
        assert_eq!(config.increment(), IncrementRule::Legacy);
        assert_eq!(config.steps(), 200);
    }

    #[test]
    fn invalid_file_values_fail_to_parse() {
        let text = toml::to_string(&Config::default())
            .expect("should serialize")
            .replace("h = 0.1", "h = 0.0");

        assert!(matches!(Config::from_toml_str(&text), Err(Error::Parse(_))));
    }

    #[test]
    fn unknown_keys_are_rejected() {
        let mut text = toml::to_string(&Config::default()).expect("should serialize");
        text.push_str("damping = 0.5\n");

        assert!(matches!(Config::from_toml_str(&text), Err(Error::Parse(_))));
    }

    #[test]
    fn serialized_config_reads_back() {
        let config = Config::default().with_increment(IncrementRule::Legacy);
        let text = toml::to_string(&config).expect("should serialize");

        assert_eq!(Config::from_toml_str(&text).unwrap(), config);
    }

    #[test]
    fn missing_file_reports_path() {
        let err = Config::load("no/such/scenario.toml").unwrap_err();

        assert!(matches!(err, Error::Read { .. }));
        assert!(err.to_string().contains("no/such/scenario.toml"));
    }
}
