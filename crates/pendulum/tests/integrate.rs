use approx::{assert_abs_diff_eq, assert_relative_eq};
use sprung::{
    Config, IncrementRule, Parameters, PendulumInput, PendulumProblem, PendulumState,
    SpringPendulum, Trajectory, integrate,
};
use sprung_solvers::transient::rk4;

// Reference values from an independent RK4 implementation of the same
// equations, h = 0.1, starting from the reference state.
const CLASSICAL_STEP_1: [f64; 4] = [
    0.416_461_172_187_762_8,
    0.128_665_588_912_733_72,
    0.720_041_335_744_635_2,
    0.200_120_501_603_330_03,
];
const CLASSICAL_STEP_5: [f64; 4] = [
    0.408_142_246_953_545_84,
    -0.170_237_725_027_674_87,
    0.793_962_706_737_815_9,
    0.158_883_617_730_747_16,
];
const LEGACY_STEP_1: [f64; 4] = [
    0.416_461_172_187_762_8,
    0.128_665_588_912_733_72,
    0.716_461_172_187_762_7,
    0.128_665_588_912_733_72,
];
const LEGACY_STEP_5: [f64; 4] = [
    0.406_658_047_743_575_5,
    -0.176_628_156_966_905_7,
    0.706_658_047_743_575_4,
    -0.176_628_156_966_905_7,
];

fn reference() -> Config {
    Config::default().with_span(0.0, 0.5).unwrap()
}

fn assert_state(state: PendulumState, expected: [f64; 4]) {
    assert_abs_diff_eq!(state.stretch, expected[0], epsilon = 1e-9);
    assert_abs_diff_eq!(state.stretch_rate, expected[1], epsilon = 1e-9);
    assert_abs_diff_eq!(state.swing, expected[2], epsilon = 1e-9);
    assert_abs_diff_eq!(state.swing_rate, expected[3], epsilon = 1e-9);
}

#[test]
fn reference_run_matches_fixture() {
    let trajectory = integrate(&reference()).expect("should integrate");

    assert_eq!(trajectory.len(), 6);
    assert_eq!(trajectory.state(0), Some(*reference().initial()));
    assert_state(trajectory.state(1).unwrap(), CLASSICAL_STEP_1);
    assert_state(trajectory.state(5).unwrap(), CLASSICAL_STEP_5);
}

#[test]
fn legacy_run_matches_first_version_output() {
    let config = reference().with_increment(IncrementRule::Legacy);

    let trajectory = integrate(&config).expect("should integrate");

    assert_state(trajectory.state(1).unwrap(), LEGACY_STEP_1);
    assert_state(trajectory.state(5).unwrap(), LEGACY_STEP_5);
}

#[test]
fn legacy_swing_shadows_stretch() {
    let config = Config::default().with_increment(IncrementRule::Legacy);
    let offset = config.initial().swing - config.initial().stretch;

    let trajectory = integrate(&config).expect("should integrate");

    for n in 1..trajectory.len() {
        let state = trajectory.state(n).unwrap();
        assert_relative_eq!(state.swing - state.stretch, offset, epsilon = 1e-12);
        assert_eq!(state.swing_rate, state.stretch_rate);
    }
}

#[test]
fn stretch_rule_matches_between_increment_rules() {
    // The rules only differ in how swing advances, and only from step 2 on
    // does that feed back into stretch.
    let classical = integrate(&reference()).unwrap();
    let legacy = integrate(&reference().with_increment(IncrementRule::Legacy)).unwrap();

    assert_eq!(classical.stretch[1], legacy.stretch[1]);
    assert_eq!(classical.stretch_rate[1], legacy.stretch_rate[1]);
    assert!((classical.swing[1] - legacy.swing[1]).abs() > 1e-3);
}

#[test]
fn times_are_evenly_spaced_from_start() {
    let config = Config::default().with_span(1.5, 3.0).unwrap();

    let trajectory = integrate(&config).expect("should integrate");

    assert_eq!(trajectory.len(), config.steps() + 1);
    assert_eq!(trajectory.times[0], 1.5);
    for (n, &t) in trajectory.times.iter().enumerate() {
        #[allow(clippy::cast_precision_loss)]
        let expected = 1.5 + n as f64 * config.step();
        assert_relative_eq!(t, expected, epsilon = 1e-12);
    }
}

#[test]
fn every_series_has_the_same_length() {
    for (step, t_end) in [(0.1, 5.0), (0.3, 1.0), (0.07, 0.5), (0.5, 0.5)] {
        let config = Config::default()
            .with_span(0.0, t_end)
            .unwrap()
            .with_step(step)
            .unwrap();

        let trajectory = integrate(&config).unwrap();

        #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
        let expected = (t_end / step + 1e-9).floor() as usize + 1;
        assert_eq!(trajectory.len(), expected, "h = {step}, t_end = {t_end}");
        assert_eq!(trajectory.stretch.len(), expected);
        assert_eq!(trajectory.stretch_rate.len(), expected);
        assert_eq!(trajectory.swing.len(), expected);
        assert_eq!(trajectory.swing_rate.len(), expected);
    }
}

#[test]
fn step_equal_to_span_takes_one_step() {
    let config = Config::default().with_span(0.0, 0.5).unwrap().with_step(0.5).unwrap();

    let trajectory = integrate(&config).expect("should integrate");

    assert_eq!(trajectory.len(), 2);
    assert_eq!(trajectory.times, [0.0, 0.5]);
}

fn bits(trajectory: &Trajectory) -> Vec<u64> {
    [
        &trajectory.times,
        &trajectory.stretch,
        &trajectory.stretch_rate,
        &trajectory.swing,
        &trajectory.swing_rate,
    ]
    .into_iter()
    .flatten()
    .map(|value| value.to_bits())
    .collect()
}

#[test]
fn repeated_runs_are_bit_identical() {
    // The full reference run goes non-finite, so compare bits rather than
    // values to keep NaN entries comparable.
    let config = Config::default();

    assert_eq!(
        bits(&integrate(&config).unwrap()),
        bits(&integrate(&config).unwrap())
    );
}

#[test]
fn reference_run_diverges_but_completes() {
    // Stretch swings far enough negative to cancel the rod length a little
    // after t = 2.5, and the run carries on through the blow-up.
    let config = Config::default();

    let trajectory = integrate(&config).expect("divergence is not an error");

    assert_eq!(trajectory.len(), 51);
    assert!(trajectory.state(20).unwrap().is_finite());
    assert!(trajectory.rows().any(|(_, state)| !state.is_finite()));
}

#[test]
fn resting_pendulum_stays_at_rest() {
    let parameters = Parameters::default();
    let rest = PendulumState {
        stretch: parameters.gravity * parameters.mass / parameters.spring_constant,
        ..PendulumState::default()
    };
    let config = Config::new(0.1, 0.0, 5.0, parameters, rest).unwrap();

    let trajectory = integrate(&config).unwrap();

    for (_, state) in trajectory.rows() {
        assert_abs_diff_eq!(state.stretch, rest.stretch, epsilon = 1e-12);
        assert_abs_diff_eq!(state.stretch_rate, 0.0, epsilon = 1e-12);
        assert_abs_diff_eq!(state.swing, 0.0);
        assert_abs_diff_eq!(state.swing_rate, 0.0);
    }
}

/// Error in stretch at the end of a run reduced to simple harmonic motion.
///
/// With no gravity and no swing, stretch obeys y'' = -(k/m)·y, so
/// y(t) = y0·cos(ωt) with ω = sqrt(k/m) = 1.
fn harmonic_error(step: f64) -> f64 {
    let parameters = Parameters {
        mass: 1.0,
        spring_constant: 1.0,
        length: 1.0,
        gravity: 0.0,
    };
    let initial = PendulumState {
        stretch: 0.1,
        ..PendulumState::default()
    };
    let config = Config::new(step, 0.0, 2.0, parameters, initial).unwrap();

    let trajectory = integrate(&config).unwrap();

    let n = trajectory.len() - 1;
    let t = trajectory.times[n];
    (trajectory.stretch[n] - 0.1 * t.cos()).abs()
}

#[test]
fn global_error_is_fourth_order() {
    let coarse = harmonic_error(0.2);
    let medium = harmonic_error(0.1);
    let fine = harmonic_error(0.05);

    // Halving h should cut the error by about 2^4 = 16.
    for ratio in [coarse / medium, medium / fine] {
        assert!((14.0..18.0).contains(&ratio), "error ratio {ratio}");
    }
    assert!(fine < 1e-7);
}

#[test]
fn collapsed_arm_diverges_without_stopping() {
    // Config validation refuses this setup, so drive the solver directly.
    let initial = PendulumState {
        stretch: 0.4,
        stretch_rate: 0.2,
        swing: 0.7,
        swing_rate: 0.2,
    };
    let parameters = Parameters {
        length: -initial.stretch,
        ..Parameters::default()
    };
    let model = SpringPendulum::new(parameters);
    let input = PendulumInput {
        time: 0.0,
        state: initial,
    };

    let solution = rk4::solve_unobserved(&model, &PendulumProblem::default(), input, 0.1, 5)
        .expect("non-finite values are not errors");

    assert_eq!(solution.history.len(), 6);
    assert!(solution.history[0].output.d_swing_rate.is_infinite());
    for snapshot in &solution.history[1..] {
        assert!(!snapshot.input.state.swing_rate.is_finite());
    }
}

#[test]
fn collapsed_arm_is_a_config_error() {
    let initial = PendulumState {
        stretch: 0.4,
        ..PendulumState::default()
    };
    let parameters = Parameters {
        length: -0.4,
        ..Parameters::default()
    };

    assert_eq!(
        Config::new(0.1, 0.0, 0.5, parameters, initial),
        Err(sprung::ConfigError::Singular)
    );
}

#[test]
fn scenario_file_loads() {
    let path = concat!(env!("CARGO_MANIFEST_DIR"), "/scenarios/reference.toml");

    let config = Config::load(path).expect("should load");

    assert_eq!(config, reference());
}
