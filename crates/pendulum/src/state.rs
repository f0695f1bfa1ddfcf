use sprung_core::StepIntegrable;

/// The pendulum's state at one instant.
///
/// Stretch is the rod extension beyond its unstretched length; swing is the
/// rod angle from the downward vertical, in radians.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct PendulumState {
    /// Rod extension (y1).
    pub stretch: f64,

    /// Rate of extension (y2).
    pub stretch_rate: f64,

    /// Rod angle in radians (z1).
    pub swing: f64,

    /// Angular rate (z2).
    pub swing_rate: f64,
}

impl PendulumState {
    /// Returns `true` if every component is finite.
    #[must_use]
    pub fn is_finite(&self) -> bool {
        self.stretch.is_finite()
            && self.stretch_rate.is_finite()
            && self.swing.is_finite()
            && self.swing_rate.is_finite()
    }
}

/// Time derivative of a [`PendulumState`].
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct PendulumRates {
    pub d_stretch: f64,
    pub d_stretch_rate: f64,
    pub d_swing: f64,
    pub d_swing_rate: f64,
}

impl StepIntegrable<f64> for PendulumState {
    type Derivative = PendulumRates;

    fn step(&self, rates: PendulumRates, dt: f64) -> Self {
        PendulumState {
            stretch: self.stretch + rates.d_stretch * dt,
            stretch_rate: self.stretch_rate + rates.d_stretch_rate * dt,
            swing: self.swing + rates.d_swing * dt,
            swing_rate: self.swing_rate + rates.d_swing_rate * dt,
        }
    }
}
