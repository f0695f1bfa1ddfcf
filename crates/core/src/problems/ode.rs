use crate::{DerivativeOf, StepIntegrable};

/// Defines an ODE (ordinary differential equation) problem to be solved.
///
/// An ODE problem extracts a state from model input, computes derivatives from
/// model input and output, and reconstructs model input from an updated state
/// and step size. This trait enables generic ODE solvers to integrate any model
/// by working with a state type that implements [`StepIntegrable`].
pub trait OdeProblem {
    type Input;
    type Output;
    type Delta;
    type State: StepIntegrable<Self::Delta>;
    type Error: std::error::Error + Send + Sync + 'static;

    /// Extracts the state from model input.
    ///
    /// # Errors
    ///
    /// Returns [`Self::Error`] if the state cannot be extracted from the input.
    fn state(&self, input: &Self::Input) -> Result<Self::State, Self::Error>;

    /// Computes the derivative of the state from model input and output.
    ///
    /// # Errors
    ///
    /// Returns [`Self::Error`] if the derivative cannot be computed.
    fn derivative(
        &self,
        input: &Self::Input,
        output: &Self::Output,
    ) -> Result<DerivativeOf<Self::State, Self::Delta>, Self::Error>;

    /// Builds model input from a state and the offset from `base`.
    ///
    /// Multi-stage solvers call this for intermediate stage states as well as
    /// for the accepted end-of-step state, so `delta` may be a fraction of the
    /// step size.
    ///
    /// # Errors
    ///
    /// Returns [`Self::Error`] if the input cannot be constructed from the state.
    fn build_input(
        &self,
        base: &Self::Input,
        state: &Self::State,
        delta: &Self::Delta,
    ) -> Result<Self::Input, Self::Error>;

    /// Maps a stage derivative before it contributes to the accepted step.
    ///
    /// Solvers that combine several stage derivatives into one increment pass
    /// each stage through this hook first. Intermediate stage states are always
    /// built from the unmapped derivative.
    ///
    /// The default implementation returns the derivative unchanged.
    ///
    /// # Errors
    ///
    /// Returns [`Self::Error`] if the derivative cannot be mapped.
    fn increment_derivative(
        &self,
        stage: DerivativeOf<Self::State, Self::Delta>,
    ) -> Result<DerivativeOf<Self::State, Self::Delta>, Self::Error> {
        Ok(stage)
    }

    /// Finalizes input after a successful integration step.
    ///
    /// This is called only after a step is accepted by the solver. It provides
    /// a hook for constraint enforcement or other problem-specific adjustments.
    ///
    /// The default implementation returns the input unchanged. Only implement
    /// this method if your problem requires it.
    ///
    /// # Errors
    ///
    /// Returns [`Self::Error`] if finalization fails.
    fn finalize_step(
        &self,
        next_input: Self::Input,
        _prev_input: &Self::Input,
        _prev_output: &Self::Output,
        _step_delta: &Self::Delta,
    ) -> Result<Self::Input, Self::Error> {
        Ok(next_input)
    }
}
