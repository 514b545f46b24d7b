//! Peak-shape functions for spectrum simulation.
//!
//! A profile is a callable `(theta2, peak_center, extra_args) -> value`
//! registered together with its declared parameter counts. Validation
//! happens once at registration; simulation then calls the profile blindly.

use crate::domain::{XrdError, XrdResult};
use std::sync::Arc;

pub const DEFAULT_GAUSSIAN_WIDTH: f64 = 0.1;

type ProfileFn = dyn Fn(f64, f64, &[f64]) -> f64 + Send + Sync;

/// Declared shape of a custom peak function: how many positional parameters
/// it takes in total (including the axis value and the peak center) and how
/// many of the trailing ones carry defaults.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PeakFunctionSpec {
    pub positional_params: usize,
    pub defaulted_params: usize,
}

impl PeakFunctionSpec {
    pub const fn new(positional_params: usize, defaulted_params: usize) -> Self {
        Self {
            positional_params,
            defaulted_params,
        }
    }
}

/// A validated peak-shape function paired with its extra arguments.
#[derive(Clone)]
pub struct PeakProfile {
    func: Arc<ProfileFn>,
    args: Vec<f64>,
}

impl PeakProfile {
    /// The default profile: `exp(-((x - x0) / w)^2)`. When a wider argument
    /// list is supplied only the first value is used as the width.
    pub fn gaussian(args: Option<&[f64]>) -> Self {
        let width = args
            .and_then(|args| args.first().copied())
            .unwrap_or(DEFAULT_GAUSSIAN_WIDTH);
        Self {
            func: Arc::new(gauss_peak),
            args: vec![width],
        }
    }

    /// Registers a custom profile, validating the declared arity against the
    /// supplied arguments:
    /// - the function must declare at least the two mandatory positional
    ///   parameters (axis value, peak center);
    /// - every required extra parameter (those without a default) must be
    ///   covered by a supplied argument.
    pub fn custom(
        func: impl Fn(f64, f64, &[f64]) -> f64 + Send + Sync + 'static,
        spec: PeakFunctionSpec,
        args: Vec<f64>,
    ) -> XrdResult<Self> {
        if spec.positional_params < 2 {
            return Err(XrdError::PeakFunctionArity {
                declared: spec.positional_params,
            });
        }

        let required = spec
            .positional_params
            .saturating_sub(2 + spec.defaulted_params);
        if required > args.len() {
            return Err(XrdError::PeakFunctionArgs {
                required,
                supplied: args.len(),
            });
        }

        Ok(Self {
            func: Arc::new(func),
            args,
        })
    }

    /// Profile value at axis point `x` for a peak centered at `x0`.
    pub fn evaluate(&self, x: f64, x0: f64) -> f64 {
        (self.func)(x, x0, &self.args)
    }

    pub fn args(&self) -> &[f64] {
        &self.args
    }
}

impl Default for PeakProfile {
    fn default() -> Self {
        Self::gaussian(None)
    }
}

impl std::fmt::Debug for PeakProfile {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PeakProfile")
            .field("args", &self.args)
            .finish_non_exhaustive()
    }
}

fn gauss_peak(x: f64, x0: f64, args: &[f64]) -> f64 {
    let width = args.first().copied().unwrap_or(DEFAULT_GAUSSIAN_WIDTH);
    (-((x - x0) / width).powi(2)).exp()
}

#[cfg(test)]
mod tests {
    use super::{DEFAULT_GAUSSIAN_WIDTH, PeakFunctionSpec, PeakProfile};
    use crate::domain::XrdError;

    #[test]
    fn default_gaussian_peaks_at_the_center() {
        let profile = PeakProfile::default();
        assert_eq!(profile.args(), &[DEFAULT_GAUSSIAN_WIDTH]);
        assert!((profile.evaluate(20.0, 20.0) - 1.0).abs() < 1.0e-12);
        assert!(profile.evaluate(20.0, 20.0) > profile.evaluate(20.1, 20.0));
    }

    #[test]
    fn gaussian_uses_only_the_first_supplied_width() {
        let profile = PeakProfile::gaussian(Some(&[0.5, 99.0, -3.0]));
        assert_eq!(profile.args(), &[0.5]);

        let expected = (-((0.25f64) / 0.5).powi(2)).exp();
        assert!((profile.evaluate(20.25, 20.0) - expected).abs() < 1.0e-12);
    }

    #[test]
    fn single_parameter_functions_are_rejected() {
        let error = PeakProfile::custom(|x, _, _| x, PeakFunctionSpec::new(1, 0), Vec::new())
            .expect_err("one positional parameter is not a peak function");
        assert_eq!(error, XrdError::PeakFunctionArity { declared: 1 });
    }

    #[test]
    fn missing_required_extra_arguments_are_rejected() {
        // f(x, x0, a, b, c=...) requires two supplied extras; one is given.
        let error = PeakProfile::custom(
            |x, x0, args| x * x0 * args.iter().product::<f64>(),
            PeakFunctionSpec::new(5, 1),
            vec![0.0],
        )
        .expect_err("one argument cannot cover two required extras");
        assert_eq!(
            error,
            XrdError::PeakFunctionArgs {
                required: 2,
                supplied: 1
            }
        );
    }

    #[test]
    fn defaults_count_against_required_extras() {
        // f(x, x0, a, b, c=...) with two supplied extras is acceptable.
        let profile = PeakProfile::custom(
            |x, x0, args| x + x0 + args.iter().sum::<f64>(),
            PeakFunctionSpec::new(5, 1),
            vec![0.0, 0.0],
        )
        .expect("two supplied extras cover the two required ones");
        assert_eq!(profile.args(), &[0.0, 0.0]);
        assert_eq!(profile.evaluate(1.0, 2.0), 3.0);
    }
}
