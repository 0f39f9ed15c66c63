use crate::error::GeError;
use serde::{Deserialize, Serialize};

/// The six built-in integrands. Each fixes its sampling interval and the
/// value `F(0)` the evolved antiderivative must match.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Problem {
    /// f(x) = 6x^2 on [0, 5], F(0) = 5
    Quadratic,
    /// f(x) = 2 / (x + 1)^2 on [0, 5], F(0) = -1
    InverseSquare,
    /// f(x) = (3x^2 - 2x + 1) / 4 on [-2, 2], F(0) = -0.25
    Polynomial,
    /// f(x) = (e^{2x} - e^{-6x}) / 3 on [0, 2], F(0) = 1/3
    ExpDifference,
    /// f(x) = ln(1 + x) + x / (1 + x) on [0, 5], F(0) = 0
    LogSum,
    /// f(x) = e^x (sin x + cos x) on [-2, 2], F(0) = 0
    ExpTrig,
}

impl Problem {
    pub const ALL: [Problem; 6] = [
        Problem::Quadratic,
        Problem::InverseSquare,
        Problem::Polynomial,
        Problem::ExpDifference,
        Problem::LogSum,
        Problem::ExpTrig,
    ];

    pub fn from_id(id: u8) -> Result<Self, GeError> {
        match id {
            1..=6 => Ok(Self::ALL[usize::from(id) - 1]),
            _ => Err(GeError::Configuration(format!(
                "Problem id must be between 1 and 6, got {}",
                id
            ))),
        }
    }

    pub fn id(self) -> u8 {
        self as u8 + 1
    }

    /// Value of the integrand at `x`.
    pub fn target(self, x: f64) -> f64 {
        match self {
            Problem::Quadratic => 6.0 * x.powi(2),
            Problem::InverseSquare => 2.0 / (x + 1.0).powi(2),
            Problem::Polynomial => (3.0 * x.powi(2) - 2.0 * x + 1.0) / 4.0,
            Problem::ExpDifference => ((2.0 * x).exp() - (-6.0 * x).exp()) / 3.0,
            Problem::LogSum => (1.0 + x).ln() + x / (1.0 + x),
            Problem::ExpTrig => x.exp() * (x.sin() + x.cos()),
        }
    }

    pub fn interval(self) -> (f64, f64) {
        match self {
            Problem::Quadratic | Problem::InverseSquare | Problem::LogSum => (0.0, 5.0),
            Problem::Polynomial | Problem::ExpTrig => (-2.0, 2.0),
            Problem::ExpDifference => (0.0, 2.0),
        }
    }

    /// Required value of the antiderivative at zero.
    pub fn integration_constant(self) -> f64 {
        match self {
            Problem::Quadratic => 5.0,
            Problem::InverseSquare => -1.0,
            Problem::Polynomial => -0.25,
            Problem::ExpDifference => 0.3333333,
            Problem::LogSum | Problem::ExpTrig => 0.0,
        }
    }
}
