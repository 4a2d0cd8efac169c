/// Tolerance settings for the numeric solves (root finding) in the engine.
#[derive(Debug, Clone, Copy, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Tolerance {
    /// Parameter tolerance, relative to the width of the searched interval
    pub parameter: f64,
    /// Maximum number of function evaluations per root find
    pub max_iterations: usize,
}

impl Tolerance {
    pub const DEFAULT_PARAMETER: f64 = 1e-12;
    pub const DEFAULT_MAX_ITERATIONS: usize = 100;

    pub fn new(parameter: f64, max_iterations: usize) -> Self {
        Self {
            parameter,
            max_iterations,
        }
    }

    pub fn default_precision() -> Self {
        Self {
            parameter: Self::DEFAULT_PARAMETER,
            max_iterations: Self::DEFAULT_MAX_ITERATIONS,
        }
    }

    pub fn loose() -> Self {
        Self {
            parameter: 1e-6,
            max_iterations: 50,
        }
    }

    pub fn tight() -> Self {
        Self {
            parameter: 1e-15,
            max_iterations: 200,
        }
    }

    /// Absolute tolerance for an interval of the given width
    pub fn absolute(self, width: f64) -> f64 {
        self.parameter * width.abs()
    }
}

impl Default for Tolerance {
    fn default() -> Self {
        Self::default_precision()
    }
}
