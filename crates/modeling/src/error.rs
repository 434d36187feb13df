use kernel::ShapeType;

/// Errors returned by [`crate::ShapeFactory`] operations and [`crate::converters`].
///
/// Validation errors are detected before the kernel is called, kernel errors are reported by the
/// kernel itself. Neither is retried: the same input always fails the same way.
#[derive(thiserror::Error, Debug, Clone, PartialEq)]
pub enum ModelingError {
    #[error("the start and end points are too close")]
    PointsTooClose,
    #[error("the {0} length is zero")]
    ZeroVector(&'static str),
    #[error("the radius is too small")]
    RadiusTooSmall,
    #[error("the angle is too small")]
    AngleTooSmall,
    #[error("the thickness is too small")]
    ThicknessTooSmall,
    #[error("the {name} size is too small: {value}")]
    SizeTooSmall { name: &'static str, value: f64 },
    #[error("at least {min} points are required, got {found}")]
    NotEnoughPoints { min: usize, found: usize },
    #[error("expected {expected} weights, got {found}")]
    WeightCountMismatch { expected: usize, found: usize },
    #[error("weights must be positive, got {0}")]
    InvalidWeight(f64),
    #[error("the {0} is not finite")]
    NotFinite(&'static str),
    #[error("the plane frame is degenerate")]
    InvalidPlane,
    #[error("no {0} given")]
    EmptyInput(&'static str),
    #[error("kernel error: {0}")]
    Kernel(String),
    #[error("expected a {expected}, the kernel returned a {found}")]
    UnexpectedShapeType {
        expected: ShapeType,
        found: ShapeType,
    },
    #[error("cannot parse {input:?}: {reason}")]
    Parse { input: String, reason: String },
}

impl ModelingError {
    /// Returns `true` for errors detected before calling the kernel.
    #[must_use]
    pub const fn is_validation(&self) -> bool {
        !matches!(
            self,
            Self::Kernel(_) | Self::UnexpectedShapeType { .. } | Self::Parse { .. }
        )
    }

    pub(crate) fn parse(input: &str, reason: impl Into<String>) -> Self {
        Self::Parse {
            input: input.to_string(),
            reason: reason.into(),
        }
    }
}

pub type Result<T, E = ModelingError> = std::result::Result<T, E>;
