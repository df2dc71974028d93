use std::fmt;

// Errors raised while configuring or generating the point sphere.
// GPU and window failures stay on the `anyhow` / `eframe::Error` paths.
#[derive(Debug, Clone, PartialEq)]
pub enum SphereError {
    // Point count below two, non-finite spread, unparsable override, ...
    InvalidArgument(String),
    // Scale that would collapse the sphere to the origin or flip it inside out
    NumericDegenerate(String),
}

impl fmt::Display for SphereError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SphereError::InvalidArgument(msg) => write!(f, "invalid argument: {}", msg),
            SphereError::NumericDegenerate(msg) => write!(f, "degenerate value: {}", msg),
        }
    }
}

impl std::error::Error for SphereError {}

pub type Result<T> = std::result::Result<T, SphereError>;
