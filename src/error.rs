pub type SpiroResult<T> = Result<T, SpiroError>;

#[derive(thiserror::Error, Debug)]
pub enum SpiroError {
    #[error("invalid teeth count: {0}")]
    InvalidTeethCount(String),

    #[error("invalid pen offset: {0}")]
    InvalidPenOffset(String),

    #[error("config shape mismatch: {0}")]
    ConfigShapeMismatch(String),

    #[error("invalid easing kind: {0}")]
    InvalidEasingKind(String),

    #[error("invalid step count: {0}")]
    InvalidStepCount(String),

    #[error("validation error: {0}")]
    Validation(String),

    #[error("serialization error: {0}")]
    Serde(String),

    #[error("not found: {0}")]
    NotFound(String),

    #[error("io error: {0}")]
    Io(String),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl SpiroError {
    pub fn invalid_teeth(msg: impl Into<String>) -> Self {
        Self::InvalidTeethCount(msg.into())
    }

    pub fn invalid_pen_offset(msg: impl Into<String>) -> Self {
        Self::InvalidPenOffset(msg.into())
    }

    pub fn shape_mismatch(msg: impl Into<String>) -> Self {
        Self::ConfigShapeMismatch(msg.into())
    }

    pub fn invalid_easing(msg: impl Into<String>) -> Self {
        Self::InvalidEasingKind(msg.into())
    }

    pub fn invalid_steps(msg: impl Into<String>) -> Self {
        Self::InvalidStepCount(msg.into())
    }

    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    pub fn serde(msg: impl Into<String>) -> Self {
        Self::Serde(msg.into())
    }

    pub fn not_found(msg: impl Into<String>) -> Self {
        Self::NotFound(msg.into())
    }

    pub fn io(msg: impl Into<String>) -> Self {
        Self::Io(msg.into())
    }

    /// Stable machine-readable code for the presentation layer.
    pub fn code(&self) -> &'static str {
        match self {
            Self::InvalidTeethCount(_) => "invalid_teeth_count",
            Self::InvalidPenOffset(_) => "invalid_pen_offset",
            Self::ConfigShapeMismatch(_) => "config_shape_mismatch",
            Self::InvalidEasingKind(_) => "invalid_easing_kind",
            Self::InvalidStepCount(_) => "invalid_step_count",
            Self::Validation(_) => "validation",
            Self::Serde(_) => "serialization",
            Self::NotFound(_) => "not_found",
            Self::Io(_) => "io",
            Self::Other(_) => "internal",
        }
    }

    /// True when the failure stems from the caller's input rather than the environment.
    pub fn is_client_error(&self) -> bool {
        !matches!(self, Self::Io(_) | Self::Other(_))
    }

    pub fn report(&self) -> ErrorReport {
        ErrorReport {
            code: self.code().to_string(),
            message: self.to_string(),
        }
    }
}

impl From<serde_json::Error> for SpiroError {
    fn from(err: serde_json::Error) -> Self {
        Self::Serde(err.to_string())
    }
}

/// Serializable error payload, shaped like the `{"error": ...}` bodies of the draw API.
#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct ErrorReport {
    pub code: String,
    #[serde(rename = "error")]
    pub message: String,
}
