pub type CoverResult<T> = Result<T, CoverError>;

/// Coarse failure category attached to every error a cover request can produce.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum FailureReason {
    /// Missing or unreadable source images, wrong poster count, bad request fields.
    Input,
    /// A rendering primitive (blur, rotate, rasterize) could not complete.
    Render,
    /// Font loading or text layout failed.
    Text,
    /// The final canvas could not be encoded.
    Encode,
    /// Malformed configuration data (title maps, history records, parameters).
    Validation,
    /// Anything that did not originate in this crate.
    Other,
}

impl std::fmt::Display for FailureReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Self::Input => "input",
            Self::Render => "render",
            Self::Text => "text",
            Self::Encode => "encode",
            Self::Validation => "validation",
            Self::Other => "other",
        };
        f.write_str(s)
    }
}

#[derive(thiserror::Error, Debug)]
pub enum CoverError {
    #[error("input error: {0}")]
    Input(String),

    #[error("render error: {0}")]
    Render(String),

    #[error("text error: {0}")]
    Text(String),

    #[error("encode error: {0}")]
    Encode(String),

    #[error("validation error: {0}")]
    Validation(String),

    #[error("stage `{stage}` failed: {source}")]
    Stage {
        stage: &'static str,
        source: Box<CoverError>,
    },

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl CoverError {
    pub fn input(msg: impl Into<String>) -> Self {
        Self::Input(msg.into())
    }

    pub fn render(msg: impl Into<String>) -> Self {
        Self::Render(msg.into())
    }

    pub fn text(msg: impl Into<String>) -> Self {
        Self::Text(msg.into())
    }

    pub fn encode(msg: impl Into<String>) -> Self {
        Self::Encode(msg.into())
    }

    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    /// Wraps `source` with the name of the composer stage it escaped from.
    ///
    /// Nested stage wrappers are flattened so the innermost stage name wins.
    pub fn stage(stage: &'static str, source: CoverError) -> Self {
        match source {
            already @ Self::Stage { .. } => already,
            other => Self::Stage {
                stage,
                source: Box::new(other),
            },
        }
    }

    pub fn reason(&self) -> FailureReason {
        match self {
            Self::Input(_) => FailureReason::Input,
            Self::Render(_) => FailureReason::Render,
            Self::Text(_) => FailureReason::Text,
            Self::Encode(_) => FailureReason::Encode,
            Self::Validation(_) => FailureReason::Validation,
            Self::Stage { source, .. } => source.reason(),
            Self::Other(_) => FailureReason::Other,
        }
    }

    /// Name of the composer stage the error escaped from, if any.
    pub fn stage_name(&self) -> Option<&'static str> {
        match self {
            Self::Stage { stage, .. } => Some(stage),
            _ => None,
        }
    }
}

impl From<image::ImageError> for CoverError {
    fn from(err: image::ImageError) -> Self {
        match err {
            image::ImageError::Encoding(e) => Self::encode(e.to_string()),
            image::ImageError::Decoding(e) => Self::input(format!("decode image: {e}")),
            image::ImageError::Unsupported(e) => Self::input(format!("unsupported image: {e}")),
            other => Self::Other(anyhow::Error::new(other)),
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/error.rs"]
mod tests;
