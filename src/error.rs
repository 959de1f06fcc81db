pub type DriftResult<T> = Result<T, DriftError>;

#[derive(thiserror::Error, Debug)]
pub enum DriftError {
    #[error("invalid reference rectangle: {0}")]
    InvalidReferenceRect(String),

    #[error("depth data missing: {0}")]
    MissingDepthData(String),

    #[error("asset load failure: {0}")]
    AssetLoad(String),

    #[error("validation error: {0}")]
    Validation(String),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl DriftError {
    pub fn invalid_rect(msg: impl Into<String>) -> Self {
        Self::InvalidReferenceRect(msg.into())
    }

    pub fn missing_depth(msg: impl Into<String>) -> Self {
        Self::MissingDepthData(msg.into())
    }

    pub fn asset_load(msg: impl Into<String>) -> Self {
        Self::AssetLoad(msg.into())
    }

    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_prefixes_are_stable() {
        assert!(
            DriftError::invalid_rect("x")
                .to_string()
                .contains("invalid reference rectangle:")
        );
        assert!(
            DriftError::missing_depth("x")
                .to_string()
                .contains("depth data missing:")
        );
        assert!(
            DriftError::asset_load("x")
                .to_string()
                .contains("asset load failure:")
        );
        assert!(
            DriftError::validation("x")
                .to_string()
                .contains("validation error:")
        );
    }

    #[test]
    fn other_preserves_source() {
        let base = std::io::Error::other("boom");
        let err = DriftError::Other(anyhow::Error::new(base));
        assert!(err.to_string().contains("boom"));
    }
}
