use datagen_spec::SpecError;
use thiserror::Error;

/// Errors emitted by the generation engine.
#[derive(Debug, Error)]
pub enum GenerationError {
    #[error("unknown generator type '{0}'")]
    UnknownGeneratorType(String),
    #[error("invalid config for generator '{tag}': {message}")]
    InvalidGeneratorConfig { tag: String, message: String },
    #[error("generator '{generator}' does not support variant '{variant}'")]
    UnsupportedVariant { generator: String, variant: String },
    #[error("cannot build generator for field '{field}': {source}")]
    GeneratorConstruction {
        field: String,
        #[source]
        source: Box<GenerationError>,
    },
    #[error("invalid specification: {0}")]
    InvalidSpec(String),
    #[error("arithmetic overflow: {0}")]
    Overflow(String),
    #[error("stream task failed: {0}")]
    StreamTask(String),
    #[error(transparent)]
    Spec(#[from] SpecError),
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("csv error: {0}")]
    Csv(#[from] csv::Error),
}

impl GenerationError {
    pub(crate) fn invalid_config(tag: &str, message: impl Into<String>) -> Self {
        Self::InvalidGeneratorConfig {
            tag: tag.to_string(),
            message: message.into(),
        }
    }

    pub(crate) fn unsupported_variant(generator: &str, variant: &str) -> Self {
        Self::UnsupportedVariant {
            generator: generator.to_string(),
            variant: variant.to_string(),
        }
    }
}
