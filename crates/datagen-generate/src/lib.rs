//! Deterministic record generation for datagen.
//!
//! A [`DatasetSpec`](datagen_spec::DatasetSpec) is split into independent
//! splits; each split seeds its own random source from `seed + offset` and
//! drives its field generators in field order. Splits run in parallel with
//! `rayon` or are replayed continuously by the [`StreamRunner`].

pub mod catalog;
pub mod context;
pub mod engine;
pub mod errors;
pub mod faker_rs;
pub mod generators;
pub mod model;
pub mod output;
pub mod producer;
pub mod stream;

pub use catalog::{ConfiguredFactory, GeneratorCatalog, GeneratorConfig, GeneratorFactory};
pub use context::GenerationContext;
pub use engine::{GenerationEngine, GenerationResult, split_file_name};
pub use errors::GenerationError;
pub use generators::FieldGenerator;
pub use model::{GenerateOptions, GenerationReport, SplitReport};
pub use output::OutputFormat;
pub use producer::{ProducerState, SplitProducer, produce_split};
pub use stream::{StreamHandle, StreamOptions, StreamRunner, StreamSummary};
