use std::sync::Arc;

use datagen_core::{Record, RecordSchema};
use datagen_spec::SplitDescriptor;
use tracing::debug;

use crate::catalog::GeneratorCatalog;
use crate::context::GenerationContext;
use crate::errors::GenerationError;
use crate::generators::{FieldGenerator, NullableGenerator};

/// Lifecycle of a split producer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProducerState {
    /// Generators built and initialized; nothing emitted yet.
    Initialized,
    Producing,
    /// All records emitted, or production stopped on an error.
    Exhausted,
}

/// Produces the records of exactly one split.
pub struct SplitProducer {
    descriptor: SplitDescriptor,
    schema: Arc<RecordSchema>,
    context: GenerationContext,
    generators: Vec<Box<dyn FieldGenerator>>,
    emitted: u64,
    total: u64,
    state: ProducerState,
}

impl SplitProducer {
    /// Build the split's context and every field generator, in field order.
    pub fn new(
        catalog: &GeneratorCatalog,
        descriptor: SplitDescriptor,
    ) -> Result<Self, GenerationError> {
        let spec = Arc::clone(&descriptor.spec);
        let schema = spec.schema(catalog)?;
        let offset = descriptor.offset()?;
        let context = GenerationContext::new(spec.seed(), offset, spec.locale()?)?;

        let mut generators = Vec::with_capacity(spec.fields().len());
        for field in spec.fields() {
            let construction = |source: GenerationError| GenerationError::GeneratorConstruction {
                field: field.name.clone(),
                source: Box::new(source),
            };

            let base = catalog
                .construct(&field.generator, field.args.as_ref())
                .map_err(construction)?;
            let mut generator: Box<dyn FieldGenerator> = if field.is_nullable() {
                Box::new(NullableGenerator::new(field.null_chance, base))
            } else {
                base
            };
            generator.initialize(&context).map_err(construction)?;
            generators.push(generator);
        }

        debug!(
            split = descriptor.split_index,
            offset,
            fields = generators.len(),
            "split producer initialized"
        );

        Ok(Self {
            total: spec.records_per_split(),
            descriptor,
            schema,
            context,
            generators,
            emitted: 0,
            state: ProducerState::Initialized,
        })
    }

    pub fn descriptor(&self) -> &SplitDescriptor {
        &self.descriptor
    }

    pub fn schema(&self) -> &Arc<RecordSchema> {
        &self.schema
    }

    pub fn state(&self) -> ProducerState {
        self.state
    }

    pub fn records_emitted(&self) -> u64 {
        self.emitted
    }

    /// Fraction of the split emitted so far, in `[0, 1]`.
    pub fn progress(&self) -> f64 {
        if self.total == 0 {
            1.0
        } else {
            self.emitted as f64 / self.total as f64
        }
    }

    /// Assemble the next record, or `None` once the split is exhausted.
    pub fn next_record(&mut self) -> Result<Option<Record>, GenerationError> {
        if self.state == ProducerState::Exhausted || self.emitted >= self.total {
            self.state = ProducerState::Exhausted;
            return Ok(None);
        }
        self.state = ProducerState::Producing;

        let mut values = Vec::with_capacity(self.generators.len());
        for generator in &mut self.generators {
            match generator.generate(&mut self.context) {
                Ok(value) => values.push(value),
                Err(err) => {
                    self.state = ProducerState::Exhausted;
                    return Err(err);
                }
            }
        }

        self.emitted += 1;
        if self.emitted == self.total {
            self.state = ProducerState::Exhausted;
        }
        Ok(Some(Record::new(Arc::clone(&self.schema), values)))
    }
}

impl Iterator for SplitProducer {
    type Item = Result<Record, GenerationError>;

    fn next(&mut self) -> Option<Self::Item> {
        self.next_record().transpose()
    }
}

/// Produce a whole split in memory.
pub fn produce_split(
    catalog: &GeneratorCatalog,
    descriptor: SplitDescriptor,
) -> Result<Vec<Record>, GenerationError> {
    SplitProducer::new(catalog, descriptor)?.collect()
}
