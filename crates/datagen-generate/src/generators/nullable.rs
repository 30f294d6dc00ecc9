use datagen_core::Value;
use rand::Rng;

use crate::context::GenerationContext;
use crate::errors::GenerationError;
use crate::generators::FieldGenerator;

/// Wraps a generator so that `null_chance` percent of values are null.
///
/// The null draw always happens first and always consumes randomness; the
/// inner generator only runs when the draw does not select null.
pub struct NullableGenerator {
    null_chance: u8,
    inner: Box<dyn FieldGenerator>,
}

impl NullableGenerator {
    pub fn new(null_chance: u8, inner: Box<dyn FieldGenerator>) -> Self {
        Self { null_chance, inner }
    }
}

impl FieldGenerator for NullableGenerator {
    fn initialize(&mut self, ctx: &GenerationContext) -> Result<(), GenerationError> {
        self.inner.initialize(ctx)
    }

    fn generate(&mut self, ctx: &mut GenerationContext) -> Result<Value, GenerationError> {
        let draw: u8 = ctx.random().random_range(0..100);
        if draw < self.null_chance {
            Ok(Value::Null)
        } else {
            self.inner.generate(ctx)
        }
    }
}
