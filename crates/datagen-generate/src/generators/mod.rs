//! Field generators and the built-in catalog entries.

use datagen_core::{FieldType, Value};

use crate::catalog::{ConfiguredFactory, GeneratorCatalog};
use crate::context::GenerationContext;
use crate::errors::GenerationError;

pub mod categorical;
pub mod identity;
pub mod nullable;
pub mod numeric;
pub mod payload;
pub mod temporal;

pub use nullable::NullableGenerator;
pub use numeric::IntWidth;

/// Produces one field's values for a single split.
///
/// Generators of a split share the context's random source, so they must be
/// initialized and invoked in field order.
pub trait FieldGenerator: Send {
    /// Called once per split before the first `generate`.
    fn initialize(&mut self, _ctx: &GenerationContext) -> Result<(), GenerationError> {
        Ok(())
    }

    fn generate(&mut self, ctx: &mut GenerationContext) -> Result<Value, GenerationError>;
}

pub(crate) fn boxed<G: FieldGenerator + 'static>(
    generator: G,
) -> Result<Box<dyn FieldGenerator>, GenerationError> {
    Ok(Box::new(generator))
}

/// Register every built-in tag.
pub fn register_builtin(catalog: &mut GeneratorCatalog) {
    use FieldType::{Bytes, Double, Int, Long, String as Text, TimestampMicros};

    catalog.register(ConfiguredFactory::new("sequential_int", Int, numeric::sequential_int));
    catalog.register(ConfiguredFactory::new("sequential_long", Long, numeric::sequential_long));
    catalog.register(ConfiguredFactory::new(
        "sequential_int_skewed",
        Int,
        numeric::sequential_int_skewed,
    ));
    catalog.register(ConfiguredFactory::new(
        "sequential_long_skewed",
        Long,
        numeric::sequential_long_skewed,
    ));
    catalog.register(ConfiguredFactory::new("random_int", Int, numeric::random_int));
    catalog.register(ConfiguredFactory::new("random_long", Long, numeric::random_long));
    catalog.register(ConfiguredFactory::new(
        "random_int_skewed",
        Int,
        numeric::random_int_skewed,
    ));
    catalog.register(ConfiguredFactory::new(
        "random_long_skewed",
        Long,
        numeric::random_long_skewed,
    ));
    catalog.register(ConfiguredFactory::new("gaussian", Double, numeric::gaussian));

    catalog.register(ConfiguredFactory::new("name", Text, categorical::name));
    catalog.register(ConfiguredFactory::new("address", Text, categorical::address));
    catalog.register(ConfiguredFactory::new("email", Text, categorical::email));
    catalog.register(ConfiguredFactory::new("phone_number", Text, categorical::phone_number));
    catalog.register(ConfiguredFactory::new("profession", Text, categorical::profession));
    catalog.register(ConfiguredFactory::new("credit_card", Text, categorical::credit_card));
    catalog.register(ConfiguredFactory::new(
        "random_chosen_string",
        Text,
        categorical::random_chosen_string,
    ));

    catalog.register(ConfiguredFactory::new("uuid", Text, identity::uuid));
    catalog.register(ConfiguredFactory::new("timestamp", TimestampMicros, temporal::timestamp));

    catalog.register(ConfiguredFactory::new("random_bytes", Bytes, payload::random_bytes));
    catalog.register(ConfiguredFactory::new(
        "semi_random_string",
        Text,
        payload::semi_random_string,
    ));
    catalog.register(ConfiguredFactory::new("lorem", Text, payload::lorem));
}
