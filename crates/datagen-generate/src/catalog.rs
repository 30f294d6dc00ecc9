use std::collections::BTreeMap;
use std::fmt;
use std::marker::PhantomData;

use datagen_core::FieldType;
use datagen_spec::ValueTypeResolver;
use serde::de::DeserializeOwned;
use serde_json::Value as JsonValue;

use crate::errors::GenerationError;
use crate::generators::{self, FieldGenerator};

/// A catalog entry: builds generators for one tag.
pub trait GeneratorFactory: Send + Sync {
    fn tag(&self) -> &'static str;

    fn value_type(&self) -> FieldType;

    fn build(&self, args: Option<&JsonValue>) -> Result<Box<dyn FieldGenerator>, GenerationError>;
}

/// Typed generator arguments with documented defaults.
pub trait GeneratorConfig: DeserializeOwned + Default {}

impl<T: DeserializeOwned + Default> GeneratorConfig for T {}

type BuildFn<C> = fn(C) -> Result<Box<dyn FieldGenerator>, GenerationError>;

/// Factory that deserializes `C` from the raw arguments before building.
pub struct ConfiguredFactory<C> {
    tag: &'static str,
    value_type: FieldType,
    build: BuildFn<C>,
    _config: PhantomData<fn() -> C>,
}

impl<C: GeneratorConfig> ConfiguredFactory<C> {
    pub fn new(tag: &'static str, value_type: FieldType, build: BuildFn<C>) -> Self {
        Self {
            tag,
            value_type,
            build,
            _config: PhantomData,
        }
    }

    fn parse(&self, args: Option<&JsonValue>) -> Result<C, GenerationError> {
        match args {
            None | Some(JsonValue::Null) => Ok(C::default()),
            Some(JsonValue::Object(map)) if map.is_empty() => Ok(C::default()),
            Some(raw) => serde_json::from_value(raw.clone())
                .map_err(|err| GenerationError::invalid_config(self.tag, err.to_string())),
        }
    }
}

impl<C: GeneratorConfig> GeneratorFactory for ConfiguredFactory<C> {
    fn tag(&self) -> &'static str {
        self.tag
    }

    fn value_type(&self) -> FieldType {
        self.value_type
    }

    fn build(&self, args: Option<&JsonValue>) -> Result<Box<dyn FieldGenerator>, GenerationError> {
        let config = self.parse(args)?;
        (self.build)(config)
    }
}

/// Registry of generator factories keyed by lowercase tag.
pub struct GeneratorCatalog {
    factories: BTreeMap<&'static str, Box<dyn GeneratorFactory>>,
}

impl fmt::Debug for GeneratorCatalog {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GeneratorCatalog")
            .field("tags", &self.tags())
            .finish()
    }
}

impl Default for GeneratorCatalog {
    fn default() -> Self {
        Self::new()
    }
}

impl GeneratorCatalog {
    /// Catalog with every built-in generator registered.
    pub fn new() -> Self {
        let mut catalog = Self::empty();
        generators::register_builtin(&mut catalog);
        catalog
    }

    pub fn empty() -> Self {
        Self {
            factories: BTreeMap::new(),
        }
    }

    /// Register a factory, replacing any previous entry with the same tag.
    pub fn register(&mut self, factory: impl GeneratorFactory + 'static) {
        self.factories.insert(factory.tag(), Box::new(factory));
    }

    /// Registered tags in sorted order.
    pub fn tags(&self) -> Vec<&'static str> {
        self.factories.keys().copied().collect()
    }

    pub fn resolve(&self, tag: &str) -> Result<&dyn GeneratorFactory, GenerationError> {
        let key = tag.to_ascii_lowercase();
        self.factories
            .get(key.as_str())
            .map(|factory| factory.as_ref())
            .ok_or_else(|| GenerationError::UnknownGeneratorType(tag.to_string()))
    }

    pub fn construct(
        &self,
        tag: &str,
        args: Option<&JsonValue>,
    ) -> Result<Box<dyn FieldGenerator>, GenerationError> {
        self.resolve(tag)?.build(args)
    }
}

impl ValueTypeResolver for GeneratorCatalog {
    fn value_type(&self, tag: &str) -> Option<FieldType> {
        self.resolve(tag).ok().map(|factory| factory.value_type())
    }
}
