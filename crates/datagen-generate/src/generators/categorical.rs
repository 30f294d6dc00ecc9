use datagen_core::Value;
use rand::Rng;
use serde::Deserialize;

use crate::context::GenerationContext;
use crate::errors::GenerationError;
use crate::faker_rs::RichData;
use crate::generators::{FieldGenerator, boxed};

/// Arguments for generators driven by a `type` selector.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct VariantConfig {
    #[serde(rename = "type")]
    pub variant: Option<String>,
}

/// Generators that take no arguments.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct NoConfig {}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ChoiceConfig {
    pub choices: Vec<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NameKind {
    First,
    Last,
    Username,
    Full,
}

impl NameKind {
    fn parse(value: &str) -> Option<Self> {
        match value.to_ascii_lowercase().as_str() {
            "first" => Some(Self::First),
            "last" => Some(Self::Last),
            "username" => Some(Self::Username),
            "full" => Some(Self::Full),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AddressKind {
    Street,
    City,
    Zip,
    Full,
    Country,
    State,
    Latitude,
    Longitude,
}

impl AddressKind {
    fn parse(value: &str) -> Option<Self> {
        match value.to_ascii_lowercase().as_str() {
            "street" => Some(Self::Street),
            "city" => Some(Self::City),
            "zip" => Some(Self::Zip),
            "full" => Some(Self::Full),
            "country" => Some(Self::Country),
            "state" => Some(Self::State),
            "latitude" => Some(Self::Latitude),
            "longitude" => Some(Self::Longitude),
            _ => None,
        }
    }
}

/// Rich-data values without a selector.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RichKind {
    Email,
    PhoneNumber,
    Profession,
    CreditCard,
}

pub struct NameGenerator {
    kind: NameKind,
}

impl FieldGenerator for NameGenerator {
    fn generate(&mut self, ctx: &mut GenerationContext) -> Result<Value, GenerationError> {
        let mut rich = ctx.rich();
        let value = match self.kind {
            NameKind::First => rich.first_name(),
            NameKind::Last => rich.last_name(),
            NameKind::Username => rich.username(),
            NameKind::Full => rich.full_name(),
        };
        Ok(Value::String(value))
    }
}

pub struct AddressGenerator {
    kind: AddressKind,
}

impl FieldGenerator for AddressGenerator {
    fn generate(&mut self, ctx: &mut GenerationContext) -> Result<Value, GenerationError> {
        let mut rich = ctx.rich();
        let value = match self.kind {
            AddressKind::Street => rich.street_address(),
            AddressKind::City => rich.city(),
            AddressKind::Zip => rich.zip_code(),
            AddressKind::Full => rich.full_address(),
            AddressKind::Country => rich.country(),
            AddressKind::State => rich.state(),
            AddressKind::Latitude => rich.latitude(),
            AddressKind::Longitude => rich.longitude(),
        };
        Ok(Value::String(value))
    }
}

pub struct RichGenerator {
    kind: RichKind,
}

impl RichGenerator {
    fn draw(&self, rich: &mut RichData<'_>) -> String {
        match self.kind {
            RichKind::Email => rich.email(),
            RichKind::PhoneNumber => rich.phone_number(),
            RichKind::Profession => rich.profession(),
            RichKind::CreditCard => rich.credit_card(),
        }
    }
}

impl FieldGenerator for RichGenerator {
    fn generate(&mut self, ctx: &mut GenerationContext) -> Result<Value, GenerationError> {
        Ok(Value::String(self.draw(&mut ctx.rich())))
    }
}

/// Uniform pick from a fixed list of strings.
pub struct ChoiceGenerator {
    choices: Vec<String>,
}

impl FieldGenerator for ChoiceGenerator {
    fn generate(&mut self, ctx: &mut GenerationContext) -> Result<Value, GenerationError> {
        let index = ctx.random().random_range(0..self.choices.len());
        Ok(Value::String(self.choices[index].clone()))
    }
}

pub fn name(config: VariantConfig) -> Result<Box<dyn FieldGenerator>, GenerationError> {
    let kind = match config.variant.as_deref() {
        None => NameKind::Full,
        Some(variant) => NameKind::parse(variant)
            .ok_or_else(|| GenerationError::unsupported_variant("name", variant))?,
    };
    boxed(NameGenerator { kind })
}

pub fn address(config: VariantConfig) -> Result<Box<dyn FieldGenerator>, GenerationError> {
    let kind = match config.variant.as_deref() {
        None => AddressKind::Full,
        Some(variant) => AddressKind::parse(variant)
            .ok_or_else(|| GenerationError::unsupported_variant("address", variant))?,
    };
    boxed(AddressGenerator { kind })
}

pub fn email(_: NoConfig) -> Result<Box<dyn FieldGenerator>, GenerationError> {
    boxed(RichGenerator {
        kind: RichKind::Email,
    })
}

pub fn phone_number(_: NoConfig) -> Result<Box<dyn FieldGenerator>, GenerationError> {
    boxed(RichGenerator {
        kind: RichKind::PhoneNumber,
    })
}

pub fn profession(_: NoConfig) -> Result<Box<dyn FieldGenerator>, GenerationError> {
    boxed(RichGenerator {
        kind: RichKind::Profession,
    })
}

pub fn credit_card(_: NoConfig) -> Result<Box<dyn FieldGenerator>, GenerationError> {
    boxed(RichGenerator {
        kind: RichKind::CreditCard,
    })
}

pub fn random_chosen_string(
    config: ChoiceConfig,
) -> Result<Box<dyn FieldGenerator>, GenerationError> {
    if config.choices.is_empty() {
        return Err(GenerationError::invalid_config(
            "random_chosen_string",
            "choices must not be empty",
        ));
    }
    boxed(ChoiceGenerator {
        choices: config.choices,
    })
}

#[cfg(test)]
mod tests {
    use datagen_spec::Locale;

    use super::*;

    #[test]
    fn unknown_selector_is_unsupported_variant() {
        let err = address(VariantConfig {
            variant: Some("planet".to_string()),
        })
        .err()
        .unwrap();
        assert!(matches!(
            err,
            GenerationError::UnsupportedVariant { ref generator, ref variant }
                if generator == "address" && variant == "planet"
        ));
    }

    #[test]
    fn choices_are_picked_from_the_list() {
        let mut generator = random_chosen_string(ChoiceConfig {
            choices: vec!["a".into(), "b".into()],
        })
        .unwrap();
        let mut ctx = GenerationContext::new(Some(4), 0, Locale::EnUs).unwrap();
        for _ in 0..100 {
            let value = generator.generate(&mut ctx).unwrap();
            assert!(matches!(value.as_str(), Some("a" | "b")));
        }
        assert!(random_chosen_string(ChoiceConfig::default()).is_err());
    }

    #[test]
    fn latitude_is_a_coordinate() {
        let mut generator = address(VariantConfig {
            variant: Some("LATITUDE".to_string()),
        })
        .unwrap();
        let mut ctx = GenerationContext::new(Some(4), 0, Locale::PtBr).unwrap();
        let value = generator.generate(&mut ctx).unwrap();
        let latitude: f64 = value.as_str().unwrap().parse().unwrap();
        assert!((-90.0..=90.0).contains(&latitude));
    }
}
