use datagen_core::Value;
use rand::RngCore;
use serde::Deserialize;

use crate::context::GenerationContext;
use crate::errors::GenerationError;
use crate::faker_rs::{PHRASE_PALETTE, RichData};
use crate::generators::{FieldGenerator, boxed};

const DEFAULT_PAYLOAD_SIZE: usize = 100;

#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SizeConfig {
    pub size: usize,
}

impl Default for SizeConfig {
    fn default() -> Self {
        Self {
            size: DEFAULT_PAYLOAD_SIZE,
        }
    }
}

/// `size` raw bytes from the random source.
pub struct RandomBytesGenerator {
    size: usize,
}

impl FieldGenerator for RandomBytesGenerator {
    fn generate(&mut self, ctx: &mut GenerationContext) -> Result<Value, GenerationError> {
        let mut bytes = vec![0_u8; self.size];
        ctx.random().fill_bytes(&mut bytes);
        Ok(Value::Bytes(bytes))
    }
}

/// Compressible text: phrases cycled from the palette start on every call,
/// space separated, cut to exactly `size` characters.
pub struct SemiRandomStringGenerator {
    size: usize,
}

impl FieldGenerator for SemiRandomStringGenerator {
    fn generate(&mut self, ctx: &mut GenerationContext) -> Result<Value, GenerationError> {
        let mut rich = ctx.rich();
        let mut palette = PHRASE_PALETTE.iter().cycle();
        let text = fill_to_size(self.size, || {
            // `cycle` over a non-empty array never ends.
            palette
                .next()
                .map(|source| rich.phrase(*source))
                .unwrap_or_default()
        });
        Ok(Value::String(text))
    }
}

/// Lorem sentences cut to exactly `size` characters.
pub struct LoremGenerator {
    size: usize,
}

impl FieldGenerator for LoremGenerator {
    fn generate(&mut self, ctx: &mut GenerationContext) -> Result<Value, GenerationError> {
        let mut rich: RichData<'_> = ctx.rich();
        Ok(Value::String(fill_to_size(self.size, || rich.sentence())))
    }
}

fn fill_to_size(size: usize, mut next: impl FnMut() -> String) -> String {
    let mut text = String::with_capacity(size + 32);
    let mut chars = 0;
    while chars < size {
        let phrase = next();
        chars += phrase.chars().count() + 1;
        text.push_str(&phrase);
        text.push(' ');
    }
    truncate_chars(&mut text, size);
    text
}

fn truncate_chars(text: &mut String, size: usize) {
    if let Some((byte_index, _)) = text.char_indices().nth(size) {
        text.truncate(byte_index);
    }
}

pub fn random_bytes(config: SizeConfig) -> Result<Box<dyn FieldGenerator>, GenerationError> {
    boxed(RandomBytesGenerator { size: config.size })
}

pub fn semi_random_string(config: SizeConfig) -> Result<Box<dyn FieldGenerator>, GenerationError> {
    boxed(SemiRandomStringGenerator { size: config.size })
}

pub fn lorem(config: SizeConfig) -> Result<Box<dyn FieldGenerator>, GenerationError> {
    boxed(LoremGenerator { size: config.size })
}
