use datagen_core::{FieldType, Value};
use rand::Rng;
use rand_distr::StandardNormal;
use serde::Deserialize;

use crate::context::GenerationContext;
use crate::errors::GenerationError;
use crate::generators::{FieldGenerator, boxed};

const DEFAULT_SKEW_MIN: i64 = 0;
const DEFAULT_SKEW_MAX: i64 = 10;
const DEFAULT_SKEW_CHANCE: u8 = 10;
const DEFAULT_GAUSSIAN_STDDEV: f64 = 100.0;

/// Integer width of a numeric generator's output.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IntWidth {
    Int,
    Long,
}

impl IntWidth {
    pub fn field_type(self) -> FieldType {
        match self {
            Self::Int => FieldType::Int,
            Self::Long => FieldType::Long,
        }
    }

    pub fn min(self) -> i64 {
        match self {
            Self::Int => i64::from(i32::MIN),
            Self::Long => i64::MIN,
        }
    }

    pub fn max(self) -> i64 {
        match self {
            Self::Int => i64::from(i32::MAX),
            Self::Long => i64::MAX,
        }
    }

    fn fits(self, value: i64) -> bool {
        (self.min()..=self.max()).contains(&value)
    }

    fn check(self, tag: &str, name: &str, value: i64) -> Result<i64, GenerationError> {
        if self.fits(value) {
            Ok(value)
        } else {
            Err(GenerationError::invalid_config(
                tag,
                format!("{name} {value} does not fit {}", self.field_type()),
            ))
        }
    }

    fn value(self, tag: &str, value: i64) -> Result<Value, GenerationError> {
        match self {
            Self::Long => Ok(Value::Long(value)),
            Self::Int => i32::try_from(value).map(Value::Int).map_err(|_| {
                GenerationError::Overflow(format!("{tag}: value {value} exceeds int range"))
            }),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SequentialConfig {
    pub start: i64,
    pub step: i64,
}

impl Default for SequentialConfig {
    fn default() -> Self {
        Self { start: 0, step: 1 }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields, rename_all = "camelCase")]
pub struct SequentialSkewedConfig {
    pub start: i64,
    pub step: i64,
    pub skew_min: i64,
    pub skew_max: i64,
    pub skew_chance: u8,
}

impl Default for SequentialSkewedConfig {
    fn default() -> Self {
        Self {
            start: 0,
            step: 1,
            skew_min: DEFAULT_SKEW_MIN,
            skew_max: DEFAULT_SKEW_MAX,
            skew_chance: DEFAULT_SKEW_CHANCE,
        }
    }
}

/// Bounds default to `0` and the width's maximum.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct RangeConfig {
    pub min: Option<i64>,
    pub max: Option<i64>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields, rename_all = "camelCase")]
pub struct SkewedRangeConfig {
    pub min: Option<i64>,
    pub max: Option<i64>,
    pub skew_min: i64,
    pub skew_max: i64,
    pub skew_chance: u8,
}

impl Default for SkewedRangeConfig {
    fn default() -> Self {
        Self {
            min: None,
            max: None,
            skew_min: DEFAULT_SKEW_MIN,
            skew_max: DEFAULT_SKEW_MAX,
            skew_chance: DEFAULT_SKEW_CHANCE,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct GaussianConfig {
    pub mean: f64,
    pub stddev: f64,
}

impl Default for GaussianConfig {
    fn default() -> Self {
        Self {
            mean: 0.0,
            stddev: DEFAULT_GAUSSIAN_STDDEV,
        }
    }
}

/// Biased sub-range picked with `chance` percent probability.
#[derive(Debug, Clone, Copy)]
struct Skew {
    min: i64,
    max: i64,
    chance: u8,
}

impl Skew {
    fn new(
        tag: &str,
        width: IntWidth,
        min: i64,
        max: i64,
        chance: u8,
    ) -> Result<Self, GenerationError> {
        if chance > 100 {
            return Err(GenerationError::invalid_config(
                tag,
                format!("skewChance {chance} is outside [0, 100]"),
            ));
        }
        // The skew range is never sampled at chance 0, so its bounds are not checked.
        if chance > 0 {
            width.check(tag, "skewMin", min)?;
            width.check(tag, "skewMax", max)?;
            if min > max {
                return Err(GenerationError::invalid_config(
                    tag,
                    "skewMin must be <= skewMax",
                ));
            }
        }
        Ok(Self { min, max, chance })
    }

    /// Selector draw first, then the skewed value draw when selected.
    fn roll(&self, ctx: &mut GenerationContext) -> Option<i64> {
        let selector: u8 = ctx.random().random_range(0..100);
        if selector < self.chance {
            Some(ctx.random().random_range(self.min..=self.max))
        } else {
            None
        }
    }
}

/// `start + offset * step`, then advancing by `step` on each call.
pub struct SequentialGenerator {
    tag: &'static str,
    width: IntWidth,
    start: i64,
    step: i64,
    next: Option<i64>,
    skew: Option<Skew>,
}

impl SequentialGenerator {
    fn new(
        tag: &'static str,
        width: IntWidth,
        start: i64,
        step: i64,
        skew: Option<Skew>,
    ) -> Result<Self, GenerationError> {
        width.check(tag, "start", start)?;
        width.check(tag, "step", step)?;
        Ok(Self {
            tag,
            width,
            start,
            step,
            next: Some(start),
            skew,
        })
    }
}

impl FieldGenerator for SequentialGenerator {
    fn initialize(&mut self, ctx: &GenerationContext) -> Result<(), GenerationError> {
        // Overflow is deferred until the value would actually be returned.
        self.next = i64::try_from(ctx.offset())
            .ok()
            .and_then(|offset| offset.checked_mul(self.step))
            .and_then(|delta| self.start.checked_add(delta));
        Ok(())
    }

    fn generate(&mut self, ctx: &mut GenerationContext) -> Result<Value, GenerationError> {
        if let Some(skew) = self.skew {
            if let Some(value) = skew.roll(ctx) {
                return self.width.value(self.tag, value);
            }
        }

        let current = self.next.ok_or_else(|| {
            GenerationError::Overflow(format!(
                "{}: sequence exceeds i64 at offset {}",
                self.tag,
                ctx.offset()
            ))
        })?;
        self.next = current.checked_add(self.step);
        self.width.value(self.tag, current)
    }
}

/// Uniform draw from `[min, max]`, optionally skewed.
pub struct RangeGenerator {
    tag: &'static str,
    width: IntWidth,
    min: i64,
    max: i64,
    skew: Option<Skew>,
}

impl RangeGenerator {
    fn new(
        tag: &'static str,
        width: IntWidth,
        min: Option<i64>,
        max: Option<i64>,
        skew: Option<Skew>,
    ) -> Result<Self, GenerationError> {
        let min = width.check(tag, "min", min.unwrap_or(0))?;
        let max = width.check(tag, "max", max.unwrap_or(width.max()))?;
        if min > max {
            return Err(GenerationError::invalid_config(tag, "min must be <= max"));
        }
        Ok(Self {
            tag,
            width,
            min,
            max,
            skew,
        })
    }
}

impl FieldGenerator for RangeGenerator {
    fn generate(&mut self, ctx: &mut GenerationContext) -> Result<Value, GenerationError> {
        if let Some(skew) = self.skew {
            if let Some(value) = skew.roll(ctx) {
                return self.width.value(self.tag, value);
            }
        }
        let value = ctx.random().random_range(self.min..=self.max);
        self.width.value(self.tag, value)
    }
}

/// `mean + N(0, 1) * stddev`.
pub struct GaussianGenerator {
    mean: f64,
    stddev: f64,
}

impl FieldGenerator for GaussianGenerator {
    fn generate(&mut self, ctx: &mut GenerationContext) -> Result<Value, GenerationError> {
        let z: f64 = ctx.random().sample(StandardNormal);
        Ok(Value::Double(self.mean + z * self.stddev))
    }
}

fn sequential(
    tag: &'static str,
    width: IntWidth,
    config: SequentialConfig,
) -> Result<Box<dyn FieldGenerator>, GenerationError> {
    boxed(SequentialGenerator::new(
        tag,
        width,
        config.start,
        config.step,
        None,
    )?)
}

fn sequential_skewed(
    tag: &'static str,
    width: IntWidth,
    config: SequentialSkewedConfig,
) -> Result<Box<dyn FieldGenerator>, GenerationError> {
    let skew = Skew::new(
        tag,
        width,
        config.skew_min,
        config.skew_max,
        config.skew_chance,
    )?;
    boxed(SequentialGenerator::new(
        tag,
        width,
        config.start,
        config.step,
        Some(skew),
    )?)
}

fn range(
    tag: &'static str,
    width: IntWidth,
    config: RangeConfig,
) -> Result<Box<dyn FieldGenerator>, GenerationError> {
    boxed(RangeGenerator::new(tag, width, config.min, config.max, None)?)
}

fn skewed_range(
    tag: &'static str,
    width: IntWidth,
    config: SkewedRangeConfig,
) -> Result<Box<dyn FieldGenerator>, GenerationError> {
    let skew = Skew::new(
        tag,
        width,
        config.skew_min,
        config.skew_max,
        config.skew_chance,
    )?;
    boxed(RangeGenerator::new(
        tag,
        width,
        config.min,
        config.max,
        Some(skew),
    )?)
}

pub fn sequential_int(config: SequentialConfig) -> Result<Box<dyn FieldGenerator>, GenerationError> {
    sequential("sequential_int", IntWidth::Int, config)
}

pub fn sequential_long(
    config: SequentialConfig,
) -> Result<Box<dyn FieldGenerator>, GenerationError> {
    sequential("sequential_long", IntWidth::Long, config)
}

pub fn sequential_int_skewed(
    config: SequentialSkewedConfig,
) -> Result<Box<dyn FieldGenerator>, GenerationError> {
    sequential_skewed("sequential_int_skewed", IntWidth::Int, config)
}

pub fn sequential_long_skewed(
    config: SequentialSkewedConfig,
) -> Result<Box<dyn FieldGenerator>, GenerationError> {
    sequential_skewed("sequential_long_skewed", IntWidth::Long, config)
}

pub fn random_int(config: RangeConfig) -> Result<Box<dyn FieldGenerator>, GenerationError> {
    range("random_int", IntWidth::Int, config)
}

pub fn random_long(config: RangeConfig) -> Result<Box<dyn FieldGenerator>, GenerationError> {
    range("random_long", IntWidth::Long, config)
}

pub fn random_int_skewed(
    config: SkewedRangeConfig,
) -> Result<Box<dyn FieldGenerator>, GenerationError> {
    skewed_range("random_int_skewed", IntWidth::Int, config)
}

pub fn random_long_skewed(
    config: SkewedRangeConfig,
) -> Result<Box<dyn FieldGenerator>, GenerationError> {
    skewed_range("random_long_skewed", IntWidth::Long, config)
}

pub fn gaussian(config: GaussianConfig) -> Result<Box<dyn FieldGenerator>, GenerationError> {
    boxed(GaussianGenerator {
        mean: config.mean,
        stddev: config.stddev,
    })
}

#[cfg(test)]
mod tests {
    use datagen_spec::Locale;

    use super::*;

    fn ctx(offset: u64) -> GenerationContext {
        GenerationContext::new(Some(99), offset, Locale::EnUs).unwrap()
    }

    fn draw(generator: &mut dyn FieldGenerator, ctx: &mut GenerationContext, n: usize) -> Vec<i64> {
        (0..n)
            .map(|_| generator.generate(ctx).unwrap().as_i64().unwrap())
            .collect()
    }

    #[test]
    fn sequential_starts_at_offset_times_step() {
        let mut generator = sequential_long(SequentialConfig { start: 5, step: 3 }).unwrap();
        let mut ctx = ctx(10);
        generator.initialize(&ctx).unwrap();
        assert_eq!(draw(generator.as_mut(), &mut ctx, 3), vec![35, 38, 41]);
    }

    #[test]
    fn int_sequence_overflow_fails_when_reached() {
        let mut generator = sequential_int(SequentialConfig {
            start: i64::from(i32::MAX) - 1,
            step: 1,
        })
        .unwrap();
        let mut ctx = ctx(0);
        generator.initialize(&ctx).unwrap();
        assert_eq!(generator.generate(&mut ctx).unwrap(), Value::Int(i32::MAX - 1));
        assert_eq!(generator.generate(&mut ctx).unwrap(), Value::Int(i32::MAX));
        assert!(matches!(
            generator.generate(&mut ctx),
            Err(GenerationError::Overflow(_))
        ));
    }

    #[test]
    fn long_offset_overflow_fails_on_first_value() {
        let mut generator = sequential_long(SequentialConfig {
            start: 0,
            step: i64::MAX,
        })
        .unwrap();
        let mut ctx = ctx(2);
        generator.initialize(&ctx).unwrap();
        assert!(matches!(
            generator.generate(&mut ctx),
            Err(GenerationError::Overflow(_))
        ));
    }

    #[test]
    fn skewed_sequence_does_not_advance_on_skew() {
        let mut generator = sequential_long_skewed(SequentialSkewedConfig {
            start: 1_000,
            step: 1,
            skew_min: 0,
            skew_max: 10,
            skew_chance: 50,
        })
        .unwrap();
        let mut ctx = ctx(0);
        generator.initialize(&ctx).unwrap();
        let sequential: Vec<i64> = draw(generator.as_mut(), &mut ctx, 1_000)
            .into_iter()
            .filter(|value| *value >= 1_000)
            .collect();
        let expected: Vec<i64> = (1_000..1_000 + sequential.len() as i64).collect();
        assert_eq!(sequential, expected);
    }

    #[test]
    fn skewed_range_hits_skew_window() {
        let mut generator = random_long_skewed(SkewedRangeConfig {
            min: Some(1_000),
            max: Some(1_000_000),
            skew_min: 1,
            skew_max: 10,
            skew_chance: 30,
        })
        .unwrap();
        let mut ctx = ctx(0);
        let values = draw(generator.as_mut(), &mut ctx, 100_000);
        let skewed = values.iter().filter(|v| (1..=10).contains(*v)).count();
        assert!(
            values
                .iter()
                .all(|v| (1..=10).contains(v) || (1_000..=1_000_000).contains(v))
        );
        let rate = skewed as f64 / values.len() as f64;
        assert!((rate - 0.30).abs() < 0.01, "skew rate {rate}");
    }

    #[test]
    fn unused_skew_bounds_are_not_validated() {
        assert!(
            random_long_skewed(SkewedRangeConfig {
                min: Some(1),
                max: Some(10),
                skew_min: 1,
                skew_max: 0,
                skew_chance: 0,
            })
            .is_ok()
        );
        assert!(
            random_long_skewed(SkewedRangeConfig {
                min: Some(1),
                max: Some(10),
                skew_min: 1,
                skew_max: 0,
                skew_chance: 5,
            })
            .is_err()
        );
    }

    #[test]
    fn int_bounds_must_fit_width() {
        let err = random_int(RangeConfig {
            min: Some(0),
            max: Some(i64::from(i32::MAX) + 1),
        })
        .err()
        .unwrap();
        assert!(matches!(err, GenerationError::InvalidGeneratorConfig { .. }));
        assert!(random_int(RangeConfig { min: Some(5), max: Some(4) }).is_err());
    }

    #[test]
    fn gaussian_centers_on_mean() {
        let mut generator = gaussian(GaussianConfig {
            mean: 50.0,
            stddev: 2.0,
        })
        .unwrap();
        let mut ctx = ctx(0);
        let sum: f64 = (0..20_000)
            .map(|_| generator.generate(&mut ctx).unwrap().as_f64().unwrap())
            .sum();
        assert!((sum / 20_000.0 - 50.0).abs() < 0.1);
    }
}
