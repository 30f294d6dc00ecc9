use chrono::Utc;
use datagen_core::Value;
use serde::Deserialize;

use crate::context::GenerationContext;
use crate::errors::GenerationError;
use crate::generators::{FieldGenerator, boxed};

/// Bounds are epoch milliseconds; `to` defaults to the moment of parsing.
/// Dataset specs pin that default when they are built, so generators built
/// from a spec always see an explicit `to`.
#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields, rename_all = "camelCase")]
pub struct TimestampConfig {
    pub from: i64,
    pub to: i64,
    pub is_always_now: bool,
}

impl Default for TimestampConfig {
    fn default() -> Self {
        Self {
            from: 0,
            to: Utc::now().timestamp_millis(),
            is_always_now: false,
        }
    }
}

/// Instants drawn through the rich-data facility, emitted as epoch micros.
/// With `isAlwaysNow`, every value is the instant the generator was built.
pub struct TimestampGenerator {
    from: i64,
    to: i64,
    now: Option<i64>,
}

impl FieldGenerator for TimestampGenerator {
    fn generate(&mut self, ctx: &mut GenerationContext) -> Result<Value, GenerationError> {
        let millis = match self.now {
            Some(now) => now,
            None => ctx.rich().instant_between(self.from, self.to),
        };
        millis
            .checked_mul(1_000)
            .map(Value::Timestamp)
            .ok_or_else(|| {
                GenerationError::Overflow(format!("timestamp {millis}ms exceeds microsecond range"))
            })
    }
}

pub fn timestamp(config: TimestampConfig) -> Result<Box<dyn FieldGenerator>, GenerationError> {
    if !config.is_always_now && config.from > config.to {
        return Err(GenerationError::invalid_config(
            "timestamp",
            "from must be <= to",
        ));
    }
    boxed(TimestampGenerator {
        from: config.from,
        to: config.to,
        now: config
            .is_always_now
            .then(|| Utc::now().timestamp_millis()),
    })
}

#[cfg(test)]
mod tests {
    use datagen_spec::Locale;

    use super::*;

    #[test]
    fn timestamps_fall_inside_bounds() {
        let mut generator = timestamp(TimestampConfig {
            from: 1_577_836_800_000,
            to: 1_585_699_200_000,
            is_always_now: false,
        })
        .unwrap();
        let mut ctx = GenerationContext::new(Some(1), 0, Locale::EnUs).unwrap();
        for _ in 0..1_000 {
            let micros = generator.generate(&mut ctx).unwrap().as_i64().unwrap();
            assert!((1_577_836_800_000_000..1_585_699_200_000_000).contains(&micros));
        }
    }

    #[test]
    fn micros_conversion_overflow_is_reported() {
        let mut generator = timestamp(TimestampConfig {
            from: i64::MAX,
            to: i64::MAX,
            is_always_now: false,
        })
        .unwrap();
        let mut ctx = GenerationContext::new(Some(1), 0, Locale::EnUs).unwrap();
        assert!(matches!(
            generator.generate(&mut ctx),
            Err(GenerationError::Overflow(_))
        ));
    }

    #[test]
    fn always_now_reads_the_clock_once() {
        let mut generator = timestamp(TimestampConfig {
            is_always_now: true,
            ..TimestampConfig::default()
        })
        .unwrap();
        let mut ctx = GenerationContext::new(Some(1), 0, Locale::EnUs).unwrap();
        let first = generator.generate(&mut ctx).unwrap();
        std::thread::sleep(std::time::Duration::from_millis(5));
        assert_eq!(generator.generate(&mut ctx).unwrap(), first);
    }

    #[test]
    fn reversed_bounds_are_rejected() {
        assert!(
            timestamp(TimestampConfig {
                from: 10,
                to: 5,
                is_always_now: false,
            })
            .is_err()
        );
    }
}
