use datagen_spec::Locale;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

use crate::errors::GenerationError;
use crate::faker_rs::RichData;

/// Per-split randomness shared by every field generator of that split.
///
/// Randomness depends on the offset only through the seed: a split with seed `s` and offset
/// `o` draws from `ChaCha8Rng::seed_from_u64(s + o)`. Without a seed the
/// source comes from fresh entropy and output is not reproducible.
#[derive(Debug, Clone)]
pub struct GenerationContext {
    offset: u64,
    seeded: bool,
    locale: Locale,
    rng: ChaCha8Rng,
}

impl GenerationContext {
    pub fn new(seed: Option<i64>, offset: u64, locale: Locale) -> Result<Self, GenerationError> {
        let rng = match seed {
            Some(seed) => ChaCha8Rng::seed_from_u64(derive_seed(seed, offset)? as u64),
            None => ChaCha8Rng::from_rng(&mut rand::rng()),
        };
        Ok(Self {
            offset,
            seeded: seed.is_some(),
            locale,
            rng,
        })
    }

    pub fn offset(&self) -> u64 {
        self.offset
    }

    pub fn is_seeded(&self) -> bool {
        self.seeded
    }

    pub fn locale(&self) -> Locale {
        self.locale
    }

    pub fn random(&mut self) -> &mut ChaCha8Rng {
        &mut self.rng
    }

    pub fn rich(&mut self) -> RichData<'_> {
        RichData::new(&mut self.rng, self.locale)
    }
}

fn derive_seed(seed: i64, offset: u64) -> Result<i64, GenerationError> {
    i64::try_from(offset)
        .ok()
        .and_then(|offset| seed.checked_add(offset))
        .ok_or_else(|| GenerationError::Overflow(format!("seed {seed} + offset {offset}")))
}
