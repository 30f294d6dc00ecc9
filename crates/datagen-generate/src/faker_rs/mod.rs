//! Realistic values (names, addresses, phrases) drawn through `fake`.
//!
//! Every call borrows the split's own random source, so rich values are as
//! reproducible as raw draws.

mod phrases;

use datagen_spec::Locale;
use fake::Fake;
use fake::faker::address::raw::{
    BuildingNumber, CityName, CountryName, StateName, StreetName, ZipCode,
};
use fake::faker::company::raw::{Bs, Buzzword, CatchPhrase, CompanyName, Industry, Profession};
use fake::faker::creditcard::raw::CreditCardNumber;
use fake::faker::internet::raw::{SafeEmail, Username};
use fake::faker::job::raw::Title;
use fake::faker::lorem::raw::Sentence;
use fake::faker::name::raw::{FirstName, LastName, Name};
use fake::faker::phone_number::raw::PhoneNumber;
use fake::locales::{EN, PT_BR};
use rand::Rng;
use rand_chacha::ChaCha8Rng;

pub use phrases::{PHRASE_PALETTE, PhraseSource};

macro_rules! localized {
    ($rich:expr, $faker:ident $(, $arg:expr)*) => {
        match $rich.locale {
            Locale::EnUs => $faker(EN $(, $arg)*).fake_with_rng(&mut *$rich.rng),
            Locale::PtBr => $faker(PT_BR $(, $arg)*).fake_with_rng(&mut *$rich.rng),
        }
    };
}

/// Rich-data view over a split's random source.
pub struct RichData<'a> {
    rng: &'a mut ChaCha8Rng,
    locale: Locale,
}

impl<'a> RichData<'a> {
    pub fn new(rng: &'a mut ChaCha8Rng, locale: Locale) -> Self {
        Self { rng, locale }
    }

    pub fn locale(&self) -> Locale {
        self.locale
    }

    pub fn first_name(&mut self) -> String {
        localized!(self, FirstName)
    }

    pub fn last_name(&mut self) -> String {
        localized!(self, LastName)
    }

    pub fn full_name(&mut self) -> String {
        localized!(self, Name)
    }

    pub fn username(&mut self) -> String {
        localized!(self, Username)
    }

    pub fn email(&mut self) -> String {
        localized!(self, SafeEmail)
    }

    pub fn phone_number(&mut self) -> String {
        localized!(self, PhoneNumber)
    }

    pub fn profession(&mut self) -> String {
        localized!(self, Profession)
    }

    pub fn credit_card(&mut self) -> String {
        localized!(self, CreditCardNumber)
    }

    pub fn street_address(&mut self) -> String {
        let number: String = localized!(self, BuildingNumber);
        let street: String = localized!(self, StreetName);
        format!("{number} {street}")
    }

    pub fn city(&mut self) -> String {
        localized!(self, CityName)
    }

    pub fn zip_code(&mut self) -> String {
        localized!(self, ZipCode)
    }

    pub fn state(&mut self) -> String {
        localized!(self, StateName)
    }

    pub fn country(&mut self) -> String {
        localized!(self, CountryName)
    }

    pub fn latitude(&mut self) -> String {
        format!("{:.6}", self.rng.random_range(-90.0_f64..=90.0))
    }

    pub fn longitude(&mut self) -> String {
        format!("{:.6}", self.rng.random_range(-180.0_f64..=180.0))
    }

    /// Street, city, state and zip joined in mailing order.
    pub fn full_address(&mut self) -> String {
        let street = self.street_address();
        let city = self.city();
        let state = self.state();
        let zip = self.zip_code();
        format!("{street}, {city}, {state} {zip}")
    }

    pub fn sentence(&mut self) -> String {
        localized!(self, Sentence, 4..10)
    }

    pub fn phrase(&mut self, source: PhraseSource) -> String {
        match source {
            PhraseSource::CatchPhrase => localized!(self, CatchPhrase),
            PhraseSource::Bs => localized!(self, Bs),
            PhraseSource::Buzzword => localized!(self, Buzzword),
            PhraseSource::CompanyName => localized!(self, CompanyName),
            PhraseSource::Industry => localized!(self, Industry),
            PhraseSource::Profession => self.profession(),
            PhraseSource::JobTitle => localized!(self, Title),
            PhraseSource::Sentence => self.sentence(),
            PhraseSource::City => self.city(),
            PhraseSource::Country => self.country(),
        }
    }

    /// Uniform instant in `[from, to)` epoch milliseconds; `from` when equal.
    pub fn instant_between(&mut self, from_millis: i64, to_millis: i64) -> i64 {
        if from_millis >= to_millis {
            from_millis
        } else {
            self.rng.random_range(from_millis..to_millis)
        }
    }
}

#[cfg(test)]
mod tests {
    use rand::SeedableRng;

    use super::*;

    #[test]
    fn same_seed_same_values() {
        let draw = |locale| {
            let mut rng = ChaCha8Rng::seed_from_u64(11);
            let mut rich = RichData::new(&mut rng, locale);
            vec![rich.full_name(), rich.full_address(), rich.phrase(PhraseSource::Bs)]
        };
        assert_eq!(draw(Locale::EnUs), draw(Locale::EnUs));
        assert_eq!(draw(Locale::PtBr), draw(Locale::PtBr));
    }

    #[test]
    fn instant_between_stays_in_range() {
        let mut rng = ChaCha8Rng::seed_from_u64(3);
        let mut rich = RichData::new(&mut rng, Locale::EnUs);
        for _ in 0..1000 {
            let instant = rich.instant_between(1_000, 2_000);
            assert!((1_000..2_000).contains(&instant));
        }
        assert_eq!(rich.instant_between(5, 5), 5);
    }
}
