/// Canned phrase families used to build compressible text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PhraseSource {
    CatchPhrase,
    Bs,
    Buzzword,
    CompanyName,
    Industry,
    Profession,
    JobTitle,
    Sentence,
    City,
    Country,
}

/// Fixed cycling order; changing it changes every semi-random string.
pub static PHRASE_PALETTE: [PhraseSource; 10] = [
    PhraseSource::CatchPhrase,
    PhraseSource::Bs,
    PhraseSource::Buzzword,
    PhraseSource::CompanyName,
    PhraseSource::Industry,
    PhraseSource::Profession,
    PhraseSource::JobTitle,
    PhraseSource::Sentence,
    PhraseSource::City,
    PhraseSource::Country,
];
