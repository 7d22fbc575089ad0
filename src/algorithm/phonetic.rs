//! Phonetic-code similarity
//!
//! Handles misheard words ("fone" for "phone") by comparing how words sound
//! rather than how they are spelled. Codes are computed word by word and
//! compared position by position.

use rphonetic::{DoubleMetaphone, Encoder, Metaphone, Soundex};

use super::{Algorithm, MatchError};

/// Which phonetic encoding to compare with
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PhoneticCode {
    Soundex,
    Metaphone,
    DoubleMetaphone,
}

impl PhoneticCode {
    fn algorithm(&self) -> Algorithm {
        match self {
            PhoneticCode::Soundex => Algorithm::Soundex,
            PhoneticCode::Metaphone => Algorithm::Metaphone,
            PhoneticCode::DoubleMetaphone => Algorithm::DoubleMetaphone,
        }
    }
}

enum PhoneticEncoder {
    Soundex(Soundex),
    Metaphone(Metaphone),
    DoubleMetaphone(DoubleMetaphone),
}

impl PhoneticEncoder {
    fn new(code: PhoneticCode) -> Self {
        match code {
            PhoneticCode::Soundex => Self::Soundex(Soundex::default()),
            PhoneticCode::Metaphone => Self::Metaphone(Metaphone::default()),
            PhoneticCode::DoubleMetaphone => Self::DoubleMetaphone(DoubleMetaphone::default()),
        }
    }

    /// Primary code plus the alternate one where the encoding has it
    fn codes(&self, word: &str) -> Vec<String> {
        let mut codes = match self {
            Self::Soundex(encoder) => vec![encoder.encode(word)],
            Self::Metaphone(encoder) => vec![encoder.encode(word)],
            Self::DoubleMetaphone(encoder) => {
                let primary = encoder.encode(word);
                let alternate = encoder.encode_alternate(word);
                if alternate != primary {
                    vec![primary, alternate]
                } else {
                    vec![primary]
                }
            }
        };
        codes.retain(|c| !c.is_empty());
        codes
    }
}

/// Words reduced to ASCII letters; the encoders only know the Latin alphabet
fn encodable_words(text: &str) -> Vec<String> {
    text.split_whitespace()
        .map(|w| w.chars().filter(|c| c.is_ascii_alphabetic()).collect::<String>())
        .filter(|w| !w.is_empty())
        .collect()
}

/// Fraction of word positions whose phonetic codes agree
///
/// The denominator is the longer word count, so extra or missing words
/// lower the score.
pub fn phonetic_similarity(
    code: PhoneticCode,
    input: &str,
    keyphrase: &str,
) -> Result<f64, MatchError> {
    let key_words = encodable_words(keyphrase);
    if key_words.is_empty() {
        return Err(MatchError::Unencodable {
            algorithm: code.algorithm(),
            text: keyphrase.to_string(),
        });
    }

    let input_words = encodable_words(input);
    if input_words.is_empty() {
        return Ok(0.0);
    }

    let encoder = PhoneticEncoder::new(code);
    let agreeing = key_words
        .iter()
        .zip(input_words.iter())
        .filter(|(key, word)| {
            let key_codes = encoder.codes(key);
            encoder
                .codes(word)
                .iter()
                .any(|c| key_codes.contains(c))
        })
        .count();

    Ok(agreeing as f64 / key_words.len().max(input_words.len()) as f64)
}
