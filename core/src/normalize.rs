use alloc::vec::Vec;
use core::ops::RangeInclusive;
use unicode_normalization::UnicodeNormalization;

use crate::RejectReason;

/// Combining diacritical marks left behind by canonical decomposition.
const COMBINING_MARKS: RangeInclusive<char> = '\u{0300}'..='\u{036F}';

fn canonical_chars(raw: &str) -> impl Iterator<Item = char> + '_ {
    raw.trim()
        .chars()
        .flat_map(char::to_uppercase)
        .nfd()
        .filter(|c| !COMBINING_MARKS.contains(c))
}

/// Turns a raw scan payload into the canonical character used for matching.
///
/// Surrounding whitespace is dropped, the text is uppercased, decomposed and
/// stripped of combining marks. Anything that does not leave exactly one
/// character behind is rejected.
pub fn normalize(raw: &str) -> core::result::Result<char, RejectReason> {
    let mut chars = canonical_chars(raw);
    match (chars.next(), chars.next()) {
        (Some(letter), None) => Ok(letter),
        _ => Err(RejectReason::NotSingleCharacter),
    }
}

/// Same pipeline as [`normalize`], applied to every character of a word.
pub fn canonicalize_word(raw: &str) -> Vec<char> {
    canonical_chars(raw).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::vec;

    #[test]
    fn accented_and_lowercase_letters_share_a_canonical_form() {
        assert_eq!(normalize("é"), Ok('E'));
        assert_eq!(normalize("E"), Ok('E'));
        assert_eq!(normalize(" e "), Ok('E'));
        assert_eq!(normalize("é "), Ok('E'));
        assert_eq!(normalize("ç"), Ok('C'));
        assert_eq!(normalize("Ã"), Ok('A'));
    }

    #[test]
    fn decomposed_input_is_accepted() {
        assert_eq!(normalize("e\u{0301}"), Ok('E'));
        assert_eq!(normalize("\u{00F1}"), Ok('N'));
    }

    #[test]
    fn rejects_anything_but_one_character() {
        assert_eq!(normalize("ab"), Err(RejectReason::NotSingleCharacter));
        assert_eq!(normalize(""), Err(RejectReason::NotSingleCharacter));
        assert_eq!(normalize("   "), Err(RejectReason::NotSingleCharacter));
        assert_eq!(normalize("a b"), Err(RejectReason::NotSingleCharacter));
    }

    #[test]
    fn case_mapping_that_expands_is_rejected() {
        // 'ß' uppercases to "SS"
        assert_eq!(normalize("ß"), Err(RejectReason::NotSingleCharacter));
    }

    #[test]
    fn digits_and_symbols_pass_through() {
        assert_eq!(normalize("7"), Ok('7'));
        assert_eq!(normalize("-"), Ok('-'));
    }

    #[test]
    fn canonicalize_word_strips_every_letter() {
        assert_eq!(canonicalize_word(" coração "), vec!['C', 'O', 'R', 'A', 'C', 'A', 'O']);
        assert_eq!(canonicalize_word(""), Vec::<char>::new());
    }
}
