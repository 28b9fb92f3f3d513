//! Chapter and verse matching.
//!
//! Latin-script queries match case-insensitively against transliterated
//! and translated fields. Arabic-script queries match the Arabic fields
//! as-is. All-digit queries also match ordinals, exactly or as a substring
//! of the decimal form.

use crate::api::{Chapter, Verse};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Query {
    raw: String,
    folded: String,
    arabic: bool,
    numeric: bool,
}

impl Query {
    pub fn parse(input: &str) -> Self {
        let raw = input.trim().to_string();
        let arabic = raw.chars().any(is_arabic_char);
        let numeric = !raw.is_empty() && raw.chars().all(|c| c.is_ascii_digit());
        let folded = if arabic { raw.clone() } else { raw.to_lowercase() };
        Self {
            raw,
            folded,
            arabic,
            numeric,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.raw.is_empty()
    }

    pub fn is_arabic(&self) -> bool {
        self.arabic
    }

    fn matches_number(&self, number: u16) -> bool {
        self.numeric && number.to_string().contains(&self.raw)
    }

    fn matches_text(&self, haystack: &str) -> bool {
        if self.arabic {
            haystack.contains(&self.raw)
        } else {
            haystack.to_lowercase().contains(&self.folded)
        }
    }
}

/// Whether a character belongs to one of the Arabic Unicode blocks.
pub fn is_arabic_char(c: char) -> bool {
    matches!(
        c,
        '\u{0600}'..='\u{06FF}'
            | '\u{0750}'..='\u{077F}'
            | '\u{08A0}'..='\u{08FF}'
            | '\u{FB50}'..='\u{FDFF}'
            | '\u{FE70}'..='\u{FEFF}'
    )
}

pub fn chapter_matches(chapter: &Chapter, query: &Query) -> bool {
    if query.is_empty() {
        return false;
    }
    if query.matches_number(chapter.number) {
        return true;
    }
    if query.is_arabic() {
        query.matches_text(&chapter.name)
    } else {
        query.matches_text(&chapter.name_latin) || query.matches_text(&chapter.meaning)
    }
}

pub fn verse_matches(verse: &Verse, query: &Query) -> bool {
    if query.is_empty() {
        return false;
    }
    if query.matches_number(verse.number) {
        return true;
    }
    if query.is_arabic() {
        query.matches_text(&verse.arabic)
    } else {
        query.matches_text(&verse.latin) || query.matches_text(&verse.translation)
    }
}
