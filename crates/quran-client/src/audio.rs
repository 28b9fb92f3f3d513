//! Recitation audio: reciter catalogue and CDN URL construction.
//!
//! Verse audio comes either verbatim from a verse's per-reciter mapping
//! or, when the upstream omits it, from the CDN naming scheme
//! `{cdn}/{reciter-folder}/{chapter:03}{verse:03}.mp3`.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::QuranError;

/// CDN root for per-verse recitation files.
pub const DEFAULT_AUDIO_CDN: &str = "https://equran.nos.wjv-1.neo.id/audio-partial";

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Reciter {
    AbdullahAlJuhany,
    AbdulMuhsinAlQasim,
    AbdurrahmanAsSudais,
    IbrahimAlDossari,
    #[default]
    MisyariRasyidAlAfasi,
}

impl Reciter {
    pub const ALL: [Reciter; 5] = [
        Self::AbdullahAlJuhany,
        Self::AbdulMuhsinAlQasim,
        Self::AbdurrahmanAsSudais,
        Self::IbrahimAlDossari,
        Self::MisyariRasyidAlAfasi,
    ];

    /// Key used by the upstream audio mappings.
    pub fn key(self) -> &'static str {
        match self {
            Self::AbdullahAlJuhany => "01",
            Self::AbdulMuhsinAlQasim => "02",
            Self::AbdurrahmanAsSudais => "03",
            Self::IbrahimAlDossari => "04",
            Self::MisyariRasyidAlAfasi => "05",
        }
    }

    pub fn from_key(key: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|r| r.key() == key)
    }

    pub fn display_name(self) -> &'static str {
        match self {
            Self::AbdullahAlJuhany => "Abdullah Al-Juhany",
            Self::AbdulMuhsinAlQasim => "Abdul Muhsin Al-Qasim",
            Self::AbdurrahmanAsSudais => "Abdurrahman as-Sudais",
            Self::IbrahimAlDossari => "Ibrahim Al-Dossari",
            Self::MisyariRasyidAlAfasi => "Misyari Rasyid Al-Afasi",
        }
    }

    /// Folder name on the audio CDN.
    pub fn cdn_folder(self) -> &'static str {
        match self {
            Self::AbdullahAlJuhany => "Abdullah-Al-Juhany",
            Self::AbdulMuhsinAlQasim => "Abdul-Muhsin-Al-Qasim",
            Self::AbdurrahmanAsSudais => "Abdurrahman-as-Sudais",
            Self::IbrahimAlDossari => "Ibrahim-Al-Dossari",
            Self::MisyariRasyidAlAfasi => "Misyari-Rasyid-Al-Afasi",
        }
    }

    /// Build a verse audio URL from the CDN naming scheme.
    pub fn verse_audio_url(self, cdn_base: &str, chapter: u16, verse: u16) -> String {
        format!(
            "{}/{}/{chapter:03}{verse:03}.mp3",
            cdn_base.trim_end_matches('/'),
            self.cdn_folder()
        )
    }
}

impl fmt::Display for Reciter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.display_name())
    }
}

impl FromStr for Reciter {
    type Err = QuranError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_key(s.trim())
            .ok_or_else(|| QuranError::Validation(format!("unknown reciter key: {s}")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn keys_round_trip() {
        for reciter in Reciter::ALL {
            assert_eq!(Reciter::from_key(reciter.key()), Some(reciter));
        }
        assert_eq!(Reciter::from_key("06"), None);
    }

    #[test]
    fn unknown_key_is_validation_error() {
        let err = "99".parse::<Reciter>().unwrap_err();
        assert!(matches!(err, QuranError::Validation(_)));
        assert_eq!(" 05 ".parse::<Reciter>().unwrap(), Reciter::MisyariRasyidAlAfasi);
    }

    #[test]
    fn cdn_url_pads_chapter_and_verse() {
        let url = Reciter::MisyariRasyidAlAfasi.verse_audio_url(DEFAULT_AUDIO_CDN, 2, 255);
        assert_eq!(
            url,
            "https://equran.nos.wjv-1.neo.id/audio-partial/Misyari-Rasyid-Al-Afasi/002255.mp3"
        );

        let url = Reciter::AbdullahAlJuhany.verse_audio_url("https://cdn.example/", 114, 6);
        assert_eq!(url, "https://cdn.example/Abdullah-Al-Juhany/114006.mp3");
    }
}
