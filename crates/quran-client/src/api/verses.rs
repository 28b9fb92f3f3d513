use super::*;
use crate::audio::Reciter;
use crate::{search, validate_chapter_id};

impl QuranApiClient {
    /// Look up the audio URL the upstream supplies for one verse and reciter.
    ///
    /// Fails with `Validation` for an unknown reciter key or chapter id and
    /// with `NotFound` when the verse or its audio entry is absent.
    pub async fn resolve_verse_audio_url(
        &self,
        chapter: u16,
        verse: u16,
        reciter_key: &str,
    ) -> Result<String, QuranError> {
        let reciter: Reciter = reciter_key.parse()?;
        validate_chapter_id(chapter)?;

        let detail = self.get_chapter_detail(chapter).await?;
        let found = detail
            .verse(verse)
            .ok_or_else(|| QuranError::NotFound(format!("verse {chapter}:{verse}")))?;

        found
            .audio
            .get(reciter.key())
            .filter(|url| !url.is_empty())
            .cloned()
            .ok_or_else(|| {
                QuranError::NotFound(format!(
                    "audio for verse {chapter}:{verse} by reciter {}",
                    reciter.key()
                ))
            })
    }

    /// Search the verses of one chapter by text, transliteration,
    /// translation or verse number.
    pub async fn search_verses_in_chapter(
        &self,
        id: u16,
        query: &str,
    ) -> Result<Vec<Verse>, QuranError> {
        validate_chapter_id(id)?;
        let query = search::Query::parse(query);
        if query.is_empty() {
            return Ok(Vec::new());
        }
        let detail = self.get_chapter_detail(id).await?;
        Ok(detail
            .verses
            .into_iter()
            .filter(|v| search::verse_matches(v, &query))
            .collect())
    }
}
