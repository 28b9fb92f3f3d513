use super::models::RawCommentary;
use super::*;
use crate::validate_chapter_id;

impl QuranApiClient {
    /// Fetch commentary entries for one chapter.
    ///
    /// This is a separate request from [`QuranApiClient::get_chapter_detail`];
    /// the upstream has no combined endpoint.
    pub async fn get_commentary(&self, id: u16) -> Result<Vec<CommentaryEntry>, QuranError> {
        validate_chapter_id(id)?;
        let path = format!("/tafsir/{id}");

        let entries = self
            .commentary
            .get_or_fetch(&path, || async {
                let raw: RawCommentary = self.get_data(&path).await?;
                let mut entries: Vec<CommentaryEntry> =
                    raw.tafsir.into_iter().map(CommentaryEntry::from).collect();
                entries.sort_by_key(|e| e.verse);
                tracing::debug!(chapter = id, count = entries.len(), "Fetched commentary");
                Ok::<_, QuranError>(entries)
            })
            .await?;
        Ok(entries.as_ref().clone())
    }
}
