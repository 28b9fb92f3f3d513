use futures_util::future::join_all;

use super::models::{RawChapter, RawChapterDetail};
use super::*;
use crate::{search, validate_chapter_id};

impl QuranApiClient {
    /// Fetch the summary of every chapter.
    pub async fn list_chapters(&self) -> Result<Vec<Chapter>, QuranError> {
        let chapters = self
            .chapter_list
            .get_or_fetch("/surat", || async {
                let raw: Vec<RawChapter> = self.get_data("/surat").await?;
                let chapters: Vec<Chapter> = raw.into_iter().map(Chapter::from).collect();
                tracing::debug!(count = chapters.len(), "Fetched chapter list");
                Ok::<_, QuranError>(chapters)
            })
            .await?;
        Ok(chapters.as_ref().clone())
    }

    /// Fetch one chapter with all of its verses.
    pub async fn get_chapter_detail(&self, id: u16) -> Result<ChapterDetail, QuranError> {
        validate_chapter_id(id)?;
        let path = format!("/surat/{id}");

        let detail = self
            .details
            .get_or_fetch(&path, || async {
                let raw: RawChapterDetail = self.get_data(&path).await?;
                let detail = ChapterDetail::from(raw);
                if !detail.is_contiguous() {
                    tracing::warn!(
                        chapter = id,
                        expected = detail.chapter.verse_count,
                        received = detail.verses.len(),
                        "Verse list does not match the declared verse count"
                    );
                }
                Ok::<_, QuranError>(detail)
            })
            .await?;
        Ok(detail.as_ref().clone())
    }

    /// Fetch chapter detail and commentary concurrently and join them.
    ///
    /// Both requests must succeed; missing commentary for individual verses
    /// is not an error.
    pub async fn get_chapter_view(&self, id: u16) -> Result<ChapterView, QuranError> {
        validate_chapter_id(id)?;
        let (detail, commentary) =
            futures_util::try_join!(self.get_chapter_detail(id), self.get_commentary(id))?;
        Ok(ChapterView::new(detail, commentary))
    }

    /// Fetch several chapters concurrently.
    ///
    /// Individual failures are logged and reported in
    /// [`BatchOutcome::failures`] instead of aborting the batch.
    pub async fn get_chapter_details(&self, ids: &[u16]) -> BatchOutcome {
        let results = join_all(ids.iter().map(|&id| async move {
            (id, self.get_chapter_detail(id).await)
        }))
        .await;

        let mut outcome = BatchOutcome::default();
        for (id, result) in results {
            match result {
                Ok(detail) => outcome.chapters.push(detail),
                Err(e) => {
                    tracing::warn!(chapter = id, error = %e, "Failed to fetch chapter in batch");
                    outcome.failures.push((id, e));
                }
            }
        }
        outcome
    }

    /// Search chapters by name, gloss or number.
    pub async fn search_chapters(&self, query: &str) -> Result<Vec<Chapter>, QuranError> {
        let query = search::Query::parse(query);
        if query.is_empty() {
            return Ok(Vec::new());
        }
        let chapters = self.list_chapters().await?;
        Ok(chapters
            .into_iter()
            .filter(|c| search::chapter_matches(c, &query))
            .collect())
    }
}
