use tracing::info;

use crate::api::{procedures, QuestionsByFilterInput};
use crate::errors::PortalError;
use crate::models::question::Question;
use crate::pagination::InfiniteList;
use crate::state::PortalState;

/// The "load more" question list for one filter query.
/// A new query, or an invalidation of the question lists in the cache,
/// restarts pagination; otherwise loaded pages are kept.
#[derive(Debug, Default)]
pub struct QuestionFeed {
    query: Option<QuestionsByFilterInput>,
    list: InfiniteList<Question>,
    /// Cache generation the loaded pages belong to.
    generation: u64,
}

impl QuestionFeed {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn questions(&self) -> impl Iterator<Item = &Question> {
        self.list.items()
    }

    pub fn question_count(&self) -> Option<usize> {
        self.list.is_loaded().then(|| self.list.item_count())
    }

    /// Loaded and empty: the page shows "Nothing found".
    pub fn is_empty_result(&self) -> bool {
        self.question_count() == Some(0)
    }

    pub fn has_more(&self) -> bool {
        self.list.has_next_page()
    }

    /// Points the feed at `query` and loads its first page if needed.
    pub async fn show(
        &mut self,
        state: &PortalState,
        query: QuestionsByFilterInput,
    ) -> Result<(), PortalError> {
        if self.query.as_ref() == Some(&query) && self.list.is_loaded() && !self.is_stale(state) {
            return Ok(());
        }
        self.list.reset();
        self.query = Some(query);
        self.load_more(state).await?;
        Ok(())
    }

    fn is_stale(&self, state: &PortalState) -> bool {
        state.cache.generation(procedures::GET_QUESTIONS_BY_FILTER) != self.generation
    }

    /// Appends the next page. Returns `Ok(false)` when nothing more exists
    /// or no query has been shown yet. Stale pages are dropped first.
    pub async fn load_more(&mut self, state: &PortalState) -> Result<bool, PortalError> {
        let Some(query) = self.query.clone() else {
            return Ok(false);
        };
        if self.is_stale(state) {
            self.list.reset();
            self.generation = state.cache.generation(procedures::GET_QUESTIONS_BY_FILTER);
        }
        let appended = self
            .list
            .load_next(|cursor| async move {
                let input = QuestionsByFilterInput { cursor, ..query };
                state
                    .cache
                    .fetch(procedures::GET_QUESTIONS_BY_FILTER, &input, || {
                        state.api.get_questions_by_filter(&input)
                    })
                    .await
            })
            .await?;
        if appended {
            info!("Question feed now holds {} questions", self.list.item_count());
        }
        Ok(appended)
    }

    /// Drops cached pages so the next `show` refetches from the first page.
    pub fn invalidate(&mut self, state: &PortalState) {
        state.cache.invalidate(procedures::GET_QUESTIONS_BY_FILTER);
        self.list.reset();
    }
}
