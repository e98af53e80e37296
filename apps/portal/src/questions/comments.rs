use serde_json::json;
use tracing::{info, warn};

use crate::api::{procedures, AnswerCommentsInput, CreateCommentInput};
use crate::errors::{FieldError, PortalError};
use crate::models::answer::{Answer, AnswerComment};
use crate::models::question::{SortOrder, SortType};
use crate::pagination::InfiniteList;
use crate::state::PortalState;

pub const COMMENTS_PAGE_SIZE: u32 = 5;

/// The "add a comment" text box.
#[derive(Debug, Clone, Default)]
pub struct CommentDraft {
    content: String,
    dirty: bool,
}

impl CommentDraft {
    pub fn content(&self) -> &str {
        &self.content
    }

    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    pub fn set_content(&mut self, content: impl Into<String>) {
        self.content = content.into();
        self.dirty = true;
    }

    pub fn validate(&self) -> Result<&str, PortalError> {
        if self.content.is_empty() {
            return Err(PortalError::Validation(vec![FieldError::new(
                "commentContent",
                "Comment is required",
            )]));
        }
        Ok(&self.content)
    }

    /// Post is enabled only for an edited, valid draft.
    pub fn can_post(&self) -> bool {
        self.dirty && self.validate().is_ok()
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }
}

/// One answer with its sortable, paginated comment thread.
#[derive(Debug)]
pub struct AnswerPage {
    answer_id: String,
    answer: Option<Answer>,
    sort_order: SortOrder,
    sort_type: SortType,
    comments: InfiniteList<AnswerComment>,
    draft: CommentDraft,
}

impl AnswerPage {
    pub fn new(answer_id: impl Into<String>) -> Self {
        Self {
            answer_id: answer_id.into(),
            answer: None,
            sort_order: SortOrder::Desc,
            sort_type: SortType::New,
            comments: InfiniteList::new(),
            draft: CommentDraft::default(),
        }
    }

    pub fn answer(&self) -> Option<&Answer> {
        self.answer.as_ref()
    }

    pub fn comments(&self) -> impl Iterator<Item = &AnswerComment> {
        self.comments.items()
    }

    pub fn has_more_comments(&self) -> bool {
        self.comments.has_next_page()
    }

    pub fn sort_order(&self) -> SortOrder {
        self.sort_order
    }

    pub fn sort_type(&self) -> SortType {
        self.sort_type
    }

    pub fn draft(&self) -> &CommentDraft {
        &self.draft
    }

    pub fn draft_mut(&mut self) -> &mut CommentDraft {
        &mut self.draft
    }

    pub fn set_sort_order(&mut self, sort_order: SortOrder) {
        if self.sort_order != sort_order {
            self.sort_order = sort_order;
            self.comments.reset();
        }
    }

    pub fn set_sort_type(&mut self, sort_type: SortType) {
        if self.sort_type != sort_type {
            self.sort_type = sort_type;
            self.comments.reset();
        }
    }

    pub async fn load_answer(&mut self, state: &PortalState) -> Result<&Answer, PortalError> {
        let answer_id = self.answer_id.as_str();
        let answer = state
            .cache
            .fetch(
                procedures::GET_ANSWER_BY_ID,
                &json!({ "answerId": answer_id }),
                || state.api.get_answer_by_id(answer_id),
            )
            .await?;
        Ok(self.answer.insert(answer))
    }

    pub async fn load_more_comments(&mut self, state: &PortalState) -> Result<bool, PortalError> {
        let base = AnswerCommentsInput {
            answer_id: self.answer_id.clone(),
            sort_order: self.sort_order,
            sort_type: self.sort_type,
            limit: COMMENTS_PAGE_SIZE,
            cursor: None,
        };
        self.comments
            .load_next(|cursor| async move {
                let input = AnswerCommentsInput { cursor, ..base };
                state
                    .cache
                    .fetch(procedures::GET_ANSWER_COMMENTS, &input, || {
                        state.api.get_answer_comments(&input)
                    })
                    .await
            })
            .await
    }

    /// Posts the draft, then refetches this answer's thread from the first page.
    /// A failed refetch is logged; the comment still counts as posted.
    pub async fn post_comment(
        &mut self,
        state: &PortalState,
    ) -> Result<AnswerComment, PortalError> {
        if !self.draft.can_post() {
            self.draft.validate()?;
            return Err(PortalError::Validation(vec![FieldError::new(
                "commentContent",
                "Comment has not been edited",
            )]));
        }
        let content = self.draft.content().to_string();
        self.draft.reset();

        let comment = state
            .api
            .create_answer_comment(&CreateCommentInput {
                answer_id: self.answer_id.clone(),
                content,
            })
            .await?;
        state.cache.invalidate_matching(
            procedures::GET_ANSWER_COMMENTS,
            &json!({ "answerId": self.answer_id }),
        );
        info!("Posted comment {} on answer {}", comment.id, self.answer_id);

        self.comments.reset();
        if let Err(e) = self.load_more_comments(state).await {
            warn!("Comment {} posted but reloading the thread failed: {e}", comment.id);
        }
        Ok(comment)
    }
}
