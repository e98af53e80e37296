use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use serde_json::json;
use tracing::{debug, warn};

use crate::api::{
    procedures, AnswerCommentsInput, CreateCommentInput, CreateEncounterInput,
    CreateQuestionInput, EncounterRecord, PortalApi, QuestionsByFilterInput, ResumeUpsertInput,
};
use crate::errors::PortalError;
use crate::models::answer::{Answer, AnswerComment};
use crate::models::question::Question;
use crate::models::resume::ResumeRecord;
use crate::models::Page;

const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

#[derive(Debug, Deserialize)]
struct ApiErrorBody {
    error: ApiErrorDetail,
}

#[derive(Debug, Deserialize)]
struct ApiErrorDetail {
    #[serde(default)]
    code: Option<String>,
    message: String,
}

/// JSON-over-HTTP client for the portal procedures.
/// Each call is `POST {base_url}/{procedure}` with the input as the body.
/// Failures are returned once; callers decide whether to re-trigger.
#[derive(Clone)]
pub struct HttpPortalApi {
    client: Client,
    base_url: String,
}

impl HttpPortalApi {
    pub fn new(base_url: impl Into<String>) -> Result<Self, PortalError> {
        Ok(Self {
            client: Client::builder().timeout(REQUEST_TIMEOUT).build()?,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Calls one procedure and deserializes its JSON result.
    pub async fn call<I, T>(&self, procedure: &str, input: &I) -> Result<T, PortalError>
    where
        I: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let url = format!("{}/{procedure}", self.base_url);
        let response = self.client.post(&url).json(input).send().await?;
        let status = response.status();

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            let message = match serde_json::from_str::<ApiErrorBody>(&body) {
                Ok(parsed) => match parsed.error.code {
                    Some(code) => format!("{code}: {}", parsed.error.message),
                    None => parsed.error.message,
                },
                Err(_) => body,
            };
            warn!("{procedure} returned {status}: {message}");
            return Err(PortalError::Api {
                status: status.as_u16(),
                message,
            });
        }

        let body = response.bytes().await?;
        debug!("{procedure} succeeded ({} bytes)", body.len());
        Ok(serde_json::from_slice(&body)?)
    }
}

#[async_trait]
impl PortalApi for HttpPortalApi {
    async fn get_questions_by_filter(
        &self,
        input: &QuestionsByFilterInput,
    ) -> Result<Page<Question>, PortalError> {
        self.call(procedures::GET_QUESTIONS_BY_FILTER, input).await
    }

    async fn create_question(&self, input: &CreateQuestionInput) -> Result<Question, PortalError> {
        self.call(procedures::CREATE_QUESTION, input).await
    }

    async fn get_related_questions(&self, content: &str) -> Result<Vec<Question>, PortalError> {
        self.call(procedures::GET_RELATED_QUESTIONS, &json!({ "content": content }))
            .await
    }

    async fn create_encounter(
        &self,
        input: &CreateEncounterInput,
    ) -> Result<EncounterRecord, PortalError> {
        self.call(procedures::CREATE_ENCOUNTER, input).await
    }

    async fn get_answer_by_id(&self, answer_id: &str) -> Result<Answer, PortalError> {
        self.call(procedures::GET_ANSWER_BY_ID, &json!({ "answerId": answer_id }))
            .await
    }

    async fn get_answer_comments(
        &self,
        input: &AnswerCommentsInput,
    ) -> Result<Page<AnswerComment>, PortalError> {
        self.call(procedures::GET_ANSWER_COMMENTS, input).await
    }

    async fn create_answer_comment(
        &self,
        input: &CreateCommentInput,
    ) -> Result<AnswerComment, PortalError> {
        self.call(procedures::CREATE_ANSWER_COMMENT, input).await
    }

    async fn upsert_resume(&self, input: &ResumeUpsertInput) -> Result<ResumeRecord, PortalError> {
        self.call(procedures::UPSERT_RESUME, input).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{http::StatusCode, routing::post, Json, Router};
    use serde_json::Value;

    async fn serve(router: Router) -> String {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, router).await.unwrap();
        });
        format!("http://{addr}/api")
    }

    #[tokio::test]
    async fn test_call_posts_input_to_procedure_path() {
        let router = Router::new().route(
            "/api/questions.answers.getAnswerById",
            post(|Json(body): Json<Value>| async move {
                Json(json!({
                    "id": body["answerId"],
                    "content": "Use two pointers",
                    "user": "ada",
                    "createdAt": "2024-05-01T10:00:00Z",
                    "numVotes": 4
                }))
            }),
        );
        let api = HttpPortalApi::new(serve(router).await).unwrap();
        let answer = api.get_answer_by_id("a1").await.unwrap();
        assert_eq!(answer.id, "a1");
        assert_eq!(answer.num_votes, 4);
        assert!(answer.user_image.is_none());
    }

    #[tokio::test]
    async fn test_error_body_is_reported() {
        let router = Router::new().route(
            "/api/questions.answers.comments.user.create",
            post(|| async {
                (
                    StatusCode::UNAUTHORIZED,
                    Json(json!({"error": {"code": "UNAUTHORIZED", "message": "Sign in first"}})),
                )
            }),
        );
        let api = HttpPortalApi::new(serve(router).await).unwrap();
        let err = api
            .create_answer_comment(&CreateCommentInput {
                answer_id: "a1".to_string(),
                content: "Nice".to_string(),
            })
            .await
            .unwrap_err();
        match err {
            PortalError::Api { status, message } => {
                assert_eq!(status, 401);
                assert_eq!(message, "UNAUTHORIZED: Sign in first");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_plain_text_error_body_is_kept() {
        let router = Router::new().route(
            "/api/resumes.resume.user.upsert",
            post(|| async { (StatusCode::BAD_GATEWAY, "upstream down") }),
        );
        let api = HttpPortalApi::new(serve(router).await).unwrap();
        let err = api
            .upsert_resume(&ResumeUpsertInput {
                id: None,
                title: "t".to_string(),
                role: "r".to_string(),
                experience: "e".to_string(),
                location: "l".to_string(),
                additional_info: None,
                url: "u".to_string(),
            })
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            PortalError::Api { status: 502, ref message } if message == "upstream down"
        ));
    }
}
