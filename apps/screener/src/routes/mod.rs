pub mod health;

use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post},
    Router,
};

use crate::screening::handlers;
use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    let body_limit = state.config.max_request_bytes;

    Router::new()
        .route("/health", get(health::health_handler))
        // Skill vocabulary
        .route("/api/v1/skills", get(handlers::handle_base_skills))
        .route("/api/v1/skills/infer", post(handlers::handle_infer_skills))
        // Screening runs
        .route("/api/v1/screenings", post(handlers::handle_screen_upload))
        .route("/api/v1/screenings/text", post(handlers::handle_screen_text))
        .layer(DefaultBodyLimit::max(body_limit))
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use axum::{
        body::{to_bytes, Body},
        http::{header, Request, StatusCode},
    };
    use serde_json::{json, Value};
    use tower::ServiceExt;

    use super::*;
    use crate::config::Config;
    use crate::screening::extraction::DocumentExtractor;
    use crate::screening::model::tests::sample_bundle;
    use crate::screening::pipeline::RankingPipeline;

    fn test_state() -> AppState {
        AppState {
            config: Config::default(),
            pipeline: Arc::new(RankingPipeline::new(sample_bundle())),
            extractor: Arc::new(DocumentExtractor),
        }
    }

    async fn send(request: Request<Body>) -> (StatusCode, Value) {
        let response = build_router(test_state()).oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    fn json_request(uri: &str, body: Value) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri(uri)
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    #[tokio::test]
    async fn test_health_reports_loaded_model() {
        let (status, body) = send(
            Request::builder()
                .uri("/health")
                .body(Body::empty())
                .unwrap(),
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["status"], "ok");
        assert_eq!(body["model"]["status"], "loaded");
    }

    #[tokio::test]
    async fn test_base_skills_lists_display_forms() {
        let (status, body) = send(
            Request::builder()
                .uri("/api/v1/skills")
                .body(Body::empty())
                .unwrap(),
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(
            body["skills"],
            json!(["Machine Learning", "Python", "React", "Sql"])
        );
    }

    #[tokio::test]
    async fn test_infer_skills_from_job_description() {
        let (status, body) = send(json_request(
            "/api/v1/skills/infer",
            json!({ "jd_text": "Looking for Python and SQL experience." }),
        ))
        .await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["inferred"], json!(["Python", "Sql"]));
        assert_eq!(
            body["options"],
            json!(["Machine Learning", "Python", "React", "Sql"])
        );
    }

    #[tokio::test]
    async fn test_text_screening_ranks_candidates() {
        let (status, body) = send(json_request(
            "/api/v1/screenings/text",
            json!({
                "jd_text": "Data engineer: python, sql and spark.",
                "target_skills": ["Python", "SQL"],
                "candidates": [
                    { "candidate_id": "b.txt", "text": "React frontend developer." },
                    { "candidate_id": "a.txt", "text": "Python and SQL on Spark clusters." },
                    { "candidate_id": "c.txt", "text": "   " }
                ],
                "min_score": 0.0
            }),
        ))
        .await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["total_scored"], 2);
        assert_eq!(body["results"][0]["candidate_id"], "a.txt");
        assert_eq!(body["results"][0]["skill_match_percent"], 100.0);
        assert_eq!(body["results"][0]["predicted_role"], "DATA-SCIENCE");
        assert_eq!(body["target_skills"], json!(["Python", "Sql"]));
        assert_eq!(body["failures"][0]["candidate_id"], "c.txt");
        assert_eq!(body["failures"][0]["reason"]["kind"], "extraction_empty");
        assert!(body["warnings"][0]
            .as_str()
            .unwrap()
            .contains("Could not extract text from c.txt"));
    }

    #[tokio::test]
    async fn test_threshold_counts_hidden_candidates() {
        let (status, body) = send(json_request(
            "/api/v1/screenings/text",
            json!({
                "jd_text": "python sql",
                "target_skills": ["Python"],
                "candidates": [
                    { "candidate_id": "a.txt", "text": "python sql" },
                    { "candidate_id": "b.txt", "text": "react" }
                ],
                "min_score": 60.0
            }),
        ))
        .await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["total_scored"], 2);
        assert_eq!(body["results"].as_array().unwrap().len(), 1);
        assert_eq!(body["below_threshold"], 1);
    }

    #[tokio::test]
    async fn test_multipart_screening_extracts_text_files() {
        let boundary = "screener-test-boundary";
        let body = format!(
            "--{b}\r\n\
             Content-Disposition: form-data; name=\"jd_text\"\r\n\r\n\
             We need python and sql.\r\n\
             --{b}\r\n\
             Content-Disposition: form-data; name=\"target_skill\"\r\n\r\n\
             Python\r\n\
             --{b}\r\n\
             Content-Disposition: form-data; name=\"min_score\"\r\n\r\n\
             0\r\n\
             --{b}\r\n\
             Content-Disposition: form-data; name=\"files\"; filename=\"alice.txt\"\r\n\
             Content-Type: text/plain\r\n\r\n\
             Python developer with SQL.\r\n\
             --{b}\r\n\
             Content-Disposition: form-data; name=\"files\"; filename=\"bob.docx\"\r\n\
             Content-Type: application/octet-stream\r\n\r\n\
             binary\r\n\
             --{b}--\r\n",
            b = boundary
        );
        let request = Request::builder()
            .method("POST")
            .uri("/api/v1/screenings")
            .header(
                header::CONTENT_TYPE,
                format!("multipart/form-data; boundary={boundary}"),
            )
            .body(Body::from(body))
            .unwrap();

        let (status, body) = send(request).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["total_scored"], 1);
        assert_eq!(body["results"][0]["candidate_id"], "alice.txt");
        assert_eq!(body["results"][0]["skills_found"], json!(["Python"]));
        assert_eq!(body["failures"][0]["candidate_id"], "bob.docx");
    }

    #[tokio::test]
    async fn test_empty_job_description_is_rejected() {
        let (status, body) = send(json_request(
            "/api/v1/screenings/text",
            json!({
                "jd_text": "  ",
                "candidates": [{ "candidate_id": "a.txt", "text": "python" }]
            }),
        ))
        .await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"]["code"], "VALIDATION_ERROR");
    }

    #[tokio::test]
    async fn test_duplicate_candidate_ids_are_rejected() {
        let (status, _) = send(json_request(
            "/api/v1/screenings/text",
            json!({
                "jd_text": "python",
                "candidates": [
                    { "candidate_id": "a.txt", "text": "python" },
                    { "candidate_id": "a.txt", "text": "sql" }
                ]
            }),
        ))
        .await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_all_empty_batch_is_unprocessable() {
        let (status, body) = send(json_request(
            "/api/v1/screenings/text",
            json!({
                "jd_text": "python",
                "candidates": [
                    { "candidate_id": "a.txt", "text": "" },
                    { "candidate_id": "b.txt", "text": "\n\t" }
                ]
            }),
        ))
        .await;

        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(body["error"]["code"], "EMPTY_BATCH");
        assert_eq!(body["error"]["failures"].as_array().unwrap().len(), 2);
    }
}
