pub mod documents;
pub mod health;

use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post},
    Router,
};

use crate::generation::handlers as generation;
use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    let body_limit = state.config.max_upload_bytes;

    Router::new()
        .route("/health", get(health::health_handler))
        // Documents
        .route("/api/v1/templates", get(documents::handle_list_templates))
        .route("/api/v1/documents/parse", post(documents::handle_parse))
        .route("/api/v1/render/pdf", post(documents::handle_render_pdf))
        .route("/api/v1/render/docx", post(documents::handle_render_docx))
        .route("/api/v1/export/:kind/:format", post(documents::handle_export))
        .route("/api/v1/extract", post(documents::handle_extract))
        // Generation
        .route("/api/v1/cv/generate", post(generation::handle_generate_cv))
        .route("/api/v1/cv/analyze", post(generation::handle_analyze_cv))
        .route("/api/v1/cover-letter", post(generation::handle_cover_letter))
        .route("/api/v1/interview", post(generation::handle_interview))
        .layer(DefaultBodyLimit::max(body_limit))
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    use async_trait::async_trait;
    use axum::body::{to_bytes, Body};
    use axum::http::{header, Request, StatusCode};
    use axum::response::Response;
    use serde_json::{json, Value};
    use tower::ServiceExt;

    use crate::config::Config;
    use crate::llm_client::{ContentProvider, GenerateOptions, LlmError};

    const CV: &str = "Jane Doe\njane@example.com\nWORK EXPERIENCE:\nAcme | Engineer | 2020\n• Built **Rust** services";

    /// Answers JSON-mode calls with an ATS report and everything else with a CV.
    struct ScriptedProvider;

    #[async_trait]
    impl ContentProvider for ScriptedProvider {
        async fn generate(&self, _prompt: &str, options: &GenerateOptions) -> Result<String, LlmError> {
            if options.json_mode {
                Ok(r#"{"ats_score": 88, "keyword_match": 70, "missing_keywords": ["Go"], "suggestions": []}"#.to_string())
            } else {
                Ok("Jane Doe\nWORK EXPERIENCE:\nAcme | Engineer | 2020\n• Built Rust services".to_string())
            }
        }
    }

    fn app(with_provider: bool) -> Router {
        let provider: Option<Arc<dyn ContentProvider>> = if with_provider {
            Some(Arc::new(ScriptedProvider))
        } else {
            None
        };
        build_router(AppState::new(Config::default(), provider))
    }

    fn post_json(uri: &str, body: Value) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri(uri)
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    async fn json_body(response: Response) -> Value {
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn test_health() {
        let response = app(false)
            .oneshot(Request::get("/health").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let body = json_body(response).await;
        assert_eq!(body["status"], "ok");
        assert_eq!(body["generation_enabled"], false);
    }

    #[tokio::test]
    async fn test_lists_five_templates() {
        let response = app(false)
            .oneshot(Request::get("/api/v1/templates").body(Body::empty()).unwrap())
            .await
            .unwrap();
        let body = json_body(response).await;
        let ids: Vec<&str> = body
            .as_array()
            .unwrap()
            .iter()
            .map(|t| t["id"].as_str().unwrap())
            .collect();
        assert_eq!(ids, vec!["professional", "modern", "creative", "technical", "executive"]);
    }

    #[tokio::test]
    async fn test_parse_returns_sections() {
        let response = app(false)
            .oneshot(post_json("/api/v1/documents/parse", json!({ "content": CV })))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let body = json_body(response).await;
        assert_eq!(body["document"]["sections"][0]["name"], "HEADER");
        assert_eq!(body["document"]["sections"][1]["name"], "WORK EXPERIENCE:");
        assert_eq!(body["document"]["mode"], "heuristic");
        assert_eq!(body["total_lines"], 4);
        assert_eq!(
            body["normalized"],
            "Jane Doe\njane@example.com\nWORK EXPERIENCE:\nAcme | Engineer | 2020\n• Built **Rust** services"
        );
    }

    #[tokio::test]
    async fn test_render_pdf_sets_headers() {
        let response = app(false)
            .oneshot(post_json(
                "/api/v1/render/pdf",
                json!({ "content": CV, "template": "Modern" }),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let headers = response.headers();
        assert_eq!(headers[header::CONTENT_TYPE], "application/pdf");
        assert_eq!(headers["x-page-count"], "1");
        assert_eq!(headers["x-lines-trimmed"], "0");
        assert!(headers.contains_key("x-render-id"));
        assert!(headers[header::CONTENT_DISPOSITION]
            .to_str()
            .unwrap()
            .contains("cv_modern.pdf"));

        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        assert!(bytes.starts_with(b"%PDF-"));
    }

    #[tokio::test]
    async fn test_render_pdf_rejects_unknown_template() {
        let response = app(false)
            .oneshot(post_json(
                "/api/v1/render/pdf",
                json!({ "content": CV, "template": "fancy" }),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let body = json_body(response).await;
        assert_eq!(body["error"]["code"], "VALIDATION_ERROR");
    }

    #[tokio::test]
    async fn test_render_docx_is_zip() {
        let response = app(false)
            .oneshot(post_json("/api/v1/render/docx", json!({ "content": CV })))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        assert!(bytes.starts_with(b"PK"));
    }

    #[tokio::test]
    async fn test_export_routes() {
        let response = app(false)
            .oneshot(post_json(
                "/api/v1/export/cover-letter/docx",
                json!({ "content": "Hello Hiring Manager,\nThanks." }),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert!(response.headers()[header::CONTENT_DISPOSITION]
            .to_str()
            .unwrap()
            .contains("cover_letter.docx"));

        let response = app(false)
            .oneshot(post_json("/api/v1/export/resume/pdf", json!({ "content": "x" })))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_extract_multipart_docx() {
        let docx = crate::render::export_cv_docx("Jane Doe\nSKILLS:\nRust").unwrap();
        let boundary = "cvforge-boundary";
        let mut body = Vec::new();
        body.extend_from_slice(
            format!(
                "--{boundary}\r\nContent-Disposition: form-data; name=\"file\"; filename=\"cv.docx\"\r\n\
                 Content-Type: application/octet-stream\r\n\r\n"
            )
            .as_bytes(),
        );
        body.extend_from_slice(&docx);
        body.extend_from_slice(format!("\r\n--{boundary}--\r\n").as_bytes());

        let request = Request::builder()
            .method("POST")
            .uri("/api/v1/extract")
            .header(
                header::CONTENT_TYPE,
                format!("multipart/form-data; boundary={boundary}"),
            )
            .body(Body::from(body))
            .unwrap();

        let response = app(false).oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let body = json_body(response).await;
        assert_eq!(body["file_name"], "cv.docx");
        assert_eq!(body["text"], "Jane Doe\nSKILLS:\nRust");
    }

    #[tokio::test]
    async fn test_generation_without_provider_is_unavailable() {
        let response = app(false)
            .oneshot(post_json(
                "/api/v1/cover-letter",
                json!({ "resume_text": "r", "job_description": "j" }),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
    }

    #[tokio::test]
    async fn test_generate_cv_validates_input() {
        let response = app(true)
            .oneshot(post_json(
                "/api/v1/cv/generate",
                json!({ "resume_text": "r", "job_description": "  " }),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let response = app(true)
            .oneshot(post_json(
                "/api/v1/cv/generate",
                json!({ "resume_text": "r", "job_description": "Rust", "target_match": 30 }),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_generate_cv_bolds_jd_keywords() {
        let response = app(true)
            .oneshot(post_json(
                "/api/v1/cv/generate",
                json!({ "resume_text": "r", "job_description": "Rust services engineer" }),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let body = json_body(response).await;
        assert!(body["cv"].as_str().unwrap().contains("• Built **Rust** **services**"));
        assert_eq!(body["estimated_pages"], 1);
    }

    #[tokio::test]
    async fn test_analyze_combines_model_and_deterministic_reports() {
        let response = app(true)
            .oneshot(post_json(
                "/api/v1/cv/analyze",
                json!({ "cv_content": "Cut latency 40% with Rust", "job_description": "Rust Go" }),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let body = json_body(response).await;
        assert_eq!(body["ats"]["score"], 88);
        assert_eq!(body["keywords"]["missing_keywords"], json!([]));
        assert_eq!(body["keywords"]["matched_keywords"], json!(["rust"]));
        assert_eq!(body["metrics"]["total_metrics"], 1);
    }
}
