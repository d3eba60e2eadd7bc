pub mod cv;
pub mod health;

use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post},
    Router,
};

use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    let body_limit = state.config.max_upload_bytes;

    Router::new()
        .route("/health", get(health::health_handler))
        // CV API
        .route("/api/v1/cv/structure", post(cv::handle_structure))
        .route("/api/v1/cv/format", post(cv::handle_format))
        .route("/api/v1/cv/extract", post(cv::handle_extract))
        .route("/api/v1/cv/ats", post(cv::handle_ats))
        .layer(DefaultBodyLimit::max(body_limit))
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{
        body::{to_bytes, Body},
        http::{header, Request, StatusCode},
    };
    use serde_json::{json, Value};
    use tower::ServiceExt;

    use crate::config::Config;

    const SCENARIO_A: &str = "Jane Doe\njane@x.com\n555-123-4567\n\nEXPERIENCE\nSoftware Engineer\nAcme Inc.\n2020 - Present\n• Built APIs\n\nEDUCATION\nBSc Computer Science\nState University\n2019";
    const BOUNDARY: &str = "atsify-test-boundary";

    fn app() -> Router {
        build_router(AppState::new(Config::default()))
    }

    fn json_request(uri: &str, body: Value) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri(uri)
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    /// `(name, file_name, content_type, data)` parts.
    fn multipart_request(uri: &str, parts: &[(&str, Option<&str>, Option<&str>, &[u8])]) -> Request<Body> {
        let mut body = Vec::new();
        for (name, file_name, content_type, data) in parts {
            body.extend_from_slice(format!("--{BOUNDARY}\r\n").as_bytes());
            let disposition = match file_name {
                Some(f) => format!("Content-Disposition: form-data; name=\"{name}\"; filename=\"{f}\"\r\n"),
                None => format!("Content-Disposition: form-data; name=\"{name}\"\r\n"),
            };
            body.extend_from_slice(disposition.as_bytes());
            if let Some(ct) = content_type {
                body.extend_from_slice(format!("Content-Type: {ct}\r\n").as_bytes());
            }
            body.extend_from_slice(b"\r\n");
            body.extend_from_slice(data);
            body.extend_from_slice(b"\r\n");
        }
        body.extend_from_slice(format!("--{BOUNDARY}--\r\n").as_bytes());

        Request::builder()
            .method("POST")
            .uri(uri)
            .header(
                header::CONTENT_TYPE,
                format!("multipart/form-data; boundary={BOUNDARY}"),
            )
            .body(Body::from(body))
            .unwrap()
    }

    async fn send(app: Router, request: Request<Body>) -> (StatusCode, Value) {
        let response = app.oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let json = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
        (status, json)
    }

    #[tokio::test]
    async fn test_health() {
        let request = Request::builder().uri("/health").body(Body::empty()).unwrap();
        let (status, json) = send(app(), request).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["status"], "ok");
    }

    #[tokio::test]
    async fn test_structure_scenario_a() {
        let request = json_request(
            "/api/v1/cv/structure",
            json!({ "rawText": SCENARIO_A, "hints": {} }),
        );
        let (status, json) = send(app(), request).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["cv"]["personalInfo"]["name"], "Jane Doe");
        assert_eq!(json["cv"]["experience"][0]["points"], json!(["Built APIs"]));
        assert_eq!(json["cv"]["education"][0]["degree"], "BSc Computer Science");
        assert_eq!(json["sections"][0]["kind"], "heading1");
    }

    #[tokio::test]
    async fn test_structure_with_full_review() {
        let request = json_request(
            "/api/v1/cv/structure",
            json!({
                "rawText": "Experienced developer who enjoys building reliable things",
                "review": { "skillGapAnalysis": { "missingSkills": ["Kubernetes"] } }
            }),
        );
        let (status, json) = send(app(), request).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["cv"]["skills"]["technical"], json!(["Kubernetes"]));
        assert_eq!(json["cv"]["experience"], json!([]));
    }

    #[tokio::test]
    async fn test_structure_without_hints_is_empty_input() {
        let request = json_request("/api/v1/cv/structure", json!({ "rawText": SCENARIO_A }));
        let (status, json) = send(app(), request).await;
        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(json["error"]["code"], "EMPTY_INPUT");

        let request = json_request("/api/v1/cv/structure", json!({ "rawText": "", "hints": {} }));
        let (status, _) = send(app(), request).await;
        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    }

    #[tokio::test]
    async fn test_format_regenerates_content() {
        let request = json_request(
            "/api/v1/cv/format",
            json!({
                "content": "tampered",
                "personalInfo": { "name": "Jane Doe" },
                "achievements": ["Cut costs by 40%"]
            }),
        );
        let (status, json) = send(app(), request).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["content"], "Jane Doe\n\nKEY ACHIEVEMENTS\n• Cut costs by 40%");
        assert_eq!(json["sections"].as_array().unwrap().len(), 3);
    }

    #[tokio::test]
    async fn test_extract_plain_text_upload() {
        let request = multipart_request(
            "/api/v1/cv/extract",
            &[("file", Some("cv.txt"), Some("text/plain"), &b"Jane  Doe\r\n\r\nEXPERIENCE"[..])],
        );
        let (status, json) = send(app(), request).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["text"], "Jane Doe\nEXPERIENCE");
    }

    #[tokio::test]
    async fn test_extract_rejects_unsupported_type() {
        let request = multipart_request(
            "/api/v1/cv/extract",
            &[("file", Some("photo.png"), Some("image/png"), &b"\x89PNG"[..])],
        );
        let (status, json) = send(app(), request).await;
        assert_eq!(status, StatusCode::UNSUPPORTED_MEDIA_TYPE);
        assert_eq!(json["error"]["code"], "UNSUPPORTED_FILE_TYPE");
    }

    #[tokio::test]
    async fn test_extract_without_file_is_validation_error() {
        let request = multipart_request("/api/v1/cv/extract", &[("note", None, None, &b"hello"[..])]);
        let (status, json) = send(app(), request).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(json["error"]["code"], "VALIDATION_ERROR");
    }

    #[tokio::test]
    async fn test_oversized_upload_is_rejected() {
        let config = Config {
            max_upload_bytes: 64,
            ..Config::default()
        };
        let app = build_router(AppState::new(config));
        let big = vec![b'a'; 4096];
        let request = multipart_request(
            "/api/v1/cv/extract",
            &[("file", Some("cv.txt"), Some("text/plain"), big.as_slice())],
        );
        let response = app.oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::PAYLOAD_TOO_LARGE);
    }

    #[tokio::test]
    async fn test_ats_export() {
        let review = json!({
            "score": 70,
            "atsOptimization": { "missingKeywords": ["Docker"] },
            "dynamicContent": { "keyAchievements": ["Reduced API latency by 30%"] }
        })
        .to_string();
        let request = multipart_request(
            "/api/v1/cv/ats",
            &[
                ("file", Some("cv.txt"), Some("text/plain"), SCENARIO_A.as_bytes()),
                ("review", None, None, review.as_bytes()),
            ],
        );
        let (status, json) = send(app(), request).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["cv"]["skills"]["technical"], json!(["Docker"]));
        assert_eq!(json["cv"]["achievements"], json!(["Reduced API latency by 30%"]));
        assert_eq!(json["improvedCv"], json["cv"]["content"]);
        assert!(json["originalCv"].as_str().unwrap().starts_with("Jane Doe"));
        assert!(json["generatedOn"].is_string());
        assert_eq!(json["tailoredExperience"], json!([]));
    }

    #[tokio::test]
    async fn test_ats_without_review_is_empty_input() {
        let request = multipart_request(
            "/api/v1/cv/ats",
            &[("file", Some("cv.txt"), Some("text/plain"), SCENARIO_A.as_bytes())],
        );
        let (status, json) = send(app(), request).await;
        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(json["error"]["code"], "EMPTY_INPUT");
    }
}
