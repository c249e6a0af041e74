pub mod health;

use axum::{
    routing::{get, post, put},
    Router,
};

use crate::jobs::handlers;
use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_handler))
        .route("/api/v1/jobs", post(handlers::handle_create))
        .route("/api/v1/jobs/:id", put(handlers::handle_save))
        .route("/api/v1/jobs/:id/edit", get(handlers::handle_load_edit))
        .route("/api/v1/jobs/:id/plan", post(handlers::handle_preview_plan))
        .route(
            "/api/v1/jobs/:id/save-status",
            get(handlers::handle_save_status),
        )
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;
    use std::sync::Arc;

    use axum::body::{to_bytes, Body};
    use axum::http::{header, Method, Request, StatusCode};
    use serde_json::{json, Value};
    use tower::ServiceExt;

    use super::*;
    use crate::models::interviewer::InterviewerId;
    use crate::models::job::JobRecord;
    use crate::reconcile::SaveTracker;
    use crate::store::mock::{MockConnector, MockStore};

    fn job_record() -> JobRecord {
        serde_json::from_value(json!({
            "id": "job-1",
            "title": "Backend Engineer",
            "recruitmentTeamName": "Platform",
            "recruitmentManager": "Dewi",
            "interviewers": [
                {"id": "1", "name": "A", "department": "X"},
                {"id": "2", "name": "B", "department": "Y"}
            ]
        }))
        .unwrap()
    }

    fn app(store: MockStore) -> (Router, Arc<MockConnector>) {
        let connector = Arc::new(MockConnector::new(store));
        let state = AppState {
            store: connector.clone(),
            saves: SaveTracker::new(),
        };
        (build_router(state), connector)
    }

    fn request(method: Method, uri: &str, body: Option<Value>) -> Request<Body> {
        let builder = Request::builder()
            .method(method)
            .uri(uri)
            .header(header::AUTHORIZATION, "Bearer token-123");
        match body {
            Some(body) => builder
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(body.to_string()))
                .unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        }
    }

    async fn json_body(response: axum::response::Response) -> Value {
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    fn edit_body() -> Value {
        json!({
            "job": {
                "title": "Backend Engineer",
                "location": "Jakarta",
                "teamDescription": "",
                "jobDescription": "",
                "responsibilities": ["Build APIs"],
                "recruitmentTeamName": "Platform",
                "recruitmentManager": "Dewi"
            },
            "interviewers": [
                {"id": "1", "name": "A2", "department": "X"},
                {"name": "C", "department": "Z"}
            ]
        })
    }

    #[tokio::test]
    async fn test_health() {
        let (app, _) = app(MockStore::default());
        let response = app
            .oneshot(Request::get("/health").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(json_body(response).await["status"], "ok");
    }

    #[tokio::test]
    async fn test_jobs_require_bearer_token() {
        let (app, connector) = app(MockStore::with_job(job_record()));
        let response = app
            .oneshot(
                Request::get("/api/v1/jobs/job-1/edit")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
        assert_eq!(json_body(response).await["error"]["code"], "UNAUTHORIZED");
        assert!(connector.store.calls().is_empty());
    }

    #[tokio::test]
    async fn test_load_edit_session() {
        let (app, connector) = app(MockStore::with_job(job_record()));
        let response = app
            .oneshot(request(Method::GET, "/api/v1/jobs/job-1/edit", None))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let body = json_body(response).await;
        assert_eq!(body["job"]["recruitmentTeamName"], "Platform");
        assert_eq!(body["interviewers"][1]["id"], "2");
        assert_eq!(
            *connector.tokens.lock().unwrap(),
            vec!["token-123".to_string()]
        );
    }

    #[tokio::test]
    async fn test_unknown_job_is_404() {
        let (app, _) = app(MockStore::with_job(job_record()));
        let response = app
            .oneshot(request(Method::GET, "/api/v1/jobs/nope/edit", None))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_preview_plan() {
        let (app, _) = app(MockStore::with_job(job_record()));
        let response = app
            .oneshot(request(
                Method::POST,
                "/api/v1/jobs/job-1/plan",
                Some(edit_body()),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let plan = json_body(response).await;
        assert_eq!(plan["to_delete"], json!(["2"]));
        assert_eq!(plan["to_update"][0]["name"], "A2");
        assert_eq!(plan["to_create"][0]["name"], "C");
    }

    #[tokio::test]
    async fn test_save_then_status() {
        let (app, _) = app(MockStore::with_job(job_record()));
        let response = app
            .clone()
            .oneshot(request(Method::PUT, "/api/v1/jobs/job-1", Some(edit_body())))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let outcome = json_body(response).await;
        assert_eq!(outcome["state"], "succeeded");
        assert_eq!(outcome["report"]["deleted"], json!(["2"]));

        let response = app
            .oneshot(request(Method::GET, "/api/v1/jobs/job-1/save-status", None))
            .await
            .unwrap();
        assert_eq!(json_body(response).await["state"], "succeeded");
    }

    #[tokio::test]
    async fn test_save_parent_failure_is_bad_gateway() {
        let store = MockStore {
            fail_update_job: true,
            ..MockStore::with_job(job_record())
        };
        let (app, connector) = app(store);
        let response = app
            .oneshot(request(Method::PUT, "/api/v1/jobs/job-1", Some(edit_body())))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_GATEWAY);
        let body = json_body(response).await;
        assert_eq!(body["error"]["code"], "PARENT_UPDATE_FAILED");
        assert!(body["error"]["message"]
            .as_str()
            .unwrap()
            .contains("job update refused"));
        assert!(connector.store.child_calls().is_empty());
    }

    #[tokio::test]
    async fn test_save_child_failure_reports_partial_state() {
        let store = MockStore {
            fail_interviewers: HashSet::from([InterviewerId::from("2")]),
            ..MockStore::with_job(job_record())
        };
        let (app, _) = app(store);
        let response = app
            .oneshot(request(Method::PUT, "/api/v1/jobs/job-1", Some(edit_body())))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_GATEWAY);
        assert_eq!(
            json_body(response).await["error"]["code"],
            "CHILD_OPERATION_FAILED"
        );
    }

    #[tokio::test]
    async fn test_create_job() {
        let (app, connector) = app(MockStore::default());
        let mut body = edit_body();
        body["interviewers"] = json!([{"name": "C", "department": "Z"}]);
        let response = app
            .oneshot(request(Method::POST, "/api/v1/jobs", Some(body)))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::CREATED);
        assert_eq!(json_body(response).await["job_id"], "job-new");
        assert_eq!(connector.store.child_calls().len(), 1);
    }

    #[tokio::test]
    async fn test_blank_title_rejected() {
        let (app, _) = app(MockStore::default());
        let mut body = edit_body();
        body["job"]["title"] = json!(" ");
        let response = app
            .oneshot(request(Method::POST, "/api/v1/jobs", Some(body)))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }
}
