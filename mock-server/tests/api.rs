use axum::http::{self, Request, StatusCode};
use http_body_util::BodyExt;
use md5::{Digest, Md5};
use mock_server::{app, APP_KEY, PASSWORD, USERNAME};
use serde_json::Value;
use tower::ServiceExt;

async fn body_json(response: axum::response::Response) -> Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

async fn body_text(response: axum::response::Response) -> String {
    let bytes: bytes::Bytes = response.into_body().collect().await.unwrap().to_bytes();
    String::from_utf8(bytes.to_vec()).unwrap()
}

fn form_request(uri: &str, body: &str) -> Request<String> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header(
            http::header::CONTENT_TYPE,
            "application/x-www-form-urlencoded",
        )
        .body(body.to_string())
        .unwrap()
}

fn login_hash(nonce: &str, password: &str) -> String {
    let password_digest = format!("{:x}", Md5::digest(password.as_bytes()));
    format!(
        "{:x}",
        Md5::digest(format!("{nonce}:{password_digest}").as_bytes())
    )
}

// --- users/login ---

#[tokio::test]
async fn login_challenge_issues_a_nonce() {
    let app = app();
    let resp = app
        .oneshot(form_request(
            "/json/users/login",
            &format!("app_key={APP_KEY}&user={USERNAME}"),
        ))
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::OK);
    let reply = body_json(resp).await;
    assert!(reply["nonce"].is_string());
    assert!(reply.get("error").is_none());
}

#[tokio::test]
async fn no_nonce_user_gets_an_empty_challenge() {
    let app = app();
    let resp = app
        .oneshot(form_request(
            "/json/users/login",
            &format!("app_key={APP_KEY}&user=no-nonce"),
        ))
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::OK);
    let reply = body_json(resp).await;
    assert!(reply.get("nonce").is_none());
}

#[tokio::test]
async fn handshake_grants_a_user_key() {
    use tower::Service;

    let mut app = app().into_service();

    let resp = ServiceExt::ready(&mut app)
        .await
        .unwrap()
        .call(form_request(
            "/json/users/login",
            &format!("app_key={APP_KEY}&user={USERNAME}"),
        ))
        .await
        .unwrap();
    let nonce = body_json(resp).await["nonce"].as_str().unwrap().to_string();

    let hash = login_hash(&nonce, PASSWORD);
    let resp = ServiceExt::ready(&mut app)
        .await
        .unwrap()
        .call(form_request(
            "/json/users/login",
            &format!("nonce={nonce}&response={hash}&app_key={APP_KEY}&user={USERNAME}"),
        ))
        .await
        .unwrap();

    let reply = body_json(resp).await;
    assert!(reply["userKey"].is_string());

    // The nonce is single-use: replaying the same exchange is rejected.
    let resp = ServiceExt::ready(&mut app)
        .await
        .unwrap()
        .call(form_request(
            "/json/users/login",
            &format!("nonce={nonce}&response={hash}&app_key={APP_KEY}&user={USERNAME}"),
        ))
        .await
        .unwrap();
    let reply = body_json(resp).await;
    assert_eq!(reply["error"], 48);
}

#[tokio::test]
async fn wrong_hash_is_rejected() {
    use tower::Service;

    let mut app = app().into_service();

    let resp = ServiceExt::ready(&mut app)
        .await
        .unwrap()
        .call(form_request(
            "/json/users/login",
            &format!("app_key={APP_KEY}&user={USERNAME}"),
        ))
        .await
        .unwrap();
    let nonce = body_json(resp).await["nonce"].as_str().unwrap().to_string();

    let resp = ServiceExt::ready(&mut app)
        .await
        .unwrap()
        .call(form_request(
            "/json/users/login",
            &format!("nonce={nonce}&response=bogus&app_key={APP_KEY}&user={USERNAME}"),
        ))
        .await
        .unwrap();

    let reply = body_json(resp).await;
    assert_eq!(reply["error"], 48);
    assert_eq!(reply["status"], "Digest mismatch");
}

// --- events/search ---

#[tokio::test]
async fn search_requires_a_known_app_key() {
    let app = app();
    let resp = app
        .oneshot(form_request(
            "/json/events/search",
            "app_key=forged&location=USA",
        ))
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::OK);
    let reply = body_json(resp).await;
    assert_eq!(reply["error"], 1);
    assert_eq!(reply["status"], "Invalid app key");
}

#[tokio::test]
async fn search_echoes_received_parameters() {
    let app = app();
    let resp = app
        .oneshot(form_request(
            "/json/events/search",
            &format!("location=USA&app_key={APP_KEY}&user={USERNAME}"),
        ))
        .await
        .unwrap();

    let reply = body_json(resp).await;
    assert_eq!(reply["total_items"], 1);
    assert_eq!(reply["search"]["location"], "USA");
    assert_eq!(reply["search"]["user"], USERNAME);
    assert_eq!(reply["events"][0]["title"], "Mock showcase");
}

#[tokio::test]
async fn search_rejects_an_unissued_user_key() {
    let app = app();
    let resp = app
        .oneshot(form_request(
            "/json/events/search",
            &format!("app_key={APP_KEY}&user_key=never-issued"),
        ))
        .await
        .unwrap();

    let reply = body_json(resp).await;
    assert_eq!(reply["error"], 2);
}

#[tokio::test]
async fn rest_search_returns_xml() {
    let app = app();
    let resp = app
        .oneshot(form_request(
            "/rest/events/search",
            &format!("location=Mexico&appKey={APP_KEY}"),
        ))
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::OK);
    let body = body_text(resp).await;
    assert!(body.starts_with("<search>"));
    assert!(body.contains("<location>Mexico</location>"));
}

#[tokio::test]
async fn rest_errors_use_the_error_envelope() {
    let app = app();
    let resp = app
        .oneshot(form_request("/rest/events/search", "appKey=forged"))
        .await
        .unwrap();

    let body = body_text(resp).await;
    assert!(body.starts_with(r#"<error string="Invalid_app_key">"#));
    assert!(body.contains("<description>"));
}

// --- dispatch ---

#[tokio::test]
async fn unknown_method_is_an_api_error_not_a_404() {
    let app = app();
    let resp = app
        .oneshot(form_request(
            "/json/venues/search",
            &format!("app_key={APP_KEY}"),
        ))
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::OK);
    let reply = body_json(resp).await;
    assert_eq!(reply["error"], 45);
}

#[tokio::test]
async fn unknown_format_is_a_404() {
    let app = app();
    let resp = app
        .oneshot(form_request("/yaml/events/search", "app_key=x"))
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}
