use axum::http::{self, Request, StatusCode};
use http_body_util::BodyExt;
use mock_server::{app, Echo, User, BINARY_ERROR_BODY};
use tower::ServiceExt;

async fn body_json<T: serde::de::DeserializeOwned>(response: axum::response::Response) -> T {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

async fn body_bytes(response: axum::response::Response) -> bytes::Bytes {
    response.into_body().collect().await.unwrap().to_bytes()
}

async fn body_text(response: axum::response::Response) -> String {
    String::from_utf8(body_bytes(response).await.to_vec()).unwrap()
}

fn json_request(method: &str, uri: &str, body: &str) -> Request<String> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header(http::header::CONTENT_TYPE, "application/json")
        .body(body.to_string())
        .unwrap()
}

fn form_request(method: &str, uri: &str, pairs: &[(&str, &str)]) -> Request<String> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header(http::header::CONTENT_TYPE, "application/x-www-form-urlencoded")
        .body(serde_urlencoded::to_string(pairs).unwrap())
        .unwrap()
}

fn empty_request(method: &str, uri: &str) -> Request<String> {
    Request::builder().method(method).uri(uri).body(String::new()).unwrap()
}

// --- JSON users ---

#[tokio::test]
async fn list_users_empty() {
    let resp = app().oneshot(empty_request("GET", "/api/users")).await.unwrap();

    assert_eq!(resp.status(), StatusCode::OK);
    let users: Vec<User> = body_json(resp).await;
    assert!(users.is_empty());
}

#[tokio::test]
async fn create_user_returns_201() {
    let resp = app()
        .oneshot(json_request("POST", "/api/users", r#"{"name":"joebob"}"#))
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::CREATED);
    let user: User = body_json(resp).await;
    assert_eq!(user.id, 1);
    assert_eq!(user.name, "joebob");
}

#[tokio::test]
async fn create_user_without_json_content_type_is_rejected() {
    let resp = app()
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/api/users")
                .body(r#"{"name":"joebob"}"#.to_string())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::UNSUPPORTED_MEDIA_TYPE);
}

#[tokio::test]
async fn put_user_stores_under_given_id() {
    let resp = app()
        .oneshot(json_request("PUT", "/api/users/9000", r#"{"name":"joebob"}"#))
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::OK);
    let user: User = body_json(resp).await;
    assert_eq!(user, User { id: 9000, name: "joebob".to_string() });
}

#[tokio::test]
async fn get_user_not_found_has_text_body() {
    let resp = app().oneshot(empty_request("GET", "/api/users/42")).await.unwrap();

    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    assert_eq!(body_text(resp).await, "user 42 not found");
}

#[tokio::test]
async fn get_user_bad_id_returns_400() {
    let resp = app().oneshot(empty_request("GET", "/api/users/joebob")).await.unwrap();

    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn delete_user_not_found() {
    let resp = app().oneshot(empty_request("DELETE", "/api/users/9000")).await.unwrap();

    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}

// --- pages ---

#[tokio::test]
async fn create_page_from_form() {
    let resp = app()
        .oneshot(form_request("POST", "/api/pages/users", &[("name", "joebob")]))
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(body_text(resp).await, "<html>hi there, joebob</html>");
}

#[tokio::test]
async fn create_page_with_blank_name_returns_422() {
    let resp = app()
        .oneshot(form_request("POST", "/api/pages/users", &[("name", " ")]))
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body_text(resp).await, "<p>name is required</p>");
}

// --- fixtures ---

#[tokio::test]
async fn echo_reports_request() {
    let resp = app()
        .oneshot(
            Request::builder()
                .method("PATCH")
                .uri("/api/echo/some/path?x=1")
                .header(http::header::ACCEPT, "text/html")
                .body("hello".to_string())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::OK);
    let echo: Echo = body_json(resp).await;
    assert_eq!(echo.method, "PATCH");
    assert_eq!(echo.uri, "/api/echo/some/path?x=1");
    assert_eq!(echo.accept.as_deref(), Some("text/html"));
    assert!(echo.content_type.is_none());
    assert_eq!(echo.body, "hello");
}

#[tokio::test]
async fn binary_returns_500_with_raw_bytes() {
    let resp = app().oneshot(empty_request("GET", "/api/binary")).await.unwrap();

    assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(&body_bytes(resp).await[..], BINARY_ERROR_BODY);
}

// --- full lifecycle ---

#[tokio::test]
async fn json_and_page_routes_share_state() {
    use tower::Service;

    let mut app = app().into_service();

    // create through the form route
    let resp = ServiceExt::ready(&mut app)
        .await
        .unwrap()
        .call(form_request("POST", "/api/pages/users", &[("name", "Joe Bob")]))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);

    // visible through the JSON route
    let resp = ServiceExt::ready(&mut app)
        .await
        .unwrap()
        .call(empty_request("GET", "/api/users/1"))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    let user: User = body_json(resp).await;
    assert_eq!(user.name, "Joe Bob");

    // rename through the form route
    let resp = ServiceExt::ready(&mut app)
        .await
        .unwrap()
        .call(form_request("PUT", "/api/pages/users/1", &[("name", "Tom")]))
        .await
        .unwrap();
    assert_eq!(body_text(resp).await, "<html>updated Tom</html>");

    // delete through the JSON route
    let resp = ServiceExt::ready(&mut app)
        .await
        .unwrap()
        .call(empty_request("DELETE", "/api/users/1"))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    let result: serde_json::Value = body_json(resp).await;
    assert_eq!(result["result"], "ok");

    // page is gone
    let resp = ServiceExt::ready(&mut app)
        .await
        .unwrap()
        .call(empty_request("GET", "/api/pages/users/1"))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}
