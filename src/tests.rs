//! Integration tests for the StaffDesk dashboard.

use std::sync::Arc;

use axum::body::{to_bytes, Body};
use axum::http::{header, Request, StatusCode};
use reqwest::multipart::{Form, Part};
use reqwest::Client;
use tempfile::TempDir;
use tower::ServiceExt;

use crate::auth::StaticCredentials;
use crate::config::Config;
use crate::db::{init_store, ActivityStore};
use crate::models::ActivityRecord;
use crate::{create_router, AppState};

const JPEG_BYTES: &[u8] = &[0xFF, 0xD8, 0xFF, 0xE0, 0x00, 0x10, b'J', b'F', b'I', b'F'];

/// Test fixture for integration tests.
struct TestFixture {
    base_url: String,
    store: Arc<ActivityStore>,
    _temp_dir: TempDir,
}

impl TestFixture {
    async fn new() -> Self {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let state = test_state(&temp_dir).await;
        let store = state.store.clone();

        let app = create_router(state);

        // Bind to random port
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("Failed to bind");
        let addr = listener.local_addr().expect("Failed to get addr");
        let base_url = format!("http://{}", addr);

        // Spawn server
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        // Wait for server to start
        tokio::time::sleep(tokio::time::Duration::from_millis(100)).await;

        TestFixture {
            base_url,
            store,
            _temp_dir: temp_dir,
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// A browser with its own cookie jar, i.e. its own session.
    fn browser(&self) -> Client {
        Client::builder().cookie_store(true).build().unwrap()
    }

    async fn login(&self, client: &Client, username: &str, password: &str) -> String {
        client
            .post(self.url("/login"))
            .form(&[("username", username), ("password", password)])
            .send()
            .await
            .unwrap()
            .text()
            .await
            .unwrap()
    }

    async fn submit(&self, client: &Client, form: Form) -> (StatusCode, String) {
        let resp = client
            .post(self.url("/activity"))
            .multipart(form)
            .send()
            .await
            .unwrap();
        let status = StatusCode::from_u16(resp.status().as_u16()).unwrap();
        (status, resp.text().await.unwrap())
    }

    async fn navigate(&self, client: &Client, page: &str) -> reqwest::Response {
        client
            .post(self.url("/navigate"))
            .form(&[("page", page)])
            .send()
            .await
            .unwrap()
    }

    fn persisted(&self) -> Vec<ActivityRecord> {
        if !self.store.log_path().exists() {
            return Vec::new();
        }
        csv::Reader::from_path(self.store.log_path())
            .unwrap()
            .deserialize()
            .collect::<Result<Vec<ActivityRecord>, _>>()
            .unwrap()
    }
}

async fn test_state(temp_dir: &TempDir) -> AppState {
    let log_path = temp_dir.path().join("data").join("activity_log.csv");
    let photos_dir = temp_dir.path().join("data").join("photos");

    let store = Arc::new(
        init_store(&log_path, &photos_dir)
            .await
            .expect("Failed to init store"),
    );

    let config = Config {
        log_path,
        photos_dir,
        bind_addr: "127.0.0.1:0".parse().unwrap(),
        log_level: "warn".to_string(),
        max_upload_bytes: 1024 * 1024,
        session_idle_minutes: 30,
        cookie_secure: false,
    };

    AppState {
        store,
        credentials: Arc::new(StaticCredentials),
        config: Arc::new(config),
    }
}

fn photo_form(description: &str) -> Form {
    Form::new().text("description", description.to_string()).part(
        "image",
        Part::bytes(JPEG_BYTES.to_vec())
            .file_name("capture.jpg")
            .mime_str("image/jpeg")
            .unwrap(),
    )
}

#[tokio::test]
async fn test_health_check() {
    let fixture = TestFixture::new().await;

    let resp = fixture
        .browser()
        .get(fixture.url("/health"))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 200);
    assert_eq!(resp.text().await.unwrap(), "OK");
}

#[tokio::test]
async fn test_new_session_shows_login_page() {
    let fixture = TestFixture::new().await;

    let body = fixture
        .browser()
        .get(fixture.url("/"))
        .send()
        .await
        .unwrap()
        .text()
        .await
        .unwrap();

    assert!(body.contains("action=\"/login\""));
    assert!(!body.contains("class=\"sidebar\""));
}

#[tokio::test]
async fn test_login_rejects_bad_credentials() {
    let fixture = TestFixture::new().await;
    let client = fixture.browser();

    for (user, pass) in [("testuser", "wrong"), ("ghost", "password"), ("", "")] {
        let body = fixture.login(&client, user, pass).await;
        assert!(body.contains("Invalid username or password"));
        assert!(body.contains("flash flash-error"));
        assert!(body.contains("action=\"/login\""));
    }

    // Message is shown once
    let body = client
        .get(fixture.url("/"))
        .send()
        .await
        .unwrap()
        .text()
        .await
        .unwrap();
    assert!(!body.contains("Invalid username or password"));
}

#[tokio::test]
async fn test_login_lands_on_attendance() {
    let fixture = TestFixture::new().await;
    let client = fixture.browser();

    let body = fixture.login(&client, "testuser", "password").await;

    assert!(body.contains("class=\"sidebar\""));
    assert!(body.contains("Test User"));
    assert!(body.contains("value=\"Attendance\" class=\"nav-item active\""));
    assert_eq!(body.matches("aria-current=\"page\"").count(), 1);
    assert!(body.contains("employee"));
}

#[tokio::test]
async fn test_admin_login_shows_admin_role() {
    let fixture = TestFixture::new().await;
    let client = fixture.browser();

    let body = fixture.login(&client, "admin", "password").await;
    assert!(body.contains("Administrator"));
    assert!(body.contains("<div class=\"role\">admin</div>"));
}

#[tokio::test]
async fn test_navigation_between_pages() {
    let fixture = TestFixture::new().await;
    let client = fixture.browser();
    fixture.login(&client, "employee1", "password").await;

    for page in ["Reports", "Leave Requests", "Attendance", "Settings"] {
        let resp = fixture.navigate(&client, page).await;
        assert_eq!(resp.status(), 200);
        let body = resp.text().await.unwrap();
        assert!(body.contains(&format!("value=\"{}\" class=\"nav-item active\"", page)));
        assert_eq!(body.matches("aria-current=\"page\"").count(), 1);
    }

    let body = fixture.navigate(&client, "Reports").await.text().await.unwrap();
    assert!(body.contains("under construction"));
    assert!(!body.contains("action=\"/activity\""));
}

#[tokio::test]
async fn test_unknown_page_rejected() {
    let fixture = TestFixture::new().await;
    let client = fixture.browser();
    fixture.login(&client, "testuser", "password").await;

    let resp = fixture.navigate(&client, "Payroll").await;
    assert_eq!(resp.status(), 400);

    // Active page unchanged
    let body = client
        .get(fixture.url("/"))
        .send()
        .await
        .unwrap()
        .text()
        .await
        .unwrap();
    assert!(body.contains("value=\"Attendance\" class=\"nav-item active\""));
}

#[tokio::test]
async fn test_anonymous_navigation_redirects_to_login() {
    let fixture = TestFixture::new().await;

    let resp = fixture.navigate(&fixture.browser(), "Reports").await;
    assert_eq!(resp.status(), 200);
    let body = resp.text().await.unwrap();
    assert!(body.contains("action=\"/login\""));
}

#[tokio::test]
async fn test_anonymous_upload_writes_nothing() {
    let fixture = TestFixture::new().await;

    let (_, body) = fixture
        .submit(&fixture.browser(), photo_form("Visited client A"))
        .await;

    assert!(body.contains("action=\"/login\""));
    assert!(fixture.persisted().is_empty());
}

#[tokio::test]
async fn test_logout_returns_to_login() {
    let fixture = TestFixture::new().await;
    let client = fixture.browser();
    fixture.login(&client, "testuser", "password").await;
    fixture.navigate(&client, "Timesheets").await;

    let body = client
        .post(fixture.url("/logout"))
        .send()
        .await
        .unwrap()
        .text()
        .await
        .unwrap();
    assert!(body.contains("action=\"/login\""));
    assert!(!body.contains("class=\"sidebar\""));

    // Dashboard routes are gated again
    let body = fixture.navigate(&client, "Reports").await.text().await.unwrap();
    assert!(body.contains("action=\"/login\""));
}

#[tokio::test]
async fn test_submit_without_picture_warns() {
    let fixture = TestFixture::new().await;
    let client = fixture.browser();
    fixture.login(&client, "testuser", "password").await;

    let form = Form::new().text("description", "Visited client A");
    let (status, body) = fixture.submit(&client, form).await;
    assert_eq!(status, StatusCode::OK);
    assert!(body.contains("Please take a picture before submitting."));
    assert!(body.contains("flash flash-warning"));

    // A file input left empty arrives as a zero-length part
    let form = Form::new()
        .text("description", "Visited client A")
        .part("image", Part::bytes(Vec::new()).file_name(""));
    let (_, body) = fixture.submit(&client, form).await;
    assert!(body.contains("Please take a picture before submitting."));

    assert!(fixture.persisted().is_empty());
    assert_eq!(
        std::fs::read_dir(fixture.store.photos_dir()).unwrap().count(),
        0
    );
}

#[tokio::test]
async fn test_submit_blank_description_warns() {
    let fixture = TestFixture::new().await;
    let client = fixture.browser();
    fixture.login(&client, "testuser", "password").await;

    let (_, body) = fixture.submit(&client, photo_form("   ")).await;
    assert!(body.contains("Please provide a description for the activity."));
    assert!(fixture.persisted().is_empty());
    assert_eq!(
        std::fs::read_dir(fixture.store.photos_dir()).unwrap().count(),
        0
    );
}

#[tokio::test]
async fn test_activity_upload_scenario() {
    let fixture = TestFixture::new().await;
    let client = fixture.browser();

    let body = fixture.login(&client, "testuser", "password").await;
    assert!(body.contains("value=\"Attendance\" class=\"nav-item active\""));

    let (status, body) = fixture.submit(&client, photo_form("Visited client A")).await;
    assert_eq!(status, StatusCode::OK);
    assert!(body.contains("Activity photo and log uploaded!"));
    assert!(body.contains("flash flash-success"));
    assert!(body.contains("Visited client A"));

    let rows = fixture.persisted();
    assert_eq!(rows.len(), 1);
    let row = &rows[0];
    assert_eq!(row.username, "testuser");
    assert_eq!(row.description, "Visited client A");
    assert!(row.latitude.is_none() && row.longitude.is_none());

    // photos/testuser_activity_YYYYMMDD_HHMMSS.jpg
    let file_name = row
        .image_file
        .strip_prefix("photos/")
        .expect("image path under photos/");
    let stamp = file_name
        .strip_prefix("testuser_activity_")
        .and_then(|s| s.strip_suffix(".jpg"))
        .expect("file name pattern");
    assert_eq!(stamp.len(), 15);
    assert_eq!(&stamp[8..9], "_");
    assert!(stamp.chars().filter(|c| *c != '_').all(|c| c.is_ascii_digit()));
    assert_eq!(
        row.timestamp,
        format!(
            "{}-{}-{} {}:{}:{}",
            &stamp[0..4],
            &stamp[4..6],
            &stamp[6..8],
            &stamp[9..11],
            &stamp[11..13],
            &stamp[13..15]
        )
    );

    let saved = std::fs::read(fixture.store.photos_dir().join(file_name)).unwrap();
    assert_eq!(saved, JPEG_BYTES);

    // Photo is served to logged-in sessions
    let resp = client
        .get(fixture.url(&format!("/{}", row.image_file)))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 200);
    assert_eq!(resp.bytes().await.unwrap().as_ref(), JPEG_BYTES);

    // Success message is consumed by the render that showed it
    let body = client
        .get(fixture.url("/"))
        .send()
        .await
        .unwrap()
        .text()
        .await
        .unwrap();
    assert!(!body.contains("Activity photo and log uploaded!"));
}

#[tokio::test]
async fn test_log_header_and_row_count() {
    let fixture = TestFixture::new().await;

    for user in ["employee1", "employee2"] {
        let client = fixture.browser();
        fixture.login(&client, user, "password").await;
        fixture.submit(&client, photo_form("Morning check-in")).await;
    }

    let text = std::fs::read_to_string(fixture.store.log_path()).unwrap();
    let mut lines = text.lines();
    assert_eq!(
        lines.next(),
        Some("Username,Timestamp,Description,ImageFile,Latitude,Longitude")
    );
    assert_eq!(lines.count(), 2);
}

#[tokio::test]
async fn test_new_session_sees_persisted_activity() {
    let fixture = TestFixture::new().await;

    let employee = fixture.browser();
    fixture.login(&employee, "testuser", "password").await;
    fixture.submit(&employee, photo_form("Visited client A")).await;

    // A later session hydrates from the log
    let admin = fixture.browser();
    let body = fixture.login(&admin, "admin", "password").await;
    assert!(body.contains("Visited client A"));

    // Employees only see their own rows
    let other = fixture.browser();
    let body = fixture.login(&other, "employee2", "password").await;
    assert!(!body.contains("Visited client A"));
    assert!(body.contains("No activity recorded yet."));
}

#[tokio::test]
async fn test_open_session_sees_rows_added_later() {
    let fixture = TestFixture::new().await;

    // Admin session starts before the row exists
    let admin = fixture.browser();
    let body = fixture.login(&admin, "admin", "password").await;
    assert!(!body.contains("Visited client A"));

    let employee = fixture.browser();
    fixture.login(&employee, "employee1", "password").await;
    fixture.submit(&employee, photo_form("Visited client A")).await;

    let body = admin
        .get(fixture.url("/"))
        .send()
        .await
        .unwrap()
        .text()
        .await
        .unwrap();
    assert!(body.contains("Visited client A"));
    assert!(body.contains("employee1"));

    // The admin's own submit keeps the other row too
    let (_, body) = fixture.submit(&admin, photo_form("Audit visit")).await;
    assert!(body.contains("Visited client A"));
    assert!(body.contains("Audit visit"));
}

#[tokio::test]
async fn test_anonymous_visits_set_no_cookie() {
    let fixture = TestFixture::new().await;
    let client = Client::new();

    for _ in 0..5 {
        let resp = client.get(fixture.url("/")).send().await.unwrap();
        assert_eq!(resp.status(), 200);
        assert!(resp.headers().get(header::SET_COOKIE).is_none());
    }

    let resp = client
        .post(fixture.url("/login"))
        .form(&[("username", "testuser"), ("password", "wrong")])
        .send()
        .await
        .unwrap();
    assert!(resp.headers().get(header::SET_COOKIE).is_none());
    assert!(resp.text().await.unwrap().contains("Invalid username or password"));
}

#[tokio::test]
async fn test_logout_drops_session_cookie() {
    let fixture = TestFixture::new().await;
    let client = Client::builder()
        .redirect(reqwest::redirect::Policy::none())
        .build()
        .unwrap();

    let resp = client
        .post(fixture.url("/login"))
        .form(&[("username", "testuser"), ("password", "password")])
        .send()
        .await
        .unwrap();
    let cookie = session_cookie(resp.headers()).expect("login sets a session cookie");

    let resp = client
        .post(fixture.url("/logout"))
        .header(header::COOKIE, &cookie)
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::SEE_OTHER.as_u16());

    // The old id no longer opens the dashboard
    let resp = client
        .post(fixture.url("/navigate"))
        .header(header::COOKIE, &cookie)
        .form(&[("page", "Reports")])
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::SEE_OTHER.as_u16());
}

#[tokio::test]
async fn test_photos_require_login() {
    let fixture = TestFixture::new().await;

    let employee = fixture.browser();
    fixture.login(&employee, "testuser", "password").await;
    fixture.submit(&employee, photo_form("Visited client A")).await;
    let image_file = fixture.persisted()[0].image_file.clone();

    let body = fixture
        .browser()
        .get(fixture.url(&format!("/{}", image_file)))
        .send()
        .await
        .unwrap()
        .text()
        .await
        .unwrap();
    assert!(body.contains("action=\"/login\""));
}

#[tokio::test]
async fn test_router_redirects_anonymous_navigation() {
    let temp_dir = TempDir::new().unwrap();
    let app = create_router(test_state(&temp_dir).await);

    let request = Request::builder()
        .method("POST")
        .uri("/navigate")
        .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
        .body(Body::from("page=Reports"))
        .unwrap();

    let resp = app.oneshot(request).await.unwrap();
    assert_eq!(resp.status(), StatusCode::SEE_OTHER);
    assert_eq!(resp.headers().get(header::LOCATION).unwrap(), "/");
}

#[tokio::test]
async fn test_router_health_check() {
    let temp_dir = TempDir::new().unwrap();
    let app = create_router(test_state(&temp_dir).await);

    let request = Request::builder()
        .uri("/health")
        .body(Body::empty())
        .unwrap();

    let resp = app.oneshot(request).await.unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    let body = to_bytes(resp.into_body(), usize::MAX)
        .await
        .unwrap();
    assert_eq!(&body[..], b"OK");
}

#[tokio::test]
async fn test_router_oversized_upload_shows_message() {
    let temp_dir = TempDir::new().unwrap();
    let state = test_state(&temp_dir).await;
    let limit = state.config.max_upload_bytes;
    let store = state.store.clone();
    let app = create_router(state);

    let request = Request::builder()
        .method("POST")
        .uri("/login")
        .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
        .body(Body::from("username=testuser&password=password"))
        .unwrap();
    let resp = app.clone().oneshot(request).await.unwrap();
    assert_eq!(resp.status(), StatusCode::SEE_OTHER);
    let cookie = session_cookie(resp.headers()).unwrap();

    let mut body = Vec::new();
    body.extend_from_slice(
        b"--XBOUNDARY\r\nContent-Disposition: form-data; name=\"description\"\r\n\r\nBig photo\r\n",
    );
    body.extend_from_slice(
        b"--XBOUNDARY\r\nContent-Disposition: form-data; name=\"image\"; filename=\"big.jpg\"\r\n\
          Content-Type: image/jpeg\r\n\r\n",
    );
    body.extend(std::iter::repeat(0xFFu8).take(limit + 1024));
    body.extend_from_slice(b"\r\n--XBOUNDARY--\r\n");

    let request = Request::builder()
        .method("POST")
        .uri("/activity")
        .header(header::CONTENT_TYPE, "multipart/form-data; boundary=XBOUNDARY")
        .header(header::COOKIE, &cookie)
        .body(Body::from(body))
        .unwrap();
    let resp = app.clone().oneshot(request).await.unwrap();
    assert_eq!(resp.status(), StatusCode::SEE_OTHER);
    assert_eq!(resp.headers().get(header::LOCATION).unwrap(), "/");

    let request = Request::builder()
        .uri("/")
        .header(header::COOKIE, &cookie)
        .body(Body::empty())
        .unwrap();
    let resp = app.oneshot(request).await.unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    let page = to_bytes(resp.into_body(), usize::MAX).await.unwrap();
    let page = String::from_utf8(page.to_vec()).unwrap();
    assert!(page.contains("Error saving activity: Invalid upload"));
    assert!(page.contains("class=\"sidebar\""));
    assert!(store.load().await.unwrap().is_empty());
}

/// The `name=value` pair from a response's session cookie.
fn session_cookie(headers: &axum::http::HeaderMap) -> Option<String> {
    let value = headers.get(header::SET_COOKIE)?.to_str().ok()?;
    value.split(';').next().map(str::to_owned)
}
