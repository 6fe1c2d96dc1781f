use mapcore::doc::ProjectStatus;
use mapcore::geometry::{Geometry, LngLat};
use mapcore::persistence::NewDrawing;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::{TcpListener, TcpStream};
use tokio::task::JoinHandle;

use super::*;

// =============================================================
// Paths
// =============================================================

fn base() -> Url {
    parse_base_url("http://127.0.0.1:8000").unwrap()
}

#[test]
fn endpoint_joins_segments_under_base() {
    assert_eq!(endpoint(&base(), &["api", "projects", "7"]).as_str(), "http://127.0.0.1:8000/api/projects/7");
}

#[test]
fn endpoint_keeps_base_path_prefix() {
    let base = parse_base_url("https://maps.example.org/lit/").unwrap();
    assert_eq!(endpoint(&base, &["api", "projects"]).as_str(), "https://maps.example.org/lit/api/projects");
}

#[test]
fn district_label_is_one_encoded_segment() {
    let url = endpoint(&base(), &["api", "districts", "Lima, Callao", "projects"]);
    assert_eq!(url.path(), "/api/districts/Lima,%20Callao/projects");
    let url = endpoint(&base(), &["api", "districts", "A/B", "projects"]);
    assert_eq!(url.path(), "/api/districts/A%2FB/projects");
}

#[test]
fn base_url_must_parse_and_carry_a_path() {
    assert!(matches!(parse_base_url("not a url"), Err(ConfigError::InvalidBaseUrl { .. })));
    assert!(matches!(parse_base_url("mailto:ops@example.org"), Err(ConfigError::InvalidBaseUrl { .. })));
}

#[test]
fn decode_failure_is_decode_error() {
    let err = decode::<Project>("{\"id\":").unwrap_err();
    assert!(matches!(err, ApiError::Decode(_)));
}

// =============================================================
// Wire
// =============================================================

/// Accept one connection, answer with `status` and `body`, and return the raw request.
async fn serve_once(status: &'static str, body: &'static str) -> (String, JoinHandle<String>) {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let base = format!("http://{}", listener.local_addr().unwrap());
    let handle = tokio::spawn(async move {
        let (mut socket, _) = listener.accept().await.unwrap();
        let request = read_request(&mut socket).await;
        let response = format!(
            "HTTP/1.1 {status}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{body}",
            body.len()
        );
        socket.write_all(response.as_bytes()).await.unwrap();
        request
    });
    (base, handle)
}

async fn read_request(socket: &mut TcpStream) -> String {
    let mut buf = Vec::new();
    let mut chunk = [0u8; 1024];
    loop {
        let n = socket.read(&mut chunk).await.unwrap();
        if n == 0 {
            break;
        }
        buf.extend_from_slice(&chunk[..n]);
        let text = String::from_utf8_lossy(&buf);
        if let Some(end) = text.find("\r\n\r\n") {
            let length = text[..end]
                .lines()
                .find_map(|line| {
                    let (key, value) = line.split_once(':')?;
                    key.eq_ignore_ascii_case("content-length")
                        .then(|| value.trim().parse::<usize>().unwrap_or(0))
                })
                .unwrap_or(0);
            if buf.len() >= end + 4 + length {
                break;
            }
        }
    }
    String::from_utf8_lossy(&buf).into_owned()
}

fn api(base_url: String, token: Option<&str>) -> HttpProjectApi {
    let config = ClientConfig { base_url, token: token.map(str::to_owned), ..ClientConfig::default() };
    HttpProjectApi::new(&config).unwrap()
}

const PARK: &str = r#"{"id":7,"name":"Park","status":"active","districts":["Lima"],"drawings":[]}"#;

#[tokio::test]
async fn fetch_project_sends_bearer_token() {
    let (base, server) = serve_once("200 OK", PARK).await;
    let project = api(base, Some("secret")).fetch_project(7).await.unwrap();
    assert_eq!(project.name, "Park");
    assert_eq!(project.status, ProjectStatus::Active);

    let request = server.await.unwrap();
    assert!(request.starts_with("GET /api/projects/7 HTTP/1.1"));
    assert!(request.to_lowercase().contains("authorization: bearer secret"));
}

#[tokio::test]
async fn no_token_sends_no_authorization() {
    let (base, server) = serve_once("200 OK", "[]").await;
    let projects = api(base, None).list_projects().await.unwrap();
    assert!(projects.is_empty());
    assert!(!server.await.unwrap().to_lowercase().contains("authorization"));
}

#[tokio::test]
async fn district_projects_use_encoded_label() {
    let (base, server) = serve_once("200 OK", "[]").await;
    api(base, None).fetch_district_projects("Lima, Callao").await.unwrap();
    assert!(server.await.unwrap().starts_with("GET /api/districts/Lima,%20Callao/projects HTTP/1.1"));
}

#[tokio::test]
async fn forbidden_is_unauthorized() {
    let (base, _server) = serve_once("403 Forbidden", r#"{"detail":"nope"}"#).await;
    let err = api(base, None).list_projects().await.unwrap_err();
    assert_eq!(err, ApiError::Unauthorized { status: 403 });
}

#[tokio::test]
async fn not_found_keeps_detail() {
    let (base, _server) = serve_once("404 Not Found", r#"{"detail":"Project not found"}"#).await;
    let err = api(base, None).fetch_project(9).await.unwrap_err();
    assert!(err.is_not_found());
    assert!(err.to_string().contains("Project not found"));
}

#[tokio::test]
async fn malformed_body_is_decode_error() {
    let (base, _server) = serve_once("200 OK", r#"{"projects":1}"#).await;
    let err = api(base, None).list_projects().await.unwrap_err();
    assert!(matches!(err, ApiError::Decode(_)));
}

#[tokio::test]
async fn save_posts_replace_batch() {
    let (base, server) = serve_once("200 OK", "{}").await;
    let batch = DrawingBatch {
        drawings: vec![NewDrawing::from_geometry(Geometry::Point { coordinates: LngLat::new(-77.0, -12.0) })],
    };
    api(base, None).save_drawings(3, &batch).await.unwrap();

    let request = server.await.unwrap();
    assert!(request.starts_with("POST /api/projects/3/drawings/batch HTTP/1.1"));
    let body = &request[request.find("\r\n\r\n").unwrap() + 4..];
    let sent: Value = serde_json::from_str(body).unwrap();
    assert_eq!(sent["drawings"][0]["drawing_type"], "point");
    assert_eq!(sent["drawings"][0]["geojson"]["geometry"]["type"], "Point");
}

#[tokio::test]
async fn delete_accepts_empty_body() {
    let (base, server) = serve_once("200 OK", "").await;
    api(base, None).delete_project(3).await.unwrap();
    assert!(server.await.unwrap().starts_with("DELETE /api/projects/3 HTTP/1.1"));
}

#[tokio::test]
async fn refused_connection_is_transport_error() {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let base = format!("http://{}", listener.local_addr().unwrap());
    drop(listener);
    let err = api(base, None).list_projects().await.unwrap_err();
    assert!(matches!(err, ApiError::Transport(_)));
}
