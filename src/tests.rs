use std::{collections::HashMap, io::Cursor, sync::Arc};

use async_trait::async_trait;
use axum::{
    body::{to_bytes, Body},
    http::{header, Request, Response, StatusCode},
    Router,
};
use tower::ServiceExt;
use wiremock::{
    matchers::{method, path},
    Mock, MockServer, ResponseTemplate,
};

use crate::{
    config::{AppConfig, DownloadConfig, InstagramConfig, PreviewConfig, ServerConfig, SessionConfig},
    handler,
    platform::{InstagramError, MediaScraper, PostKind, PostMetadata, PostNode, ProfileMetadata, StoryNode},
    state::AppState,
};

/// In-memory stand-in for Instagram.
#[derive(Default)]
pub struct FakeScraper {
    posts: HashMap<String, PostMetadata>,
    profiles: HashMap<String, (ProfileMetadata, Vec<StoryNode>)>,
}

impl FakeScraper {
    pub fn with_post(mut self, post: PostMetadata) -> Self {
        self.posts.insert(post.shortcode.clone(), post);
        self
    }

    pub fn with_profile(mut self, profile: ProfileMetadata, stories: Vec<StoryNode>) -> Self {
        self.profiles.insert(profile.username.to_lowercase(), (profile, stories));
        self
    }
}

#[async_trait]
impl MediaScraper for FakeScraper {
    fn platform_name(&self) -> &str {
        "Fake"
    }

    async fn fetch_post(&self, shortcode: &str) -> Result<PostMetadata, InstagramError> {
        self.posts
            .get(shortcode)
            .cloned()
            .ok_or_else(|| InstagramError::PostNotFound(shortcode.to_string()))
    }

    async fn fetch_profile(&self, username: &str) -> Result<ProfileMetadata, InstagramError> {
        self.profiles
            .get(username)
            .map(|(profile, _)| profile.clone())
            .ok_or_else(|| InstagramError::ProfileNotFound(username.to_string()))
    }

    async fn fetch_stories(&self, profile: &ProfileMetadata) -> Result<Vec<StoryNode>, InstagramError> {
        if profile.is_private {
            return Err(InstagramError::PrivateProfile(profile.username.clone()));
        }

        Ok(self
            .profiles
            .values()
            .find(|(p, _)| p.id == profile.id)
            .map(|(_, stories)| stories.clone())
            .unwrap_or_default())
    }
}

pub fn png_bytes(width: u32, height: u32) -> Vec<u8> {
    let image = image::RgbImage::from_pixel(width, height, image::Rgb([10, 120, 200]));
    let mut out = Cursor::new(Vec::new());
    image.write_to(&mut out, image::ImageFormat::Png).unwrap();
    out.into_inner()
}

pub fn test_config() -> AppConfig {
    AppConfig {
        server: ServerConfig {
            host: "127.0.0.1".into(),
            port: 0,
        },
        instagram: InstagramConfig::default(),
        session: SessionConfig {
            secret_key: "test-secret".into(),
            ttl_secs: 60,
            cache_capacity: 64,
        },
        preview: PreviewConfig {
            timeout_secs: 5,
            max_size: 200,
            max_bytes: 1024 * 1024,
        },
        download: DownloadConfig { timeout_secs: 5 },
    }
}

fn app(scraper: FakeScraper) -> Router {
    let state = AppState::with_scraper(&test_config(), Arc::new(scraper)).unwrap();
    handler::router(state)
}

fn session_cookie(response: &Response<Body>) -> String {
    response.headers()[header::SET_COOKIE]
        .to_str()
        .unwrap()
        .split(';')
        .next()
        .unwrap()
        .to_string()
}

fn post_fetch(form: &str, cookie: Option<&str>) -> Request<Body> {
    let mut builder = Request::builder()
        .method("POST")
        .uri("/fetch")
        .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded");
    if let Some(cookie) = cookie {
        builder = builder.header(header::COOKIE, cookie);
    }
    builder.body(Body::from(form.to_string())).unwrap()
}

fn get(uri: &str, cookie: &str) -> Request<Body> {
    Request::builder()
        .uri(uri)
        .header(header::COOKIE, cookie)
        .body(Body::empty())
        .unwrap()
}

async fn body_string(response: Response<Body>) -> String {
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    String::from_utf8_lossy(&bytes).into_owned()
}

async fn request_count(server: &MockServer) -> usize {
    server.received_requests().await.map(|r| r.len()).unwrap_or_default()
}

#[tokio::test]
async fn test_fetch_then_download_post_item() {
    let server = MockServer::start().await;
    let png = png_bytes(300, 300);
    Mock::given(method("GET"))
        .and(path("/media/photo.png"))
        .respond_with(ResponseTemplate::new(200).set_body_raw(png.clone(), "image/png"))
        .mount(&server)
        .await;

    let scraper = FakeScraper::default().with_post(PostMetadata {
        shortcode: "ABC123".into(),
        owner_username: "someone".into(),
        likes: Some(7),
        kind: PostKind::Image,
        caption: Some("hello".into()),
        nodes: vec![PostNode {
            is_video: false,
            video_url: None,
            display_url: Some(format!("{}/media/photo.png", server.uri())),
        }],
    });
    let app = app(scraper);

    let response = app
        .clone()
        .oneshot(post_fetch(
            "fetch_type=url&url=https%3A%2F%2Fwww.instagram.com%2Fp%2FABC123%2F",
            None,
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let cookie = session_cookie(&response);
    assert!(cookie.starts_with("gramsnap_session="));

    let html = body_string(response).await;
    assert!(html.contains("/download_item/ABC123/0"), "{}", html);
    assert!(html.contains("data:image/jpeg;base64,"));
    assert!(html.contains("Likes: 7"));

    let response = app
        .clone()
        .oneshot(get("/download_item/ABC123/0", &cookie))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(response.headers()[header::CONTENT_TYPE], "image/png");
    let disposition = response.headers()[header::CONTENT_DISPOSITION].to_str().unwrap().to_string();
    assert!(
        regex::Regex::new(r#"^attachment; filename="\d{4}\.jpg"$"#)
            .unwrap()
            .is_match(&disposition),
        "{}",
        disposition
    );
    let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    assert_eq!(body.to_vec(), png);

    let response = app
        .clone()
        .oneshot(get("/download_item/ABC123/1", &cookie))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    assert_eq!(body_string(response).await, "Error: Invalid item requested.");

    let before = request_count(&server).await;
    let response = app
        .clone()
        .oneshot(get("/download_item/ZZZ999/0", &cookie))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    assert_eq!(
        body_string(response).await,
        "Error: Download session expired. Please fetch the post info again."
    );
    assert_eq!(request_count(&server).await, before);

    for uri in ["/download_item/ABC123/-1", "/download_item/ABC123/first"] {
        let response = app.clone().oneshot(get(uri, &cookie)).await.unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND, "{}", uri);
    }
}

#[tokio::test]
async fn test_records_do_not_cross_sessions() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/media/a.png"))
        .respond_with(ResponseTemplate::new(200).set_body_raw(png_bytes(20, 20), "image/png"))
        .mount(&server)
        .await;

    let scraper = FakeScraper::default().with_post(PostMetadata {
        shortcode: "ABC123".into(),
        owner_username: "someone".into(),
        likes: None,
        kind: PostKind::Image,
        caption: None,
        nodes: vec![PostNode {
            is_video: false,
            video_url: None,
            display_url: Some(format!("{}/media/a.png", server.uri())),
        }],
    });
    let app = app(scraper);

    let response = app
        .clone()
        .oneshot(post_fetch("fetch_type=url&url=instagram.com%2Fp%2FABC123", None))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    // A different browser has no record for this post.
    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .uri("/download_item/ABC123/0")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_invalid_input_flashes_once() {
    let app = app(FakeScraper::default());

    let response = app
        .clone()
        .oneshot(post_fetch(
            "fetch_type=url&url=https%3A%2F%2Fwww.instagram.com%2Fsomeone%2F",
            None,
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(response.headers()[header::LOCATION], "/");
    let cookie = session_cookie(&response);

    let html = body_string(app.clone().oneshot(get("/", &cookie)).await.unwrap()).await;
    assert!(html.contains("Invalid Instagram Post/Reel URL format."), "{}", html);
    assert!(html.contains("flash-error"));

    let html = body_string(app.clone().oneshot(get("/", &cookie)).await.unwrap()).await;
    assert!(!html.contains("Invalid Instagram Post/Reel URL format."));

    for (form, message) in [
        ("fetch_type=stories&username=+", "Username cannot be empty."),
        ("fetch_type=highlights", "Invalid fetch type specified."),
        ("fetch_type=url&url=https%3A%2F%2Fwww.instagram.com%2Fp%2FGONE%2F", "Post &#x27;GONE&#x27; not found."),
    ] {
        let response = app.clone().oneshot(post_fetch(form, Some(&cookie))).await.unwrap();
        assert_eq!(response.status(), StatusCode::SEE_OTHER, "{}", form);

        let html = body_string(app.clone().oneshot(get("/", &cookie)).await.unwrap()).await;
        assert!(html.contains(message), "{} -> {}", form, html);
    }
}

#[tokio::test]
async fn test_zero_stories_redirects_with_info_and_writes_nothing() {
    let scraper = FakeScraper::default().with_profile(
        ProfileMetadata {
            id: "5".into(),
            username: "quiet".into(),
            is_private: false,
        },
        Vec::new(),
    );
    let app = app(scraper);

    let response = app
        .clone()
        .oneshot(post_fetch("fetch_type=stories&username=Quiet", None))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    let cookie = session_cookie(&response);

    let html = body_string(app.clone().oneshot(get("/", &cookie)).await.unwrap()).await;
    assert!(html.contains("flash-info"));
    assert!(html.contains("No active public stories found for user &#x27;quiet&#x27;."));

    let response = app
        .clone()
        .oneshot(get("/download_story_item/quiet/0", &cookie))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    assert_eq!(
        body_string(response).await,
        "Error: Story download session expired. Please fetch the username again."
    );
}

#[tokio::test]
async fn test_fetch_and_download_story_item() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/story/poster.png"))
        .respond_with(ResponseTemplate::new(200).set_body_raw(png_bytes(100, 180), "image/png"))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/story/clip.mp4"))
        .respond_with(ResponseTemplate::new(200).set_body_raw(b"mp4-bytes".to_vec(), "application/octet-stream"))
        .mount(&server)
        .await;

    let scraper = FakeScraper::default().with_profile(
        ProfileMetadata {
            id: "77".into(),
            username: "jo.hn_42".into(),
            is_private: false,
        },
        vec![StoryNode {
            is_video: true,
            video_url: Some(format!("{}/story/clip.mp4", server.uri())),
            image_url: Some(format!("{}/story/poster.png", server.uri())),
            taken_at: Some(chrono::Utc::now() - chrono::Duration::minutes(5)),
        }],
    );
    let app = app(scraper);

    let response = app
        .clone()
        .oneshot(post_fetch("fetch_type=stories&username=%40Jo.Hn_42", None))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let cookie = session_cookie(&response);
    let html = body_string(response).await;
    assert!(html.contains("/download_story_item/jo.hn_42/0"), "{}", html);
    assert!(html.contains("5 minutes ago"));

    let response = app
        .clone()
        .oneshot(get("/download_story_item/Jo.Hn_42/0", &cookie))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(response.headers()[header::CONTENT_TYPE], "video/mp4");
    let disposition = response.headers()[header::CONTENT_DISPOSITION].to_str().unwrap().to_string();
    assert!(
        regex::Regex::new(r#"^attachment; filename="jo\.hn_42_story_01_\d{4}\.mp4"$"#)
            .unwrap()
            .is_match(&disposition),
        "{}",
        disposition
    );
    assert_eq!(body_string(response).await, "mp4-bytes");
}
