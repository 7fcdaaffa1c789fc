use async_trait::async_trait;
use reqwest::{
    header::{self, HeaderMap, HeaderValue},
    Client, Response,
};
use serde_json::Value;
use std::time::Duration;

const USER_AGENT: &str =
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36";

#[async_trait]
pub trait HttpClient: Send + Sync {
    async fn get(&self, url: &str) -> Result<Response, reqwest::Error>;
    /// Same as `get`, with a per-request deadline that overrides the client default.
    async fn get_with_timeout(&self, url: &str, timeout: Duration) -> Result<Response, reqwest::Error>;
    async fn get_query(&self, url: &str, params: Option<Value>, headers: HeaderMap) -> Result<Response, reqwest::Error>;
}

#[derive(Clone)]
pub struct HttpService {
    client: Client,
}

impl HttpService {
    pub fn new(timeout: Duration) -> Result<Self, reqwest::Error> {
        let client = Self::create_client(Self::default_headers(), timeout)?;

        Ok(Self { client })
    }

    fn default_headers() -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(header::ACCEPT, HeaderValue::from_static("*/*"));
        headers.insert(header::ACCEPT_LANGUAGE, HeaderValue::from_static("en-US,en;q=0.9"));
        headers.insert(header::REFERER, HeaderValue::from_static("https://www.instagram.com/"));
        headers
    }

    fn create_client(headers: HeaderMap, timeout: Duration) -> Result<Client, reqwest::Error> {
        Client::builder()
            .timeout(timeout)
            .connect_timeout(Duration::from_secs(10))
            .cookie_store(true)
            .default_headers(headers)
            .user_agent(USER_AGENT)
            .build()
    }

    /// Client for long transfers: no overall deadline, only idle-read and connect limits.
    pub fn streaming(read_timeout: Duration) -> Result<Self, reqwest::Error> {
        let client = Client::builder()
            .read_timeout(read_timeout)
            .connect_timeout(read_timeout)
            .cookie_store(true)
            .default_headers(Self::default_headers())
            .user_agent(USER_AGENT)
            .build()?;

        Ok(Self { client })
    }
}

#[async_trait]
impl HttpClient for HttpService {
    async fn get(&self, url: &str) -> Result<Response, reqwest::Error> {
        self.client.get(url).send().await
    }

    async fn get_with_timeout(&self, url: &str, timeout: Duration) -> Result<Response, reqwest::Error> {
        self.client.get(url).timeout(timeout).send().await
    }

    async fn get_query(&self, url: &str, params: Option<Value>, headers: HeaderMap) -> Result<Response, reqwest::Error> {
        let mut builder = self.client.get(url).headers(headers);
        if let Some(params) = params {
            builder = builder.query(&params);
        }
        builder.send().await
    }
}
