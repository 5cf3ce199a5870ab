//! HTTP client wrapper - typed calls for every boundary endpoint.
//!
//! Every method takes the bearer token as an explicit `auth` parameter so the
//! one place that attaches credentials is `ApiClient::request`. Multipart
//! submissions never set a content-type themselves; reqwest supplies the
//! boundary-delimited value.

use std::path::Path;

use reqwest::multipart::{Form, Part};
use reqwest::Method;
use serde::de::DeserializeOwned;
use serde::Deserialize;

use crate::api::ApiError;
use crate::models::{
    AuthResponse, Channel, ChannelCreate, Comment, Profile, RatingUpdate, SubscriptionChange,
    SubscriptionStatus, Video, VideoUpload,
};

/// Shape of the backend's error payloads
#[derive(Deserialize)]
struct ErrorBody {
    message: Option<String>,
}

/// Client for the platform REST API
#[derive(Clone)]
pub struct ApiClient {
    http: reqwest::Client,
    base_url: String,
}

impl ApiClient {
    pub fn new(base_url: impl Into<String>) -> Self {
        ApiClient {
            http: create_client(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }

    /// Start a request, attaching the bearer token if one is provided
    fn request(&self, method: Method, path: &str, auth: Option<&str>) -> reqwest::RequestBuilder {
        let mut builder = self
            .http
            .request(method, format!("{}{}", self.base_url, path));
        if let Some(token) = auth {
            builder = builder.bearer_auth(token);
        }
        builder
    }

    /// Turn a non-success response into an `ApiError::Status`, extracting the
    /// backend's `message` field when the body is JSON
    async fn check(resp: reqwest::Response) -> Result<reqwest::Response, ApiError> {
        let status = resp.status();
        if status.is_success() {
            return Ok(resp);
        }
        let message = resp
            .text()
            .await
            .ok()
            .and_then(|body| serde_json::from_str::<ErrorBody>(&body).ok())
            .and_then(|body| body.message)
            .unwrap_or_default();
        Err(ApiError::Status {
            status: status.as_u16(),
            message,
        })
    }

    async fn send_json<T: DeserializeOwned>(
        builder: reqwest::RequestBuilder,
    ) -> Result<T, ApiError> {
        let resp = Self::check(builder.send().await?).await?;
        Ok(resp.json().await?)
    }

    async fn send_ok(builder: reqwest::RequestBuilder) -> Result<(), ApiError> {
        Self::check(builder.send().await?).await?;
        Ok(())
    }

    // ========================
    // Auth
    // ========================

    pub async fn login(&self, email: &str, password: &str) -> Result<AuthResponse, ApiError> {
        let body = serde_json::json!({ "email": email, "password": password });
        Self::send_json(self.request(Method::POST, "/auth/login", None).json(&body)).await
    }

    pub async fn signup(
        &self,
        username: &str,
        email: &str,
        password: &str,
    ) -> Result<AuthResponse, ApiError> {
        let body = serde_json::json!({
            "username": username,
            "email": email,
            "password": password,
        });
        Self::send_json(self.request(Method::POST, "/auth/signup", None).json(&body)).await
    }

    pub async fn profile(&self, auth: &str) -> Result<Profile, ApiError> {
        Self::send_json(self.request(Method::GET, "/auth/profile", Some(auth))).await
    }

    // ========================
    // Videos
    // ========================

    pub async fn list_videos(
        &self,
        category: Option<&str>,
        search: Option<&str>,
        auth: Option<&str>,
    ) -> Result<Vec<Video>, ApiError> {
        let mut params: Vec<(&str, &str)> = Vec::new();
        if let Some(category) = category {
            params.push(("category", category));
        }
        if let Some(search) = search {
            params.push(("search", search));
        }
        Self::send_json(self.request(Method::GET, "/videos", auth).query(&params)).await
    }

    pub async fn get_video(&self, video_id: &str, auth: Option<&str>) -> Result<Video, ApiError> {
        Self::send_json(self.request(Method::GET, &format!("/videos/{}", video_id), auth)).await
    }

    pub async fn upload_video(
        &self,
        upload: &VideoUpload,
        auth: Option<&str>,
    ) -> Result<(), ApiError> {
        let form = Form::new()
            .text("title", upload.title.clone())
            .text("description", upload.description.clone())
            .text("category", upload.category.clone())
            .text("channel", upload.channel_id.clone())
            .text("uploader", upload.uploader_id.clone())
            .part("thumbnailFile", file_part(&upload.thumbnail_path).await?)
            .part("videoFile", file_part(&upload.video_path).await?);
        Self::send_ok(
            self.request(Method::POST, "/videos/upload", auth)
                .multipart(form),
        )
        .await
    }

    pub async fn add_view(&self, video_id: &str, auth: Option<&str>) -> Result<(), ApiError> {
        Self::send_ok(self.request(Method::PUT, &format!("/videos/{}/view", video_id), auth)).await
    }

    pub async fn rate_video(
        &self,
        video_id: &str,
        like: bool,
        auth: Option<&str>,
    ) -> Result<RatingUpdate, ApiError> {
        let action = if like { "like" } else { "dislike" };
        Self::send_json(self.request(
            Method::PUT,
            &format!("/videos/{}/{}", video_id, action),
            auth,
        ))
        .await
    }

    pub async fn delete_video(&self, video_id: &str, auth: Option<&str>) -> Result<(), ApiError> {
        Self::send_ok(self.request(Method::DELETE, &format!("/videos/{}", video_id), auth)).await
    }

    // ========================
    // Channels
    // ========================

    pub async fn get_channel(
        &self,
        channel_id: &str,
        auth: Option<&str>,
    ) -> Result<Channel, ApiError> {
        Self::send_json(self.request(Method::GET, &format!("/channels/{}", channel_id), auth)).await
    }

    pub async fn channel_videos(
        &self,
        channel_id: &str,
        auth: Option<&str>,
    ) -> Result<Vec<Video>, ApiError> {
        Self::send_json(self.request(
            Method::GET,
            &format!("/channels/{}/videos", channel_id),
            auth,
        ))
        .await
    }

    pub async fn create_channel(
        &self,
        create: &ChannelCreate,
        auth: Option<&str>,
    ) -> Result<Channel, ApiError> {
        let form = Form::new()
            .text("channelName", create.channel_name.clone())
            .text("description", create.description.clone())
            .part("channelBanner", file_part(&create.banner_path).await?)
            .part("channelAvatar", file_part(&create.avatar_path).await?);
        Self::send_json(self.request(Method::POST, "/channels", auth).multipart(form)).await
    }

    // ========================
    // Subscriptions
    // ========================

    pub async fn subscription_status(
        &self,
        channel_id: &str,
        auth: Option<&str>,
    ) -> Result<SubscriptionStatus, ApiError> {
        Self::send_json(self.request(
            Method::GET,
            &format!("/subscriptions/{}/status", channel_id),
            auth,
        ))
        .await
    }

    pub async fn subscribe(
        &self,
        channel_id: &str,
        auth: Option<&str>,
    ) -> Result<SubscriptionChange, ApiError> {
        Self::send_json(self.request(
            Method::POST,
            &format!("/subscriptions/{}/subscribe", channel_id),
            auth,
        ))
        .await
    }

    pub async fn unsubscribe(
        &self,
        channel_id: &str,
        auth: Option<&str>,
    ) -> Result<SubscriptionChange, ApiError> {
        Self::send_json(self.request(
            Method::DELETE,
            &format!("/subscriptions/{}/unsubscribe", channel_id),
            auth,
        ))
        .await
    }

    // ========================
    // Comments
    // ========================

    pub async fn comments(
        &self,
        video_id: &str,
        auth: Option<&str>,
    ) -> Result<Vec<Comment>, ApiError> {
        Self::send_json(self.request(Method::GET, &format!("/comments/{}", video_id), auth)).await
    }

    pub async fn add_comment(
        &self,
        video_id: &str,
        text: &str,
        auth: Option<&str>,
    ) -> Result<Comment, ApiError> {
        let body = serde_json::json!({ "text": text });
        Self::send_json(
            self.request(Method::POST, &format!("/comments/{}", video_id), auth)
                .json(&body),
        )
        .await
    }

    pub async fn edit_comment(
        &self,
        comment_id: &str,
        text: &str,
        auth: Option<&str>,
    ) -> Result<(), ApiError> {
        let body = serde_json::json!({ "text": text });
        Self::send_ok(
            self.request(Method::PUT, &format!("/comments/{}", comment_id), auth)
                .json(&body),
        )
        .await
    }

    pub async fn delete_comment(&self, comment_id: &str, auth: Option<&str>) -> Result<(), ApiError> {
        Self::send_ok(self.request(Method::DELETE, &format!("/comments/{}", comment_id), auth))
            .await
    }
}

/// Read a local file into a multipart part, keeping its file name
async fn file_part(path: &Path) -> Result<Part, ApiError> {
    let bytes = tokio::fs::read(path).await.map_err(|source| ApiError::FileRead {
        path: path.display().to_string(),
        source,
    })?;
    let file_name = path
        .file_name()
        .map(|name| name.to_string_lossy().to_string())
        .unwrap_or_else(|| "file".to_string());
    Ok(Part::bytes(bytes).file_name(file_name))
}

/// Create an HTTP client with default configuration
fn create_client() -> reqwest::Client {
    use std::time::Duration;

    reqwest::Client::builder()
        .timeout(Duration::from_secs(30))
        .build()
        .unwrap_or_else(|_| reqwest::Client::new())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use wiremock::matchers::{header, method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[tokio::test]
    async fn test_bearer_header_attached_when_token_given() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/videos"))
            .and(header("authorization", "Bearer tok-123"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!([])))
            .expect(1)
            .mount(&server)
            .await;

        let api = ApiClient::new(server.uri());
        api.list_videos(None, None, Some("tok-123")).await.unwrap();
    }

    #[tokio::test]
    async fn test_no_bearer_header_without_token() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/videos"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!([])))
            .mount(&server)
            .await;

        let api = ApiClient::new(server.uri());
        api.list_videos(None, None, None).await.unwrap();

        let requests = server.received_requests().await.unwrap();
        assert!(requests[0].headers.get("authorization").is_none());
    }

    #[tokio::test]
    async fn test_category_and_search_query_params() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/videos"))
            .and(query_param("category", "Music"))
            .and(query_param("search", "lofi"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!([])))
            .expect(1)
            .mount(&server)
            .await;

        let api = ApiClient::new(server.uri());
        api.list_videos(Some("Music"), Some("lofi"), None).await.unwrap();
    }

    #[tokio::test]
    async fn test_rejection_message_extracted() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/auth/login"))
            .respond_with(
                ResponseTemplate::new(401)
                    .set_body_json(serde_json::json!({"message": "Invalid credentials"})),
            )
            .mount(&server)
            .await;

        let api = ApiClient::new(server.uri());
        let err = api.login("a@b.com", "x").await.unwrap_err();
        assert_eq!(err.status(), Some(401));
        assert_eq!(err.user_message("fallback"), "Invalid credentials");
    }

    #[tokio::test]
    async fn test_rejection_without_json_body_uses_fallback() {
        let server = MockServer::start().await;
        Mock::given(method("DELETE"))
            .and(path("/videos/v1"))
            .respond_with(ResponseTemplate::new(500).set_body_string("boom"))
            .mount(&server)
            .await;

        let api = ApiClient::new(server.uri());
        let err = api.delete_video("v1", Some("tok")).await.unwrap_err();
        assert_eq!(err.user_message("Failed to delete video."), "Failed to delete video.");
    }

    #[tokio::test]
    async fn test_json_submission_has_json_content_type() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/comments/v1"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "_id": "m1", "text": "hi"
            })))
            .mount(&server)
            .await;

        let api = ApiClient::new(server.uri());
        api.add_comment("v1", "hi", Some("tok")).await.unwrap();

        let requests = server.received_requests().await.unwrap();
        let content_type = requests[0].headers.get("content-type").unwrap();
        assert!(content_type.to_str().unwrap().starts_with("application/json"));
    }

    #[tokio::test]
    async fn test_multipart_lets_transport_set_boundary() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/channels"))
            .respond_with(ResponseTemplate::new(201).set_body_json(serde_json::json!({
                "_id": "c1", "channelName": "My Channel", "owner": "u1"
            })))
            .mount(&server)
            .await;

        let dir = tempfile::tempdir().unwrap();
        let banner = dir.path().join("banner.png");
        let avatar = dir.path().join("avatar.png");
        write!(std::fs::File::create(&banner).unwrap(), "png-bytes").unwrap();
        write!(std::fs::File::create(&avatar).unwrap(), "png-bytes").unwrap();

        let api = ApiClient::new(server.uri());
        let channel = api
            .create_channel(
                &ChannelCreate {
                    channel_name: "My Channel".into(),
                    description: "desc".into(),
                    banner_path: banner,
                    avatar_path: avatar,
                },
                Some("tok"),
            )
            .await
            .unwrap();
        assert_eq!(channel.id, "c1");

        // The content-type must be the transport-generated multipart header,
        // never a bare explicit value.
        let requests = server.received_requests().await.unwrap();
        let content_type = requests[0].headers.get("content-type").unwrap().to_str().unwrap();
        assert!(content_type.starts_with("multipart/form-data; boundary="));
        let body = String::from_utf8_lossy(&requests[0].body);
        assert!(body.contains("name=\"channelName\""));
        assert!(body.contains("name=\"channelAvatar\""));
    }
}
