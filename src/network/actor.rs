//! Network actor - owns the session store and runs all backend I/O.
//!
//! Session-mutating commands (login, register, profile refresh, logout) are
//! handled inline because they need `&mut SessionStore`. Everything else is
//! spawned onto a `JoinSet` with a cloned client and a token snapshot, so a
//! slow fetch never blocks a login.

use tokio::sync::mpsc;
use tokio::task::JoinSet;

use crate::api::ApiClient;
use crate::auth::SessionStore;
use crate::messages::{NetworkCommand, NetworkResponse};
use crate::models::{ChannelCreate, VideoUpload};

/// Network actor that processes backend commands from the app actor
pub struct NetworkActor {
    api: ApiClient,
    session: SessionStore,
    response_tx: mpsc::UnboundedSender<NetworkResponse>,
    fetches: JoinSet<()>,
}

impl NetworkActor {
    pub fn new(
        api: ApiClient,
        session: SessionStore,
        response_tx: mpsc::UnboundedSender<NetworkResponse>,
    ) -> Self {
        NetworkActor {
            api,
            session,
            response_tx,
            fetches: JoinSet::new(),
        }
    }

    /// Run the network actor message loop
    pub async fn run(mut self, mut cmd_rx: mpsc::UnboundedReceiver<NetworkCommand>) {
        loop {
            tokio::select! {
                biased;

                cmd = cmd_rx.recv() => {
                    match cmd {
                        Some(NetworkCommand::Shutdown) | None => {
                            self.fetches.abort_all();
                            break;
                        }
                        Some(cmd) => self.handle_command(cmd).await,
                    }
                }

                // Reap finished fetch tasks
                Some(joined) = self.fetches.join_next(), if !self.fetches.is_empty() => {
                    if let Err(err) = joined {
                        if !err.is_cancelled() {
                            tracing::error!(error = %err, "fetch task panicked");
                        }
                    }
                }
            }
        }
        tracing::info!("network actor stopped");
    }

    async fn handle_command(&mut self, cmd: NetworkCommand) {
        match cmd {
            // ================================================================
            // Session commands - handled inline, they mutate the store
            // ================================================================
            NetworkCommand::Login { email, password } => {
                tracing::info!("logging in");
                match self.session.login(&self.api, &email, &password).await {
                    Ok(()) => self.send_session(),
                    Err(err) => {
                        tracing::warn!(error = %err, "login failed");
                        let _ = self.response_tx.send(NetworkResponse::AuthFailed {
                            message: err
                                .user_message("Authentication failed. Please try again."),
                        });
                    }
                }
            }
            NetworkCommand::Register {
                username,
                email,
                password,
            } => {
                tracing::info!("registering new account");
                match self
                    .session
                    .register(&self.api, &username, &email, &password)
                    .await
                {
                    Ok(()) => self.send_session(),
                    Err(err) => {
                        tracing::warn!(error = %err, "registration failed");
                        let _ = self.response_tx.send(NetworkResponse::AuthFailed {
                            message: err
                                .user_message("Authentication failed. Please try again."),
                        });
                    }
                }
            }
            NetworkCommand::RefreshProfile => {
                self.session.refresh_profile(&self.api).await;
                self.send_session();
            }
            NetworkCommand::Logout => {
                tracing::info!("logging out");
                self.session.logout();
                self.send_session();
            }

            // ================================================================
            // Fetches and mutations - spawned with a token snapshot
            // ================================================================
            NetworkCommand::FetchVideos { category, search } => {
                self.spawn(move |ctx| async move {
                    fetch_videos(ctx, category, search).await
                });
            }
            NetworkCommand::OpenVideo { video_id } => {
                self.spawn(move |ctx| async move { open_video(ctx, video_id).await });
            }
            NetworkCommand::FetchChannel { channel_id } => {
                self.spawn(move |ctx| async move { fetch_channel(ctx, channel_id).await });
            }
            NetworkCommand::RateVideo { video_id, like } => {
                self.spawn(move |ctx| async move { rate_video(ctx, video_id, like).await });
            }
            NetworkCommand::ToggleSubscription {
                channel_id,
                subscribed,
            } => {
                self.spawn(move |ctx| async move {
                    toggle_subscription(ctx, channel_id, subscribed).await
                });
            }
            NetworkCommand::AddComment { video_id, text } => {
                self.spawn(move |ctx| async move { add_comment(ctx, video_id, text).await });
            }
            NetworkCommand::EditComment { comment_id, text } => {
                self.spawn(move |ctx| async move { edit_comment(ctx, comment_id, text).await });
            }
            NetworkCommand::DeleteComment { comment_id } => {
                self.spawn(move |ctx| async move { delete_comment(ctx, comment_id).await });
            }
            NetworkCommand::DeleteVideo { video_id } => {
                self.spawn(move |ctx| async move { delete_video(ctx, video_id).await });
            }
            NetworkCommand::UploadVideo(upload) => {
                self.spawn(move |ctx| async move { upload_video(ctx, upload).await });
            }
            NetworkCommand::CreateChannel(create) => {
                self.spawn(move |ctx| async move { create_channel(ctx, create).await });
            }

            NetworkCommand::Shutdown => unreachable!("handled by the run loop"),
        }
    }

    /// Current session state as a response message
    fn send_session(&self) {
        let _ = self.response_tx.send(NetworkResponse::Session {
            identity: self.session.identity().cloned(),
        });
    }

    /// Spawn a fetch with a snapshot of the client and session
    fn spawn<F, Fut>(&mut self, make: F)
    where
        F: FnOnce(FetchContext) -> Fut,
        Fut: std::future::Future<Output = NetworkResponse> + Send + 'static,
    {
        let ctx = FetchContext {
            api: self.api.clone(),
            token: self.session.token().map(str::to_string),
            user_id: self.session.identity().map(|i| i.user_id.clone()),
        };
        let response_tx = self.response_tx.clone();
        let fut = make(ctx);
        self.fetches.spawn(async move {
            let _ = response_tx.send(fut.await);
        });
    }
}

/// Everything a spawned fetch needs, snapshotted at spawn time
#[derive(Clone)]
struct FetchContext {
    api: ApiClient,
    token: Option<String>,
    user_id: Option<String>,
}

impl FetchContext {
    fn auth(&self) -> Option<&str> {
        self.token.as_deref()
    }
}

async fn fetch_videos(
    ctx: FetchContext,
    category: Option<String>,
    search: Option<String>,
) -> NetworkResponse {
    tracing::debug!(?category, ?search, "fetching video feed");
    match ctx
        .api
        .list_videos(category.as_deref(), search.as_deref(), ctx.auth())
        .await
    {
        Ok(videos) => NetworkResponse::Videos(videos),
        Err(err) => {
            tracing::warn!(error = %err, "video feed fetch failed");
            NetworkResponse::VideosFailed {
                message: err.user_message("Failed to load videos. Please try again later."),
            }
        }
    }
}

/// The watch-page load: video, its channel, subscription status, a view
/// increment, then the comment thread. Any hard failure aborts the whole
/// open; a failed subscription-status probe just reads as "not subscribed".
async fn open_video(ctx: FetchContext, video_id: String) -> NetworkResponse {
    tracing::debug!(video_id, "opening video");
    let mut video = match ctx.api.get_video(&video_id, ctx.auth()).await {
        Ok(video) => video,
        Err(err) => {
            tracing::warn!(video_id, error = %err, "video fetch failed");
            let not_found = err.status() == Some(404);
            let message = if not_found {
                "Error loading video. It might not exist.".to_string()
            } else {
                err.user_message("Failed to load video or comments. Please try again.")
            };
            return NetworkResponse::VideoOpenFailed { message, not_found };
        }
    };

    let mut channel = None;
    let mut is_subscribed = false;
    if let Some(channel_ref) = video.channel.clone() {
        match ctx.api.get_channel(&channel_ref.id, ctx.auth()).await {
            Ok(loaded) => channel = Some(loaded),
            Err(err) => {
                tracing::warn!(channel_id = %channel_ref.id, error = %err, "channel fetch failed");
                return NetworkResponse::VideoOpenFailed {
                    message: err
                        .user_message("Failed to load video or comments. Please try again."),
                    not_found: false,
                };
            }
        }

        if let Some(user_id) = ctx.user_id.as_deref() {
            let owner_id = channel_ref.owner.as_ref().map(|owner| owner.id());
            if owner_id == Some(user_id) {
                // Owners read as subscribed to their own channel
                is_subscribed = true;
            } else {
                is_subscribed = match ctx
                    .api
                    .subscription_status(&channel_ref.id, ctx.auth())
                    .await
                {
                    Ok(status) => status.is_subscribed,
                    Err(err) => {
                        tracing::warn!(error = %err, "subscription status probe failed");
                        false
                    }
                };
            }
        }
    }

    // Count the view unless the viewer uploaded this video. Anonymous
    // viewers always count.
    let viewer_is_uploader =
        ctx.user_id.is_some() && video.uploader_id() == ctx.user_id.as_deref();
    if !viewer_is_uploader {
        if let Err(err) = ctx.api.add_view(&video_id, ctx.auth()).await {
            tracing::warn!(error = %err, "view increment failed");
        } else {
            video.views += 1;
        }
    }

    let comments = match ctx.api.comments(&video_id, ctx.auth()).await {
        Ok(comments) => comments,
        Err(err) => {
            tracing::warn!(error = %err, "comments fetch failed");
            return NetworkResponse::VideoOpenFailed {
                message: err.user_message("Failed to load video or comments. Please try again."),
                not_found: false,
            };
        }
    };

    NetworkResponse::VideoOpened {
        video: Box::new(video),
        channel,
        comments,
        is_subscribed,
    }
}

async fn fetch_channel(ctx: FetchContext, channel_id: String) -> NetworkResponse {
    tracing::debug!(channel_id, "fetching channel");
    let channel = match ctx.api.get_channel(&channel_id, ctx.auth()).await {
        Ok(channel) => channel,
        Err(err) => {
            tracing::warn!(channel_id, error = %err, "channel fetch failed");
            return NetworkResponse::ChannelFailed {
                message: err.user_message("Failed to load channel. Please try again."),
            };
        }
    };

    let videos = match ctx.api.channel_videos(&channel_id, ctx.auth()).await {
        Ok(videos) => videos,
        Err(err) => {
            tracing::warn!(channel_id, error = %err, "channel videos fetch failed");
            return NetworkResponse::ChannelFailed {
                message: err.user_message("Failed to load channel. Please try again."),
            };
        }
    };

    let mut is_subscribed = false;
    if let Some(user_id) = ctx.user_id.as_deref() {
        if channel.owner_id() == user_id {
            is_subscribed = true;
        } else if let Ok(status) = ctx.api.subscription_status(&channel_id, ctx.auth()).await {
            is_subscribed = status.is_subscribed;
        }
    }

    NetworkResponse::ChannelLoaded {
        channel: Box::new(channel),
        videos,
        is_subscribed,
    }
}

async fn rate_video(ctx: FetchContext, video_id: String, like: bool) -> NetworkResponse {
    match ctx.api.rate_video(&video_id, like, ctx.auth()).await {
        Ok(update) => NetworkResponse::Rated {
            video_id,
            likes: update.likes,
            dislikes: update.dislikes,
        },
        Err(err) => {
            tracing::warn!(video_id, like, error = %err, "rating failed");
            NetworkResponse::ActionFailed {
                message: err.user_message(if like {
                    "Failed to like video."
                } else {
                    "Failed to dislike video."
                }),
            }
        }
    }
}

async fn toggle_subscription(
    ctx: FetchContext,
    channel_id: String,
    subscribed: bool,
) -> NetworkResponse {
    let result = if subscribed {
        ctx.api.unsubscribe(&channel_id, ctx.auth()).await
    } else {
        ctx.api.subscribe(&channel_id, ctx.auth()).await
    };
    match result {
        Ok(change) => {
            let is_subscribed = change.is_subscribed.unwrap_or(!subscribed);
            let message = change.message.unwrap_or_else(|| {
                if is_subscribed {
                    "Subscribed!".to_string()
                } else {
                    "Unsubscribed.".to_string()
                }
            });
            NetworkResponse::SubscriptionChanged {
                channel_id,
                is_subscribed,
                subscriber_count: change.subscriber_count,
                message,
            }
        }
        Err(err) => {
            tracing::warn!(channel_id, error = %err, "subscription toggle failed");
            NetworkResponse::ActionFailed {
                message: err.user_message("Failed to change subscription status."),
            }
        }
    }
}

async fn add_comment(ctx: FetchContext, video_id: String, text: String) -> NetworkResponse {
    match ctx.api.add_comment(&video_id, &text, ctx.auth()).await {
        Ok(comment) => NetworkResponse::CommentAdded(comment),
        Err(err) => {
            tracing::warn!(video_id, error = %err, "add comment failed");
            NetworkResponse::ActionFailed {
                message: err.user_message("Failed to add comment."),
            }
        }
    }
}

async fn edit_comment(ctx: FetchContext, comment_id: String, text: String) -> NetworkResponse {
    match ctx.api.edit_comment(&comment_id, &text, ctx.auth()).await {
        Ok(()) => NetworkResponse::CommentEdited { comment_id, text },
        Err(err) => {
            tracing::warn!(comment_id, error = %err, "edit comment failed");
            NetworkResponse::ActionFailed {
                message: err.user_message("Failed to edit comment."),
            }
        }
    }
}

async fn delete_comment(ctx: FetchContext, comment_id: String) -> NetworkResponse {
    match ctx.api.delete_comment(&comment_id, ctx.auth()).await {
        Ok(()) => NetworkResponse::CommentDeleted { comment_id },
        Err(err) => {
            tracing::warn!(comment_id, error = %err, "delete comment failed");
            NetworkResponse::ActionFailed {
                message: err.user_message("Failed to delete comment."),
            }
        }
    }
}

async fn delete_video(ctx: FetchContext, video_id: String) -> NetworkResponse {
    match ctx.api.delete_video(&video_id, ctx.auth()).await {
        Ok(()) => NetworkResponse::VideoDeleted { video_id },
        Err(err) => {
            tracing::warn!(video_id, error = %err, "delete video failed");
            NetworkResponse::ActionFailed {
                message: err.user_message("Failed to delete video."),
            }
        }
    }
}

async fn upload_video(ctx: FetchContext, upload: VideoUpload) -> NetworkResponse {
    tracing::info!(title = %upload.title, "uploading video");
    let channel_id = upload.channel_id.clone();
    match ctx.api.upload_video(&upload, ctx.auth()).await {
        Ok(()) => NetworkResponse::VideoUploaded { channel_id },
        Err(err) => {
            tracing::warn!(error = %err, "video upload failed");
            NetworkResponse::ActionFailed {
                message: err.user_message("Failed to upload video. Please try again."),
            }
        }
    }
}

async fn create_channel(ctx: FetchContext, create: ChannelCreate) -> NetworkResponse {
    tracing::info!(name = %create.channel_name, "creating channel");
    match ctx.api.create_channel(&create, ctx.auth()).await {
        Ok(channel) => NetworkResponse::ChannelCreated(Box::new(channel)),
        Err(err) => {
            tracing::warn!(error = %err, "channel creation failed");
            NetworkResponse::ActionFailed {
                message: err.user_message("Failed to create channel. Please try again."),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::TokenStore;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn ctx(api: ApiClient, user_id: Option<&str>) -> FetchContext {
        FetchContext {
            api,
            token: user_id.map(|_| "tok".to_string()),
            user_id: user_id.map(str::to_string),
        }
    }

    fn video_json(uploader: &str) -> serde_json::Value {
        serde_json::json!({
            "_id": "v1",
            "title": "T",
            "views": 10,
            "uploader": {"_id": uploader, "username": "up"},
            "channel": {"_id": "c1", "owner": "u-owner"}
        })
    }

    fn channel_json() -> serde_json::Value {
        serde_json::json!({
            "_id": "c1", "channelName": "C", "owner": "u-owner", "subscribers": 3
        })
    }

    async fn mount_watch_page(server: &MockServer, uploader: &str) {
        Mock::given(method("GET"))
            .and(path("/videos/v1"))
            .respond_with(ResponseTemplate::new(200).set_body_json(video_json(uploader)))
            .mount(server)
            .await;
        Mock::given(method("GET"))
            .and(path("/channels/c1"))
            .respond_with(ResponseTemplate::new(200).set_body_json(channel_json()))
            .mount(server)
            .await;
        Mock::given(method("GET"))
            .and(path("/comments/v1"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!([])))
            .mount(server)
            .await;
        Mock::given(method("GET"))
            .and(path("/subscriptions/c1/status"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(serde_json::json!({"isSubscribed": true})),
            )
            .mount(server)
            .await;
    }

    #[tokio::test]
    async fn test_open_video_counts_view_for_other_viewers() {
        let server = MockServer::start().await;
        mount_watch_page(&server, "someone-else").await;
        Mock::given(method("PUT"))
            .and(path("/videos/v1/view"))
            .respond_with(ResponseTemplate::new(200))
            .expect(1)
            .mount(&server)
            .await;

        let api = ApiClient::new(server.uri());
        let resp = open_video(ctx(api, Some("u1")), "v1".to_string()).await;
        match resp {
            NetworkResponse::VideoOpened {
                video,
                is_subscribed,
                ..
            } => {
                // local bump after the successful view call
                assert_eq!(video.views, 11);
                assert!(is_subscribed);
            }
            other => panic!("unexpected response: {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_open_video_skips_view_for_uploader() {
        let server = MockServer::start().await;
        mount_watch_page(&server, "u1").await;
        Mock::given(method("PUT"))
            .and(path("/videos/v1/view"))
            .respond_with(ResponseTemplate::new(200))
            .expect(0)
            .mount(&server)
            .await;

        let api = ApiClient::new(server.uri());
        let resp = open_video(ctx(api, Some("u1")), "v1".to_string()).await;
        match resp {
            NetworkResponse::VideoOpened { video, .. } => assert_eq!(video.views, 10),
            other => panic!("unexpected response: {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_open_video_anonymous_counts_view() {
        let server = MockServer::start().await;
        mount_watch_page(&server, "u1").await;
        Mock::given(method("PUT"))
            .and(path("/videos/v1/view"))
            .respond_with(ResponseTemplate::new(200))
            .expect(1)
            .mount(&server)
            .await;

        let api = ApiClient::new(server.uri());
        let resp = open_video(ctx(api, None), "v1".to_string()).await;
        match resp {
            NetworkResponse::VideoOpened {
                video,
                is_subscribed,
                ..
            } => {
                assert_eq!(video.views, 11);
                assert!(!is_subscribed);
            }
            other => panic!("unexpected response: {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_open_missing_video_flags_not_found() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/videos/v404"))
            .respond_with(ResponseTemplate::new(404).set_body_json(serde_json::json!({
                "message": "Video not found"
            })))
            .mount(&server)
            .await;

        let api = ApiClient::new(server.uri());
        let resp = open_video(ctx(api, None), "v404".to_string()).await;
        match resp {
            NetworkResponse::VideoOpenFailed { message, not_found } => {
                assert!(not_found);
                assert_eq!(message, "Error loading video. It might not exist.");
            }
            other => panic!("unexpected response: {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_channel_owner_reads_as_subscribed() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/channels/c1"))
            .respond_with(ResponseTemplate::new(200).set_body_json(channel_json()))
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/channels/c1/videos"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!([])))
            .mount(&server)
            .await;
        // no /subscriptions mock: the owner path must not probe it

        let api = ApiClient::new(server.uri());
        let resp = fetch_channel(ctx(api, Some("u-owner")), "c1".to_string()).await;
        match resp {
            NetworkResponse::ChannelLoaded { is_subscribed, .. } => assert!(is_subscribed),
            other => panic!("unexpected response: {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_toggle_subscription_falls_back_to_flip() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/subscriptions/c1/subscribe"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({})))
            .mount(&server)
            .await;

        let api = ApiClient::new(server.uri());
        let resp = toggle_subscription(ctx(api, Some("u1")), "c1".to_string(), false).await;
        match resp {
            NetworkResponse::SubscriptionChanged {
                is_subscribed,
                message,
                ..
            } => {
                assert!(is_subscribed);
                assert_eq!(message, "Subscribed!");
            }
            other => panic!("unexpected response: {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_actor_logout_reports_empty_session() {
        let dir = tempfile::tempdir().unwrap();
        let (response_tx, mut response_rx) = mpsc::unbounded_channel();
        let api = ApiClient::new("http://localhost:1");
        let session = SessionStore::new(TokenStore::in_dir(dir.path().to_path_buf()));
        let mut actor = NetworkActor::new(api, session, response_tx);

        actor.handle_command(NetworkCommand::Logout).await;
        match response_rx.recv().await {
            Some(NetworkResponse::Session { identity }) => assert!(identity.is_none()),
            other => panic!("unexpected response: {:?}", other),
        }
    }
}
