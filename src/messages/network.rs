//! Network messages - commands into the network actor and responses out of it

use crate::auth::Identity;
use crate::models::{Channel, ChannelCreate, Comment, Video, VideoUpload};

/// Commands the app actor sends to the network actor
#[derive(Debug, Clone)]
pub enum NetworkCommand {
    // Session
    Login {
        email: String,
        password: String,
    },
    Register {
        username: String,
        email: String,
        password: String,
    },
    RefreshProfile,
    Logout,

    // Browsing
    FetchVideos {
        category: Option<String>,
        search: Option<String>,
    },
    OpenVideo {
        video_id: String,
    },
    FetchChannel {
        channel_id: String,
    },

    // Video actions
    RateVideo {
        video_id: String,
        like: bool,
    },
    ToggleSubscription {
        channel_id: String,
        subscribed: bool,
    },
    AddComment {
        video_id: String,
        text: String,
    },
    EditComment {
        comment_id: String,
        text: String,
    },
    DeleteComment {
        comment_id: String,
    },
    DeleteVideo {
        video_id: String,
    },

    // Creation
    UploadVideo(VideoUpload),
    CreateChannel(ChannelCreate),

    Shutdown,
}

/// Responses the network actor sends back to the app actor
#[derive(Debug, Clone)]
pub enum NetworkResponse {
    /// Session state changed: `Some` after login/register/refresh,
    /// `None` after logout or a failed refresh
    Session { identity: Option<Identity> },
    AuthFailed { message: String },

    Videos(Vec<Video>),
    VideosFailed { message: String },

    VideoOpened {
        video: Box<Video>,
        channel: Option<Channel>,
        comments: Vec<Comment>,
        is_subscribed: bool,
    },
    VideoOpenFailed { message: String, not_found: bool },

    ChannelLoaded {
        channel: Box<Channel>,
        videos: Vec<Video>,
        is_subscribed: bool,
    },
    ChannelFailed { message: String },

    Rated {
        video_id: String,
        likes: Vec<String>,
        dislikes: Vec<String>,
    },
    SubscriptionChanged {
        channel_id: String,
        is_subscribed: bool,
        subscriber_count: Option<u64>,
        message: String,
    },

    CommentAdded(Comment),
    CommentEdited { comment_id: String, text: String },
    CommentDeleted { comment_id: String },
    VideoDeleted { video_id: String },

    VideoUploaded { channel_id: String },
    ChannelCreated(Box<Channel>),

    /// A mutation failed; the message is already user-presentable
    ActionFailed { message: String },
}
