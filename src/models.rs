//! Wire types for the platform REST API.
//!
//! Field names follow the boundary's JSON (`_id`, camelCase). The backend is
//! inconsistent in a few places - owners arrive either as a bare id or as a
//! populated user object, and subscriber/view counts arrive either as a number
//! or as an array of ids - so those fields get tolerant deserializers.

use std::path::PathBuf;

use serde::{Deserialize, Deserializer, Serialize};

/// A user reference, possibly populated by the backend
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct UserRef {
    #[serde(rename = "_id")]
    pub id: String,
    #[serde(default)]
    pub username: Option<String>,
    #[serde(default)]
    pub avatar: Option<String>,
}

/// Owner field - either a bare id or a populated user object
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum OwnerRef {
    User(UserRef),
    Id(String),
}

impl OwnerRef {
    pub fn id(&self) -> &str {
        match self {
            OwnerRef::Id(id) => id,
            OwnerRef::User(user) => &user.id,
        }
    }
}

/// Accepts either a plain number or an array (counted by length)
fn count_or_len<'de, D: Deserializer<'de>>(deserializer: D) -> Result<u64, D::Error> {
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum CountRepr {
        Count(u64),
        Items(Vec<serde_json::Value>),
    }

    Ok(match CountRepr::deserialize(deserializer)? {
        CountRepr::Count(n) => n,
        CountRepr::Items(items) => items.len() as u64,
    })
}

/// Channel reference embedded in a video
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChannelRef {
    #[serde(rename = "_id")]
    pub id: String,
    #[serde(default)]
    pub owner: Option<OwnerRef>,
    #[serde(default)]
    pub channel_name: Option<String>,
}

/// A video as returned by `/videos` and `/videos/:id`
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Video {
    #[serde(rename = "_id")]
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub category: String,
    #[serde(default)]
    pub video_url: String,
    #[serde(default)]
    pub thumbnail_url: String,
    #[serde(default, deserialize_with = "count_or_len")]
    pub views: u64,
    #[serde(default)]
    pub likes: Vec<String>,
    #[serde(default)]
    pub dislikes: Vec<String>,
    #[serde(default)]
    pub uploader: Option<UserRef>,
    #[serde(default)]
    pub channel: Option<ChannelRef>,
    #[serde(default)]
    pub created_at: Option<chrono::DateTime<chrono::Utc>>,
}

impl Video {
    /// Id of the uploading user, when the backend sent one
    pub fn uploader_id(&self) -> Option<&str> {
        self.uploader.as_ref().map(|u| u.id.as_str())
    }
}

/// A channel as returned by `/channels/:id`
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Channel {
    #[serde(rename = "_id")]
    pub id: String,
    pub channel_name: String,
    #[serde(default)]
    pub description: String,
    pub owner: OwnerRef,
    #[serde(default)]
    pub channel_banner: Option<String>,
    #[serde(default)]
    pub channel_avatar: Option<String>,
    #[serde(default)]
    pub profile_picture: Option<String>,
    #[serde(default, deserialize_with = "count_or_len")]
    pub subscribers: u64,
}

impl Channel {
    pub fn owner_id(&self) -> &str {
        self.owner.id()
    }
}

/// Comment author - populated user, or just the raw user id
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(untagged)]
pub enum AuthorRef {
    User(UserRef),
    Id(String),
}

impl AuthorRef {
    pub fn id(&self) -> &str {
        match self {
            AuthorRef::Id(id) => id,
            AuthorRef::User(user) => &user.id,
        }
    }
}

/// A comment on a video
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Comment {
    #[serde(rename = "_id")]
    pub id: String,
    pub text: String,
    #[serde(rename = "userId", default)]
    pub author: Option<AuthorRef>,
    #[serde(default)]
    pub username: Option<String>,
    #[serde(default)]
    pub timestamp: Option<chrono::DateTime<chrono::Utc>>,
}

impl Comment {
    /// Display name with fallbacks: populated author, then the flat
    /// `username` field, then "Anonymous"
    pub fn display_name(&self) -> &str {
        if let Some(AuthorRef::User(user)) = &self.author {
            if let Some(name) = &user.username {
                return name;
            }
        }
        self.username.as_deref().unwrap_or("Anonymous")
    }

    pub fn author_id(&self) -> Option<&str> {
        self.author.as_ref().map(|a| a.id())
    }
}

/// Body of `POST /auth/login` and `POST /auth/signup` responses
#[derive(Clone, Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthResponse {
    pub token: String,
    #[serde(default)]
    pub channel_id: Option<String>,
    #[serde(default)]
    pub subscribed_channels: Option<Vec<String>>,
}

/// Body of `GET /auth/profile`
#[derive(Clone, Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Profile {
    #[serde(rename = "_id")]
    pub id: String,
    #[serde(default)]
    pub username: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub avatar: Option<String>,
    #[serde(default)]
    pub channel_id: Option<String>,
    #[serde(default)]
    pub subscribed_channels: Option<Vec<String>>,
}

/// Body of `GET /subscriptions/:channelId/status`
#[derive(Clone, Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubscriptionStatus {
    pub is_subscribed: bool,
}

/// Body of subscribe/unsubscribe responses. Not every backend version
/// includes every field, so they are all optional.
#[derive(Clone, Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubscriptionChange {
    #[serde(default)]
    pub is_subscribed: Option<bool>,
    #[serde(default)]
    pub subscriber_count: Option<u64>,
    #[serde(default)]
    pub message: Option<String>,
}

/// Body of like/dislike responses - the full updated vote lists
#[derive(Clone, Debug, Deserialize)]
pub struct RatingUpdate {
    #[serde(default)]
    pub likes: Vec<String>,
    #[serde(default)]
    pub dislikes: Vec<String>,
}

/// Fields of the multipart `POST /videos/upload`
#[derive(Clone, Debug)]
pub struct VideoUpload {
    pub title: String,
    pub description: String,
    pub category: String,
    pub channel_id: String,
    pub uploader_id: String,
    pub thumbnail_path: PathBuf,
    pub video_path: PathBuf,
}

/// Fields of the multipart `POST /channels`
#[derive(Clone, Debug)]
pub struct ChannelCreate {
    pub channel_name: String,
    pub description: String,
    pub banner_path: PathBuf,
    pub avatar_path: PathBuf,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_video_with_populated_refs() {
        let json = r#"{
            "_id": "v1",
            "title": "Intro",
            "views": 3,
            "likes": ["u1", "u2"],
            "uploader": {"_id": "u1", "username": "alice"},
            "channel": {"_id": "c1", "owner": "u1"}
        }"#;
        let video: Video = serde_json::from_str(json).unwrap();
        assert_eq!(video.uploader_id(), Some("u1"));
        assert_eq!(video.channel.unwrap().owner.unwrap().id(), "u1");
        assert_eq!(video.views, 3);
        assert_eq!(video.likes.len(), 2);
    }

    #[test]
    fn test_subscribers_as_array_or_number() {
        let as_array = r#"{"_id":"c1","channelName":"C","owner":"u1","subscribers":["a","b"]}"#;
        let as_number = r#"{"_id":"c1","channelName":"C","owner":"u1","subscribers":7}"#;
        let channel: Channel = serde_json::from_str(as_array).unwrap();
        assert_eq!(channel.subscribers, 2);
        let channel: Channel = serde_json::from_str(as_number).unwrap();
        assert_eq!(channel.subscribers, 7);
    }

    #[test]
    fn test_channel_owner_populated() {
        let json = r#"{"_id":"c1","channelName":"C","owner":{"_id":"u9","username":"bob"}}"#;
        let channel: Channel = serde_json::from_str(json).unwrap();
        assert_eq!(channel.owner_id(), "u9");
    }

    #[test]
    fn test_comment_display_name_fallbacks() {
        let populated = r#"{"_id":"m1","text":"hi","userId":{"_id":"u1","username":"alice"}}"#;
        let bare = r#"{"_id":"m2","text":"yo","userId":"u2","username":"bob"}"#;
        let anon = r#"{"_id":"m3","text":"??"}"#;
        let comment: Comment = serde_json::from_str(populated).unwrap();
        assert_eq!(comment.display_name(), "alice");
        assert_eq!(comment.author_id(), Some("u1"));
        let comment: Comment = serde_json::from_str(bare).unwrap();
        assert_eq!(comment.display_name(), "bob");
        let comment: Comment = serde_json::from_str(anon).unwrap();
        assert_eq!(comment.display_name(), "Anonymous");
    }
}
