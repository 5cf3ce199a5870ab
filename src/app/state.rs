//! Application state - pure data, no I/O.
//!
//! The app actor owns one `AppState` and mutates it in response to UI events
//! and network responses. The UI only ever sees cloned snapshots via
//! `to_render_state`.

use crate::auth::Identity;
use crate::constants::{FILTER_CATEGORIES, UPLOAD_CATEGORIES};
use crate::messages::render::RenderState;
use crate::messages::ui_events::{
    AuthField, AuthMode, ChannelField, InputMode, Route, UploadField,
};
use crate::models::{Channel, Comment, Video};

/// Home feed: the video list plus its filters
#[derive(Clone, Debug, Default)]
pub struct HomeView {
    pub videos: Vec<Video>,
    pub selected: usize,
    pub active_category: usize,
    pub search: String,
    pub loading: bool,
    pub error: Option<String>,
}

impl HomeView {
    pub fn category(&self) -> &'static str {
        FILTER_CATEGORIES[self.active_category % FILTER_CATEGORIES.len()]
    }

    /// `None` for the "All" filter
    pub fn category_filter(&self) -> Option<String> {
        if self.active_category == 0 {
            None
        } else {
            Some(self.category().to_string())
        }
    }

    pub fn search_filter(&self) -> Option<String> {
        let term = self.search.trim();
        if term.is_empty() {
            None
        } else {
            Some(term.to_string())
        }
    }

    pub fn selected_video(&self) -> Option<&Video> {
        self.videos.get(self.selected)
    }
}

/// Watch page: the open video, its channel, and its comment thread
#[derive(Clone, Debug, Default)]
pub struct VideoView {
    pub video_id: String,
    pub video: Option<Video>,
    pub channel: Option<Channel>,
    pub comments: Vec<Comment>,
    pub selected_comment: usize,
    pub is_subscribed: bool,
    /// Comment draft; `editing` holds the comment id when editing in place
    pub comment_input: String,
    pub editing: Option<String>,
    pub scroll: u16,
    pub loading: bool,
    pub error: Option<String>,
}

impl VideoView {
    pub fn open(video_id: String) -> Self {
        VideoView {
            video_id,
            loading: true,
            ..Default::default()
        }
    }

    pub fn current_comment(&self) -> Option<&Comment> {
        self.comments.get(self.selected_comment)
    }
}

/// Channel page: the channel and its uploads
#[derive(Clone, Debug, Default)]
pub struct ChannelView {
    pub channel_id: String,
    pub channel: Option<Channel>,
    pub videos: Vec<Video>,
    pub selected: usize,
    pub is_subscribed: bool,
    pub loading: bool,
    pub error: Option<String>,
}

impl ChannelView {
    pub fn open(channel_id: String) -> Self {
        ChannelView {
            channel_id,
            loading: true,
            ..Default::default()
        }
    }

    pub fn selected_video(&self) -> Option<&Video> {
        self.videos.get(self.selected)
    }
}

/// Login/register form
#[derive(Clone, Debug, Default)]
pub struct AuthForm {
    pub mode: AuthMode,
    pub username: String,
    pub email: String,
    pub password: String,
    pub field: AuthField,
    pub error: Option<String>,
    pub submitting: bool,
}

/// Video upload form
#[derive(Clone, Debug, Default)]
pub struct UploadForm {
    pub title: String,
    pub description: String,
    pub category: usize,
    pub thumbnail_path: String,
    pub video_path: String,
    pub field: UploadField,
    pub error: Option<String>,
    pub submitting: bool,
}

impl UploadForm {
    pub fn category_name(&self) -> &'static str {
        UPLOAD_CATEGORIES[self.category % UPLOAD_CATEGORIES.len()]
    }
}

/// Create-channel form
#[derive(Clone, Debug, Default)]
pub struct ChannelForm {
    pub channel_name: String,
    pub description: String,
    pub banner_path: String,
    pub avatar_path: String,
    pub field: ChannelField,
    pub error: Option<String>,
    pub submitting: bool,
}

/// What the confirm dialog will do when accepted
#[derive(Clone, Debug, PartialEq)]
pub enum ConfirmAction {
    DeleteVideo(String),
    DeleteComment(String),
}

/// Modal dialog state. At most one dialog is open at a time and it captures
/// all input until resolved.
#[derive(Clone, Debug, Default, PartialEq)]
pub enum Dialog {
    #[default]
    None,
    Alert(String),
    Confirm {
        message: String,
        action: ConfirmAction,
    },
}

impl Dialog {
    pub fn is_open(&self) -> bool {
        !matches!(self, Dialog::None)
    }

    pub fn alert(message: impl Into<String>) -> Self {
        Dialog::Alert(message.into())
    }
}

/// The whole client state
#[derive(Clone, Debug, Default)]
pub struct AppState {
    pub route: Route,
    pub input_mode: InputMode,
    pub identity: Option<Identity>,
    pub home: HomeView,
    pub video: VideoView,
    pub channel: ChannelView,
    pub auth: AuthForm,
    pub upload: UploadForm,
    pub channel_form: ChannelForm,
    pub dialog: Dialog,
    pub show_help: bool,
    pub should_quit: bool,
}

impl AppState {
    pub fn new(identity: Option<Identity>) -> Self {
        AppState {
            identity,
            home: HomeView {
                loading: true,
                ..Default::default()
            },
            ..Default::default()
        }
    }

    pub fn is_authenticated(&self) -> bool {
        self.identity.is_some()
    }

    pub fn user_id(&self) -> Option<&str> {
        self.identity.as_ref().map(|i| i.user_id.as_str())
    }

    /// The text buffer the Editing input mode currently targets
    pub fn current_input_mut(&mut self) -> Option<&mut String> {
        match self.route {
            Route::Home => Some(&mut self.home.search),
            Route::Video => Some(&mut self.video.comment_input),
            Route::Auth => Some(match self.auth.field {
                AuthField::Email => &mut self.auth.email,
                AuthField::Password => &mut self.auth.password,
                AuthField::Username => &mut self.auth.username,
            }),
            Route::CreateVideo => Some(match self.upload.field {
                UploadField::Title => &mut self.upload.title,
                UploadField::Description => &mut self.upload.description,
                UploadField::ThumbnailPath => &mut self.upload.thumbnail_path,
                UploadField::VideoPath => &mut self.upload.video_path,
            }),
            Route::CreateChannel => Some(match self.channel_form.field {
                ChannelField::Name => &mut self.channel_form.channel_name,
                ChannelField::Description => &mut self.channel_form.description,
                ChannelField::BannerPath => &mut self.channel_form.banner_path,
                ChannelField::AvatarPath => &mut self.channel_form.avatar_path,
            }),
            Route::Channel => None,
        }
    }

    /// Snapshot for the renderer
    pub fn to_render_state(&self) -> RenderState {
        RenderState {
            route: self.route,
            input_mode: self.input_mode,
            identity: self.identity.clone(),
            home: self.home.clone(),
            video: self.video.clone(),
            channel: self.channel.clone(),
            auth: self.auth.clone(),
            upload: self.upload.clone(),
            channel_form: self.channel_form.clone(),
            dialog: self.dialog.clone(),
            show_help: self.show_help,
        }
    }
}
