//! Command handlers - every state transition of the client lives here.
//!
//! Handlers take `&mut AppState` plus a message and return the network
//! commands the transition requires. They never perform I/O themselves, which
//! keeps every rule (auth gating, validation, stale-response dropping)
//! testable without a terminal or a server.

use std::path::PathBuf;

use crate::constants::UPLOAD_CATEGORIES;
use crate::messages::network::{NetworkCommand, NetworkResponse};
use crate::messages::ui_events::{AuthMode, InputMode, Route, UiEvent};
use crate::models::{ChannelCreate, VideoUpload};

use super::state::{AppState, ChannelView, ConfirmAction, Dialog, UploadForm, VideoView};

impl AppState {
    /// Commands to fire right after startup, once `bootstrap` has run
    pub fn initial_commands(&self) -> Vec<NetworkCommand> {
        let mut commands = Vec::new();
        if self.is_authenticated() {
            commands.push(NetworkCommand::RefreshProfile);
        }
        commands.push(self.fetch_home_command());
        commands
    }

    pub fn handle_ui_event(&mut self, event: UiEvent) -> Vec<NetworkCommand> {
        match event {
            // Navigation
            UiEvent::GoHome => self.go_home(),
            UiEvent::GoAuth => self.go_auth(),
            UiEvent::GoCreateVideo => self.go_create_video(),
            UiEvent::GoCreateChannel => self.go_create_channel(),
            UiEvent::OpenSelectedVideo => self.open_selected_video(),
            UiEvent::OpenVideoChannel => self.open_video_channel(),
            UiEvent::Back => self.back(),
            UiEvent::NextItem => {
                self.move_selection(1);
                vec![]
            }
            UiEvent::PrevItem => {
                self.move_selection(-1);
                vec![]
            }
            UiEvent::NextCategory => self.change_category(1),
            UiEvent::PrevCategory => self.change_category(-1),
            UiEvent::ScrollUp => {
                self.video.scroll = self.video.scroll.saturating_sub(1);
                vec![]
            }
            UiEvent::ScrollDown => {
                self.video.scroll = self.video.scroll.saturating_add(1);
                vec![]
            }
            UiEvent::Refresh => {
                self.home.loading = true;
                self.home.error = None;
                vec![self.fetch_home_command()]
            }

            // Input editing
            UiEvent::StartSearch => {
                if self.route == Route::Home {
                    self.input_mode = InputMode::Editing;
                }
                vec![]
            }
            UiEvent::StartEditing => {
                if self.current_input_mut().is_some() {
                    self.input_mode = InputMode::Editing;
                }
                vec![]
            }
            UiEvent::StopEditing => {
                self.input_mode = InputMode::Normal;
                vec![]
            }
            UiEvent::CharInput(c) => {
                if let Some(input) = self.current_input_mut() {
                    input.push(c);
                }
                vec![]
            }
            UiEvent::Backspace => {
                if let Some(input) = self.current_input_mut() {
                    input.pop();
                }
                vec![]
            }
            UiEvent::NextField => {
                self.advance_field();
                vec![]
            }
            UiEvent::CycleCategory => {
                if self.route == Route::CreateVideo {
                    self.upload.category = (self.upload.category + 1) % UPLOAD_CATEGORIES.len();
                }
                vec![]
            }
            UiEvent::Submit => self.submit(),

            // Video actions
            UiEvent::Like => self.rate_video(true),
            UiEvent::Dislike => self.rate_video(false),
            UiEvent::ToggleSubscribe => self.toggle_subscribe(),
            UiEvent::NewComment => self.new_comment(),
            UiEvent::EditSelectedComment => self.edit_selected_comment(),
            UiEvent::DeleteSelectedComment => self.delete_selected_comment(),
            UiEvent::DeleteSelectedVideo => self.delete_selected_video(),

            // Session
            UiEvent::ToggleAuthMode => {
                let mode = match self.auth.mode {
                    AuthMode::Login => AuthMode::Register,
                    AuthMode::Register => AuthMode::Login,
                };
                self.auth = Default::default();
                self.auth.mode = mode;
                vec![]
            }
            UiEvent::Logout => {
                self.identity = None;
                vec![NetworkCommand::Logout]
            }

            // Dialog
            UiEvent::DialogConfirm => self.dialog_confirm(),
            UiEvent::DialogCancel => {
                self.dialog = Dialog::None;
                vec![]
            }

            // System
            UiEvent::ToggleHelp => {
                self.show_help = !self.show_help;
                vec![]
            }
            UiEvent::CloseHelp => {
                self.show_help = false;
                vec![]
            }
            UiEvent::Quit => {
                self.should_quit = true;
                vec![NetworkCommand::Shutdown]
            }
        }
    }

    // ========================================================================
    // Navigation
    // ========================================================================

    fn fetch_home_command(&self) -> NetworkCommand {
        NetworkCommand::FetchVideos {
            category: self.home.category_filter(),
            search: self.home.search_filter(),
        }
    }

    fn go_home(&mut self) -> Vec<NetworkCommand> {
        self.route = Route::Home;
        self.input_mode = InputMode::Normal;
        self.home.loading = true;
        self.home.error = None;
        vec![self.fetch_home_command()]
    }

    fn go_auth(&mut self) -> Vec<NetworkCommand> {
        if self.is_authenticated() {
            return vec![];
        }
        self.auth = Default::default();
        self.route = Route::Auth;
        vec![]
    }

    fn go_create_video(&mut self) -> Vec<NetworkCommand> {
        if !self.is_authenticated() {
            self.dialog = Dialog::alert("You must be logged in to upload videos.");
            self.route = Route::Auth;
            self.auth = Default::default();
            return vec![];
        }
        let owns_channel = self
            .identity
            .as_ref()
            .is_some_and(|identity| identity.owns_channel());
        if !owns_channel {
            self.dialog = Dialog::alert("You must create a channel before uploading videos.");
            self.channel_form = Default::default();
            self.route = Route::CreateChannel;
            return vec![];
        }
        self.upload = UploadForm::default();
        self.route = Route::CreateVideo;
        vec![]
    }

    fn go_create_channel(&mut self) -> Vec<NetworkCommand> {
        let Some(identity) = self.identity.as_ref() else {
            self.auth = Default::default();
            self.route = Route::Auth;
            return vec![];
        };
        // One channel per user: owners land on their channel page instead
        if let Some(channel_id) = identity.channel_id.clone() {
            self.channel = ChannelView::open(channel_id.clone());
            self.route = Route::Channel;
            return vec![NetworkCommand::FetchChannel { channel_id }];
        }
        self.channel_form = Default::default();
        self.route = Route::CreateChannel;
        vec![]
    }

    fn open_selected_video(&mut self) -> Vec<NetworkCommand> {
        let video = match self.route {
            Route::Home => self.home.selected_video(),
            Route::Channel => self.channel.selected_video(),
            _ => None,
        };
        let Some(video_id) = video.map(|v| v.id.clone()) else {
            return vec![];
        };
        self.video = VideoView::open(video_id.clone());
        self.route = Route::Video;
        vec![NetworkCommand::OpenVideo { video_id }]
    }

    fn open_video_channel(&mut self) -> Vec<NetworkCommand> {
        let channel_id = self
            .video
            .channel
            .as_ref()
            .map(|c| c.id.clone())
            .or_else(|| {
                self.video
                    .video
                    .as_ref()
                    .and_then(|v| v.channel.as_ref())
                    .map(|c| c.id.clone())
            });
        let Some(channel_id) = channel_id else {
            return vec![];
        };
        self.channel = ChannelView::open(channel_id.clone());
        self.route = Route::Channel;
        vec![NetworkCommand::FetchChannel { channel_id }]
    }

    fn back(&mut self) -> Vec<NetworkCommand> {
        match self.route {
            Route::Home => vec![],
            // Returning from a channel opened off the watch page goes back
            // to the still-loaded video
            Route::Channel if self.video.video.is_some() => {
                self.route = Route::Video;
                vec![]
            }
            _ => self.go_home(),
        }
    }

    fn move_selection(&mut self, delta: i64) {
        let (selected, len) = match self.route {
            Route::Home => (&mut self.home.selected, self.home.videos.len()),
            Route::Video => (
                &mut self.video.selected_comment,
                self.video.comments.len(),
            ),
            Route::Channel => (&mut self.channel.selected, self.channel.videos.len()),
            _ => return,
        };
        if len == 0 {
            *selected = 0;
            return;
        }
        let next = (*selected as i64 + delta).rem_euclid(len as i64);
        *selected = next as usize;
    }

    fn change_category(&mut self, delta: i64) -> Vec<NetworkCommand> {
        if self.route != Route::Home {
            return vec![];
        }
        let len = crate::constants::FILTER_CATEGORIES.len() as i64;
        self.home.active_category =
            (self.home.active_category as i64 + delta).rem_euclid(len) as usize;
        self.home.loading = true;
        self.home.error = None;
        self.home.selected = 0;
        vec![self.fetch_home_command()]
    }

    // ========================================================================
    // Form submission
    // ========================================================================

    fn submit(&mut self) -> Vec<NetworkCommand> {
        self.input_mode = InputMode::Normal;
        match self.route {
            Route::Home => {
                self.home.loading = true;
                self.home.error = None;
                self.home.selected = 0;
                vec![self.fetch_home_command()]
            }
            Route::Video => self.submit_comment(),
            Route::Auth => self.submit_auth(),
            Route::CreateVideo => self.submit_upload(),
            Route::CreateChannel => self.submit_channel(),
            Route::Channel => vec![],
        }
    }

    fn submit_comment(&mut self) -> Vec<NetworkCommand> {
        if !self.is_authenticated() {
            self.dialog = Dialog::alert("Please sign in to add comments.");
            return vec![];
        }
        let text = self.video.comment_input.trim().to_string();
        if text.is_empty() {
            return vec![];
        }
        match self.video.editing.clone() {
            Some(comment_id) => vec![NetworkCommand::EditComment { comment_id, text }],
            None => vec![NetworkCommand::AddComment {
                video_id: self.video.video_id.clone(),
                text,
            }],
        }
    }

    fn submit_auth(&mut self) -> Vec<NetworkCommand> {
        let form = &mut self.auth;
        let missing = form.email.trim().is_empty()
            || form.password.is_empty()
            || (form.mode == AuthMode::Register && form.username.trim().is_empty());
        if missing {
            form.error = Some("Please fill in all fields.".to_string());
            return vec![];
        }
        form.error = None;
        form.submitting = true;
        match form.mode {
            AuthMode::Login => vec![NetworkCommand::Login {
                email: form.email.trim().to_string(),
                password: form.password.clone(),
            }],
            AuthMode::Register => vec![NetworkCommand::Register {
                username: form.username.trim().to_string(),
                email: form.email.trim().to_string(),
                password: form.password.clone(),
            }],
        }
    }

    fn submit_upload(&mut self) -> Vec<NetworkCommand> {
        if self.upload.title.trim().is_empty() {
            self.fail_upload("Please enter a title.");
            return vec![];
        }
        if self.upload.thumbnail_path.trim().is_empty() || self.upload.video_path.trim().is_empty()
        {
            self.fail_upload("Please select both a thumbnail image and a video file.");
            return vec![];
        }
        let channel_id = self
            .identity
            .as_ref()
            .and_then(|identity| identity.channel_id.clone());
        let Some(channel_id) = channel_id else {
            self.fail_upload("Channel ID is missing. Cannot upload video.");
            return vec![];
        };
        let Some(uploader_id) = self.user_id().map(str::to_string) else {
            self.fail_upload("Uploader ID is missing. User not authenticated correctly.");
            return vec![];
        };

        self.upload.error = None;
        self.upload.submitting = true;
        vec![NetworkCommand::UploadVideo(VideoUpload {
            title: self.upload.title.trim().to_string(),
            description: self.upload.description.trim().to_string(),
            category: self.upload.category_name().to_string(),
            channel_id,
            uploader_id,
            thumbnail_path: PathBuf::from(self.upload.thumbnail_path.trim()),
            video_path: PathBuf::from(self.upload.video_path.trim()),
        })]
    }

    fn fail_upload(&mut self, message: &str) {
        self.upload.error = Some(message.to_string());
        self.dialog = Dialog::alert(message);
    }

    fn submit_channel(&mut self) -> Vec<NetworkCommand> {
        if self.channel_form.channel_name.trim().is_empty() {
            self.channel_form.error = Some("Please enter a channel name.".to_string());
            return vec![];
        }
        if self.channel_form.banner_path.trim().is_empty()
            || self.channel_form.avatar_path.trim().is_empty()
        {
            let message = "Please upload both a channel banner and an avatar.";
            self.channel_form.error = Some(message.to_string());
            self.dialog = Dialog::alert(message);
            return vec![];
        }
        self.channel_form.error = None;
        self.channel_form.submitting = true;
        vec![NetworkCommand::CreateChannel(ChannelCreate {
            channel_name: self.channel_form.channel_name.trim().to_string(),
            description: self.channel_form.description.trim().to_string(),
            banner_path: PathBuf::from(self.channel_form.banner_path.trim()),
            avatar_path: PathBuf::from(self.channel_form.avatar_path.trim()),
        })]
    }

    // ========================================================================
    // Video actions
    // ========================================================================

    fn rate_video(&mut self, like: bool) -> Vec<NetworkCommand> {
        if self.route != Route::Video || self.video.video.is_none() {
            return vec![];
        }
        if !self.is_authenticated() {
            self.dialog = Dialog::alert(if like {
                "Please sign in to like videos."
            } else {
                "Please sign in to dislike videos."
            });
            return vec![];
        }
        vec![NetworkCommand::RateVideo {
            video_id: self.video.video_id.clone(),
            like,
        }]
    }

    fn toggle_subscribe(&mut self) -> Vec<NetworkCommand> {
        let (channel, subscribed, sign_in_message) = match self.route {
            Route::Video => (
                self.video.channel.as_ref(),
                self.video.is_subscribed,
                "You must be logged in to subscribe to channels.",
            ),
            Route::Channel => (
                self.channel.channel.as_ref(),
                self.channel.is_subscribed,
                "Please sign in to subscribe to channels.",
            ),
            _ => return vec![],
        };
        let Some(channel) = channel else {
            self.dialog = Dialog::alert("Channel information is not loaded yet. Please try again.");
            return vec![];
        };
        let channel_id = channel.id.clone();
        let owner_id = channel.owner_id().to_string();
        let Some(user_id) = self.user_id() else {
            self.dialog = Dialog::alert(sign_in_message);
            return vec![];
        };
        // Owners cannot subscribe to their own channel
        if owner_id == user_id {
            return vec![];
        }
        vec![NetworkCommand::ToggleSubscription {
            channel_id,
            subscribed,
        }]
    }

    fn new_comment(&mut self) -> Vec<NetworkCommand> {
        if self.route != Route::Video {
            return vec![];
        }
        if !self.is_authenticated() {
            self.dialog = Dialog::alert("Please sign in to add comments.");
            return vec![];
        }
        self.video.editing = None;
        self.video.comment_input.clear();
        self.input_mode = InputMode::Editing;
        vec![]
    }

    fn edit_selected_comment(&mut self) -> Vec<NetworkCommand> {
        if self.route != Route::Video {
            return vec![];
        }
        if !self.is_authenticated() {
            self.dialog = Dialog::alert("Please sign in to edit comments.");
            return vec![];
        }
        let Some(comment) = self.video.current_comment() else {
            return vec![];
        };
        // Only the author may edit
        if comment.author_id() != self.user_id() {
            return vec![];
        }
        let (comment_id, text) = (comment.id.clone(), comment.text.clone());
        self.video.editing = Some(comment_id);
        self.video.comment_input = text;
        self.input_mode = InputMode::Editing;
        vec![]
    }

    fn delete_selected_comment(&mut self) -> Vec<NetworkCommand> {
        if self.route != Route::Video {
            return vec![];
        }
        if !self.is_authenticated() {
            self.dialog = Dialog::alert("Please sign in to delete comments.");
            return vec![];
        }
        let Some(comment) = self.video.current_comment() else {
            return vec![];
        };
        if comment.author_id() != self.user_id() {
            return vec![];
        }
        self.dialog = Dialog::Confirm {
            message: "Are you sure you want to delete this comment?".to_string(),
            action: ConfirmAction::DeleteComment(comment.id.clone()),
        };
        vec![]
    }

    fn delete_selected_video(&mut self) -> Vec<NetworkCommand> {
        if self.route != Route::Channel {
            return vec![];
        }
        let owner = self
            .channel
            .channel
            .as_ref()
            .map(|channel| channel.owner_id().to_string());
        if owner.as_deref() != self.user_id() || owner.is_none() {
            return vec![];
        }
        let Some(video) = self.channel.selected_video() else {
            return vec![];
        };
        self.dialog = Dialog::Confirm {
            message: "Are you sure you want to delete this video? This action cannot be undone."
                .to_string(),
            action: ConfirmAction::DeleteVideo(video.id.clone()),
        };
        vec![]
    }

    fn dialog_confirm(&mut self) -> Vec<NetworkCommand> {
        match std::mem::take(&mut self.dialog) {
            Dialog::Confirm { action, .. } => match action {
                ConfirmAction::DeleteVideo(video_id) => {
                    vec![NetworkCommand::DeleteVideo { video_id }]
                }
                ConfirmAction::DeleteComment(comment_id) => {
                    vec![NetworkCommand::DeleteComment { comment_id }]
                }
            },
            _ => vec![],
        }
    }

    // ========================================================================
    // Network responses
    // ========================================================================

    pub fn handle_response(&mut self, response: NetworkResponse) -> Vec<NetworkCommand> {
        match response {
            NetworkResponse::Session { identity } => {
                let was_submitting = self.auth.submitting;
                self.auth.submitting = false;
                self.identity = identity;
                if was_submitting && self.is_authenticated() && self.route == Route::Auth {
                    self.dialog = Dialog::alert(match self.auth.mode {
                        AuthMode::Login => "Login successful!",
                        AuthMode::Register => "Registration successful! You are now logged in.",
                    });
                    return self.go_home();
                }
                vec![]
            }
            NetworkResponse::AuthFailed { message } => {
                self.auth.submitting = false;
                self.auth.error = Some(message.clone());
                self.dialog = Dialog::alert(message);
                vec![]
            }

            NetworkResponse::Videos(videos) => {
                self.home.loading = false;
                self.home.error = None;
                self.home.videos = videos;
                if self.home.selected >= self.home.videos.len() {
                    self.home.selected = 0;
                }
                vec![]
            }
            NetworkResponse::VideosFailed { message } => {
                self.home.loading = false;
                self.home.error = Some(message);
                vec![]
            }

            NetworkResponse::VideoOpened {
                video,
                channel,
                comments,
                is_subscribed,
            } => {
                // Drop responses for a video the user already navigated away from
                if self.video.video_id != video.id {
                    return vec![];
                }
                self.video.video = Some(*video);
                self.video.channel = channel;
                self.video.comments = comments;
                self.video.is_subscribed = is_subscribed;
                self.video.selected_comment = 0;
                self.video.loading = false;
                self.video.error = None;
                vec![]
            }
            NetworkResponse::VideoOpenFailed { message, not_found } => {
                self.video.loading = false;
                self.video.error = Some(message.clone());
                self.dialog = Dialog::alert(message);
                if not_found {
                    return self.go_home();
                }
                vec![]
            }

            NetworkResponse::ChannelLoaded {
                channel,
                videos,
                is_subscribed,
            } => {
                if self.channel.channel_id != channel.id {
                    return vec![];
                }
                self.channel.channel = Some(*channel);
                self.channel.videos = videos;
                self.channel.is_subscribed = is_subscribed;
                self.channel.selected = 0;
                self.channel.loading = false;
                self.channel.error = None;
                vec![]
            }
            NetworkResponse::ChannelFailed { message } => {
                self.channel.loading = false;
                self.channel.error = Some(message);
                vec![]
            }

            NetworkResponse::Rated {
                video_id,
                likes,
                dislikes,
            } => {
                if let Some(video) = self.video.video.as_mut() {
                    if video.id == video_id {
                        video.likes = likes;
                        video.dislikes = dislikes;
                    }
                }
                vec![]
            }
            NetworkResponse::SubscriptionChanged {
                channel_id,
                is_subscribed,
                subscriber_count,
                message,
            } => {
                if self.video.channel.as_ref().map(|c| c.id.as_str()) == Some(channel_id.as_str())
                {
                    self.video.is_subscribed = is_subscribed;
                    if let (Some(channel), Some(count)) =
                        (self.video.channel.as_mut(), subscriber_count)
                    {
                        channel.subscribers = count;
                    }
                }
                if self.channel.channel_id == channel_id {
                    self.channel.is_subscribed = is_subscribed;
                    if let (Some(channel), Some(count)) =
                        (self.channel.channel.as_mut(), subscriber_count)
                    {
                        channel.subscribers = count;
                    }
                }
                self.dialog = Dialog::alert(message);
                // Keep the cached subscription list in step with the server
                vec![NetworkCommand::RefreshProfile]
            }

            NetworkResponse::CommentAdded(comment) => {
                self.video.comments.insert(0, comment);
                self.video.comment_input.clear();
                self.video.editing = None;
                vec![]
            }
            NetworkResponse::CommentEdited { comment_id, text } => {
                if let Some(comment) =
                    self.video.comments.iter_mut().find(|c| c.id == comment_id)
                {
                    comment.text = text;
                }
                self.video.comment_input.clear();
                self.video.editing = None;
                self.dialog = Dialog::alert("Comment updated successfully!");
                vec![]
            }
            NetworkResponse::CommentDeleted { comment_id } => {
                self.video.comments.retain(|c| c.id != comment_id);
                if self.video.selected_comment >= self.video.comments.len() {
                    self.video.selected_comment = 0;
                }
                self.dialog = Dialog::alert("Comment deleted successfully!");
                vec![]
            }
            NetworkResponse::VideoDeleted { video_id } => {
                self.channel.videos.retain(|v| v.id != video_id);
                if self.channel.selected >= self.channel.videos.len() {
                    self.channel.selected = 0;
                }
                self.dialog = Dialog::alert("Video deleted successfully!");
                vec![]
            }

            NetworkResponse::VideoUploaded { channel_id } => {
                self.upload.submitting = false;
                self.dialog = Dialog::alert("Video uploaded successfully!");
                self.channel = ChannelView::open(channel_id.clone());
                self.route = Route::Channel;
                vec![NetworkCommand::FetchChannel { channel_id }]
            }
            NetworkResponse::ChannelCreated(channel) => {
                self.channel_form.submitting = false;
                self.dialog = Dialog::alert("Channel created successfully!");
                let channel_id = channel.id.clone();
                self.channel = ChannelView::open(channel_id.clone());
                self.route = Route::Channel;
                // The profile refresh picks up the new channelId claim
                vec![
                    NetworkCommand::RefreshProfile,
                    NetworkCommand::FetchChannel { channel_id },
                ]
            }

            NetworkResponse::ActionFailed { message } => {
                self.auth.submitting = false;
                self.upload.submitting = false;
                self.channel_form.submitting = false;
                self.dialog = Dialog::alert(message);
                vec![]
            }
        }
    }

    fn advance_field(&mut self) {
        match self.route {
            Route::Auth => self.auth.field = self.auth.field.next(self.auth.mode),
            Route::CreateVideo => self.upload.field = self.upload.field.next(),
            Route::CreateChannel => self.channel_form.field = self.channel_form.field.next(),
            _ => {}
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::Identity;
    use crate::models::{Channel, Comment, Video};

    fn identity(user_id: &str, channel_id: Option<&str>) -> Identity {
        Identity {
            user_id: user_id.to_string(),
            username: Some("alice".to_string()),
            email: Some("a@b.com".to_string()),
            avatar: None,
            channel_id: channel_id.map(str::to_string),
            subscribed_channels: vec![],
        }
    }

    fn video(id: &str) -> Video {
        serde_json::from_value(serde_json::json!({"_id": id, "title": "t"})).unwrap()
    }

    fn channel(id: &str, owner: &str) -> Channel {
        serde_json::from_value(serde_json::json!({
            "_id": id, "channelName": "C", "owner": owner, "subscribers": 5
        }))
        .unwrap()
    }

    fn comment(id: &str, author: &str) -> Comment {
        serde_json::from_value(serde_json::json!({
            "_id": id, "text": "hi", "userId": author
        }))
        .unwrap()
    }

    #[test]
    fn test_like_requires_sign_in() {
        let mut state = AppState::new(None);
        state.route = Route::Video;
        state.video = VideoView::open("v1".to_string());
        state.video.video = Some(video("v1"));

        let commands = state.handle_ui_event(UiEvent::Like);
        assert!(commands.is_empty());
        assert_eq!(
            state.dialog,
            Dialog::Alert("Please sign in to like videos.".to_string())
        );
    }

    #[test]
    fn test_open_selected_video_emits_command() {
        let mut state = AppState::new(None);
        state.home.videos = vec![video("v1"), video("v2")];
        state.home.selected = 1;
        state.home.loading = false;

        let commands = state.handle_ui_event(UiEvent::OpenSelectedVideo);
        assert!(
            matches!(&commands[..], [NetworkCommand::OpenVideo { video_id }] if video_id == "v2")
        );
        assert_eq!(state.route, Route::Video);
        assert!(state.video.loading);
    }

    #[test]
    fn test_category_change_refetches() {
        let mut state = AppState::new(None);
        let commands = state.handle_ui_event(UiEvent::NextCategory);
        assert!(matches!(
            &commands[..],
            [NetworkCommand::FetchVideos {
                category: Some(_),
                search: None
            }]
        ));
        assert!(state.home.loading);
    }

    #[test]
    fn test_submit_login_validates_fields() {
        let mut state = AppState::new(None);
        state.route = Route::Auth;
        state.auth.email = "a@b.com".to_string();

        let commands = state.handle_ui_event(UiEvent::Submit);
        assert!(commands.is_empty());
        assert_eq!(state.auth.error.as_deref(), Some("Please fill in all fields."));

        state.auth.password = "secret".to_string();
        let commands = state.handle_ui_event(UiEvent::Submit);
        assert!(matches!(&commands[..], [NetworkCommand::Login { .. }]));
        assert!(state.auth.submitting);
    }

    #[test]
    fn test_successful_login_navigates_home() {
        let mut state = AppState::new(None);
        state.route = Route::Auth;
        state.auth.submitting = true;

        let commands = state.handle_response(NetworkResponse::Session {
            identity: Some(identity("u1", None)),
        });
        assert_eq!(state.route, Route::Home);
        assert_eq!(state.dialog, Dialog::Alert("Login successful!".to_string()));
        assert!(matches!(&commands[..], [NetworkCommand::FetchVideos { .. }]));
    }

    #[test]
    fn test_confirm_dialog_dispatches_delete() {
        let mut state = AppState::new(Some(identity("u1", Some("c1"))));
        state.route = Route::Channel;
        state.channel = ChannelView::open("c1".to_string());
        state.channel.channel = Some(channel("c1", "u1"));
        state.channel.videos = vec![video("v1")];
        state.channel.loading = false;

        assert!(state.handle_ui_event(UiEvent::DeleteSelectedVideo).is_empty());
        assert!(state.dialog.is_open());

        let commands = state.handle_ui_event(UiEvent::DialogConfirm);
        assert!(
            matches!(&commands[..], [NetworkCommand::DeleteVideo { video_id }] if video_id == "v1")
        );
        assert_eq!(state.dialog, Dialog::None);
    }

    #[test]
    fn test_cancel_dialog_sends_nothing() {
        let mut state = AppState::new(Some(identity("u1", None)));
        state.route = Route::Video;
        state.video = VideoView::open("v1".to_string());
        state.video.comments = vec![comment("m1", "u1")];

        state.handle_ui_event(UiEvent::DeleteSelectedComment);
        assert!(state.dialog.is_open());
        let commands = state.handle_ui_event(UiEvent::DialogCancel);
        assert!(commands.is_empty());
        assert_eq!(state.dialog, Dialog::None);
    }

    #[test]
    fn test_stale_video_response_dropped() {
        let mut state = AppState::new(None);
        state.route = Route::Video;
        state.video = VideoView::open("v2".to_string());

        state.handle_response(NetworkResponse::VideoOpened {
            video: Box::new(video("v1")),
            channel: None,
            comments: vec![],
            is_subscribed: false,
        });
        assert!(state.video.video.is_none());
        assert!(state.video.loading);
    }

    #[test]
    fn test_subscription_change_refreshes_profile() {
        let mut state = AppState::new(Some(identity("u1", None)));
        state.route = Route::Channel;
        state.channel = ChannelView::open("c1".to_string());
        state.channel.channel = Some(channel("c1", "u9"));

        let commands = state.handle_response(NetworkResponse::SubscriptionChanged {
            channel_id: "c1".to_string(),
            is_subscribed: true,
            subscriber_count: Some(6),
            message: "Subscribed".to_string(),
        });
        assert!(state.channel.is_subscribed);
        assert_eq!(state.channel.channel.as_ref().unwrap().subscribers, 6);
        assert!(matches!(&commands[..], [NetworkCommand::RefreshProfile]));
    }

    #[test]
    fn test_subscribe_requires_sign_in() {
        let mut state = AppState::new(None);
        state.route = Route::Channel;
        state.channel = ChannelView::open("c1".to_string());
        state.channel.channel = Some(channel("c1", "u9"));

        let commands = state.handle_ui_event(UiEvent::ToggleSubscribe);
        assert!(commands.is_empty());
        assert_eq!(
            state.dialog,
            Dialog::Alert("Please sign in to subscribe to channels.".to_string())
        );
    }

    #[test]
    fn test_owner_cannot_subscribe_to_own_channel() {
        let mut state = AppState::new(Some(identity("u1", Some("c1"))));
        state.route = Route::Channel;
        state.channel = ChannelView::open("c1".to_string());
        state.channel.channel = Some(channel("c1", "u1"));

        let commands = state.handle_ui_event(UiEvent::ToggleSubscribe);
        assert!(commands.is_empty());
        assert!(!state.dialog.is_open());
    }

    #[test]
    fn test_upload_requires_files() {
        let mut state = AppState::new(Some(identity("u1", Some("c1"))));
        state.route = Route::CreateVideo;
        state.upload.title = "My video".to_string();

        let commands = state.handle_ui_event(UiEvent::Submit);
        assert!(commands.is_empty());
        assert_eq!(
            state.upload.error.as_deref(),
            Some("Please select both a thumbnail image and a video file.")
        );

        state.upload.thumbnail_path = "/tmp/thumb.png".to_string();
        state.upload.video_path = "/tmp/video.mp4".to_string();
        let commands = state.handle_ui_event(UiEvent::Submit);
        assert!(matches!(&commands[..], [NetworkCommand::UploadVideo(_)]));
        assert!(state.upload.submitting);
    }

    #[test]
    fn test_upload_requires_channel() {
        let mut state = AppState::new(Some(identity("u1", None)));
        state.route = Route::CreateVideo;
        state.upload.title = "My video".to_string();
        state.upload.thumbnail_path = "/tmp/t.png".to_string();
        state.upload.video_path = "/tmp/v.mp4".to_string();

        let commands = state.handle_ui_event(UiEvent::Submit);
        assert!(commands.is_empty());
        assert_eq!(
            state.upload.error.as_deref(),
            Some("Channel ID is missing. Cannot upload video.")
        );
    }

    #[test]
    fn test_go_create_video_gates_on_auth_and_channel() {
        let mut state = AppState::new(None);
        state.handle_ui_event(UiEvent::GoCreateVideo);
        assert_eq!(state.route, Route::Auth);
        assert_eq!(
            state.dialog,
            Dialog::Alert("You must be logged in to upload videos.".to_string())
        );

        let mut state = AppState::new(Some(identity("u1", None)));
        state.handle_ui_event(UiEvent::GoCreateVideo);
        assert_eq!(state.route, Route::CreateChannel);

        let mut state = AppState::new(Some(identity("u1", Some("c1"))));
        state.handle_ui_event(UiEvent::GoCreateVideo);
        assert_eq!(state.route, Route::CreateVideo);
    }

    #[test]
    fn test_edit_only_own_comment() {
        let mut state = AppState::new(Some(identity("u1", None)));
        state.route = Route::Video;
        state.video = VideoView::open("v1".to_string());
        state.video.comments = vec![comment("m1", "someone-else")];

        state.handle_ui_event(UiEvent::EditSelectedComment);
        assert!(state.video.editing.is_none());
        assert_eq!(state.input_mode, InputMode::Normal);
    }

    #[test]
    fn test_comment_edit_round_trip() {
        let mut state = AppState::new(Some(identity("u1", None)));
        state.route = Route::Video;
        state.video = VideoView::open("v1".to_string());
        state.video.comments = vec![comment("m1", "u1")];

        state.handle_ui_event(UiEvent::EditSelectedComment);
        assert_eq!(state.video.editing.as_deref(), Some("m1"));
        state.video.comment_input = "updated".to_string();

        let commands = state.handle_ui_event(UiEvent::Submit);
        assert!(matches!(
            &commands[..],
            [NetworkCommand::EditComment { comment_id, text }]
                if comment_id == "m1" && text == "updated"
        ));

        state.handle_response(NetworkResponse::CommentEdited {
            comment_id: "m1".to_string(),
            text: "updated".to_string(),
        });
        assert_eq!(state.video.comments[0].text, "updated");
        assert!(state.video.comment_input.is_empty());
    }

    #[test]
    fn test_logout_clears_identity_immediately() {
        let mut state = AppState::new(Some(identity("u1", None)));
        let commands = state.handle_ui_event(UiEvent::Logout);
        assert!(state.identity.is_none());
        assert!(matches!(&commands[..], [NetworkCommand::Logout]));
    }

    #[test]
    fn test_initial_commands_include_profile_refresh_when_signed_in() {
        let state = AppState::new(Some(identity("u1", None)));
        let commands = state.initial_commands();
        assert!(matches!(commands[0], NetworkCommand::RefreshProfile));
        assert!(matches!(commands[1], NetworkCommand::FetchVideos { .. }));

        let state = AppState::new(None);
        let commands = state.initial_commands();
        assert!(matches!(&commands[..], [NetworkCommand::FetchVideos { .. }]));
    }
}
