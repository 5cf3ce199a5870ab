//! Render state - the snapshot the app actor hands to the UI loop

use crate::app::state::{
    AuthForm, ChannelForm, ChannelView, Dialog, HomeView, UploadForm, VideoView,
};
use crate::auth::Identity;
use crate::messages::ui_events::{InputMode, Route};

/// Everything the renderer needs for one frame. Cloned out of `AppState`
/// so the UI thread never borrows actor-owned data.
#[derive(Clone, Debug, Default)]
pub struct RenderState {
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
}
