//! UI events - messages from UI layer to App layer

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

/// Routes the client can display. The router is thin glue: each route maps
/// to one draw function and one slice of app state.
#[derive(Clone, Copy, PartialEq, Debug, Default)]
pub enum Route {
    #[default]
    Home,
    Video,
    Channel,
    Auth,
    CreateVideo,
    CreateChannel,
}

/// Input mode
#[derive(Clone, Copy, PartialEq, Debug, Default)]
pub enum InputMode {
    #[default]
    Normal,
    Editing,
}

/// Login vs register on the auth page
#[derive(Clone, Copy, PartialEq, Debug, Default)]
pub enum AuthMode {
    #[default]
    Login,
    Register,
}

/// Focused field on the auth form
#[derive(Clone, Copy, PartialEq, Debug, Default)]
pub enum AuthField {
    #[default]
    Email,
    Password,
    Username,
}

impl AuthField {
    pub fn next(&self, mode: AuthMode) -> AuthField {
        match (self, mode) {
            (AuthField::Email, _) => AuthField::Password,
            (AuthField::Password, AuthMode::Register) => AuthField::Username,
            (AuthField::Password, AuthMode::Login) => AuthField::Email,
            (AuthField::Username, _) => AuthField::Email,
        }
    }
}

/// Focused field on the upload form
#[derive(Clone, Copy, PartialEq, Debug, Default)]
pub enum UploadField {
    #[default]
    Title,
    Description,
    ThumbnailPath,
    VideoPath,
}

impl UploadField {
    pub fn next(&self) -> UploadField {
        match self {
            UploadField::Title => UploadField::Description,
            UploadField::Description => UploadField::ThumbnailPath,
            UploadField::ThumbnailPath => UploadField::VideoPath,
            UploadField::VideoPath => UploadField::Title,
        }
    }
}

/// Focused field on the create-channel form
#[derive(Clone, Copy, PartialEq, Debug, Default)]
pub enum ChannelField {
    #[default]
    Name,
    Description,
    BannerPath,
    AvatarPath,
}

impl ChannelField {
    pub fn next(&self) -> ChannelField {
        match self {
            ChannelField::Name => ChannelField::Description,
            ChannelField::Description => ChannelField::BannerPath,
            ChannelField::BannerPath => ChannelField::AvatarPath,
            ChannelField::AvatarPath => ChannelField::Name,
        }
    }
}

/// Events generated from user input in the UI layer
#[derive(Debug, Clone)]
pub enum UiEvent {
    // Navigation
    GoHome,
    GoAuth,
    GoCreateVideo,
    GoCreateChannel,
    OpenSelectedVideo,
    OpenVideoChannel,
    Back,
    NextItem,
    PrevItem,
    NextCategory,
    PrevCategory,
    ScrollUp,
    ScrollDown,

    // Input editing
    StartSearch,
    StartEditing,
    StopEditing,
    CharInput(char),
    Backspace,
    NextField,
    CycleCategory,
    Submit,

    // Video actions
    Like,
    Dislike,
    ToggleSubscribe,
    NewComment,
    EditSelectedComment,
    DeleteSelectedComment,
    DeleteSelectedVideo,

    // Session
    ToggleAuthMode,
    Logout,

    // Dialog
    DialogConfirm,
    DialogCancel,

    // System
    ToggleHelp,
    CloseHelp,
    Refresh,
    Quit,
}

/// Convert a key event to a UiEvent based on current UI context
pub fn key_to_ui_event(
    key: KeyEvent,
    route: Route,
    input_mode: InputMode,
    dialog_open: bool,
    show_help: bool,
) -> Option<UiEvent> {
    use crossterm::event::KeyEventKind;

    if key.kind != KeyEventKind::Press {
        return None;
    }

    if key.modifiers.contains(KeyModifiers::CONTROL) {
        if let KeyCode::Char('c') = key.code {
            return Some(UiEvent::Quit);
        }
    }

    if show_help {
        return Some(UiEvent::CloseHelp);
    }

    // Dialogs capture all input until resolved
    if dialog_open {
        return match key.code {
            KeyCode::Enter | KeyCode::Char('y') => Some(UiEvent::DialogConfirm),
            KeyCode::Esc | KeyCode::Char('n') => Some(UiEvent::DialogCancel),
            _ => None,
        };
    }

    if input_mode == InputMode::Editing {
        return match key.code {
            KeyCode::Esc => Some(UiEvent::StopEditing),
            KeyCode::Enter => Some(UiEvent::Submit),
            KeyCode::Tab => Some(UiEvent::NextField),
            KeyCode::Backspace => Some(UiEvent::Backspace),
            KeyCode::Char(c) => Some(UiEvent::CharInput(c)),
            _ => None,
        };
    }

    // Normal-mode keys shared by every route
    match key.code {
        KeyCode::Char('q') => return Some(UiEvent::Quit),
        KeyCode::Char('?') => return Some(UiEvent::ToggleHelp),
        KeyCode::Esc => return Some(UiEvent::Back),
        _ => {}
    }

    match route {
        Route::Home => match key.code {
            KeyCode::Up | KeyCode::Char('k') => Some(UiEvent::PrevItem),
            KeyCode::Down | KeyCode::Char('j') => Some(UiEvent::NextItem),
            KeyCode::Left => Some(UiEvent::PrevCategory),
            KeyCode::Right => Some(UiEvent::NextCategory),
            KeyCode::Enter => Some(UiEvent::OpenSelectedVideo),
            KeyCode::Char('/') => Some(UiEvent::StartSearch),
            KeyCode::Char('r') => Some(UiEvent::Refresh),
            KeyCode::Char('u') => Some(UiEvent::GoCreateVideo),
            KeyCode::Char('n') => Some(UiEvent::GoCreateChannel),
            KeyCode::Char('a') => Some(UiEvent::GoAuth),
            KeyCode::Char('x') => Some(UiEvent::Logout),
            _ => None,
        },
        Route::Video => match key.code {
            KeyCode::Up => Some(UiEvent::ScrollUp),
            KeyCode::Down => Some(UiEvent::ScrollDown),
            KeyCode::Char('k') => Some(UiEvent::PrevItem),
            KeyCode::Char('j') => Some(UiEvent::NextItem),
            KeyCode::Char('l') => Some(UiEvent::Like),
            KeyCode::Char('d') => Some(UiEvent::Dislike),
            KeyCode::Char('s') => Some(UiEvent::ToggleSubscribe),
            KeyCode::Char('c') => Some(UiEvent::NewComment),
            KeyCode::Char('e') => Some(UiEvent::EditSelectedComment),
            KeyCode::Char('x') => Some(UiEvent::DeleteSelectedComment),
            KeyCode::Char('o') => Some(UiEvent::OpenVideoChannel),
            _ => None,
        },
        Route::Channel => match key.code {
            KeyCode::Up | KeyCode::Char('k') => Some(UiEvent::PrevItem),
            KeyCode::Down | KeyCode::Char('j') => Some(UiEvent::NextItem),
            KeyCode::Enter => Some(UiEvent::OpenSelectedVideo),
            KeyCode::Char('s') => Some(UiEvent::ToggleSubscribe),
            KeyCode::Char('u') => Some(UiEvent::GoCreateVideo),
            KeyCode::Char('d') => Some(UiEvent::DeleteSelectedVideo),
            _ => None,
        },
        Route::Auth => match key.code {
            KeyCode::Tab | KeyCode::BackTab => Some(UiEvent::NextField),
            KeyCode::Char('e') => Some(UiEvent::StartEditing),
            KeyCode::Char('t') => Some(UiEvent::ToggleAuthMode),
            KeyCode::Enter => Some(UiEvent::Submit),
            _ => None,
        },
        Route::CreateVideo => match key.code {
            KeyCode::Tab | KeyCode::BackTab => Some(UiEvent::NextField),
            KeyCode::Char('e') => Some(UiEvent::StartEditing),
            KeyCode::Char('c') => Some(UiEvent::CycleCategory),
            KeyCode::Enter => Some(UiEvent::Submit),
            _ => None,
        },
        Route::CreateChannel => match key.code {
            KeyCode::Tab | KeyCode::BackTab => Some(UiEvent::NextField),
            KeyCode::Char('e') => Some(UiEvent::StartEditing),
            KeyCode::Enter => Some(UiEvent::Submit),
            _ => None,
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossterm::event::{KeyEvent, KeyEventKind, KeyEventState};

    fn press(code: KeyCode) -> KeyEvent {
        KeyEvent {
            code,
            modifiers: KeyModifiers::NONE,
            kind: KeyEventKind::Press,
            state: KeyEventState::NONE,
        }
    }

    #[test]
    fn test_dialog_captures_input() {
        let ev = key_to_ui_event(
            press(KeyCode::Char('s')),
            Route::Video,
            InputMode::Normal,
            true,
            false,
        );
        assert!(ev.is_none());
        let ev = key_to_ui_event(
            press(KeyCode::Enter),
            Route::Video,
            InputMode::Normal,
            true,
            false,
        );
        assert!(matches!(ev, Some(UiEvent::DialogConfirm)));
    }

    #[test]
    fn test_editing_chars_go_to_input() {
        let ev = key_to_ui_event(
            press(KeyCode::Char('q')),
            Route::Auth,
            InputMode::Editing,
            false,
            false,
        );
        assert!(matches!(ev, Some(UiEvent::CharInput('q'))));
    }

    #[test]
    fn test_subscribe_key_on_video_route() {
        let ev = key_to_ui_event(
            press(KeyCode::Char('s')),
            Route::Video,
            InputMode::Normal,
            false,
            false,
        );
        assert!(matches!(ev, Some(UiEvent::ToggleSubscribe)));
    }

    #[test]
    fn test_auth_field_cycle_respects_mode() {
        assert_eq!(AuthField::Password.next(AuthMode::Login), AuthField::Email);
        assert_eq!(
            AuthField::Password.next(AuthMode::Register),
            AuthField::Username
        );
    }
}
