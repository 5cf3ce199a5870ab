//! TubeTUI - terminal client for a video-sharing platform
//!
//! Architecture:
//! - UI Layer (Ratatui) - synchronous terminal rendering
//! - App Layer - central state machine processing events
//! - Network Layer (Tokio) - async REST calls and session management

mod api;
mod app;
mod auth;
mod constants;
mod messages;
mod models;
mod network;
mod ui;

use std::io;
use std::time::Duration;

use crossterm::{
    event::{self, Event},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{prelude::*, widgets::*};
use tokio::sync::mpsc;

use api::ApiClient;
use app::state::Dialog;
use app::AppActor;
use auth::{SessionStore, TokenStore};
use constants::{API_URL_ENV, DEFAULT_API_URL, FILTER_CATEGORIES};
use messages::ui_events::{key_to_ui_event, AuthField, AuthMode, InputMode, Route};
use messages::{NetworkCommand, NetworkResponse, RenderState, UiEvent};
use network::NetworkActor;

/// Terminal cleanup guard
struct TerminalGuard;

impl Drop for TerminalGuard {
    fn drop(&mut self) {
        let _ = disable_raw_mode();
        let _ = execute!(io::stdout(), LeaveAlternateScreen);
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize logging to file
    let file_appender = tracing_appender::rolling::never(".", "tubetui.log");
    let (non_blocking, _guard) = tracing_appender::non_blocking(file_appender);
    tracing_subscriber::fmt()
        .with_writer(non_blocking)
        .with_ansi(false)
        .init();

    let base_url =
        std::env::var(API_URL_ENV).unwrap_or_else(|_| DEFAULT_API_URL.to_string());
    tracing::info!(%base_url, "starting");

    // Restore the persisted session before anything renders
    let mut session = SessionStore::new(TokenStore::new());
    let identity = session.bootstrap().cloned();
    if let Some(identity) = &identity {
        tracing::info!(user_id = %identity.user_id, "restored session");
    }

    // Terminal setup
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let _guard = TerminalGuard;

    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    // Create channels
    let (ui_tx, ui_rx) = mpsc::unbounded_channel::<UiEvent>();
    let (net_cmd_tx, net_cmd_rx) = mpsc::unbounded_channel::<NetworkCommand>();
    let (net_resp_tx, net_resp_rx) = mpsc::unbounded_channel::<NetworkResponse>();
    let (render_tx, mut render_rx) = mpsc::unbounded_channel::<RenderState>();

    // Spawn network actor
    let network_actor = NetworkActor::new(ApiClient::new(base_url), session, net_resp_tx);
    tokio::spawn(network_actor.run(net_cmd_rx));

    // Spawn app actor
    let app_actor = AppActor::new(identity, net_cmd_tx, render_tx);
    tokio::spawn(app_actor.run(ui_rx, net_resp_rx));

    // Run UI loop (synchronous with async polling)
    run_ui_loop(&mut terminal, ui_tx, &mut render_rx).await?;

    Ok(())
}

/// Run the synchronous UI rendering loop
async fn run_ui_loop(
    terminal: &mut Terminal<impl Backend>,
    ui_tx: mpsc::UnboundedSender<UiEvent>,
    render_rx: &mut mpsc::UnboundedReceiver<RenderState>,
) -> anyhow::Result<()> {
    let mut current_state = RenderState::default();

    loop {
        // Draw with current state
        terminal.draw(|f| draw_ui(f, &current_state))?;

        // Poll for events with timeout
        if event::poll(Duration::from_millis(50))? {
            if let Event::Key(key) = event::read()? {
                if let Some(event) = key_to_ui_event(
                    key,
                    current_state.route,
                    current_state.input_mode,
                    current_state.dialog.is_open(),
                    current_state.show_help,
                ) {
                    if matches!(event, UiEvent::Quit) {
                        let _ = ui_tx.send(event);
                        break;
                    }
                    let _ = ui_tx.send(event);
                }
            }
        }

        // Check for state updates (non-blocking)
        while let Ok(state) = render_rx.try_recv() {
            current_state = state;
        }
    }

    Ok(())
}

// ============================================================================
// UI Drawing Functions
// ============================================================================

fn draw_ui(f: &mut Frame, state: &RenderState) {
    let area = f.area();

    let main_chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1), // Header bar
            Constraint::Min(0),    // Content
            Constraint::Length(1), // Status bar
        ])
        .split(area);

    draw_header_bar(f, state, main_chunks[0]);

    match state.route {
        Route::Home => draw_home(f, state, main_chunks[1]),
        Route::Video => draw_video(f, state, main_chunks[1]),
        Route::Channel => draw_channel(f, state, main_chunks[1]),
        Route::Auth => draw_auth(f, state, main_chunks[1]),
        Route::CreateVideo => draw_upload(f, state, main_chunks[1]),
        Route::CreateChannel => draw_create_channel(f, state, main_chunks[1]),
    }

    draw_status_bar(f, state, main_chunks[2]);

    // Popups
    if state.show_help {
        draw_help_popup(f, area);
    }
    if state.dialog.is_open() {
        draw_dialog(f, &state.dialog, area);
    }
}

fn draw_header_bar(f: &mut Frame, state: &RenderState, area: Rect) {
    let session = match &state.identity {
        Some(identity) => Span::styled(
            format!(" {} ", identity.display_name()),
            Style::default().fg(Color::Green),
        ),
        None => Span::styled(" signed out ", Style::default().fg(Color::DarkGray)),
    };

    let header = Line::from(vec![
        Span::styled(
            " TubeTUI ",
            Style::default().fg(Color::Black).bg(Color::Red).bold(),
        ),
        Span::raw(" "),
        session,
    ]);
    f.render_widget(Paragraph::new(header), area);
}

fn draw_home(f: &mut Frame, state: &RenderState, area: Rect) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Search
            Constraint::Length(1), // Category tabs
            Constraint::Min(1),    // Video list
        ])
        .split(area);

    let searching = state.route == Route::Home && state.input_mode == InputMode::Editing;
    f.render_widget(
        ui::render_input(&state.home.search, " Search (/) ", searching),
        chunks[0],
    );

    f.render_widget(
        ui::render_tabs(FILTER_CATEGORIES, state.home.active_category),
        chunks[1],
    );

    let block = Block::default()
        .borders(Borders::ALL)
        .title(format!(" Videos ({}) ", state.home.videos.len()));

    if state.home.loading {
        f.render_widget(
            Paragraph::new("Loading videos...")
                .style(Style::default().fg(Color::DarkGray))
                .block(block),
            chunks[2],
        );
        return;
    }
    if let Some(error) = &state.home.error {
        f.render_widget(
            Paragraph::new(error.as_str())
                .style(Style::default().fg(Color::Red))
                .wrap(Wrap { trim: false })
                .block(block),
            chunks[2],
        );
        return;
    }
    if state.home.videos.is_empty() {
        f.render_widget(
            Paragraph::new("No videos found.")
                .style(Style::default().fg(Color::DarkGray))
                .block(block),
            chunks[2],
        );
        return;
    }

    let items: Vec<ListItem> = state.home.videos.iter().map(video_list_item).collect();
    let list = List::new(items)
        .block(block)
        .highlight_style(Style::default().fg(Color::Yellow).bold())
        .highlight_symbol("> ");

    let mut list_state = ListState::default();
    list_state.select(Some(state.home.selected));
    f.render_stateful_widget(list, chunks[2], &mut list_state);
}

fn video_list_item(video: &models::Video) -> ListItem<'_> {
    let channel_name = video
        .channel
        .as_ref()
        .and_then(|c| c.channel_name.as_deref())
        .or_else(|| video.uploader.as_ref().and_then(|u| u.username.as_deref()))
        .unwrap_or("Unknown");

    let meta = format!(
        "   {} | {} views | {} | {}",
        channel_name,
        ui::format_count(video.views),
        video.category,
        ui::format_date(video.created_at.as_ref()),
    );
    ListItem::new(vec![
        Line::from(Span::styled(
            video.title.clone(),
            Style::default().bold(),
        )),
        Line::from(Span::styled(meta, Style::default().fg(Color::DarkGray))),
    ])
}

fn draw_video(f: &mut Frame, state: &RenderState, area: Rect) {
    let view = &state.video;

    if view.loading {
        f.render_widget(
            Paragraph::new("Loading video...")
                .style(Style::default().fg(Color::DarkGray))
                .block(Block::default().borders(Borders::ALL)),
            area,
        );
        return;
    }
    if let Some(error) = &view.error {
        f.render_widget(
            Paragraph::new(error.as_str())
                .style(Style::default().fg(Color::Red))
                .wrap(Wrap { trim: false })
                .block(Block::default().borders(Borders::ALL).title(" Error ")),
            area,
        );
        return;
    }
    let Some(video) = &view.video else {
        f.render_widget(
            Paragraph::new("Video or channel data not found.")
                .style(Style::default().fg(Color::DarkGray))
                .block(Block::default().borders(Borders::ALL)),
            area,
        );
        return;
    };

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(8), // Video info
            Constraint::Min(3),    // Comments
            Constraint::Length(3), // Comment input
        ])
        .split(area);

    let channel_name = view
        .channel
        .as_ref()
        .map(|c| c.channel_name.as_str())
        .or_else(|| video.uploader.as_ref().and_then(|u| u.username.as_deref()))
        .unwrap_or("Unknown channel");
    let subscribers = view.channel.as_ref().map(|c| c.subscribers).unwrap_or(0);
    let sub_label = if view.is_subscribed {
        Span::styled("[Subscribed]", Style::default().fg(Color::Green))
    } else {
        Span::styled("[s: Subscribe]", Style::default().fg(Color::DarkGray))
    };

    let mut lines = vec![
        Line::from(Span::styled(video.title.clone(), Style::default().bold())),
        Line::from(vec![
            Span::styled(channel_name.to_string(), Style::default().fg(Color::Cyan)),
            Span::raw(format!(
                " | {} subscribers ",
                ui::format_count(subscribers)
            )),
            sub_label,
        ]),
        Line::from(Span::styled(
            format!(
                "{} views | {} likes (l) | {} dislikes (d)",
                ui::format_count(video.views),
                video.likes.len(),
                video.dislikes.len(),
            ),
            Style::default().fg(Color::DarkGray),
        )),
        Line::from(""),
    ];
    if video.description.is_empty() {
        lines.push(Line::from(Span::styled(
            "No description provided.",
            Style::default().fg(Color::DarkGray),
        )));
    } else {
        lines.push(Line::from(video.description.clone()));
    }
    if !video.video_url.is_empty() {
        lines.push(Line::from(""));
        lines.push(Line::from(Span::styled(
            format!("Stream: {}", video.video_url),
            Style::default().fg(Color::Blue),
        )));
    }

    f.render_widget(
        Paragraph::new(lines)
            .block(Block::default().borders(Borders::ALL).title(" Now Playing "))
            .wrap(Wrap { trim: false })
            .scroll((view.scroll, 0)),
        chunks[0],
    );

    // Comment thread
    let comments_block = Block::default().borders(Borders::ALL).title(format!(
        " Comments ({}) (j/k: select, c: new, e: edit, x: delete) ",
        view.comments.len()
    ));
    if view.comments.is_empty() {
        f.render_widget(
            Paragraph::new("No comments yet.")
                .style(Style::default().fg(Color::DarkGray))
                .block(comments_block),
            chunks[1],
        );
    } else {
        let items: Vec<ListItem> = view
            .comments
            .iter()
            .map(|comment| {
                ListItem::new(Line::from(vec![
                    Span::styled(
                        format!("{}: ", comment.display_name()),
                        Style::default().fg(Color::Cyan),
                    ),
                    Span::raw(comment.text.clone()),
                ]))
            })
            .collect();
        let list = List::new(items)
            .block(comments_block)
            .highlight_style(Style::default().fg(Color::Yellow).bold())
            .highlight_symbol("> ");
        let mut list_state = ListState::default();
        list_state.select(Some(view.selected_comment));
        f.render_stateful_widget(list, chunks[1], &mut list_state);
    }

    let input_title = if view.editing.is_some() {
        " Edit comment (Enter: save, Esc: cancel) "
    } else {
        " Add a comment... (c) "
    };
    let editing_now = state.route == Route::Video && state.input_mode == InputMode::Editing;
    f.render_widget(
        ui::render_input(&view.comment_input, input_title, editing_now),
        chunks[2],
    );
}

fn draw_channel(f: &mut Frame, state: &RenderState, area: Rect) {
    let view = &state.channel;

    if view.loading {
        f.render_widget(
            Paragraph::new("Loading channel...")
                .style(Style::default().fg(Color::DarkGray))
                .block(Block::default().borders(Borders::ALL)),
            area,
        );
        return;
    }
    if let Some(error) = &view.error {
        f.render_widget(
            Paragraph::new(error.as_str())
                .style(Style::default().fg(Color::Red))
                .wrap(Wrap { trim: false })
                .block(Block::default().borders(Borders::ALL).title(" Error ")),
            area,
        );
        return;
    }
    let Some(channel) = &view.channel else {
        return;
    };

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(5), Constraint::Min(1)])
        .split(area);

    let is_owner = state
        .identity
        .as_ref()
        .is_some_and(|identity| identity.user_id == channel.owner_id());
    let sub_label = if is_owner {
        Span::styled("[Your channel]", Style::default().fg(Color::Green))
    } else if view.is_subscribed {
        Span::styled("[Subscribed] (s)", Style::default().fg(Color::Green))
    } else {
        Span::styled("[s: Subscribe]", Style::default().fg(Color::DarkGray))
    };

    let header = vec![
        Line::from(Span::styled(
            channel.channel_name.clone(),
            Style::default().bold(),
        )),
        Line::from(vec![
            Span::raw(format!(
                "{} subscribers ",
                ui::format_count(channel.subscribers)
            )),
            sub_label,
        ]),
        Line::from(Span::styled(
            if channel.description.is_empty() {
                "No description provided.".to_string()
            } else {
                channel.description.clone()
            },
            Style::default().fg(Color::DarkGray),
        )),
    ];
    f.render_widget(
        Paragraph::new(header)
            .block(Block::default().borders(Borders::ALL).title(" Channel "))
            .wrap(Wrap { trim: false }),
        chunks[0],
    );

    let title = if is_owner {
        format!(
            " Uploads ({}) (Enter: watch, u: upload, d: delete) ",
            view.videos.len()
        )
    } else {
        format!(" Uploads ({}) (Enter: watch) ", view.videos.len())
    };
    let block = Block::default().borders(Borders::ALL).title(title);

    if view.videos.is_empty() {
        f.render_widget(
            Paragraph::new("This channel has no videos yet.")
                .style(Style::default().fg(Color::DarkGray))
                .block(block),
            chunks[1],
        );
        return;
    }

    let items: Vec<ListItem> = view.videos.iter().map(video_list_item).collect();
    let list = List::new(items)
        .block(block)
        .highlight_style(Style::default().fg(Color::Yellow).bold())
        .highlight_symbol("> ");
    let mut list_state = ListState::default();
    list_state.select(Some(view.selected));
    f.render_stateful_widget(list, chunks[1], &mut list_state);
}

fn draw_auth(f: &mut Frame, state: &RenderState, area: Rect) {
    let form = &state.auth;
    let popup = centered_rect(60, 70, area);

    let title = match form.mode {
        AuthMode::Login => " Sign In (t: switch to register) ",
        AuthMode::Register => " Register (t: switch to sign in) ",
    };
    let outer = Block::default().borders(Borders::ALL).title(title);
    let inner = outer.inner(popup);
    f.render_widget(Clear, popup);
    f.render_widget(outer, popup);

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Username (register only)
            Constraint::Length(3), // Email
            Constraint::Length(3), // Password
            Constraint::Length(2), // Error / status
            Constraint::Min(0),
        ])
        .split(inner);

    let editing = state.input_mode == InputMode::Editing;
    if form.mode == AuthMode::Register {
        f.render_widget(
            ui::render_input(
                &form.username,
                " Username ",
                editing && form.field == AuthField::Username,
            ),
            chunks[0],
        );
    }
    f.render_widget(
        ui::render_input(
            &form.email,
            " Email ",
            editing && form.field == AuthField::Email,
        ),
        chunks[1],
    );
    let masked = "*".repeat(form.password.chars().count());
    f.render_widget(
        ui::render_input(
            &masked,
            " Password ",
            editing && form.field == AuthField::Password,
        ),
        chunks[2],
    );

    if let Some(error) = &form.error {
        f.render_widget(
            Paragraph::new(error.as_str()).style(Style::default().fg(Color::Red)),
            chunks[3],
        );
    } else if form.submitting {
        f.render_widget(
            Paragraph::new("Signing in...").style(Style::default().fg(Color::DarkGray)),
            chunks[3],
        );
    }
}

fn draw_upload(f: &mut Frame, state: &RenderState, area: Rect) {
    use messages::ui_events::UploadField;

    let form = &state.upload;
    let outer = Block::default()
        .borders(Borders::ALL)
        .title(" Upload Video (Tab: field, e: edit, c: category, Enter: submit) ");
    let inner = outer.inner(area);
    f.render_widget(outer, area);

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Length(3),
            Constraint::Length(3),
            Constraint::Length(3),
            Constraint::Length(1),
            Constraint::Length(2),
            Constraint::Min(0),
        ])
        .split(inner);

    let editing = state.input_mode == InputMode::Editing;
    f.render_widget(
        ui::render_input(
            &form.title,
            " Title ",
            editing && form.field == UploadField::Title,
        ),
        chunks[0],
    );
    f.render_widget(
        ui::render_input(
            &form.description,
            " Description ",
            editing && form.field == UploadField::Description,
        ),
        chunks[1],
    );
    f.render_widget(
        ui::render_input(
            &form.thumbnail_path,
            " Thumbnail file path ",
            editing && form.field == UploadField::ThumbnailPath,
        ),
        chunks[2],
    );
    f.render_widget(
        ui::render_input(
            &form.video_path,
            " Video file path ",
            editing && form.field == UploadField::VideoPath,
        ),
        chunks[3],
    );
    f.render_widget(
        Paragraph::new(format!("Category: {} (c: cycle)", form.category_name())),
        chunks[4],
    );

    if let Some(error) = &form.error {
        f.render_widget(
            Paragraph::new(error.as_str()).style(Style::default().fg(Color::Red)),
            chunks[5],
        );
    } else if form.submitting {
        f.render_widget(
            Paragraph::new("Uploading...").style(Style::default().fg(Color::DarkGray)),
            chunks[5],
        );
    }
}

fn draw_create_channel(f: &mut Frame, state: &RenderState, area: Rect) {
    use messages::ui_events::ChannelField;

    let form = &state.channel_form;
    let outer = Block::default()
        .borders(Borders::ALL)
        .title(" Create Channel (Tab: field, e: edit, Enter: submit) ");
    let inner = outer.inner(area);
    f.render_widget(outer, area);

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Length(3),
            Constraint::Length(3),
            Constraint::Length(3),
            Constraint::Length(2),
            Constraint::Min(0),
        ])
        .split(inner);

    let editing = state.input_mode == InputMode::Editing;
    f.render_widget(
        ui::render_input(
            &form.channel_name,
            " Channel name ",
            editing && form.field == ChannelField::Name,
        ),
        chunks[0],
    );
    f.render_widget(
        ui::render_input(
            &form.description,
            " Description ",
            editing && form.field == ChannelField::Description,
        ),
        chunks[1],
    );
    f.render_widget(
        ui::render_input(
            &form.banner_path,
            " Banner image path ",
            editing && form.field == ChannelField::BannerPath,
        ),
        chunks[2],
    );
    f.render_widget(
        ui::render_input(
            &form.avatar_path,
            " Avatar image path ",
            editing && form.field == ChannelField::AvatarPath,
        ),
        chunks[3],
    );

    if let Some(error) = &form.error {
        f.render_widget(
            Paragraph::new(error.as_str()).style(Style::default().fg(Color::Red)),
            chunks[4],
        );
    } else if form.submitting {
        f.render_widget(
            Paragraph::new("Creating channel...").style(Style::default().fg(Color::DarkGray)),
            chunks[4],
        );
    }
}

fn draw_status_bar(f: &mut Frame, state: &RenderState, area: Rect) {
    let status = if state.input_mode == InputMode::Editing {
        " ESC:stop editing | Tab:next field | Enter:submit "
    } else {
        match state.route {
            Route::Home => {
                " j/k:select | Enter:watch | \u{2190}/\u{2192}:category | /:search | r:refresh | a:sign in | u:upload | ?:help | q:quit "
            }
            Route::Video => {
                " l:like | d:dislike | s:subscribe | c:comment | o:channel | Esc:back | ?:help "
            }
            Route::Channel => " j/k:select | Enter:watch | s:subscribe | Esc:back | ?:help ",
            Route::Auth => " e:edit field | Tab:next field | t:login/register | Enter:submit ",
            Route::CreateVideo => " e:edit field | Tab:next | c:category | Enter:submit | Esc:back ",
            Route::CreateChannel => " e:edit field | Tab:next | Enter:submit | Esc:back ",
        }
    };

    let bar = Paragraph::new(status).style(Style::default().fg(Color::DarkGray));
    f.render_widget(bar, area);
}

fn draw_dialog(f: &mut Frame, dialog: &Dialog, area: Rect) {
    let popup_area = centered_rect(50, 25, area);

    let (title, message) = match dialog {
        Dialog::Alert(message) => (" Notice (Enter: ok) ", message.as_str()),
        Dialog::Confirm { message, .. } => (" Confirm (y/Enter: yes, n/Esc: no) ", message.as_str()),
        Dialog::None => return,
    };

    let block = Block::default()
        .borders(Borders::ALL)
        .title(title)
        .style(Style::default().bg(Color::Black));

    let body = Paragraph::new(message)
        .block(block)
        .wrap(Wrap { trim: false });

    f.render_widget(Clear, popup_area);
    f.render_widget(body, popup_area);
}

fn draw_help_popup(f: &mut Frame, area: Rect) {
    let popup_area = centered_rect(60, 80, area);

    let help_text = r#"
 TUBETUI - Keyboard Shortcuts

 HOME
   j / k, ↑ / ↓       Select video
   Enter              Watch selected video
   ← / →              Change category filter
   /                  Search
   r                  Refresh feed
   a                  Sign in / register
   u                  Upload a video
   n                  Create a channel
   x                  Sign out

 WATCH PAGE
   l / d              Like / dislike
   s                  Subscribe / unsubscribe
   c                  New comment
   j / k              Select comment
   e / x              Edit / delete own comment
   o                  Open the channel
   ↑ / ↓              Scroll description

 FORMS
   Tab                Next field
   e                  Edit focused field
   Enter              Submit

 GENERAL
   Esc                Back / cancel
   ?                  Toggle this help
   q / Ctrl+C         Quit

 Press any key to close...
"#;

    let block = Block::default()
        .borders(Borders::ALL)
        .title(" Help ")
        .style(Style::default().bg(Color::Black));

    let help = Paragraph::new(help_text)
        .block(block)
        .wrap(Wrap { trim: false });

    f.render_widget(Clear, popup_area);
    f.render_widget(help, popup_area);
}

fn centered_rect(percent_x: u16, percent_y: u16, r: Rect) -> Rect {
    let popup_layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(r);

    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(popup_layout[1])[1]
}
