//! Settings view: where the books live and how the app is configured

use ratatui::{
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    Frame,
};

use crate::auth::SessionStore;
use crate::tui::app::App;

use super::render_text;

fn row(label: &str, value: impl Into<String>) -> Line<'static> {
    Line::from(vec![
        Span::styled(format!("  {:<20}", label), Style::default().fg(Color::Cyan)),
        Span::raw(value.into()),
    ])
}

fn section(title: &str) -> Line<'static> {
    Line::styled(
        title.to_string(),
        Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD),
    )
}

fn configured(value: Option<String>) -> String {
    if value.is_some() { "configured" } else { "not set" }.to_string()
}

pub fn render(frame: &mut Frame, app: &App, area: Rect) {
    let settings = app.settings;
    let paths = app.paths;

    let session = match SessionStore::new(paths.clone()).load() {
        Ok(Some(session)) if session.is_expired() => "session expired".to_string(),
        Ok(Some(session)) => format!(
            "signed in as {}",
            session.user.email.as_deref().unwrap_or(&session.user.id)
        ),
        Ok(None) => "signed out".to_string(),
        Err(e) => format!("unreadable session ({})", e),
    };

    let lines = vec![
        section("Business"),
        row("Name", settings.business_name.clone()),
        row("Currency symbol", settings.currency_symbol.clone()),
        row("Date format", settings.date_format.clone()),
        row("Due-soon window", format!("{} days", settings.upcoming_days)),
        Line::from(""),
        section("Storage"),
        row("Data directory", paths.data_dir().display().to_string()),
        row("Settings file", paths.settings_file().display().to_string()),
        row("Backups", paths.backup_dir().display().to_string()),
        row(
            "Backup retention",
            format!(
                "{} daily, {} monthly",
                settings.backup_retention.daily_count, settings.backup_retention.monthly_count
            ),
        ),
        row("Audit log", paths.audit_log().display().to_string()),
        Line::from(""),
        section("Assistant"),
        row("Model", settings.assistant.model.clone()),
        row("Endpoint", settings.assistant.base_url.clone()),
        row("Timeout", format!("{}s", settings.assistant.timeout_secs)),
        Line::from(""),
        section("Account"),
        row("Supabase URL", configured(settings.supabase_url())),
        row("Supabase key", configured(settings.supabase_anon_key())),
        row("Session", session),
        Line::from(""),
        Line::styled(
            "  Edit settings.json or use `libro config` to change these values.",
            Style::default().fg(Color::DarkGray),
        ),
    ];

    render_text(frame, area, "Settings", lines, app.scroll);
}
