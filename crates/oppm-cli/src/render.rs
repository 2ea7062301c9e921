use std::io::IsTerminal;
use std::time::Duration;

use anstyle::{AnsiColor, Effects, Style};
use indicatif::{ProgressBar, ProgressStyle};

#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub(crate) enum OutputStyle {
    Plain,
    Rich,
}

/// Rich output only on a terminal that has not opted out via NO_COLOR.
pub(crate) fn current_output_style() -> OutputStyle {
    if std::env::var_os("NO_COLOR").is_some() {
        return OutputStyle::Plain;
    }
    if std::io::stdout().is_terminal() {
        OutputStyle::Rich
    } else {
        OutputStyle::Plain
    }
}

pub(crate) fn render_status_line(style: OutputStyle, status: &str, message: &str) -> String {
    match style {
        OutputStyle::Plain => message.to_string(),
        OutputStyle::Rich => {
            let badge = match status {
                "ok" => "[OK]",
                "warn" => "[WARN]",
                "err" => "[ERR]",
                _ => "[..]",
            };
            format!("{badge} {message}")
        }
    }
}

pub(crate) fn render_section_header(style: OutputStyle, title: &str) -> Option<String> {
    match style {
        OutputStyle::Plain => None,
        OutputStyle::Rich => Some(colorize(section_style(), &format!("== {title} =="))),
    }
}

/// Two-column rows with the left column padded to a shared width.
pub(crate) fn format_table(rows: &[(String, String)]) -> Vec<String> {
    let width = rows.iter().map(|(left, _)| left.len()).max().unwrap_or(0);
    rows.iter()
        .map(|(left, right)| format!("{left:<width$}  {right}"))
        .collect()
}

pub(crate) struct TerminalSpinner {
    progress_bar: Option<ProgressBar>,
}

/// Spinner shown during the long operations; silent in plain mode.
pub(crate) fn start_spinner(style: OutputStyle, label: &str) -> TerminalSpinner {
    let progress_bar = if style == OutputStyle::Rich {
        let progress_bar = ProgressBar::new_spinner();
        if let Ok(template) = ProgressStyle::with_template("{spinner:.cyan.bold} {msg}") {
            progress_bar.set_style(template.tick_chars(spinner_tick_chars(label)));
        }
        progress_bar.set_message(label.to_string());
        progress_bar.enable_steady_tick(Duration::from_millis(80));
        Some(progress_bar)
    } else {
        None
    };
    TerminalSpinner { progress_bar }
}

impl TerminalSpinner {
    pub(crate) fn finish(self) {
        if let Some(progress_bar) = self.progress_bar {
            progress_bar.finish_and_clear();
        }
    }
}

fn spinner_tick_chars(label: &str) -> &'static str {
    match label {
        "install" => ".oO@* ",
        "pack" => "-=~* ",
        "rebuild" => "<^>v ",
        _ => "|/-\\ ",
    }
}

fn section_style() -> Style {
    Style::new()
        .fg_color(Some(AnsiColor::BrightBlue.into()))
        .effects(Effects::BOLD)
}

fn colorize(style: Style, text: &str) -> String {
    format!("{}{}{}", style.render(), text, style.render_reset())
}
