use chrono::{DateTime, Local};
use grabber_core::{
    AppViewModel, ChannelStatus, DownloadFormat, EntryRowView, Notice, NoticeSeverity,
    ProgressStatus, ProgressView,
};

const BAR_WIDTH: usize = 20;
const RULE: &str = "------------------------------------------------------------";

pub fn render(view: &AppViewModel) -> Vec<String> {
    let mut lines = Vec::new();

    let fetch_label = if view.fetching { "Fetching..." } else { "Fetch" };
    lines.push(format!("URL: {}  [{}]", display_url(&view.url_input), fetch_label));

    if let Some(playlist) = &view.playlist {
        lines.push(String::new());
        lines.push(playlist.title.clone());
        lines.push(format!("{} videos found", playlist.entry_count));
        lines.push(format!(
            "[{}]  Format: {}",
            view.select_all_label(),
            format_choice(view.format)
        ));
        lines.push(RULE.to_string());
        for row in &view.rows {
            lines.push(format_row(row));
            lines.push(format_thumbnail(row));
        }
        lines.push(RULE.to_string());
        if view.selected_count > 0 {
            lines.push(format!("[Download ({})]", view.selected_count));
        }
    }

    lines.push(status_line(view));
    lines
}

pub fn render_notice(notice: &Notice, at: DateTime<Local>) -> Vec<String> {
    let marker = match notice.severity {
        NoticeSeverity::Information => "INFO",
        NoticeSeverity::Error => "ERROR",
    };
    vec![
        RULE.to_string(),
        format!("{} [{}] {}", marker, at.format("%H:%M:%S"), notice.text),
        RULE.to_string(),
    ]
}

pub fn help_lines() -> Vec<String> {
    [
        "fetch [url]        fetch the playlist at url (or the current input)",
        "url <text>         set the playlist URL input",
        "toggle <row>       select or deselect one row",
        "all                select all / deselect all",
        "first <n>          keep only the first n rows selected",
        "format video|mp3   choose the download format",
        "download           start downloading the selected rows",
        "show               redraw the playlist",
        "help               this list",
        "quit               close the progress channel and exit",
    ]
    .iter()
    .map(|line| line.to_string())
    .collect()
}

fn format_row(row: &EntryRowView) -> String {
    let check = if row.selected { "[x]" } else { "[ ]" };
    let base = format!(
        "{check} {position:>3}. {title} ({duration})",
        position = row.position,
        title = row.title,
        duration = format_duration(row.duration)
    );
    match &row.progress {
        Some(progress) => format!("{base}  {}", progress_text(progress)),
        None => base,
    }
}

fn format_thumbnail(row: &EntryRowView) -> String {
    match row.thumbnail.as_deref() {
        Some(url) if !url.is_empty() => format!("        {url}"),
        _ => "        No Preview".to_string(),
    }
}

/// `m:ss`, with `0:00` for missing or zero durations.
pub fn format_duration(seconds: Option<f64>) -> String {
    let total = match seconds {
        Some(value) if value.is_finite() && value > 0.0 => value.floor() as u64,
        _ => 0,
    };
    format!("{}:{:02}", total / 60, total % 60)
}

pub fn progress_text(progress: &ProgressView) -> String {
    match progress.status {
        ProgressStatus::Finished => match &progress.download_url {
            Some(url) => format!("Completed -> {url}"),
            None => "Completed".to_string(),
        },
        ProgressStatus::Error => match &progress.message {
            Some(message) if !message.is_empty() => format!("Error: {message}"),
            _ => "Error".to_string(),
        },
        ProgressStatus::Running => format!(
            "{} {:.1}%",
            progress_bar(progress.percent),
            progress.percent
        ),
    }
}

fn progress_bar(percent: f64) -> String {
    // Drawing only; the reported percent is shown unmodified next to the bar.
    let fraction = if percent.is_finite() {
        percent.clamp(0.0, 100.0) / 100.0
    } else {
        0.0
    };
    let filled = (fraction * BAR_WIDTH as f64).round() as usize;
    format!("[{}{}]", "#".repeat(filled), "-".repeat(BAR_WIDTH - filled))
}

fn status_line(view: &AppViewModel) -> String {
    let channel = match &view.channel {
        ChannelStatus::Idle => "not connected".to_string(),
        ChannelStatus::Connecting => "connecting".to_string(),
        ChannelStatus::Connected => "connected".to_string(),
        ChannelStatus::Disconnected { reason } => {
            format!("disconnected ({reason}), progress updates stopped")
        }
    };
    format!(
        "Channel: {} | Active downloads: {}",
        channel, view.active_downloads
    )
}

fn display_url(url: &str) -> &str {
    if url.is_empty() {
        "<empty>"
    } else {
        url
    }
}

fn format_choice(format: DownloadFormat) -> &'static str {
    match format {
        DownloadFormat::Video => "(*) Video  ( ) MP3",
        DownloadFormat::Mp3 => "( ) Video  (*) MP3",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use grabber_core::{EntryKey, PlaylistView};
    use pretty_assertions::assert_eq;

    fn row(position: usize, selected: bool, progress: Option<ProgressView>) -> EntryRowView {
        EntryRowView {
            position,
            key: EntryKey::new(format!("k{position}")),
            title: format!("Video {position}"),
            thumbnail: None,
            duration: Some(185.0),
            selected,
            progress,
        }
    }

    fn progress(status: ProgressStatus, percent: f64) -> ProgressView {
        ProgressView {
            status,
            percent,
            message: None,
            download_url: None,
        }
    }

    #[test]
    fn durations_render_as_minutes_and_seconds() {
        assert_eq!(format_duration(Some(185.0)), "3:05");
        assert_eq!(format_duration(Some(59.9)), "0:59");
        assert_eq!(format_duration(Some(3600.0)), "60:00");
        assert_eq!(format_duration(Some(0.0)), "0:00");
        assert_eq!(format_duration(None), "0:00");
    }

    #[test]
    fn progress_text_by_status() {
        assert_eq!(
            progress_text(&progress(ProgressStatus::Running, 42.3)),
            "[########------------] 42.3%"
        );
        assert_eq!(
            progress_text(&progress(ProgressStatus::Finished, 100.0)),
            "Completed"
        );
        let failed = ProgressView {
            message: Some("Download failed".to_string()),
            ..progress(ProgressStatus::Error, 0.0)
        };
        assert_eq!(progress_text(&failed), "Error: Download failed");
        assert_eq!(progress_text(&progress(ProgressStatus::Error, 0.0)), "Error");
    }

    #[test]
    fn out_of_range_percent_is_shown_as_reported() {
        assert_eq!(
            progress_text(&progress(ProgressStatus::Running, 120.0)),
            "[####################] 120.0%"
        );
    }

    #[test]
    fn renders_playlist_with_footer_and_status() {
        let view = AppViewModel {
            url_input: "https://yt/list".to_string(),
            playlist: Some(PlaylistView {
                title: "Mix".to_string(),
                entry_count: 2,
                all_selected: false,
            }),
            rows: vec![
                EntryRowView {
                    thumbnail: Some("https://i.ytimg.com/vi/k1/hq.jpg".to_string()),
                    ..row(1, true, Some(progress(ProgressStatus::Running, 50.0)))
                },
                row(2, false, None),
            ],
            selected_count: 1,
            active_downloads: 1,
            format: DownloadFormat::Mp3,
            channel: ChannelStatus::Connected,
            ..AppViewModel::default()
        };

        let lines = render(&view);
        assert_eq!(
            lines,
            vec![
                "URL: https://yt/list  [Fetch]".to_string(),
                String::new(),
                "Mix".to_string(),
                "2 videos found".to_string(),
                "[Select All]  Format: ( ) Video  (*) MP3".to_string(),
                RULE.to_string(),
                "[x]   1. Video 1 (3:05)  [##########----------] 50.0%".to_string(),
                "        https://i.ytimg.com/vi/k1/hq.jpg".to_string(),
                "[ ]   2. Video 2 (3:05)".to_string(),
                "        No Preview".to_string(),
                RULE.to_string(),
                "[Download (1)]".to_string(),
                "Channel: connected | Active downloads: 1".to_string(),
            ]
        );
    }

    #[test]
    fn empty_selection_hides_download_footer() {
        let view = AppViewModel {
            playlist: Some(PlaylistView {
                title: "Mix".to_string(),
                entry_count: 1,
                all_selected: false,
            }),
            rows: vec![row(1, false, None)],
            ..AppViewModel::default()
        };
        let lines = render(&view);
        assert!(!lines.iter().any(|line| line.contains("Download (")));
    }

    #[test]
    fn disconnection_shows_in_status_line() {
        let view = AppViewModel {
            fetching: true,
            channel: ChannelStatus::Disconnected {
                reason: "closed by server".to_string(),
            },
            ..AppViewModel::default()
        };
        let lines = render(&view);
        assert_eq!(lines[0], "URL: <empty>  [Fetching...]");
        assert_eq!(
            lines.last().map(String::as_str),
            Some("Channel: disconnected (closed by server), progress updates stopped | Active downloads: 0")
        );
    }

    #[test]
    fn notices_carry_severity_and_time() {
        let at = Local.with_ymd_and_hms(2024, 5, 1, 9, 30, 5).unwrap();
        let lines = render_notice(&Notice::error("Please enter a playlist URL"), at);
        assert_eq!(lines[1], "ERROR [09:30:05] Please enter a playlist URL");
    }
}
