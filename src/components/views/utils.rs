use super::types::{Action, Data};
use crate::backend::types::{MediaItem, MediaKind};
use crate::backend::{MediaUpdate, Watch};
use chrono::Local;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use ratatui::style::{Style, Stylize};
use ratatui::text::{Line, Span};
use ratatui::widgets::Block;
use tokio::sync::mpsc::UnboundedSender;
use tokio::sync::oneshot;
use tui_textarea::TextArea;

/// Forwards every published listing to `tx` until the returned sender fires.
pub fn forward_media(
    tx: UnboundedSender<Action>,
    watch: &dyn Watch<Output = MediaUpdate>,
) -> oneshot::Sender<()> {
    let mut rx = watch.subscribe();
    let (quit_tx, mut quit_rx) = oneshot::channel();
    tokio::spawn(async move {
        loop {
            tokio::select! {
                changed = rx.changed() => {
                    match changed {
                        Ok(()) => {
                            let update = rx.borrow_and_update().clone();
                            if let Err(e) = tx.send(Action::Update(Box::new(Data::Media(update)))) {
                                log::error!("failed to send update action: {e}");
                            }
                        }
                        Err(e) => {
                            log::warn!("changed channel error: {e}");
                            break;
                        }
                    }
                }
                _ = &mut quit_rx => {
                    break;
                }
            }
        }
        log::debug!("subscription finished");
    });
    quit_tx
}

pub fn stop(quit: &mut Option<oneshot::Sender<()>>, watch: &dyn Watch<Output = MediaUpdate>) {
    if let Some(tx) = quit.take() {
        if tx.send(()).is_err() {
            log::error!("failed to send quit signal");
        }
    }
    watch.unsubscribe();
}

pub fn single_line_input(title: &str) -> TextArea<'static> {
    let mut textarea = TextArea::default();
    textarea.set_block(Block::bordered().title(title.to_string()).dim());
    textarea.set_cursor_line_style(Style::default());
    textarea.set_cursor_style(Style::default());
    textarea
}

pub fn set_focused(textarea: &mut TextArea<'static>, focused: bool) {
    if focused {
        textarea.set_cursor_style(Style::default().reversed());
    } else {
        textarea.set_cursor_style(Style::default());
    }
    if let Some(block) = textarea.block() {
        let block = block.clone();
        textarea.set_block(if focused { block.reset() } else { block.dim() });
    }
}

pub fn is_submit(key: &KeyEvent) -> bool {
    matches!(
        (key.code, key.modifiers),
        (KeyCode::Enter, _) | (KeyCode::Char('m'), KeyModifiers::CONTROL)
    )
}

/// Feeds `key` into a one-line text area. Line breaks are not inserted.
pub fn input(textarea: &mut TextArea<'static>, key: KeyEvent) -> Option<Action> {
    if is_submit(&key) {
        return None;
    }
    let cursor = textarea.cursor();
    if textarea.input(key) || textarea.cursor() != cursor {
        Some(Action::Render)
    } else {
        None
    }
}

pub fn text(textarea: &TextArea<'static>) -> String {
    textarea.lines().join("")
}

pub fn kind_label(kind: MediaKind) -> Span<'static> {
    match kind {
        MediaKind::Image => Span::from("IMG").green(),
        MediaKind::Video => Span::from("VID").magenta(),
    }
}

pub fn item_line(item: &MediaItem, selected: Option<bool>) -> Line<'_> {
    let mut spans = Vec::new();
    match selected {
        Some(true) => spans.push(Span::from("[x] ").yellow()),
        Some(false) => spans.push(Span::from("[ ] ").dim()),
        None => {}
    }
    spans.push(kind_label(item.kind()));
    spans.push(Span::from(" "));
    match item.caption() {
        Some(caption) => spans.push(Span::from(caption).bold()),
        None => spans.push(Span::from(item.id()).dim()),
    }
    if let Some(uploaded_at) = item.uploaded_at() {
        spans.push(Span::from(format!(
            "  {}",
            uploaded_at.with_timezone(&Local).format("%Y-%m-%d %H:%M")
        ))
        .dim());
    }
    Line::from(spans)
}

pub fn human_size(bytes: u64) -> String {
    const UNITS: [&str; 4] = ["B", "KB", "MB", "GB"];
    let mut size = bytes as f64;
    let mut unit = 0;
    while size >= 1024.0 && unit < UNITS.len() - 1 {
        size /= 1024.0;
        unit += 1;
    }
    if unit == 0 {
        format!("{bytes} B")
    } else {
        format!("{size:.1} {}", UNITS[unit])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sizes() {
        assert_eq!(human_size(0), "0 B");
        assert_eq!(human_size(1023), "1023 B");
        assert_eq!(human_size(1536), "1.5 KB");
        assert_eq!(human_size(5 * 1024 * 1024), "5.0 MB");
    }

    #[test]
    fn one_line_input() {
        let mut textarea = single_line_input("Search");
        for c in "cake".chars() {
            input(&mut textarea, KeyEvent::new(KeyCode::Char(c), KeyModifiers::NONE));
        }
        assert!(input(&mut textarea, KeyEvent::new(KeyCode::Enter, KeyModifiers::NONE)).is_none());
        assert_eq!(text(&textarea), "cake");
        assert_eq!(textarea.lines().len(), 1);
    }
}
