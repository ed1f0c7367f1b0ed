use super::thumbnail::ThumbnailWidget;
use crate::backend::types::{MediaItem, MediaKind};
use crate::gallery::preview::Thumbnail;
use ratatui::buffer::Buffer;
use ratatui::layout::{Constraint, Layout, Rect};
use ratatui::style::Stylize;
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Clear, Paragraph, Widget, Wrap};

pub struct LightboxWidget<'a> {
    item: &'a MediaItem,
    position: (usize, usize),
    thumbnail: Option<&'a Thumbnail>,
    note: Option<&'a str>,
}

impl<'a> LightboxWidget<'a> {
    pub fn new(item: &'a MediaItem, position: (usize, usize)) -> Self {
        Self {
            item,
            position,
            thumbnail: None,
            note: None,
        }
    }
    pub fn thumbnail(mut self, thumbnail: Option<&'a Thumbnail>) -> Self {
        self.thumbnail = thumbnail;
        self
    }
    pub fn note(mut self, note: Option<&'a str>) -> Self {
        self.note = note;
        self
    }
}

impl Widget for LightboxWidget<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let (index, len) = self.position;
        let block = Block::bordered()
            .title(Line::from(format!(" {} ", self.item.title())).bold())
            .title(Line::from(format!(" {}/{len} ", index + 1)).right_aligned());
        let inner = block.inner(area);
        Clear.render(area, buf);
        block.render(area, buf);

        let [content, info, hints] = Layout::vertical([
            Constraint::Fill(1),
            Constraint::Length(2),
            Constraint::Length(1),
        ])
        .areas(inner);
        match (self.item.kind(), self.thumbnail) {
            (MediaKind::Image, Some(thumbnail)) => {
                ThumbnailWidget::new(&thumbnail.image).render(content, buf);
            }
            (kind, _) => {
                let text = self.note.map(String::from).unwrap_or_else(|| match kind {
                    MediaKind::Image => String::from("Loading..."),
                    MediaKind::Video => String::from("Video: press o to play"),
                });
                let [_, middle, _] = Layout::vertical([
                    Constraint::Fill(1),
                    Constraint::Length(1),
                    Constraint::Fill(1),
                ])
                .areas(content);
                Paragraph::new(text).centered().dim().render(middle, buf);
            }
        }

        let mut details = vec![Span::from(self.item.kind().as_str()).dim()];
        if let Some(thumbnail) = self.thumbnail {
            details.push(Span::from(format!("  {}x{}", thumbnail.width, thumbnail.height)).dim());
        }
        details.push(Span::from(format!("  {}", self.item.url())).dim());
        Paragraph::new(Line::from(details))
            .wrap(Wrap { trim: true })
            .render(info, buf);
        Paragraph::new(Line::from(vec![
            Span::from("← prev  → next  "),
            Span::from("d").bold(),
            Span::from(" download  "),
            Span::from("o").bold(),
            Span::from(" open  "),
            Span::from("Esc").bold(),
            Span::from(" close"),
        ]))
        .centered()
        .dim()
        .render(hints, buf);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gallery::testing::item;

    fn row(buf: &Buffer, y: u16) -> String {
        (0..buf.area.width)
            .map(|x| buf[(x, y)].symbol().to_string())
            .collect()
    }

    #[test]
    fn video_without_preview() {
        let video = item("v1", MediaKind::Video, Some("First dance"));
        let area = Rect::new(0, 0, 40, 10);
        let mut buf = Buffer::empty(area);
        LightboxWidget::new(&video, (1, 3)).render(area, &mut buf);
        assert!(row(&buf, 0).contains("First dance"));
        assert!(row(&buf, 0).contains("2/3"));
        let body = (1..9).map(|y| row(&buf, y)).collect::<String>();
        assert!(body.contains("press o to play"));
    }

    #[test]
    fn note_replaces_placeholder() {
        let image = item("a1", MediaKind::Image, None);
        let area = Rect::new(0, 0, 40, 10);
        let mut buf = Buffer::empty(area);
        LightboxWidget::new(&image, (0, 1))
            .note(Some("Media not found"))
            .render(area, &mut buf);
        let body = (1..9).map(|y| row(&buf, y)).collect::<String>();
        assert!(body.contains("Media not found"));
        assert!(!body.contains("Loading"));
    }
}
