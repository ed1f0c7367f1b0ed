use super::super::views::types::Action as ViewsAction;
use super::types::{Action, Data};
use super::{popup, ModalComponent};
use color_eyre::Result;
use crossterm::event::{KeyCode, KeyEvent};
use ratatui::layout::{Constraint, Layout, Rect};
use ratatui::style::Stylize;
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Paragraph, Wrap};
use ratatui::Frame;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Focus {
    Ok,
    Cancel,
}

pub struct ConfirmModalComponent {
    title: String,
    message: String,
    focus: Focus,
}

impl ConfirmModalComponent {
    pub fn new(title: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            message: message.into(),
            focus: Focus::Cancel,
        }
    }
    fn toggle(&mut self) -> Option<Action> {
        self.focus = match self.focus {
            Focus::Ok => Focus::Cancel,
            Focus::Cancel => Focus::Ok,
        };
        Some(Action::Render)
    }
}

impl ModalComponent for ConfirmModalComponent {
    fn handle_key_events(&mut self, key: KeyEvent) -> Result<Option<Action>> {
        Ok(match key.code {
            KeyCode::Left | KeyCode::Right => self.toggle(),
            KeyCode::Char('y') => Some(Action::Ok(Data::Confirmed)),
            KeyCode::Char('n') => Some(Action::Cancel),
            _ => None,
        })
    }
    fn update(&mut self, action: ViewsAction) -> Result<Option<Action>> {
        Ok(match action {
            ViewsAction::NextInput
            | ViewsAction::PrevInput
            | ViewsAction::NextItem
            | ViewsAction::PrevItem => self.toggle(),
            ViewsAction::Enter => match self.focus {
                Focus::Ok => Some(Action::Ok(Data::Confirmed)),
                Focus::Cancel => Some(Action::Cancel),
            },
            ViewsAction::Back => Some(Action::Cancel),
            _ => None,
        })
    }
    fn draw(&mut self, f: &mut Frame<'_>, area: Rect) -> Result<()> {
        let block = Block::bordered().title(self.title.as_str());
        let inner = popup(f, area, 7, block);
        let [message, buttons] =
            Layout::vertical([Constraint::Fill(1), Constraint::Length(1)]).areas(inner);
        f.render_widget(
            Paragraph::new(self.message.as_str()).wrap(Wrap { trim: true }),
            message,
        );
        let button = |label: &'static str, focused: bool| {
            let span = Span::from(format!(" {label} "));
            if focused {
                span.reversed()
            } else {
                span.dim()
            }
        };
        f.render_widget(
            Line::from(vec![
                button("OK", self.focus == Focus::Ok),
                Span::from("  "),
                button("Cancel", self.focus == Focus::Cancel),
            ])
            .centered(),
            buttons,
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossterm::event::KeyModifiers;

    #[test]
    fn cancel_by_default() {
        let mut modal = ConfirmModalComponent::new("Delete", "Delete this photo?");
        assert_eq!(
            modal.update(ViewsAction::Enter).expect("update failed"),
            Some(Action::Cancel)
        );
        assert_eq!(
            modal.update(ViewsAction::NextInput).expect("update failed"),
            Some(Action::Render)
        );
        assert_eq!(
            modal.update(ViewsAction::Enter).expect("update failed"),
            Some(Action::Ok(Data::Confirmed))
        );
    }

    #[test]
    fn shortcut_keys() {
        let mut modal = ConfirmModalComponent::new("Upload", "Upload 2 files?");
        let key = |c| KeyEvent::new(KeyCode::Char(c), KeyModifiers::NONE);
        assert_eq!(
            modal.handle_key_events(key('y')).expect("key failed"),
            Some(Action::Ok(Data::Confirmed))
        );
        assert_eq!(
            modal.handle_key_events(key('n')).expect("key failed"),
            Some(Action::Cancel)
        );
        assert_eq!(modal.handle_key_events(key('q')).expect("key failed"), None);
        assert_eq!(
            modal.update(ViewsAction::Back).expect("update failed"),
            Some(Action::Cancel)
        );
    }
}
