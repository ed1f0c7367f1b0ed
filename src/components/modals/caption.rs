use super::super::views::types::Action as ViewsAction;
use super::super::views::utils;
use super::types::{Action, Data};
use super::{popup, ModalComponent};
use color_eyre::Result;
use crossterm::event::KeyEvent;
use ratatui::layout::{Constraint, Layout, Rect};
use ratatui::style::Stylize;
use ratatui::text::Line;
use ratatui::widgets::Block;
use ratatui::Frame;
use tui_textarea::TextArea;

pub struct CaptionModalComponent {
    caption: TextArea<'static>,
}

impl CaptionModalComponent {
    pub fn new(initial: Option<&str>) -> Self {
        let mut caption = utils::single_line_input("Caption");
        if let Some(initial) = initial {
            caption.insert_str(initial);
        }
        utils::set_focused(&mut caption, true);
        Self { caption }
    }
}

impl ModalComponent for CaptionModalComponent {
    fn handle_key_events(&mut self, key: KeyEvent) -> Result<Option<Action>> {
        Ok(utils::input(&mut self.caption, key).map(|_| Action::Render))
    }
    fn update(&mut self, action: ViewsAction) -> Result<Option<Action>> {
        Ok(match action {
            ViewsAction::Enter => Some(Action::Ok(Data::Caption(
                utils::text(&self.caption).trim().to_string(),
            ))),
            ViewsAction::Back => Some(Action::Cancel),
            _ => None,
        })
    }
    fn draw(&mut self, f: &mut Frame<'_>, area: Rect) -> Result<()> {
        let inner = popup(f, area, 6, Block::bordered().title("Edit caption"));
        let [input, hint] =
            Layout::vertical([Constraint::Length(3), Constraint::Length(1)]).areas(inner);
        f.render_widget(&self.caption, input);
        f.render_widget(Line::from("Enter to save, Esc to cancel").dim(), hint);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossterm::event::{KeyCode, KeyModifiers};

    #[test]
    fn edit_existing_caption() {
        let mut modal = CaptionModalComponent::new(Some("Cake"));
        for c in " cutting ".chars() {
            let key = KeyEvent::new(KeyCode::Char(c), KeyModifiers::NONE);
            assert_eq!(
                modal.handle_key_events(key).expect("key failed"),
                Some(Action::Render)
            );
        }
        assert_eq!(
            modal.update(ViewsAction::Enter).expect("update failed"),
            Some(Action::Ok(Data::Caption(String::from("Cake cutting"))))
        );
        assert_eq!(
            modal.update(ViewsAction::Back).expect("update failed"),
            Some(Action::Cancel)
        );
    }
}
