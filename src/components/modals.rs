mod caption;
mod confirm;
pub mod types;

pub use self::{caption::CaptionModalComponent, confirm::ConfirmModalComponent};
use {
    self::types::Action,
    super::views::types::Action as ViewsAction,
    color_eyre::Result,
    crossterm::event::KeyEvent,
    ratatui::{
        layout::{Constraint, Flex, Layout, Rect},
        widgets::{Block, Clear},
        Frame,
    },
};

pub trait ModalComponent {
    #[allow(unused_variables)]
    fn handle_key_events(&mut self, key: KeyEvent) -> Result<Option<Action>> {
        Ok(None)
    }
    #[allow(unused_variables)]
    fn update(&mut self, action: ViewsAction) -> Result<Option<Action>> {
        Ok(None)
    }
    fn draw(&mut self, f: &mut Frame<'_>, area: Rect) -> Result<()>;
}

/// Clears a centered box of `height` rows inside `area` and returns its inner area.
fn popup(f: &mut Frame<'_>, area: Rect, height: u16, block: Block<'_>) -> Rect {
    let [area] = Layout::vertical([Constraint::Length(height)])
        .flex(Flex::Center)
        .areas(area);
    let [area] = Layout::horizontal([Constraint::Max(60)])
        .flex(Flex::Center)
        .areas(area);
    let inner = block.inner(area);
    f.render_widget(Clear, area);
    f.render_widget(block, area);
    inner
}
