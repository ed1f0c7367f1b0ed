mod dashboard;
mod gallery;
mod login;
mod menu;
pub mod types;
mod upload_form;
pub(crate) mod utils;

use self::types::{Action, View};
pub use self::{
    dashboard::DashboardViewComponent, gallery::GalleryViewComponent, login::LoginComponent,
    menu::MenuViewComponent,
};
use {
    color_eyre::Result,
    crossterm::event::{KeyEvent, MouseEvent},
    ratatui::{layout::Rect, Frame},
};

pub trait ViewComponent {
    fn view(&self) -> View;
    fn activate(&mut self) -> Result<()> {
        Ok(())
    }
    fn deactivate(&mut self) -> Result<()> {
        Ok(())
    }
    #[allow(unused_variables)]
    fn handle_key_events(&mut self, key: KeyEvent) -> Result<Option<Action>> {
        Ok(None)
    }
    #[allow(unused_variables)]
    fn handle_mouse_events(&mut self, mouse: MouseEvent) -> Result<Option<Action>> {
        Ok(None)
    }
    #[allow(unused_variables)]
    fn update(&mut self, action: Action) -> Result<Option<Action>> {
        Ok(None)
    }
    fn draw(&mut self, f: &mut Frame<'_>, area: Rect) -> Result<()>;
}
