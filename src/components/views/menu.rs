use {
    super::types::Action,
    crate::config::{GlobalAction, Key, Keybindings, ScreenAction},
    color_eyre::Result,
    ratatui::{
        layout::Rect,
        style::{Style, Stylize},
        text::{Line, Span},
        widgets::{Block, Clear, List, ListItem, ListState},
        Frame,
    },
    tokio::sync::mpsc::UnboundedSender,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum MenuItem {
    Admin,
    Refresh,
    Health,
    Back,
    Quit,
}

impl MenuItem {
    const ALL: [Self; 5] = [
        Self::Admin,
        Self::Refresh,
        Self::Health,
        Self::Back,
        Self::Quit,
    ];
    fn label(&self) -> &'static str {
        match self {
            Self::Admin => "Admin",
            Self::Refresh => "Refresh",
            Self::Health => "Server status",
            Self::Back => "Back",
            Self::Quit => "Quit",
        }
    }
    fn action(&self) -> Action {
        match self {
            Self::Admin => Action::Admin,
            Self::Refresh => Action::Refresh,
            Self::Health => Action::Health,
            Self::Back => Action::Back,
            Self::Quit => Action::Quit,
        }
    }
}

struct Entry {
    item: MenuItem,
    keys: Vec<String>,
}

impl<'a> From<&'a Entry> for ListItem<'a> {
    fn from(entry: &'a Entry) -> Self {
        if entry.keys.is_empty() {
            Self::from(entry.item.label().reset())
        } else {
            Self::from(Line::from(vec![
                Span::from(format!("{} ", entry.item.label())).reset(),
                Span::from(format!("({})", entry.keys.join(", "))).dim(),
            ]))
        }
    }
}

fn key_names<'a>(keys: impl Iterator<Item = &'a Key>) -> Vec<String> {
    let mut names = keys
        .filter_map(|k| serde_json::to_string(k).ok())
        .map(|s| s.trim_matches('"').to_string())
        .collect::<Vec<_>>();
    names.sort();
    names
}

pub struct MenuViewComponent {
    action_tx: UnboundedSender<Action>,
    entries: Vec<Entry>,
    state: ListState,
}

impl MenuViewComponent {
    pub fn new(action_tx: UnboundedSender<Action>, keybindings: &Keybindings) -> Self {
        let screen_keys = |action: ScreenAction| {
            key_names(
                keybindings
                    .screen
                    .iter()
                    .filter(move |(_, v)| **v == action)
                    .map(|(k, _)| k),
            )
        };
        let entries = MenuItem::ALL
            .into_iter()
            .map(|item| Entry {
                item,
                keys: match item {
                    MenuItem::Refresh => screen_keys(ScreenAction::Refresh),
                    MenuItem::Back => screen_keys(ScreenAction::Back),
                    MenuItem::Quit => key_names(
                        keybindings
                            .global
                            .iter()
                            .filter(|(_, v)| **v == GlobalAction::Quit)
                            .map(|(k, _)| k),
                    ),
                    MenuItem::Admin | MenuItem::Health => Vec::new(),
                },
            })
            .collect();
        Self {
            action_tx,
            entries,
            state: ListState::default().with_selected(Some(0)),
        }
    }
    pub fn update(&mut self, action: Action) -> Result<Option<Action>> {
        match action {
            Action::NextItem => {
                if let Some(selected) = self.state.selected() {
                    self.state
                        .select(Some((selected + 1).min(self.entries.len() - 1)));
                    return Ok(Some(Action::Render));
                }
            }
            Action::PrevItem => {
                if let Some(selected) = self.state.selected() {
                    self.state.select(Some(selected.max(1) - 1));
                    return Ok(Some(Action::Render));
                }
            }
            Action::Enter => {
                if let Some(entry) = self.state.selected().and_then(|i| self.entries.get(i)) {
                    self.action_tx.send(entry.item.action()).ok();
                    return Ok(Some(Action::Menu));
                }
            }
            Action::Update(_) | Action::Render | Action::Status(_) => {
                return Ok(None);
            }
            _ => {}
        }
        Ok(Some(Action::Menu))
    }
    pub fn draw(&mut self, f: &mut Frame<'_>, area: Rect) -> Result<()> {
        let area = Rect::new(
            area.x,
            area.y,
            area.width.min(40),
            (self.entries.len() as u16 + 2).min(area.height),
        );
        f.render_widget(Clear, area);
        f.render_stateful_widget(
            List::new(&self.entries)
                .block(Block::bordered().title("Menu").dim())
                .highlight_style(Style::default().reversed()),
            area,
            &mut self.state,
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use tokio::sync::mpsc;

    #[test]
    fn select_and_enter() {
        let mut config = Config::default();
        config.set_default_keybindings();
        let (tx, mut rx) = mpsc::unbounded_channel();
        let mut menu = MenuViewComponent::new(tx, &config.keybindings);
        assert_eq!(menu.entries[1].keys, vec!["r"]);
        assert_eq!(menu.entries[3].keys, vec!["Esc"]);
        assert_eq!(menu.entries[4].keys, vec!["Ctrl-c", "Ctrl-q"]);

        assert!(matches!(menu.update(Action::PrevItem), Ok(Some(Action::Render))));
        for _ in 0..10 {
            menu.update(Action::NextItem).expect("update failed");
        }
        assert_eq!(menu.state.selected(), Some(4));
        menu.update(Action::PrevItem).expect("update failed");
        menu.update(Action::PrevItem).expect("update failed");
        assert!(matches!(menu.update(Action::Enter), Ok(Some(Action::Menu))));
        assert!(matches!(rx.try_recv(), Ok(Action::Health)));
        // any other key closes the menu
        assert!(matches!(menu.update(Action::Download), Ok(Some(Action::Menu))));
        assert!(rx.try_recv().is_err());
    }
}
