use crate::backend::config::Config as ApiConfig;
use crate::components::views::types::Action as ViewAction;
use crate::gallery::lightbox::DEFAULT_SWIPE_THRESHOLD;
use crate::types::Action as AppAction;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::collections::HashMap;
use std::path::PathBuf;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Default)]
pub struct Config {
    #[serde(default)]
    pub keybindings: Keybindings,
    #[serde(default)]
    pub api: ApiConfig,
    #[serde(default)]
    pub gallery: GalleryConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct GalleryConfig {
    pub page_size: u32,
    pub swipe_threshold: i32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub download_dir: Option<PathBuf>,
}

impl Default for GalleryConfig {
    fn default() -> Self {
        Self {
            page_size: 20,
            swipe_threshold: DEFAULT_SWIPE_THRESHOLD,
            download_dir: None,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Default)]
pub struct Keybindings {
    #[serde(default)]
    pub global: HashMap<Key, GlobalAction>,
    #[serde(default)]
    pub screen: HashMap<Key, ScreenAction>,
}

#[derive(Debug, Clone, Copy, Eq, PartialEq, Hash)]
pub struct Key(KeyCode, Option<KeyModifiers>);

impl Key {
    pub fn new(code: KeyCode, modifiers: KeyModifiers) -> Self {
        Self::from(KeyEvent::new(code, modifiers))
    }
}

impl From<KeyEvent> for Key {
    fn from(event: KeyEvent) -> Self {
        let mut modifiers = event.modifiers;
        // the shift state is already part of the character
        if matches!(event.code, KeyCode::Char(_) | KeyCode::BackTab) {
            modifiers.remove(KeyModifiers::SHIFT);
        }
        Self(
            event.code,
            match modifiers {
                KeyModifiers::CONTROL | KeyModifiers::SHIFT | KeyModifiers::ALT => Some(modifiers),
                _ => None,
            },
        )
    }
}

const NAMED_KEYS: [(&str, KeyCode); 14] = [
    ("Enter", KeyCode::Enter),
    ("Esc", KeyCode::Esc),
    ("Tab", KeyCode::Tab),
    ("BackTab", KeyCode::BackTab),
    ("Backspace", KeyCode::Backspace),
    ("Delete", KeyCode::Delete),
    ("Left", KeyCode::Left),
    ("Right", KeyCode::Right),
    ("Up", KeyCode::Up),
    ("Down", KeyCode::Down),
    ("Home", KeyCode::Home),
    ("End", KeyCode::End),
    ("PageUp", KeyCode::PageUp),
    ("PageDown", KeyCode::PageDown),
];

fn code_to_string(code: KeyCode) -> Option<String> {
    match code {
        KeyCode::Char(' ') => Some(String::from("Space")),
        KeyCode::Char(c) => Some(c.to_string()),
        KeyCode::F(n) => Some(format!("F{n}")),
        code => NAMED_KEYS
            .iter()
            .find(|(_, named)| *named == code)
            .map(|(name, _)| name.to_string()),
    }
}

fn code_from_str(s: &str) -> Option<KeyCode> {
    let mut chars = s.chars();
    if let (Some(c), None) = (chars.next(), chars.next()) {
        return Some(KeyCode::Char(c));
    }
    if s == "Space" {
        return Some(KeyCode::Char(' '));
    }
    if let Some(n) = s.strip_prefix('F').and_then(|n| n.parse().ok()) {
        return Some(KeyCode::F(n));
    }
    NAMED_KEYS
        .iter()
        .find(|(name, _)| *name == s)
        .map(|(_, code)| *code)
}

impl Serialize for Key {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let Some(code) = code_to_string(self.0) else {
            return Err(serde::ser::Error::custom("invalid key code"));
        };
        match self.1 {
            Some(modifier) => {
                let modifier = match modifier {
                    KeyModifiers::CONTROL => "Ctrl",
                    KeyModifiers::SHIFT => "Shift",
                    KeyModifiers::ALT => "Alt",
                    _ => return Err(serde::ser::Error::custom("invalid key modifier")),
                };
                format!("{modifier}-{code}").serialize(serializer)
            }
            None => code.serialize(serializer),
        }
    }
}

impl<'de> Deserialize<'de> for Key {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        let (modifiers, code) = match s.split_once('-') {
            Some(("Ctrl", code)) => (KeyModifiers::CONTROL, code),
            Some(("Shift", code)) => (KeyModifiers::SHIFT, code),
            Some(("Alt", code)) => (KeyModifiers::ALT, code),
            Some((_, code)) if !code.is_empty() => {
                return Err(serde::de::Error::custom("invalid key modifier"))
            }
            _ => (KeyModifiers::NONE, s.as_str()),
        };
        match code_from_str(code) {
            Some(code) => Ok(Self::new(code, modifiers)),
            None => Err(serde::de::Error::custom("invalid key")),
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum GlobalAction {
    Quit,
}

impl From<&GlobalAction> for AppAction {
    fn from(action: &GlobalAction) -> Self {
        match action {
            GlobalAction::Quit => AppAction::Quit,
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum ScreenAction {
    NextItem,
    PrevItem,
    NextInput,
    PrevInput,
    Enter,
    Back,
    Refresh,
    Menu,
    Toggle,
    Download,
    ClearSelection,
    Filter,
    Search,
    NextPage,
    PrevPage,
    Open,
    Delete,
    Edit,
    Upload,
    Export,
    Logout,
}

impl From<&ScreenAction> for ViewAction {
    fn from(action: &ScreenAction) -> Self {
        match action {
            ScreenAction::NextItem => ViewAction::NextItem,
            ScreenAction::PrevItem => ViewAction::PrevItem,
            ScreenAction::NextInput => ViewAction::NextInput,
            ScreenAction::PrevInput => ViewAction::PrevInput,
            ScreenAction::Enter => ViewAction::Enter,
            ScreenAction::Back => ViewAction::Back,
            ScreenAction::Refresh => ViewAction::Refresh,
            ScreenAction::Menu => ViewAction::Menu,
            ScreenAction::Toggle => ViewAction::Toggle,
            ScreenAction::Download => ViewAction::Download,
            ScreenAction::ClearSelection => ViewAction::ClearSelection,
            ScreenAction::Filter => ViewAction::Filter,
            ScreenAction::Search => ViewAction::Search,
            ScreenAction::NextPage => ViewAction::NextPage,
            ScreenAction::PrevPage => ViewAction::PrevPage,
            ScreenAction::Open => ViewAction::Open,
            ScreenAction::Delete => ViewAction::Delete,
            ScreenAction::Edit => ViewAction::Edit,
            ScreenAction::Upload => ViewAction::Upload,
            ScreenAction::Export => ViewAction::Export,
            ScreenAction::Logout => ViewAction::Logout,
        }
    }
}

impl Config {
    /// Adds the default bindings for every action the user left unbound.
    pub fn set_default_keybindings(&mut self) {
        use KeyCode::*;
        let ctrl = |c| Key::new(Char(c), KeyModifiers::CONTROL);
        let plain = |code| Key::new(code, KeyModifiers::NONE);

        let global = [(ctrl('c'), GlobalAction::Quit), (ctrl('q'), GlobalAction::Quit)];
        merge(&mut self.keybindings.global, global);

        let screen = [
            (plain(Down), ScreenAction::NextItem),
            (plain(Char('j')), ScreenAction::NextItem),
            (ctrl('n'), ScreenAction::NextItem),
            (plain(Up), ScreenAction::PrevItem),
            (plain(Char('k')), ScreenAction::PrevItem),
            (ctrl('p'), ScreenAction::PrevItem),
            (plain(Tab), ScreenAction::NextInput),
            (plain(BackTab), ScreenAction::PrevInput),
            (plain(Enter), ScreenAction::Enter),
            (plain(Esc), ScreenAction::Back),
            (plain(Char('r')), ScreenAction::Refresh),
            (ctrl('x'), ScreenAction::Menu),
            (plain(Char('m')), ScreenAction::Menu),
            (plain(Char(' ')), ScreenAction::Toggle),
            (plain(Char('d')), ScreenAction::Download),
            (plain(Char('c')), ScreenAction::ClearSelection),
            (plain(Char('f')), ScreenAction::Filter),
            (plain(Char('/')), ScreenAction::Search),
            (plain(Char(']')), ScreenAction::NextPage),
            (plain(PageDown), ScreenAction::NextPage),
            (plain(Char('[')), ScreenAction::PrevPage),
            (plain(PageUp), ScreenAction::PrevPage),
            (plain(Char('o')), ScreenAction::Open),
            (plain(Char('x')), ScreenAction::Delete),
            (plain(Char('e')), ScreenAction::Edit),
            (plain(Char('u')), ScreenAction::Upload),
            (plain(Char('z')), ScreenAction::Export),
            (plain(Char('L')), ScreenAction::Logout),
        ];
        merge(&mut self.keybindings.screen, screen);
    }
}

fn merge<A: PartialEq + Copy>(
    bindings: &mut HashMap<Key, A>,
    defaults: impl IntoIterator<Item = (Key, A)>,
) {
    let bound = bindings.values().copied().collect::<Vec<_>>();
    for (key, action) in defaults {
        if !bound.contains(&action) {
            bindings.entry(key).or_insert(action);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn deserialize_empty() {
        let config = toml::from_str::<Config>("").expect("failed to deserialize config");
        assert_eq!(config, Config::default());
        assert_eq!(config.gallery.page_size, 20);
        assert_eq!(config.gallery.swipe_threshold, 75);
        assert_eq!(config.api.intervals.media, 60);
    }

    #[test]
    fn deserialize() {
        let input = r#"
[api]
base_url = "http://localhost:5000"

[api.intervals]
media = 15

[gallery]
swipe_threshold = 40
download_dir = "/tmp/wedding"

[keybindings.global]
Ctrl-c = "Quit"

[keybindings.screen]
Ctrl-n = "NextItem"
Space = "Toggle"
Shift-Left = "PrevPage"
"#;
        let config = toml::from_str::<Config>(input).expect("failed to deserialize config");
        assert_eq!(config.api.base_url, "http://localhost:5000");
        assert_eq!(config.api.timeout, 30);
        assert_eq!(config.api.intervals.media, 15);
        assert_eq!(config.gallery.page_size, 20);
        assert_eq!(config.gallery.swipe_threshold, 40);
        assert_eq!(config.gallery.download_dir, Some(PathBuf::from("/tmp/wedding")));
        assert_eq!(
            config.keybindings,
            Keybindings {
                global: HashMap::from_iter([(
                    Key(KeyCode::Char('c'), Some(KeyModifiers::CONTROL)),
                    GlobalAction::Quit
                )]),
                screen: HashMap::from_iter([
                    (
                        Key(KeyCode::Char('n'), Some(KeyModifiers::CONTROL)),
                        ScreenAction::NextItem
                    ),
                    (Key(KeyCode::Char(' '), None), ScreenAction::Toggle),
                    (
                        Key(KeyCode::Left, Some(KeyModifiers::SHIFT)),
                        ScreenAction::PrevPage
                    ),
                ]),
            }
        );
    }

    #[test]
    fn deserialize_invalid_keys() {
        for input in [
            "[keybindings.global]\nMeta-c = \"Quit\"",
            "[keybindings.global]\nCtrl-abc = \"Quit\"",
            "[keybindings.global]\nF = \"Quit\"\nFoo = \"Quit\"",
        ] {
            assert!(toml::from_str::<Config>(input).is_err(), "{input}");
        }
    }

    #[test]
    fn serialize() {
        let mut config = Config::default();
        config.gallery.download_dir = Some(PathBuf::from("/tmp"));
        config.set_default_keybindings();
        let s = toml::to_string(&config).expect("failed to serialize config");
        let deserialized = toml::from_str::<Config>(&s).expect("failed to deserialize config");
        assert_eq!(deserialized, config);
    }

    #[test]
    fn key_from_event() {
        assert_eq!(
            Key::from(KeyEvent::new(KeyCode::Char('L'), KeyModifiers::SHIFT)),
            Key(KeyCode::Char('L'), None)
        );
        assert_eq!(
            Key::from(KeyEvent::new(KeyCode::BackTab, KeyModifiers::SHIFT)),
            Key(KeyCode::BackTab, None)
        );
        assert_eq!(
            Key::from(KeyEvent::new(
                KeyCode::Char('c'),
                KeyModifiers::CONTROL | KeyModifiers::SHIFT
            )),
            Key(KeyCode::Char('c'), Some(KeyModifiers::CONTROL))
        );
        assert_eq!(
            Key::from(KeyEvent::new(
                KeyCode::Left,
                KeyModifiers::CONTROL | KeyModifiers::ALT
            )),
            Key(KeyCode::Left, None)
        );
    }

    #[test]
    fn defaults_keep_user_bindings() {
        let mut config = toml::from_str::<Config>(
            "[keybindings.screen]\nn = \"Download\"\nd = \"Delete\"",
        )
        .expect("failed to deserialize config");
        config.set_default_keybindings();
        let screen = &config.keybindings.screen;
        let get = |c| screen.get(&Key(KeyCode::Char(c), None)).copied();
        assert_eq!(get('n'), Some(ScreenAction::Download));
        assert_eq!(get('d'), Some(ScreenAction::Delete));
        // neither default for Download nor Delete is added
        assert_eq!(get('x'), None);
        assert_eq!(get('o'), Some(ScreenAction::Open));
        assert_eq!(
            config
                .keybindings
                .global
                .get(&Key(KeyCode::Char('q'), Some(KeyModifiers::CONTROL))),
            Some(&GlobalAction::Quit)
        );
    }
}
