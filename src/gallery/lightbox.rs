use super::collection::Collection;
use crate::backend::types::MediaItem;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

pub const DEFAULT_SWIPE_THRESHOLD: i32 = 75;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LightboxCommand {
    Close,
    Prev,
    Next,
}

impl LightboxCommand {
    pub fn from_key(key: &KeyEvent) -> Option<Self> {
        if key.modifiers != KeyModifiers::NONE {
            return None;
        }
        match key.code {
            KeyCode::Esc => Some(Self::Close),
            KeyCode::Left => Some(Self::Prev),
            KeyCode::Right => Some(Self::Next),
            _ => None,
        }
    }
}

/// Full-screen viewer state over the current sequence of items.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum Navigator {
    #[default]
    Closed,
    Open(String),
}

impl Navigator {
    /// Opens on `id`. An id that is not in `sequence` leaves the state as it was.
    pub fn open(&mut self, id: &str, sequence: &Collection) -> bool {
        if !sequence.contains(id) {
            return false;
        }
        *self = Self::Open(id.to_string());
        true
    }
    pub fn close(&mut self) {
        *self = Self::Closed;
    }
    pub fn next(&mut self, sequence: &Collection) -> bool {
        self.step(sequence, |i| Some(i + 1))
    }
    pub fn prev(&mut self, sequence: &Collection) -> bool {
        self.step(sequence, |i| i.checked_sub(1))
    }
    fn step(&mut self, sequence: &Collection, f: impl Fn(usize) -> Option<usize>) -> bool {
        let Some(item) = self
            .current()
            .and_then(|id| sequence.index_of(id))
            .and_then(f)
            .and_then(|i| sequence.get_index(i))
        else {
            return false;
        };
        *self = Self::Open(item.id().to_string());
        true
    }
    pub fn apply(&mut self, command: LightboxCommand, sequence: &Collection) -> bool {
        match command {
            LightboxCommand::Close => {
                let was_open = self.is_open();
                self.close();
                was_open
            }
            LightboxCommand::Prev => self.prev(sequence),
            LightboxCommand::Next => self.next(sequence),
        }
    }
    pub fn is_open(&self) -> bool {
        matches!(self, Self::Open(_))
    }
    pub fn current(&self) -> Option<&str> {
        match self {
            Self::Open(id) => Some(id.as_str()),
            Self::Closed => None,
        }
    }
    pub fn current_item<'a>(&self, sequence: &'a Collection) -> Option<&'a MediaItem> {
        self.current().and_then(|id| sequence.get(id))
    }
    /// Zero-based index of the current item and the length of `sequence`.
    pub fn position(&self, sequence: &Collection) -> Option<(usize, usize)> {
        self.current()
            .and_then(|id| sequence.index_of(id))
            .map(|i| (i, sequence.len()))
    }
}

/// Turns a horizontal drag into a navigation command.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SwipeTracker {
    threshold: i32,
    start: Option<i32>,
}

impl Default for SwipeTracker {
    fn default() -> Self {
        Self::new(DEFAULT_SWIPE_THRESHOLD)
    }
}

impl SwipeTracker {
    pub fn new(threshold: i32) -> Self {
        Self {
            threshold,
            start: None,
        }
    }
    pub fn start(&mut self, x: i32) {
        self.start = Some(x);
    }
    pub fn end(&mut self, x: i32) -> Option<LightboxCommand> {
        let start = self.start.take()?;
        if start - x > self.threshold {
            Some(LightboxCommand::Next)
        } else if x - start > self.threshold {
            Some(LightboxCommand::Prev)
        } else {
            None
        }
    }
    pub fn cancel(&mut self) {
        self.start = None;
    }
}
