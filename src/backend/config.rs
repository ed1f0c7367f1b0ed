use serde::{Deserialize, Serialize};

pub const DEFAULT_BASE_URL: &str = "https://wedding-site-backend-y4z1.onrender.com";

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct Config {
    pub base_url: String,
    /// Request timeout in seconds.
    pub timeout: u64,
    pub intervals: Intervals,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            base_url: String::from(DEFAULT_BASE_URL),
            timeout: 30,
            intervals: Intervals::default(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct Intervals {
    pub media: u64,
}

impl Default for Intervals {
    fn default() -> Self {
        Self { media: 60 }
    }
}
