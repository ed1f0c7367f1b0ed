use super::client::ApiClient;
use super::config::Config;
use std::sync::Arc;
use tokio::sync::watch;

pub trait Watch {
    type Output;

    fn subscribe(&self) -> watch::Receiver<Self::Output>;
    fn unsubscribe(&self);
    fn refresh(&self);
}

pub struct Watcher {
    pub client: Arc<ApiClient>,
    pub(crate) config: Config,
}

impl Watcher {
    pub fn new(client: Arc<ApiClient>, config: Config) -> Self {
        Self { client, config }
    }
}
