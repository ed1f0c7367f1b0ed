mod lightbox;
mod thumbnail;

pub use self::lightbox::LightboxWidget;
pub use self::thumbnail::ThumbnailWidget;
