mod media;

pub use media::MediaUpdate;
