mod mixer;
mod voice;

pub use mixer::LevelMixer;
pub use voice::ParamVoice;
