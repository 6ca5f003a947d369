pub mod audio;
pub mod audio_api;
pub mod config;
pub mod middle;
pub mod midi;
pub mod panel;
pub mod pipeline;
pub mod shared;
pub mod trace;
pub mod tui;

#[cfg(test)]
mod test_fixture;
