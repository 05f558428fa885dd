//! Widgets composing the chat screen.

pub mod header;
pub mod input_bar;
pub mod status_bar;
pub mod text_input;
pub mod transcript;
pub mod welcome;

pub use header::Header;
pub use input_bar::InputBar;
pub use status_bar::{KeyHint, StatusBar};
pub use text_input::TextInputState;
pub use transcript::{transcript_lines, view_lines, TranscriptView};
pub use welcome::{WelcomeCard, MAX_SUGGESTIONS};
