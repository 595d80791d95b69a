//! Interaction layer for Solaris: the assistant persona's text backend.

pub mod gemini_assistant;

pub use gemini_assistant::{
    ASSISTANT_NO_IDEA, ASSISTANT_SETUP_REQUIRED, ASSISTANT_TECHNICAL_ISSUE, GeminiAssistant,
};
