//! Campaign message generation: prompt construction, the Gemini client,
//! numbered-list parsing, and per-campaign-type fallback copy.

pub mod error;
pub mod fallback;
pub mod gemini;
pub mod generator;
pub mod parser;
pub mod prompt;

pub use error::GenerationError;
pub use fallback::fallback_messages;
pub use gemini::GeminiClient;
pub use generator::{MessageGenerator, TextGenerationService};
pub use parser::{parse_messages, MAX_MESSAGES};
