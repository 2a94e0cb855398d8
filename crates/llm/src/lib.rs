//! Question generation: LLM provider adapters, prompt templates, reply
//! parsing and the orchestrator tying segmentation, oracle and difficulty
//! classification together.

pub mod generator;
pub mod mock;
pub mod oracle;
pub mod parse;
pub mod prompt;
pub mod provider;
pub mod providers;
pub mod registry;

pub use generator::{
    ClassifiedQuestion, GenerationError, GenerationMetadata, GenerationOutcome, QuestionGenerator,
};
pub use mock::MockOracle;
pub use oracle::{ChatOracle, QuestionOracle};
pub use provider::{LlmError, LlmProvider, Message, Role};
pub use registry::ProviderRegistry;
