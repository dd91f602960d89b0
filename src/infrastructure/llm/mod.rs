mod chat_summarizer;
mod summarizer_factory;

pub use chat_summarizer::{ChatAuth, ChatCompletionsSummarizer};
pub use summarizer_factory::SummarizerFactory;
