//! Network side of SilverCare: the Claude client, the chat proxy and its
//! HTTP router, and the HTTP client the conversation store talks through.

pub mod chat_proxy;
pub mod claude_api;
pub mod http_chat_client;
pub mod prompt;
pub mod server;

pub use chat_proxy::ChatProxy;
pub use claude_api::{ClaudeApiClient, LanguageModel};
pub use http_chat_client::HttpChatClient;
pub use server::{router, serve};
