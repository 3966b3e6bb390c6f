pub mod client;
pub mod config;
pub mod sse;

pub use client::{ChatClient, FragmentStream};
pub use config::ChatConfig;
pub use sse::SseParser;
