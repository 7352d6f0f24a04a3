//! Press coverage monitor: web search, page scraping and LLM analysis

pub mod analysis;
pub mod cli;
pub mod config;
pub mod handlers;
pub mod llm;
pub mod logging;
pub mod pipeline;
pub mod table;
