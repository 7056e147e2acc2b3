//! aieditor - AI-assisted code editing library.
//!
//! This library turns an editor selection plus a free-text instruction
//! into a single completion request against a hosted language model, then
//! applies the result back into the document. It supports:
//!
//! - **Modify**: rewrite the selected code per the instruction
//! - **Generate**: insert new code at the end of the selection
//!
//! # Architecture
//!
//! The library is organized into several modules:
//!
//! - [`config`] - API credential loading (token file, environment)
//! - [`prompt`] - Request kinds and prompt template substitution
//! - [`http_client`] - HTTP client abstraction
//! - [`completion`] - Completion service client and failure descriptor
//! - [`editor`] - Editor host trait, selection spans, edit application
//! - [`file_host`] - File-backed host used by the CLI
//! - [`orchestrator`] - Per-invocation command state machine
//!
//! # Example
//!
//! ```ignore
//! use std::sync::Arc;
//! use aieditor::completion::OpenAiClient;
//! use aieditor::config::Credentials;
//! use aieditor::file_host::FileEditorHost;
//! use aieditor::http_client::ReqwestHttpClient;
//! use aieditor::orchestrator::CommandOrchestrator;
//! use aieditor::prompt::RequestKind;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let credentials = Credentials::load()?;
//!     let client = OpenAiClient::new(Arc::new(ReqwestHttpClient::new()), credentials);
//!     let host = FileEditorHost::open("src/lib.py".as_ref(), Some((3, 7)))?;
//!
//!     let outcome = CommandOrchestrator::new(RequestKind::Modify, host, client)
//!         .run()
//!         .await?;
//!     println!("{:?}", outcome);
//!     Ok(())
//! }
//! ```
//!
//! Each invocation is independent: the orchestrator holds no state across
//! runs, and the only process-wide resource is the credential, loaded once
//! at startup and injected into the client.

pub mod completion;
pub mod config;
pub mod editor;
pub mod file_host;
pub mod http_client;
pub mod orchestrator;
pub mod prompt;
