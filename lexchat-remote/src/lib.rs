//! Remote service clients for lexchat
//!
//! This crate defines the contract of the chat service the conversation
//! manager talks to, an HTTP implementation of it, and a client for the
//! document drafting service.

pub mod base;
pub mod drafter;
pub mod http;

pub use base::{ChatService, RemoteError, RemoteResult};
pub use drafter::{CertificateReceipt, DomicileCertificateRequest, DraftingClient};
pub use http::HttpChatService;
