//! Dot Feedback - conversational feedback collection.
//!
//! Admins define sessions of ordered questions; participants answer them in
//! a chat with an AI assistant that decides when each answer is complete,
//! then keep chatting freely. The collected answers and transcripts can be
//! synthesised into an idea graph of ideas, themes, and contributors.

pub mod adapters;
pub mod application;
pub mod config;
pub mod domain;
pub mod ports;
