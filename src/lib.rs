// ABOUTME: Public library API for the Trello backup exporter
// ABOUTME: Re-exports core modules for external use

pub mod api;
pub mod auth;
pub mod cli;
pub mod config;
pub mod error;
pub mod export;
pub mod logging;
pub mod model;
pub mod naming;
pub mod storage;

pub use error::{Error, Result};
pub use model::{Attachment, Board, BoardSummary, Card, Organization, TrelloList};
