//! `attachbox`: attachment boxes for in-game mail.
//!
//! This crate decides which item container exists for which viewer or
//! mail, sizes and titles it, and writes its contents back into the mail
//! record when the viewer closes it. Rendering and persistence belong to
//! the host and are reached through [`host::DisplaySurface`] and
//! [`store::MailStore`].

pub mod config;
pub mod error;
pub mod host;
pub mod i18n;
pub mod manager;
pub mod model;
pub mod replay;
pub mod store;

pub use error::{BoxError, Result};
pub use manager::{BoxManager, SyncOutcome};
