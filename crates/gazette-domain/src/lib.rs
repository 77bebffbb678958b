//! # gazette-domain
//!
//! Core behavior of the Gazette platform, independent of the HTTP layer:
//!
//! - **Follow graph**: directed follow edges between users, with the
//!   self-follow guard and idempotent create/delete.
//! - **Feed composition**: the aggregated, paginated post list a user sees
//!   from the authors they follow.
//! - **Notification dispatch**: the one-mail-per-new-post fan-out to the
//!   author's followers.
//! - **Logout tracking**: the per-user last-logout upsert.
//! - **Mail boundary**: the [`Mailer`] trait the dispatcher delivers
//!   through; real transports plug in behind it.
//! - **Validation**: typed field-level checks run before any write.
//!
//! Every function takes the acting user explicitly; nothing in this crate
//! reads ambient request state.

pub mod feed;
pub mod follow;
pub mod logout;
pub mod mailer;
pub mod notify;
pub mod validate;

mod error;

#[cfg(test)]
pub(crate) mod testutil;

pub use error::DomainError;
pub use mailer::{MailError, Mailer, Outbound};
pub use notify::{NotificationDispatcher, PostCreated};
