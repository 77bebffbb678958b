//! New-post notification fan-out.
//!
//! Creating a post produces exactly one outbound mail addressed to the
//! full follower set of the author.  Edits never notify.  The server
//! hands [`PostCreated`] events to a background task that calls
//! [`NotificationDispatcher::dispatch`]; the dispatch core itself is
//! synchronous so it can be exercised directly.

use std::sync::Arc;

use gazette_store::Database;
use uuid::Uuid;

use crate::error::Result;
use crate::mailer::{Mailer, Outbound};

/// Subject line of every new-post notification.
const SUBJECT: &str = "New post!";

/// Event emitted by the server when a post is newly created.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PostCreated {
    pub post_id: Uuid,
    pub author_id: Uuid,
}

/// Computes the recipient set for a created post and sends the one
/// notification mail through the configured [`Mailer`].
pub struct NotificationDispatcher {
    mailer: Arc<dyn Mailer>,
    from: String,
}

impl NotificationDispatcher {
    pub fn new(mailer: Arc<dyn Mailer>, from: String) -> Self {
        Self { mailer, from }
    }

    /// Send the notification for one created post.
    ///
    /// Exactly one send is attempted per event, whatever the follower
    /// count; an empty recipient list still goes to the transport.  A
    /// failed send is retried once, then surfaced.
    pub fn dispatch(&self, db: &Database, event: PostCreated) -> Result<()> {
        let author = db.get_user(event.author_id)?;
        let recipients: Vec<String> = db
            .followers_of(author.id)?
            .into_iter()
            .map(|u| u.email)
            .collect();

        let mail = Outbound {
            subject: SUBJECT.to_string(),
            body: format!("{} posted something, check it out!", author.name),
            from: self.from.clone(),
            to: recipients,
        };

        tracing::info!(
            post = %event.post_id,
            author = %author.username,
            recipients = mail.to.len(),
            "dispatching new-post notification"
        );

        if let Err(first) = self.mailer.send(&mail) {
            tracing::warn!(error = %first, "mail send failed, retrying");
            self.mailer.send(&mail)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use chrono::Utc;

    use super::*;
    use crate::error::DomainError;
    use crate::follow;
    use crate::mailer::MemoryMailer;
    use crate::testutil;

    fn dispatcher(mailer: &Arc<MemoryMailer>) -> NotificationDispatcher {
        NotificationDispatcher::new(mailer.clone(), "notifier@gazette.example".to_string())
    }

    #[test]
    fn one_mail_addressed_to_all_followers() {
        let db = testutil::db();
        let author = testutil::user(&db, "author");
        let f1 = testutil::user(&db, "f1");
        let f2 = testutil::user(&db, "f2");
        follow::follow(&db, f1.id, author.id, Utc::now()).unwrap();
        follow::follow(&db, f2.id, author.id, Utc::now()).unwrap();
        let post = testutil::post(&db, &author, "news", Utc::now());

        let mailer = Arc::new(MemoryMailer::new());
        dispatcher(&mailer)
            .dispatch(
                &db,
                PostCreated {
                    post_id: post.id,
                    author_id: author.id,
                },
            )
            .unwrap();

        let sent = mailer.sent();
        assert_eq!(sent.len(), 1);
        assert_eq!(sent[0].subject, "New post!");
        assert_eq!(
            sent[0].to,
            vec!["f1@example.com".to_string(), "f2@example.com".to_string()]
        );
        assert!(sent[0].body.contains("author"));
    }

    #[test]
    fn zero_followers_still_sends_once() {
        let db = testutil::db();
        let author = testutil::user(&db, "author");
        let post = testutil::post(&db, &author, "to nobody", Utc::now());

        let mailer = Arc::new(MemoryMailer::new());
        dispatcher(&mailer)
            .dispatch(
                &db,
                PostCreated {
                    post_id: post.id,
                    author_id: author.id,
                },
            )
            .unwrap();

        let sent = mailer.sent();
        assert_eq!(sent.len(), 1);
        assert!(sent[0].to.is_empty());
    }

    #[test]
    fn transient_failure_is_retried_once() {
        let db = testutil::db();
        let author = testutil::user(&db, "author");
        let post = testutil::post(&db, &author, "flaky", Utc::now());

        let mailer = Arc::new(MemoryMailer::new());
        mailer.fail_next(1);

        dispatcher(&mailer)
            .dispatch(
                &db,
                PostCreated {
                    post_id: post.id,
                    author_id: author.id,
                },
            )
            .unwrap();
        assert_eq!(mailer.sent().len(), 1);
    }

    #[test]
    fn persistent_failure_surfaces() {
        let db = testutil::db();
        let author = testutil::user(&db, "author");
        let post = testutil::post(&db, &author, "down", Utc::now());

        let mailer = Arc::new(MemoryMailer::new());
        mailer.fail_next(2);

        let result = dispatcher(&mailer).dispatch(
            &db,
            PostCreated {
                post_id: post.id,
                author_id: author.id,
            },
        );
        assert!(matches!(result, Err(DomainError::Mail(_))));
        assert!(mailer.sent().is_empty());
    }
}
