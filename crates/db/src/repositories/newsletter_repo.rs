//! Repository for the `newsletter_subscribers` table.

use sqlx::PgPool;
use smcd_core::types::{DbId, Timestamp};
use uuid::Uuid;

use crate::models::newsletter::{CreateSubscriber, NewsletterSubscriber};

const COLUMNS: &str = "id, email, nom, prenom, actif, origine, date_inscription, \
    date_desinscription, token_desinscription";

pub struct NewsletterRepo;

impl NewsletterRepo {
    /// Insert an active subscriber with a fresh unsubscribe token.
    pub async fn create(
        pool: &PgPool,
        input: &CreateSubscriber,
    ) -> Result<NewsletterSubscriber, sqlx::Error> {
        let query = format!(
            "INSERT INTO newsletter_subscribers (email, nom, prenom, origine, token_desinscription)
             VALUES (LOWER($1), $2, $3, $4, $5)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, NewsletterSubscriber>(&query)
            .bind(input.email.trim())
            .bind(&input.nom)
            .bind(&input.prenom)
            .bind(&input.origine)
            .bind(Uuid::new_v4().to_string())
            .fetch_one(pool)
            .await
    }

    pub async fn find_by_email(
        pool: &PgPool,
        email: &str,
    ) -> Result<Option<NewsletterSubscriber>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM newsletter_subscribers WHERE email = LOWER($1)"
        );
        sqlx::query_as::<_, NewsletterSubscriber>(&query)
            .bind(email.trim())
            .fetch_optional(pool)
            .await
    }

    /// Re-activate a lapsed subscriber, keeping its token.
    pub async fn reactivate(
        pool: &PgPool,
        id: DbId,
    ) -> Result<Option<NewsletterSubscriber>, sqlx::Error> {
        let query = format!(
            "UPDATE newsletter_subscribers
             SET actif = TRUE, date_desinscription = NULL
             WHERE id = $1
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, NewsletterSubscriber>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Deactivate the subscriber owning `token`. Returns `None` for an
    /// unknown token.
    pub async fn unsubscribe(
        pool: &PgPool,
        token: &str,
    ) -> Result<Option<NewsletterSubscriber>, sqlx::Error> {
        let query = format!(
            "UPDATE newsletter_subscribers
             SET actif = FALSE, date_desinscription = NOW()
             WHERE token_desinscription = $1
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, NewsletterSubscriber>(&query)
            .bind(token)
            .fetch_optional(pool)
            .await
    }

    pub async fn list_active(pool: &PgPool) -> Result<Vec<NewsletterSubscriber>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM newsletter_subscribers
             WHERE actif = TRUE
             ORDER BY date_inscription DESC, id DESC"
        );
        sqlx::query_as::<_, NewsletterSubscriber>(&query)
            .fetch_all(pool)
            .await
    }

    pub async fn count_active(pool: &PgPool) -> Result<i64, sqlx::Error> {
        sqlx::query_scalar::<_, i64>(
            "SELECT COUNT(*) FROM newsletter_subscribers WHERE actif = TRUE",
        )
        .fetch_one(pool)
        .await
    }

    /// Active subscribers who joined after `since`.
    pub async fn count_new_since(pool: &PgPool, since: Timestamp) -> Result<i64, sqlx::Error> {
        sqlx::query_scalar::<_, i64>(
            "SELECT COUNT(*) FROM newsletter_subscribers
             WHERE actif = TRUE AND date_inscription >= $1",
        )
        .bind(since)
        .fetch_one(pool)
        .await
    }
}
