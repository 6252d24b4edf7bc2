//! Handlers for the `/newsletter` resource.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use chrono::{Duration, Utc};
use serde::{Deserialize, Serialize};
use smcd_core::error::CoreError;
use smcd_db::models::newsletter::{CreateSubscriber, NewsletterSubscriber};
use smcd_db::repositories::NewsletterRepo;
use smcd_events::templates::{newsletter_welcome, unsubscribe_url};
use validator::Validate;

use crate::error::{AppError, AppResult};
use crate::middleware::rbac::RequireStaff;
use crate::notify::send_email;
use crate::response::{DataResponse, MessageResponse};
use crate::state::AppState;

#[derive(Debug, Deserialize, Validate)]
pub struct SubscribeRequest {
    #[validate(email(message = "Email invalide"))]
    pub email: String,
    #[validate(length(max = 100))]
    pub nom: Option<String>,
    #[validate(length(max = 100))]
    pub prenom: Option<String>,
    #[validate(length(max = 50))]
    pub origine: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct NewsletterStats {
    pub total_actifs: i64,
    pub nouveaux_cette_semaine: i64,
}

/// POST /api/newsletter/subscribe
///
/// New addresses are created and welcomed; inactive ones are reactivated.
pub async fn subscribe(
    State(state): State<AppState>,
    Json(input): Json<SubscribeRequest>,
) -> AppResult<(StatusCode, Json<MessageResponse>)> {
    input.validate()?;

    if let Some(existing) = NewsletterRepo::find_by_email(&state.pool, input.email.trim()).await? {
        if existing.actif {
            return Err(AppError::Core(CoreError::Conflict(
                "Cet email est déjà inscrit à la newsletter".into(),
            )));
        }
        NewsletterRepo::reactivate(&state.pool, existing.id).await?;
        tracing::info!(subscriber_id = existing.id, "Newsletter subscription reactivated");
        return Ok((
            StatusCode::OK,
            Json(MessageResponse::new("Votre inscription a été réactivée")),
        ));
    }

    let subscriber = NewsletterRepo::create(
        &state.pool,
        &CreateSubscriber {
            email: input.email,
            nom: input.nom,
            prenom: input.prenom,
            origine: input.origine,
        },
    )
    .await?;

    tracing::info!(subscriber_id = subscriber.id, "Newsletter subscription created");
    let link = unsubscribe_url(&state.config.frontend_url, &subscriber.token_desinscription);
    send_email(&state, &subscriber.email, newsletter_welcome(&link));

    Ok((
        StatusCode::CREATED,
        Json(MessageResponse::new("Inscription à la newsletter réussie")),
    ))
}

/// GET /api/newsletter/unsubscribe/{token}
pub async fn unsubscribe(
    State(state): State<AppState>,
    Path(token): Path<String>,
) -> AppResult<Json<MessageResponse>> {
    let subscriber = NewsletterRepo::unsubscribe(&state.pool, &token)
        .await?
        .ok_or_else(|| {
            AppError::Core(CoreError::NotFoundKey {
                entity: "Abonné",
                key: "token de désinscription inconnu".into(),
            })
        })?;

    tracing::info!(subscriber_id = subscriber.id, "Newsletter unsubscribed");
    Ok(Json(MessageResponse::new(
        "Vous avez été désinscrit(e) de la newsletter",
    )))
}

/// GET /api/newsletter/subscribers
pub async fn subscribers(
    RequireStaff(_user): RequireStaff,
    State(state): State<AppState>,
) -> AppResult<Json<DataResponse<Vec<NewsletterSubscriber>>>> {
    Ok(Json(DataResponse {
        data: NewsletterRepo::list_active(&state.pool).await?,
    }))
}

/// GET /api/newsletter/stats
pub async fn stats(
    RequireStaff(_user): RequireStaff,
    State(state): State<AppState>,
) -> AppResult<Json<DataResponse<NewsletterStats>>> {
    let week_ago = Utc::now() - Duration::days(7);
    Ok(Json(DataResponse {
        data: NewsletterStats {
            total_actifs: NewsletterRepo::count_active(&state.pool).await?,
            nouveaux_cette_semaine: NewsletterRepo::count_new_since(&state.pool, week_ago).await?,
        },
    }))
}
