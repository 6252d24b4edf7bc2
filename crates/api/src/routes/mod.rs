pub mod abstracts;
pub mod archives;
pub mod auth;
pub mod communication_videos;
pub mod contenu;
pub mod diagnostics;
pub mod documents;
pub mod eposters;
pub mod gallery;
pub mod health;
pub mod newsletter;
pub mod public;
pub mod speakers;
pub mod sponsors;

use axum::Router;

use crate::state::AppState;

/// Build the `/api` route tree.
///
/// Route hierarchy:
///
/// ```text
/// /auth/login                                      login (public)
/// /auth/register                                   create account (super admin)
/// /auth/me                                         current user (requires auth)
/// /auth/logout                                     logout (requires auth)
///
/// /abstracts/submit                                submit abstract (public)
/// /abstracts/options                               rubrique/type options (public)
/// /abstracts/reference/{numero}                    lookup by reference (public)
/// /abstracts                                       list (staff)
/// /abstracts/stats                                 statistics (staff)
/// /abstracts/export                                full listing for export (staff)
/// /abstracts/{id}                                  get, delete (staff)
/// /abstracts/{id}/status                           update status (staff)
///
/// /archives                                        list (public), create (super admin)
/// /archives/{id}                                   get by year (public), update, delete (super admin)
///
/// /videos/upload                                   submit video file (public)
/// /videos/upload-url                               submit video link (public)
/// /videos/public                                   approved videos (public)
/// /videos/{id}/incrementer-vues                    count a view (public)
/// /videos/{id}/incrementer-telechargements         count a download (public)
/// /videos/admin/all                                list (staff)
/// /videos/admin/{id}                               get, delete (staff)
/// /videos/admin/{id}/approuver                     approve (staff)
/// /videos/admin/{id}/rejeter                       reject (staff)
///
/// /eposters/upload                                 submit e-poster (public)
/// /eposters/public                                 approved e-posters (public)
/// /eposters/public/{id}                            get approved e-poster (public)
/// /eposters/{id}/increment-download                count a download (public)
/// /eposters/{id}/download                          download link (public)
/// /eposters/admin                                  list (staff)
/// /eposters/admin/{id}                             get (staff)
/// /eposters/{id}/approve                           approve (staff)
/// /eposters/{id}/reject                            reject (staff)
/// /eposters/{id}                                   delete (staff)
/// /eposters/stats                                  statistics (staff)
///
/// /documents/upload                                upload (staff)
/// /documents/public                                published documents (public)
/// /documents/types                                 document types (public)
/// /documents                                       list (staff)
/// /documents/stats                                 statistics (staff)
/// /documents/{id}                                  get (public), update, delete (staff)
/// /documents/{id}/download                         count and link (public)
///
/// /newsletter/subscribe                            subscribe (public)
/// /newsletter/unsubscribe/{token}                  unsubscribe (public)
/// /newsletter/subscribers                          active subscribers (staff)
/// /newsletter/stats                                statistics (staff)
///
/// /contenu                                         list (public), upsert (super admin)
/// /contenu/{cle}                                   get by key (public)
///
/// /speakers                                        list (public), create (staff)
/// /speakers/filters                                filter values (public)
/// /speakers/president                              congress president (public)
/// /speakers/admin                                  list (staff)
/// /speakers/admin/{id}                             get (staff)
/// /speakers/reorder                                reorder (staff)
/// /speakers/stats                                  statistics (staff)
/// /speakers/{id}                                   get (public), update, delete (staff)
///
/// /sponsors                                        grouped by tier (public), create (staff)
/// /sponsors/all                                    list (staff)
/// /sponsors/stats                                  statistics (staff)
/// /sponsors/niveaux                                tier catalog (public)
/// /sponsors/{id}                                   get (public), update, delete (staff)
/// /sponsors/{id}/click                             count a click (public)
///
/// /public/info                                     congress information
/// /public/contact                                  contact form
///
/// /public/rooms                                    active rooms
/// /public/rooms/{slug}                             room with chapters
/// /public/rooms/{slug}/chapters                    chapters of a room
/// /public/chapters/{slug}                          chapter with videos
/// /public/chapters/{slug}/videos                   videos of a chapter
/// /public/videos/popular                           most viewed
/// /public/videos/recent                            latest published
/// /public/videos/search                            full-text search
/// /public/videos/{key}                             get by slug
/// /public/videos/{key}/view                        count a view (POST)
///
/// /admin/rooms                                     list, create (staff)
/// /admin/rooms/reorder                             reorder (staff)
/// /admin/rooms/{id}                                get, update, delete (staff)
/// /admin/rooms/{id}/toggle                         toggle active (staff)
/// /admin/rooms/{id}/chapters                       chapters of a room (staff)
/// /admin/rooms/{id}/chapters/reorder               reorder chapters (staff)
/// /admin/chapters                                  create (staff)
/// /admin/chapters/{id}                             get, update, delete (staff)
/// /admin/chapters/{id}/move                        move to another room (staff)
/// /admin/chapters/{id}/videos                      videos of a chapter (staff)
/// /admin/chapters/{id}/videos/reorder              reorder videos (staff)
/// /admin/videos                                    upload (staff)
/// /admin/videos/stats                              gallery statistics (staff)
/// /admin/videos/{id}                               get, update, delete (staff)
/// /admin/videos/{id}/thumbnail                     replace thumbnail (staff)
/// /admin/videos/{id}/publish                       publish (staff)
/// /admin/videos/{id}/unpublish                     unpublish (staff)
///
/// /test/health                                     service health
/// /test/upload                                     media round trip (super admin)
/// /test/send-email                                 SMTP check (super admin)
/// /test/delete-file                                remove a stored file (super admin)
/// ```
pub fn api_routes() -> Router<AppState> {
    Router::new()
        // Authentication (login, register, session).
        .nest("/auth", auth::router())
        // Abstract submissions and review.
        .nest("/abstracts", abstracts::router())
        // Past congress archives.
        .nest("/archives", archives::router())
        // Submitted communication videos.
        .nest("/videos", communication_videos::router())
        // E-posters.
        .nest("/eposters", eposters::router())
        // Congress documents.
        .nest("/documents", documents::router())
        // Newsletter subscriptions.
        .nest("/newsletter", newsletter::router())
        // Editable site content blocks.
        .nest("/contenu", contenu::router())
        // Speakers directory.
        .nest("/speakers", speakers::router())
        // Sponsors.
        .nest("/sponsors", sponsors::router())
        // Congress info and contact form.
        .nest("/public", public::router())
        // Operator diagnostics.
        .nest("/test", diagnostics::router())
        // Video gallery: rooms, chapters and videos (public + admin trees).
        .merge(gallery::router())
}
