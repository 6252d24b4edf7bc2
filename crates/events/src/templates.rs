//! Notification templates.
//!
//! Every function returns a ready-to-send [`Email`]: a subject, a plain-text
//! body and, for branded notifications, an HTML alternative. Values
//! interpolated into HTML are escaped.

use chrono::{DateTime, Utc};
use smcd_core::catalog::{Rubrique, TypeCommunication};
use smcd_core::docx::escape_xml as escape;

const DATE_FORMAT: &str = "%d/%m/%Y à %H:%M";
const COPYRIGHT: &str = "© 2026 Société Marocaine de Chirurgie Digestive";
const EPOSTER_GALLERY_URL: &str = "https://smcd.ma/eposters";

/// A rendered message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Email {
    pub subject: String,
    pub text: String,
    pub html: Option<String>,
}

impl Email {
    /// A plain-text message without HTML alternative.
    pub fn text(subject: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            subject: subject.into(),
            text: text.into(),
            html: None,
        }
    }
}

/// Abstract fields used by the submission notifications.
#[derive(Debug, Clone)]
pub struct AbstractNotice<'a> {
    pub nom: &'a str,
    pub prenom: &'a str,
    pub numero_reference: &'a str,
    pub titre: &'a str,
    pub rubrique: &'a str,
    pub type_communication: &'a str,
    pub date_soumission: DateTime<Utc>,
    pub statut: &'a str,
    pub commentaires: Option<&'a str>,
}

/// E-poster fields used by the moderation notifications.
#[derive(Debug, Clone)]
pub struct EposterNotice<'a> {
    pub nom: &'a str,
    pub prenom: &'a str,
    pub titre: &'a str,
    pub nom_fichier: Option<&'a str>,
    pub date_upload: DateTime<Utc>,
    pub commentaires: Option<&'a str>,
}

/// A message left through the public contact form.
#[derive(Debug, Clone)]
pub struct ContactMessage<'a> {
    pub nom: &'a str,
    pub email: &'a str,
    pub sujet: &'a str,
    pub message: &'a str,
}

// ---------------------------------------------------------------------------
// Layout
// ---------------------------------------------------------------------------

struct Layout<'a> {
    gradient: (&'a str, &'a str),
    title: &'a str,
    subtitle: &'a str,
}

const BRAND: Layout<'static> = Layout {
    gradient: ("#1E40AF", "#0D9488"),
    title: "SMCD 2026",
    subtitle: "Congrès National de Chirurgie Digestive",
};

impl Layout<'_> {
    fn render(&self, content: &str) -> String {
        format!(
            r#"<!DOCTYPE html>
<html>
<head><meta charset="UTF-8"></head>
<body style="font-family: Arial, sans-serif; line-height: 1.6; color: #333;">
<div style="max-width: 600px; margin: 0 auto; padding: 20px;">
<div style="background: linear-gradient(135deg, {from}, {to}); padding: 30px; text-align: center; color: white; border-radius: 10px 10px 0 0;">
<h1 style="margin:0;">{title}</h1>
<p style="margin:10px 0 0 0;">{subtitle}</p>
</div>
<div style="background: #f9fafb; padding: 30px; border: 1px solid #e5e7eb;">
{content}
</div>
<div style="text-align: center; padding: 20px; color: #6b7280; font-size: 12px;">
<p>{COPYRIGHT}</p>
</div>
</div>
</body>
</html>"#,
            from = self.gradient.0,
            to = self.gradient.1,
            title = escape(self.title),
            subtitle = escape(self.subtitle),
        )
    }
}

fn note_box(label: &str, body: &str) -> String {
    format!(
        r#"<div style="background: #FEF3C7; padding: 15px; border-radius: 8px; margin: 20px 0; border-left: 4px solid #F59E0B;"><strong>{}</strong><br>{}</div>"#,
        escape(label),
        escape(body).replace('\n', "<br>")
    )
}

fn non_blank(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}

// ---------------------------------------------------------------------------
// Abstracts
// ---------------------------------------------------------------------------

/// Receipt sent to the author right after an abstract is submitted.
pub fn abstract_confirmation(notice: &AbstractNotice<'_>) -> Email {
    let date = notice.date_soumission.format(DATE_FORMAT).to_string();
    let rubrique = Rubrique::label_of(notice.rubrique);
    let kind = TypeCommunication::label_of(notice.type_communication);

    let text = format!(
        "Cher(e) Dr. {nom} {prenom},\n\n\
         Nous accusons réception de votre soumission pour le Congrès National de Chirurgie Digestive 2026.\n\n\
         Numéro de référence : {reference}\n\n\
         Titre : {titre}\n\
         Rubrique : {rubrique}\n\
         Type : {kind}\n\
         Date de soumission : {date}\n\n\
         Votre soumission sera examinée par le comité scientifique dans un délai de 4 semaines. \
         Vous recevrez une notification par email concernant la décision.\n\n\
         Cordialement,\nLe Comité d'Organisation\nSMCD 2026",
        nom = notice.nom,
        prenom = notice.prenom,
        reference = notice.numero_reference,
        titre = notice.titre,
    );

    let content = format!(
        r#"<h2>Cher(e) Dr. {nom} {prenom},</h2>
<p>Nous accusons réception de votre soumission pour le Congrès National de Chirurgie Digestive 2026.</p>
<div style="font-size: 24px; font-weight: bold; color: #1E40AF; text-align: center; padding: 20px; background: #EFF6FF; border-radius: 8px; margin: 20px 0;">Numéro de référence : {reference}</div>
<div style="background: white; padding: 20px; border-radius: 8px; margin: 20px 0;">
<h3 style="margin-top:0;">Détails de votre soumission</h3>
<p><strong>Titre :</strong> {titre}</p>
<p><strong>Rubrique :</strong> {rubrique}</p>
<p><strong>Type :</strong> {kind}</p>
<p><strong>Date de soumission :</strong> {date}</p>
</div>
<p>Votre soumission sera examinée par le comité scientifique dans un délai de <strong>4 semaines</strong>. Vous recevrez une notification par email concernant la décision.</p>
<p>Cordialement,<br><strong>Le Comité d'Organisation</strong><br>SMCD 2026</p>
<p style="color: #6b7280; font-size: 12px;">Cet email est envoyé automatiquement, merci de ne pas y répondre.</p>"#,
        nom = escape(notice.nom),
        prenom = escape(notice.prenom),
        reference = escape(notice.numero_reference),
        titre = escape(notice.titre),
        rubrique = escape(&rubrique),
        kind = escape(&kind),
    );

    Email {
        subject: format!("Confirmation de soumission - Réf. {}", notice.numero_reference),
        text,
        html: Some(BRAND.render(&content)),
    }
}

/// Headline, color and message for each abstract status.
fn status_wording(statut: &str) -> (&'static str, &'static str, &'static str) {
    match statut {
        "ACCEPTE" => (
            "ACCEPTÉ",
            "#10B981",
            "Félicitations ! Votre abstract a été accepté par le comité scientifique. \
             Vous recevrez prochainement les informations concernant la présentation.",
        ),
        "REFUSE" => (
            "REFUSÉ",
            "#EF4444",
            "Nous regrettons de vous informer que votre abstract n'a pas été retenu par le comité scientifique.",
        ),
        "EN_REVISION" => (
            "En cours de révision",
            "#F59E0B",
            "Votre abstract est actuellement en cours d'examen par le comité scientifique.",
        ),
        _ => (
            "En attente",
            "#6B7280",
            "Votre abstract est en attente de révision.",
        ),
    }
}

/// Status change notification, with the committee's comments when present.
pub fn abstract_status(notice: &AbstractNotice<'_>) -> Email {
    let (headline, color, message) = status_wording(notice.statut);
    let comments = non_blank(notice.commentaires);

    let mut text = format!(
        "Cher(e) Dr. {} {},\n\n\
         Le statut de votre soumission {} a été mis à jour.\n\n\
         Statut : {headline}\n\
         Titre : {}\n\n\
         {message}\n",
        notice.nom, notice.prenom, notice.numero_reference, notice.titre,
    );
    if let Some(comments) = comments {
        text.push_str(&format!("\nCommentaires du comité :\n{comments}\n"));
    }
    text.push_str("\nCordialement,\nLe Comité Scientifique\nSMCD 2026");

    let content = format!(
        r#"<h2>Cher(e) Dr. {nom} {prenom},</h2>
<p>Le statut de votre soumission <strong>{reference}</strong> a été mis à jour.</p>
<div style="font-size: 24px; font-weight: bold; text-align: center; padding: 20px; background: white; border-radius: 8px; margin: 20px 0; color: {color};">{headline}</div>
<p><strong>Titre :</strong> {titre}</p>
<p>{message}</p>
{comments}
<p>Cordialement,<br><strong>Le Comité Scientifique</strong><br>SMCD 2026</p>"#,
        nom = escape(notice.nom),
        prenom = escape(notice.prenom),
        reference = escape(notice.numero_reference),
        titre = escape(notice.titre),
        comments = comments
            .map(|c| note_box("Commentaires du comité :", c))
            .unwrap_or_default(),
    );

    let layout = Layout {
        subtitle: "Mise à jour de votre soumission",
        ..BRAND
    };

    Email {
        subject: format!(
            "Mise à jour de votre soumission - Réf. {}",
            notice.numero_reference
        ),
        text,
        html: Some(layout.render(&content)),
    }
}

// ---------------------------------------------------------------------------
// E-posters
// ---------------------------------------------------------------------------

/// Receipt sent after an e-poster upload.
pub fn eposter_received(notice: &EposterNotice<'_>) -> Email {
    let date = notice.date_upload.format(DATE_FORMAT).to_string();
    let file = notice.nom_fichier.unwrap_or("N/A");

    let text = format!(
        "Cher(e) {} {},\n\n\
         Nous accusons réception de votre e-poster pour le Congrès SMCD 2026.\n\n\
         Titre : {}\n\
         Date d'upload : {date}\n\
         Fichier : {file}\n\n\
         Votre e-poster sera examiné par l'équipe d'organisation et vous recevrez une notification sous 48h.\n\n\
         Cordialement,\nL'équipe SMCD",
        notice.prenom, notice.nom, notice.titre,
    );

    let content = format!(
        r#"<h2>Cher(e) {prenom} {nom},</h2>
<p>Nous accusons réception de votre e-poster pour le Congrès SMCD 2026.</p>
<div style="background: white; padding: 20px; border-radius: 8px; margin: 20px 0; border-left: 4px solid #8B5CF6;">
<p><strong>Titre :</strong> {titre}</p>
<p><strong>Date d'upload :</strong> {date}</p>
<p><strong>Fichier :</strong> {file}</p>
</div>
<p>Votre e-poster sera examiné par l'équipe d'organisation et vous recevrez une notification <strong>sous 48h</strong>.</p>
<p>Cordialement,<br><strong>L'équipe SMCD</strong></p>"#,
        prenom = escape(notice.prenom),
        nom = escape(notice.nom),
        titre = escape(notice.titre),
        file = escape(file),
    );

    let layout = Layout {
        gradient: ("#8B5CF6", "#6366F1"),
        title: "E-Poster Reçu",
        subtitle: "SMCD 2026",
    };

    Email {
        subject: "Confirmation d'upload - E-Poster SMCD 2026".into(),
        text,
        html: Some(layout.render(&content)),
    }
}

/// Sent when an admin approves an e-poster.
pub fn eposter_approved(notice: &EposterNotice<'_>) -> Email {
    let text = format!(
        "Cher(e) {} {},\n\n\
         Votre e-poster intitulé \"{}\" a été approuvé pour le Congrès SMCD 2026.\n\
         Il est maintenant visible publiquement dans la galerie des e-posters : {EPOSTER_GALLERY_URL}\n\n\
         Cordialement,\nL'équipe SMCD",
        notice.prenom, notice.nom, notice.titre,
    );

    let content = format!(
        r#"<h2>Cher(e) {prenom} {nom},</h2>
<div style="background: #D1FAE5; color: #065F46; padding: 15px 25px; border-radius: 8px; text-align: center; font-size: 18px; font-weight: bold; margin: 20px 0;">E-POSTER APPROUVÉ</div>
<p>Votre e-poster intitulé <strong>"{titre}"</strong> a été approuvé pour le Congrès SMCD 2026.</p>
<p>Il est maintenant visible publiquement sur notre plateforme dans la galerie des e-posters.</p>
<p style="text-align: center;"><a href="{EPOSTER_GALLERY_URL}" style="display: inline-block; background: #10B981; color: white; padding: 12px 24px; text-decoration: none; border-radius: 6px;">Voir la galerie</a></p>
<p>Cordialement,<br><strong>L'équipe SMCD</strong></p>"#,
        prenom = escape(notice.prenom),
        nom = escape(notice.nom),
        titre = escape(notice.titre),
    );

    let layout = Layout {
        gradient: ("#10B981", "#059669"),
        title: "Félicitations !",
        subtitle: "Votre E-Poster a été approuvé",
    };

    Email {
        subject: "E-Poster approuvé - SMCD 2026".into(),
        text,
        html: Some(layout.render(&content)),
    }
}

/// Sent when an admin rejects an e-poster. The reason defaults to
/// "Non spécifiée".
pub fn eposter_rejected(notice: &EposterNotice<'_>) -> Email {
    let reason = non_blank(notice.commentaires).unwrap_or("Non spécifiée");

    let text = format!(
        "Cher(e) {} {},\n\n\
         Nous vous remercions pour votre soumission. Malheureusement, votre e-poster intitulé \"{}\" \
         ne peut être retenu pour le congrès.\n\n\
         Raison :\n{reason}\n\n\
         Nous vous encourageons à soumettre une nouvelle version si vous le souhaitez.\n\n\
         Cordialement,\nL'équipe SMCD",
        notice.prenom, notice.nom, notice.titre,
    );

    let content = format!(
        r#"<h2>Cher(e) {prenom} {nom},</h2>
<p>Nous vous remercions pour votre soumission. Malheureusement, votre e-poster intitulé <strong>"{titre}"</strong> ne peut être retenu pour le congrès.</p>
{reason}
<p>Nous vous encourageons à soumettre une nouvelle version si vous le souhaitez.</p>
<p>Cordialement,<br><strong>L'équipe SMCD</strong></p>"#,
        prenom = escape(notice.prenom),
        nom = escape(notice.nom),
        titre = escape(notice.titre),
        reason = note_box("Raison :", reason),
    );

    let layout = Layout {
        gradient: ("#6B7280", "#4B5563"),
        title: "E-Poster non retenu",
        subtitle: "SMCD 2026",
    };

    Email {
        subject: "E-Poster non retenu - SMCD 2026".into(),
        text,
        html: Some(layout.render(&content)),
    }
}

// ---------------------------------------------------------------------------
// Newsletter
// ---------------------------------------------------------------------------

/// Link a subscriber follows to unsubscribe.
pub fn unsubscribe_url(frontend_url: &str, token: &str) -> String {
    format!(
        "{}/newsletter/unsubscribe?token={token}",
        frontend_url.trim_end_matches('/')
    )
}

/// Welcome message for a new newsletter subscriber.
pub fn newsletter_welcome(unsubscribe_url: &str) -> Email {
    let text = format!(
        "Bienvenue !\n\n\
         Merci de vous être inscrit(e) à la newsletter du Congrès SMCD 2026 !\n\
         Vous recevrez nos actualités et informations importantes concernant le congrès :\n\
         - Dates et programme\n\
         - Appel à abstracts\n\
         - Conférenciers invités\n\
         - Inscriptions\n\n\
         Pour vous désinscrire : {unsubscribe_url}"
    );

    let content = format!(
        r#"<h2>Bienvenue !</h2>
<p>Merci de vous être inscrit(e) à la newsletter du Congrès SMCD 2026 !</p>
<p>Vous recevrez nos actualités et informations importantes concernant le congrès :</p>
<ul>
<li>Dates et programme</li>
<li>Appel à abstracts</li>
<li>Conférenciers invités</li>
<li>Inscriptions</li>
</ul>
<p style="font-size: 12px; color: #6b7280;">Pour vous désinscrire, <a href="{url}">cliquez ici</a>.</p>"#,
        url = escape(unsubscribe_url),
    );

    let layout = Layout {
        subtitle: "Newsletter",
        ..BRAND
    };

    Email {
        subject: "Bienvenue à la newsletter SMCD 2026".into(),
        text,
        html: Some(layout.render(&content)),
    }
}

// ---------------------------------------------------------------------------
// Contact form
// ---------------------------------------------------------------------------

/// Copy of a contact-form message for the organising team.
pub fn contact_forward(msg: &ContactMessage<'_>) -> Email {
    Email::text(
        format!("[Contact SMCD] {}", msg.sujet),
        format!(
            "Nouveau message de contact reçu:\n\n\
             Nom: {}\n\
             Email: {}\n\
             Sujet: {}\n\n\
             Message:\n{}\n\n\
             ---\n\
             Ce message a été envoyé via le formulaire de contact du site SMCD Congress.",
            msg.nom, msg.email, msg.sujet, msg.message
        ),
    )
}

/// Acknowledgement sent back to the person who used the contact form.
pub fn contact_ack(msg: &ContactMessage<'_>) -> Email {
    Email::text(
        "Confirmation de réception - SMCD Congrès",
        format!(
            "Bonjour {},\n\n\
             Nous avons bien reçu votre message concernant: \"{}\"\n\n\
             Notre équipe vous répondra dans les meilleurs délais.\n\n\
             Cordialement,\n\
             L'équipe SMCD Congrès\n\n\
             ---\n\
             Société Marocaine de Chirurgie Digestive",
            msg.nom, msg.sujet
        ),
    )
}
