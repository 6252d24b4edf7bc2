//! Word export of a submitted abstract.

use chrono::{DateTime, Utc};

use crate::catalog::{Rubrique, StatutSoumission, TypeCommunication};
use crate::docx::{Align, DocxBuilder, DocxError, Paragraph, Run};

const FONT: &str = "Times New Roman";
const CONGRESS_TITLE: &str = "CONGRÈS NATIONAL DE CHIRURGIE DIGESTIVE 2026";
const SOCIETY_NAME: &str = "Société Marocaine de Chirurgie Digestive (SMCD)";
const FOOTER_NOTE: &str = "Document généré automatiquement - SMCD 2026";

/// Borrowed view of the abstract fields printed on the sheet.
#[derive(Debug, Clone)]
pub struct AbstractSheet<'a> {
    pub nom: &'a str,
    pub prenom: &'a str,
    pub email: &'a str,
    pub telephone: Option<&'a str>,
    pub auteurs: &'a str,
    pub affiliation: &'a str,
    pub rubrique: &'a str,
    pub type_communication: &'a str,
    pub numero_reference: &'a str,
    pub date_soumission: DateTime<Utc>,
    pub statut: &'a str,
    pub titre: &'a str,
    pub mots_cles: Option<&'a str>,
    pub introduction: &'a str,
    pub materiel_methodes: &'a str,
    pub resultats: &'a str,
    pub discussion: &'a str,
    pub conclusion: &'a str,
    pub bibliography: Option<&'a str>,
}

/// Render the abstract as `.docx` bytes.
pub fn render_abstract_docx(sheet: &AbstractSheet<'_>) -> Result<Vec<u8>, DocxError> {
    build_document(sheet).build()
}

fn build_document(sheet: &AbstractSheet<'_>) -> DocxBuilder {
    let mut doc = DocxBuilder::new(FONT);

    // Header
    doc.push(
        Paragraph::new()
            .align(Align::Center)
            .run(Run::new(CONGRESS_TITLE).bold().size(14).color("1E40AF")),
    );
    doc.push(
        Paragraph::new()
            .align(Align::Center)
            .run(Run::new(SOCIETY_NAME).italic().size(11)),
    );
    doc.separator();

    // Submission details
    let author = format!("{} {}", sheet.prenom, sheet.nom);
    let date = sheet.date_soumission.format("%d/%m/%Y à %H:%M").to_string();
    info_line(&mut doc, "Auteur principal", &author);
    info_line(&mut doc, "Email", sheet.email);
    if let Some(tel) = sheet.telephone.filter(|t| !t.trim().is_empty()) {
        info_line(&mut doc, "Téléphone", tel);
    }
    info_line(&mut doc, "Auteurs", sheet.auteurs);
    info_line(&mut doc, "Affiliation", sheet.affiliation);
    info_line(&mut doc, "Rubrique", &Rubrique::label_of(sheet.rubrique));
    info_line(
        &mut doc,
        "Type de communication",
        &TypeCommunication::label_of(sheet.type_communication),
    );
    info_line(&mut doc, "Numéro de référence", sheet.numero_reference);
    info_line(&mut doc, "Date de soumission", &date);

    doc.separator();
    doc.empty_line();

    // Title and keywords
    doc.push(
        Paragraph::new()
            .align(Align::Center)
            .spacing(0, 400)
            .run(Run::new(sheet.titre.to_uppercase()).bold().size(16)),
    );
    if let Some(keywords) = sheet.mots_cles.filter(|k| !k.trim().is_empty()) {
        doc.push(
            Paragraph::new()
                .run(Run::new("Mots-clés : ").bold().italic())
                .run(Run::new(keywords).italic()),
        );
        doc.empty_line();
    }

    // Body
    section(&mut doc, "Introduction", sheet.introduction);
    section(&mut doc, "Matériel et méthodes", sheet.materiel_methodes);
    section(&mut doc, "Résultats", sheet.resultats);
    section(&mut doc, "Discussion", sheet.discussion);
    section(&mut doc, "Conclusion", sheet.conclusion);
    if let Some(refs) = sheet.bibliography.filter(|b| !b.trim().is_empty()) {
        section(&mut doc, "Références", refs);
    }

    // Footer
    doc.empty_line();
    doc.separator();
    doc.push(footer_line(format!("Référence : {}", sheet.numero_reference)));
    doc.push(footer_line(format!(
        "Statut : {}",
        StatutSoumission::label_of(sheet.statut)
    )));
    doc.push(
        Paragraph::new()
            .align(Align::Center)
            .run(Run::new(FOOTER_NOTE).italic().size(9).color("999999")),
    );

    doc
}

fn info_line(doc: &mut DocxBuilder, label: &str, value: &str) {
    doc.push(
        Paragraph::new()
            .line_spacing(1.15)
            .run(Run::new(format!("{label} : ")).bold().size(11))
            .run(Run::new(value).size(11)),
    );
}

fn section(doc: &mut DocxBuilder, title: &str, content: &str) {
    doc.push(
        Paragraph::new()
            .spacing(200, 100)
            .run(Run::new(title).bold().size(12)),
    );
    doc.push(
        Paragraph::new()
            .align(Align::Justify)
            .line_spacing(1.5)
            .first_line_indent(720)
            .run(Run::new(content).size(11)),
    );
}

fn footer_line(text: String) -> Paragraph {
    Paragraph::new()
        .align(Align::Center)
        .run(Run::new(text).size(10).color("666666"))
}
