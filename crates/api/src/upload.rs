//! Multipart form collection for upload endpoints.
//!
//! Handlers read the whole form into an [`UploadForm`] first, then pull
//! typed fields and files out of it. File parts are recognised by the
//! presence of a filename.

use std::collections::HashMap;
use std::str::FromStr;

use axum::extract::Multipart;
use smcd_cloud::MediaFile;
use smcd_core::error::CoreError;
use smcd_core::upload::{validate_upload, UploadRule};

use crate::error::{AppError, AppResult};

#[derive(Debug, Default)]
pub struct UploadForm {
    fields: HashMap<String, String>,
    files: HashMap<String, MediaFile>,
}

impl UploadForm {
    /// Drain every part of the request body.
    pub async fn read(mut multipart: Multipart) -> AppResult<Self> {
        let mut form = Self::default();

        while let Some(field) = multipart
            .next_field()
            .await
            .map_err(|e| AppError::BadRequest(e.to_string()))?
        {
            let Some(name) = field.name().map(str::to_string) else {
                continue;
            };

            match field.file_name().map(str::to_string) {
                Some(filename) => {
                    let content_type = field.content_type().map(str::to_string);
                    let bytes = field
                        .bytes()
                        .await
                        .map_err(|e| AppError::BadRequest(e.to_string()))?;
                    form.files.insert(
                        name,
                        MediaFile::new(bytes.to_vec(), Some(filename), content_type),
                    );
                }
                None => {
                    let text = field
                        .text()
                        .await
                        .map_err(|e| AppError::BadRequest(e.to_string()))?;
                    form.fields.insert(name, text);
                }
            }
        }

        Ok(form)
    }

    /// Trimmed text value; blank counts as absent.
    pub fn text(&self, name: &str) -> Option<String> {
        self.fields
            .get(name)
            .map(|v| v.trim())
            .filter(|v| !v.is_empty())
            .map(str::to_string)
    }

    /// Text value that must be present, else 400 with `message`.
    pub fn required(&self, name: &str, message: &str) -> AppResult<String> {
        self.text(name)
            .ok_or_else(|| AppError::Core(CoreError::Validation(message.to_string())))
    }

    /// Parsed value; an unparsable value is a 400 naming the field.
    pub fn parse<T: FromStr>(&self, name: &str) -> AppResult<Option<T>> {
        match self.text(name) {
            None => Ok(None),
            Some(raw) => raw.parse().map(Some).map_err(|_| {
                AppError::Core(CoreError::Validation(format!(
                    "Valeur invalide pour le champ '{name}'"
                )))
            }),
        }
    }

    /// Checkbox-style boolean: `true`/`false`, `1`/`0`, `on`/`off`.
    pub fn flag(&self, name: &str) -> AppResult<Option<bool>> {
        match self.text(name).map(|v| v.to_ascii_lowercase()).as_deref() {
            None => Ok(None),
            Some("true" | "1" | "on" | "oui") => Ok(Some(true)),
            Some("false" | "0" | "off" | "non") => Ok(Some(false)),
            Some(_) => Err(AppError::Core(CoreError::Validation(format!(
                "Valeur invalide pour le champ '{name}'"
            )))),
        }
    }

    /// Remove a non-empty file part.
    pub fn take_file(&mut self, name: &str) -> Option<MediaFile> {
        self.files.remove(name).filter(|f| !f.is_empty())
    }

    /// Remove a file part and check it against `rule`. Missing files are
    /// reported with `missing`.
    pub fn take_checked(
        &mut self,
        name: &str,
        rule: &UploadRule,
        missing: &str,
    ) -> AppResult<MediaFile> {
        let file = self
            .take_file(name)
            .ok_or_else(|| AppError::Core(CoreError::Validation(missing.to_string())))?;
        check_file(rule, &file)?;
        Ok(file)
    }

    /// Like [`take_checked`](Self::take_checked) for optional parts.
    pub fn take_optional(&mut self, name: &str, rule: &UploadRule) -> AppResult<Option<MediaFile>> {
        match self.take_file(name) {
            Some(file) => {
                check_file(rule, &file)?;
                Ok(Some(file))
            }
            None => Ok(None),
        }
    }
}

/// Validate a collected file against an upload rule.
pub fn check_file(rule: &UploadRule, file: &MediaFile) -> AppResult<()> {
    validate_upload(
        rule,
        file.filename.as_deref(),
        file.content_type.as_deref(),
        file.len(),
    )?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;
    use smcd_core::upload::SPEAKER_PHOTO;

    use super::*;

    fn form() -> UploadForm {
        let mut form = UploadForm::default();
        form.fields.insert("nom".into(), "  Alaoui ".into());
        form.fields.insert("vide".into(), "   ".into());
        form.fields.insert("annee".into(), "2026".into());
        form.fields.insert("ordre".into(), "abc".into());
        form.fields.insert("featured".into(), "on".into());
        form.files.insert(
            "photo".into(),
            MediaFile::new(vec![1, 2, 3], Some("p.png".into()), Some("image/png".into())),
        );
        form.files.insert(
            "cv".into(),
            MediaFile::new(Vec::new(), Some("cv.pdf".into()), Some("application/pdf".into())),
        );
        form
    }

    #[test]
    fn text_is_trimmed_and_blank_is_absent() {
        let form = form();
        assert_eq!(form.text("nom").as_deref(), Some("Alaoui"));
        assert_eq!(form.text("vide"), None);
        assert_eq!(form.text("absent"), None);
    }

    #[test]
    fn parse_reports_bad_values() {
        let form = form();
        assert_eq!(form.parse::<i32>("annee").unwrap(), Some(2026));
        assert_eq!(form.parse::<i32>("absent").unwrap(), None);
        assert_matches!(
            form.parse::<i32>("ordre"),
            Err(AppError::Core(CoreError::Validation(_)))
        );
    }

    #[test]
    fn flags_accept_checkbox_values() {
        let form = form();
        assert_eq!(form.flag("featured").unwrap(), Some(true));
        assert!(form.flag("nom").is_err());
    }

    #[test]
    fn empty_files_are_treated_as_missing() {
        let mut form = form();
        assert!(form.take_file("cv").is_none());
        assert!(form
            .take_checked("photo", &SPEAKER_PHOTO, "Photo obligatoire")
            .is_ok());
        assert_matches!(
            form.take_checked("photo", &SPEAKER_PHOTO, "Photo obligatoire"),
            Err(AppError::Core(CoreError::Validation(msg))) if msg == "Photo obligatoire"
        );
    }
}
