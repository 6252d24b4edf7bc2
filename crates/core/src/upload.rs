//! Upload acceptance rules (size ceilings, content types, extensions) and
//! container-format detection for uploaded media.

use crate::error::CoreError;

const MB: usize = 1024 * 1024;

/// Acceptance rule for one kind of uploaded file.
#[derive(Debug, Clone, Copy)]
pub struct UploadRule {
    /// Maximum accepted size in bytes.
    pub max_bytes: usize,
    /// Accepted MIME types. Empty means any type.
    pub content_types: &'static [&'static str],
    /// Accepted lower-case extensions (without the dot), checked when the
    /// declared content type is missing or unrecognised.
    pub extensions: &'static [&'static str],
    /// Message returned when the type is rejected.
    pub type_message: &'static str,
    /// Message returned when the file is too large.
    pub size_message: &'static str,
}

pub const GALLERY_VIDEO: UploadRule = UploadRule {
    max_bytes: 500 * MB,
    content_types: &[
        "video/mp4",
        "video/quicktime",
        "video/x-msvideo",
        "video/x-ms-wmv",
        "video/webm",
        "video/mpeg",
    ],
    extensions: &["mp4", "mov", "avi", "wmv", "webm", "mpeg", "mpg"],
    type_message: "Format vidéo non supporté. Formats acceptés : MP4, MOV, AVI, WMV, WebM, MPEG",
    size_message: "La taille du fichier dépasse la limite de 500 MB",
};

pub const COMMUNICATION_VIDEO: UploadRule = UploadRule {
    max_bytes: 500 * MB,
    content_types: &[
        "video/mp4",
        "video/quicktime",
        "video/x-msvideo",
        "video/x-ms-wmv",
        "video/x-flv",
        "video/webm",
        "video/mpeg",
    ],
    extensions: &["mp4", "mov", "avi", "wmv", "flv", "webm", "mpeg", "mpg"],
    type_message: "Format vidéo non supporté. Formats acceptés : MP4, MOV, AVI, WMV, FLV",
    size_message: "La taille du fichier dépasse la limite de 500 MB",
};

pub const EPOSTER: UploadRule = UploadRule {
    max_bytes: 50 * MB,
    content_types: &[
        "application/vnd.ms-powerpoint",
        "application/vnd.openxmlformats-officedocument.presentationml.presentation",
    ],
    extensions: &["ppt", "pptx"],
    type_message: "Seuls les fichiers PowerPoint (.ppt, .pptx) sont autorisés",
    size_message: "Le fichier ne doit pas dépasser 50 MB",
};

pub const SPEAKER_PHOTO: UploadRule = UploadRule {
    max_bytes: 10 * MB,
    content_types: &["image/jpeg", "image/jpg", "image/png", "image/webp"],
    extensions: &["jpg", "jpeg", "png", "webp"],
    type_message: "Format de photo non supporté (JPEG, PNG, WebP)",
    size_message: "La photo ne doit pas dépasser 10 MB",
};

pub const SPEAKER_CV: UploadRule = UploadRule {
    max_bytes: 20 * MB,
    content_types: &["application/pdf"],
    extensions: &["pdf"],
    type_message: "Le CV doit être un fichier PDF",
    size_message: "Le CV ne doit pas dépasser 20 MB",
};

/// Illustrations: room covers, archive banners, sponsor logos, page images.
pub const IMAGE: UploadRule = UploadRule {
    max_bytes: 10 * MB,
    content_types: &[
        "image/jpeg",
        "image/jpg",
        "image/png",
        "image/webp",
        "image/gif",
        "image/svg+xml",
    ],
    extensions: &["jpg", "jpeg", "png", "webp", "gif", "svg"],
    type_message: "Format d'image non supporté (JPEG, PNG, WebP, GIF, SVG)",
    size_message: "L'image ne doit pas dépasser 10 MB",
};

/// Downloadable documents: any type.
pub const DOCUMENT: UploadRule = UploadRule {
    max_bytes: 100 * MB,
    content_types: &[],
    extensions: &[],
    type_message: "Type de document non supporté",
    size_message: "Le document ne doit pas dépasser 100 MB",
};

/// Check an uploaded file against `rule`.
pub fn validate_upload(
    rule: &UploadRule,
    filename: Option<&str>,
    content_type: Option<&str>,
    size: usize,
) -> Result<(), CoreError> {
    if size == 0 {
        return Err(CoreError::Validation("Le fichier est obligatoire".into()));
    }
    if size > rule.max_bytes {
        return Err(CoreError::Validation(rule.size_message.into()));
    }
    if rule.content_types.is_empty() {
        return Ok(());
    }

    let type_ok = content_type
        .map(|ct| rule.content_types.contains(&ct.trim().to_lowercase().as_str()))
        .unwrap_or(false);
    if type_ok {
        return Ok(());
    }

    let ext_ok = filename
        .and_then(file_extension)
        .map(|ext| rule.extensions.contains(&ext.to_lowercase().as_str()))
        .unwrap_or(false);
    if ext_ok {
        Ok(())
    } else {
        Err(CoreError::Validation(rule.type_message.into()))
    }
}

/// Extension of a filename without the dot, if any.
pub fn file_extension(filename: &str) -> Option<&str> {
    let (stem, ext) = filename.rsplit_once('.')?;
    if stem.is_empty() || ext.is_empty() {
        None
    } else {
        Some(ext)
    }
}

/// Upper-case extension used as a document's `format_fichier`.
pub fn document_format(filename: Option<&str>) -> String {
    filename
        .and_then(file_extension)
        .map(str::to_uppercase)
        .unwrap_or_default()
}

/// Container label for a declared video content type.
pub fn video_format_from_content_type(content_type: Option<&str>) -> &'static str {
    match content_type.map(str::trim) {
        Some("video/mp4") => "MP4",
        Some("video/quicktime") => "MOV",
        Some("video/x-msvideo") => "AVI",
        Some("video/x-ms-wmv") => "WMV",
        Some("video/x-flv") => "FLV",
        Some("video/webm") => "WebM",
        Some("video/mpeg") => "MPEG",
        _ => "UNKNOWN",
    }
}

/// Container label guessed from a hosted video URL. Links without a known
/// extension (streaming platforms) are assumed to serve MP4.
pub fn video_format_from_url(url: &str) -> &'static str {
    let lower = url.trim().to_lowercase();
    if lower.is_empty() {
        return "UNKNOWN";
    }
    let path = lower.split(['?', '#']).next().unwrap_or_default();
    match file_extension(path) {
        Some("mp4") => "MP4",
        Some("mov") => "MOV",
        Some("avi") => "AVI",
        Some("wmv") => "WMV",
        Some("flv") => "FLV",
        Some("webm") => "WebM",
        Some("mpeg") | Some("mpg") => "MPEG",
        _ => "MP4",
    }
}
