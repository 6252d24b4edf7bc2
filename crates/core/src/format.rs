//! Human-readable renderings of durations, sizes, schedules and names.
//!
//! These back the derived fields of API responses (`duree_formatee`,
//! `taille_formatee`, `horaire_session`, ...).

use chrono::NaiveTime;

const KIB: f64 = 1024.0;
const MIB: f64 = KIB * 1024.0;
const GIB: f64 = MIB * 1024.0;

/// Marker returned when a size is unknown.
pub const UNKNOWN_SIZE: &str = "N/A";

// ---------------------------------------------------------------------------
// Durations
// ---------------------------------------------------------------------------

/// Format a video length in seconds as `H:MM:SS` (one hour or more) or
/// `MM:SS`. Unknown lengths render as `00:00`.
pub fn format_clock(seconds: Option<i32>) -> String {
    let Some(total) = seconds else {
        return "00:00".to_string();
    };
    let total = total.max(0);
    let hours = total / 3600;
    let minutes = (total % 3600) / 60;
    let secs = total % 60;
    if hours > 0 {
        format!("{hours}:{minutes:02}:{secs:02}")
    } else {
        format!("{minutes:02}:{secs:02}")
    }
}

/// Format an aggregate duration in minutes as `2h 05min` or `45 min`.
pub fn format_total_minutes(minutes: i64) -> String {
    let minutes = minutes.max(0);
    let hours = minutes / 60;
    let rest = minutes % 60;
    if hours > 0 {
        format!("{hours}h {rest:02}min")
    } else {
        format!("{rest} min")
    }
}

// ---------------------------------------------------------------------------
// Sizes
// ---------------------------------------------------------------------------

/// Scale bytes through B/KB/MB/GB with one decimal (`12.5 MB`).
pub fn format_size(bytes: Option<i64>) -> String {
    let Some(bytes) = bytes else {
        return UNKNOWN_SIZE.to_string();
    };
    let units = ["B", "KB", "MB", "GB"];
    let mut size = bytes.max(0) as f64;
    let mut unit = 0;
    while size >= KIB && unit < units.len() - 1 {
        size /= KIB;
        unit += 1;
    }
    format!("{size:.1} {}", units[unit])
}

/// Format an uploaded file size as KB below one megabyte, MB above.
pub fn format_file_size(bytes: Option<i64>) -> String {
    let Some(bytes) = bytes else {
        return UNKNOWN_SIZE.to_string();
    };
    let kb = bytes.max(0) as f64 / KIB;
    if kb < KIB {
        format!("{kb:.1} KB")
    } else {
        format!("{:.1} MB", kb / KIB)
    }
}

/// Format an aggregate storage total (`0 B`, `12.0 KB`, `3.4 MB`, `1.25 GB`).
pub fn format_storage_total(bytes: i64) -> String {
    if bytes <= 0 {
        return "0 B".to_string();
    }
    let bytes = bytes as f64;
    if bytes < MIB {
        format!("{:.1} KB", bytes / KIB)
    } else if bytes < GIB {
        format!("{:.1} MB", bytes / MIB)
    } else {
        format!("{:.2} GB", bytes / GIB)
    }
}

/// Disk usage summary for the video library: GB from one gigabyte up,
/// otherwise MB.
pub fn format_disk_usage(bytes: i64) -> String {
    let bytes = bytes.max(0) as f64;
    if bytes >= GIB {
        format!("{:.1} GB", bytes / GIB)
    } else {
        format!("{:.1} MB", bytes / MIB)
    }
}

// ---------------------------------------------------------------------------
// Schedules, names, tags
// ---------------------------------------------------------------------------

/// `"09:00 - 10:30"`, `"09:00"` or `" - 10:30"` depending on which bounds
/// are known. `None` when neither is.
pub fn session_schedule(start: Option<NaiveTime>, end: Option<NaiveTime>) -> Option<String> {
    if start.is_none() && end.is_none() {
        return None;
    }
    let mut out = String::new();
    if let Some(start) = start {
        out.push_str(&start.format("%H:%M").to_string());
    }
    if let Some(end) = end {
        out.push_str(" - ");
        out.push_str(&end.format("%H:%M").to_string());
    }
    Some(out)
}

/// `"Pr Amina Alaoui"`: optional title, first name, last name.
pub fn full_name(titre: Option<&str>, prenom: &str, nom: &str) -> String {
    let mut out = String::new();
    if let Some(t) = titre.filter(|t| !t.is_empty()) {
        out.push_str(t);
        out.push(' ');
    }
    out.push_str(prenom);
    out.push(' ');
    out.push_str(nom);
    out.trim().to_string()
}

/// `"Rabat, Maroc"`, using whichever parts are present.
pub fn localisation(ville: Option<&str>, pays: Option<&str>) -> String {
    [ville, pays]
        .into_iter()
        .flatten()
        .filter(|s| !s.is_empty())
        .collect::<Vec<_>>()
        .join(", ")
}

/// Split a comma-separated tag list, trimming blanks.
pub fn split_tags(tags: Option<&str>) -> Vec<String> {
    tags.unwrap_or_default()
        .split(',')
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .map(str::to_string)
        .collect()
}

/// Media-store delivery URL with automatic quality/format negotiation.
pub fn streaming_url(video_url: &str) -> String {
    if video_url.contains("/upload/") && !video_url.contains("/upload/q_auto") {
        video_url.replacen("/upload/", "/upload/q_auto,f_auto/", 1)
    } else {
        video_url.to_string()
    }
}

/// `"mot_president"` becomes `"Mot president"`.
pub fn title_from_key(key: &str) -> String {
    let spaced = key.replace('_', " ");
    let mut chars = spaced.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clock_under_an_hour() {
        assert_eq!(format_clock(Some(754)), "12:34");
        assert_eq!(format_clock(Some(5)), "00:05");
    }

    #[test]
    fn clock_over_an_hour() {
        assert_eq!(format_clock(Some(3725)), "1:02:05");
    }

    #[test]
    fn clock_unknown() {
        assert_eq!(format_clock(None), "00:00");
    }

    #[test]
    fn total_minutes() {
        assert_eq!(format_total_minutes(45), "45 min");
        assert_eq!(format_total_minutes(125), "2h 05min");
        assert_eq!(format_total_minutes(0), "0 min");
    }

    #[test]
    fn size_scales_units() {
        assert_eq!(format_size(Some(512)), "512.0 B");
        assert_eq!(format_size(Some(1536)), "1.5 KB");
        assert_eq!(format_size(Some(5 * 1024 * 1024)), "5.0 MB");
        assert_eq!(format_size(Some(3 * 1024 * 1024 * 1024)), "3.0 GB");
        assert_eq!(format_size(None), "N/A");
    }

    #[test]
    fn file_size_switches_to_mb() {
        assert_eq!(format_file_size(Some(2048)), "2.0 KB");
        assert_eq!(format_file_size(Some(3 * 1024 * 1024)), "3.0 MB");
    }

    #[test]
    fn storage_total() {
        assert_eq!(format_storage_total(0), "0 B");
        assert_eq!(format_storage_total(10 * 1024), "10.0 KB");
        assert_eq!(format_storage_total(5 * 1024 * 1024 + 512 * 1024), "5.5 MB");
        assert_eq!(format_storage_total(5 * 1024 * 1024 * 1024 / 4), "1.25 GB");
    }

    #[test]
    fn disk_usage() {
        assert_eq!(format_disk_usage(200 * 1024 * 1024), "200.0 MB");
        assert_eq!(format_disk_usage(2 * 1024 * 1024 * 1024), "2.0 GB");
    }

    #[test]
    fn schedule_variants() {
        let nine = NaiveTime::from_hms_opt(9, 0, 0);
        let half_ten = NaiveTime::from_hms_opt(10, 30, 0);
        assert_eq!(
            session_schedule(nine, half_ten).as_deref(),
            Some("09:00 - 10:30")
        );
        assert_eq!(session_schedule(nine, None).as_deref(), Some("09:00"));
        assert_eq!(session_schedule(None, None), None);
    }

    #[test]
    fn names_and_places() {
        assert_eq!(full_name(Some("Pr"), "Amina", "Alaoui"), "Pr Amina Alaoui");
        assert_eq!(full_name(None, "Amina", "Alaoui"), "Amina Alaoui");
        assert_eq!(full_name(Some(""), "Amina", "Alaoui"), "Amina Alaoui");
        assert_eq!(localisation(Some("Rabat"), Some("Maroc")), "Rabat, Maroc");
        assert_eq!(localisation(None, Some("Maroc")), "Maroc");
        assert_eq!(localisation(Some(""), None), "");
    }

    #[test]
    fn tags_are_trimmed() {
        assert_eq!(
            split_tags(Some("foie, pancréas,,  robot ")),
            vec!["foie", "pancréas", "robot"]
        );
        assert!(split_tags(None).is_empty());
    }

    #[test]
    fn streaming_url_injects_transformations_once() {
        let url = "https://res.cloudinary.com/demo/video/upload/v1/smcd/a.mp4";
        let streamed = streaming_url(url);
        assert_eq!(
            streamed,
            "https://res.cloudinary.com/demo/video/upload/q_auto,f_auto/v1/smcd/a.mp4"
        );
        assert_eq!(streaming_url(&streamed), streamed);
        assert_eq!(streaming_url("/media/videos/a.mp4"), "/media/videos/a.mp4");
    }

    #[test]
    fn key_titles() {
        assert_eq!(title_from_key("mot_president"), "Mot president");
        assert_eq!(title_from_key("cgu"), "Cgu");
        assert_eq!(title_from_key(""), "");
    }
}
