use serde::Deserialize;

use crate::{
    errors::{BotError, BotResult},
    utils::format_size,
};

/// The only container offered to users
pub const SUPPORTED_CONTAINER: &str = "mp4";

/// One entry of the `formats` array printed by `yt-dlp -J`
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawFormat {
    pub format_id: String,
    #[serde(default)]
    pub ext: String,
    pub format_note: Option<String>,
    pub height: Option<u32>,
    pub filesize: Option<u64>,
    pub filesize_approx: Option<u64>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormatDescriptor {
    pub id: String,
    pub ext: String,
    pub note: String,
    pub size: Option<u64>,
}

impl From<&RawFormat> for FormatDescriptor {
    fn from(raw: &RawFormat) -> Self {
        let note = raw
            .format_note
            .as_deref()
            .map(str::trim)
            .filter(|n| !n.is_empty())
            .map(str::to_string)
            .or_else(|| raw.height.map(|h| format!("{}p", h)))
            .unwrap_or_else(|| "N/A".to_string());

        Self {
            id: raw.format_id.clone(),
            ext: raw.ext.clone(),
            note,
            size: raw.filesize.or(raw.filesize_approx),
        }
    }
}

/// Selectable formats in the order the probe returned them
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Catalog {
    title: Option<String>,
    formats: Vec<FormatDescriptor>,
}

impl Catalog {
    pub fn get(&self, id: &str) -> Option<&FormatDescriptor> {
        self.formats.iter().find(|f| f.id == id)
    }

    pub fn contains(&self, id: &str) -> bool {
        self.get(id).is_some()
    }

    pub fn len(&self) -> usize {
        self.formats.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = &FormatDescriptor> {
        self.formats.iter()
    }

    pub fn with_title(mut self, title: Option<String>) -> Self {
        self.title = title.filter(|t| !t.trim().is_empty());
        self
    }

    /// Message listing every format, one per line
    pub fn render(&self) -> String {
        let mut text = match &self.title {
            Some(title) => format!("Available qualities for \"{}\":\n", title),
            None => "Available qualities:\n".to_string(),
        };

        for f in self.iter() {
            match f.size {
                Some(size) => text.push_str(&format!(
                    "{}: {} ({}, ~{})\n",
                    f.id,
                    f.ext,
                    f.note,
                    format_size(size)
                )),
                None => text.push_str(&format!("{}: {} ({})\n", f.id, f.ext, f.note)),
            }
        }

        text.push_str("Please reply with the format ID you want to download.");
        text
    }
}

/// Keep only formats in [`SUPPORTED_CONTAINER`], preserving probe order
pub fn build_catalog(raw_formats: &[RawFormat]) -> BotResult<Catalog> {
    let formats: Vec<FormatDescriptor> = raw_formats
        .iter()
        .filter(|f| f.ext == SUPPORTED_CONTAINER)
        .map(FormatDescriptor::from)
        .collect();

    if formats.is_empty() {
        return Err(BotError::NoSupportedFormats);
    }

    Ok(Catalog {
        title: None,
        formats,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn raw(id: &str, ext: &str, note: Option<&str>) -> RawFormat {
        RawFormat {
            format_id: id.to_string(),
            ext: ext.to_string(),
            format_note: note.map(str::to_string),
            ..Default::default()
        }
    }

    #[test]
    fn keeps_only_mp4_in_probe_order() {
        let formats = vec![
            raw("249", "webm", Some("tiny")),
            raw("22", "mp4", Some("720p")),
            raw("140", "m4a", Some("medium")),
            raw("18", "mp4", Some("360p")),
            raw("137", "mp4", Some("1080p")),
            raw("248", "webm", Some("1080p")),
        ];

        let catalog = build_catalog(&formats).unwrap();
        let ids: Vec<&str> = catalog.iter().map(|f| f.id.as_str()).collect();
        assert_eq!(ids, ["22", "18", "137"]);
        assert_eq!(catalog.len(), 3);
        assert!(catalog.contains("18"));
        assert!(!catalog.contains("249"));
    }

    #[test]
    fn container_must_match_exactly() {
        let formats = vec![raw("1", "mp4a", None), raw("2", "webm", None)];
        assert!(matches!(
            build_catalog(&formats),
            Err(BotError::NoSupportedFormats)
        ));
        assert!(matches!(build_catalog(&[]), Err(BotError::NoSupportedFormats)));
    }

    #[test]
    fn duplicate_ids_are_kept() {
        let formats = vec![raw("18", "mp4", Some("360p")), raw("18", "mp4", Some("360p"))];
        assert_eq!(build_catalog(&formats).unwrap().len(), 2);
    }

    #[test]
    fn note_falls_back_to_height_then_na() {
        let with_height = RawFormat {
            height: Some(480),
            ..raw("135", "mp4", None)
        };
        let formats = vec![with_height, raw("x", "mp4", Some("  "))];

        let catalog = build_catalog(&formats).unwrap();
        assert_eq!(catalog.get("135").unwrap().note, "480p");
        assert_eq!(catalog.get("x").unwrap().note, "N/A");
    }

    #[test]
    fn renders_listing() {
        let sized = RawFormat {
            filesize_approx: Some(12_897_484),
            ..raw("22", "mp4", Some("720p"))
        };
        let catalog = build_catalog(&[raw("18", "mp4", Some("360p")), sized]).unwrap();

        assert_eq!(
            catalog.render(),
            "Available qualities:\n\
             18: mp4 (360p)\n\
             22: mp4 (720p, ~12.3 MB)\n\
             Please reply with the format ID you want to download."
        );

        let titled = catalog.with_title(Some("Never Gonna Give You Up".to_string()));
        assert!(
            titled
                .render()
                .starts_with("Available qualities for \"Never Gonna Give You Up\":\n18:")
        );
    }

    #[test]
    fn parses_ytdlp_format_entry() {
        let json = r#"{"format_id": "18", "ext": "mp4", "format_note": "360p", "height": 360, "vcodec": "avc1.42001E"}"#;
        let format: RawFormat = serde_json::from_str(json).unwrap();
        assert_eq!(format.format_id, "18");
        assert_eq!(format.height, Some(360));
        assert_eq!(format.filesize, None);
    }
}
