//! Section classification and extraction.
//!
//! A section node is classified into a [`SectionKind`] once, then asked for
//! its text fragments and media descriptors. Unknown or malformed nodes never
//! fail; they simply yield nothing.

use serde_json::Value;

use crate::core::types::MediaKind;

pub const CITE_PREFIX: &str = "— ";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MediaSource {
    pub src: String,
    pub caption: Option<String>,
    pub alt: String,
    pub credit: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SectionKind {
    Paragraph {
        content: String,
    },
    PullQuote {
        text: String,
        cite: Option<String>,
    },
    ImageGif(Option<MediaSource>),
    Video(Option<MediaSource>),
    /// Entries keep their array index; entries without a source are already dropped.
    ImageGroup(Vec<(usize, MediaSource)>),
    Opaque {
        type_tag: Option<String>,
    },
}

/// One media item as extracted, before it is given a final sort order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MediaDraft {
    pub kind: MediaKind,
    pub url: String,
    pub caption: Option<String>,
    pub alt_text: String,
    pub credit: String,
    pub local_order: i64,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Extraction {
    pub fragments: Vec<String>,
    pub media: Vec<MediaDraft>,
}

pub fn classify(node: &Value) -> SectionKind {
    let type_tag = str_field(node, "type");
    match type_tag.as_deref() {
        Some("paragraph") => SectionKind::Paragraph {
            content: str_field(node, "content").unwrap_or_default(),
        },
        Some("pullquote") => SectionKind::PullQuote {
            text: str_field(node, "text").unwrap_or_default(),
            cite: str_field(node, "cite").filter(|cite| !cite.is_empty()),
        },
        Some("imagegif") => SectionKind::ImageGif(media_source(node)),
        Some("video") => SectionKind::Video(media_source(node)),
        Some("imagegroup") => SectionKind::ImageGroup(
            node.get("images")
                .and_then(Value::as_array)
                .map(|images| {
                    images
                        .iter()
                        .enumerate()
                        .filter_map(|(index, image)| media_source(image).map(|m| (index, m)))
                        .collect()
                })
                .unwrap_or_default(),
        ),
        _ => SectionKind::Opaque { type_tag },
    }
}

pub fn interpret(node: &Value) -> Extraction {
    classify(node).extract()
}

impl SectionKind {
    pub fn extract(&self) -> Extraction {
        match self {
            Self::Paragraph { content } => Extraction {
                fragments: vec![content.clone()],
                media: Vec::new(),
            },
            Self::PullQuote { text, cite } => {
                let mut fragments = vec![text.clone()];
                if let Some(cite) = cite {
                    fragments.push(format!("{CITE_PREFIX}{cite}"));
                }
                Extraction {
                    fragments,
                    media: Vec::new(),
                }
            }
            Self::ImageGif(source) => Extraction {
                fragments: Vec::new(),
                media: source
                    .iter()
                    .map(|m| draft(MediaKind::for_still_url(&m.src), m, 0))
                    .collect(),
            },
            Self::Video(source) => Extraction {
                fragments: Vec::new(),
                media: source
                    .iter()
                    .map(|m| draft(MediaKind::Video, m, 0))
                    .collect(),
            },
            Self::ImageGroup(images) => Extraction {
                fragments: Vec::new(),
                media: images
                    .iter()
                    .map(|(index, m)| draft(MediaKind::Image, m, *index as i64))
                    .collect(),
            },
            Self::Opaque { .. } => Extraction::default(),
        }
    }

    /// The single text block this section contributes to a merged post.
    /// A pullquote keeps its citation on the following line.
    pub fn merged_text(&self) -> Option<String> {
        match self {
            Self::Paragraph { content } if !content.is_empty() => Some(content.clone()),
            Self::PullQuote { text, cite } if !text.is_empty() => Some(match cite {
                Some(cite) => format!("{text}\n{CITE_PREFIX}{cite}"),
                None => text.clone(),
            }),
            _ => None,
        }
    }
}

fn draft(kind: MediaKind, source: &MediaSource, local_order: i64) -> MediaDraft {
    MediaDraft {
        kind,
        url: source.src.clone(),
        caption: source.caption.clone(),
        alt_text: source.alt.clone(),
        credit: source.credit.clone(),
        local_order,
    }
}

fn media_source(node: &Value) -> Option<MediaSource> {
    let src = str_field(node, "src").filter(|src| !src.is_empty())?;
    Some(MediaSource {
        src,
        caption: str_field(node, "caption"),
        alt: str_field(node, "alt").unwrap_or_default(),
        credit: str_field(node, "credit").unwrap_or_default(),
    })
}

fn str_field(node: &Value, key: &str) -> Option<String> {
    node.get(key).and_then(Value::as_str).map(ToString::to_string)
}
