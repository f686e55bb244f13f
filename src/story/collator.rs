use crate::{core::types::NewMedia, story::interpreter::{Extraction, MediaDraft}};

/// Flattens the media of several sections into one list numbered 0, 1, 2, …
/// in section order, then local order within each section.
pub fn collate<'a, I>(extractions: I) -> Vec<NewMedia>
where
    I: IntoIterator<Item = &'a Extraction>,
{
    extractions
        .into_iter()
        .flat_map(ordered_drafts)
        .enumerate()
        .map(|(index, draft)| to_new_media(draft, index as i64))
        .collect()
}

/// Media of a single section, keeping the extraction's local order as the sort key.
pub fn collate_local(extraction: &Extraction) -> Vec<NewMedia> {
    ordered_drafts(extraction)
        .into_iter()
        .map(|draft| to_new_media(draft, draft.local_order))
        .collect()
}

fn ordered_drafts(extraction: &Extraction) -> Vec<&MediaDraft> {
    let mut drafts: Vec<&MediaDraft> = extraction.media.iter().collect();
    drafts.sort_by_key(|draft| draft.local_order);
    drafts
}

fn to_new_media(draft: &MediaDraft, sort_order: i64) -> NewMedia {
    NewMedia {
        kind: draft.kind,
        url: draft.url.clone(),
        caption: draft.caption.clone(),
        alt_text: draft.alt_text.clone(),
        credit: draft.credit.clone(),
        sort_order: Some(sort_order),
    }
}
