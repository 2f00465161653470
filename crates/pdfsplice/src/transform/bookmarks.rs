//! Document outline (bookmarks) for merged results.
//!
//! Merges add one flat, top-level bookmark per source document. Nested
//! outlines carried by the sources are not preserved.

use lopdf::{Dictionary, Document, Object, ObjectId, decode_text_string, text_string};

use crate::error::{Result, SpliceError};

/// Attach a flat outline to `doc`, one entry per `(title, page)` pair.
///
/// Each entry jumps to the top of its page (`[page /XYZ null null null]`).
///
/// # Errors
///
/// Returns an error if the document has no catalog.
pub fn attach_outline(doc: &mut Document, items: &[(String, ObjectId)]) -> Result<()> {
    if items.is_empty() {
        return Ok(());
    }

    let outline_id = doc.new_object_id();
    let item_ids: Vec<ObjectId> = items.iter().map(|_| doc.new_object_id()).collect();

    for (i, ((title, page_id), item_id)) in items.iter().zip(&item_ids).enumerate() {
        let mut item = Dictionary::new();
        item.set("Title", text_string(title));
        item.set("Parent", outline_id);
        item.set(
            "Dest",
            vec![
                Object::Reference(*page_id),
                Object::Name(b"XYZ".to_vec()),
                Object::Null,
                Object::Null,
                Object::Null,
            ],
        );
        if i > 0 {
            item.set("Prev", item_ids[i - 1]);
        }
        if let Some(next) = item_ids.get(i + 1) {
            item.set("Next", *next);
        }
        doc.objects.insert(*item_id, Object::Dictionary(item));
    }

    let mut root = Dictionary::new();
    root.set("Type", Object::Name(b"Outlines".to_vec()));
    root.set("Count", item_ids.len() as i64);
    if let (Some(first), Some(last)) = (item_ids.first(), item_ids.last()) {
        root.set("First", *first);
        root.set("Last", *last);
    }
    doc.objects.insert(outline_id, Object::Dictionary(root));

    doc.catalog_mut()
        .map_err(|e| SpliceError::unexpected(format!("Failed to get catalog: {e}")))?
        .set("Outlines", outline_id);

    Ok(())
}

/// Titles and target pages of the top-level outline entries, in order.
///
/// Pages are reported as 1-based page numbers. Entries whose destination is
/// not a page of `doc` are reported with page `0`.
pub fn outline_entries(doc: &Document) -> Vec<(String, u32)> {
    let page_numbers: std::collections::HashMap<ObjectId, u32> = doc
        .get_pages()
        .into_iter()
        .map(|(number, id)| (id, number))
        .collect();

    let mut entries = Vec::new();
    let Ok(outlines_id) = doc
        .catalog()
        .and_then(|c| c.get(b"Outlines"))
        .and_then(Object::as_reference)
    else {
        return entries;
    };

    let mut next = doc
        .get_dictionary(outlines_id)
        .and_then(|d| d.get(b"First"))
        .and_then(Object::as_reference)
        .ok();

    while let Some(item_id) = next {
        let Ok(item) = doc.get_dictionary(item_id) else {
            break;
        };
        let title = item
            .get(b"Title")
            .and_then(decode_text_string)
            .unwrap_or_default();
        let page = item
            .get(b"Dest")
            .and_then(Object::as_array)
            .ok()
            .and_then(|dest| dest.first())
            .and_then(|target| target.as_reference().ok())
            .and_then(|id| page_numbers.get(&id).copied())
            .unwrap_or(0);
        entries.push((title, page));

        next = item.get(b"Next").and_then(Object::as_reference).ok();
        if entries.len() > doc.objects.len() {
            break;
        }
    }

    entries
}
