//! Building result documents page by page.
//!
//! [`PageAssembler`] starts from an empty document and copies source pages
//! into it in the order they are pushed, together with every object those
//! pages reference. Attributes a page inherits from its page-tree ancestors
//! are written onto the page itself, because the source tree is not carried
//! over. Pushing the same page twice yields two distinct page objects.

use lopdf::{Dictionary, Document, Object, ObjectId, dictionary};
use std::collections::HashSet;

use crate::error::{Result, SpliceError};
use crate::transform::bookmarks;

/// Page attributes that may be inherited from a `Pages` node.
const INHERITABLE: [&[u8]; 4] = [b"Resources", b"MediaBox", b"CropBox", b"Rotate"];

/// Accumulates pages from one or more sources into a new document.
pub struct PageAssembler {
    target: Document,
    kids: Vec<ObjectId>,
    placed: HashSet<ObjectId>,
    outline: Vec<(String, ObjectId)>,
}

impl PageAssembler {
    /// Create an assembler producing a document of the given PDF version.
    pub fn new(version: impl Into<String>) -> Self {
        Self {
            target: Document::with_version(version),
            kids: Vec::new(),
            placed: HashSet::new(),
            outline: Vec::new(),
        }
    }

    /// Create an assembler matching `source`'s PDF version.
    pub fn for_source(source: &Document) -> Self {
        Self::new(source.version.clone())
    }

    /// Number of pages pushed so far.
    pub fn page_count(&self) -> usize {
        self.kids.len()
    }

    /// First object number not used by anything pushed so far.
    pub fn next_object_number(&self) -> u32 {
        self.target.max_id + 1
    }

    /// Append the page `page_id` of `source`.
    ///
    /// Object ids of `source` are kept, so pages from different sources must
    /// come from documents whose id ranges do not overlap (see
    /// [`Document::renumber_objects_with`]).
    ///
    /// Returns the id the page has in the result.
    ///
    /// # Errors
    ///
    /// Returns `Pdf` if `page_id` is not a dictionary in `source`.
    pub fn push_page(&mut self, source: &Document, page_id: ObjectId) -> Result<ObjectId> {
        self.target.max_id = self.target.max_id.max(source.max_id);

        let mut page = source.get_dictionary(page_id)?.clone();
        flatten_inherited(source, page_id, &mut page);
        page.remove(b"Parent");

        for (_, value) in page.iter() {
            copy_references(&mut self.target, source, value);
        }

        let id = if self.placed.contains(&page_id) {
            self.target.new_object_id()
        } else {
            page_id
        };
        self.target.objects.insert(id, Object::Dictionary(page));
        self.placed.insert(id);
        self.kids.push(id);
        Ok(id)
    }

    /// Queue a top-level bookmark pointing at a page already pushed.
    pub fn bookmark(&mut self, title: impl Into<String>, page_id: ObjectId) {
        self.outline.push((title.into(), page_id));
    }

    /// Build the page tree, catalog and outline, and compact the result.
    ///
    /// # Errors
    ///
    /// Returns an error if the outline cannot be attached.
    pub fn finish(self) -> Result<Document> {
        let Self {
            mut target,
            kids,
            outline,
            ..
        } = self;

        let kept: HashSet<ObjectId> = kids.iter().copied().collect();
        for kid in &kids {
            drop_dangling_links(&mut target, *kid, &kept);
        }

        let pages_id = target.new_object_id();
        for kid in &kids {
            let page = target
                .get_dictionary_mut(*kid)
                .map_err(|e| SpliceError::unexpected(format!("page {kid:?} vanished: {e}")))?;
            page.set("Parent", pages_id);
        }

        let count = kids.len() as i64;
        let pages = dictionary! {
            "Type" => "Pages",
            "Kids" => kids.into_iter().map(Object::Reference).collect::<Vec<_>>(),
            "Count" => count,
        };
        target.objects.insert(pages_id, Object::Dictionary(pages));

        let catalog_id = target.add_object(dictionary! {
            "Type" => "Catalog",
            "Pages" => pages_id,
        });
        target.trailer.set("Root", catalog_id);

        if !outline.is_empty() {
            bookmarks::attach_outline(&mut target, &outline)?;
        }

        target.prune_objects();
        target.renumber_objects();
        Ok(target)
    }
}

/// Copy inherited attributes from the page's ancestors onto `page`.
fn flatten_inherited(source: &Document, page_id: ObjectId, page: &mut Dictionary) {
    let mut visited = HashSet::from([page_id]);
    let mut parent = page.get(b"Parent").and_then(Object::as_reference).ok();

    while let Some(node_id) = parent {
        if !visited.insert(node_id) {
            break;
        }
        let Ok(node) = source.get_dictionary(node_id) else {
            break;
        };
        for key in INHERITABLE {
            if !page.has(key)
                && let Ok(value) = node.get(key)
            {
                page.set(key, value.clone());
            }
        }
        parent = node.get(b"Parent").and_then(Object::as_reference).ok();
    }
}

/// Copy the objects reachable from `obj` out of `source` into `target`.
///
/// `Page` and `Pages` objects are never copied: a page enters the result only
/// through [`PageAssembler::push_page`]. References to pages that are never
/// pushed are left dangling, and [`PageAssembler::finish`] removes the link
/// annotations that carry them.
pub fn copy_references(target: &mut Document, source: &Document, obj: &Object) {
    match obj {
        Object::Reference(ref_id) => {
            if target.objects.contains_key(ref_id) {
                return;
            }
            let Ok(referenced) = source.get_object(*ref_id) else {
                return;
            };
            if is_page_tree_node(referenced) {
                return;
            }
            target.objects.insert(*ref_id, referenced.clone());
            copy_references(target, source, referenced);
        }
        Object::Dictionary(dict) => {
            for (_, value) in dict.iter() {
                copy_references(target, source, value);
            }
        }
        Object::Array(items) => {
            for item in items {
                copy_references(target, source, item);
            }
        }
        Object::Stream(stream) => {
            for (_, value) in stream.dict.iter() {
                copy_references(target, source, value);
            }
        }
        _ => {}
    }
}

fn is_page_tree_node(obj: &Object) -> bool {
    obj.as_dict()
        .and_then(|d| d.get(b"Type"))
        .and_then(Object::as_name)
        .is_ok_and(|name| name == b"Pages" || name == b"Page")
}

/// Remove the link annotations of `page_id` that jump to a page outside
/// `kept`.
fn drop_dangling_links(doc: &mut Document, page_id: ObjectId, kept: &HashSet<ObjectId>) {
    let Ok(page) = doc.get_dictionary(page_id) else {
        return;
    };
    let Ok(annots) = page.get(b"Annots") else {
        return;
    };
    let Ok((_, Object::Array(annots))) = doc.dereference(annots) else {
        return;
    };

    let retained: Vec<Object> = annots
        .iter()
        .filter(|annot| link_target(doc, annot).is_none_or(|target| kept.contains(&target)))
        .cloned()
        .collect();
    if retained.len() == annots.len() {
        return;
    }

    log::debug!(
        "Dropping {} link(s) to removed pages from {page_id:?}",
        annots.len() - retained.len()
    );
    if let Ok(page) = doc.get_dictionary_mut(page_id) {
        if retained.is_empty() {
            page.remove(b"Annots");
        } else {
            page.set("Annots", retained);
        }
    }
}

/// The page an annotation's explicit destination points at, either through
/// `/Dest` or a GoTo action's `/D`.
fn link_target(doc: &Document, annot: &Object) -> Option<ObjectId> {
    let (_, annot) = doc.dereference(annot).ok()?;
    let annot = annot.as_dict().ok()?;
    let dest = match annot.get(b"Dest") {
        Ok(dest) => dest,
        Err(_) => {
            let (_, action) = doc.dereference(annot.get(b"A").ok()?).ok()?;
            action.as_dict().ok()?.get(b"D").ok()?
        }
    };
    let (_, dest) = doc.dereference(dest).ok()?;
    dest.as_array().ok()?.first()?.as_reference().ok()
}
