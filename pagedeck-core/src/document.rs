//! Thin wrapper over the `lopdf` document container.
//!
//! Operations never touch `lopdf` directly; they describe the pages they
//! want as [`PagePick`]s and [`PdfFile::assemble`] rebuilds the page tree.
//! Picks may repeat an index (page duplication) and carry an additional
//! rotation that is added on top of whatever /Rotate the source page
//! already has.

use lopdf::content::Content;
use lopdf::{dictionary, Dictionary, Document, Object, ObjectId, Stream};

use crate::operations::{OperationError, OperationResult};

/// Resource name under which stamping registers its Helvetica font.
pub(crate) const STAMP_FONT_KEY: &str = "pdF1";
/// Resource name for the stamping alpha graphics state.
pub(crate) const STAMP_GS_KEY: &str = "pdG1";

/// One page to place in an assembled document.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PagePick {
    /// 0-based index into the source document's page list.
    pub index: usize,
    /// Degrees to add to the page's existing rotation, normalized mod 360.
    pub rotate_by: i32,
}

impl PagePick {
    /// Copy the page unchanged.
    pub fn copy(index: usize) -> Self {
        Self {
            index,
            rotate_by: 0,
        }
    }

    /// Copy the page with extra rotation.
    pub fn rotated(index: usize, rotate_by: i32) -> Self {
        Self { index, rotate_by }
    }
}

/// A loaded PDF document.
#[derive(Debug)]
pub struct PdfFile {
    doc: Document,
}

impl PdfFile {
    /// Parse a document from raw bytes.
    pub fn from_bytes(bytes: &[u8]) -> OperationResult<Self> {
        let doc =
            Document::load_mem(bytes).map_err(|e| OperationError::Parse(e.to_string()))?;
        Ok(Self { doc })
    }

    pub(crate) fn from_document(doc: Document) -> Self {
        Self { doc }
    }

    #[cfg(test)]
    pub(crate) fn document(&self) -> &Document {
        &self.doc
    }

    pub(crate) fn into_document(self) -> Document {
        self.doc
    }

    /// Number of pages in page-tree order.
    pub fn page_count(&self) -> usize {
        self.doc.get_pages().len()
    }

    /// Effective /Rotate of a page, 0 when absent or out of range.
    pub fn page_rotation(&self, index: usize) -> i32 {
        self.page_ids()
            .get(index)
            .map(|&id| self.rotation_of(id))
            .unwrap_or(0)
    }

    /// Page size in points, (width, height). Walks the Parent chain for an
    /// inherited MediaBox and falls back to US Letter.
    pub fn page_size(&self, index: usize) -> (f64, f64) {
        self.page_ids()
            .get(index)
            .map(|&id| self.page_size_of(id))
            .unwrap_or((612.0, 792.0))
    }

    /// Serialize the document.
    pub fn to_bytes(&mut self) -> OperationResult<Vec<u8>> {
        let mut buffer = Vec::new();
        self.doc.save_to(&mut buffer)?;
        Ok(buffer)
    }

    /// Build a new document containing exactly the picked pages, in pick
    /// order. Every pick clones the source page dictionary under a fresh
    /// object id, so an index may appear more than once. Shared resources
    /// survive through reachability; everything unreferenced is pruned.
    pub fn assemble(&self, picks: &[PagePick]) -> OperationResult<PdfFile> {
        if picks.is_empty() {
            return Err(OperationError::EmptySelection(
                "no pages selected".to_string(),
            ));
        }

        let mut out = self.doc.clone();
        let pages = Self::page_ids_of(&out);
        for pick in picks {
            if pick.index >= pages.len() {
                return Err(OperationError::PageIndexOutOfBounds(
                    pick.index,
                    pages.len(),
                ));
            }
        }

        let pages_root_id = out
            .catalog()?
            .get(b"Pages")?
            .as_reference()
            .map_err(|e| OperationError::Parse(e.to_string()))?;

        let mut kids = Vec::with_capacity(picks.len());
        for pick in picks {
            let source_id = pages[pick.index];
            let mut dict = out.get_object(source_id)?.as_dict()?.clone();
            dict.set("Parent", Object::Reference(pages_root_id));

            let rotation =
                normalize_rotation(rotation_of_dict(&dict) + pick.rotate_by);
            if rotation == 0 {
                dict.remove(b"Rotate");
            } else {
                dict.set("Rotate", Object::Integer(rotation as i64));
            }

            let new_id = out.add_object(Object::Dictionary(dict));
            kids.push(Object::Reference(new_id));
        }

        let count = kids.len() as i64;
        let root = out.get_object_mut(pages_root_id)?.as_dict_mut()?;
        root.set("Kids", Object::Array(kids));
        root.set("Count", Object::Integer(count));

        out.prune_objects();
        out.renumber_objects();
        out.compress();

        Ok(PdfFile { doc: out })
    }

    /// Append a stamp content stream to every page.
    ///
    /// `build` receives the 0-based page index and the page size in points
    /// and returns the content operations to append. The stream may use the
    /// Helvetica font registered as /pdF1 and, when `alpha` is given, the
    /// graphics state /pdG1 carrying that constant alpha.
    pub(crate) fn stamp_pages<F>(&mut self, alpha: Option<f32>, build: F) -> OperationResult<()>
    where
        F: Fn(usize, (f64, f64)) -> Vec<lopdf::content::Operation>,
    {
        let pages = self.page_ids();
        if pages.is_empty() {
            return Err(OperationError::EmptySelection(
                "document has no pages".to_string(),
            ));
        }

        let font_id = self.doc.add_object(dictionary! {
            "Type" => "Font",
            "Subtype" => "Type1",
            "BaseFont" => "Helvetica",
        });
        let gs_id = alpha.map(|a| {
            self.doc.add_object(dictionary! {
                "Type" => "ExtGState",
                "ca" => Object::Real(a),
                "CA" => Object::Real(a),
            })
        });

        for (index, page_id) in pages.into_iter().enumerate() {
            let size = self.page_size_of(page_id);
            let content = Content {
                operations: build(index, size),
            };
            let stream_id = self
                .doc
                .add_object(Stream::new(Dictionary::new(), content.encode()?));

            self.append_content(page_id, stream_id)?;
            self.ensure_resource(page_id, "Font", STAMP_FONT_KEY, font_id)?;
            if let Some(gs) = gs_id {
                self.ensure_resource(page_id, "ExtGState", STAMP_GS_KEY, gs)?;
            }
        }

        Ok(())
    }

    /// Compress content streams in place.
    pub(crate) fn compress_streams(&mut self) {
        self.doc.compress();
    }

    /// Remove unreachable objects and compress content streams in place.
    pub(crate) fn repack(&mut self) {
        self.doc.prune_objects();
        self.doc.compress();
    }

    /// Strip the document information dictionary.
    pub(crate) fn strip_info(&mut self) {
        self.doc.trailer.remove(b"Info");
    }

    fn page_ids(&self) -> Vec<ObjectId> {
        Self::page_ids_of(&self.doc)
    }

    fn page_ids_of(doc: &Document) -> Vec<ObjectId> {
        doc.get_pages().into_values().collect()
    }

    fn rotation_of(&self, page_id: ObjectId) -> i32 {
        self.doc
            .get_object(page_id)
            .and_then(Object::as_dict)
            .map(rotation_of_dict)
            .unwrap_or(0)
    }

    fn page_size_of(&self, page_id: ObjectId) -> (f64, f64) {
        let mut current = Some(page_id);
        // bounded walk; malformed files can have Parent cycles
        for _ in 0..16 {
            let Some(id) = current else { break };
            let Ok(dict) = self.doc.get_object(id).and_then(Object::as_dict) else {
                break;
            };
            if let Ok(obj) = dict.get(b"MediaBox") {
                let obj = match obj {
                    Object::Reference(r) => self.doc.get_object(*r).unwrap_or(obj),
                    other => other,
                };
                if let Ok(arr) = obj.as_array() {
                    if arr.len() == 4 {
                        let n: Vec<f64> = arr.iter().map(as_number).collect();
                        return ((n[2] - n[0]).abs(), (n[3] - n[1]).abs());
                    }
                }
            }
            current = dict.get(b"Parent").ok().and_then(|o| o.as_reference().ok());
        }
        (612.0, 792.0)
    }

    /// Turn the page's Contents into an array ending with `stream_id`.
    fn append_content(&mut self, page_id: ObjectId, stream_id: ObjectId) -> OperationResult<()> {
        let existing = self
            .doc
            .get_object(page_id)?
            .as_dict()?
            .get(b"Contents")
            .ok()
            .cloned();

        let mut streams = match existing {
            Some(Object::Reference(id)) => vec![Object::Reference(id)],
            Some(Object::Array(items)) => items,
            _ => Vec::new(),
        };
        streams.push(Object::Reference(stream_id));

        let dict = self.doc.get_object_mut(page_id)?.as_dict_mut()?;
        dict.set("Contents", Object::Array(streams));
        Ok(())
    }

    /// Register `target` under Resources/`category`/`key` for the page,
    /// following an indirect Resources dictionary when present.
    fn ensure_resource(
        &mut self,
        page_id: ObjectId,
        category: &str,
        key: &str,
        target: ObjectId,
    ) -> OperationResult<()> {
        let entry = self
            .doc
            .get_object(page_id)?
            .as_dict()?
            .get(b"Resources")
            .ok()
            .cloned();

        match entry {
            Some(Object::Reference(res_id)) => {
                let resolved = self.doc.get_object(res_id)?.as_dict()?.clone();
                let updated = with_resource(resolved, &self.doc, category, key, target);
                *self.doc.get_object_mut(res_id)? = Object::Dictionary(updated);
            }
            Some(Object::Dictionary(res)) => {
                let updated = with_resource(res, &self.doc, category, key, target);
                let dict = self.doc.get_object_mut(page_id)?.as_dict_mut()?;
                dict.set("Resources", Object::Dictionary(updated));
            }
            _ => {
                let updated =
                    with_resource(Dictionary::new(), &self.doc, category, key, target);
                let dict = self.doc.get_object_mut(page_id)?.as_dict_mut()?;
                dict.set("Resources", Object::Dictionary(updated));
            }
        }
        Ok(())
    }
}

fn with_resource(
    mut resources: Dictionary,
    doc: &Document,
    category: &str,
    key: &str,
    target: ObjectId,
) -> Dictionary {
    let mut entries = match resources.get(category.as_bytes()) {
        Ok(Object::Dictionary(d)) => d.clone(),
        Ok(Object::Reference(r)) => doc
            .get_object(*r)
            .and_then(Object::as_dict)
            .cloned()
            .unwrap_or_default(),
        _ => Dictionary::new(),
    };
    entries.set(key, Object::Reference(target));
    resources.set(category, Object::Dictionary(entries));
    resources
}

fn rotation_of_dict(dict: &Dictionary) -> i32 {
    dict.get(b"Rotate")
        .ok()
        .and_then(|o| o.as_i64().ok())
        .map(|d| d as i32)
        .unwrap_or(0)
}

fn as_number(obj: &Object) -> f64 {
    match obj {
        Object::Integer(i) => *i as f64,
        Object::Real(r) => *r as f64,
        _ => 0.0,
    }
}

/// Normalize degrees into `[0, 360)`.
pub(crate) fn normalize_rotation(degrees: i32) -> i32 {
    let d = degrees % 360;
    if d < 0 {
        d + 360
    } else {
        d
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{page_texts, sample_pdf};
    use pretty_assertions::assert_eq;

    #[test]
    fn assemble_copies_picked_pages_in_order() {
        let file = sample_pdf(5);
        let out = file
            .assemble(&[PagePick::copy(4), PagePick::copy(0), PagePick::copy(2)])
            .unwrap();

        assert_eq!(out.page_count(), 3);
        let texts = page_texts(&out);
        assert!(texts[0].contains("Page 5"));
        assert!(texts[1].contains("Page 1"));
        assert!(texts[2].contains("Page 3"));
    }

    #[test]
    fn assemble_supports_duplicate_picks() {
        let file = sample_pdf(3);
        let out = file
            .assemble(&[PagePick::copy(0), PagePick::copy(0), PagePick::copy(1)])
            .unwrap();

        assert_eq!(out.page_count(), 3);
        let texts = page_texts(&out);
        assert!(texts[0].contains("Page 1"));
        assert!(texts[1].contains("Page 1"));
        assert!(texts[2].contains("Page 2"));
    }

    #[test]
    fn assemble_rejects_empty_pick_list() {
        let file = sample_pdf(3);
        assert!(matches!(
            file.assemble(&[]),
            Err(OperationError::EmptySelection(_))
        ));
    }

    #[test]
    fn assemble_rejects_out_of_bounds_pick() {
        let file = sample_pdf(3);
        assert!(matches!(
            file.assemble(&[PagePick::copy(3)]),
            Err(OperationError::PageIndexOutOfBounds(3, 3))
        ));
    }

    #[test]
    fn rotation_is_additive_over_existing_rotate() {
        let file = sample_pdf(2);
        let once = file
            .assemble(&[PagePick::rotated(0, 90), PagePick::copy(1)])
            .unwrap();
        assert_eq!(once.page_rotation(0), 90);
        assert_eq!(once.page_rotation(1), 0);

        let twice = once
            .assemble(&[PagePick::rotated(0, 270), PagePick::copy(1)])
            .unwrap();
        // 90 + 270 wraps back to 0 and the key is dropped
        assert_eq!(twice.page_rotation(0), 0);
    }

    #[test]
    fn serialized_output_reloads() {
        let file = sample_pdf(4);
        let mut out = file.assemble(&[PagePick::copy(1), PagePick::copy(3)]).unwrap();
        let bytes = out.to_bytes().unwrap();
        assert!(bytes.starts_with(b"%PDF"));

        let reloaded = PdfFile::from_bytes(&bytes).unwrap();
        assert_eq!(reloaded.page_count(), 2);
    }

    #[test]
    fn normalize_rotation_wraps_and_handles_negatives() {
        assert_eq!(normalize_rotation(0), 0);
        assert_eq!(normalize_rotation(450), 90);
        assert_eq!(normalize_rotation(-90), 270);
        assert_eq!(normalize_rotation(360), 0);
    }

    #[test]
    fn page_size_reads_media_box() {
        let file = sample_pdf(1);
        assert_eq!(file.page_size(0), (612.0, 792.0));
    }
}
