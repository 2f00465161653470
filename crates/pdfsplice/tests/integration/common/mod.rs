//! Shared helpers for the integration tests.
//!
//! PDFs are generated on the fly. Page `n` of a generated file has a
//! MediaBox width that identifies it, so tests can check which source pages
//! ended up where.

#![allow(dead_code)]

use lopdf::{Document, Object, Stream, dictionary};
use pdfsplice::job::{JobResult, MonitorSink};
use std::path::{Path, PathBuf};

/// Write a PDF whose pages have the given MediaBox widths.
pub fn write_pdf(dir: &Path, name: &str, widths: &[i64]) -> PathBuf {
    let mut doc = Document::with_version("1.5");
    let pages_id = doc.new_object_id();

    let kids: Vec<Object> = widths
        .iter()
        .map(|width| {
            let content = format!("BT 20 20 Td (page {width}) Tj ET");
            let content_id = doc.add_object(Stream::new(dictionary! {}, content.into_bytes()));
            let page_id = doc.add_object(dictionary! {
                "Type" => "Page",
                "Parent" => pages_id,
                "MediaBox" => vec![0.into(), 0.into(), Object::Integer(*width), 792.into()],
                "Contents" => content_id,
            });
            Object::Reference(page_id)
        })
        .collect();

    let count = kids.len() as i64;
    doc.objects.insert(
        pages_id,
        Object::Dictionary(dictionary! {
            "Type" => "Pages",
            "Kids" => kids,
            "Count" => count,
        }),
    );
    let catalog_id = doc.add_object(dictionary! {
        "Type" => "Catalog",
        "Pages" => pages_id,
    });
    doc.trailer.set("Root", catalog_id);

    let path = dir.join(name);
    doc.save(&path).expect("Failed to write test PDF");
    path
}

/// Write a PDF with `count` pages of widths `base + 1 ..= base + count`.
pub fn write_numbered_pdf(dir: &Path, name: &str, base: i64, count: usize) -> PathBuf {
    let widths: Vec<i64> = (1..=count as i64).map(|n| base + n).collect();
    write_pdf(dir, name, &widths)
}

/// MediaBox widths of the pages in the PDF at `path`, in page order.
pub fn page_widths(path: &Path) -> Vec<i64> {
    let doc = Document::load(path).expect("Failed to load result PDF");
    doc.get_pages()
        .into_values()
        .map(|id| {
            doc.get_dictionary(id)
                .and_then(|page| page.get(b"MediaBox"))
                .and_then(Object::as_array)
                .and_then(|media_box| media_box[2].as_i64())
                .expect("page without MediaBox width")
        })
        .collect()
}

/// Monitor sink that records everything it is told.
#[derive(Debug, Default)]
pub struct RecordingSink {
    pub lines: Vec<String>,
    pub results: Vec<JobResult>,
}

impl MonitorSink for RecordingSink {
    fn progress(&mut self, message: &str) {
        self.lines.push(message.to_string());
    }

    fn finished(&mut self, result: &JobResult) {
        self.results.push(result.clone());
    }
}
