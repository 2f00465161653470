//! Page range expressions.
//!
//! A range is typed by the user as comma-separated segments, each either a
//! single page (`9`) or an inclusive span (`3-7`). Pages are 1-based and kept
//! in the order they were written, duplicates included, so `3,1,3` selects
//! three pages.

use std::collections::BTreeSet;
use std::fmt;

use crate::error::{Result, SpliceError};

/// Parsed, ordered selection of 1-based page numbers.
///
/// Segments are stored as written and expanded on demand, so a very wide
/// span can be bounds-checked before any page list is materialized.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageRange {
    segments: Vec<Segment>,
}

/// One comma-separated piece of a range expression.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Segment {
    start: u32,
    end: u32,
}

impl Segment {
    fn is_empty(&self) -> bool {
        self.start > self.end
    }

    fn len(&self) -> u64 {
        if self.is_empty() {
            0
        } else {
            u64::from(self.end - self.start) + 1
        }
    }

    fn pages(&self) -> std::ops::RangeInclusive<u32> {
        self.start..=self.end
    }
}

impl PageRange {
    /// Parse a page range expression.
    ///
    /// Each segment is split on `-`; the first and last tokens are the
    /// inclusive bounds, so `3-7-9` reads as `3-9`. The middle tokens are
    /// still checked, so `3-a-9` is rejected. A segment whose start is past
    /// its end (`7-3`) contributes no pages.
    ///
    /// # Errors
    ///
    /// Returns `RangeFormat` when a token is not a page number, when a page
    /// is `0`, or when the whole expression selects no page.
    ///
    /// # Examples
    ///
    /// ```
    /// use pdfsplice::range::PageRange;
    ///
    /// let range = PageRange::parse("3-5,9").unwrap();
    /// assert_eq!(range.to_vec(), vec![3, 4, 5, 9]);
    /// ```
    pub fn parse(text: &str) -> Result<Self> {
        let mut segments = Vec::new();

        for part in text.split(',') {
            let tokens: Vec<&str> = part.split('-').collect();
            let first = parse_page(text, tokens[0])?;
            let last = match tokens.last() {
                Some(token) if tokens.len() > 1 => parse_page(text, token)?,
                _ => first,
            };
            // Middle tokens must still be numbers even though they are ignored.
            for token in tokens.iter().skip(1).take(tokens.len().saturating_sub(2)) {
                parse_page(text, token)?;
            }
            segments.push(Segment {
                start: first,
                end: last,
            });
        }

        let range = Self { segments };
        if range.is_empty() {
            return Err(SpliceError::range_format(text, "the range selects no pages"));
        }
        Ok(range)
    }

    /// Iterate over the selected pages in user order.
    pub fn pages(&self) -> impl Iterator<Item = u32> + '_ {
        self.segments.iter().flat_map(Segment::pages)
    }

    /// Collect the selected pages in user order.
    pub fn to_vec(&self) -> Vec<u32> {
        self.pages().collect()
    }

    /// Number of selected pages, duplicates counted.
    pub fn len(&self) -> u64 {
        self.segments.iter().map(Segment::len).sum()
    }

    /// Whether no page is selected.
    pub fn is_empty(&self) -> bool {
        self.segments.iter().all(Segment::is_empty)
    }

    /// Highest selected page.
    pub fn max(&self) -> Option<u32> {
        self.segments
            .iter()
            .filter(|s| !s.is_empty())
            .map(|s| s.end)
            .max()
    }

    /// Whether `page` is selected.
    pub fn contains(&self, page: u32) -> bool {
        self.segments
            .iter()
            .any(|s| page >= s.start && page <= s.end)
    }

    /// The selected pages as a set.
    pub fn distinct(&self) -> BTreeSet<u32> {
        self.pages().collect()
    }

    /// Number of distinct selected pages, computed from the segments.
    pub fn distinct_len(&self) -> u64 {
        let mut spans: Vec<Segment> = self
            .segments
            .iter()
            .copied()
            .filter(|s| !s.is_empty())
            .collect();
        spans.sort_by_key(|s| s.start);

        let mut total = 0;
        let mut current: Option<Segment> = None;
        for span in spans {
            match current.as_mut() {
                Some(cur) if span.start <= cur.end.saturating_add(1) => {
                    cur.end = cur.end.max(span.end);
                }
                _ => {
                    if let Some(done) = current.take() {
                        total += done.len();
                    }
                    current = Some(span);
                }
            }
        }
        total + current.map_or(0, |s| s.len())
    }

    /// Check the range against a document's page count.
    ///
    /// # Errors
    ///
    /// Returns `RangeOutOfBounds` when any selected page is past the end.
    pub fn validate(&self, page_count: usize) -> Result<()> {
        match self.max() {
            Some(max) if max as usize > page_count => {
                Err(SpliceError::RangeOutOfBounds { max, page_count })
            }
            _ => Ok(()),
        }
    }
}

impl fmt::Display for PageRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, segment) in self.segments.iter().enumerate() {
            if i > 0 {
                f.write_str(",")?;
            }
            if segment.start == segment.end {
                write!(f, "{}", segment.start)?;
            } else {
                write!(f, "{}-{}", segment.start, segment.end)?;
            }
        }
        Ok(())
    }
}

impl std::str::FromStr for PageRange {
    type Err = SpliceError;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

fn parse_page(input: &str, token: &str) -> Result<u32> {
    let token = token.trim();
    let page: u32 = token
        .parse()
        .map_err(|_| SpliceError::range_format(input, format!("'{token}' is not a page number")))?;
    if page == 0 {
        return Err(SpliceError::range_format(
            input,
            "page numbers start at 1",
        ));
    }
    Ok(page)
}
