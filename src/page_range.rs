use crate::error::{Error, Result};
use std::collections::BTreeSet;
use std::fmt;

/// One comma-separated token of a range expression.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PageRange {
    Single(u32),
    Span { start: u32, end: u32 },
}

impl PageRange {
    /// Parse a token like "5" or "2-7", validated against `total_pages`.
    pub fn parse(token: &str, total_pages: u32) -> Result<Self> {
        let token = token.trim();

        if let Some((start_str, end_str)) = token.split_once('-') {
            let start = parse_number(start_str)
                .ok_or_else(|| Error::InvalidRange(format!("'{}' has no valid start", token)))?;
            let end = parse_number(end_str)
                .ok_or_else(|| Error::InvalidRange(format!("'{}' has no valid end", token)))?;

            if start < 1 {
                return Err(Error::InvalidRange(format!(
                    "'{}' starts before page 1",
                    token
                )));
            }
            if end > i64::from(total_pages) {
                return Err(Error::InvalidRange(format!(
                    "'{}' ends after the last page ({})",
                    token, total_pages
                )));
            }
            if start > end {
                return Err(Error::InvalidRange(format!(
                    "'{}' starts after it ends",
                    token
                )));
            }

            Ok(PageRange::Span {
                start: start as u32,
                end: end as u32,
            })
        } else {
            let page = parse_number(token)
                .ok_or_else(|| Error::InvalidPage(format!("'{}' is not a number", token)))?;

            if page < 1 || page > i64::from(total_pages) {
                return Err(Error::InvalidPage(format!(
                    "{} is outside 1-{}",
                    page, total_pages
                )));
            }

            Ok(PageRange::Single(page as u32))
        }
    }

    /// Expand this token into its 1-based page numbers
    pub fn expand(&self) -> impl Iterator<Item = u32> {
        let (start, end) = match *self {
            PageRange::Single(page) => (page, page),
            PageRange::Span { start, end } => (start, end),
        };
        start..=end
    }
}

fn parse_number(s: &str) -> Option<i64> {
    s.trim().parse::<i64>().ok()
}

/// Ascending, duplicate-free 1-based page numbers.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PageSet(Vec<u32>);

impl PageSet {
    pub fn from_pages<I: IntoIterator<Item = u32>>(pages: I) -> Self {
        let unique: BTreeSet<u32> = pages.into_iter().collect();
        PageSet(unique.into_iter().collect())
    }

    pub fn as_slice(&self) -> &[u32] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }
}

/// A maximal run of consecutive page numbers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageGroup {
    pub first: u32,
    pub last: u32,
}

impl PageGroup {
    pub fn pages(&self) -> impl Iterator<Item = u32> {
        self.first..=self.last
    }

    /// "5" for a single page, "1-3" otherwise
    pub fn label(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for PageGroup {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.first == self.last {
            write!(f, "{}", self.first)
        } else {
            write!(f, "{}-{}", self.first, self.last)
        }
    }
}

/// Parse a comma-separated range expression like "1-3,5,7-10".
///
/// Fails on the first invalid token.
pub fn parse_page_ranges(spec: &str, total_pages: u32) -> Result<PageSet> {
    let mut pages = Vec::new();
    for token in spec.split(',') {
        pages.extend(PageRange::parse(token, total_pages)?.expand());
    }
    Ok(PageSet::from_pages(pages))
}

/// Collapse a page set into runs of consecutive pages.
pub fn group_pages(pages: &PageSet) -> Vec<PageGroup> {
    let mut groups: Vec<PageGroup> = Vec::new();
    for &page in pages.as_slice() {
        match groups.last_mut() {
            Some(group) if group.last + 1 == page => group.last = page,
            _ => groups.push(PageGroup {
                first: page,
                last: page,
            }),
        }
    }
    groups
}
