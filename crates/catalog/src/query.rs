use std::fmt;

use thiserror::Error;

use crate::record::WorksheetRecord;
use crate::resolver::{filter_by_subject, filter_by_subject_and_subtopic, find_worksheet};
use crate::slug::to_slug;

/// Position of a segment within a worksheet path.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Level {
    Subject,
    Subtopic,
    Worksheet,
}

impl Level {
    const ORDER: [Level; 3] = [Level::Subject, Level::Subtopic, Level::Worksheet];
}

impl fmt::Display for Level {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Level::Subject => "subject",
            Level::Subtopic => "subtopic",
            Level::Worksheet => "worksheet",
        })
    }
}

/// A request path that cannot be matched against the catalog.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum QueryError {
    #[error("missing {0} segment")]
    MissingSegment(Level),
    #[error("expected at most 3 path segments, got {0}")]
    TooManySegments(usize),
}

/// Up to three slugified path segments: subject, subtopic, worksheet.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PathQuery {
    segments: Vec<String>,
}

impl PathQuery {
    pub fn root() -> Self {
        Self::default()
    }

    pub fn for_subject(subject: &str) -> Result<Self, QueryError> {
        Self::from_segments(&[subject])
    }

    pub fn for_subtopic(subject: &str, subtopic: &str) -> Result<Self, QueryError> {
        Self::from_segments(&[subject, subtopic])
    }

    pub fn for_worksheet(
        subject: &str,
        subtopic: &str,
        worksheet: &str,
    ) -> Result<Self, QueryError> {
        Self::from_segments(&[subject, subtopic, worksheet])
    }

    /// Build a query from raw, already percent-decoded segments.
    pub fn from_segments<S: AsRef<str>>(raw: &[S]) -> Result<Self, QueryError> {
        if raw.len() > Level::ORDER.len() {
            return Err(QueryError::TooManySegments(raw.len()));
        }

        let segments = raw
            .iter()
            .zip(Level::ORDER)
            .map(|(segment, level)| slug_segment(segment.as_ref(), level))
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self { segments })
    }

    pub fn depth(&self) -> usize {
        self.segments.len()
    }

    pub fn subject(&self) -> Option<&str> {
        self.segments.first().map(String::as_str)
    }

    pub fn subtopic(&self) -> Option<&str> {
        self.segments.get(1).map(String::as_str)
    }

    pub fn worksheet(&self) -> Option<&str> {
        self.segments.get(2).map(String::as_str)
    }

    /// Match `records` at the specificity this query carries.
    pub fn resolve<'a>(&self, records: &'a [WorksheetRecord]) -> Resolution<'a> {
        let resolution = match self.segments.as_slice() {
            [] => Resolution::All(records.iter().collect()),
            [subject] => Resolution::Subject(filter_by_subject(records, subject)),
            [subject, subtopic] => {
                Resolution::Subtopic(filter_by_subject_and_subtopic(records, subject, subtopic))
            }
            [subject, subtopic, worksheet, ..] => {
                Resolution::Worksheet(find_worksheet(records, subject, subtopic, worksheet))
            }
        };

        tracing::debug!(
            query = %self,
            matched = resolution.len(),
            "resolved worksheet path"
        );
        resolution
    }
}

impl fmt::Display for PathQuery {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "/{}", self.segments.join("/"))
    }
}

/// A present segment always yields a slug, possibly empty; an empty slug
/// still takes part in matching.
fn slug_segment(raw: &str, level: Level) -> Result<String, QueryError> {
    if raw.trim().is_empty() {
        return Err(QueryError::MissingSegment(level));
    }
    Ok(to_slug(raw))
}

/// Outcome of resolving a [`PathQuery`].
#[derive(Debug, PartialEq)]
pub enum Resolution<'a> {
    All(Vec<&'a WorksheetRecord>),
    Subject(Vec<&'a WorksheetRecord>),
    Subtopic(Vec<&'a WorksheetRecord>),
    Worksheet(Option<&'a WorksheetRecord>),
}

impl<'a> Resolution<'a> {
    pub fn len(&self) -> usize {
        match self {
            Resolution::All(records)
            | Resolution::Subject(records)
            | Resolution::Subtopic(records) => records.len(),
            Resolution::Worksheet(record) => usize::from(record.is_some()),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Matched records in input order.
    pub fn into_records(self) -> Vec<&'a WorksheetRecord> {
        match self {
            Resolution::All(records)
            | Resolution::Subject(records)
            | Resolution::Subtopic(records) => records,
            Resolution::Worksheet(record) => record.into_iter().collect(),
        }
    }
}
