//! Worksheet catalog: slug codec, record model and path resolution.

pub mod query;
pub mod record;
pub mod resolver;
pub mod slug;

pub use query::{Level, PathQuery, QueryError, Resolution};
pub use record::{PLACEHOLDER_THUMBNAIL, RecordId, WorksheetRecord};
pub use resolver::{
    distinct_subjects, distinct_subtopics, filter_by_subject, filter_by_subject_and_subtopic,
    find_worksheet,
};
pub use slug::{from_slug, is_slug, slugs_match, to_slug};
