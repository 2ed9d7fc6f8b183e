//! Slug-based lookup over a flat list of worksheet records.
//!
//! Records are matched by comparing the slug of their stored labels against
//! already-slugified request segments. Every filter is stable: matches come
//! back in input order, and no match is an empty result rather than an error.

use std::collections::HashSet;

use crate::record::WorksheetRecord;
use crate::slug::slugs_match;

/// Records whose subject slug equals `subject_slug`.
pub fn filter_by_subject<'a>(
    records: &'a [WorksheetRecord],
    subject_slug: &str,
) -> Vec<&'a WorksheetRecord> {
    records
        .iter()
        .filter(|record| slugs_match(&record.subject, subject_slug))
        .collect()
}

/// Records whose subject and subtopic slugs both match.
pub fn filter_by_subject_and_subtopic<'a>(
    records: &'a [WorksheetRecord],
    subject_slug: &str,
    subtopic_slug: &str,
) -> Vec<&'a WorksheetRecord> {
    records
        .iter()
        .filter(|record| {
            slugs_match(&record.subject, subject_slug)
                && slugs_match(&record.subtopic, subtopic_slug)
        })
        .collect()
}

/// First record under `subject_slug`/`subtopic_slug` whose title slug matches.
///
/// When several titles collapse to the same slug (e.g. "Basic Addition" and
/// "basic addition") the earliest record in input order wins. Callers that
/// need uniqueness should look records up by identifier instead.
pub fn find_worksheet<'a>(
    records: &'a [WorksheetRecord],
    subject_slug: &str,
    subtopic_slug: &str,
    worksheet_slug: &str,
) -> Option<&'a WorksheetRecord> {
    records.iter().find(|record| {
        slugs_match(&record.subject, subject_slug)
            && slugs_match(&record.subtopic, subtopic_slug)
            && slugs_match(&record.title, worksheet_slug)
    })
}

/// Distinct subtopic labels in first-occurrence order.
pub fn distinct_subtopics<'a, I>(records: I) -> Vec<String>
where
    I: IntoIterator<Item = &'a WorksheetRecord>,
{
    distinct_labels(records.into_iter().map(|record| record.subtopic.as_str()))
}

/// Distinct subject labels in first-occurrence order.
pub fn distinct_subjects<'a, I>(records: I) -> Vec<String>
where
    I: IntoIterator<Item = &'a WorksheetRecord>,
{
    distinct_labels(records.into_iter().map(|record| record.subject.as_str()))
}

fn distinct_labels<'a>(labels: impl Iterator<Item = &'a str>) -> Vec<String> {
    let mut seen = HashSet::new();
    labels
        .filter(|label| seen.insert(*label))
        .map(str::to_string)
        .collect()
}
