//! Slug generation for subject, subtopic and worksheet labels.

/// Convert a display label into its canonical URL slug.
///
/// The label is trimmed and lowercased, every run of whitespace becomes a
/// single hyphen, and anything outside `[a-z0-9-]` is dropped. Empty input
/// produces an empty slug.
pub fn to_slug(label: &str) -> String {
    let mut slug = String::with_capacity(label.len());
    let mut in_whitespace = false;

    for ch in label.trim().chars().flat_map(char::to_lowercase) {
        if ch.is_whitespace() {
            if !in_whitespace {
                slug.push('-');
                in_whitespace = true;
            }
            continue;
        }

        in_whitespace = false;
        if ch.is_ascii_lowercase() || ch.is_ascii_digit() || ch == '-' {
            slug.push(ch);
        }
    }

    slug
}

/// Guess a display title from a slug.
///
/// Hyphens become spaces and the first letter of each word is uppercased.
/// This is best-effort: punctuation and original casing are gone, so the
/// authoritative title always comes from the matched record.
pub fn from_slug(slug: &str) -> String {
    let mut title = String::with_capacity(slug.len());
    let mut word_start = true;

    for ch in slug.chars() {
        let ch = if ch == '-' { ' ' } else { ch };
        if word_start && ch.is_alphanumeric() {
            title.extend(ch.to_uppercase());
        } else {
            title.push(ch);
        }
        word_start = !ch.is_alphanumeric();
    }

    title
}

/// Returns true when `candidate` is already in canonical slug form.
pub fn is_slug(candidate: &str) -> bool {
    candidate
        .chars()
        .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-')
}

/// Compare a stored label against a requested slug.
pub fn slugs_match(label: &str, slug: &str) -> bool {
    to_slug(label) == slug
}
