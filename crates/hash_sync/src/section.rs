//! Stable section identifiers.

use std::collections::HashSet;
use viewport::TargetId;

/// A page section as the UI layer describes it.
#[derive(Clone, Debug)]
pub struct SectionSource {
    pub target: TargetId,
    /// Identifier already present on the element, kept verbatim.
    pub explicit_id: Option<String>,
    /// Heading text to derive a slug from when no explicit id exists.
    pub heading: Option<String>,
}

/// A section with its assigned identifier. Assignment happens once, before
/// any fragment lookup, and never changes for the element's lifetime.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SectionRecord {
    pub target: TargetId,
    pub id: String,
}

/// Assign identifiers in document order: explicit id, else heading slug,
/// else positional `section-{n}`. Collisions get a numeric suffix so every
/// identifier stays unique.
pub fn assign_identifiers(sources: &[SectionSource]) -> Vec<SectionRecord> {
    let mut used: HashSet<String> = HashSet::new();
    sources
        .iter()
        .enumerate()
        .map(|(index, source)| {
            let base = source
                .explicit_id
                .clone()
                .filter(|id| !id.is_empty())
                .or_else(|| source.heading.as_deref().map(slugify).filter(|s| !s.is_empty()))
                .unwrap_or_else(|| format!("section-{index}"));

            let mut id = base.clone();
            let mut suffix = 2;
            while !used.insert(id.clone()) {
                id = format!("{base}-{suffix}");
                suffix += 1;
            }

            SectionRecord {
                target: source.target,
                id,
            }
        })
        .collect()
}

/// Lowercase alphanumeric runs joined by hyphens.
fn slugify(text: &str) -> String {
    let mut slug = String::with_capacity(text.len());
    let mut pending_separator = false;
    for ch in text.chars() {
        if ch.is_alphanumeric() {
            if pending_separator && !slug.is_empty() {
                slug.push('-');
            }
            pending_separator = false;
            for lower in ch.to_lowercase() {
                slug.push(lower);
            }
        } else {
            pending_separator = true;
        }
    }
    slug
}
