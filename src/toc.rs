//! Heading anchors and table-of-contents links.

/// Anchor slug for a heading: lower-cased, with every char outside
/// `[a-z0-9_]` replaced by `-`. Runs of dashes are not collapsed.
pub fn header_to_anchor(name: &str) -> String {
    name.to_lowercase()
        .chars()
        .map(|c| {
            if c.is_ascii_lowercase() || c.is_ascii_digit() || c == '_' {
                c
            } else {
                '-'
            }
        })
        .collect()
}

/// `[name](#anchor)` for a TOC entry.
pub fn render_toc_link(name: &str) -> String {
    format!("[{}](#{})", name, header_to_anchor(name))
}
