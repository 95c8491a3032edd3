use ego_tree::NodeRef;
use scraper::Node;
use unicode_normalization::UnicodeNormalization;

/// Normalize extracted cell text: NFC form, whitespace runs collapsed to a
/// single space, trimmed.
///
/// fbref mixes non-breaking spaces and decomposed accents into player names,
/// so "Ødegaard" must compare equal across pages.
pub fn normalize_text(input: &str) -> String {
    let nfc: String = input.nfc().collect();
    nfc.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Collect all text under a node, recursively. `<br>` counts as whitespace.
pub fn collect_text(node: NodeRef<'_, Node>) -> String {
    let mut text = String::new();
    push_text(node, &mut text);
    text
}

fn push_text(node: NodeRef<'_, Node>, out: &mut String) {
    for child in node.children() {
        match child.value() {
            Node::Text(t) => out.push_str(t),
            Node::Element(elem) => match elem.name() {
                "br" => out.push(' '),
                "script" | "style" => {}
                _ => push_text(child, out),
            },
            _ => {}
        }
    }
}

/// First `max_chars` characters of `html`, for diagnostics.
pub fn snippet(html: &str, max_chars: usize) -> &str {
    match html.char_indices().nth(max_chars) {
        Some((idx, _)) => &html[..idx],
        None => html,
    }
}
