use scraper::{ElementRef, Html, Node, Selector};
use std::sync::LazyLock;

static BODY_SELECTOR: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("body").expect("static selector"));

/// Elements whose text is never part of the readable content.
const SKIPPED_ELEMENTS: &[&str] = &["script", "style"];

pub fn find_body(document: &Html) -> Option<ElementRef<'_>> {
    document.select(&BODY_SELECTOR).next()
}

/// Append every text node under `element` to `out`, in document order,
/// skipping script and style subtrees entirely.
pub fn collect_text(element: ElementRef<'_>, out: &mut String) {
    for child in element.children() {
        match child.value() {
            Node::Text(text) => out.push_str(text),
            Node::Element(el) if SKIPPED_ELEMENTS.contains(&el.name()) => {}
            Node::Element(_) => {
                if let Some(child_el) = ElementRef::wrap(child) {
                    collect_text(child_el, out);
                }
            }
            _ => {}
        }
    }
}
