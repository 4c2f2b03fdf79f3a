//! Anchor extraction from raw markup.
//!
//! Markup is parsed once with `scraper` (html5ever underneath, so malformed
//! input never fails) and flattened into a document-order stream of
//! [`ParseEvent`]s. [`Anchors`] folds that stream through a two-state machine
//! into [`AnchorRecord`]s:
//!
//! - `OutsideAnchor`: text is ignored; an `a` start tag opens a record.
//! - `InsideAnchor`: text accumulates; an `a` end tag (or a new `a` start, or
//!   the end of the stream) completes the record.
//!
//! ```
//! use cronbox_recipes::extract::extract_anchors;
//!
//! let anchors = extract_anchors(r#"<p><a href="/vegan-chili/" title="Chili">Vegan <b>Chili</b></a></p>"#);
//! assert_eq!(anchors.len(), 1);
//! assert_eq!(anchors[0].href.as_deref(), Some("/vegan-chili/"));
//! assert_eq!(anchors[0].text, "Vegan Chili");
//! assert_eq!(anchors[0].title_attr.as_deref(), Some("Chili"));
//! ```

use crate::types::AnchorRecord;
use scraper::node::Node;
use scraper::{ElementRef, Html};

/// Elements whose text never counts as visible.
const OPAQUE_ELEMENTS: &[&str] = &["script", "style", "noscript", "template"];

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParseEvent<'a> {
    Start {
        tag: &'a str,
        attrs: Vec<(&'a str, &'a str)>,
    },
    Text(&'a str),
    End {
        tag: &'a str,
    },
}

/// A parsed page that can be walked for anchors any number of times.
pub struct LinkExtractor {
    document: Html,
}

impl LinkExtractor {
    pub fn parse(markup: &str) -> Self {
        Self {
            document: Html::parse_document(markup),
        }
    }

    /// Document-order parse events for the whole page.
    pub fn events(&self) -> Vec<ParseEvent<'_>> {
        flatten(self.document.root_element())
    }

    /// Lazily yield one record per anchor, in document order.
    pub fn anchors(&self) -> Anchors<std::vec::IntoIter<ParseEvent<'_>>> {
        Anchors::new(self.events().into_iter())
    }
}

/// Convenience wrapper: parse and collect every anchor.
pub fn extract_anchors(markup: &str) -> Vec<AnchorRecord> {
    LinkExtractor::parse(markup).anchors().collect()
}

enum Frame<'a> {
    Enter(ElementRef<'a>),
    Leave(&'a str),
    Text(&'a str),
}

/// Pre-order walk using an explicit stack.
fn flatten(root: ElementRef<'_>) -> Vec<ParseEvent<'_>> {
    let mut events = Vec::new();
    let mut stack = vec![Frame::Enter(root)];

    while let Some(frame) = stack.pop() {
        match frame {
            Frame::Enter(element) => {
                let value = element.value();
                let tag = value.name();
                events.push(ParseEvent::Start {
                    tag,
                    attrs: value.attrs().collect(),
                });
                stack.push(Frame::Leave(tag));

                if OPAQUE_ELEMENTS.contains(&tag) {
                    continue;
                }
                for child in element.children().rev() {
                    match child.value() {
                        Node::Text(text) => stack.push(Frame::Text(&**text)),
                        Node::Element(_) => {
                            if let Some(child) = ElementRef::wrap(child) {
                                stack.push(Frame::Enter(child));
                            }
                        }
                        _ => {}
                    }
                }
            }
            Frame::Leave(tag) => events.push(ParseEvent::End { tag }),
            Frame::Text(text) => events.push(ParseEvent::Text(text)),
        }
    }

    events
}

#[derive(Debug, Default)]
struct OpenAnchor {
    href: Option<String>,
    title_attr: Option<String>,
    aria_label: Option<String>,
    text: String,
}

impl OpenAnchor {
    fn from_attrs(attrs: &[(&str, &str)]) -> Self {
        let lookup = |name: &str| {
            attrs
                .iter()
                .find(|(key, _)| key.eq_ignore_ascii_case(name))
                .map(|(_, value)| (*value).to_string())
        };
        Self {
            href: lookup("href"),
            title_attr: lookup("title"),
            aria_label: lookup("aria-label"),
            text: String::new(),
        }
    }

    fn finish(self) -> AnchorRecord {
        AnchorRecord {
            href: self.href,
            text: collapse_whitespace(&self.text),
            title_attr: self.title_attr,
            aria_label: self.aria_label,
        }
    }
}

enum State {
    OutsideAnchor,
    InsideAnchor(OpenAnchor),
}

/// Iterator adapter folding [`ParseEvent`]s into [`AnchorRecord`]s.
pub struct Anchors<I> {
    events: I,
    state: State,
}

impl<'a, I> Anchors<I>
where
    I: Iterator<Item = ParseEvent<'a>>,
{
    pub fn new(events: I) -> Self {
        Self {
            events,
            state: State::OutsideAnchor,
        }
    }

    fn take_open(&mut self) -> Option<AnchorRecord> {
        match std::mem::replace(&mut self.state, State::OutsideAnchor) {
            State::InsideAnchor(open) => Some(open.finish()),
            State::OutsideAnchor => None,
        }
    }
}

impl<'a, I> Iterator for Anchors<I>
where
    I: Iterator<Item = ParseEvent<'a>>,
{
    type Item = AnchorRecord;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            let Some(event) = self.events.next() else {
                // Unclosed anchor at end of document.
                return self.take_open();
            };

            match event {
                ParseEvent::Start { tag, attrs } if is_anchor(tag) => {
                    let opened = State::InsideAnchor(OpenAnchor::from_attrs(&attrs));
                    if let State::InsideAnchor(previous) =
                        std::mem::replace(&mut self.state, opened)
                    {
                        return Some(previous.finish());
                    }
                }
                ParseEvent::Text(text) => {
                    if let State::InsideAnchor(open) = &mut self.state {
                        open.text.push(' ');
                        open.text.push_str(text);
                    }
                }
                ParseEvent::End { tag } if is_anchor(tag) => {
                    if let Some(record) = self.take_open() {
                        return Some(record);
                    }
                }
                _ => {}
            }
        }
    }
}

fn is_anchor(tag: &str) -> bool {
    tag.eq_ignore_ascii_case("a")
}

/// Collapse every whitespace run (including newlines) to one space and trim.
pub fn collapse_whitespace(raw: &str) -> String {
    raw.split_whitespace().collect::<Vec<_>>().join(" ")
}
