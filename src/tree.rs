use quick_xml::Reader;
use quick_xml::errors::IllFormedError;
use quick_xml::escape::resolve_predefined_entity;
use quick_xml::events::Event;

use crate::errors::{ConvertError, ConvertResult};

/// One element of the parsed statement: a tag, optional text content and
/// the children in document order. Text is only meaningful on leaves.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Node {
    pub tag: String,
    pub text: Option<String>,
    pub children: Vec<Node>,
}

impl Node {
    pub fn new(tag: impl Into<String>) -> Self {
        Node {
            tag: tag.into(),
            text: None,
            children: Vec::new(),
        }
    }

    /// First direct child named `tag`, scanning children in document order.
    ///
    /// Callers walking the fixed OFX path rely on the error carrying both
    /// the parent tag and the sought tag, so a broken statement reports
    /// exactly which link was missing.
    pub fn child(&self, tag: &str) -> ConvertResult<&Node> {
        self.children
            .iter()
            .find(|c| c.tag == tag)
            .ok_or_else(|| ConvertError::child_not_found(&self.tag, tag))
    }
}

/// Returns the suffix starting at the first `<`.
///
/// QFX exports commonly prepend a plain-text OFX header block before the
/// markup payload; everything up to the first angle bracket is dropped.
pub fn extract_xml(raw: &str) -> &str {
    match raw.find('<') {
        Some(index) if index > 0 => &raw[index..],
        _ => raw,
    }
}

/// Parses raw file content into an element tree.
///
/// The leading non-markup header, XML declarations, comments and anything
/// after the root element are ignored. Malformed markup (mismatched or
/// unclosed tags) surfaces as [`ConvertError::Markup`].
pub fn parse_document(raw: &str) -> ConvertResult<Node> {
    // check_end_names stays at its default (on); mismatched tags become
    // quick-xml IllFormed errors
    let mut reader = Reader::from_str(extract_xml(raw));

    let mut stack: Vec<Node> = Vec::new();

    loop {
        match reader.read_event()? {
            Event::Start(start) => {
                let tag = String::from_utf8_lossy(start.name().as_ref()).into_owned();
                stack.push(Node::new(tag));
            }
            Event::Empty(empty) => {
                let tag = String::from_utf8_lossy(empty.name().as_ref()).into_owned();
                match stack.last_mut() {
                    Some(parent) => parent.children.push(Node::new(tag)),
                    None => return Ok(Node::new(tag)),
                }
            }
            Event::Text(text) => {
                if let Some(node) = stack.last_mut() {
                    append_text(node, &text.decode().map_err(quick_xml::Error::from)?);
                }
            }
            Event::CData(cdata) => {
                if let Some(node) = stack.last_mut() {
                    append_text(node, &String::from_utf8_lossy(&cdata));
                }
            }
            // `&amp;` and friends arrive as separate reference events
            Event::GeneralRef(gref) => {
                if let Some(node) = stack.last_mut() {
                    match gref.resolve_char_ref()? {
                        Some(ch) => append_text(node, &ch.to_string()),
                        None => {
                            let name = String::from_utf8_lossy(&gref).into_owned();
                            match resolve_predefined_entity(&name) {
                                Some(resolved) => append_text(node, resolved),
                                None => append_text(node, &format!("&{name};")),
                            }
                        }
                    }
                }
            }
            // matches the top of the stack, or read_event errored already
            Event::End(_) => {
                if let Some(node) = stack.pop() {
                    let node = finish(node);
                    match stack.last_mut() {
                        Some(parent) => parent.children.push(node),
                        None => return Ok(node),
                    }
                }
            }
            Event::Eof => {
                return match stack.pop() {
                    Some(open) => Err(quick_xml::Error::IllFormed(
                        IllFormedError::MissingEndTag(open.tag),
                    )
                    .into()),
                    None => Err(ConvertError::EmptyDocument),
                };
            }
            _ => {}
        }
    }
}

fn append_text(node: &mut Node, value: &str) {
    match &mut node.text {
        Some(text) => text.push_str(value),
        None => node.text = Some(value.to_string()),
    }
}

/// Trims the accumulated text once the element closes. The indentation
/// whitespace sitting between child elements collapses to no text at all,
/// while interior spacing of real values is kept.
fn finish(mut node: Node) -> Node {
    node.text = node.text.take().and_then(|text| {
        let trimmed = text.trim();
        (!trimmed.is_empty()).then(|| trimmed.to_string())
    });
    node
}
