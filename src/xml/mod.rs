//! XML parsing for SES Query API responses.
//!
//! Responses are not mapped onto per-action structs. Instead the whole
//! document is walked into a [`ParsedResponse`], a nested map keyed by local
//! element names, and callers pick out what they need.
//!
//! Rules:
//! - The root element's own name is dropped; the result holds its children.
//! - An element with at least one child element becomes a nested map; any
//!   text mixed in between its children is discarded.
//! - Any other element becomes its text content, with entities unescaped,
//!   CDATA sections included and whitespace preserved. Self-closing
//!   elements become the empty string.
//! - Namespace prefixes and `xmlns` declarations are ignored.
//! - Repeated sibling names overwrite each other; the last one wins. Lists
//!   such as `VerifiedEmailAddresses/member` therefore only keep their final
//!   entry.

use std::collections::btree_map;
use std::collections::BTreeMap;

use quick_xml::events::Event;
use quick_xml::Reader;
use serde::Serialize;

use crate::error::SesError;

/// A value in a parsed response: either leaf text or a nested map.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum XmlValue {
    /// Text content of an element without child elements.
    Text(String),
    /// Children of an element that has child elements.
    Node(ParsedResponse),
}

impl XmlValue {
    /// The text content, if this is a leaf.
    pub fn as_text(&self) -> Option<&str> {
        match self {
            XmlValue::Text(text) => Some(text),
            XmlValue::Node(_) => None,
        }
    }

    /// The nested map, if this element had children.
    pub fn as_node(&self) -> Option<&ParsedResponse> {
        match self {
            XmlValue::Node(node) => Some(node),
            XmlValue::Text(_) => None,
        }
    }

    /// Whether this is a leaf.
    pub fn is_text(&self) -> bool {
        matches!(self, XmlValue::Text(_))
    }
}

/// A parsed response document, keyed by local element name.
///
/// Serializes as a plain JSON-style object, so `<R><A><B>v</B></A></R>`
/// serializes to `{"A":{"B":"v"}}`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct ParsedResponse {
    entries: BTreeMap<String, XmlValue>,
}

impl ParsedResponse {
    /// Create an empty response map.
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a value, replacing any previous value with the same name.
    pub fn insert(&mut self, name: impl Into<String>, value: XmlValue) -> Option<XmlValue> {
        self.entries.insert(name.into(), value)
    }

    /// Look up a direct child.
    pub fn get(&self, name: &str) -> Option<&XmlValue> {
        self.entries.get(name)
    }

    /// Look up the text of a direct child.
    pub fn get_text(&self, name: &str) -> Option<&str> {
        self.get(name).and_then(XmlValue::as_text)
    }

    /// Look up a direct child that has children of its own.
    pub fn get_node(&self, name: &str) -> Option<&ParsedResponse> {
        self.get(name).and_then(XmlValue::as_node)
    }

    /// Look up a value by dot-separated path.
    ///
    /// # Examples
    ///
    /// ```
    /// use integrations_aws_ses_simple::xml::parse_response;
    ///
    /// let parsed = parse_response(
    ///     "<GetSendQuotaResponse><GetSendQuotaResult><MaxSendRate>14.0</MaxSendRate>\
    ///      </GetSendQuotaResult></GetSendQuotaResponse>"
    /// ).unwrap();
    ///
    /// assert_eq!(parsed.lookup_text("GetSendQuotaResult.MaxSendRate"), Some("14.0"));
    /// assert!(parsed.lookup("GetSendQuotaResult.Missing").is_none());
    /// ```
    pub fn lookup(&self, path: &str) -> Option<&XmlValue> {
        let mut segments = path.split('.');
        let mut value = self.get(segments.next()?)?;
        for segment in segments {
            value = value.as_node()?.get(segment)?;
        }
        Some(value)
    }

    /// Look up leaf text by dot-separated path.
    pub fn lookup_text(&self, path: &str) -> Option<&str> {
        self.lookup(path).and_then(XmlValue::as_text)
    }

    /// Whether a direct child with this name exists.
    pub fn contains_key(&self, name: &str) -> bool {
        self.entries.contains_key(name)
    }

    /// Number of direct children.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether there are no children.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterate over direct children in name order.
    pub fn iter(&self) -> btree_map::Iter<'_, String, XmlValue> {
        self.entries.iter()
    }

    /// Consume into the underlying map.
    pub fn into_map(self) -> BTreeMap<String, XmlValue> {
        self.entries
    }
}

/// An element that has been opened but not yet closed.
struct Frame {
    name: String,
    children: ParsedResponse,
    has_children: bool,
    text: String,
}

impl Frame {
    fn new(name: String) -> Self {
        Self {
            name,
            children: ParsedResponse::new(),
            has_children: false,
            text: String::new(),
        }
    }

    fn add_child(&mut self, name: String, value: XmlValue) {
        self.has_children = true;
        self.children.insert(name, value);
    }

    fn finish(self) -> (String, XmlValue) {
        let value = if self.has_children {
            XmlValue::Node(self.children)
        } else {
            XmlValue::Text(self.text)
        };
        (self.name, value)
    }
}

/// Parse a response body that has not been decoded yet.
///
/// # Errors
///
/// Returns `SesError::Parse` if the body is not UTF-8 or not well-formed.
pub fn parse_response_bytes(body: &[u8]) -> Result<ParsedResponse, SesError> {
    let xml = std::str::from_utf8(body)
        .map_err(|e| SesError::parse(format!("response body is not valid UTF-8: {}", e)))?;
    parse_response(xml)
}

/// Parse a response document into a [`ParsedResponse`].
///
/// # Errors
///
/// Returns `SesError::Parse` if the document has no root element, more than
/// one root element, mismatched or unclosed tags, non-whitespace text
/// outside the root, or an invalid entity reference.
///
/// # Examples
///
/// ```
/// use integrations_aws_ses_simple::xml::parse_response;
///
/// let parsed = parse_response("<Root><A><B>val</B></A></Root>").unwrap();
/// assert_eq!(parsed.lookup_text("A.B"), Some("val"));
/// ```
pub fn parse_response(xml: &str) -> Result<ParsedResponse, SesError> {
    let mut reader = Reader::from_str(xml);

    let mut stack: Vec<Frame> = Vec::new();
    let mut root: Option<ParsedResponse> = None;

    loop {
        let event = reader.read_event().map_err(|e| {
            SesError::parse(format!(
                "malformed XML at byte {}: {}",
                reader.buffer_position(),
                e
            ))
        })?;

        match event {
            Event::Start(e) => {
                if stack.is_empty() && root.is_some() {
                    return Err(SesError::parse("document has more than one root element"));
                }
                let name = String::from_utf8_lossy(e.local_name().as_ref()).into_owned();
                stack.push(Frame::new(name));
            }
            Event::Empty(e) => {
                let name = String::from_utf8_lossy(e.local_name().as_ref()).into_owned();
                match stack.last_mut() {
                    Some(parent) => parent.add_child(name, XmlValue::Text(String::new())),
                    None if root.is_some() => {
                        return Err(SesError::parse("document has more than one root element"));
                    }
                    None => root = Some(ParsedResponse::new()),
                }
            }
            Event::Text(e) => {
                let text = e
                    .unescape()
                    .map_err(|e| SesError::parse(format!("invalid text content: {}", e)))?;
                append_text(stack.last_mut(), &text)?;
            }
            Event::CData(e) => {
                let bytes = e.into_inner();
                let text = std::str::from_utf8(&bytes)
                    .map_err(|e| SesError::parse(format!("CDATA is not valid UTF-8: {}", e)))?;
                append_text(stack.last_mut(), text)?;
            }
            Event::End(_) => {
                let frame = stack
                    .pop()
                    .ok_or_else(|| SesError::parse("closing tag without matching opening tag"))?;
                let (name, value) = frame.finish();
                match stack.last_mut() {
                    Some(parent) => parent.add_child(name, value),
                    None => {
                        root = Some(match value {
                            XmlValue::Node(children) => children,
                            XmlValue::Text(_) => ParsedResponse::new(),
                        })
                    }
                }
            }
            Event::Eof => break,
            // Declarations, comments, processing instructions and doctypes
            // carry no response data.
            _ => {}
        }
    }

    if let Some(open) = stack.last() {
        return Err(SesError::parse(format!(
            "unexpected end of document inside <{}>",
            open.name
        )));
    }

    root.ok_or_else(|| SesError::parse("document has no root element"))
}

fn append_text(frame: Option<&mut Frame>, text: &str) -> Result<(), SesError> {
    match frame {
        Some(frame) => {
            frame.text.push_str(text);
            Ok(())
        }
        None if text.trim().is_empty() => Ok(()),
        None => Err(SesError::parse("text content outside the root element")),
    }
}
