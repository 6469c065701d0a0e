use crate::{Error, Result};
use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;

/// How deeply elements may nest before we give up on a document.
const MAX_DEPTH: usize = 128;

/// A single element within an XML response.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct XmlElement {
    pub name: String,
    /// Text directly within this element, excluding children.
    pub own_text: String,
    pub children: Vec<XmlElement>,
}

impl XmlElement {
    fn from_start(start: &BytesStart<'_>) -> Self {
        Self {
            name: String::from_utf8_lossy(start.local_name().as_ref()).into_owned(),
            ..Default::default()
        }
    }

    /// All text within this element and its descendants, in document order.
    pub fn text(&self) -> String {
        let mut text = self.own_text.clone();
        for child in &self.children {
            text.push_str(&child.text());
        }
        text
    }

    /// The first descendant (depth-first) with the given name.
    pub fn find(&self, name: &str) -> Option<&XmlElement> {
        self.children.iter().find_map(|child| {
            if child.name == name {
                Some(child)
            } else {
                child.find(name)
            }
        })
    }
}

/// A parsed XML response body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct XmlDocument {
    root: XmlElement,
}

impl XmlDocument {
    /// Parses a complete document, rejecting unbalanced or overly deep nesting.
    pub fn parse(body: &str) -> Result<Self> {
        let mut reader = Reader::from_str(body);
        reader.config_mut().trim_text(true);

        // The bottom of our stack is a nameless document node.
        let mut stack = vec![XmlElement::default()];
        loop {
            let event = reader
                .read_event()
                .map_err(|e| Error::MalformedResponse(e.to_string()))?;
            match event {
                Event::Start(start) => {
                    // The document node sits at the bottom of the stack.
                    if stack.len() > MAX_DEPTH {
                        return Err(Error::MalformedResponse(format!(
                            "elements nested deeper than {MAX_DEPTH}"
                        )));
                    }
                    stack.push(XmlElement::from_start(&start));
                }
                Event::Empty(start) => {
                    let element = XmlElement::from_start(&start);
                    if let Some(parent) = stack.last_mut() {
                        parent.children.push(element);
                    }
                }
                Event::End(_) => {
                    if stack.len() < 2 {
                        return Err(Error::MalformedResponse(
                            "unexpected closing tag".to_string(),
                        ));
                    }
                    if let Some(element) = stack.pop() {
                        if let Some(parent) = stack.last_mut() {
                            parent.children.push(element);
                        }
                    }
                }
                Event::Text(text) => {
                    let text = text
                        .unescape()
                        .map_err(|e| Error::MalformedResponse(e.to_string()))?;
                    if let Some(current) = stack.last_mut() {
                        current.own_text.push_str(&text);
                    }
                }
                Event::CData(data) => {
                    if let Some(current) = stack.last_mut() {
                        current
                            .own_text
                            .push_str(&String::from_utf8_lossy(&data.into_inner()));
                    }
                }
                Event::Eof => break,
                _ => {}
            }
        }

        if stack.len() != 1 {
            return Err(Error::MalformedResponse("unclosed element".to_string()));
        }
        let root = stack.pop().unwrap_or_default();
        if root.children.is_empty() {
            return Err(Error::MalformedResponse("empty document".to_string()));
        }
        Ok(Self { root })
    }

    /// The first element anywhere in the document with the given name.
    pub fn find(&self, name: &str) -> Option<&XmlElement> {
        self.root.find(name)
    }

    /// Text of the first element with the given name.
    pub fn find_text(&self, name: &str) -> Option<String> {
        self.find(name).map(XmlElement::text)
    }

    /// Top-level elements of the document.
    pub fn elements(&self) -> &[XmlElement] {
        &self.root.children
    }
}
