//! Deterministic payload assembly.
//!
//! eBay's schema validation cares about element order, so payloads are
//! written field by field instead of through a serializer. Elements are
//! separated by inline indentation only; no newlines are emitted.

use std::borrow::Cow;

/// Escapes the five XML special characters in element text.
pub(crate) fn escape(text: &str) -> Cow<'_, str> {
    if !text.contains(['&', '<', '>', '"', '\'']) {
        return Cow::Borrowed(text);
    }

    let mut escaped = String::with_capacity(text.len() + 8);
    for ch in text.chars() {
        match ch {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&apos;"),
            _ => escaped.push(ch),
        }
    }
    Cow::Owned(escaped)
}

/// Payload under construction.
#[derive(Debug)]
pub(crate) struct Payload {
    root: &'static str,
    buf: String,
}

impl Payload {
    /// Opens `<root xmlns="namespace">`.
    pub(crate) fn new(root: &'static str, namespace: &str) -> Self {
        let mut buf = String::with_capacity(512);
        buf.push('<');
        buf.push_str(root);
        buf.push_str(" xmlns=\"");
        buf.push_str(namespace);
        buf.push_str("\">");
        Self { root, buf }
    }

    /// Writes `<tag>text</tag>` after `indent` spaces.
    pub(crate) fn element(&mut self, indent: usize, tag: &str, text: &str) -> &mut Self {
        self.pad(indent);
        self.buf.push('<');
        self.buf.push_str(tag);
        self.buf.push('>');
        self.buf.push_str(&escape(text));
        self.buf.push_str("</");
        self.buf.push_str(tag);
        self.buf.push('>');
        self
    }

    /// Writes `<tag>` after `indent` spaces.
    pub(crate) fn open(&mut self, indent: usize, tag: &str) -> &mut Self {
        self.pad(indent);
        self.buf.push('<');
        self.buf.push_str(tag);
        self.buf.push('>');
        self
    }

    /// Writes `</tag>` after `indent` spaces.
    pub(crate) fn close(&mut self, indent: usize, tag: &str) -> &mut Self {
        self.pad(indent);
        self.buf.push_str("</");
        self.buf.push_str(tag);
        self.buf.push('>');
        self
    }

    /// Closes the root element and returns the payload.
    pub(crate) fn finish(mut self) -> String {
        let root = self.root;
        self.close(0, root);
        self.buf
    }

    fn pad(&mut self, indent: usize) {
        self.buf.extend(std::iter::repeat_n(' ', indent));
    }
}
