use std::borrow::Cow;
use std::fmt::{Display, Formatter};
use std::ops::Range;

/// Element or attribute name exactly as written: prefix and local part, never resolved.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Name<'a> {
    pub prefix: &'a str,
    pub local: &'a str,
}

impl<'a> Name<'a> {
    pub fn new(prefix: &'a str, local: &'a str) -> Self {
        Name { prefix, local }
    }

    pub fn local(local: &'a str) -> Self {
        Name { prefix: "", local }
    }
}

impl Display for Name<'_> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        if self.prefix.is_empty() {
            write!(f, "{}", self.local)
        } else {
            write!(f, "{}:{}", self.prefix, self.local)
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Attribute<'a> {
    pub name: Name<'a>,
    /// Value with references already decoded.
    pub value: Cow<'a, str>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct StartElement<'a> {
    pub name: Name<'a>,
    /// Attributes in document order.
    pub attributes: Vec<Attribute<'a>>,
    /// Byte range of the whole start tag in the source text.
    pub span: Range<usize>,
}

impl<'a> StartElement<'a> {
    /// Value of the first attribute with the given local name.
    pub fn attribute(&self, local: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|attr| attr.name.local == local)
            .map(|attr| attr.value.as_ref())
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct EndElement<'a> {
    pub name: Name<'a>,
    /// Byte range of the end tag, or of the `/>` of an empty element tag.
    pub span: Range<usize>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum XmlToken<'a> {
    StartElement(StartElement<'a>),
    EndElement(EndElement<'a>),
    CharData(Cow<'a, str>),
    Comment(&'a str),
    ProcInst { target: &'a str, content: Option<&'a str> },
    Directive(&'a str),
}
