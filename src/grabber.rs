use std::borrow::Cow;
use std::io::Read;
use std::marker::PhantomData;
use std::path::Path;

use roxmltree::{Document, Node};

use crate::error::{CallbackError, CallbackResult, XmlError};
use crate::reader::{guarded, read_file};
use crate::token::{StartElement, XmlToken};
use crate::tokenstream::TokenStream;

/// Element name to capture. Without a namespace only the local name is compared.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QName {
    pub namespace: Option<String>,
    pub local: String,
}

impl QName {
    pub fn new(local: &str) -> Self {
        QName { namespace: None, local: local.to_string() }
    }

    pub fn with_namespace(namespace: &str, local: &str) -> Self {
        QName { namespace: Some(namespace.to_string()), local: local.to_string() }
    }
}

/// A value that can be filled from a captured element.
pub trait XmlDecode {
    fn decode(&mut self, node: Node<'_, '_>) -> Result<(), CallbackError>;
}

/// Concatenated text content of the element and its descendants.
impl XmlDecode for String {
    fn decode(&mut self, node: Node<'_, '_>) -> Result<(), CallbackError> {
        for text in node.descendants().filter(|n| n.is_text()).filter_map(|n| n.text()) {
            self.push_str(text);
        }
        Ok(())
    }
}

pub trait InstanceGrabber {
    type Instance: XmlDecode;

    fn name(&self) -> &QName;

    fn make_instance(&mut self) -> Self::Instance;

    fn process_instance(&mut self, instance: Self::Instance) -> CallbackResult;
}

/// Captures every element called `name`, decodes it into a value built by `make` and hands
/// the value to `process`.
pub struct XmlGrabber<T, M, P> {
    name: QName,
    make: M,
    process: P,
    instance: PhantomData<fn() -> T>,
}

impl<T, M, P> XmlGrabber<T, M, P>
where
    T: XmlDecode,
    M: FnMut() -> T,
    P: FnMut(T) -> CallbackResult,
{
    pub fn new(name: QName, make: M, process: P) -> Self {
        XmlGrabber { name, make, process, instance: PhantomData }
    }

    pub fn set_name(&mut self, name: QName) {
        self.name = name;
    }
}

impl<T, P> XmlGrabber<T, fn() -> T, P>
where
    T: XmlDecode + Default,
    P: FnMut(T) -> CallbackResult,
{
    /// Grabber that starts every capture from `T::default()`.
    pub fn for_default(name: QName, process: P) -> Self {
        XmlGrabber::new(name, T::default as fn() -> T, process)
    }
}

impl<T, M, P> InstanceGrabber for XmlGrabber<T, M, P>
where
    T: XmlDecode,
    M: FnMut() -> T,
    P: FnMut(T) -> CallbackResult,
{
    type Instance = T;

    fn name(&self) -> &QName {
        &self.name
    }

    fn make_instance(&mut self) -> T {
        (self.make)()
    }

    fn process_instance(&mut self, instance: T) -> CallbackResult {
        (self.process)(instance)
    }
}

/// Capture every matching element of `xml`, in document order. Matches nested inside a
/// captured element belong to that capture and are not reported on their own.
///
/// Namespaces are resolved against the declarations in scope at the element, and those
/// declarations are carried into the captured subtree before it is decoded.
pub fn grab_str<G: InstanceGrabber + ?Sized>(xml: &str, grabber: &mut G) -> Result<(), XmlError> {
    let mut stream = TokenStream::from(xml);
    let mut scope = NamespaceScope::default();
    while let Some(token) = stream.next_token()? {
        let start = match token {
            XmlToken::StartElement(start) => start,
            XmlToken::EndElement(_) => {
                scope.pop();
                continue;
            }
            _ => continue,
        };

        scope.push(&start);
        if start.name.local != grabber.name().local {
            continue;
        }
        if let Some(namespace) = &grabber.name().namespace {
            if scope.resolve(start.name.prefix) != Some(namespace.as_str()) {
                continue;
            }
        }
        scope.pop();

        let inherited = scope.declarations();
        let end = skip_subtree(&mut stream, start.name.local)?;
        let fragment = with_declarations(&xml[start.span.start..end], &start, &inherited);
        let document = Document::parse(&fragment)?;
        log::debug!("captured {} at {}", start.name, start.span.start);
        let mut instance = grabber.make_instance();
        instance.decode(document.root_element()).map_err(XmlError::Callback)?;
        grabber.process_instance(instance).map_err(XmlError::Callback)?;
    }
    Ok(())
}

pub fn grab_reader<R: Read, G: InstanceGrabber + ?Sized>(mut reader: R, grabber: &mut G) -> Result<(), XmlError> {
    let mut xml = String::new();
    reader.read_to_string(&mut xml)?;
    grab_str(&xml, grabber)
}

pub fn grab_file<P: AsRef<Path>, G: InstanceGrabber + ?Sized>(path: P, grabber: &mut G) -> Result<(), XmlError> {
    let path = path.as_ref();
    let xml = read_file(path)?;
    guarded(path, || grab_str(&xml, grabber))
}

/// Consume tokens up to the end tag closing an already opened element; returns the byte
/// offset just past it.
fn skip_subtree(stream: &mut TokenStream<'_>, tag: &str) -> Result<usize, XmlError> {
    let mut depth = 1usize;
    while let Some(token) = stream.next_token()? {
        match token {
            XmlToken::StartElement(_) => depth += 1,
            XmlToken::EndElement(end) => {
                depth -= 1;
                if depth == 0 {
                    return Ok(end.span.end);
                }
            }
            _ => {}
        }
    }
    Err(XmlError::UnexpectedEndOfFile { tag: tag.to_string() })
}

/// Namespace declarations of the open elements, innermost last.
#[derive(Default)]
struct NamespaceScope<'a> {
    frames: Vec<Vec<(&'a str, Cow<'a, str>)>>,
}

impl<'a> NamespaceScope<'a> {
    fn push(&mut self, element: &StartElement<'a>) {
        let frame = element
            .attributes
            .iter()
            .filter_map(|attr| match (attr.name.prefix, attr.name.local) {
                ("", "xmlns") => Some(("", attr.value.clone())),
                ("xmlns", prefix) => Some((prefix, attr.value.clone())),
                _ => None,
            })
            .collect();
        self.frames.push(frame);
    }

    fn pop(&mut self) {
        self.frames.pop();
    }

    /// Namespace bound to `prefix`; an empty prefix names the default namespace.
    fn resolve(&self, prefix: &str) -> Option<&str> {
        self.frames
            .iter()
            .rev()
            .flat_map(|frame| frame.iter())
            .find(|(declared, _)| *declared == prefix)
            .map(|(_, uri)| uri.as_ref())
            .filter(|uri| !uri.is_empty())
    }

    /// Every binding visible here, inner declarations shadowing outer ones.
    fn declarations(&self) -> Vec<(&'a str, Cow<'a, str>)> {
        let mut visible: Vec<(&'a str, Cow<'a, str>)> = vec![];
        for (prefix, uri) in self.frames.iter().rev().flat_map(|frame| frame.iter()) {
            if !visible.iter().any(|(seen, _)| seen == prefix) {
                visible.push((*prefix, uri.clone()));
            }
        }
        visible
    }
}

/// Add the inherited bindings the captured element does not redeclare to its start tag.
fn with_declarations<'x>(
    fragment: &'x str,
    element: &StartElement<'_>,
    inherited: &[(&str, Cow<'_, str>)],
) -> Cow<'x, str> {
    let own: Vec<&str> = element
        .attributes
        .iter()
        .filter_map(|attr| match (attr.name.prefix, attr.name.local) {
            ("", "xmlns") => Some(""),
            ("xmlns", prefix) => Some(prefix),
            _ => None,
        })
        .collect();
    let mut declarations = String::new();
    for (prefix, uri) in inherited {
        if own.contains(prefix) || (prefix.is_empty() && uri.is_empty()) {
            continue;
        }
        if prefix.is_empty() {
            declarations.push_str(" xmlns=\"");
        } else {
            declarations.push_str(" xmlns:");
            declarations.push_str(prefix);
            declarations.push_str("=\"");
        }
        escape_into(&mut declarations, uri);
        declarations.push('"');
    }
    if declarations.is_empty() {
        return Cow::Borrowed(fragment);
    }
    // '<' followed by the qualified name
    let name_end = 1 + element.name.to_string().len();
    Cow::Owned(format!("{}{}{}", &fragment[..name_end], declarations, &fragment[name_end..]))
}

fn escape_into(out: &mut String, value: &str) {
    for c in value.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '"' => out.push_str("&quot;"),
            _ => out.push(c),
        }
    }
}
