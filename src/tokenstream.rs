use std::borrow::Cow;
use std::collections::VecDeque;

use xmlparser::{ElementEnd, Token, Tokenizer};

use crate::error::XmlError;
use crate::token::{Attribute, EndElement, Name, StartElement, XmlToken};
use crate::unescape::unescape;
use crate::xmlchar::XmlChar;

/// Pull-based sequence of [XmlToken]s over an in-memory document.
///
/// Start tags are reported once all of their attributes are known, an empty element tag is
/// reported as a start element directly followed by its end element, and a DOCTYPE with an
/// internal subset is reported as a single directive.
///
/// Once the first top level element closes, the rest of the text is read as element content,
/// so a sequence of top level elements is accepted.
pub struct TokenStream<'a> {
    text: &'a str,
    tokenizer: Tokenizer<'a>,
    pending: VecDeque<XmlToken<'a>>,
    dtd_start: Option<usize>,
    depth: usize,
    fragment: bool,
}

impl<'a> From<&'a str> for TokenStream<'a> {
    fn from(text: &'a str) -> Self {
        TokenStream {
            text,
            tokenizer: Tokenizer::from(text),
            pending: VecDeque::new(),
            dtd_start: None,
            depth: 0,
            fragment: false,
        }
    }
}

impl<'a> TokenStream<'a> {
    /// The document text this stream reads from.
    pub fn source(&self) -> &'a str {
        self.text
    }

    /// Get the next token, or `None` once the document is exhausted.
    pub fn next_token(&mut self) -> Result<Option<XmlToken<'a>>, XmlError> {
        let token = match self.pending.pop_front() {
            Some(token) => Some(token),
            None => self.read_token()?,
        };
        match &token {
            Some(XmlToken::StartElement(_)) => self.depth += 1,
            Some(XmlToken::EndElement(end)) => {
                self.depth = self.depth.saturating_sub(1);
                if self.depth == 0 && !self.fragment && self.pending.is_empty() {
                    // the tokenizer rejects anything but misc after the document element
                    self.tokenizer = Tokenizer::from_fragment(self.text, end.span.end..self.text.len());
                    self.fragment = true;
                }
            }
            _ => {}
        }
        Ok(token)
    }

    fn read_token(&mut self) -> Result<Option<XmlToken<'a>>, XmlError> {
        let mut open: Option<StartElement<'a>> = None;
        while let Some(token) = self.tokenizer.next() {
            match token? {
                Token::ElementStart { prefix, local, span } => {
                    open = Some(StartElement {
                        name: Name::new(prefix.as_str(), local.as_str()),
                        attributes: vec![],
                        span: span.start()..span.end(),
                    });
                }
                Token::Attribute { prefix, local, value, .. } => {
                    if let Some(start) = open.as_mut() {
                        start.attributes.push(Attribute {
                            name: Name::new(prefix.as_str(), local.as_str()),
                            value: unescape(value.as_str())?,
                        });
                    }
                }
                Token::ElementEnd { end, span } => match end {
                    ElementEnd::Open => {
                        if let Some(mut start) = open.take() {
                            start.span.end = span.end();
                            return Ok(Some(XmlToken::StartElement(start)));
                        }
                    }
                    ElementEnd::Empty => {
                        if let Some(mut start) = open.take() {
                            start.span.end = span.end();
                            self.pending.push_back(XmlToken::EndElement(EndElement {
                                name: start.name,
                                span: span.start()..span.end(),
                            }));
                            return Ok(Some(XmlToken::StartElement(start)));
                        }
                    }
                    ElementEnd::Close(prefix, local) => {
                        return Ok(Some(XmlToken::EndElement(EndElement {
                            name: Name::new(prefix.as_str(), local.as_str()),
                            span: span.start()..span.end(),
                        })));
                    }
                },
                Token::Text { text } => {
                    return Ok(Some(XmlToken::CharData(unescape(text.as_str())?)));
                }
                Token::Cdata { text, .. } => {
                    return Ok(Some(XmlToken::CharData(Cow::Borrowed(text.as_str()))));
                }
                Token::Comment { text, .. } => {
                    return Ok(Some(XmlToken::Comment(text.as_str())));
                }
                Token::ProcessingInstruction { target, content, .. } => {
                    return Ok(Some(XmlToken::ProcInst {
                        target: target.as_str(),
                        content: content.map(|content| content.as_str()),
                    }));
                }
                Token::Declaration { span, .. } => {
                    return Ok(Some(XmlToken::ProcInst {
                        target: "xml",
                        content: declaration_content(span.as_str()),
                    }));
                }
                Token::EmptyDtd { span, .. } => {
                    return Ok(Some(XmlToken::Directive(directive_text(span.as_str()))));
                }
                Token::DtdStart { span, .. } => {
                    self.dtd_start = Some(span.start());
                }
                Token::EntityDeclaration { .. } => {}
                Token::DtdEnd { span } => {
                    if let Some(start) = self.dtd_start.take() {
                        return Ok(Some(XmlToken::Directive(directive_text(&self.text[start..span.end()]))));
                    }
                }
            }
        }
        Ok(None)
    }
}

impl<'a> Iterator for TokenStream<'a> {
    type Item = Result<XmlToken<'a>, XmlError>;

    fn next(&mut self) -> Option<Self::Item> {
        self.next_token().transpose()
    }
}

/// `<?xml version="1.0"?>` -> `version="1.0"`
fn declaration_content(declaration: &str) -> Option<&str> {
    let content = declaration
        .strip_prefix("<?xml")
        .and_then(|rest| rest.strip_suffix("?>"))
        .unwrap_or(declaration)
        .trim_matches(|c: char| c.is_xml_whitespace());
    if content.is_empty() { None } else { Some(content) }
}

/// `<!DOCTYPE root>` -> `DOCTYPE root`
fn directive_text(directive: &str) -> &str {
    directive
        .strip_prefix("<!")
        .and_then(|rest| rest.strip_suffix('>'))
        .unwrap_or(directive)
}
