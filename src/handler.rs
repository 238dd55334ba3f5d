use crate::error::XmlError;
use crate::token::{EndElement, StartElement, XmlToken};

/// Receives the events of a document in order. Every method returns an error to stop
/// processing; the error is handed to the caller of the driving function unchanged.
///
/// Comments, processing instructions and directives are ignored unless overridden.
pub trait XmlStreamHandler {
    fn process_start_element(&mut self, element: &StartElement<'_>) -> Result<(), XmlError>;

    fn process_end_element(&mut self, element: &EndElement<'_>) -> Result<(), XmlError>;

    fn process_char_data(&mut self, data: &str) -> Result<(), XmlError>;

    /// Comment text without the `<!--` and `-->` markers.
    fn process_comment(&mut self, _comment: &str) -> Result<(), XmlError> {
        Ok(())
    }

    /// `<?target content?>`
    fn process_proc_inst(&mut self, _target: &str, _content: Option<&str>) -> Result<(), XmlError> {
        Ok(())
    }

    /// Directive text between `<!` and `>`.
    fn process_directive(&mut self, _directive: &str) -> Result<(), XmlError> {
        Ok(())
    }

    fn process_token(&mut self, token: &XmlToken<'_>) -> Result<(), XmlError> {
        match token {
            XmlToken::StartElement(element) => self.process_start_element(element),
            XmlToken::EndElement(element) => self.process_end_element(element),
            XmlToken::CharData(data) => self.process_char_data(data),
            XmlToken::Comment(comment) => self.process_comment(comment),
            XmlToken::ProcInst { target, content } => self.process_proc_inst(target, *content),
            XmlToken::Directive(directive) => self.process_directive(directive),
        }
    }
}
