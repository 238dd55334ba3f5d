use crate::element::{ElementId, TagTree};
use crate::error::{CallbackResult, XmlError};
use crate::handler::XmlStreamHandler;
use crate::token::{EndElement, StartElement};

/// How a [StreamParser] treats a start tag its tree does not declare at the current position.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    /// Fail with [XmlError::UnexpectedTransition].
    Strict,
    /// Declare the missing element and continue.
    Lenient,
}

/// Declarative stream parser: walks a [TagTree] as elements open and close and calls the
/// callbacks attached to the elements it passes.
///
/// The cursor starts at the tree root and points at the element of the innermost open tag.
/// Tags are matched by local name.
#[derive(Debug)]
pub struct StreamParser {
    mode: Mode,
    tree: TagTree,
    current: ElementId,
}

impl StreamParser {
    pub fn new(mode: Mode) -> Self {
        StreamParser::with_tree(TagTree::new(), mode)
    }

    pub fn strict() -> Self {
        StreamParser::new(Mode::Strict)
    }

    pub fn lenient() -> Self {
        StreamParser::new(Mode::Lenient)
    }

    /// Parser over a tree declared up front.
    pub fn with_tree(tree: TagTree, mode: Mode) -> Self {
        let current = tree.root();
        StreamParser { mode, tree, current }
    }

    pub fn mode(&self) -> Mode {
        self.mode
    }

    /// Declare a path of tag names below the root, see [TagTree::tag].
    pub fn tag<N: AsRef<str>>(&mut self, names: &[N]) -> ElementId {
        self.tree.tag(names)
    }

    /// Declare a top level tag and set all of its callbacks, see [TagTree::parse].
    pub fn parse<E, D, X>(&mut self, tag: &str, enter: E, data: D, exit: X) -> ElementId
    where
        E: FnMut(&StartElement<'_>) -> CallbackResult + 'static,
        D: FnMut(&str) -> CallbackResult + 'static,
        X: FnMut() -> CallbackResult + 'static,
    {
        let root = self.tree.root();
        self.tree.parse(root, tag, enter, data, exit)
    }

    pub fn on_enter<F>(&mut self, id: ElementId, fun: F) -> &mut Self
    where
        F: FnMut(&StartElement<'_>) -> CallbackResult + 'static,
    {
        self.tree.on_enter(id, fun);
        self
    }

    pub fn on_data<F>(&mut self, id: ElementId, fun: F) -> &mut Self
    where
        F: FnMut(&str) -> CallbackResult + 'static,
    {
        self.tree.on_data(id, fun);
        self
    }

    pub fn on_exit<F>(&mut self, id: ElementId, fun: F) -> &mut Self
    where
        F: FnMut() -> CallbackResult + 'static,
    {
        self.tree.on_exit(id, fun);
        self
    }

    pub fn root(&self) -> ElementId {
        self.tree.root()
    }

    /// Element of the innermost open tag, or the root outside of the document element.
    pub fn current(&self) -> ElementId {
        self.current
    }

    pub fn tree(&self) -> &TagTree {
        &self.tree
    }

    pub fn tree_mut(&mut self) -> &mut TagTree {
        &mut self.tree
    }

    pub fn into_tree(self) -> TagTree {
        self.tree
    }
}

impl XmlStreamHandler for StreamParser {
    /// Move to the child named by `element` and call its enter function.
    /// On a callback error the cursor stays on the entered child.
    fn process_start_element(&mut self, element: &StartElement<'_>) -> Result<(), XmlError> {
        let tag_name = element.name.local;
        let next = match self.tree.child(self.current, tag_name) {
            Some(next) => next,
            None if self.mode == Mode::Strict => {
                let parent = self.tree.tag_name(self.current).to_string();
                log::warn!("unexpected transition from {:?} to {:?}", parent, tag_name);
                return Err(XmlError::UnexpectedTransition { parent, child: tag_name.to_string() });
            }
            None => {
                let next = self.tree.tag_from(self.current, &[tag_name]);
                log::debug!("declared {} while parsing", self.tree.path(next));
                next
            }
        };
        self.current = next;
        self.tree.call_enter(next, element).map_err(XmlError::Callback)
    }

    fn process_end_element(&mut self, element: &EndElement<'_>) -> Result<(), XmlError> {
        let tag_name = element.name.local;
        if self.tree.tag_name(self.current) != tag_name {
            let current = self.tree.tag_name(self.current).to_string();
            log::warn!("closing {:?} while {:?} is open", tag_name, current);
            return Err(XmlError::UnexpectedTag { closing: tag_name.to_string(), current });
        }

        // the cursor moves out even if the exit function fails
        let exited = self.tree.call_exit(self.current);
        if let Some(parent) = self.tree.parent(self.current) {
            self.current = parent;
        }
        exited.map_err(XmlError::Callback)
    }

    fn process_char_data(&mut self, data: &str) -> Result<(), XmlError> {
        self.tree.call_data(self.current, data).map_err(XmlError::Callback)
    }
}
