use std::collections::HashMap;
use std::fmt::{Debug, Formatter};

use crate::error::{CallbackError, CallbackResult};
use crate::token::StartElement;

/// Tag name of the synthetic root. It is never matched against input.
pub const ROOT_TAG: &str = "";

/// Separator between tag names in [TagTree::path].
pub const PATH_SEPARATOR: &str = "/";

pub type TagName = String;

pub type EnterFn = Box<dyn FnMut(&StartElement<'_>) -> CallbackResult>;
pub type DataFn = Box<dyn FnMut(&str) -> CallbackResult>;
pub type ExitFn = Box<dyn FnMut() -> CallbackResult>;

/// Handle of an element inside the [TagTree] that created it.
///
/// Ids are plain arena indices: [TagTree] methods panic when given an id issued by a
/// different tree that is out of range for this one.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct ElementId(usize);

struct Element {
    parent: Option<ElementId>,
    tag_name: TagName,
    enter: Option<EnterFn>,
    data: Option<DataFn>,
    exit: Option<ExitFn>,
    structure: HashMap<TagName, ElementId>,
}

impl Element {
    fn new(parent: Option<ElementId>, tag_name: &str) -> Self {
        Element {
            parent,
            tag_name: tag_name.to_string(),
            enter: None,
            data: None,
            exit: None,
            structure: HashMap::new(),
        }
    }
}

impl Debug for Element {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        f.debug_struct("Element")
            .field("parent", &self.parent)
            .field("tag_name", &self.tag_name)
            .field("enter", &self.enter.is_some())
            .field("data", &self.data.is_some())
            .field("exit", &self.exit.is_some())
            .field("structure", &self.structure)
            .finish()
    }
}

/// Trie of expected tag names, each element optionally carrying enter, data and exit callbacks.
///
/// Elements live in an arena owned by the tree; children are keyed by tag name and point back
/// to their parent by [ElementId]. Elements are never removed.
#[derive(Debug)]
pub struct TagTree {
    elements: Vec<Element>,
}

impl Default for TagTree {
    fn default() -> Self {
        TagTree::new()
    }
}

impl TagTree {
    pub fn new() -> Self {
        TagTree { elements: vec![Element::new(None, ROOT_TAG)] }
    }

    pub fn root(&self) -> ElementId {
        ElementId(0)
    }

    /// Number of declared elements, not counting the root.
    pub fn len(&self) -> usize {
        self.elements.len() - 1
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Get the element at `names` below the root, creating every missing element on the way.
    /// Declaring the same path again returns the same element.
    pub fn tag<N: AsRef<str>>(&mut self, names: &[N]) -> ElementId {
        self.tag_from(self.root(), names)
    }

    /// Like [tag](TagTree::tag) but relative to `from`. An empty path returns `from`.
    pub fn tag_from<N: AsRef<str>>(&mut self, from: ElementId, names: &[N]) -> ElementId {
        let mut current = from;
        for name in names {
            let name = name.as_ref();
            current = match self.child(current, name) {
                Some(existing) => existing,
                None => self.insert_child(current, name),
            };
        }
        current
    }

    fn insert_child(&mut self, parent: ElementId, name: &str) -> ElementId {
        let id = ElementId(self.elements.len());
        self.elements.push(Element::new(Some(parent), name));
        self.elements[parent.0].structure.insert(name.to_string(), id);
        id
    }

    /// Declare a path written the way [path](TagTree::path) prints it, e.g. `catalog/book`.
    /// Empty segments are skipped.
    pub fn declare_path(&mut self, path: &str) -> ElementId {
        let names: Vec<&str> = path.split(PATH_SEPARATOR).filter(|name| !name.is_empty()).collect();
        self.tag(names.as_slice())
    }

    /// Look up a path below the root without creating anything.
    pub fn find<N: AsRef<str>>(&self, names: &[N]) -> Option<ElementId> {
        names
            .iter()
            .try_fold(self.root(), |current, name| self.child(current, name.as_ref()))
    }

    pub fn child(&self, id: ElementId, name: &str) -> Option<ElementId> {
        self.elements[id.0].structure.get(name).copied()
    }

    pub fn has_child(&self, id: ElementId, name: &str) -> bool {
        self.elements[id.0].structure.contains_key(name)
    }

    pub fn parent(&self, id: ElementId) -> Option<ElementId> {
        self.elements[id.0].parent
    }

    pub fn tag_name(&self, id: ElementId) -> &str {
        &self.elements[id.0].tag_name
    }

    /// Walk parent links up to the root.
    pub fn root_of(&self, id: ElementId) -> ElementId {
        let mut current = id;
        while let Some(parent) = self.parent(current) {
            current = parent;
        }
        current
    }

    /// Tag names from the root down to `id`, joined by [PATH_SEPARATOR]. The root's path is empty.
    pub fn path(&self, id: ElementId) -> String {
        let mut names = vec![];
        let mut current = id;
        while let Some(parent) = self.parent(current) {
            names.push(self.tag_name(current));
            current = parent;
        }
        names.reverse();
        names.join(PATH_SEPARATOR)
    }

    /// Paths of all declared elements, depth first with siblings in name order.
    pub fn paths(&self) -> Vec<String> {
        let mut paths = Vec::with_capacity(self.len());
        let mut stack = vec![self.root()];
        while let Some(id) = stack.pop() {
            if id != self.root() {
                paths.push(self.path(id));
            }
            let mut children: Vec<(&TagName, &ElementId)> = self.elements[id.0].structure.iter().collect();
            children.sort_by(|a, b| b.0.cmp(a.0));
            stack.extend(children.into_iter().map(|(_, child)| *child));
        }
        paths
    }

    /// Set the function called when the element is entered. Replaces any previous one.
    pub fn on_enter<F>(&mut self, id: ElementId, fun: F)
    where
        F: FnMut(&StartElement<'_>) -> CallbackResult + 'static,
    {
        self.elements[id.0].enter = Some(Box::new(fun));
    }

    /// Set the function called for each piece of character data inside the element.
    pub fn on_data<F>(&mut self, id: ElementId, fun: F)
    where
        F: FnMut(&str) -> CallbackResult + 'static,
    {
        self.elements[id.0].data = Some(Box::new(fun));
    }

    /// Set the function called when the element is closed.
    pub fn on_exit<F>(&mut self, id: ElementId, fun: F)
    where
        F: FnMut() -> CallbackResult + 'static,
    {
        self.elements[id.0].exit = Some(Box::new(fun));
    }

    /// Declare child `tag` of `parent` and set all three of its callbacks.
    pub fn parse<E, D, X>(&mut self, parent: ElementId, tag: &str, enter: E, data: D, exit: X) -> ElementId
    where
        E: FnMut(&StartElement<'_>) -> CallbackResult + 'static,
        D: FnMut(&str) -> CallbackResult + 'static,
        X: FnMut() -> CallbackResult + 'static,
    {
        let child = self.tag_from(parent, &[tag]);
        self.on_data(child, data);
        self.on_enter(child, enter);
        self.on_exit(child, exit);
        child
    }

    pub(crate) fn call_enter(&mut self, id: ElementId, element: &StartElement<'_>) -> Result<(), CallbackError> {
        match self.elements[id.0].enter.as_mut() {
            Some(enter) => enter(element),
            None => Ok(()),
        }
    }

    pub(crate) fn call_data(&mut self, id: ElementId, data: &str) -> Result<(), CallbackError> {
        match self.elements[id.0].data.as_mut() {
            Some(fun) => fun(data),
            None => Ok(()),
        }
    }

    pub(crate) fn call_exit(&mut self, id: ElementId) -> Result<(), CallbackError> {
        match self.elements[id.0].exit.as_mut() {
            Some(exit) => exit(),
            None => Ok(()),
        }
    }
}
