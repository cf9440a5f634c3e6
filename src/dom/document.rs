use std::fmt::Write as _;

/// Handle to an element stored in a [`Document`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ElementId(usize);

#[derive(Debug, Clone)]
struct Element {
    tag: String,
    attributes: Vec<(String, String)>,
    text: Option<String>,
    children: Vec<ElementId>,
    parent: Option<ElementId>,
}

impl Element {
    fn new(tag: &str) -> Self {
        Self {
            tag: tag.to_ascii_lowercase(),
            attributes: Vec::new(),
            text: None,
            children: Vec::new(),
            parent: None,
        }
    }
}

const VOID_ELEMENTS: &[&str] = &["area", "br", "hr", "img", "input", "link", "meta", "source"];

/// Headless HTML document.
///
/// Elements live in an arena and are addressed by [`ElementId`]. Detached
/// elements stay in the arena but are invisible to every query, which walk
/// the tree from the `<html>` root.
#[derive(Debug, Clone)]
pub struct Document {
    elements: Vec<Element>,
    html: ElementId,
    head: ElementId,
    body: ElementId,
}

impl Document {
    /// Creates an empty `<html><head></head><body></body></html>` document.
    pub fn new() -> Self {
        let mut doc = Self {
            elements: vec![Element::new("html")],
            html: ElementId(0),
            head: ElementId(0),
            body: ElementId(0),
        };
        doc.head = doc.append_element(doc.html, "head", &[]);
        doc.body = doc.append_element(doc.html, "body", &[]);
        doc
    }

    pub fn html(&self) -> ElementId {
        self.html
    }

    pub fn head(&self) -> ElementId {
        self.head
    }

    pub fn body(&self) -> ElementId {
        self.body
    }

    pub fn create_element(&mut self, tag: &str) -> ElementId {
        self.elements.push(Element::new(tag));
        ElementId(self.elements.len() - 1)
    }

    /// Appends `child` as the last child of `parent`, detaching it first if needed.
    pub fn append_child(&mut self, parent: ElementId, child: ElementId) {
        self.detach(child);
        self.elements[parent.0].children.push(child);
        self.elements[child.0].parent = Some(parent);
    }

    /// Inserts `child` at `index` among `parent`'s children (clamped to the end).
    pub fn insert_child(&mut self, parent: ElementId, index: usize, child: ElementId) {
        self.detach(child);
        let children = &mut self.elements[parent.0].children;
        let index = index.min(children.len());
        children.insert(index, child);
        self.elements[child.0].parent = Some(parent);
    }

    /// Creates an element with the given attributes and appends it to `parent`.
    pub fn append_element(
        &mut self,
        parent: ElementId,
        tag: &str,
        attributes: &[(&str, &str)],
    ) -> ElementId {
        let id = self.create_element(tag);
        for (name, value) in attributes {
            self.set_attr(id, name, value);
        }
        self.append_child(parent, id);
        id
    }

    pub fn detach(&mut self, id: ElementId) {
        if let Some(parent) = self.elements[id.0].parent.take() {
            self.elements[parent.0].children.retain(|child| *child != id);
        }
    }

    pub fn clear_children(&mut self, id: ElementId) {
        let children = std::mem::take(&mut self.elements[id.0].children);
        for child in children {
            self.elements[child.0].parent = None;
        }
    }

    pub fn tag(&self, id: ElementId) -> &str {
        &self.elements[id.0].tag
    }

    pub fn parent(&self, id: ElementId) -> Option<ElementId> {
        self.elements[id.0].parent
    }

    pub fn children(&self, id: ElementId) -> &[ElementId] {
        &self.elements[id.0].children
    }

    pub fn attr(&self, id: ElementId, name: &str) -> Option<&str> {
        self.elements[id.0]
            .attributes
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value.as_str())
    }

    pub fn has_attr(&self, id: ElementId, name: &str) -> bool {
        self.attr(id, name).is_some()
    }

    pub fn set_attr(&mut self, id: ElementId, name: &str, value: &str) {
        let attributes = &mut self.elements[id.0].attributes;
        match attributes.iter_mut().find(|(key, _)| key == name) {
            Some((_, existing)) => *existing = value.to_string(),
            None => attributes.push((name.to_string(), value.to_string())),
        }
    }

    pub fn remove_attr(&mut self, id: ElementId, name: &str) {
        self.elements[id.0].attributes.retain(|(key, _)| key != name);
    }

    pub fn has_class(&self, id: ElementId, class: &str) -> bool {
        self.attr(id, "class")
            .map(|classes| classes.split_whitespace().any(|c| c == class))
            .unwrap_or(false)
    }

    pub fn add_class(&mut self, id: ElementId, class: &str) {
        if self.has_class(id, class) {
            return;
        }
        let classes = match self.attr(id, "class") {
            Some(existing) if !existing.trim().is_empty() => format!("{} {}", existing.trim(), class),
            _ => class.to_string(),
        };
        self.set_attr(id, "class", &classes);
    }

    pub fn remove_class(&mut self, id: ElementId, class: &str) {
        let Some(existing) = self.attr(id, "class") else {
            return;
        };
        let remaining: Vec<&str> = existing.split_whitespace().filter(|c| *c != class).collect();
        if remaining.is_empty() {
            self.remove_attr(id, "class");
        } else {
            let joined = remaining.join(" ");
            self.set_attr(id, "class", &joined);
        }
    }

    pub fn toggle_class(&mut self, id: ElementId, class: &str, on: bool) {
        if on {
            self.add_class(id, class);
        } else {
            self.remove_class(id, class);
        }
    }

    /// Own text of the element (not including descendants).
    pub fn text(&self, id: ElementId) -> Option<&str> {
        self.elements[id.0].text.as_deref()
    }

    pub fn set_text(&mut self, id: ElementId, text: &str) {
        self.elements[id.0].text = Some(text.to_string());
    }

    /// Concatenated text of the element and all attached descendants.
    pub fn text_content(&self, id: ElementId) -> String {
        let mut out = String::new();
        self.collect_text(id, &mut out);
        out
    }

    fn collect_text(&self, id: ElementId, out: &mut String) {
        if let Some(text) = &self.elements[id.0].text {
            out.push_str(text);
        }
        for child in &self.elements[id.0].children {
            self.collect_text(*child, out);
        }
    }

    /// Descendants of `id` in document order, excluding `id` itself.
    pub fn descendants(&self, id: ElementId) -> Vec<ElementId> {
        let mut out = Vec::new();
        let mut stack: Vec<ElementId> = self.elements[id.0].children.iter().rev().copied().collect();
        while let Some(next) = stack.pop() {
            out.push(next);
            stack.extend(self.elements[next.0].children.iter().rev().copied());
        }
        out
    }

    /// Every attached element in document order, starting with `<html>`.
    pub fn all(&self) -> Vec<ElementId> {
        let mut out = vec![self.html];
        out.extend(self.descendants(self.html));
        out
    }

    pub fn is_attached(&self, id: ElementId) -> bool {
        let mut current = id;
        loop {
            if current == self.html {
                return true;
            }
            match self.elements[current.0].parent {
                Some(parent) => current = parent,
                None => return false,
            }
        }
    }

    pub fn find_all_by_attr(&self, name: &str) -> Vec<ElementId> {
        self.all()
            .into_iter()
            .filter(|id| self.has_attr(*id, name))
            .collect()
    }

    pub fn find_first_by_attr(&self, name: &str, value: &str) -> Option<ElementId> {
        self.all()
            .into_iter()
            .find(|id| self.attr(*id, name) == Some(value))
    }

    pub fn find_by_id(&self, id_value: &str) -> Option<ElementId> {
        self.find_first_by_attr("id", id_value)
    }

    pub fn find_by_tag(&self, tag: &str) -> Vec<ElementId> {
        self.all()
            .into_iter()
            .filter(|id| self.tag(*id) == tag)
            .collect()
    }

    pub fn find_by_class(&self, class: &str) -> Vec<ElementId> {
        self.all()
            .into_iter()
            .filter(|id| self.has_class(*id, class))
            .collect()
    }

    /// Serialised markup of the element's own text and children.
    pub fn inner_html(&self, id: ElementId) -> String {
        let mut out = String::new();
        if let Some(text) = &self.elements[id.0].text {
            out.push_str(&escape_text(text));
        }
        for child in &self.elements[id.0].children {
            self.write_element(*child, &mut out);
        }
        out
    }

    pub fn outer_html(&self, id: ElementId) -> String {
        let mut out = String::new();
        self.write_element(id, &mut out);
        out
    }

    pub fn to_html(&self) -> String {
        format!("<!DOCTYPE html>\n{}", self.outer_html(self.html))
    }

    fn write_element(&self, id: ElementId, out: &mut String) {
        let element = &self.elements[id.0];
        out.push('<');
        out.push_str(&element.tag);
        for (name, value) in &element.attributes {
            // `write!` into a String cannot fail.
            let _ = write!(out, " {}=\"{}\"", name, escape_attr(value));
        }
        out.push('>');
        if VOID_ELEMENTS.contains(&element.tag.as_str()) {
            return;
        }
        if let Some(text) = &element.text {
            out.push_str(&escape_text(text));
        }
        for child in &element.children {
            self.write_element(*child, out);
        }
        let _ = write!(out, "</{}>", element.tag);
    }
}

impl Default for Document {
    fn default() -> Self {
        Self::new()
    }
}

fn escape_text(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    for c in value.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            _ => out.push(c),
        }
    }
    out
}

fn escape_attr(value: &str) -> String {
    escape_text(value).replace('"', "&quot;")
}
