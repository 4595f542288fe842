use layerfix_core_common::{FieldNotFound, LayerDescription};

/// An owned XML element: name, attributes in document order, text and children.
///
/// Text interleaved between child elements is concatenated into `text`; project
/// files do not use mixed content.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Element {
    /// Tag name
    pub name: String,
    /// Attributes in document order
    pub attributes: Vec<(String, String)>,
    /// Unescaped text content
    pub text: String,
    /// Child elements in document order
    pub children: Vec<Element>,
}

impl Element {
    /// Creates an empty element.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    /// Adds an attribute.
    #[must_use]
    pub fn with_attribute(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.set_attribute(name, value);
        self
    }

    /// Sets the text content.
    #[must_use]
    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.text = text.into();
        self
    }

    /// Appends a child element.
    #[must_use]
    pub fn with_child(mut self, child: Element) -> Self {
        self.children.push(child);
        self
    }

    /// Returns the value of an attribute.
    #[must_use]
    pub fn attribute(&self, name: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value.as_str())
    }

    /// Sets an attribute, keeping its position if it already exists.
    pub fn set_attribute(&mut self, name: impl Into<String>, value: impl Into<String>) {
        let name = name.into();
        let value = value.into();
        match self.attributes.iter_mut().find(|(key, _)| *key == name) {
            Some((_, existing)) => *existing = value,
            None => self.attributes.push((name, value)),
        }
    }

    /// Returns the first child with the given name.
    #[must_use]
    pub fn child(&self, name: &str) -> Option<&Element> {
        self.children.iter().find(|child| child.name == name)
    }

    /// Returns the first child with the given name, mutably.
    pub fn child_mut(&mut self, name: &str) -> Option<&mut Element> {
        self.children.iter_mut().find(|child| child.name == name)
    }

    /// Collects every element named `name` in document order.
    ///
    /// The search does not descend into a matching element.
    pub fn collect_named<'a>(&'a self, name: &str, out: &mut Vec<&'a Element>) {
        if self.name == name {
            out.push(self);
            return;
        }
        for child in &self.children {
            child.collect_named(name, out);
        }
    }

    /// Mutable counterpart of [`Element::collect_named`].
    ///
    /// Matches never nest, so the returned borrows are disjoint.
    pub fn collect_named_mut<'a>(&'a mut self, name: &str, out: &mut Vec<&'a mut Element>) {
        if self.name == name {
            out.push(self);
            return;
        }
        for child in &mut self.children {
            child.collect_named_mut(name, out);
        }
    }
}

impl LayerDescription for Element {
    fn attribute(&self, name: &str) -> Option<&str> {
        Element::attribute(self, name)
    }

    fn child_text(&self, field: &str) -> Option<&str> {
        self.child(field).map(|child| child.text.as_str())
    }

    fn set_child_text(&mut self, field: &str, value: &str) -> Result<(), FieldNotFound> {
        let child = self.child_mut(field).ok_or_else(|| FieldNotFound {
            field: field.to_string(),
        })?;
        value.clone_into(&mut child.text);
        Ok(())
    }
}
