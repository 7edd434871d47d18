//! Host-independent schema declaration.
//!
//! Providers and data sources declare their input and output surfaces as a
//! tree of named, typed attributes. The declaration is purely descriptive;
//! hosts are expected to walk it when wiring the provider into their own
//! type system.

use std::collections::BTreeMap;

/// Type of a declared attribute.
#[derive(Debug, Clone, PartialEq)]
pub enum AttributeType {
    /// UTF-8 string.
    String,
    /// Boolean.
    Bool,
    /// 32-bit signed integer.
    Int32,
    /// Ordered list of elements of one type.
    List(Box<AttributeType>),
    /// Nested object with its own named attributes.
    Object(BTreeMap<String, Attribute>),
}

/// A single declared attribute.
#[derive(Debug, Clone, PartialEq)]
pub struct Attribute {
    /// The attribute's type.
    pub attr_type: AttributeType,
    /// Human-readable description.
    pub description: Option<String>,
    /// The caller must supply a value.
    pub required: bool,
    /// The caller may supply a value.
    pub optional: bool,
    /// The value is produced by the provider.
    pub computed: bool,
    /// The value must not be echoed into logs or plans.
    pub sensitive: bool,
}

impl Attribute {
    fn new(attr_type: AttributeType) -> Self {
        Self {
            attr_type,
            description: None,
            required: false,
            optional: false,
            computed: false,
            sensitive: false,
        }
    }

    /// Declare a string attribute.
    #[must_use]
    pub fn string() -> Self {
        Self::new(AttributeType::String)
    }

    /// Declare a boolean attribute.
    #[must_use]
    pub fn boolean() -> Self {
        Self::new(AttributeType::Bool)
    }

    /// Declare a 32-bit integer attribute.
    #[must_use]
    pub fn int32() -> Self {
        Self::new(AttributeType::Int32)
    }

    /// Declare a list attribute with the given element type.
    #[must_use]
    pub fn list(element: AttributeType) -> Self {
        Self::new(AttributeType::List(Box::new(element)))
    }

    /// Declare a nested object attribute.
    #[must_use]
    pub fn object(attributes: BTreeMap<String, Attribute>) -> Self {
        Self::new(AttributeType::Object(attributes))
    }

    /// Mark the attribute as required.
    #[must_use]
    pub fn required(mut self) -> Self {
        self.required = true;
        self
    }

    /// Mark the attribute as optional.
    #[must_use]
    pub fn optional(mut self) -> Self {
        self.optional = true;
        self
    }

    /// Mark the attribute as computed.
    #[must_use]
    pub fn computed(mut self) -> Self {
        self.computed = true;
        self
    }

    /// Mark the attribute as sensitive.
    #[must_use]
    pub fn sensitive(mut self) -> Self {
        self.sensitive = true;
        self
    }

    /// Attach a description.
    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }
}

/// A named collection of attribute declarations.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Schema {
    attributes: BTreeMap<String, Attribute>,
}

impl Schema {
    /// Create an empty schema.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a named attribute.
    #[must_use]
    pub fn with_attribute(mut self, name: impl Into<String>, attribute: Attribute) -> Self {
        self.attributes.insert(name.into(), attribute);
        self
    }

    /// Look up an attribute by name.
    #[must_use]
    pub fn attribute(&self, name: &str) -> Option<&Attribute> {
        self.attributes.get(name)
    }

    /// Access all attributes, sorted by name.
    #[must_use]
    pub fn attributes(&self) -> &BTreeMap<String, Attribute> {
        &self.attributes
    }

    /// Number of declared attributes.
    #[must_use]
    pub fn len(&self) -> usize {
        self.attributes.len()
    }

    /// Returns true if nothing has been declared.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.attributes.is_empty()
    }
}
