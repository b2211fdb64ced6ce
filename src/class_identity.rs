use crate::document::Document;

/// Syntactic decomposition of a fully qualified name into package segments
/// and a simple class name.
///
/// The name is only split on the separator; nothing is resolved or loaded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClassIdentity {
    pub fully_qualified_name: String,
    pub package: Vec<String>,
    pub class_name: String,
}

impl ClassIdentity {
    /// Default package separator for dotted names.
    pub const DOT: &'static str = ".";
    /// Package separator for Rust module paths.
    pub const PATH: &'static str = "::";

    /// Decompose a dotted name such as `com.example.Foo`.
    pub fn parse(name: &str) -> Self {
        Self::parse_with(name, Self::DOT)
    }

    /// Decompose `name` on an arbitrary separator. An empty separator
    /// leaves the whole name as the class name.
    pub fn parse_with(name: &str, separator: &str) -> Self {
        let split = if separator.is_empty() {
            None
        } else {
            name.rsplit_once(separator)
        };

        let (package, class_name) = match split {
            Some((package, class_name)) => (
                package.split(separator).map(str::to_string).collect(),
                class_name.to_string(),
            ),
            None => (Vec::new(), name.to_string()),
        };

        Self {
            fully_qualified_name: name.to_string(),
            package,
            class_name,
        }
    }

    pub fn to_document(&self) -> Document {
        let mut doc = Document::new();
        doc.insert("fullyQualifiedClassName", self.fully_qualified_name.as_str());
        doc.insert("package", self.package.clone());
        doc.insert("className", self.class_name.as_str());
        doc
    }
}
