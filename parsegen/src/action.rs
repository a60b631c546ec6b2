use abnf::{Construct, Identifier};
use std::fmt::{self, Display};

/// A compiled rule: the construct tree to evaluate when the rule is invoked,
/// along with the text it was compiled from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Action {
    name: String,
    source: String,
    root: Construct,
}

impl Action {
    pub fn new(name: impl Into<String>, source: impl Into<String>, root: Construct) -> Self {
        Action {
            name: name.into(),
            source: source.into(),
            root,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// The rule body as declared.
    pub fn source(&self) -> &str {
        &self.source
    }

    pub fn root(&self) -> &Construct {
        &self.root
    }

    pub fn references(&self) -> Vec<&Identifier> {
        self.root.references()
    }
}

impl Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{} = {}", self.name, self.root)
    }
}
