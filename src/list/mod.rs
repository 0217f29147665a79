//! Client-side list management shared by every entity screen: loading a
//! collection, narrowing it by attribute filters and free-text search, and
//! slicing the result into pages.

pub mod filter;
pub mod loader;
pub mod search;
pub mod window;

pub use filter::AttributeFilterSet;
pub use loader::{CollectionLoader, LoadSnapshot};
pub use search::TextSearch;
pub use window::PageWindow;

/// Borrowed view of a single named attribute of a row.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum FieldValue<'a> {
    Text(&'a str),
    List(&'a [String]),
    Number(i64),
}

impl FieldValue<'_> {
    /// Stored string representation used for exact-match filtering. Lists
    /// have none.
    pub fn equals(&self, expected: &str) -> bool {
        match self {
            FieldValue::Text(value) => *value == expected,
            FieldValue::Number(value) => value.to_string() == expected,
            FieldValue::List(_) => false,
        }
    }

    pub fn is_blank(&self) -> bool {
        match self {
            FieldValue::Text(value) => value.trim().is_empty(),
            FieldValue::List(values) => values.is_empty(),
            FieldValue::Number(_) => false,
        }
    }
}

/// Rows addressable by serialized field name.
pub trait Fielded {
    /// Returns `None` for unknown names and for unset optional values.
    fn field(&self, name: &str) -> Option<FieldValue<'_>>;
}

/// Marks a state of a list's input. Two equal revisions describe the same
/// collection under the same filters and query.
#[derive(Debug, Clone, Copy, Default, Eq, PartialEq, Hash)]
pub struct Revision {
    pub data: u64,
    pub view: u64,
}

impl Revision {
    pub const fn new(data: u64, view: u64) -> Revision {
        Revision { data, view }
    }
}
