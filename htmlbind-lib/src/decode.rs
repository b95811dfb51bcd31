use scraper::Html;
use tracing::debug;

use crate::scope::Scope;
use crate::Result;

/// A record that can be populated from a DOM scope.
///
/// Implement it with `#[derive(Decode)]`; each public field carries an
/// `#[html(selector = "...", attr = "...")]` annotation:
///
/// ```ignore
/// #[derive(Debug, Default, Decode)]
/// pub struct Nested {
///     #[html(selector = "div > p")]
///     pub text: String,
///     #[html(selector = "li", attr = "class")]
///     pub classes: Vec<String>,
///     #[html(selector = "div > div")]
///     pub child: Option<Box<Nested>>,
/// }
/// ```
///
/// Supported field types are `String`, `Vec<String>`, other records by value
/// and records behind `Option<T>` or `Option<Box<T>>`. Fields that are not
/// `pub` or are marked `#[html(skip)]` are left alone.
pub trait Decode {
    /// Settable fields in declaration order.
    const FIELDS: &'static [FieldDescriptor];

    /// Fills the fields of `self` from `scope`. Selectors that match nothing
    /// leave their field unset; only unsupported field shapes are errors.
    fn decode(&mut self, scope: &Scope<'_>) -> Result<()>;

    /// Fails with the first unsupported field shape of this record or of any
    /// record nested in it, in the order `decode` would reach them. Record
    /// types already in `seen` are not checked again.
    fn check_shapes(seen: &mut Vec<&'static str>) -> Result<()>;
}

/// Static description of one record field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldDescriptor {
    pub name: &'static str,
    /// Declared type as written in the record.
    pub ty: &'static str,
    pub shape: Shape,
    pub selector: &'static str,
    /// Attribute to read; empty means the node's text.
    pub attr: &'static str,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Shape {
    Text,
    TextSequence,
    Record,
    RecordRef,
    Unsupported(Unsupported),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Unsupported {
    Field,
    SequenceElement,
    ReferenceTarget,
}

impl Shape {
    pub fn is_supported(&self) -> bool {
        !matches!(self, Shape::Unsupported(_))
    }
}

/// Decodes `scope` into `dest` in place.
///
/// On error `dest` may be partially populated and should be discarded.
pub fn decode<T: Decode>(dest: &mut T, scope: &Scope<'_>) -> Result<()> {
    debug!(
        record = std::any::type_name::<T>(),
        nodes = scope.len(),
        "decoding record"
    );
    dest.decode(scope)
}

/// Checks that `T` and every record nested in it only use supported field
/// shapes, without decoding anything.
pub fn check_shapes<T: Decode>() -> Result<()> {
    T::check_shapes(&mut vec![])
}

/// Parses a complete HTML document and decodes it into a fresh `T`.
pub fn from_html<T: Decode + Default>(html: &str) -> Result<T> {
    let document = Html::parse_document(html);
    Scope::document(&document).decode()
}

/// Like [`from_html`], for a markup fragment.
pub fn from_fragment<T: Decode + Default>(html: &str) -> Result<T> {
    let fragment = Html::parse_fragment(html);
    Scope::document(&fragment).decode()
}
