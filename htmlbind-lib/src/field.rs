//! Per-field decoding steps. `#[derive(Decode)]` emits one call into this
//! module for every settable field, picked by the field's declared shape.

use scraper::ElementRef;
use tracing::trace;

use crate::decode::{Decode, FieldDescriptor, Shape, Unsupported};
use crate::scope::{node_attr, node_text, Scope};
use crate::{Error, Result};

/// Value of a single node: its trimmed text when `attr` is empty, otherwise
/// the named attribute or an empty string.
pub fn node_value(node: ElementRef<'_>, attr: &str) -> String {
    if attr.is_empty() {
        node_text(node).trim().to_string()
    } else {
        node_attr(node, attr).unwrap_or_default().to_string()
    }
}

/// `node_value` of the scope's first node. Never fails: an empty scope
/// yields an empty string.
pub fn extract_value(scope: &Scope<'_>, attr: &str) -> String {
    scope
        .first()
        .map(|node| node_value(node, attr))
        .unwrap_or_default()
}

pub fn decode_text(slot: &mut String, scope: &Scope<'_>, field: &FieldDescriptor) -> Result<()> {
    let matched = scope.find(field.selector);
    trace!(field = field.name, selector = field.selector, matched = matched.len(), "text");
    *slot = extract_value(&matched, field.attr);
    Ok(())
}

/// Appends one value per matched node, in document order. Values already in
/// `slot` are kept.
pub fn decode_sequence(
    slot: &mut Vec<String>,
    scope: &Scope<'_>,
    field: &FieldDescriptor,
) -> Result<()> {
    let matched = scope.find(field.selector);
    trace!(field = field.name, selector = field.selector, matched = matched.len(), "sequence");
    slot.reserve(matched.len());
    slot.extend(matched.nodes().iter().map(|node| node_value(*node, field.attr)));
    Ok(())
}

/// Decodes a nested record held by value. The field is only replaced when
/// the selector matched something and the nested decode succeeded. Shape
/// errors inside the nested record are raised either way.
pub fn decode_record<T>(slot: &mut T, scope: &Scope<'_>, field: &FieldDescriptor) -> Result<()>
where
    T: Decode + Default,
{
    if let Some(record) = decode_nested::<T>(scope, field)? {
        *slot = record;
    }
    Ok(())
}

/// Decodes a nested record held behind `Option<T>` or `Option<Box<T>>`.
/// The slot stays `None` when the selector matches nothing.
pub fn decode_reference<T, R>(
    slot: &mut Option<R>,
    scope: &Scope<'_>,
    field: &FieldDescriptor,
) -> Result<()>
where
    T: Decode + Default,
    R: From<T>,
{
    if let Some(record) = decode_nested::<T>(scope, field)? {
        *slot = Some(R::from(record));
    }
    Ok(())
}

fn decode_nested<T>(scope: &Scope<'_>, field: &FieldDescriptor) -> Result<Option<T>>
where
    T: Decode + Default,
{
    let narrowed = scope.narrow(field.selector);
    trace!(field = field.name, selector = field.selector, matched = narrowed.len(), "record");
    if narrowed.is_empty() {
        // Nothing to decode, but an unsupported shape below still fails.
        T::check_shapes(&mut vec![])?;
        return Ok(None);
    }
    let mut record = T::default();
    record.decode(&narrowed)?;
    Ok(Some(record))
}

/// Fails with the error matching an unsupported field shape.
pub fn reject(field: &FieldDescriptor) -> Result<()> {
    let (name, ty) = (field.name, field.ty);
    match field.shape {
        Shape::Unsupported(Unsupported::Field) => Err(Error::UnsupportedFieldType { field: name, ty }),
        Shape::Unsupported(Unsupported::SequenceElement) => {
            Err(Error::UnsupportedSequenceElementType { field: name, ty })
        }
        Shape::Unsupported(Unsupported::ReferenceTarget) => {
            Err(Error::UnsupportedReferenceTarget { field: name, ty })
        }
        _ => Ok(()),
    }
}
