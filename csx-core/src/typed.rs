//! Typed-value capability.
//!
//! The serializer asks this capability for an element's atomic typed value
//! before it looks at the children. `Ok(None)` means "not applicable"; an
//! `Err` is absorbed by the serializer exactly like `Ok(None)`.

use crate::error::TypedValueError;
use crate::tree::Element;
use crate::value::AtomicValue;

/// Computes the atomic typed value of an element.
pub trait TypedValues {
    fn typed_value(&self, element: &Element) -> Result<Option<Vec<AtomicValue>>, TypedValueError>;
}

/// The value stored in [`Element::typed_value`], if any. The default.
#[derive(Debug, Clone, Copy, Default)]
pub struct AssignedTypedValue;

impl TypedValues for AssignedTypedValue {
    fn typed_value(&self, element: &Element) -> Result<Option<Vec<AtomicValue>>, TypedValueError> {
        Ok(element.typed_value.clone())
    }
}

/// Data-model style typed value.
///
/// An assigned value wins. Otherwise an element with element children has
/// no atomic value (an error), and any other element's value is its string
/// value as a single `Untyped` atomic.
#[derive(Debug, Clone, Copy, Default)]
pub struct XdmTypedValue;

impl TypedValues for XdmTypedValue {
    fn typed_value(&self, element: &Element) -> Result<Option<Vec<AtomicValue>>, TypedValueError> {
        if let Some(values) = &element.typed_value {
            return Ok(Some(values.clone()));
        }
        if element.has_element_children() {
            return Err(TypedValueError::ElementContent {
                name: element.name.clone(),
            });
        }
        Ok(Some(vec![AtomicValue::Untyped(element.string_value())]))
    }
}

impl<F> TypedValues for F
where
    F: Fn(&Element) -> Result<Option<Vec<AtomicValue>>, TypedValueError>,
{
    fn typed_value(&self, element: &Element) -> Result<Option<Vec<AtomicValue>>, TypedValueError> {
        self(element)
    }
}
