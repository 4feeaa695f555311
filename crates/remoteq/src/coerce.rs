//! Operand coercion.
//!
//! Every condition-bearing node runs its raw `_value` through [`coerce`].
//! The function is total: anything that is not a valid geometry literal is
//! returned unchanged as [`Operand::Literal`].

use serde_json::Value;
use tracing::trace;

use crate::condition::Operand;
use crate::geometry::Geometry;

/// Interprets a raw JSON value as a geometry literal, falling back to the raw value.
pub fn coerce(raw: &Value) -> Operand {
    match Geometry::parse(raw) {
        Ok(geometry) => Operand::Geometry(geometry),
        Err(err) => {
            if raw.is_object() {
                trace!(error = %err, "object operand is not a geometry, keeping it as a literal");
            }
            Operand::Literal(raw.clone())
        }
    }
}

/// Like [`coerce`], but only attempts geometry parsing when `geometry` is set.
pub fn coerce_with(raw: &Value, geometry: bool) -> Operand {
    if geometry {
        coerce(raw)
    } else {
        Operand::Literal(raw.clone())
    }
}
