//! Pure validation core for wingman manifest fields: constraint sets, field
//! values, the validation rule engine, and diagnostic formatting.

pub mod constraints;
pub mod diagnostics;
pub mod field;
pub mod validation;

pub use constraints::{ConstraintError, ConstraintSet, Pattern};
pub use diagnostics::{ERROR_MARKER, format_outcome};
pub use field::{FieldKind, FieldValue};
pub use validation::{
    HttpStatus, ResponseSignal, ValidationOutcome, classify_response, validate,
    validate_with_response,
};
