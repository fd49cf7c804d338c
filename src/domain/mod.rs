mod coerce;
mod field;

pub(crate) use coerce::coerce_value;
pub use field::{FieldDependency, FieldDescriptor, FieldKind, ValueRule};
