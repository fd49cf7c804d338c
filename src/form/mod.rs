mod field;
#[allow(clippy::module_inception)]
mod form;
mod list;
mod registry;

pub use form::Form;
pub use list::FormList;
pub use registry::{FormDefinition, FormRegistry};
