#![deny(rust_2018_idioms)]

mod domain;
mod form;
mod render;
mod store;
mod submission;

pub use domain::{FieldDependency, FieldDescriptor, FieldKind, ValueRule};
pub use form::{Form, FormDefinition, FormList, FormRegistry};
pub use render::{ErrorRenderer, HtmlRenderer, JsonRenderer, PlainRenderer};
pub use store::{ConfigFile, ConfigHandle, DocumentFormat};
pub use submission::Submission;

pub mod prelude {
    pub use super::{
        ConfigFile, ConfigHandle, ErrorRenderer, FieldDescriptor, FieldKind, Form, FormDefinition,
        FormList, FormRegistry, Submission, ValueRule,
    };
}
