//! Form state: the descriptor registry and the per-instance value store.

pub mod descriptor;
pub mod store;

pub use descriptor::{EMAIL_FIELD, FieldDescriptor, InputType, PASSWORD_FIELD, login_fields};
pub use store::{
    DuplicateFieldError, FieldStateSnapshot, FieldStore, UnknownFieldError, initial_snapshot,
};
