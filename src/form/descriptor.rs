//! Static field metadata for the login form. Descriptors are built once at
//! configuration time and shared read-only by the store and the rendering layer.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Field id holding the email address.
pub const EMAIL_FIELD: &str = "email-address";
/// Field id holding the password.
pub const PASSWORD_FIELD: &str = "password";

/// HTML input type rendered for a field.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InputType {
    Email,
    Password,
    Text,
    Tel,
    Number,
}

impl InputType {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Email => "email",
            Self::Password => "password",
            Self::Text => "text",
            Self::Tel => "tel",
            Self::Number => "number",
        }
    }

    /// Whether a host should hide the typed value.
    #[must_use]
    pub const fn is_secret(self) -> bool {
        matches!(self, Self::Password)
    }
}

impl fmt::Display for InputType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Metadata describing one form input.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldDescriptor {
    pub id: String,
    pub label: String,
    pub input_name: String,
    pub input_type: InputType,
    pub placeholder: String,
    pub required: bool,
}

impl FieldDescriptor {
    #[must_use]
    pub fn new(id: &str, label: &str, input_name: &str, input_type: InputType) -> Self {
        Self {
            id: id.to_string(),
            label: label.to_string(),
            input_name: input_name.to_string(),
            input_type,
            placeholder: String::new(),
            required: false,
        }
    }

    #[must_use]
    pub fn placeholder(mut self, placeholder: &str) -> Self {
        self.placeholder = placeholder.to_string();
        self
    }

    #[must_use]
    pub const fn required(mut self, required: bool) -> Self {
        self.required = required;
        self
    }
}

/// Default registry for the sign-in form, in render order.
#[must_use]
pub fn login_fields() -> Vec<FieldDescriptor> {
    vec![
        FieldDescriptor::new(EMAIL_FIELD, "Email address", "email", InputType::Email)
            .placeholder("Enter your email address")
            .required(true),
        FieldDescriptor::new(PASSWORD_FIELD, "Password", "password", InputType::Password)
            .placeholder("Enter your password")
            .required(true),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn login_fields_have_unique_ids() {
        let fields = login_fields();
        let ids: HashSet<&str> = fields.iter().map(|f| f.id.as_str()).collect();
        assert_eq!(ids.len(), fields.len());
    }

    #[test]
    fn login_fields_cover_credentials() {
        let fields = login_fields();
        assert_eq!(fields[0].id, EMAIL_FIELD);
        assert_eq!(fields[0].input_name, "email");
        assert_eq!(fields[0].input_type, InputType::Email);
        assert!(fields[0].required);
        assert_eq!(fields[1].id, PASSWORD_FIELD);
        assert_eq!(fields[1].input_type, InputType::Password);
        assert_eq!(fields[1].placeholder, "Enter your password");
    }

    #[test]
    fn input_type_renders_html_name() {
        assert_eq!(InputType::Email.to_string(), "email");
        assert!(InputType::Password.is_secret());
        assert!(!InputType::Text.is_secret());
    }
}
