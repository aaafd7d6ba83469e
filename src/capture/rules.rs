use crate::capture::capture_model::{Field, FieldKind};

/// Username/password picked so far during one pass over a form.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Extraction {
    pub username: String,
    pub password: String,
}

/// One step of the classification chain: a pure predicate and the update it
/// makes when the predicate holds.
pub struct Rule {
    pub name: &'static str,
    pub matches: fn(&Field, &Extraction) -> bool,
    pub apply: fn(&Field, &mut Extraction),
}

/// Evaluated top to bottom; the first match wins for a given field.
pub static RULES: [Rule; 3] = [
    Rule {
        name: "username-by-name",
        matches: is_named_username,
        apply: set_username,
    },
    Rule {
        name: "email-fallback",
        matches: is_fallback_email,
        apply: set_username,
    },
    Rule {
        name: "password",
        matches: is_password,
        apply: set_password,
    },
];

/// The rule that claims `field` given the current state, if any.
pub fn classify_field(field: &Field, state: &Extraction) -> Option<&'static Rule> {
    RULES.iter().find(|rule| (rule.matches)(field, state))
}

fn is_named_username(field: &Field, _: &Extraction) -> bool {
    if field.field_kind() != FieldKind::Text {
        return false;
    }
    let name = field.name.to_lowercase();
    name == "username" || name.contains("name") || name.contains("login")
}

fn is_fallback_email(field: &Field, state: &Extraction) -> bool {
    field.field_kind() == FieldKind::Email && state.username.is_empty()
}

fn is_password(field: &Field, _: &Extraction) -> bool {
    field.field_kind() == FieldKind::Password
}

fn set_username(field: &Field, state: &mut Extraction) {
    state.username = field.value.clone();
}

fn set_password(field: &Field, state: &mut Extraction) {
    state.password = field.value.clone();
}
