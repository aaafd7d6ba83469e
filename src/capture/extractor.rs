use crate::capture::capture_model::{CapturedCredential, Field, FieldSnapshot};
use crate::capture::rules::{Extraction, classify_field};

/// Single pass over a submitted form's fields.
///
/// Every text/email/password field lands in the snapshot; the rule chain
/// picks the username and password. Returns `None` when no non-empty
/// password was seen.
pub fn extract_credential(origin_url: &str, fields: &[Field]) -> Option<CapturedCredential> {
    let mut state = Extraction::default();
    let mut snapshot = FieldSnapshot::new();

    for field in fields {
        if !field.field_kind().is_credential_bearing() {
            continue;
        }

        snapshot.insert(&field.name, &field.value);

        if let Some(rule) = classify_field(field, &state) {
            (rule.apply)(field, &mut state);
        }
    }

    if state.password.is_empty() {
        return None;
    }

    Some(CapturedCredential {
        origin_url: origin_url.to_string(),
        username: state.username,
        password: state.password,
        fields: snapshot,
    })
}
