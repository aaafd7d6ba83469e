use std::collections::HashMap;

use autofill_observer::{
    capture::capture_model::Field,
    error::{DomError, HostError},
    page::{
        document::{Document, MutationRecord},
        host::{ObserveOptions, PageEvent, PageHost},
        synthetic::SyntheticPage,
    },
};

// =========================================================================
// Helpers
// =========================================================================

fn attrs(pairs: &[(&str, &str)]) -> HashMap<String, String> {
    pairs
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect()
}

const SUBTREE: ObserveOptions = ObserveOptions {
    child_list: true,
    subtree: true,
};

// =========================================================================
// Document tree
// =========================================================================

#[test]
fn created_elements_start_detached() {
    let mut doc = Document::new("https://example.com");
    let form = doc.create_element("FORM", HashMap::new());

    assert_eq!(doc.tag_name(form), Some("form"), "tags are lower-cased");
    assert!(!doc.is_connected(form));
    assert!(doc.forms().is_empty());
}

#[test]
fn forms_are_listed_in_document_order() {
    let mut doc = Document::new("https://example.com");
    let root = doc.root();
    let div = doc.create_element("div", HashMap::new());
    let first = doc.create_element("form", attrs(&[("id", "first")]));
    let second = doc.create_element("form", attrs(&[("id", "second")]));

    doc.append_child(div, first).unwrap();
    doc.append_child(root, div).unwrap();
    doc.append_child(root, second).unwrap();

    assert_eq!(doc.forms(), vec![first, second]);
    assert_eq!(doc.by_id("second"), Some(second));
}

#[test]
fn append_rejects_cycles_and_root() {
    let mut doc = Document::new("https://example.com");
    let root = doc.root();
    let outer = doc.create_element("div", HashMap::new());
    let inner = doc.create_element("div", HashMap::new());
    doc.append_child(outer, inner).unwrap();

    assert!(matches!(
        doc.append_child(inner, outer),
        Err(DomError::HierarchyRequest { .. })
    ));
    assert!(matches!(
        doc.append_child(outer, root),
        Err(DomError::HierarchyRequest { .. })
    ));
    assert!(matches!(
        doc.append_child(outer, outer),
        Err(DomError::HierarchyRequest { .. })
    ));
}

#[test]
fn removing_detached_node_fails() {
    let mut doc = Document::new("https://example.com");
    let div = doc.create_element("div", HashMap::new());
    assert_eq!(doc.remove(div), Err(DomError::Detached(div)));
}

#[test]
fn records_only_for_connected_parents() {
    let mut doc = Document::new("https://example.com");
    let root = doc.root();
    let container = doc.create_element("div", HashMap::new());
    let form = doc.create_element("form", HashMap::new());

    // Built off-document: no record.
    doc.append_child(container, form).unwrap();
    assert!(doc.take_records().is_empty());

    doc.append_child(root, container).unwrap();
    assert_eq!(
        doc.take_records(),
        vec![MutationRecord {
            target: root,
            added_nodes: vec![container],
            removed_nodes: vec![],
        }]
    );
}

#[test]
fn moving_a_node_records_removal_then_addition() {
    let mut doc = Document::new("https://example.com");
    let root = doc.root();
    let a = doc.create_element("div", HashMap::new());
    let b = doc.create_element("div", HashMap::new());
    let form = doc.create_element("form", HashMap::new());
    doc.append_child(root, a).unwrap();
    doc.append_child(root, b).unwrap();
    doc.append_child(a, form).unwrap();
    doc.take_records();

    doc.append_child(b, form).unwrap();
    let records = doc.take_records();

    assert_eq!(records.len(), 2);
    assert_eq!(records[0].removed_nodes, vec![form]);
    assert_eq!(records[1].target, b);
    assert_eq!(records[1].added_nodes, vec![form]);
}

#[test]
fn field_type_follows_browser_rules() {
    let mut doc = Document::new("https://example.com");
    let untyped = doc.create_element("input", HashMap::new());
    let upper = doc.create_element("input", attrs(&[("type", "PASSWORD")]));
    let bogus = doc.create_element("input", attrs(&[("type", "usrname")]));
    let select = doc.create_element("select", HashMap::new());
    let multi = doc.create_element("select", attrs(&[("multiple", "")]));
    let area = doc.create_element("textarea", HashMap::new());
    let button = doc.create_element("button", HashMap::new());
    let reset = doc.create_element("button", attrs(&[("type", "reset")]));

    assert_eq!(doc.field_type(untyped), "text");
    assert_eq!(doc.field_type(upper), "password");
    assert_eq!(doc.field_type(bogus), "text");
    assert_eq!(doc.field_type(select), "select-one");
    assert_eq!(doc.field_type(multi), "select-multiple");
    assert_eq!(doc.field_type(area), "textarea");
    assert_eq!(doc.field_type(button), "submit");
    assert_eq!(doc.field_type(reset), "reset");
}

#[test]
fn listed_elements_snapshot_current_values() {
    let mut doc = Document::new("https://example.com");
    let root = doc.root();
    let form = doc.create_element("form", HashMap::new());
    let fieldset = doc.create_element("fieldset", HashMap::new());
    let user = doc.create_element("input", attrs(&[("name", "username"), ("value", "initial")]));
    let label = doc.create_element("label", HashMap::new());
    let pw = doc.create_element("input", attrs(&[("type", "password"), ("name", "pw")]));

    doc.append_child(fieldset, user).unwrap();
    doc.append_child(form, label).unwrap();
    doc.append_child(form, fieldset).unwrap();
    doc.append_child(form, pw).unwrap();
    doc.append_child(root, form).unwrap();
    doc.set_value(pw, "hunter2").unwrap();

    assert_eq!(doc.listed_elements(form), vec![user, pw]);
    assert_eq!(doc.field(user), Some(Field::new("text", "username", "initial")));
    assert_eq!(doc.field(pw), Some(Field::new("password", "pw", "hunter2")));
}

// =========================================================================
// Synthetic page host
// =========================================================================

#[test]
fn listener_registration_requires_a_form() {
    let mut page = SyntheticPage::new(Document::new("https://example.com"));
    let div = page.create_element("div", HashMap::new());

    assert_eq!(page.add_submit_listener(div), Err(HostError::NotAForm(div)));

    let missing = autofill_observer::page::document::NodeId(999);
    assert_eq!(
        page.add_submit_listener(missing),
        Err(HostError::UnknownNode(missing))
    );
}

#[test]
fn mutations_before_observe_are_not_reported() {
    let mut page = SyntheticPage::new(Document::new("https://example.com"));
    let root = page.root();
    let form = page.create_element("form", HashMap::new());
    page.insert(root, form).unwrap();

    page.observe(root, SUBTREE).unwrap();
    assert_eq!(page.next_event(), None);
}

#[test]
fn subtree_observer_sees_deep_insertions() {
    let mut page = SyntheticPage::new(Document::new("https://example.com"));
    let root = page.root();
    let container = page.create_element("div", HashMap::new());
    page.insert(root, container).unwrap();
    let observer = page.observe(root, SUBTREE).unwrap();

    let form = page.create_element("form", HashMap::new());
    page.insert(container, form).unwrap();

    match page.next_event() {
        Some(PageEvent::Mutations { observer: id, records }) => {
            assert_eq!(id, observer);
            assert_eq!(records.len(), 1);
            assert_eq!(records[0].target, container);
            assert_eq!(records[0].added_nodes, vec![form]);
        }
        other => panic!("Expected mutation batch, got {:?}", other),
    }
    assert_eq!(page.next_event(), None);
}

#[test]
fn child_list_only_observer_ignores_deep_insertions() {
    let mut page = SyntheticPage::new(Document::new("https://example.com"));
    let root = page.root();
    let container = page.create_element("div", HashMap::new());
    page.insert(root, container).unwrap();
    page.observe(
        root,
        ObserveOptions {
            child_list: true,
            subtree: false,
        },
    )
    .unwrap();

    let form = page.create_element("form", HashMap::new());
    page.insert(container, form).unwrap();

    assert_eq!(page.next_event(), None);
}

#[test]
fn mutations_are_batched_and_flushed_before_submit() {
    let mut page = SyntheticPage::new(Document::new("https://example.com"));
    let root = page.root();
    page.observe(root, SUBTREE).unwrap();

    let a = page.create_element("form", HashMap::new());
    let b = page.create_element("form", HashMap::new());
    page.insert(root, a).unwrap();
    page.insert(root, b).unwrap();
    let listener = page.add_submit_listener(b).unwrap();
    page.submit(b);

    match page.next_event() {
        Some(PageEvent::Mutations { records, .. }) => assert_eq!(records.len(), 2),
        other => panic!("Expected mutation batch first, got {:?}", other),
    }
    assert_eq!(
        page.next_event(),
        Some(PageEvent::Submit { form: b, listener })
    );
    assert_eq!(page.next_event(), None);
}

#[test]
fn submit_without_listeners_is_silent() {
    let mut page = SyntheticPage::new(Document::new("https://example.com"));
    let root = page.root();
    let form = page.create_element("form", HashMap::new());
    page.insert(root, form).unwrap();

    page.submit(form);
    assert_eq!(page.next_event(), None);
}

#[test]
fn detached_form_does_not_fire() {
    let mut page = SyntheticPage::new(Document::new("https://example.com"));
    let root = page.root();
    let form = page.create_element("form", HashMap::new());
    page.insert(root, form).unwrap();
    page.add_submit_listener(form).unwrap();

    page.remove(form).unwrap();
    page.submit(form);
    assert_eq!(page.next_event(), None);
}

#[test]
fn every_listener_receives_the_submit() {
    let mut page = SyntheticPage::new(Document::new("https://example.com"));
    let root = page.root();
    let form = page.create_element("form", HashMap::new());
    page.insert(root, form).unwrap();
    let first = page.add_submit_listener(form).unwrap();
    let second = page.add_submit_listener(form).unwrap();
    assert_eq!(page.listener_count(form), 2);

    page.submit(form);
    assert_eq!(page.next_event(), Some(PageEvent::Submit { form, listener: first }));
    assert_eq!(page.next_event(), Some(PageEvent::Submit { form, listener: second }));

    page.remove_submit_listener(first);
    page.submit(form);
    assert_eq!(page.next_event(), Some(PageEvent::Submit { form, listener: second }));
    assert_eq!(page.next_event(), None);
}

#[test]
fn disconnect_drops_pending_batch() {
    let mut page = SyntheticPage::new(Document::new("https://example.com"));
    let root = page.root();
    let observer = page.observe(root, SUBTREE).unwrap();

    let form = page.create_element("form", HashMap::new());
    page.insert(root, form).unwrap();
    page.disconnect(observer);

    assert_eq!(page.observer_count(), 0);
    assert_eq!(page.next_event(), None);
}

#[test]
fn form_fields_reads_listed_elements() {
    let mut page = SyntheticPage::new(Document::new("https://example.com/login"));
    let root = page.root();
    let form = page.create_element("form", HashMap::new());
    let user = page.create_element("input", attrs(&[("type", "email"), ("name", "mail")]));
    let go = page.create_element("button", HashMap::new());
    page.insert(form, user).unwrap();
    page.insert(form, go).unwrap();
    page.insert(root, form).unwrap();
    page.set_value(user, "a@b.com").unwrap();

    assert_eq!(page.location(), "https://example.com/login");
    assert_eq!(
        page.form_fields(form),
        vec![
            Field::new("email", "mail", "a@b.com"),
            Field::new("submit", "", ""),
        ]
    );
}
