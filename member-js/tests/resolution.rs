use member_js::apply;
use member_js::dom;
use member_js::wrap;
use member_js::Declaration;
use member_js::Heap;
use member_js::InvalidDeclaration;
use member_js::Member;
use member_js::MemberTable;
use member_js::ObjectModel;
use member_js::Path;
use member_js::ResolveError;
use member_js::Resolver;
use member_js::TableError;
use member_js::TableLimits;
use member_js::Value;
use serde_json::json;

fn browser_snapshot(heap: &mut Heap) -> Value {
  heap
    .load_json(&json!({
      "$class": "Window",
      "innerWidth": 1280,
      "document": {
        "$class": "HTMLDocument",
        "title": "Example",
        "body": {
          "$class": "HTMLBodyElement",
          "tagName": "BODY",
          "nodeType": 1,
          "style": { "$class": "CSSStyleDeclaration", "cssText": "" }
        }
      },
      "location": { "$class": "Location", "href": "https://example.com/a?b#c" },
      "navigator": { "$class": "Navigator", "userAgent": "Mozilla/5.0" }
    }))
    .unwrap()
}

#[test]
fn missing_property_on_empty_object() {
  let mut heap = Heap::default();
  let target = heap.load_json(&json!({})).unwrap();
  let path = Path::parse("foo.bar").unwrap();
  assert_eq!(
    apply(&heap, &path, target),
    Err(ResolveError::PropertyNotFound {
      path: "foo.bar".to_string(),
      segment: "foo".to_string(),
      index: 0,
    })
  );
}

#[test]
fn wrapping_aliases_the_same_value() {
  let mut heap = Heap::default();
  let window = browser_snapshot(&mut heap);
  let body = apply(&heap, &Path::parse("document.body").unwrap(), window).unwrap();

  let as_node = wrap::<dom::Node, _>(body);
  let as_element = wrap::<dom::HtmlElement, _>(body);
  assert_eq!(as_node.value(), body);
  assert_eq!(as_element.value(), body);
  assert!(heap.same_value(as_node.value(), as_element.value()));
  assert_eq!(as_node.cast::<dom::HtmlElement>(), as_element);
  assert_eq!(heap.object_count(), 6);
}

#[test]
fn empty_name_is_rejected_at_build_time() {
  let err = MemberTable::build(
    vec![
      Declaration::new("document", "Document"),
      Declaration::new("", "HTMLElement").with_parent("document"),
    ],
    TableLimits::default(),
  )
  .unwrap_err();
  assert_eq!(err, InvalidDeclaration::EmptyName { id: String::new() });
}

#[test]
fn malformed_tables_are_rejected() {
  let dup = MemberTable::build(
    vec![
      Declaration::new("document", "Document"),
      Declaration::new("document", "Document"),
    ],
    TableLimits::default(),
  );
  assert_eq!(dup.unwrap_err(), InvalidDeclaration::DuplicateId("document".to_string()));

  let orphan = MemberTable::build(
    vec![Declaration::new("body", "HTMLElement").with_parent("document")],
    TableLimits::default(),
  );
  assert_eq!(
    orphan.unwrap_err(),
    InvalidDeclaration::UnknownParent {
      id: "body".to_string(),
      parent: "document".to_string(),
    }
  );

  let untyped = MemberTable::build(vec![Declaration::new("document", " ")], TableLimits::default());
  assert!(matches!(untyped, Err(InvalidDeclaration::EmptyType { .. })));

  let json = MemberTable::from_json(r#"{"members": [{"name": "a"}]}"#, TableLimits::default());
  assert!(matches!(json, Err(TableError::Json(_))));

  let misspelled = MemberTable::from_json(
    r#"{"members": [
      {"name": "document", "type": "Document"},
      {"name": "body", "parnet": "document", "type": "HTMLElement"}
    ]}"#,
    TableLimits::default(),
  );
  assert!(matches!(misspelled, Err(TableError::Json(_))));

  let stray = MemberTable::from_json(
    r#"{"members": [], "version": 2}"#,
    TableLimits::default(),
  );
  assert!(matches!(stray, Err(TableError::Json(_))));

  let dotted = MemberTable::from_json(
    r#"{"members": [{"name": "a.b", "type": "Object"}]}"#,
    TableLimits::default(),
  );
  assert!(matches!(
    dotted,
    Err(TableError::Declaration(InvalidDeclaration::InvalidName { .. }))
  ));
}

#[test]
fn typed_members_resolve_from_an_explicit_global() {
  let mut heap = Heap::default();
  let window = browser_snapshot(&mut heap);
  let resolver = Resolver::new(&heap, window);

  let href = dom::location_href().get(&resolver).unwrap();
  assert_eq!(href.interface(), "String");
  match href.value() {
    Value::String(s) => assert_eq!(heap.string(s), "https://example.com/a?b#c"),
    other => panic!("expected string, got {other:?}"),
  }

  let body = dom::document_body().get(&resolver).unwrap();
  assert_eq!(heap.class_of(body.value()), Some("HTMLBodyElement"));
  let node_type = dom::node_type().apply_on(&heap, &body).unwrap();
  assert_eq!(node_type.value(), Value::Number(1.0));

  let style = dom::style().apply_on(&heap, &body).unwrap();
  assert_eq!(heap.class_of(style.value()), Some("CSSStyleDeclaration"));

  let err = dom::first_child().apply_on(&heap, &body).unwrap_err();
  assert!(matches!(err, ResolveError::PropertyNotFound { index: 0, .. }));
}

#[test]
fn member_paths_follow_qualification() {
  let document: Member<dom::Document> = dom::document();
  let body: Member<dom::HtmlElement> = document.member(dom::names::BODY);
  let style: Member<dom::CssStyleDeclaration> = Member::qualified(&body, dom::names::STYLE);
  assert_eq!(style.to_string(), "document.body.style");
  assert_eq!(style.declared_type(), "CSSStyleDeclaration");
  assert_eq!(style.path().parent().as_ref(), Some(body.path()));
}

#[test]
fn table_apply_tags_with_declared_type() {
  let mut heap = Heap::default();
  let window = browser_snapshot(&mut heap);
  let table = dom::table();

  let title = table.apply(&heap, "document.title", window).unwrap();
  assert_eq!(title.interface, "String");
  assert!(title.downcast::<dom::JsString>().is_some());

  let ua = table.apply(&heap, "navigator.userAgent", window).unwrap();
  assert!(matches!(ua.value, Value::String(_)));

  assert_eq!(
    table.apply(&heap, "document.bogus", window).unwrap_err(),
    ResolveError::UnknownMember("document.bogus".to_string())
  );
  assert!(matches!(
    table.apply(&heap, "history.length", window),
    Err(ResolveError::PropertyNotFound { index: 0, .. })
  ));
}

/// Builds an object graph in which every declared path exists.
fn populate(heap: &mut Heap, root: Value, table: &MemberTable) {
  for entry in table.entries() {
    let segments = entry.path().segments();
    let mut current = root;
    for (i, segment) in segments.iter().enumerate() {
      let last = i + 1 == segments.len();
      let existing = heap.get(current, segment.as_str());
      let obj = match current {
        Value::Object(obj) => obj,
        _ => unreachable!("intermediates are always objects"),
      };
      current = match existing {
        Some(v) if !last && heap.is_object(v) => v,
        Some(v) if last => v,
        _ => {
          let value = if last {
            match entry.declared_type() {
              "Number" => Value::Number(0.0),
              "Boolean" => Value::Bool(false),
              "String" => heap.alloc_string("").unwrap(),
              other => Value::Object(heap.alloc_object(Some(other)).unwrap()),
            }
          } else {
            Value::Object(heap.alloc_object(None).unwrap())
          };
          heap.set(obj, segment.as_str(), value);
          value
        }
      };
    }
  }
}

#[test]
fn every_declared_member_resolves_on_a_conforming_target() {
  let table = dom::table();
  let mut heap = Heap::default();
  let root = Value::Object(heap.alloc_object(Some("Window")).unwrap());
  populate(&mut heap, root, table);

  for entry in table.entries() {
    let value = table
      .apply(&heap, entry.id(), root)
      .unwrap_or_else(|e| panic!("{}: {e}", entry.id()));
    assert!(!heap.is_undefined(value.value), "{}", entry.id());
    assert_eq!(value.interface, entry.declared_type());
  }
}

#[test]
fn rows_expose_the_flat_form() {
  let table = MemberTable::from_json(
    r#"{"members": [
      {"name": "document", "type": "Document"},
      {"name": "body", "parent": "document", "type": "HTMLElement", "note": "null while parsing <head>"}
    ]}"#,
    TableLimits::default(),
  )
  .unwrap();
  let rows = serde_json::to_value(table.to_rows()).unwrap();
  assert_eq!(
    rows,
    json!([
      { "id": "document", "path": "document", "type": "Document" },
      { "id": "body", "path": "document.body", "parent": "document", "type": "HTMLElement" }
    ])
  );
  assert_eq!(table.get("body").unwrap().note(), Some("null while parsing <head>"));

  let reparsed = MemberTable::from_json(&table.to_json().to_string(), TableLimits::default()).unwrap();
  assert_eq!(reparsed.entries(), table.entries());
}
