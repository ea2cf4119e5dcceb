//! Built-in DOM/BOM vocabulary.
//!
//! The bulk of the vocabulary is data: [`table`] is built once from the embedded `dom.json`. The
//! markers and accessors here are the typed entry points for the members most code needs.

use once_cell::sync::Lazy;

use crate::interfaces;
use crate::member::Member;
use crate::name::MemberId;
use crate::table::MemberTable;
use crate::table::TableLimits;

static DOM_TABLE_JSON: &str = include_str!("dom.json");

static DOM_TABLE: Lazy<MemberTable> = Lazy::new(|| {
  MemberTable::from_json(DOM_TABLE_JSON, TableLimits::default()).expect("built-in DOM table is valid")
});

/// The built-in member table.
pub fn table() -> &'static MemberTable {
  &DOM_TABLE
}

interfaces! {
  EventTarget = "EventTarget";
  Window = "Window": EventTarget;
  Node = "Node": EventTarget;
  Document = "Document": Node;
  Element = "Element": Node;
  HtmlElement = "HTMLElement": Element;
  NodeList = "NodeList";
  HtmlCollection = "HTMLCollection";
  CssStyleDeclaration = "CSSStyleDeclaration";
  Event = "Event";
  UiEvent = "UIEvent": Event;
  MouseEvent = "MouseEvent": UiEvent;
  KeyboardEvent = "KeyboardEvent": UiEvent;
  Location = "Location";
  Navigator = "Navigator";
  History = "History";
  Screen = "Screen";
  Storage = "Storage";
  Console = "Console";
  JsString = "String";
  JsNumber = "Number";
  JsBoolean = "Boolean";
  JsObject = "Object";
  JsFunction = "Function";
  /// A value whose type is not declared.
  JsAny = "any";
}

pub mod names {
  use crate::name::MemberId;

  pub const WINDOW: MemberId = MemberId::from_static("window");
  pub const DOCUMENT: MemberId = MemberId::from_static("document");
  pub const LOCATION: MemberId = MemberId::from_static("location");
  pub const NAVIGATOR: MemberId = MemberId::from_static("navigator");
  pub const HISTORY: MemberId = MemberId::from_static("history");
  pub const SCREEN: MemberId = MemberId::from_static("screen");
  pub const LOCAL_STORAGE: MemberId = MemberId::from_static("localStorage");
  pub const SESSION_STORAGE: MemberId = MemberId::from_static("sessionStorage");
  pub const CONSOLE: MemberId = MemberId::from_static("console");
  pub const INNER_WIDTH: MemberId = MemberId::from_static("innerWidth");
  pub const INNER_HEIGHT: MemberId = MemberId::from_static("innerHeight");

  pub const BODY: MemberId = MemberId::from_static("body");
  pub const DOCUMENT_ELEMENT: MemberId = MemberId::from_static("documentElement");
  pub const TITLE: MemberId = MemberId::from_static("title");
  pub const HREF: MemberId = MemberId::from_static("href");
  pub const USER_AGENT: MemberId = MemberId::from_static("userAgent");
  pub const STYLE: MemberId = MemberId::from_static("style");

  pub const NODE_TYPE: MemberId = MemberId::from_static("nodeType");
  pub const NODE_NAME: MemberId = MemberId::from_static("nodeName");
  pub const PARENT_NODE: MemberId = MemberId::from_static("parentNode");
  pub const FIRST_CHILD: MemberId = MemberId::from_static("firstChild");
  pub const NEXT_SIBLING: MemberId = MemberId::from_static("nextSibling");
  pub const CHILD_NODES: MemberId = MemberId::from_static("childNodes");
  pub const TEXT_CONTENT: MemberId = MemberId::from_static("textContent");
  pub const TAG_NAME: MemberId = MemberId::from_static("tagName");
  pub const ID: MemberId = MemberId::from_static("id");
  pub const CLASS_NAME: MemberId = MemberId::from_static("className");
  pub const LENGTH: MemberId = MemberId::from_static("length");

  pub const TYPE: MemberId = MemberId::from_static("type");
  pub const TARGET: MemberId = MemberId::from_static("target");
  pub const CLIENT_X: MemberId = MemberId::from_static("clientX");
  pub const CLIENT_Y: MemberId = MemberId::from_static("clientY");
  pub const BUTTON: MemberId = MemberId::from_static("button");
  pub const KEY: MemberId = MemberId::from_static("key");
}

// Globals.

pub fn window() -> Member<Window> {
  Member::new(names::WINDOW)
}

pub fn document() -> Member<Document> {
  Member::new(names::DOCUMENT)
}

pub fn location() -> Member<Location> {
  Member::new(names::LOCATION)
}

pub fn navigator() -> Member<Navigator> {
  Member::new(names::NAVIGATOR)
}

pub fn history() -> Member<History> {
  Member::new(names::HISTORY)
}

pub fn screen() -> Member<Screen> {
  Member::new(names::SCREEN)
}

pub fn local_storage() -> Member<Storage> {
  Member::new(names::LOCAL_STORAGE)
}

pub fn session_storage() -> Member<Storage> {
  Member::new(names::SESSION_STORAGE)
}

pub fn console() -> Member<Console> {
  Member::new(names::CONSOLE)
}

pub fn inner_width() -> Member<JsNumber> {
  Member::new(names::INNER_WIDTH)
}

pub fn inner_height() -> Member<JsNumber> {
  Member::new(names::INNER_HEIGHT)
}

pub fn document_body() -> Member<HtmlElement> {
  document().member(names::BODY)
}

pub fn document_element() -> Member<Element> {
  document().member(names::DOCUMENT_ELEMENT)
}

pub fn document_title() -> Member<JsString> {
  document().member(names::TITLE)
}

pub fn location_href() -> Member<JsString> {
  location().member(names::HREF)
}

pub fn user_agent() -> Member<JsString> {
  navigator().member(names::USER_AGENT)
}

// Instance members, applied to a value of the owning interface.

pub fn node_type() -> Member<JsNumber> {
  Member::new(names::NODE_TYPE)
}

pub fn node_name() -> Member<JsString> {
  Member::new(names::NODE_NAME)
}

pub fn parent_node() -> Member<Node> {
  Member::new(names::PARENT_NODE)
}

pub fn first_child() -> Member<Node> {
  Member::new(names::FIRST_CHILD)
}

pub fn next_sibling() -> Member<Node> {
  Member::new(names::NEXT_SIBLING)
}

pub fn child_nodes() -> Member<NodeList> {
  Member::new(names::CHILD_NODES)
}

pub fn text_content() -> Member<JsString> {
  Member::new(names::TEXT_CONTENT)
}

pub fn tag_name() -> Member<JsString> {
  Member::new(names::TAG_NAME)
}

pub fn element_id() -> Member<JsString> {
  Member::new(names::ID)
}

pub fn class_name() -> Member<JsString> {
  Member::new(names::CLASS_NAME)
}

pub fn style() -> Member<CssStyleDeclaration> {
  Member::new(names::STYLE)
}

pub fn length() -> Member<JsNumber> {
  Member::new(names::LENGTH)
}

pub fn event_type() -> Member<JsString> {
  Member::new(names::TYPE)
}

pub fn event_target() -> Member<EventTarget> {
  Member::new(names::TARGET)
}

pub fn client_x() -> Member<JsNumber> {
  Member::new(names::CLIENT_X)
}

pub fn client_y() -> Member<JsNumber> {
  Member::new(names::CLIENT_Y)
}

pub fn button() -> Member<JsNumber> {
  Member::new(names::BUTTON)
}

pub fn key() -> Member<JsString> {
  Member::new(names::KEY)
}

/// Looks a member id up in the built-in table, for callers holding a bare [`MemberId`].
pub fn declared_type_of(id: &MemberId) -> Option<&'static str> {
  table().get(id.as_str()).map(|e| e.declared_type())
}
