//! The flat declaration table that replaces hand-written binding declarations.
//!
//! Each row names one member, optionally the row that qualifies it, and its declared type. Rows are
//! validated as a whole when the table is built, so malformed vocabularies are rejected before any
//! lookup can be attempted.

use ahash::HashMap;
use ahash::HashMapExt;
use ahash::HashSet;
use ahash::HashSetExt;
use serde::Deserialize;
use serde::Serialize;
use tracing::debug;
use tracing::debug_span;

use crate::error::InvalidDeclaration;
use crate::error::Limit;
use crate::error::ResolveError;
use crate::error::TableError;
use crate::model::ObjectModel;
use crate::name::check_name;
use crate::name::MemberId;
use crate::path::Path;
use crate::resolve::apply;
use crate::resolve::resolve;
use crate::wrap::DynWrapped;

/// One row of a member table.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Declaration {
  /// Key other rows use to name this one as their parent. Defaults to `name`.
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub id: Option<String>,
  pub name: String,
  /// Id of the qualifying row.
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub parent: Option<String>,
  #[serde(rename = "type")]
  pub declared_type: String,
  /// Interface that exposes this member, e.g. `Node` for `nodeType`. Rows without one are globals.
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub interface: Option<String>,
  /// Free-form remarks, e.g. browser support caveats. Not interpreted.
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub note: Option<String>,
}

impl Declaration {
  pub fn new(name: impl Into<String>, declared_type: impl Into<String>) -> Self {
    Self {
      id: None,
      name: name.into(),
      parent: None,
      declared_type: declared_type.into(),
      interface: None,
      note: None,
    }
  }

  pub fn with_id(mut self, id: impl Into<String>) -> Self {
    self.id = Some(id.into());
    self
  }

  pub fn with_parent(mut self, parent: impl Into<String>) -> Self {
    self.parent = Some(parent.into());
    self
  }

  pub fn on_interface(mut self, interface: impl Into<String>) -> Self {
    self.interface = Some(interface.into());
    self
  }

  pub fn key(&self) -> &str {
    self.id.as_deref().unwrap_or(&self.name)
  }
}

/// Ids may be dotted (`Node.nodeType`) but must be non-empty and free of whitespace.
fn check_id(id: &str) -> Result<(), InvalidDeclaration> {
  if id.is_empty() || id.chars().any(char::is_whitespace) {
    return Err(InvalidDeclaration::InvalidId { id: id.to_string() });
  }
  Ok(())
}

/// Limits applied while building a table.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TableLimits {
  pub max_entries: usize,
  /// Maximum number of segments in any resolved path.
  pub max_path_depth: usize,
}

impl Default for TableLimits {
  fn default() -> Self {
    Self {
      max_entries: 1 << 16,
      max_path_depth: 32,
    }
  }
}

#[derive(Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
struct TableFile {
  members: Vec<Declaration>,
}

/// A validated row together with its resolved path.
#[derive(Clone, Debug, PartialEq)]
pub struct Entry {
  decl: Declaration,
  path: Path,
}

impl Entry {
  pub fn id(&self) -> &str {
    self.decl.key()
  }

  pub fn path(&self) -> &Path {
    &self.path
  }

  pub fn name(&self) -> &MemberId {
    self.path.name()
  }

  pub fn declared_type(&self) -> &str {
    &self.decl.declared_type
  }

  pub fn interface(&self) -> Option<&str> {
    self.decl.interface.as_deref()
  }

  pub fn note(&self) -> Option<&str> {
    self.decl.note.as_deref()
  }

  pub fn declaration(&self) -> &Declaration {
    &self.decl
  }
}

/// The flat `(path, parent path, declared type)` form of an entry.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Row {
  pub id: String,
  pub path: Path,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub parent: Option<Path>,
  #[serde(rename = "type")]
  pub declared_type: String,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub interface: Option<String>,
}

#[derive(Clone, Debug)]
pub struct MemberTable {
  entries: Vec<Entry>,
  index: HashMap<String, usize>,
}

impl MemberTable {
  /// Validates `decls` and resolves every row's path.
  pub fn build(decls: Vec<Declaration>, limits: TableLimits) -> Result<Self, InvalidDeclaration> {
    let span = debug_span!("member_js.build_table", entries = decls.len());
    let _guard = span.enter();

    if decls.len() > limits.max_entries {
      return Err(InvalidDeclaration::LimitExceeded {
        limit: Limit::MaxEntries,
        got: decls.len(),
        max: limits.max_entries,
      });
    }

    let mut index = HashMap::with_capacity(decls.len());
    for (i, decl) in decls.iter().enumerate() {
      check_name(decl.key(), &decl.name)?;
      if let Some(id) = &decl.id {
        check_id(id)?;
      }
      if decl.declared_type.trim().is_empty() {
        return Err(InvalidDeclaration::EmptyType {
          id: decl.key().to_string(),
        });
      }
      if index.insert(decl.key().to_string(), i).is_some() {
        return Err(InvalidDeclaration::DuplicateId(decl.key().to_string()));
      }
    }

    let mut parents = Vec::with_capacity(decls.len());
    for decl in decls.iter() {
      let parent = match &decl.parent {
        None => None,
        Some(parent) => match index.get(parent.as_str()) {
          Some(&p) => Some(p),
          None => {
            return Err(InvalidDeclaration::UnknownParent {
              id: decl.key().to_string(),
              parent: parent.clone(),
            })
          }
        },
      };
      parents.push(parent);
    }

    let mut paths: Vec<Option<Path>> = vec![None; decls.len()];
    for start in 0..decls.len() {
      if paths[start].is_some() {
        continue;
      }
      // Walk up to the nearest already resolved ancestor (or a root), then resolve back down.
      let mut chain = Vec::new();
      let mut on_chain = HashSet::new();
      let mut cur = Some(start);
      let mut base = loop {
        match cur {
          None => break None,
          Some(i) if paths[i].is_some() => break paths[i].clone(),
          Some(i) => {
            if !on_chain.insert(i) {
              let from = chain.iter().position(|&c| c == i).unwrap_or(0);
              let mut ids: Vec<String> = chain[from..]
                .iter()
                .map(|&c: &usize| decls[c].key().to_string())
                .collect();
              ids.push(decls[i].key().to_string());
              return Err(InvalidDeclaration::Cycle { chain: ids });
            }
            chain.push(i);
            cur = parents[i];
          }
        }
      };
      for &i in chain.iter().rev() {
        let path = resolve(MemberId::new(decls[i].name.clone()), base.as_ref());
        if path.depth() > limits.max_path_depth {
          return Err(InvalidDeclaration::LimitExceeded {
            limit: Limit::MaxPathDepth,
            got: path.depth(),
            max: limits.max_path_depth,
          });
        }
        paths[i] = Some(path.clone());
        base = Some(path);
      }
    }

    let entries: Vec<Entry> = decls
      .into_iter()
      .zip(paths)
      .map(|(decl, path)| Entry {
        decl,
        path: path.expect("every entry is resolved by the walk above"),
      })
      .collect();
    debug!(entries = entries.len(), "member table built");
    Ok(Self { entries, index })
  }

  /// Parses a `{"members": [...]}` document and builds it.
  pub fn from_json(text: &str, limits: TableLimits) -> Result<Self, TableError> {
    let file: TableFile = serde_json::from_str(text)?;
    Ok(Self::build(file.members, limits)?)
  }

  /// Serializes the declarations back to the `{"members": [...]}` form.
  pub fn to_json(&self) -> serde_json::Value {
    serde_json::json!({
      "members": self.entries.iter().map(|e| &e.decl).collect::<Vec<_>>(),
    })
  }

  pub fn len(&self) -> usize {
    self.entries.len()
  }

  pub fn is_empty(&self) -> bool {
    self.entries.is_empty()
  }

  /// Entries in declaration order.
  pub fn entries(&self) -> &[Entry] {
    &self.entries
  }

  pub fn get(&self, id: &str) -> Option<&Entry> {
    self.index.get(id).map(|&i| &self.entries[i])
  }

  pub fn path(&self, id: &str) -> Option<&Path> {
    self.get(id).map(Entry::path)
  }

  /// Entries exposed by `interface`, in declaration order.
  pub fn members_of<'a>(&'a self, interface: &'a str) -> impl Iterator<Item = &'a Entry> + 'a {
    self
      .entries
      .iter()
      .filter(move |e| e.interface() == Some(interface))
  }

  /// Entries with no owning interface, i.e. globals and members qualified by them.
  pub fn globals(&self) -> impl Iterator<Item = &Entry> + '_ {
    self.entries.iter().filter(|e| e.interface().is_none())
  }

  pub fn to_rows(&self) -> Vec<Row> {
    self
      .entries
      .iter()
      .map(|e| Row {
        id: e.id().to_string(),
        path: e.path.clone(),
        parent: e.path.parent(),
        declared_type: e.declared_type().to_string(),
        interface: e.decl.interface.clone(),
      })
      .collect()
  }

  /// Looks up the member declared as `id` on `target` and tags the result with its declared type.
  pub fn apply<M: ObjectModel>(
    &self,
    model: &M,
    id: &str,
    target: M::Value,
  ) -> Result<DynWrapped<M::Value>, ResolveError> {
    let entry = self
      .get(id)
      .ok_or_else(|| ResolveError::UnknownMember(id.to_string()))?;
    let value = apply(model, &entry.path, target)?;
    Ok(DynWrapped::new(entry.declared_type(), value))
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  fn build(decls: Vec<Declaration>) -> Result<MemberTable, InvalidDeclaration> {
    MemberTable::build(decls, TableLimits::default())
  }

  #[test]
  fn parents_may_be_declared_after_children() {
    let table = build(vec![
      Declaration::new("style", "CSSStyleDeclaration").with_parent("body"),
      Declaration::new("body", "HTMLElement").with_parent("document"),
      Declaration::new("document", "Document"),
    ])
    .unwrap();
    assert_eq!(table.path("style").unwrap().to_string(), "document.body.style");
    assert_eq!(table.entries()[0].id(), "style");
  }

  #[test]
  fn self_qualification_is_a_cycle() {
    assert_eq!(
      build(vec![Declaration::new("a", "Object").with_parent("a")]).unwrap_err(),
      InvalidDeclaration::Cycle {
        chain: vec!["a".to_string(), "a".to_string()]
      }
    );
  }

  #[test]
  fn longer_cycles_report_the_loop() {
    let err = build(vec![
      Declaration::new("root", "Object"),
      Declaration::new("x", "Object").with_parent("z"),
      Declaration::new("y", "Object").with_parent("x"),
      Declaration::new("z", "Object").with_parent("y"),
    ])
    .unwrap_err();
    assert_eq!(
      err,
      InvalidDeclaration::Cycle {
        chain: vec!["x", "z", "y", "x"].into_iter().map(String::from).collect()
      }
    );
  }

  #[test]
  fn same_name_under_different_ids() {
    let table = build(vec![
      Declaration::new("length", "Number").with_id("history.length").with_parent("history"),
      Declaration::new("history", "History"),
      Declaration::new("length", "Number").with_id("Storage.length").on_interface("Storage"),
    ])
    .unwrap();
    assert_eq!(table.path("history.length").unwrap().to_string(), "history.length");
    assert_eq!(table.path("Storage.length").unwrap().to_string(), "length");
    assert_eq!(table.members_of("Storage").count(), 1);
    assert_eq!(table.globals().count(), 2);
  }

  #[test]
  fn depth_limit() {
    let err = MemberTable::build(
      vec![
        Declaration::new("a", "Object"),
        Declaration::new("b", "Object").with_parent("a"),
        Declaration::new("c", "Object").with_parent("b"),
      ],
      TableLimits {
        max_path_depth: 2,
        ..TableLimits::default()
      },
    )
    .unwrap_err();
    assert_eq!(
      err,
      InvalidDeclaration::LimitExceeded {
        limit: Limit::MaxPathDepth,
        got: 3,
        max: 2
      }
    );
  }

  #[test]
  fn entry_limit() {
    let err = MemberTable::build(
      vec![
        Declaration::new("a", "Object"),
        Declaration::new("b", "Object"),
      ],
      TableLimits {
        max_entries: 1,
        ..TableLimits::default()
      },
    )
    .unwrap_err();
    assert_eq!(
      err,
      InvalidDeclaration::LimitExceeded {
        limit: Limit::MaxEntries,
        got: 2,
        max: 1
      }
    );
  }

  #[test]
  fn explicit_ids_must_not_be_blank() {
    assert_eq!(
      build(vec![Declaration::new("body", "HTMLElement").with_id("")]).unwrap_err(),
      InvalidDeclaration::InvalidId { id: String::new() }
    );
    assert_eq!(
      build(vec![Declaration::new("body", "HTMLElement").with_id("document body")]).unwrap_err(),
      InvalidDeclaration::InvalidId {
        id: "document body".to_string()
      }
    );
    let table = build(vec![Declaration::new("body", "HTMLElement").with_id("document.body")]).unwrap();
    assert_eq!(table.path("document.body").unwrap().to_string(), "body");
  }
}
