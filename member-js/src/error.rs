use thiserror::Error;

/// Which [`TableLimits`](crate::TableLimits) or [`HeapLimits`](crate::HeapLimits) bound was hit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Limit {
  MaxEntries,
  MaxPathDepth,
  MaxObjects,
  MaxStringLength,
}

/// Failure to look up a member on a live target.
///
/// Lookups are pure, so none of these are worth retrying against the same target.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ResolveError {
  /// Segment `index` of `path` was absent or `undefined` on the value reached so far.
  #[error("property not found: `{segment}` (segment {index} of `{path}`)")]
  PropertyNotFound {
    path: String,
    segment: String,
    index: usize,
  },
  /// A table lookup named an id that was never declared.
  #[error("unknown member `{0}`")]
  UnknownMember(String),
}

impl ResolveError {
  pub(crate) fn not_found(path: &crate::Path, index: usize) -> Self {
    Self::PropertyNotFound {
      path: path.to_string(),
      segment: path.segments()[index].as_str().to_string(),
      index,
    }
  }
}

/// A malformed member declaration. Raised while building a table, before any lookup can happen.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum InvalidDeclaration {
  #[error("member name is empty (entry `{id}`)")]
  EmptyName { id: String },
  #[error("member name `{name}` is not a single identifier segment")]
  InvalidName { name: String },
  #[error("member id `{id}` is empty or contains whitespace")]
  InvalidId { id: String },
  #[error("member `{id}` has an empty declared type")]
  EmptyType { id: String },
  #[error("member id `{0}` is declared more than once")]
  DuplicateId(String),
  #[error("member `{id}` is qualified by unknown parent `{parent}`")]
  UnknownParent { id: String, parent: String },
  #[error("cyclic qualification: {}", .chain.join(" -> "))]
  Cycle { chain: Vec<String> },
  #[error("table limit exceeded ({limit:?}): got {got}, max {max}")]
  LimitExceeded { limit: Limit, got: usize, max: usize },
}

/// Failure to load a table from its serialized form.
#[derive(Debug, Error)]
pub enum TableError {
  #[error("malformed member table: {0}")]
  Json(#[from] serde_json::Error),
  #[error(transparent)]
  Declaration(#[from] InvalidDeclaration),
}

/// Failure to load an object snapshot into a [`Heap`](crate::Heap).
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum HeapError {
  #[error("heap limit exceeded ({limit:?}): got {got}, max {max}")]
  LimitExceeded { limit: Limit, got: usize, max: usize },
}
