use tracing::trace;

use crate::error::ResolveError;
use crate::model::ObjectModel;
use crate::name::MemberId;
use crate::path::Path;
use crate::wrap::wrap;
use crate::wrap::Interface;
use crate::wrap::Wrapped;

/// Builds the path of `name`, qualified by `parent` if given: `parent.name`, or just `name`.
pub fn resolve(name: MemberId, parent: Option<&Path>) -> Path {
  match parent {
    Some(parent) => parent.child(name),
    None => Path::global(name),
  }
}

/// Looks up `path` on `target`, one segment at a time.
///
/// Fails with [`ResolveError::PropertyNotFound`] as soon as a segment is absent or `undefined`,
/// including when the value reached so far cannot carry properties. A final `null` is a defined
/// value and is returned as is.
pub fn apply<M: ObjectModel>(model: &M, path: &Path, target: M::Value) -> Result<M::Value, ResolveError> {
  let mut current = target;
  for (index, segment) in path.segments().iter().enumerate() {
    current = match model.get(current, segment.as_str()) {
      Some(value) if !model.is_undefined(value) => value,
      _ => {
        trace!(
          path = %path,
          segment = segment.as_str(),
          index,
          on = model.type_of(current),
          "member lookup failed"
        );
        return Err(ResolveError::not_found(path, index));
      }
    };
  }
  Ok(current)
}

/// Explicit resolution context: an object model plus the global object that unqualified lookups
/// start from.
pub struct Resolver<'m, M: ObjectModel> {
  model: &'m M,
  global: M::Value,
}

impl<'m, M: ObjectModel> Resolver<'m, M> {
  pub fn new(model: &'m M, global: M::Value) -> Self {
    Self { model, global }
  }

  pub fn model(&self) -> &'m M {
    self.model
  }

  pub fn global(&self) -> M::Value {
    self.global
  }

  /// Looks up `path` starting at the global object.
  pub fn apply_global(&self, path: &Path) -> Result<M::Value, ResolveError> {
    apply(self.model, path, self.global)
  }

  /// Looks up `path` starting at `target`.
  pub fn apply(&self, path: &Path, target: M::Value) -> Result<M::Value, ResolveError> {
    apply(self.model, path, target)
  }

  /// Looks up `path` from the global object and tags the result as `T`.
  pub fn get<T: Interface>(&self, path: &Path) -> Result<Wrapped<T, M::Value>, ResolveError> {
    self.apply_global(path).map(wrap)
  }
}

impl<M: ObjectModel> Clone for Resolver<'_, M> {
  fn clone(&self) -> Self {
    *self
  }
}

impl<M: ObjectModel> Copy for Resolver<'_, M> {}
