use std::fmt;
use std::marker::PhantomData;

use crate::error::ResolveError;
use crate::model::ObjectModel;
use crate::name::MemberId;
use crate::path::Path;
use crate::resolve::apply;
use crate::resolve::resolve;
use crate::resolve::Resolver;
use crate::wrap::wrap;
use crate::wrap::Interface;
use crate::wrap::Wrapped;

/// A typed accessor: a member path whose value is declared to be a `T`.
///
/// One generic type covers every declared member; there is no per-interface accessor type.
pub struct Member<T> {
  path: Path,
  _ty: PhantomData<fn() -> T>,
}

impl<T: Interface> Member<T> {
  /// An unqualified member, looked up directly on whatever target it is applied to.
  pub fn new(name: MemberId) -> Self {
    Self::from_path(resolve(name, None))
  }

  /// A member qualified by `parent`, i.e. `parent.name`.
  pub fn qualified<P>(parent: &Member<P>, name: MemberId) -> Self {
    Self::from_path(resolve(name, Some(&parent.path)))
  }

  pub fn from_path(path: Path) -> Self {
    Self {
      path,
      _ty: PhantomData,
    }
  }

  /// Shorthand for [`Member::qualified`] with `self` as the parent.
  pub fn member<U: Interface>(&self, name: MemberId) -> Member<U> {
    Member::qualified(self, name)
  }

  pub fn path(&self) -> &Path {
    &self.path
  }

  pub fn declared_type(&self) -> &'static str {
    T::NAME
  }

  /// Looks this member up on `target` and tags the result as `T`.
  pub fn apply<M: ObjectModel>(&self, model: &M, target: M::Value) -> Result<Wrapped<T, M::Value>, ResolveError> {
    apply(model, &self.path, target).map(wrap)
  }

  /// Looks this member up on an already wrapped value.
  pub fn apply_on<O: Interface, M: ObjectModel>(
    &self,
    model: &M,
    target: &Wrapped<O, M::Value>,
  ) -> Result<Wrapped<T, M::Value>, ResolveError> {
    self.apply(model, target.value())
  }

  /// Looks this member up on the resolver's global object.
  pub fn get<M: ObjectModel>(&self, resolver: &Resolver<'_, M>) -> Result<Wrapped<T, M::Value>, ResolveError> {
    resolver.get(&self.path)
  }
}

impl<T> Clone for Member<T> {
  fn clone(&self) -> Self {
    Self {
      path: self.path.clone(),
      _ty: PhantomData,
    }
  }
}

impl<T> PartialEq for Member<T> {
  fn eq(&self, other: &Self) -> bool {
    self.path == other.path
  }
}

impl<T: Interface> fmt::Debug for Member<T> {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "Member<{}>({})", T::NAME, self.path)
  }
}

impl<T> fmt::Display for Member<T> {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    fmt::Display::fmt(&self.path, f)
  }
}
