use std::fmt;
use std::marker::PhantomData;

/// A declared platform type, such as `Node` or `MouseEvent`.
///
/// Implementors are zero-sized markers: they exist only to tag values at compile time. Interface
/// inheritance is recorded as data through [`Interface::PARENT`] rather than as Rust trait
/// inheritance.
pub trait Interface: 'static {
  /// The platform name of the interface, e.g. `"HTMLElement"`.
  const NAME: &'static str;
  /// The platform name of the interface this one inherits from, if any.
  const PARENT: Option<&'static str> = None;
}

/// Declares zero-sized [`Interface`] markers.
///
/// ```
/// member_js::interfaces! {
///   /// The `EventTarget` interface.
///   EventTarget = "EventTarget";
///   Node = "Node": EventTarget;
/// }
/// use member_js::Interface;
/// assert_eq!(Node::PARENT, Some("EventTarget"));
/// ```
#[macro_export]
macro_rules! interfaces {
  ($($(#[$attr:meta])* $ty:ident = $name:literal $(: $parent:ident)?;)*) => {
    $(
      $(#[$attr])*
      #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default)]
      pub struct $ty;

      impl $crate::Interface for $ty {
        const NAME: &'static str = $name;
        $(const PARENT: Option<&'static str> = Some(<$parent as $crate::Interface>::NAME);)?
      }
    )*
  };
}

/// A runtime value handle tagged with a declared interface.
///
/// This is a view, not an owner: it holds the same handle it was built from and never copies or
/// inspects the underlying value. Any number of wrappers, of any interfaces, may alias one value.
pub struct Wrapped<T, V> {
  value: V,
  _interface: PhantomData<fn() -> T>,
}

impl<T: Interface, V: Copy> Wrapped<T, V> {
  pub fn value(&self) -> V {
    self.value
  }

  pub fn interface(&self) -> &'static str {
    T::NAME
  }

  /// Reinterprets the same value as another interface. Like [`wrap`], this never fails.
  pub fn cast<U: Interface>(&self) -> Wrapped<U, V> {
    wrap(self.value)
  }

  pub fn into_dyn(self) -> DynWrapped<V> {
    DynWrapped {
      interface: T::NAME.to_string(),
      value: self.value,
    }
  }
}

impl<T, V: Copy> Clone for Wrapped<T, V> {
  fn clone(&self) -> Self {
    *self
  }
}

impl<T, V: Copy> Copy for Wrapped<T, V> {}

impl<T: Interface, V: fmt::Debug> fmt::Debug for Wrapped<T, V> {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.debug_tuple(T::NAME).field(&self.value).finish()
  }
}

impl<T, V: PartialEq> PartialEq for Wrapped<T, V> {
  fn eq(&self, other: &Self) -> bool {
    self.value == other.value
  }
}

/// Tags `value` with the declared interface `T`.
///
/// Unconditional: this is a type-level annotation, not a runtime check.
pub fn wrap<T: Interface, V: Copy>(value: V) -> Wrapped<T, V> {
  Wrapped {
    value,
    _interface: PhantomData,
  }
}

/// A value tagged with a declared type known only at run time, as produced by table-driven lookups.
#[derive(Clone, Debug, PartialEq)]
pub struct DynWrapped<V> {
  pub interface: String,
  pub value: V,
}

impl<V: Copy> DynWrapped<V> {
  pub fn new(interface: impl Into<String>, value: V) -> Self {
    Self {
      interface: interface.into(),
      value,
    }
  }

  /// Converts to a statically tagged wrapper, if the declared type matches `T`.
  pub fn downcast<T: Interface>(&self) -> Option<Wrapped<T, V>> {
    (self.interface == T::NAME).then(|| wrap(self.value))
  }
}
