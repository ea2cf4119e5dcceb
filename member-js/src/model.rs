//! The seam between the resolver and whatever runtime owns the objects being inspected.
//!
//! This is intentionally narrow: member resolution only ever reads named properties, so that is all
//! an embedding has to provide. [`Heap`](crate::Heap) is the in-crate implementation.

/// Read-only property access over a runtime's values.
pub trait ObjectModel {
  /// A cheap handle to a runtime value. Handles do not own the value; they are only meaningful
  /// while the runtime that produced them is alive.
  type Value: Copy;

  /// Reads the property `key` of `target`.
  ///
  /// Returns `None` when the property is absent, or when `target` cannot carry properties at all
  /// (e.g. `null`).
  fn get(&self, target: Self::Value, key: &str) -> Option<Self::Value>;

  fn is_undefined(&self, value: Self::Value) -> bool;

  fn is_object(&self, value: Self::Value) -> bool;

  /// Equality under the runtime's own semantics: identity for objects, SameValue for primitives.
  fn same_value(&self, a: Self::Value, b: Self::Value) -> bool;

  /// A short description of the value's type for diagnostics, e.g. `"object"` or `"number"`.
  fn type_of(&self, value: Self::Value) -> &'static str;
}
