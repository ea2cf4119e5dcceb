//! Qualified member resolution for opaque DOM/BOM bindings.
//!
//! A member is a symbolic property name, optionally qualified by a parent member, e.g. `body`
//! qualified by `document`. Its [`Path`] is the dotted concatenation (`document.body`); an
//! unqualified member's path is just its name, which is a global lookup when applied to the global
//! object.
//!
//! - [`resolve`] builds paths, [`apply`] looks them up on a target through an [`ObjectModel`], and
//!   [`wrap`] tags the result with a declared [`Interface`].
//! - [`Member`] bundles a path with its declared type.
//! - [`MemberTable`] is the flat, validated `(name, parent, declared type)` table that a vocabulary
//!   is described by; [`dom::table`] is the built-in one.
//! - [`Heap`] is a small in-memory [`ObjectModel`] that can be loaded from a JSON snapshot.
//!
//! There is no ambient global object: unqualified lookups go through a [`Resolver`], which holds
//! the global explicitly.

pub mod dom;
mod error;
mod heap;
mod member;
mod model;
mod name;
mod path;
mod resolve;
mod table;
mod wrap;

pub use error::HeapError;
pub use error::InvalidDeclaration;
pub use error::Limit;
pub use error::ResolveError;
pub use error::TableError;
pub use heap::Heap;
pub use heap::HeapLimits;
pub use heap::ObjectData;
pub use heap::ObjectId;
pub use heap::StringId;
pub use heap::Value;
pub use heap::CLASS_KEY;
pub use member::Member;
pub use model::ObjectModel;
pub use name::MemberId;
pub use path::Path;
pub use resolve::apply;
pub use resolve::resolve;
pub use resolve::Resolver;
pub use table::Declaration;
pub use table::Entry;
pub use table::MemberTable;
pub use table::Row;
pub use table::TableLimits;
pub use wrap::wrap;
pub use wrap::DynWrapped;
pub use wrap::Interface;
pub use wrap::Wrapped;
