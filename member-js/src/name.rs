use serde::Deserialize;
use serde::Serialize;
use std::borrow::Borrow;
use std::borrow::Cow;
use std::fmt;

use crate::error::InvalidDeclaration;

/// Symbolic name of one property or method slot, e.g. `nodeType` or `appendChild`.
///
/// Ids built with [`MemberId::from_static`] are usable as `const` items, so a vocabulary can be
/// declared once and shared by every caller without any initialisation step.
#[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MemberId(Cow<'static, str>);

impl MemberId {
  pub const fn from_static(name: &'static str) -> Self {
    Self(Cow::Borrowed(name))
  }

  /// Builds an id from a trusted name without validating it.
  pub fn new(name: impl Into<String>) -> Self {
    Self(Cow::Owned(name.into()))
  }

  /// Builds an id from an untrusted name, rejecting anything that would not survive being joined
  /// into a dotted path.
  pub fn parse(name: &str) -> Result<Self, InvalidDeclaration> {
    check_name(name, name)?;
    Ok(Self::new(name))
  }

  pub fn as_str(&self) -> &str {
    &self.0
  }
}

impl fmt::Debug for MemberId {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "MemberId({:?})", self.as_str())
  }
}

impl fmt::Display for MemberId {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(self.as_str())
  }
}

impl Borrow<str> for MemberId {
  fn borrow(&self) -> &str {
    self.as_str()
  }
}

impl AsRef<str> for MemberId {
  fn as_ref(&self) -> &str {
    self.as_str()
  }
}

impl From<&'static str> for MemberId {
  fn from(name: &'static str) -> Self {
    Self::from_static(name)
  }
}

impl From<String> for MemberId {
  fn from(name: String) -> Self {
    Self::new(name)
  }
}

/// A member name must be one non-empty path segment: no `.` and no whitespace.
pub(crate) fn check_name(id: &str, name: &str) -> Result<(), InvalidDeclaration> {
  if name.is_empty() {
    return Err(InvalidDeclaration::EmptyName { id: id.to_string() });
  }
  if name.chars().any(|c| c == '.' || c.is_whitespace()) {
    return Err(InvalidDeclaration::InvalidName {
      name: name.to_string(),
    });
  }
  Ok(())
}
