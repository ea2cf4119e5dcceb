use serde::Deserialize;
use serde::Serialize;
use std::fmt;
use std::str::FromStr;

use crate::error::InvalidDeclaration;
use crate::name::check_name;
use crate::name::MemberId;

/// A dotted member path such as `document.body.style`.
///
/// Always has at least one segment. A single-segment path is unqualified: applied to the global
/// object it is a global lookup.
#[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Path {
  segments: Vec<MemberId>,
}

impl Path {
  /// The unqualified path naming just `name`.
  pub fn global(name: MemberId) -> Self {
    Self {
      segments: vec![name],
    }
  }

  /// This path qualified by one more segment.
  pub fn child(&self, name: MemberId) -> Self {
    let mut segments = Vec::with_capacity(self.segments.len() + 1);
    segments.extend(self.segments.iter().cloned());
    segments.push(name);
    Self { segments }
  }

  /// Parses `a.b.c`. Every segment must be a valid member name.
  pub fn parse(dotted: &str) -> Result<Self, InvalidDeclaration> {
    let mut segments = Vec::new();
    for segment in dotted.split('.') {
      check_name(dotted, segment)?;
      segments.push(MemberId::new(segment));
    }
    Ok(Self { segments })
  }

  pub fn segments(&self) -> &[MemberId] {
    &self.segments
  }

  pub fn depth(&self) -> usize {
    self.segments.len()
  }

  pub fn is_qualified(&self) -> bool {
    self.segments.len() > 1
  }

  /// The last segment, i.e. the member this path names.
  pub fn name(&self) -> &MemberId {
    // Non-empty by construction.
    &self.segments[self.segments.len() - 1]
  }

  /// The qualifying path, if any.
  pub fn parent(&self) -> Option<Path> {
    if self.is_qualified() {
      Some(Self {
        segments: self.segments[..self.segments.len() - 1].to_vec(),
      })
    } else {
      None
    }
  }
}

impl fmt::Display for Path {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    for (i, segment) in self.segments.iter().enumerate() {
      if i > 0 {
        f.write_str(".")?;
      }
      f.write_str(segment.as_str())?;
    }
    Ok(())
  }
}

impl fmt::Debug for Path {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "Path({self})")
  }
}

impl FromStr for Path {
  type Err = InvalidDeclaration;

  fn from_str(s: &str) -> Result<Self, Self::Err> {
    Self::parse(s)
  }
}

impl TryFrom<String> for Path {
  type Error = InvalidDeclaration;

  fn try_from(value: String) -> Result<Self, Self::Error> {
    Self::parse(&value)
  }
}

impl From<Path> for String {
  fn from(path: Path) -> Self {
    path.to_string()
  }
}

impl From<MemberId> for Path {
  fn from(name: MemberId) -> Self {
    Self::global(name)
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn child_and_parent_are_inverse() {
    let document = Path::global(MemberId::from_static("document"));
    let body = document.child(MemberId::from_static("body"));
    assert_eq!(body.to_string(), "document.body");
    assert_eq!(body.parent(), Some(document.clone()));
    assert_eq!(body.name().as_str(), "body");
    assert_eq!(document.parent(), None);
  }

  #[test]
  fn parse_rejects_empty_segments() {
    assert!(Path::parse("").is_err());
    assert!(Path::parse("a..b").is_err());
    assert!(Path::parse(".a").is_err());
    assert_eq!(Path::parse("a.b").unwrap().depth(), 2);
  }

  #[test]
  fn serializes_as_dotted_string() {
    let path = Path::parse("window.location.href").unwrap();
    let json = serde_json::to_string(&path).unwrap();
    assert_eq!(json, "\"window.location.href\"");
    let back: Path = serde_json::from_str(&json).unwrap();
    assert_eq!(back, path);
    assert!(serde_json::from_str::<Path>("\"a..b\"").is_err());
  }
}
