//! A small in-memory object graph that stands in for a live browser environment.
//!
//! Objects are addressed by [`ObjectId`] handles and strings by [`StringId`] handles, so [`Value`] is
//! `Copy` and many wrappers can alias the same object without any ownership bookkeeping. A heap can
//! be loaded from a JSON snapshot (see [`Heap::load_json`]).

use ahash::HashMap;
use ahash::HashSet;
use ahash::HashSetExt;
use serde_json::Map;
use serde_json::Number;

use crate::error::HeapError;
use crate::error::Limit;
use crate::model::ObjectModel;

/// JSON key that names an object's interface instead of becoming a property.
pub const CLASS_KEY: &str = "$class";

/// Handle to an object in the [`Heap`] that allocated it.
///
/// Handles can only be minted by a heap:
///
/// ```compile_fail
/// let forged = member_js::ObjectId(0);
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct ObjectId(pub(crate) u32);

/// Handle to a string in the [`Heap`] that allocated it.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct StringId(pub(crate) u32);

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Value {
  Undefined,
  Null,
  Bool(bool),
  Number(f64),
  String(StringId),
  Object(ObjectId),
}

#[derive(Debug, Default)]
pub struct ObjectData {
  /// Interface name of the object, e.g. `HTMLDivElement`.
  pub class: Option<String>,
  props: Vec<(String, Value)>,
  index: HashMap<String, usize>,
}

impl ObjectData {
  pub fn get(&self, key: &str) -> Option<Value> {
    self.index.get(key).map(|&i| self.props[i].1)
  }

  /// Properties in insertion order.
  pub fn props(&self) -> impl Iterator<Item = (&str, Value)> {
    self.props.iter().map(|(k, v)| (k.as_str(), *v))
  }

  fn set(&mut self, key: &str, value: Value) {
    match self.index.get(key) {
      Some(&i) => self.props[i].1 = value,
      None => {
        self.index.insert(key.to_string(), self.props.len());
        self.props.push((key.to_string(), value));
      }
    }
  }
}

/// Resource limits for heap growth, mostly relevant when loading untrusted snapshots.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct HeapLimits {
  pub max_objects: usize,
  /// Maximum length of a single string, in bytes.
  pub max_string_length: usize,
}

impl Default for HeapLimits {
  fn default() -> Self {
    Self {
      max_objects: 1 << 20,
      max_string_length: 1 << 20,
    }
  }
}

#[derive(Debug, Default)]
pub struct Heap {
  limits: HeapLimits,
  strings: Vec<String>,
  objects: Vec<ObjectData>,
}

impl Heap {
  pub fn new(limits: HeapLimits) -> Self {
    Self {
      limits,
      strings: Vec::new(),
      objects: Vec::new(),
    }
  }

  pub fn limits(&self) -> HeapLimits {
    self.limits
  }

  pub fn alloc_string(&mut self, s: &str) -> Result<Value, HeapError> {
    if s.len() > self.limits.max_string_length {
      return Err(HeapError::LimitExceeded {
        limit: Limit::MaxStringLength,
        got: s.len(),
        max: self.limits.max_string_length,
      });
    }
    let id = StringId(self.strings.len() as u32);
    self.strings.push(s.to_string());
    Ok(Value::String(id))
  }

  pub fn alloc_object(&mut self, class: Option<&str>) -> Result<ObjectId, HeapError> {
    if self.objects.len() >= self.limits.max_objects {
      return Err(HeapError::LimitExceeded {
        limit: Limit::MaxObjects,
        got: self.objects.len() + 1,
        max: self.limits.max_objects,
      });
    }
    let id = ObjectId(self.objects.len() as u32);
    self.objects.push(ObjectData {
      class: class.map(str::to_string),
      ..ObjectData::default()
    });
    Ok(id)
  }

  /// Sets (or overwrites) a property. Cycles are allowed.
  ///
  /// Like [`Heap::object`] and [`Heap::string`], panics if the handle came from a different heap.
  pub fn set(&mut self, object: ObjectId, key: &str, value: Value) {
    self.objects[object.0 as usize].set(key, value);
  }

  pub fn object(&self, id: ObjectId) -> &ObjectData {
    &self.objects[id.0 as usize]
  }

  pub fn string(&self, id: StringId) -> &str {
    &self.strings[id.0 as usize]
  }

  pub fn object_count(&self) -> usize {
    self.objects.len()
  }

  /// The interface name of `value`, if it is an object that has one.
  pub fn class_of(&self, value: Value) -> Option<&str> {
    match value {
      Value::Object(id) => self.object(id).class.as_deref(),
      _ => None,
    }
  }

  /// Converts a JSON snapshot into heap values.
  ///
  /// Objects become heap objects; a string-valued `"$class"` key sets the object's interface name.
  /// Arrays become objects with index keys and a `length`.
  pub fn load_json(&mut self, json: &serde_json::Value) -> Result<Value, HeapError> {
    Ok(match json {
      serde_json::Value::Null => Value::Null,
      serde_json::Value::Bool(b) => Value::Bool(*b),
      serde_json::Value::Number(n) => Value::Number(n.as_f64().unwrap_or(f64::NAN)),
      serde_json::Value::String(s) => self.alloc_string(s)?,
      serde_json::Value::Array(items) => {
        let obj = self.alloc_object(Some("Array"))?;
        for (i, item) in items.iter().enumerate() {
          let v = self.load_json(item)?;
          self.set(obj, &i.to_string(), v);
        }
        self.set(obj, "length", Value::Number(items.len() as f64));
        Value::Object(obj)
      }
      serde_json::Value::Object(map) => {
        let class = match map.get(CLASS_KEY) {
          Some(serde_json::Value::String(class)) => Some(class.as_str()),
          _ => None,
        };
        let obj = self.alloc_object(class)?;
        for (k, item) in map {
          if k == CLASS_KEY && class.is_some() {
            continue;
          }
          let v = self.load_json(item)?;
          self.set(obj, k, v);
        }
        Value::Object(obj)
      }
    })
  }

  /// Converts a value back to JSON, for display.
  ///
  /// `undefined` and non-finite numbers become `null`; an object reached again through its own
  /// properties is rendered as the string `"[Circular]"`. Objects of class `Array` become JSON
  /// arrays of their indices below `length`, with holes as `null`.
  pub fn to_json(&self, value: Value) -> serde_json::Value {
    let mut stack = HashSet::new();
    self.to_json_inner(value, &mut stack)
  }

  fn to_json_inner(&self, value: Value, stack: &mut HashSet<ObjectId>) -> serde_json::Value {
    match value {
      Value::Undefined | Value::Null => serde_json::Value::Null,
      Value::Bool(b) => serde_json::Value::Bool(b),
      Value::Number(n) => Number::from_f64(n)
        .map(serde_json::Value::Number)
        .unwrap_or(serde_json::Value::Null),
      Value::String(id) => serde_json::Value::String(self.string(id).to_string()),
      Value::Object(id) => {
        if !stack.insert(id) {
          return serde_json::Value::String("[Circular]".to_string());
        }
        let data = self.object(id);
        if data.class.as_deref() == Some("Array") {
          let items = (0..array_length(data))
            .map(|i| match data.get(&i.to_string()) {
              Some(v) => self.to_json_inner(v, stack),
              None => serde_json::Value::Null,
            })
            .collect();
          stack.remove(&id);
          return serde_json::Value::Array(items);
        }
        let mut map = Map::new();
        if let Some(class) = &data.class {
          map.insert(CLASS_KEY.to_string(), serde_json::Value::String(class.clone()));
        }
        for (k, v) in data.props() {
          map.insert(k.to_string(), self.to_json_inner(v, stack));
        }
        stack.remove(&id);
        serde_json::Value::Object(map)
      }
    }
  }
}

/// `length` of an array-like object, capped at its property count so a bogus length cannot blow up.
fn array_length(data: &ObjectData) -> usize {
  match data.get("length") {
    Some(Value::Number(n)) if n.is_finite() && n >= 0.0 => (n as usize).min(data.props.len()),
    _ => 0,
  }
}

impl ObjectModel for Heap {
  type Value = Value;

  fn get(&self, target: Value, key: &str) -> Option<Value> {
    match target {
      Value::Object(id) => self.object(id).get(key),
      // Strings expose their length like they do in a browser.
      Value::String(id) if key == "length" => {
        Some(Value::Number(self.string(id).encode_utf16().count() as f64))
      }
      _ => None,
    }
  }

  fn is_undefined(&self, value: Value) -> bool {
    matches!(value, Value::Undefined)
  }

  fn is_object(&self, value: Value) -> bool {
    matches!(value, Value::Object(_))
  }

  fn same_value(&self, a: Value, b: Value) -> bool {
    match (a, b) {
      (Value::Number(x), Value::Number(y)) => {
        (x.is_nan() && y.is_nan()) || (x == y && x.is_sign_negative() == y.is_sign_negative())
      }
      (Value::String(x), Value::String(y)) => self.string(x) == self.string(y),
      (Value::Object(x), Value::Object(y)) => x == y,
      (a, b) => a == b,
    }
  }

  fn type_of(&self, value: Value) -> &'static str {
    match value {
      Value::Undefined => "undefined",
      Value::Null => "null",
      Value::Bool(_) => "boolean",
      Value::Number(_) => "number",
      Value::String(_) => "string",
      Value::Object(_) => "object",
    }
  }
}
