//! Runtime values and object instances
//!
//! Accessors read and write `Value`s. Objects are shared handles
//! (`ObjectRef`) to an `Instance` holding its runtime type name and one
//! slot per instance field declared anywhere in its class chain.

use std::fmt;
use std::sync::Arc;

use parking_lot::{RwLock, RwLockReadGuard, RwLockWriteGuard};
use rustc_hash::FxHashMap;

use crate::error::InvocationError;

/// A dynamically typed value
#[derive(Debug, Clone)]
pub enum Value {
    /// Null reference
    Null,
    /// Boolean
    Bool(bool),
    /// Any integral number
    Int(i64),
    /// Any floating point number
    Float(f64),
    /// Character
    Char(char),
    /// String
    Str(String),
    /// Array of values
    Array(Vec<Value>),
    /// Object reference
    Object(ObjectRef),
}

impl Value {
    /// Check if null
    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    /// Get as boolean
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Bool(b) => Some(*b),
            _ => None,
        }
    }

    /// Get as integer
    pub fn as_int(&self) -> Option<i64> {
        match self {
            Value::Int(i) => Some(*i),
            _ => None,
        }
    }

    /// Get as float (integers widen)
    pub fn as_float(&self) -> Option<f64> {
        match self {
            Value::Float(f) => Some(*f),
            Value::Int(i) => Some(*i as f64),
            _ => None,
        }
    }

    /// Get as string slice
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::Str(s) => Some(s),
            _ => None,
        }
    }

    /// Get as object reference
    pub fn as_object(&self) -> Option<&ObjectRef> {
        match self {
            Value::Object(obj) => Some(obj),
            _ => None,
        }
    }

    /// Short kind name used in diagnostics
    pub fn kind_name(&self) -> String {
        match self {
            Value::Null => "null".to_string(),
            Value::Bool(_) => "boolean".to_string(),
            Value::Int(_) => "int".to_string(),
            Value::Float(_) => "float".to_string(),
            Value::Char(_) => "char".to_string(),
            Value::Str(_) => "String".to_string(),
            Value::Array(_) => "array".to_string(),
            Value::Object(obj) => obj.type_name(),
        }
    }
}

impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Value::Null, Value::Null) => true,
            (Value::Bool(a), Value::Bool(b)) => a == b,
            (Value::Int(a), Value::Int(b)) => a == b,
            (Value::Float(a), Value::Float(b)) => a == b,
            (Value::Char(a), Value::Char(b)) => a == b,
            (Value::Str(a), Value::Str(b)) => a == b,
            (Value::Array(a), Value::Array(b)) => a == b,
            (Value::Object(a), Value::Object(b)) => a.ptr_eq(b),
            _ => false,
        }
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Bool(b)
    }
}

impl From<i32> for Value {
    fn from(i: i32) -> Self {
        Value::Int(i as i64)
    }
}

impl From<i64> for Value {
    fn from(i: i64) -> Self {
        Value::Int(i)
    }
}

impl From<f64> for Value {
    fn from(f: f64) -> Self {
        Value::Float(f)
    }
}

impl From<char> for Value {
    fn from(c: char) -> Self {
        Value::Char(c)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::Str(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::Str(s)
    }
}

impl From<ObjectRef> for Value {
    fn from(obj: ObjectRef) -> Self {
        Value::Object(obj)
    }
}

/// Field storage of one object
#[derive(Debug, Clone)]
pub struct Instance {
    type_name: String,
    fields: FxHashMap<String, Value>,
}

impl Instance {
    /// Create an instance with no field slots
    pub fn new(type_name: impl Into<String>) -> Self {
        Self {
            type_name: type_name.into(),
            fields: FxHashMap::default(),
        }
    }

    /// Runtime type name
    pub fn type_name(&self) -> &str {
        &self.type_name
    }

    /// Read a field slot
    pub fn get(&self, name: &str) -> Option<&Value> {
        self.fields.get(name)
    }

    /// Create or overwrite a field slot
    pub fn insert(&mut self, name: impl Into<String>, value: Value) {
        self.fields.insert(name.into(), value);
    }

    /// Check if a field slot exists
    pub fn has_field(&self, name: &str) -> bool {
        self.fields.contains_key(name)
    }
}

/// Shared, thread-safe handle to an instance
#[derive(Clone)]
pub struct ObjectRef(Arc<RwLock<Instance>>);

impl ObjectRef {
    /// Wrap an instance
    pub fn new(instance: Instance) -> Self {
        Self(Arc::new(RwLock::new(instance)))
    }

    /// Runtime type name
    pub fn type_name(&self) -> String {
        self.0.read().type_name.clone()
    }

    /// Read a field slot, failing if the slot does not exist
    pub fn field(&self, name: &str) -> Result<Value, InvocationError> {
        let instance = self.0.read();
        instance
            .get(name)
            .cloned()
            .ok_or_else(|| InvocationError::UnknownField {
                field: name.to_string(),
                type_name: instance.type_name.clone(),
            })
    }

    /// Overwrite an existing field slot
    pub fn set_field(&self, name: &str, value: Value) -> Result<(), InvocationError> {
        let mut instance = self.0.write();
        if let Some(slot) = instance.fields.get_mut(name) {
            *slot = value;
            return Ok(());
        }
        Err(InvocationError::UnknownField {
            field: name.to_string(),
            type_name: instance.type_name.clone(),
        })
    }

    /// Lock for reading
    pub fn read(&self) -> RwLockReadGuard<'_, Instance> {
        self.0.read()
    }

    /// Lock for writing
    pub fn write(&self) -> RwLockWriteGuard<'_, Instance> {
        self.0.write()
    }

    /// Identity comparison
    pub fn ptr_eq(&self, other: &ObjectRef) -> bool {
        Arc::ptr_eq(&self.0, &other.0)
    }
}

impl fmt::Debug for ObjectRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // Field values are skipped: objects may reference each other.
        write!(f, "ObjectRef({}@{:p})", self.type_name(), Arc::as_ptr(&self.0))
    }
}
