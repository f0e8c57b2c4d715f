//! In-memory [`Host`] implementation over a captured snapshot of a program.
//!
//! A snapshot holds a set of named root values, the typedefs and type sizes
//! needed to interpret them, and regions of memory holding array elements.
//! It is used to inspect arrays without a live debugger, eg. from
//! the `fclview` command-line tool or from tests.
//!
//! With the `serde` feature, snapshots can be loaded from JSON:
//!
//! ```json
//! {
//!   "typedefs": { "RealArray": "ObjexxFCL::Array1D<double>" },
//!   "memory": [
//!     { "address": 4096, "element_type": "double", "values": [{ "float": 0.5 }] }
//!   ],
//!   "values": {
//!     "x": { "object": { "type_name": "RealArray", "fields": {
//!       "I1_": { "object": { "type_name": "ObjexxFCL::IndexRange",
//!                            "fields": { "l_": { "int": 1 }, "u_": { "int": 1 } } } },
//!       "data_": { "pointer": { "target": "double", "address": 4096 } }
//!     } } }
//!   }
//! }
//! ```

use std::collections::BTreeMap;
use std::error::Error;
use std::fmt;

use rustc_hash::FxHashMap;

use crate::host::Host;

/// Width of pointer types in the inspected program.
pub const POINTER_SIZE: usize = 8;

/// Sizes of the C++ scalar types known to every snapshot.
const BUILTIN_TYPE_SIZES: &[(&str, usize)] = &[
    ("bool", 1),
    ("char", 1),
    ("signed char", 1),
    ("unsigned char", 1),
    ("short", 2),
    ("unsigned short", 2),
    ("int", 4),
    ("unsigned int", 4),
    ("float", 4),
    ("long", 8),
    ("unsigned long", 8),
    ("long long", 8),
    ("unsigned long long", 8),
    ("double", 8),
    ("long double", 16),
    ("std::size_t", 8),
];

/// A value in a snapshot.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum Value {
    Int(i64),
    Float(f64),
    Bool(bool),

    /// Pointer to a value of type `target`.
    Pointer { target: String, address: u64 },

    /// Struct or class instance with named members.
    Object {
        type_name: String,
        fields: BTreeMap<String, Value>,
    },
}

impl Value {
    /// Create a pointer to `target` at `address`.
    pub fn pointer(target: impl Into<String>, address: u64) -> Value {
        Value::Pointer {
            target: target.into(),
            address,
        }
    }

    /// Create an object with the given type and members.
    pub fn object<K: Into<String>>(
        type_name: impl Into<String>,
        fields: impl IntoIterator<Item = (K, Value)>,
    ) -> Value {
        Value::Object {
            type_name: type_name.into(),
            fields: fields.into_iter().map(|(k, v)| (k.into(), v)).collect(),
        }
    }
}

/// Renders values the way a debugger prints them without a pretty-printer.
impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Int(n) => write!(f, "{}", n),
            Value::Float(x) => write!(f, "{}", x),
            Value::Bool(b) => write!(f, "{}", b),
            Value::Pointer { target, address } => write!(f, "({} *) {:#x}", target, address),
            Value::Object { fields, .. } => {
                write!(f, "{{")?;
                for (i, (name, value)) in fields.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{} = {}", name, value)?;
                }
                write!(f, "}}")
            }
        }
    }
}

/// A contiguous run of elements of one type, starting at `address`.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
pub struct Region {
    pub address: u64,
    pub element_type: String,
    pub values: Vec<Value>,
}

impl Region {
    pub fn new(address: u64, element_type: impl Into<String>, values: Vec<Value>) -> Region {
        Region {
            address,
            element_type: element_type.into(),
            values,
        }
    }
}

/// Errors reported by [`Snapshot`] when serving host requests.
#[derive(Clone, Debug, PartialEq)]
pub enum SnapshotError {
    /// No memory region contains the address.
    UnmappedAddress(u64),

    /// The address lies inside a region but not on an element boundary.
    MisalignedAddress(u64),

    /// The requested type differs from the type stored in the region.
    TypeMismatch { requested: String, stored: String },

    /// The size of a type is not known.
    UnknownTypeSize(String),

    /// A pointer was expected, but a value or type of another kind was given.
    NotAPointer(String),

    /// An integer was expected, but a value of another type was given.
    NotAnInteger(String),
}

impl fmt::Display for SnapshotError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UnmappedAddress(addr) => write!(f, "cannot access memory at {:#x}", addr),
            Self::MisalignedAddress(addr) => {
                write!(f, "address {:#x} is not on an element boundary", addr)
            }
            Self::TypeMismatch { requested, stored } => write!(
                f,
                "cannot read \"{}\" from memory holding \"{}\"",
                requested, stored
            ),
            Self::UnknownTypeSize(ty) => write!(f, "size of type \"{}\" is unknown", ty),
            Self::NotAPointer(ty) => write!(f, "type \"{}\" is not a pointer", ty),
            Self::NotAnInteger(ty) => write!(f, "type \"{}\" is not an integer", ty),
        }
    }
}

impl Error for SnapshotError {}

/// Captured state of an inspected program.
#[derive(Clone, Debug)]
pub struct Snapshot {
    typedefs: FxHashMap<String, String>,
    type_sizes: FxHashMap<String, usize>,

    /// Memory regions, sorted by start address.
    regions: Vec<Region>,

    roots: BTreeMap<String, Value>,
}

impl Snapshot {
    /// Create an empty snapshot which knows the sizes of builtin scalar
    /// types.
    pub fn new() -> Snapshot {
        Snapshot {
            typedefs: FxHashMap::default(),
            type_sizes: BUILTIN_TYPE_SIZES
                .iter()
                .map(|&(name, size)| (name.to_string(), size))
                .collect(),
            regions: Vec::new(),
            roots: BTreeMap::new(),
        }
    }

    /// Declare `alias` as another name for `target`.
    pub fn add_typedef(&mut self, alias: impl Into<String>, target: impl Into<String>) {
        self.typedefs.insert(alias.into(), target.into());
    }

    /// Set the size in bytes of a type.
    pub fn set_type_size(&mut self, ty: impl Into<String>, size: usize) {
        self.type_sizes.insert(ty.into(), size);
    }

    /// Add a region of memory.
    ///
    /// If regions overlap, reads are served from the region with the highest
    /// start address at or below the requested address.
    pub fn add_region(&mut self, region: Region) {
        let pos = self
            .regions
            .partition_point(|r| r.address <= region.address);
        self.regions.insert(pos, region);
    }

    /// Add a named root value, replacing any previous value with that name.
    pub fn insert_root(&mut self, name: impl Into<String>, value: Value) {
        self.roots.insert(name.into(), value);
    }

    /// Return the root value with a given name.
    pub fn root(&self, name: &str) -> Option<&Value> {
        self.roots.get(name)
    }

    /// Iterate over root values, ordered by name.
    pub fn roots(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.roots.iter().map(|(name, value)| (name.as_str(), value))
    }

    /// Load a snapshot from a JSON file.
    #[cfg(feature = "serde")]
    pub fn from_file<P: AsRef<std::path::Path>>(path: P) -> Result<Snapshot, FromJsonError> {
        let content = std::fs::read_to_string(path).map_err(FromJsonError::IoError)?;
        Self::from_json(&content)
    }

    /// Load a snapshot from JSON.
    #[cfg(feature = "serde")]
    pub fn from_json(json: &str) -> Result<Snapshot, FromJsonError> {
        let parsed: json::SnapshotJson =
            serde_json::from_str(json).map_err(FromJsonError::JsonError)?;

        let mut snapshot = Snapshot::new();
        for (alias, target) in parsed.typedefs {
            snapshot.add_typedef(alias, target);
        }
        for (ty, size) in parsed.type_sizes {
            snapshot.set_type_size(ty, size);
        }
        for region in parsed.memory {
            snapshot.add_region(region);
        }
        for (name, value) in parsed.values {
            snapshot.insert_root(name, value);
        }
        Ok(snapshot)
    }

    /// Resolve typedefs of `ty`. Cyclic typedefs resolve to an arbitrary
    /// member of the cycle.
    fn canonical<'a>(&'a self, mut ty: &'a str) -> &'a str {
        for _ in 0..=self.typedefs.len() {
            match self.typedefs.get(ty) {
                Some(target) => ty = target.as_str(),
                None => break,
            }
        }
        ty
    }

    fn find_region(&self, address: u64) -> Option<&Region> {
        let pos = self.regions.partition_point(|r| r.address <= address);
        pos.checked_sub(1).map(|i| &self.regions[i])
    }
}

impl Default for Snapshot {
    fn default() -> Self {
        Self::new()
    }
}

impl Host for Snapshot {
    type Value = Value;
    type Type = String;
    type Error = SnapshotError;

    fn type_of(&self, value: &Value) -> String {
        match value {
            Value::Int(_) => "int".into(),
            Value::Float(_) => "double".into(),
            Value::Bool(_) => "bool".into(),
            Value::Pointer { target, .. } => format!("{} *", target),
            Value::Object { type_name, .. } => type_name.clone(),
        }
    }

    fn strip_aliases(&self, ty: &String) -> String {
        self.canonical(ty).to_string()
    }

    fn type_name(&self, ty: &String) -> String {
        ty.clone()
    }

    fn field(&self, value: &Value, name: &str) -> Option<Value> {
        match value {
            Value::Object { fields, .. } => fields.get(name).cloned(),
            _ => None,
        }
    }

    fn as_integer(&self, value: &Value) -> Result<i64, SnapshotError> {
        match value {
            Value::Int(n) => Ok(*n),
            Value::Bool(b) => Ok(*b as i64),
            _ => Err(SnapshotError::NotAnInteger(self.type_of(value))),
        }
    }

    fn pointee_type(&self, pointer_type: &String) -> Result<String, SnapshotError> {
        let canonical = self.canonical(pointer_type);
        canonical
            .trim_end()
            .strip_suffix('*')
            .map(|target| target.trim_end().to_string())
            .ok_or_else(|| SnapshotError::NotAPointer(canonical.to_string()))
    }

    fn size_of(&self, ty: &String) -> Result<usize, SnapshotError> {
        let canonical = self.canonical(ty);
        if canonical.trim_end().ends_with('*') {
            return Ok(POINTER_SIZE);
        }
        self.type_sizes
            .get(canonical)
            .copied()
            .ok_or_else(|| SnapshotError::UnknownTypeSize(canonical.to_string()))
    }

    fn pointer_address(&self, pointer: &Value) -> Result<u64, SnapshotError> {
        match pointer {
            Value::Pointer { address, .. } => Ok(*address),
            _ => Err(SnapshotError::NotAPointer(self.type_of(pointer))),
        }
    }

    fn read_element(&self, address: u64, ty: &String) -> Result<Value, SnapshotError> {
        let region = self
            .find_region(address)
            .ok_or(SnapshotError::UnmappedAddress(address))?;

        let stored = self.canonical(&region.element_type);
        let requested = self.canonical(ty);
        let size = self.size_of(&region.element_type)? as u64;

        let delta = address - region.address;
        let index = delta / size.max(1);
        if index >= region.values.len() as u64 {
            return Err(SnapshotError::UnmappedAddress(address));
        }
        if size > 0 && delta % size != 0 {
            return Err(SnapshotError::MisalignedAddress(address));
        }
        if requested != stored {
            return Err(SnapshotError::TypeMismatch {
                requested: requested.to_string(),
                stored: stored.to_string(),
            });
        }

        Ok(region.values[index as usize].clone())
    }

    fn format_pointer(&self, pointer: &Value) -> String {
        match pointer {
            Value::Pointer { address, .. } => format!("{:#x}", address),
            other => other.to_string(),
        }
    }
}

/// Errors returned by [`Snapshot::from_json`].
#[cfg(feature = "serde")]
#[derive(Debug)]
pub enum FromJsonError {
    /// There was an error reading the JSON data from a file.
    IoError(std::io::Error),
    /// There was an error decoding the JSON data.
    JsonError(serde_json::Error),
}

#[cfg(feature = "serde")]
impl fmt::Display for FromJsonError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::IoError(err) => fmt::Display::fmt(err, f),
            Self::JsonError(err) => write!(f, "JSON error {}", err),
        }
    }
}

#[cfg(feature = "serde")]
impl Error for FromJsonError {}

#[cfg(feature = "serde")]
mod json {
    use std::collections::BTreeMap;

    use serde::Deserialize;

    use super::{Region, Value};

    #[derive(Deserialize)]
    #[serde(deny_unknown_fields)]
    pub(crate) struct SnapshotJson {
        #[serde(default)]
        pub typedefs: BTreeMap<String, String>,
        #[serde(default)]
        pub type_sizes: BTreeMap<String, usize>,
        #[serde(default)]
        pub memory: Vec<Region>,
        #[serde(default)]
        pub values: BTreeMap<String, Value>,
    }
}
