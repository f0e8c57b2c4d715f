//! Interface to the debugging environment that owns the inspected program.

use std::error::Error;
use std::fmt::Debug;

/// Access to the objects, types and memory of an inspected program.
///
/// This is implemented by the debugger integration (or by
/// [`Snapshot`](crate::snapshot::Snapshot) for offline use). The view code
/// never reads raw bytes itself. It only navigates fields, resolves types
/// and asks the host to read whole elements at computed addresses.
///
/// All methods are expected to be synchronous and cheap relative to
/// interactive use.
pub trait Host {
    /// Handle to a value in the inspected program, eg. a struct, a pointer
    /// or a scalar.
    type Value: Clone + Debug;

    /// Handle to a type in the inspected program.
    type Type: Clone + Debug;

    /// Error returned when the host cannot complete a request, eg. because
    /// memory is unreadable.
    type Error: Error + Send + Sync + 'static;

    /// Return the type of a value, as declared.
    fn type_of(&self, value: &Self::Value) -> Self::Type;

    /// Resolve any typedefs/aliases wrapping `ty`.
    fn strip_aliases(&self, ty: &Self::Type) -> Self::Type;

    /// Return the name of a type as the debugger would print it.
    fn type_name(&self, ty: &Self::Type) -> String;

    /// Return the named member of a struct-like value, or `None` if there
    /// is no such member.
    fn field(&self, value: &Self::Value, name: &str) -> Option<Self::Value>;

    /// Convert a value to an integer.
    fn as_integer(&self, value: &Self::Value) -> Result<i64, Self::Error>;

    /// Return the type that a pointer type points to.
    fn pointee_type(&self, pointer_type: &Self::Type) -> Result<Self::Type, Self::Error>;

    /// Return the size in bytes of values of type `ty`.
    fn size_of(&self, ty: &Self::Type) -> Result<usize, Self::Error>;

    /// Return the address stored in a pointer value.
    fn pointer_address(&self, pointer: &Self::Value) -> Result<u64, Self::Error>;

    /// Read a value of type `ty` stored at `address`.
    fn read_element(&self, address: u64, ty: &Self::Type) -> Result<Self::Value, Self::Error>;

    /// Format a pointer value for display.
    fn format_pointer(&self, pointer: &Self::Value) -> String;
}
