//! fclview provides debugger pretty-printers for ObjexxFCL multi-dimensional
//! arrays.
//!
//! ObjexxFCL arrays (`Array1` .. `Array6` and their `Array1D`-style variants)
//! store their elements contiguously in column-major order, with inclusive
//! per-axis index ranges that need not start at 1. A debugger only sees the
//! raw members, so without help an `Array2D<double>` shows up as a pair of
//! index ranges and a bare pointer. This crate turns such an object into a
//! one-line summary plus a lazily produced list of `(index label, element)`
//! pairs.
//!
//! # Hosts
//!
//! The crate never reads process memory itself. Everything it knows about
//! the inspected program is obtained through the [`Host`] trait, which a
//! debugger integration implements. For offline use and tests,
//! [`snapshot::Snapshot`] implements `Host` over an in-memory description of
//! objects, typedefs and memory regions, which can also be loaded from JSON
//! when the `serde` feature is enabled.
//!
//! # Printing values
//!
//! The host's extension-loading entry point creates a [`PrinterRegistry`]
//! and consults it whenever a value is displayed:
//!
//! ```
//! use fclview::snapshot::{Region, Snapshot, Value};
//! use fclview::PrinterRegistry;
//!
//! let mut snapshot = Snapshot::new();
//! snapshot.add_region(Region::new(
//!     0x1000,
//!     "int",
//!     vec![Value::Int(10), Value::Int(20), Value::Int(30)],
//! ));
//! let array = Value::object(
//!     "ObjexxFCL::Array1D<int>",
//!     [
//!         (
//!             "I1_",
//!             Value::object(
//!                 "ObjexxFCL::IndexRange",
//!                 [("l_", Value::Int(0)), ("u_", Value::Int(2))],
//!             ),
//!         ),
//!         ("data_", Value::pointer("int", 0x1000)),
//!     ],
//! );
//!
//! let registry = PrinterRegistry::<Snapshot>::with_builtin_printers();
//! let printer = registry.lookup(&snapshot, &array).unwrap().unwrap();
//! assert_eq!(printer.summary(), "ObjexxFCL::Array1D<int> [{0:2}] at 0x1000");
//!
//! let labels: Vec<String> = printer.children().map(|(label, _)| label).collect();
//! assert_eq!(labels, ["0", "1", "2"]);
//! ```
//!
//! Values the registry declines, or arrays whose view could not be
//! constructed, should be shown with the host's generic rendering.
//!
//! Code that only needs the array view can use [`ArrayView`] directly.

mod convention;
mod dims;
mod errors;
mod host;
mod index_iterator;
mod layout;
mod matcher;
mod registry;
mod view;

pub mod snapshot;

pub use convention::NamingConvention;
pub use dims::{DimBounds, IndexLabel, MAX_RANK};
pub use errors::ViewError;
pub use host::Host;
pub use index_iterator::{Index, Indices};
pub use layout::ColumnMajorLayout;
pub use matcher::ArrayMatcher;
pub use registry::{Children, LookupResult, PrinterMatcher, PrinterRegistry, ValuePrinter};
pub use view::{ArrayView, Elements};
