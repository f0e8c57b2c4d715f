use tracing::trace;

use crate::convention::NamingConvention;
use crate::errors::ViewError;
use crate::host::Host;
use crate::matcher::ArrayMatcher;
use crate::view::ArrayView;

/// Iterator over the `(label, element)` children of a printed value.
pub type Children<'a, H> =
    Box<dyn Iterator<Item = (String, Result<<H as Host>::Value, <H as Host>::Error>)> + 'a>;

/// A pretty-printer for one value, in the shape debuggers expect: a summary
/// line plus an optional lazy sequence of labeled children.
pub trait ValuePrinter<H: Host> {
    /// Return the one-line description of the value.
    fn summary(&self) -> String;

    /// Return the children of the value. The host may stop iterating at any
    /// point, eg. to truncate long arrays.
    fn children(&self) -> Children<'_, H>;
}

impl<H: Host> ValuePrinter<H> for ArrayView<'_, H> {
    fn summary(&self) -> String {
        ArrayView::summary(self)
    }

    fn children(&self) -> Children<'_, H> {
        Box::new(self.elements().map(|(label, elem)| (label.to_string(), elem)))
    }
}

/// Result of asking a matcher to print a value.
pub type LookupResult<'h, H> = Option<Result<Box<dyn ValuePrinter<H> + 'h>, ViewError>>;

/// Decides whether it can print a value and, if so, creates a printer.
pub trait PrinterMatcher<H: Host> {
    /// Name shown when listing registered printers.
    fn name(&self) -> &str;

    /// Return `None` if this matcher does not handle `value`, or the result
    /// of constructing a printer for it otherwise.
    fn lookup<'h>(&self, host: &'h H, value: &H::Value) -> LookupResult<'h, H>;
}

impl<H: Host> PrinterMatcher<H> for ArrayMatcher {
    fn name(&self) -> &str {
        &self.convention().family_prefix
    }

    fn lookup<'h>(&self, host: &'h H, value: &H::Value) -> LookupResult<'h, H> {
        let view = self.build(host, value)?;
        Some(view.map(|view| Box::new(view) as Box<dyn ValuePrinter<H> + 'h>))
    }
}

/// Ordered list of pretty-printers consulted when a value is displayed.
///
/// New registries have no printers registered. To create a registry with the
/// built-in array printer, use [`PrinterRegistry::with_builtin_printers`].
/// The host's extension-loading entry point builds the registry once and
/// passes it to whatever code needs to render values.
///
/// ```
/// use fclview::snapshot::{Snapshot, Value};
/// use fclview::PrinterRegistry;
///
/// let snapshot = Snapshot::new();
/// let registry = PrinterRegistry::<Snapshot>::with_builtin_printers();
///
/// // Values that are not arrays are left to the host's generic rendering.
/// assert!(registry.lookup(&snapshot, &Value::Int(1)).is_none());
/// ```
pub struct PrinterRegistry<H: Host> {
    matchers: Vec<Box<dyn PrinterMatcher<H>>>,
}

impl<H: Host> PrinterRegistry<H> {
    /// Create a new empty registry.
    pub fn new() -> PrinterRegistry<H> {
        PrinterRegistry {
            matchers: Vec::new(),
        }
    }

    /// Create a registry with the printer for ObjexxFCL arrays registered.
    pub fn with_builtin_printers() -> PrinterRegistry<H> {
        Self::with_convention(NamingConvention::default())
    }

    /// Create a registry with the array printer registered, using a custom
    /// naming convention.
    pub fn with_convention(convention: NamingConvention) -> PrinterRegistry<H> {
        let mut reg = Self::new();
        reg.register(ArrayMatcher::new(convention));
        reg
    }

    /// Append a matcher. Matchers are consulted in registration order.
    pub fn register<M: PrinterMatcher<H> + 'static>(&mut self, matcher: M) {
        self.matchers.push(Box::new(matcher));
    }

    /// Return the number of registered matchers.
    pub fn len(&self) -> usize {
        self.matchers.len()
    }

    /// Return true if no matchers are registered.
    pub fn is_empty(&self) -> bool {
        self.matchers.is_empty()
    }

    /// Return the names of registered matchers, in consultation order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.matchers.iter().map(|m| m.name())
    }

    /// Find a printer for `value`.
    ///
    /// Returns the result of the first matcher that handles the value, or
    /// `None` if no matcher does, in which case the host should use its
    /// generic rendering.
    pub fn lookup<'h>(&self, host: &'h H, value: &H::Value) -> LookupResult<'h, H> {
        let found = self.matchers.iter().find_map(|m| m.lookup(host, value));
        if found.is_none() {
            trace!(ty = ?host.type_of(value), "no printer matched");
        }
        found
    }
}

impl<H: Host> Default for PrinterRegistry<H> {
    fn default() -> Self {
        Self::new()
    }
}
