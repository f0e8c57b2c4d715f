use tracing::debug;

use crate::convention::NamingConvention;
use crate::errors::ViewError;
use crate::host::Host;
use crate::view::ArrayView;

/// Recognizes objects of the array family and builds views of them.
#[derive(Clone, Debug, Default)]
pub struct ArrayMatcher {
    convention: NamingConvention,
}

impl ArrayMatcher {
    /// Create a matcher for arrays following `convention`.
    pub fn new(convention: NamingConvention) -> ArrayMatcher {
        ArrayMatcher { convention }
    }

    /// Return the naming convention used to recognize and decode arrays.
    pub fn convention(&self) -> &NamingConvention {
        &self.convention
    }

    /// Return true if the canonical type of `value` belongs to the array
    /// family.
    pub fn matches<H: Host>(&self, host: &H, value: &H::Value) -> bool {
        let canonical = host.strip_aliases(&host.type_of(value));
        self.convention.matches_type_name(&host.type_name(&canonical))
    }

    /// Build a view of `value` if it is an array.
    ///
    /// Returns `None` if the value is not an array. Returns `Some(Err(..))`
    /// if it is an array but the view could not be constructed, in which
    /// case the caller should fall back to a generic rendering.
    pub fn build<'h, H: Host>(
        &self,
        host: &'h H,
        value: &H::Value,
    ) -> Option<Result<ArrayView<'h, H>, ViewError>> {
        if !self.matches(host, value) {
            return None;
        }
        let view = ArrayView::with_convention(host, value, &self.convention);
        if let Err(err) = &view {
            debug!(%err, "array type matched but view construction failed");
        }
        Some(view)
    }
}
