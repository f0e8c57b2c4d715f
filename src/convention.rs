//! Field and type names used to recognize and decode array objects.

/// Naming convention of the inspected array library.
///
/// The defaults describe the ObjexxFCL `Array1` .. `Array6` classes, where
/// each axis `n` has an index-range member `In_` holding inclusive bounds in
/// `l_` and `u_`, and the elements are stored behind a `data_` pointer.
/// Older single-axis arrays name their range member `I_`.
///
/// With the `serde` feature a convention can be loaded from JSON, where any
/// omitted field keeps its default.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct NamingConvention {
    /// Prefix of canonical type names that are treated as arrays.
    pub family_prefix: String,

    /// Prefix of the numbered per-axis range member.
    pub bound_field_prefix: String,

    /// Suffix of the numbered per-axis range member.
    pub bound_field_suffix: String,

    /// Unnumbered range member probed for axis 1 when the numbered one is
    /// missing.
    pub legacy_bound_field: String,

    /// Member of the range holding the lower bound.
    pub lower_field: String,

    /// Member of the range holding the upper bound.
    pub upper_field: String,

    /// Member holding the pointer to the first element.
    pub data_field: String,
}

impl NamingConvention {
    /// Return the name of the range member for a one-based axis number.
    pub fn bound_field(&self, axis: usize) -> String {
        format!(
            "{}{}{}",
            self.bound_field_prefix, axis, self.bound_field_suffix
        )
    }

    /// Return true if a canonical type name belongs to the array family.
    pub fn matches_type_name(&self, canonical_name: &str) -> bool {
        canonical_name.starts_with(&self.family_prefix)
    }

    /// Parse a convention from JSON.
    #[cfg(feature = "serde")]
    pub fn from_json(json: &str) -> Result<NamingConvention, serde_json::Error> {
        serde_json::from_str(json)
    }
}

impl Default for NamingConvention {
    fn default() -> Self {
        NamingConvention {
            family_prefix: "ObjexxFCL::Array".into(),
            bound_field_prefix: "I".into(),
            bound_field_suffix: "_".into(),
            legacy_bound_field: "I_".into(),
            lower_field: "l_".into(),
            upper_field: "u_".into(),
            data_field: "data_".into(),
        }
    }
}
