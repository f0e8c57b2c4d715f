use std::fmt;
use std::iter::FusedIterator;

use tracing::{debug, trace};

use crate::convention::NamingConvention;
use crate::dims::{format_bounds, shape_of, DimBounds, DimList, IndexLabel, MAX_RANK};
use crate::errors::ViewError;
use crate::host::Host;
use crate::index_iterator::{Index, Indices};
use crate::layout::ColumnMajorLayout;

/// Read-only projection over one array object in the inspected program.
///
/// A view is built from the object's fields when it is inspected: the rank
/// and bounds are discovered by probing the per-axis range members, and the
/// element type is derived from the type of the data pointer. The view does
/// not own or copy the array's memory. Elements are read from the host one
/// at a time as [`elements`](ArrayView::elements) is iterated.
pub struct ArrayView<'h, H: Host> {
    host: &'h H,

    /// Type of the array object, as declared (aliases not stripped).
    declared_type: H::Type,

    dims: DimList,
    layout: ColumnMajorLayout,

    data_ptr: H::Value,
    base_address: u64,
    elem_type: H::Type,

    /// Width of one element in bytes.
    elem_size: usize,
}

impl<'h, H: Host> ArrayView<'h, H> {
    /// Build a view of `value` using the default (ObjexxFCL) naming
    /// convention.
    pub fn new(host: &'h H, value: &H::Value) -> Result<Self, ViewError> {
        Self::with_convention(host, value, &NamingConvention::default())
    }

    /// Build a view of `value`, locating bounds and storage using the field
    /// names in `conv`.
    ///
    /// Fails with [`ViewError::BoundsNotFound`] if not even the first axis
    /// has readable bounds.
    pub fn with_convention(
        host: &'h H,
        value: &H::Value,
        conv: &NamingConvention,
    ) -> Result<Self, ViewError> {
        let dims = discover_bounds(host, value, conv);
        if dims.is_empty() {
            return Err(ViewError::BoundsNotFound);
        }

        let data_ptr = host.field(value, &conv.data_field).ok_or_else(|| {
            ViewError::StorageNotFound {
                field: conv.data_field.clone(),
            }
        })?;
        let elem_type = host
            .pointee_type(&host.type_of(&data_ptr))
            .map_err(ViewError::host)?;
        let elem_size = host.size_of(&elem_type).map_err(ViewError::host)?;
        let base_address = host.pointer_address(&data_ptr).map_err(ViewError::host)?;

        let layout =
            ColumnMajorLayout::from_shape(&shape_of(&dims)).ok_or(ViewError::TooLarge)?;

        // Make sure every element address is representable, so that address
        // arithmetic during traversal cannot overflow.
        let extent = (layout.len() as u64)
            .checked_mul(elem_size as u64)
            .ok_or(ViewError::TooLarge)?;
        base_address.checked_add(extent).ok_or(ViewError::TooLarge)?;

        let view = ArrayView {
            host,
            declared_type: host.type_of(value),
            dims,
            layout,
            data_ptr,
            base_address,
            elem_type,
            elem_size,
        };
        debug!(
            bounds = %format_bounds(&view.dims),
            len = view.len(),
            elem_size,
            "constructed array view"
        );

        Ok(view)
    }

    /// Return the number of dimensions.
    pub fn rank(&self) -> usize {
        self.dims.len()
    }

    /// Return the bounds of each dimension, in discovery order.
    pub fn dims(&self) -> &[DimBounds] {
        &self.dims
    }

    /// Return the size of each dimension.
    pub fn shape(&self) -> &[usize] {
        self.layout.shape()
    }

    /// Return the total number of elements.
    pub fn len(&self) -> usize {
        self.layout.len()
    }

    /// Return true if the array has no elements.
    pub fn is_empty(&self) -> bool {
        self.layout.is_empty()
    }

    /// Return the type of each element.
    pub fn elem_type(&self) -> &H::Type {
        &self.elem_type
    }

    /// Return the width of each element in bytes.
    pub fn elem_size(&self) -> usize {
        self.elem_size
    }

    /// Return the address of the first element.
    pub fn base_address(&self) -> u64 {
        self.base_address
    }

    /// Return the one-line description of the array, eg.
    /// `ObjexxFCL::Array2D<double> [{1:2} x {1:3}] at 0x1000`.
    pub fn summary(&self) -> String {
        format!(
            "{} [{}] at {}",
            self.host.type_name(&self.declared_type),
            format_bounds(&self.dims),
            self.host.format_pointer(&self.data_ptr)
        )
    }

    /// Return a lazy iterator over `(label, element)` pairs in column-major
    /// order.
    ///
    /// Each call returns a fresh iterator starting at the first element.
    /// Iteration can be abandoned at any point.
    pub fn elements(&self) -> Elements<'_, 'h, H> {
        Elements {
            view: self,
            indices: self.layout.indices(),
        }
    }

    /// Return the zero-based multi-index of the element at a linear
    /// position in storage order.
    pub fn index_of(&self, position: usize) -> Option<Index> {
        self.layout.index_of(position)
    }

    /// Return the label of the element at a linear position.
    pub fn label_of(&self, position: usize) -> Option<IndexLabel> {
        self.index_of(position)
            .map(|index| IndexLabel::new(&self.dims, &index))
    }

    /// Read the element at a linear position, or return `None` if the
    /// position is out of bounds.
    pub fn element_at(&self, position: usize) -> Option<Result<H::Value, H::Error>> {
        (position < self.len()).then(|| self.read(position))
    }

    /// Read the element at a storage offset that is known to be in bounds.
    fn read(&self, offset: usize) -> Result<H::Value, H::Error> {
        let address = self.base_address + offset as u64 * self.elem_size as u64;
        self.host.read_element(address, &self.elem_type)
    }
}

impl<H: Host> fmt::Debug for ArrayView<'_, H> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ArrayView")
            .field("declared_type", &self.declared_type)
            .field("dims", &self.dims.as_slice())
            .field("elem_type", &self.elem_type)
            .field("base_address", &format_args!("{:#x}", self.base_address))
            .finish()
    }
}

impl<H: Host> fmt::Display for ArrayView<'_, H> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.summary())
    }
}

/// Probe `value` for per-axis range members and decode their bounds.
///
/// Discovery stops at the first axis whose range is missing or cannot be
/// decoded. For the first axis only, the unnumbered legacy member is tried
/// before giving up.
fn discover_bounds<H: Host>(host: &H, value: &H::Value, conv: &NamingConvention) -> DimList {
    let mut dims = DimList::new();
    for axis in 1..=MAX_RANK {
        let bounds = read_bounds(host, value, &conv.bound_field(axis), conv).or_else(|| {
            if axis == 1 {
                read_bounds(host, value, &conv.legacy_bound_field, conv)
            } else {
                None
            }
        });
        match bounds {
            Some(bounds) => dims.push(bounds),
            None => break,
        }
    }
    dims
}

/// Decode the range member `field` of `value`. Any failure is reported as
/// `None`.
fn read_bounds<H: Host>(
    host: &H,
    value: &H::Value,
    field: &str,
    conv: &NamingConvention,
) -> Option<DimBounds> {
    let Some(range) = host.field(value, field) else {
        trace!(field, "range member not present");
        return None;
    };

    let decode = |name: &str| -> Option<i64> {
        let member = host.field(&range, name)?;
        match host.as_integer(&member) {
            Ok(n) => Some(n),
            Err(err) => {
                trace!(field, member = name, %err, "range bound is not an integer");
                None
            }
        }
    };

    let bounds = DimBounds::new(decode(&conv.lower_field)?, decode(&conv.upper_field)?);
    trace!(field, %bounds, "found range member");
    Some(bounds)
}

/// Lazy iterator over the `(label, element)` pairs of an [`ArrayView`].
///
/// Elements are produced in column-major order, ie. the first axis varies
/// fastest. Each element is read from the host when it is produced. A read
/// failure is yielded as the `Err` side of that element's result, and does
/// not stop iteration.
pub struct Elements<'a, 'h, H: Host> {
    view: &'a ArrayView<'h, H>,
    indices: Indices,
}

impl<'a, 'h, H: Host> Elements<'a, 'h, H> {
    /// Return the linear position of the next element.
    pub fn position(&self) -> usize {
        self.indices.position()
    }

    fn element(&self, index: Index) -> (IndexLabel, Result<H::Value, H::Error>) {
        let offset = self.view.layout.offset(&index);
        let label = IndexLabel::new(&self.view.dims, &index);
        (label, self.view.read(offset))
    }
}

impl<H: Host> Iterator for Elements<'_, '_, H> {
    type Item = (IndexLabel, Result<H::Value, H::Error>);

    fn next(&mut self) -> Option<Self::Item> {
        let index = self.indices.next()?;
        Some(self.element(index))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.indices.size_hint()
    }

    /// Skip `n` elements without reading them from the host.
    fn nth(&mut self, n: usize) -> Option<Self::Item> {
        let index = self.indices.nth(n)?;
        Some(self.element(index))
    }
}

impl<H: Host> ExactSizeIterator for Elements<'_, '_, H> {}

impl<H: Host> FusedIterator for Elements<'_, '_, H> {}

#[cfg(test)]
mod tests {
    use std::cell::Cell;

    use fclview_testing::{assert_covers_range, column_major_index, TestCases};

    use super::ArrayView;
    use crate::convention::NamingConvention;
    use crate::dims::{DimBounds, MAX_RANK};
    use crate::errors::ViewError;
    use crate::host::Host;
    use crate::snapshot::{Region, Snapshot, SnapshotError, Value};

    const BASE: u64 = 0x1000;

    /// Build a range member `{ l_: lower, u_: upper }`.
    fn range(lower: i64, upper: i64) -> Value {
        Value::object(
            "ObjexxFCL::IndexRange",
            [("l_", Value::Int(lower)), ("u_", Value::Int(upper))],
        )
    }

    /// Build a snapshot holding a `double` array with the given bounds whose
    /// elements are their own storage offsets.
    fn make_array(type_name: &str, dims: &[(i64, i64)]) -> (Snapshot, Value) {
        let len: usize = dims.iter().map(|&(l, u)| DimBounds::new(l, u).size()).product();
        let mut snapshot = Snapshot::new();
        snapshot.add_region(Region::new(
            BASE,
            "double",
            (0..len).map(|i| Value::Float(i as f64)).collect(),
        ));

        let mut fields: Vec<(String, Value)> = dims
            .iter()
            .enumerate()
            .map(|(i, &(l, u))| (format!("I{}_", i + 1), range(l, u)))
            .collect();
        fields.push(("data_".into(), Value::pointer("double", BASE)));
        let value = Value::object(type_name, fields);

        (snapshot, value)
    }

    /// Return the storage offset of each element, in traversal order.
    fn offsets_of(view: &ArrayView<Snapshot>) -> Vec<usize> {
        view.elements()
            .map(|(_, elem)| match elem.unwrap() {
                Value::Float(x) => x as usize,
                other => panic!("unexpected element {:?}", other),
            })
            .collect()
    }

    #[test]
    fn test_rank_1() {
        let (snapshot, value) = make_array("ObjexxFCL::Array1D<double>", &[(2, 4)]);
        let view = ArrayView::new(&snapshot, &value).unwrap();

        assert_eq!(view.rank(), 1);
        assert_eq!(view.len(), 3);
        assert_eq!(view.elem_type(), "double");
        assert_eq!(view.elem_size(), 8);
        assert_eq!(
            view.summary(),
            "ObjexxFCL::Array1D<double> [{2:4}] at 0x1000"
        );
        assert_eq!(view.to_string(), view.summary());

        let elements: Vec<(String, Value)> = view
            .elements()
            .map(|(label, elem)| (label.to_string(), elem.unwrap()))
            .collect();
        assert_eq!(
            elements,
            vec![
                ("2".to_string(), Value::Float(0.)),
                ("3".to_string(), Value::Float(1.)),
                ("4".to_string(), Value::Float(2.)),
            ]
        );
    }

    #[test]
    fn test_rank_2() {
        let (snapshot, value) = make_array("ObjexxFCL::Array2D<double>", &[(1, 2), (1, 3)]);
        let view = ArrayView::new(&snapshot, &value).unwrap();

        assert_eq!(view.shape(), &[2, 3]);
        assert!(view.summary().contains("[{1:2} x {1:3}]"));

        let labels: Vec<String> = view.elements().map(|(label, _)| label.to_string()).collect();
        assert_eq!(
            labels,
            ["(1, 1)", "(2, 1)", "(1, 2)", "(2, 2)", "(1, 3)", "(2, 3)"]
        );
        assert_eq!(offsets_of(&view), [0, 1, 2, 3, 4, 5]);

        let (third_label, _) = view.elements().nth(2).unwrap();
        assert_eq!(third_label.indices(), &[1, 3]);
        assert_eq!(view.index_of(2).unwrap().as_slice(), &[0, 2]);
    }

    #[test]
    fn test_sequence_covers_storage() {
        #[derive(Debug)]
        struct Case {
            dims: Vec<(i64, i64)>,
        }

        let cases = [
            Case { dims: vec![(1, 5)] },
            Case { dims: vec![(0, 0)] },
            Case { dims: vec![(-1, 1), (3, 4)] },
            Case { dims: vec![(1, 2), (1, 3), (0, 3)] },
            Case { dims: vec![(1, 2), (1, 1), (1, 3), (5, 6)] },
            Case { dims: vec![(1, 2); MAX_RANK] },
            // Empty dimensions.
            Case { dims: vec![(1, 0)] },
            Case { dims: vec![(1, 3), (4, 3), (1, 2)] },
        ];

        cases.test_each(|case| {
            let (snapshot, value) = make_array("ObjexxFCL::Array<double>", &case.dims);
            let view = ArrayView::new(&snapshot, &value).unwrap();
            let shape: Vec<usize> = case
                .dims
                .iter()
                .map(|&(l, u)| DimBounds::new(l, u).size())
                .collect();
            let total: usize = shape.iter().product();

            assert_eq!(view.rank(), case.dims.len());
            assert_eq!(view.len(), total);
            assert_eq!(view.elements().len(), total);
            assert_eq!(view.is_empty(), shape.contains(&0));

            // Offsets are a permutation of the storage, in storage order.
            let offsets = offsets_of(&view);
            assert_covers_range(&offsets, total);
            assert!(offsets.iter().enumerate().all(|(k, &offset)| k == offset));

            // Labels follow the column-major mixed-radix decomposition of
            // the position, shifted by the lower bounds.
            for (k, (label, _)) in view.elements().enumerate() {
                let expected: Vec<i64> = column_major_index(k, &shape)
                    .into_iter()
                    .zip(&case.dims)
                    .map(|(pos, &(lower, _))| lower + pos as i64)
                    .collect();
                assert_eq!(label.indices(), expected);
                assert_eq!(view.label_of(k).unwrap(), label);
            }
        })
    }

    #[test]
    fn test_empty_array() {
        let (snapshot, value) = make_array("ObjexxFCL::Array2D<double>", &[(1, 0), (1, 3)]);
        let view = ArrayView::new(&snapshot, &value).unwrap();
        assert_eq!(view.rank(), 2);
        assert!(view.is_empty());
        assert_eq!(view.elements().next(), None);
        assert_eq!(
            view.summary(),
            "ObjexxFCL::Array2D<double> [{1:0} x {1:3}] at 0x1000"
        );
    }

    #[test]
    fn test_partial_iteration_is_restartable() {
        let (snapshot, value) = make_array("ObjexxFCL::Array2D<double>", &[(1, 2), (1, 3)]);
        let view = ArrayView::new(&snapshot, &value).unwrap();

        let mut elements = view.elements();
        elements.next();
        elements.next();
        assert_eq!(elements.position(), 2);
        assert_eq!(elements.len(), 4);
        drop(elements);

        let (first, _) = view.elements().next().unwrap();
        assert_eq!(first.to_string(), "(1, 1)");
        assert_eq!(view.elements().count(), 6);
    }

    #[test]
    fn test_legacy_bound_field() {
        let mut snapshot = Snapshot::new();
        snapshot.add_region(Region::new(BASE, "int", vec![Value::Int(7), Value::Int(8)]));
        let value = Value::object(
            "ObjexxFCL::Array1D<int>",
            [("I_", range(0, 1)), ("data_", Value::pointer("int", BASE))],
        );

        let view = ArrayView::new(&snapshot, &value).unwrap();
        assert_eq!(view.dims(), &[DimBounds::new(0, 1)]);
        assert_eq!(view.elem_size(), 4);
        let values: Vec<Value> = view.elements().map(|(_, v)| v.unwrap()).collect();
        assert_eq!(values, [Value::Int(7), Value::Int(8)]);
    }

    #[test]
    fn test_legacy_field_only_for_first_axis() {
        let (snapshot, value) = make_array("ObjexxFCL::Array1D<double>", &[(1, 2)]);
        let Value::Object { type_name, mut fields } = value else {
            unreachable!()
        };
        // An unnumbered range after I1_ must not be picked up as axis 2.
        fields.insert("I_".into(), range(1, 5));
        let value = Value::Object { type_name, fields };

        let view = ArrayView::new(&snapshot, &value).unwrap();
        assert_eq!(view.rank(), 1);
    }

    #[test]
    fn test_decode_failure_stops_discovery() {
        #[derive(Debug)]
        struct Case {
            /// Upper bound stored for axis 3.
            bad_upper: Value,
        }

        let cases = [
            Case {
                bad_upper: Value::Float(2.5),
            },
            Case {
                bad_upper: Value::pointer("int", 0x10),
            },
            Case {
                bad_upper: Value::object("Opaque", [("x", Value::Int(1))]),
            },
        ];

        cases.test_each_value(|case| {
            let (snapshot, value) = make_array("ObjexxFCL::Array3D<double>", &[(1, 2), (1, 2)]);
            let Value::Object { type_name, mut fields } = value else {
                unreachable!()
            };
            let bad_range = Value::object(
                "ObjexxFCL::IndexRange",
                [("l_", Value::Int(1)), ("u_", case.bad_upper)],
            );
            fields.insert("I3_".into(), bad_range);
            let value = Value::Object { type_name, fields };

            let view = ArrayView::new(&snapshot, &value).unwrap();
            assert_eq!(view.rank(), 2);
            assert_eq!(view.len(), 4);
        })
    }

    #[test]
    fn test_numbered_decode_failure_falls_back_to_legacy() {
        let (snapshot, _) = make_array("ObjexxFCL::Array1D<double>", &[(1, 3)]);
        let value = Value::object(
            "ObjexxFCL::Array1D<double>",
            [
                ("I1_", Value::object("ObjexxFCL::IndexRange", [("l_", Value::Int(1))])),
                ("I_", range(1, 3)),
                ("data_", Value::pointer("double", BASE)),
            ],
        );
        let view = ArrayView::new(&snapshot, &value).unwrap();
        assert_eq!(view.dims(), &[DimBounds::new(1, 3)]);
    }

    #[test]
    fn test_rank_capped_at_max() {
        let dims = vec![(1, 1); MAX_RANK + 1];
        let (snapshot, value) = make_array("ObjexxFCL::Array7D<double>", &dims);
        let view = ArrayView::new(&snapshot, &value).unwrap();
        assert_eq!(view.rank(), MAX_RANK);
    }

    #[test]
    fn test_bounds_not_found() {
        let snapshot = Snapshot::new();
        let value = Value::object(
            "ObjexxFCL::Array1D<double>",
            [("data_", Value::pointer("double", BASE))],
        );
        let err = ArrayView::new(&snapshot, &value).unwrap_err();
        assert!(matches!(err, ViewError::BoundsNotFound));

        // Scalars have no fields at all.
        let err = ArrayView::new(&snapshot, &Value::Int(3)).unwrap_err();
        assert!(matches!(err, ViewError::BoundsNotFound));
    }

    #[test]
    fn test_storage_errors() {
        let snapshot = Snapshot::new();

        let value = Value::object("ObjexxFCL::Array1D<double>", [("I1_", range(1, 2))]);
        let err = ArrayView::new(&snapshot, &value).unwrap_err();
        assert!(matches!(err, ViewError::StorageNotFound { ref field } if field == "data_"));

        // Storage member that is not a pointer.
        let value = Value::object(
            "ObjexxFCL::Array1D<double>",
            [("I1_", range(1, 2)), ("data_", Value::Int(0))],
        );
        let err = ArrayView::new(&snapshot, &value).unwrap_err();
        assert!(matches!(err, ViewError::Host(_)));

        // Element type of unknown size.
        let value = Value::object(
            "ObjexxFCL::Array1D<Widget>",
            [("I1_", range(1, 2)), ("data_", Value::pointer("Widget", BASE))],
        );
        let err = ArrayView::new(&snapshot, &value).unwrap_err();
        assert_eq!(
            err.to_string(),
            "host error: size of type \"Widget\" is unknown"
        );
    }

    #[test]
    fn test_too_large() {
        let snapshot = Snapshot::new();
        let value = Value::object(
            "ObjexxFCL::Array2D<double>",
            [
                ("I1_", range(0, i64::MAX - 1)),
                ("I2_", range(0, i64::MAX - 1)),
                ("data_", Value::pointer("double", BASE)),
            ],
        );
        let err = ArrayView::new(&snapshot, &value).unwrap_err();
        assert!(matches!(err, ViewError::TooLarge));

        // Element count fits but the byte extent runs off the address space.
        let value = Value::object(
            "ObjexxFCL::Array1D<double>",
            [
                ("I1_", range(1, 4)),
                ("data_", Value::pointer("double", u64::MAX - 8)),
            ],
        );
        let err = ArrayView::new(&snapshot, &value).unwrap_err();
        assert!(matches!(err, ViewError::TooLarge));
    }

    #[test]
    fn test_read_errors_are_passed_through() {
        // Storage only covers the first two of three elements.
        let mut snapshot = Snapshot::new();
        snapshot.add_region(Region::new(
            BASE,
            "double",
            vec![Value::Float(1.), Value::Float(2.)],
        ));
        let value = Value::object(
            "ObjexxFCL::Array1D<double>",
            [("I1_", range(1, 3)), ("data_", Value::pointer("double", BASE))],
        );

        let view = ArrayView::new(&snapshot, &value).unwrap();
        let results: Vec<_> = view.elements().map(|(_, elem)| elem).collect();
        assert_eq!(results.len(), 3);
        assert_eq!(results[0], Ok(Value::Float(1.)));
        assert_eq!(results[1], Ok(Value::Float(2.)));
        assert_eq!(results[2], Err(SnapshotError::UnmappedAddress(BASE + 16)));
    }

    #[test]
    fn test_element_at() {
        let (snapshot, value) = make_array("ObjexxFCL::Array2D<double>", &[(1, 2), (1, 3)]);
        let view = ArrayView::new(&snapshot, &value).unwrap();
        assert_eq!(view.element_at(4), Some(Ok(Value::Float(4.))));
        assert_eq!(view.element_at(6), None);
        assert_eq!(view.label_of(6), None);
    }

    #[test]
    fn test_with_convention() {
        let mut snapshot = Snapshot::new();
        snapshot.add_region(Region::new(BASE, "int", vec![Value::Int(1); 4]));
        let value = Value::object(
            "MyLib::Grid<int>",
            [
                (
                    "axis1",
                    Value::object("Range", [("lo", Value::Int(0)), ("hi", Value::Int(1))]),
                ),
                (
                    "axis2",
                    Value::object("Range", [("lo", Value::Int(0)), ("hi", Value::Int(1))]),
                ),
                ("storage", Value::pointer("int", BASE)),
            ],
        );
        let conv = NamingConvention {
            family_prefix: "MyLib::Grid".into(),
            bound_field_prefix: "axis".into(),
            bound_field_suffix: "".into(),
            legacy_bound_field: "axis".into(),
            lower_field: "lo".into(),
            upper_field: "hi".into(),
            data_field: "storage".into(),
        };

        let view = ArrayView::with_convention(&snapshot, &value, &conv).unwrap();
        assert_eq!(view.shape(), &[2, 2]);
        assert_eq!(view.summary(), "MyLib::Grid<int> [{0:1} x {0:1}] at 0x1000");
    }

    /// Host wrapper that counts element reads.
    struct CountingHost {
        inner: Snapshot,
        reads: Cell<usize>,
    }

    impl Host for CountingHost {
        type Value = Value;
        type Type = String;
        type Error = SnapshotError;

        fn type_of(&self, value: &Value) -> String {
            self.inner.type_of(value)
        }
        fn strip_aliases(&self, ty: &String) -> String {
            self.inner.strip_aliases(ty)
        }
        fn type_name(&self, ty: &String) -> String {
            self.inner.type_name(ty)
        }
        fn field(&self, value: &Value, name: &str) -> Option<Value> {
            self.inner.field(value, name)
        }
        fn as_integer(&self, value: &Value) -> Result<i64, SnapshotError> {
            self.inner.as_integer(value)
        }
        fn pointee_type(&self, ty: &String) -> Result<String, SnapshotError> {
            self.inner.pointee_type(ty)
        }
        fn size_of(&self, ty: &String) -> Result<usize, SnapshotError> {
            self.inner.size_of(ty)
        }
        fn pointer_address(&self, pointer: &Value) -> Result<u64, SnapshotError> {
            self.inner.pointer_address(pointer)
        }
        fn read_element(&self, address: u64, ty: &String) -> Result<Value, SnapshotError> {
            self.reads.set(self.reads.get() + 1);
            self.inner.read_element(address, ty)
        }
        fn format_pointer(&self, pointer: &Value) -> String {
            self.inner.format_pointer(pointer)
        }
    }

    #[test]
    fn test_elements_are_read_lazily() {
        let (inner, value) =
            make_array("ObjexxFCL::Array3D<double>", &[(1, 10), (1, 10), (1, 10)]);
        let host = CountingHost {
            inner,
            reads: Cell::new(0),
        };
        let view = ArrayView::new(&host, &value).unwrap();
        assert_eq!(host.reads.get(), 0);

        let _ = view.summary();
        let mut elements = view.elements();
        assert_eq!(host.reads.get(), 0);

        elements.next();
        elements.next();
        assert_eq!(host.reads.get(), 2);

        // Skipping does not read the skipped elements.
        let (label, elem) = elements.nth(500).unwrap();
        assert_eq!(host.reads.get(), 3);
        assert_eq!(label.to_string(), "(3, 1, 6)");
        assert_eq!(elem, Ok(Value::Float(502.)));
    }
}
