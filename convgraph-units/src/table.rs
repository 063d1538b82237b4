//! Edge table and expander
//!
//! A [`RawTable`] holds the authored conversions. [`expand`] validates them
//! and adds the reverse of every edge whose unit-swapped key was not authored,
//! producing an [`EdgeTable`] that is closed under reversal.

use std::collections::HashMap;
use std::sync::Arc;
use tracing::debug;
use convgraph_core::{ConversionResult, Unit};
use crate::edge::{Edge, EdgeOrigin, EdgeSpec};
use crate::path::Adjacency;

/// Ordered `(from, to)` key
pub type EdgeKey = (Unit, Unit);

/// Authored conversions, keyed by unit pair
///
/// Keys keep the position of their first insertion; inserting an existing key
/// replaces its spec.
#[derive(Debug, Clone, Default)]
pub struct RawTable {
    order: Vec<EdgeKey>,
    specs: HashMap<EdgeKey, EdgeSpec>,
}

impl RawTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_edges<I, A, B>(edges: I) -> Self
    where
        I: IntoIterator<Item = (A, B, EdgeSpec)>,
        A: Into<Unit>,
        B: Into<Unit>,
    {
        let mut table = Self::new();
        for (from, to, spec) in edges {
            table.insert(from, to, spec);
        }
        table
    }

    pub fn insert(&mut self, from: impl Into<Unit>, to: impl Into<Unit>, spec: EdgeSpec) {
        let key = (from.into(), to.into());
        if self.specs.insert(key.clone(), spec).is_none() {
            self.order.push(key);
        }
    }

    /// Builder-style insert
    pub fn with(mut self, from: impl Into<Unit>, to: impl Into<Unit>, spec: EdgeSpec) -> Self {
        self.insert(from, to, spec);
        self
    }

    /// Append every entry of `other`, later entries replacing earlier ones
    pub fn merge(&mut self, other: RawTable) {
        let RawTable { order, mut specs } = other;
        for key in order {
            if let Some(spec) = specs.remove(&key) {
                self.insert(key.0, key.1, spec);
            }
        }
    }

    pub fn get(&self, from: &Unit, to: &Unit) -> Option<&EdgeSpec> {
        self.specs.get(&(from.clone(), to.clone()))
    }

    pub fn contains(&self, from: &Unit, to: &Unit) -> bool {
        self.get(from, to).is_some()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&Unit, &Unit, &EdgeSpec)> {
        self.order.iter().filter_map(move |key| {
            self.specs.get(key).map(|spec| (&key.0, &key.1, spec))
        })
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }
}

/// One entry of an expanded table
#[derive(Debug, Clone)]
pub struct TableEntry {
    pub edge: Arc<Edge>,
    pub origin: EdgeOrigin,
}

/// Expanded, bidirectional conversion table
#[derive(Debug, Clone, Default)]
pub struct EdgeTable {
    order: Vec<EdgeKey>,
    entries: HashMap<EdgeKey, TableEntry>,
    adjacency: Adjacency<Unit>,
}

/// Validate `raw` and derive the missing reverse edges
///
/// Explicit entries always win over derived ones. Fails on the first
/// malformed spec or zero factor, in table order.
pub fn expand(raw: &RawTable) -> ConversionResult<EdgeTable> {
    let mut table = EdgeTable::default();

    for (from, to, spec) in raw.iter() {
        let edge = spec.validate(from, to)?;
        table.put(from.clone(), to.clone(), Arc::new(edge), EdgeOrigin::Explicit);
    }

    for (from, to, _) in raw.iter() {
        if raw.contains(to, from) {
            continue;
        }
        let reverse = match table.get(from, to) {
            Some(edge) => edge.reverse(from, to)?,
            None => continue,
        };
        table.put(to.clone(), from.clone(), Arc::new(reverse), EdgeOrigin::Derived);
    }

    table.rebuild_adjacency();
    debug!(explicit = raw.len(), expanded = table.len(), "expanded conversion table");
    Ok(table)
}

impl EdgeTable {
    fn put(&mut self, from: Unit, to: Unit, edge: Arc<Edge>, origin: EdgeOrigin) {
        let key = (from, to);
        if self.entries.insert(key.clone(), TableEntry { edge, origin }).is_none() {
            self.order.push(key);
        }
    }

    fn rebuild_adjacency(&mut self) {
        self.adjacency = Adjacency::from_pairs(self.order.iter().cloned());
    }

    /// Insert an explicit edge after construction
    ///
    /// Replaces whatever entry `(from, to)` held and re-derives `(to, from)`
    /// unless that reverse is explicit. Nothing changes on error.
    pub fn insert(&mut self, from: Unit, to: Unit, spec: &EdgeSpec) -> ConversionResult<()> {
        let edge = spec.validate(&from, &to)?;

        let reverse_is_explicit = self.origin(&to, &from) == Some(EdgeOrigin::Explicit);
        let reverse = if from == to || reverse_is_explicit {
            None
        } else {
            Some(edge.reverse(&from, &to)?)
        };

        self.put(from.clone(), to.clone(), Arc::new(edge), EdgeOrigin::Explicit);
        if let Some(reverse) = reverse {
            self.put(to.clone(), from.clone(), Arc::new(reverse), EdgeOrigin::Derived);
        }
        self.adjacency.link(from.clone(), to.clone());

        debug!(from = %from, to = %to, "inserted conversion edge");
        Ok(())
    }

    pub fn get(&self, from: &Unit, to: &Unit) -> Option<&Arc<Edge>> {
        self.entry(from, to).map(|e| &e.edge)
    }

    pub fn entry(&self, from: &Unit, to: &Unit) -> Option<&TableEntry> {
        self.entries.get(&(from.clone(), to.clone()))
    }

    pub fn origin(&self, from: &Unit, to: &Unit) -> Option<EdgeOrigin> {
        self.entry(from, to).map(|e| e.origin)
    }

    pub fn contains(&self, from: &Unit, to: &Unit) -> bool {
        self.entry(from, to).is_some()
    }

    /// True if `unit` appears on either side of any key
    pub fn contains_unit(&self, unit: &Unit) -> bool {
        self.adjacency.contains(unit)
    }

    /// Distinct units in first-appearance order
    pub fn units(&self) -> &[Unit] {
        self.adjacency.nodes()
    }

    pub fn adjacency(&self) -> &Adjacency<Unit> {
        &self.adjacency
    }

    pub fn iter(&self) -> impl Iterator<Item = (&Unit, &Unit, &TableEntry)> {
        self.order.iter().filter_map(move |key| {
            self.entries.get(key).map(|entry| (&key.0, &key.1, entry))
        })
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::edge::{transform_fn, Transform};
    use convgraph_core::ConversionError;

    fn unit(s: &str) -> Unit {
        Unit::from(s)
    }

    fn linear(table: &EdgeTable, from: &str, to: &str) -> (f64, f64) {
        match table.get(&unit(from), &unit(to)).map(|e| &e.transform) {
            Some(Transform::Linear { factor, add }) => (*factor, *add),
            other => panic!("expected linear edge {} -> {}, got {:?}", from, to, other),
        }
    }

    #[test]
    fn test_expansion_closure() {
        let raw = RawTable::new()
            .with("C", "K", EdgeSpec::offset(1.0, 273.15))
            .with("kPa", "Pa", EdgeSpec::factor(1000.0))
            .with("nd", None::<&str>, EdgeSpec::ignore());
        let table = expand(&raw).unwrap();

        assert_eq!(table.len(), 6);
        for (from, to, _) in table.iter() {
            assert!(table.contains(to, from), "missing reverse of {} -> {}", from, to);
        }
    }

    #[test]
    fn test_derived_offset_inverse() {
        let raw = RawTable::new().with("F", "K", EdgeSpec::offset(5.0 / 9.0, 273.15 - 32.0 * 5.0 / 9.0));
        let table = expand(&raw).unwrap();

        let (factor, add) = linear(&table, "K", "F");
        assert!((factor - 1.8).abs() < 1e-12);
        // 273.15 K -> 32 F
        assert!((273.15 * factor + add - 32.0).abs() < 1e-9);
        assert_eq!(table.origin(&unit("K"), &unit("F")), Some(EdgeOrigin::Derived));
    }

    #[test]
    fn test_explicit_reverse_wins() {
        let raw = RawTable::new()
            .with("A", "B", EdgeSpec::factor(2.0))
            .with("B", "A", EdgeSpec::factor(0.25));
        let table = expand(&raw).unwrap();

        assert_eq!(linear(&table, "B", "A"), (0.25, 0.0));
        assert_eq!(table.origin(&unit("B"), &unit("A")), Some(EdgeOrigin::Explicit));
        assert_eq!(table.len(), 2);
    }

    #[test]
    fn test_ignore_reverse_is_ignore() {
        let raw = RawTable::new().with("K", "K (rel)", EdgeSpec::ignore());
        let table = expand(&raw).unwrap();
        let rev = table.get(&unit("K (rel)"), &unit("K")).unwrap();
        assert!(rev.ignore);
    }

    #[test]
    fn test_custom_reverse_swaps_functions() {
        let fwd = transform_fn("fwd", |v, _| Ok(v.clone()));
        let inv = transform_fn("inv", |v, _| Ok(v.clone()));
        let raw = RawTable::new().with("area", "volume", EdgeSpec::custom(fwd, inv));
        let table = expand(&raw).unwrap();

        match &table.get(&unit("volume"), &unit("area")).unwrap().transform {
            Transform::Custom { forward, inverse } => {
                assert_eq!(forward.name(), "inv");
                assert_eq!(inverse.name(), "fwd");
            }
            other => panic!("expected custom, got {:?}", other),
        }
    }

    #[test]
    fn test_zero_factor_fails_fast() {
        let raw = RawTable::new()
            .with("A", "B", EdgeSpec::factor(2.0))
            .with("X", "Y", EdgeSpec::factor(0.0));
        let err = expand(&raw).unwrap_err();
        assert_eq!(err, ConversionError::div_zero(&unit("X"), &unit("Y")));
    }

    #[test]
    fn test_zero_factor_with_explicit_reverse_is_accepted() {
        let raw = RawTable::new()
            .with("X", "Y", EdgeSpec::factor(0.0))
            .with("Y", "X", EdgeSpec::factor(1.0));
        assert!(expand(&raw).is_ok());
    }

    #[test]
    fn test_malformed_fails_fast() {
        let raw = RawTable::new().with("A", "B", EdgeSpec::default());
        let err = expand(&raw).unwrap_err();
        assert!(err.is_table_error());
        assert_eq!(err.code(), convgraph_core::codes::MALFORMED_EDGE);
    }

    #[test]
    fn test_self_pair_not_duplicated() {
        let raw = RawTable::new().with("A", "A", EdgeSpec::factor(1.0));
        let table = expand(&raw).unwrap();
        assert_eq!(table.len(), 1);
    }

    #[test]
    fn test_deterministic_order() {
        let raw = RawTable::new()
            .with("in", "m", EdgeSpec::factor(0.0254))
            .with("ft", "m", EdgeSpec::factor(0.3048));
        let keys: Vec<String> = expand(&raw).unwrap().iter()
            .map(|(a, b, _)| format!("{}>{}", a, b))
            .collect();
        assert_eq!(keys, vec!["in>m", "ft>m", "m>in", "m>ft"]);
    }

    #[test]
    fn test_units_and_contains_unit() {
        let raw = RawTable::new()
            .with("in", "m", EdgeSpec::factor(0.0254))
            .with("nd", None::<&str>, EdgeSpec::ignore());
        let table = expand(&raw).unwrap();
        assert_eq!(table.units(), &[unit("in"), unit("m"), unit("nd"), Unit::Unitless]);
        assert!(table.contains_unit(&Unit::Unitless));
        assert!(!table.contains_unit(&unit("ft")));
    }

    #[test]
    fn test_raw_table_last_definition_wins() {
        let raw = RawTable::from_edges(vec![
            ("A", "B", EdgeSpec::factor(2.0)),
            ("C", "D", EdgeSpec::factor(3.0)),
            ("A", "B", EdgeSpec::factor(5.0)),
        ]);
        assert_eq!(raw.len(), 2);
        assert_eq!(raw.get(&unit("A"), &unit("B")).and_then(|s| s.factor), Some(5.0));
        assert_eq!(raw.iter().next().map(|(a, _, _)| a.clone()), Some(unit("A")));
    }

    #[test]
    fn test_insert_rederives_reverse() {
        let raw = RawTable::new().with("A", "B", EdgeSpec::factor(2.0));
        let mut table = expand(&raw).unwrap();

        table.insert(unit("A"), unit("B"), &EdgeSpec::factor(4.0)).unwrap();
        assert_eq!(linear(&table, "B", "A"), (0.25, 0.0));

        table.insert(unit("B"), unit("C"), &EdgeSpec::factor(10.0)).unwrap();
        assert!(table.contains(&unit("C"), &unit("B")));
        assert!(table.contains_unit(&unit("C")));
    }

    #[test]
    fn test_insert_keeps_explicit_reverse() {
        let raw = RawTable::new()
            .with("A", "B", EdgeSpec::factor(2.0))
            .with("B", "A", EdgeSpec::factor(0.3));
        let mut table = expand(&raw).unwrap();

        table.insert(unit("A"), unit("B"), &EdgeSpec::factor(4.0)).unwrap();
        assert_eq!(linear(&table, "B", "A"), (0.3, 0.0));
    }

    #[test]
    fn test_insert_error_leaves_table_unchanged() {
        let raw = RawTable::new().with("A", "B", EdgeSpec::factor(2.0));
        let mut table = expand(&raw).unwrap();

        let err = table.insert(unit("A"), unit("B"), &EdgeSpec::factor(0.0)).unwrap_err();
        assert!(matches!(err, ConversionError::DivisionByZero { .. }));
        assert_eq!(linear(&table, "A", "B"), (2.0, 0.0));
    }
}
