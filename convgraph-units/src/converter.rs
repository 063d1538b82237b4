//! Conversion facade
//!
//! Resolution order for `convert(value, from, to)`:
//! 1. `from == to` uses an identity edge, memoized for units in the table
//! 2. a direct table entry is applied once
//! 3. otherwise the shortest chain of edges is applied hop by hop
//!
//! An unknown or unreachable pair yields `Ok(None)`.

use std::collections::HashMap;
use std::sync::{Arc, RwLock};
use tracing::{debug, trace};
use convgraph_core::{ConversionResult, Unit, Value};
use crate::context::ConvertContext;
use crate::defaults::default_table;
use crate::edge::{CustomTransform, Edge, EdgeKind, EdgeSpec};
use crate::eval;
use crate::path::{hops, shortest_path};
use crate::table::{expand, EdgeTable, RawTable};

/// Auxiliary values handed to custom transforms
///
/// Accepts nothing (`()`), a bare number, or a sequence.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Extra(Vec<f64>);

impl Extra {
    pub fn as_slice(&self) -> &[f64] {
        &self.0
    }
}

impl From<()> for Extra {
    fn from(_: ()) -> Self {
        Extra(Vec::new())
    }
}

impl From<f64> for Extra {
    fn from(x: f64) -> Self {
        Extra(vec![x])
    }
}

impl From<Vec<f64>> for Extra {
    fn from(v: Vec<f64>) -> Self {
        Extra(v)
    }
}

impl From<&[f64]> for Extra {
    fn from(v: &[f64]) -> Self {
        Extra(v.to_vec())
    }
}

impl<const N: usize> From<[f64; N]> for Extra {
    fn from(v: [f64; N]) -> Self {
        Extra(v.to_vec())
    }
}

/// One conversion in a batch
#[derive(Debug, Clone, PartialEq)]
pub struct ConvertRequest {
    pub value: Value,
    pub from: Unit,
    pub to: Unit,
    pub extra: Extra,
}

impl ConvertRequest {
    pub fn new(value: impl Into<Value>, from: impl Into<Unit>, to: impl Into<Unit>) -> Self {
        ConvertRequest {
            value: value.into(),
            from: from.into(),
            to: to.into(),
            extra: Extra::default(),
        }
    }

    pub fn with_extra(mut self, extra: impl Into<Extra>) -> Self {
        self.extra = extra.into();
        self
    }
}

/// A resolved hop: the edge to apply between two adjacent units
#[derive(Debug, Clone)]
struct Hop {
    from: Unit,
    to: Unit,
    edge: Arc<Edge>,
}

/// Conversion engine over an expanded edge table
#[derive(Debug)]
pub struct Converter {
    table: EdgeTable,
    /// Bounded by the table's units; other units share `unknown_identity`
    identity: RwLock<HashMap<Unit, Arc<Edge>>>,
    unknown_identity: Arc<Edge>,
}

impl Converter {
    /// Engine over the default table
    pub fn new() -> Self {
        match Self::with_table(&default_table()) {
            Ok(converter) => converter,
            Err(err) => {
                tracing::error!(error = %err, "default conversion table rejected");
                Self::from_expanded(EdgeTable::default())
            }
        }
    }

    /// Engine over a caller-supplied table; a bad table is rejected here
    pub fn with_table(raw: &RawTable) -> ConversionResult<Self> {
        Ok(Self::from_expanded(expand(raw)?))
    }

    pub fn builder() -> ConverterBuilder {
        ConverterBuilder::default()
    }

    fn from_expanded(table: EdgeTable) -> Self {
        Converter {
            table,
            identity: RwLock::new(HashMap::new()),
            unknown_identity: Arc::new(Edge::identity()),
        }
    }

    pub fn table(&self) -> &EdgeTable {
        &self.table
    }

    /// Add or replace an explicit edge
    pub fn insert(
        &mut self,
        from: impl Into<Unit>,
        to: impl Into<Unit>,
        spec: EdgeSpec,
    ) -> ConversionResult<()> {
        self.table.insert(from.into(), to.into(), &spec)
    }

    /// Convert `value` from one unit to another
    ///
    /// The same `extra` is handed to every hop of a multi-hop chain; use
    /// [`Converter::convert_with_hop_extras`] when a chain crosses more than
    /// one custom edge.
    pub fn convert(
        &self,
        value: impl Into<Value>,
        from: impl Into<Unit>,
        to: impl Into<Unit>,
        extra: impl Into<Extra>,
    ) -> ConversionResult<Option<Value>> {
        let mut ctx = ConvertContext::new();
        self.convert_traced(value, from, to, extra, &mut ctx)
    }

    /// [`Converter::convert`], recording each hop in `ctx` when tracing
    pub fn convert_traced(
        &self,
        value: impl Into<Value>,
        from: impl Into<Unit>,
        to: impl Into<Unit>,
        extra: impl Into<Extra>,
        ctx: &mut ConvertContext,
    ) -> ConversionResult<Option<Value>> {
        let (from, to, extra): (Unit, Unit, Extra) = (from.into(), to.into(), extra.into());
        let Some(route) = self.route(&from, &to) else {
            return Ok(None);
        };

        let mut current: Value = value.into();
        for hop in &route {
            current = Self::apply_hop(hop, &current, extra.as_slice(), ctx)?;
        }
        Ok(Some(current))
    }

    /// Convert with one extra sequence per custom hop
    ///
    /// The i-th sequence goes to the i-th custom edge on the chain; linear and
    /// ignore hops consume nothing. A custom hop past the end of `hop_extras`
    /// receives an empty slice.
    pub fn convert_with_hop_extras(
        &self,
        value: impl Into<Value>,
        from: impl Into<Unit>,
        to: impl Into<Unit>,
        hop_extras: &[Vec<f64>],
    ) -> ConversionResult<Option<Value>> {
        let (from, to): (Unit, Unit) = (from.into(), to.into());
        let Some(route) = self.route(&from, &to) else {
            return Ok(None);
        };

        let mut ctx = ConvertContext::new();
        let mut remaining = hop_extras.iter();
        let mut current: Value = value.into();
        for hop in &route {
            let extra: &[f64] = if hop.edge.kind() == EdgeKind::Custom {
                remaining.next().map(Vec::as_slice).unwrap_or(&[])
            } else {
                &[]
            };
            current = Self::apply_hop(hop, &current, extra, &mut ctx)?;
        }
        Ok(Some(current))
    }

    /// Run independent conversions; each slot fails or succeeds on its own
    pub fn convert_batch(&self, requests: &[ConvertRequest]) -> Vec<ConversionResult<Option<Value>>> {
        requests.iter()
            .map(|r| self.convert(r.value.clone(), &r.from, &r.to, r.extra.clone()))
            .collect()
    }

    /// Units the conversion would pass through, both ends included
    ///
    /// `from == to` gives the single-node path.
    pub fn path(&self, from: impl Into<Unit>, to: impl Into<Unit>) -> Option<Vec<Unit>> {
        let (from, to): (Unit, Unit) = (from.into(), to.into());
        if from == to {
            return Some(vec![from]);
        }
        let route = self.route(&from, &to)?;
        let mut units = vec![from];
        units.extend(route.into_iter().map(|hop| hop.to));
        Some(units)
    }

    /// Number of memoized identity edges
    pub fn identity_cache_len(&self) -> usize {
        self.identity.read().map_or(0, |cache| cache.len())
    }

    fn apply_hop(hop: &Hop, value: &Value, extra: &[f64], ctx: &mut ConvertContext) -> ConversionResult<Value> {
        let result = eval::apply(&hop.edge, value, extra)?;
        trace!(from = %hop.from, to = %hop.to, kind = ?hop.edge.kind(), "applied hop");
        ctx.record_hop(&hop.from, &hop.to, hop.edge.kind(), &result);
        Ok(result)
    }

    fn route(&self, from: &Unit, to: &Unit) -> Option<Vec<Hop>> {
        if from == to {
            let edge = self.identity_edge(from);
            return Some(vec![Hop { from: from.clone(), to: to.clone(), edge }]);
        }

        if let Some(edge) = self.table.get(from, to) {
            return Some(vec![Hop { from: from.clone(), to: to.clone(), edge: Arc::clone(edge) }]);
        }

        if !self.table.contains_unit(from) || !self.table.contains_unit(to) {
            debug!(from = %from, to = %to, "unknown unit, unconvertible");
            return None;
        }

        let Some(path) = shortest_path(self.table.adjacency(), from, to) else {
            debug!(from = %from, to = %to, "no conversion path");
            return None;
        };

        let route = hops(&path).into_iter()
            .map(|(a, b)| {
                let edge = Arc::clone(self.table.get(&a, &b)?);
                Some(Hop { from: a, to: b, edge })
            })
            .collect::<Option<Vec<_>>>()?;
        debug!(from = %from, to = %to, hops = route.len(), "resolved conversion chain");
        Some(route)
    }

    fn identity_edge(&self, unit: &Unit) -> Arc<Edge> {
        if !self.table.contains_unit(unit) {
            return Arc::clone(&self.unknown_identity);
        }

        if let Ok(cache) = self.identity.read() {
            if let Some(edge) = cache.get(unit) {
                return Arc::clone(edge);
            }
        }

        let edge = Arc::new(Edge::identity());
        match self.identity.write() {
            Ok(mut cache) => {
                let cached = cache.entry(unit.clone()).or_insert_with(|| {
                    debug!(unit = %unit, "cached identity edge");
                    Arc::clone(&edge)
                });
                Arc::clone(cached)
            }
            Err(_) => edge,
        }
    }
}

impl Default for Converter {
    fn default() -> Self {
        Self::new()
    }
}

/// Builder for a [`Converter`] with extra or replacement edges
#[derive(Debug, Clone)]
pub struct ConverterBuilder {
    include_defaults: bool,
    edges: RawTable,
}

impl Default for ConverterBuilder {
    fn default() -> Self {
        ConverterBuilder { include_defaults: true, edges: RawTable::new() }
    }
}

impl ConverterBuilder {
    /// Start from an empty table instead of the defaults
    pub fn without_defaults(mut self) -> Self {
        self.include_defaults = false;
        self
    }

    pub fn edge(mut self, from: impl Into<Unit>, to: impl Into<Unit>, spec: EdgeSpec) -> Self {
        self.edges.insert(from, to, spec);
        self
    }

    pub fn linear(self, from: impl Into<Unit>, to: impl Into<Unit>, factor: f64) -> Self {
        self.edge(from, to, EdgeSpec::factor(factor))
    }

    pub fn offset(self, from: impl Into<Unit>, to: impl Into<Unit>, factor: f64, add: f64) -> Self {
        self.edge(from, to, EdgeSpec::offset(factor, add))
    }

    pub fn ignore(self, from: impl Into<Unit>, to: impl Into<Unit>) -> Self {
        self.edge(from, to, EdgeSpec::ignore())
    }

    pub fn custom(
        self,
        from: impl Into<Unit>,
        to: impl Into<Unit>,
        func: Arc<dyn CustomTransform>,
        func_inv: Arc<dyn CustomTransform>,
    ) -> Self {
        self.edge(from, to, EdgeSpec::custom(func, func_inv))
    }

    pub fn build(self) -> ConversionResult<Converter> {
        let mut raw = if self.include_defaults { default_table() } else { RawTable::new() };
        raw.merge(self.edges);
        Converter::with_table(&raw)
    }
}
