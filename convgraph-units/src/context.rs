//! Per-call conversion context

use serde::{Deserialize, Serialize};
use convgraph_core::{Unit, Value};
use crate::edge::EdgeKind;

/// Options and hop trace for a conversion call
#[derive(Debug, Clone, Default)]
pub struct ConvertContext {
    pub tracing: bool,
    pub trace: Vec<TraceStep>,
}

/// Single hop in a conversion trace
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TraceStep {
    pub from: Unit,
    pub to: Unit,
    pub kind: EdgeKind,
    pub result: Value,
}

impl ConvertContext {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_tracing(mut self, enabled: bool) -> Self {
        self.tracing = enabled;
        self
    }

    pub fn record_hop(&mut self, from: &Unit, to: &Unit, kind: EdgeKind, result: &Value) {
        if self.tracing {
            self.trace.push(TraceStep {
                from: from.clone(),
                to: to.clone(),
                kind,
                result: result.clone(),
            });
        }
    }

    /// Units visited by the recorded hops, start included
    pub fn visited(&self) -> Vec<&Unit> {
        let mut units: Vec<&Unit> = self.trace.first().map(|s| &s.from).into_iter().collect();
        units.extend(self.trace.iter().map(|s| &s.to));
        units
    }
}
