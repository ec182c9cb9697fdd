//! Conversion of predicate trees to Disjunctive Normal Form (DNF).
//!
//! The tree is flattened into postfix form and then into an evaluation heap,
//! a vector of boolean operations that reference their operands by index.
//! Negations are pushed down to the simple predicates, the distributive law
//! moves every OR above the ANDs, and finally a new tree is built from the heap.

mod construct;
mod factoring;
mod heap;
mod linearize;
mod negation;


use cql_core::Predicate;

use crate::errors::{DnfError, Result};
use heap::EvalHeap;

/// Limits for a single conversion.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DnfConfig {
    /// Maximum number of evaluation heap entries. The DNF of a predicate can be
    /// exponentially larger than the predicate itself, so callers handling
    /// untrusted queries should set a bound. `None` means unlimited.
    pub max_heap_entries: Option<usize>,
}

impl DnfConfig {
    pub fn with_max_heap_entries(max_heap_entries: usize) -> DnfConfig {
        DnfConfig {
            max_heap_entries: Some(max_heap_entries),
        }
    }

    /// Parses a configuration like `max_heap_entries = 1000`.
    pub fn from_toml_str(config: &str) -> Result<DnfConfig> {
        let config = toml::from_str(config)?;
        Ok(config)
    }
}

/// Size information about a finished conversion.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct DnfStats {
    /// Number of simple predicates in the input.
    pub terminals: usize,
    /// Size of the evaluation heap after factoring.
    pub heap_entries: usize,
    /// Number of applications of the distributive law.
    pub rewrites: usize,
}

/// A predicate in Disjunctive Normal Form together with conversion statistics.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Dnf {
    pub predicate: Predicate,
    pub stats: DnfStats,
}

/// Converts predicate trees to Disjunctive Normal Form.
///
/// The converter holds no state besides its configuration, all working data
/// is allocated per call.
#[derive(Clone, Debug, Default)]
pub struct Cql2Dnf {
    config: DnfConfig,
}

impl Cql2Dnf {
    pub fn new(config: DnfConfig) -> Cql2Dnf {
        Cql2Dnf { config }
    }

    pub fn config(&self) -> &DnfConfig {
        &self.config
    }

    /// Normalizes `predicate` to DNF.
    ///
    /// Fails only if the configured heap limit is exceeded.
    ///
    /// # Panics
    ///
    /// Panics if `predicate` is a compound whose operator count doesn't match
    /// its children, which can't happen for trees built with [`Predicate::compound`].
    pub fn compile(&self, predicate: &Predicate) -> Result<Dnf> {
        let mut heap = EvalHeap::from_predicate(predicate);
        trace!("evaluation heap for {}:\n{}", predicate, heap);
        self.check_limit(&heap)?;

        heap.push_not_down();

        let mut rewrites = 0;
        while heap.distribute_next().is_some() {
            rewrites += 1;
            self.check_limit(&heap)?;
        }
        trace!("evaluation heap after factoring:\n{}", heap);

        let result = heap.construct();
        let stats = DnfStats {
            terminals: heap.terminals.len(),
            heap_entries: heap.len(),
            rewrites,
        };
        debug!(
            "normalized predicate to DNF with {} clause(s) ({} terminals, {} heap entries, {} rewrites)",
            result.clause_count(),
            stats.terminals,
            stats.heap_entries,
            stats.rewrites
        );
        Ok(Dnf {
            predicate: result,
            stats,
        })
    }

    fn check_limit(&self, heap: &EvalHeap) -> Result<()> {
        match self.config.max_heap_entries {
            Some(limit) if heap.len() > limit => Err(DnfError::HeapLimitExceeded {
                limit,
                size: heap.len(),
            }),
            _ => Ok(()),
        }
    }
}

/// Normalizes `predicate` to Disjunctive Normal Form without any size limit.
///
/// The result is either a simple predicate, a conjunction of simple predicates
/// or a disjunction of simple predicates and such conjunctions. Only simple
/// predicates carry an inversion flag.
pub fn to_dnf(predicate: &Predicate) -> Predicate {
    let mut heap = EvalHeap::from_predicate(predicate);
    heap.push_not_down();
    heap.factor();
    heap.construct()
}
