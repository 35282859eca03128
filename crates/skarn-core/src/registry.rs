//! Versioned translator registry and dispatch.
//!
//! Each (domain, opcode) pair maps to an ordered set of translator
//! functions, each tagged with the lowest opset version it supports.
//! Resolution picks the newest implementation whose introduction version
//! does not exceed the version the producer declared.
//!
//! The registry is populated once at startup and only read afterwards;
//! `resolve` and `translate` take `&self`, so concurrent lookups from
//! independent translation passes need no locking.

use crate::ctx::BuildCtx;
use crate::ir::OutputVector;
use crate::record::OperatorRecord;
use crate::{Error, Result};
use std::collections::HashMap;

/// The default operator domain.
pub const DEFAULT_DOMAIN: &str = "";

/// A translator: one (domain, opcode, version range) implementation.
///
/// Pure apart from allocating nodes through the context; translating the
/// same record against the same context state emits the same subgraph.
pub type Translator = fn(&OperatorRecord, &mut BuildCtx) -> Result<OutputVector>;

/// Registry mapping (domain, opcode) to versioned translator implementations.
///
/// # Example
///
/// ```
/// use skarn_core::{BuildCtx, OperatorRecord, VersionRegistry};
///
/// fn noop(_: &OperatorRecord, _: &mut BuildCtx) -> skarn_core::Result<Vec<skarn_core::Value>> {
///     Ok(vec![])
/// }
///
/// let mut registry = VersionRegistry::new();
/// registry.register("", "Noop", 1, noop).unwrap();
/// assert!(registry.resolve("", "Noop", 7).is_ok());
/// ```
pub struct VersionRegistry {
    /// Per-(domain, opcode) implementation lists, sorted ascending by the
    /// version they were introduced in.
    translators: HashMap<(String, String), Vec<(i64, Translator)>>,
}

impl VersionRegistry {
    /// Create a new empty registry.
    pub fn new() -> Self {
        Self {
            translators: HashMap::new(),
        }
    }

    /// Register a translator introduced at `since_version`.
    ///
    /// Fails with [`Error::DuplicateVersion`] when that version is already
    /// registered for the (domain, opcode) pair.
    pub fn register(
        &mut self,
        domain: &str,
        op_type: &str,
        since_version: i64,
        translator: Translator,
    ) -> Result<()> {
        let entries = self
            .translators
            .entry((domain.to_string(), op_type.to_string()))
            .or_default();

        match entries.binary_search_by_key(&since_version, |(version, _)| *version) {
            Ok(_) => Err(Error::DuplicateVersion {
                domain: domain.to_string(),
                op_type: op_type.to_string(),
                version: since_version,
            }),
            Err(position) => {
                entries.insert(position, (since_version, translator));
                Ok(())
            }
        }
    }

    /// Resolve the implementation in effect at `version`.
    ///
    /// Picks the registered entry with the greatest introduction version not
    /// exceeding `version`. Fails with [`Error::UnsupportedOpcode`] when the
    /// (domain, opcode) pair is unknown, and with
    /// [`Error::UnsupportedVersion`] when every entry is newer than the
    /// declared version.
    pub fn resolve(&self, domain: &str, op_type: &str, version: i64) -> Result<Translator> {
        let entries = self
            .translators
            .get(&(domain.to_string(), op_type.to_string()))
            .ok_or_else(|| Error::UnsupportedOpcode {
                domain: domain.to_string(),
                op_type: op_type.to_string(),
            })?;

        entries
            .iter()
            .rev()
            .find(|(since, _)| *since <= version)
            .map(|(_, translator)| *translator)
            .ok_or_else(|| Error::UnsupportedVersion {
                domain: domain.to_string(),
                op_type: op_type.to_string(),
                declared: version,
                lowest: entries[0].0,
            })
    }

    /// Translate one record: resolve its implementation and invoke it.
    ///
    /// A failure inside the translator is wrapped with the record's domain,
    /// opcode, and declared version for diagnosis. Nodes emitted before the
    /// failure stay in the graph; discarding that partial IR is the
    /// caller's concern.
    pub fn translate(&self, record: &OperatorRecord, ctx: &mut BuildCtx) -> Result<OutputVector> {
        let translator = self.resolve(record.domain(), record.op_type(), record.version())?;

        tracing::debug!(
            domain = record.domain(),
            op_type = record.op_type(),
            version = record.version(),
            "translating record"
        );

        translator(record, ctx).map_err(|source| Error::Translation {
            domain: record.domain().to_string(),
            op_type: record.op_type().to_string(),
            version: record.version(),
            source: Box::new(source),
        })
    }

    /// Check if any implementation is registered for (domain, opcode).
    pub fn contains(&self, domain: &str, op_type: &str) -> bool {
        self.translators
            .contains_key(&(domain.to_string(), op_type.to_string()))
    }

    /// Number of registered (domain, opcode) pairs.
    pub fn op_count(&self) -> usize {
        self.translators.len()
    }
}

impl Default for VersionRegistry {
    fn default() -> Self {
        Self::new()
    }
}
