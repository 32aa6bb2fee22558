//! Marshaller registry.
//!
//! A dense `(Location, ValueKind)` table of codec functions. Each codec
//! builds its table once through [`MarshallerRegistryBuilder`] and keeps it in
//! a process-wide static; the table is immutable afterwards, so lookups from
//! any number of threads need no synchronization.

use std::fmt;

use crate::descriptor::{Location, ValueKind};
use crate::error::{ProtocolError, ProtocolResult};

type Table<M> = [[Option<M>; ValueKind::COUNT]; Location::COUNT];

/// Immutable table of codec functions keyed by location and value kind.
pub struct MarshallerRegistry<M> {
    table: Table<M>,
}

impl<M: Copy> MarshallerRegistry<M> {
    /// Start an empty registry.
    #[must_use]
    pub fn builder() -> MarshallerRegistryBuilder<M> {
        MarshallerRegistryBuilder {
            table: [[None; ValueKind::COUNT]; Location::COUNT],
        }
    }

    /// The codec for `(location, kind)`.
    pub fn get(&self, location: Location, kind: ValueKind) -> ProtocolResult<M> {
        self.table[location.index()][kind.index()]
            .ok_or(ProtocolError::UnsupportedCombination { location, kind })
    }

    /// Whether a codec is registered for `(location, kind)`.
    #[must_use]
    pub fn contains(&self, location: Location, kind: ValueKind) -> bool {
        self.table[location.index()][kind.index()].is_some()
    }

    /// The pairs among `required` that have no codec.
    pub fn missing(
        &self,
        required: impl IntoIterator<Item = (Location, ValueKind)>,
    ) -> Vec<(Location, ValueKind)> {
        required
            .into_iter()
            .filter(|&(location, kind)| !self.contains(location, kind))
            .collect()
    }

    /// Every registered pair.
    #[must_use]
    pub fn registered(&self) -> Vec<(Location, ValueKind)> {
        Location::ALL
            .iter()
            .flat_map(|&location| ValueKind::ALL.iter().map(move |&kind| (location, kind)))
            .filter(|&(location, kind)| self.contains(location, kind))
            .collect()
    }
}

impl<M: Copy> fmt::Debug for MarshallerRegistry<M> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MarshallerRegistry")
            .field("registered", &self.registered())
            .finish()
    }
}

/// Builder for [`MarshallerRegistry`], consumed by value.
pub struct MarshallerRegistryBuilder<M> {
    table: Table<M>,
}

impl<M: Copy> MarshallerRegistryBuilder<M> {
    /// Register `codec` for `(location, kind)`, replacing any earlier entry.
    #[must_use]
    pub fn register(mut self, location: Location, kind: ValueKind, codec: M) -> Self {
        self.table[location.index()][kind.index()] = Some(codec);
        self
    }

    /// Register `codec` for every kind in `kinds` at `location`.
    #[must_use]
    pub fn register_all(mut self, location: Location, kinds: &[ValueKind], codec: M) -> Self {
        for &kind in kinds {
            self = self.register(location, kind, codec);
        }
        self
    }

    /// Register a payload codec.
    #[must_use]
    pub fn payload(self, kind: ValueKind, codec: M) -> Self {
        self.register(Location::Payload, kind, codec)
    }

    /// Register a header codec.
    #[must_use]
    pub fn header(self, kind: ValueKind, codec: M) -> Self {
        self.register(Location::Header, kind, codec)
    }

    /// Register a query-parameter codec.
    #[must_use]
    pub fn query_param(self, kind: ValueKind, codec: M) -> Self {
        self.register(Location::QueryParam, kind, codec)
    }

    /// Register a path-parameter codec.
    #[must_use]
    pub fn path_param(self, kind: ValueKind, codec: M) -> Self {
        self.register(Location::PathParam, kind, codec)
    }

    /// Register a greedy path-parameter codec.
    #[must_use]
    pub fn greedy_path_param(self, kind: ValueKind, codec: M) -> Self {
        self.register(Location::GreedyPathParam, kind, codec)
    }

    /// Register a status-code codec.
    #[must_use]
    pub fn status_code(self, kind: ValueKind, codec: M) -> Self {
        self.register(Location::StatusCode, kind, codec)
    }

    /// Freeze the table.
    #[must_use]
    pub fn build(self) -> MarshallerRegistry<M> {
        MarshallerRegistry { table: self.table }
    }
}

impl<M: Copy> fmt::Debug for MarshallerRegistryBuilder<M> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MarshallerRegistryBuilder").finish_non_exhaustive()
    }
}
