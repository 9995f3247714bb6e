//! Reconciles result column names with entity field names.
//!
//! A column maps to the field whose name matches it ignoring case. When no
//! such field exists and fuzzy mapping is on, the field with the smallest
//! edit distance is taken unless
//!
//! * that field's name is itself an exact match for another known column
//!   (it belongs to that column), or
//! * `distance / (len(column) + len(field))` exceeds the threshold.
//!
//! Rejected and unmatched columns are dropped; the field keeps its default.

mod levenshtein;
pub use levenshtein::levenshtein;

use crate::{
    entity::{fields, Field},
    stmt::Row,
    Entity, Result,
};
use tracing::{debug, warn};

/// How a column was matched to a field.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Match {
    /// Index into the candidate field list
    pub index: usize,

    /// Edit distance; zero for exact matches
    pub distance: usize,

    pub exact: bool,
}

/// Column-to-field reconciliation settings.
#[derive(Debug, Clone, Copy)]
pub struct Mapper {
    fuzzy: bool,
    threshold: f64,
}

impl Mapper {
    pub const DEFAULT_THRESHOLD: f64 = 0.5;

    pub fn new() -> Mapper {
        Mapper {
            fuzzy: true,
            threshold: Self::DEFAULT_THRESHOLD,
        }
    }

    pub fn with_fuzzy(mut self, fuzzy: bool) -> Mapper {
        self.fuzzy = fuzzy;
        self
    }

    pub fn with_threshold(mut self, threshold: f64) -> Mapper {
        self.threshold = threshold;
        self
    }

    pub fn is_fuzzy(&self) -> bool {
        self.fuzzy
    }

    pub fn threshold(&self) -> f64 {
        self.threshold
    }

    /// Resolves `column` against `field_names`.
    ///
    /// `known_columns` are the other columns of the same table; they guard
    /// fields that an exact column already owns.
    pub fn resolve(
        &self,
        column: &str,
        field_names: &[&str],
        known_columns: &[String],
    ) -> Option<Match> {
        if let Some(index) = field_names
            .iter()
            .position(|name| name.eq_ignore_ascii_case(column))
        {
            return Some(Match {
                index,
                distance: 0,
                exact: true,
            });
        }

        if !self.fuzzy {
            return None;
        }

        // First field with the minimum distance wins ties.
        let (index, distance) = field_names
            .iter()
            .enumerate()
            .map(|(index, name)| (index, levenshtein(column, name)))
            .fold(None, |best: Option<(usize, usize)>, candidate| match best {
                Some(best) if best.1 <= candidate.1 => Some(best),
                _ => Some(candidate),
            })?;

        let target = field_names[index];

        if known_columns
            .iter()
            .any(|known| known.eq_ignore_ascii_case(target))
        {
            warn!(column, field = target, "fuzzy match rejected; field belongs to another column");
            return None;
        }

        let ratio = distance as f64 / (column.chars().count() + target.chars().count()) as f64;
        if ratio > self.threshold {
            debug!(column, field = target, ratio, "fuzzy match rejected; names too dissimilar");
            return None;
        }

        debug!(column, field = target, distance, "column mapped by edit distance");

        Some(Match {
            index,
            distance,
            exact: false,
        })
    }

    /// Resolves each table column to a field of `E`, or `None` when the
    /// entity has no counterpart.
    pub fn resolve_columns<E: Entity>(&self, columns: &[String]) -> Vec<Option<Field<E>>> {
        let all = fields::<E>().collect::<Vec<_>>();
        let names = all.iter().map(|f| f.name).collect::<Vec<_>>();

        columns
            .iter()
            .map(|column| {
                self.resolve(column, &names, columns)
                    .map(|found| all[found.index])
            })
            .collect()
    }

    /// Builds an entity from one row.
    ///
    /// `table_columns` is the table's column list from the schema; when it is
    /// empty the row's own columns stand in. Null values leave the field at its
    /// default. The entity comes back marked as mapped from the store.
    pub fn load<E: Entity>(&self, row: &Row, table_columns: &[String]) -> Result<E> {
        let all = fields::<E>().collect::<Vec<_>>();
        let names = all.iter().map(|f| f.name).collect::<Vec<_>>();

        let row_columns;
        let known = if table_columns.is_empty() {
            row_columns = row.keys().cloned().collect::<Vec<_>>();
            &row_columns[..]
        } else {
            table_columns
        };

        let mut entity = E::default();

        for (column, value) in row {
            let Some(found) = self.resolve(column, &names, known) else {
                debug!(entity = E::NAME, column = %column, "column has no matching field; dropped");
                continue;
            };

            if value.is_null() {
                continue;
            }

            let field = all[found.index];
            field.set(&mut entity, value.clone()).map_err(|err| {
                err.context(format!("setting {}.{} from column `{column}`", E::NAME, field.name))
            })?;
        }

        entity.base_mut().set_mapped(true);
        Ok(entity)
    }
}

impl Default for Mapper {
    fn default() -> Mapper {
        Mapper::new()
    }
}
