//! The generic census record: one zone's row of one table.

use std::fmt;
use std::sync::Arc;

use crate::error::{CensusError, Result};
use crate::schema::types::{FieldValue, TableSchema};
use crate::zone::ZoneCode;

/// One parsed (or aggregated) row of a census table.
///
/// A record is immutable after construction: the aggregation methods return
/// new records rather than mutating their operands. Values sit in schema
/// field order, so lookups go through the schema's name index.
#[derive(Debug, Clone, PartialEq)]
pub struct CensusRecord {
    /// Internal identity/ordering id, not derived from the zone code.
    record_id: i64,
    zone: ZoneCode,
    schema: Arc<TableSchema>,
    values: Vec<FieldValue>,
}

impl CensusRecord {
    /// Parse one raw CSV line against `schema`.
    ///
    /// Fails with `MalformedRecord` when the zone-code column is shorter
    /// than 11 characters; blank or non-numeric data cells parse to zero.
    pub fn from_line(record_id: i64, schema: Arc<TableSchema>, line: &str) -> Result<CensusRecord> {
        let (zone, values) = schema.parse_line(line)?;
        Ok(CensusRecord {
            record_id,
            zone,
            schema,
            values,
        })
    }

    /// A record with every field set to zero, the identity element for
    /// aggregation. The zone code is all spaces.
    pub fn zeroed(record_id: i64, schema: Arc<TableSchema>) -> CensusRecord {
        let values = schema.fields().iter().map(|f| FieldValue::zero(f.kind)).collect();
        CensusRecord {
            record_id,
            zone: ZoneCode::padded(""),
            schema,
            values,
        }
    }

    /// A record with every field set to the "not yet assigned" sentinel
    /// (the minimum representable value), as the legacy data files marked
    /// records awaiting population.
    pub fn unset(record_id: i64, schema: Arc<TableSchema>) -> CensusRecord {
        let values = schema.fields().iter().map(|f| FieldValue::unset(f.kind)).collect();
        CensusRecord {
            record_id,
            zone: ZoneCode::padded(""),
            schema,
            values,
        }
    }

    /// Reassemble a record from already-validated parts (binary layout
    /// reads). `values` must be in schema field order.
    pub(crate) fn from_parts(
        record_id: i64,
        zone: ZoneCode,
        schema: Arc<TableSchema>,
        values: Vec<FieldValue>,
    ) -> CensusRecord {
        debug_assert_eq!(values.len(), schema.fields().len());
        CensusRecord {
            record_id,
            zone,
            schema,
            values,
        }
    }

    pub fn record_id(&self) -> i64 {
        self.record_id
    }

    pub fn zone(&self) -> &ZoneCode {
        &self.zone
    }

    pub fn schema(&self) -> &Arc<TableSchema> {
        &self.schema
    }

    /// Field values in schema order.
    pub fn values(&self) -> &[FieldValue] {
        &self.values
    }

    /// Look up a field by name. Fails with `UnknownField` for names outside
    /// the record's schema.
    pub fn get(&self, field: &str) -> Result<FieldValue> {
        match self.schema.position(field) {
            Some(i) => Ok(self.values[i]),
            None => Err(CensusError::UnknownField {
                field: field.to_string(),
                schema: self.schema.to_string(),
            }),
        }
    }

    /// The data row: zone code, then each value in schema field order.
    pub fn to_csv_row(&self) -> String {
        let mut row = self.zone.as_str().to_string();
        for value in &self.values {
            row.push(',');
            row.push_str(&value.to_string());
        }
        row
    }

    /// The header row matching [`to_csv_row`](Self::to_csv_row).
    pub fn to_csv_header(&self) -> String {
        self.schema.csv_header()
    }

    /// A copy of this record under a new identity. The zone label is
    /// space-padded (or truncated) to the fixed width.
    pub fn relabelled(&self, record_id: i64, zone_label: &str) -> CensusRecord {
        CensusRecord {
            record_id,
            zone: ZoneCode::padded(zone_label),
            schema: Arc::clone(&self.schema),
            values: self.values.clone(),
        }
    }

    fn ensure_same_schema(&self, other: &CensusRecord) -> Result<()> {
        if Arc::ptr_eq(&self.schema, &other.schema) || self.schema == other.schema {
            return Ok(());
        }
        Err(CensusError::SchemaMismatch {
            left: self.schema.to_string(),
            right: other.schema.to_string(),
        })
    }

    fn summed_values(&self, other: &CensusRecord) -> Vec<FieldValue> {
        self.values
            .iter()
            .zip(&other.values)
            .map(|(a, b)| a.wrapping_add(*b))
            .collect()
    }

    /// Field-wise sum of `self` and `other`.
    ///
    /// The result's record id and zone code come from **`other`**, not from
    /// `self`: this method clones `other` and adds `self`'s values in. The
    /// asymmetry is inherited from the legacy data model and callers rely
    /// on it, so it is part of the contract (see also
    /// [`aggregate_into`](Self::aggregate_into), which clones `self`).
    ///
    /// Counts add with wrapping arithmetic and no overflow checking; callers
    /// merging many small areas into large regions must keep magnitudes in
    /// range.
    pub fn aggregate(&self, other: &CensusRecord) -> Result<CensusRecord> {
        self.ensure_same_schema(other)?;
        Ok(CensusRecord {
            record_id: other.record_id,
            zone: other.zone.clone(),
            schema: Arc::clone(&other.schema),
            values: self.summed_values(other),
        })
    }

    /// Field-wise sum of `self` and `other` under an explicitly supplied
    /// identity. Unlike [`aggregate`](Self::aggregate) this clones `self`
    /// and adds `other`'s values in; with the identity overridden the two
    /// orientations produce identical records, but the asymmetry is kept to
    /// mirror the legacy contract.
    pub fn aggregate_into(
        &self,
        other: &CensusRecord,
        record_id: i64,
        zone_label: &str,
    ) -> Result<CensusRecord> {
        self.ensure_same_schema(other)?;
        Ok(CensusRecord {
            record_id,
            zone: ZoneCode::padded(zone_label),
            schema: Arc::clone(&self.schema),
            values: self.summed_values(other),
        })
    }
}

impl fmt::Display for CensusRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "recordId={} zoneCode={}", self.record_id, self.zone)?;
        for (name, value) in self.schema.field_names().zip(&self.values) {
            write!(f, " {}={}", name, value)?;
        }
        Ok(())
    }
}
