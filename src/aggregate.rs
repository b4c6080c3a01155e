//! Merging many same-schema records into one (e.g. output areas → ward).

use std::sync::Arc;

use crate::error::Result;
use crate::record::CensusRecord;
use crate::schema::types::TableSchema;

/// Sum a sequence of same-schema records into one record carrying the
/// supplied identity.
///
/// Addition is associative and commutative per field, so the result is
/// independent of record order (barring count wraparound). An empty
/// sequence yields a zeroed record for the new zone.
pub fn merge_records<'a, I>(
    schema: Arc<TableSchema>,
    records: I,
    record_id: i64,
    zone_label: &str,
) -> Result<CensusRecord>
where
    I: IntoIterator<Item = &'a CensusRecord>,
{
    let mut merged = CensusRecord::zeroed(record_id, schema).relabelled(record_id, zone_label);
    for record in records {
        // aggregate clones its operand, so identity stays with the accumulator
        merged = record.aggregate(&merged)?;
    }
    Ok(merged)
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::Result;
    use crate::schema;

    fn ward_records() -> Vec<CensusRecord> {
        let schema = schema::resolve("KS017", "").unwrap();
        [
            "'00AAFA0001,120,30,50,25,10,5,140",
            "'00AAFA0002,80,20,30,20,8,2,102",
            "'00AAFA0003,60,15,25,15,4,1,71",
        ]
        .iter()
        .enumerate()
        .map(|(i, line)| CensusRecord::from_line(i as i64, Arc::clone(&schema), line).unwrap())
        .collect()
    }

    #[test]
    fn merges_output_areas_into_a_ward() -> Result<()> {
        let records = ward_records();
        let schema = Arc::clone(records[0].schema());
        let ward = merge_records(schema, &records, 100, "00AAFA")?;

        assert_eq!(ward.record_id(), 100);
        assert_eq!(ward.zone().as_str(), "00AAFA    ");
        assert_eq!(ward.get("allHouseholds")?.as_count(), Some(260));
        assert_eq!(ward.get("allCarsOrVansInTheArea")?.as_count(), Some(313));
        Ok(())
    }

    #[test]
    fn merge_order_does_not_change_the_values() -> Result<()> {
        let mut records = ward_records();
        let schema = Arc::clone(records[0].schema());
        let forward = merge_records(Arc::clone(&schema), &records, 1, "w")?;
        records.reverse();
        let backward = merge_records(schema, &records, 1, "w")?;
        assert_eq!(forward.values(), backward.values());
        Ok(())
    }

    #[test]
    fn empty_input_yields_a_zeroed_record() -> Result<()> {
        let schema = schema::resolve("KS017", "").unwrap();
        let none: &[CensusRecord] = &[];
        let merged = merge_records(Arc::clone(&schema), none, 5, "empty")?;
        assert_eq!(merged.record_id(), 5);
        assert_eq!(merged.zone().as_str(), "empty     ");
        assert!(merged.values().iter().all(|v| v.as_count() == Some(0)));
        Ok(())
    }
}
