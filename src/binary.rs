//! Legacy fixed-width binary layout.
//!
//! Older tooling kept each table in a flat random-access file of
//! fixed-size records: the record id as an 8-byte big-endian integer, the
//! zone code as 10 big-endian UTF-16 code units, then every field in schema
//! order: 4-byte integers for counts, 8-byte IEEE doubles for measures.
//! The layout carries no field tags, so it is only readable against the
//! exact schema (and field order) it was written with.

use std::io::{self, Read, Seek, SeekFrom, Write};
use std::sync::Arc;

use crate::error::Result;
use crate::record::CensusRecord;
use crate::schema::types::{FieldKind, FieldValue, TableSchema};
use crate::zone::{ZoneCode, ZONE_CODE_WIDTH};

/// Size in bytes of one record of `schema`.
pub fn record_size(schema: &TableSchema) -> u64 {
    let field_bytes: u64 = schema
        .fields()
        .iter()
        .map(|f| match f.kind {
            FieldKind::Count => 4,
            FieldKind::Measure => 8,
        })
        .sum();
    8 + 2 * ZONE_CODE_WIDTH as u64 + field_bytes
}

/// Append one record at the writer's current position.
pub fn write_record<W: Write>(record: &CensusRecord, writer: &mut W) -> Result<()> {
    writer.write_all(&record.record_id().to_be_bytes())?;

    let units: Vec<u16> = record.zone().as_str().encode_utf16().collect();
    if units.len() != ZONE_CODE_WIDTH {
        return Err(io::Error::new(
            io::ErrorKind::InvalidData,
            format!("zone code {:?} is not {} UTF-16 units", record.zone(), ZONE_CODE_WIDTH),
        )
        .into());
    }
    for unit in units {
        writer.write_all(&unit.to_be_bytes())?;
    }

    for value in record.values() {
        match value {
            FieldValue::Count(n) => writer.write_all(&n.to_be_bytes())?,
            FieldValue::Measure(x) => writer.write_all(&x.to_be_bytes())?,
        }
    }
    Ok(())
}

/// Read one record of `schema` from the reader's current position.
pub fn read_record<R: Read>(schema: Arc<TableSchema>, reader: &mut R) -> Result<CensusRecord> {
    let mut id_buf = [0u8; 8];
    reader.read_exact(&mut id_buf)?;
    let record_id = i64::from_be_bytes(id_buf);

    let mut units = [0u16; ZONE_CODE_WIDTH];
    let mut unit_buf = [0u8; 2];
    for unit in &mut units {
        reader.read_exact(&mut unit_buf)?;
        *unit = u16::from_be_bytes(unit_buf);
    }
    let zone_text = String::from_utf16(&units)
        .map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))?;
    let zone = ZoneCode::padded(&zone_text);

    let mut values = Vec::with_capacity(schema.fields().len());
    for field in schema.fields() {
        let value = match field.kind {
            FieldKind::Count => {
                let mut buf = [0u8; 4];
                reader.read_exact(&mut buf)?;
                FieldValue::Count(i32::from_be_bytes(buf))
            }
            FieldKind::Measure => {
                let mut buf = [0u8; 8];
                reader.read_exact(&mut buf)?;
                FieldValue::Measure(f64::from_be_bytes(buf))
            }
        };
        values.push(value);
    }

    Ok(CensusRecord::from_parts(record_id, zone, schema, values))
}

/// Write the `index`-th record slot of a random-access file.
pub fn write_record_at<W: Write + Seek>(
    record: &CensusRecord,
    writer: &mut W,
    index: u64,
) -> Result<()> {
    writer.seek(SeekFrom::Start(index * record_size(record.schema())))?;
    write_record(record, writer)
}

/// Read the `index`-th record slot of a random-access file.
pub fn read_record_at<R: Read + Seek>(
    schema: Arc<TableSchema>,
    reader: &mut R,
    index: u64,
) -> Result<CensusRecord> {
    reader.seek(SeekFrom::Start(index * record_size(&schema)))?;
    read_record(schema, reader)
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::Result;
    use std::io::Cursor;
    use crate::schema;

    #[test]
    fn record_size_counts_every_field() -> Result<()> {
        let ks017 = schema::resolve("KS017", "")?;
        // 8 id + 20 zone + 7 counts * 4
        assert_eq!(record_size(&ks017), 8 + 20 + 28);

        let geometry = schema::resolve("CASAreaEastingNorthing", "")?;
        // 8 id + 20 zone + 3 measures * 8
        assert_eq!(record_size(&geometry), 8 + 20 + 24);
        Ok(())
    }

    #[test]
    fn count_records_round_trip() -> Result<()> {
        let schema = schema::resolve("KS017", "")?;
        let record = CensusRecord::from_line(
            42,
            Arc::clone(&schema),
            "'00AAFA0001,120,30,50,25,10,5,140",
        )?;

        let mut buf = Cursor::new(Vec::new());
        write_record(&record, &mut buf)?;
        assert_eq!(buf.get_ref().len() as u64, record_size(&schema));

        buf.set_position(0);
        let read_back = read_record(schema, &mut buf)?;
        assert_eq!(read_back, record);
        Ok(())
    }

    #[test]
    fn measure_records_round_trip() -> Result<()> {
        let schema = schema::resolve("CASAreaEastingNorthing", "")?;
        let record = CensusRecord::from_line(
            7,
            Arc::clone(&schema),
            "'00AAFA0001,12.5,430500.5,433999.25",
        )?;

        let mut buf = Cursor::new(Vec::new());
        write_record(&record, &mut buf)?;
        buf.set_position(0);
        assert_eq!(read_record(schema, &mut buf)?, record);
        Ok(())
    }

    #[test]
    fn positioned_access_addresses_record_slots() -> Result<()> {
        let schema = schema::resolve("KS017", "")?;
        let first = CensusRecord::from_line(
            0,
            Arc::clone(&schema),
            "'00AAFA0001,120,30,50,25,10,5,140",
        )?;
        let second = CensusRecord::from_line(
            1,
            Arc::clone(&schema),
            "'00AAFB0002,80,20,30,20,8,2,102",
        )?;

        let mut file = tempfile::tempfile()?;
        write_record_at(&first, &mut file, 0)?;
        write_record_at(&second, &mut file, 1)?;

        // read out of order
        assert_eq!(read_record_at(Arc::clone(&schema), &mut file, 1)?, second);
        assert_eq!(read_record_at(schema, &mut file, 0)?, first);
        Ok(())
    }
}
