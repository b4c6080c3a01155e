//! Schema-driven records for UK Census 2001/2011 tabular outputs.
//!
//! Each published table (CAS001, KS002, … KS020) is described by a
//! [`TableSchema`]: the ordered, named numeric fields of one table for one
//! country variant. A single generic [`CensusRecord`] parses a raw
//! comma-separated line against a schema, exposes read-only field access,
//! renders CSV output, and supports field-wise additive aggregation for
//! merging geographies (output areas into wards and upward).
//!
//! Schemas for the published tables are built in (see [`schema::BUILTIN`]);
//! additional layouts load from JSON descriptors via
//! [`SchemaRegistry::load_dir`].
//!
//! # Lenient parsing
//!
//! For compatibility with how the published extracts were always consumed,
//! blank and non-numeric data cells parse to **zero** rather than erroring
//! (see [`parse`]). This silently masks malformed upstream data; coercions
//! of non-blank text are logged at warn level. The only structural parse
//! error is a zone-code column too short to hold the fixed 10-character
//! code.
//!
//! ```
//! use uk_census_records::{schema, CensusRecord};
//!
//! let layout = schema::resolve("KS017", "England/Wales")?;
//! let record = CensusRecord::from_line(0, layout, "'00AAFA0001,120,30,50,25,10,5,140")?;
//! assert_eq!(record.zone().as_str(), "00AAFA0001");
//! assert_eq!(record.get("allHouseholds")?.as_count(), Some(120));
//! # Ok::<(), uk_census_records::CensusError>(())
//! ```

pub mod aggregate;
pub mod binary;
pub mod error;
pub mod parse;
pub mod record;
pub mod schema;
pub mod zone;

pub use aggregate::merge_records;
pub use error::{CensusError, Result};
pub use record::CensusRecord;
pub use schema::{Country, FieldKind, FieldSpec, FieldValue, SchemaRegistry, TableSchema};
pub use zone::{ZoneCode, ZONE_CODE_WIDTH};
