use std::collections::HashMap;
use std::fmt;
use std::fs;
use std::io::Read;
use std::path::Path;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::{debug, error, warn};

use crate::error::{CensusError, Result};
use crate::schema::types::{FieldKind, FieldSpec, TableSchema};

/// The three publication variants of the UK census. England and Wales share
/// one set of column layouts; Scotland and Northern Ireland each publish
/// their own for a handful of tables.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Country {
    EnglandWales,
    Scotland,
    NorthernIreland,
}

impl Country {
    /// Resolve a caller-supplied label, case-insensitively. Anything other
    /// than "Scotland" or "Northern Ireland" selects the England/Wales
    /// layout, matching how the source data was always consumed.
    pub fn from_label(label: &str) -> Country {
        if label.trim().eq_ignore_ascii_case("scotland") {
            Country::Scotland
        } else if label.trim().eq_ignore_ascii_case("northern ireland") {
            Country::NorthernIreland
        } else {
            Country::EnglandWales
        }
    }
}

impl fmt::Display for Country {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Country::EnglandWales => f.write_str("England/Wales"),
            Country::Scotland => f.write_str("Scotland"),
            Country::NorthernIreland => f.write_str("Northern Ireland"),
        }
    }
}

/// How one table's layouts are registered.
#[derive(Debug, Clone)]
enum Variants {
    /// One layout shared by all three countries.
    Shared(Arc<TableSchema>),
    /// Country-specific layouts (KS013, KS015).
    PerCountry(HashMap<Country, Arc<TableSchema>>),
}

/// Registry of table schemas keyed by (table id, country).
///
/// Immutable after construction in normal use, so it can be shared freely
/// across threads behind an `Arc` or a `Lazy` static.
#[derive(Debug, Clone, Default)]
pub struct SchemaRegistry {
    map: HashMap<String, Variants>,
}

impl SchemaRegistry {
    pub fn new() -> SchemaRegistry {
        SchemaRegistry::default()
    }

    /// Register a schema under its table id. A schema with no country
    /// variant serves all three countries; a schema with a variant serves
    /// that country only. Re-registering replaces (logged).
    pub fn insert(&mut self, schema: TableSchema) {
        let key = schema.table().to_ascii_uppercase();
        let schema = Arc::new(schema);
        match schema.variant() {
            None => {
                if self.map.insert(key.clone(), Variants::Shared(schema)).is_some() {
                    warn!(table = %key, "replacing registered schema");
                }
            }
            Some(country) => {
                let entry = self
                    .map
                    .entry(key.clone())
                    .or_insert_with(|| Variants::PerCountry(HashMap::new()));
                match entry {
                    Variants::PerCountry(by_country) => {
                        if by_country.insert(country, schema).is_some() {
                            warn!(table = %key, %country, "replacing registered schema variant");
                        }
                    }
                    Variants::Shared(_) => {
                        // descriptor authoring error: a table is either
                        // shared or per-country, never both
                        warn!(table = %key, %country, "shared schema replaced by per-country variant");
                        let mut by_country = HashMap::new();
                        by_country.insert(country, schema);
                        *entry = Variants::PerCountry(by_country);
                    }
                }
            }
        }
    }

    /// Look up the schema for a (table, country) pair.
    ///
    /// Fails with `UnknownSchema` when the table is not registered at all,
    /// or is registered per-country without a layout for `country`; it
    /// never falls back to another country's layout.
    pub fn resolve(&self, table: &str, country: Country) -> Result<Arc<TableSchema>> {
        let key = table.to_ascii_uppercase();
        let unknown = || CensusError::UnknownSchema {
            table: table.to_string(),
            country,
        };
        match self.map.get(&key).ok_or_else(unknown)? {
            Variants::Shared(schema) => Ok(Arc::clone(schema)),
            Variants::PerCountry(by_country) => {
                by_country.get(&country).map(Arc::clone).ok_or_else(unknown)
            }
        }
    }

    /// Like [`resolve`](Self::resolve), with the country supplied as a raw
    /// label ("Scotland", "Northern Ireland", anything else ⇒
    /// England/Wales, case-insensitive).
    pub fn resolve_label(&self, table: &str, country_label: &str) -> Result<Arc<TableSchema>> {
        self.resolve(table, Country::from_label(country_label))
    }

    /// Registered table ids, in no particular order.
    pub fn tables(&self) -> impl Iterator<Item = &str> {
        self.map.keys().map(String::as_str)
    }

    /// Load one JSON table descriptor and register it.
    pub fn load_descriptor<R: Read>(&mut self, reader: R) -> Result<()> {
        let descriptor: TableDescriptor = serde_json::from_reader(reader)?;
        let schema = descriptor.into_schema()?;
        debug!(table = schema.table(), "loaded schema descriptor");
        self.insert(schema);
        Ok(())
    }

    /// Load every `*_schema.json` descriptor in `dir`, skipping corrupt
    /// files. Returns the number of descriptors registered.
    pub fn load_dir<P: AsRef<Path>>(&mut self, dir: P) -> Result<usize> {
        let mut loaded = 0;
        for entry in fs::read_dir(dir.as_ref())? {
            let path = entry?.path();
            let fname = match path.file_name().and_then(|n| n.to_str()) {
                Some(f) => f,
                None => continue,
            };
            if !fname.ends_with("_schema.json") {
                continue;
            }
            match fs::File::open(&path)
                .map_err(CensusError::from)
                .and_then(|f| self.load_descriptor(f))
            {
                Ok(()) => loaded += 1,
                Err(e) => error!("skipping corrupt {:?}: {}", path, e),
            }
        }
        Ok(loaded)
    }
}

/// On-disk JSON form of one table schema.
///
/// ```json
/// {
///   "table": "KS017",
///   "fields": [
///     { "name": "allHouseholds", "columns": 1 },
///     { "name": "householdsWithNoCarOrVan", "columns": 2 }
///   ]
/// }
/// ```
///
/// `country` is optional (absent ⇒ shared layout), `kind` defaults to
/// `"count"`, and `columns` is a single index or an array of indices to sum.
#[derive(Debug, Serialize, Deserialize)]
struct TableDescriptor {
    table: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    country: Option<String>,
    fields: Vec<FieldDescriptor>,
}

#[derive(Debug, Serialize, Deserialize)]
struct FieldDescriptor {
    name: String,
    #[serde(default = "FieldDescriptor::default_kind")]
    kind: FieldKind,
    columns: Columns,
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(untagged)]
enum Columns {
    One(usize),
    Many(Vec<usize>),
}

impl FieldDescriptor {
    fn default_kind() -> FieldKind {
        FieldKind::Count
    }
}

impl TableDescriptor {
    fn into_schema(self) -> Result<TableSchema> {
        let variant = self.country.as_deref().map(Country::from_label);
        let fields = self
            .fields
            .into_iter()
            .map(|f| FieldSpec {
                name: f.name,
                kind: f.kind,
                columns: match f.columns {
                    Columns::One(c) => vec![c],
                    Columns::Many(cs) => cs,
                },
            })
            .collect();
        TableSchema::new(self.table, variant, fields)
    }
}
