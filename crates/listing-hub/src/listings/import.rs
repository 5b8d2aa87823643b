use std::io::Read;
use std::path::Path;

use serde::de::DeserializeOwned;

use super::rows::{MarketplaceRow, PropertyRow, UnitTypeRow};

pub const PROPERTIES_FILE: &str = "properties.csv";
pub const MARKETPLACE_FILE: &str = "marketplace.csv";
pub const UNIT_TYPES_FILE: &str = "unit_types.csv";

#[derive(Debug, thiserror::Error)]
pub enum ImportError {
    #[error("failed to read inventory export {file}: {source}")]
    Io {
        file: String,
        source: std::io::Error,
    },
    #[error("invalid inventory CSV in {file}: {source}")]
    Csv { file: String, source: csv::Error },
}

/// Raw rows of the three backend tables, as exported to CSV.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct InventorySnapshot {
    pub properties: Vec<PropertyRow>,
    pub marketplace: Vec<MarketplaceRow>,
    pub unit_types: Vec<UnitTypeRow>,
}

impl InventorySnapshot {
    /// Load `properties.csv`, `marketplace.csv` and `unit_types.csv` from `dir`.
    pub fn from_dir<P: AsRef<Path>>(dir: P) -> Result<Self, ImportError> {
        let dir = dir.as_ref();
        let open = |name: &str| {
            let path = dir.join(name);
            std::fs::File::open(&path).map_err(|source| ImportError::Io {
                file: path.display().to_string(),
                source,
            })
        };

        Self::from_readers(
            open(PROPERTIES_FILE)?,
            open(MARKETPLACE_FILE)?,
            open(UNIT_TYPES_FILE)?,
        )
    }

    pub fn from_readers<P, M, U>(
        properties: P,
        marketplace: M,
        unit_types: U,
    ) -> Result<Self, ImportError>
    where
        P: Read,
        M: Read,
        U: Read,
    {
        Ok(Self {
            properties: parse_rows(PROPERTIES_FILE, properties)?,
            marketplace: parse_rows(MARKETPLACE_FILE, marketplace)?,
            unit_types: parse_rows(UNIT_TYPES_FILE, unit_types)?,
        })
    }
}

fn parse_rows<T, R>(file: &str, reader: R) -> Result<Vec<T>, ImportError>
where
    T: DeserializeOwned,
    R: Read,
{
    let mut csv_reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(reader);

    csv_reader
        .deserialize::<T>()
        .map(|row| {
            row.map_err(|source| ImportError::Csv {
                file: file.to_string(),
                source,
            })
        })
        .collect()
}
