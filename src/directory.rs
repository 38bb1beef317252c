//! Static airport directory loaded from an OpenFlights `airports.dat` file.
//!
//! Row layout (quoted CSV, no header):
//!
//! ```text
//! 3469,"San Francisco International Airport","San Francisco","United States","SFO","KSFO",37.6189994812,-122.375,...
//!  0    1                                      2               3               4     5      6             7
//! ```

use crate::types::Airport;
use std::collections::HashMap;
use std::fs::File;
use std::io::{self, Read};
use std::path::Path;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum DirectoryError {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
}

const NAME_FIELD: usize = 1;
const COUNTRY_FIELD: usize = 3;
const ICAO_FIELD: usize = 5;
const LAT_FIELD: usize = 6;
const LON_FIELD: usize = 7;

/// Keyed airport table. Lookups never fail except for "not found".
#[derive(Debug, Default, Clone)]
pub struct AirportDirectory {
    airports: HashMap<String, Airport>,
}

impl AirportDirectory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Load a directory from an `airports.dat` file.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self, DirectoryError> {
        let file = File::open(path.as_ref())?;
        let dir = Self::from_reader(file)?;
        tracing::info!(
            "Loaded {} airports from {}",
            dir.len(),
            path.as_ref().display()
        );
        Ok(dir)
    }

    /// Load a directory from any CSV source.
    pub fn from_reader<R: Read>(reader: R) -> Result<Self, DirectoryError> {
        let mut dir = Self::new();
        let mut rdr = csv::ReaderBuilder::new()
            .has_headers(false)
            .flexible(true)
            .from_reader(reader);

        for (idx, result) in rdr.records().enumerate() {
            let record = match result {
                Ok(record) => record,
                Err(e) if e.is_io_error() => return Err(e.into()),
                Err(e) => {
                    tracing::debug!("Skipping airport row {}: {}", idx + 1, e);
                    continue;
                }
            };
            match parse_row(&record) {
                Some(airport) => dir.insert(airport),
                None => tracing::debug!("Skipping airport row {}", idx + 1),
            }
        }

        Ok(dir)
    }

    /// Add an airport unless its code is already present.
    pub fn insert(&mut self, airport: Airport) {
        self.airports.entry(airport.code.clone()).or_insert(airport);
    }

    pub fn get(&self, code: &str) -> Option<&Airport> {
        self.airports.get(code)
    }

    pub fn len(&self) -> usize {
        self.airports.len()
    }

    pub fn is_empty(&self) -> bool {
        self.airports.is_empty()
    }
}

impl FromIterator<Airport> for AirportDirectory {
    fn from_iter<I: IntoIterator<Item = Airport>>(iter: I) -> Self {
        let mut dir = Self::new();
        for airport in iter {
            dir.insert(airport);
        }
        dir
    }
}

fn parse_row(record: &csv::StringRecord) -> Option<Airport> {
    let code = record.get(ICAO_FIELD)?.trim();
    if code.is_empty() || code == "\\N" {
        return None;
    }

    let latitude = record.get(LAT_FIELD)?.trim().parse().ok()?;
    let longitude = record.get(LON_FIELD)?.trim().parse().ok()?;

    Some(Airport::new(
        code,
        record.get(NAME_FIELD)?,
        record.get(COUNTRY_FIELD)?,
        latitude,
        longitude,
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::{Cursor, Write};
    use tempfile::NamedTempFile;

    const ROWS: &str = r#"3469,"San Francisco International Airport","San Francisco","United States","SFO","KSFO",37.61899948120117,-122.375,13,-8,"A","America/Los_Angeles","airport","OurAirports"
193,"Lester B. Pearson International Airport","Toronto","Canada","YYZ","CYYZ",43.6772003174,-79.63059997559999,569,-5,"A","America/Toronto","airport","OurAirports"
9999,"Nowhere, Strip","Nowhere","Atlantis","\N","\N",0,0,0,0,"U","\N","airport","OurAirports"
1,"Broken","X","Y","BRK","XBRK",north,east,0,0,"U","\N","airport","OurAirports"
"#;

    #[test]
    fn test_from_reader() {
        let dir = AirportDirectory::from_reader(Cursor::new(ROWS)).unwrap();
        assert_eq!(dir.len(), 2);

        let sfo = dir.get("KSFO").unwrap();
        assert_eq!(sfo.name, "San Francisco International Airport");
        assert_eq!(sfo.country, "United States");
        assert!((sfo.latitude - 37.619).abs() < 1e-3);
        assert!((sfo.longitude + 122.375).abs() < 1e-9);

        assert!(dir.get("XBRK").is_none());
        assert!(dir.get("ksfo").is_none());
    }

    #[test]
    fn test_quoted_fields() {
        let rows = concat!(
            "1,\"Name, With Comma\",\"City\",\"Land\",\"NWC\",\"KNWC\",1.0,2.0\n",
            "5,\"Base \"\"Alpha\"\" Field\",\"Town\",\"Land\",\"BAF\",\"KBAF\",10.5,20.5\n",
        );
        let dir = AirportDirectory::from_reader(Cursor::new(rows)).unwrap();

        assert_eq!(dir.get("KNWC").unwrap().name, "Name, With Comma");
        let baf = dir.get("KBAF").unwrap();
        assert_eq!(baf.name, "Base \"Alpha\" Field");
        assert_eq!(baf.country, "Land");
        assert_eq!(baf.latitude, 10.5);
    }

    #[test]
    fn test_first_row_wins() {
        let rows = "1,\"First\",\"C\",\"A\",\"AAA\",\"KAAA\",1.0,2.0\n2,\"Second\",\"C\",\"B\",\"AAA\",\"KAAA\",3.0,4.0\n";
        let dir = AirportDirectory::from_reader(Cursor::new(rows)).unwrap();
        assert_eq!(dir.get("KAAA").unwrap().name, "First");
    }

    #[test]
    fn test_open_file() {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(ROWS.as_bytes()).unwrap();

        let dir = AirportDirectory::open(file.path()).unwrap();
        assert!(dir.get("CYYZ").is_some());

        assert!(AirportDirectory::open(file.path().with_extension("missing")).is_err());
    }
}
