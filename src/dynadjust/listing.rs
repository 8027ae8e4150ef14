//! Adjusted coordinate listings (.xyz and .adj reports)
use super::{is_rule, split_lines, BannerWriter, HEADER_RULE_LEN};
use crate::{
    codec::{encode, Column, ColumnKind, Record, Value},
    error::{Error, FormatError, LookupError},
    station::StdDev,
};

use std::{collections::HashMap, io::Write};

const ADJUSTED_COORDINATES: &str = "Adjusted Coordinates";

/// Station records start this many lines after [ADJUSTED_COORDINATES]
const LISTING_OFFSET: usize = 5;

const COORDINATE_TYPES_MARKER: &str = "Station coordinate types:          ";

/// The only supported coordinate listing
const COORDINATE_TYPES: &str = "ENzPLHhXYZ";

const STATION: [Column; 1] = [Column::new("station", 0, 20, ColumnKind::Text)];

/// Local standard deviations of a station record
const UNCERTAINTY: [Column; 3] = [
    Column::new("sd_e", 158, 170, ColumnKind::Fixed(4)),
    Column::new("sd_n", 170, 180, ColumnKind::Fixed(4)),
    Column::new("sd_u", 180, 190, ColumnKind::Fixed(4)),
];

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum ListingKind {
    /// `.xyz` coordinate listing, whose coordinate types are verified
    Coordinates,
    /// `.adj` adjustment report
    Adjustment,
}

#[derive(Debug, Clone, PartialEq)]
struct ListingLine {
    body: String,
    terminator: String,
    /// Station name, on station records
    station: Option<String>,
}

/// Report with an adjusted coordinates listing.
/// Only the standard deviation columns of station records are ever modified.
#[derive(Debug, Clone, PartialEq)]
pub struct Listing {
    kind: ListingKind,
    lines: Vec<ListingLine>,
}

impl Listing {
    pub fn parse(content: &str, kind: ListingKind) -> Result<Self, FormatError> {
        let mut lines = Vec::<ListingLine>::new();
        let mut start: Option<usize> = None;

        for (index, (body, terminator)) in split_lines(content).enumerate() {
            let line = index + 1;
            let mut station = None;

            if let Some(types) = body.strip_prefix(COORDINATE_TYPES_MARKER) {
                if kind == ListingKind::Coordinates && types.trim() != COORDINATE_TYPES {
                    return Err(FormatError::UnsupportedCoordinateTypes(
                        types.trim().to_string(),
                    ));
                }
            } else if body.trim_end() == ADJUSTED_COORDINATES {
                start = Some(line + LISTING_OFFSET);
            } else if start.map(|start| line >= start).unwrap_or(false)
                && !body.trim().is_empty()
                && !is_rule(body, HEADER_RULE_LEN)
            {
                let record = Record::decode(&STATION, body, line)?;
                station = record.text("station").ok().map(|name| name.to_string());
            }

            lines.push(ListingLine {
                body: body.to_string(),
                terminator: terminator.to_string(),
                station,
            });
        }

        Ok(Self { kind, lines })
    }

    pub fn kind(&self) -> ListingKind {
        self.kind
    }

    /// Listed stations, in order of appearance
    pub fn stations(&self) -> impl Iterator<Item = &str> + '_ {
        self.lines.iter().filter_map(|line| line.station.as_deref())
    }

    /// Standard deviations currently listed for `station`
    pub fn uncertainty(&self, station: &str) -> Option<StdDev> {
        let (index, line) = self
            .lines
            .iter()
            .enumerate()
            .find(|(_, line)| line.station.as_deref() == Some(station))?;
        let record = Record::decode(&UNCERTAINTY, &line.body, index + 1).ok()?;
        Some(StdDev {
            east: record.opt_float("sd_e")?,
            north: record.opt_float("sd_n")?,
            up: record.opt_float("sd_u")?,
        })
    }

    /// Overwrites the standard deviations of every listed station found in
    /// `uncertainties`. Other stations are untouched and reported,
    /// `file` names this listing in these reports.
    pub fn apply(
        &mut self,
        uncertainties: &HashMap<String, StdDev>,
        file: &str,
    ) -> Vec<LookupError> {
        let mut missing = Vec::new();
        for (index, line) in self.lines.iter_mut().enumerate() {
            let station = match &line.station {
                Some(station) => station,
                None => continue,
            };
            match uncertainties.get(station) {
                Some(sd) => {
                    let values = [
                        Value::Float(sd.east),
                        Value::Float(sd.north),
                        Value::Float(sd.up),
                    ];
                    line.body = encode(&line.body, &UNCERTAINTY, &values);
                },
                None => missing.push(LookupError::Station {
                    station: station.clone(),
                    line: index + 1,
                    file: file.to_string(),
                }),
            }
        }
        missing
    }

    /// Formats this listing, inserting `banner` at the end of the header
    pub fn format<W: Write>(&self, w: &mut W, banner: Option<&str>) -> Result<(), Error> {
        let mut writer = BannerWriter::new(w, banner);
        for line in self.lines.iter() {
            writer.write_line(&line.body, &line.terminator)?;
        }
        Ok(())
    }
}
