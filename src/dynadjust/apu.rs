//! Positional uncertainty reports (.apu)
use super::{is_rule, split_lines, BannerWriter};
use crate::{
    angle::{ddeg_to_hp, hp_to_ddeg},
    cfg::AngleFormat,
    codec::{encode, Column, ColumnKind, Record, Value},
    error::{Error, FormatError},
    station::Station,
    typeb::{Injection, TypeBModel, VarianceUnits},
    vcv::symmetric3,
};

use nalgebra::Matrix3;
use std::{io::Write, str::FromStr};

const UNITS_MARKER: &str = "Variance matrix units              ";

/// Separates the report header from the station listing
const LISTING_RULE_LEN: usize = 169;

const LISTING_HEADER: &str = "Station                     Latitude";

/// Station line, carrying the first row of the VCV
const FIRST_LINE: [Column; 11] = [
    Column::new("station", 0, 20, ColumnKind::Text),
    Column::new("latitude", 20, 36, ColumnKind::Fixed(9)),
    Column::new("longitude", 36, 51, ColumnKind::Fixed(9)),
    Column::new("hz_pu", 51, 62, ColumnKind::Fixed(4)),
    Column::new("vt_pu", 62, 73, ColumnKind::Fixed(4)),
    Column::new("semi_major", 73, 86, ColumnKind::Fixed(4)),
    Column::new("semi_minor", 86, 99, ColumnKind::Fixed(4)),
    Column::new("orientation", 99, 112, ColumnKind::Fixed(4)),
    Column::new("xx", 112, 131, ColumnKind::Scientific(9)),
    Column::new("xy", 131, 150, ColumnKind::Scientific(9)),
    Column::new("xz", 150, 169, ColumnKind::Scientific(9)),
];

const SECOND_LINE: [Column; 2] = [
    Column::new("yy", 131, 150, ColumnKind::Scientific(9)),
    Column::new("yz", 150, 169, ColumnKind::Scientific(9)),
];

const THIRD_LINE: [Column; 1] = [Column::new("zz", 150, 169, ColumnKind::Scientific(9))];

/// Number of fields of a listing line. Station names may contain blanks:
/// a named line counts as one field plus whatever follows column 21.
fn field_count(body: &str) -> usize {
    match body.get(..20) {
        Some(name) if !name.trim().is_empty() => {
            body.get(21..)
                .map(|rest| rest.split_ascii_whitespace().count())
                .unwrap_or(0)
                + 1
        },
        _ => body.split_ascii_whitespace().count(),
    }
}

/// One station record of the listing (three lines)
#[derive(Debug, Clone, PartialEq)]
pub struct ApuStation {
    name: String,
    /// HP notation, as listed
    latitude: f64,
    longitude: f64,
    horizontal_pu: f64,
    vertical_pu: f64,
    semi_major: f64,
    semi_minor: f64,
    orientation: f64,
    /// In report units
    vcv: Matrix3<f64>,
    line: usize,
    /// Lines and terminations as read, re-emitted until the record is modified
    raw: Vec<(String, String)>,
    modified: bool,
}

impl ApuStation {
    fn decode(record: &Record, body: &str, terminator: &str) -> Result<Self, FormatError> {
        let xx = record.float("xx")?;
        let xy = record.float("xy")?;
        let xz = record.float("xz")?;
        Ok(Self {
            name: record.text("station")?.to_string(),
            latitude: record.float("latitude")?,
            longitude: record.float("longitude")?,
            horizontal_pu: record.float("hz_pu")?,
            vertical_pu: record.float("vt_pu")?,
            semi_major: record.float("semi_major")?,
            semi_minor: record.float("semi_minor")?,
            orientation: record.float("orientation")?,
            vcv: symmetric3(xx, xy, xz, 0.0, 0.0, 0.0),
            line: record.line(),
            raw: vec![(body.to_string(), terminator.to_string())],
            modified: false,
        })
    }

    fn decode_second(&mut self, record: &Record, body: &str, terminator: &str) -> Result<(), FormatError> {
        let yy = record.float("yy")?;
        let yz = record.float("yz")?;
        self.vcv[(1, 1)] = yy;
        self.vcv[(1, 2)] = yz;
        self.vcv[(2, 1)] = yz;
        self.raw.push((body.to_string(), terminator.to_string()));
        Ok(())
    }

    fn decode_third(&mut self, record: &Record, body: &str, terminator: &str) -> Result<(), FormatError> {
        self.vcv[(2, 2)] = record.float("zz")?;
        self.raw.push((body.to_string(), terminator.to_string()));
        Ok(())
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Line number of the first line of this record
    pub fn line(&self) -> usize {
        self.line
    }

    /// Latitude and longitude, in decimal degrees
    pub fn lat_lon(&self) -> Result<(f64, f64), FormatError> {
        Ok((hp_to_ddeg(self.latitude)?, hp_to_ddeg(self.longitude)?))
    }

    /// Geodetic [Station] of this record
    pub fn station(&self) -> Result<Station, FormatError> {
        let (latitude, longitude) = self.lat_lon()?;
        Ok(Station::geodetic(&self.name, latitude, longitude))
    }

    /// Circularized horizontal and vertical PU (m)
    pub fn positional_uncertainty(&self) -> (f64, f64) {
        (self.horizontal_pu, self.vertical_pu)
    }

    /// Semi major axis, semi minor axis and orientation, as listed
    pub fn ellipse(&self) -> (f64, f64, f64) {
        (self.semi_major, self.semi_minor, self.orientation)
    }

    /// VCV, in report units
    pub fn vcv(&self) -> &Matrix3<f64> {
        &self.vcv
    }

    /// Injects the Type B terms and updates every derived value
    pub fn apply(
        &mut self,
        model: &TypeBModel,
        units: VarianceUnits,
        orientation: AngleFormat,
    ) -> Result<Injection, Error> {
        let (latitude, longitude) = self.lat_lon()?;
        let injection = model.apply(&self.name, &self.vcv, units, latitude, longitude)?;
        let pu = &injection.pu;
        self.horizontal_pu = pu.horizontal;
        self.vertical_pu = pu.vertical;
        self.semi_major = pu.ellipse.semi_major;
        self.semi_minor = pu.ellipse.semi_minor;
        self.orientation = match orientation {
            AngleFormat::Decimal => pu.ellipse.orientation,
            AngleFormat::Hp => ddeg_to_hp(pu.ellipse.orientation),
        };
        self.vcv = injection.vcv;
        self.modified = true;
        Ok(injection)
    }

    /// Lines (and terminations) of this record
    fn lines(&self) -> Vec<(String, &str)> {
        if !self.modified {
            return self
                .raw
                .iter()
                .map(|(body, terminator)| (body.clone(), terminator.as_str()))
                .collect();
        }
        let vcv = &self.vcv;
        let first = encode(
            "",
            &FIRST_LINE,
            &[
                Value::Text(self.name.clone()),
                Value::Float(self.latitude),
                Value::Float(self.longitude),
                Value::Float(self.horizontal_pu),
                Value::Float(self.vertical_pu),
                Value::Float(self.semi_major),
                Value::Float(self.semi_minor),
                Value::Float(self.orientation),
                Value::Float(vcv[(0, 0)]),
                Value::Float(vcv[(0, 1)]),
                Value::Float(vcv[(0, 2)]),
            ],
        );
        let second = encode(
            "",
            &SECOND_LINE,
            &[Value::Float(vcv[(1, 1)]), Value::Float(vcv[(1, 2)])],
        );
        let third = encode("", &THIRD_LINE, &[Value::Float(vcv[(2, 2)])]);
        [first, second, third]
            .into_iter()
            .zip(self.raw.iter())
            .map(|(body, (_, terminator))| (body, terminator.as_str()))
            .collect()
    }
}

#[derive(Debug, Clone, PartialEq)]
enum ApuLine {
    Verbatim { body: String, terminator: String },
    Station(ApuStation),
}

/// Positional uncertainty report. Lines that are not station records
/// are kept verbatim.
#[derive(Debug, Clone, PartialEq)]
pub struct ApuReport {
    units: VarianceUnits,
    lines: Vec<ApuLine>,
}

impl ApuReport {
    /// Axes of the VCV blocks. Reports without units marker are cartesian.
    pub fn units(&self) -> VarianceUnits {
        self.units
    }

    pub fn stations(&self) -> impl Iterator<Item = &ApuStation> + '_ {
        self.lines.iter().filter_map(|line| match line {
            ApuLine::Station(station) => Some(station),
            _ => None,
        })
    }

    pub fn stations_mut(&mut self) -> impl Iterator<Item = &mut ApuStation> + '_ {
        self.lines.iter_mut().filter_map(|line| match line {
            ApuLine::Station(station) => Some(station),
            _ => None,
        })
    }

    /// Formats this report, inserting `banner` at the end of the header
    pub fn format<W: Write>(&self, w: &mut W, banner: Option<&str>) -> Result<(), Error> {
        let mut writer = BannerWriter::new(w, banner);
        for line in self.lines.iter() {
            match line {
                ApuLine::Verbatim { body, terminator } => writer.write_line(body, terminator)?,
                ApuLine::Station(station) => {
                    for (body, terminator) in station.lines() {
                        writer.write_line(&body, terminator)?;
                    }
                },
            }
        }
        Ok(())
    }
}

impl FromStr for ApuReport {
    type Err = FormatError;
    fn from_str(content: &str) -> Result<Self, Self::Err> {
        let mut units = VarianceUnits::Cartesian;
        let mut lines = Vec::<ApuLine>::new();
        let mut listing = false;
        let mut pending: Option<ApuStation> = None;

        for (index, (body, terminator)) in split_lines(content).enumerate() {
            let line = index + 1;
            let verbatim = ApuLine::Verbatim {
                body: body.to_string(),
                terminator: terminator.to_string(),
            };

            if let Some(value) = body.strip_prefix(UNITS_MARKER) {
                units = VarianceUnits::from_str(value.trim())
                    .map_err(|_| FormatError::UnsupportedUnits(value.trim().to_string()))?;
            }

            if is_rule(body, LISTING_RULE_LEN) {
                listing = true;
                lines.push(verbatim);
                continue;
            }

            let passthrough = !listing
                || body.trim().is_empty()
                || (body.starts_with("Block ") && body.len() < 20)
                || body.starts_with(LISTING_HEADER);

            let fields = if passthrough { 0 } else { field_count(body) };
            let stage = pending.as_ref().map(|station| station.raw.len());

            match (fields, stage) {
                (11, None) => {
                    let record = Record::decode(&FIRST_LINE, body, line)?;
                    pending = Some(ApuStation::decode(&record, body, terminator)?);
                },
                (2, Some(1)) => {
                    let record = Record::decode(&SECOND_LINE, body, line)?;
                    if let Some(station) = pending.as_mut() {
                        station.decode_second(&record, body, terminator)?;
                    }
                },
                (1, Some(2)) => {
                    let record = Record::decode(&THIRD_LINE, body, line)?;
                    if let Some(mut station) = pending.take() {
                        station.decode_third(&record, body, terminator)?;
                        lines.push(ApuLine::Station(station));
                    }
                },
                (_, Some(_)) => {
                    let first = pending.as_ref().map(|s| s.line).unwrap_or(line);
                    return Err(FormatError::IncompleteStationRecord(first));
                },
                (_, None) => lines.push(verbatim),
            }
        }

        if let Some(station) = pending {
            return Err(FormatError::IncompleteStationRecord(station.line));
        }
        Ok(Self { units, lines })
    }
}
