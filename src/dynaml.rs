//! DynaML station and measurement files
use crate::{
    codec::fmt_sci,
    error::{Error, LookupError},
    propagation::BaselineCluster,
    reader::BufferedReader,
    station::Station,
};

use hifitime::Epoch;
use std::{
    io::{ErrorKind, Write},
    path::Path,
};
use strum_macros::Display;

/// Type of DynaML file
#[derive(Debug, Copy, Clone, PartialEq, Eq, Display)]
pub enum DnaFile {
    #[strum(serialize = "Station File")]
    Station,
    #[strum(serialize = "Measurement File")]
    Measurement,
}

/// DynaML numbers: `%20.14e`
fn fmt_dna(value: f64) -> String {
    fmt_sci(value, 20, 14)
}

/// Formats the XML declaration and the opening `DnaXmlFormat` element
pub fn format_header<W: Write>(w: &mut W, file: DnaFile) -> Result<(), Error> {
    writeln!(w, "<?xml version=\"1.0\"?>")?;
    writeln!(
        w,
        "<DnaXmlFormat type=\"{}\" xmlns:xsi=\"http://www.w3.org/2001/XMLSchema-instance\" xsi:noNamespaceSchemaLocation=\"DynaML.xsd\">",
        file
    )?;
    Ok(())
}

pub fn format_footer<W: Write>(w: &mut W) -> Result<(), Error> {
    writeln!(w, "</DnaXmlFormat>")?;
    Ok(())
}

/// Formats one free (FFF) station with its cartesian coordinates.
/// Stations without cartesian coordinates are not formatted.
pub fn format_station<W: Write>(w: &mut W, station: &Station) -> Result<(), Error> {
    let ecef = match station.position().ecef() {
        Some(ecef) => ecef,
        None => return Ok(()),
    };
    writeln!(w, "\t<DnaStation>")?;
    writeln!(w, "\t\t<Name>{}</Name>", station.name)?;
    writeln!(w, "\t\t<Constraints>FFF</Constraints>")?;
    writeln!(w, "\t\t<Type>XYZ</Type>")?;
    writeln!(w, "\t\t<StationCoord>")?;
    writeln!(w, "\t\t\t<Name>{}</Name>", station.name)?;
    writeln!(w, "\t\t\t<XAxis>{}</XAxis>", fmt_dna(ecef[0]))?;
    writeln!(w, "\t\t\t<YAxis>{}</YAxis>", fmt_dna(ecef[1]))?;
    writeln!(w, "\t\t\t<Height>{}</Height>", fmt_dna(ecef[2]))?;
    writeln!(w, "\t\t\t<HemisphereZone></HemisphereZone>")?;
    writeln!(w, "\t\t</StationCoord>")?;
    writeln!(w, "\t\t<Description></Description>")?;
    writeln!(w, "\t</DnaStation>")?;
    Ok(())
}

/// Header fields of a Type X measurement
#[derive(Debug, Clone, PartialEq)]
pub struct ClusterHeader {
    pub reference_frame: String,
    pub epoch: Epoch,
    pub vscale: f64,
    pub pscale: f64,
    pub lscale: f64,
    pub hscale: f64,
}

impl ClusterHeader {
    /// Epoch, as `dd.mm.yyyy`
    fn date(&self) -> String {
        let (y, m, d, _, _, _, _) = self.epoch.to_gregorian_utc();
        format!("{:02}.{:02}.{:04}", d, m, y)
    }
}

/// Formats a Type X (GNSS baseline cluster) measurement.
/// Each baseline carries its covariance blocks against every later
/// baseline of the cluster, `mRC` being row R of the earlier baseline
/// and column C of the later one.
pub fn format_cluster<W: Write>(
    w: &mut W,
    cluster: &BaselineCluster,
    header: &ClusterHeader,
    source: &str,
) -> Result<(), Error> {
    writeln!(w, "\t<!--Type X GNSS baseline cluster (full correlations)-->")?;
    writeln!(w, "\t<DnaMeasurement>")?;
    writeln!(w, "\t\t<Type>X</Type>")?;
    writeln!(w, "\t\t<Ignore/>")?;
    writeln!(w, "\t\t<ReferenceFrame>{}</ReferenceFrame>", header.reference_frame)?;
    writeln!(w, "\t\t<Epoch>{}</Epoch>", header.date())?;
    writeln!(w, "\t\t<Vscale>{:.3}</Vscale>", header.vscale)?;
    writeln!(w, "\t\t<Pscale>{:.3}</Pscale>", header.pscale)?;
    writeln!(w, "\t\t<Lscale>{:.3}</Lscale>", header.lscale)?;
    writeln!(w, "\t\t<Hscale>{:.3}</Hscale>", header.hscale)?;
    writeln!(w, "\t\t<Total>{}</Total>", cluster.len())?;
    for (i, baseline) in cluster.baselines.iter().enumerate() {
        writeln!(w, "\t\t<First>{}</First>", baseline.first)?;
        writeln!(w, "\t\t<Second>{}</Second>", baseline.second)?;
        writeln!(w, "\t\t<GPSBaseline>")?;
        for (axis, delta) in ["X", "Y", "Z"].iter().zip(baseline.delta.iter()) {
            writeln!(w, "\t\t\t<{}>{}</{}>", axis, fmt_dna(*delta), axis)?;
        }
        let vcv = &baseline.covariance;
        for (tag, (r, c)) in [
            ("SigmaXX", (0, 0)),
            ("SigmaXY", (0, 1)),
            ("SigmaXZ", (0, 2)),
            ("SigmaYY", (1, 1)),
            ("SigmaYZ", (1, 2)),
            ("SigmaZZ", (2, 2)),
        ] {
            writeln!(w, "\t\t\t<{}>{}</{}>", tag, fmt_dna(vcv[(r, c)]), tag)?;
        }
        for k in i + 1..cluster.len() {
            let cross = cluster.cross_covariance(i, k);
            writeln!(w, "\t\t\t<GPSCovariance>")?;
            for r in 0..3 {
                for c in 0..3 {
                    writeln!(
                        w,
                        "\t\t\t\t<m{}{}>{}</m{}{}>",
                        r + 1,
                        c + 1,
                        fmt_dna(cross[(r, c)]),
                        r + 1,
                        c + 1
                    )?;
                }
            }
            writeln!(w, "\t\t\t</GPSCovariance>")?;
        }
        writeln!(w, "\t\t</GPSBaseline>")?;
    }
    writeln!(w, "\t\t<Source>{}</Source>", source)?;
    writeln!(w, "\t</DnaMeasurement>")?;
    Ok(())
}

/// Returns the rigorous sigma zero of an adjustment report
pub fn parse_sigma_zero(content: &str) -> Option<f64> {
    content
        .lines()
        .find(|line| line.starts_with("Rigorous Sigma Zero"))
        .and_then(|line| line.split_ascii_whitespace().last())
        .and_then(|value| value.parse::<f64>().ok())
}

/// Companion adjustment report of a SINEX file: `<stem>.simult.adj`,
/// `stem` being the file name up to its first '.'
pub fn companion_adjustment<P: AsRef<Path>>(sinex: P) -> std::path::PathBuf {
    let sinex = sinex.as_ref();
    let name = sinex
        .file_name()
        .map(|name| name.to_string_lossy().to_string())
        .unwrap_or_default();
    let stem = name.split('.').next().unwrap_or_default();
    sinex.with_file_name(format!("{}.simult.adj", stem))
}

/// Reads the rigorous sigma zero from the companion adjustment of given SINEX file
pub fn read_sigma_zero<P: AsRef<Path>>(sinex: P) -> Result<f64, Error> {
    let path = companion_adjustment(sinex);
    let missing = || LookupError::SigmaZero(path.to_string_lossy().to_string());
    let content = match BufferedReader::new(&path) {
        Ok(reader) => reader.read_content()?,
        Err(e) if e.kind() == ErrorKind::NotFound => return Err(missing().into()),
        Err(e) => return Err(e.into()),
    };
    Ok(parse_sigma_zero(&content).ok_or_else(missing)?)
}
