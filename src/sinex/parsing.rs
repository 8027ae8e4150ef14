use super::Solution;
use crate::{
    codec::{Column, ColumnKind, Record},
    error::FormatError,
    station::Station,
    vcv::CovarianceMatrix,
};

use hifitime::{Epoch, TimeScale, Unit};

#[cfg(feature = "log")]
use log::debug;

const ESTIMATE: &str = "SOLUTION/ESTIMATE";
const MATRIX: &str = "SOLUTION/MATRIX_ESTIMATE";

/// `*INDEX TYPE__ CODE PT SOLN _REF_EPOCH__ UNIT S __ESTIMATED VALUE____ _STD_DEV___`
const ESTIMATE_RECORD: [Column; 10] = [
    Column::new("index", 1, 6, ColumnKind::Integer),
    Column::new("type", 7, 13, ColumnKind::Text),
    Column::new("code", 14, 18, ColumnKind::Text),
    Column::new("point", 19, 21, ColumnKind::Text),
    Column::new("solution", 22, 26, ColumnKind::Text),
    Column::new("epoch", 27, 39, ColumnKind::Text),
    Column::new("unit", 40, 44, ColumnKind::Text),
    Column::new("constraint", 45, 46, ColumnKind::Text),
    Column::new("estimate", 47, 68, ColumnKind::Scientific(14)),
    Column::new("stddev", 69, 80, ColumnKind::Scientific(5)),
];

/// `*PARA1 PARA2 ____PARA2+0__________ ____PARA2+1__________ ____PARA2+2__________`
const MATRIX_RECORD: [Column; 5] = [
    Column::new("row", 1, 6, ColumnKind::Integer),
    Column::new("col", 7, 12, ColumnKind::Integer),
    Column::new("v0", 13, 34, ColumnKind::Scientific(14)),
    Column::new("v1", 35, 56, ColumnKind::Scientific(14)),
    Column::new("v2", 57, 78, ColumnKind::Scientific(14)),
];

/// Returns block name, if this line opens (`+`) or closes (`-`) a block
fn block_marker(line: &str, marker: char) -> Option<&str> {
    line.strip_prefix(marker)
        .and_then(|rem| rem.split_ascii_whitespace().next())
}

fn is_structural(line: &str) -> bool {
    line.starts_with(&['+', '-', '*', '%'][..])
}

#[derive(Debug, Copy, Clone, PartialEq)]
enum Block {
    Estimate,
    Matrix,
    /// Skipped block
    Other,
}

/// Parses the reference epoch `YY:DDD:SSSSS`.
/// Two digit years below 94 belong to the 2000s.
pub(crate) fn parse_epoch(content: &str) -> Result<Epoch, FormatError> {
    let bad_epoch = || FormatError::BadEpoch(content.to_string());
    let mut items = content.trim().split(':');
    let (year, doy, secs) = match (items.next(), items.next(), items.next()) {
        (Some(y), Some(d), Some(s)) => (y, d, s),
        _ => return Err(bad_epoch()),
    };
    let year = year.parse::<i32>().map_err(|_| bad_epoch())?;
    let doy = doy.parse::<u16>().map_err(|_| bad_epoch())?;
    let secs = secs.parse::<u32>().map_err(|_| bad_epoch())?;
    let year = match year {
        0..=93 => year + 2000,
        94..=99 => year + 1900,
        _ => year,
    };
    if doy == 0 || doy > 366 || secs > 86400 {
        return Err(bad_epoch());
    }
    let day = Epoch::from_day_of_year(year, f64::from(doy), TimeScale::UTC);
    // day 366 of a common year
    if day.to_gregorian_utc().0 != year {
        return Err(bad_epoch());
    }
    // 86400 closes a day that had a leap second
    let secs = secs.min(86399);
    Ok(day + f64::from(secs) * Unit::Second)
}

/// Groups estimate records into stations
fn stations(records: &[Record]) -> Result<(Vec<Station>, Option<Epoch>), FormatError> {
    let mut stations = Vec::with_capacity(records.len() / 3);
    let mut epoch = None;
    for (nth, triple) in records.chunks(3).enumerate() {
        let first = &triple[0];
        let site = first.text("code")?.to_uppercase();
        if triple.len() != 3 {
            return Err(FormatError::BadCoordinateTriple {
                line: first.line(),
                site,
            });
        }
        let mut xyz = [0.0_f64; 3];
        for (axis, (record, expected)) in triple
            .iter()
            .zip(["STAX", "STAY", "STAZ"])
            .enumerate()
        {
            let param = record.text("type")?;
            if !param.starts_with("STA") {
                return Err(FormatError::UnsupportedParameter {
                    line: record.line(),
                    param: param.to_string(),
                });
            }
            if param != expected || record.text("code")?.to_uppercase() != site {
                return Err(FormatError::BadCoordinateTriple {
                    line: record.line(),
                    site,
                });
            }
            let index = record.integer("index")?;
            if index != (3 * nth + axis + 1) as i64 {
                return Err(FormatError::BadField {
                    line: record.line(),
                    field: "index",
                    content: index.to_string(),
                });
            }
            xyz[axis] = record.float("estimate")?;
        }
        if epoch.is_none() {
            epoch = Some(parse_epoch(first.text("epoch")?)?);
        }
        stations.push(Station::cartesian(&site, xyz[0], xyz[1], xyz[2]));
    }
    Ok((stations, epoch))
}

/// Expands the triangular matrix records into a dense symmetric VCV
fn covariance(records: &[Record], stations: usize) -> Result<CovarianceMatrix, FormatError> {
    let mut vcv = CovarianceMatrix::zeros(stations);
    let dim = vcv.dimension();
    for record in records {
        let row = record.integer("row")?;
        let col = record.integer("col")?;
        for (k, name) in ["v0", "v1", "v2"].into_iter().enumerate() {
            let value = match record.opt_float(name) {
                Some(value) => value,
                None => continue,
            };
            let (r, c) = (row - 1, col - 1 + k as i64);
            if r < 0 || c < 0 || r as usize >= dim || c as usize >= dim {
                return Err(FormatError::MatrixIndex {
                    line: record.line(),
                    row: row.max(0) as usize,
                    col: (col + k as i64).max(0) as usize,
                    dim,
                });
            }
            vcv.set_symmetric(r as usize, c as usize, value);
        }
    }
    Ok(vcv)
}

/// Parses a complete SINEX solution
pub(crate) fn parse(content: &str) -> Result<Solution, FormatError> {
    let mut block: Option<Block> = None;
    let mut estimate_seen = (false, false);
    let mut matrix_seen = (false, false);
    let mut unsupported_matrix: Option<String> = None;
    let mut estimates = Vec::<Record>::new();
    let mut matrix = Vec::<Record>::new();

    for (nth, line) in content.lines().enumerate() {
        let line_no = nth + 1;
        if let Some(name) = block_marker(line, '+') {
            block = Some(match name {
                ESTIMATE if !estimate_seen.0 => {
                    estimate_seen.0 = true;
                    Block::Estimate
                },
                MATRIX if !matrix_seen.0 => {
                    // `+SOLUTION/MATRIX_ESTIMATE L COVA`
                    let mut descriptor = line.split_ascii_whitespace().skip(1);
                    match (descriptor.next(), descriptor.next()) {
                        (Some("L"), Some("COVA")) | (Some("U"), Some("COVA")) => {
                            matrix_seen.0 = true;
                            Block::Matrix
                        },
                        _ => {
                            unsupported_matrix = Some(line[1..].trim().to_string());
                            Block::Other
                        },
                    }
                },
                _ => Block::Other,
            });
            continue;
        }
        if let Some(name) = block_marker(line, '-') {
            match block {
                Some(Block::Estimate) if name == ESTIMATE => estimate_seen.1 = true,
                Some(Block::Matrix) if name == MATRIX => matrix_seen.1 = true,
                _ => {},
            }
            block = None;
            continue;
        }
        if is_structural(line) || line.trim().is_empty() {
            continue;
        }
        match block {
            Some(Block::Estimate) => {
                estimates.push(Record::decode(&ESTIMATE_RECORD, line, line_no)?);
            },
            Some(Block::Matrix) => {
                matrix.push(Record::decode(&MATRIX_RECORD, line, line_no)?);
            },
            _ => {},
        }
    }

    if !estimate_seen.0 {
        return Err(FormatError::MissingBlock(ESTIMATE));
    }
    if !estimate_seen.1 {
        return Err(FormatError::UnterminatedBlock(ESTIMATE));
    }
    if !matrix_seen.0 {
        return match unsupported_matrix {
            Some(descriptor) => Err(FormatError::UnsupportedMatrix(descriptor)),
            None => Err(FormatError::MissingBlock(MATRIX)),
        };
    }
    if !matrix_seen.1 {
        return Err(FormatError::UnterminatedBlock(MATRIX));
    }

    let (stations, epoch) = stations(&estimates)?;
    let epoch = epoch.ok_or(FormatError::MissingBlock(ESTIMATE))?;
    let covariance = covariance(&matrix, stations.len())?;

    #[cfg(feature = "log")]
    debug!(
        "sinex: {} stations, {}x{} vcv",
        stations.len(),
        covariance.dimension(),
        covariance.dimension()
    );

    Ok(Solution {
        epoch,
        stations,
        covariance,
    })
}
