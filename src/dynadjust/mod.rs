//! DynAdjust outputs: positional uncertainty reports (`.apu`),
//! coordinate listings (`.xyz`) and adjustments (`.adj`),
//! and the Type B pipeline that updates them.
use crate::{
    cfg::{FailurePolicy, TypeBConfig},
    error::Error,
    reader::BufferedReader,
    report::RunReport,
    station::{Station, StdDev},
    typeb::TypeBModel,
};

use itertools::Itertools;
use std::{
    collections::HashMap,
    fs::{remove_file, write},
    io::Write,
    path::{Path, PathBuf},
    str::FromStr,
};

#[cfg(feature = "log")]
use log::{debug, error};

mod apu;
mod listing;

pub use apu::{ApuReport, ApuStation};
pub use listing::{Listing, ListingKind};

/// Header separator: the banner goes right before the second one
const HEADER_RULE_LEN: usize = 80;

/// Splits `content` into (line, termination) pairs.
/// The last line may have no termination.
pub(crate) fn split_lines(content: &str) -> impl Iterator<Item = (&str, &str)> {
    content.split_inclusive('\n').map(|raw| {
        let body = raw.trim_end_matches(&['\r', '\n'][..]);
        (body, &raw[body.len()..])
    })
}

/// True if `line` is a rule of exactly `len` dashes
pub(crate) fn is_rule(line: &str, len: usize) -> bool {
    line.len() == len && line.bytes().all(|b| b == b'-')
}

/// Writes report lines, inserting a banner line before the second header rule
pub(crate) struct BannerWriter<'a, W: Write> {
    w: &'a mut W,
    banner: Option<&'a str>,
    rules: usize,
}

impl<'a, W: Write> BannerWriter<'a, W> {
    pub fn new(w: &'a mut W, banner: Option<&'a str>) -> Self {
        Self { w, banner, rules: 0 }
    }

    pub fn write_line(&mut self, body: &str, terminator: &str) -> std::io::Result<()> {
        if is_rule(body, HEADER_RULE_LEN) {
            self.rules += 1;
            if self.rules == 2 {
                if let Some(banner) = self.banner {
                    let terminator = if terminator.is_empty() { "\n" } else { terminator };
                    write!(self.w, "{}{}", banner, terminator)?;
                }
            }
        }
        write!(self.w, "{}{}", body, terminator)
    }
}

/// Millimeters, without useless decimals
fn fmt_mm(sd: f64) -> String {
    format!("{}", (sd * 1.0E4).round() / 10.0)
}

fn fmt_terms(sd: &StdDev) -> String {
    let terms = [sd.east, sd.north, sd.up].into_iter().map(fmt_mm).join(", ");
    format!("{} mm", terms)
}

/// Banner line describing the Type B model that was applied
pub fn banner(cfg: &TypeBConfig) -> String {
    format!(
        "Type B Uncertainties               {} for reference grade stations; {} for other stations. Applied by gnss-vcv (version: {}).",
        fmt_terms(&cfg.reference_grade),
        fmt_terms(&cfg.other),
        cfg.version
    )
}

/// Output path of a report: `<input>.TypeB`
pub fn typeb_path<P: AsRef<Path>>(input: P) -> PathBuf {
    let mut path = input.as_ref().as_os_str().to_owned();
    path.push(".TypeB");
    PathBuf::from(path)
}

/// Reports of one adjustment
#[derive(Debug, Clone, PartialEq)]
pub struct TypeBJob {
    pub apu: PathBuf,
    pub xyz: PathBuf,
    /// Adjustment report, updated when provided
    pub adj: Option<PathBuf>,
}

impl TypeBJob {
    pub fn new<P: AsRef<Path>>(apu: P, xyz: P) -> Self {
        Self {
            apu: apu.as_ref().to_path_buf(),
            xyz: xyz.as_ref().to_path_buf(),
            adj: None,
        }
    }

    pub fn with_adjustment<P: AsRef<Path>>(&self, adj: P) -> Self {
        let mut s = self.clone();
        s.adj = Some(adj.as_ref().to_path_buf());
        s
    }

    /// Input files, adjustment first
    pub fn inputs(&self) -> Vec<String> {
        self.adj
            .iter()
            .chain([&self.apu, &self.xyz])
            .map(|path| path.display().to_string())
            .collect()
    }

    /// Output files, adjustment first
    pub fn outputs(&self) -> Vec<PathBuf> {
        self.adj
            .iter()
            .chain([&self.apu, &self.xyz])
            .map(typeb_path)
            .collect()
    }
}

fn read<P: AsRef<Path>>(path: P) -> Result<String, Error> {
    Ok(BufferedReader::new(path)?.read_content()?)
}

/// Applies the Type B terms to the reports of `job`, writing the `.TypeB` outputs.
/// Every output is rendered before anything is written: structural errors
/// leave no output behind. Stations whose ellipse cannot be recalculated
/// and listed stations without uncertainty are reported as warnings.
pub fn process(
    cfg: &TypeBConfig,
    model: &TypeBModel,
    job: &TypeBJob,
    report: &mut RunReport,
) -> Result<(), Error> {
    let banner = banner(cfg);
    let mut summary = RunReport::default();

    let mut apu = ApuReport::from_str(&read(&job.apu)?)?;
    let units = apu.units();
    let mut stations = Vec::<Station>::new();
    for record in apu.stations_mut() {
        summary.total += 1;
        match record.apply(model, units, cfg.orientation) {
            Ok(injection) => {
                summary.processed += 1;
                summary
                    .terms
                    .push((record.name().to_string(), injection.terms));
                stations.push(record.station()?.with_uncertainty(injection.sd));
            },
            Err(Error::Domain(e)) => {
                summary.warn(format!(
                    "{} on line {}: {}",
                    record.name(),
                    record.line(),
                    e
                ));
            },
            Err(e) => return Err(e),
        }
    }
    #[cfg(feature = "log")]
    debug!(
        "{}: {}/{} stations updated ({} units)",
        job.apu.display(),
        summary.processed,
        summary.total,
        units
    );

    let uncertainties = stations
        .iter()
        .filter_map(|station| {
            station
                .uncertainty()
                .map(|sd| (station.name.clone(), *sd))
        })
        .collect::<HashMap<_, _>>();

    let mut outputs = Vec::<(PathBuf, Vec<u8>)>::with_capacity(3);
    let mut buf = Vec::new();
    apu.format(&mut buf, Some(&banner))?;
    outputs.push((typeb_path(&job.apu), buf));

    let listings = [
        (Some(&job.xyz), ListingKind::Coordinates),
        (job.adj.as_ref(), ListingKind::Adjustment),
    ];
    for (path, kind) in listings {
        if let Some(path) = path {
            let mut listing = Listing::parse(&read(path)?, kind)?;
            for e in listing.apply(&uncertainties, &path.display().to_string()) {
                summary.warn(e);
            }
            let mut buf = Vec::new();
            listing.format(&mut buf, Some(&banner))?;
            outputs.push((typeb_path(path), buf));
        }
    }

    for (i, (path, content)) in outputs.iter().enumerate() {
        if let Err(e) = write(path, content) {
            for (written, _) in outputs.iter().take(i) {
                let _ = remove_file(written);
            }
            return Err(e.into());
        }
    }

    report.merge(summary);
    Ok(())
}

/// Runs the Type B pipeline over several jobs, then writes the run log.
/// Structurally invalid reports stop the run or are reported and skipped,
/// depending on the [FailurePolicy].
pub fn run<P: AsRef<Path>>(
    cfg: &TypeBConfig,
    jobs: &[TypeBJob],
    log: P,
) -> Result<RunReport, Error> {
    let model = TypeBModel::from_config(cfg);
    let mut report = RunReport::new("typeb", &cfg.version);
    for job in jobs {
        report.inputs.extend(job.inputs());
        match process(cfg, &model, job, &mut report) {
            Ok(()) => {},
            Err(Error::Format(e)) if cfg.failure == FailurePolicy::Continue => {
                report.warn(format!("{}: {}", job.apu.display(), e));
            },
            Err(e) => {
                #[cfg(feature = "log")]
                error!("{}: {}", job.apu.display(), e);
                return Err(e);
            },
        }
    }
    write(log, report.to_string())?;
    Ok(report)
}
