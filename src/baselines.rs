//! Baseline clusters of SINEX solutions, into DynaML station and measurement files
use crate::{
    cfg::{ClusterConfig, FailurePolicy, VScale},
    dynaml::{
        format_cluster, format_footer, format_header, format_station, read_sigma_zero,
        ClusterHeader, DnaFile,
    },
    error::Error,
    propagation::BaselineCluster,
    report::RunReport,
    sinex::Solution,
};

use std::{
    collections::HashSet,
    fs::{remove_file, File},
    io::{BufWriter, Write},
    path::{Path, PathBuf},
};

#[cfg(feature = "log")]
use log::{debug, error};

/// Streams baseline clusters into one DynaML station file
/// and one DynaML measurement file.
/// Each solution is rendered completely before being written,
/// a failing solution never leaves a partial element behind.
pub struct ClusterWriter<W: Write> {
    cfg: ClusterConfig,
    stn: BufWriter<W>,
    msr: BufWriter<W>,
    /// Stations already written
    seen: HashSet<String>,
    report: RunReport,
}

impl<W: Write> ClusterWriter<W> {
    /// Creates a new [ClusterWriter], writing both file headers
    pub fn new(cfg: &ClusterConfig, stn: W, msr: W) -> Result<Self, Error> {
        let mut stn = BufWriter::new(stn);
        let mut msr = BufWriter::new(msr);
        format_header(&mut stn, DnaFile::Station)?;
        format_header(&mut msr, DnaFile::Measurement)?;
        Ok(Self {
            cfg: cfg.clone(),
            stn,
            msr,
            seen: HashSet::new(),
            report: RunReport::new("baselines", env!("CARGO_PKG_VERSION")),
        })
    }

    pub fn report(&self) -> &RunReport {
        &self.report
    }

    /// Appends the stations and the baseline cluster of `solution`.
    /// `source` names the solution in the measurement and in warnings.
    /// A missing reference station is a warning: the solution is skipped.
    pub fn add_solution(
        &mut self,
        solution: &Solution,
        source: &str,
        vscale: f64,
    ) -> Result<(), Error> {
        self.report.total += 1;

        let reference = if solution.stations.len() < 2 {
            None
        } else {
            match self.cfg.reference.select(solution, source) {
                Ok(reference) => Some(reference),
                Err(e) => {
                    self.report.warn(e);
                    return Ok(());
                },
            }
        };

        let mut stations = Vec::<u8>::new();
        let mut new = Vec::<String>::new();
        for station in solution.stations.iter() {
            if !self.seen.contains(&station.name) && !new.contains(&station.name) {
                format_station(&mut stations, station)?;
                new.push(station.name.clone());
            }
        }

        let mut measurement = Vec::<u8>::new();
        match reference {
            Some(reference) => {
                let cluster = BaselineCluster::new(solution, reference)?;
                #[cfg(feature = "log")]
                debug!(
                    "{}: {} baselines from \"{}\"",
                    source,
                    cluster.len(),
                    cluster.reference
                );
                let header = ClusterHeader {
                    reference_frame: self.cfg.reference_frame.clone(),
                    epoch: solution.epoch,
                    vscale,
                    pscale: self.cfg.pscale,
                    lscale: self.cfg.lscale,
                    hscale: self.cfg.hscale,
                };
                format_cluster(&mut measurement, &cluster, &header, source)?;
            },
            None => {
                self.report.warn(format!(
                    "{}: {} station(s), no baseline can be formed",
                    source,
                    solution.stations.len()
                ));
            },
        }

        self.stn.write_all(&stations)?;
        self.msr.write_all(&measurement)?;
        self.seen.extend(new);
        self.report.processed += 1;
        Ok(())
    }

    /// Parses and appends given SINEX file. The v-scale is read from the
    /// companion adjustment when configured so, a missing sigma zero
    /// is a warning and the file is skipped.
    pub fn add_file<P: AsRef<Path>>(&mut self, path: P) -> Result<(), Error> {
        let path = path.as_ref();
        let source = path.to_string_lossy().to_string();
        self.report.inputs.push(source.clone());

        let vscale = match self.cfg.vscale {
            VScale::Fixed(vscale) => vscale,
            VScale::SigmaZero => match read_sigma_zero(path) {
                Ok(sigma0) => sigma0,
                Err(Error::Lookup(e)) => {
                    self.report.total += 1;
                    self.report.warn(e);
                    return Ok(());
                },
                Err(e) => return Err(e),
            },
        };

        let solution = match Solution::from_file(path) {
            Ok(solution) => solution,
            Err(e) => {
                self.report.total += 1;
                return Err(e);
            },
        };
        self.add_solution(&solution, &source, vscale)
    }

    /// Terminates both files
    pub fn finish(mut self) -> Result<RunReport, Error> {
        format_footer(&mut self.stn)?;
        format_footer(&mut self.msr)?;
        self.stn.flush()?;
        self.msr.flush()?;
        Ok(self.report)
    }
}

/// Output file names of [generate]
pub fn output_paths(root: &str) -> (PathBuf, PathBuf) {
    (
        PathBuf::from(format!("{}stn.xml", root)),
        PathBuf::from(format!("{}msr.xml", root)),
    )
}

/// Generates `<root>stn.xml` and `<root>msr.xml` from given SINEX files.
/// Structurally invalid files stop the run (both outputs are then deleted)
/// or are reported and skipped, depending on the [FailurePolicy].
pub fn generate<P: AsRef<Path>>(
    cfg: &ClusterConfig,
    inputs: &[P],
    root: &str,
) -> Result<RunReport, Error> {
    let (stn_path, msr_path) = output_paths(root);
    let mut writer = ClusterWriter::new(cfg, File::create(&stn_path)?, File::create(&msr_path)?)?;
    for input in inputs {
        match writer.add_file(input) {
            Ok(()) => {},
            Err(Error::Format(e)) if cfg.failure == FailurePolicy::Continue => {
                let path = input.as_ref().display();
                writer.report.warn(format!("{}: {}", path, e));
            },
            Err(e) => {
                #[cfg(feature = "log")]
                error!("{}: {}", input.as_ref().display(), e);
                drop(writer);
                let _ = remove_file(&stn_path);
                let _ = remove_file(&msr_path);
                return Err(e);
            },
        }
    }
    writer.finish()
}
