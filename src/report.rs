//! Run reports: warnings, counts and applied Type B terms
use crate::station::StdDev;

use std::fmt::{Display, Formatter, Result as FmtResult};

#[cfg(feature = "log")]
use log::warn;

/// Summary of one processing run, rendered as a log file by [Display]
#[derive(Debug, Default, Clone, PartialEq)]
pub struct RunReport {
    /// Program (pipeline) name
    pub program: String,
    pub version: String,
    /// Input files, in processing order
    pub inputs: Vec<String>,
    /// Recoverable errors, in order of appearance
    pub warnings: Vec<String>,
    /// Type B standard deviations (m) applied to each station
    pub terms: Vec<(String, StdDev)>,
    /// Records (stations or sessions) that were processed
    pub processed: usize,
    /// Records (stations or sessions) encountered
    pub total: usize,
}

impl RunReport {
    pub fn new(program: &str, version: &str) -> Self {
        Self {
            program: program.to_string(),
            version: version.to_string(),
            ..Default::default()
        }
    }

    pub(crate) fn warn<T: ToString>(&mut self, warning: T) {
        let warning = warning.to_string();
        #[cfg(feature = "log")]
        warn!("{}", warning);
        self.warnings.push(warning);
    }

    /// Accumulates the warnings, terms and counts of `other`
    pub(crate) fn merge(&mut self, other: RunReport) {
        self.warnings.extend(other.warnings);
        self.terms.extend(other.terms);
        self.processed += other.processed;
        self.total += other.total;
    }

    pub fn has_warnings(&self) -> bool {
        !self.warnings.is_empty()
    }
}

impl Display for RunReport {
    fn fmt(&self, f: &mut Formatter) -> FmtResult {
        let rule = "-".repeat(50);
        writeln!(f, "{}", rule)?;
        writeln!(f, "{} log file", self.program)?;
        writeln!(f, "{}", rule)?;
        writeln!(f, "Program version         {}", self.version)?;
        for (i, input) in self.inputs.iter().enumerate() {
            if i == 0 {
                writeln!(f, "Input Files:            {}", input)?;
            } else {
                writeln!(f, "                        {}", input)?;
            }
        }
        writeln!(f, "{}", rule)?;
        writeln!(f)?;

        writeln!(f, "Warnings:")?;
        writeln!(f, "{}", rule)?;
        if self.warnings.is_empty() {
            writeln!(f, "<None>")?;
        }
        for warning in self.warnings.iter() {
            writeln!(f, "{}", warning)?;
        }
        writeln!(f)?;

        if !self.terms.is_empty() {
            writeln!(f, "Type B uncertainties added:")?;
            writeln!(f, "Station                 East   North      Up")?;
            writeln!(f, "{}", rule)?;
            for (station, sd) in self.terms.iter() {
                writeln!(
                    f,
                    "{:<20}{:>8.4}{:>8.4}{:>8.4}",
                    station, sd.east, sd.north, sd.up
                )?;
            }
            writeln!(f)?;
        }

        writeln!(f, "Processed:              {} of {}", self.processed, self.total)
    }
}
