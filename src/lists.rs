//! Auxiliary station lists (one station per line)
use crate::{error::Error, reader::BufferedReader};

use std::collections::HashSet;
use std::path::Path;
use std::str::FromStr;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Ordered, immutable list of station names.
/// Blank lines and `*` / `#` comments are ignored, names are upper cased
/// and only the first token of each line is retained.
#[derive(Debug, Default, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(from = "Vec<String>", into = "Vec<String>"))]
pub struct StationList {
    names: Vec<String>,
    lookup: HashSet<String>,
}

impl StationList {
    pub fn from_names<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut list = Self::default();
        for name in names {
            let name = name.as_ref().trim().to_uppercase();
            if !name.is_empty() && list.lookup.insert(name.clone()) {
                list.names.push(name);
            }
        }
        list
    }

    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, Error> {
        let content = BufferedReader::new(path)?.read_content()?;
        Ok(Self::from_str(&content).unwrap_or_default())
    }

    pub fn contains(&self, name: &str) -> bool {
        self.lookup.contains(name)
    }

    /// Names, in list order
    pub fn iter(&self) -> impl Iterator<Item = &str> + '_ {
        self.names.iter().map(|s| s.as_str())
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }
}

impl FromStr for StationList {
    type Err = std::convert::Infallible;
    fn from_str(content: &str) -> Result<Self, Self::Err> {
        Ok(Self::from_names(content.lines().filter_map(|line| {
            let line = line.trim();
            if line.starts_with('*') || line.starts_with('#') {
                None
            } else {
                line.split_ascii_whitespace().next()
            }
        })))
    }
}

impl From<Vec<String>> for StationList {
    fn from(names: Vec<String>) -> Self {
        Self::from_names(names)
    }
}

impl From<StationList> for Vec<String> {
    fn from(list: StationList) -> Self {
        list.names
    }
}
