use thiserror::Error;

/// Structural errors: the file (or block) cannot be interpreted.
/// Always fatal for the file being processed.
#[derive(Error, Debug)]
pub enum FormatError {
    #[error("missing \"{0}\" block")]
    MissingBlock(&'static str),
    #[error("\"{0}\" block is not terminated")]
    UnterminatedBlock(&'static str),
    #[error("line {line}: expected STAX/STAY/STAZ triple for \"{site}\"")]
    BadCoordinateTriple { line: usize, site: String },
    #[error("line {line}: unsupported estimate parameter \"{param}\"")]
    UnsupportedParameter { line: usize, param: String },
    #[error("unsupported matrix \"{0}\", only lower/upper COVA is supported")]
    UnsupportedMatrix(String),
    #[error("line {line}: matrix index ({row}, {col}) out of {dim}x{dim} bounds")]
    MatrixIndex {
        line: usize,
        row: usize,
        col: usize,
        dim: usize,
    },
    #[error("line {line}: invalid \"{field}\" field \"{content}\"")]
    BadField {
        line: usize,
        field: &'static str,
        content: String,
    },
    #[error("line {line}: truncated record, \"{field}\" is missing")]
    MissingField { line: usize, field: &'static str },
    #[error("invalid reference epoch \"{0}\"")]
    BadEpoch(String),
    #[error("invalid HP notation angle {0}")]
    InvalidHpNotation(f64),
    #[error("unsupported variance matrix units \"{0}\"")]
    UnsupportedUnits(String),
    #[error("unsupported coordinate types \"{0}\", expecting \"ENzPLHhXYZ\"")]
    UnsupportedCoordinateTypes(String),
    #[error("line {0}: station record is incomplete")]
    IncompleteStationRecord(usize),
}

/// Undefined mathematical operation, fatal for the record.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum DomainError {
    #[error("degenerate error ellipse: semi major axis is null")]
    NullSemiMajor,
    #[error("error ellipse is not defined for this covariance (a={0}, b={1})")]
    UndefinedEllipse(f64, f64),
    #[error("negative vertical variance {0}")]
    NegativeVariance(f64),
    #[error("reference station #{reference} out of {stations} station(s)")]
    ReferenceIndex { reference: usize, stations: usize },
}

/// A station referenced by one dataset is missing from another one.
/// These are recoverable: record is passed through and a warning is kept.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum LookupError {
    #[error("reference station \"{0}\" does not exist in \"{1}\"")]
    ReferenceStation(String, String),
    #[error("{station} on line {line} not found in {file}")]
    Station {
        station: String,
        line: usize,
        file: String,
    },
    #[error("no sigma zero found in \"{0}\"")]
    SigmaZero(String),
}

/// Crate level error
#[derive(Error, Debug)]
pub enum Error {
    #[error("file i/o error")]
    IoError(#[from] std::io::Error),
    #[error("format error: {0}")]
    Format(#[from] FormatError),
    #[error("domain error: {0}")]
    Domain(#[from] DomainError),
    #[error("lookup error: {0}")]
    Lookup(#[from] LookupError),
}
