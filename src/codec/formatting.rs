//! Number formatting compatible with legacy (C / Fortran like) reports

/// Right aligned fixed point notation, `%{width}.{prec}f`.
pub fn fmt_fixed(value: f64, width: usize, prec: usize) -> String {
    format!("{:>width$.prec$}", value, width = width, prec = prec)
}

/// Right aligned scientific notation, `%{width}.{prec}e`:
/// the exponent is always signed and at least two digits long
/// (`1.500000000e-05`), unlike Rust's `{:e}` (`1.5e-5`).
pub fn fmt_sci(value: f64, width: usize, prec: usize) -> String {
    let formatted = format!("{:.prec$e}", value, prec = prec);
    let sci = match formatted.split_once('e') {
        Some((mantissa, exponent)) => {
            let (sign, digits) = match exponent.strip_prefix('-') {
                Some(digits) => ('-', digits),
                None => ('+', exponent),
            };
            format!("{}e{}{:0>2}", mantissa, sign, digits)
        },
        // inf, NaN
        None => formatted,
    };
    format!("{:>width$}", sci, width = width)
}
