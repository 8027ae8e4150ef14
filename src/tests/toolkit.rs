use std::{
    fs::copy,
    path::{Path, PathBuf},
};

/// Path to a test resource
pub fn test_resource(kind: &str, name: &str) -> PathBuf {
    PathBuf::new()
        .join(env!("CARGO_MANIFEST_DIR"))
        .join("test_resources")
        .join(kind)
        .join(name)
}

/// Copies test resources into `dir`, outputs are then produced next to the copies
pub fn copy_resources(kind: &str, names: &[&str], dir: &Path) -> Vec<PathBuf> {
    names
        .iter()
        .map(|name| {
            let target = dir.join(name);
            copy(test_resource(kind, name), &target)
                .unwrap_or_else(|e| panic!("failed to copy \"{}\": {}", name, e));
            target
        })
        .collect()
}

/// Content of every `<tag>` element, in order of appearance
pub fn xml_values(xml: &str, tag: &str) -> Vec<String> {
    let (open, close) = (format!("<{}>", tag), format!("</{}>", tag));
    xml.lines()
        .filter_map(|line| {
            let line = line.trim();
            line.strip_prefix(&open)?
                .strip_suffix(&close)
                .map(|value| value.to_string())
        })
        .collect()
}

/// Numerical content of every `<tag>` element
pub fn xml_floats(xml: &str, tag: &str) -> Vec<f64> {
    xml_values(xml, tag)
        .iter()
        .map(|value| {
            value
                .parse::<f64>()
                .unwrap_or_else(|_| panic!("<{}> is not a number: \"{}\"", tag, value))
        })
        .collect()
}

/// Asserts `a` and `b` are equal within `tol`
pub fn assert_close(a: f64, b: f64, tol: f64, msg: &str) {
    assert!((a - b).abs() <= tol, "{}: {} != {} (tol={})", msg, a, b, tol);
}
