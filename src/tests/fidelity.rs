#[cfg(test)]
mod test {
    use crate::dynadjust::banner;
    use crate::prelude::*;
    use crate::tests::toolkit::test_resource;
    use std::{fs::read_to_string, str::FromStr};

    /// Inserts `banner` before the second header rule
    fn with_banner(content: &str, banner: &str) -> String {
        let rule = "-".repeat(80);
        let mut rules = 0;
        let mut out = String::new();
        for line in content.split_inclusive('\n') {
            if line.trim_end_matches(&['\r', '\n'][..]) == rule {
                rules += 1;
                if rules == 2 {
                    out.push_str(banner);
                    out.push_str(if line.ends_with("\r\n") { "\r\n" } else { "\n" });
                }
            }
            out.push_str(line);
        }
        out
    }

    fn apu_format(report: &ApuReport, banner: Option<&str>) -> String {
        let mut buf = Vec::new();
        report.format(&mut buf, banner).unwrap();
        String::from_utf8(buf).unwrap()
    }

    fn listing_format(listing: &Listing, banner: Option<&str>) -> String {
        let mut buf = Vec::new();
        listing.format(&mut buf, banner).unwrap();
        String::from_utf8(buf).unwrap()
    }

    #[test]
    fn apu_passthrough() {
        let content = read_to_string(test_resource("DNA", "net.apu")).unwrap();
        let banner = banner(&TypeBConfig::default());
        for content in [content.clone(), content.replace('\n', "\r\n")] {
            let report = ApuReport::from_str(&content).unwrap();
            assert_eq!(report.stations().count(), 3);
            assert_eq!(apu_format(&report, None), content);
            assert_eq!(apu_format(&report, Some(&banner)), with_banner(&content, &banner));
        }
    }

    #[test]
    fn apu_records() {
        let content = read_to_string(test_resource("DNA", "net.apu")).unwrap();
        let report = ApuReport::from_str(&content).unwrap();
        assert_eq!(report.units(), VarianceUnits::Cartesian);

        let names = report.stations().map(|s| s.name()).collect::<Vec<_>>();
        assert_eq!(names, vec!["ALIC", "ALBY", "TEST STATION 01"]);
        let lines = report.stations().map(|s| s.line()).collect::<Vec<_>>();
        assert_eq!(lines, vec![26, 35, 41]);

        let alic = report.stations().next().unwrap();
        let (lat, lon) = alic.lat_lon().unwrap();
        assert!((lat - (-(23.0 + 40.0 / 60.0 + 12.345 / 3600.0))).abs() < 1.0E-9);
        assert!((lon - (133.0 + 53.0 / 60.0 + 12.345 / 3600.0)).abs() < 1.0E-9);
        assert_eq!(alic.positional_uncertainty(), (0.0123, 0.0234));
        assert_eq!(alic.ellipse(), (0.0063, 0.0062, 45.1234));
        let vcv = alic.vcv();
        assert_eq!(vcv[(0, 0)], 1.2E-5);
        assert_eq!(vcv[(1, 0)], -3.1E-6);
        assert_eq!(vcv[(0, 1)], -3.1E-6);
        assert_eq!(vcv[(2, 1)], -4.0E-6);
        assert_eq!(vcv[(2, 2)], 1.1E-5);

        let station = alic.station().unwrap();
        assert_eq!(station.name, "ALIC");
        assert_eq!(station.position().lat_lon(), Some((lat, lon)));
    }

    #[test]
    fn record_update() {
        let content = read_to_string(test_resource("DNA", "net.apu")).unwrap();
        let mut report = ApuReport::from_str(&content).unwrap();
        let model = TypeBModel::default();
        if let Some(station) = report.stations_mut().nth(1) {
            station
                .apply(&model, VarianceUnits::Cartesian, AngleFormat::Decimal)
                .unwrap();
        }
        let output = apu_format(&report, None);
        let (before, after) = (content.lines().collect::<Vec<_>>(), output.lines().collect::<Vec<_>>());
        assert_eq!(before.len(), after.len());
        for (nth, (before, after)) in before.iter().zip(after.iter()).enumerate() {
            let line = nth + 1;
            if (35..=37).contains(&line) {
                assert_ne!(before, after, "line {} should be updated", line);
                assert_eq!(before.len(), after.len(), "line {}", line);
            } else {
                assert_eq!(before, after, "line {} should be untouched", line);
            }
        }
        // name and position are re-encoded as read
        assert_eq!(&after[34][..51], &before[34][..51]);
    }

    #[test]
    fn listing_passthrough() {
        let banner = banner(&TypeBConfig::default());
        for (name, kind) in [
            ("net.xyz", ListingKind::Coordinates),
            ("net.adj", ListingKind::Adjustment),
        ] {
            let content = read_to_string(test_resource("DNA", name)).unwrap();
            let listing = Listing::parse(&content, kind).unwrap();
            assert_eq!(listing.kind(), kind);
            assert_eq!(
                listing.stations().collect::<Vec<_>>(),
                vec!["ALIC", "ALBY", "TEST STATION 01", "HOB2"]
            );
            assert_eq!(
                listing.uncertainty("ALBY"),
                Some(StdDev {
                    east: 0.0042,
                    north: 0.0041,
                    up: 0.0080,
                })
            );
            assert_eq!(listing_format(&listing, None), content);
            assert_eq!(
                listing_format(&listing, Some(&banner)),
                with_banner(&content, &banner)
            );
        }
    }
}
