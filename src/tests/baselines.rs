#[cfg(test)]
mod test {
    use crate::baselines::output_paths;
    use crate::prelude::*;
    use crate::tests::toolkit::{assert_close, copy_resources, test_resource, xml_floats, xml_values};
    use std::fs::{read_to_string, write};
    use std::path::PathBuf;

    fn root(dir: &tempfile::TempDir) -> String {
        dir.path().join("net_").to_string_lossy().to_string()
    }

    #[test]
    fn three_stations_cluster() {
        let solution = Solution::from_file(test_resource("SNX", "three.snx")).unwrap();
        let names = solution
            .stations
            .iter()
            .map(|s| s.name.as_str())
            .collect::<Vec<_>>();
        assert_eq!(names, vec!["A", "B", "C"]);
        let (y, m, d, h, _, _, _) = solution.epoch.to_gregorian_utc();
        assert_eq!((y, m, d, h), (2018, 1, 1, 12));

        let cluster = BaselineCluster::new(&solution, 0).unwrap();
        assert_eq!(cluster.reference, "A");
        assert_eq!(cluster.len(), 2);

        let expected = [Vector3::new(1.0, 0.0, 0.0), Vector3::new(0.0, 1.0, 0.0)];
        for (baseline, delta) in cluster.baselines.iter().zip(expected.iter()) {
            assert_eq!(baseline.first, "A");
            assert!((baseline.delta - delta).amax() < 1.0E-6);
            let vcv = &baseline.covariance;
            assert!((vcv - Matrix3::identity() * 2.0E-6).amax() < 1.0E-18);
        }
        assert_eq!(cluster.baselines[1].second, "C");

        // both baselines share the reference station: its VCV correlates them
        let cross = cluster.cross_covariance(0, 1);
        assert!((cross - Matrix3::identity() * 1.0E-6).amax() < 1.0E-18);
        assert_eq!(cross, cluster.cross_covariance(1, 0).transpose());
    }

    #[test]
    fn generate_measurements() {
        let dir = tempfile::tempdir().unwrap();
        let inputs = copy_resources("SNX", &["three.snx", "pair.snx"], dir.path());
        let root = root(&dir);

        let report = generate(&ClusterConfig::default(), &inputs, &root).unwrap();
        assert!(!report.has_warnings(), "{:?}", report.warnings);
        assert_eq!(report.processed, 2);
        assert_eq!(report.total, 2);
        assert_eq!(report.inputs.len(), 2);

        let (stn, msr) = output_paths(&root);
        assert_eq!(stn, PathBuf::from(format!("{}stn.xml", root)));
        let stn = read_to_string(stn).unwrap();
        let msr = read_to_string(msr).unwrap();

        // B is shared by both solutions but written once
        assert_eq!(stn.matches("<DnaStation>").count(), 4);
        assert_eq!(
            xml_values(&stn, "Name"),
            vec!["A", "A", "B", "B", "C", "C", "D", "D"]
        );
        assert!(stn.starts_with("<?xml version=\"1.0\"?>\n<DnaXmlFormat type=\"Station File\""));
        assert!(stn.ends_with("</DnaXmlFormat>\n"));

        assert_eq!(msr.matches("<DnaMeasurement>").count(), 2);
        assert!(msr.contains("type=\"Measurement File\""));
        assert_eq!(xml_values(&msr, "Total"), vec!["2", "1"]);
        assert_eq!(xml_values(&msr, "Epoch"), vec!["01.01.2018", "01.02.2018"]);
        assert_eq!(xml_values(&msr, "ReferenceFrame"), vec!["GDA94", "GDA94"]);
        assert_eq!(xml_values(&msr, "Vscale"), vec!["1.000", "1.000"]);
        assert_eq!(xml_values(&msr, "First"), vec!["A", "A", "B"]);
        assert_eq!(xml_values(&msr, "Second"), vec!["B", "C", "D"]);

        let sources = xml_values(&msr, "Source");
        assert!(sources[0].ends_with("three.snx"));
        assert!(sources[1].ends_with("pair.snx"));

        // B -> D: 4 + 4 - 2 x 1 (mm²)
        let sigma_xx = xml_floats(&msr, "SigmaXX");
        assert_close(sigma_xx[2], 6.0E-6, 1.0E-18, "B->D variance");
        let x = xml_floats(&msr, "X");
        assert_close(x[2], 6.6143, 1.0E-4, "B->D delta");
        // single covariance block in the first cluster, none in the second
        assert_eq!(msr.matches("<GPSCovariance>").count(), 1);
        assert_eq!(xml_floats(&msr, "m11"), vec![1.0E-6]);
        assert_eq!(xml_floats(&msr, "m12"), vec![0.0]);
    }

    #[test]
    fn sigma_zero_vscale() {
        let dir = tempfile::tempdir().unwrap();
        let inputs = copy_resources(
            "SNX",
            &["three.snx", "pair.snx", "pair.simult.adj"],
            dir.path(),
        );
        let root = root(&dir);
        let cfg = ClusterConfig::default().with_vscale(VScale::SigmaZero);

        let report = generate(&cfg, &inputs[..2], &root).unwrap();
        assert_eq!(report.total, 2);
        assert_eq!(report.processed, 1);
        assert_eq!(report.warnings.len(), 1);
        assert!(report.warnings[0].starts_with("no sigma zero found in"));
        assert!(report.warnings[0].contains("three.simult.adj"));

        let (stn, msr) = output_paths(&root);
        let msr = read_to_string(msr).unwrap();
        assert_eq!(xml_values(&msr, "Vscale"), vec!["1.421"]);
        let stn = read_to_string(stn).unwrap();
        assert_eq!(stn.matches("<DnaStation>").count(), 2);
    }

    #[test]
    fn reference_station() {
        let dir = tempfile::tempdir().unwrap();
        let inputs = copy_resources("SNX", &["three.snx", "pair.snx"], dir.path());
        let root = root(&dir);
        let cfg = ClusterConfig::default().with_reference(ReferencePolicy::Explicit("d".to_string()));

        let report = generate(&cfg, &inputs, &root).unwrap();
        assert_eq!(report.total, 2);
        assert_eq!(report.processed, 1);
        assert_eq!(report.warnings.len(), 1);
        assert!(report.warnings[0].starts_with("reference station \"d\" does not exist"));

        let (_, msr) = output_paths(&root);
        let msr = read_to_string(msr).unwrap();
        assert_eq!(xml_values(&msr, "First"), vec!["D"]);
        assert_eq!(xml_values(&msr, "Second"), vec!["B"]);
        let x = xml_floats(&msr, "X");
        assert_close(x[0], -6.6143, 1.0E-4, "D->B delta");
    }

    #[test]
    fn failure_policies() {
        let dir = tempfile::tempdir().unwrap();
        let mut inputs = copy_resources("SNX", &["pair.snx"], dir.path());
        let bad = dir.path().join("corr.snx");
        let content = read_to_string(test_resource("SNX", "three.snx")).unwrap();
        write(&bad, content.replace("L COVA", "L CORR")).unwrap();
        inputs.insert(0, bad);
        let root = root(&dir);
        let (stn, msr) = output_paths(&root);

        let cfg = ClusterConfig::default();
        match generate(&cfg, &inputs, &root) {
            Err(Error::Format(FormatError::UnsupportedMatrix(matrix))) => {
                assert_eq!(matrix, "SOLUTION/MATRIX_ESTIMATE L CORR");
            },
            other => panic!("expecting unsupported matrix error, got {:?}", other),
        }
        assert!(!stn.exists());
        assert!(!msr.exists());

        let cfg = cfg.with_failure_policy(FailurePolicy::Continue);
        let report = generate(&cfg, &inputs, &root).unwrap();
        assert_eq!(report.total, 2);
        assert_eq!(report.processed, 1);
        assert_eq!(report.warnings.len(), 1);
        assert!(report.warnings[0].contains("corr.snx"));
        let msr = read_to_string(msr).unwrap();
        assert_eq!(msr.matches("<DnaMeasurement>").count(), 1);
    }

    #[test]
    fn single_station() {
        let solution = Solution::from_file(test_resource("SNX", "pair.snx")).unwrap();
        let single = Solution {
            epoch: solution.epoch,
            stations: solution.stations[..1].to_vec(),
            covariance: crate::vcv::CovarianceMatrix::zeros(1),
        };
        let (mut stn, mut msr) = (Vec::<u8>::new(), Vec::<u8>::new());
        let mut writer = ClusterWriter::new(&ClusterConfig::default(), &mut stn, &mut msr).unwrap();
        writer.add_solution(&single, "single.snx", 1.0).unwrap();
        writer.add_solution(&solution, "pair.snx", 1.0).unwrap();
        assert_eq!(writer.report().warnings.len(), 1);
        assert_eq!(
            writer.report().warnings[0],
            "single.snx: 1 station(s), no baseline can be formed"
        );
        let report = writer.finish().unwrap();
        assert_eq!(report.processed, 2);

        let stn = String::from_utf8(stn).unwrap();
        let msr = String::from_utf8(msr).unwrap();
        assert_eq!(xml_values(&stn, "Name"), vec!["B", "B", "D", "D"]);
        assert_eq!(msr.matches("<DnaMeasurement>").count(), 1);
    }
}
