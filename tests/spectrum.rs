//! 분광 데이터 로드·정규화, PCHIP 재표본화, 가중 적분 회귀 테스트.
use approx::assert_relative_eq;
use radiative_cooling_toolbox::spectrum::{
    solar_weighted_reflectance, trapezoid, weighted_average, DataFormatError, IntegrationError,
    MonotoneInterpolator, SpectralDataset, SpectrumKind, WavelengthBand,
};
use radiative_cooling_toolbox::units::WavelengthUnit;

fn assert_close(label: &str, actual: f64, expected: f64, rel_tol: f64) {
    let denom = expected.abs().max(1.0);
    let diff = (actual - expected).abs();
    assert!(
        diff <= rel_tol * denom,
        "{label} expected {expected:.6} got {actual:.6} (diff {diff:.6}, tol {rel_tol})"
    );
}

fn constant(kind: SpectrumKind, start: f64, end: f64, n: usize, value: f64) -> SpectralDataset {
    let step = (end - start) / (n - 1) as f64;
    let x: Vec<f64> = (0..n).map(|i| start + i as f64 * step).collect();
    let y = vec![value; n];
    SpectralDataset::from_columns(kind, &x, &y).expect("dataset")
}

#[test]
fn text_loader_detects_nanometer_and_percent() {
    let text = "wavelength(nm), R(%)\n# comment\n300,90\n400;90\n500\t90\n";
    let ds = SpectralDataset::from_text(SpectrumKind::Reflectance, text).expect("parse");
    assert_eq!(ds.len(), 3);
    assert_eq!(ds.source_unit(), WavelengthUnit::Nanometer);
    assert!(ds.percent_scaled());
    assert_close("λ0", ds.wavelengths_um()[0], 0.3, 1e-12);
    assert_close("λ2", ds.wavelengths_um()[2], 0.5, 1e-12);
    for &v in ds.values() {
        assert_close("R", v, 0.9, 1e-12);
    }
}

#[test]
fn micrometer_fraction_data_is_untouched() {
    let ds = SpectralDataset::from_text(SpectrumKind::Emissivity, "8 0.9\n10 0.95\n13 0.8\n")
        .expect("parse");
    assert_eq!(ds.source_unit(), WavelengthUnit::Micrometer);
    assert!(!ds.percent_scaled());
    assert_eq!(ds.values(), &[0.9, 0.95, 0.8]);
    assert_eq!(ds.coverage(), WavelengthBand::new(8.0, 13.0));
}

#[test]
fn non_numeric_row_after_data_is_rejected() {
    let err = SpectralDataset::from_text(SpectrumKind::Reflectance, "1 0.5\n2 abc\n")
        .expect_err("must fail");
    match err {
        DataFormatError::NonNumeric { line, token } => {
            assert_eq!(line, 2);
            assert_eq!(token, "abc");
        }
        other => panic!("unexpected error: {other}"),
    }

    let err = SpectralDataset::from_text(SpectrumKind::Reflectance, "1 0.5\nx 0.2\n")
        .expect_err("must fail");
    assert!(matches!(err, DataFormatError::NonNumeric { line: 2, .. }));
}

#[test]
fn single_column_row_is_rejected() {
    let err = SpectralDataset::from_text(SpectrumKind::Reflectance, "1 0.5\n2\n3 0.5\n")
        .expect_err("must fail");
    assert!(matches!(err, DataFormatError::MissingColumns { line: 2 }));
}

#[test]
fn too_few_points_is_rejected() {
    let err = SpectralDataset::from_columns(SpectrumKind::Emissivity, &[1.0], &[0.5])
        .expect_err("must fail");
    assert!(matches!(err, DataFormatError::TooFewPoints { found: 1 }));

    let err = SpectralDataset::from_columns(SpectrumKind::Emissivity, &[1.0, 1.0], &[0.5, 0.6])
        .expect_err("duplicates collapse to one point");
    assert!(matches!(err, DataFormatError::TooFewPoints { found: 1 }));
}

#[test]
fn unsorted_input_is_sorted_and_duplicates_keep_first() {
    let ds = SpectralDataset::from_columns(
        SpectrumKind::Reflectance,
        &[3.0, 1.0, 2.0, 1.0],
        &[0.3, 0.1, 0.2, 0.4],
    )
    .expect("dataset");
    assert_eq!(ds.wavelengths_um(), &[1.0, 2.0, 3.0]);
    assert_eq!(ds.values(), &[0.1, 0.2, 0.3]);
}

#[test]
fn non_finite_rows_are_dropped() {
    let ds = SpectralDataset::from_columns(
        SpectrumKind::Transmittance,
        &[1.0, f64::NAN, 2.0, 3.0],
        &[0.5, 0.5, f64::INFINITY, 0.7],
    )
    .expect("dataset");
    assert_eq!(ds.wavelengths_um(), &[1.0, 3.0]);
}

#[test]
fn optical_values_are_clamped_but_solar_is_not() {
    let emis = SpectralDataset::from_columns(SpectrumKind::Emissivity, &[1.0, 2.0], &[1.2, -0.1])
        .expect("dataset");
    assert_eq!(emis.values(), &[1.0, 0.0]);

    let solar =
        SpectralDataset::from_columns(SpectrumKind::SolarIrradiance, &[1.0, 2.0], &[1.2, 0.3])
            .expect("dataset");
    assert_eq!(solar.values(), &[1.2, 0.3]);
}

#[test]
fn length_mismatch_is_rejected() {
    let err = SpectralDataset::from_columns(SpectrumKind::Emissivity, &[1.0, 2.0], &[0.5])
        .expect_err("must fail");
    assert!(matches!(
        err,
        DataFormatError::LengthMismatch {
            wavelengths: 2,
            values: 1
        }
    ));
}

#[test]
fn missing_file_reports_io_error() {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join("none.txt");
    let err = SpectralDataset::from_path(SpectrumKind::Emissivity, &path).expect_err("missing");
    assert!(matches!(err, DataFormatError::Io { .. }));
}

#[test]
fn file_loader_reads_text() {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join("emis.txt");
    std::fs::write(&path, "lambda eps\n8000 95\n10000 95\n13000 95\n").expect("write");
    let ds = SpectralDataset::from_path(SpectrumKind::Emissivity, &path).expect("load");
    assert_eq!(ds.kind(), SpectrumKind::Emissivity);
    assert_close("λ0", ds.wavelengths_um()[0], 8.0, 1e-12);
    assert_close("ε", ds.values()[1], 0.95, 1e-12);
}

#[test]
fn pchip_passes_through_nodes_and_reproduces_lines() {
    let interp =
        MonotoneInterpolator::new(vec![0.0, 1.0, 2.0, 3.0], vec![0.0, 2.0, 4.0, 6.0]).expect("ok");
    assert_close("node", interp.eval(2.0), 4.0, 1e-12);
    assert_close("mid", interp.eval(1.5), 3.0, 1e-12);
    assert_close("mid2", interp.eval(0.25), 0.5, 1e-12);
}

#[test]
fn pchip_does_not_overshoot_step_data() {
    let interp = MonotoneInterpolator::new(
        vec![0.0, 1.0, 2.0, 3.0, 4.0],
        vec![0.0, 0.0, 1.0, 1.0, 1.0],
    )
    .expect("ok");
    let mut prev = f64::MIN;
    for i in 0..=400 {
        let v = interp.eval(i as f64 * 0.01);
        assert!((0.0..=1.0).contains(&v), "overshoot {v}");
        assert!(v >= prev - 1e-15, "not monotone at {i}");
        prev = v;
    }
}

#[test]
fn pchip_clamps_outside_range() {
    let interp = MonotoneInterpolator::new(vec![1.0, 2.0, 3.0], vec![0.2, 0.5, 0.9]).expect("ok");
    assert_eq!(interp.eval(0.1), 0.2);
    assert_eq!(interp.eval(10.0), 0.9);
    assert_eq!(interp.resample(&[-5.0, 50.0]), vec![0.2, 0.9]);
}

#[test]
fn pchip_rejects_non_monotonic_nodes() {
    let err = MonotoneInterpolator::new(vec![1.0, 3.0, 2.0], vec![0.0, 1.0, 2.0])
        .expect_err("must fail");
    assert!(matches!(err, DataFormatError::NonMonotonic { index: 2 }));
}

#[test]
fn trapezoid_on_nonuniform_grid() {
    assert_close("∫x", trapezoid(&[0.0, 0.5, 2.0], &[0.0, 0.5, 2.0]), 2.0, 1e-12);
}

#[test]
fn weighted_average_of_constant_is_constant() {
    let x: Vec<f64> = (0..50).map(|i| 1.0 + i as f64 * 0.1).collect();
    let f = vec![0.7; x.len()];
    let w: Vec<f64> = x.iter().map(|v| (v * 3.0).sin().abs() + 0.1).collect();
    let avg = weighted_average(&f, &w, &x, &WavelengthBand::new(1.0, 6.0)).expect("avg");
    assert_relative_eq!(avg, 0.7, max_relative = 1e-12);
}

#[test]
fn weighted_average_errors() {
    let x = [1.0, 2.0, 3.0];
    let f = [0.5, 0.5, 0.5];
    let zero = [0.0, 0.0, 0.0];
    let band = WavelengthBand::new(1.0, 3.0);
    assert!(matches!(
        weighted_average(&f, &zero, &x, &band),
        Err(IntegrationError::ZeroWeight { .. })
    ));
    let narrow = WavelengthBand::new(1.5, 2.5);
    assert!(matches!(
        weighted_average(&f, &[1.0; 3], &x, &narrow),
        Err(IntegrationError::TooFewPoints { found: 1, .. })
    ));
    assert!(matches!(
        weighted_average(&f, &[1.0; 2], &x, &band),
        Err(IntegrationError::LengthMismatch { .. })
    ));
}

#[test]
fn solar_weighted_reflectance_of_constant_spectrum() {
    let reflectance = constant(SpectrumKind::Reflectance, 0.25, 2.6, 48, 0.9);
    let solar = constant(SpectrumKind::SolarIrradiance, 0.28, 4.0, 200, 1.0);
    let band = WavelengthBand::new(0.3, 2.5);
    let r_sol = solar_weighted_reflectance(&reflectance, &solar, &band).expect("R_sol");
    assert_relative_eq!(r_sol, 0.9, max_relative = 1e-12);
    let alpha = 1.0 - r_sol;
    assert!((0.0..=1.0).contains(&alpha));
}

#[test]
fn solar_weighted_reflectance_without_solar_overlap_fails() {
    let reflectance = constant(SpectrumKind::Reflectance, 0.3, 2.5, 20, 0.5);
    let solar = constant(SpectrumKind::SolarIrradiance, 5.0, 10.0, 20, 1.0);
    let err = solar_weighted_reflectance(&reflectance, &solar, &WavelengthBand::new(0.3, 2.5))
        .expect_err("no overlap");
    assert!(matches!(err, IntegrationError::TooFewPoints { found: 0, .. }));
}

#[test]
fn solar_weighting_follows_the_solar_shape() {
    // 태양광이 단파장 끝에만 있으면 R_sol 은 그 파장의 반사율이다.
    let x = [0.3, 1.0, 2.5];
    let reflectance =
        SpectralDataset::from_columns(SpectrumKind::Reflectance, &x, &[0.2, 0.8, 0.8])
            .expect("R");
    let solar = SpectralDataset::from_columns(SpectrumKind::SolarIrradiance, &x, &[1.0, 0.0, 0.0])
        .expect("S");
    let band = WavelengthBand::new(0.3, 2.5);
    let r_sol = solar_weighted_reflectance(&reflectance, &solar, &band).expect("R_sol");
    assert_close("R_sol", r_sol, 0.2, 1e-12);

    // 다른 격자의 태양 스펙트럼은 반사율 파장으로 재표본화된다.
    let finer = SpectralDataset::from_columns(
        SpectrumKind::SolarIrradiance,
        &[0.3, 0.65, 1.0, 1.75, 2.5],
        &[1.0, 0.5, 0.0, 0.0, 0.0],
    )
    .expect("S fine");
    let r_sol = solar_weighted_reflectance(&reflectance, &finer, &band).expect("R_sol");
    assert_close("R_sol resampled", r_sol, 0.2, 1e-12);
    // 균일 가중이었다면 0.2 보다 훨씬 크다.
    let flat = constant(SpectrumKind::SolarIrradiance, 0.3, 2.5, 23, 1.0);
    let r_flat = solar_weighted_reflectance(&reflectance, &flat, &band).expect("R_flat");
    assert!(r_flat > 0.6, "{r_flat}");
}

#[test]
fn byte_order_mark_is_ignored() {
    let text = "\u{feff}8 0.9\n10 0.95\n13 0.8\n";
    let ds = SpectralDataset::from_text(SpectrumKind::Emissivity, text).expect("parse");
    assert_eq!(ds.len(), 3);
    assert_eq!(ds.wavelengths_um()[0], 8.0);
    assert_eq!(ds.values()[0], 0.9);

    let with_header = "\u{feff}wavelength,emissivity\n8,0.9\n10,0.95\n";
    let ds = SpectralDataset::from_text(SpectrumKind::Emissivity, with_header).expect("parse");
    assert_eq!(ds.len(), 2);
}
