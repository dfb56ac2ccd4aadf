//! 파일 입력부터 재료 요약, 냉각/가열 스윕, 맵까지의 종단 테스트.
use std::fmt::Write as _;
use std::path::Path;

use approx::assert_relative_eq;
use radiative_cooling_toolbox::balance::{SweepError, SweepMode};
use radiative_cooling_toolbox::calculation::{
    cloud_map, evaluate_material, heating_map, power_components, run_cooling, run_heating,
    wind_map, CalcError, InputPaths, RunOptions, SpectralInputs, CLOUD_POINTS, WIND_MAX_M_S,
    WIND_POINTS,
};
use radiative_cooling_toolbox::config::{Config, DomainError};
use radiative_cooling_toolbox::spectrum::SpectrumKind;
use tempfile::TempDir;

fn assert_close(label: &str, actual: f64, expected: f64, rel_tol: f64) {
    let denom = expected.abs().max(1.0);
    let diff = (actual - expected).abs();
    assert!(
        diff <= rel_tol * denom,
        "{label} expected {expected:.6} got {actual:.6} (diff {diff:.6}, tol {rel_tol})"
    );
}

fn write_constant(path: &Path, start: f64, end: f64, step: f64, value: f64) {
    let n = ((end - start) / step).round() as usize;
    let mut text = String::from("wavelength value\n");
    for i in 0..=n {
        let _ = writeln!(text, "{:.4} {value}", start + i as f64 * step);
    }
    std::fs::write(path, text).expect("write dataset");
}

fn fixture() -> (TempDir, InputPaths) {
    let dir = tempfile::tempdir().expect("tempdir");
    let paths = InputPaths {
        reflectance: dir.path().join("reflectance.txt"),
        solar: dir.path().join("am15.txt"),
        emissivity: dir.path().join("emissivity.txt"),
        transmittance: dir.path().join("transmittance.txt"),
    };
    write_constant(&paths.reflectance, 0.25, 2.6, 0.05, 0.9);
    write_constant(&paths.solar, 0.28, 4.0, 0.02, 1.0);
    write_constant(&paths.emissivity, 8.0, 13.0, 0.1, 0.95);
    write_constant(&paths.transmittance, 2.0, 30.0, 0.5, 0.5);
    (dir, paths)
}

fn quick_config() -> Config {
    let mut cfg = Config::default();
    cfg.grid.infrared_step_um = 0.05;
    cfg.grid.angle_steps = 100;
    cfg
}

#[test]
fn material_summary_for_constant_spectra() {
    let (_dir, paths) = fixture();
    let inputs = SpectralInputs::load(&paths).expect("inputs");
    let summary = evaluate_material(&quick_config(), &inputs).expect("summary");
    assert_close("R_sol", summary.solar_reflectance, 0.9, 1e-12);
    assert_close("R_vis", summary.visible_reflectance, 0.9, 1e-12);
    assert_close("α_s", summary.solar_absorptance, 0.1, 1e-12);
    assert_close("ε̄", summary.average_emissivity, 0.95, 1e-12);
}

#[test]
fn cooling_run_reports_solar_load_and_power_0() {
    let (_dir, paths) = fixture();
    let inputs = SpectralInputs::load(&paths).expect("inputs");
    let cfg = quick_config();
    let options = RunOptions {
        diagnostics: true,
        cancel: None,
    };
    let report = run_cooling(&cfg, &inputs, options).expect("cooling");
    let sweep = &report.sweep;
    assert_eq!(sweep.rows(), 60);
    assert_eq!(sweep.cols(), cfg.hc_values.len());
    let cell = sweep.components_at(0, 0).expect("diagnostics");
    assert_close("Q_solar", cell.q_solar, 100.0, 1e-9);
    assert_eq!(sweep.operating_point.film_temperature_c, 25.0);
    assert_eq!(report.power_0, sweep.net_at(sweep.operating_point.film_index, 0));
    // 반쯤 투명한 대기에서 방출이 흡수보다 크다.
    assert!(cell.p_rad > 0.0 && cell.p_atm > 0.0);
}

#[test]
fn heating_run_mirrors_cooling_at_ambient() {
    let (_dir, paths) = fixture();
    let inputs = SpectralInputs::load(&paths).expect("inputs");
    let cfg = quick_config();
    let cooling = run_cooling(&cfg, &inputs, RunOptions::default()).expect("cooling");
    let heating = run_heating(&cfg, &inputs, RunOptions::default()).expect("heating");
    assert_eq!(heating.sweep.rows(), 80);
    assert_eq!(heating.sweep.film_temperatures_c[0], 0.0);
    assert_eq!(heating.sweep.mode, SweepMode::Heating);
    assert_close("Power_0", heating.power_0, -cooling.power_0, 1e-9);
}

#[test]
fn components_for_fixed_coefficient() {
    let (_dir, paths) = fixture();
    let inputs = SpectralInputs::load(&paths).expect("inputs");
    let cfg = quick_config();
    let cells = power_components(&cfg, &inputs, SweepMode::Cooling, 3.0).expect("components");
    assert_eq!(cells.len(), cfg.cooling_film.values().len());
    for (cell, t) in cells.iter().zip(cfg.cooling_film.values()) {
        assert_eq!(cell.film_temperature_c, t);
        assert_eq!(cell.coefficient, 3.0);
        assert_close("h_total", cell.h_total, cell.h_model + 3.0, 1e-12);
    }

    let err = power_components(&cfg, &inputs, SweepMode::Cooling, -1.0).expect_err("negative");
    assert!(matches!(err, CalcError::Config(DomainError::Negative { .. })));
}

#[test]
fn missing_dataset_names_the_input() {
    let (dir, mut paths) = fixture();
    paths.emissivity = dir.path().join("missing.txt");
    let err = SpectralInputs::load(&paths).expect_err("missing");
    match err {
        CalcError::Input { kind, .. } => assert_eq!(kind, SpectrumKind::Emissivity),
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn reflectance_outside_solar_band_is_integration_error() {
    let (_dir, paths) = fixture();
    write_constant(&paths.reflectance, 5.0, 10.0, 0.5, 0.9);
    let inputs = SpectralInputs::load(&paths).expect("inputs");
    let err = evaluate_material(&quick_config(), &inputs).expect_err("no overlap");
    assert!(matches!(err, CalcError::Integration { quantity: "태양 가중 반사율", .. }));
}

#[test]
fn invalid_config_is_rejected_before_computing() {
    let (_dir, paths) = fixture();
    let inputs = SpectralInputs::load(&paths).expect("inputs");
    let mut cfg = quick_config();
    cfg.hc_values.clear();
    let err = run_cooling(&cfg, &inputs, RunOptions::default()).expect_err("invalid");
    assert!(matches!(err, CalcError::Config(DomainError::EmptyCandidates)));
}

#[test]
fn cancelled_run_returns_error() {
    let (_dir, paths) = fixture();
    let inputs = SpectralInputs::load(&paths).expect("inputs");
    let cancel = || true;
    let options = RunOptions {
        diagnostics: false,
        cancel: Some(&cancel),
    };
    let err = run_cooling(&quick_config(), &inputs, options).expect_err("cancelled");
    assert!(matches!(err, CalcError::Sweep(SweepError::Cancelled)));
}

#[test]
fn default_heating_map_grid() {
    let (_dir, paths) = fixture();
    let inputs = SpectralInputs::load(&paths).expect("inputs");
    let map = heating_map(&quick_config(), &inputs, None, None).expect("map");
    assert_eq!(map.ambient_c.len(), 21);
    assert_eq!(map.solar_w_m2.len(), 49);
    assert_eq!(map.values().len(), 21 * 49);
    assert_eq!(map.ambient_c[0], -100.0);
    assert_eq!(map.solar_w_m2[48], 1200.0);
    // 같은 온도에서 조도 25 W/m² 증가 → α_s·25 증가
    assert_close("ΔP", map.value_at(10, 1) - map.value_at(10, 0), 0.1 * 25.0, 1e-9);
}

#[test]
fn default_cloud_map_grid() {
    let (_dir, paths) = fixture();
    let inputs = SpectralInputs::load(&paths).expect("inputs");
    let cfg = quick_config();
    let map = cloud_map(&cfg, &inputs, CLOUD_POINTS, CLOUD_POINTS, 1000.0).expect("cloud");
    assert_eq!(map.values().len(), 101 * 101);
    let sigma = cfg.constants.stefan_boltzmann();
    assert_relative_eq!(
        map.value_at(0, 0),
        0.95 * sigma * cfg.ambient_k().powi(4),
        max_relative = 1e-9
    );
    assert_close("overcast+sun", map.value_at(100, 100), -100.0, 1e-9);

    assert!(matches!(
        cloud_map(&cfg, &inputs, 0, 10, 1000.0),
        Err(CalcError::Config(DomainError::NonPositive { .. }))
    ));
}

#[test]
fn default_wind_map_grid() {
    let (_dir, paths) = fixture();
    let inputs = SpectralInputs::load(&paths).expect("inputs");
    let cfg = quick_config();
    let map = wind_map(&cfg, &inputs, WIND_POINTS, WIND_POINTS, WIND_MAX_M_S).expect("wind");
    assert_eq!(map.values().len(), 50 * 50);
    assert_eq!(map.atmospheric_emissivity[49], 1.0);
    assert_eq!(map.wind_m_s[49], 5.0);
    // 태양 부하 100 W/m² 아래에서 흐린 하늘은 주변보다 뜨겁다.
    assert!(map.value_at(49, 0) > 0.0);
    assert!(map.value_at(49, 49) < map.value_at(49, 0));

    assert!(matches!(
        wind_map(&cfg, &inputs, 50, 0, 5.0),
        Err(CalcError::Config(DomainError::NonPositive { .. }))
    ));
    assert!(matches!(
        wind_map(&cfg, &inputs, 50, 50, -1.0),
        Err(CalcError::Config(DomainError::Negative { .. }))
    ));
}
