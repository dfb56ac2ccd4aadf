//! 설정과 네 개의 분광 데이터로 재료 요약, 냉각/가열 스윕, 진단 성분, 파라미터 맵을 계산하는 진입점.

use std::path::PathBuf;

use thiserror::Error;

use crate::balance::{
    emissivity_solar_cloud, linspace, run_sweep, theoretical_heating_map, wind_cooling_map,
    CloudMap, HeatingMap, PowerComponents, SweepError, SweepInput, SweepMode, SweepResult,
    WindBalance, WindMap,
};
use crate::config::{Config, DomainError, TemperatureRange};
use crate::radiation::{blackbody_weighted_average, AngleGrid, RadiativeEvaluator, SpectralGrid};
use crate::spectrum::{
    solar_weighted_reflectance, DataFormatError, IntegrationError, SpectralDataset, SpectrumKind,
};

/// 이론 가열 맵 기본 주변 온도 축: (최소 °C, 최대 °C, 점 수)
pub const HEATING_MAP_AMBIENT: (f64, f64, usize) = (-100.0, 100.0, 21);
/// 이론 가열 맵 기본 태양 조도 축: (최소, 최대 W/m², 점 수)
pub const HEATING_MAP_SOLAR: (f64, f64, usize) = (0.0, 1200.0, 49);
/// 방사율–조도 맵 기본 격자
pub const CLOUD_POINTS: usize = 101;
pub const CLOUD_SOLAR_MAX_W_M2: f64 = 1000.0;
/// 풍속 냉각 맵 기본 격자
pub const WIND_POINTS: usize = 50;
pub const WIND_MAX_M_S: f64 = 5.0;

/// 계산 진입점 오류. 어떤 입력/물리량에서 실패했는지 함께 담는다.
#[derive(Debug, Error)]
pub enum CalcError {
    #[error("설정 값 오류: {0}")]
    Config(#[from] DomainError),
    #[error("{kind} 데이터 오류: {source}")]
    Input {
        kind: SpectrumKind,
        #[source]
        source: DataFormatError,
    },
    #[error("{quantity} 계산 실패: {source}")]
    Integration {
        quantity: &'static str,
        #[source]
        source: IntegrationError,
    },
    #[error("적외 계산 격자 오류: {0}")]
    Grid(DataFormatError),
    #[error("스윕 오류: {0}")]
    Sweep(#[from] SweepError),
}

/// 분광 데이터 파일 경로.
#[derive(Debug, Clone)]
pub struct InputPaths {
    pub reflectance: PathBuf,
    pub solar: PathBuf,
    pub emissivity: PathBuf,
    pub transmittance: PathBuf,
}

/// 정규화된 네 분광 데이터.
#[derive(Debug, Clone)]
pub struct SpectralInputs {
    pub reflectance: SpectralDataset,
    pub solar: SpectralDataset,
    pub emissivity: SpectralDataset,
    pub transmittance: SpectralDataset,
}

impl SpectralInputs {
    pub fn load(paths: &InputPaths) -> Result<Self, CalcError> {
        let load = |kind, path: &PathBuf| {
            SpectralDataset::from_path(kind, path)
                .map_err(|source| CalcError::Input { kind, source })
        };
        Ok(Self {
            reflectance: load(SpectrumKind::Reflectance, &paths.reflectance)?,
            solar: load(SpectrumKind::SolarIrradiance, &paths.solar)?,
            emissivity: load(SpectrumKind::Emissivity, &paths.emissivity)?,
            transmittance: load(SpectrumKind::Transmittance, &paths.transmittance)?,
        })
    }
}

/// 재료 광학 요약.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MaterialSummary {
    /// 태양 가중 반사율 R_sol
    pub solar_reflectance: f64,
    /// 가시광 반사율 R_vis
    pub visible_reflectance: f64,
    /// α_s = 1 − R_sol
    pub solar_absorptance: f64,
    /// 주변 온도 흑체 가중 평균 방사율
    pub average_emissivity: f64,
}

/// 냉각/가열 진입점 결과.
#[derive(Debug, Clone)]
pub struct PowerReport {
    pub material: MaterialSummary,
    pub sweep: SweepResult,
    /// ΔT≈0 행, 첫 번째 후보 계수의 순 전력
    pub power_0: f64,
}

/// 스윕 실행 옵션.
#[derive(Clone, Copy, Default)]
pub struct RunOptions<'a> {
    /// 셀별 전체 성분 보관 여부
    pub diagnostics: bool,
    /// 열 시작 전 확인하는 협조적 취소 검사
    pub cancel: Option<&'a (dyn Fn() -> bool + Sync)>,
}

/// R_sol, R_vis, α_s, 평균 방사율을 계산한다.
pub fn evaluate_material(
    config: &Config,
    inputs: &SpectralInputs,
) -> Result<MaterialSummary, CalcError> {
    config.validate()?;
    let solar_reflectance =
        solar_weighted_reflectance(&inputs.reflectance, &inputs.solar, &config.bands.solar)
            .map_err(|source| CalcError::Integration {
                quantity: "태양 가중 반사율",
                source,
            })?;
    let visible_reflectance =
        solar_weighted_reflectance(&inputs.reflectance, &inputs.solar, &config.bands.visible)
            .map_err(|source| CalcError::Integration {
                quantity: "가시광 반사율",
                source,
            })?;
    let average_emissivity = blackbody_weighted_average(
        &config.constants.planck(),
        inputs.emissivity.wavelengths_um(),
        inputs.emissivity.values(),
        &config.bands.infrared,
        config.ambient_k(),
    )
    .map_err(|source| CalcError::Integration {
        quantity: "평균 방사율",
        source,
    })?;

    let summary = MaterialSummary {
        solar_reflectance,
        visible_reflectance,
        solar_absorptance: (1.0 - solar_reflectance).clamp(0.0, 1.0),
        average_emissivity,
    };
    log::info!(
        "R_sol={:.4}, R_vis={:.4}, α_s={:.4}, ε̄={:.4}",
        summary.solar_reflectance,
        summary.visible_reflectance,
        summary.solar_absorptance,
        summary.average_emissivity
    );
    Ok(summary)
}

/// 설정의 적외 대역/격자로 복사 항 계산기를 만든다.
pub fn build_evaluator(
    config: &Config,
    inputs: &SpectralInputs,
) -> Result<RadiativeEvaluator, CalcError> {
    let grid = SpectralGrid::uniform(&config.bands.infrared, config.grid.infrared_step_um)
        .map_err(CalcError::Grid)?;
    let angles = AngleGrid::build(config.grid.angle_steps)?;
    Ok(RadiativeEvaluator::new(
        config.constants.planck(),
        grid,
        angles,
        &inputs.emissivity,
        &inputs.transmittance,
    ))
}

/// 냉각 모드 전력수지 스윕 (`cooling_film` 범위).
pub fn run_cooling(
    config: &Config,
    inputs: &SpectralInputs,
    options: RunOptions<'_>,
) -> Result<PowerReport, CalcError> {
    run_mode(config, inputs, SweepMode::Cooling, &config.cooling_film, options)
}

/// 가열 모드 전력수지 스윕 (`heating_film` 범위).
pub fn run_heating(
    config: &Config,
    inputs: &SpectralInputs,
    options: RunOptions<'_>,
) -> Result<PowerReport, CalcError> {
    run_mode(config, inputs, SweepMode::Heating, &config.heating_film, options)
}

fn run_mode(
    config: &Config,
    inputs: &SpectralInputs,
    mode: SweepMode,
    range: &TemperatureRange,
    options: RunOptions<'_>,
) -> Result<PowerReport, CalcError> {
    let material = evaluate_material(config, inputs)?;
    let evaluator = build_evaluator(config, inputs)?;
    let input = SweepInput {
        evaluator: &evaluator,
        mode,
        ambient_c: config.ambient_c,
        film_temperatures_c: range.values(),
        coefficients: config.hc_values.clone(),
        solar_absorptance: material.solar_absorptance,
        solar_irradiance_w_m2: config.solar_irradiance_w_m2,
        convection: config.convection,
        phase_change: config.phase_change,
        diagnostics: options.diagnostics,
    };
    let sweep = run_sweep(&input, options.cancel)?;
    let power_0 = sweep.power_0();
    log::info!(
        "{mode:?} Power_0 = {power_0:.3} W/m² (T_film={:.2}°C)",
        sweep.operating_point.film_temperature_c
    );
    Ok(PowerReport {
        material,
        sweep,
        power_0,
    })
}

/// 고정 추가 계수 하나에 대한 필름 온도별 전체 전력 성분.
pub fn power_components(
    config: &Config,
    inputs: &SpectralInputs,
    mode: SweepMode,
    coefficient: f64,
) -> Result<Vec<PowerComponents>, CalcError> {
    if !(coefficient.is_finite() && coefficient >= 0.0) {
        return Err(DomainError::Negative {
            name: "coefficient",
            value: coefficient,
        }
        .into());
    }
    let material = evaluate_material(config, inputs)?;
    let evaluator = build_evaluator(config, inputs)?;
    let range = match mode {
        SweepMode::Cooling => &config.cooling_film,
        SweepMode::Heating => &config.heating_film,
    };
    let input = SweepInput {
        evaluator: &evaluator,
        mode,
        ambient_c: config.ambient_c,
        film_temperatures_c: range.values(),
        coefficients: vec![coefficient],
        solar_absorptance: material.solar_absorptance,
        solar_irradiance_w_m2: config.solar_irradiance_w_m2,
        convection: config.convection,
        phase_change: config.phase_change,
        diagnostics: true,
    };
    let sweep = run_sweep(&input, None)?;
    Ok((0..sweep.rows())
        .filter_map(|i| sweep.components_at(i, 0).copied())
        .collect())
}

/// 이론 가열 맵. 축을 비우면 기본 축을 쓴다.
pub fn heating_map(
    config: &Config,
    inputs: &SpectralInputs,
    ambient_c: Option<Vec<f64>>,
    solar_w_m2: Option<Vec<f64>>,
) -> Result<HeatingMap, CalcError> {
    let material = evaluate_material(config, inputs)?;
    let evaluator = build_evaluator(config, inputs)?;
    let ambient_c = ambient_c.unwrap_or_else(|| {
        let (lo, hi, n) = HEATING_MAP_AMBIENT;
        linspace(lo, hi, n)
    });
    let solar_w_m2 = solar_w_m2.unwrap_or_else(|| {
        let (lo, hi, n) = HEATING_MAP_SOLAR;
        linspace(lo, hi, n)
    });
    Ok(theoretical_heating_map(
        &evaluator,
        material.solar_absorptance,
        &ambient_c,
        &solar_w_m2,
    )?)
}

/// 방사율–조도 회색체 맵 (ΔT = 0).
pub fn cloud_map(
    config: &Config,
    inputs: &SpectralInputs,
    n_emissivity: usize,
    n_solar: usize,
    solar_max_w_m2: f64,
) -> Result<CloudMap, CalcError> {
    if n_emissivity == 0 || n_solar == 0 {
        return Err(DomainError::NonPositive {
            name: "cloud_points",
            value: n_emissivity.min(n_solar) as f64,
        }
        .into());
    }
    if !(solar_max_w_m2.is_finite() && solar_max_w_m2 >= 0.0) {
        return Err(DomainError::Negative {
            name: "solar_max_w_m2",
            value: solar_max_w_m2,
        }
        .into());
    }
    let material = evaluate_material(config, inputs)?;
    Ok(emissivity_solar_cloud(
        material.average_emissivity,
        material.solar_absorptance,
        config.ambient_k(),
        config.constants.stefan_boltzmann(),
        n_emissivity,
        n_solar,
        solar_max_w_m2,
    ))
}

/// 대기 방사율 × 풍속 격자의 평형 ΔT 맵.
///
/// 태양 조도는 `solar_irradiance_w_m2`, 대류 특성 길이와 자연대류 여부는 설정의
/// `convection` 항목을 따른다. 설정의 풍속 값은 쓰지 않는다.
pub fn wind_map(
    config: &Config,
    inputs: &SpectralInputs,
    n_emissivity: usize,
    n_wind: usize,
    wind_max_m_s: f64,
) -> Result<WindMap, CalcError> {
    if n_emissivity == 0 || n_wind == 0 {
        return Err(DomainError::NonPositive {
            name: "wind_points",
            value: n_emissivity.min(n_wind) as f64,
        }
        .into());
    }
    if !(wind_max_m_s.is_finite() && wind_max_m_s >= 0.0) {
        return Err(DomainError::Negative {
            name: "wind_max_m_s",
            value: wind_max_m_s,
        }
        .into());
    }
    let material = evaluate_material(config, inputs)?;
    let balance = WindBalance {
        average_emissivity: material.average_emissivity,
        solar_absorptance: material.solar_absorptance,
        solar_irradiance_w_m2: config.solar_irradiance_w_m2,
        ambient_k: config.ambient_k(),
        stefan_boltzmann: config.constants.stefan_boltzmann(),
        characteristic_length_m: config.convection.characteristic_length_m,
        natural_enabled: config.convection.natural,
    };
    Ok(wind_cooling_map(&balance, n_emissivity, n_wind, wind_max_m_s))
}
