use rayon::prelude::*;
use thiserror::Error;

use crate::config::DomainError;
use crate::convection::{estimate_convection, AirProperties, ConvectionInput, ConvectionSettings};
use crate::radiation::RadiativeEvaluator;
use crate::units::celsius_to_kelvin;

use super::phase_change::{phase_power, PhaseChange};

/// 스윕 계산 오류.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum SweepError {
    /// 물리 정의역 오류
    #[error(transparent)]
    Domain(#[from] DomainError),
    /// 호출자가 계산을 취소함
    #[error("계산이 취소되었습니다.")]
    Cancelled,
    /// 스윕 축이 비어 있음
    #[error("스윕 축({0})이 비어 있습니다.")]
    EmptyAxis(&'static str),
}

/// 냉각 모드는 순 냉각 전력, 가열 모드는 순 가열 전력을 셀에 저장한다.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SweepMode {
    Cooling,
    Heating,
}

/// 한 셀(필름 온도, 대류계수)의 전력 성분 [W/m²].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PowerComponents {
    pub film_temperature_c: f64,
    /// 스윕 후보 계수 h_extra [W/m²·K]
    pub coefficient: f64,
    /// 표면 방출
    pub p_rad: f64,
    /// 대기 흡수
    pub p_atm: f64,
    /// 대류 모델 추정 계수
    pub h_model: f64,
    /// h_model + h_extra
    pub h_total: f64,
    /// h_model·(T_a − T_film)
    pub q_model: f64,
    /// h_extra·(T_a − T_film)
    pub q_extra: f64,
    /// h_total·(T_a − T_film). 필름이 더 차가우면 양수(대류 유입).
    pub q_conv: f64,
    /// α_s·S
    pub q_solar: f64,
    pub p_phase: f64,
    /// 냉각: P_rad − P_atm − Q_conv − Q_solar + P_phase
    /// 가열: Q_solar + P_atm + Q_conv − P_rad − P_phase
    pub net: f64,
}

/// 필름 온도에만 의존하는 항. 대류계수 후보와 무관하므로 한 번만 계산한다.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FilmTerms {
    pub film_temperature_c: f64,
    pub p_rad: f64,
    pub h_model: f64,
}

/// 스윕 입력. 모든 값은 호출 범위 안에서만 쓰인다.
#[derive(Debug, Clone)]
pub struct SweepInput<'a> {
    pub evaluator: &'a RadiativeEvaluator,
    pub mode: SweepMode,
    pub ambient_c: f64,
    /// 필름 온도 [°C]. 출력 행 순서를 그대로 따른다.
    pub film_temperatures_c: Vec<f64>,
    /// 대류계수 후보 [W/m²·K]
    pub coefficients: Vec<f64>,
    pub solar_absorptance: f64,
    pub solar_irradiance_w_m2: f64,
    pub convection: ConvectionSettings,
    pub phase_change: Option<PhaseChange>,
    /// true 면 셀별 전체 성분을 보관한다.
    pub diagnostics: bool,
}

/// ΔT ≈ 0 셀 (필름 온도가 주변 온도에 가장 가까운 행).
#[derive(Debug, Clone, PartialEq)]
pub struct OperatingPoint {
    pub film_index: usize,
    pub film_temperature_c: f64,
    /// 후보 계수별 순 전력
    pub net_per_coefficient: Vec<f64>,
}

/// 스윕 결과 행렬. 행 = 필름 온도, 열 = 대류계수 후보.
#[derive(Debug, Clone, PartialEq)]
pub struct SweepResult {
    pub mode: SweepMode,
    pub ambient_c: f64,
    pub film_temperatures_c: Vec<f64>,
    pub coefficients: Vec<f64>,
    /// 스윕 전체에서 일정한 대기 흡수 항
    pub p_atm: f64,
    net: Vec<f64>,
    components: Option<Vec<PowerComponents>>,
    pub operating_point: OperatingPoint,
}

impl SweepResult {
    pub fn rows(&self) -> usize {
        self.film_temperatures_c.len()
    }

    pub fn cols(&self) -> usize {
        self.coefficients.len()
    }

    /// [film_index, coefficient_index] 의 순 전력.
    pub fn net_at(&self, film_index: usize, coefficient_index: usize) -> f64 {
        self.net[film_index * self.cols() + coefficient_index]
    }

    /// 진단 모드일 때만 값이 있다.
    pub fn components_at(
        &self,
        film_index: usize,
        coefficient_index: usize,
    ) -> Option<&PowerComponents> {
        let cols = self.cols();
        self.components
            .as_ref()
            .map(|c| &c[film_index * cols + coefficient_index])
    }

    /// 한 대류계수 후보에 대한 필름 온도별 순 전력.
    pub fn column(&self, coefficient_index: usize) -> Vec<f64> {
        (0..self.rows())
            .map(|i| self.net_at(i, coefficient_index))
            .collect()
    }

    /// Power_0: ΔT≈0 행의 첫 번째 후보 계수 값.
    pub fn power_0(&self) -> f64 {
        self.operating_point.net_per_coefficient[0]
    }
}

/// 주변 온도에 가장 가까운 필름 온도 인덱스.
///
/// 거리가 같으면 더 낮은 온도를 고른다. 입력 순서와 무관하다.
pub fn nearest_film_index(film_temperatures_c: &[f64], ambient_c: f64) -> Option<usize> {
    let mut best: Option<(usize, f64, f64)> = None;
    for (i, &t) in film_temperatures_c.iter().enumerate() {
        let d = (t - ambient_c).abs();
        let better = match best {
            None => true,
            Some((_, bt, bd)) => d < bd || (d == bd && t < bt),
        };
        if better {
            best = Some((i, t, d));
        }
    }
    best.map(|(i, _, _)| i)
}

/// 셀 하나의 전력 성분을 계산한다. 순수 함수이다.
pub fn cell_components(
    mode: SweepMode,
    ambient_c: f64,
    p_atm: f64,
    q_solar: f64,
    phase: Option<&PhaseChange>,
    film: &FilmTerms,
    coefficient: f64,
) -> PowerComponents {
    let delta = ambient_c - film.film_temperature_c;
    let h_total = film.h_model + coefficient;
    let q_model = film.h_model * delta;
    let q_extra = coefficient * delta;
    let q_conv = h_total * delta;
    let p_phase = phase_power(phase, film.film_temperature_c);
    let net = match mode {
        SweepMode::Cooling => film.p_rad - p_atm - q_conv - q_solar + p_phase,
        SweepMode::Heating => q_solar + p_atm + q_conv - film.p_rad - p_phase,
    };
    PowerComponents {
        film_temperature_c: film.film_temperature_c,
        coefficient,
        p_rad: film.p_rad,
        p_atm,
        h_model: film.h_model,
        h_total,
        q_model,
        q_extra,
        q_conv,
        q_solar,
        p_phase,
        net,
    }
}

/// 필름 온도별 P_rad 와 대류 모델 계수를 병렬로 계산한다.
pub fn film_terms(
    evaluator: &RadiativeEvaluator,
    ambient_c: f64,
    film_temperatures_c: &[f64],
    convection: &ConvectionSettings,
) -> Result<Vec<FilmTerms>, DomainError> {
    let ambient_k = celsius_to_kelvin(ambient_c);
    film_temperatures_c
        .par_iter()
        .map(|&t_c| -> Result<FilmTerms, DomainError> {
            let t_k = celsius_to_kelvin(t_c);
            let p_rad = evaluator.surface_emission(t_k)?;
            let h_model = if convection.is_active() {
                let input = ConvectionInput::from_settings(convection, t_k - ambient_k, ambient_k);
                estimate_convection(&input, &AirProperties).h_total
            } else {
                0.0
            };
            Ok(FilmTerms {
                film_temperature_c: t_c,
                p_rad,
                h_model,
            })
        })
        .collect()
}

/// 2차원 전력수지 스윕을 실행한다.
///
/// 셀은 서로 독립이므로 대류계수 열 단위로 병렬 계산한다. `cancel` 은 각 열을
/// 시작하기 전에 확인하며, 취소되면 부분 결과 없이 [`SweepError::Cancelled`] 를 반환한다.
pub fn run_sweep(
    input: &SweepInput<'_>,
    cancel: Option<&(dyn Fn() -> bool + Sync)>,
) -> Result<SweepResult, SweepError> {
    if input.film_temperatures_c.is_empty() {
        return Err(SweepError::EmptyAxis("film_temperature"));
    }
    if input.coefficients.is_empty() {
        return Err(SweepError::EmptyAxis("coefficient"));
    }

    let ambient_k = celsius_to_kelvin(input.ambient_c);
    // 주변 온도는 스윕 동안 변하지 않는다.
    let p_atm = input.evaluator.atmospheric_absorption(ambient_k)?;
    let q_solar = input.solar_absorptance * input.solar_irradiance_w_m2;
    let films = film_terms(
        input.evaluator,
        input.ambient_c,
        &input.film_temperatures_c,
        &input.convection,
    )?;
    log::debug!(
        "{:?} 스윕: 필름 {}개 × 계수 {}개, P_atm={p_atm:.3} W/m², Q_solar={q_solar:.3} W/m²",
        input.mode,
        films.len(),
        input.coefficients.len()
    );

    let phase = input.phase_change.as_ref();
    let columns: Vec<Vec<PowerComponents>> = input
        .coefficients
        .par_iter()
        .map(|&h| -> Result<Vec<PowerComponents>, SweepError> {
            if cancel.is_some_and(|c| c()) {
                return Err(SweepError::Cancelled);
            }
            Ok(films
                .iter()
                .map(|film| {
                    cell_components(input.mode, input.ambient_c, p_atm, q_solar, phase, film, h)
                })
                .collect())
        })
        .collect::<Result<Vec<_>, _>>()?;

    let rows = films.len();
    let cols = columns.len();
    let mut net = Vec::with_capacity(rows * cols);
    let mut components = input.diagnostics.then(|| Vec::with_capacity(rows * cols));
    for i in 0..rows {
        for column in &columns {
            let cell = column[i];
            log::trace!(
                "T_film={:.2}°C h_extra={:.2}: p_r={:.4} p_a={:.4} Q_conv={:.4} (h_model={:.3}, h_total={:.3}) Q_solar={:.4} P_phase={:.4} net={:.4}",
                cell.film_temperature_c,
                cell.coefficient,
                cell.p_rad,
                cell.p_atm,
                cell.q_conv,
                cell.h_model,
                cell.h_total,
                cell.q_solar,
                cell.p_phase,
                cell.net
            );
            net.push(cell.net);
            if let Some(c) = components.as_mut() {
                c.push(cell);
            }
        }
    }

    let film_index = nearest_film_index(&input.film_temperatures_c, input.ambient_c)
        .ok_or(SweepError::EmptyAxis("film_temperature"))?;
    let operating_point = OperatingPoint {
        film_index,
        film_temperature_c: input.film_temperatures_c[film_index],
        net_per_coefficient: net[film_index * cols..(film_index + 1) * cols].to_vec(),
    };

    Ok(SweepResult {
        mode: input.mode,
        ambient_c: input.ambient_c,
        film_temperatures_c: input.film_temperatures_c.clone(),
        coefficients: input.coefficients.clone(),
        p_atm,
        net,
        components,
        operating_point,
    })
}
