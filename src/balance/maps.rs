use rayon::prelude::*;

use crate::config::DomainError;
use crate::convection::{estimate_convection, AirProperties, ConvectionInput};
use crate::radiation::RadiativeEvaluator;
use crate::units::celsius_to_kelvin;

/// [start, stop] 을 n 등분한 점. n == 1 이면 start 하나.
pub fn linspace(start: f64, stop: f64, n: usize) -> Vec<f64> {
    match n {
        0 => Vec::new(),
        1 => vec![start],
        _ => {
            let step = (stop - start) / (n - 1) as f64;
            (0..n)
                .map(|i| if i == n - 1 { stop } else { start + i as f64 * step })
                .collect()
        }
    }
}

/// 이론 가열 전력 맵. 행 = 주변 온도, 열 = 태양 조도.
#[derive(Debug, Clone, PartialEq)]
pub struct HeatingMap {
    pub ambient_c: Vec<f64>,
    pub solar_w_m2: Vec<f64>,
    values: Vec<f64>,
}

impl HeatingMap {
    pub fn value_at(&self, ambient_index: usize, solar_index: usize) -> f64 {
        self.values[ambient_index * self.solar_w_m2.len() + solar_index]
    }

    pub fn values(&self) -> &[f64] {
        &self.values
    }
}

/// 필름 온도 = 주변 온도일 때 P_heat = α_s·S + P_atm(T) − P_rad(T).
///
/// 복사 항은 온도당 한 번만 계산하고 태양 조도 축은 선형으로 더한다.
pub fn theoretical_heating_map(
    evaluator: &RadiativeEvaluator,
    solar_absorptance: f64,
    ambient_c: &[f64],
    solar_w_m2: &[f64],
) -> Result<HeatingMap, DomainError> {
    let radiative: Vec<f64> = ambient_c
        .par_iter()
        .map(|&t_c| -> Result<f64, DomainError> {
            let t_k = celsius_to_kelvin(t_c);
            Ok(evaluator.atmospheric_absorption(t_k)? - evaluator.surface_emission(t_k)?)
        })
        .collect::<Result<Vec<_>, _>>()?;

    let values = radiative
        .iter()
        .flat_map(|&r| solar_w_m2.iter().map(move |&s| solar_absorptance * s + r))
        .collect();
    log::debug!(
        "가열 맵: 온도 {}점 × 조도 {}점",
        ambient_c.len(),
        solar_w_m2.len()
    );
    Ok(HeatingMap {
        ambient_c: ambient_c.to_vec(),
        solar_w_m2: solar_w_m2.to_vec(),
        values,
    })
}

/// 회색체 근사 냉각 전력 맵. 행 = 대기 유효 방사율, 열 = 태양 조도.
#[derive(Debug, Clone, PartialEq)]
pub struct CloudMap {
    pub atmospheric_emissivity: Vec<f64>,
    pub solar_w_m2: Vec<f64>,
    values: Vec<f64>,
}

impl CloudMap {
    pub fn value_at(&self, emissivity_index: usize, solar_index: usize) -> f64 {
        self.values[emissivity_index * self.solar_w_m2.len() + solar_index]
    }

    pub fn values(&self) -> &[f64] {
        &self.values
    }
}

/// ΔT = 0 에서 P = ε̄σT⁴ − ε̄·ε_atm·σT⁴ − α_s·S.
///
/// ε_atm 은 [0, 1], S 는 [0, solar_max] 를 각각 등간격으로 나눈다.
pub fn emissivity_solar_cloud(
    average_emissivity: f64,
    solar_absorptance: f64,
    ambient_k: f64,
    stefan_boltzmann: f64,
    n_emissivity: usize,
    n_solar: usize,
    solar_max_w_m2: f64,
) -> CloudMap {
    let emission = average_emissivity * stefan_boltzmann * ambient_k.powi(4);
    let atmospheric_emissivity = linspace(0.0, 1.0, n_emissivity);
    let solar_w_m2 = linspace(0.0, solar_max_w_m2, n_solar);
    let values = atmospheric_emissivity
        .iter()
        .flat_map(|&e_atm| {
            let radiative = emission * (1.0 - e_atm);
            solar_w_m2
                .iter()
                .map(move |&s| radiative - solar_absorptance * s)
        })
        .collect();
    CloudMap {
        atmospheric_emissivity,
        solar_w_m2,
        values,
    }
}

/// 평형 ΔT 탐색 구간 [K].
pub const WIND_SEARCH_BRACKET_K: (f64, f64) = (-100.0, 300.0);
const ROOT_TOLERANCE_K: f64 = 1e-9;
const MAX_ITERATIONS: usize = 200;

/// 회색체 표면의 정상상태 열수지.
///
/// p(ΔT) = ε̄σ(T_s⁴ − ε_atm·T_a⁴) + h(v, ΔT)·ΔT − α_s·S, T_s = T_a + ΔT.
/// h 는 풍속을 바꿔 가며 대류 모델로 추정한다.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WindBalance {
    pub average_emissivity: f64,
    pub solar_absorptance: f64,
    pub solar_irradiance_w_m2: f64,
    pub ambient_k: f64,
    pub stefan_boltzmann: f64,
    pub characteristic_length_m: f64,
    pub natural_enabled: bool,
}

impl WindBalance {
    /// 표면 순 열손실 [W/m²]. ΔT 에 대해 증가한다.
    pub fn residual(&self, delta_t_k: f64, atmospheric_emissivity: f64, wind_m_s: f64) -> f64 {
        let input = ConvectionInput {
            characteristic_length_m: self.characteristic_length_m,
            wind_speed_m_s: wind_m_s,
            delta_t_k,
            ambient_k: self.ambient_k,
            natural_enabled: self.natural_enabled,
        };
        let h = estimate_convection(&input, &AirProperties).h_total;
        let surface_k = self.ambient_k + delta_t_k;
        self.average_emissivity
            * self.stefan_boltzmann
            * (surface_k.powi(4) - atmospheric_emissivity * self.ambient_k.powi(4))
            + h * delta_t_k
            - self.solar_absorptance * self.solar_irradiance_w_m2
    }

    /// p(ΔT) = 0 인 평형 ΔT [K].
    ///
    /// 탐색 구간 양 끝의 부호가 다르면 이분법, 같으면 |p| 를 최소화하는 ΔT 를 돌려준다.
    pub fn equilibrium(&self, atmospheric_emissivity: f64, wind_m_s: f64) -> f64 {
        let p = |dt: f64| self.residual(dt, atmospheric_emissivity, wind_m_s);
        let (mut lo, mut hi) = WIND_SEARCH_BRACKET_K;
        let (mut p_lo, p_hi) = (p(lo), p(hi));
        if p_lo == 0.0 {
            return lo;
        }
        if p_hi == 0.0 {
            return hi;
        }
        if p_lo.signum() == p_hi.signum() {
            log::debug!(
                "ε_atm={atmospheric_emissivity:.3}, v={wind_m_s:.3}: 구간 안에 근이 없어 |p| 최소점을 씁니다."
            );
            return minimize_abs(&p, lo, hi);
        }
        for _ in 0..MAX_ITERATIONS {
            let mid = 0.5 * (lo + hi);
            let p_mid = p(mid);
            if p_mid == 0.0 || hi - lo < ROOT_TOLERANCE_K {
                return mid;
            }
            if p_mid.signum() == p_lo.signum() {
                lo = mid;
                p_lo = p_mid;
            } else {
                hi = mid;
            }
        }
        0.5 * (lo + hi)
    }
}

/// [lo, hi] 에서 |f| 의 최소점 (황금분할 탐색, 양 끝 포함).
fn minimize_abs(f: &impl Fn(f64) -> f64, lo: f64, hi: f64) -> f64 {
    let ratio = (5f64.sqrt() - 1.0) / 2.0;
    let (mut a, mut b) = (lo, hi);
    let mut c = b - ratio * (b - a);
    let mut d = a + ratio * (b - a);
    for _ in 0..MAX_ITERATIONS {
        if b - a < ROOT_TOLERANCE_K {
            break;
        }
        if f(c).abs() < f(d).abs() {
            b = d;
        } else {
            a = c;
        }
        c = b - ratio * (b - a);
        d = a + ratio * (b - a);
    }
    [lo, 0.5 * (a + b), hi]
        .into_iter()
        .fold((lo, f64::INFINITY), |best, x| {
            let v = f(x).abs();
            if v < best.1 {
                (x, v)
            } else {
                best
            }
        })
        .0
}

/// 풍속 냉각 평형 맵. 행 = 대기 유효 방사율, 열 = 풍속, 값 = 평형 ΔT [K].
#[derive(Debug, Clone, PartialEq)]
pub struct WindMap {
    pub atmospheric_emissivity: Vec<f64>,
    pub wind_m_s: Vec<f64>,
    values: Vec<f64>,
}

impl WindMap {
    pub fn value_at(&self, emissivity_index: usize, wind_index: usize) -> f64 {
        self.values[emissivity_index * self.wind_m_s.len() + wind_index]
    }

    pub fn values(&self) -> &[f64] {
        &self.values
    }
}

/// ε_atm ∈ [0, 1] × v ∈ [0, wind_max] 격자에서 평형 ΔT 를 구한다.
pub fn wind_cooling_map(
    balance: &WindBalance,
    n_emissivity: usize,
    n_wind: usize,
    wind_max_m_s: f64,
) -> WindMap {
    let atmospheric_emissivity = linspace(0.0, 1.0, n_emissivity);
    let wind_m_s = linspace(0.0, wind_max_m_s, n_wind);
    let rows: Vec<Vec<f64>> = atmospheric_emissivity
        .par_iter()
        .map(|&e_atm| {
            wind_m_s
                .iter()
                .map(|&v| balance.equilibrium(e_atm, v))
                .collect()
        })
        .collect();
    log::debug!(
        "풍속 맵: 방사율 {}점 × 풍속 {}점",
        atmospheric_emissivity.len(),
        wind_m_s.len()
    );
    WindMap {
        atmospheric_emissivity,
        wind_m_s,
        values: rows.into_iter().flatten().collect(),
    }
}
