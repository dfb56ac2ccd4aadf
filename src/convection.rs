//! 자연대류·강제대류 상관식과 Churchill–Usagi 혼합으로 외부 대류 열전달계수를 추정한다.
//!
//! 추정값은 스윕의 참고 입력이므로 실패하지 않고 하한값으로 떨어진다.

use serde::{Deserialize, Serialize};

/// 중력가속도 [m/s²]
pub const GRAVITY: f64 = 9.81;
/// 결과 하한 [W/m²·K]. 전도도 0 인 퇴화 경우를 막는다.
pub const MIN_COEFFICIENT: f64 = 1.0;
/// Churchill–Usagi 지수
pub const BLEND_EXPONENT: f64 = 3.0;
/// 자연대류 층류/난류 경계 Ra
pub const RA_TRANSITION: f64 = 1e7;
/// 평판 강제대류 층류/난류 경계 Re
pub const RE_TRANSITION: f64 = 5e5;

const DELTA_T_EPS: f64 = 1e-3;
const WIND_EPS: f64 = 1e-3;

/// 기준 온도에서의 유체 물성.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FluidState {
    /// 동점성계수 ν [m²/s]
    pub kinematic_viscosity: f64,
    /// 열확산계수 α [m²/s]
    pub thermal_diffusivity: f64,
    /// 열전도율 k [W/m·K]
    pub conductivity: f64,
    pub prandtl: f64,
    /// 체적팽창계수 β [1/K]
    pub expansion: f64,
}

/// 기준 온도(K)별 유체 물성 조회.
pub trait FluidProperties {
    fn at(&self, t_ref_k: f64) -> FluidState;
}

/// 건공기 근사 물성(대기압).
#[derive(Debug, Clone, Copy, Default)]
pub struct AirProperties;

impl FluidProperties for AirProperties {
    fn at(&self, t_ref_k: f64) -> FluidState {
        let t = t_ref_k.max(150.0);
        let ratio = t / 273.15;
        let rho = 1.225 / ratio;
        let mu = 1.81e-5 * ratio.powf(0.7);
        let k = 0.024 * ratio.powf(0.8);
        let cp = 1005.0;
        let nu = mu / rho;
        let alpha = k / (rho * cp);
        FluidState {
            kinematic_viscosity: nu,
            thermal_diffusivity: alpha,
            conductivity: k,
            prandtl: (nu / alpha).clamp(0.68, 0.75),
            expansion: 1.0 / t,
        }
    }
}

/// 설정 파일의 대류 모델 항목.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ConvectionSettings {
    /// 자연대류 사용 여부
    pub natural: bool,
    /// 풍속 [m/s]
    pub wind_speed_m_s: f64,
    /// 특성 길이 [m]
    pub characteristic_length_m: f64,
}

impl Default for ConvectionSettings {
    fn default() -> Self {
        Self {
            natural: true,
            wind_speed_m_s: 0.0,
            characteristic_length_m: 1.0,
        }
    }
}

impl ConvectionSettings {
    /// 자연대류가 켜져 있거나 바람이 있으면 모델 추정치를 쓴다.
    pub fn is_active(&self) -> bool {
        self.natural || self.wind_speed_m_s > WIND_EPS
    }
}

/// 대류 추정 입력값.
#[derive(Debug, Clone, Copy)]
pub struct ConvectionInput {
    pub characteristic_length_m: f64,
    pub wind_speed_m_s: f64,
    /// T_surface − T_ambient [K]
    pub delta_t_k: f64,
    pub ambient_k: f64,
    pub natural_enabled: bool,
}

impl ConvectionInput {
    pub fn from_settings(settings: &ConvectionSettings, delta_t_k: f64, ambient_k: f64) -> Self {
        Self {
            characteristic_length_m: settings.characteristic_length_m,
            wind_speed_m_s: settings.wind_speed_m_s,
            delta_t_k,
            ambient_k,
            natural_enabled: settings.natural,
        }
    }
}

/// 대류 추정 결과.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ConvectionEstimate {
    pub film_temperature_k: f64,
    pub rayleigh: f64,
    pub reynolds: f64,
    pub h_natural: f64,
    pub h_forced: f64,
    /// 혼합 후 하한 적용 값
    pub h_total: f64,
}

impl ConvectionEstimate {
    fn floor(film_temperature_k: f64) -> Self {
        Self {
            film_temperature_k,
            rayleigh: 0.0,
            reynolds: 0.0,
            h_natural: 0.0,
            h_forced: 0.0,
            h_total: MIN_COEFFICIENT,
        }
    }
}

/// 자연대류 Nu. Ra < 1e7 은 0.54·Ra^¼, 그 이상은 0.15·Ra^⅓.
pub fn natural_nusselt(rayleigh: f64) -> f64 {
    if rayleigh < RA_TRANSITION {
        0.54 * rayleigh.powf(0.25)
    } else {
        0.15 * rayleigh.powf(1.0 / 3.0)
    }
}

/// 평판 강제대류 Nu. Re < 5e5 은 층류, 그 이상은 난류 상관식.
pub fn forced_nusselt(reynolds: f64, prandtl: f64) -> f64 {
    let pr_term = prandtl.powf(1.0 / 3.0);
    if reynolds < RE_TRANSITION {
        0.664 * reynolds.sqrt() * pr_term
    } else {
        0.037 * reynolds.powf(0.8) * pr_term
    }
}

/// h = (h_nat^n + h_forced^n)^(1/n), n = 3.
pub fn blend(h_natural: f64, h_forced: f64) -> f64 {
    (h_natural.powf(BLEND_EXPONENT) + h_forced.powf(BLEND_EXPONENT)).powf(1.0 / BLEND_EXPONENT)
}

/// 대류 열전달계수를 추정한다 [W/m²·K].
pub fn estimate_convection<F: FluidProperties>(
    input: &ConvectionInput,
    fluid: &F,
) -> ConvectionEstimate {
    let film_k = (input.ambient_k + input.delta_t_k / 2.0).max(150.0);
    let length = input.characteristic_length_m;
    if !(length.is_finite() && length > 0.0)
        || !input.delta_t_k.is_finite()
        || !input.ambient_k.is_finite()
    {
        return ConvectionEstimate::floor(film_k);
    }
    let props = fluid.at(film_k);

    let (rayleigh, h_natural) = if input.natural_enabled && input.delta_t_k.abs() > DELTA_T_EPS {
        let ra = (GRAVITY * props.expansion * input.delta_t_k.abs() * length.powi(3)
            / (props.kinematic_viscosity * props.thermal_diffusivity))
            .max(1e-9);
        (ra, natural_nusselt(ra) * props.conductivity / length)
    } else {
        (0.0, 0.0)
    };

    let (reynolds, h_forced) = if input.wind_speed_m_s > WIND_EPS {
        let re = (input.wind_speed_m_s * length / props.kinematic_viscosity).max(1.0);
        (
            re,
            forced_nusselt(re, props.prandtl) * props.conductivity / length,
        )
    } else {
        (0.0, 0.0)
    };

    let mixed = blend(h_natural, h_forced);
    let h_total = if mixed.is_finite() {
        mixed.max(MIN_COEFFICIENT)
    } else {
        MIN_COEFFICIENT
    };

    ConvectionEstimate {
        film_temperature_k: film_k,
        rayleigh,
        reynolds,
        h_natural,
        h_forced,
        h_total,
    }
}
