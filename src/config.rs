use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use thiserror::Error;

use crate::balance::PhaseChange;
use crate::convection::ConvectionSettings;
use crate::radiation::PlanckConstants;
use crate::spectrum::WavelengthBand;
use crate::units::celsius_to_kelvin;

/// 물리적으로 유효하지 않은 설정/입력.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum DomainError {
    /// 0 이하일 수 없는 값
    #[error("{name} 은(는) 0보다 커야 합니다 (입력 {value}).")]
    NonPositive { name: &'static str, value: f64 },
    /// 음수일 수 없는 값
    #[error("{name} 은(는) 음수일 수 없습니다 (입력 {value}).")]
    Negative { name: &'static str, value: f64 },
    /// 절대영도 이하 온도
    #[error("{name} 이(가) 절대영도 이하입니다 ({kelvin} K).")]
    BelowAbsoluteZero { name: &'static str, kelvin: f64 },
    /// 잘못된 파장 대역
    #[error("{name} 대역이 잘못되었습니다 ({band}).")]
    InvalidBand {
        name: &'static str,
        band: WavelengthBand,
    },
    /// 비어 있는 온도 범위
    #[error("{name} 온도 범위에 값이 없습니다 ({min_c}~{max_c} °C).")]
    EmptyRange {
        name: &'static str,
        min_c: f64,
        max_c: f64,
    },
    /// 대류계수 후보 목록이 비어 있음
    #[error("대류계수 후보(hc_values)가 비어 있습니다.")]
    EmptyCandidates,
    /// NaN 또는 무한대
    #[error("{name} 이(가) 유한한 값이 아닙니다 (입력 {value}).")]
    NonFinite { name: &'static str, value: f64 },
}

/// 물리 상수 (SI).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PhysicalConstants {
    /// 플랑크 상수 [J·s]
    pub h: f64,
    /// 광속 [m/s]
    pub c: f64,
    /// 볼츠만 상수 [J/K]
    pub k_b: f64,
}

impl Default for PhysicalConstants {
    fn default() -> Self {
        Self {
            h: 6.626_070_15e-34,
            c: 2.997_924_58e8,
            k_b: 1.380_649e-23,
        }
    }
}

impl PhysicalConstants {
    pub fn planck(&self) -> PlanckConstants {
        PlanckConstants::from_fundamental(self.h, self.c, self.k_b)
    }

    /// 슈테판–볼츠만 상수 σ = 2π⁵k⁴/(15h³c²).
    pub fn stefan_boltzmann(&self) -> f64 {
        2.0 * std::f64::consts::PI.powi(5) * self.k_b.powi(4)
            / (15.0 * self.h.powi(3) * self.c.powi(2))
    }
}

/// 적분 대역 묶음 (μm).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Bands {
    /// 태양 가중 반사율 대역
    pub solar: WavelengthBand,
    /// 가시광 반사율 대역
    pub visible: WavelengthBand,
    /// 복사 냉각(적외) 계산 대역
    pub infrared: WavelengthBand,
}

impl Default for Bands {
    fn default() -> Self {
        Self {
            solar: WavelengthBand::new(0.3, 2.5),
            visible: WavelengthBand::new(0.38, 0.78),
            infrared: WavelengthBand::new(2.5, 25.0),
        }
    }
}

/// 수치 격자 해상도.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GridSettings {
    /// 적외 대역 재표본화 간격 [μm]
    pub infrared_step_um: f64,
    /// 반구 각도 표본 수
    pub angle_steps: usize,
}

impl Default for GridSettings {
    fn default() -> Self {
        Self {
            infrared_step_um: 0.01,
            angle_steps: 2000,
        }
    }
}

/// 필름 온도 스윕 범위. `max_c` 는 포함하지 않는다.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TemperatureRange {
    pub min_c: f64,
    pub max_c: f64,
    pub step_c: f64,
}

impl TemperatureRange {
    pub const fn new(min_c: f64, max_c: f64, step_c: f64) -> Self {
        Self {
            min_c,
            max_c,
            step_c,
        }
    }

    /// min, min+step, ... (< max) 를 오름차순으로 반환한다.
    pub fn values(&self) -> Vec<f64> {
        if !(self.step_c > 0.0) || !(self.max_c > self.min_c) {
            return Vec::new();
        }
        let n = ((self.max_c - self.min_c) / self.step_c - 1e-9).ceil().max(0.0) as usize;
        (0..n).map(|i| self.min_c + i as f64 * self.step_c).collect()
    }
}

/// 애플리케이션 설정. 모든 계산 진입점에 불변 참조로 전달한다.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Config {
    /// 주변 온도 [°C]
    pub ambient_c: f64,
    /// 태양 복사 조도 [W/m²]
    pub solar_irradiance_w_m2: f64,
    /// 스윕할 추가 대류/전도 계수 후보 [W/m²·K]
    pub hc_values: Vec<f64>,
    pub constants: PhysicalConstants,
    pub bands: Bands,
    pub grid: GridSettings,
    /// 냉각 모드 필름 온도 범위
    pub cooling_film: TemperatureRange,
    /// 가열 모드 필름 온도 범위
    pub heating_film: TemperatureRange,
    pub convection: ConvectionSettings,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phase_change: Option<PhaseChange>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            ambient_c: 25.0,
            solar_irradiance_w_m2: 1000.0,
            hc_values: vec![0.0, 2.0, 4.0, 6.0, 8.0, 10.0],
            constants: PhysicalConstants::default(),
            bands: Bands::default(),
            grid: GridSettings::default(),
            cooling_film: TemperatureRange::new(-20.0, 40.0, 1.0),
            heating_film: TemperatureRange::new(0.0, 80.0, 1.0),
            convection: ConvectionSettings::default(),
            phase_change: None,
        }
    }
}

impl Config {
    pub fn ambient_k(&self) -> f64 {
        celsius_to_kelvin(self.ambient_c)
    }

    /// 물리적으로 유효한 설정인지 검사한다.
    pub fn validate(&self) -> Result<(), DomainError> {
        positive("constants.h", self.constants.h)?;
        positive("constants.c", self.constants.c)?;
        positive("constants.k_b", self.constants.k_b)?;

        for (name, band) in [
            ("bands.solar", self.bands.solar),
            ("bands.visible", self.bands.visible),
            ("bands.infrared", self.bands.infrared),
        ] {
            if !band.is_valid() {
                return Err(DomainError::InvalidBand { name, band });
            }
        }

        positive("grid.infrared_step_um", self.grid.infrared_step_um)?;
        positive("grid.angle_steps", self.grid.angle_steps as f64)?;

        let ambient_k = self.ambient_k();
        if !(ambient_k > 0.0) {
            return Err(DomainError::BelowAbsoluteZero {
                name: "ambient_c",
                kelvin: ambient_k,
            });
        }
        non_negative("solar_irradiance_w_m2", self.solar_irradiance_w_m2)?;

        for (name, range) in [
            ("cooling_film", self.cooling_film),
            ("heating_film", self.heating_film),
        ] {
            positive("film.step_c", range.step_c)?;
            if range.values().is_empty() {
                return Err(DomainError::EmptyRange {
                    name,
                    min_c: range.min_c,
                    max_c: range.max_c,
                });
            }
            let lowest_k = celsius_to_kelvin(range.min_c);
            if !(lowest_k > 0.0) {
                return Err(DomainError::BelowAbsoluteZero {
                    name,
                    kelvin: lowest_k,
                });
            }
        }

        if self.hc_values.is_empty() {
            return Err(DomainError::EmptyCandidates);
        }
        for &h in &self.hc_values {
            non_negative("hc_values", h)?;
        }

        non_negative("convection.wind_speed_m_s", self.convection.wind_speed_m_s)?;
        positive(
            "convection.characteristic_length_m",
            self.convection.characteristic_length_m,
        )?;

        if let Some(phase) = &self.phase_change {
            finite("phase_change.trigger_c", phase.trigger_c)?;
            finite("phase_change.ramp_width_c", phase.ramp_width_c)?;
            non_negative("phase_change.max_power_w_m2", phase.max_power_w_m2)?;
        }
        Ok(())
    }
}

fn positive(name: &'static str, value: f64) -> Result<(), DomainError> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(DomainError::NonPositive { name, value })
    }
}

fn finite(name: &'static str, value: f64) -> Result<(), DomainError> {
    if value.is_finite() {
        Ok(())
    } else {
        Err(DomainError::NonFinite { name, value })
    }
}

fn non_negative(name: &'static str, value: f64) -> Result<(), DomainError> {
    if value.is_finite() && value >= 0.0 {
        Ok(())
    } else {
        Err(DomainError::Negative { name, value })
    }
}

/// 설정 로드/저장 시 발생 가능한 오류를 표현한다.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// 파일 입출력 오류
    #[error("파일 입출력 오류: {0}")]
    Io(#[from] std::io::Error),
    /// TOML 역직렬화 오류
    #[error("설정 파싱 오류: {0}")]
    Parse(#[from] toml::de::Error),
    /// TOML 직렬화 오류
    #[error("설정 직렬화 오류: {0}")]
    Serialize(#[from] toml::ser::Error),
    /// 값 검증 실패
    #[error("설정 값 오류: {0}")]
    Invalid(#[from] DomainError),
}

/// 설정 파일을 읽고 검증한다.
pub fn load_from(path: &Path) -> Result<Config, ConfigError> {
    let content = fs::read_to_string(path)?;
    let cfg: Config = toml::from_str(&content)?;
    cfg.validate()?;
    Ok(cfg)
}

/// 설정 파일을 로드하거나 없으면 기본 설정을 생성한다.
pub fn load_or_default(path: &Path) -> Result<Config, ConfigError> {
    if path.exists() {
        load_from(path)
    } else {
        let cfg = Config::default();
        save_to(&cfg, path)?;
        log::info!("기본 설정 파일을 생성했습니다: {}", path.display());
        Ok(cfg)
    }
}

/// 설정을 TOML 로 저장한다.
pub fn save_to(cfg: &Config, path: &Path) -> Result<(), ConfigError> {
    let content = toml::to_string_pretty(cfg)?;
    fs::write(path, content)?;
    Ok(())
}

impl Config {
    /// 설정을 지정한 경로에 저장한다.
    pub fn save(&self, path: &Path) -> Result<(), ConfigError> {
        save_to(self, path)
    }
}
