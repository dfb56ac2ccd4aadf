use crate::config::DomainError;
use crate::spectrum::dataset::ensure_strictly_increasing;
use crate::spectrum::{DataFormatError, MonotoneInterpolator, SpectralDataset, WavelengthBand};

use super::atmosphere::{atmospheric_emissivity, clamp_transmittance};
use super::{AngleGrid, PlanckConstants};

/// 복사 항 계산용 공통 파장 격자. 파장 간격 Δλ 는 생성 시 한 번만 계산한다.
#[derive(Debug, Clone, PartialEq)]
pub struct SpectralGrid {
    wavelengths_um: Vec<f64>,
    wavelengths_m: Vec<f64>,
    widths_m: Vec<f64>,
}

impl SpectralGrid {
    /// 엄격히 증가하는 파장점(μm)으로 격자를 만든다.
    ///
    /// Δλᵢ 는 전방 차분이며 마지막 점은 직전 간격을 이어 쓴다.
    pub fn from_points(wavelengths_um: Vec<f64>) -> Result<Self, DataFormatError> {
        if wavelengths_um.len() < 2 {
            return Err(DataFormatError::TooFewPoints {
                found: wavelengths_um.len(),
            });
        }
        ensure_strictly_increasing(&wavelengths_um)?;
        let wavelengths_m: Vec<f64> = wavelengths_um.iter().map(|w| w * 1e-6).collect();
        let mut widths_m: Vec<f64> = wavelengths_m.windows(2).map(|w| w[1] - w[0]).collect();
        let last = widths_m[widths_m.len() - 1];
        widths_m.push(last);
        Ok(Self {
            wavelengths_um,
            wavelengths_m,
            widths_m,
        })
    }

    /// 대역을 일정 간격(μm)으로 나눈 격자. 끝점을 포함한다.
    pub fn uniform(band: &WavelengthBand, step_um: f64) -> Result<Self, DataFormatError> {
        if !(step_um > 0.0) || !band.is_valid() {
            return Err(DataFormatError::TooFewPoints { found: 0 });
        }
        let n = (band.width_um() / step_um + 1e-9).floor() as usize + 1;
        let points = (0..n)
            .map(|i| band.start_um + i as f64 * step_um)
            .collect();
        Self::from_points(points)
    }

    pub fn wavelengths_um(&self) -> &[f64] {
        &self.wavelengths_um
    }

    pub fn wavelengths_m(&self) -> &[f64] {
        &self.wavelengths_m
    }

    pub fn widths_m(&self) -> &[f64] {
        &self.widths_m
    }

    pub fn len(&self) -> usize {
        self.wavelengths_um.len()
    }

    pub fn is_empty(&self) -> bool {
        self.wavelengths_um.is_empty()
    }
}

/// 표면 방출 P_rad 와 대기 흡수 P_atm 을 계산한다.
///
/// P(T) = Σ_θ w(θ) · Σ_λ ε_s(λ) · [ε_atm(λ,θ)] · I_BB(λ,T) · Δλ
///
/// 방사율/투과율은 생성 시 공통 격자로 재표본화해 보관하므로
/// 필름 온도 스윕 동안 다시 보간하지 않는다.
#[derive(Debug, Clone)]
pub struct RadiativeEvaluator {
    constants: PlanckConstants,
    grid: SpectralGrid,
    angles: AngleGrid,
    surface_emissivity: Vec<f64>,
    transmittance: Vec<f64>,
}

impl RadiativeEvaluator {
    pub fn new(
        constants: PlanckConstants,
        grid: SpectralGrid,
        angles: AngleGrid,
        emissivity: &SpectralDataset,
        transmittance: &SpectralDataset,
    ) -> Self {
        let surface_emissivity = MonotoneInterpolator::from_dataset(emissivity)
            .resample(grid.wavelengths_um())
            .into_iter()
            .map(|e| e.clamp(0.0, 1.0))
            .collect();
        let transmittance = MonotoneInterpolator::from_dataset(transmittance)
            .resample(grid.wavelengths_um())
            .into_iter()
            .map(clamp_transmittance)
            .collect();
        log::debug!(
            "복사 항 격자: 파장 {}점, 각도 {}점",
            grid.len(),
            angles.len()
        );
        Self::from_sampled(constants, grid, angles, surface_emissivity, transmittance)
    }

    /// 이미 격자 위에 표본화된 방사율/투과율로 만든다.
    pub fn from_sampled(
        constants: PlanckConstants,
        grid: SpectralGrid,
        angles: AngleGrid,
        surface_emissivity: Vec<f64>,
        transmittance: Vec<f64>,
    ) -> Self {
        Self {
            constants,
            grid,
            angles,
            surface_emissivity,
            transmittance,
        }
    }

    pub fn constants(&self) -> &PlanckConstants {
        &self.constants
    }

    pub fn grid(&self) -> &SpectralGrid {
        &self.grid
    }

    pub fn angles(&self) -> &AngleGrid {
        &self.angles
    }

    pub fn surface_emissivity(&self) -> &[f64] {
        &self.surface_emissivity
    }

    pub fn transmittance(&self) -> &[f64] {
        &self.transmittance
    }

    /// 표면 → 우주 방출 P_rad(T_surface) [W/m²].
    ///
    /// 각도 의존성이 없으므로 가중치 합과 파장 합의 곱으로 계산한다.
    pub fn surface_emission(&self, t_surface_k: f64) -> Result<f64, DomainError> {
        check_temperature("surface_temperature", t_surface_k)?;
        let spectral: f64 = self
            .grid
            .wavelengths_m()
            .iter()
            .zip(self.grid.widths_m())
            .zip(&self.surface_emissivity)
            .map(|((&l, &dl), &e)| e * self.constants.spectral_exitance(l, t_surface_k) * dl)
            .sum();
        Ok(self.angles.total_weight() * spectral)
    }

    /// 대기 → 표면 흡수 P_atm(T_ambient) [W/m²]. 각도마다 파장 합을 새로 구한다.
    pub fn atmospheric_absorption(&self, t_ambient_k: f64) -> Result<f64, DomainError> {
        check_temperature("ambient_temperature", t_ambient_k)?;
        // ε_s·I_BB·Δλ 는 각도와 무관하므로 미리 곱해 둔다.
        let base: Vec<f64> = self
            .grid
            .wavelengths_m()
            .iter()
            .zip(self.grid.widths_m())
            .zip(&self.surface_emissivity)
            .map(|((&l, &dl), &e)| e * self.constants.spectral_exitance(l, t_ambient_k) * dl)
            .collect();

        let total = self
            .angles
            .samples()
            .iter()
            .map(|angle| {
                let per_angle: f64 = base
                    .iter()
                    .zip(&self.transmittance)
                    .map(|(&b, &tau)| b * atmospheric_emissivity(tau, angle.sec_theta))
                    .sum();
                angle.weight * per_angle
            })
            .sum();
        Ok(total)
    }
}

fn check_temperature(name: &'static str, t_k: f64) -> Result<(), DomainError> {
    if t_k.is_finite() && t_k > 0.0 {
        Ok(())
    } else {
        Err(DomainError::BelowAbsoluteZero { name, kelvin: t_k })
    }
}
