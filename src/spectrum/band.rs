use serde::{Deserialize, Serialize};

/// 적분 구간 [λ₁, λ₂] (μm). 태양 대역, 가시광 대역, 적외 대역 등에 쓴다.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct WavelengthBand {
    /// 시작 파장(μm)
    pub start_um: f64,
    /// 끝 파장(μm)
    pub end_um: f64,
}

impl WavelengthBand {
    pub const fn new(start_um: f64, end_um: f64) -> Self {
        Self { start_um, end_um }
    }

    /// 양 끝을 포함한 닫힌 구간 판정.
    pub fn contains(&self, wavelength_um: f64) -> bool {
        wavelength_um >= self.start_um && wavelength_um <= self.end_um
    }

    /// 유한하고 양수이며 시작 < 끝 인지 확인한다.
    pub fn is_valid(&self) -> bool {
        self.start_um.is_finite()
            && self.end_um.is_finite()
            && self.start_um > 0.0
            && self.start_um < self.end_um
    }

    pub fn width_um(&self) -> f64 {
        self.end_um - self.start_um
    }
}

impl std::fmt::Display for WavelengthBand {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:.3}~{:.3} μm", self.start_um, self.end_um)
    }
}
