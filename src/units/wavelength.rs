use serde::{Deserialize, Serialize};

/// 최대 파장값이 이 값을 넘으면 nm 데이터로 본다. 광학 측정 데이터는 μm 기준 수십 이하이다.
pub const NANOMETER_DETECTION_THRESHOLD: f64 = 50.0;

/// 파장 단위. 내부 기준은 마이크로미터(μm)이다.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum WavelengthUnit {
    Meter,
    Micrometer,
    Nanometer,
}

fn to_micrometer(value: f64, unit: WavelengthUnit) -> f64 {
    match unit {
        WavelengthUnit::Meter => value * 1e6,
        WavelengthUnit::Micrometer => value,
        WavelengthUnit::Nanometer => value / 1000.0,
    }
}

fn from_micrometer(value_um: f64, unit: WavelengthUnit) -> f64 {
    match unit {
        WavelengthUnit::Meter => value_um * 1e-6,
        WavelengthUnit::Micrometer => value_um,
        WavelengthUnit::Nanometer => value_um * 1000.0,
    }
}

/// 파장을 다른 단위로 변환한다.
pub fn convert_wavelength(value: f64, from: WavelengthUnit, to: WavelengthUnit) -> f64 {
    let um = to_micrometer(value, from);
    from_micrometer(um, to)
}

/// 원시 데이터의 최대 파장으로 입력 단위를 추정한다 (nm 또는 μm).
pub fn detect_wavelength_unit(max_wavelength: f64) -> WavelengthUnit {
    if max_wavelength > NANOMETER_DETECTION_THRESHOLD {
        WavelengthUnit::Nanometer
    } else {
        WavelengthUnit::Micrometer
    }
}
