//! 온도·파장 단위 정의 및 변환 모듈 모음.

pub mod temperature;
pub mod wavelength;

pub use temperature::{celsius_to_kelvin, kelvin_to_celsius, ZERO_CELSIUS_K};
pub use wavelength::{convert_wavelength, detect_wavelength_unit, WavelengthUnit};
