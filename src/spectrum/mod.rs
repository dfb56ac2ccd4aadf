//! 분광 데이터(반사율, 태양 스펙트럼, 방사율, 대기 투과율)의 로드·정규화·보간·가중적분 모듈 모음.

pub mod band;
pub mod dataset;
pub mod integrate;
pub mod resample;

pub use band::WavelengthBand;
pub use dataset::{DataFormatError, SpectralDataset, SpectrumKind};
pub use integrate::{solar_weighted_reflectance, trapezoid, weighted_average, IntegrationError};
pub use resample::MonotoneInterpolator;
