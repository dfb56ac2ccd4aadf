//! 복사 열교환 계산 모듈 모음.
//! 플랑크 흑체 복사, 반구 각도 격자, 대기 유효 방사율, 표면 방출/대기 흡수 항으로 구성한다.

pub mod angle_grid;
pub mod atmosphere;
pub mod blackbody;
pub mod terms;

pub use angle_grid::{AngleGrid, AngleSample};
pub use atmosphere::{atmospheric_emissivity, clamp_transmittance, MIN_TRANSMITTANCE};
pub use blackbody::{blackbody_weighted_average, PlanckConstants, MAX_EXPONENT};
pub use terms::{RadiativeEvaluator, SpectralGrid};
