use crate::spectrum::{weighted_average, IntegrationError, WavelengthBand};

/// 지수 인자 상한. 이를 넘으면 방출을 0 으로 본다(오버플로 방지).
pub const MAX_EXPONENT: f64 = 700.0;

/// 플랑크 식의 복사 상수. C1 = 2hc² [W·m²], C2 = hc/k_B [m·K].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PlanckConstants {
    pub c1: f64,
    pub c2: f64,
}

impl PlanckConstants {
    /// 플랑크 상수 h, 광속 c, 볼츠만 상수 k_B 로부터 계산한다.
    pub fn from_fundamental(h: f64, c: f64, k_b: f64) -> Self {
        Self {
            c1: 2.0 * h * c * c,
            c2: h * c / k_b,
        }
    }

    /// 분광 복사 I_BB(λ,T) [W/(m²·sr·m)]. λ 는 m, T 는 K.
    ///
    /// hc/(λk_BT) 가 [`MAX_EXPONENT`] 를 넘으면 0 을 반환한다.
    pub fn spectral_exitance(&self, lambda_m: f64, t_k: f64) -> f64 {
        if !(lambda_m > 0.0 && t_k > 0.0) {
            return 0.0;
        }
        let x = self.c2 / (lambda_m * t_k);
        if x > MAX_EXPONENT {
            return 0.0;
        }
        self.c1 / (lambda_m.powi(5) * x.exp_m1())
    }

    /// 여러 파장에 대해 한꺼번에 계산한다.
    pub fn spectral_exitance_many(&self, lambdas_m: &[f64], t_k: f64) -> Vec<f64> {
        lambdas_m
            .iter()
            .map(|&l| self.spectral_exitance(l, t_k))
            .collect()
    }
}

impl Default for PlanckConstants {
    fn default() -> Self {
        Self::from_fundamental(6.626_070_15e-34, 2.997_924_58e8, 1.380_649e-23)
    }
}

/// 흑체 복사를 가중치로 한 평균값(온도 가중 평균 방사율).
///
/// `wavelengths_um` 위의 `values` 를 대역 안에서 I_BB(λ,T) 로 가중 평균한다.
pub fn blackbody_weighted_average(
    constants: &PlanckConstants,
    wavelengths_um: &[f64],
    values: &[f64],
    band: &WavelengthBand,
    t_k: f64,
) -> Result<f64, IntegrationError> {
    let lambdas_m: Vec<f64> = wavelengths_um.iter().map(|w| w * 1e-6).collect();
    let weight = constants.spectral_exitance_many(&lambdas_m, t_k);
    weighted_average(values, &weight, wavelengths_um, band)
}
