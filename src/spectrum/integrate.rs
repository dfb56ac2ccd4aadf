use thiserror::Error;

use super::{MonotoneInterpolator, SpectralDataset, WavelengthBand};

/// 가중 적분 오류.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum IntegrationError {
    /// 대역 안의 점이 2개 미만
    #[error("{band} 대역 안의 데이터 점이 {found}개뿐입니다.")]
    TooFewPoints { band: WavelengthBand, found: usize },
    /// 가중 스펙트럼 적분이 0
    #[error("{band} 대역의 가중 스펙트럼 적분이 0 입니다.")]
    ZeroWeight { band: WavelengthBand },
    /// 입력 배열 길이 불일치
    #[error("적분 입력 길이가 다릅니다 (f={f}, weight={weight}, λ={x}).")]
    LengthMismatch { f: usize, weight: usize, x: usize },
}

/// 비균일 격자 위 사다리꼴 적분.
pub fn trapezoid(y: &[f64], x: &[f64]) -> f64 {
    x.windows(2)
        .zip(y.windows(2))
        .map(|(xw, yw)| 0.5 * (yw[0] + yw[1]) * (xw[1] - xw[0]))
        .sum()
}

/// ∫f·w dλ / ∫w dλ 를 대역 안에서 사다리꼴로 계산한다.
pub fn weighted_average(
    f: &[f64],
    weight: &[f64],
    wavelengths: &[f64],
    band: &WavelengthBand,
) -> Result<f64, IntegrationError> {
    if f.len() != wavelengths.len() || weight.len() != wavelengths.len() {
        return Err(IntegrationError::LengthMismatch {
            f: f.len(),
            weight: weight.len(),
            x: wavelengths.len(),
        });
    }

    let mut x = Vec::new();
    let mut fw = Vec::new();
    let mut w = Vec::new();
    for i in 0..wavelengths.len() {
        if band.contains(wavelengths[i]) {
            x.push(wavelengths[i]);
            fw.push(f[i] * weight[i]);
            w.push(weight[i]);
        }
    }
    if x.len() < 2 {
        return Err(IntegrationError::TooFewPoints {
            band: *band,
            found: x.len(),
        });
    }

    let denominator = trapezoid(&w, &x);
    if denominator == 0.0 || !denominator.is_finite() {
        return Err(IntegrationError::ZeroWeight { band: *band });
    }
    Ok(trapezoid(&fw, &x) / denominator)
}

/// 태양 스펙트럼 가중 평균 반사율.
///
/// 태양 스펙트럼을 대역으로 자른 뒤 반사율 파장점으로 PCHIP 재표본화하고,
/// 반사율 파장 격자 위에서 가중 평균한다.
pub fn solar_weighted_reflectance(
    reflectance: &SpectralDataset,
    solar: &SpectralDataset,
    band: &WavelengthBand,
) -> Result<f64, IntegrationError> {
    let (ref_x, ref_y) = reflectance.restrict(band);
    let (sol_x, sol_y) = solar.restrict(band);
    if sol_x.len() < 2 {
        return Err(IntegrationError::TooFewPoints {
            band: *band,
            found: sol_x.len(),
        });
    }
    let interp = MonotoneInterpolator::new(sol_x, sol_y).map_err(|_| {
        IntegrationError::TooFewPoints {
            band: *band,
            found: 0,
        }
    })?;
    let weight = interp.resample(&ref_x);
    weighted_average(&ref_y, &weight, &ref_x, band)
}
