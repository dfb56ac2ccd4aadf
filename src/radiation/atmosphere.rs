/// 투과율 하한. 0 또는 음수 투과율로 인한 정의역 오류를 막는다.
pub const MIN_TRANSMITTANCE: f64 = 1e-12;

/// 투과율을 (0, 1] 로 보정한다. 비유한 값은 하한으로 본다.
pub fn clamp_transmittance(tau: f64) -> f64 {
    if !tau.is_finite() || tau < MIN_TRANSMITTANCE {
        MIN_TRANSMITTANCE
    } else {
        tau.min(1.0)
    }
}

/// 각도 의존 대기 유효 방사율 ε_atm(λ,θ) = 1 − τ(λ)^secθ.
pub fn atmospheric_emissivity(tau: f64, sec_theta: f64) -> f64 {
    let tau = clamp_transmittance(tau);
    // 천정 방향은 정확히 1 − τ
    if sec_theta == 1.0 {
        return 1.0 - tau;
    }
    1.0 - tau.powf(sec_theta)
}
