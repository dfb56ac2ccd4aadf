//! 설정 파일과 필름 온도 축은 °C, 물리 계산은 K 를 쓴다.

/// 0°C 에 해당하는 절대온도(K).
pub const ZERO_CELSIUS_K: f64 = 273.15;

/// °C 를 K 로 변환한다.
pub fn celsius_to_kelvin(t_c: f64) -> f64 {
    t_c + ZERO_CELSIUS_K
}

/// K 를 °C 로 변환한다.
pub fn kelvin_to_celsius(t_k: f64) -> f64 {
    t_k - ZERO_CELSIUS_K
}
