use serde::{Deserialize, Serialize};

/// 상변화 잠열에 의한 추가 전력 설정.
///
/// 트리거 온도 이하에서는 0, 트리거부터 `ramp_width_c` 동안 선형 증가,
/// 이후 `max_power_w_m2` 로 유지한다. 폭이 0 이하이면 상변화 항은 꺼진다.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PhaseChange {
    /// 상변화 시작 온도 [°C]
    pub trigger_c: f64,
    /// 최대 추가 전력 [W/m²]
    pub max_power_w_m2: f64,
    /// 선형 구간 폭 [°C]. 0 이하이면 비활성.
    pub ramp_width_c: f64,
}

impl PhaseChange {
    /// 램프 폭이 양수일 때만 상변화 전력이 생긴다.
    pub fn is_enabled(&self) -> bool {
        self.ramp_width_c > 0.0
    }

    /// 포화(평탄) 구간이 시작되는 온도.
    pub fn plateau_c(&self) -> f64 {
        self.trigger_c + self.ramp_width_c.max(0.0)
    }

    /// 필름 온도에서의 상변화 전력 [W/m²].
    pub fn power_at(&self, t_film_c: f64) -> f64 {
        if !self.is_enabled() || t_film_c <= self.trigger_c {
            return 0.0;
        }
        if t_film_c >= self.plateau_c() {
            return self.max_power_w_m2;
        }
        let frac = ((t_film_c - self.trigger_c) / self.ramp_width_c).clamp(0.0, 1.0);
        self.max_power_w_m2 * frac
    }
}

/// 설정이 없으면 0.
pub fn phase_power(phase: Option<&PhaseChange>, t_film_c: f64) -> f64 {
    phase.map_or(0.0, |p| p.power_at(t_film_c))
}
