use std::f64::consts::{FRAC_PI_2, PI};

use crate::config::DomainError;

/// 천정각 하나와 그 램버트 가중치 2π·sinθ·cosθ·dθ.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AngleSample {
    pub theta: f64,
    /// sec θ. 대기 경로 길이 배율.
    pub sec_theta: f64,
    pub weight: f64,
}

/// [0, π/2) 반구 격자. 온도와 무관하므로 스윕 전체에서 재사용한다.
#[derive(Debug, Clone, PartialEq)]
pub struct AngleGrid {
    step: f64,
    samples: Vec<AngleSample>,
}

impl AngleGrid {
    /// θᵢ = i·dθ, dθ = (π/2)/N 로 N 개 표본을 만든다.
    pub fn build(count: usize) -> Result<Self, DomainError> {
        if count == 0 {
            return Err(DomainError::NonPositive {
                name: "angle_steps",
                value: 0.0,
            });
        }
        let step = FRAC_PI_2 / count as f64;
        let samples = (0..count)
            .map(|i| {
                let theta = i as f64 * step;
                AngleSample {
                    theta,
                    sec_theta: 1.0 / theta.cos(),
                    weight: 2.0 * PI * theta.sin() * theta.cos() * step,
                }
            })
            .collect();
        Ok(Self { step, samples })
    }

    pub fn step(&self) -> f64 {
        self.step
    }

    pub fn samples(&self) -> &[AngleSample] {
        &self.samples
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    /// 가중치 합. 투영 입체각 π 에 수렴한다.
    pub fn total_weight(&self) -> f64 {
        self.samples.iter().map(|s| s.weight).sum()
    }
}
