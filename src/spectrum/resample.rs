//! 단조 보존 3차 에르미트(PCHIP) 보간.
//! 오버슈트/링잉이 없고, 데이터 범위 밖은 가장자리 값으로 클램프한다(외삽 금지).

use super::dataset::{ensure_strictly_increasing, DataFormatError};
use super::SpectralDataset;

/// PCHIP 보간기. 노드별 기울기를 미리 계산해 둔다.
#[derive(Debug, Clone)]
pub struct MonotoneInterpolator {
    x: Vec<f64>,
    y: Vec<f64>,
    slopes: Vec<f64>,
}

impl MonotoneInterpolator {
    /// 엄격히 증가하는 x 와 같은 길이의 y 로 보간기를 만든다.
    pub fn new(x: Vec<f64>, y: Vec<f64>) -> Result<Self, DataFormatError> {
        if x.len() != y.len() {
            return Err(DataFormatError::LengthMismatch {
                wavelengths: x.len(),
                values: y.len(),
            });
        }
        if x.len() < 2 {
            return Err(DataFormatError::TooFewPoints { found: x.len() });
        }
        ensure_strictly_increasing(&x)?;
        let slopes = pchip_slopes(&x, &y);
        Ok(Self { x, y, slopes })
    }

    /// 데이터셋 전체를 보간 노드로 쓴다.
    pub fn from_dataset(dataset: &SpectralDataset) -> Self {
        let x = dataset.wavelengths_um().to_vec();
        let y = dataset.values().to_vec();
        // SpectralDataset 은 이미 2점 이상, 엄격 증가가 보장된다.
        let slopes = pchip_slopes(&x, &y);
        Self { x, y, slopes }
    }

    /// 한 점에서 값을 구한다.
    pub fn eval(&self, x: f64) -> f64 {
        let n = self.x.len();
        if x <= self.x[0] {
            return self.y[0];
        }
        if x >= self.x[n - 1] {
            return self.y[n - 1];
        }
        let k = self.x.partition_point(|&v| v <= x).saturating_sub(1).min(n - 2);
        let h = self.x[k + 1] - self.x[k];
        let s = (x - self.x[k]) / h;
        let s2 = s * s;
        let s3 = s2 * s;
        let h00 = 2.0 * s3 - 3.0 * s2 + 1.0;
        let h10 = s3 - 2.0 * s2 + s;
        let h01 = -2.0 * s3 + 3.0 * s2;
        let h11 = s3 - s2;
        h00 * self.y[k] + h10 * h * self.slopes[k] + h01 * self.y[k + 1] + h11 * h * self.slopes[k + 1]
    }

    /// 목표 격자로 재표본화한다. 수치 잡음으로 생기는 미소 음수는 0 으로 자른다.
    pub fn resample(&self, grid: &[f64]) -> Vec<f64> {
        grid.iter().map(|&x| self.eval(x).max(0.0)).collect()
    }
}

fn pchip_slopes(x: &[f64], y: &[f64]) -> Vec<f64> {
    let n = x.len();
    let h: Vec<f64> = x.windows(2).map(|w| w[1] - w[0]).collect();
    let m: Vec<f64> = (0..n - 1).map(|k| (y[k + 1] - y[k]) / h[k]).collect();

    if n == 2 {
        return vec![m[0], m[0]];
    }

    let mut d = vec![0.0; n];
    for k in 1..n - 1 {
        if m[k - 1] * m[k] <= 0.0 {
            d[k] = 0.0;
        } else {
            // 가중 조화평균 (Fritsch-Carlson)
            let w1 = 2.0 * h[k] + h[k - 1];
            let w2 = h[k] + 2.0 * h[k - 1];
            d[k] = (w1 + w2) / (w1 / m[k - 1] + w2 / m[k]);
        }
    }
    d[0] = edge_slope(h[0], h[1], m[0], m[1]);
    d[n - 1] = edge_slope(h[n - 2], h[n - 3], m[n - 2], m[n - 3]);
    d
}

/// 3점 비대칭 공식에 단조성 보정을 적용한 끝점 기울기.
fn edge_slope(h0: f64, h1: f64, m0: f64, m1: f64) -> f64 {
    let d = ((2.0 * h0 + h1) * m0 - h0 * m1) / (h0 + h1);
    if d.signum() != m0.signum() || m0 == 0.0 {
        0.0
    } else if m0.signum() != m1.signum() && d.abs() > 3.0 * m0.abs() {
        3.0 * m0
    } else {
        d
    }
}
