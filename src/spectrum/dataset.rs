use std::fs;
use std::path::Path;

use thiserror::Error;

use crate::units::{convert_wavelength, detect_wavelength_unit, WavelengthUnit};

use super::WavelengthBand;

/// 값의 최대치가 이 값을 넘으면 백분율(%) 데이터로 보고 100 으로 나눈다.
pub const PERCENT_DETECTION_THRESHOLD: f64 = 1.5;

/// 분광 데이터의 종류. 정규화 규칙(클램프 여부)과 오류 메시지 문맥에 쓴다.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SpectrumKind {
    /// 표면 반사율
    Reflectance,
    /// 기준 태양 스펙트럼(AM1.5 등)
    SolarIrradiance,
    /// 표면 방사율
    Emissivity,
    /// 대기 투과율
    Transmittance,
}

impl SpectrumKind {
    /// 광학 물성(반사율/방사율/투과율)은 [0,1] 로 클램프한다.
    pub fn is_optical_property(self) -> bool {
        !matches!(self, SpectrumKind::SolarIrradiance)
    }

    pub fn label(self) -> &'static str {
        match self {
            SpectrumKind::Reflectance => "반사율",
            SpectrumKind::SolarIrradiance => "태양 스펙트럼",
            SpectrumKind::Emissivity => "방사율",
            SpectrumKind::Transmittance => "대기 투과율",
        }
    }
}

impl std::fmt::Display for SpectrumKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// 분광 데이터 형식 오류.
#[derive(Debug, Error)]
pub enum DataFormatError {
    /// 파일 읽기 실패
    #[error("파일을 읽을 수 없습니다 ({path}): {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
    /// 두 번째 열이 없음
    #[error("{line}번째 줄에 파장/값 두 열이 필요합니다.")]
    MissingColumns { line: usize },
    /// 숫자가 아닌 값
    #[error("{line}번째 줄의 값 '{token}' 은(는) 숫자가 아닙니다.")]
    NonNumeric { line: usize, token: String },
    /// 파장 열과 값 열의 길이가 다름
    #[error("파장 {wavelengths}개와 값 {values}개의 길이가 다릅니다.")]
    LengthMismatch { wavelengths: usize, values: usize },
    /// 유효한 (중복 없는) 점이 2개 미만
    #[error("유효한 데이터 점이 {found}개뿐입니다. 최소 2개가 필요합니다.")]
    TooFewPoints { found: usize },
    /// 파장이 엄격히 증가하지 않음
    #[error("{index}번째 파장에서 단조 증가가 깨졌습니다.")]
    NonMonotonic { index: usize },
}

/// 정규화된 (파장 μm, 값) 시퀀스. 생성 이후 불변이다.
///
/// 파장은 엄격히 증가하고 중복이 없으며 최소 2점을 가진다.
#[derive(Debug, Clone, PartialEq)]
pub struct SpectralDataset {
    kind: SpectrumKind,
    wavelengths_um: Vec<f64>,
    values: Vec<f64>,
    source_unit: WavelengthUnit,
    percent_scaled: bool,
}

impl SpectralDataset {
    /// 원시 2열 데이터로부터 단위/스케일을 판정해 정규화된 데이터셋을 만든다.
    ///
    /// - 최대 파장 > 50 이면 nm 로 보고 μm 로 환산
    /// - 최대 값 > 1.5 이면 백분율로 보고 100 으로 나눔
    /// - 비유한 행은 버리고, 정렬 후 중복 파장은 처음 값만 남김
    pub fn from_columns(
        kind: SpectrumKind,
        wavelengths: &[f64],
        values: &[f64],
    ) -> Result<Self, DataFormatError> {
        if wavelengths.len() != values.len() {
            return Err(DataFormatError::LengthMismatch {
                wavelengths: wavelengths.len(),
                values: values.len(),
            });
        }

        let mut points: Vec<(f64, f64)> = wavelengths
            .iter()
            .zip(values)
            .filter(|(x, y)| x.is_finite() && y.is_finite())
            .map(|(&x, &y)| (x, y))
            .collect();
        let dropped = wavelengths.len() - points.len();
        if dropped > 0 {
            log::warn!("{kind}: 비유한 값을 가진 {dropped}개 행을 제외했습니다.");
        }
        if points.len() < 2 {
            return Err(DataFormatError::TooFewPoints {
                found: points.len(),
            });
        }

        let max_wavelength = points.iter().map(|p| p.0).fold(f64::MIN, f64::max);
        let source_unit = detect_wavelength_unit(max_wavelength);
        let max_value = points.iter().map(|p| p.1).fold(f64::MIN, f64::max);
        let percent_scaled = max_value > PERCENT_DETECTION_THRESHOLD;
        if source_unit != WavelengthUnit::Micrometer {
            log::debug!("{kind}: 파장 단위를 {source_unit:?} 로 판정해 μm 로 환산합니다.");
        }
        if percent_scaled {
            log::debug!("{kind}: 값을 백분율로 판정해 100 으로 나눕니다.");
        }

        points.sort_by(|a, b| a.0.total_cmp(&b.0));
        let before = points.len();
        points.dedup_by(|later, first| later.0 == first.0);
        if points.len() < before {
            log::warn!(
                "{kind}: 중복 파장 {}개를 제외했습니다(첫 값 유지).",
                before - points.len()
            );
        }
        if points.len() < 2 {
            return Err(DataFormatError::TooFewPoints {
                found: points.len(),
            });
        }

        let wavelengths_um: Vec<f64> = points
            .iter()
            .map(|p| convert_wavelength(p.0, source_unit, WavelengthUnit::Micrometer))
            .collect();
        ensure_strictly_increasing(&wavelengths_um)?;

        let mut clamped = 0usize;
        let values = points
            .iter()
            .map(|p| {
                let v = if percent_scaled { p.1 / 100.0 } else { p.1 };
                if kind.is_optical_property() && !(0.0..=1.0).contains(&v) {
                    clamped += 1;
                    v.clamp(0.0, 1.0)
                } else {
                    v
                }
            })
            .collect();
        if clamped > 0 {
            log::warn!("{kind}: [0, 1] 범위를 벗어난 값 {clamped}개를 잘라냈습니다.");
        }

        Ok(Self {
            kind,
            wavelengths_um,
            values,
            source_unit,
            percent_scaled,
        })
    }

    /// 2열 텍스트(공백, 탭, 쉼표, 세미콜론 구분)를 파싱한다.
    ///
    /// 데이터가 시작되기 전의 숫자가 아닌 줄은 헤더로 보고 건너뛴다.
    /// 맨 앞의 UTF-8 BOM 은 무시한다.
    pub fn from_text(kind: SpectrumKind, text: &str) -> Result<Self, DataFormatError> {
        let text = text.strip_prefix('\u{feff}').unwrap_or(text);
        let mut wavelengths = Vec::new();
        let mut values = Vec::new();

        for (idx, raw) in text.lines().enumerate() {
            let line_no = idx + 1;
            let line = raw.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }
            let tokens: Vec<&str> = line
                .split(|c: char| c == ',' || c == ';' || c.is_whitespace())
                .filter(|s| !s.is_empty())
                .collect();
            let first = match tokens.first() {
                Some(t) => *t,
                None => continue,
            };
            let x = match first.parse::<f64>() {
                Ok(x) => x,
                Err(_) if wavelengths.is_empty() => continue,
                Err(_) => {
                    return Err(DataFormatError::NonNumeric {
                        line: line_no,
                        token: first.to_string(),
                    })
                }
            };
            let second = tokens
                .get(1)
                .ok_or(DataFormatError::MissingColumns { line: line_no })?;
            let y = second
                .parse::<f64>()
                .map_err(|_| DataFormatError::NonNumeric {
                    line: line_no,
                    token: second.to_string(),
                })?;
            wavelengths.push(x);
            values.push(y);
        }

        Self::from_columns(kind, &wavelengths, &values)
    }

    /// 파일에서 2열 텍스트를 읽어 데이터셋을 만든다.
    pub fn from_path(kind: SpectrumKind, path: &Path) -> Result<Self, DataFormatError> {
        let text = fs::read_to_string(path).map_err(|source| DataFormatError::Io {
            path: path.display().to_string(),
            source,
        })?;
        let dataset = Self::from_text(kind, &text)?;
        log::debug!(
            "{kind}: {} 에서 {}점 로드 ({:.3}~{:.3} μm)",
            path.display(),
            dataset.len(),
            dataset.wavelengths_um[0],
            dataset.wavelengths_um[dataset.len() - 1]
        );
        Ok(dataset)
    }

    pub fn kind(&self) -> SpectrumKind {
        self.kind
    }

    pub fn wavelengths_um(&self) -> &[f64] {
        &self.wavelengths_um
    }

    pub fn values(&self) -> &[f64] {
        &self.values
    }

    pub fn len(&self) -> usize {
        self.wavelengths_um.len()
    }

    /// 생성 규칙상 항상 false 이다.
    pub fn is_empty(&self) -> bool {
        self.wavelengths_um.is_empty()
    }

    /// 원시 데이터에서 판정한 파장 단위.
    pub fn source_unit(&self) -> WavelengthUnit {
        self.source_unit
    }

    pub fn percent_scaled(&self) -> bool {
        self.percent_scaled
    }

    /// 데이터가 덮는 파장 구간.
    pub fn coverage(&self) -> WavelengthBand {
        WavelengthBand::new(self.wavelengths_um[0], self.wavelengths_um[self.len() - 1])
    }

    /// 대역 안의 (파장, 값) 쌍만 잘라낸다.
    pub fn restrict(&self, band: &WavelengthBand) -> (Vec<f64>, Vec<f64>) {
        self.wavelengths_um
            .iter()
            .zip(&self.values)
            .filter(|(x, _)| band.contains(**x))
            .map(|(&x, &y)| (x, y))
            .unzip()
    }
}

/// 파장 격자가 엄격히 증가하는지 검사한다.
pub fn ensure_strictly_increasing(wavelengths: &[f64]) -> Result<(), DataFormatError> {
    for (i, w) in wavelengths.windows(2).enumerate() {
        if !(w[1] > w[0]) {
            return Err(DataFormatError::NonMonotonic { index: i + 1 });
        }
    }
    Ok(())
}
