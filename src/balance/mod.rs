//! 필름 온도 × 대류계수 2차원 전력수지 스윕과 파라미터 맵 계산 모듈 모음.

pub mod maps;
pub mod phase_change;
pub mod sweep;

pub use maps::{
    emissivity_solar_cloud, linspace, theoretical_heating_map, wind_cooling_map, CloudMap,
    HeatingMap, WindBalance, WindMap, WIND_SEARCH_BRACKET_K,
};
pub use phase_change::{phase_power, PhaseChange};
pub use sweep::{
    cell_components, film_terms, nearest_film_index, run_sweep, FilmTerms, OperatingPoint,
    PowerComponents, SweepError, SweepInput, SweepMode, SweepResult,
};
