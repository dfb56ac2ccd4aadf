//! 복사 냉각/가열 전력 계산 로직을 라이브러리로 분리하여 CLI 외의 호출자도 같은 엔진을 쓰게 한다.

pub mod app;
pub mod balance;
pub mod calculation;
pub mod config;
pub mod convection;
pub mod radiation;
pub mod spectrum;
pub mod ui_cli;
pub mod units;
