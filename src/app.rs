use thiserror::Error;

use crate::balance::SweepMode;
use crate::calculation::{self, CalcError, RunOptions, SpectralInputs};
use crate::config::{self, Config, ConfigError};
use crate::ui_cli::{self, Cli, Command, DatasetArgs};

/// 애플리케이션 실행 중 발생 가능한 오류를 표현한다.
#[derive(Debug, Error)]
pub enum AppError {
    /// 설정 저장/로드 오류
    #[error("설정 오류: {0}")]
    Config(#[from] ConfigError),
    /// 계산 오류
    #[error("계산 오류: {0}")]
    Calc(#[from] CalcError),
    /// 덮어쓰기 거부
    #[error("설정 파일이 이미 있습니다: {0} (--force 로 덮어쓰기)")]
    ConfigExists(String),
}

/// 명령 하나를 실행한다.
pub fn run(cli: &Cli) -> Result<(), AppError> {
    if let Command::InitConfig { force } = &cli.command {
        if cli.config.exists() && !force {
            return Err(AppError::ConfigExists(cli.config.display().to_string()));
        }
        Config::default().save(&cli.config)?;
        println!("기본 설정을 저장했습니다: {}", cli.config.display());
        return Ok(());
    }

    let cfg = config::load_or_default(&cli.config)?;
    match &cli.command {
        Command::InitConfig { .. } => {}
        Command::Materials(data) => {
            let inputs = load_inputs(data)?;
            ui_cli::print_material(&calculation::evaluate_material(&cfg, &inputs)?);
        }
        Command::Cooling { data, diagnostics } => {
            let inputs = load_inputs(data)?;
            let options = RunOptions {
                diagnostics: *diagnostics,
                cancel: None,
            };
            let report = calculation::run_cooling(&cfg, &inputs, options)?;
            ui_cli::print_report("순 냉각 전력", &report);
        }
        Command::Heating { data, diagnostics } => {
            let inputs = load_inputs(data)?;
            let options = RunOptions {
                diagnostics: *diagnostics,
                cancel: None,
            };
            let report = calculation::run_heating(&cfg, &inputs, options)?;
            ui_cli::print_report("순 가열 전력", &report);
        }
        Command::Components {
            data,
            coefficient,
            heating,
        } => {
            let inputs = load_inputs(data)?;
            let mode = if *heating {
                SweepMode::Heating
            } else {
                SweepMode::Cooling
            };
            let cells = calculation::power_components(&cfg, &inputs, mode, *coefficient)?;
            ui_cli::print_components(&cells);
        }
        Command::HeatingMap(data) => {
            let inputs = load_inputs(data)?;
            let map = calculation::heating_map(&cfg, &inputs, None, None)?;
            ui_cli::print_heating_map(&map);
        }
        Command::Cloud {
            data,
            emissivity_points,
            solar_points,
            solar_max,
        } => {
            let inputs = load_inputs(data)?;
            let map = calculation::cloud_map(
                &cfg,
                &inputs,
                *emissivity_points,
                *solar_points,
                *solar_max,
            )?;
            ui_cli::print_cloud_map(&map);
        }
        Command::WindMap {
            data,
            emissivity_points,
            wind_points,
            wind_max,
        } => {
            let inputs = load_inputs(data)?;
            let map = calculation::wind_map(
                &cfg,
                &inputs,
                *emissivity_points,
                *wind_points,
                *wind_max,
            )?;
            ui_cli::print_wind_map(&map);
        }
    }
    Ok(())
}

fn load_inputs(data: &DatasetArgs) -> Result<SpectralInputs, AppError> {
    Ok(SpectralInputs::load(&data.paths())?)
}
