use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

use crate::balance::{CloudMap, HeatingMap, PowerComponents, WindMap};
use crate::calculation::{
    InputPaths, MaterialSummary, PowerReport, CLOUD_POINTS, CLOUD_SOLAR_MAX_W_M2, WIND_MAX_M_S,
    WIND_POINTS,
};

/// 명령행 인자.
#[derive(Debug, Parser)]
#[command(name = "radiative_cooling_toolbox", version, about = "복사 냉각/가열 전력 계산기")]
pub struct Cli {
    /// 설정 파일 경로
    #[arg(long, global = true, default_value = "config.toml")]
    pub config: PathBuf,
    #[command(subcommand)]
    pub command: Command,
}

/// 분광 데이터 파일 인자.
#[derive(Debug, Clone, Args)]
pub struct DatasetArgs {
    /// 반사율 데이터
    #[arg(long)]
    pub reflectance: PathBuf,
    /// 기준 태양 스펙트럼
    #[arg(long)]
    pub solar: PathBuf,
    /// 표면 방사율 데이터
    #[arg(long)]
    pub emissivity: PathBuf,
    /// 대기 투과율 데이터
    #[arg(long)]
    pub transmittance: PathBuf,
}

impl DatasetArgs {
    pub fn paths(&self) -> InputPaths {
        InputPaths {
            reflectance: self.reflectance.clone(),
            solar: self.solar.clone(),
            emissivity: self.emissivity.clone(),
            transmittance: self.transmittance.clone(),
        }
    }
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// 기본 설정 파일을 생성한다
    InitConfig {
        /// 기존 파일을 덮어쓴다
        #[arg(long)]
        force: bool,
    },
    /// 재료 광학 요약 (R_sol, R_vis, α_s, ε̄)
    Materials(DatasetArgs),
    /// 냉각 모드 스윕
    Cooling {
        #[command(flatten)]
        data: DatasetArgs,
        /// ΔT≈0 행의 전력 성분을 함께 출력
        #[arg(long)]
        diagnostics: bool,
    },
    /// 가열 모드 스윕
    Heating {
        #[command(flatten)]
        data: DatasetArgs,
        #[arg(long)]
        diagnostics: bool,
    },
    /// 고정 추가 계수에서 필름 온도별 전력 성분
    Components {
        #[command(flatten)]
        data: DatasetArgs,
        /// 추가 대류/전도 계수 [W/m²·K]
        #[arg(long, default_value_t = 0.0)]
        coefficient: f64,
        /// 가열 모드 부호 규약 사용
        #[arg(long)]
        heating: bool,
    },
    /// 이론 가열 전력 맵 (주변 온도 × 태양 조도)
    HeatingMap(DatasetArgs),
    /// 대기 방사율 × 태양 조도 회색체 냉각 맵
    Cloud {
        #[command(flatten)]
        data: DatasetArgs,
        #[arg(long, default_value_t = CLOUD_POINTS)]
        emissivity_points: usize,
        #[arg(long, default_value_t = CLOUD_POINTS)]
        solar_points: usize,
        #[arg(long, default_value_t = CLOUD_SOLAR_MAX_W_M2)]
        solar_max: f64,
    },
    /// 대기 방사율 × 풍속 평형 온도차 맵
    WindMap {
        #[command(flatten)]
        data: DatasetArgs,
        #[arg(long, default_value_t = WIND_POINTS)]
        emissivity_points: usize,
        #[arg(long, default_value_t = WIND_POINTS)]
        wind_points: usize,
        /// 최대 풍속 [m/s]
        #[arg(long, default_value_t = WIND_MAX_M_S)]
        wind_max: f64,
    },
}

/// 재료 요약을 출력한다.
pub fn print_material(summary: &MaterialSummary) {
    println!("\n-- 재료 광학 요약 --");
    println!("태양 가중 반사율 R_sol : {:.4}", summary.solar_reflectance);
    println!("가시광 반사율 R_vis    : {:.4}", summary.visible_reflectance);
    println!("태양 흡수율 α_s        : {:.4}", summary.solar_absorptance);
    println!("평균 방사율 ε̄          : {:.4}", summary.average_emissivity);
}

/// 스윕 결과 표와 Power_0 을 출력한다.
pub fn print_report(title: &str, report: &PowerReport) {
    print_material(&report.material);
    let sweep = &report.sweep;
    println!("\n-- {title} [W/m²] --");
    println!("P_atm = {:.3} W/m²", sweep.p_atm);
    print!("{:>10}", "T_film(°C)");
    for h in &sweep.coefficients {
        print!("{:>12}", format!("h={h}"));
    }
    println!();
    for i in 0..sweep.rows() {
        print!("{:>10.2}", sweep.film_temperatures_c[i]);
        for j in 0..sweep.cols() {
            print!("{:>12.3}", sweep.net_at(i, j));
        }
        println!();
    }
    let op = &sweep.operating_point;
    println!(
        "Power_0 = {:.3} W/m² (T_film = {:.2} °C, h = {})",
        report.power_0, op.film_temperature_c, sweep.coefficients[0]
    );
    let cells: Vec<PowerComponents> = (0..sweep.cols())
        .filter_map(|j| sweep.components_at(op.film_index, j).copied())
        .collect();
    if !cells.is_empty() {
        println!("\nΔT≈0 행 전력 성분:");
        print_components(&cells);
    }
}

/// 전력 성분 표를 출력한다.
pub fn print_components(cells: &[PowerComponents]) {
    println!(
        "{:>8} {:>7} {:>9} {:>9} {:>8} {:>8} {:>9} {:>9} {:>9} {:>9} {:>8} {:>9}",
        "T(°C)", "h_ex", "P_rad", "P_atm", "h_model", "h_total", "Q_model", "Q_extra", "Q_conv",
        "Q_solar", "P_phase", "P_net"
    );
    for c in cells {
        println!(
            "{:>8.2} {:>7.2} {:>9.3} {:>9.3} {:>8.3} {:>8.3} {:>9.3} {:>9.3} {:>9.3} {:>9.3} {:>8.3} {:>9.3}",
            c.film_temperature_c,
            c.coefficient,
            c.p_rad,
            c.p_atm,
            c.h_model,
            c.h_total,
            c.q_model,
            c.q_extra,
            c.q_conv,
            c.q_solar,
            c.p_phase,
            c.net
        );
    }
}

/// 이론 가열 맵을 출력한다. 행 = 주변 온도, 열 = 태양 조도.
pub fn print_heating_map(map: &HeatingMap) {
    println!("\n-- 이론 가열 전력 P_heat [W/m²] --");
    print!("{:>10}", "T_a\\S");
    for s in &map.solar_w_m2 {
        print!("{:>10.0}", s);
    }
    println!();
    for (i, t) in map.ambient_c.iter().enumerate() {
        print!("{:>10.1}", t);
        for j in 0..map.solar_w_m2.len() {
            print!("{:>10.2}", map.value_at(i, j));
        }
        println!();
    }
}

/// 방사율–조도 맵을 "ε_atm S P" 세 열로 출력한다.
pub fn print_cloud_map(map: &CloudMap) {
    println!("\n-- 회색체 냉각 전력 (ΔT=0) --");
    println!("{:>8} {:>10} {:>12}", "ε_atm", "S(W/m²)", "P(W/m²)");
    for (i, e) in map.atmospheric_emissivity.iter().enumerate() {
        for (j, s) in map.solar_w_m2.iter().enumerate() {
            println!("{:>8.3} {:>10.1} {:>12.3}", e, s, map.value_at(i, j));
        }
    }
}

/// 풍속 맵을 "ε_atm v ΔT" 세 열로 출력한다.
pub fn print_wind_map(map: &WindMap) {
    println!("\n-- 평형 온도차 ΔT = T_s − T_a [K] --");
    println!("{:>8} {:>9} {:>10}", "ε_atm", "v(m/s)", "ΔT(K)");
    for (i, e) in map.atmospheric_emissivity.iter().enumerate() {
        for (j, v) in map.wind_m_s.iter().enumerate() {
            println!("{:>8.3} {:>9.3} {:>10.3}", e, v, map.value_at(i, j));
        }
    }
}
