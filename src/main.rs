use clap::Parser;
use radiative_cooling_toolbox::app;
use radiative_cooling_toolbox::ui_cli::Cli;

/// 프로그램의 엔트리 포인트. 로거를 초기화한 뒤 CLI 명령을 실행한다.
fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    if let Err(err) = try_run() {
        eprintln!("오류: {err}");
        std::process::exit(1);
    }
}

fn try_run() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    app::run(&cli)?;
    Ok(())
}
