use clap::{Parser, Subcommand};
use std::process::Command;

/// nvdex 빌드 태스크
#[derive(Parser)]
#[command(name = "xtask")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// 퍼즈 타깃 실행 (nightly + cargo-fuzz 필요)
    Fuzz {
        /// 타깃 이름 (예: fuzz_path_resolver)
        target: String,
        /// 최대 실행 시간(초). 0이면 무제한
        #[arg(long, default_value_t = 60)]
        time: u64,
    },
}

fn main() {
    let cli = Cli::parse();

    match cli.command {
        Commands::Fuzz { target, time } => {
            run_fuzz(&target, time);
        }
    }
}

fn run_fuzz(target: &str, time: u64) {
    let mut cmd = Command::new("cargo");
    cmd.args(["+nightly", "fuzz", "run", target]);

    if time > 0 {
        let limit = format!("-max_total_time={time}");
        cmd.args(["--", limit.as_str()]);
    }

    let status = cmd.status().expect("failed to run cargo fuzz");
    if !status.success() {
        eprintln!("fuzz run failed");
        std::process::exit(1);
    }

    println!("fuzz run finished");
}
