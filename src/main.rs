use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;

use jvm_rs::host::StdoutSink;
use jvm_rs::vm::VirtualMachine;

/// A minimal JVM: loads a `.class` file and interprets its `main` method.
#[derive(Parser)]
#[command(author, version, about)]
struct Args {
    /// Path to the `.class` file to run. If the path does not exist as-is,
    /// a `.class` suffix is appended and retried once.
    class_file: PathBuf,

    /// Raise log verbosity (stacks with `RUST_LOG`).
    #[arg(short, long)]
    verbose: bool,
}

fn resolve_class_path(path: PathBuf) -> PathBuf {
    if path.exists() {
        return path;
    }
    let with_suffix = path.with_extension("class");
    if with_suffix.exists() {
        with_suffix
    } else {
        path
    }
}

fn main() -> ExitCode {
    let args = Args::parse();

    let mut builder = env_logger::Builder::from_default_env();
    if args.verbose {
        builder.filter_level(log::LevelFilter::Debug);
    }
    builder.init();

    let path = resolve_class_path(args.class_file);
    let bytes = match std::fs::read(&path) {
        Ok(bytes) => bytes,
        Err(e) => {
            eprintln!("failed to read {}: {e}", path.display());
            return ExitCode::FAILURE;
        }
    };

    let mut vm = VirtualMachine::new();
    let mut sink = StdoutSink::default();
    match vm.run_main(&bytes, &mut sink) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("{e}");
            ExitCode::FAILURE
        }
    }
}
