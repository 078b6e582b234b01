use anyhow::Result;
use std::process::ExitCode;

fn main() -> Result<ExitCode> {
    envcat_cli::main_entry()
}
