use anyhow::Result;

fn main() -> Result<()> {
    sourcebox::cli::run(sourcebox::cli::CliMode::Tester)
}
