use std::io::{self, Write};

use anyhow::Context;

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let mut stdout = io::stdout().lock();
    let code = line_send::run(std::env::args_os(), tokio::io::stdin(), &mut stdout)
        .await
        .context("could not write to standard output")?;
    stdout.flush().context("could not flush standard output")?;

    std::process::exit(code)
}
