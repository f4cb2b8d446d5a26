use log::LevelFilter;
use qlisp::{EvaluationContext, ReplConfig};
use tokio::io::{self, AsyncBufReadExt, AsyncWriteExt};

async fn query(stdout: &mut io::Stdout, prompt: &str, lines: &mut io::Lines<io::BufReader<io::Stdin>>) -> io::Result<Option<String>> {
    stdout.write_all(prompt.as_bytes()).await?;
    stdout.flush().await?;
    lines.next_line().await
}

async fn write_line(stdout: &mut io::Stdout, line: impl std::fmt::Display) -> io::Result<()> {
    stdout.write_all(format!("{}\n", line).as_bytes()).await
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    let config = ReplConfig::load()?;

    env_logger::Builder::new()
        .filter_level(LevelFilter::Warn)
        .filter_module("qlisp", config.level_filter())
        .parse_default_env()
        .init();

    let mut stdout = io::stdout();
    if config.banner {
        write_line(&mut stdout, format!("qlisp version {}", env!("CARGO_PKG_VERSION"))).await?;
        write_line(&mut stdout, "Press Ctrl+c to Exit").await?;
        write_line(&mut stdout, "Type \"author\" for more information.\n").await?;
    }

    let mut context = EvaluationContext::new();
    let mut lines = io::BufReader::new(io::stdin()).lines();

    while let Some(line) = query(&mut stdout, &config.prompt, &mut lines).await? {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        if line == "author" {
            write_line(&mut stdout, format!("Author: {}", env!("CARGO_PKG_AUTHORS"))).await?;
            continue;
        }

        match context.evaluate_str(line) {
            Ok(value) => write_line(&mut stdout, value).await?,
            Err(err) => write_line(&mut stdout, err).await?,
        }
    }

    log::debug!("end of input, leaving");
    Ok(())
}
