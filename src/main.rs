use std::sync::Arc;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::{info, warn};
use weather_form::{
    ElementId, FormConfig, FormController, FormMetrics, MemoryView, MetricsConfig,
    ResilientClientConfig, TelemetryConfig, init_tracing, view::terminal,
};

const HELP: &str = "\
commands:
  city <text>   type into the city field
  date <text>   set the date field (YYYY-MM-DD)
  submit        submit the form
  show          print the page
  metrics       print Prometheus metrics
  version       print the version
  quit          exit";

/// Result of one line of input
enum Command<'a> {
    City(&'a str),
    Date(&'a str),
    Submit,
    Show,
    Metrics,
    Version,
    Help,
    Quit,
    Unknown(&'a str),
}

fn parse_command(line: &str) -> Command<'_> {
    let line = line.trim_start();
    let (word, rest) = line.split_once(' ').unwrap_or((line.trim_end(), ""));
    match word {
        "city" => Command::City(rest),
        "date" => Command::Date(rest.trim()),
        "submit" => Command::Submit,
        "show" | "" => Command::Show,
        "metrics" => Command::Metrics,
        "version" => Command::Version,
        "help" => Command::Help,
        "quit" | "exit" => Command::Quit,
        other => Command::Unknown(other),
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    init_tracing(&TelemetryConfig::from_env())?;

    let config = FormConfig::from_env();
    let metrics = if MetricsConfig::from_env().enabled {
        Some(FormMetrics::new()?)
    } else {
        None
    };

    let view = Arc::new(MemoryView::new());
    let controller = FormController::connect(
        Arc::clone(&view),
        config.clone(),
        ResilientClientConfig::from_env(),
        metrics,
    )?;

    info!(base_url = %config.base_url, "Weather form ready");
    println!("{HELP}");

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = lines.next_line().await? {
        match parse_command(&line) {
            Command::City(text) => {
                view.set_value(ElementId::City, text);
                controller.on_city_input();
            }
            Command::Date(text) => view.set_value(ElementId::Date, text),
            Command::Submit => {
                let outcome = controller.on_submit().await;
                info!(outcome = outcome.label(), "Submission finished");
            }
            Command::Show => {}
            Command::Metrics => {
                match controller.metrics().map(|m| m.render()).transpose() {
                    Ok(Some(text)) => println!("{text}"),
                    Ok(None) => println!("Metrics collection is disabled"),
                    Err(e) => warn!(error = %e, "Failed to render metrics"),
                }
                continue;
            }
            Command::Version => {
                println!("weather-form {}", env!("CARGO_PKG_VERSION"));
                continue;
            }
            Command::Help => {
                println!("{HELP}");
                continue;
            }
            Command::Quit => break,
            Command::Unknown(word) => {
                println!("unknown command: {word} (try 'help')");
                continue;
            }
        }
        print!("{}", terminal::render(&view.snapshot()));
    }

    controller.dispose();
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_commands() {
        assert!(matches!(parse_command("city  Par"), Command::City(" Par")));
        assert!(matches!(parse_command("date 2024-01-01 "), Command::Date("2024-01-01")));
        assert!(matches!(parse_command("submit"), Command::Submit));
        assert!(matches!(parse_command("submit\r"), Command::Submit));
        assert!(matches!(parse_command(""), Command::Show));
        assert!(matches!(parse_command("exit"), Command::Quit));
        assert!(matches!(parse_command("dance"), Command::Unknown("dance")));
    }

    #[test]
    fn test_city_without_text_clears_field() {
        assert!(matches!(parse_command("city"), Command::City("")));
    }
}
