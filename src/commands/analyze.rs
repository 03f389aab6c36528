use console::style;
use indicatif::{ProgressBar, ProgressStyle};
use std::io::Write;
use std::path::PathBuf;
use std::time::Duration;
use tracing::{info, warn};

use crate::analyzer::SpecAnalyzer;
use crate::commands::fetch::SpecFetcher;
use crate::commands::CommandResult;
use crate::config::{Config, OutputFormat};
use crate::models::AnalysisResult;

pub struct AnalyzeCommand {
    config: Config,
    config_path: PathBuf,
    fetcher: SpecFetcher,
}

impl AnalyzeCommand {
    pub fn new(config: Config, config_path: PathBuf) -> Self {
        Self {
            config,
            config_path,
            fetcher: SpecFetcher::new(),
        }
    }

    /// Prompts for a URL when none was given, then fetches, analyzes and prints.
    pub fn execute(&mut self, url: Option<String>) -> CommandResult {
        let url = match given_url(url) {
            Some(url) => url,
            None => self.prompt_url()?,
        };

        let stdout = std::io::stdout();
        self.run_and_remember(&url, &mut stdout.lock())?;
        Ok(())
    }

    /// [`run`](Self::run), then stores `url` as `last_url` if the fetch succeeded.
    /// A config that cannot be written is only logged.
    pub fn run_and_remember<W: Write>(
        &mut self,
        url: &str,
        out: &mut W,
    ) -> Result<Option<AnalysisResult>, Box<dyn std::error::Error>> {
        let analysis = self.run(url, out)?;
        if analysis.is_some() {
            self.config.last_url = Some(url.to_string());
            if let Err(e) = self.config.save_to(&self.config_path) {
                warn!(path = %self.config_path.display(), error = %e, "could not save config");
            }
        }
        Ok(analysis)
    }

    /// Returns `None` when the document could not be retrieved; nothing is analyzed then.
    pub fn run<W: Write>(
        &self,
        url: &str,
        out: &mut W,
    ) -> Result<Option<AnalysisResult>, Box<dyn std::error::Error>> {
        let spinner = self.show_fetch_spinner();
        let spec = self.fetcher.fetch_or_report(url);
        spinner.finish_and_clear();

        let Some(spec) = spec else {
            writeln!(out, "Failed to retrieve a valid OpenAPI specification. Exiting.")?;
            return Ok(None);
        };

        let analysis = SpecAnalyzer::new(&spec).analyze();
        info!(
            url,
            endpoints = analysis.endpoints.len(),
            schemas = analysis.schemas.as_object().map_or(0, |s| s.len()),
            "analyzed OpenAPI specification"
        );

        render(&analysis, self.config.output_format, out)?;
        Ok(Some(analysis))
    }

    fn prompt_url(&self) -> Result<String, Box<dyn std::error::Error>> {
        let mut input = dialoguer::Input::<String>::new()
            .with_prompt("Please enter the URL of the OpenAPI specification endpoint")
            .allow_empty(true)
            .validate_with(|input: &String| -> Result<(), &str> {
                if input.trim().is_empty() {
                    Err("URL cannot be empty. Please try again.")
                } else {
                    Ok(())
                }
            });
        if let Some(last) = &self.config.last_url {
            input = input.default(last.clone());
        }

        Ok(input.interact_text()?.trim().to_string())
    }

    fn show_fetch_spinner(&self) -> ProgressBar {
        let spinner = ProgressBar::new_spinner().with_style(
            ProgressStyle::default_spinner()
                .template("{spinner} Fetching OpenAPI specification...")
                .unwrap_or_else(|_| ProgressStyle::default_spinner()),
        );
        spinner.enable_steady_tick(Duration::from_millis(100));
        spinner
    }
}

/// A positional URL counts only when it is not blank.
fn given_url(url: Option<String>) -> Option<String> {
    url.map(|u| u.trim().to_string()).filter(|u| !u.is_empty())
}

/// Writes each section as a blank line, `key:`, then the indented value.
pub fn render<W: Write>(analysis: &AnalysisResult, format: OutputFormat, out: &mut W) -> CommandResult {
    for (key, value) in analysis.sections()? {
        writeln!(out, "\n{}:", style(key).cyan().bold())?;
        let body = match format {
            OutputFormat::Json => serde_json::to_string_pretty(&value)?,
            OutputFormat::Yaml => serde_yaml::to_string(&value)?.trim_end().to_string(),
        };
        writeln!(out, "{}", body)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::fetch::tests::{sample_spec, spawn_spec_server};
    use pretty_assertions::assert_eq;
    use serde_json::json;
    use tempfile::tempdir;

    fn minimal_analysis() -> AnalysisResult {
        let spec = json!({
            "openapi": "3.0.0",
            "info": { "title": "T", "version": "1" },
            "paths": { "/x": { "get": { "summary": "s" } } }
        });
        SpecAnalyzer::new(&spec).analyze()
    }

    fn rendered(analysis: &AnalysisResult, format: OutputFormat) -> String {
        let mut out = Vec::new();
        render(analysis, format, &mut out).unwrap();
        console::strip_ansi_codes(&String::from_utf8(out).unwrap()).into_owned()
    }

    #[test]
    fn test_render_json_sections_in_order() {
        let text = rendered(&minimal_analysis(), OutputFormat::Json);

        let headers: Vec<&str> = text.lines().filter(|l| l.ends_with(':')).collect();
        assert_eq!(
            headers,
            vec!["api_info:", "openapi_version:", "endpoints:", "schemas:", "security:", "servers:"]
        );
        assert!(text.starts_with("\napi_info:\n{\n  \"title\": \"T\",\n  \"version\": \"1\",\n  \"description\": null\n}\n"));
        assert!(text.contains("\nopenapi_version:\n\"3.0.0\"\n"));
        assert!(text.contains("\"operationId\": null"));
        assert!(text.ends_with("\nservers:\n[]\n"));
    }

    #[test]
    fn test_render_yaml() {
        let text = rendered(&minimal_analysis(), OutputFormat::Yaml);

        assert!(text.contains("\napi_info:\ntitle: T\n"));
        assert!(text.contains("- path: /x\n  method: get\n"));
    }

    #[test]
    fn test_run_prints_analysis() {
        let base = spawn_spec_server();
        let command = AnalyzeCommand::new(Config::default(), PathBuf::from("unused.json"));
        let mut out = Vec::new();

        let analysis = command
            .run(&format!("{}/openapi.json", base), &mut out)
            .unwrap()
            .unwrap();

        assert_eq!(analysis, SpecAnalyzer::new(&sample_spec()).analyze());
        let methods: Vec<&str> = analysis.endpoints.iter().map(|e| e.method.as_str()).collect();
        assert_eq!(methods, vec!["get", "put", "delete", "post"]);
        let text = String::from_utf8(out).unwrap();
        assert!(text.contains("\"title\": \"Items API\""));
    }

    #[test]
    fn test_run_stops_after_server_error() {
        let base = spawn_spec_server();
        let command = AnalyzeCommand::new(Config::default(), PathBuf::from("unused.json"));
        let mut out = Vec::new();

        let analysis = command.run(&format!("{}/broken", base), &mut out).unwrap();

        assert_eq!(analysis, None);
        assert_eq!(
            String::from_utf8(out).unwrap(),
            "Failed to retrieve a valid OpenAPI specification. Exiting.\n"
        );
    }

    #[test]
    fn test_blank_url_argument_falls_back_to_prompt() {
        assert_eq!(given_url(None), None);
        assert_eq!(given_url(Some(String::new())), None);
        assert_eq!(given_url(Some("   \t".to_string())), None);
        assert_eq!(
            given_url(Some(" localhost:8000/openapi.json ".to_string())),
            Some("localhost:8000/openapi.json".to_string())
        );
    }

    #[test]
    fn test_successful_fetch_remembers_url() {
        let base = spawn_spec_server();
        let dir = tempdir().unwrap();
        let path = dir.path().join("config.json");
        let url = format!("{}/openapi.json", base);

        let mut command = AnalyzeCommand::new(Config::default(), path.clone());
        let analysis = command.run_and_remember(&url, &mut Vec::<u8>::new()).unwrap();

        assert!(analysis.is_some());
        assert_eq!(Config::load_from(&path).unwrap().last_url, Some(url));
    }

    #[test]
    fn test_failed_fetch_keeps_previous_url() {
        let base = spawn_spec_server();
        let dir = tempdir().unwrap();
        let path = dir.path().join("config.json");
        let previous = Config {
            last_url: Some("http://previous.example.com/openapi.json".to_string()),
            output_format: OutputFormat::Json,
        };
        previous.save_to(&path).unwrap();

        let mut command = AnalyzeCommand::new(previous.clone(), path.clone());
        let analysis = command
            .run_and_remember(&format!("{}/broken", base), &mut Vec::<u8>::new())
            .unwrap();

        assert_eq!(analysis, None);
        assert_eq!(Config::load_from(&path).unwrap(), previous);
    }

    #[test]
    fn test_unwritable_config_does_not_fail_run() {
        let base = spawn_spec_server();
        let dir = tempdir().unwrap();
        let blocker = dir.path().join("not-a-dir");
        std::fs::write(&blocker, "").unwrap();

        let mut command = AnalyzeCommand::new(Config::default(), blocker.join("config.json"));
        let analysis = command
            .run_and_remember(&format!("{}/openapi.json", base), &mut Vec::<u8>::new())
            .unwrap();

        assert!(analysis.is_some());
    }
}
