use crate::{cli::OutputFormat, error::Result};
#[cfg(feature = "colored-output")]
use colored::*;
use serde::Serialize;
use vimeo_hls::{GenerationReport, ManifestKind};

#[derive(Debug, Serialize)]
struct ResolvedManifest<'a> {
    id: &'a str,
    kind: ManifestKind,
    url: &'a str,
}

pub struct OutputManager {
    colored: bool,
}

impl OutputManager {
    pub fn new(colored: bool) -> Self {
        Self { colored }
    }

    pub fn format_report(
        &self,
        report: &GenerationReport,
        format: &OutputFormat,
    ) -> Result<String> {
        match format {
            OutputFormat::Pretty => Ok(self.format_report_pretty(report)),
            OutputFormat::Json => Ok(serde_json::to_string_pretty(report)?),
            OutputFormat::JsonCompact => Ok(serde_json::to_string(report)?),
        }
    }

    pub fn format_manifest_url(
        &self,
        id: &str,
        kind: ManifestKind,
        url: &str,
        format: &OutputFormat,
    ) -> Result<String> {
        let resolved = ResolvedManifest { id, kind, url };
        match format {
            OutputFormat::Pretty => {
                let label = format!("{} manifest", kind.as_str().to_uppercase());
                Ok(format!(
                    "{}: {}",
                    self.colorize(&label, &Color::Yellow, false),
                    self.colorize(url, &Color::Blue, false)
                ))
            }
            OutputFormat::Json => Ok(serde_json::to_string_pretty(&resolved)?),
            OutputFormat::JsonCompact => Ok(serde_json::to_string(&resolved)?),
        }
    }

    fn format_report_pretty(&self, report: &GenerationReport) -> String {
        let mut output = String::new();
        output.push_str(&self.colorize("Playlists generated:", &Color::Green, true));
        output.push('\n');

        output.push_str(&format!(
            "  {}: {}\n",
            self.colorize("Master", &Color::Yellow, false),
            self.colorize(&report.master_path().display().to_string(), &Color::Cyan, false)
        ));

        if !report.video.is_empty() {
            output.push_str(&format!(
                "  {}:\n",
                self.colorize("Video", &Color::Yellow, false)
            ));
            for video in &report.video {
                output.push_str(&format!(
                    "    {} {} {} kbps{}\n",
                    self.colorize(&video.playlist, &Color::Cyan, false),
                    video.resolution(),
                    video.bandwidth / 1000,
                    video
                        .codecs
                        .as_deref()
                        .map(|c| format!(" {c}"))
                        .unwrap_or_default()
                ));
            }
        }

        if !report.audio.is_empty() {
            output.push_str(&format!(
                "  {}:\n",
                self.colorize("Audio", &Color::Yellow, false)
            ));
            for audio in &report.audio {
                output.push_str(&format!(
                    "    {} {} Hz {} kbps{}\n",
                    self.colorize(&audio.playlist, &Color::Cyan, false),
                    audio.sample_rate,
                    audio.bitrate / 1000,
                    audio
                        .channels
                        .map(|c| format!(" {c}ch"))
                        .unwrap_or_default()
                ));
            }
        }

        output.push_str(&format!(
            "  {}: {}\n",
            self.colorize("Files", &Color::Yellow, false),
            report.files.len()
        ));
        output
    }

    fn colorize(&self, text: &str, color: &Color, bold: bool) -> String {
        #[cfg(feature = "colored-output")]
        {
            if self.colored {
                let colored_text = match color {
                    Color::Green => text.green(),
                    Color::Yellow => text.yellow(),
                    Color::Blue => text.blue(),
                    Color::Cyan => text.cyan(),
                };
                if bold {
                    colored_text.bold().to_string()
                } else {
                    colored_text.to_string()
                }
            } else {
                text.to_string()
            }
        }

        #[cfg(not(feature = "colored-output"))]
        {
            let _ = (color, bold, self.colored);
            text.to_string()
        }
    }
}

enum Color {
    Green,
    Yellow,
    Blue,
    Cyan,
}
