use std::path::Path;

use reqwest::Client;
use tracing::{debug, info};
use vimeo_hls::{
    GenerationReport, GeneratorConfig, ManifestKind, ManifestResolver, PlaylistGenerator,
    VimeoResolver, build_client,
};

use crate::cli::OutputFormat;
use crate::config::AppConfig;
use crate::error::Result;
use crate::output::OutputManager;

pub struct CommandExecutor {
    config: AppConfig,
    output_manager: OutputManager,
    timeout: Option<u64>,
}

impl CommandExecutor {
    pub fn new(config: AppConfig, colored: bool, timeout: Option<u64>) -> Self {
        let colored = colored && config.colored_output;
        Self {
            config,
            output_manager: OutputManager::new(colored),
            timeout,
        }
    }

    fn client(&self) -> Result<Client> {
        Ok(build_client(&self.config.client_config(self.timeout))?)
    }

    fn generator(
        &self,
        client: Client,
        output_dir: Option<&Path>,
        comment: Option<&str>,
    ) -> PlaylistGenerator {
        let output_dir = output_dir.unwrap_or(self.config.output_dir.as_path());
        let comment = comment.unwrap_or(self.config.comment.as_str());
        PlaylistGenerator::new(
            client,
            GeneratorConfig::default()
                .with_output_dir(output_dir)
                .with_comment(comment),
        )
    }

    fn print_report(&self, report: &GenerationReport, format: &OutputFormat) -> Result<()> {
        println!("{}", self.output_manager.format_report(report, format)?);
        Ok(())
    }

    /// Generates playlists from a manifest URL.
    pub async fn generate(
        &self,
        url: &str,
        output_dir: Option<&Path>,
        comment: Option<&str>,
        format: &OutputFormat,
    ) -> Result<()> {
        let generator = self.generator(self.client()?, output_dir, comment);
        debug!(url, output_dir = %generator.config().output_dir.display(), "Generating playlists");

        let report = generator.generate(url).await?;
        self.print_report(&report, format)
    }

    /// Prints the manifest URL of a video.
    pub async fn resolve(
        &self,
        id: &str,
        kind: Option<ManifestKind>,
        format: &OutputFormat,
    ) -> Result<()> {
        let kind = kind.unwrap_or(self.config.manifest_kind);
        let resolver = VimeoResolver::new(self.client()?).with_kind(kind);
        let url = resolver.resolve(id).await?;

        println!(
            "{}",
            self.output_manager
                .format_manifest_url(id, kind, &url, format)?
        );
        Ok(())
    }

    /// Resolves a video's JSON manifest and generates playlists from it.
    pub async fn download(
        &self,
        id: &str,
        output_dir: Option<&Path>,
        comment: Option<&str>,
        format: &OutputFormat,
    ) -> Result<()> {
        let client = self.client()?;
        let resolver = VimeoResolver::new(client.clone()).with_kind(ManifestKind::Dash);
        let manifest_url = resolver.resolve(id).await?;
        info!("Generating playlists for {}", id);

        let report = self
            .generator(client, output_dir, comment)
            .generate(&manifest_url)
            .await?;
        self.print_report(&report, format)
    }
}
