//! mikku - CLI entry point.

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

use mikku::{
    BumpDirective, ChangelogStyle, Config, GitHubHost, ManifestSettings, PullRequestOptions,
    ReleaseOptions, run_pull_request, run_release,
};

/// Bump Semantic Versioning tag, create GitHub release and update Kubernetes manifest file.
#[derive(Parser, Debug)]
#[command(name = "mikku")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Create a tag and a GitHub release.
    ///
    /// With major, minor or patch the latest release tag must follow
    /// Semantic Versioning (vX.Y.Z). For the first release pass a version.
    #[command(alias = "r")]
    Release {
        /// Repository name under MIKKU_GITHUB_OWNER
        repository: String,

        /// major | minor | patch | explicit version (e.g. v1.0.0)
        version: String,

        /// Changelog style: plain or linked
        #[arg(long, default_value = "plain")]
        changelog: ChangelogStyle,
    },

    /// Create a pull request updating the Docker image tag in a Kubernetes manifest file.
    Pr {
        /// Repository whose latest release tag is deployed
        repository: String,

        /// Repository holding the manifest. Overrides MIKKU_MANIFEST_REPOSITORY
        #[arg(short = 'm', long = "manifest")]
        manifest: Option<String>,

        /// Manifest file path. Overrides MIKKU_MANIFEST_FILEPATH
        #[arg(short = 'p', long = "path")]
        path: Option<String>,

        /// Docker image name. Overrides MIKKU_DOCKER_IMAGE_NAME
        #[arg(short = 'i', long = "image")]
        image: Option<String>,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "mikku=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();

    let config = Config::from_env().context("Invalid configuration")?;
    let host = GitHubHost::new(&config.access_token, &config.owner, config.api_url.as_deref())
        .context("Failed to create GitHub client")?;

    match cli.command {
        Command::Release {
            repository,
            version,
            changelog,
        } => {
            let options = ReleaseOptions {
                base_branch: config.base_branch.clone(),
                changelog_style: changelog,
                ..ReleaseOptions::default()
            };
            let directive = BumpDirective::parse(&version);

            let release = run_release(&host, &repository, &directive, &options)
                .await
                .with_context(|| format!("release {} failed", repository))?;

            println!("Release was created.");
            println!("{}", release.html_url);
        }
        Command::Pr {
            repository,
            manifest,
            path,
            image,
        } => {
            let options = PullRequestOptions {
                base_branch: config.base_branch.clone(),
                defaults: ManifestSettings::from_env(),
                overrides: ManifestSettings {
                    repository: manifest,
                    file_path: path,
                    image_name: image,
                },
                ..PullRequestOptions::new(&config.owner)
            };

            let pr = run_pull_request(&host, &repository, &options)
                .await
                .with_context(|| format!("pr {} failed", repository))?;

            println!("Pull request created. {}", pr.html_url);
        }
    }

    Ok(())
}
