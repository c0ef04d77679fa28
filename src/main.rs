mod inventory;
mod menu;
mod session;

use anyhow::{anyhow, Context, Result};
use aws_config::Region;
use clap::Parser;
use colored::*;

/// All queries and sessions target this region.
const REGION: &str = "eu-central-1";

#[derive(Parser)]
#[command(name = "ssm-menu")]
#[command(about = "Pick a running EC2 instance from a menu and open an SSM session to it")]
#[command(version)]
struct Cli {
    /// AWS profile to use (falls back to the AWS_PROFILE environment variable)
    #[arg(short = 'p', long = "profile")]
    profile: Option<String>,
}

pub(crate) fn print_info(message: &str) {
    eprintln!("{} {}", "[INFO]".blue().bold(), message);
}

pub(crate) fn print_error(message: &str) {
    eprintln!("{} {}", "[ERROR]".red().bold(), message);
}

/// The flag wins over the environment variable; empty values count as absent.
fn resolve_profile(flag: Option<String>, env: Option<String>) -> Option<String> {
    let non_empty = |profile: &String| !profile.is_empty();
    flag.filter(non_empty).or_else(|| env.filter(non_empty))
}

async fn validate_credentials(config: &aws_config::SdkConfig, profile: &str) -> Result<()> {
    let sts_client = aws_sdk_sts::Client::new(config);
    sts_client
        .get_caller_identity()
        .send()
        .await
        .map_err(|e| anyhow!("failed to authenticate with profile '{profile}': {e}"))?;
    Ok(())
}

async fn run(profile: &str) -> Result<()> {
    // Ctrl+C at the menu prompt is a normal way out, not a fault. The
    // session launcher swaps this handler out while the child runs.
    ctrlc::set_handler(|| {
        println!("\nGoodbye!");
        std::process::exit(0);
    })
    .context("failed to install interrupt handler")?;

    let config = aws_config::defaults(aws_config::BehaviorVersion::latest())
        .region(Region::new(REGION))
        .profile_name(profile)
        .load()
        .await;
    validate_credentials(&config, profile).await?;

    let ec2_client = aws_sdk_ec2::Client::new(&config);
    let catalog = match inventory::list_running_instances(&ec2_client).await {
        Ok(catalog) => catalog,
        Err(e) => {
            print_error(&format!("instance query failed: {e}"));
            Vec::new()
        }
    };

    if catalog.is_empty() {
        println!("No running instances found or an error occurred.");
        return Ok(());
    }

    let Some(instance_id) = menu::present_and_select(&catalog)? else {
        return Ok(()); // user quit
    };

    session::launch_session(&instance_id, profile, REGION)
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let Some(profile) = resolve_profile(cli.profile, std::env::var("AWS_PROFILE").ok()) else {
        eprintln!("No AWS profile configured. Pass one with --profile <name>");
        eprintln!("or set the AWS_PROFILE environment variable.");
        std::process::exit(1);
    };

    if let Err(e) = run(&profile).await {
        print_error(&format!("{e:#}"));
        std::process::exit(1);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolve_profile_flag_only() {
        assert_eq!(
            resolve_profile(Some("foo".to_string()), None),
            Some("foo".to_string())
        );
    }

    #[test]
    fn test_resolve_profile_env_only() {
        assert_eq!(
            resolve_profile(None, Some("foo".to_string())),
            Some("foo".to_string())
        );
    }

    #[test]
    fn test_resolve_profile_flag_wins_over_env() {
        assert_eq!(
            resolve_profile(Some("flag".to_string()), Some("env".to_string())),
            Some("flag".to_string())
        );
    }

    #[test]
    fn test_resolve_profile_neither_set() {
        assert_eq!(resolve_profile(None, None), None);
    }

    #[test]
    fn test_resolve_profile_ignores_empty_values() {
        assert_eq!(resolve_profile(Some(String::new()), None), None);
        assert_eq!(resolve_profile(None, Some(String::new())), None);
        assert_eq!(
            resolve_profile(Some(String::new()), Some("env".to_string())),
            Some("env".to_string())
        );
    }
}
