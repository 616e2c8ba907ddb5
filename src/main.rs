pub mod actor;
pub mod cache;
pub mod github;
pub mod protocol;
pub mod resolver;
pub mod types;

use std::time::Duration;

use clap::{Parser, Subcommand};

use crate::actor::Actor;
use crate::github::{RefProber, SmartHttpProber};
use crate::resolver::Resolver;
use crate::types::{Owner, Repo};

const DEFAULT_TTL_SECS: u64 = 600;

#[derive(Parser)]
#[command(
    name = "ghmeta",
    about = "Resolve GitHub repository metadata with a visibility-aware shared cache"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Resolve a repository's metadata record
    Resolve {
        /// Repository as github.com/owner/repo (or owner/repo)
        path: String,

        /// GitHub access token; defaults to $GITHUB_TOKEN if set
        #[arg(long)]
        token: Option<String>,

        /// User id the token belongs to
        #[arg(long, default_value = "cli")]
        user: String,

        /// Ignore $GITHUB_TOKEN and resolve as the anonymous public view
        #[arg(long)]
        anonymous: bool,

        /// Cache TTL in seconds
        #[arg(long, default_value_t = DEFAULT_TTL_SECS)]
        ttl: u64,
    },

    /// Probe a repository's default branch from its ref advertisement
    Branch {
        /// Repository in owner/repo format
        repo: String,
    },
}

fn main() {
    env_logger::init();

    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Resolve {
            path,
            token,
            user,
            anonymous,
            ttl,
        } => cmd_resolve(&path, token, &user, anonymous, ttl),
        Commands::Branch { repo } => cmd_branch(&repo),
    };

    if let Err(e) = result {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

fn cmd_resolve(
    path: &str,
    token: Option<String>,
    user: &str,
    anonymous: bool,
    ttl: u64,
) -> Result<(), Box<dyn std::error::Error>> {
    // Accept bare owner/repo as shorthand for the canonical path form.
    let path = if path.matches('/').count() == 1 {
        format!("{}/{}", resolver::GITHUB_HOST, path)
    } else {
        path.to_string()
    };

    let token = if anonymous {
        None
    } else {
        token.or_else(|| std::env::var("GITHUB_TOKEN").ok())
    };
    let actor = match token {
        Some(token) => Actor::authenticated(user, token),
        None => Actor::Anonymous,
    };

    let resolver = Resolver::github("ghmeta", Duration::from_secs(ttl));
    let record = resolver.get_repo(&actor, &path)?;

    println!("{}", serde_json::to_string_pretty(&record)?);

    Ok(())
}

fn cmd_branch(repo: &str) -> Result<(), Box<dyn std::error::Error>> {
    let (owner_str, repo_str) = repo
        .split_once('/')
        .ok_or("expected repository in owner/repo format")?;
    let owner: Owner = owner_str
        .parse()
        .map_err(|e| format!("invalid owner: {}", e))?;
    let repo: Repo = repo_str
        .parse()
        .map_err(|e| format!("invalid repo: {}", e))?;

    let head = SmartHttpProber::new().advertised_head(&owner, &repo)?;

    println!("{}", head.branch);
    println!(
        "  commit: {}",
        if head.commit.len() > 12 {
            &head.commit[..12]
        } else {
            &head.commit
        }
    );

    Ok(())
}
