use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use vouch_core::ids::{BusinessId, OpinionId, UserId};
use vouch_core::types::{OpinionStatus, OpinionType};

mod commands;

const DEFAULT_LOG_FILTER: &str = "warn,vouch=info,vouch_core=info,registry=info";

#[derive(Parser, Debug)]
#[command(
    name = "vouch",
    version,
    about = "Crowdsourced trust scores for the businesses you deal with"
)]
struct Cli {
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    Init {
        #[arg(long)]
        path: Option<PathBuf>,
        #[arg(long)]
        force: bool,
    },
    Config {
        #[arg(long)]
        print: bool,
    },
    /// Show which data source is active and how much is stored
    Status,
    Business {
        #[command(subcommand)]
        action: BusinessCommand,
    },
    Opinion {
        #[command(subcommand)]
        action: OpinionCommand,
    },
}

#[derive(Subcommand, Debug)]
enum BusinessCommand {
    List {
        #[arg(long)]
        json: bool,
    },
    Search {
        #[arg(default_value = "")]
        query: String,
        #[arg(long)]
        category: Option<String>,
        #[arg(long)]
        json: bool,
    },
    Add {
        name: String,
        #[arg(long)]
        category: Option<String>,
        #[arg(long)]
        description: Option<String>,
        #[arg(long)]
        website: Option<String>,
        #[arg(long)]
        phone: Option<String>,
        #[arg(long)]
        email: Option<String>,
        #[arg(long)]
        address: Option<String>,
        #[arg(long)]
        city: Option<String>,
    },
    /// Trust profile and dashboard stats for one business (id or name)
    Show {
        business: String,
        #[arg(long)]
        json: bool,
    },
    Claim {
        id: BusinessId,
        #[arg(long)]
        user: UserId,
    },
    Verify {
        id: BusinessId,
    },
    Claimed {
        #[arg(long)]
        user: UserId,
    },
}

#[derive(Subcommand, Debug)]
enum OpinionCommand {
    Submit {
        /// Business name; unknown names create a new business
        #[arg(long)]
        business: String,
        #[arg(long = "type")]
        opinion_type: OpinionType,
        #[arg(long)]
        title: String,
        #[arg(long)]
        content: String,
        #[arg(long)]
        rating: Option<u8>,
        #[arg(long)]
        anonymous: bool,
        #[arg(long)]
        private: bool,
        #[arg(long)]
        user: Option<UserId>,
    },
    List {
        #[arg(long)]
        business: Option<BusinessId>,
        #[arg(long)]
        json: bool,
    },
    Status {
        id: OpinionId,
        status: OpinionStatus,
    },
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER)),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Init { path, force } => commands::config::init(path, force),
        Commands::Config { print } => {
            if print {
                commands::config::print_effective(cli.config)
            } else {
                Ok(())
            }
        }
        Commands::Status => commands::status::execute(cli.config),
        Commands::Business { action } => {
            let action = match action {
                BusinessCommand::List { json } => commands::business::BusinessAction::List { json },
                BusinessCommand::Search {
                    query,
                    category,
                    json,
                } => commands::business::BusinessAction::Search {
                    query,
                    category,
                    json,
                },
                BusinessCommand::Add {
                    name,
                    category,
                    description,
                    website,
                    phone,
                    email,
                    address,
                    city,
                } => commands::business::BusinessAction::Add(vouch_core::types::BusinessDraft {
                    name,
                    category,
                    description,
                    website,
                    phone,
                    email,
                    address,
                    city,
                    ..Default::default()
                }),
                BusinessCommand::Show { business, json } => {
                    commands::business::BusinessAction::Show { business, json }
                }
                BusinessCommand::Claim { id, user } => {
                    commands::business::BusinessAction::Claim { id, user }
                }
                BusinessCommand::Verify { id } => commands::business::BusinessAction::Verify { id },
                BusinessCommand::Claimed { user } => {
                    commands::business::BusinessAction::Claimed { user }
                }
            };
            commands::business::execute(cli.config, action)
        }
        Commands::Opinion { action } => {
            let action = match action {
                OpinionCommand::Submit {
                    business,
                    opinion_type,
                    title,
                    content,
                    rating,
                    anonymous,
                    private,
                    user,
                } => commands::opinion::OpinionAction::Submit(commands::opinion::SubmitInputs {
                    business,
                    opinion_type,
                    title,
                    content,
                    rating,
                    is_anonymous: anonymous,
                    is_public: !private,
                    user_id: user,
                }),
                OpinionCommand::List { business, json } => {
                    commands::opinion::OpinionAction::List { business, json }
                }
                OpinionCommand::Status { id, status } => {
                    commands::opinion::OpinionAction::Status { id, status }
                }
            };
            commands::opinion::execute(cli.config, action)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_log_filter_parses() {
        let filter = EnvFilter::try_new(DEFAULT_LOG_FILTER).unwrap();
        let rendered = filter.to_string();
        assert!(rendered.contains("vouch=info"));
        assert!(rendered.contains("registry=info"));
    }
}
