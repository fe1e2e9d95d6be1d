//! CLI command definitions and parsing
use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(
    name = "sarthi",
    version,
    about = "Admin console for the Scheme Sarthi welfare-scheme portal",
    long_about = "Sarthi manages the portal's application records and audit trail, and computes \
                  the admin dashboard analytics (KPIs, trends, distributions and processing times) \
                  for any combination of date window, scheme, state and status filters."
)]
pub struct Cli {
    /// Global config file path (defaults to ~/.config/sarthi/config.toml)
    #[arg(short, long, global = true, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Load the demo users and applications into an empty store
    Seed {
        /// Replace existing collections with the demo data
        #[arg(short, long)]
        force: bool,
    },

    /// Compute dashboard analytics for a filter selection
    Analytics {
        /// Date window preset
        #[arg(short, long, value_parser = ["7d", "30d", "6m", "all"], conflicts_with_all = ["from", "to"])]
        preset: Option<String>,

        /// Custom window start (YYYY-MM-DD)
        #[arg(long, requires = "to")]
        from: Option<NaiveDate>,

        /// Custom window end (YYYY-MM-DD)
        #[arg(long, requires = "from")]
        to: Option<NaiveDate>,

        /// Only applications for this scheme id
        #[arg(long)]
        scheme: Option<String>,

        /// Only applications from users in this state
        #[arg(long)]
        state: Option<String>,

        /// Only applications with this status
        #[arg(long)]
        status: Option<String>,

        /// Print the full snapshot as JSON
        #[arg(long)]
        json: bool,
    },

    /// Review and decide citizen applications
    Applications {
        #[command(subcommand)]
        action: ApplicationAction,
    },

    /// Browse and manage the scheme catalog
    Schemes {
        #[command(subcommand)]
        action: SchemeAction,
    },

    /// Check which schemes a citizen qualifies for
    Eligibility {
        /// Only evaluate this scheme id
        #[arg(long)]
        scheme: Option<String>,

        /// Take the state from this user's profile
        #[arg(short, long)]
        user: Option<String>,

        /// State slug, e.g. maharashtra
        #[arg(long)]
        state: Option<String>,

        /// Age in years
        #[arg(long)]
        age: Option<u32>,

        /// Annual household income in rupees
        #[arg(long)]
        income: Option<u64>,

        /// Social category, e.g. sc, st, obc, general
        #[arg(long)]
        category: Option<String>,

        /// Occupation, e.g. farmer, student
        #[arg(long)]
        occupation: Option<String>,

        /// Show results in JSON format
        #[arg(long)]
        json: bool,
    },

    /// Read and write the admin audit trail
    Audit {
        #[command(subcommand)]
        action: AuditCommand,
    },

    /// Manage configuration
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(Subcommand, Debug)]
pub enum ApplicationAction {
    /// List applications, newest first
    List {
        /// Only applications with this status
        #[arg(short, long)]
        status: Option<String>,

        /// Page number (1-based)
        #[arg(short, long, default_value = "1")]
        page: usize,

        /// Page size (defaults to pagination.default_limit)
        #[arg(short, long)]
        limit: Option<usize>,

        /// Show results in JSON format
        #[arg(long)]
        json: bool,
    },

    /// Pick up a pending application for review
    Review {
        /// Application id
        id: String,

        /// Id of the reviewing admin
        #[arg(long)]
        by: String,
    },

    /// Approve or reject an application under review
    Decide {
        /// Application id
        id: String,

        /// Decision
        #[arg(long, value_parser = ["approved", "rejected"])]
        status: String,

        /// Remark shown to the citizen (required for rejections)
        #[arg(long, default_value = "")]
        remark: String,

        /// Id of the deciding admin
        #[arg(long)]
        by: String,
    },
}

#[derive(Subcommand, Debug)]
pub enum SchemeAction {
    /// List catalog schemes
    List {
        /// Include inactive schemes
        #[arg(short, long)]
        all: bool,

        /// Only schemes in this category
        #[arg(long)]
        category: Option<String>,

        /// Only schemes available in this state (nationwide ones included)
        #[arg(long)]
        state: Option<String>,

        /// Case-insensitive text search
        #[arg(short, long)]
        search: Option<String>,

        /// Page number (1-based)
        #[arg(short, long, default_value = "1")]
        page: usize,

        /// Page size (defaults to pagination.default_limit)
        #[arg(short, long)]
        limit: Option<usize>,

        /// Show results in JSON format
        #[arg(long)]
        json: bool,
    },

    /// Add a scheme to the catalog
    Add {
        /// Scheme name (unique, case-insensitive)
        #[arg(long)]
        name: String,

        /// Explicit id (generated when omitted)
        #[arg(long)]
        id: Option<String>,

        #[arg(long, default_value = "")]
        description: String,

        #[arg(long, default_value = "general")]
        category: String,

        /// State slug, or central for nationwide schemes
        #[arg(long, default_value = "central")]
        state: String,

        /// Eligibility rules as a JSON object
        #[arg(long)]
        rules: Option<String>,

        /// Id of the acting admin
        #[arg(long)]
        by: String,
    },

    /// Edit scheme details
    Edit {
        /// Scheme id
        id: String,

        #[arg(long)]
        name: Option<String>,

        #[arg(long)]
        description: Option<String>,

        #[arg(long)]
        category: Option<String>,

        #[arg(long)]
        state: Option<String>,

        /// Eligibility rules as a JSON object
        #[arg(long)]
        rules: Option<String>,

        /// Id of the acting admin
        #[arg(long)]
        by: String,
    },

    /// Switch a scheme between active and inactive
    Toggle {
        /// Scheme id
        id: String,

        /// Id of the acting admin
        #[arg(long)]
        by: String,
    },

    /// Delete a scheme
    Delete {
        /// Scheme id
        id: String,

        /// Id of the acting admin
        #[arg(long)]
        by: String,
    },
}

#[derive(Subcommand, Debug)]
pub enum AuditCommand {
    /// List audit entries, newest first (super admins only)
    List {
        /// Role of the caller
        #[arg(short, long)]
        role: String,

        /// Only entries of this action type
        #[arg(short, long)]
        action: Option<String>,

        /// Page number (1-based)
        #[arg(short, long, default_value = "1")]
        page: usize,

        /// Page size (defaults to pagination.default_limit)
        #[arg(short, long)]
        limit: Option<usize>,

        /// Show results in JSON format
        #[arg(long)]
        json: bool,
    },

    /// Record an admin action
    Log {
        /// Action type, e.g. SCHEME_UPDATED
        #[arg(short, long)]
        action: String,

        /// Id of the acting admin
        #[arg(long)]
        by: String,

        /// Role of the acting admin
        #[arg(short, long)]
        role: String,

        /// Id of the affected entity
        #[arg(short, long, default_value = "")]
        target: String,

        /// Kind of the affected entity
        #[arg(long, value_parser = ["scheme", "application", "user", "system"], default_value = "system")]
        target_type: String,

        /// Extra context as a JSON object
        #[arg(short, long)]
        metadata: Option<String>,
    },
}

#[derive(Subcommand, Debug)]
pub enum ConfigAction {
    /// Show current configuration
    Show,

    /// Validate configuration file
    Validate {
        /// Path to config file (defaults to standard location)
        #[arg(short, long)]
        file: Option<PathBuf>,
    },

    /// Initialize default configuration
    Init {
        /// Force overwrite existing config
        #[arg(short, long)]
        force: bool,
    },
}

impl Cli {
    /// Parse CLI arguments from command line
    pub fn parse_args() -> Self {
        Self::parse()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn verify_cli() {
        use clap::CommandFactory;
        Cli::command().debug_assert();
    }

    #[test]
    fn test_custom_range_args() {
        let cli = Cli::try_parse_from([
            "sarthi",
            "analytics",
            "--from",
            "2025-12-01",
            "--to",
            "2026-01-31",
            "--scheme",
            "pm-kisan",
        ])
        .unwrap();

        match cli.command {
            Commands::Analytics {
                from, to, scheme, ..
            } => {
                assert_eq!(from, NaiveDate::from_ymd_opt(2025, 12, 1));
                assert_eq!(to, NaiveDate::from_ymd_opt(2026, 1, 31));
                assert_eq!(scheme.as_deref(), Some("pm-kisan"));
            }
            other => panic!("unexpected command {:?}", other),
        }
    }

    #[test]
    fn test_preset_conflicts_with_range() {
        let result = Cli::try_parse_from([
            "sarthi",
            "analytics",
            "--preset",
            "7d",
            "--from",
            "2025-12-01",
            "--to",
            "2026-01-31",
        ]);
        assert!(result.is_err());

        assert!(Cli::try_parse_from(["sarthi", "analytics", "--from", "2025-12-01"]).is_err());
    }

    #[test]
    fn test_scheme_toggle_args() {
        let cli = Cli::try_parse_from(["sarthi", "schemes", "toggle", "pm-kisan", "--by", "u-admin-2"])
            .unwrap();

        match cli.command {
            Commands::Schemes {
                action: SchemeAction::Toggle { id, by },
            } => {
                assert_eq!(id, "pm-kisan");
                assert_eq!(by, "u-admin-2");
            }
            other => panic!("unexpected command {:?}", other),
        }

        assert!(Cli::try_parse_from(["sarthi", "schemes", "toggle", "pm-kisan"]).is_err());
    }

    #[test]
    fn test_eligibility_args() {
        let cli = Cli::try_parse_from([
            "sarthi",
            "eligibility",
            "--state",
            "gujarat",
            "--age",
            "34",
            "--income",
            "180000",
        ])
        .unwrap();

        match cli.command {
            Commands::Eligibility {
                state, age, income, occupation, ..
            } => {
                assert_eq!(state.as_deref(), Some("gujarat"));
                assert_eq!(age, Some(34));
                assert_eq!(income, Some(180_000));
                assert_eq!(occupation, None);
            }
            other => panic!("unexpected command {:?}", other),
        }

        assert!(Cli::try_parse_from(["sarthi", "eligibility", "--age", "old"]).is_err());
    }

    #[test]
    fn test_audit_log_args() {
        let cli = Cli::try_parse_from([
            "sarthi",
            "-v",
            "audit",
            "log",
            "--action",
            "SCHEME_UPDATED",
            "--by",
            "admin-content-1",
            "--role",
            "CONTENT_ADMIN",
            "--target",
            "pm-kisan",
            "--target-type",
            "scheme",
        ])
        .unwrap();

        assert!(cli.verbose);
        assert!(matches!(
            cli.command,
            Commands::Audit {
                action: AuditCommand::Log { .. }
            }
        ));
    }
}
