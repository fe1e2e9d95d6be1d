use sarthi::analytics::{AnalyticsStore, DatasetAggregator, DatePreset, FilterAction, FilterKey};
use sarthi::audit::{AuditAction, AuditLog, TargetType};
use sarthi::cli::{ApplicationAction, AuditCommand, Cli, Commands, ConfigAction, SchemeAction};
use sarthi::clock::{Clock, SystemClock};
use sarthi::config::Config;
use sarthi::eligibility::{self, EligibilityRules, Profile};
use sarthi::error::{Result, SarthiError};
use sarthi::pagination::{paginate, render_pager, Page};
use sarthi::rbac::{self, Action, Role};
use sarthi::records::{
    ApplicationRecords, ApplicationStatus, SchemeDraft, SchemeFilter, SchemeRecords,
    SchemeStatus, SchemeUpdate, UserRecords, APPLICATIONS_KEY, SCHEMES_KEY, USERS_KEY,
};
use sarthi::storage::{KvStore, StorageManager, StorageStats};
use std::path::{Path, PathBuf};
use std::sync::Arc;

fn main() -> Result<()> {
    let cli = Cli::parse_args();

    init_logging(cli.verbose);

    let config_path = cli.config;

    match cli.command {
        Commands::Seed { force } => {
            cmd_seed(&load_config(config_path)?, force)?;
        }
        Commands::Analytics {
            preset,
            from,
            to,
            scheme,
            state,
            status,
            json,
        } => {
            let config = load_config(config_path)?;
            let mut actions = Vec::new();
            match (from, to) {
                (Some(from), Some(to)) => actions.push(FilterAction::CustomRange { from, to }),
                _ => {
                    let preset = match preset {
                        Some(p) => p,
                        None => config.analytics.default_preset.to_string(),
                    };
                    actions.push(FilterAction::Set(FilterKey::DatePreset, preset));
                }
            }
            for (key, value) in [
                (FilterKey::Scheme, scheme),
                (FilterKey::State, state),
                (FilterKey::Status, status),
            ] {
                if let Some(value) = value {
                    actions.push(FilterAction::Set(key, value));
                }
            }
            cmd_analytics(&config, FilterAction::Batch(actions), json)?;
        }
        Commands::Applications { action } => {
            cmd_applications(&load_config(config_path)?, action)?;
        }
        Commands::Schemes { action } => {
            cmd_schemes(&load_config(config_path)?, action)?;
        }
        Commands::Eligibility {
            scheme,
            user,
            state,
            age,
            income,
            category,
            occupation,
            json,
        } => {
            let profile = Profile {
                state,
                age,
                income,
                category,
                occupation,
            };
            cmd_eligibility(&load_config(config_path)?, profile, user, scheme, json)?;
        }
        Commands::Audit { action } => {
            cmd_audit(&load_config(config_path)?, action)?;
        }
        Commands::Config { action } => {
            cmd_config(config_path, action)?;
        }
    }

    Ok(())
}

fn init_logging(verbose: bool) {
    use tracing_subscriber::{fmt, EnvFilter};

    let default = if verbose { "sarthi=debug" } else { "sarthi=info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));

    fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

/// Open the store named by the config
fn open_storage(config: &Config) -> Result<StorageManager> {
    let data_dir = expand_path(&config.storage.data_dir)?;
    StorageManager::new(data_dir, &config.storage.database_file)
}

fn print_json<T: serde::Serialize>(value: &T) -> Result<()> {
    let json = serde_json::to_string_pretty(value).map_err(|e| SarthiError::Json {
        source: e,
        context: "Failed to serialize output".to_string(),
    })?;
    println!("{}", json);
    Ok(())
}

fn page_limit(config: &Config, limit: Option<usize>) -> usize {
    limit
        .unwrap_or(config.pagination.default_limit)
        .min(config.pagination.max_limit)
}

fn cmd_seed(config: &Config, force: bool) -> Result<()> {
    let storage = open_storage(config)?;
    let kv = storage.kv();
    let clock: Arc<dyn Clock> = Arc::new(SystemClock);

    if force {
        kv.remove(USERS_KEY)?;
        kv.remove(APPLICATIONS_KEY)?;
        kv.remove(SCHEMES_KEY)?;
        tracing::info!("Cleared users, applications and schemes");
    }

    let users = UserRecords::new(kv.clone()).seed()?;
    let apps = ApplicationRecords::new(kv.clone(), clock.clone()).seed()?;
    let schemes = SchemeRecords::new(kv.clone(), clock.clone()).seed()?;
    let audit = AuditLog::new(kv, clock).seed()?;

    if users || apps || schemes || audit {
        println!("✓ Demo data loaded into {}", storage.db_path().display());
    } else {
        println!("Store already seeded (use --force to reload the demo records)");
    }

    let stats = storage.stats()?;
    println!(
        "  {} collections, {}",
        stats.db.entry_count,
        StorageStats::format_size(stats.db.total_size_bytes)
    );

    Ok(())
}

fn cmd_analytics(config: &Config, selection: FilterAction, json: bool) -> Result<()> {
    let storage = open_storage(config)?;
    let kv = storage.kv();
    let clock: Arc<dyn Clock> = Arc::new(SystemClock);

    let aggregator = DatasetAggregator::new(
        ApplicationRecords::new(kv.clone(), clock.clone()),
        UserRecords::new(kv),
        clock.clone(),
    )?
    .with_active_window(config.analytics.active_user_window_days);

    let mut store = AnalyticsStore::new(aggregator, clock);
    store.dispatch(selection)?;

    if json {
        return print_json(store.snapshot());
    }

    let filters = store.filters();
    let snapshot = store.snapshot();
    let kpi = &snapshot.kpi_summary;

    let window = match (filters.date_preset, filters.date_from, filters.date_to) {
        (DatePreset::AllTime, _, _) => "all time".to_string(),
        (_, Some(from), Some(to)) => format!("{} .. {}", from, to),
        (preset, _, _) => preset.to_string(),
    };

    println!("Analytics ({})", window);
    println!("=========");
    println!("\nUsers: {} total, {} active", kpi.total_users, kpi.active_users);
    println!(
        "Applications: {} total, {} pending",
        kpi.total_applications, kpi.pending_applications
    );
    println!(
        "Approval rate: {}%  Rejection rate: {}%",
        kpi.approval_rate, kpi.rejection_rate
    );
    if let Some(top) = &kpi.most_applied_scheme {
        println!("Most applied: {} ({})", top.name, top.count);
    }
    println!("Avg processing: {} days", kpi.avg_processing_days);

    if !snapshot.application_trends.is_empty() {
        println!("\nMonthly trend:");
        for point in &snapshot.application_trends {
            println!(
                "  {:<8} {:>4} applied  {:>4} approved  {:>4} rejected",
                point.label, point.applications, point.approved, point.rejected
            );
        }
    }

    if !snapshot.status_distribution.is_empty() {
        println!("\nStatus:");
        for slice in &snapshot.status_distribution {
            println!("  {:<14} {}", slice.name, slice.value);
        }
    }

    if !snapshot.top_schemes.is_empty() {
        println!("\nSchemes:");
        for scheme in &snapshot.top_schemes {
            let avg = scheme
                .avg_processing_days
                .map(|d| format!("{}d", d))
                .unwrap_or_else(|| "-".to_string());
            println!(
                "  {:<40} {:>4}  {:>3}% approved  {:>3}% rejected  {}",
                scheme.name,
                scheme.total_applications,
                scheme.approval_rate,
                scheme.rejection_rate,
                avg
            );
        }
    }

    if !snapshot.state_distribution.is_empty() {
        println!("\nStates:");
        for row in &snapshot.state_distribution {
            println!(
                "  {:<20} {:>4} total  {:>4} approved  {:>4} rejected  {:>4} pending",
                row.state, row.total, row.approved, row.rejected, row.pending
            );
        }
    }

    let processing = &snapshot.processing_stats;
    println!(
        "\nProcessing ({} resolved): avg {}d, fastest {}d, slowest {}d",
        processing.count, processing.average, processing.fastest, processing.slowest
    );
    for bucket in &processing.distribution {
        println!("  {:<12} {}", bucket.range, bucket.count);
    }

    let drop_off = &snapshot.drop_off_stats;
    println!(
        "\nDrop-off: {} of {} registered users never applied ({}%)",
        drop_off.users_without_applications, drop_off.total_registered, drop_off.drop_off_rate
    );

    Ok(())
}

fn cmd_applications(config: &Config, action: ApplicationAction) -> Result<()> {
    let storage = open_storage(config)?;
    let kv = storage.kv();
    let clock: Arc<dyn Clock> = Arc::new(SystemClock);
    let apps = ApplicationRecords::new(kv.clone(), clock.clone());
    let users = UserRecords::new(kv.clone());
    let audit = AuditLog::new(kv, clock)
        .with_dedup_window(chrono::Duration::milliseconds(config.audit.dedup_window_ms));

    match action {
        ApplicationAction::List {
            status,
            page,
            limit,
            json,
        } => {
            let status = status
                .map(|s| s.parse::<ApplicationStatus>())
                .transpose()
                .map_err(|e| SarthiError::InvalidFilterValue {
                    key: FilterKey::Status.to_string(),
                    value: e,
                })?;

            let mut all = apps.all();
            if let Some(status) = status {
                all.retain(|a| a.status == status);
            }
            all.sort_by(|a, b| b.date_applied.cmp(&a.date_applied));

            let page = paginate(&all, page, page_limit(config, limit));
            if json {
                return print_json(&page);
            }

            println!("Applications ({} total)", page.total_items);
            for app in &page.items {
                println!(
                    "  {:<14} {:<14} {:<40} {}",
                    app.id,
                    app.status,
                    app.service_name,
                    app.date_applied.format("%Y-%m-%d")
                );
            }
            print_pager(&page);
        }
        ApplicationAction::Review { id, by } => {
            let admin = users.require(&by)?;
            rbac::require(admin.role, Action::ReviewApplication)?;

            let app = apps.move_to_review(&id, &by)?;
            audit.log(
                AuditAction::ApplicationReviewed,
                &admin.id,
                admin.role,
                &app.id,
                TargetType::Application,
                serde_json::json!({ "serviceName": app.service_name }),
            )?;
            println!("✓ {} is now {}", app.id, app.status);
        }
        ApplicationAction::Decide {
            id,
            status,
            remark,
            by,
        } => {
            let status: ApplicationStatus = status.parse().map_err(SarthiError::Workflow)?;
            let (permission, audit_action) = match status {
                ApplicationStatus::Rejected => {
                    (Action::RejectApplication, AuditAction::ApplicationRejected)
                }
                _ => (Action::ApproveApplication, AuditAction::ApplicationApproved),
            };

            let admin = users.require(&by)?;
            rbac::require(admin.role, permission)?;

            let app = apps.update_status(&id, status, &remark, &by)?;
            audit.log(
                audit_action,
                &admin.id,
                admin.role,
                &app.id,
                TargetType::Application,
                serde_json::json!({ "serviceName": app.service_name, "remark": remark }),
            )?;
            println!("✓ {} is now {}", app.id, app.status);
        }
    }

    Ok(())
}

fn parse_rules(raw: Option<String>) -> Result<Option<EligibilityRules>> {
    raw.map(|raw| {
        serde_json::from_str(&raw).map_err(|e| SarthiError::Json {
            source: e,
            context: "Failed to parse --rules".to_string(),
        })
    })
    .transpose()
}

fn cmd_schemes(config: &Config, action: SchemeAction) -> Result<()> {
    let storage = open_storage(config)?;
    let kv = storage.kv();
    let clock: Arc<dyn Clock> = Arc::new(SystemClock);
    let schemes = SchemeRecords::new(kv.clone(), clock.clone());
    let users = UserRecords::new(kv.clone());
    let audit = AuditLog::new(kv, clock)
        .with_dedup_window(chrono::Duration::milliseconds(config.audit.dedup_window_ms));

    match action {
        SchemeAction::List {
            all,
            category,
            state,
            search,
            page,
            limit,
            json,
        } => {
            let filter = SchemeFilter {
                category,
                state,
                status: (!all).then_some(SchemeStatus::Active),
            };
            let mut list = match search {
                Some(query) => schemes.search(&query),
                None => schemes.all(),
            };
            list.retain(|s| filter.matches(s));

            let page = paginate(&list, page, page_limit(config, limit));
            if json {
                return print_json(&page);
            }

            println!("Schemes ({} total)", page.total_items);
            for scheme in &page.items {
                println!(
                    "  {:<28} {:<40} {:<18} {:<14} {}",
                    scheme.id, scheme.name, scheme.category, scheme.state, scheme.status
                );
            }
            print_pager(&page);
        }
        SchemeAction::Add {
            name,
            id,
            description,
            category,
            state,
            rules,
            by,
        } => {
            let admin = users.require(&by)?;
            rbac::require(admin.role, Action::AddScheme)?;

            let scheme = schemes.add(SchemeDraft {
                id,
                name,
                description,
                category,
                state,
                rules: parse_rules(rules)?,
                ..SchemeDraft::default()
            })?;
            audit.log(
                AuditAction::SchemeCreated,
                &admin.id,
                admin.role,
                &scheme.id,
                TargetType::Scheme,
                serde_json::json!({ "name": scheme.name }),
            )?;
            println!("✓ Added {} ({})", scheme.name, scheme.id);
        }
        SchemeAction::Edit {
            id,
            name,
            description,
            category,
            state,
            rules,
            by,
        } => {
            let admin = users.require(&by)?;
            rbac::require(admin.role, Action::EditScheme)?;

            let changes = SchemeUpdate {
                name,
                description,
                category,
                state,
                rules: parse_rules(rules)?,
                ..SchemeUpdate::default()
            };
            if changes.is_empty() {
                println!("Nothing to change");
                return Ok(());
            }

            let scheme = schemes.update(&id, changes)?;
            audit.log(
                AuditAction::SchemeUpdated,
                &admin.id,
                admin.role,
                &scheme.id,
                TargetType::Scheme,
                serde_json::json!({ "name": scheme.name }),
            )?;
            println!("✓ Updated {}", scheme.id);
        }
        SchemeAction::Toggle { id, by } => {
            let admin = users.require(&by)?;
            rbac::require(admin.role, Action::EditScheme)?;

            let scheme = schemes.toggle_status(&id)?;
            audit.log(
                AuditAction::SchemeToggled,
                &admin.id,
                admin.role,
                &scheme.id,
                TargetType::Scheme,
                serde_json::json!({ "status": scheme.status.as_str() }),
            )?;
            println!("✓ {} is now {}", scheme.id, scheme.status);
        }
        SchemeAction::Delete { id, by } => {
            let admin = users.require(&by)?;
            rbac::require(admin.role, Action::DeleteScheme)?;

            let scheme = schemes.remove(&id)?;
            audit.log(
                AuditAction::SchemeDeleted,
                &admin.id,
                admin.role,
                &scheme.id,
                TargetType::Scheme,
                serde_json::json!({ "name": scheme.name }),
            )?;
            println!("✓ Deleted {}", scheme.id);
        }
    }

    Ok(())
}

fn cmd_eligibility(
    config: &Config,
    mut profile: Profile,
    user: Option<String>,
    scheme: Option<String>,
    json: bool,
) -> Result<()> {
    let storage = open_storage(config)?;
    let kv = storage.kv();
    let schemes = SchemeRecords::new(kv.clone(), Arc::new(SystemClock));

    if let Some(user) = user {
        let user = UserRecords::new(kv).require(&user)?;
        if profile.state.is_none() {
            profile.state = user.state;
        }
    }

    let candidates = match scheme {
        Some(id) => vec![schemes.require(&id)?],
        None => schemes.active(),
    };
    let results = eligibility::rank(&profile, &candidates);
    if json {
        return print_json(&results);
    }

    println!("Eligibility ({} schemes)", results.len());
    for result in &results {
        println!(
            "  {:>3}  {:<18} {:<40} {}",
            result.score, result.status, result.name, result.scheme_id
        );
        if !result.failed.is_empty() {
            let failed: Vec<&str> = result.failed.iter().map(|c| c.as_str()).collect();
            println!("       failed: {}", failed.join(", "));
        }
        if !result.missing.is_empty() {
            let missing: Vec<&str> = result.missing.iter().map(|c| c.as_str()).collect();
            println!("       missing: {}", missing.join(", "));
        }
    }

    Ok(())
}

fn cmd_audit(config: &Config, action: AuditCommand) -> Result<()> {
    let storage = open_storage(config)?;
    let clock: Arc<dyn Clock> = Arc::new(SystemClock);
    let audit = AuditLog::new(storage.kv(), clock)
        .with_dedup_window(chrono::Duration::milliseconds(config.audit.dedup_window_ms));

    match action {
        AuditCommand::List {
            role,
            action,
            page,
            limit,
            json,
        } => {
            let role: Role = role.parse().map_err(SarthiError::Config)?;
            rbac::require(role, Action::ViewAuditLogs)?;
            let action = action
                .map(|a| a.parse::<AuditAction>())
                .transpose()
                .map_err(SarthiError::Config)?;

            let entries = audit.logs_for(role, action);
            let page = paginate(&entries, page, page_limit(config, limit));
            if json {
                return print_json(&page);
            }

            println!("Audit log ({} entries)", page.total_items);
            for entry in &page.items {
                println!(
                    "  {}  {:<24} {:<16} {:<14} {} {}",
                    entry.timestamp.format("%Y-%m-%d %H:%M:%S"),
                    entry.action_type,
                    entry.performed_by,
                    entry.performer_role.label(),
                    entry.target_type,
                    entry.target_id
                );
            }
            print_pager(&page);
        }
        AuditCommand::Log {
            action,
            by,
            role,
            target,
            target_type,
            metadata,
        } => {
            let role: Role = role.parse().map_err(SarthiError::Config)?;
            if !role.is_admin() {
                return Err(SarthiError::PermissionDenied {
                    role: role.to_string(),
                    action: "record audit entries".to_string(),
                });
            }
            let action: AuditAction = action.parse().map_err(SarthiError::Config)?;
            let target_type: TargetType = target_type.parse().map_err(SarthiError::Config)?;
            let metadata = match metadata {
                Some(raw) => serde_json::from_str(&raw).map_err(|e| SarthiError::Json {
                    source: e,
                    context: "Failed to parse --metadata".to_string(),
                })?,
                None => serde_json::json!({}),
            };

            let result = audit.log(action, &by, role, &target, target_type, metadata)?;
            match (&result.entry, &result.error) {
                (Some(entry), _) => println!("✓ Recorded {}", entry.id),
                (None, Some(error)) => println!("Skipped: {}", error),
                (None, None) => {}
            }
        }
    }

    Ok(())
}

fn print_pager<T>(page: &Page<T>) {
    if page.total_pages > 1 {
        println!(
            "\nPage {} of {}: {}",
            page.page,
            page.total_pages,
            render_pager(page)
        );
    }
}

fn cmd_config(config_path: Option<PathBuf>, action: ConfigAction) -> Result<()> {
    match action {
        ConfigAction::Show => {
            let config = load_config(config_path)?;
            let content = toml::to_string_pretty(&config)?;
            println!("{}", content);
        }
        ConfigAction::Validate { file } => {
            let path = match file.or(config_path) {
                Some(path) => path,
                None => Config::default_path()?,
            };
            let config = Config::load(&path)?;
            println!("✓ Configuration is valid");
            println!("  Schema version: {}", config.meta.schema_version);
        }
        ConfigAction::Init { force } => {
            let path = match config_path {
                Some(path) => path,
                None => Config::default_path()?,
            };

            if path.exists() && !force {
                println!("Configuration file already exists at: {}", path.display());
                println!("Use --force to overwrite");
                return Ok(());
            }

            Config::default().save(&path)?;
            println!("✓ Configuration initialized at: {}", path.display());
        }
    }

    Ok(())
}

fn load_config(config_path: Option<PathBuf>) -> Result<Config> {
    let path = match config_path {
        Some(path) => path,
        None => Config::default_path()?,
    };
    Config::load_or_default(&path)
}

fn expand_path(path: &Path) -> Result<PathBuf> {
    let path_str = path
        .to_str()
        .ok_or_else(|| SarthiError::Config("Invalid path encoding".to_string()))?;

    if let Some(stripped) = path_str.strip_prefix("~/") {
        let home = dirs::home_dir()
            .ok_or_else(|| SarthiError::Config("Cannot determine home directory".to_string()))?;
        Ok(home.join(stripped))
    } else {
        Ok(path.to_path_buf())
    }
}
