//! CLI administration tool for cv-builder.
//!
//! Manages accounts, inspects usage and performs database maintenance
//! without going through the web UI.
//!
//! # Usage
//!
//! ```bash
//! # Create an account (prompts for anything not given)
//! cargo run --bin admin -- user create --email ada@example.com --name "Ada Lovelace"
//!
//! # List accounts
//! cargo run --bin admin -- user list
//!
//! # Lock an account out
//! cargo run --bin admin -- user deactivate ada@example.com
//!
//! # Print the template catalog
//! cargo run --bin admin -- templates
//!
//! # Usage statistics
//! cargo run --bin admin -- stats
//!
//! # Remove expired sessions
//! cargo run --bin admin -- sessions purge
//!
//! # Permanently remove a CV and its sections (refused once it has downloads)
//! cargo run --bin admin -- cv purge 3f0c...
//! ```
//!
//! # Environment Variables
//!
//! - `DATABASE_URL` (required): PostgreSQL connection string
//! - `REDIS_URL` (optional): evicts the cached preview of a purged CV

use cv_builder::application::services::auth_service::hash_password;
use cv_builder::domain::entities::user::normalize_email;
use cv_builder::domain::entities::NewUser;
use cv_builder::domain::repositories::{DownloadLogRepository, SessionRepository, UserRepository};
use cv_builder::domain::templates::{FONT_PAIRS, TEMPLATES};
use cv_builder::infrastructure::cache::{CacheService, RedisCache, preview_key};
use cv_builder::infrastructure::persistence::{
    PgDownloadLogRepository, PgSessionRepository, PgUserRepository,
};

use anyhow::{Context, Result, bail};
use clap::{Parser, Subcommand};
use colored::*;
use dialoguer::{Confirm, Input, Password};
use sqlx::PgPool;
use std::sync::Arc;
use uuid::Uuid;
use validator::ValidateEmail;

const MIN_PASSWORD_LENGTH: usize = 8;

/// CLI tool for managing cv-builder.
#[derive(Parser)]
#[command(name = "admin")]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Manage user accounts
    User {
        #[command(subcommand)]
        action: UserAction,
    },

    /// Print the template and font catalog
    Templates,

    /// Show usage statistics
    Stats,

    /// Session maintenance
    Sessions {
        #[command(subcommand)]
        action: SessionAction,
    },

    /// CV maintenance
    Cv {
        #[command(subcommand)]
        action: CvAction,
    },

    /// Database operations
    Db {
        #[command(subcommand)]
        action: DbAction,
    },
}

#[derive(Subcommand)]
enum UserAction {
    /// Create a password account
    Create {
        #[arg(short, long)]
        email: Option<String>,

        /// Display name
        #[arg(short, long)]
        name: Option<String>,

        /// Skip confirmation prompt
        #[arg(short = 'y', long)]
        yes: bool,
    },

    /// List all accounts
    List,

    /// Block an account from logging in
    Deactivate { email: String },

    /// Re-enable a deactivated account
    Activate { email: String },
}

#[derive(Subcommand)]
enum SessionAction {
    /// Delete expired sessions
    Purge,
}

#[derive(Subcommand)]
enum CvAction {
    /// Permanently delete a CV and its sections
    Purge {
        id: Uuid,

        /// Skip confirmation prompt
        #[arg(short = 'y', long)]
        yes: bool,
    },
}

#[derive(Subcommand)]
enum DbAction {
    /// Check database connection
    Check,

    /// Show database info
    Info,
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    if let Commands::Templates = cli.command {
        print_templates();
        return Ok(());
    }

    let database_url = std::env::var("DATABASE_URL").context("DATABASE_URL must be set")?;

    let pool = PgPool::connect(&database_url)
        .await
        .context("Failed to connect to database")?;

    match cli.command {
        Commands::User { action } => handle_user_action(action, &pool).await?,
        Commands::Templates => print_templates(),
        Commands::Stats => handle_stats(&pool).await?,
        Commands::Sessions { action } => handle_session_action(action, &pool).await?,
        Commands::Cv { action } => handle_cv_action(action, &pool).await?,
        Commands::Db { action } => handle_db_action(action, &pool).await?,
    }

    Ok(())
}

async fn handle_user_action(action: UserAction, pool: &PgPool) -> Result<()> {
    let repo = PgUserRepository::new(Arc::new(pool.clone()));

    match action {
        UserAction::Create { email, name, yes } => create_user(&repo, email, name, yes).await?,
        UserAction::List => list_users(&repo).await?,
        UserAction::Deactivate { email } => set_active(&repo, &email, false).await?,
        UserAction::Activate { email } => set_active(&repo, &email, true).await?,
    }

    Ok(())
}

/// Creates a password account, prompting for missing fields.
///
/// The password is always read interactively so it never lands in shell history.
async fn create_user(
    repo: &PgUserRepository,
    email: Option<String>,
    name: Option<String>,
    skip_confirm: bool,
) -> Result<()> {
    println!("{}", "👤 Create User".bright_blue().bold());
    println!();

    let email = match email {
        Some(e) => e,
        None => Input::new().with_prompt("Email").interact_text()?,
    };
    let email = normalize_email(&email);
    if !email.validate_email() {
        bail!("Invalid email address: {email}");
    }
    if repo
        .find_by_email(&email)
        .await
        .map_err(|e| anyhow::anyhow!("Database error: {}", e))?
        .is_some()
    {
        bail!("Email already registered: {email}");
    }

    let name = match name {
        Some(n) => n,
        None => Input::new().with_prompt("Display name").interact_text()?,
    };
    let name_len = name.trim().chars().count();
    if !(2..=100).contains(&name_len) {
        bail!("Name must be 2-100 characters");
    }

    let password = Password::new()
        .with_prompt("Password")
        .with_confirmation("Confirm password", "Passwords must match")
        .interact()?;
    if password.chars().count() < MIN_PASSWORD_LENGTH {
        bail!("Password must be at least {MIN_PASSWORD_LENGTH} characters");
    }

    println!();
    println!("  Email: {}", email.cyan());
    println!("  Name:  {}", name.trim().cyan());
    println!();

    if !skip_confirm {
        let confirmed = Confirm::new()
            .with_prompt("Create this user?")
            .default(true)
            .interact()?;

        if !confirmed {
            println!("{}", "❌ Cancelled".red());
            return Ok(());
        }
    }

    let password_hash =
        hash_password(&password).map_err(|e| anyhow::anyhow!("Failed to hash password: {}", e))?;

    let user = repo
        .create(NewUser {
            email,
            display_name: Some(name.trim().to_string()),
            password_hash: Some(password_hash),
            google_id: None,
            photo_url: None,
        })
        .await
        .map_err(|e| anyhow::anyhow!("Failed to create user: {}", e))?;

    println!();
    println!("{}", "✅ User created successfully!".green().bold());
    println!("  ID: {}", user.id.to_string().bright_black());
    println!();

    Ok(())
}

async fn list_users(repo: &PgUserRepository) -> Result<()> {
    println!("{}", "📋 Users".bright_blue().bold());
    println!();

    let users = repo
        .list()
        .await
        .map_err(|e| anyhow::anyhow!("Failed to list users: {}", e))?;

    if users.is_empty() {
        println!("{}", "  No users found".yellow());
        println!();
        println!(
            "  Create one with: {} admin user create",
            "cargo run --bin".bright_cyan()
        );
        return Ok(());
    }

    println!(
        "  {:<32} {:<24} {:<17} {:<17} {:<8}",
        "Email".bright_white().bold(),
        "Name".bright_white().bold(),
        "Created".bright_white().bold(),
        "Last login".bright_white().bold(),
        "Status".bright_white().bold()
    );
    println!("  {}", "─".repeat(104).bright_black());

    for user in &users {
        let status = if user.is_active {
            "ACTIVE".green()
        } else {
            "INACTIVE".red()
        };
        let last_login = user
            .last_login
            .map(|t| t.format("%Y-%m-%d %H:%M").to_string())
            .unwrap_or_else(|| "never".to_string());

        println!(
            "  {:<32} {:<24} {:<17} {:<17} {}",
            user.email.cyan(),
            user.label(),
            user.created_at
                .format("%Y-%m-%d %H:%M")
                .to_string()
                .bright_black(),
            last_login.bright_black(),
            status
        );
    }

    println!();
    println!("  Total: {}", users.len().to_string().bright_white().bold());
    println!();

    Ok(())
}

async fn set_active(repo: &PgUserRepository, email: &str, active: bool) -> Result<()> {
    let email = normalize_email(email);
    let verb = if active { "activated" } else { "deactivated" };

    let updated = repo
        .set_active(&email, active)
        .await
        .map_err(|e| anyhow::anyhow!("Database error: {}", e))?;

    if !updated {
        bail!("User not found: {email}");
    }

    println!("{}", format!("✅ {email} {verb}").green().bold());
    Ok(())
}

fn print_templates() {
    println!("{}", "🎨 Templates".bright_blue().bold());
    println!();

    let mut templates: Vec<_> = TEMPLATES.iter().collect();
    templates.sort_by_key(|t| t.sort_order);

    for t in templates {
        let badge = if t.is_ats_friendly {
            "ATS".green()
        } else {
            "PRO".magenta()
        };
        println!(
            "  {:<4} {:<16} {:<24} {}",
            badge,
            t.slug.cyan(),
            t.name,
            t.description.bright_black()
        );
    }

    println!();
    println!("{}", "🔤 Font pairs".bright_blue().bold());
    println!();
    for pair in FONT_PAIRS {
        println!(
            "  {:<20} {} / {}",
            pair.slug.cyan(),
            pair.heading,
            pair.body
        );
    }
    println!();
}

async fn handle_stats(pool: &PgPool) -> Result<()> {
    println!("{}", "📊 Statistics".bright_blue().bold());
    println!();

    let users: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM users")
        .fetch_one(pool)
        .await?;

    let (cvs, active_cvs): (i64, i64) =
        sqlx::query_as("SELECT COUNT(*), COUNT(*) FILTER (WHERE NOT is_deleted) FROM cvs")
            .fetch_one(pool)
            .await?;

    let sections: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM cv_sections")
        .fetch_one(pool)
        .await?;

    let downloads = PgDownloadLogRepository::new(Arc::new(pool.clone()))
        .count_all()
        .await
        .map_err(|e| anyhow::anyhow!("Failed to count downloads: {}", e))?;

    println!("  Users:      {}", users.to_string().bright_green().bold());
    println!("  CVs:        {}", cvs.to_string().bright_green().bold());
    println!("  Active CVs: {}", active_cvs.to_string().bright_green().bold());
    println!("  Sections:   {}", sections.to_string().bright_green().bold());
    println!("  Downloads:  {}", downloads.to_string().bright_green().bold());
    println!();

    Ok(())
}

async fn handle_session_action(action: SessionAction, pool: &PgPool) -> Result<()> {
    match action {
        SessionAction::Purge => {
            let repo = PgSessionRepository::new(Arc::new(pool.clone()));
            let removed = repo
                .purge_expired()
                .await
                .map_err(|e| anyhow::anyhow!("Failed to purge sessions: {}", e))?;

            println!(
                "{} {}",
                "✅ Expired sessions removed:".green().bold(),
                removed.to_string().bright_white().bold()
            );
        }
    }

    Ok(())
}

/// Hard delete. Sections cascade; a CV with download history is refused so the
/// audit trail stays intact.
async fn handle_cv_action(action: CvAction, pool: &PgPool) -> Result<()> {
    match action {
        CvAction::Purge { id, yes } => {
            let title: Option<String> = sqlx::query_scalar("SELECT title FROM cvs WHERE id = $1")
                .bind(id)
                .fetch_optional(pool)
                .await?;

            let title = title.context("CV not found")?;

            println!("  CV: {} ({})", title.cyan(), id.to_string().bright_black());
            println!();

            let downloads = PgDownloadLogRepository::new(Arc::new(pool.clone()))
                .count_for_cv(id)
                .await
                .map_err(|e| anyhow::anyhow!("Failed to count downloads: {}", e))?;

            if downloads > 0 {
                bail!(
                    "CV has {} logged download(s); download history is kept, soft-delete it instead",
                    downloads
                );
            }

            if !yes {
                let confirmed = Confirm::new()
                    .with_prompt("Permanently delete this CV?")
                    .default(false)
                    .interact()?;

                if !confirmed {
                    println!("{}", "❌ Cancelled".red());
                    return Ok(());
                }
            }

            sqlx::query("DELETE FROM cvs WHERE id = $1")
                .bind(id)
                .execute(pool)
                .await?;

            evict_preview(id).await;

            println!("{}", "✅ CV deleted".green().bold());
        }
    }

    Ok(())
}

/// Drops the cached preview when `REDIS_URL` points at the app's cache.
async fn evict_preview(cv_id: Uuid) {
    let Ok(redis_url) = std::env::var("REDIS_URL") else {
        return;
    };

    let result = match RedisCache::connect(&redis_url, 0).await {
        Ok(cache) => cache.invalidate(&preview_key(cv_id)).await,
        Err(e) => Err(e),
    };

    if let Err(e) = result {
        println!(
            "{} {}",
            "⚠️  Cached preview not evicted:".yellow(),
            e.to_string().bright_black()
        );
    }
}

async fn handle_db_action(action: DbAction, pool: &PgPool) -> Result<()> {
    match action {
        DbAction::Check => {
            println!("{}", "🔍 Checking database connection...".bright_blue());

            sqlx::query("SELECT 1").fetch_one(pool).await?;

            println!("{}", "✅ Database connection OK".green().bold());
        }
        DbAction::Info => {
            println!("{}", "ℹ️  Database Information".bright_blue().bold());
            println!();

            let version: String = sqlx::query_scalar("SELECT version()")
                .fetch_one(pool)
                .await?;

            let migrations: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM _sqlx_migrations")
                .fetch_one(pool)
                .await
                .unwrap_or(0);

            println!("  PostgreSQL: {}", version.bright_white());
            println!("  Migrations: {}", migrations.to_string().bright_white());
            println!();
        }
    }

    Ok(())
}
