use clap::{Parser, Subcommand};
use masjid_backend::config::Config;
use masjid_backend::helper::form_helpers::{is_valid_email, MIN_PASSWORD_LEN};
use masjid_backend::models::db_operations::{inbox_db_operations, users_db_operations};
use masjid_backend::setup::db_setup;
use redb::Database;
use rusqlite::Connection;
use std::fs;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "setup_cli", author, version, about = "Sets up the masjid databases and administrator accounts.", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Path to the .env configuration file.
    #[arg(long, required = true, value_name = "FILE")]
    env_file: PathBuf,
}

#[derive(Subcommand, Debug)]
enum Commands {
    Db {
        #[command(subcommand)]
        action: DbAction,
    },
    Admin {
        #[command(subcommand)]
        action: AdminAction,
    },
    Inbox {
        #[command(subcommand)]
        action: InboxAction,
    },
}

#[derive(Subcommand, Debug)]
enum DbAction {
    /// Creates the content database (seeded with the built-in catalog) and the inbox.
    Setup {
        /// `content` or `inbox`; both when omitted.
        db_type: Option<String>,
    },
}

#[derive(Subcommand, Debug)]
enum AdminAction {
    Create {
        #[arg(long)]
        email: String,
        #[arg(long)]
        password: String,
    },
    /// Gives an existing account administrator rights.
    Grant {
        #[arg(long)]
        email: String,
    },
    Revoke {
        #[arg(long)]
        email: String,
    },
    List,
    ChangePassword {
        #[arg(long)]
        email: String,
        #[arg(long)]
        new_password: String,
    },
}

#[derive(Subcommand, Debug)]
enum InboxAction {
    /// Prints every newsletter subscriber.
    Subscribers,
    /// Prints the latest contact messages.
    Messages {
        #[arg(long, default_value_t = 20)]
        limit: usize,
    },
}

fn main() {
    let cli = Cli::parse();

    let config = match Config::from_env(&cli.env_file) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("❌ {}", e);
            std::process::exit(1);
        }
    };

    match &cli.command {
        Commands::Db { action } => match action {
            DbAction::Setup { db_type } => match db_type.as_deref() {
                Some("content") => setup_content_database(&config),
                Some("inbox") => setup_inbox_database(&config),
                Some(other) => eprintln!("❌ Error: Unknown database type '{}'. Use 'content' or 'inbox'.", other),
                None => {
                    setup_content_database(&config);
                    setup_inbox_database(&config);
                }
            },
        },
        Commands::Admin { action } => match action {
            AdminAction::Create { email, password } => create_admin(&config, email, password),
            AdminAction::Grant { email } => set_admin_flag(&config, email, true),
            AdminAction::Revoke { email } => set_admin_flag(&config, email, false),
            AdminAction::List => list_admins(&config),
            AdminAction::ChangePassword { email, new_password } => change_password(&config, email, new_password),
        },
        Commands::Inbox { action } => match action {
            InboxAction::Subscribers => list_subscribers(&config),
            InboxAction::Messages { limit } => list_messages(&config, *limit),
        },
    }
}

fn setup_content_database(config: &Config) {
    let db_path = config.content_db_path();
    if db_path.exists() {
        println!("ℹ️ Content database already exists at '{}'. Skipping creation.", db_path.display());
        return;
    }
    println!("\nSetting up content database at '{}'...", db_path.display());

    if let Some(parent_dir) = db_path.parent() {
        if let Err(e) = fs::create_dir_all(parent_dir) {
            eprintln!("❌ Could not create database directory: {}", e);
            return;
        }
    }

    let mut conn = match Connection::open(&db_path) {
        Ok(conn) => conn,
        Err(e) => {
            eprintln!("❌ Could not create content database file: {}", e);
            return;
        }
    };
    if let Err(e) = db_setup::create_content_tables(&mut conn) {
        eprintln!("❌ Error creating content tables: {}", e);
        return;
    }
    match db_setup::seed_catalog_defaults(&conn) {
        Ok(count) => println!("✅ Content database ready. Seeded {} default records.", count),
        Err(e) => eprintln!("❌ Tables created but seeding failed: {}", e),
    }
}

fn setup_inbox_database(config: &Config) {
    let db_path = config.inbox_db_path();
    if db_path.exists() {
        println!("ℹ️ Inbox database already exists at '{}'. Skipping creation.", db_path.display());
        return;
    }
    println!("\nSetting up inbox database at '{}'...", db_path.display());

    if let Some(parent_dir) = db_path.parent() {
        if let Err(e) = fs::create_dir_all(parent_dir) {
            eprintln!("❌ Could not create database directory: {}", e);
            return;
        }
    }

    let db = match Database::create(&db_path) {
        Ok(db) => db,
        Err(e) => {
            eprintln!("❌ Failed to create inbox database file: {}", e);
            return;
        }
    };
    match db_setup::setup_inbox_db(&db) {
        Ok(_) => println!("✅ Inbox database setup completed successfully."),
        Err(e) => eprintln!("❌ Error setting up inbox database: {}", e),
    }
}

fn open_content_db(config: &Config) -> Option<Connection> {
    let db_path = config.content_db_path();
    if !db_path.exists() {
        eprintln!("❌ Error: Content database not found at '{}'. Please run `setup_cli db setup` first.", db_path.display());
        return None;
    }
    match Connection::open(&db_path) {
        Ok(conn) => Some(conn),
        Err(e) => {
            eprintln!("❌ Could not open content database: {}", e);
            None
        }
    }
}

fn open_inbox_db(config: &Config) -> Option<Database> {
    let db_path = config.inbox_db_path();
    if !db_path.exists() {
        eprintln!("❌ Error: Inbox database not found at '{}'. Please run `setup_cli db setup inbox` first.", db_path.display());
        return None;
    }
    match Database::open(&db_path) {
        Ok(db) => Some(db),
        Err(e) => {
            eprintln!("❌ Could not open inbox database: {}", e);
            None
        }
    }
}

fn create_admin(config: &Config, email: &str, password: &str) {
    if !is_valid_email(email) {
        eprintln!("❌ Error: '{}' is not a valid email address.", email);
        return;
    }
    if password.chars().count() < MIN_PASSWORD_LEN {
        eprintln!("❌ Error: Password must be at least {} characters.", MIN_PASSWORD_LEN);
        return;
    }
    let Some(conn) = open_content_db(config) else { return };

    match users_db_operations::email_exists(&conn, email) {
        Ok(true) => {
            eprintln!("❌ Error: An account for '{}' already exists. Use `admin grant` instead.", email);
            return;
        }
        Ok(false) => {}
        Err(e) => {
            eprintln!("❌ Error checking existing accounts: {}", e);
            return;
        }
    }

    match users_db_operations::create_user(&conn, email, password, true) {
        Ok(operator) => println!("✅ Administrator '{}' created successfully.", operator.email),
        Err(e) => eprintln!("❌ Error creating administrator: {}", e),
    }
}

fn set_admin_flag(config: &Config, email: &str, is_admin: bool) {
    let Some(conn) = open_content_db(config) else { return };
    match users_db_operations::set_admin(&conn, email, is_admin) {
        Ok(0) => eprintln!("❌ Error: No account with email '{}' found.", email),
        Ok(_) if is_admin => println!("✅ '{}' is now an administrator.", email),
        Ok(_) => println!("✅ Administrator rights removed from '{}'.", email),
        Err(e) => eprintln!("❌ Error updating account: {}", e),
    }
}

fn list_admins(config: &Config) {
    let Some(conn) = open_content_db(config) else { return };
    match users_db_operations::read_admins(&conn) {
        Ok(admins) if admins.is_empty() => println!("No administrators yet."),
        Ok(admins) => {
            println!("Listing Administrators:");
            for admin in admins {
                println!("- {}", admin.email);
            }
        }
        Err(e) => eprintln!("❌ Error fetching administrators: {}", e),
    }
}

fn change_password(config: &Config, email: &str, new_password: &str) {
    if new_password.chars().count() < MIN_PASSWORD_LEN {
        eprintln!("❌ Error: Password must be at least {} characters.", MIN_PASSWORD_LEN);
        return;
    }
    let Some(conn) = open_content_db(config) else { return };
    match users_db_operations::update_password(&conn, email, new_password) {
        Ok(0) => eprintln!("❌ Error: No account with email '{}' found.", email),
        Ok(_) => println!("✅ Password for '{}' changed successfully.", email),
        Err(e) => eprintln!("❌ Error updating password: {}", e),
    }
}

fn list_subscribers(config: &Config) {
    let Some(db) = open_inbox_db(config) else { return };
    match inbox_db_operations::read_subscribers(&db) {
        Ok(subscribers) => {
            println!("{} subscriber(s):", subscribers.len());
            for s in subscribers {
                println!("- {} (since {})", s.email, s.subscribed_at.format("%Y-%m-%d"));
            }
        }
        Err(e) => eprintln!("❌ Error reading subscribers: {}", e),
    }
}

fn list_messages(config: &Config, limit: usize) {
    let Some(db) = open_inbox_db(config) else { return };
    match inbox_db_operations::read_latest_messages(&db, limit) {
        Ok(messages) => {
            for m in messages {
                println!("[{}] {} <{}>: {}", m.received_at.format("%Y-%m-%d %H:%M"), m.name, m.email, m.subject);
                println!("    {}", m.message);
            }
        }
        Err(e) => eprintln!("❌ Error reading messages: {}", e),
    }
}
