use clap::{Parser, Subcommand};
use user_records::{
    config::ServerConfig,
    db,
    models::{CreateUserPayload, DeleteUserPayload, UpdateUserPayload},
    repositories::SqliteUserRepository,
    services::UserService,
};
use std::sync::Arc;

#[derive(Parser)]
#[command(name = "user-records-cli")]
#[command(about = "CLI tool for managing user records", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// User management commands
    User {
        #[command(subcommand)]
        command: UserCommands,
    },
}

#[derive(Subcommand)]
enum UserCommands {
    /// Create a new user
    Create {
        /// Full name
        #[arg(short = 'n', long)]
        full_name: String,

        /// Email address
        #[arg(short, long)]
        email: String,

        /// Password (will prompt if not provided)
        #[arg(short, long)]
        password: Option<String>,
    },

    /// List all users
    List,

    /// Show a single user
    Show {
        /// Email address of the user
        #[arg(short, long)]
        email: String,
    },

    /// Delete a user
    Delete {
        /// Email address of the user to delete
        #[arg(short, long)]
        email: String,
    },

    /// Change a user's full name and/or password
    Edit {
        /// Email address of the user
        #[arg(short, long)]
        email: String,

        /// New full name
        #[arg(short = 'n', long)]
        full_name: Option<String>,

        /// New password
        #[arg(short, long)]
        password: Option<String>,
    },
}

fn get_password(prompt: &str) -> Result<String, Box<dyn std::error::Error>> {
    use std::io::{self, Write};
    print!("{}: ", prompt);
    io::stdout().flush()?;

    Ok(rpassword::read_password()?)
}

fn confirm_password(prompt: &str) -> Result<String, Box<dyn std::error::Error>> {
    let password = get_password(prompt)?;
    let confirm = get_password("Confirm password")?;
    if password != confirm {
        eprintln!("❌ Passwords do not match");
        std::process::exit(1);
    }
    Ok(password)
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Load environment variables
    dotenvy::dotenv().ok();

    // Parse CLI arguments
    let cli = Cli::parse();

    // Connect to database
    let config = ServerConfig::from_env()?;
    let pool = db::create_pool(&config).await?;
    db::run_migrations(&pool).await?;

    let user_repository = Arc::new(SqliteUserRepository::new(pool));
    let user_service = UserService::new(user_repository);

    match cli.command {
        Commands::User { command } => match command {
            UserCommands::Create {
                full_name,
                email,
                password,
            } => {
                let password = match password {
                    Some(pw) => pw,
                    None => confirm_password("Password")?,
                };

                let request = CreateUserPayload {
                    full_name: Some(full_name),
                    email: Some(email),
                    password: Some(password),
                };

                match user_service.create_user(request).await {
                    Ok(user) => {
                        println!("✅ User created successfully!");
                        println!("  Name: {}", user.full_name);
                        println!("  Email: {}", user.email);
                    }
                    Err(err) => {
                        eprintln!("❌ Failed to create user: {}", err);
                        std::process::exit(1);
                    }
                }
            }

            UserCommands::List => match user_service.list_users().await {
                Ok(users) => {
                    if users.is_empty() {
                        println!("No users found.");
                    } else {
                        println!("{:<30} {:<40}", "Name", "Email");
                        println!("{}", "-".repeat(70));
                        for user in users {
                            println!("{:<30} {:<40}", user.full_name, user.email);
                        }
                    }
                }
                Err(err) => {
                    eprintln!("❌ Failed to list users: {}", err);
                    std::process::exit(1);
                }
            },

            UserCommands::Show { email } => match user_service.find_user_by_email(&email).await {
                Ok(Some(user)) => {
                    let format_time = |time: Option<chrono::NaiveDateTime>| {
                        time.map(|t| t.to_string())
                            .unwrap_or_else(|| "N/A".to_string())
                    };
                    println!("  Name: {}", user.full_name);
                    println!("  Email: {}", user.email);
                    println!("  Created: {}", format_time(user.created_at));
                    println!("  Updated: {}", format_time(user.updated_at));
                }
                Ok(None) => {
                    eprintln!("❌ User '{}' not found", email);
                    std::process::exit(1);
                }
                Err(err) => {
                    eprintln!("❌ Failed to find user: {}", err);
                    std::process::exit(1);
                }
            },

            UserCommands::Delete { email } => {
                let request = DeleteUserPayload {
                    email: Some(email.clone()),
                };
                match user_service.delete_user(request).await {
                    Ok(()) => {
                        println!("✅ User '{}' deleted successfully!", email);
                    }
                    Err(err) => {
                        eprintln!("❌ Failed to delete user: {}", err);
                        std::process::exit(1);
                    }
                }
            }

            UserCommands::Edit {
                email,
                full_name,
                password,
            } => {
                let request = UpdateUserPayload {
                    email: Some(email.clone()),
                    full_name,
                    password,
                };
                match user_service.update_user(request).await {
                    Ok(()) => {
                        println!("✅ User '{}' updated successfully!", email);
                    }
                    Err(err) => {
                        eprintln!("❌ Failed to update user: {}", err);
                        std::process::exit(1);
                    }
                }
            }
        },
    }

    Ok(())
}
