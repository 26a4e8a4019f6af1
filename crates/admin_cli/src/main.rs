use std::{error::Error, io::Write};

use clap::{Args, Parser, Subcommand};
use crossterm::{
    cursor,
    event::{self, Event, KeyCode, KeyEvent, KeyModifiers},
    execute,
    style::Print,
    terminal,
    terminal::ClearType,
};
use engine::{Engine, NewUser, users};
use migration::MigratorTrait;
use sea_orm::{ColumnTrait, Database, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder};

#[derive(Parser, Debug)]
#[command(name = "splitbook_admin")]
#[command(about = "Admin utilities for Splitbook (bootstrap users and friendships)")]
struct Cli {
    /// Database connection string (also read from `DATABASE_URL`).
    #[arg(
        long,
        env = "DATABASE_URL",
        default_value = "sqlite:./splitbook.db?mode=rwc"
    )]
    database_url: String,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    User(User),
    Friend(Friend),
}

#[derive(Args, Debug)]
struct User {
    #[command(subcommand)]
    command: UserCommand,
}

#[derive(Subcommand, Debug)]
enum UserCommand {
    Create(UserCreateArgs),
    List,
}

#[derive(Args, Debug)]
struct UserCreateArgs {
    #[arg(long)]
    name: String,
    #[arg(long)]
    email: String,
    #[arg(long)]
    avatar: Option<String>,
}

#[derive(Args, Debug)]
struct Friend {
    #[command(subcommand)]
    command: FriendCommand,
}

#[derive(Subcommand, Debug)]
enum FriendCommand {
    /// Make two users friends without going through a request.
    Link(FriendLinkArgs),
}

#[derive(Args, Debug)]
struct FriendLinkArgs {
    #[arg(long)]
    email: String,
    #[arg(long)]
    with: String,
}

struct RawModeGuard;

impl RawModeGuard {
    fn enter() -> Result<Self, Box<dyn Error + Send + Sync>> {
        terminal::enable_raw_mode()?;
        Ok(Self)
    }
}

impl Drop for RawModeGuard {
    fn drop(&mut self) {
        let _ = terminal::disable_raw_mode();
    }
}

fn prompt_password(prompt: &str) -> Result<String, Box<dyn Error + Send + Sync>> {
    let _raw = RawModeGuard::enter()?;

    let mut out = std::io::stderr();
    execute!(
        out,
        cursor::MoveToColumn(0),
        terminal::Clear(ClearType::CurrentLine),
        Print(prompt)
    )?;
    out.flush()?;

    let mut buf = String::new();
    loop {
        let Event::Key(KeyEvent {
            code, modifiers, ..
        }) = event::read()?
        else {
            continue;
        };

        match code {
            KeyCode::Enter => {
                execute!(out, Print("\r\n"))?;
                out.flush()?;
                break;
            }
            KeyCode::Backspace => {
                if buf.pop().is_some() {
                    execute!(out, cursor::MoveLeft(1), Print(" "), cursor::MoveLeft(1))?;
                    out.flush()?;
                }
            }
            KeyCode::Char('c') if modifiers.contains(KeyModifiers::CONTROL) => {
                execute!(out, Print("\r\n"))?;
                out.flush()?;
                return Err("interrupted".into());
            }
            KeyCode::Char(ch) if !modifiers.contains(KeyModifiers::CONTROL) => {
                buf.push(ch);
                execute!(out, Print("*"))?;
                out.flush()?;
            }
            _ => {}
        }
    }

    Ok(buf)
}

fn prompt_password_twice() -> Result<String, Box<dyn Error + Send + Sync>> {
    let mut out = std::io::stderr();
    for _ in 0..3 {
        let p1 = prompt_password("Password: ")?;
        if p1.is_empty() {
            execute!(
                out,
                cursor::MoveToColumn(0),
                terminal::Clear(ClearType::CurrentLine),
                Print("Password must not be empty.\r\n")
            )?;
            continue;
        }

        let p2 = prompt_password("Confirm password: ")?;
        if p1 == p2 {
            return Ok(p1);
        }

        execute!(
            out,
            cursor::MoveToColumn(0),
            terminal::Clear(ClearType::CurrentLine),
            Print("Passwords do not match. Try again.\r\n")
        )?;
    }

    Err("too many attempts".into())
}

async fn connect_db(
    database_url: &str,
) -> Result<DatabaseConnection, Box<dyn Error + Send + Sync>> {
    let db = Database::connect(database_url).await?;
    migration::Migrator::up(&db, None).await?;
    Ok(db)
}

async fn find_by_email(
    db: &DatabaseConnection,
    email: &str,
) -> Result<Option<users::Model>, Box<dyn Error + Send + Sync>> {
    let user = users::Entity::find()
        .filter(users::Column::Email.eq(email.trim().to_lowercase()))
        .one(db)
        .await?;
    Ok(user)
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error + Send + Sync>> {
    let cli = Cli::parse();

    let db = connect_db(&cli.database_url).await?;
    let engine = Engine::builder().database(db.clone()).build().await?;

    match cli.command {
        Command::User(User {
            command: UserCommand::Create(args),
        }) => {
            if find_by_email(&db, &args.email).await?.is_some() {
                eprintln!("user already exists: {}", args.email);
                std::process::exit(1);
            }

            let password = prompt_password_twice()?;
            let mut cmd = NewUser::new(&args.name, &args.email, &password);
            if let Some(avatar) = args.avatar {
                cmd = cmd.avatar(avatar);
            }
            let user = match engine.register_user(cmd).await {
                Ok(user) => user,
                Err(err) => {
                    eprintln!("{err}");
                    std::process::exit(2);
                }
            };

            println!("created user: {} ({})", user.email, user.id);
        }
        Command::User(User {
            command: UserCommand::List,
        }) => {
            let users = users::Entity::find()
                .order_by_asc(users::Column::Name)
                .all(&db)
                .await?;
            for user in users {
                println!("{}\t{}\t{}", user.id, user.name, user.email);
            }
        }
        Command::Friend(Friend {
            command: FriendCommand::Link(args),
        }) => {
            let (Some(sender), Some(receiver)) = (
                find_by_email(&db, &args.email).await?,
                find_by_email(&db, &args.with).await?,
            ) else {
                eprintln!("user not found: {} or {}", args.email, args.with);
                std::process::exit(1);
            };

            engine.send_friend_request(sender.id, receiver.id).await?;
            let friendship_id = engine
                .accept_friend_request(receiver.id, sender.id)
                .await?;
            println!(
                "linked {} and {} ({friendship_id})",
                sender.email, receiver.email
            );
        }
    }

    Ok(())
}
