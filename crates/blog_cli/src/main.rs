//! Command-line driver for the blog core.
//!
//! # Responsibility
//! - Stand in for the web transport: map flags to `BlogApp` requests.
//! - Carry the session as `--as <email>`, since every invocation is a
//!   fresh process.

use blog_core::db::open_db;
use blog_core::{
    default_log_level, init_logging, BlogApp, BlogsView, EntityId, PostsView, SearchView,
    ServiceError, Session, SqliteStore,
};
use clap::{Parser, Subcommand};
use log::error;
use std::path::PathBuf;
use std::process::ExitCode;

/// Multi-user blog command line.
#[derive(Parser, Debug)]
#[command(name = "blog", version, about = "Multi-user blog command line")]
struct Cli {
    /// SQLite database file
    #[arg(long, env = "BLOG_DB_PATH", default_value = "blog.sqlite3")]
    db: PathBuf,

    /// trace|debug|info|warn|error (defaults by build mode)
    #[arg(long, env = "BLOG_LOG_LEVEL")]
    log_level: Option<String>,

    /// Absolute directory for rolling log files; logging is off when unset
    #[arg(long, env = "BLOG_LOG_DIR")]
    log_dir: Option<String>,

    /// Act as this user (session email)
    #[arg(long = "as", env = "BLOG_USER")]
    acting_as: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Print core linkage info
    Ping,
    /// Create an account
    Register {
        #[arg(long)]
        email: String,
        #[arg(long)]
        password: String,
    },
    /// Check credentials and list the user's blogs
    Login {
        #[arg(long)]
        email: String,
        #[arg(long)]
        password: String,
    },
    /// List blogs of a user (defaults to the acting user)
    Blogs {
        #[arg(long)]
        user_id: Option<EntityId>,
    },
    /// Create a blog owned by the acting user
    NewBlog {
        #[arg(long)]
        title: String,
        #[arg(long)]
        description: String,
    },
    /// List posts of a blog
    Posts { blog_id: EntityId },
    /// Create a post in a blog
    NewPost {
        blog_id: EntityId,
        #[arg(long)]
        title: String,
        #[arg(long)]
        content: String,
    },
    /// Search the acting user's posts
    Search { query: String },
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    if let Some(log_dir) = cli.log_dir.as_deref() {
        let level = cli.log_level.as_deref().unwrap_or(default_log_level());
        if let Err(err) = init_logging(level, log_dir) {
            eprintln!("logging disabled: {err}");
        }
    }

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(message) => {
            error!("event=cli_command module=cli status=error");
            eprintln!("error: {message}");
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> Result<(), String> {
    if let Command::Ping = cli.command {
        println!("blog_core ping={}", blog_core::ping());
        println!("blog_core version={}", blog_core::core_version());
        return Ok(());
    }

    let conn = open_db(&cli.db).map_err(|err| err.to_string())?;
    let store = SqliteStore::try_new(&conn).map_err(|err| err.to_string())?;
    let app = BlogApp::new(store);
    let mut session = match cli.acting_as {
        Some(email) => Session::for_email(email),
        None => Session::anonymous(),
    };

    let outcome = match cli.command {
        Command::Ping => Ok(()),
        Command::Register { email, password } => app
            .register(&mut session, &email, &password)
            .map(|view| print_blogs(&view)),
        Command::Login { email, password } => app
            .login(&mut session, &email, &password)
            .map(|view| print_blogs(&view)),
        Command::Blogs { user_id } => app
            .user_blogs(&session, user_id.as_ref())
            .map(|view| print_blogs(&view)),
        Command::NewBlog { title, description } => app
            .create_blog(&session, &title, &description)
            .map(|view| print_blogs(&view)),
        Command::Posts { blog_id } => app
            .blog_posts(&session, &blog_id)
            .map(|view| print_posts(&view)),
        Command::NewPost {
            blog_id,
            title,
            content,
        } => app
            .create_post(&session, &blog_id, &title, &content)
            .map(|view| print_posts(&view)),
        Command::Search { query } => app
            .search(&session, Some(&query))
            .map(|view| print_search(&view)),
    };

    outcome.map_err(describe)
}

fn describe(err: ServiceError) -> String {
    match err {
        ServiceError::NotAuthenticated => "pass --as <email> to act as a user".to_string(),
        ServiceError::InvalidCredentials => "email or password is incorrect".to_string(),
        other => other.to_string(),
    }
}

fn print_blogs(view: &BlogsView) {
    println!("user {} ({})", view.email, view.user_id);
    for blog in &view.blogs {
        println!("  blog {} {}: {}", blog.id, blog.title, blog.description);
    }
}

fn print_posts(view: &PostsView) {
    println!("blog {} {}", view.blog.id, view.blog.title);
    for post in &view.posts {
        println!("  post {} {}: {}", post.id, post.title, post.content);
    }
    print_navigation(&view.blogs);
}

fn print_search(view: &SearchView) {
    println!("search `{}`: {} result(s)", view.query, view.posts.len());
    for post in &view.posts {
        println!("  post {} {}: {}", post.id, post.title, post.content);
    }
    print_navigation(&view.blogs);
}

fn print_navigation(blogs: &[blog_core::Blog]) {
    let titles = blogs
        .iter()
        .map(|blog| blog.title.as_str())
        .collect::<Vec<_>>();
    println!("your blogs: {}", titles.join(", "));
}
