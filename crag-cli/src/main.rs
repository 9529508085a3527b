//! Crag CLI - browse and contribute to the climbing-route catalog.
//!
//! ```bash
//! crag login -u amina -p ...
//! crag climbs --type boulder --grade V4 --grade V5
//! crag tick 7 --comment "flashed"
//! ```
//!
//! See `crag --help` for all available commands and options.

mod commands;
mod context;
mod render;

use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use context::{Context, LoginRequired};
use crag_core::ClimbType;
use std::path::PathBuf;

#[derive(Parser)]
#[command(
    name = "crag",
    about = "Climbing-route catalog client",
    version,
    after_help = "Configuration is read from ./crag.toml and CRAG_* environment variables."
)]
struct Cli {
    /// Config file (default: ./crag.toml)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Backend base URL, overrides the config file
    #[arg(long, global = true)]
    api_url: Option<String>,

    /// Log debug output to stderr
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Log in and remember the session
    Login {
        #[arg(short, long)]
        username: String,
        #[arg(short, long)]
        password: String,
    },

    /// Create an account
    Register {
        #[arg(short, long)]
        username: String,
        #[arg(short, long)]
        email: String,
        #[arg(short, long)]
        password: String,
    },

    /// Forget the stored session
    Logout,

    /// Show the logged-in user
    Whoami,

    /// Recent ascents, big ticks and new first ascents
    Feed,

    /// List climbs, optionally filtered
    Climbs {
        #[arg(long = "type")]
        climb_type: Option<ClimbType>,
        /// Repeat to select several grades
        #[arg(long = "grade")]
        grades: Vec<String>,
        /// Repeat to select several areas
        #[arg(long = "area")]
        areas: Vec<String>,
        /// 1-based page number
        #[arg(long, default_value_t = 1)]
        page: usize,
    },

    /// Summarise the map scene or export it as JSON
    Map {
        #[arg(long = "type")]
        climb_type: Option<ClimbType>,
        #[arg(long = "grade")]
        grades: Vec<String>,
        #[arg(long = "area")]
        areas: Vec<String>,
        /// One pin per climb
        #[arg(long)]
        no_cluster: bool,
        #[arg(long)]
        zoom: Option<u8>,
        /// Write the scene as JSON to this file
        #[arg(long)]
        out: Option<PathBuf>,
    },

    /// Climb detail with its logs
    Show { id: u64 },

    /// A user's ticks and first ascents
    Profile {
        /// User id or username
        user: String,
    },

    /// List users
    Users {
        #[arg(long)]
        search: Option<String>,
    },

    /// Grade vocabulary
    Grades {
        #[arg(long = "type")]
        climb_type: Option<ClimbType>,
    },

    /// Add a climb to your ticklist and log the ascent
    Tick {
        id: u64,
        #[command(flatten)]
        log: LogArgs,
    },

    /// Remove a climb from your ticklist along with its log
    Untick { id: u64 },

    /// Toggle a climb on your hitlist
    Hit { id: u64 },

    /// Log an ascent
    Log {
        id: u64,
        #[command(flatten)]
        log: LogArgs,
    },

    /// Your ticked climbs
    Ticklist,

    /// Climbs you want to do
    Hitlist,

    /// Submit a new climb
    AddClimb(commands::submit::AddClimbArgs),

    /// Upload a KML file of area polygons
    AddArea { file: PathBuf },
}

#[derive(clap::Args, Debug, Default)]
pub struct LogArgs {
    /// Ascent date (default: today)
    #[arg(long)]
    pub date: Option<NaiveDate>,
    /// Your grade (default: the consensus grade)
    #[arg(long)]
    pub grade: Option<String>,
    #[arg(long)]
    pub comment: Option<String>,
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let result = match Context::init(cli.config.as_deref(), cli.api_url, cli.verbose) {
        Ok(ctx) => run(&ctx, cli.command).await,
        Err(e) => Err(e),
    };

    if let Err(e) = result {
        if let Some(redirect) = e.downcast_ref::<LoginRequired>() {
            eprintln!("{}", redirect);
            std::process::exit(2);
        }
        eprintln!("Error: {:#}", e);
        std::process::exit(1);
    }
}

async fn run(ctx: &Context, command: Commands) -> anyhow::Result<()> {
    use commands::{account, browse, collections, submit};

    match command {
        Commands::Login { username, password } => account::login(ctx, &username, &password).await,
        Commands::Register { username, email, password } => {
            account::register(ctx, &username, &email, &password).await
        }
        Commands::Logout => account::logout(ctx).await,
        Commands::Whoami => account::whoami(ctx).await,
        Commands::Feed => browse::feed(ctx).await,
        Commands::Climbs { climb_type, grades, areas, page } => {
            browse::climbs(ctx, climb_type, &grades, &areas, page).await
        }
        Commands::Map { climb_type, grades, areas, no_cluster, zoom, out } => {
            let options = browse::MapOptions { climb_type, grades, areas, cluster: !no_cluster, zoom, out };
            browse::map(ctx, options).await
        }
        Commands::Show { id } => browse::show(ctx, id).await,
        Commands::Profile { user } => browse::profile(ctx, &user).await,
        Commands::Users { search } => browse::users(ctx, search.as_deref()).await,
        Commands::Grades { climb_type } => browse::grades(climb_type),
        Commands::Tick { id, log } => collections::tick(ctx, id, log).await,
        Commands::Untick { id } => collections::untick(ctx, id).await,
        Commands::Hit { id } => collections::hit(ctx, id).await,
        Commands::Log { id, log } => collections::log(ctx, id, log).await,
        Commands::Ticklist => collections::list(ctx, crag_core::collections::CollectionKind::Ticklist).await,
        Commands::Hitlist => collections::list(ctx, crag_core::collections::CollectionKind::Hitlist).await,
        Commands::AddClimb(args) => submit::add_climb(ctx, args).await,
        Commands::AddArea { file } => submit::add_area(ctx, &file).await,
    }
}
