use clap::{Args, Parser, Subcommand, ValueEnum};
use relay_sdk::{Paging, RelayClient, RelayResponse};
use royale_relay::meta::{ranked_player_tags, MetaAnalyzer};

#[derive(Parser)]
#[command(name = "relay-cli")]
#[command(about = "Query the game API through a running royale relay", long_about = None)]
struct Cli {
    #[arg(short, long, default_value = "http://localhost:3000")]
    url: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Check relay status
    Health,
    /// Show clan details
    Clan { tag: String },
    /// Show player profile with battle log and upcoming chests
    Player { tag: String },
    /// List all cards
    Cards {
        #[arg(short, long)]
        limit: Option<u32>,
    },
    /// List locations
    Locations,
    /// List Path of Legends seasons
    Seasons,
    /// Show a leaderboard
    Leaderboard {
        id: u64,
        #[arg(short, long)]
        limit: Option<u32>,
    },
    /// Show location rankings
    Rankings {
        /// Location ID, or `global`
        location: String,
        kind: RankingKind,
        #[command(flatten)]
        paging: PagingArgs,
    },
    /// Show global Path of Legends rankings for a season
    TopPlayers {
        /// Season ID, e.g. `2024-05`
        season: String,
        #[command(flatten)]
        paging: PagingArgs,
    },
    /// Card, pair and archetype usage of the top Path of Legends players
    Meta {
        /// Number of top players to analyse
        #[arg(long, default_value_t = 5)]
        players: u32,
        /// Ladder battles counted per player
        #[arg(long, default_value_t = 5)]
        battles: usize,
    },
    /// Forward an arbitrary upstream path
    Raw {
        path: String,
        #[arg(short, long)]
        query: Option<String>,
    },
}

#[derive(Args)]
struct PagingArgs {
    #[arg(short, long)]
    limit: Option<u32>,
    /// Return items after this cursor
    #[arg(long, conflicts_with = "before")]
    after: Option<String>,
    /// Return items before this cursor
    #[arg(long)]
    before: Option<String>,
}

impl From<PagingArgs> for Paging {
    fn from(args: PagingArgs) -> Self {
        Paging {
            limit: args.limit,
            after: args.after,
            before: args.before,
        }
    }
}

#[derive(Clone, Copy, ValueEnum)]
enum RankingKind {
    Players,
    Clans,
    Clanwars,
}

impl RankingKind {
    fn path(self, location: &str) -> String {
        match self {
            RankingKind::Players => format!("locations/{}/pathoflegend/players", location),
            RankingKind::Clans => format!("locations/{}/rankings/clans", location),
            RankingKind::Clanwars => format!("locations/{}/rankings/clanwars", location),
        }
    }
}

fn limit_query(limit: Option<u32>) -> Option<String> {
    limit.map(|limit| format!("limit={}", limit))
}

/// Top ladder players and their recent battles, aggregated.
async fn meta_snapshot(
    client: &RelayClient,
    players: u32,
    battles: usize,
) -> Result<(), Box<dyn std::error::Error>> {
    let rankings = client
        .proxy("locations/global/pathoflegend/players", limit_query(Some(players)).as_deref())
        .await?;
    if !rankings.is_success() {
        eprintln!("Failed to fetch top players");
        return print_response(rankings);
    }

    let tags = ranked_player_tags(&rankings.body);
    let mut analyzer = MetaAnalyzer::new();

    for tag in &tags {
        match client.proxy(&format!("players/{}/battlelog", tag), None).await {
            Ok(res) if res.is_success() => {
                analyzer.add_battle_log(&res.body, battles);
            }
            Ok(res) => eprintln!("Skipping {}: relay returned status {}", tag, res.status),
            Err(e) => eprintln!("Skipping {}: {}", tag, e),
        }
    }

    let snapshot = analyzer.snapshot(tags.len());
    println!("{}", serde_json::to_string_pretty(&snapshot)?);
    Ok(())
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    let client = RelayClient::new(&cli.url);

    let res = match cli.command {
        Commands::Health => {
            let health = client.health().await?;
            println!("{} (v{})", health.status, health.version);
            return Ok(());
        }
        Commands::Clan { tag } => client.clan(&tag).await?,
        Commands::Player { tag } => client.player(&tag).await?,
        Commands::Cards { limit } => client.proxy("cards", limit_query(limit).as_deref()).await?,
        Commands::Locations => client.proxy("locations", None).await?,
        Commands::Seasons => client.proxy("locations/global/seasonsV2", None).await?,
        Commands::Leaderboard { id, limit } => {
            client
                .proxy(&format!("leaderboards/{}", id), limit_query(limit).as_deref())
                .await?
        }
        Commands::Rankings {
            location,
            kind,
            paging,
        } => {
            let query = Paging::from(paging).query()?;
            client.proxy(&kind.path(&location), query.as_deref()).await?
        }
        Commands::TopPlayers { season, paging } => {
            let query = Paging::from(paging).query()?;
            client
                .proxy(
                    &format!("locations/global/pathoflegend/{}/rankings/players", season),
                    query.as_deref(),
                )
                .await?
        }
        Commands::Meta { players, battles } => {
            return meta_snapshot(&client, players, battles).await;
        }
        Commands::Raw { path, query } => client.proxy(&path, query.as_deref()).await?,
    };

    print_response(res)
}

fn print_response(res: RelayResponse) -> Result<(), Box<dyn std::error::Error>> {
    if !res.is_success() {
        eprintln!("Error: relay returned status {}", res.status);
        if let Some(message) = res.error_message() {
            eprintln!("Message: {}", message);
        }
    }

    println!("{}", serde_json::to_string_pretty(&res.body)?);
    Ok(())
}
