use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{bail, Context, Result};
use clap::{Args, Parser, Subcommand};
use venture_core::{
    Budget, FavouriteActivities, PromptSettings, RegionSelection, TripRequest,
    DEFAULT_DESTINATION_COUNTRY,
};
use venture_observability::{init_tracing, AppMetrics};
use venture_planner::{
    ItineraryPlanner, OpenAiCompletionClient, OpenAiConfig, DEFAULT_OPENAI_BASE_URL,
    DEFAULT_OPENAI_MODEL,
};
use venture_storage::{
    MemoryPlaceStore, MongoSettings, PlaceQuery, PlaceRepository, Store,
    DEFAULT_DATABASE, DEFAULT_PLACES_COLLECTION,
};

#[derive(Debug, Parser)]
#[command(name = "venture")]
#[command(about = "Venture itinerary planner CLI")]
struct Cli {
    #[arg(long, env = "VENTURE_MONGO_URL")]
    mongo_url: Option<String>,

    #[arg(long, env = "VENTURE_MONGO_DATABASE", default_value = DEFAULT_DATABASE)]
    database: String,

    #[arg(long, env = "VENTURE_PLACES_COLLECTION", default_value = DEFAULT_PLACES_COLLECTION)]
    collection: String,

    /// JSON array of place documents, used when no MongoDB URL is given.
    #[arg(long, env = "VENTURE_PLACES_SEED")]
    places_seed: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Generate an itinerary, or print the prompt with --dry-run.
    Plan(PlanArgs),
    /// List the candidate places for the given regions.
    Places {
        #[arg(long = "region")]
        regions: Vec<String>,
    },
}

#[derive(Debug, Args)]
struct PlanArgs {
    #[arg(long = "region", required = true)]
    regions: Vec<String>,
    #[arg(long)]
    budget: String,
    #[arg(long, default_value_t = 1)]
    days: u32,
    #[arg(long, default_value_t = 1)]
    group_size: u32,
    #[arg(long = "activity")]
    activities: Vec<String>,
    #[arg(long, env = "VENTURE_DESTINATION_COUNTRY", default_value = DEFAULT_DESTINATION_COUNTRY)]
    country: String,
    #[arg(long)]
    dry_run: bool,
    #[arg(long, env = "VENTURE_OPENAI_API_KEY", hide_env_values = true)]
    openai_api_key: Option<String>,
    #[arg(long, env = "VENTURE_OPENAI_MODEL", default_value = DEFAULT_OPENAI_MODEL)]
    model: String,
    #[arg(long, env = "VENTURE_OPENAI_BASE_URL", default_value = DEFAULT_OPENAI_BASE_URL)]
    base_url: String,
}

#[tokio::main]
async fn main() -> Result<()> {
    init_tracing("venture_cli");
    let cli = Cli::parse();

    let store = build_store(&cli).await?;

    match cli.command {
        Command::Plan(args) => run_plan(store, args).await?,
        Command::Places { regions } => {
            let places = store
                .find_places(&PlaceQuery::for_regions(regions))
                .await?;
            println!("{}", serde_json::to_string_pretty(&places)?);
        }
    }

    Ok(())
}

async fn run_plan(store: Store, args: PlanArgs) -> Result<()> {
    let api_key = match (args.openai_api_key, args.dry_run) {
        (Some(key), _) => key,
        (None, true) => String::new(),
        (None, false) => bail!("--openai-api-key or VENTURE_OPENAI_API_KEY is required unless --dry-run is set"),
    };

    let mut openai = OpenAiConfig::new(api_key);
    openai.model = args.model;
    openai.base_url = args.base_url;

    let planner = ItineraryPlanner::new(
        Arc::new(store),
        Arc::new(OpenAiCompletionClient::new(openai)?),
        PromptSettings {
            destination_country: args.country,
        },
        AppMetrics::shared(),
    );

    let request = TripRequest {
        selected_region: RegionSelection::Many(args.regions),
        budget: Budget::parse(&args.budget),
        days: args.days,
        group_size: args.group_size,
        favourite_activities: (!args.activities.is_empty())
            .then(|| FavouriteActivities::List(args.activities)),
    };

    if args.dry_run {
        let prompt = planner.preview_prompt(&request).await?;
        println!("# system ({} candidate places)\n", prompt.candidate_count);
        println!("{}\n", prompt.system);
        println!("# user\n");
        println!("{}", prompt.user);
        return Ok(());
    }

    let itinerary = planner.generate(request).await?;
    println!("{}", serde_json::to_string_pretty(&itinerary)?);
    Ok(())
}

async fn build_store(cli: &Cli) -> Result<Store> {
    if let Some(url) = cli.mongo_url.as_ref() {
        let mut settings = MongoSettings::new(url.clone());
        settings.database = cli.database.clone();
        settings.collection = cli.collection.clone();
        return Store::mongo(&settings).await;
    }

    match cli.places_seed.as_ref() {
        Some(path) => {
            let store = MemoryPlaceStore::from_seed_file(path)
                .with_context(|| format!("failed loading places from {}", path.display()))?;
            Ok(Store::Memory(store))
        }
        None => Ok(Store::memory()),
    }
}
