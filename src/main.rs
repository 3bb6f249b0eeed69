use std::collections::BTreeMap;
use std::error::Error;
use std::io::Write;
use std::sync::Arc;

use clap::{Args, Parser, Subcommand};
use serde::de::DeserializeOwned;
use serde::Serialize;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::{error, warn};

use job_board_pager::config::{get_config, Config};
use job_board_pager::logging::init_logging;
use job_board_pager::models::{Company, Job, ListingRow, QueryState, Resource, Resume, SortKey, User};
use job_board_pager::page_window::PageWindowRequest;
use job_board_pager::routes::{self, AppState};
use job_board_pager::services::{
    ApiClient, AuthContext, Catalog, DataSourceOptions, PageSnapshot, PaginatedDataSource,
};
use job_board_pager::utils::render_page_bar;

type CliResult = Result<(), Box<dyn Error>>;

#[derive(Parser)]
#[command(name = "job-board-pager", version, about = "Paginated job-board listings")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Run the list backend on seeded sample data
    Serve {
        /// Address to bind, overrides BIND_ADDR
        #[arg(long)]
        bind: Option<String>,
    },
    /// Fetch one page of a listing and print it
    List(ListArgs),
    /// Page through a listing interactively
    Browse(ListArgs),
    /// Fetch one record by id
    Show(ShowArgs),
}

#[derive(Args)]
struct ConnectionArgs {
    /// Access token for the back-office listings
    #[arg(long)]
    token: Option<String>,
    /// Backend base URL, overrides API_BASE_URL
    #[arg(long)]
    base_url: Option<String>,
}

impl ConnectionArgs {
    fn client(&self, resource: Resource) -> Result<ApiClient, Box<dyn Error>> {
        let mut config: Config = get_config().clone();
        if let Some(base_url) = &self.base_url {
            config.api_base_url = base_url.clone();
        }

        let auth = match &self.token {
            Some(token) => AuthContext::with_token(token.clone()),
            None => {
                if resource.is_admin_only() {
                    warn!(
                        "{} is back-office data; without --token the backend may answer 401",
                        resource
                    );
                }
                AuthContext::new()
            }
        };

        Ok(ApiClient::new(&config, Arc::new(auth))?)
    }
}

#[derive(Args)]
struct ShowArgs {
    #[arg(value_enum)]
    resource: Resource,
    id: String,
    #[command(flatten)]
    connection: ConnectionArgs,
}

#[derive(Args)]
struct ListArgs {
    #[arg(value_enum)]
    resource: Resource,
    #[arg(long, default_value_t = 1)]
    page: u64,
    #[arg(long, default_value_t = 10)]
    page_size: u64,
    /// Sort key, `-` prefix for descending; empty for none
    #[arg(long, default_value_t = SortKey::default().to_string(), allow_hyphen_values = true)]
    sort: String,
    /// Filter predicate as `field=value`, e.g. `name=/rust/i`
    #[arg(long = "filter", value_parser = parse_filter)]
    filters: Vec<(String, String)>,
    /// Page buttons shown around the current page
    #[arg(long, default_value_t = 3)]
    window: u64,
    #[command(flatten)]
    connection: ConnectionArgs,
}

impl ListArgs {
    fn options(&self) -> DataSourceOptions {
        DataSourceOptions {
            current: self.page,
            page_size: self.page_size,
            filter: self.filters.iter().cloned().collect::<BTreeMap<_, _>>(),
            sort: self.sort.parse::<SortKey>().ok(),
        }
    }

    fn client(&self) -> Result<ApiClient, Box<dyn Error>> {
        self.connection.client(self.resource)
    }
}

fn parse_filter(raw: &str) -> Result<(String, String), String> {
    match raw.split_once('=') {
        Some((field, value)) if !field.is_empty() => Ok((field.to_string(), value.to_string())),
        _ => Err(format!("expected field=value, got {raw:?}")),
    }
}

fn print_rows<T: ListingRow>(items: &[T]) {
    if items.is_empty() {
        println!("  (no results)");
    }
    for item in items {
        println!("  {}", item.row());
    }
}

async fn run_list<T>(args: ListArgs) -> CliResult
where
    T: DeserializeOwned + ListingRow,
{
    let client = args.client()?;
    let options = args.options();
    let query = QueryState {
        current: options.current.max(1),
        page_size: options.page_size.max(1),
        filter: options.filter,
        sort: options.sort,
    };

    let page = client.list::<T>(args.resource, &query.to_query_string()).await?;
    print_rows(&page.items);

    let window =
        PageWindowRequest::new(page.total, query.current, query.page_size, args.window).compute();
    println!("{} | {} total", render_page_bar(&window), page.total);
    Ok(())
}

async fn run_show<T>(args: ShowArgs) -> CliResult
where
    T: DeserializeOwned + Serialize,
{
    let client = args.connection.client(args.resource)?;
    let record: T = client.get(args.resource, &args.id).await?;
    println!("{}", serde_json::to_string_pretty(&record)?);
    Ok(())
}

enum BrowseCommand {
    Next,
    Previous,
    GoTo(u64),
    PageSize(u64),
    Sort(Option<SortKey>),
    Filter(String, String),
    Clear,
    Refresh,
    Help,
    Quit,
}

impl BrowseCommand {
    fn parse(line: &str) -> Result<Self, String> {
        let mut parts = line.split_whitespace();
        let verb = parts.next().unwrap_or("");
        let arg = parts.next();

        let number = |arg: Option<&str>| -> Result<u64, String> {
            arg.and_then(|a| a.parse().ok())
                .ok_or_else(|| format!("{verb} needs a number"))
        };

        match verb {
            "n" | "next" => Ok(BrowseCommand::Next),
            "p" | "prev" => Ok(BrowseCommand::Previous),
            "g" | "go" => Ok(BrowseCommand::GoTo(number(arg)?)),
            "size" => Ok(BrowseCommand::PageSize(number(arg)?)),
            "sort" => match arg {
                None | Some("none") => Ok(BrowseCommand::Sort(None)),
                Some(key) => key.parse().map(|k| BrowseCommand::Sort(Some(k))),
            },
            "filter" => arg
                .ok_or_else(|| "filter needs field=value".to_string())
                .and_then(parse_filter)
                .map(|(field, value)| BrowseCommand::Filter(field, value)),
            "clear" => Ok(BrowseCommand::Clear),
            "r" | "refresh" => Ok(BrowseCommand::Refresh),
            "" | "h" | "help" => Ok(BrowseCommand::Help),
            "q" | "quit" => Ok(BrowseCommand::Quit),
            other => Err(format!("unknown command {other:?}, try `help`")),
        }
    }
}

fn print_snapshot<T: ListingRow>(snapshot: &PageSnapshot<T>, window: u64) {
    if let Some(items) = &snapshot.items {
        print_rows(items);
    }
    if let Some(message) = &snapshot.error {
        println!("  ! {message}");
    }
    let bar = render_page_bar(&snapshot.page_window(window).compute());
    println!("{} | {} total | {}", bar, snapshot.total, snapshot.query.to_query_string());
}

async fn run_browse<T>(args: ListArgs) -> CliResult
where
    T: DeserializeOwned + ListingRow + Clone + Send + Sync + 'static,
{
    let client = args.client()?;
    let source = PaginatedDataSource::new(client.fetcher::<T>(args.resource), args.options());
    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    loop {
        let snapshot = source.settled().await;
        print_snapshot(&snapshot, args.window);
        print!("> ");
        std::io::stdout().flush()?;

        let Some(line) = lines.next_line().await? else {
            break;
        };

        match BrowseCommand::parse(&line) {
            Ok(BrowseCommand::Next) => source.page_controls(args.window).go_to_next(),
            Ok(BrowseCommand::Previous) => source.page_controls(args.window).go_to_previous(),
            Ok(BrowseCommand::GoTo(page)) => source.set_current(page),
            Ok(BrowseCommand::PageSize(size)) => source.update_query(|q| {
                q.page_size = size.max(1);
                q.current = 1;
            }),
            Ok(BrowseCommand::Sort(sort)) => source.set_sort(sort),
            Ok(BrowseCommand::Filter(field, value)) => source.update_query(|q| {
                q.filter.insert(field, value);
                q.current = 1;
            }),
            Ok(BrowseCommand::Clear) => source.update_query(|q| {
                q.filter.clear();
                q.current = 1;
            }),
            Ok(BrowseCommand::Refresh) => source.refetch(),
            Ok(BrowseCommand::Help) => {
                println!("  n | p | g N | size N | sort KEY|none | filter k=v | clear | r | q")
            }
            Ok(BrowseCommand::Quit) => break,
            Err(message) => println!("  {message}"),
        }
    }

    Ok(())
}

async fn run(cli: Cli) -> CliResult {
    match cli.command {
        Command::Serve { bind } => {
            let config = get_config();
            let bind = bind.unwrap_or_else(|| config.bind_addr.clone());
            let listener = tokio::net::TcpListener::bind(&bind).await?;
            routes::serve(listener, AppState::new(Catalog::seeded(), config)).await?;
            Ok(())
        }
        Command::List(args) => match args.resource {
            Resource::Jobs => run_list::<Job>(args).await,
            Resource::Companies => run_list::<Company>(args).await,
            Resource::Users => run_list::<User>(args).await,
            Resource::Resumes => run_list::<Resume>(args).await,
        },
        Command::Browse(args) => match args.resource {
            Resource::Jobs => run_browse::<Job>(args).await,
            Resource::Companies => run_browse::<Company>(args).await,
            Resource::Users => run_browse::<User>(args).await,
            Resource::Resumes => run_browse::<Resume>(args).await,
        },
        Command::Show(args) => match args.resource {
            Resource::Jobs => run_show::<Job>(args).await,
            Resource::Companies => run_show::<Company>(args).await,
            Resource::Users => run_show::<User>(args).await,
            Resource::Resumes => run_show::<Resume>(args).await,
        },
    }
}

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();
    init_logging();

    if let Err(e) = run(Cli::parse()).await {
        error!("{}", e);
        eprintln!("error: {e}");
        std::process::exit(1);
    }
}
