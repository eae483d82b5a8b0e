use browser_dialects::{by, ChromeDriver, Config, DialectSession, Selector};
use clap::{Arg, ArgAction, Command};
use tracing::info;
use tracing_subscriber::EnvFilter;

fn build_selector(dialect: &str, query: &str) -> browser_dialects::Result<Selector> {
    Ok(match dialect {
        "css" => by::css(query)?.into(),
        "id" => by::id(query)?.into(),
        "sizzle" => by::sizzle(query)?.into(),
        "query" => by::query_selector(query)?.into(),
        _ => by::jquery(query)?.into(),
    })
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let matches = Command::new("browser-dialects")
        .about("Run a jQuery, Sizzle or CSS query against a page in Chrome")
        .arg(Arg::new("url").required(true).help("Page to open"))
        .arg(Arg::new("selector").required(true).help("Query text"))
        .arg(
            Arg::new("dialect")
                .long("dialect")
                .short('d')
                .value_parser(["jquery", "sizzle", "css", "id", "query"])
                .default_value("jquery"),
        )
        .arg(
            Arg::new("config")
                .long("config")
                .short('c')
                .help("JSON configuration file"),
        )
        .arg(
            Arg::new("headed")
                .long("headed")
                .action(ArgAction::SetTrue)
                .help("Show the browser window"),
        )
        .get_matches();

    let mut config = match matches.get_one::<String>("config") {
        Some(path) => Config::from_file(path)?,
        None => Config::default(),
    };
    if matches.get_flag("headed") {
        config.browser.headless = false;
    }

    let url = matches.get_one::<String>("url").map(String::as_str).unwrap_or_default();
    let query = matches.get_one::<String>("selector").map(String::as_str).unwrap_or_default();
    let dialect = matches.get_one::<String>("dialect").map(String::as_str).unwrap_or("jquery");
    let selector = build_selector(dialect, query)?;

    info!("Launching Chrome");
    let driver = ChromeDriver::launch(&config.browser)?;
    info!("Navigating to {}", url);
    driver.navigate(url)?;

    let session = DialectSession::new(driver, config)?;
    let elements = session.find_elements(&selector).await?;
    info!("{} matched {} element(s)", selector, elements.len());

    if let Some(first) = elements.first() {
        let text: Option<String> = session
            .execute("return arguments[0].textContent;", &[first.to_value()])
            .await?;
        info!("First match text: {:?}", text.unwrap_or_default().trim());
    }

    Ok(())
}
