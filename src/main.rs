use std::error::Error;
use std::process::ExitCode;

use htmlbind_lib::{Decode, FetchExt};
use tracing_subscriber::EnvFilter;

#[derive(Debug, Default, Decode)]
pub struct Outline {
    #[html(selector = "head > title")]
    pub title: String,
    #[html(selector = "meta[name=description]", attr = "content")]
    pub description: String,
    #[html(selector = "h1, h2, h3")]
    pub headings: Vec<String>,
    #[html(selector = "a[href]", attr = "href")]
    pub links: Vec<String>,
}

async fn outline(target: &str) -> Result<Outline, Box<dyn Error>> {
    if target.starts_with("http://") || target.starts_with("https://") {
        Ok(reqwest::Client::new().fetch_decoded(target).await?)
    } else {
        let html = std::fs::read_to_string(target)?;
        Ok(htmlbind_lib::from_html(&html)?)
    }
}

#[tokio::main]
async fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let Some(target) = std::env::args().nth(1) else {
        eprintln!("usage: htmlbind <file.html | url>");
        return ExitCode::FAILURE;
    };

    match outline(&target).await {
        Ok(outline) => {
            println!("{:#?}", outline);
            ExitCode::SUCCESS
        }
        Err(error) => {
            eprintln!("{}", error);
            ExitCode::FAILURE
        }
    }
}
