//! Prints how the catalog pages are laid out, to check the selectors still match
//! the live markup. Pass a chair id to also inspect its detail page.

use anyhow::Result;
use scraper::{Html, Selector};

use catalog_scraper::models::Program;
use catalog_scraper::parsers::{parse_detail_page, parse_list_page, TableLayout};
use catalog_scraper::utils::http::{HttpSource, PageSource};
use catalog_scraper::Config;

#[tokio::main]
async fn main() -> Result<()> {
    let config = Config::load()?;
    let source = HttpSource::new(&config)?;

    let list_url = config.list_url()?;
    println!("Fetching list page {}...", list_url);
    let html = source.fetch_text(list_url.as_str()).await?;

    let document = Html::parse_document(&html);
    for program in Program::ALL {
        let tab = Selector::parse(program.tab_selector())
            .map_err(|e| anyhow::anyhow!("bad selector: {:?}", e))?;
        let found = document.select(&tab).count();
        println!("Tab {} ({}): {} container(s)", program, program.name(), found);
    }

    let programs = parse_list_page(&html)?;
    for chairs in &programs {
        println!("{}: {} chair rows parsed", chairs.program, chairs.entries.len());
    }

    let Some(chair_id) = std::env::args().nth(1).and_then(|arg| arg.parse::<u32>().ok()) else {
        return Ok(());
    };

    let detail_url = config.detail_url(chair_id)?;
    println!("\nFetching detail page {}...", detail_url);
    let html = source.fetch_text(detail_url.as_str()).await?;
    let document = Html::parse_document(&html);

    let tables = Selector::parse("table.table_tabs")
        .map_err(|e| anyhow::anyhow!("bad selector: {:?}", e))?;
    println!("Found {} table.table_tabs elements", document.select(&tables).count());
    println!("Layout: {:?}", TableLayout::detect(&document)?);

    let detail = parse_detail_page(&html)?;
    println!(
        "Materia {:?} '{}': {} teo, {} sem, {} prac rows",
        detail.materia_code,
        detail.materia_name,
        detail.teos.len(),
        detail.sems.len(),
        detail.pracs.len()
    );

    Ok(())
}
