use anyhow::{Context, Result};
use chrono::Utc;
use std::sync::Arc;
use tracing::{debug, info};

use crate::aggregate::{build_chair_batch, RunContext};
use crate::config::Config;
use crate::models::{Dataset, FinalDataset, Program, Term};
use crate::parsers::{parse_detail_page, parse_list_page, ChairStub};
use crate::scheduler::FetchScheduler;
use crate::utils::http::PageSource;

/// Scrapes one term: list page, then every chair's detail page through the
/// bounded scheduler, merged into a sorted dataset. Any failure aborts the run.
pub async fn scrape_term(
    config: &Config,
    source: Arc<dyn PageSource>,
    term_id: &str,
) -> Result<FinalDataset> {
    let ctx = RunContext {
        term_id: term_id.to_string(),
        updated_at: Utc::now().timestamp_millis(),
    };

    let list_url = config.list_url()?;
    info!("Fetching chair list from {}", list_url);
    let list_html = source.fetch_text(list_url.as_str()).await?;
    let programs = parse_list_page(&list_html).context("Failed to parse chair list")?;

    let mut dataset = Dataset::new(Term::new(term_id, ctx.updated_at));
    let mut jobs: Vec<(Program, ChairStub)> = Vec::new();
    for program_chairs in programs {
        info!(
            program = %program_chairs.program,
            chairs = program_chairs.entries.len(),
            "program found on list page"
        );
        dataset.register_program(program_chairs.program);
        jobs.extend(
            program_chairs
                .entries
                .into_iter()
                .map(|stub| (program_chairs.program, stub)),
        );
    }

    let scheduler = FetchScheduler::new(config.concurrency);
    let ctx = &ctx;
    scheduler
        .run(
            jobs,
            |(program, stub)| {
                let source = source.clone();
                let url = config.detail_url(stub.chair_id);
                async move {
                    let url = url?;
                    let html = source.fetch_text(url.as_str()).await?;
                    let detail = parse_detail_page(&html)
                        .with_context(|| format!("Failed to parse {}", url))?;
                    debug!(
                        url = %url,
                        teo = detail.teos.len(),
                        sem = detail.sems.len(),
                        prac = detail.pracs.len(),
                        "parsed detail page"
                    );
                    Ok::<_, anyhow::Error>(build_chair_batch(ctx, program, &stub, &detail))
                }
            },
            |batch| dataset.merge(batch).map_err(Into::into),
        )
        .await?;

    info!(
        materias = dataset.materias().count(),
        catedras = dataset.catedras.len(),
        sections = dataset.sections.len(),
        meets = dataset.meets.len(),
        "term scraped"
    );

    Ok(dataset.finalize())
}
