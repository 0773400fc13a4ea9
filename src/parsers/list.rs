use scraper::Html;
use tracing::debug;

use super::{element_text, parse_leading_int, selector, split_chair_label};
use crate::error::CatalogError;
use crate::models::Program;

/// One chair row of the landing page. The subject code only appears on the detail page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChairStub {
    pub chair_id: u32,
    pub materia_name: String,
    pub chair_label: String,
    pub docente: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProgramChairs {
    pub program: Program,
    pub entries: Vec<ChairStub>,
}

/// Extracts the chair stubs of every program tab present on the catalog landing page.
/// Programs without a tab are skipped; rows without a numeric chair id are dropped.
pub fn parse_list_page(html: &str) -> Result<Vec<ProgramChairs>, CatalogError> {
    let document = Html::parse_document(html);
    let row_selector = selector("table tr")?;
    let cell_selector = selector("td")?;

    let mut results = Vec::new();

    for program in Program::ALL {
        let tab_selector = selector(program.tab_selector())?;
        let Some(tab) = document.select(&tab_selector).next() else {
            debug!(program = %program, "program tab not found on list page");
            continue;
        };

        let mut entries = Vec::new();
        for row in tab.select(&row_selector).skip(1) {
            let cells: Vec<_> = row.select(&cell_selector).collect();
            if cells.len() < 4 {
                continue;
            }

            let Some(chair_id) = parse_leading_int(&element_text(&cells[0]))
                .and_then(|id| u32::try_from(id).ok())
            else {
                continue;
            };

            let materia_name = element_text(&cells[1]);
            let instructor = split_chair_label(&element_text(&cells[2]));

            entries.push(ChairStub {
                chair_id,
                materia_name,
                chair_label: instructor.label().to_string(),
                docente: instructor.docente().to_string(),
            });
        }

        results.push(ProgramChairs { program, entries });
    }

    Ok(results)
}
