use once_cell::sync::Lazy;
use regex::Regex;
use scraper::{ElementRef, Html, Selector};

use super::{element_text, extract_sede_from_aula, parse_leading_int, selector};
use crate::error::CatalogError;
use crate::models::Tipo;

static MATERIA_HEADER_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)Materia\s*\(\s*(\d+)\s*-\s*([^)]+)\)").expect("Invalid materia header regex")
});

const MIN_FULL_ROW_CELLS: usize = 10;

/// One row of a meeting table on a chair's detail page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MeetingRow {
    pub label: String,
    pub day_name: String,
    pub start: String,
    pub end: String,
    pub type_code: String,
    pub docente: String,
    pub vacantes: Option<i64>,
    pub oblig: Option<String>,
    pub aula_code: String,
    pub sede_code: String,
    pub observ: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct DetailPage {
    /// `None` when the subject header is missing or unparseable.
    pub materia_code: Option<u32>,
    pub materia_name: String,
    pub teos: Vec<MeetingRow>,
    pub sems: Vec<MeetingRow>,
    pub pracs: Vec<MeetingRow>,
}

impl DetailPage {
    pub fn rows(&self, tipo: Tipo) -> &[MeetingRow] {
        match tipo {
            Tipo::Teo => &self.teos,
            Tipo::Sem => &self.sems,
            Tipo::Prac => &self.pracs,
        }
    }
}

/// Physical position of each logical meeting table. The seminar table is optional
/// and, when present, pushes the practicum table one slot down.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TableLayout {
    pub teo: usize,
    pub sem: Option<usize>,
    pub prac: usize,
}

impl TableLayout {
    pub fn detect(document: &Html) -> Result<Self, CatalogError> {
        let header_selector = selector("th")?;
        let has_sem = document
            .select(&header_selector)
            .any(|th| element_text(&th).to_lowercase().contains("seminarios"));

        Ok(if has_sem {
            TableLayout { teo: 0, sem: Some(1), prac: 2 }
        } else {
            TableLayout { teo: 0, sem: None, prac: 1 }
        })
    }
}

pub fn parse_detail_page(html: &str) -> Result<DetailPage, CatalogError> {
    let document = Html::parse_document(html);

    let (materia_code, materia_name) = match find_materia_header(&document)? {
        Some((code, name)) => (Some(code), name),
        None => (None, String::new()),
    };

    let table_selector = selector("table.table_tabs")?;
    let tables: Vec<_> = document.select(&table_selector).collect();
    let layout = TableLayout::detect(&document)?;

    let row_selector = selector("tr")?;
    let cell_selector = selector("td")?;
    let parse = |index: Option<usize>, tipo: Tipo| -> Vec<MeetingRow> {
        index
            .and_then(|i| tables.get(i))
            .map(|table| parse_rows(table, tipo, &row_selector, &cell_selector))
            .unwrap_or_default()
    };

    Ok(DetailPage {
        materia_code,
        materia_name,
        teos: parse(Some(layout.teo), Tipo::Teo),
        sems: parse(layout.sem, Tipo::Sem),
        pracs: parse(Some(layout.prac), Tipo::Prac),
    })
}

fn find_materia_header(document: &Html) -> Result<Option<(u32, String)>, CatalogError> {
    let primary = selector("td.option1")?;
    let fallback = selector("td, th")?;

    let from_primary = document
        .select(&primary)
        .next()
        .and_then(|cell| match_materia_header(&element_text(&cell)));
    if from_primary.is_some() {
        return Ok(from_primary);
    }

    Ok(document
        .select(&fallback)
        .find_map(|cell| match_materia_header(&element_text(&cell))))
}

/// Reads `"Materia ( 7 - Psicología Social )"` into its code and name.
pub fn match_materia_header(text: &str) -> Option<(u32, String)> {
    let caps = MATERIA_HEADER_REGEX.captures(text)?;
    let code = caps[1].parse().ok()?;
    Some((code, super::clean_text(&caps[2])))
}

fn parse_rows(
    table: &ElementRef<'_>,
    tipo: Tipo,
    row_selector: &Selector,
    cell_selector: &Selector,
) -> Vec<MeetingRow> {
    let mut rows = Vec::new();

    for tr in table.select(row_selector).skip(1) {
        let cells: Vec<String> = tr.select(cell_selector).map(|td| element_text(&td)).collect();
        if cells.is_empty() {
            continue;
        }
        // Seminar tables may carry fewer columns.
        if cells.len() < MIN_FULL_ROW_CELLS && tipo != Tipo::Sem {
            continue;
        }

        let cell = |i: usize| cells.get(i).cloned().unwrap_or_default();
        let non_empty = |text: String| if text.is_empty() { None } else { Some(text) };

        let vac_raw = cell(6);
        let vacantes = if vac_raw.is_empty() {
            None
        } else {
            parse_leading_int(&vac_raw)
        };
        let aula_code = cell(8);
        let sede_code = extract_sede_from_aula(&aula_code);

        rows.push(MeetingRow {
            label: cell(0),
            day_name: cell(1).to_lowercase(),
            start: cell(2),
            end: cell(3),
            type_code: cell(4),
            docente: cell(5),
            vacantes,
            oblig: non_empty(cell(7)),
            aula_code,
            sede_code,
            observ: non_empty(cell(9)),
        });
    }

    rows
}
