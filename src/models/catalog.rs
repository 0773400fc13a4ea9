use serde::Serialize;
use std::fmt;

use super::Program;

/// Meeting type of a section, in the order the detail page lists its tables.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum Tipo {
    Teo,
    Sem,
    Prac,
}

impl Tipo {
    pub fn as_str(&self) -> &'static str {
        match self {
            Tipo::Teo => "Teo",
            Tipo::Sem => "Sem",
            Tipo::Prac => "Prac",
        }
    }
}

impl fmt::Display for Tipo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Materia {
    pub id: String,
    pub program: Program,
    pub program_name: String,
    /// `None` when the detail page header could not be parsed.
    pub materia_code: Option<u32>,
    pub materia_name: String,
    pub search_name: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Catedra {
    pub id: String,
    pub program: Program,
    pub program_name: String,
    pub chair_id: u32,
    pub chair_label: String,
    pub docente_titular: String,
    pub materia_id: String,
    pub materia_code: Option<u32>,
    pub materia_name: String,
}

/// A theory or seminar section a practicum section requires attending.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SectionRequirement {
    pub tipo: Tipo,
    pub label: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Section {
    pub id: String,
    pub term_id: String,
    pub program: Program,
    pub program_name: String,
    pub chair_id: u32,
    pub materia_id: String,
    pub materia_code: Option<u32>,
    pub materia_name: String,
    pub tipo: Tipo,
    pub section_label: String,
    pub docentes: Vec<String>,
    pub vacantes: Option<i64>,
    pub oblig: Option<String>,
    pub requires: Vec<SectionRequirement>,
    pub sedes: Vec<String>,
    pub aulas: Vec<String>,
    pub meets_count: usize,
    pub updated_at: i64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Meet {
    pub id: String,
    pub section_id: String,
    pub term_id: String,
    pub program: Program,
    pub chair_id: u32,
    pub tipo: Tipo,
    pub section_label: String,
    pub day_name: String,
    /// 1 = Monday .. 6 = Saturday, 0 when the day name is not recognised.
    pub day_num: u8,
    pub start: String,
    pub end: String,
    pub start_min: u32,
    pub end_min: u32,
    pub aula_code: String,
    pub sede_code: String,
    pub observ: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Term {
    pub id: String,
    pub name: String,
    pub updated_at: i64,
}

impl Term {
    pub fn new(id: &str, updated_at: i64) -> Self {
        Self {
            id: id.to_string(),
            name: id.replace('-', " / "),
            updated_at,
        }
    }
}

pub fn materia_id(program: Program, materia_code: Option<u32>) -> String {
    match materia_code {
        Some(code) => format!("{}-{:04}", program, code),
        None => format!("{}-NaN", program),
    }
}

pub fn catedra_id(program: Program, chair_id: u32) -> String {
    format!("{}-{}", program, chair_id)
}

pub fn section_id(term_id: &str, program: Program, chair_id: u32, tipo: Tipo, label: &str) -> String {
    format!("{}_{}_{}_{}_{}", term_id, program, chair_id, tipo, label)
}

pub fn meet_id(section_id: &str, seq: usize) -> String {
    format!("{}_{}", section_id, seq)
}
