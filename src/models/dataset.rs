use serde::Serialize;
use std::collections::{BTreeMap, HashSet};
use std::mem;

use super::{Catedra, Materia, Meet, Program, ProgramInfo, Section, Term};
use crate::error::CatalogError;
use crate::parsers::locale_cmp;

/// Composite key -> entity ids. Keys serialize in sorted order.
pub type IdIndex = BTreeMap<String, Vec<String>>;

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Indices {
    pub by_program: IdIndex,
    pub by_catedra: IdIndex,
    pub by_materia: IdIndex,
    pub by_day_sede: IdIndex,
    pub by_section_id: IdIndex,
}

fn push_id(index: &mut IdIndex, key: impl Into<String>, id: &str) {
    index.entry(key.into()).or_default().push(id.to_string());
}

fn append_all(into: &mut IdIndex, from: IdIndex) {
    for (key, ids) in from {
        into.entry(key).or_default().extend(ids);
    }
}

impl Indices {
    pub fn add_section(&mut self, section: &Section, catedra_key: &str) {
        push_id(&mut self.by_program, section.program.code(), &section.id);
        push_id(&mut self.by_catedra, catedra_key, &section.id);
        push_id(&mut self.by_materia, section.materia_id.as_str(), &section.id);
    }

    pub fn add_meet(&mut self, meet: &Meet) {
        push_id(&mut self.by_section_id, meet.section_id.as_str(), &meet.id);
        push_id(
            &mut self.by_day_sede,
            format!("{}|{}", meet.day_name, meet.sede_code),
            &meet.id,
        );
    }

    pub fn merge(&mut self, other: Indices) {
        append_all(&mut self.by_program, other.by_program);
        append_all(&mut self.by_catedra, other.by_catedra);
        append_all(&mut self.by_materia, other.by_materia);
        append_all(&mut self.by_day_sede, other.by_day_sede);
        append_all(&mut self.by_section_id, other.by_section_id);
    }
}

/// Everything one chair's detail page contributes to the dataset.
#[derive(Debug, Clone)]
pub struct ChairBatch {
    pub materia: Materia,
    pub catedra: Catedra,
    pub sections: Vec<Section>,
    pub meets: Vec<Meet>,
    pub indices: Indices,
}

/// Accumulated entities and indices for one term.
#[derive(Debug, Clone)]
pub struct Dataset {
    pub term: Term,
    pub programs: Vec<ProgramInfo>,
    materias: BTreeMap<String, Materia>,
    pub catedras: Vec<Catedra>,
    pub sections: Vec<Section>,
    pub meets: Vec<Meet>,
    pub indices: Indices,
    catedra_ids: HashSet<String>,
    section_ids: HashSet<String>,
}

impl Dataset {
    pub fn new(term: Term) -> Self {
        Self {
            term,
            programs: Vec::new(),
            materias: BTreeMap::new(),
            catedras: Vec::new(),
            sections: Vec::new(),
            meets: Vec::new(),
            indices: Indices::default(),
            catedra_ids: HashSet::new(),
            section_ids: HashSet::new(),
        }
    }

    /// Records a program present on the list page; it gets an index entry even with no sections.
    pub fn register_program(&mut self, program: Program) {
        if !self.programs.iter().any(|p| p.code == program) {
            self.programs.push(ProgramInfo::from(program));
        }
        self.indices
            .by_program
            .entry(program.code().to_string())
            .or_default();
    }

    /// Folds one chair's batch in. Colliding catedra or section ids reject the batch untouched.
    pub fn merge(&mut self, batch: ChairBatch) -> Result<(), CatalogError> {
        if self.catedra_ids.contains(&batch.catedra.id) {
            return Err(CatalogError::DuplicateCatedra(batch.catedra.id));
        }
        let mut incoming = HashSet::with_capacity(batch.sections.len());
        for section in &batch.sections {
            if self.section_ids.contains(&section.id) || !incoming.insert(section.id.as_str()) {
                return Err(CatalogError::DuplicateSection(section.id.clone()));
            }
        }

        // First name seen for a subject wins.
        self.materias
            .entry(batch.materia.id.clone())
            .or_insert(batch.materia);

        self.catedra_ids.insert(batch.catedra.id.clone());
        self.catedras.push(batch.catedra);

        self.section_ids
            .extend(batch.sections.iter().map(|s| s.id.clone()));
        self.sections.extend(batch.sections);
        self.meets.extend(batch.meets);
        self.indices.merge(batch.indices);
        Ok(())
    }

    pub fn materias(&self) -> impl Iterator<Item = &Materia> {
        self.materias.values()
    }

    /// Orders collections for output: subjects by name, sections by id,
    /// meets by day, start minute and id.
    pub fn finalize(mut self) -> FinalDataset {
        let mut materias: Vec<Materia> = mem::take(&mut self.materias).into_values().collect();
        materias.sort_by(|a, b| {
            locale_cmp(&a.materia_name, &b.materia_name).then_with(|| a.id.cmp(&b.id))
        });
        self.sections.sort_by(|a, b| a.id.cmp(&b.id));
        self.meets.sort_by(|a, b| {
            a.day_num
                .cmp(&b.day_num)
                .then(a.start_min.cmp(&b.start_min))
                .then_with(|| a.id.cmp(&b.id))
        });

        FinalDataset {
            term: self.term,
            programs: self.programs,
            materias,
            catedras: self.catedras,
            sections: self.sections,
            meets: self.meets,
            indices: self.indices,
        }
    }
}

/// Sorted, read-only dataset handed to a [`crate::storage::DatasetSink`].
#[derive(Debug, Clone, PartialEq)]
pub struct FinalDataset {
    pub term: Term,
    pub programs: Vec<ProgramInfo>,
    pub materias: Vec<Materia>,
    pub catedras: Vec<Catedra>,
    pub sections: Vec<Section>,
    pub meets: Vec<Meet>,
    pub indices: Indices,
}
