//! Turns one chair's parsed detail page into subject, chair, section and meet records
//! plus the index entries that point at them.

use std::collections::HashMap;
use tracing::debug;

use crate::models::{
    catedra_id, find_sede, materia_id, meet_id, section_id, Catedra, ChairBatch, Indices,
    Materia, Meet, Program, Section, Tipo,
};
use crate::parsers::{
    day_name_to_num, parse_oblig, time_to_minutes, to_search, ChairStub, DetailPage, MeetingRow,
};

/// Per-run values stamped onto every record.
#[derive(Debug, Clone)]
pub struct RunContext {
    pub term_id: String,
    pub updated_at: i64,
}

pub fn build_chair_batch(
    ctx: &RunContext,
    program: Program,
    stub: &ChairStub,
    detail: &DetailPage,
) -> ChairBatch {
    let materia_id = materia_id(program, detail.materia_code);
    let materia = Materia {
        id: materia_id.clone(),
        program,
        program_name: program.name().to_string(),
        materia_code: detail.materia_code,
        materia_name: detail.materia_name.clone(),
        search_name: to_search(&detail.materia_name),
    };

    let catedra = Catedra {
        id: catedra_id(program, stub.chair_id),
        program,
        program_name: program.name().to_string(),
        chair_id: stub.chair_id,
        chair_label: stub.chair_label.clone(),
        docente_titular: stub.docente.clone(),
        materia_id,
        materia_code: detail.materia_code,
        materia_name: detail.materia_name.clone(),
    };

    let mut batch = ChairBatch {
        materia,
        catedra,
        sections: Vec::new(),
        meets: Vec::new(),
        indices: Indices::default(),
    };

    for tipo in [Tipo::Teo, Tipo::Sem, Tipo::Prac] {
        for (label, rows) in group_by_label(detail.rows(tipo)) {
            add_section(ctx, &mut batch, tipo, label, &rows);
        }
    }

    debug!(
        catedra = %batch.catedra.id,
        sections = batch.sections.len(),
        meets = batch.meets.len(),
        "aggregated chair"
    );
    batch
}

/// Groups rows by section label, keeping labels and rows in source order.
fn group_by_label(rows: &[MeetingRow]) -> Vec<(&str, Vec<&MeetingRow>)> {
    let mut groups: Vec<(&str, Vec<&MeetingRow>)> = Vec::new();
    let mut positions: HashMap<&str, usize> = HashMap::new();

    for row in rows {
        match positions.get(row.label.as_str()) {
            Some(&pos) => groups[pos].1.push(row),
            None => {
                positions.insert(row.label.as_str(), groups.len());
                groups.push((row.label.as_str(), vec![row]));
            }
        }
    }

    groups
}

/// Distinct non-empty values in order of first occurrence.
fn unique_non_empty<'a>(values: impl Iterator<Item = &'a str>) -> Vec<String> {
    let mut out: Vec<String> = Vec::new();
    for value in values {
        if !value.is_empty() && !out.iter().any(|seen| seen == value) {
            out.push(value.to_string());
        }
    }
    out
}

fn add_section(ctx: &RunContext, batch: &mut ChairBatch, tipo: Tipo, label: &str, rows: &[&MeetingRow]) {
    let catedra = &batch.catedra;
    let id = section_id(&ctx.term_id, catedra.program, catedra.chair_id, tipo, label);

    let sedes = unique_non_empty(rows.iter().map(|r| r.sede_code.as_str()));
    for sede in &sedes {
        if find_sede(sede).is_none() {
            debug!(section = %id, sede = %sede, "room code outside known campuses");
        }
    }

    let oblig = match tipo {
        Tipo::Prac => rows.iter().find_map(|r| r.oblig.clone()),
        _ => None,
    };
    let requires = oblig.as_deref().map(parse_oblig).unwrap_or_default();

    let section = Section {
        id: id.clone(),
        term_id: ctx.term_id.clone(),
        program: catedra.program,
        program_name: catedra.program_name.clone(),
        chair_id: catedra.chair_id,
        materia_id: catedra.materia_id.clone(),
        materia_code: catedra.materia_code,
        materia_name: catedra.materia_name.clone(),
        tipo,
        section_label: label.to_string(),
        docentes: unique_non_empty(rows.iter().map(|r| r.docente.as_str())),
        vacantes: rows.iter().find_map(|r| r.vacantes),
        oblig,
        requires,
        sedes,
        aulas: unique_non_empty(rows.iter().map(|r| r.aula_code.as_str())),
        meets_count: rows.len(),
        updated_at: ctx.updated_at,
    };
    batch.indices.add_section(&section, &catedra.id);

    for (seq, row) in rows.iter().enumerate() {
        let meet = Meet {
            id: meet_id(&id, seq + 1),
            section_id: id.clone(),
            term_id: ctx.term_id.clone(),
            program: section.program,
            chair_id: section.chair_id,
            tipo,
            section_label: label.to_string(),
            day_name: row.day_name.clone(),
            day_num: day_name_to_num(&row.day_name),
            start: row.start.clone(),
            end: row.end.clone(),
            start_min: time_to_minutes(&row.start),
            end_min: time_to_minutes(&row.end),
            aula_code: row.aula_code.clone(),
            sede_code: row.sede_code.clone(),
            observ: row.observ.clone(),
        };
        batch.indices.add_meet(&meet);
        batch.meets.push(meet);
    }

    batch.sections.push(section);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::SectionRequirement;
    use crate::parsers::extract_sede_from_aula;
    use pretty_assertions::assert_eq;

    fn ctx() -> RunContext {
        RunContext {
            term_id: "2025-2".to_string(),
            updated_at: 1_700_000_000_000,
        }
    }

    fn stub() -> ChairStub {
        ChairStub {
            chair_id: 34,
            materia_name: "Historia de la Psicología".to_string(),
            chair_label: "I".to_string(),
            docente: "Juan Pérez".to_string(),
        }
    }

    fn row(label: &str, day: &str, start: &str, docente: &str, vac: Option<i64>, oblig: Option<&str>, aula: &str) -> MeetingRow {
        MeetingRow {
            label: label.to_string(),
            day_name: day.to_string(),
            start: start.to_string(),
            end: "12:00".to_string(),
            type_code: String::new(),
            docente: docente.to_string(),
            vacantes: vac,
            oblig: oblig.map(str::to_string),
            aula_code: aula.to_string(),
            sede_code: extract_sede_from_aula(aula),
            observ: None,
        }
    }

    fn detail() -> DetailPage {
        DetailPage {
            materia_code: Some(1),
            materia_name: "Historia de la Psicología".to_string(),
            teos: vec![
                row("I", "lunes", "08:00", "Juan Pérez", None, Some("ignored"), "HY-014"),
                row("I", "jueves", "08:00", "Juan Pérez", None, None, "HY-015"),
            ],
            sems: Vec::new(),
            pracs: vec![
                row("1", "martes", "10:00", "Ana Gómez", None, None, "IN-201"),
                row("2", "sabado", "", "", Some(30), Some("II"), "AnexoSI"),
                row("1", "viernes", "bad", "Luis Paz", Some(20), Some("IV - H"), "IN-202"),
                row("1", "feriado", "10:00", "Ana Gómez", Some(99), Some("V"), ""),
            ],
        }
    }

    #[test]
    fn builds_materia_and_catedra() {
        let batch = build_chair_batch(&ctx(), Program::PS, &stub(), &detail());
        assert_eq!(batch.materia.id, "PS-0001");
        assert_eq!(batch.materia.search_name, "historia de la psicologia");
        assert_eq!(batch.catedra.id, "PS-34");
        assert_eq!(batch.catedra.chair_label, "I");
        assert_eq!(batch.catedra.docente_titular, "Juan Pérez");
        assert_eq!(batch.catedra.materia_id, "PS-0001");
    }

    #[test]
    fn groups_rows_into_sections() {
        let batch = build_chair_batch(&ctx(), Program::PS, &stub(), &detail());
        let ids: Vec<_> = batch.sections.iter().map(|s| s.id.as_str()).collect();
        assert_eq!(
            ids,
            vec!["2025-2_PS_34_Teo_I", "2025-2_PS_34_Prac_1", "2025-2_PS_34_Prac_2"]
        );

        let teo = &batch.sections[0];
        assert_eq!(teo.docentes, vec!["Juan Pérez"]);
        assert_eq!(teo.aulas, vec!["HY-014", "HY-015"]);
        assert_eq!(teo.sedes, vec!["HY"]);
        assert_eq!(teo.oblig, None);
        assert!(teo.requires.is_empty());

        let prac = &batch.sections[1];
        assert_eq!(prac.docentes, vec!["Ana Gómez", "Luis Paz"]);
        assert_eq!(prac.sedes, vec!["IN"]);
        assert_eq!(prac.vacantes, Some(20));
        assert_eq!(prac.oblig.as_deref(), Some("IV - H"));
        assert_eq!(
            prac.requires,
            vec![
                SectionRequirement { tipo: Tipo::Teo, label: "IV".to_string() },
                SectionRequirement { tipo: Tipo::Sem, label: "H".to_string() },
            ]
        );
        assert_eq!(prac.meets_count, 3);
    }

    #[test]
    fn meets_count_matches_meets() {
        let batch = build_chair_batch(&ctx(), Program::PS, &stub(), &detail());
        for section in &batch.sections {
            let count = batch.meets.iter().filter(|m| m.section_id == section.id).count();
            assert_eq!(section.meets_count, count, "{}", section.id);
            assert_eq!(batch.indices.by_section_id[&section.id].len(), count);
        }
    }

    #[test]
    fn meets_are_numbered_in_row_order() {
        let batch = build_chair_batch(&ctx(), Program::PS, &stub(), &detail());
        let prac_meets: Vec<_> = batch
            .meets
            .iter()
            .filter(|m| m.section_id == "2025-2_PS_34_Prac_1")
            .collect();

        let ids: Vec<_> = prac_meets.iter().map(|m| m.id.as_str()).collect();
        assert_eq!(
            ids,
            vec!["2025-2_PS_34_Prac_1_1", "2025-2_PS_34_Prac_1_2", "2025-2_PS_34_Prac_1_3"]
        );
        assert_eq!(prac_meets[0].day_num, 2);
        assert_eq!(prac_meets[0].start_min, 600);
        assert_eq!(prac_meets[0].end_min, 720);
        assert_eq!(prac_meets[1].start_min, 0);
        assert_eq!(prac_meets[2].day_num, 0);
        assert_eq!(prac_meets[2].sede_code, "");
    }

    #[test]
    fn indices_cover_sections_and_meets() {
        let batch = build_chair_batch(&ctx(), Program::PS, &stub(), &detail());
        assert_eq!(batch.indices.by_program["PS"].len(), 3);
        assert_eq!(batch.indices.by_catedra["PS-34"].len(), 3);
        assert_eq!(batch.indices.by_materia["PS-0001"].len(), 3);
        assert_eq!(
            batch.indices.by_day_sede["lunes|HY"],
            vec!["2025-2_PS_34_Teo_I_1"]
        );
        assert_eq!(
            batch.indices.by_day_sede["sabado|AnexoSI"],
            vec!["2025-2_PS_34_Prac_2_1"]
        );
    }

    #[test]
    fn unparsed_subject_uses_sentinel_id() {
        let page = DetailPage::default();
        let batch = build_chair_batch(&ctx(), Program::TE, &stub(), &page);
        assert_eq!(batch.materia.id, "TE-NaN");
        assert_eq!(batch.materia.materia_code, None);
        assert!(batch.sections.is_empty());
    }
}
