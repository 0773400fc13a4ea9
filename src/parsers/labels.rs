use once_cell::sync::Lazy;
use regex::Regex;

use crate::models::{SectionRequirement, Tipo};

static CHAIR_LABEL_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^([IVXLCDM]+|[A-Z])\s*-\s*").expect("Invalid chair label regex")
});

static LEADING_DASH_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[-–]\s*").expect("Invalid leading dash regex")
});

static BR_TAG_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)<br\s*/?>").expect("Invalid br regex")
});

static ROMAN_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)^[IVXLCDM]+$").expect("Invalid roman numeral regex")
});

static OBLIG_SEPARATOR_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\s*-\s*").expect("Invalid separator regex")
});

static SEDE_PREFIX_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^([A-Z]{2})-").expect("Invalid sede prefix regex")
});

/// Result of splitting a list-page instructor cell.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ChairLabel {
    /// `"<LABEL> - <name>"` matched.
    Labeled { label: String, docente: String },
    /// No label prefix; the whole text is the instructor.
    Raw(String),
}

impl ChairLabel {
    pub fn label(&self) -> &str {
        match self {
            ChairLabel::Labeled { label, .. } => label,
            ChairLabel::Raw(_) => "",
        }
    }

    pub fn docente(&self) -> &str {
        match self {
            ChairLabel::Labeled { docente, .. } => docente,
            ChairLabel::Raw(docente) => docente,
        }
    }
}

/// Splits `"I - Juan Pérez"` into label and instructor. The hyphen is required so
/// prefixes like `"Prof."` or `"Dr."` are never taken for a label.
pub fn split_chair_label(text: &str) -> ChairLabel {
    let cleaned = super::clean_text(text);
    let cleaned = LEADING_DASH_REGEX.replace(&cleaned, "");

    match CHAIR_LABEL_REGEX.captures(&cleaned) {
        Some(caps) => {
            let whole = caps.get(0).map(|m| m.end()).unwrap_or(0);
            ChairLabel::Labeled {
                label: caps[1].to_string(),
                docente: strip_br(&cleaned[whole..]),
            }
        }
        None => ChairLabel::Raw(strip_br(&cleaned)),
    }
}

fn strip_br(text: &str) -> String {
    BR_TAG_REGEX.replace_all(text, "").trim().to_string()
}

pub fn is_roman_numeral(label: &str) -> bool {
    ROMAN_REGEX.is_match(label)
}

/// Parses a practicum prerequisite field such as `"IV - H"`: roman numerals name
/// theory sections, anything else a seminar.
pub fn parse_oblig(oblig: &str) -> Vec<SectionRequirement> {
    OBLIG_SEPARATOR_REGEX
        .split(oblig)
        .map(str::trim)
        .filter(|token| !token.is_empty())
        .map(|label| SectionRequirement {
            tipo: if is_roman_numeral(label) { Tipo::Teo } else { Tipo::Sem },
            label: label.to_string(),
        })
        .collect()
}

/// Campus code of a room: the `XX-` prefix when present, otherwise the room code itself.
pub fn extract_sede_from_aula(aula_code: &str) -> String {
    SEDE_PREFIX_REGEX
        .captures(aula_code)
        .map(|caps| caps[1].to_string())
        .unwrap_or_else(|| aula_code.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn roman_label_and_instructor() {
        let parsed = split_chair_label("I - Juan Pérez");
        assert_eq!(
            parsed,
            ChairLabel::Labeled {
                label: "I".to_string(),
                docente: "Juan Pérez".to_string()
            }
        );
    }

    #[test]
    fn letter_label_and_multi_numeral_label() {
        let letter = split_chair_label("B- María Gómez");
        assert_eq!(letter.label(), "B");
        assert_eq!(letter.docente(), "María Gómez");

        let roman = split_chair_label("XIV  -  Ana López<br/>");
        assert_eq!(roman.label(), "XIV");
        assert_eq!(roman.docente(), "Ana López");
    }

    #[test]
    fn unlabeled_text_is_instructor() {
        let parsed = split_chair_label("Prof. Dr. Carlos Ruiz");
        assert_eq!(parsed, ChairLabel::Raw("Prof. Dr. Carlos Ruiz".to_string()));
        assert_eq!(parsed.label(), "");
    }

    #[test]
    fn leading_dash_is_dropped() {
        let parsed = split_chair_label("– II - Laura Díaz");
        assert_eq!(parsed.label(), "II");
        assert_eq!(parsed.docente(), "Laura Díaz");
    }

    #[test]
    fn oblig_tokens_classified() {
        assert_eq!(
            parse_oblig("IV - H"),
            vec![
                SectionRequirement { tipo: Tipo::Teo, label: "IV".to_string() },
                SectionRequirement { tipo: Tipo::Sem, label: "H".to_string() },
            ]
        );
        assert_eq!(parse_oblig(""), Vec::new());
        assert_eq!(parse_oblig(" - II -  "), vec![SectionRequirement {
            tipo: Tipo::Teo,
            label: "II".to_string()
        }]);
    }

    #[test]
    fn sede_from_room_code() {
        assert_eq!(extract_sede_from_aula("HY-014"), "HY");
        assert_eq!(extract_sede_from_aula("AnexoSI"), "AnexoSI");
        assert_eq!(extract_sede_from_aula("hy-014"), "hy-014");
        assert_eq!(extract_sede_from_aula(""), "");
    }
}
