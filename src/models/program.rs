use serde::Serialize;
use std::fmt;

/// Degree track offered by the faculty. Each one has its own tab on the catalog landing page.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub enum Program {
    PS,
    PR,
    LM,
    TE,
}

impl Program {
    pub const ALL: [Program; 4] = [Program::PS, Program::PR, Program::LM, Program::TE];

    pub fn code(&self) -> &'static str {
        match self {
            Program::PS => "PS",
            Program::PR => "PR",
            Program::LM => "LM",
            Program::TE => "TE",
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Program::PS => "Licenciatura en Psicología",
            Program::PR => "Profesorado en Psicología",
            Program::LM => "Licenciatura en Musicoterapia",
            Program::TE => "Licenciatura en Terapia Ocupacional",
        }
    }

    /// CSS selector of the tab container holding this program's chair table.
    pub fn tab_selector(&self) -> &'static str {
        match self {
            Program::PS => "#PS",
            Program::PR => "#PR",
            Program::LM => "#LM",
            Program::TE => "#TE",
        }
    }

}

impl fmt::Display for Program {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ProgramInfo {
    pub code: Program,
    pub name: String,
}

impl From<Program> for ProgramInfo {
    fn from(program: Program) -> Self {
        Self {
            code: program,
            name: program.name().to_string(),
        }
    }
}
