use serde::Serialize;

/// Physical campus where meetings take place.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Sede {
    pub id: &'static str,
    pub name: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub address: Option<&'static str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub lat: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub lng: Option<f64>,
}

// Fixed reference table; room codes carry these ids as their two-letter prefix.
pub const SEDES: &[Sede] = &[
    Sede {
        id: "HY",
        name: "Sede Hipólito Yrigoyen",
        address: Some("Hipólito Yrigoyen 3242, CABA"),
        lat: None,
        lng: None,
    },
    Sede {
        id: "IN",
        name: "Sede Independencia",
        address: Some("Av. Independencia 3065, CABA"),
        lat: None,
        lng: None,
    },
    Sede {
        id: "SI",
        name: "Sede San Isidro",
        address: None,
        lat: None,
        lng: None,
    },
    Sede {
        id: "AV",
        name: "Sede Avellaneda",
        address: None,
        lat: None,
        lng: None,
    },
    Sede {
        id: "EC",
        name: "Sede Extensión Cultural",
        address: None,
        lat: None,
        lng: None,
    },
];

pub fn find_sede(id: &str) -> Option<&'static Sede> {
    SEDES.iter().find(|sede| sede.id == id)
}
