//! Profession catalog and the visual scenario used inside the image prompt.

use crate::models::ProfessionConfig;

struct CatalogEntry {
    id: &'static str,
    label: &'static str,
    scenario: &'static str,
}

/// Id of the catalog entry the form uses for free-text professions.
pub const CUSTOM_PROFESSION_ID: &str = "Personalizada";

const CATALOG: &[CatalogEntry] = &[
    CatalogEntry {
        id: "Líder de Proyectos",
        label: "Líder de Proyectos",
        scenario: "orquestando un equipo de hologramas, diagramas de Gantt flotantes, en un centro de comando futurista",
    },
    CatalogEntry {
        id: "Especialista en Marketing",
        label: "Especialista en Marketing",
        scenario: "creando campañas de luz, con gráficos virales y vallas publicitarias holográficas en una ciber-ciudad",
    },
    CatalogEntry {
        id: "Analista de Datos",
        label: "Analista de Datos",
        scenario: "navegando por un mar tridimensional de datos, con insights luminosos y dashboards holográficos",
    },
    CatalogEntry {
        id: "Desarrollador de Software",
        label: "Desarrollador de Software",
        scenario: "escribiendo código que se materializa como estructuras de neón, en un entorno de realidad virtual",
    },
    CatalogEntry {
        id: "Diseñador UX/UI",
        label: "Diseñador UX/UI",
        scenario: "moldeando interfaces de usuario fluidas en el aire, con paletas de colores flotantes y prototipos interactivos",
    },
    CatalogEntry {
        id: "Recursos Humanos",
        label: "Recursos Humanos",
        scenario: "conectando redes neuronales de talento, en un jardín zen corporativo con árboles de datos",
    },
    CatalogEntry {
        id: "Finanzas y Contabilidad",
        label: "Finanzas y Contabilidad",
        scenario: "protegiendo una bóveda de datos financieros con escudos de energía, rodeado de gráficos dorados ascendentes",
    },
    CatalogEntry {
        id: "Soporte Técnico",
        label: "Soporte Técnico",
        scenario: "reparando un núcleo de servidor con herramientas de luz, en una sala de servidores de alta tecnología",
    },
    CatalogEntry {
        id: "Ventas y Comercial",
        label: "Ventas y Comercial",
        scenario: "cerrando un trato con un apretón de manos de energía, sobre un mapa holográfico de la ciudad",
    },
    CatalogEntry {
        id: CUSTOM_PROFESSION_ID,
        label: CUSTOM_PROFESSION_ID,
        scenario: "entorno épico y majestuoso, elementos únicos de poder, iluminación dramática",
    },
];

// First match wins; keep the order.
const KEYWORD_RULES: &[(&[&str], &str)] = &[
    (
        &["program", "code", "código", "codig", "software", "desarroll", "developer"],
        "rodeado de código digital flotante y circuitos de neón, en un núcleo tecnológico futurista",
    ),
    (
        &["art", "paint", "pint", "ilustr"],
        "en un estudio artístico épico, con pinceladas de luz y lienzos que cobran vida",
    ),
    (
        &["médic", "medic", "doctor", "enfermer", "nurse", "salud"],
        "con armadura sanitaria luminosa, en un hospital futurista lleno de hologramas de sanación",
    ),
    (
        &["ingenier", "engineer"],
        "con exoesqueleto tecnológico, entre engranajes gigantes y planos holográficos",
    ),
    (
        &["docente", "profesor", "maestr", "teacher"],
        "ante un aula infinita de mentes brillantes, con conocimiento que fluye como constelaciones",
    ),
    (
        &["chef", "cocin", "cook"],
        "en una cocina legendaria, con llamas danzantes y utensilios que brillan como armas épicas",
    ),
    (
        &["músic", "music"],
        "sobre un escenario colosal, con ondas sonoras visibles y notas musicales de fuego",
    ),
    (
        &["abogad", "lawyer", "legal", "jurist"],
        "en un tribunal monumental, sosteniendo la balanza de la justicia que irradia luz",
    ),
    (
        &["arquitect", "architect"],
        "sobre una ciudad de rascacielos imposibles que se levantan al ritmo de sus planos",
    ),
    (
        &["emprend", "entrepreneur", "founder", "fundador"],
        "en la cima de un rascacielos al amanecer, con una ciudad de oportunidades a sus pies",
    ),
    (
        &["diseñ", "design"],
        "moldeando formas y colores en el aire, en un taller creativo suspendido entre nubes",
    ),
];

const GENERIC_SCENARIO: &str =
    "entorno majestuoso y poderoso, elementos únicos de grandeza, iluminación épica cinematográfica";

/// Ids of every catalog entry, in display order.
pub fn catalog_ids() -> impl Iterator<Item = &'static str> {
    CATALOG.iter().map(|entry| entry.id)
}

/// Resolve the scenario for a profession.
///
/// Catalog hits are returned as-is. Anything else, including the catalog's
/// custom entry, gets a synthesized config whose id and label are the input.
pub fn scenario_for(profession: &str) -> ProfessionConfig {
    if let Some(entry) = CATALOG
        .iter()
        .find(|entry| entry.id == profession && entry.id != CUSTOM_PROFESSION_ID)
    {
        return ProfessionConfig {
            id: entry.id.to_string(),
            label: entry.label.to_string(),
            scenario: entry.scenario.to_string(),
        };
    }

    ProfessionConfig {
        id: profession.to_string(),
        label: profession.to_string(),
        scenario: keyword_scenario(profession).to_string(),
    }
}

fn keyword_scenario(profession: &str) -> &'static str {
    let folded = profession.to_lowercase();
    KEYWORD_RULES
        .iter()
        .find(|(keywords, _)| keywords.iter().any(|k| folded.contains(k)))
        .map(|(_, scenario)| *scenario)
        .unwrap_or(GENERIC_SCENARIO)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_catalog_hit_returns_entry() {
        let config = scenario_for("Analista de Datos");
        assert_eq!(config.id, "Analista de Datos");
        assert_eq!(config.label, "Analista de Datos");
        assert!(config.scenario.contains("dashboards holográficos"));
    }

    #[test]
    fn test_unknown_profession_gets_generic_scenario() {
        let config = scenario_for("Astronauta");
        assert_eq!(config.id, "Astronauta");
        assert_eq!(config.label, "Astronauta");
        assert!(config.scenario.contains("majestuoso"));
    }

    #[test]
    fn test_custom_entry_is_treated_as_a_miss() {
        let config = scenario_for(CUSTOM_PROFESSION_ID);
        assert_eq!(config.scenario, GENERIC_SCENARIO);
    }

    #[test]
    fn test_programming_keywords() {
        assert!(scenario_for("Programador Frontend")
            .scenario
            .contains("código digital"));
        assert!(scenario_for("CODE reviewer").scenario.contains("código digital"));
    }

    #[test]
    fn test_art_keywords() {
        assert!(scenario_for("Artista Digital")
            .scenario
            .contains("estudio artístico"));
        assert!(scenario_for("Painter").scenario.contains("estudio artístico"));
    }

    #[test]
    fn test_first_matching_rule_wins() {
        // Matches both the programming and the art rules.
        let config = scenario_for("Programming Artist");
        assert!(config.scenario.contains("código digital"));

        // Matches both the programming and the engineering rules.
        let config = scenario_for("Software Engineer");
        assert!(config.scenario.contains("código digital"));
    }

    #[test]
    fn test_case_folding_handles_accents() {
        assert!(scenario_for("MÉDICO").scenario.contains("armadura sanitaria"));
        assert!(scenario_for("Engineer").scenario.contains("exoesqueleto"));
    }

    #[test]
    fn test_scenario_is_total() {
        for input in ["", " ", "🦀", "Ingeniero", "Docente", "zzz", "Chef", "Líder de Proyectos"] {
            assert!(!scenario_for(input).scenario.trim().is_empty(), "{input:?}");
        }
    }

    #[test]
    fn test_catalog_scenarios_are_unique_and_substantial() {
        let scenarios: Vec<&str> = CATALOG.iter().map(|e| e.scenario).collect();
        let unique: HashSet<&str> = scenarios.iter().copied().collect();
        assert_eq!(unique.len(), scenarios.len());
        assert!(scenarios.iter().all(|s| s.len() > 10));
        assert!(catalog_ids().any(|id| id == CUSTOM_PROFESSION_ID));
    }
}
