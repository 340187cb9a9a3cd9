//! Locally produced postcard descriptions.
//!
//! Used by the offline generator and by providers that have no text endpoint.
//! Picks go through an injectable seedable RNG so tests can pin them down.

use crate::prompts;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::sync::Mutex;

pub const DEMO_DESCRIPTIONS: &[&str] = &[
    "{{name}} es un/a {{profession}} excepcional que transforma cada desafío en una oportunidad brillante. Su dedicación y pasión inspiran a todo el equipo hacia la excelencia.",
    "En {{name}} encontramos la perfecta combinación de talento y determinación. Como {{profession}}, su trabajo marca la diferencia y eleva los estándares de calidad en cada proyecto.",
    "{{name}} demuestra día a día por qué {{profession}} es una profesión que vale oro. Su compromiso y expertise son fundamentales para el éxito de nuestra empresa.",
];

pub const PROVIDER_DESCRIPTIONS: &[&str] = &[
    "{{name}} es un/a {{profession}} excepcional que transforma cada proyecto en una obra maestra. Su dedicación y talento son la base del éxito de nuestro equipo.",
    "En {{name}} encontramos la perfecta fusión de pasión y expertise como {{profession}}. Su trabajo marca la diferencia y demuestra por qué esta profesión vale tanto.",
    "{{name}} representa la excelencia en {{profession}}. Cada día demuestra que su compromiso y visión son fundamentales para alcanzar nuevas alturas en la empresa.",
    "La contribución de {{name}} como {{profession}} es invaluable. Su liderazgo y dedicación inspiran a todo el equipo hacia la innovación y el crecimiento.",
    "{{name}} encarna la excelencia como {{profession}}. Su enfoque único y determinación convierten cada desafío en una oportunidad de brillar.",
];

pub struct DescriptionPicker {
    rng: Mutex<StdRng>,
}

impl DescriptionPicker {
    /// Seeded picker when `seed` is set, entropy-backed otherwise.
    pub fn new(seed: Option<u64>) -> Self {
        let rng = match seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        Self {
            rng: Mutex::new(rng),
        }
    }

    /// Render a uniformly chosen template for this person.
    pub fn pick(&self, templates: &[&str], name: &str, profession: &str) -> String {
        let index = {
            // A poisoned lock still holds a usable RNG.
            let mut rng = self.rng.lock().unwrap_or_else(|e| e.into_inner());
            rng.gen_range(0..templates.len().max(1))
        };
        let template = templates.get(index).copied().unwrap_or(DEMO_DESCRIPTIONS[0]);
        prompts::render(template, &[("name", name), ("profession", profession)])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_every_template_names_the_person() {
        for template in DEMO_DESCRIPTIONS.iter().chain(PROVIDER_DESCRIPTIONS) {
            assert!(template.contains("{{name}}"));
            assert!(template.contains("{{profession}}"));
        }
    }

    #[test]
    fn test_same_seed_same_picks() {
        let a = DescriptionPicker::new(Some(7));
        let b = DescriptionPicker::new(Some(7));
        for _ in 0..10 {
            assert_eq!(
                a.pick(PROVIDER_DESCRIPTIONS, "Ada", "Engineer"),
                b.pick(PROVIDER_DESCRIPTIONS, "Ada", "Engineer")
            );
        }
    }

    #[test]
    fn test_pick_renders_placeholders() {
        let picker = DescriptionPicker::new(None);
        let text = picker.pick(DEMO_DESCRIPTIONS, "Grace Hopper", "Almirante");
        assert!(text.contains("Grace Hopper"));
        assert!(text.contains("Almirante"));
        assert!(!text.contains("{{"));
    }

    #[test]
    fn test_seeded_picker_eventually_varies() {
        let picker = DescriptionPicker::new(Some(42));
        let picks: std::collections::HashSet<String> = (0..50)
            .map(|_| picker.pick(DEMO_DESCRIPTIONS, "Ada", "Engineer"))
            .collect();
        assert!(picks.len() > 1);
    }
}
