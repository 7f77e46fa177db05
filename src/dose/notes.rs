// dose/notes.rs
// Clinical notes shown under the dose result

use super::tables::{ActiveIngredient, DrugSalt, Vasoconstrictor};

pub fn drug_note(salt: DrugSalt) -> &'static str {
    match salt {
        DrugSalt::Lidocaina => {
            "Amida de referência: início rápido, duração intermediária, metabolismo hepático."
        }
        DrugSalt::Mepivacaina => {
            "Discreto efeito vasoconstritor próprio; a solução 3% sem vasoconstritor é opção quando a epinefrina é contraindicada."
        }
        DrugSalt::Prilocaina => {
            "Em doses elevadas pode causar metemoglobinemia; evitar em gestantes e em portadores de metemoglobinemia."
        }
        DrugSalt::Articaina => {
            "Anel tiofeno e grupo éster: boa difusão óssea e meia-vida curta por hidrólise plasmática."
        }
        DrugSalt::Bupivacaina => {
            "Longa duração, indicada para procedimentos extensos e dor pós-operatória; maior cardiotoxicidade."
        }
    }
}

pub fn vasoconstrictor_note(vaso: Option<Vasoconstrictor>) -> &'static str {
    match vaso.map(|v| v.ingredient()) {
        None => "Sem vasoconstritor: absorção sistêmica mais rápida e menor duração do efeito.",
        Some(ActiveIngredient::Epinephrine) => {
            "Epinefrina: máximo de 0,2 mg em pacientes saudáveis e 0,04 mg em cardiopatas (ASA III/IV)."
        }
        Some(ActiveIngredient::Norepinephrine) => {
            "Norepinefrina: ação alfa potente com risco de hipertensão e necrose tecidual; uso desaconselhado."
        }
        Some(ActiveIngredient::Phenylephrine) => {
            "Fenilefrina: agonista alfa-1, menos potente e de ação mais prolongada que a epinefrina."
        }
        Some(ActiveIngredient::Felypressin) => {
            "Felipressina: análogo da vasopressina sem ação adrenérgica; evitar em gestantes pela ação ocitócica."
        }
    }
}
