// src/noyau/aiguillage.rs
//
// Aiguillage : texte libre -> nombre à convertir, ou expression à évaluer.
//
// Ordre (il compte : "1010" validerait aussi comme expression dégénérée):
// 1. notation numérale explicite (préfixe, suffixe, N#v, base N v, décimal)
// 2. hex nu avec au moins une lettre a-f
// 3. binaire nu, octal nu
// 4. échec de validation => ambigu (on n’affiche rien)
// 5. sinon expression

use std::sync::OnceLock;

use log::debug;
use regex::Regex;

use super::bases::{convert_bases, parse_base_spec};
use super::erreurs::{CalcError, CalcResult};
use super::eval::{evaluate_with_trace, DemarcheNoyau};
use super::format::{build_number_results, format_f64, ResultItem};
use super::validation::validate_expression;

/// Au-delà, une sélection n’est pas analysée.
pub const MAX_SELECTION: usize = 200;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Classification {
    Numeral,
    Expression,
    Ambiguous,
}

/// Résultat complet d’une analyse : lignes à afficher + démarche.
#[derive(Clone, Debug, PartialEq)]
pub struct Analyse {
    pub classe: Classification,
    pub items: Vec<ResultItem>,
    pub resume: String,
    pub demarche: DemarcheNoyau,
}

fn motif_explicite() -> &'static Regex {
    static M: OnceLock<Regex> = OnceLock::new();
    M.get_or_init(|| {
        Regex::new(
            r"(?i)^\s*[+-]?(?:0x[0-9a-f_]+|0b[01_]+|0o[0-7_]+|[0-9][0-9_]*|[0-9a-f_]+h|[01_]+b|[0-7_]+o|[0-9]{1,2}#[0-9a-z_]+|base\s*[0-9]{1,2}\s+[0-9a-z_]+)\s*$",
        )
        .expect("motif explicite valide")
    })
}

fn motif_hex_nu() -> &'static Regex {
    static M: OnceLock<Regex> = OnceLock::new();
    M.get_or_init(|| Regex::new(r"(?i)^[+-]?[0-9a-f_]+$").expect("motif hex valide"))
}

fn motif_bin_nu() -> &'static Regex {
    static M: OnceLock<Regex> = OnceLock::new();
    M.get_or_init(|| Regex::new(r"^[+-]?[01_]+$").expect("motif bin valide"))
}

fn motif_oct_nu() -> &'static Regex {
    static M: OnceLock<Regex> = OnceLock::new();
    M.get_or_init(|| Regex::new(r"^[+-]?[0-7_]+$").expect("motif oct valide"))
}

fn est_numeral(s: &str) -> bool {
    motif_explicite().is_match(s)
        || (motif_hex_nu().is_match(s) && s.chars().any(|c| matches!(c, 'a'..='f' | 'A'..='F')))
        || motif_bin_nu().is_match(s)
        || motif_oct_nu().is_match(s)
}

/// Classe un texte libre (sélection, saisie en mode auto).
pub fn classify(texte: &str) -> Classification {
    let s = texte.trim();
    if s.is_empty() || s.chars().count() > MAX_SELECTION {
        return Classification::Ambiguous;
    }

    // "FF -> dec" : on juge la partie gauche
    let spec = parse_base_spec(s);
    let gauche = if spec.right.is_empty() { s } else { spec.left.as_str() };

    let classe = if est_numeral(gauche) {
        Classification::Numeral
    } else if !spec.right.is_empty() || validate_expression(s).is_err() {
        Classification::Ambiguous
    } else {
        Classification::Expression
    };
    debug!("classification {s:?}: {classe:?}");
    classe
}

/// Mode expression forcé (palette : “Expression”).
pub fn analyze_expression(texte: &str) -> CalcResult<Analyse> {
    let e = evaluate_with_trace(texte)?;
    Ok(Analyse {
        classe: Classification::Expression,
        items: build_number_results(e.valeur),
        resume: format!("Résultat : {}", format_f64(e.valeur)),
        demarche: e.demarche,
    })
}

/// Mode conversion forcé (palette : “Base Convert”).
pub fn analyze_conversion(texte: &str) -> CalcResult<Analyse> {
    let c = convert_bases(texte)?;
    let mut note = format!("Lu en base {}", c.numeral.base_source);
    if let Some(b) = c.numeral.base_cible {
        note.push_str(&format!(", rendu demandé en base {b}"));
    }
    Ok(Analyse {
        classe: Classification::Numeral,
        items: c.items(),
        resume: format!("Valeur : {}", c.dec),
        demarche: DemarcheNoyau {
            note,
            ..DemarcheNoyau::default()
        },
    })
}

/// Mode auto : classe puis lance le bon pipeline.
pub fn analyze(texte: &str) -> CalcResult<Analyse> {
    match classify(texte) {
        Classification::Numeral => analyze_conversion(texte),
        Classification::Expression => analyze_expression(texte),
        Classification::Ambiguous => {
            let s = texte.trim();
            if s.is_empty() {
                return Err(CalcError::EmptyInput);
            }
            if s.chars().count() > MAX_SELECTION {
                return Err(CalcError::UnrecognizedFormat("texte trop long".into()));
            }
            validate_expression(s)?;
            Err(CalcError::UnrecognizedFormat(s.to_string()))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use Classification::*;

    #[test]
    fn notations_explicites() {
        for s in ["0xff", "0b1010", "0o17", "255", "-42", "1_000", "1fh", "101b", "17o", "16#FF", "base2 1010"] {
            assert_eq!(classify(s), Numeral, "{s:?}");
        }
    }

    #[test]
    fn heuristiques_nues() {
        assert_eq!(classify("FF"), Numeral);
        assert_eq!(classify("deadBEEF"), Numeral);
        assert_eq!(classify("e"), Numeral); // hex nu, pas la constante
        assert_eq!(classify("-1_0"), Numeral);
    }

    #[test]
    fn fleches() {
        assert_eq!(classify("FF -> dec"), Numeral);
        assert_eq!(classify("1010 to hex"), Numeral);
        assert_eq!(classify("foo -> hex"), Ambiguous);
    }

    #[test]
    fn expressions() {
        for s in ["(2+3*4)/5", "sin(pi/6)", "0xff + 42", "2^10", "1.5", "pi"] {
            assert_eq!(classify(s), Expression, "{s:?}");
        }
    }

    #[test]
    fn ambigus() {
        assert_eq!(classify(""), Ambiguous);
        assert_eq!(classify("   "), Ambiguous);
        assert_eq!(classify("hello world"), Ambiguous);
        assert_eq!(classify("x + 1"), Ambiguous);
        assert_eq!(classify(&"1+".repeat(150)), Ambiguous);
    }

    #[test]
    fn analyse_auto() {
        let a = analyze("0xff + 42").unwrap();
        assert_eq!(a.classe, Expression);
        assert_eq!(a.items[0], ResultItem::new("297", "Dec"));
        assert_eq!(a.resume, "Résultat : 297");

        let a = analyze("FF -> dec").unwrap();
        assert_eq!(a.classe, Numeral);
        assert_eq!(a.items[0], ResultItem::new("255", "Base 10"));
        assert_eq!(a.items[1], ResultItem::new("0xFF", "Hex"));
        assert!(a.demarche.note.contains("base 16"));
    }

    #[test]
    fn analyse_ambigue() {
        assert_eq!(analyze(" "), Err(CalcError::EmptyInput));
        assert_eq!(analyze("x + 1"), Err(CalcError::UnknownIdentifier("x".into())));
        assert!(matches!(analyze("foo -> hex"), Err(CalcError::UnknownIdentifier(_))));
    }

    #[test]
    fn modes_forces() {
        // "10" en mode expression : un nombre décimal
        let a = analyze_expression("10").unwrap();
        assert_eq!(a.items.len(), 4);
        // "10" en mode conversion : idem, mais via BigInt
        let c = analyze_conversion("10").unwrap();
        assert_eq!(c.items[0], ResultItem::new("0xA", "Hex"));
        // un flottant n’est pas convertible
        assert!(matches!(
            analyze_conversion("1.5"),
            Err(CalcError::UnrecognizedFormat(_))
        ));
    }
}
