//! Noyau : évaluation (pipeline réel)
//!
//! validation -> jetons -> RPN -> f64
//!
//! En deux temps, jamais plus :
//! 1. tentative stricte sur le texte tel quel ;
//! 2. si elle échoue, UNE normalisation (nombres à zéro initial promus en
//!    hexadécimal : `0ff` -> `0xff`) puis une seule nouvelle tentative.
//!
//! La validation n’est jamais rejouée : un échec de validation est définitif.

use std::sync::OnceLock;

use log::debug;
use regex::{Captures, Regex};

use super::erreurs::{CalcError, CalcResult};
use super::jetons::{format_tokens, tokenize};
use super::rpn::{eval_rpn, format_rpn, to_rpn};
use super::validation::validate_expression;

#[derive(Default, Clone, Debug, PartialEq)]
pub struct DemarcheNoyau {
    pub jetons: String,
    pub rpn: String,
    pub note: String,
}

#[derive(Clone, Debug, PartialEq)]
pub struct Evaluation {
    pub valeur: f64,
    pub demarche: DemarcheNoyau,
}

/// API publique : valeur d’une expression sûre.
///
/// Échecs : `EmptyInput`, `UnsafeCharacter`, `UnknownIdentifier` (validation),
/// `InvalidExpression` (évaluation, après la reprise éventuelle).
pub fn evaluate_expression(texte: &str) -> CalcResult<f64> {
    evaluate_with_trace(texte).map(|e| e.valeur)
}

/// Comme [`evaluate_expression`], avec la démarche (jetons, RPN, reprise).
pub fn evaluate_with_trace(texte: &str) -> CalcResult<Evaluation> {
    validate_expression(texte)?;

    let erreur = match evaluer_strict(texte) {
        Ok(e) => return Ok(e),
        Err(e) => e,
    };

    let promu = promote_leading_zero_numbers(texte);
    if promu == texte {
        return Err(en_invalide(erreur));
    }

    debug!("reprise zéro initial: {texte:?} -> {promu:?}");
    match evaluer_strict(&promu) {
        Ok(mut e) => {
            e.demarche.note = format!("Reprise : {} → {}", texte.trim(), promu.trim());
            Ok(e)
        }
        Err(_) => Err(en_invalide(erreur)),
    }
}

fn evaluer_strict(texte: &str) -> CalcResult<Evaluation> {
    let jetons = tokenize(texte)?;
    let rpn = to_rpn(&jetons)?;
    let valeur = eval_rpn(&rpn)?;

    Ok(Evaluation {
        valeur,
        demarche: DemarcheNoyau {
            jetons: format_tokens(&jetons),
            rpn: format_rpn(&rpn),
            note: String::new(),
        },
    })
}

fn en_invalide(e: CalcError) -> CalcError {
    match e {
        CalcError::InvalidExpression(_) => e,
        autre => CalcError::InvalidExpression(autre.to_string()),
    }
}

fn motif_zero_initial() -> &'static Regex {
    static MOTIF: OnceLock<Regex> = OnceLock::new();
    MOTIF.get_or_init(|| Regex::new(r"\b0[0-9a-fA-F_]{2,}\b").expect("motif zéro initial valide"))
}

/// `0` suivi d’au moins deux chiffres hex (ou `_`), hors zéros purs,
/// réécrit en `0x...` (sans les `_`). Texte inchangé si rien ne correspond.
///
/// Seuls les jetons nus sont promus : pas les décimales (`1.001`), pas un
/// binaire préfixé valide (`0b1010`).
pub fn promote_leading_zero_numbers(texte: &str) -> String {
    motif_zero_initial()
        .replace_all(texte, |c: &Captures| {
            let m = &c[0];
            let debut = c.get(0).map_or(0, |g| g.start());
            let apres_point = texte[..debut].ends_with('.');
            if apres_point || est_binaire_prefixe(m) || m.chars().all(|ch| ch == '0') {
                m.to_string()
            } else {
                format!("0x{}", m.replace('_', ""))
            }
        })
        .into_owned()
}

fn est_binaire_prefixe(m: &str) -> bool {
    match m.strip_prefix("0b").or_else(|| m.strip_prefix("0B")) {
        Some(corps) => corps.chars().all(|c| matches!(c, '0' | '1' | '_')),
        None => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ok(s: &str) -> f64 {
        evaluate_expression(s).unwrap_or_else(|e| panic!("evaluate_expression({s:?}) erreur: {e}"))
    }

    fn proche(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    #[test]
    fn cas_de_reference() {
        assert_eq!(ok("(2+3*4)/5"), 2.8);
        assert!(proche(ok("sin(pi/6)"), 0.5));
        assert_eq!(ok("0xff + 42"), 297.0);
        assert_eq!(ok("2^10"), 1024.0);
        assert!(proche(ok("log(e)"), 1.0));
    }

    #[test]
    fn constantes_doublees() {
        assert_eq!(ok("PI"), ok("pi"));
        assert_eq!(ok("E"), ok("e"));
        assert!(proche(ok("ln(E)"), 1.0));
    }

    #[test]
    fn reprise_zero_initial() {
        assert_eq!(ok("0ff"), 255.0);
        assert_eq!(ok("0ff + 1"), 256.0);
        assert_eq!(ok("0123"), 291.0);
        assert_eq!(ok("0_1f * 2"), 62.0);

        let e = evaluate_with_trace("0ff").unwrap();
        assert!(e.demarche.note.contains("0xff"), "note: {:?}", e.demarche.note);
    }

    #[test]
    fn zeros_purs_non_promus() {
        assert_eq!(promote_leading_zero_numbers("000 + 1"), "000 + 1");
        assert!(matches!(
            evaluate_expression("000 + 1"),
            Err(CalcError::InvalidExpression(_))
        ));
    }

    #[test]
    fn promotion() {
        assert_eq!(promote_leading_zero_numbers("0ff+0_a_b"), "0xff+0xab");
        assert_eq!(promote_leading_zero_numbers("0f + 10"), "0f + 10");
        assert_eq!(promote_leading_zero_numbers("0x1f"), "0x1f");
        // jetons non nus : laissés tels quels
        assert_eq!(promote_leading_zero_numbers("0b1010 + 007"), "0b1010 + 0x007");
        assert_eq!(promote_leading_zero_numbers("0ff + 1.001"), "0xff + 1.001");
        // 0b suivi de chiffres hex : c’est un nu à zéro initial
        assert_eq!(promote_leading_zero_numbers("0b1f"), "0x0b1f");
    }

    #[test]
    fn reprise_sans_toucher_aux_litteraux_valides() {
        assert_eq!(ok("0b1010 + 007"), 17.0);
        assert!(proche(ok("0ff + 1.001"), 256.001));
        assert_eq!(ok("0ff + 0.5"), 255.5);
    }

    #[test]
    fn pas_de_reprise_sur_validation() {
        assert_eq!(
            evaluate_expression("0ff + foo"),
            Err(CalcError::UnknownIdentifier("foo".into()))
        );
        assert_eq!(evaluate_expression("1;2"), Err(CalcError::UnsafeCharacter(';')));
        assert_eq!(evaluate_expression("  "), Err(CalcError::EmptyInput));
    }

    #[test]
    fn echec_garde_erreur_d_origine() {
        // reprise tentée (012 -> 0x12) mais l’expression reste cassée
        let e = evaluate_expression("012 +").unwrap_err();
        assert!(matches!(e, CalcError::InvalidExpression(ref m) if m.contains("zéro initial")), "{e:?}");

        // rien à promouvoir : erreur d’origine
        assert!(matches!(evaluate_expression("(1"), Err(CalcError::InvalidExpression(_))));
    }

    #[test]
    fn identifiant_colle_chiffres() {
        // la validation voit "atan" (le 3 est retiré), l’évaluation refuse
        assert!(matches!(
            evaluate_expression("atan3(1)"),
            Err(CalcError::InvalidExpression(_))
        ));
    }

    #[test]
    fn demarche_stricte() {
        let e = evaluate_with_trace("max(1, 2) * pi").unwrap();
        assert_eq!(e.demarche.jetons, "max ( 1 , 2 ) * pi");
        assert_eq!(e.demarche.rpn, "1 2 max/2 pi *");
        assert!(e.demarche.note.is_empty());
    }
}
