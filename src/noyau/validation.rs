// src/noyau/validation.rs
//
// Filtre d’entrée de l’évaluateur (liste blanche).
// Ce n’est PAS un parseur : la sûreté réelle vient de la grammaire restreinte
// (jetons.rs + rpn.rs). Ici on refuse tôt, avec un message clair.

use std::borrow::Cow;
use std::sync::OnceLock;

use log::trace;
use regex::Regex;

use super::erreurs::{CalcError, CalcResult};
use super::identifiants::Primitive;

/// Caractères refusés d’emblée.
const CARACTERES_INTERDITS: [char; 5] = ['"', '\'', '`', '\\', ';'];

/// Motifs numéraux, appliqués dans cet ordre (gauche à droite, tout le texte).
/// Les formes suffixées exigent un chiffre initial : sinon un mot comme
/// "each" passerait pour un hexadécimal suffixé.
const MOTIFS_NUMERAUX: [&str; 10] = [
    r"(?i)[+-]?\s*0x[0-9a-f_]+",
    r"(?i)[+-]?\s*0b[01_]+",
    r"(?i)[+-]?\s*0o[0-7_]+",
    r"(?i)[+-]?\s*\b[0-9][0-9a-f_]*h\b",
    r"(?i)\b0[0-9a-f_]+\b",
    r"(?i)[+-]?\s*\b[01][01_]*b\b",
    r"(?i)[+-]?\s*\b[0-7][0-7_]*o\b",
    r"(?i)[+-]?\s*[0-9]{1,2}\s*#\s*[0-9a-z_]+",
    r"(?i)[+-]?\s*base\s*[0-9]{1,2}\s+[0-9a-z_]+",
    r"[+-]?\s*[0-9][0-9_]*(?:\.[0-9][0-9_]*)?",
];

fn motifs_numeraux() -> &'static [Regex] {
    static MOTIFS: OnceLock<Vec<Regex>> = OnceLock::new();
    MOTIFS.get_or_init(|| {
        MOTIFS_NUMERAUX
            .iter()
            .map(|src| Regex::new(src).expect("motif numéral valide"))
            .collect()
    })
}

fn motif_mot() -> &'static Regex {
    static MOT: OnceLock<Regex> = OnceLock::new();
    MOT.get_or_init(|| Regex::new(r"[A-Za-z_]+").expect("motif mot valide"))
}

/// Remplace chaque jeton numéral par "0", pour que les lettres incluses
/// dans un nombre (ff de 0xff, suffixe h/b/o…) ne passent pas pour des mots.
pub fn strip_numeric_tokens(texte: &str) -> String {
    let mut s = texte.to_string();
    for re in motifs_numeraux() {
        if let Cow::Owned(remplace) = re.replace_all(&s, "0") {
            s = remplace;
        }
    }
    s
}

/// Valide une expression avant évaluation.
///
/// - `EmptyInput` : vide ou seulement des espaces
/// - `UnsafeCharacter` : guillemet, apostrophe, backtick, backslash, point-virgule
/// - `UnknownIdentifier` : mot hors de la table, une fois les nombres retirés
pub fn validate_expression(texte: &str) -> CalcResult<()> {
    if texte.trim().is_empty() {
        return Err(CalcError::EmptyInput);
    }
    if let Some(c) = texte.chars().find(|c| CARACTERES_INTERDITS.contains(c)) {
        return Err(CalcError::UnsafeCharacter(c));
    }

    let nettoye = strip_numeric_tokens(texte);
    trace!("validation: {texte:?} -> {nettoye:?}");

    for m in motif_mot().find_iter(&nettoye) {
        if Primitive::depuis_nom(m.as_str()).is_none() {
            return Err(CalcError::UnknownIdentifier(m.as_str().to_string()));
        }
    }
    Ok(())
}

/// Forme “champ de saisie” : None si valide, sinon le message à afficher.
pub fn validation_message(texte: &str) -> Option<String> {
    validate_expression(texte).err().map(|e| e.to_string())
}
