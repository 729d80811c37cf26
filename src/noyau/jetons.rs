// src/noyau/jetons.rs

use num_bigint::BigInt;
use num_traits::ToPrimitive;

use super::erreurs::{CalcError, CalcResult};
use super::identifiants::Primitive;

#[derive(Clone, Debug, PartialEq)]
pub enum Tok {
    Num(f64),

    // Constante (pi, e) ou fonction de la table fermée
    Ident(Primitive),

    Plus,
    Minus,
    Star,
    Slash,
    Percent,
    Caret, // ^ ou **

    Comma,
    LPar,
    RPar,
}

/// Tokenize une expression.
/// Supporte:
/// - décimaux: 12, 1.5, .5, 1e3, 2.5E-2, 1_000
/// - entiers préfixés: 0x.., 0b.., 0o.. (insensible à la casse)
/// - opérateurs + - * / % ^ ** , ( )
/// - identifiants de la table (sensible à la casse)
///
/// Refuse (erreur, et c’est voulu pour la reprise “zéro initial”):
/// - un littéral à zéro initial (012)
/// - un littéral collé à une lettre ou un chiffre (0ff, 12abc)
pub fn tokenize(s: &str) -> CalcResult<Vec<Tok>> {
    let mut out = Vec::new();
    let chars: Vec<char> = s.chars().collect();
    let mut i: usize = 0;

    while i < chars.len() {
        let c = chars[i];

        if c.is_whitespace() {
            i += 1;
            continue;
        }

        let simple = match c {
            '(' => Some(Tok::LPar),
            ')' => Some(Tok::RPar),
            ',' => Some(Tok::Comma),
            '+' => Some(Tok::Plus),
            '-' => Some(Tok::Minus),
            '/' => Some(Tok::Slash),
            '%' => Some(Tok::Percent),
            '^' => Some(Tok::Caret),
            _ => None,
        };
        if let Some(t) = simple {
            out.push(t);
            i += 1;
            continue;
        }

        // * ou **
        if c == '*' {
            if chars.get(i + 1) == Some(&'*') {
                out.push(Tok::Caret);
                i += 2;
            } else {
                out.push(Tok::Star);
                i += 1;
            }
            continue;
        }

        // Identifiants ASCII : [a-zA-Z_][a-zA-Z0-9_]*
        if c.is_ascii_alphabetic() || c == '_' {
            let start = i;
            i += 1;
            while i < chars.len() && (chars[i].is_ascii_alphanumeric() || chars[i] == '_') {
                i += 1;
            }
            let word: String = chars[start..i].iter().collect();
            let p = Primitive::depuis_nom(&word).ok_or(CalcError::UnknownIdentifier(word))?;
            out.push(Tok::Ident(p));
            continue;
        }

        // Nombres
        let debut_point = c == '.' && chars.get(i + 1).is_some_and(|d| d.is_ascii_digit());
        if c.is_ascii_digit() || debut_point {
            let debut = i;
            let (v, fin) = lire_nombre(&chars, i)?;
            i = fin;

            // rien de “collé” derrière un littéral
            if let Some(&n) = chars.get(i) {
                if n.is_ascii_alphanumeric() || n == '_' || n == '.' {
                    let lit: String = chars[debut..=i].iter().collect();
                    return Err(CalcError::invalide(format!(
                        "littéral numérique mal formé près de {lit:?}"
                    )));
                }
            }

            out.push(Tok::Num(v));
            continue;
        }

        return Err(CalcError::invalide(format!("caractère inattendu: '{c}'")));
    }

    Ok(out)
}

fn radix_prefixe(c: char) -> Option<u32> {
    match c {
        'x' | 'X' => Some(16),
        'b' | 'B' => Some(2),
        'o' | 'O' => Some(8),
        _ => None,
    }
}

/// Lit un littéral à partir de `i`; renvoie (valeur, position après le littéral).
fn lire_nombre(chars: &[char], mut i: usize) -> CalcResult<(f64, usize)> {
    let start = i;

    // 0x / 0b / 0o
    if chars[i] == '0' {
        if let Some(radix) = chars.get(i + 1).copied().and_then(radix_prefixe) {
            i += 2;
            let debut_corps = i;
            while i < chars.len() && (chars[i].is_ascii_alphanumeric() || chars[i] == '_') {
                i += 1;
            }
            let corps: String = chars[debut_corps..i].iter().filter(|c| **c != '_').collect();
            let brut: String = chars[start..i].iter().collect();
            let v = BigInt::parse_bytes(corps.as_bytes(), radix)
                .filter(|_| !corps.is_empty())
                .ok_or_else(|| CalcError::invalide(format!("littéral invalide: {brut}")))?;
            let f = v
                .to_f64()
                .ok_or_else(|| CalcError::invalide(format!("littéral trop grand: {brut}")))?;
            return Ok((f, i));
        }
    }

    // partie entière
    i = lire_chiffres(chars, i)?;
    let entiere: String = chars[start..i].iter().filter(|c| **c != '_').collect();
    if entiere.len() > 1 && entiere.starts_with('0') {
        return Err(CalcError::invalide(format!(
            "littéral à zéro initial: {entiere}"
        )));
    }

    // partie fractionnaire
    if i < chars.len() && chars[i] == '.' {
        i = lire_chiffres(chars, i + 1)?;
    }

    // exposant : seulement si un chiffre suit (sinon “e” reste collé => erreur)
    if i < chars.len() && (chars[i] == 'e' || chars[i] == 'E') {
        let mut j = i + 1;
        if j < chars.len() && (chars[j] == '+' || chars[j] == '-') {
            j += 1;
        }
        if j < chars.len() && chars[j].is_ascii_digit() {
            i = j;
            while i < chars.len() && chars[i].is_ascii_digit() {
                i += 1;
            }
        }
    }

    let txt: String = chars[start..i].iter().filter(|c| **c != '_').collect();
    let v = txt
        .parse::<f64>()
        .map_err(|_| CalcError::invalide(format!("nombre invalide: {txt}")))?;
    Ok((v, i))
}

/// Chiffres décimaux; `_` seulement entre deux chiffres (1_000, pas 1_ ni 1__0).
fn lire_chiffres(chars: &[char], mut i: usize) -> CalcResult<usize> {
    while i < chars.len() {
        match chars[i] {
            c if c.is_ascii_digit() => i += 1,
            '_' => {
                let avant = i > 0 && chars[i - 1].is_ascii_digit();
                let apres = chars.get(i + 1).is_some_and(|c| c.is_ascii_digit());
                if !(avant && apres) {
                    return Err(CalcError::invalide("séparateur '_' mal placé"));
                }
                i += 1;
            }
            _ => break,
        }
    }
    Ok(i)
}

/// Format utilitaire (démarche) : liste de jetons en texte.
pub fn format_tokens(tokens: &[Tok]) -> String {
    let mut out = Vec::new();
    for t in tokens {
        let s = match t {
            Tok::Num(v) => format!("{v}"),
            Tok::Ident(p) => p.nom().to_string(),

            Tok::Plus => "+".to_string(),
            Tok::Minus => "-".to_string(),
            Tok::Star => "*".to_string(),
            Tok::Slash => "/".to_string(),
            Tok::Percent => "%".to_string(),
            Tok::Caret => "^".to_string(),

            Tok::Comma => ",".to_string(),
            Tok::LPar => "(".to_string(),
            Tok::RPar => ")".to_string(),
        };
        out.push(s);
    }
    out.join(" ")
}
