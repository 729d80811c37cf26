// src/noyau/bases.rs
//
// Convertisseur de bases (entiers exacts, BigInt).
//
// Grammaire, par priorité (la première qui correspond gagne):
// 1. N#valeur          (16#FF)
// 2. base N valeur     (base2 1010)
// 3. détection auto    (signe, '_' ignorés) :
//    0+chiffres décimaux => hex (convention héritée), 0x/0b/0o, suffixes h/b/o,
//    décimal pur, puis hex “nu” contenant au moins une lettre a-f.
//
// L’ordre est volontaire et doit rester tel quel : "777" est décimal, "0777" est hex.

use std::sync::OnceLock;

use log::debug;
use num_bigint::BigInt;
use num_traits::Signed;
use regex::Regex;

use super::erreurs::{CalcError, CalcResult};
use super::format::ResultItem;

pub const BASE_MIN: u32 = 2;
pub const BASE_MAX: u32 = 36;

/// Découpage "valeur -> cible" (ou "valeur to cible").
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BaseSpec {
    pub left: String,
    pub right: String,
}

/// Entier lu + provenance.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Numeral {
    pub valeur: BigInt,
    pub base_source: u32,
    pub base_cible: Option<u32>,
}

/// Les quatre rendus canoniques (+ rendu dans la base cible si demandée).
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Conversion {
    pub hex: String,
    pub dec: String,
    pub bin: String,
    pub oct: String,
    pub first: Option<String>,
    pub numeral: Numeral,
}

impl Conversion {
    /// Liste ordonnée pour l’affichage : [cible], Hex, Dec, Bin, Oct.
    pub fn items(&self) -> Vec<ResultItem> {
        let mut out = Vec::with_capacity(5);
        if let (Some(first), Some(b)) = (&self.first, self.numeral.base_cible) {
            out.push(ResultItem::new(first.clone(), format!("Base {b}")));
        }
        out.push(ResultItem::new(self.hex.clone(), "Hex"));
        out.push(ResultItem::new(self.dec.clone(), "Dec"));
        out.push(ResultItem::new(self.bin.clone(), "Bin"));
        out.push(ResultItem::new(self.oct.clone(), "Oct"));
        out
    }
}

/* ------------------------ Motifs (compilés une fois) ------------------------ */

fn motif_fleche() -> &'static Regex {
    static M: OnceLock<Regex> = OnceLock::new();
    M.get_or_init(|| Regex::new(r"(?is)^(.*?)(?:->|\s+to\s+)(.*)$").expect("motif flèche valide"))
}

fn motif_diese() -> &'static Regex {
    static M: OnceLock<Regex> = OnceLock::new();
    M.get_or_init(|| {
        Regex::new(r"^\s*([0-9]{1,2})\s*#\s*([-+]?[0-9a-zA-Z_]+)\s*$").expect("motif # valide")
    })
}

fn motif_base_mot() -> &'static Regex {
    static M: OnceLock<Regex> = OnceLock::new();
    M.get_or_init(|| {
        Regex::new(r"(?i)^\s*base\s*([0-9]{1,2})\s+([-+]?[0-9a-zA-Z_]+)\s*$")
            .expect("motif base valide")
    })
}

/* ------------------------ Découpage + tag cible ------------------------ */

/// Coupe sur la première flèche `->` ou le mot `to` (entouré d’espaces).
pub fn parse_base_spec(s: &str) -> BaseSpec {
    let s = s.trim();
    match motif_fleche().captures(s) {
        Some(c) => BaseSpec {
            left: c[1].trim().to_string(),
            right: c[2].trim().to_string(),
        },
        None => BaseSpec {
            left: s.to_string(),
            right: String::new(),
        },
    }
}

/// hex/dec/bin/oct, leurs préfixes, ou un entier littéral dans [2, 36].
pub fn detect_base_from_tag(tag: &str) -> Option<u32> {
    let t = tag.trim().to_lowercase();
    match t.as_str() {
        "hex" | "16" | "0x" => return Some(16),
        "dec" | "10" => return Some(10),
        "bin" | "2" | "0b" => return Some(2),
        "oct" | "8" | "0o" | "0" => return Some(8),
        _ => {}
    }
    // chiffres de tête seulement ("12abc" => 12)
    let tete: String = t.chars().take_while(|c| c.is_ascii_digit()).collect();
    tete.parse::<u32>()
        .ok()
        .filter(|b| (BASE_MIN..=BASE_MAX).contains(b))
}

pub fn clamp_base(b: u32) -> u32 {
    b.clamp(BASE_MIN, BASE_MAX)
}

/* ------------------------ Lecture ------------------------ */

/// Chiffres (sans signe) dans une base donnée, alphabet 0-9a-z insensible à la casse.
fn parse_digits(corps: &str, base: u32) -> CalcResult<BigInt> {
    let corps: String = corps.chars().filter(|c| *c != '_').collect();
    if corps.is_empty() {
        return Err(CalcError::UnrecognizedFormat("aucun chiffre".into()));
    }

    // premier chiffre hors base => InvalidDigit; la conversion est laissée à num-bigint
    if let Some(c) = corps
        .chars()
        .find(|c| c.to_digit(36).filter(|d| *d < base).is_none())
    {
        return Err(CalcError::InvalidDigit { digit: c, base });
    }
    BigInt::parse_bytes(corps.as_bytes(), base)
        .ok_or_else(|| CalcError::UnrecognizedFormat(corps.clone()))
}

/// Lecture dans une base explicite (formes N#v et base N v).
pub fn parse_bigint_base(s: &str, base: u32) -> CalcResult<BigInt> {
    let propre = s.trim();
    let (negatif, corps) = match propre.strip_prefix('-') {
        Some(reste) => (true, reste),
        None => (false, propre.strip_prefix('+').unwrap_or(propre)),
    };
    let v = parse_digits(corps, base)?;
    Ok(if negatif { -v } else { v })
}

fn tous(s: &str, pred: impl Fn(char) -> bool) -> bool {
    !s.is_empty() && s.chars().all(pred)
}

fn est_hex(c: char) -> bool {
    c.is_ascii_hexdigit()
}

fn a_lettre_hex(s: &str) -> bool {
    s.chars().any(|c| matches!(c, 'a'..='f' | 'A'..='F'))
}

/// Détection automatique de la notation; renvoie (valeur, base lue).
pub fn parse_bigint_auto(s: &str) -> CalcResult<(BigInt, u32)> {
    let mut st = s.trim();
    let mut negatif = false;
    if let Some(r) = st.strip_prefix('+') {
        st = r;
    }
    if let Some(r) = st.strip_prefix('-') {
        negatif = true;
        st = r;
    }
    let st: String = st.chars().filter(|c| *c != '_').collect();

    let (v, base) = lire_sans_signe(&st)?;
    Ok((if negatif { -v } else { v }, base))
}

fn lire_sans_signe(st: &str) -> CalcResult<(BigInt, u32)> {
    // 0 suivi de chiffres décimaux : hex (convention héritée)
    if st.len() > 1 && st.starts_with('0') && tous(&st[1..], |c| c.is_ascii_digit()) {
        return Ok((parse_digits(st, 16)?, 16));
    }

    let bas = st.to_ascii_lowercase();
    for (prefixe, base) in [("0x", 16), ("0b", 2), ("0o", 8)] {
        if let Some(corps) = bas.strip_prefix(prefixe) {
            return Ok((parse_digits(corps, base)?, base));
        }
    }

    for (suffixe, base) in [('h', 16), ('b', 2), ('o', 8)] {
        if let Some(corps) = bas.strip_suffix(suffixe) {
            if tous(corps, |c| c.to_digit(base).is_some()) {
                return Ok((parse_digits(corps, base)?, base));
            }
        }
    }

    if tous(st, |c| c.is_ascii_digit()) {
        return Ok((parse_digits(st, 10)?, 10));
    }

    // hex nu, avec au moins une lettre
    if tous(st, est_hex) && a_lettre_hex(st) {
        return Ok((parse_digits(st, 16)?, 16));
    }

    Err(CalcError::UnrecognizedFormat(st.to_string()))
}

/// Lit la partie gauche d’une BaseSpec selon la grammaire prioritaire.
pub fn parse_numeral(left: &str) -> CalcResult<(BigInt, u32)> {
    for motif in [motif_diese(), motif_base_mot()] {
        if let Some(c) = motif.captures(left) {
            let base = clamp_base(c[1].parse::<u32>().unwrap_or(BASE_MIN));
            return Ok((parse_bigint_base(&c[2], base)?, base));
        }
    }
    parse_bigint_auto(left)
}

/* ------------------------ Rendus ------------------------ */

fn rendu_prefixe(n: &BigInt, base: u32, prefixe: &str) -> String {
    let mut corps = n.abs().to_str_radix(base);
    if base == 16 {
        corps = corps.to_uppercase();
    }
    let signe = if n.is_negative() { "-" } else { "" };
    format!("{signe}{prefixe}{corps}")
}

/// Hexadécimal : chiffres majuscules, `0x`, signe devant (`-0xFF`).
pub fn to_hex(n: &BigInt) -> String {
    rendu_prefixe(n, 16, "0x")
}

pub fn to_bin(n: &BigInt) -> String {
    rendu_prefixe(n, 2, "0b")
}

pub fn to_oct(n: &BigInt) -> String {
    rendu_prefixe(n, 8, "0o")
}

/// Rendu dans une base quelconque (bornée à [2, 36]) :
/// préfixe canonique pour 16/2/8, aucun sinon; hex en majuscules.
pub fn format_base(n: &BigInt, base: u32) -> String {
    let base = clamp_base(base);
    let prefixe = match base {
        16 => "0x",
        2 => "0b",
        8 => "0o",
        _ => "",
    };
    rendu_prefixe(n, base, prefixe)
}

/* ------------------------ API ------------------------ */

/// API publique : convertit un texte en ses quatre rendus canoniques.
///
/// Échecs : `UnrecognizedFormat`, `InvalidDigit`. Tout ou rien.
pub fn convert_bases(texte: &str) -> CalcResult<Conversion> {
    let spec = parse_base_spec(texte);
    let (valeur, base_source) = parse_numeral(&spec.left)?;

    let base_cible = if spec.right.is_empty() {
        None
    } else {
        detect_base_from_tag(&spec.right)
    };
    debug!(
        "conversion {:?}: base {base_source} -> cible {base_cible:?}",
        spec.left
    );

    Ok(Conversion {
        hex: to_hex(&valeur),
        dec: valeur.to_string(),
        bin: to_bin(&valeur),
        oct: to_oct(&valeur),
        first: base_cible.map(|b| format_base(&valeur, b)),
        numeral: Numeral {
            valeur,
            base_source,
            base_cible,
        },
    })
}
