// src/noyau/format.rs

use num_bigint::BigInt;
use num_traits::FromPrimitive;

use super::bases::{to_bin, to_hex, to_oct};

/// Plus grand entier exactement représentable en f64 (2^53 - 1).
pub const MAX_SAFE_INTEGER: f64 = 9_007_199_254_740_991.0;

/// Une ligne de résultat : ce qu’on copie (`label`) + ce que c’est (`description`).
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ResultItem {
    pub label: String,
    pub description: String,
}

impl ResultItem {
    pub fn new(label: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            description: description.into(),
        }
    }

    /// "Hex: 0xFF" (ou le label seul si pas de description).
    pub fn titre(&self) -> String {
        if self.description.is_empty() {
            self.label.clone()
        } else {
            format!("{}: {}", self.description, self.label)
        }
    }
}

/// Résultats d’une évaluation :
/// - entier sûr (|v| ≤ 2^53-1) => Dec, Hex, Bin, Oct
/// - sinon => une seule ligne Dec décrivant le flottant
pub fn build_number_results(value: f64) -> Vec<ResultItem> {
    if value.is_finite() && value.fract() == 0.0 && value.abs() <= MAX_SAFE_INTEGER {
        if let Some(n) = BigInt::from_f64(value) {
            return vec![
                ResultItem::new(n.to_string(), "Dec"),
                ResultItem::new(to_hex(&n), "Hex"),
                ResultItem::new(to_bin(&n), "Bin"),
                ResultItem::new(to_oct(&n), "Oct"),
            ];
        }
    }
    vec![ResultItem::new(format_f64(value), "Dec (float or large)")]
}

/// Affichage d’un f64 : forme courte, exposant au-delà de 1e21 / en deçà de 1e-6.
pub fn format_f64(v: f64) -> String {
    if v.is_nan() {
        return "NaN".to_string();
    }
    if v.is_infinite() {
        return if v > 0.0 { "Infinity" } else { "-Infinity" }.to_string();
    }
    if v == 0.0 {
        return "0".to_string();
    }

    let a = v.abs();
    if !(1e-6..1e21).contains(&a) {
        let s = format!("{v:e}");
        // 1e21 -> 1e+21
        return match s.split_once('e') {
            Some((m, exp)) if !exp.starts_with('-') => format!("{m}e+{exp}"),
            _ => s,
        };
    }
    format!("{v}")
}
