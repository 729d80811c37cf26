// src/noyau/identifiants.rs
//
// Table fermée des identifiants autorisés.
// Sensible à la casse : pi/PI et e/E sont les seules doublures.

use std::f64::consts;

/// Arité attendue par une fonction.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Arite {
    Exacte(usize),
    AuMoins(usize),
}

impl Arite {
    pub fn accepte(self, n: usize) -> bool {
        match self {
            Arite::Exacte(k) => n == k,
            Arite::AuMoins(k) => n >= k,
        }
    }
}

/// Primitive d’évaluation associée à un identifiant autorisé.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Primitive {
    Pi,
    E,

    Sin,
    Cos,
    Tan,
    Asin,
    Acos,
    Atan,
    Atan2,
    Pow,
    Sqrt,
    Abs,
    Ln,
    Exp,
    Min,
    Max,
    Floor,
    Ceil,
    Round,
    Trunc,
}

/// Noms acceptés (ordre stable, utile pour les messages et les tests).
pub const NOMS_AUTORISES: [&str; 23] = [
    "pi", "PI", "e", "E", "sin", "cos", "tan", "asin", "acos", "atan", "atan2", "pow", "sqrt",
    "abs", "log", "ln", "exp", "min", "max", "floor", "ceil", "round", "trunc",
];

impl Primitive {
    /// Résout un mot exact vers sa primitive (None si hors table).
    pub fn depuis_nom(nom: &str) -> Option<Primitive> {
        use Primitive::*;
        let p = match nom {
            "pi" | "PI" => Pi,
            "e" | "E" => E,
            "sin" => Sin,
            "cos" => Cos,
            "tan" => Tan,
            "asin" => Asin,
            "acos" => Acos,
            "atan" => Atan,
            "atan2" => Atan2,
            "pow" => Pow,
            "sqrt" => Sqrt,
            "abs" => Abs,
            // log = logarithme népérien, comme ln
            "log" | "ln" => Ln,
            "exp" => Exp,
            "min" => Min,
            "max" => Max,
            "floor" => Floor,
            "ceil" => Ceil,
            "round" => Round,
            "trunc" => Trunc,
            _ => return None,
        };
        Some(p)
    }

    pub fn est_constante(self) -> bool {
        matches!(self, Primitive::Pi | Primitive::E)
    }

    /// Valeur d’une constante (None pour une fonction).
    pub fn constante(self) -> Option<f64> {
        match self {
            Primitive::Pi => Some(consts::PI),
            Primitive::E => Some(consts::E),
            _ => None,
        }
    }

    pub fn arite(self) -> Arite {
        use Primitive::*;
        match self {
            Pi | E => Arite::Exacte(0),
            Atan2 | Pow => Arite::Exacte(2),
            Min | Max => Arite::AuMoins(1),
            _ => Arite::Exacte(1),
        }
    }

    /// Nom canonique (affichage RPN / démarche).
    pub fn nom(self) -> &'static str {
        use Primitive::*;
        match self {
            Pi => "pi",
            E => "e",
            Sin => "sin",
            Cos => "cos",
            Tan => "tan",
            Asin => "asin",
            Acos => "acos",
            Atan => "atan",
            Atan2 => "atan2",
            Pow => "pow",
            Sqrt => "sqrt",
            Abs => "abs",
            Ln => "ln",
            Exp => "exp",
            Min => "min",
            Max => "max",
            Floor => "floor",
            Ceil => "ceil",
            Round => "round",
            Trunc => "trunc",
        }
    }

    /// Applique la fonction. L’arité a déjà été vérifiée par l’appelant.
    pub fn appliquer(self, args: &[f64]) -> f64 {
        use Primitive::*;
        let x = args.first().copied().unwrap_or(f64::NAN);
        let y = args.get(1).copied().unwrap_or(f64::NAN);
        match self {
            Pi => consts::PI,
            E => consts::E,
            Sin => x.sin(),
            Cos => x.cos(),
            Tan => x.tan(),
            Asin => x.asin(),
            Acos => x.acos(),
            Atan => x.atan(),
            Atan2 => x.atan2(y),
            Pow => x.powf(y),
            Sqrt => x.sqrt(),
            Abs => x.abs(),
            Ln => x.ln(),
            Exp => x.exp(),
            Min => args.iter().copied().fold(f64::INFINITY, min_nan),
            Max => args.iter().copied().fold(f64::NEG_INFINITY, max_nan),
            Floor => x.floor(),
            Ceil => x.ceil(),
            Round => arrondi_demi_haut(x),
            Trunc => x.trunc(),
        }
    }
}

// NaN contamine min/max (f64::min l’ignorerait).
fn min_nan(a: f64, b: f64) -> f64 {
    if a.is_nan() || b.is_nan() {
        f64::NAN
    } else {
        a.min(b)
    }
}

fn max_nan(a: f64, b: f64) -> f64 {
    if a.is_nan() || b.is_nan() {
        f64::NAN
    } else {
        a.max(b)
    }
}

/// Arrondi “demi vers +∞” : round(2.5) = 3, round(-2.5) = -2.
fn arrondi_demi_haut(x: f64) -> f64 {
    if !x.is_finite() {
        return x;
    }
    let bas = x.floor();
    if x - bas >= 0.5 {
        bas + 1.0
    } else {
        bas
    }
}
