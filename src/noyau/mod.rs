//! Noyau FuzzyCal
//!
//! Organisation interne :
//! - erreurs.rs      : taxonomie CalcError
//! - identifiants.rs : table fermée (pi, e, sin, … , trunc)
//! - validation.rs   : liste blanche + retrait des jetons numéraux
//! - jetons.rs       : tokenisation des expressions
//! - rpn.rs          : shunting-yard + évaluation f64
//! - eval.rs         : pipeline strict puis reprise “zéro initial” (une fois)
//! - bases.rs        : convertisseur de bases (BigInt)
//! - format.rs       : ResultItem + résultats d’un nombre
//! - aiguillage.rs   : expression ou nombre ?
//!
//! Deux pipelines indépendants, sans état partagé : chaque appel est une
//! fonction pure de son entrée.

pub mod aiguillage;
pub mod bases;
pub mod erreurs;
pub mod eval;
pub mod format;
pub mod identifiants;
pub mod jetons;
pub mod rpn;
pub mod validation;

#[cfg(test)]
mod tests_proprietes;

#[cfg(test)]
mod tests_fuzz_safe;

// API publique minimale
pub use aiguillage::{analyze, analyze_conversion, analyze_expression, classify, Analyse, Classification};
pub use bases::{convert_bases, Conversion};
pub use erreurs::{CalcError, CalcResult};
pub use eval::{evaluate_expression, evaluate_with_trace};
pub use format::{build_number_results, ResultItem};
pub use validation::{validate_expression, validation_message};
