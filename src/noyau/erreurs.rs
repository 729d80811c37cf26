// src/noyau/erreurs.rs

use thiserror::Error;

/// Taxonomie des échecs du noyau.
///
/// Tout est local et synchrone : une erreur remonte à l’appelant avec un
/// message lisible, jamais de résultat partiel.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CalcError {
    #[error("Entrée vide")]
    EmptyInput,

    #[error("caractère non sûr: '{0}'")]
    UnsafeCharacter(char),

    #[error("identifiant non supporté: {0}")]
    UnknownIdentifier(String),

    #[error("expression invalide: {0}")]
    InvalidExpression(String),

    #[error("format de nombre non reconnu: {0}")]
    UnrecognizedFormat(String),

    #[error("chiffre '{digit}' hors de la base {base}")]
    InvalidDigit { digit: char, base: u32 },
}

impl CalcError {
    pub(crate) fn invalide(msg: impl Into<String>) -> Self {
        CalcError::InvalidExpression(msg.into())
    }
}

pub type CalcResult<T> = Result<T, CalcError>;
