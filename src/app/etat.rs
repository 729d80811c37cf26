//! src/app/etat.rs
//!
//! État UI (sans vue, sans noyau).
//!
//! Rôle : contenir l’état de la fenêtre (entrée, mode, lignes de résultat,
//! erreur, démarche) + le rebond de la saisie, sans logique d’affichage.
//!
//! Contrats :
//! - Aucune évaluation ici (le noyau est appelé depuis vue.rs).
//! - Le temps est injecté (secondes egui, f64) : pas d’horloge système,
//!   identique en natif et en wasm.

use fuzzycal::noyau::eval::DemarcheNoyau;
use fuzzycal::noyau::{Analyse, ResultItem};

/// Délai de rebond de la saisie (mode auto).
pub const DELAI_REBOND_S: f64 = 0.25;

/// Comment lire l’entrée.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Mode {
    /// Aiguillage automatique (expression ou nombre)
    #[default]
    Auto,
    Expression,
    Conversion,
}

/// Rebond : une seule échéance en attente, la dernière saisie gagne.
#[derive(Clone, Debug, PartialEq)]
pub struct Rebond {
    delai: f64,
    echeance: Option<f64>,
}

impl Rebond {
    pub fn new(delai: f64) -> Self {
        Self {
            delai,
            echeance: None,
        }
    }

    /// Annule l’échéance en cours et en programme une nouvelle.
    pub fn planifier(&mut self, maintenant: f64) {
        self.echeance = Some(maintenant + self.delai);
    }

    pub fn annuler(&mut self) {
        self.echeance = None;
    }

    pub fn en_attente(&self) -> bool {
        self.echeance.is_some()
    }

    /// Vrai une seule fois, quand l’échéance est atteinte (elle est alors consommée).
    pub fn echu(&mut self, maintenant: f64) -> bool {
        match self.echeance {
            Some(t) if maintenant >= t => {
                self.echeance = None;
                true
            }
            _ => false,
        }
    }

    /// Temps restant avant l’échéance (pour demander un repaint).
    pub fn restant(&self, maintenant: f64) -> Option<f64> {
        self.echeance.map(|t| (t - maintenant).max(0.0))
    }
}

impl Default for Rebond {
    fn default() -> Self {
        Self::new(DELAI_REBOND_S)
    }
}

#[derive(Clone, Debug)]
pub struct AppCalc {
    // --- entrée utilisateur ---
    pub entree: String,
    pub mode: Mode,

    // --- sorties ---
    pub items: Vec<ResultItem>,
    pub resume: String,
    pub erreur: String,
    /// Message de validation “en direct” (mode expression)
    pub avertissement: Option<String>,
    /// Dernière copie dans le presse-papiers
    pub copie: String,

    // --- démarche (panneau d’explication) ---
    pub demarche: DemarcheNoyau,

    // --- UX ---
    pub rebond: Rebond,
    // Permet à vue.rs de redonner le focus à l’entrée après un clic sur un bouton.
    pub focus_entree: bool,
}

impl Default for AppCalc {
    fn default() -> Self {
        Self {
            entree: String::new(),
            mode: Mode::default(),
            items: Vec::new(),
            resume: String::new(),
            erreur: String::new(),
            avertissement: None,
            copie: String::new(),
            demarche: DemarcheNoyau::default(),
            rebond: Rebond::default(),
            focus_entree: true, // au lancement, on veut pouvoir taper tout de suite
        }
    }
}

impl AppCalc {
    /* ------------------------ Actions (état seulement) ------------------------ */

    /// C : effacer l’entrée (et l’analyse en attente).
    pub fn clear_entree(&mut self) {
        self.entree.clear();
        self.avertissement = None;
        self.rebond.annuler();
        self.focus_entree = true;
    }

    /// CLR : effacer résultats + erreur + démarche (sans toucher à l’entrée).
    pub fn clear_resultats(&mut self) {
        self.items.clear();
        self.resume.clear();
        self.erreur.clear();
        self.copie.clear();
        self.demarche = DemarcheNoyau::default();
    }

    /// Saisie modifiée : en mode auto, on (re)programme l’analyse.
    pub fn on_edition(&mut self, maintenant: f64) {
        if self.mode == Mode::Auto {
            self.rebond.planifier(maintenant);
        }
    }

    /// Une erreur remplace les résultats : rien de périmé à copier.
    pub fn set_erreur(&mut self, msg: impl Into<String>) {
        self.clear_resultats();
        self.erreur = msg.into();
        self.focus_entree = true;
    }

    /// Dépose une analyse complète (lignes + résumé + démarche).
    pub fn set_analyse(&mut self, a: Analyse) {
        self.erreur.clear();
        self.copie.clear();
        self.items = a.items;
        self.resume = a.resume;
        self.demarche = a.demarche;
    }

    pub fn set_copie(&mut self, label: &str) {
        self.copie = format!("Copié : {label}");
    }
}
