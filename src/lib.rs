//! FuzzyCal : calculatrice d’expressions + convertisseur de bases.
//!
//! Tout le calcul vit dans [`noyau`] (pur, synchrone, sans état partagé).
//! L’application (fenêtre egui, ligne de commande) n’est qu’une coquille.

pub mod noyau;
