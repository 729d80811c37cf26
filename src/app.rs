// src/app.rs
//
// FuzzyCal : module App (racine)
// ------------------------------
// Rôle:
// - Déclarer les sous-modules (etat.rs + vue.rs)
// - Ré-exporter AppCalc (pour main.rs: use crate::app::AppCalc;)
// - Fournir l’impl eframe::App (compatible NATIF + WEB)
//
// Important:
// - La gestion Enter est faite dans vue.rs (quand le champ a le focus).
// - Ici : Esc global + réveil de la boucle pour l’échéance du rebond.

pub mod etat;
pub mod vue;

pub use etat::AppCalc;

use std::time::Duration;

use eframe::egui;

impl eframe::App for AppCalc {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        // ESC = effacer seulement l’entrée (comme bouton "C").
        let esc = ctx.input(|i| i.key_pressed(egui::Key::Escape));
        if esc {
            self.clear_entree();
        }

        egui::CentralPanel::default().show(ctx, |ui| {
            self.ui(ui);
        });

        // egui ne redessine que sur événement : sans ça, l’échéance n’arrive jamais
        let maintenant = ctx.input(|i| i.time);
        if let Some(reste) = self.rebond.restant(maintenant) {
            ctx.request_repaint_after(Duration::from_secs_f64(reste));
        }
    }
}
