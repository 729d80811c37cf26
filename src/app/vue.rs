// src/app/vue.rs
//
// Vue (UI egui), natif + web
// ---------------------------
// - Même AppCalc (etat.rs) pour natif + wasm
// - Clavier : Enter analyse tout de suite (quand le champ est focus)
// - Mode auto : analyse après rebond (250 ms sans frappe)
// - Clic sur une ligne de résultat : copie du label dans le presse-papiers

use eframe::egui;
use fuzzycal::noyau::{self, validation_message};

use super::etat::{AppCalc, Mode};

impl AppCalc {
    /// UI principale : à appeler depuis eframe::App::update(...)
    pub fn ui(&mut self, ui: &mut egui::Ui) {
        ui.spacing_mut().item_spacing = egui::vec2(6.0, 6.0);

        egui::ScrollArea::vertical()
            .auto_shrink([false, false])
            .show(ui, |ui| {
                ui.heading("FuzzyCal");
                ui.add_space(6.0);

                self.ui_entree(ui);

                ui.add_space(8.0);
                ui.separator();
                ui.add_space(8.0);

                self.ui_resultats(ui);

                ui.add_space(8.0);
                ui.separator();
                ui.add_space(8.0);

                self.ui_demarche(ui);
            });

        // échéance du rebond atteinte => analyse (la dernière saisie gagne)
        let maintenant = ui.input(|i| i.time);
        if self.rebond.echu(maintenant) {
            self.analyser_via_noyau();
        }
    }

    fn ui_entree(&mut self, ui: &mut egui::Ui) {
        ui.horizontal(|ui| {
            ui.label("Mode :");
            let avant = self.mode;
            ui.radio_value(&mut self.mode, Mode::Auto, "Auto");
            ui.radio_value(&mut self.mode, Mode::Expression, "Expression");
            ui.radio_value(&mut self.mode, Mode::Conversion, "Conversion");
            if self.mode != avant {
                self.rebond.annuler();
                self.maj_avertissement();
                if !self.entree.trim().is_empty() {
                    self.analyser_via_noyau();
                }
                self.focus_entree = true;
            }
        });

        ui.add_space(4.0);
        ui.label("Entrée :");

        let resp = ui.add(
            egui::TextEdit::singleline(&mut self.entree)
                .desired_width(ui.available_width())
                .hint_text("Ex: 0xff + 42, FF -> dec, 16#ff, sin(pi/6)")
                .id_salt("entree_edit")
                .code_editor(),
        );

        if self.focus_entree {
            resp.request_focus();
            self.focus_entree = false;
        }

        if resp.changed() {
            let maintenant = ui.input(|i| i.time);
            self.on_edition(maintenant);
            self.maj_avertissement();
        }

        // Enter : un TextEdit singleline perd le focus à la validation
        let enter = ui.input(|i| i.key_pressed(egui::Key::Enter));
        if (resp.has_focus() || resp.lost_focus()) && enter {
            self.analyser_via_noyau();
            self.focus_entree = true;
        }

        if let Some(msg) = &self.avertissement {
            ui.small(msg.as_str());
        }

        ui.add_space(6.0);

        ui.horizontal(|ui| {
            self.bouton_action(ui, "=", "Analyser maintenant", Action::Analyser);
            self.bouton_action(ui, "C", "Efface seulement l’entrée", Action::ClearEntree);
            self.bouton_action(
                ui,
                "CLR",
                "Efface résultats + erreur + démarche",
                Action::ClearResultats,
            );
        });

        if !self.erreur.is_empty() {
            ui.add_space(6.0);
            ui.colored_label(ui.visuals().error_fg_color, &self.erreur);
        }
    }

    fn ui_resultats(&mut self, ui: &mut egui::Ui) {
        if !self.resume.is_empty() {
            ui.strong(self.resume.as_str());
            ui.add_space(4.0);
        }

        if self.items.is_empty() {
            ui.monospace("—");
            return;
        }

        let mut copie: Option<String> = None;
        egui::Frame::group(ui.style())
            .fill(ui.visuals().extreme_bg_color)
            .show(ui, |ui| {
                ui.set_min_width(ui.available_width());
                for item in &self.items {
                    let resp = ui
                        .add(
                            egui::Label::new(egui::RichText::new(item.titre()).monospace())
                                .sense(egui::Sense::click()),
                        )
                        .on_hover_text("Cliquer pour copier");
                    if resp.clicked() {
                        copie = Some(item.label.clone());
                    }
                }
            });

        if let Some(label) = copie {
            ui.ctx().copy_text(label.clone());
            self.set_copie(&label);
        }
        if !self.copie.is_empty() {
            ui.small(self.copie.as_str());
        }
    }

    fn ui_demarche(&mut self, ui: &mut egui::Ui) {
        egui::CollapsingHeader::new("Démarche")
            .default_open(false)
            .show(ui, |ui| {
                Self::champ_demarche(ui, "Jetons", "demarche_jetons", &self.demarche.jetons);
                Self::champ_demarche(ui, "RPN", "demarche_rpn", &self.demarche.rpn);
                Self::champ_demarche(ui, "Note", "demarche_note", &self.demarche.note);
            });
    }

    fn champ_demarche(ui: &mut egui::Ui, titre: &str, id: &str, contenu: &str) {
        ui.add_space(4.0);
        ui.label(format!("{titre} :"));
        egui::Frame::group(ui.style())
            .fill(ui.visuals().extreme_bg_color)
            .show(ui, |ui| {
                ui.push_id(id, |ui| {
                    ui.set_min_width(ui.available_width());
                    ui.monospace(contenu);
                });
            });
    }

    fn bouton_action(&mut self, ui: &mut egui::Ui, label: &str, tip: &str, action: Action) {
        let resp = ui
            .add_sized([56.0, 30.0], egui::Button::new(label))
            .on_hover_text(tip);

        if resp.clicked() {
            match action {
                Action::Analyser => self.analyser_via_noyau(),
                Action::ClearEntree => self.clear_entree(),
                Action::ClearResultats => self.clear_resultats(),
            }
            self.focus_entree = true;
        }
    }

    /// Mode expression : message de validation pendant la frappe.
    fn maj_avertissement(&mut self) {
        self.avertissement = match self.mode {
            Mode::Expression if !self.entree.trim().is_empty() => validation_message(&self.entree),
            _ => None,
        };
    }

    /// Analyse l’entrée via le noyau selon le mode, puis dépose le résultat dans l’état UI.
    fn analyser_via_noyau(&mut self) {
        self.rebond.annuler();

        let s = self.entree.trim();
        if s.is_empty() {
            self.clear_resultats();
            return;
        }

        let r = match self.mode {
            Mode::Auto => noyau::analyze(s),
            Mode::Expression => noyau::analyze_expression(s),
            Mode::Conversion => noyau::analyze_conversion(s),
        };
        match r {
            Ok(a) => self.set_analyse(a),
            Err(e) => self.set_erreur(e.to_string()),
        }
    }
}

#[derive(Clone, Copy, Debug)]
enum Action {
    Analyser,
    ClearEntree,
    ClearResultats,
}
