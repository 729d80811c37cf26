// src/main.rs
//
// FuzzyCal : point d’entrée NATIF + WEB (WASM)
// --------------------------------------------
// - NATIF : sous-commande clap (eval / convert / auto) => une ligne par résultat,
//           sinon fenêtre eframe::run_native
// - WEB (wasm32) : eframe::WebRunner sur <canvas id="the_canvas_id">
//
// Journalisation : RUST_LOG=debug fuzzycal auto "0ff + 1"

#![cfg_attr(target_arch = "wasm32", allow(unused_imports))]

use eframe::egui;

mod app;

use app::AppCalc;

/// Titre unique (natif + web).
const TITRE_APP: &str = "FuzzyCal";

/* ------------------------ Ligne de commande (natif) ------------------------ */

#[cfg(not(target_arch = "wasm32"))]
mod cli {
    use clap::{Parser, Subcommand};
    use fuzzycal::noyau::{self, Analyse, CalcResult};

    #[derive(Parser)]
    #[command(author, version, about, long_about = None)]
    pub struct Cli {
        #[command(subcommand)]
        pub commande: Option<Commande>,
    }

    #[derive(Subcommand)]
    pub enum Commande {
        /// Évalue une expression arithmétique sûre
        Eval {
            /// L’expression, ex. "0xff + 42"
            #[arg(allow_hyphen_values = true)]
            expression: String,
        },
        /// Convertit un nombre entre bases
        Convert {
            /// Le nombre, ex. "FF -> dec" ou "16#ff"
            #[arg(allow_hyphen_values = true)]
            texte: String,
        },
        /// Expression ou nombre : aiguillage automatique
        Auto {
            #[arg(allow_hyphen_values = true)]
            texte: String,
        },
    }

    /// Exécute une sous-commande; code de sortie du processus.
    pub fn executer(commande: Commande) -> i32 {
        let r: CalcResult<Analyse> = match &commande {
            Commande::Eval { expression } => noyau::analyze_expression(expression),
            Commande::Convert { texte } => noyau::analyze_conversion(texte),
            Commande::Auto { texte } => noyau::analyze(texte),
        };

        match r {
            Ok(a) => {
                for item in &a.items {
                    println!("{}", item.titre());
                }
                if !a.demarche.note.is_empty() {
                    log::info!("{}", a.demarche.note);
                }
                0
            }
            Err(e) => {
                eprintln!("Erreur : {e}");
                1
            }
        }
    }
}

/* ------------------------ Entrée NATIF (PC) ------------------------ */

#[cfg(not(target_arch = "wasm32"))]
fn main() -> eframe::Result<()> {
    use clap::Parser;

    env_logger::init();

    let args = cli::Cli::parse();
    if let Some(commande) = args.commande {
        std::process::exit(cli::executer(commande));
    }

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_title(TITRE_APP)
            .with_inner_size([480.0, 560.0])
            .with_min_inner_size([360.0, 400.0]),
        ..Default::default()
    };

    eframe::run_native(
        TITRE_APP,
        options,
        Box::new(|_cc| Ok(Box::<AppCalc>::default())),
    )
}

/* ------------------------ Entrée WEB (WASM) ------------------------ */

#[cfg(target_arch = "wasm32")]
fn main() {
    // En wasm32, le démarrage réel passe par `start()` (wasm_bindgen).
}

#[cfg(target_arch = "wasm32")]
mod web {
    use super::{AppCalc, TITRE_APP};

    use wasm_bindgen::JsCast;
    use web_sys::{window, HtmlCanvasElement};

    /// ID du canvas attendu dans index.html.
    const CANVAS_ID: &str = "the_canvas_id";

    /// Point d’entrée automatique au chargement de la page.
    #[wasm_bindgen::prelude::wasm_bindgen(start)]
    pub async fn start() -> Result<(), wasm_bindgen::JsValue> {
        let w = window().ok_or_else(|| js_err("window() indisponible"))?;
        let d = w
            .document()
            .ok_or_else(|| js_err("document() indisponible"))?;

        d.set_title(TITRE_APP);

        let el = d
            .get_element_by_id(CANVAS_ID)
            .ok_or_else(|| js_err("canvas introuvable (id incorrect dans index.html)"))?;

        let canvas: HtmlCanvasElement = el
            .dyn_into::<HtmlCanvasElement>()
            .map_err(|_| js_err("l’élément trouvé n’est pas un <canvas>"))?;

        eframe::WebRunner::new()
            .start(
                canvas,
                eframe::WebOptions::default(),
                Box::new(|_cc| Ok(Box::<AppCalc>::default())),
            )
            .await
    }

    fn js_err(msg: &str) -> wasm_bindgen::JsValue {
        wasm_bindgen::JsValue::from_str(msg)
    }
}
