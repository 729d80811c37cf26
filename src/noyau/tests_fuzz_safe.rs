//! Tests fuzz safe : robustesse + déterminisme + limites contrôlées.
//!
//! But : marteler les deux pipelines sans brûler la machine.
//! - RNG déterministe (seed fixe)
//! - profondeur bornée
//! - budget temps global
//! - invariant clé : jamais de panique, seulement des CalcError typées

use std::time::{Duration, Instant};

use super::aiguillage::analyze;
use super::bases::convert_bases;
use super::erreurs::CalcError;
use super::eval::evaluate_expression;

/* ------------------------ RNG déterministe minimal ------------------------ */

#[derive(Clone)]
struct Rng {
    state: u64,
}
impl Rng {
    fn new(seed: u64) -> Self {
        Self { state: seed }
    }
    fn next_u32(&mut self) -> u32 {
        // LCG simple (déterministe)
        self.state = self.state.wrapping_mul(6364136223846793005).wrapping_add(1);
        (self.state >> 32) as u32
    }
    fn pick(&mut self, n: u32) -> u32 {
        if n == 0 {
            0
        } else {
            self.next_u32() % n
        }
    }
    fn coin(&mut self) -> bool {
        (self.next_u32() & 1) == 1
    }
}

/* ------------------------ Budget anti-gel ------------------------ */

fn budget(start: Instant, max: Duration) {
    if start.elapsed() > max {
        panic!("budget temps dépassé: {:?}", max);
    }
}

/* ------------------------ Génération d’expressions (bornée) ------------------------ */

fn gen_atom(rng: &mut Rng) -> String {
    match rng.pick(8) {
        0 => format!("{}", rng.pick(1000)),
        1 => format!("{}.{}", rng.pick(100), rng.pick(100)),
        2 => format!("0x{:x}", rng.pick(0xFFFF)),
        3 => format!("0b{:b}", rng.pick(64)),
        // zéro initial : passe par la reprise
        4 => format!("0{:x}", 0x100 + rng.pick(0xF00)),
        5 => "pi".to_string(),
        6 => "e".to_string(),
        _ => format!("({})", rng.pick(50)),
    }
}

fn gen_expr(rng: &mut Rng, depth: usize) -> String {
    if depth == 0 {
        return gen_atom(rng);
    }

    let a = gen_expr(rng, depth - 1);
    match rng.pick(12) {
        0 => gen_atom(rng),
        1 => format!("({a}+{})", gen_expr(rng, depth - 1)),
        2 => format!("({a}-{})", gen_expr(rng, depth - 1)),
        3 => format!("({a}*{})", gen_expr(rng, depth - 1)),
        4 => format!("({a}/{})", gen_expr(rng, depth - 1)),
        5 => format!("({a})^2"),
        6 => format!("-{a}"),
        7 => format!("sin({a})"),
        8 => format!("max({a}, {})", gen_expr(rng, depth - 1)),
        9 => format!("atan2({a}, {})", gen_expr(rng, depth - 1)),
        10 => format!("sqrt(abs({a}))"),
        _ => format!("round({a})"),
    }
}

/// Bruit : caractères pris dans l’alphabet “utile” (et quelques intrus).
fn gen_bruit(rng: &mut Rng) -> String {
    const ALPHABET: &[char] = &[
        '0', '1', '7', '9', 'a', 'b', 'f', 'h', 'o', 'x', 'e', 'p', 'i', '(', ')', '+', '-', '*',
        '^', '/', ',', '.', '_', ' ', '#', '>', ';', '\'',
    ];
    let n = 1 + rng.pick(14) as usize;
    (0..n)
        .map(|_| ALPHABET[rng.pick(ALPHABET.len() as u32) as usize])
        .collect()
}

/* ------------------------ Tests ------------------------ */

#[test]
fn fuzz_safe_expressions_bien_formees() {
    let t0 = Instant::now();
    let max = Duration::from_secs(3);

    // Même seed => mêmes expressions => mêmes sorties (déterminisme)
    let mut rng = Rng::new(0xC0FFEE_u64);

    let mut seen_ok = 0usize;
    for _ in 0..150 {
        budget(t0, max);

        let expr = gen_expr(&mut rng, 4);
        let v1 = evaluate_expression(&expr);
        let v2 = evaluate_expression(&expr);

        match (&v1, &v2) {
            (Ok(a), Ok(b)) => {
                assert!(a.to_bits() == b.to_bits(), "non déterministe: {expr:?}");
                seen_ok += 1;
            }
            _ => panic!("expression bien formée refusée: {expr:?} => {v1:?}"),
        }
    }
    assert_eq!(seen_ok, 150);
}

#[test]
fn fuzz_safe_bruit_sans_panique() {
    let t0 = Instant::now();
    let max = Duration::from_secs(3);

    let mut rng = Rng::new(0xBADC0DE_u64);

    let mut seen_ok = 0usize;
    let mut seen_err = 0usize;
    for _ in 0..400 {
        budget(t0, max);

        let s = gen_bruit(&mut rng);
        match evaluate_expression(&s) {
            Ok(_) => seen_ok += 1,
            Err(
                CalcError::EmptyInput
                | CalcError::UnsafeCharacter(_)
                | CalcError::UnknownIdentifier(_)
                | CalcError::InvalidExpression(_),
            ) => seen_err += 1,
            Err(e) => panic!("erreur hors taxonomie de l’évaluateur: {s:?} => {e:?}"),
        }

        match convert_bases(&s) {
            Ok(c) => assert!(!c.dec.is_empty()),
            Err(CalcError::UnrecognizedFormat(_) | CalcError::InvalidDigit { .. }) => {}
            Err(e) => panic!("erreur hors taxonomie du convertisseur: {s:?} => {e:?}"),
        }

        // l’aiguillage ne panique jamais non plus
        let _ = analyze(&s);
    }

    // On veut voir un mix des deux, sinon le fuzz ne “balaye” rien.
    assert!(seen_ok > 0, "aucun succès: bruit trop “sale”");
    assert!(seen_err > 0, "aucune erreur vue: bruit trop “sage”");
}

#[test]
fn fuzz_safe_imbrication_profonde() {
    let t0 = Instant::now();
    let max = Duration::from_secs(2);

    // 500 niveaux de parenthèses + fonctions : le shunting-yard est itératif
    let mut expr = String::from("1");
    for i in 0..500 {
        expr = if i % 2 == 0 {
            format!("({expr}+1)")
        } else {
            format!("abs({expr})")
        };
    }
    budget(t0, max);

    assert_eq!(evaluate_expression(&expr), Ok(251.0));
}

#[test]
fn fuzz_safe_conversions_coherentes() {
    let t0 = Instant::now();
    let max = Duration::from_secs(2);

    let mut rng = Rng::new(0x5EED_u64);
    for _ in 0..200 {
        budget(t0, max);

        let n = rng.next_u32() as u64 * if rng.coin() { 1 } else { 1 << 20 };
        let c = convert_bases(&format!("{n}")).unwrap_or_else(|e| panic!("{n}: {e}"));
        assert_eq!(c.hex, format!("0x{n:X}"));
        assert_eq!(c.bin, format!("0b{n:b}"));
        assert_eq!(c.oct, format!("0o{n:o}"));
    }
}
