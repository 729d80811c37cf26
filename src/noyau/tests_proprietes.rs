//! Propriétés (proptest) sur les deux pipelines.
//!
//! 1. Aller-retour : un entier rendu en hex/dec/bin/oct se relit à l’identique
//! 2. Idempotence : convertir un rendu redonne la même conversion
//! 3. Signe : le rendu d’un négatif est le rendu de |v| précédé de '-'
//! 4. Validation : caractère interdit ou identifiant inconnu => toujours refusé

use num_bigint::BigInt;
use proptest::prelude::*;

use super::bases::{convert_bases, to_bin, to_hex, to_oct};
use super::erreurs::CalcError;
use super::eval::evaluate_expression;
use super::format::{build_number_results, MAX_SAFE_INTEGER};
use super::identifiants::Primitive;
use super::validation::validate_expression;

// -- Stratégies --

fn caractere_interdit() -> impl Strategy<Value = char> {
    prop::sample::select(vec!['"', '\'', '`', '\\', ';'])
}

/// Mot inconnu : commence hors de a-f (sinon ce serait un hex nu ailleurs).
fn identifiant_inconnu() -> impl Strategy<Value = String> {
    prop::string::string_regex("[g-z][a-z]{0,7}")
        .expect("regex valide")
        .prop_filter("pas un nom autorisé", |s| Primitive::depuis_nom(s).is_none())
}

fn entier_sur() -> impl Strategy<Value = i64> {
    let m = MAX_SAFE_INTEGER as i64;
    -m..=m
}

proptest! {
    #![proptest_config(ProptestConfig {
        cases: 256,
        max_shrink_iters: 1000,
        ..ProptestConfig::default()
    })]

    #[test]
    fn prop_aller_retour_rendus(n in any::<u128>()) {
        let v = BigInt::from(n);
        let attendu = n.to_string();
        for rendu in [to_hex(&v), attendu.clone(), to_bin(&v), to_oct(&v)] {
            let c = convert_bases(&rendu).map_err(|e| TestCaseError::fail(format!("{rendu}: {e}")))?;
            prop_assert_eq!(&c.dec, &attendu, "rendu {}", rendu);
        }
    }

    #[test]
    fn prop_idempotence_conversion(n in any::<i64>()) {
        let c = convert_bases(&n.to_string()).map_err(|e| TestCaseError::fail(e.to_string()))?;
        for rendu in [&c.hex, &c.bin, &c.oct] {
            let c2 = convert_bases(rendu).map_err(|e| TestCaseError::fail(e.to_string()))?;
            prop_assert_eq!(&c2.hex, &c.hex);
            prop_assert_eq!(&c2.dec, &c.dec);
            prop_assert_eq!(&c2.bin, &c.bin);
            prop_assert_eq!(&c2.oct, &c.oct);
        }
    }

    #[test]
    fn prop_signe_devant_le_prefixe(n in 1u64..=u64::MAX) {
        let v = BigInt::from(n);
        let m = -v.clone();
        prop_assert_eq!(to_hex(&m), format!("-{}", to_hex(&v)));
        prop_assert_eq!(to_bin(&m), format!("-{}", to_bin(&v)));
        prop_assert_eq!(to_oct(&m), format!("-{}", to_oct(&v)));

        let c = convert_bases(&format!("-{n}")).map_err(|e| TestCaseError::fail(e.to_string()))?;
        prop_assert_eq!(c.hex, format!("-0x{n:X}"));
    }

    #[test]
    fn prop_entiers_surs_quatre_lignes(n in entier_sur()) {
        let items = build_number_results(n as f64);
        prop_assert_eq!(items.len(), 4);
        prop_assert_eq!(&items[0].label, &n.to_string());
        let relu = convert_bases(&items[1].label).map_err(|e| TestCaseError::fail(e.to_string()))?;
        prop_assert_eq!(relu.dec, n.to_string());
    }
}

proptest! {
    #![proptest_config(ProptestConfig {
        cases: 128,
        max_shrink_iters: 500,
        ..ProptestConfig::default()
    })]

    #[test]
    fn prop_caractere_interdit_toujours_refuse(
        avant in "[0-9+* ]{0,6}",
        c in caractere_interdit(),
        apres in "[0-9a-z()]{0,6}",
    ) {
        let s = format!("1{avant}{c}{apres}");
        prop_assert_eq!(validate_expression(&s), Err(CalcError::UnsafeCharacter(c)));
        prop_assert!(evaluate_expression(&s).is_err());
    }

    #[test]
    fn prop_identifiant_inconnu_toujours_refuse(mot in identifiant_inconnu()) {
        let s = format!("1 + {mot}");
        prop_assert_eq!(validate_expression(&s), Err(CalcError::UnknownIdentifier(mot.clone())));
        prop_assert_eq!(evaluate_expression(&s), Err(CalcError::UnknownIdentifier(mot)));
    }

    #[test]
    fn prop_somme_entiere_exacte(a in -100_000i64..100_000, b in -100_000i64..100_000) {
        let s = format!("{a} + {b}");
        prop_assert_eq!(evaluate_expression(&s), Ok((a + b) as f64));
        let s = format!("0x{:x} * 2", a.unsigned_abs());
        prop_assert_eq!(evaluate_expression(&s), Ok((a.unsigned_abs() * 2) as f64));
    }
}
