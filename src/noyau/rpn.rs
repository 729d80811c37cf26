// src/noyau/rpn.rs
//
// Shunting-yard -> RPN -> f64
// Objectif:
// - Convertir une suite de Tok en RPN (postfix), appels de fonction compris
// - Puis évaluer la RPN sur une pile de f64
//
// Règles:
// - Ident(p):
//    - constante (pi, e) => valeur
//    - fonction => doit être suivie de '(' ; sortie après sa parenthèse fermante,
//      avec le nombre d’arguments lu (virgules + 1, ou 0 pour "()")
// - Moins unaire: opérateur préfixe Neg, moins prioritaire que '^'
//   ("-2^2" => -4, "2^-1" => 0.5). Le plus unaire est ignoré.
// - Pas de multiplication implicite : deux valeurs consécutives => erreur.

use log::trace;

use super::erreurs::{CalcError, CalcResult};
use super::identifiants::Primitive;
use super::jetons::Tok;

/// Élément de RPN.
#[derive(Clone, Debug, PartialEq)]
pub enum Rpn {
    Num(f64),
    Const(Primitive),
    Add,
    Sub,
    Mul,
    Div,
    Rem,
    Pow,
    Neg,
    Appel(Primitive, usize),
}

/// Élément de la pile d’opérateurs.
#[derive(Clone, Copy, Debug)]
enum Op {
    Binaire(OpBin),
    Neg,
    Fonction(Primitive),
    LPar,
}

#[derive(Clone, Copy, Debug, PartialEq)]
enum OpBin {
    Add,
    Sub,
    Mul,
    Div,
    Rem,
    Pow,
}

impl OpBin {
    fn depuis_tok(t: &Tok) -> Option<OpBin> {
        match t {
            Tok::Plus => Some(OpBin::Add),
            Tok::Minus => Some(OpBin::Sub),
            Tok::Star => Some(OpBin::Mul),
            Tok::Slash => Some(OpBin::Div),
            Tok::Percent => Some(OpBin::Rem),
            Tok::Caret => Some(OpBin::Pow),
            _ => None,
        }
    }

    fn sortie(self) -> Rpn {
        match self {
            OpBin::Add => Rpn::Add,
            OpBin::Sub => Rpn::Sub,
            OpBin::Mul => Rpn::Mul,
            OpBin::Div => Rpn::Div,
            OpBin::Rem => Rpn::Rem,
            OpBin::Pow => Rpn::Pow,
        }
    }
}

fn precedence(op: &Op) -> i32 {
    match op {
        Op::Binaire(OpBin::Add | OpBin::Sub) => 1,
        Op::Binaire(OpBin::Mul | OpBin::Div | OpBin::Rem) => 2,
        Op::Neg => 3,
        Op::Binaire(OpBin::Pow) => 4,
        Op::Fonction(_) | Op::LPar => 0,
    }
}

fn is_right_associative(op: &Op) -> bool {
    matches!(op, Op::Binaire(OpBin::Pow))
}

fn vers_sortie(op: Op) -> CalcResult<Rpn> {
    match op {
        Op::Binaire(b) => Ok(b.sortie()),
        Op::Neg => Ok(Rpn::Neg),
        Op::Fonction(_) | Op::LPar => Err(CalcError::invalide("parenthèses non fermées")),
    }
}

/// Convertit une suite de jetons en RPN (notation polonaise inversée).
///
/// Exemple:
///   tokens: [Ident(atan2), LPar, Num(1), Comma, Num(2), RPar, Caret, Num(2)]
///   rpn:    [Num(1), Num(2), Appel(atan2, 2), Num(2), Pow]
pub fn to_rpn(tokens: &[Tok]) -> CalcResult<Vec<Rpn>> {
    let mut out: Vec<Rpn> = Vec::new();
    let mut ops: Vec<Op> = Vec::new();

    // Une entrée par '(' ouverte : nombre de virgules vues + appel ou non.
    let mut cadres: Vec<(usize, bool)> = Vec::new();

    // “valeur” = un atome ou une expression fermée.
    // Sert à détecter le moins unaire et les juxtapositions interdites.
    let mut prev_was_value = false;
    // vrai juste après le '(' d’un appel (pour accepter "f()")
    let mut apres_ouverture_appel = false;

    let mut iter = tokens.iter().peekable();
    while let Some(tok) = iter.next() {
        let ouverture_precedente = apres_ouverture_appel;
        apres_ouverture_appel = false;

        match tok {
            Tok::Num(v) => {
                if prev_was_value {
                    return Err(CalcError::invalide("opérateur manquant entre deux valeurs"));
                }
                out.push(Rpn::Num(*v));
                prev_was_value = true;
            }

            Tok::Ident(p) if p.est_constante() => {
                if prev_was_value {
                    return Err(CalcError::invalide("opérateur manquant entre deux valeurs"));
                }
                out.push(Rpn::Const(*p));
                prev_was_value = true;
            }

            Tok::Ident(p) => {
                if prev_was_value {
                    return Err(CalcError::invalide("opérateur manquant avant une fonction"));
                }
                if iter.peek() != Some(&&Tok::LPar) {
                    return Err(CalcError::invalide(format!(
                        "'{}' doit être suivi de '('",
                        p.nom()
                    )));
                }
                // fonction : on la garde sur la pile (elle sortira après ses arguments)
                ops.push(Op::Fonction(*p));
                prev_was_value = false;
            }

            Tok::LPar => {
                if prev_was_value {
                    return Err(CalcError::invalide("opérateur manquant avant '('"));
                }
                let appel = matches!(ops.last(), Some(Op::Fonction(_)));
                ops.push(Op::LPar);
                cadres.push((0, appel));
                apres_ouverture_appel = appel;
                prev_was_value = false;
            }

            Tok::Comma => {
                if !prev_was_value {
                    return Err(CalcError::invalide("argument manquant avant ','"));
                }
                depile_jusqua_parenthese(&mut ops, &mut out, "',' hors d’un appel de fonction")?;
                match cadres.last_mut() {
                    Some((virgules, true)) => *virgules += 1,
                    _ => return Err(CalcError::invalide("',' hors d’un appel de fonction")),
                }
                prev_was_value = false;
            }

            Tok::RPar => {
                let vide = ouverture_precedente;
                if !prev_was_value && !vide {
                    return Err(CalcError::invalide("valeur manquante avant ')'"));
                }

                // dépile jusqu’à '('
                depile_jusqua_parenthese(&mut ops, &mut out, "parenthèse fermante en trop")?;
                ops.pop();
                let (virgules, appel) = cadres
                    .pop()
                    .ok_or_else(|| CalcError::invalide("parenthèse fermante en trop"))?;

                // si une fonction est au sommet, on la sort avec son arité
                if appel {
                    if let Some(Op::Fonction(p)) = ops.pop() {
                        let argc = if vide { 0 } else { virgules + 1 };
                        if !p.arite().accepte(argc) {
                            return Err(CalcError::invalide(format!(
                                "mauvais nombre d’arguments pour {} ({argc})",
                                p.nom()
                            )));
                        }
                        out.push(Rpn::Appel(p, argc));
                    }
                }

                prev_was_value = true;
            }

            Tok::Minus | Tok::Plus if !prev_was_value => {
                // préfixe : rien à dépiler (il s’applique à ce qui suit)
                if matches!(tok, Tok::Minus) {
                    ops.push(Op::Neg);
                }
            }

            Tok::Plus | Tok::Minus | Tok::Star | Tok::Slash | Tok::Percent | Tok::Caret => {
                if !prev_was_value {
                    return Err(CalcError::invalide("opérande manquant"));
                }
                let courant = match OpBin::depuis_tok(tok) {
                    Some(b) => Op::Binaire(b),
                    None => return Err(CalcError::invalide("opérateur inconnu")),
                };

                // dépile tant que:
                // - on n'est pas bloqué par '(' ou une fonction
                // - et la précédence/associativité exige de sortir l'opérateur du haut
                while let Some(top) = ops.last() {
                    if matches!(top, Op::LPar | Op::Fonction(_)) {
                        break;
                    }

                    let p_top = precedence(top);
                    let p_tok = precedence(&courant);

                    let doit_pop = if is_right_associative(&courant) {
                        p_top > p_tok
                    } else {
                        p_top >= p_tok
                    };

                    if !doit_pop {
                        break;
                    }
                    if let Some(op) = ops.pop() {
                        out.push(vers_sortie(op)?);
                    }
                }

                ops.push(courant);
                prev_was_value = false;
            }
        }
    }

    if !prev_was_value {
        return Err(CalcError::invalide("expression incomplète"));
    }

    // vide la pile ops
    while let Some(op) = ops.pop() {
        out.push(vers_sortie(op)?);
    }

    trace!("rpn: {}", format_rpn(&out));
    Ok(out)
}

fn depile_jusqua_parenthese(ops: &mut Vec<Op>, out: &mut Vec<Rpn>, msg: &str) -> CalcResult<()> {
    loop {
        match ops.last() {
            Some(Op::LPar) => return Ok(()),
            Some(_) => {
                if let Some(op) = ops.pop() {
                    out.push(vers_sortie(op)?);
                }
            }
            None => return Err(CalcError::invalide(msg)),
        }
    }
}

/// Évalue une RPN. Les résultats non finis (1/0) sont rendus tels quels.
pub fn eval_rpn(rpn: &[Rpn]) -> CalcResult<f64> {
    let mut st: Vec<f64> = Vec::new();

    for item in rpn {
        match item {
            Rpn::Num(v) => st.push(*v),
            Rpn::Const(p) => st.push(p.constante().unwrap_or(f64::NAN)),

            Rpn::Neg => {
                let a = st.pop().ok_or_else(|| CalcError::invalide("opérande manquant"))?;
                st.push(-a);
            }

            Rpn::Add | Rpn::Sub | Rpn::Mul | Rpn::Div | Rpn::Rem | Rpn::Pow => {
                let b = st.pop().ok_or_else(|| CalcError::invalide("opérande manquant"))?;
                let a = st.pop().ok_or_else(|| CalcError::invalide("opérande manquant"))?;
                let v = match item {
                    Rpn::Add => a + b,
                    Rpn::Sub => a - b,
                    Rpn::Mul => a * b,
                    Rpn::Div => a / b,
                    Rpn::Rem => a % b,
                    _ => a.powf(b),
                };
                st.push(v);
            }

            Rpn::Appel(p, argc) => {
                if st.len() < *argc {
                    return Err(CalcError::invalide("arguments manquants"));
                }
                let args = st.split_off(st.len() - argc);
                st.push(p.appliquer(&args));
            }
        }
    }

    if st.len() != 1 {
        return Err(CalcError::invalide("expression invalide"));
    }
    st.pop().ok_or_else(|| CalcError::invalide("expression vide"))
}

/// Format utilitaire (démarche) : RPN en texte.
pub fn format_rpn(rpn: &[Rpn]) -> String {
    rpn.iter()
        .map(|r| match r {
            Rpn::Num(v) => format!("{v}"),
            Rpn::Const(p) => p.nom().to_string(),
            Rpn::Add => "+".to_string(),
            Rpn::Sub => "-".to_string(),
            Rpn::Mul => "*".to_string(),
            Rpn::Div => "/".to_string(),
            Rpn::Rem => "%".to_string(),
            Rpn::Pow => "^".to_string(),
            Rpn::Neg => "neg".to_string(),
            Rpn::Appel(p, n) => format!("{}/{n}", p.nom()),
        })
        .collect::<Vec<_>>()
        .join(" ")
}
