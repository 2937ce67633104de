use chumsky::error::Simple;
use chumsky::primitive::{choice, just, none_of};
use chumsky::text::{self, TextParser};
use chumsky::Parser;
use solver::driver::Driver;
use solver::game::{Player, WinState};

use crate::{build_game, parse_parity_game};

fn parse_parity_sol(source: &str) -> Result<Vec<(usize, Player)>, Vec<Simple<char>>> {
    let paritysol = just("paritysol").padded();
    let number = text::int(10).map(|n: String| n.parse::<usize>().unwrap()).padded();
    let semi = just(';');
    let newline = text::newline();

    let header = paritysol.then(number).then(semi).then(newline);

    let player = choice((just('0').to(Player::P0), just('1').to(Player::P1)));
    let strategy = none_of(";").repeated();
    let row = number.then(player).then_ignore(strategy);

    let rows = row.then_ignore(semi).separated_by(newline).allow_trailing();
    let sol = header.ignore_then(rows);

    sol.parse(source)
}

fn run_test(input: &str, sol: &str) {
    let pg = parse_parity_game(input).unwrap();
    let sol = parse_parity_sol(sol).unwrap();

    for label in ["ez", "ezm", "ep", "epq", "epqm", "epm"] {
        let (mut game, ids) = build_game(&pg).unwrap();
        let mut driver = Driver::new(&mut game);
        driver.solver = Some(label.to_string());
        driver.run();

        for &(id, winner) in &sol {
            let n = ids[&id];
            assert_eq!(game.win[n], WinState::of(winner), "solver {label}, vertex {id}");
        }
    }

    // Once more with the reductions disabled, so the recursive solver has to
    // decide the whole game on its own.
    let (mut game, ids) = build_game(&pg).unwrap();
    let mut driver = Driver::new(&mut game);
    driver.solver = Some("ez".to_string());
    driver.solve_single = false;
    driver.remove_loops = false;
    driver.remove_cycles = false;
    driver.run();

    for &(id, winner) in &sol {
        assert_eq!(game.win[ids[&id]], WinState::of(winner), "solver only, vertex {id}");
    }
}

macro_rules! declare_test {
    ($($name:ident),* $(,)?) => {
        $(
            #[test]
            fn $name() {
                let input = include_str!(concat!(env!("CARGO_MANIFEST_DIR"), "/tests/", stringify!($name)));
                let sol = include_str!(concat!(env!("CARGO_MANIFEST_DIR"), "/tests/", stringify!($name), ".sol"));
                run_test(input, sol)
            }
        )*
    };
}

declare_test! {
    small,
    escape,
    components,
}

#[test]
fn parses_names() {
    let pg = parse_parity_game("parity 1;\n0 3 0 1 \"start\";\n1 2 1 0,1;\n").unwrap();
    assert_eq!(pg.nodes[0].name.as_deref(), Some("start"));
    assert_eq!(pg.nodes[1].name, None);
    assert_eq!(pg.nodes[1].successors, [0, 1]);
}

#[test]
fn rejects_missing_edges() {
    let pg = parse_parity_game("parity 1;\n0 0 0 1;\n1 2 1;\n").unwrap();
    assert!(build_game(&pg).is_err());
}

#[test]
fn rejects_unknown_successor() {
    let pg = parse_parity_game("parity 1;\n0 0 0 7;\n").unwrap();
    assert!(build_game(&pg).is_err());
}

#[test]
fn rejects_duplicate_vertex() {
    let pg = parse_parity_game("parity 1;\n0 0 0 0;\n0 1 1 0;\n").unwrap();
    assert!(build_game(&pg).is_err());
}
