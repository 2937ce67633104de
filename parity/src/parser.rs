use chumsky::error::Simple;
use chumsky::primitive::{choice, just, none_of};
use chumsky::text::TextParser;
use chumsky::{text, Parser};
use solver::game::Player;

use crate::{Node, ParityGame};

// header ::= 'parity' max-id ';'
// row    ::= id priority owner successors name? ';'
// owner  ::= '0' | '1'
// name   ::= '"' string '"'
pub fn parse_parity_game(source: &str) -> Result<ParityGame, Vec<Simple<char>>> {
    let parity = just("parity").padded();
    let number = text::int(10).map(|n: String| n.parse::<usize>().unwrap()).padded();
    let comma = just(',').padded();
    let semi = just(';');
    let newline = text::newline();

    let header = parity.then(number).then(semi).then(newline);

    let owner = choice((just('0').to(Player::P0), just('1').to(Player::P1)));
    let successors = number.separated_by(comma);
    let name = none_of("\";").repeated().collect::<String>().delimited_by(just('"'), just('"'));
    let row = number.then(number).then(owner).then(successors).then(name.padded().or_not());
    let row = row.map(|((((id, priority), owner), successors), name)| Node {
        id,
        priority,
        owner,
        successors,
        name,
    });

    let rows = row.then_ignore(semi).separated_by(newline).allow_trailing();
    let game = header.ignore_then(rows).map(|nodes| ParityGame { nodes });

    game.parse(source)
}
