use parity::{build_game, parse_parity_game};
use solver::driver::Driver;
use solver::index::AsIndex;

fn main() {
    simplelog::TermLogger::init(
        log::LevelFilter::Info,
        simplelog::Config::default(),
        simplelog::TerminalMode::Mixed,
        simplelog::ColorChoice::Auto,
    )
    .expect("initialize logger");

    let game_path = std::env::args().nth(1).expect("No parity game file provided");
    let label = std::env::args().nth(2).unwrap_or_else(|| "ez".to_string());

    let now = std::time::Instant::now();

    let source = std::fs::read_to_string(game_path).expect("Failed to read parity game file");
    let pg = parse_parity_game(&source).expect("Failed to parse parity game");
    let (mut game, ids) = build_game(&pg).unwrap_or_else(|e| panic!("Invalid parity game: {e}"));

    println!("Parsing took {:?}", now.elapsed());

    let now = std::time::Instant::now();

    let mut driver = Driver::new(&mut game);
    driver.solver = Some(label);
    driver.run();

    println!("Solve took {:?}", now.elapsed());

    let max_id = pg.nodes.iter().map(|node| node.id).max().unwrap_or(0);
    println!("paritysol {max_id};");
    for node in &pg.nodes {
        let n = ids[&node.id];
        let winner = game.win[n].winner().expect("driver left an unsolved vertex");
        match game.strategy[n] {
            Some(to) => println!("{} {} {};", node.id, winner.index(), pg.nodes[to.to_usize()].id),
            None => println!("{} {};", node.id, winner.index()),
        }
    }
}
