use std::collections::BTreeSet;
use std::fs::File;
use std::io::{BufWriter, Write};

use rand::{thread_rng, Rng};

fn main() {
    let outpath = std::env::args().nth(1).expect("No output file provided");
    let nvertices = std::env::args().nth(2).expect("No vertex count provided");
    let maxdegree = std::env::args().nth(3).expect("No max out-degree provided");
    let maxprio = std::env::args().nth(4).expect("No max priority provided");

    let nvertices = nvertices.parse::<usize>().expect("Vertex count is not a valid number");
    let maxdegree = maxdegree.parse::<usize>().expect("Max out-degree is not a valid number");
    let maxprio = maxprio.parse::<usize>().expect("Max priority is not a valid number");
    assert!(nvertices > 0, "The game must have at least one vertex");
    assert!(maxdegree > 0, "Every vertex needs at least one outgoing edge");

    let out = File::create(outpath).expect("Cannot create output file");

    let mut rng = thread_rng();

    let mut vertices = Vec::with_capacity(nvertices);
    for _ in 0..nvertices {
        let owner = rng.gen_range(0..2);
        let priority = rng.gen_range(0..=maxprio);

        let degree = rng.gen_range(1..=maxdegree.min(nvertices));
        let mut successors = BTreeSet::new();
        while successors.len() < degree {
            successors.insert(rng.gen_range(0..nvertices));
        }

        vertices.push((owner, priority, successors));
    }

    write_output(out, vertices).expect("Failed to write output file");
}

fn write_output(
    out: File,
    vertices: Vec<(usize, usize, BTreeSet<usize>)>,
) -> Result<(), Box<dyn std::error::Error>> {
    let mut out = BufWriter::new(out);

    writeln!(out, "parity {};", vertices.len() - 1)?;

    for (id, (owner, priority, successors)) in vertices.into_iter().enumerate() {
        let successors =
            successors.iter().map(|s| s.to_string()).collect::<Vec<_>>().join(",");
        writeln!(out, "{id} {priority} {owner} {successors};")?;
    }

    Ok(())
}
