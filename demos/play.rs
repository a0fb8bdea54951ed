use std::rc::Rc;

use clap::Parser;
use color_eyre::eyre::{eyre, WrapErr};

use queens_bdd::bdd::Bdd;
use queens_bdd::game::{Game, Placement};
use queens_bdd::index::Cell;

#[derive(Debug, Parser)]
#[command(author, version)]
struct Cli {
    /// Board size (number of queens).
    #[arg(value_name = "INT", default_value = "8")]
    n: usize,

    /// Manager size in bits (`2^bits` unique-table buckets, capped at 16 bits).
    #[clap(long, value_name = "INT", default_value = "20")]
    bits: usize,

    /// Queens to place, as `x,y` pairs.
    #[clap(long = "move", value_name = "X,Y", value_parser = parse_cell)]
    moves: Vec<Cell>,

    /// Keep following hints after the given moves until the board is full.
    #[clap(long)]
    hints: bool,

    /// Log level.
    #[clap(long, value_name = "LEVEL", default_value = "info")]
    log_level: simplelog::LevelFilter,
}

fn parse_cell(s: &str) -> Result<Cell, String> {
    let (x, y) = s.split_once(',').ok_or_else(|| format!("expected `x,y`, got `{}`", s))?;
    let x = x.trim().parse().map_err(|e| format!("bad x in `{}`: {}", s, e))?;
    let y = y.trim().parse().map_err(|e| format!("bad y in `{}`: {}", s, e))?;
    Ok(Cell::new(x, y))
}

fn play(game: &mut Game, cell: Cell) -> color_eyre::Result<()> {
    let placement = game.place_queen(cell.x, cell.y)?;
    println!("queen at {}: {:?}, {} solutions left", cell, placement, game.remaining_solutions());
    print!("{}", game.board());
    if placement == Placement::Ignored {
        println!("(cell {} is blocked)", cell);
    }
    Ok(())
}

fn main() -> color_eyre::Result<()> {
    color_eyre::install()?;

    let args = Cli::parse();

    simplelog::TermLogger::init(
        args.log_level,
        simplelog::Config::default(),
        simplelog::TerminalMode::Mixed,
        simplelog::ColorChoice::Auto,
    )?;

    let time_total = std::time::Instant::now();
    println!("args = {:?}", args);

    let bdd = Rc::new(Bdd::new(args.bits));
    let mut game = Game::with_manager(Rc::clone(&bdd), args.n)
        .wrap_err_with(|| format!("Could not start a game on a {}x{} board", args.n, args.n))?;
    println!("bdd = {:?}", bdd);
    println!("{} solutions", game.remaining_solutions());
    print!("{}", game.board());

    for &cell in &args.moves {
        play(&mut game, cell)?;
    }

    if args.hints {
        while let Some(cell) = game.hint() {
            play(&mut game, cell)?;
        }
    }

    if game.is_solved() {
        println!("Solved!");
    } else if bdd.is_zero(game.formula()) {
        return Err(eyre!("No solution exists for n = {}", args.n));
    } else {
        println!("{} queens still missing", game.size() - game.queens_placed());
    }

    println!("bdd = {:?}", bdd);
    println!("cache hits: {}", bdd.cache().hits());
    println!("cache misses: {}", bdd.cache().misses());

    let time_total = time_total.elapsed();
    println!("Done in {:.3} s", time_total.as_secs_f64());

    Ok(())
}
