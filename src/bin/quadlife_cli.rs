use clap::{Args, Parser, Subcommand, ValueEnum};
use num_format::{CustomFormat, Grouping, ToFormattedString};
use quadlife::{Coord, Node};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

#[derive(Parser, Debug)]
#[command(version, about)]
struct CLIParser {
    #[command(subcommand)]
    action: Action,
}

#[derive(Subcommand, Debug)]
enum Action {
    /// Run a built-in pattern for a number of generations
    Run(RunArgs),
    /// Build a pattern, advance it and report the core's diagnostics
    Stats(StatsArgs),
}

#[derive(Args, Debug)]
struct RunArgs {
    /// The starting pattern
    #[arg(short, long, value_enum, default_value_t = Seed::Blinker)]
    pattern: Seed,

    /// Number of generations to advance
    #[arg(short, long, default_value_t = 4)]
    generations: u32,

    /// Side length exponent of the random soup (spans 2^k x 2^k cells)
    #[arg(long, default_value_t = 5)]
    soup_log2: u32,

    /// Seed for the random soup, taken from the OS if omitted
    #[arg(long)]
    seed: Option<u64>,

    /// Print the grid after every generation
    #[arg(long)]
    print: bool,
}

#[derive(Args, Debug)]
struct StatsArgs {
    /// Side length exponent of the random soup
    #[arg(long, default_value_t = 6)]
    soup_log2: u32,

    /// Seed for the random soup, taken from the OS if omitted
    #[arg(long)]
    seed: Option<u64>,

    /// Generations to advance before reporting
    #[arg(short, long, default_value_t = 8)]
    generations: u32,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
enum Seed {
    /// Period-2 oscillator
    Blinker,
    /// Diagonal spaceship
    Glider,
    /// Random soup of the requested size
    Soup,
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let args = CLIParser::parse();
    match args.action {
        Action::Run(args) => run_sim(args),
        Action::Stats(args) => run_stats(args),
    }
}

fn run_sim(args: RunArgs) {
    let mut tree = match args.pattern {
        Seed::Blinker => place_cells(3, &[(-1, 0), (0, 0), (1, 0)]),
        Seed::Glider => place_cells(3, &[(0, -1), (1, 0), (-1, 1), (0, 1), (1, 1)]),
        Seed::Soup => random_soup(args.soup_log2, args.seed),
    };
    // room to move: the step itself keeps the coverage constant
    for _ in 0..3 {
        tree = tree.grow();
    }
    if args.print {
        tree.print();
    }

    let timer = std::time::Instant::now();
    for generation in 1..=args.generations {
        tree = tree.next_gen();
        if args.print {
            println!("Generation {generation}:");
            tree.print();
        }
    }
    println!(
        "Advanced {} generations in {:.1} secs",
        args.generations,
        timer.elapsed().as_secs_f64()
    );
    print_population(&tree);
}

fn run_stats(args: StatsArgs) {
    let timer = std::time::Instant::now();
    let mut tree = random_soup(args.soup_log2, args.seed).grow();
    for _ in 0..args.generations {
        tree = tree.next_gen();
    }
    print!("{}", tree.stats());
    println!(
        "Computed stats in {:.1} secs",
        timer.elapsed().as_secs_f64()
    );
}

fn place_cells(level: u32, cells: &[(Coord, Coord)]) -> Node {
    let mut tree = Node::empty(level);
    for &(x, y) in cells {
        tree = tree.set_cell(x, y, true);
    }
    tree
}

fn random_soup(size_log2: u32, seed: Option<u64>) -> Node {
    let mut rng = match seed {
        Some(x) => ChaCha8Rng::seed_from_u64(x),
        None => ChaCha8Rng::from_os_rng(),
    };
    let level = size_log2.max(1);
    let half = 1i64 << (level - 1);
    let mut tree = Node::empty(level);
    for y in -half..half {
        for x in -half..half {
            if rng.random_bool(0.5) {
                tree = tree.set_cell(x, y, true);
            }
        }
    }
    tree
}

fn print_population(tree: &Node) {
    let fmt = CustomFormat::builder()
        .grouping(Grouping::Standard)
        .separator("_")
        .build()
        .unwrap();
    println!("Population: {}", tree.population().to_formatted_string(&fmt));
}
