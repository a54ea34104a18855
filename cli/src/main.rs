//! gammon CLI - Command-line interface for match and money equity
//!
//! This binary is the composition root: it owns the table store, reads the
//! environment, and exposes MWC lookups and equity conversion as subcommands.

mod env_config;

use std::path::PathBuf;

use anyhow::{anyhow, bail, Context};
use clap::{Args, Parser, Subcommand};
use gammon_equity::{EquityCalculator, GammonConvention, MatchContext, OutcomeProbabilities, Position};
use gammon_met::{MatchEquityTable, MetStore};

#[derive(Parser)]
#[command(name = "gammon", author, version, about = "Backgammon match equity and cubeless equity", long_about = None)]
struct Cli {
    /// MET file to use instead of the embedded table (overrides GAMMON_MET_PATH)
    #[arg(long, global = true, value_name = "PATH")]
    met: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    #[command(about = "Match-winning chance at a score")]
    Mwc {
        player_away: u32,
        opponent_away: u32,
        #[arg(long)]
        crawford: bool,
        #[arg(long)]
        post_crawford: bool,
    },
    #[command(about = "Match-winning chance after a game worth POINTS ends (player wins unless --lost)")]
    After {
        player_away: u32,
        opponent_away: u32,
        points: u32,
        #[arg(long)]
        lost: bool,
        /// The finished game was the Crawford game
        #[arg(long)]
        crawford: bool,
    },
    #[command(about = "Normalized cubeless match equity", alias = "meq")]
    MatchEquity {
        /// Away scores as PLAYER,OPPONENT
        #[arg(long, value_parser = parse_score)]
        score: (u32, u32),
        #[arg(long, default_value_t = 1)]
        cube: u32,
        #[arg(long)]
        crawford: bool,
        #[arg(long)]
        post_crawford: bool,
        #[command(flatten)]
        outcome: OutcomeArgs,
    },
    #[command(about = "Cubeless money equity", alias = "money")]
    MoneyEquity {
        #[command(flatten)]
        outcome: OutcomeArgs,
    },
    #[command(about = "Print the match equity table")]
    Show {
        #[arg(long)]
        json: bool,
    },
    #[command(about = "Match equities for a file of positions: P O CUBE W G B OW OG OB [CRAWFORD] per line")]
    Batch {
        file: PathBuf,
        /// Gammon percentages exclude backgammons
        #[arg(long)]
        exclusive: bool,
    },
}

/// Outcome percentages (0-100)
#[derive(Args)]
struct OutcomeArgs {
    #[arg(long)]
    win: f64,
    #[arg(long, default_value_t = 0.0)]
    gammon: f64,
    #[arg(long, default_value_t = 0.0)]
    backgammon: f64,
    /// Defaults to 100 - win
    #[arg(long)]
    opp_win: Option<f64>,
    #[arg(long, default_value_t = 0.0)]
    opp_gammon: f64,
    #[arg(long, default_value_t = 0.0)]
    opp_backgammon: f64,
    /// Gammon percentages exclude backgammons
    #[arg(long)]
    exclusive: bool,
}

impl OutcomeArgs {
    fn probabilities(&self) -> OutcomeProbabilities {
        OutcomeProbabilities::new(
            self.win,
            self.gammon,
            self.backgammon,
            self.opp_win.unwrap_or(100.0 - self.win),
            self.opp_gammon,
            self.opp_backgammon,
        )
    }

    fn convention(&self) -> GammonConvention {
        GammonConvention::from(!self.exclusive)
    }
}

fn parse_score(s: &str) -> Result<(u32, u32), String> {
    let (player, opponent) = s
        .split_once(',')
        .ok_or_else(|| format!("expected PLAYER,OPPONENT, got {:?}", s))?;
    let player = player.trim().parse().map_err(|e| format!("player away: {}", e))?;
    let opponent = opponent.trim().parse().map_err(|e| format!("opponent away: {}", e))?;
    Ok((player, opponent))
}

fn parse_crawford(field: &str) -> anyhow::Result<bool> {
    match field.to_ascii_lowercase().as_str() {
        "crawford" | "c" | "true" | "1" => Ok(true),
        "-" | "false" | "0" => Ok(false),
        _ => bail!("field 10: expected a Crawford flag, got {:?}", field),
    }
}

/// Parse one batch line: `P O CUBE W G B OW OG OB [CRAWFORD]`
fn parse_position(line: &str) -> anyhow::Result<Position> {
    let fields = line.split_whitespace().collect::<Vec<_>>();
    if !(9..=10).contains(&fields.len()) {
        bail!("expected 9 or 10 fields, found {}", fields.len());
    }
    let away = |i: usize| -> anyhow::Result<u32> {
        fields[i].parse().with_context(|| format!("field {}: {:?}", i + 1, fields[i]))
    };
    let pct = |i: usize| -> anyhow::Result<f64> {
        fields[i].parse().with_context(|| format!("field {}: {:?}", i + 1, fields[i]))
    };
    Ok(Position {
        probabilities: OutcomeProbabilities::new(pct(3)?, pct(4)?, pct(5)?, pct(6)?, pct(7)?, pct(8)?),
        context: MatchContext::new(away(0)?, away(1)?)
            .with_cube(away(2)?)
            .with_crawford(fields.get(9).map_or(Ok(false), |f| parse_crawford(f))?),
    })
}

fn init_logging() -> anyhow::Result<()> {
    let config = simplelog::ConfigBuilder::new()
        .set_location_level(log::LevelFilter::Off)
        .set_target_level(log::LevelFilter::Off)
        .set_thread_level(log::LevelFilter::Off)
        .build();
    simplelog::TermLogger::init(
        env_config::log_level(),
        config,
        simplelog::TerminalMode::Stderr,
        simplelog::ColorChoice::Auto,
    )
    .map_err(|e| anyhow!("initialize logger: {}", e))
}

fn print_table(met: &MatchEquityTable) {
    let info = met.info();
    println!("Name:        {}", info.name);
    println!("Version:     {}", info.version);
    println!("Description: {}", info.description);
    println!("Copyright:   {}", info.copyright);
    println!("Size:        {}", met.size());
    println!();

    let size = met.size();
    print!("{:>4}", "");
    for o in 1..=size {
        print!(" {:>6}", o);
    }
    println!();
    for p in 1..=size {
        print!("{:>4}", p);
        for o in 1..=size {
            print!(" {:>6.4}", met.mwc(p, o, false, false));
        }
        println!();
    }
    println!();
    print!("{:>4}", "post");
    for away in 1..=size {
        print!(" {:>6.4}", met.mwc(away, 1, false, true));
    }
    println!();
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_logging()?;

    let store = MetStore::new(env_config::met_source(cli.met));
    let table = || store.get().with_context(|| format!("loading {}", store.source()));

    match cli.command {
        Command::Mwc { player_away, opponent_away, crawford, post_crawford } => {
            let ctx = MatchContext::new(player_away, opponent_away)
                .with_crawford(crawford)
                .with_post_crawford(post_crawford);
            println!("{:.5}", ctx.current_mwc(&*table()?));
        }
        Command::After { player_away, opponent_away, points, lost, crawford } => {
            let met = table()?;
            println!("{:.5}", met.mwc_after_result(player_away, opponent_away, points, !lost, crawford));
        }
        Command::MatchEquity { score, cube, crawford, post_crawford, outcome } => {
            let calc = EquityCalculator::new(table()?).with_convention(outcome.convention());
            let ctx = MatchContext::new(score.0, score.1)
                .with_cube(cube)
                .with_crawford(crawford)
                .with_post_crawford(post_crawford);
            println!("{:+.4}", calc.match_equity(&outcome.probabilities(), &ctx, None));
        }
        Command::MoneyEquity { outcome } => {
            let equity = gammon_equity::money_cubeless_equity(&outcome.probabilities(), outcome.convention());
            println!("{:+.4}", equity);
        }
        Command::Show { json } => {
            let met = table()?;
            if json {
                println!("{}", serde_json::to_string_pretty(&*met)?);
            } else {
                print_table(&met);
            }
        }
        Command::Batch { file, exclusive } => {
            env_config::init_rayon_threads_lenient();
            let text = std::fs::read_to_string(&file)
                .with_context(|| format!("reading {}", file.display()))?;
            let positions = text
                .lines()
                .enumerate()
                .filter(|(_, line)| !line.trim().is_empty() && !line.trim_start().starts_with('#'))
                .map(|(idx, line)| parse_position(line).with_context(|| format!("{}:{}", file.display(), idx + 1)))
                .collect::<anyhow::Result<Vec<_>>>()?;
            log::info!("evaluating {} positions from {}", positions.len(), file.display());

            let calc = EquityCalculator::new(table()?).with_convention(GammonConvention::from(!exclusive));
            for equity in calc.match_equity_batch(&positions) {
                println!("{:+.4}", equity);
            }
        }
    }

    Ok(())
}
