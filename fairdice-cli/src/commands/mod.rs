use crate::config::CliConfig;
use crate::console::TerminalConsole;
use comfy_table::{presets::UTF8_FULL, Table};
use fairdice_core::{
    all_pairs, verify_hex, Console, DiceSet, FairDiceError, LineConsole, Match, MatchReport,
    ProbabilityMatrix, Verdict,
};
use rand::rngs::OsRng;
use std::io;

pub fn play(
    dice_args: &[String],
    config: &CliConfig,
    print_report: bool,
) -> fairdice_core::Result<()> {
    let dice = DiceSet::parse(dice_args)?;

    if config.show_probability_table {
        let (table, _) = probability_table(&dice)?;
        println!("Probability Table:");
        println!("{}", table);
    }

    let report = if config.plain_input {
        let stdin = io::stdin();
        let mut console = LineConsole::new(stdin.lock(), io::stdout());
        run_match(dice, config, &mut console)?
    } else {
        let mut console = TerminalConsole::default();
        run_match(dice, config, &mut console)?
    };

    if print_report {
        println!("{}", serde_json::to_string_pretty(&report)?);
    }

    Ok(())
}

fn run_match<C: Console + ?Sized>(
    dice: DiceSet,
    config: &CliConfig,
    console: &mut C,
) -> fairdice_core::Result<MatchReport> {
    let game = Match::new(dice, config.strategy.build(), OsRng);
    tracing::info!(
        "Playing match {} over {} dice with strategy '{}'",
        game.id(),
        game.dice().len(),
        config.strategy
    );

    let report = game.play(console)?;

    match report.verdict {
        Verdict::HumanWins => tracing::info!("Match {}: human wins", report.id),
        Verdict::ComputerWins => tracing::info!("Match {}: computer wins", report.id),
        Verdict::Draw => tracing::info!("Match {}: draw", report.id),
    }

    Ok(report)
}

pub fn show_table(dice_args: &[String]) -> fairdice_core::Result<()> {
    let dice = DiceSet::parse(dice_args)?;
    let (table, matrix) = probability_table(&dice)?;

    println!("Probability Table:");
    println!("{}", table);
    println!("{}", describe_cycle(&dice, &matrix)?);

    Ok(())
}

pub fn verify(key: &str, value: u64, mac: &str) -> fairdice_core::Result<()> {
    if verify_hex(key, value, mac)? {
        println!("OK: HMAC-SHA256(key, \"{}\") matches {}", value, mac.trim());
        Ok(())
    } else {
        Err(FairDiceError::protocol_violation(format!(
            "HMAC-SHA256(key, \"{}\") does not match {}",
            value,
            mac.trim()
        )))
    }
}

fn probability_table(dice: &DiceSet) -> fairdice_core::Result<(Table, ProbabilityMatrix)> {
    let matrix = all_pairs(dice.dice())?;

    let mut table = Table::new();
    table.load_preset(UTF8_FULL);
    table.set_header(vec!["Dice", "vs Dice", "Wins", "Losses", "Draws"]);

    for entry in matrix.entries() {
        table.add_row(vec![
            format!("{}: {}", entry.i, dice.get(entry.i)?),
            format!("{}: {}", entry.j, dice.get(entry.j)?),
            format!("{:.2}%", entry.result.win_a),
            format!("{:.2}%", entry.result.win_b),
            format!("{:.2}%", entry.result.draw),
        ]);
    }

    Ok((table, matrix))
}

fn describe_cycle(dice: &DiceSet, matrix: &ProbabilityMatrix) -> fairdice_core::Result<String> {
    Ok(match matrix.find_cycle() {
        Some((a, b, c)) => format!(
            "Non-transitive: [{}] beats [{}], [{}] beats [{}], [{}] beats [{}]",
            dice.get(a)?,
            dice.get(b)?,
            dice.get(b)?,
            dice.get(c)?,
            dice.get(c)?,
            dice.get(a)?
        ),
        None => "No non-transitive cycle in this set.".to_string(),
    })
}
