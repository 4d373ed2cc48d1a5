use anyhow::Context;
use clap::{Parser, Subcommand};
use slayer_client::{GameUpdate, Leaderboard, Monster, Player, SlayerClient};

const DEFAULT_SERVER: &str = "http://127.0.0.1:50051";

#[derive(Parser)]
#[command(name = "slayer", version, about = "Command-line client for the Monster Slayer server")]
struct Cli {
    /// Server address
    #[arg(long, default_value = DEFAULT_SERVER)]
    server: String,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Join the game (creates the player on first use)
    Join { name: String },
    /// Attack the monster
    Attack {
        name: String,
        #[arg(long, default_value_t = 10)]
        damage: i32,
        /// Number of attacks to send
        #[arg(long, default_value_t = 1)]
        times: u32,
    },
    /// Print every game update until interrupted
    Watch,
    /// Send clicks to the click race
    Click {
        player: String,
        #[arg(long, default_value_t = 1)]
        amount: i32,
        #[arg(long, default_value_t = 1)]
        times: u32,
    },
    /// Print the click race leaderboard as it changes
    Leaderboard,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let mut client = SlayerClient::connect(&cli.server)
        .await
        .with_context(|| format!("could not connect to {}", cli.server))?;

    match cli.command {
        Command::Join { name } => {
            let joined = client.join_game(&name).await?;
            print_player(&joined.player);
            print_monster(&joined.monster);
        }
        Command::Attack {
            name,
            damage,
            times,
        } => {
            for _ in 0..times {
                let attacked = client.attack(&name, damage).await?;
                print_monster(&attacked.monster);
                if attacked.defeated {
                    println!(
                        "Monster defeated! Loot: {}",
                        attacked.loot.as_deref().unwrap_or("nothing")
                    );
                    print_player(&attacked.player);
                }
            }
        }
        Command::Watch => {
            let mut updates = client.stream_game_updates().await?;
            while let Some(update) = updates.message().await? {
                print_update(&update);
            }
        }
        Command::Click {
            player,
            amount,
            times,
        } => {
            let amounts = vec![amount; times as usize];
            let mut scores = client.send_clicks(&player, amounts).await?;
            while let Some(score) = scores.message().await? {
                println!("{}: {}", score.player, score.score);
            }
        }
        Command::Leaderboard => {
            let mut boards = client.leaderboard().await?;
            while let Some(board) = boards.message().await? {
                print_leaderboard(&board);
            }
        }
    }

    Ok(())
}

fn print_player(player: &Player) {
    println!(
        "{} (level {}): {} clicks, {} xp, loot [{}]",
        player.name,
        player.level,
        player.total_clicks,
        player.experience,
        player.loot_collected.join(", ")
    );
}

fn print_monster(monster: &Monster) {
    println!(
        "{} (level {}): {}/{} hp",
        monster.name, monster.level, monster.current_health, monster.max_health
    );
}

fn print_update(update: &GameUpdate) {
    println!("--- update @ {} ---", update.timestamp);
    if let Some(monster) = &update.monster {
        print_monster(monster);
    }
    let mut players: Vec<&Player> = update.players.iter().collect();
    players.sort_by(|a, b| b.total_clicks.cmp(&a.total_clicks));
    for player in players {
        print_player(player);
    }
}

fn print_leaderboard(board: &Leaderboard) {
    println!("--- leaderboard ---");
    for (rank, score) in board.scores.iter().enumerate() {
        println!("{:>3}. {} {}", rank + 1, score.player, score.score);
    }
}
