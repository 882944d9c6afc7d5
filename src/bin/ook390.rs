use std::io::BufRead;
use std::time::Duration;

use anyhow::{Context, Result, bail};
use clap::builder::RangedU64ValueParser;
use clap::{Parser, Subcommand};
use env_logger::Env;

use ook390::consts::{DEAD_AIR_LEN, REPEAT_NUM, SWEEP_INTERVAL_MS, TCP_RX, TCP_TX};
use ook390::dip::parse_code;
use ook390::encoding::LineCode;
use ook390::fuzz::{StdDelay, Sweep, all_codes};
use ook390::socket::{PullSocketBuilder, PushSocketBuilder};

/// Upper bound for `--repeat`, keeps a burst within memory.
const MAX_REPEAT: u64 = 1_000;
/// Upper bound for `--dead-air`.
const MAX_DEAD_AIR: u64 = 100_000;

#[derive(Parser, Debug)]
#[clap(version, about = "Drive an OOK transmit flowgraph over ZeroMQ")]
struct Args {
    #[clap(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Send one burst per dip-switch code
    Brute {
        /// Endpoint the transmit flowgraph pulls from
        #[clap(short, long, default_value = TCP_TX)]
        address: String,
        /// Comma separated hex codes, e.g. 36,ae,d9 (default: all 256)
        #[clap(short, long, value_delimiter = ',', value_parser = parse_code)]
        codes: Vec<u8>,
        /// Pause after each burst
        #[clap(short, long, default_value_t = SWEEP_INTERVAL_MS)]
        interval_ms: u32,
        /// Repetitions per burst
        #[clap(
            long,
            default_value_t = REPEAT_NUM,
            value_parser = RangedU64ValueParser::<usize>::new().range(1..=MAX_REPEAT)
        )]
        repeat: usize,
        /// Chips of dead air per repetition
        #[clap(
            long,
            default_value_t = DEAD_AIR_LEN,
            value_parser = RangedU64ValueParser::<usize>::new().range(0..=MAX_DEAD_AIR)
        )]
        dead_air: usize,
        /// Wait for Enter before the first burst
        #[clap(short, long)]
        wait: bool,
    },
    /// Send one framed string
    Send {
        /// Endpoint the transmit flowgraph pulls from
        #[clap(short, long, default_value = TCP_TX)]
        address: String,
        /// Preamble as hex bytes, e.g. aaaa5555
        #[clap(short, long, default_value = "")]
        preamble: String,
        /// Text to send
        #[clap(short, long)]
        text: String,
        /// Append the additive checksum
        #[clap(long)]
        checksum: bool,
        /// Insert the length header
        #[clap(long)]
        header: bool,
        /// Time to let the message leave before closing
        #[clap(long, default_value_t = 500)]
        settle_ms: u64,
    },
    /// Print strings received from a receive flowgraph
    Listen {
        /// Endpoint the receive flowgraph pushes to
        #[clap(short, long, default_value = TCP_RX)]
        address: String,
        /// Validate and strip a trailing checksum
        #[clap(long)]
        checksum: bool,
    },
}

fn parse_hex(s: &str) -> Result<Vec<u8>> {
    if !s.is_ascii() {
        bail!("preamble {s:?} is not hex");
    }
    if s.len() % 2 != 0 {
        bail!("preamble {s:?} has an odd number of hex digits");
    }
    (0..s.len())
        .step_by(2)
        .map(|i| {
            u8::from_str_radix(&s[i..i + 2], 16)
                .with_context(|| format!("invalid hex byte {:?}", &s[i..i + 2]))
        })
        .collect()
}

fn wait_for_enter(prompt: &str) -> Result<()> {
    println!("{prompt}");
    let mut line = String::new();
    let _ = std::io::stdin().lock().read_line(&mut line)?;
    Ok(())
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(Env::default().default_filter_or("info")).init();
    let args = Args::parse();

    match args.command {
        Command::Brute {
            address,
            codes,
            interval_ms,
            repeat,
            dead_air,
            wait,
        } => {
            let line_code = LineCode::default()
                .with_repeat(repeat)
                .with_dead_air(dead_air);
            let sweep = Sweep::new(line_code).with_interval_ms(interval_ms);
            let mut tx = PushSocketBuilder::new().address(&address).bind()?;

            if wait {
                wait_for_enter("Press Enter to begin iterative attack: ")?;
            }

            let sent = if codes.is_empty() {
                sweep.run(&mut tx, all_codes(), &mut StdDelay)?
            } else {
                sweep.run(&mut tx, codes, &mut StdDelay)?
            };
            log::info!("sent {sent} bursts");
            tx.close();
        }
        Command::Send {
            address,
            preamble,
            text,
            checksum,
            header,
            settle_ms,
        } => {
            let preamble = parse_hex(&preamble)?;
            let mut tx = PushSocketBuilder::new()
                .address(&address)
                .checksum(checksum)
                .length_header(header)
                .bind()?;
            tx.send_framed_str(&preamble, &text)?;
            std::thread::sleep(Duration::from_millis(settle_ms));
            tx.close();
        }
        Command::Listen { address, checksum } => {
            let mut rx = PullSocketBuilder::new()
                .address(&address)
                .checksum(checksum)
                .connect()?;
            loop {
                let text = rx.next_str()?;
                println!("{text}");
            }
        }
    }

    Ok(())
}
