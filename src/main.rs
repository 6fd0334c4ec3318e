//! Command-line driver: builds a machine from historical wheel names and
//! encodes text from the arguments or stdin.

use std::io::{self, Read};
use std::process::ExitCode;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use rotorcrypt::{Machine, MachineSettings, PlugSpec};

#[derive(Debug, Parser)]
#[command(
    name = "rotorcrypt",
    version,
    about = "Encode or decode text with a rotor cipher machine"
)]
struct Args {
    /// Wheel names, slowest first (I..VIII, BETA, GAMMA).
    #[arg(long, value_delimiter = ',', default_value = "I,II,III")]
    rotors: Vec<String>,

    /// Reflector name (A, B, C, BT).
    #[arg(long, default_value = "B")]
    reflector: String,

    /// Ring settings, one letter per rotor.
    #[arg(long)]
    ring: Option<String>,

    /// Starting dial positions, one letter per rotor.
    #[arg(long)]
    key: Option<String>,

    /// Reflector dial position.
    #[arg(long)]
    reflector_position: Option<String>,

    /// Plugboard pairs, e.g. "AB CD EF".
    #[arg(long, conflicts_with = "random_plugs")]
    plugs: Option<String>,

    /// Number of random plugboard pairs drawn from the seeded generator.
    #[arg(long, value_parser = clap::value_parser!(u8).range(0..=13))]
    random_plugs: Option<u8>,

    /// 1-based rotor positions that never step (e.g. the M4 Greek wheel).
    #[arg(long = "static", value_delimiter = ',')]
    static_rotors: Vec<usize>,

    /// Seed for the machine's random generator (used by --random-plugs).
    #[arg(long, default_value_t = 0)]
    seed: u64,

    /// Use the M4 Rasch message settings; other wheel options are ignored.
    #[arg(long)]
    m4_rasch: bool,

    /// Text to encode. Read from stdin when omitted.
    text: Option<String>,
}

impl Args {
    fn settings(&self) -> MachineSettings {
        if self.m4_rasch {
            return MachineSettings::m4_rasch();
        }
        MachineSettings {
            rotors: self.rotors.clone(),
            reflector: self.reflector.clone(),
            ring: self.ring.clone(),
            key: self.key.clone(),
            reflector_position: self.reflector_position.clone(),
            plugboard: match (&self.plugs, self.random_plugs) {
                (Some(pairs), _) => Some(PlugSpec::from(pairs.as_str())),
                (None, Some(count)) => Some(PlugSpec::Random(usize::from(count))),
                (None, None) => None,
            },
            static_rotors: self.static_rotors.clone(),
            seed: self.seed,
        }
    }
}

fn run(args: &Args) -> Result<String, Box<dyn std::error::Error>> {
    let mut machine = Machine::from_settings(&args.settings())?;
    let text = match &args.text {
        Some(text) => text.clone(),
        None => {
            let mut buf = String::new();
            io::stdin().read_to_string(&mut buf)?;
            buf
        }
    };
    Ok(machine.encode_text(&text, None)?)
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(io::stderr)
        .init();

    let args = Args::parse();
    match run(&args) {
        Ok(out) => {
            println!("{}", out);
            ExitCode::SUCCESS
        }
        Err(err) => {
            eprintln!("error: {}", err);
            ExitCode::FAILURE
        }
    }
}
