//! Simple command that prints one or '-n count' UULID strings, or describes the UULID given by
//! '-p uulid'

use std::{env, io, io::Write, process::ExitCode};

use chrono::{DateTime, SecondsFormat, Utc};

enum Command {
    Generate(usize),
    Parse(String),
}

fn main() -> io::Result<ExitCode> {
    let command = {
        let mut args = env::args();
        let program = args.next();
        match parse_args(args) {
            Ok(command) => command,
            Err(message) => {
                eprintln!("Error: {}", message);
                eprintln!(
                    "Usage: {} [-n count | -p uulid]",
                    program.as_deref().unwrap_or("uulid")
                );
                return Ok(ExitCode::FAILURE);
            }
        }
    };

    match command {
        Command::Generate(count) => {
            let generator = match uulid::Generator::new() {
                Ok(g) => g,
                Err(err) => {
                    eprintln!("Error: {}", err);
                    return Ok(ExitCode::FAILURE);
                }
            };

            let mut buf = io::BufWriter::new(io::stdout());
            for e in generator.iter().take(count) {
                match e {
                    Ok(id) => writeln!(buf, "{}", id)?,
                    Err(err) => {
                        buf.flush()?;
                        eprintln!("Error: {}", err);
                        return Ok(ExitCode::FAILURE);
                    }
                }
            }
            buf.flush()?;
        }
        Command::Parse(text) => {
            let id = match uulid::Uulid::parse(text.as_bytes()) {
                Ok(id) => id,
                Err(err) => {
                    eprintln!("Error: {}", err);
                    return Ok(ExitCode::FAILURE);
                }
            };

            let time = DateTime::<Utc>::from(id.time());
            println!(
                "Time: {}, Timestamp: {}, Entropy: {}",
                time.to_rfc3339_opts(SecondsFormat::Millis, true),
                id.timestamp(),
                hex::encode(id.entropy())
            );
        }
    }

    Ok(ExitCode::SUCCESS)
}

fn parse_args(mut args: impl Iterator<Item = String>) -> Result<Command, String> {
    let mut command = None;
    while let Some(arg) = args.next() {
        if command.is_some() {
            return Err("only one of options 'n' and 'p' may be given".to_owned());
        }
        match arg.as_str() {
            "-n" => {
                let Some(n_arg) = args.next() else {
                    return Err("argument to option 'n' missing".to_owned());
                };
                let Ok(c) = n_arg.parse() else {
                    return Err(format!("invalid argument to option 'n': '{}'", n_arg));
                };
                command.replace(Command::Generate(c));
            }
            "-p" => {
                let Some(p_arg) = args.next() else {
                    return Err("argument to option 'p' missing".to_owned());
                };
                command.replace(Command::Parse(p_arg));
            }
            _ => return Err(format!("unrecognized argument '{}'", arg)),
        }
    }
    Ok(command.unwrap_or(Command::Generate(1)))
}
