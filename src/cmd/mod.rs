use crate::config::FixtureConfig;
use crate::message::Message;
use anyhow::Context;
use cipher::{DefaultRand, Rand, SeededRand};
use clap::{Args, Parser, Subcommand};
use std::fs::OpenOptions;
use std::io::Write;
use std::path::{Path, PathBuf};

mod gen;
pub use gen::GenArgs;

mod key;
pub use key::KeyArgs;

mod sign;
pub use sign::SignArgs;

mod verify;
pub use verify::VerifyArgs;

#[derive(Parser)]
#[command(name = "rsafix", version, about = "deterministic RSA PKCS #1 v1.5 / BLAKE2b-256 signature fixtures")]
pub struct Cli {
    #[arg(long, global = true, value_name = "FILE")]
    #[arg(help = "configuration file(json/json5), overridden by `RSAFIX_*` environment variables")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    cmd: SubCmd,
}

#[derive(Subcommand)]
enum SubCmd {
    Gen(GenArgs),
    Sign(SignArgs),
    Key(KeyArgs),
    Verify(VerifyArgs),
}

impl Cli {
    pub fn exe(self) -> anyhow::Result<()> {
        let cfg = FixtureConfig::load(self.config.as_deref())
            .with_context(|| "failed to load the configuration")?;

        match self.cmd {
            SubCmd::Gen(a) => a.exe(&cfg),
            SubCmd::Sign(a) => a.exe(&cfg),
            SubCmd::Key(a) => a.exe(&cfg),
            SubCmd::Verify(a) => a.exe(&cfg),
        }
    }
}

#[derive(Args, Clone)]
pub struct MessageArgs {
    #[arg(value_name = "MESSAGE")]
    #[arg(help = "the message to sign, the configured message is used if neither it nor `--file` is specified")]
    msg: Option<String>,

    #[arg(short, long, conflicts_with = "msg", help = "read the message from the file")]
    file: Option<PathBuf>,

    #[arg(long, help = "treat the message as JSON and sign its canonical serialization")]
    json: bool,
}

impl MessageArgs {
    pub fn message(&self, default: &str) -> anyhow::Result<Message> {
        let raw = match (&self.msg, &self.file) {
            (Some(m), _) => m.clone().into_bytes(),
            (None, Some(f)) => std::fs::read(f)
                .with_context(|| format!("failed to read the message from `{}`", f.display()))?,
            (None, None) => default.as_bytes().to_vec(),
        };

        if self.json {
            let s = String::from_utf8(raw).context("the JSON message is not valid UTF-8")?;
            Ok(Message::from_json_str(s.as_str())?)
        } else {
            Ok(Message::Raw(raw))
        }
    }
}

#[derive(Args, Clone)]
pub struct RngArgs {
    #[arg(long, help = "the seed of the deterministic random source, default to the configured seed")]
    seed: Option<u64>,

    #[arg(long, conflicts_with = "seed", help = "use the OS entropy instead of the seeded random source")]
    random: bool,
}

impl RngArgs {
    pub fn rng(&self, cfg: &FixtureConfig) -> Box<dyn Rand> {
        if self.random {
            Box::new(DefaultRand::default())
        } else {
            let seed = self.seed.unwrap_or(cfg.seed);
            log::debug!("random source seeded with {seed}");
            Box::new(SeededRand::new(seed))
        }
    }
}

fn write_to_file_or_stdout(out: Option<&Path>, force: bool, data: &[u8]) -> anyhow::Result<()> {
    match out {
        Some(p) => {
            let mut f = OpenOptions::new()
                .write(true)
                .truncate(true)
                .create(force)
                .create_new(!force)
                .open(p)
                .with_context(|| format!("failed to open `{}`", p.display()))?;
            f.write_all(data)?;
            log::info!("written to `{}`", p.display());
        }
        None => {
            let mut stdout = std::io::stdout().lock();
            stdout.write_all(data)?;
            stdout.flush()?;
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::Cli;
    use clap::{CommandFactory, Parser};

    #[test]
    fn cli_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn parse_subcommands() {
        let cases: [&[&str]; 6] = [
            &["rsafix", "gen"],
            &["rsafix", "gen", "--sizes", "1024,2048", "--exponents", "5", "--style", "bench"],
            &["rsafix", "--config", "a.json", "sign", "Hello world", "--encoding", "base64url"],
            &["rsafix", "sign", "--json", "-f", "msg.json", "--key", "k.pem"],
            &["rsafix", "key", "1024", "-e", "5", "--format", "json"],
            &["rsafix", "verify", "--key", "pk.pem", "--signature", "00ff", "Hello world"],
        ];
        for case in cases {
            assert!(Cli::try_parse_from(case).is_ok(), "{case:?}");
        }

        assert!(Cli::try_parse_from(["rsafix", "sign", "msg", "-f", "a"]).is_err());
        assert!(Cli::try_parse_from(["rsafix", "key", "--seed", "1", "--random"]).is_err());
    }
}
