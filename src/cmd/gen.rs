use crate::cmd::{write_to_file_or_stdout, RngArgs};
use crate::config::FixtureConfig;
use crate::encode::OutputEncoding;
use crate::fixture::{BatchRunner, FixtureGenerator, FixtureStyle, LispRenderer};
use clap::{Args, ValueEnum};
use std::path::PathBuf;

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum GenFormat {
    /// 验证合约的测试脚本, 总是hex编码
    #[default]
    Lisp,
    Json,
}

#[derive(Args, Clone)]
#[command(about = "generate the fixtures over key sizes × public exponents")]
pub struct GenArgs {
    #[command(flatten)]
    rng: RngArgs,

    #[arg(long, value_delimiter = ',', help = "the key bit lengths, default to the configured `key_sizes`")]
    sizes: Vec<usize>,

    #[arg(long, value_delimiter = ',', help = "the public exponents, default to the configured `exponents`")]
    exponents: Vec<u64>,

    #[arg(long, help = "the Lisp block style, default to the configured `style`")]
    style: Option<FixtureStyle>,

    #[arg(long, value_enum, default_value_t = GenFormat::Lisp)]
    format: GenFormat,

    #[arg(long, help = "the encoding of the JSON fixtures, default to the configured `encoding`")]
    encoding: Option<OutputEncoding>,

    #[arg(short, long, help = "file to save the fixtures, it will output to stdout if not specified")]
    ofile: Option<PathBuf>,

    #[arg(long, help = "force write if the ofile already exists")]
    force: bool,
}

impl GenArgs {
    fn config(&self, cfg: &FixtureConfig) -> FixtureConfig {
        let mut cfg = cfg.clone();
        if !self.sizes.is_empty() {
            cfg.key_sizes = self.sizes.clone();
        }
        if !self.exponents.is_empty() {
            cfg.exponents = self.exponents.clone();
        }
        if let Some(style) = self.style {
            cfg.style = style;
        }
        cfg
    }

    /// 返回渲染后的测试数据和失败的`位长度/指数`组合
    pub fn run(&self, cfg: &FixtureConfig) -> anyhow::Result<(String, Vec<String>)> {
        let cfg = self.config(cfg);
        let encoding = match self.format {
            GenFormat::Lisp => OutputEncoding::Hex,
            GenFormat::Json => self.encoding.unwrap_or(cfg.encoding),
        };

        let mut rng = self.rng.rng(&cfg);
        let outcome =
            BatchRunner::new(&cfg, FixtureGenerator::new(encoding)).run(&mut rng.as_mut());

        let out = match self.format {
            GenFormat::Lisp => LispRenderer::new(&cfg).render_script(outcome.fixtures.as_slice())?,
            GenFormat::Json => serde_json::to_string_pretty(&outcome.fixtures)?,
        };

        let failed = outcome
            .failures
            .iter()
            .map(|f| format!("{}/{}", f.key_bits, f.exponent))
            .collect();

        Ok((out, failed))
    }

    pub fn exe(self, cfg: &FixtureConfig) -> anyhow::Result<()> {
        let (out, failed) = self.run(cfg)?;
        write_to_file_or_stdout(self.ofile.as_deref(), self.force, out.as_bytes())?;

        if !failed.is_empty() {
            anyhow::bail!(
                "{} fixtures failed: [{}]",
                failed.len(),
                failed.join(", ")
            );
        }

        Ok(())
    }
}
