//! Lisp语法的验证脚本
//!
//! 脚本头加载验证合约并设置gas模型, 之后每组测试数据一个`let`块, 依次绑定
//! `pub-key`, `key-len`, `pub-exp`, `sig`.

use crate::config::FixtureConfig;
use crate::encode::OutputEncoding;
use crate::error::FixtureError;
use crate::fixture::EncodedFixture;
use clap::ValueEnum;
use serde::{Deserialize, Serialize};

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum FixtureStyle {
    /// 对原消息期望验证通过, 对反例消息期望验证失败
    #[default]
    Test,
    /// 统计验证原消息消耗的gas
    Bench,
}

pub struct LispRenderer<'a> {
    cfg: &'a FixtureConfig,
    style: FixtureStyle,
}

impl<'a> LispRenderer<'a> {
    const VERIFY_FN: &'static str = "rsa.verify-pkcs1-v15";

    pub fn new(cfg: &'a FixtureConfig) -> Self {
        Self {
            cfg,
            style: cfg.style,
        }
    }

    pub fn style(mut self, style: FixtureStyle) -> Self {
        self.style = style;
        self
    }

    pub fn header(&self) -> String {
        format!(
            "(enforce-pact-version {})\n(load {})\n\n(env-gasmodel \"table\")\n(env-gaslimit {})\n",
            quote(&self.cfg.pact_version),
            quote(&self.cfg.contract_path),
            self.cfg.gas_limit
        )
    }

    /// 验证合约只接受hex编码
    pub fn render(&self, fx: &EncodedFixture) -> Result<String, FixtureError> {
        if fx.encoding != OutputEncoding::Hex {
            return Err(FixtureError::Encoding(format!(
                "Lisp fixtures must be hex encoded, found `{}`",
                fx.encoding
            )));
        }

        let mut s = format!(
            "(let ((pub-key {})\n      (key-len {})\n      (pub-exp {})\n      (sig {}))\n",
            quote(&fx.modulus),
            fx.key_bits,
            quote(&fx.exponent),
            quote(&fx.signature)
        );

        let call = |msg: &str| {
            format!(
                "({} pub-key key-len pub-exp sig {})",
                Self::VERIFY_FN,
                quote(msg)
            )
        };
        let title = format!("RSA-{} e=0x{}", fx.key_bits, fx.exponent);

        match self.style {
            FixtureStyle::Test => {
                s.push_str(&format!(
                    "  (expect {} true {})\n",
                    quote(&format!("{title} valid signature")),
                    call(&fx.message)
                ));
                s.push_str(&format!(
                    "  (expect {} false {})\n",
                    quote(&format!("{title} decoy message")),
                    call(&fx.decoy)
                ));
            }
            FixtureStyle::Bench => {
                s.push_str("  (env-gas 0)\n");
                s.push_str(&format!("  {}\n", call(&fx.message)));
                s.push_str(
                    "  (print (format \"Gas for KL={} PubExp={} ====> {}\" [key-len, pub-exp, (env-gas)]))\n",
                );
            }
        }
        s.push_str(")\n");

        Ok(s)
    }

    /// 脚本头和所有`let`块
    pub fn render_script(&self, fixtures: &[EncodedFixture]) -> Result<String, FixtureError> {
        let mut s = self.header();
        for fx in fixtures {
            s.push('\n');
            s.push_str(self.render(fx)?.as_str());
        }
        Ok(s)
    }
}

// Lisp字符串字面量
fn quote(s: &str) -> String {
    let mut q = String::with_capacity(s.len() + 2);
    q.push('"');
    for c in s.chars() {
        match c {
            '"' => q.push_str("\\\""),
            '\\' => q.push_str("\\\\"),
            c => q.push(c),
        }
    }
    q.push('"');
    q
}

#[cfg(test)]
mod tests {
    use super::{quote, FixtureStyle, LispRenderer};
    use crate::config::FixtureConfig;
    use crate::encode::OutputEncoding;
    use crate::fixture::EncodedFixture;

    fn fixture() -> EncodedFixture {
        EncodedFixture {
            modulus: "c3a1".to_string(),
            exponent: "010001".to_string(),
            key_bits: 1024,
            signature: "00ff".to_string(),
            message: "Pact can do RSA signatures too!!".to_string(),
            decoy: "This does not match with signature".to_string(),
            encoding: OutputEncoding::Hex,
        }
    }

    #[test]
    fn header() {
        let cfg = FixtureConfig::default();
        assert_eq!(
            LispRenderer::new(&cfg).header(),
            "(enforce-pact-version \"5.0\")\n(load \"../contracts/rsa.pact\")\n\n(env-gasmodel \"table\")\n(env-gaslimit 10000000000000)\n"
        );
    }

    #[test]
    fn test_block() {
        let cfg = FixtureConfig::default();
        let s = LispRenderer::new(&cfg).render(&fixture()).unwrap();
        let expected = r#"(let ((pub-key "c3a1")
      (key-len 1024)
      (pub-exp "010001")
      (sig "00ff"))
  (expect "RSA-1024 e=0x010001 valid signature" true (rsa.verify-pkcs1-v15 pub-key key-len pub-exp sig "Pact can do RSA signatures too!!"))
  (expect "RSA-1024 e=0x010001 decoy message" false (rsa.verify-pkcs1-v15 pub-key key-len pub-exp sig "This does not match with signature"))
)
"#;
        assert_eq!(s, expected);
    }

    #[test]
    fn bench_block() {
        let cfg = FixtureConfig::default();
        let s = LispRenderer::new(&cfg)
            .style(FixtureStyle::Bench)
            .render(&fixture())
            .unwrap();
        let expected = r#"(let ((pub-key "c3a1")
      (key-len 1024)
      (pub-exp "010001")
      (sig "00ff"))
  (env-gas 0)
  (rsa.verify-pkcs1-v15 pub-key key-len pub-exp sig "Pact can do RSA signatures too!!")
  (print (format "Gas for KL={} PubExp={} ====> {}" [key-len, pub-exp, (env-gas)]))
)
"#;
        assert_eq!(s, expected);
        assert!(!s.contains("This does not match"));
    }

    #[test]
    fn rejects_base64url() {
        let cfg = FixtureConfig::default();
        let mut fx = fixture();
        fx.encoding = OutputEncoding::Base64url;
        assert!(LispRenderer::new(&cfg).render(&fx).is_err());
    }

    #[test]
    fn script_order() {
        let cfg = FixtureConfig::default();
        let (a, mut b) = (fixture(), fixture());
        b.key_bits = 2048;
        let s = LispRenderer::new(&cfg).render_script(&[a, b]).unwrap();
        let (i, j) = (s.find("(key-len 1024)").unwrap(), s.find("(key-len 2048)").unwrap());
        assert!(s.starts_with("(enforce-pact-version"));
        assert!(i < j);
    }

    #[test]
    fn quote_escapes() {
        assert_eq!(quote(r#"a"b\c"#), r#""a\"b\\c""#);
    }
}
