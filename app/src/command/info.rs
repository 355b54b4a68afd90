use kkm_config::{Config, TOKEN_ENV_VAR};

/// Strategy for displaying configuration information.
///
/// Prints the config path, a masked token, the upstream settings and the
/// field rules in reply order.
#[derive(Debug, Clone, Copy)]
pub struct InfoStrategy;

impl super::CommandStrategy for InfoStrategy {
    type Input = ();

    async fn execute(&self, _input: Self::Input) -> anyhow::Result<()> {
        let config_path = Config::config_path()?;
        let config = Config::load()?;

        println!("=== kkmbot Configuration ===\n");

        println!("Config file:");
        if config_path.exists() {
            println!("  {}", config_path.display());
        } else {
            println!("  {} (not found, using defaults)", config_path.display());
        }
        println!();

        println!("Telegram:");
        println!("  Token: {}", mask_token(&config.telegram.token));
        if std::env::var(TOKEN_ENV_VAR).is_ok_and(|t| !t.is_empty()) {
            println!("  {TOKEN_ENV_VAR} is set and overrides the config token");
        }
        println!();

        println!("Upstream:");
        println!("  Endpoint: {}", config.upstream.endpoint);
        println!("  User-Agent: {}", config.upstream.user_agent);
        match config.upstream.timeout_secs {
            Some(secs) => println!("  Timeout: {secs}s"),
            None => println!("  Timeout: (transport default)"),
        }
        println!();

        println!("Fields:");
        for rule in &config.fields {
            println!("  {:<32} -> {:?}", rule.pattern, rule.label);
        }
        if let Err(e) = config.field_rules() {
            println!("  Error: {e}");
        }

        Ok(())
    }
}

fn mask_token(token: &str) -> String {
    if token.is_empty() {
        "(not set)".to_string()
    } else if token.len() > 8 && token.is_char_boundary(8) {
        format!("{}...***", &token[..8])
    } else {
        "***".to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn masks_long_tokens() {
        assert_eq!(mask_token("123456789:ABCDEF"), "12345678...***");
    }

    #[test]
    fn hides_short_tokens() {
        assert_eq!(mask_token("1234"), "***");
    }

    #[test]
    fn reports_missing_token() {
        assert_eq!(mask_token(""), "(not set)");
    }
}
