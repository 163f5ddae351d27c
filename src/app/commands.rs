use crate::app::render;
use crate::core::shop::{Shop, ShopSnapshot};
use crate::domain::model::{Notification, ProductId, QuantityDelta};
use crate::domain::ports::KeyValueStore;
use crate::utils::error::{Result, ShopError};
use serde::Serialize;
use std::io::{BufRead, Write};
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    Products,
    Cart,
    Add(ProductId),
    Increment(ProductId),
    Decrement(ProductId),
    Remove(ProductId),
    Help,
    Quit,
}

pub const HELP_TEXT: &str = "\
Commands:
  products        list the catalog
  cart            show the cart
  add <id>        add one unit to the cart
  inc <id>        increase a cart line by one
  dec <id>        decrease a cart line by one
  remove <id>     remove a product from the cart
  help            show this help
  quit            leave the shell
";

impl FromStr for Command {
    type Err = ShopError;

    fn from_str(line: &str) -> Result<Self> {
        let mut parts = line.split_whitespace();
        let verb = parts.next().unwrap_or_default().to_ascii_lowercase();
        let argument = parts.next();

        if parts.next().is_some() {
            return Err(ShopError::InvalidCommand {
                message: format!("Too many arguments in '{}'", line.trim()),
            });
        }

        let id = |verb: &str| -> Result<ProductId> {
            let raw = argument.ok_or_else(|| ShopError::InvalidCommand {
                message: format!("'{}' needs a product id", verb),
            })?;
            raw.parse().map_err(|_| ShopError::InvalidCommand {
                message: format!("'{}' is not a valid product id", raw),
            })
        };

        match verb.as_str() {
            "products" | "list" => Ok(Command::Products),
            "cart" => Ok(Command::Cart),
            "add" => Ok(Command::Add(id("add")?)),
            "inc" | "+" => Ok(Command::Increment(id("inc")?)),
            "dec" | "-" => Ok(Command::Decrement(id("dec")?)),
            "remove" | "rm" => Ok(Command::Remove(id("remove")?)),
            "help" | "?" => Ok(Command::Help),
            "quit" | "exit" => Ok(Command::Quit),
            other => Err(ShopError::InvalidCommand {
                message: format!("Unknown command '{}', type 'help'", other),
            }),
        }
    }
}

/// One JSON document per response; absent parts are omitted.
#[derive(Serialize, Default)]
struct JsonOutput<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    notification: Option<&'a Notification>,
    #[serde(skip_serializing_if = "Option::is_none")]
    snapshot: Option<&'a ShopSnapshot>,
    #[serde(skip_serializing_if = "Option::is_none")]
    help: Option<&'a str>,
}

impl JsonOutput<'_> {
    fn render(&self) -> Result<String> {
        Ok(format!("{}\n", serde_json::to_string_pretty(self)?))
    }
}

/// Text or JSON front end over a [`Shop`].
#[derive(Debug, Clone)]
pub struct Presenter {
    currency: String,
    json: bool,
}

impl Presenter {
    pub fn new(currency: impl Into<String>, json: bool) -> Self {
        Self {
            currency: currency.into(),
            json,
        }
    }

    /// Runs one intent and returns the re-rendered view.
    pub fn execute<S: KeyValueStore>(&self, shop: &mut Shop<S>, command: Command) -> Result<String> {
        let notification = match command {
            Command::Products | Command::Cart => None,
            Command::Add(id) => Some(shop.add_to_cart(id)),
            Command::Increment(id) => Some(shop.change_quantity(id, QuantityDelta::Increment)),
            Command::Decrement(id) => Some(shop.change_quantity(id, QuantityDelta::Decrement)),
            Command::Remove(id) => Some(shop.remove_from_cart(id)),
            Command::Help => return self.render_help(),
            Command::Quit => return Ok(String::new()),
        };

        let snapshot = shop.snapshot();
        if self.json {
            return JsonOutput {
                notification: notification.as_ref(),
                snapshot: Some(&snapshot),
                ..Default::default()
            }
            .render();
        }

        let mut out = String::new();
        if let Some(notification) = &notification {
            out.push_str(&format!("{}\n", notification));
        }
        match command {
            Command::Products => out.push_str(&render::render_products(&snapshot, &self.currency)),
            _ => out.push_str(&render::render_cart(&snapshot, &self.currency)),
        }
        Ok(out)
    }

    pub fn render_help(&self) -> Result<String> {
        if self.json {
            return JsonOutput {
                help: Some(HELP_TEXT),
                ..Default::default()
            }
            .render();
        }
        Ok(HELP_TEXT.to_string())
    }

    pub fn render_notifications(&self, notifications: &[Notification]) -> Result<String> {
        if self.json {
            return notifications
                .iter()
                .map(|n| {
                    JsonOutput {
                        notification: Some(n),
                        ..Default::default()
                    }
                    .render()
                })
                .collect();
        }
        Ok(notifications.iter().map(|n| format!("{}\n", n)).collect())
    }

    /// 互動模式：逐行讀取指令，每個動作完成後才處理下一個
    pub fn run_shell<S, R, W>(&self, shop: &mut Shop<S>, input: R, mut output: W) -> Result<()>
    where
        S: KeyValueStore,
        R: BufRead,
        W: Write,
    {
        write!(output, "{}", self.render_help()?)?;
        for line in input.lines() {
            let line = line?;
            if line.trim().is_empty() {
                continue;
            }

            match line.parse::<Command>() {
                Ok(Command::Quit) => break,
                Ok(command) => {
                    let rendered = self.execute(shop, command)?;
                    write!(output, "{}", rendered)?;
                }
                Err(e) => {
                    tracing::debug!("Invalid shell input '{}': {}", line, e);
                    let warning = Notification::warning(e.user_friendly_message());
                    write!(output, "{}", self.render_notifications(&[warning])?)?;
                }
            }
            output.flush()?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_commands() {
        assert_eq!("products".parse::<Command>().unwrap(), Command::Products);
        assert_eq!("ADD 3".parse::<Command>().unwrap(), Command::Add(ProductId(3)));
        assert_eq!("inc 3".parse::<Command>().unwrap(), Command::Increment(ProductId(3)));
        assert_eq!("- 3".parse::<Command>().unwrap(), Command::Decrement(ProductId(3)));
        assert_eq!("rm 3".parse::<Command>().unwrap(), Command::Remove(ProductId(3)));
        assert_eq!("quit".parse::<Command>().unwrap(), Command::Quit);
    }

    #[test]
    fn test_parse_rejects_bad_input() {
        assert!("add".parse::<Command>().is_err());
        assert!("add x".parse::<Command>().is_err());
        assert!("add 1 2".parse::<Command>().is_err());
        assert!("checkout".parse::<Command>().is_err());
    }
}
