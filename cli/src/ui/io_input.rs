use crate::catalog::Catalog;
use crate::form::{FormAction, FormState, TradeType};
use crate::quote::{is_decimal_input, OrderType};
use crate::ui::format::format_number;
use anyhow::{anyhow, bail, Context};
use dialoguer::console::style;
use dialoguer::theme::ColorfulTheme;
use dialoguer::{FuzzySelect, Input, Select};
use std::fmt::Display;
use std::str::FromStr;
use std::sync::{Arc, Mutex};
use strum::IntoEnumIterator;
use tracing::debug;

/// What the user asked the trade form to do next.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TradeCommand {
    Form(FormAction),
    Submit,
    RefreshPrices,
}

/// Input source trait for driving the trade form.
/// Returning `Ok(None)` ends the session.
pub trait InputSource: Send + 'static {
    fn next_command(
        &mut self,
        state: &FormState,
        catalog: &Catalog,
    ) -> anyhow::Result<Option<TradeCommand>>;
}

tokio::task_local! {
    static INPUT_CTX: Arc<Mutex<dyn InputSource>>;
}

/// Helper to run a future with an injected input source.
pub async fn with_input_source<S, F, R>(src: S, fut: F) -> R
where
    S: InputSource,
    F: std::future::Future<Output = R>,
{
    let arc: Arc<Mutex<dyn InputSource>> = Arc::new(Mutex::new(src));
    INPUT_CTX.scope(arc, fut).await
}

/// Reads the next command from the input source in scope.
pub(crate) fn next_trade_command(
    state: &FormState,
    catalog: &Catalog,
) -> anyhow::Result<Option<TradeCommand>> {
    INPUT_CTX
        .try_with(|arc| {
            let mut guard = arc
                .lock()
                .map_err(|_| anyhow!("Input source lock poisoned"))?;
            guard.next_command(state, catalog)
        })
        .map_err(|_| anyhow!("No input source in context"))?
}

/// Script syntax, one command per line:
///
/// ```text
/// trade buy | order limit | from SWTH | to ETH | amount 100
/// limit 0.00005 | switch | reset | submit | refresh
/// ```
///
/// Blank lines and lines starting with `#` are skipped by [`VecInputSource::from_script`].
impl FromStr for TradeCommand {
    type Err = anyhow::Error;

    fn from_str(line: &str) -> Result<Self, Self::Err> {
        let line = line.trim();
        let (verb, rest) = line.split_once(char::is_whitespace).unwrap_or((line, ""));
        let arg = rest.trim().to_string();

        let command = match verb.to_ascii_lowercase().as_str() {
            "trade" => TradeCommand::Form(FormAction::SetTradeType(
                TradeType::from_str(&arg)
                    .map_err(|_| anyhow!("unknown trade type '{arg}'; expected swap, buy or sell"))?,
            )),
            "order" => TradeCommand::Form(FormAction::SetOrderType(
                OrderType::from_str(&arg)
                    .map_err(|_| anyhow!("unknown order type '{arg}'; expected market or limit"))?,
            )),
            "from" => TradeCommand::Form(FormAction::SelectFrom(arg)),
            "to" => TradeCommand::Form(FormAction::SelectTo(arg)),
            "amount" => TradeCommand::Form(FormAction::SetAmount(decimal_arg(arg)?)),
            "limit" => TradeCommand::Form(FormAction::SetLimitPrice(decimal_arg(arg)?)),
            "switch" => TradeCommand::Form(FormAction::SwitchTokens),
            "reset" => TradeCommand::Form(FormAction::Reset),
            "submit" => TradeCommand::Submit,
            "refresh" => TradeCommand::RefreshPrices,
            other => bail!("unknown command '{other}'"),
        };

        Ok(command)
    }
}

fn decimal_arg(arg: String) -> anyhow::Result<String> {
    if !is_decimal_input(&arg) {
        bail!("'{arg}' is not a number");
    }
    Ok(arg)
}

/// Entries of the interactive menu, in display order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum MenuEntry {
    TradeType,
    OrderType,
    From,
    Amount,
    Switch,
    To,
    LimitPrice,
    Submit,
    Refresh,
    Reset,
    Quit,
}

impl MenuEntry {
    fn for_state(state: &FormState) -> Vec<MenuEntry> {
        let mut entries = vec![Self::TradeType, Self::OrderType, Self::From, Self::Amount];
        if state.trade_type.allows_switch() {
            entries.push(Self::Switch);
        }
        entries.push(Self::To);
        if state.order_type == OrderType::Limit {
            entries.push(Self::LimitPrice);
        }
        entries.extend([Self::Submit, Self::Refresh, Self::Reset, Self::Quit]);
        entries
    }

    fn label(self, state: &FormState) -> String {
        let or_unset = |s: &str| {
            if s.is_empty() {
                style("not set").dim().to_string()
            } else {
                s.to_string()
            }
        };

        match self {
            Self::TradeType => format!("Trade type: {}", state.trade_type),
            Self::OrderType => format!("Order type: {}", state.order_type),
            Self::From => format!("{}: {}", state.trade_type.from_label(), or_unset(&state.from_token)),
            Self::Amount => format!("Amount: {}", or_unset(&state.amount)),
            Self::Switch => "Switch tokens".to_string(),
            Self::To => format!("{}: {}", state.trade_type.to_label(), or_unset(&state.to_token)),
            Self::LimitPrice => format!("Limit Price: {}", or_unset(&state.limit_price)),
            Self::Submit if state.can_submit() => {
                style(state.trade_type.submit_label()).bold().to_string()
            }
            Self::Submit => style(format!("{} (fill in the form first)", state.trade_type.submit_label()))
                .dim()
                .to_string(),
            Self::Refresh => "Refresh prices".to_string(),
            Self::Reset => "Reset form".to_string(),
            Self::Quit => "Quit".to_string(),
        }
    }
}

/// Interactive source backed by dialoguer prompts on the terminal.
pub struct StdinInputSource;

impl InputSource for StdinInputSource {
    fn next_command(
        &mut self,
        state: &FormState,
        catalog: &Catalog,
    ) -> anyhow::Result<Option<TradeCommand>> {
        let theme = ColorfulTheme::default();

        loop {
            let entries = MenuEntry::for_state(state);
            let labels: Vec<String> = entries.iter().map(|e| e.label(state)).collect();

            let Some(choice) = Select::with_theme(&theme)
                .with_prompt("Trade Tokens")
                .items(&labels)
                .default(0)
                .interact_opt()
                .context("Failed to read menu selection")?
            else {
                return Ok(None);
            };

            let command = match entries[choice] {
                MenuEntry::TradeType => pick_variant(&theme, "Trade type", state.trade_type)?
                    .map(|t| TradeCommand::Form(FormAction::SetTradeType(t))),
                MenuEntry::OrderType => pick_variant(&theme, "Order type", state.order_type)?
                    .map(|t| TradeCommand::Form(FormAction::SetOrderType(t))),
                MenuEntry::From => {
                    pick_token(&theme, state.trade_type.from_label(), catalog, &state.from_token)?
                        .map(|c| TradeCommand::Form(FormAction::SelectFrom(c)))
                }
                MenuEntry::To => {
                    pick_token(&theme, state.trade_type.to_label(), catalog, &state.to_token)?
                        .map(|c| TradeCommand::Form(FormAction::SelectTo(c)))
                }
                MenuEntry::Amount => Some(TradeCommand::Form(FormAction::SetAmount(
                    prompt_decimal(&theme, "Amount", "0.0", &state.amount)?,
                ))),
                MenuEntry::LimitPrice => Some(TradeCommand::Form(FormAction::SetLimitPrice(
                    prompt_decimal(
                        &theme,
                        "Limit Price",
                        &state.limit_price_placeholder(),
                        &state.limit_price,
                    )?,
                ))),
                MenuEntry::Switch => Some(TradeCommand::Form(FormAction::SwitchTokens)),
                MenuEntry::Submit => Some(TradeCommand::Submit),
                MenuEntry::Refresh => Some(TradeCommand::RefreshPrices),
                MenuEntry::Reset => Some(TradeCommand::Form(FormAction::Reset)),
                MenuEntry::Quit => return Ok(None),
            };

            // Esc inside a sub-prompt goes back to the menu
            if let Some(command) = command {
                return Ok(Some(command));
            }
        }
    }
}

fn pick_variant<E>(theme: &ColorfulTheme, prompt: &str, current: E) -> anyhow::Result<Option<E>>
where
    E: IntoEnumIterator + Display + PartialEq + Copy,
{
    let variants: Vec<E> = E::iter().collect();
    let labels: Vec<String> = variants.iter().map(ToString::to_string).collect();
    let default = variants.iter().position(|v| *v == current).unwrap_or(0);

    let selection = Select::with_theme(theme)
        .with_prompt(prompt)
        .items(&labels)
        .default(default)
        .interact_opt()
        .with_context(|| format!("Failed to read {prompt}"))?;

    Ok(selection.map(|i| variants[i]))
}

fn pick_token(
    theme: &ColorfulTheme,
    prompt: &str,
    catalog: &Catalog,
    current: &str,
) -> anyhow::Result<Option<String>> {
    let currencies = catalog.currencies();
    if currencies.is_empty() {
        bail!("The price catalog has no tradable tokens");
    }

    let labels: Vec<String> = currencies
        .iter()
        .map(|c| {
            let balance = catalog.find(c).map(|t| t.balance).unwrap_or(0.0);
            format!("{c:<10} {}", style(format!("Balance: {}", format_number(balance))).dim())
        })
        .collect();
    let default = currencies.iter().position(|c| *c == current).unwrap_or(0);

    let selection = FuzzySelect::with_theme(theme)
        .with_prompt(format!("{prompt} (type to filter)"))
        .items(&labels)
        .default(default)
        .max_length(10)
        .interact_opt()
        .with_context(|| format!("Failed to read {prompt} token"))?;

    Ok(selection.map(|i| currencies[i].to_string()))
}

fn prompt_decimal(
    theme: &ColorfulTheme,
    prompt: &str,
    placeholder: &str,
    current: &str,
) -> anyhow::Result<String> {
    let value: String = Input::with_theme(theme)
        .with_prompt(format!("{prompt} ({placeholder})"))
        .with_initial_text(current)
        .allow_empty(true)
        .validate_with(|input: &String| -> Result<(), &str> {
            if is_decimal_input(input) {
                Ok(())
            } else {
                Err("Enter a number")
            }
        })
        .interact_text()
        .with_context(|| format!("Failed to read {prompt}"))?;

    Ok(value.trim().to_string())
}

/// Vector-based input source for scripted sessions and tests.
pub struct VecInputSource {
    buf: std::vec::IntoIter<TradeCommand>,
}

impl VecInputSource {
    pub fn new(commands: Vec<TradeCommand>) -> Self {
        Self {
            buf: commands.into_iter(),
        }
    }

    /// Parses a script in the [`TradeCommand`] line syntax.
    pub fn from_script(script: &str) -> anyhow::Result<Self> {
        let commands = script
            .lines()
            .enumerate()
            .map(|(i, line)| (i + 1, line.trim()))
            .filter(|(_, line)| !line.is_empty() && !line.starts_with('#'))
            .map(|(n, line)| {
                line.parse::<TradeCommand>()
                    .with_context(|| format!("script line {n}"))
            })
            .collect::<anyhow::Result<Vec<_>>>()?;

        Ok(Self::new(commands))
    }
}

impl InputSource for VecInputSource {
    fn next_command(
        &mut self,
        _state: &FormState,
        _catalog: &Catalog,
    ) -> anyhow::Result<Option<TradeCommand>> {
        let next = self.buf.next();
        match &next {
            Some(command) => debug!("Providing scripted command: {:?}", command),
            None => debug!("No more scripted commands available"),
        }
        Ok(next)
    }
}
